//! Audio file decoding.
//!
//! Wave files are read through `hound`, everything else is probed and decoded
//! by `symphonia`. Wave layouts `hound` cannot read (64-bit float, for
//! example) are handed to `symphonia` as well. In all cases the signal is
//! downmixed to a single channel and kept at its native sample rate.

use crate::error::{
    DecodeSnafu, Error, NoAudioTrackSnafu, OpenSnafu, Result, UnknownSampleRateSnafu, WavSnafu,
};
use crate::wave::WavReaderExt;

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use hound::WavReader;
use log::{debug, info, warn};
use ndarray::{Array1, Array2, Axis};
use snafu::{OptionExt, ResultExt};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;


/// Decoded mono signal.
#[derive(Debug, Clone)]
pub struct Signal {
    pub samples: Array1<f32>,
    pub sample_rate: u32,

    /// Number of channels in the source, before the downmix.
    pub channels: u16,
}

impl Signal {
    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}


pub fn load<P: AsRef<Path>>(path: P) -> Result<Signal> {
    let path = path.as_ref();

    let ext = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let signal = match ext.as_deref() {
        Some("wav") | Some("wave") => match load_wav(path) {
            Err(Error::Wav { source: hound::Error::FormatError(_), .. })
            | Err(Error::Wav { source: hound::Error::Unsupported, .. }) => {
                debug!("'{}' is not readable as plain PCM wave, probing instead", path.display());
                load_encoded(path)?
            },
            result => result?,
        },
        _ => load_encoded(path)?,
    };

    info!("loaded '{}': {} samples at {} Hz ({:.2} s, {} channel(s))",
          path.display(), signal.samples.len(), signal.sample_rate, signal.duration(),
          signal.channels);

    Ok(signal)
}

pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<Signal> {
    let path = path.as_ref();

    let reader = WavReader::open(path).context(WavSnafu { path })?;
    debug!("wave header of '{}': {:?}", path.display(), reader.spec());

    let (frames, spec) = reader.read_frames::<f32>().context(WavSnafu { path })?;

    Ok(Signal {
        samples: downmix(frames),
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

pub fn load_encoded<P: AsRef<Path>>(path: P) -> Result<Signal> {
    let path = path.as_ref();

    let file = File::open(path).context(OpenSnafu { path })?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, stream, &FormatOptions::default(), &MetadataOptions::default())
        .context(DecodeSnafu { path })?;

    let mut format = probed.format;

    let track = format.tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .cloned()
        .context(NoAudioTrackSnafu { path })?;

    let sample_rate = track.codec_params.sample_rate
        .context(UnknownSampleRateSnafu { path })?;

    debug!("decoding track {} of '{}': {:?}", track.id, path.display(), track.codec_params);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context(DecodeSnafu { path })?;

    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    let mut interleaved: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            },
            Err(SymphoniaError::IoError(ref err)) if err.kind() == ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err).context(DecodeSnafu { path }),
        };

        if packet.track_id() != track.id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!("skipping corrupt packet in '{}': {}", path.display(), msg);
                continue;
            },
            Err(err) => return Err(err).context(DecodeSnafu { path }),
        };

        let spec = *decoded.spec();
        channels = spec.channels.count();

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        interleaved.extend_from_slice(buffer.samples());
    }

    Ok(Signal {
        samples: downmix(deinterleave(interleaved, channels)),
        sample_rate,
        channels: channels as u16,
    })
}


/// Splits interleaved samples into `(frames, channels)`, dropping a trailing
/// partial frame.
pub fn deinterleave(mut interleaved: Vec<f32>, channels: usize) -> Array2<f32> {
    let channels = channels.max(1);
    let frames = interleaved.len() / channels;
    interleaved.truncate(frames * channels);

    Array2::from_shape_vec((frames, channels), interleaved)
        .unwrap_or_else(|_| Array2::zeros((0, channels)))
}

/// Averages the channels of every frame.
pub fn downmix(frames: Array2<f32>) -> Array1<f32> {
    match frames.ncols() {
        1 => frames.index_axis_move(Axis(1), 0),
        _ => frames.mean_axis(Axis(1)).unwrap_or_else(|| Array1::zeros(frames.nrows())),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    #[test]
    fn downmix_averages_channels() {
        let frames = array![[1.0, 0.0], [0.5, -0.5], [0.25, 0.75]];
        assert_eq!(downmix(frames), array![0.5f32, 0.0, 0.5]);
    }

    #[test]
    fn downmix_keeps_mono() {
        let frames = array![[0.1], [0.2], [0.3]];
        assert_eq!(downmix(frames), array![0.1f32, 0.2, 0.3]);
    }

    #[test]
    fn downmix_without_channels() {
        let frames = Array2::<f32>::zeros((4, 0));
        assert_eq!(downmix(frames).len(), 4);
    }

    #[test]
    fn deinterleave_drops_partial_frame() {
        let frames = deinterleave(vec![1.0, 2.0, 3.0, 4.0, 5.0], 2);
        assert_eq!(frames, array![[1.0f32, 2.0], [3.0, 4.0]]);
    }

    // IEEE float, 64 bits per sample, interleaved
    fn float64_wave(channels: u16, sample_rate: u32, frames: &[&[f64]]) -> Vec<u8> {
        let data_len = (frames.len() * channels as usize * 8) as u32;
        let mut buf = Vec::new();

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_len).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&3u16.to_le_bytes());
        buf.extend_from_slice(&channels.to_le_bytes());
        buf.extend_from_slice(&sample_rate.to_le_bytes());
        buf.extend_from_slice(&(sample_rate * channels as u32 * 8).to_le_bytes());
        buf.extend_from_slice(&(channels * 8).to_le_bytes());
        buf.extend_from_slice(&64u16.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_len.to_le_bytes());
        for frame in frames {
            for x in frame.iter() {
                buf.extend_from_slice(&x.to_le_bytes());
            }
        }

        buf
    }

    #[test]
    fn reads_float64_wave() {
        let frames = vec![&[0.5, -0.25][..]; 8000];
        let path = std::env::temp_dir()
            .join(format!("specgram-float64-{}.wav", std::process::id()));
        std::fs::write(&path, float64_wave(2, 8000, &frames)).unwrap();

        assert!(matches!(load_wav(&path), Err(Error::Wav { .. })));

        let signal = load(&path);
        std::fs::remove_file(&path).unwrap();
        let signal = signal.unwrap();

        assert_eq!(signal.sample_rate, 8000);
        assert_eq!(signal.channels, 2);
        assert_eq!(signal.samples.len(), 8000);
        assert!(signal.samples.iter().all(|&x| x == 0.125));
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("specgram-does-not-exist.wav");
        assert!(load(&path).is_err());

        let path = std::env::temp_dir().join("specgram-does-not-exist.flac");
        assert!(load(&path).is_err());
    }
}
