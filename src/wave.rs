use std::io::{Error as IoError, ErrorKind as IoErrorKind, Read};

use dasp::sample::{FromSample, Sample, I24};
use hound::{Error, Sample as InputSample, SampleFormat, WavReader, WavSpec};
use ndarray::Array2;
use num::traits::Zero;


pub trait WavReaderExt {
    /// Reads all frames as `(frames, channels)`, converting every sample to
    /// `T` according to the layout given in the file header.
    fn read_frames<T>(self) -> Result<(Array2<T>, WavSpec), Error>
    where
        T: Sample + FromPcmSample + Zero;
}

impl<R> WavReaderExt for WavReader<R>
where
    R: Read,
{
    fn read_frames<T>(self) -> Result<(Array2<T>, WavSpec), Error>
    where
        T: Sample + FromPcmSample + Zero,
    {
        let spec = self.spec();

        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => read_as(self, |s: f32| s),
            (SampleFormat::Int,    8) => read_as(self, |s: i8| s),
            (SampleFormat::Int,   16) => read_as(self, |s: i16| s),
            (SampleFormat::Int,   24) => read_as(self, I24::new_unchecked),
            (SampleFormat::Int,   32) => read_as(self, |s: i32| s),
            _ => Err(Error::Unsupported),
        }
    }
}

// hound hands out 24 bit samples as i32, `lift` maps them to the dasp type
fn read_as<R, H, S, T, F>(reader: WavReader<R>, lift: F) -> Result<(Array2<T>, WavSpec), Error>
where
    R: Read,
    H: InputSample,
    S: Sample,
    T: Sample + FromSample<S> + Zero,
    F: Fn(H) -> S,
{
    let spec = reader.spec();
    let frames = reader.duration() as usize;
    let channels = spec.channels as usize;
    let mut samples = reader.into_samples::<H>();

    let mut data = Array2::zeros((frames, channels));

    for x in data.iter_mut() {
        let raw = samples.next().ok_or_else(|| {
            Error::IoError(IoError::new(IoErrorKind::InvalidData, "truncated sample data"))
        })??;

        *x = T::from_sample(lift(raw));
    }

    Ok((data, spec))
}


/// Target sample types convertible from every PCM layout a wave file can hold.
pub trait FromPcmSample:
    FromSample<i8> + FromSample<i16> + FromSample<I24> + FromSample<i32> + FromSample<f32>
{}

impl<T> FromPcmSample for T
where
    T: FromSample<i8> + FromSample<i16> + FromSample<I24> + FromSample<i32> + FromSample<f32>
{}
