use specgram::audio;
use specgram::params::SpecgramParameters;
use specgram::shape::Shape;

use std::path::PathBuf;

use hound::{SampleFormat, WavSpec, WavWriter};
use rand::Rng;


fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("specgram-{}-{}.wav", name, std::process::id()))
}

fn write_wav(name: &str, channels: u16, sample_rate: u32, frames: usize) -> PathBuf {
    let path = temp_path(name);
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut rng = rand::thread_rng();
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for _ in 0..(frames * channels as usize) {
        writer.write_sample(rng.gen_range(-8000i16..8000)).unwrap();
    }
    writer.finalize().unwrap();

    path
}

fn shapes_of(path: &PathBuf) -> ([Shape; 3], u32) {
    let signal = audio::load(path).unwrap();
    let samples = signal.samples.mapv(f64::from);

    let mut specgram = SpecgramParameters::default().build::<f64>().unwrap();
    let spectrogram = specgram.process(&samples, signal.sample_rate).unwrap();

    (spectrogram.shapes(), signal.sample_rate)
}


#[test]
fn spectrum_shape_matches_axes() {
    let path = write_wav("axes", 1, 8000, 8000);
    let ([spectrum, freqs, times], _) = shapes_of(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(spectrum.ndim(), 2);
    assert_eq!(freqs.ndim(), 1);
    assert_eq!(times.ndim(), 1);
    assert_eq!(spectrum.dims(), &[freqs.dims()[0], times.dims()[0]]);

    assert_eq!(spectrum.to_string(), "(129, 61)");
    assert_eq!(freqs.to_string(), "(129,)");
    assert_eq!(times.to_string(), "(61,)");
}

#[test]
fn frequency_axis_is_independent_of_duration() {
    let short = write_wav("short", 1, 16000, 2000);
    let long = write_wav("long", 1, 16000, 32000);

    let ([_, freqs_short, times_short], _) = shapes_of(&short);
    let ([_, freqs_long, times_long], _) = shapes_of(&long);

    std::fs::remove_file(&short).unwrap();
    std::fs::remove_file(&long).unwrap();

    assert_eq!(freqs_short, freqs_long);
    assert_eq!(freqs_short.dims(), &[129]);
    assert!(times_long.dims()[0] > times_short.dims()[0]);
}

#[test]
fn stereo_is_downmixed_at_native_rate() {
    let path = write_wav("stereo", 2, 44100, 4410);

    let signal = audio::load(&path).unwrap();
    let ([spectrum, _, _], sample_rate) = shapes_of(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(signal.channels, 2);
    assert_eq!(signal.samples.len(), 4410);
    assert_eq!(sample_rate, 44100);
    assert_eq!(spectrum.dims(), &[129, 33]);
}

#[test]
fn signal_shorter_than_a_segment() {
    let path = write_wav("tiny", 1, 8000, 100);
    let ([spectrum, _, _], _) = shapes_of(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(spectrum.to_string(), "(129, 1)");
}

#[test]
fn non_audio_file_is_rejected() {
    let path = std::env::temp_dir().join(format!("specgram-text-{}.txt", std::process::id()));
    std::fs::write(&path, "this is not audio\n").unwrap();

    let result = audio::load(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(result.is_err());
}

#[test]
fn wave_container_decodes_without_wave_extension() {
    let path = std::env::temp_dir().join(format!("specgram-foreign-ext-{}.bin", std::process::id()));
    let spec = WavSpec {
        channels: 2,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(&path, spec).unwrap();
    for _ in 0..4410 {
        writer.write_sample(16384i16).unwrap();
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();

    let signal = audio::load(&path);
    let ([spectrum, freqs, _], sample_rate) = shapes_of(&path);
    std::fs::remove_file(&path).unwrap();
    let signal = signal.unwrap();

    assert_eq!(signal.channels, 2);
    assert_eq!(signal.sample_rate, 44100);
    assert_eq!(signal.samples.len(), 4410);
    assert!(signal.samples.iter().all(|&x| (x - 0.25).abs() < 1e-6));

    assert_eq!(sample_rate, 44100);
    assert_eq!(freqs.dims(), &[129]);
    assert_eq!(spectrum.dims(), &[129, 33]);
}
