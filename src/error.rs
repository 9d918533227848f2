use std::path::PathBuf;

use snafu::Snafu;


#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("unable to open '{}': {}", path.display(), source))]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("unable to read wave file '{}': {}", path.display(), source))]
    Wav {
        path: PathBuf,
        source: hound::Error,
    },

    #[snafu(display("unable to decode '{}': {}", path.display(), source))]
    Decode {
        path: PathBuf,
        source: symphonia::core::errors::Error,
    },

    #[snafu(display("no audio track found in '{}'", path.display()))]
    NoAudioTrack {
        path: PathBuf,
    },

    #[snafu(display("sample rate of '{}' is unknown", path.display()))]
    UnknownSampleRate {
        path: PathBuf,
    },

    #[snafu(display("invalid spectrogram parameters: {}", reason))]
    InvalidParameters {
        reason: String,
    },

    #[snafu(display("unable to open parameter file '{}': {}", path.display(), source))]
    ParamsOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("invalid parameter file '{}': {}", path.display(), source))]
    Params {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[snafu(display("unable to show plot: {}", source))]
    Plot {
        source: gnuplot::GnuplotInitError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
