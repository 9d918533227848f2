use crate::error::{ParamsOpenSnafu, ParamsSnafu, Result};
use crate::ft::{Detrend, Mode, Sides, Specgram, SpecgramBuilder};
use crate::math::NumCastUnchecked;
use crate::window::{self, WindowFunction};

use std::path::Path;

use gnuplot::{Axes2D, AxesCommon};
use num::{traits::FloatConst, Float};
use rustfft::FftNum;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;


#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    #[serde(default)]
    pub specgram: SpecgramParameters,

    #[serde(default)]
    pub display: DisplayParameters,
}

impl Parameters {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = std::fs::File::open(path).context(ParamsOpenSnafu { path })?;
        serde_yaml::from_reader(file).context(ParamsSnafu { path })
    }
}


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpecgramParameters {
    #[serde(default = "param_defaults::nfft")]
    pub nfft: usize,            // segment length, in samples

    #[serde(default = "param_defaults::noverlap")]
    pub noverlap: usize,

    #[serde(default)]
    pub pad_to: Option<usize>,  // FFT length, defaults to nfft

    #[serde(default)]
    pub window: Window,

    #[serde(default = "param_defaults::detrend")]
    pub detrend: Detrend,

    #[serde(default = "param_defaults::sides")]
    pub sides: Sides,

    #[serde(default = "param_defaults::mode")]
    pub mode: Mode,

    #[serde(default = "param_defaults::scale_by_freq")]
    pub scale_by_freq: bool,

    #[serde(default)]
    pub fc: f64,
}

impl Default for SpecgramParameters {
    fn default() -> Self {
        SpecgramParameters {
            nfft: param_defaults::nfft(),
            noverlap: param_defaults::noverlap(),
            pad_to: None,
            window: Window::default(),
            detrend: param_defaults::detrend(),
            sides: param_defaults::sides(),
            mode: param_defaults::mode(),
            scale_by_freq: param_defaults::scale_by_freq(),
            fc: 0.0,
        }
    }
}

impl SpecgramParameters {
    pub fn build<T>(&self) -> Result<Specgram<T>>
    where
        T: FftNum + Float + FloatConst + NumCastUnchecked + 'static,
    {
        let window = create_window::<T>(&self.window, self.nfft);

        SpecgramBuilder::with_len(window.as_ref(), self.pad_to.unwrap_or(self.nfft))
            .overlap(self.noverlap)
            .sides(self.sides)
            .mode(self.mode)
            .detrend(self.detrend)
            .scale_by_freq(self.scale_by_freq)
            .center_frequency(T::from_unchecked(self.fc))
            .build()
    }
}


#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Window {
    #[serde(default, flatten)]
    pub ty: WindowType,

    #[serde(default)]
    pub periodic: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum WindowType {
    Rectangular,
    Triangular { l: usize },
    Bartlett,
    Hann,
    Hamming,
    Blackman,
    Nuttall,
    BlackmanHarris,
    FlatTop,
    Gaussian { sigma: f64 },
    Tukey { alpha: f64 },
}

impl Default for WindowType {
    fn default() -> Self {
        WindowType::Hann
    }
}

pub fn create_window<'a, T>(params: &Window, len: usize) -> Box<dyn WindowFunction<T> + 'a>
where
    T: Float + FloatConst + NumCastUnchecked + 'a,
{
    if params.periodic {
        Box::new(window::periodic(create_window_ty(&params.ty, len + 1)))
    } else {
        create_window_ty(&params.ty, len)
    }
}

fn create_window_ty<'a, T>(ty: &WindowType, len: usize) -> Box<dyn WindowFunction<T> + 'a>
where
    T: Float + FloatConst + NumCastUnchecked + 'a,
{
    match ty {
        WindowType::Rectangular         => Box::new(window::rectangular(len)),
        WindowType::Triangular { l }    => Box::new(window::triangular(len, *l)),
        WindowType::Bartlett            => Box::new(window::bartlett(len)),
        WindowType::Hann                => Box::new(window::hann(len)),
        WindowType::Hamming             => Box::new(window::hamming(len)),
        WindowType::Blackman            => Box::new(window::blackman(len)),
        WindowType::Nuttall             => Box::new(window::nuttall(len)),
        WindowType::BlackmanHarris      => Box::new(window::blackman_harris(len)),
        WindowType::FlatTop             => Box::new(window::flat_top(len)),
        WindowType::Gaussian { sigma }  => Box::new(window::gaussian(len, T::from_unchecked(*sigma))),
        WindowType::Tukey { alpha }     => Box::new(window::tukey(len, T::from_unchecked(*alpha))),
    }
}


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DisplayParameters {
    #[serde(default)]
    pub palette: Palette,

    #[serde(default = "param_defaults::db_floor")]
    pub db_floor: f64,          // lower bound of the color scale, in dB

    #[serde(default)]
    pub title: Option<String>,
}

impl Default for DisplayParameters {
    fn default() -> Self {
        DisplayParameters {
            palette: Palette::default(),
            db_floor: param_defaults::db_floor(),
            title: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Palette {
    Helix,
    Gray,
    Hot,
    Rainbow,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::Helix
    }
}

impl Palette {
    pub fn apply(self, ax: &mut Axes2D) {
        match self {
            Palette::Helix   => ax.set_palette(gnuplot::HELIX),
            Palette::Gray    => ax.set_palette(gnuplot::GRAY),
            Palette::Hot     => ax.set_palette(gnuplot::HOT),
            Palette::Rainbow => ax.set_palette(gnuplot::RAINBOW),
        };
    }
}


mod param_defaults {
    use super::*;

    pub fn nfft() -> usize {
        256
    }

    pub fn noverlap() -> usize {
        128
    }

    pub fn detrend() -> Detrend {
        Detrend::None
    }

    pub fn sides() -> Sides {
        Sides::OneSided
    }

    pub fn mode() -> Mode {
        Mode::Psd
    }

    pub fn scale_by_freq() -> bool {
        true
    }

    pub fn db_floor() -> f64 {
        -200.0
    }
}
