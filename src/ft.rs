use crate::error::{InvalidParametersSnafu, Result};
use crate::math::NumCastUnchecked;
use crate::shape::Shape;
use crate::window::WindowFunction;

use std::sync::Arc;

use log::{debug, warn};
use ndarray::{s, Array1, Array2, ArrayBase, Axis, Data, Ix1};
use num::{traits::Zero, Complex, Float};
use rustfft::{Fft, FftNum, FftPlanner};
use serde::{Deserialize, Serialize};
use snafu::ensure;


pub fn fftshift<T: Copy + Zero>(input: Array1<T>) -> Array1<T> {
    let mut output = Array1::zeros(input.len());
    output.slice_mut(s![0..input.len()/2]).assign(&input.slice(s![(input.len()+1)/2..]));
    output.slice_mut(s![input.len()/2..]).assign(&input.slice(s![..(input.len()+1)/2]));
    output
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sides {
    /// Non-negative frequencies, with the power of negative ones folded in.
    OneSided,

    /// All frequencies in ascending order.
    ///
    /// Unlike matplotlib's `mlab`, which rolls the FFT output by `P / 2`, the
    /// bins are reordered with a true `fftshift`. Both agree for even FFT
    /// lengths; for odd ones the axis here stays ascending.
    TwoSided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Psd,
    Magnitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detrend {
    None,
    Mean,
    Linear,
}


/// Power spectrogram of a signal.
///
/// `spectrum` is indexed by `[frequency bin, time bin]`, so its dimensions
/// always equal `(freqs.len(), times.len())`.
#[derive(Debug, Clone)]
pub struct Spectrogram<T> {
    pub spectrum: Array2<T>,
    pub freqs: Array1<T>,
    pub times: Array1<T>,

    /// Time between the starts of two consecutive segments, in seconds.
    pub hop: T,

    /// Whether `spectrum` holds power densities or magnitudes.
    pub mode: Mode,
}

impl<T> Spectrogram<T> {
    /// Shapes of spectrum, frequency vector and time vector, in that order.
    pub fn shapes(&self) -> [Shape; 3] {
        [
            Shape::from(self.spectrum.shape()),
            Shape::from(self.freqs.shape()),
            Shape::from(self.times.shape()),
        ]
    }
}


pub struct SpecgramBuilder<T> {
    window: Array1<T>,
    fft_len: usize,
    overlap: usize,
    sides: Sides,
    mode: Mode,
    detrend: Detrend,
    scale_by_freq: bool,
    center_frequency: T,
}

impl<T> SpecgramBuilder<T>
where
    T: FftNum + Float + NumCastUnchecked,
{
    pub fn new<W>(window: &W) -> Self
    where
        W: WindowFunction<T> + ?Sized,
    {
        Self::with_len(window, window.len())
    }

    pub fn with_len<W>(window: &W, fft_len: usize) -> Self
    where
        W: WindowFunction<T> + ?Sized,
    {
        SpecgramBuilder {
            window: window.to_array(),
            fft_len,
            overlap: window.len() / 2,
            sides: Sides::OneSided,
            mode: Mode::Psd,
            detrend: Detrend::None,
            scale_by_freq: true,
            center_frequency: T::zero(),
        }
    }

    pub fn overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn sides(mut self, sides: Sides) -> Self {
        self.sides = sides;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn detrend(mut self, detrend: Detrend) -> Self {
        self.detrend = detrend;
        self
    }

    pub fn scale_by_freq(mut self, scale: bool) -> Self {
        self.scale_by_freq = scale;
        self
    }

    pub fn center_frequency(mut self, fc: T) -> Self {
        self.center_frequency = fc;
        self
    }

    pub fn build(self) -> Result<Specgram<T>> {
        let seg_len = self.window.len();

        ensure!(seg_len > 0, InvalidParametersSnafu {
            reason: "segment length must be positive",
        });
        ensure!(self.overlap < seg_len, InvalidParametersSnafu {
            reason: format!("overlap ({}) must be smaller than the segment length ({})",
                            self.overlap, seg_len),
        });
        ensure!(self.fft_len >= seg_len, InvalidParametersSnafu {
            reason: format!("FFT length ({}) must not be smaller than the segment length ({})",
                            self.fft_len, seg_len),
        });

        debug!("spectrogram: segment {}, overlap {}, fft {}, {:?}, {:?}, detrend {:?}",
               seg_len, self.overlap, self.fft_len, self.sides, self.mode, self.detrend);

        let fft = FftPlanner::<T>::new().plan_fft_forward(self.fft_len);
        let scratch = vec![Complex::zero(); fft.get_inplace_scratch_len()];

        Ok(Specgram {
            window: self.window,
            fft,
            fft_len: self.fft_len,
            overlap: self.overlap,
            sides: self.sides,
            mode: self.mode,
            detrend: self.detrend,
            scale_by_freq: self.scale_by_freq,
            center_frequency: self.center_frequency,
            buffer: vec![Complex::zero(); self.fft_len],
            scratch,
        })
    }
}


pub struct Specgram<T> {
    window: Array1<T>,
    fft: Arc<dyn Fft<T>>,
    fft_len: usize,
    overlap: usize,
    sides: Sides,
    mode: Mode,
    detrend: Detrend,
    scale_by_freq: bool,
    center_frequency: T,
    buffer: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T> Specgram<T>
where
    T: FftNum + Float + NumCastUnchecked,
{
    pub fn segment_len(&self) -> usize {
        self.window.len()
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn fft_len(&self) -> usize {
        self.fft_len
    }

    pub fn step(&self) -> usize {
        self.window.len() - self.overlap
    }

    pub fn num_bins(&self) -> usize {
        match self.sides {
            Sides::OneSided => self.fft_len / 2 + 1,
            Sides::TwoSided => self.fft_len,
        }
    }

    /// Number of segments a signal of `num_samples` samples is split into.
    ///
    /// Signals shorter than one segment are zero-padded, so this is at least
    /// one.
    pub fn num_segments(&self, num_samples: usize) -> usize {
        (num_samples.max(self.segment_len()) - self.overlap) / self.step()
    }

    pub fn spectrum_freqs(&self, sample_rate: T) -> Array1<T> {
        let n = T::from_unchecked(self.fft_len);

        let freqs = match self.sides {
            Sides::OneSided => {
                Array1::from_shape_fn(self.num_bins(), |k| T::from_unchecked(k) * sample_rate / n)
            },
            Sides::TwoSided => {
                let half = (self.fft_len + 1) / 2;
                let freqs = Array1::from_shape_fn(self.fft_len, |k| {
                    if k < half {
                        T::from_unchecked(k) * sample_rate / n
                    } else {
                        -T::from_unchecked(self.fft_len - k) * sample_rate / n
                    }
                });
                fftshift(freqs)
            },
        };

        freqs.mapv_into(|f| f + self.center_frequency)
    }

    pub fn spectrum_times(&self, num_samples: usize, sample_rate: T) -> Array1<T> {
        let center = T::from_unchecked(self.segment_len()) / T::from_unchecked(2.0);
        let step = T::from_unchecked(self.step());

        Array1::from_shape_fn(self.num_segments(num_samples), |i| {
            (center + T::from_unchecked(i) * step) / sample_rate
        })
    }

    pub fn process<D>(&mut self, samples: &ArrayBase<D, Ix1>, sample_rate: u32) -> Result<Spectrogram<T>>
    where
        D: Data<Elem = T>,
    {
        ensure!(sample_rate > 0, InvalidParametersSnafu {
            reason: "sample rate must be positive",
        });

        let seg_len = self.segment_len();
        let step = self.step();
        let fs = T::from_unchecked(sample_rate);

        if samples.len() < seg_len {
            warn!("signal has {} samples, less than one segment ({}), padding with zeros",
                  samples.len(), seg_len);
        }

        let num_segments = self.num_segments(samples.len());
        let num_bins = self.num_bins();
        let scale = self.scale(fs);

        let mut spectrum = Array2::zeros((num_bins, num_segments));
        let mut segment = Array1::zeros(seg_len);

        for (i, mut column) in spectrum.axis_iter_mut(Axis(1)).enumerate() {
            let start = i * step;

            for (j, x) in segment.iter_mut().enumerate() {
                *x = samples.get(start + j).copied().unwrap_or_else(T::zero);
            }
            detrend(&mut segment, self.detrend);

            for (j, b) in self.buffer.iter_mut().enumerate() {
                let x = if j < seg_len { segment[j] * self.window[j] } else { T::zero() };
                *b = Complex::new(x, T::zero());
            }
            self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

            match self.sides {
                Sides::OneSided => {
                    for (k, v) in column.iter_mut().enumerate() {
                        *v = self.bin_value(k, num_bins) * scale;
                    }
                },
                Sides::TwoSided => {
                    let values = Array1::from_shape_fn(num_bins, |k| self.bin_value(k, num_bins) * scale);
                    column.assign(&fftshift(values));
                },
            }
        }

        debug!("spectrogram: {} bins, {} segments", num_bins, num_segments);

        Ok(Spectrogram {
            spectrum,
            freqs: self.spectrum_freqs(fs),
            times: self.spectrum_times(samples.len(), fs),
            hop: T::from_unchecked(step) / fs,
            mode: self.mode,
        })
    }

    // unscaled value of bin k of the current buffer
    fn bin_value(&self, k: usize, num_bins: usize) -> T {
        let x = self.buffer[k];

        match self.mode {
            Mode::Magnitude => x.norm(),
            Mode::Psd => {
                let p = x.norm_sqr();

                // fold negative frequencies into the one-sided spectrum, DC
                // and Nyquist have no negative counterpart
                let folded = self.sides == Sides::OneSided
                    && k > 0
                    && (k < num_bins - 1 || self.fft_len % 2 == 1);

                if folded { p + p } else { p }
            },
        }
    }

    fn scale(&self, fs: T) -> T {
        let sum = self.window.fold(T::zero(), |a, w| a + w.abs());

        match self.mode {
            Mode::Magnitude => T::one() / sum,
            Mode::Psd if self.scale_by_freq => {
                T::one() / (fs * self.window.fold(T::zero(), |a, w| a + *w * *w))
            },
            Mode::Psd => T::one() / (sum * sum),
        }
    }
}


fn detrend<T: Float + NumCastUnchecked>(segment: &mut Array1<T>, detrend: Detrend) {
    let n = segment.len();
    if n == 0 {
        return;
    }

    let mean = segment.fold(T::zero(), |a, x| a + *x) / T::from_unchecked(n);

    match detrend {
        Detrend::None => {},
        Detrend::Mean => {
            segment.mapv_inplace(|x| x - mean);
        },
        Detrend::Linear => {
            let center = T::from_unchecked(n - 1) / T::from_unchecked(2.0);

            let mut cov = T::zero();
            let mut var = T::zero();
            for (i, y) in segment.iter().enumerate() {
                let dx = T::from_unchecked(i) - center;
                cov = cov + dx * (*y - mean);
                var = var + dx * dx;
            }

            let slope = if var > T::zero() { cov / var } else { T::zero() };
            for (i, y) in segment.iter_mut().enumerate() {
                *y = *y - mean - slope * (T::from_unchecked(i) - center);
            }
        },
    }
}
