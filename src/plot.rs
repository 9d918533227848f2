use crate::error::{PlotSnafu, Result};
use crate::ft::{Mode, Spectrogram};
use crate::math::{NumCastUnchecked, ToPrimitiveUnchecked};
use crate::params::DisplayParameters;

use gnuplot::{AutoOption, AxesCommon, Figure};
use log::info;
use ndarray::Array2;
use num::Float;
use snafu::ResultExt;


pub fn power_to_db<F: Float + NumCastUnchecked>(p: F, floor: F) -> F {
    F::max(F::from_unchecked(10.0) * F::log10(p), floor)
}

pub fn magnitude_to_db<F: Float + NumCastUnchecked>(m: F, floor: F) -> F {
    F::max(F::from_unchecked(20.0) * F::log10(m), floor)
}

/// Image bounds as `(t0, f0, t1, f1)`.
///
/// Every segment is drawn one hop wide and centered on its time, the
/// frequency axis spans the first to the last bin.
pub fn extent<T>(spectrogram: &Spectrogram<T>) -> (f64, f64, f64, f64)
where
    T: Float + ToPrimitiveUnchecked,
{
    let pad = spectrogram.hop.to_f64_unchecked() / 2.0;

    let first = |v: &ndarray::Array1<T>| v.first().map(|x| x.to_f64_unchecked()).unwrap_or(0.0);
    let last = |v: &ndarray::Array1<T>| v.last().map(|x| x.to_f64_unchecked()).unwrap_or(0.0);

    let t0 = first(&spectrogram.times) - pad;
    let t1 = last(&spectrogram.times) + pad;
    let f0 = first(&spectrogram.freqs);
    let f1 = last(&spectrogram.freqs);

    (t0, f0, t1, f1)
}

/// Spectrum in dB, as plotted.
pub fn to_visual<T>(spectrogram: &Spectrogram<T>, db_floor: f64) -> Array2<f64>
where
    T: Float + ToPrimitiveUnchecked,
{
    let to_db = match spectrogram.mode {
        Mode::Psd       => power_to_db::<f64>,
        Mode::Magnitude => magnitude_to_db::<f64>,
    };

    spectrogram.spectrum.mapv(|v| to_db(v.to_f64_unchecked(), db_floor))
}

/// Shows the spectrogram and blocks until its window has been closed.
pub fn show<T>(spectrogram: &Spectrogram<T>, params: &DisplayParameters) -> Result<()>
where
    T: Float + ToPrimitiveUnchecked,
{
    let (t0, f0, t1, f1) = extent(spectrogram);
    let visual = to_visual(spectrogram, params.db_floor);

    let mut fig = Figure::new();
    fig.set_post_commands("pause mouse close");

    let ax = fig.axes2d();
    params.palette.apply(ax);
    if let Some(title) = &params.title {
        ax.set_title(title, &[]);
    }
    ax.set_x_label("Time [s]", &[]);
    ax.set_y_label("Frequency [Hz]", &[]);
    ax.set_x_range(AutoOption::Fix(t0), AutoOption::Fix(t1));
    ax.set_y_range(AutoOption::Fix(f0), AutoOption::Fix(f1));
    ax.image(visual.iter(), visual.nrows(), visual.ncols(), Some((t0, f0, t1, f1)), &[]);

    fig.show().context(PlotSnafu)?;
    info!("waiting for the plot window to be closed");
    fig.close();

    Ok(())
}
