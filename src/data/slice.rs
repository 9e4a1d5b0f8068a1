use super::model::Spectrum;
use crate::error::{AnalysisError, AnalysisResult};

// ---------------------------------------------------------------------------
// Range slicing between two picked x positions
// ---------------------------------------------------------------------------

/// Borrowed sub-range of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumSlice<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
}

impl SpectrumSlice<'_> {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Cut out the samples between two x positions, in either order.
///
/// A single pass over the stored x values finds
/// * `start`: the first index whose x is `>=` the lower bound
/// * `stop`:  the first index whose x is `>=` the upper bound
///
/// and the half-open range `[start, stop)` is returned. The scan follows the
/// stored order, so the result is a true value range only for an ascending
/// spectrum.
pub fn slice_between(spectrum: &Spectrum, x_a: f64, x_b: f64) -> AnalysisResult<SpectrumSlice<'_>> {
    if spectrum.is_empty() {
        return Err(AnalysisError::EmptySpectrum);
    }
    let (lower, upper) = if x_a > x_b { (x_b, x_a) } else { (x_a, x_b) };

    let mut start = None;
    let mut stop = None;
    for (i, &value) in spectrum.x().iter().enumerate() {
        if start.is_none() && lower <= value {
            start = Some(i);
        }
        if upper <= value {
            stop = Some(i);
            break;
        }
    }

    let (Some(start), Some(stop)) = (start, stop) else {
        return Err(AnalysisError::OutOfRange);
    };
    log::debug!("Slicing [{lower}, {upper}) → indices [{start}, {stop})");

    Ok(SpectrumSlice {
        x: &spectrum.x()[start..stop],
        y: &spectrum.y()[start..stop],
    })
}
