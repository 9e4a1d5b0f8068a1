use crate::error::{AnalysisError, AnalysisResult};

/// Definite integral of `y(x)` by the composite trapezoidal rule.
///
/// `x` is used as given; a segment where x decreases contributes negative
/// area. At least two samples are required.
pub fn trapezoid(x: &[f64], y: &[f64]) -> AnalysisResult<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(AnalysisError::InsufficientSamples);
    }

    let area: f64 = (1..n)
        .map(|i| (x[i] - x[i - 1]) * (y[i] + y[i - 1]) / 2.0)
        .sum();
    Ok(area)
}
