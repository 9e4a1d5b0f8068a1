use std::fmt;

use serde::Serialize;

use crate::data::model::{PickedPoint, Spectrum};
use crate::error::{AnalysisError, AnalysisResult};

// ---------------------------------------------------------------------------
// Line through two picked points
// ---------------------------------------------------------------------------

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineEquation {
    pub slope: f64,
    pub intercept: f64,
}

impl LineEquation {
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

impl fmt::Display for LineEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {}x + {}", self.slope, self.intercept)
    }
}

/// Outcome of fitting a line through two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineFit {
    Computed(LineEquation),
    IdenticalPoints,
    VerticalLine,
}

impl LineFit {
    pub fn through(p1: PickedPoint, p2: PickedPoint) -> Self {
        let PickedPoint { x: x1, y: y1 } = p1;
        let PickedPoint { x: x2, y: y2 } = p2;

        if x1 == x2 {
            return if y1 == y2 {
                LineFit::IdenticalPoints
            } else {
                LineFit::VerticalLine
            };
        }

        let slope = if y1 == y2 { 0.0 } else { (y2 - y1) / (x2 - x1) };
        let intercept = (x2 * y1 - x1 * y2) / (x2 - x1);
        LineFit::Computed(LineEquation { slope, intercept })
    }

    /// A computed line whose slope or intercept overflowed is rejected too.
    pub fn into_result(self) -> AnalysisResult<LineEquation> {
        match self {
            LineFit::Computed(eq) if eq.slope.is_finite() && eq.intercept.is_finite() => Ok(eq),
            LineFit::Computed(_) => Err(AnalysisError::UndefinedLine),
            LineFit::IdenticalPoints => Err(AnalysisError::IdenticalPoints),
            LineFit::VerticalLine => Err(AnalysisError::VerticalLine),
        }
    }
}

// ---------------------------------------------------------------------------
// Background subtraction
// ---------------------------------------------------------------------------

/// Subtract the line from every intensity value, in place.
pub fn subtract_line(spectrum: &mut Spectrum, line: &LineEquation) -> AnalysisResult<()> {
    if spectrum.is_empty() {
        return Err(AnalysisError::EmptySpectrum);
    }

    let (xs, ys) = spectrum.axes_mut();
    for (y, &x) in ys.iter_mut().zip(xs) {
        *y -= line.eval(x);
    }
    log::debug!("Subtracted {line} from {} points", spectrum.len());
    Ok(())
}
