use std::collections::HashMap;
use std::fmt;

use serde::ser::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// MeasurementMap – x → y mapping keyed by float, in insertion order
// ---------------------------------------------------------------------------

/// Float-keyed mapping that remembers the order in which keys were first
/// inserted.
///
/// Keys are compared by bit pattern after folding `-0.0` onto `0.0`. The
/// loader never lets NaN or infinities in, so bitwise equality and numeric
/// equality agree for every key that can reach this map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementMap {
    entries: Vec<(f64, f64)>,
    index: HashMap<u64, usize>,
}

fn key_bits(x: f64) -> u64 {
    if x == 0.0 {
        0.0f64.to_bits()
    } else {
        x.to_bits()
    }
}

impl MeasurementMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, x: f64) -> Option<f64> {
        self.index.get(&key_bits(x)).map(|&i| self.entries[i].1)
    }

    /// Set `x → y`, replacing any previous value but keeping the key's
    /// original position.
    pub fn insert(&mut self, x: f64, y: f64) {
        match self.index.get(&key_bits(x)) {
            Some(&i) => self.entries[i].1 = y,
            None => self.push_new(x, y),
        }
    }

    /// Add `y` onto the value stored at `x`, inserting the key when absent.
    pub fn accumulate(&mut self, x: f64, y: f64) {
        match self.index.get(&key_bits(x)) {
            Some(&i) => self.entries[i].1 += y,
            None => self.push_new(x, y),
        }
    }

    /// Key-wise sum of `other` into `self`. Keys only present in `self` are
    /// left alone.
    pub fn merge(&mut self, other: &MeasurementMap) {
        for &(x, y) in &other.entries {
            self.accumulate(x, y);
        }
    }

    /// Iterate `(x, y)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Flatten into a [`Spectrum`], optionally sorted by ascending x.
    pub fn to_spectrum(&self, sort_by_x: bool) -> Spectrum {
        let mut pairs = self.entries.clone();
        if sort_by_x {
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        }
        Spectrum::from_points(pairs)
    }

    fn push_new(&mut self, x: f64, y: f64) {
        self.index.insert(key_bits(x), self.entries.len());
        self.entries.push((x, y));
    }
}

impl Serialize for MeasurementMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

// ---------------------------------------------------------------------------
// Spectrum – the aggregated intensity vs. energy arrays
// ---------------------------------------------------------------------------

/// Aggregated spectrum. `x` and `y` always have the same length.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Spectrum {
    /// Binding / kinetic energy axis.
    x: Vec<f64>,
    /// Intensity (arbitrary unit).
    y: Vec<f64>,
}

impl Spectrum {
    pub fn from_points<I: IntoIterator<Item = (f64, f64)>>(points: I) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self { x, y }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// x read-only, y writable: the only way to edit intensities in place.
    pub(crate) fn axes_mut(&mut self) -> (&[f64], &mut [f64]) {
        (&self.x, &mut self.y)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `[x, y]` pairs ready to hand to a plotting front end.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.x
            .iter()
            .zip(self.y.iter())
            .map(|(&xi, &yi)| [xi, yi])
            .collect()
    }
}

// ---------------------------------------------------------------------------
// PickedPoint – a user click on the plot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PickedPoint {
    pub x: f64,
    pub y: f64,
}

impl PickedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for PickedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x = {} and y = {}", self.x, self.y)
    }
}
