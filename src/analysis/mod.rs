//! Numerical operations on a spectrum: peak area and linear background removal.

pub mod background;
pub mod integrate;
