/// Data layer: core types, loading, slicing and export.
///
/// Architecture:
/// ```text
///  folder of .txt files
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  validate each file → merge into MeasurementMap
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Spectrum  │  x / y arrays, sorted by energy unless configured not to
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  slice    │  two picked x values → sub-range for integration
///   └──────────┘
/// ```
pub mod export;
pub mod loader;
pub mod model;
pub mod slice;
