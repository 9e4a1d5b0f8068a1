use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// AnalysisError – every failure the pipeline can report to the user
// ---------------------------------------------------------------------------

/// Failures raised by the aggregation and analysis pipeline.
///
/// The `Display` text of each variant is what ends up in the status log, so
/// the wording is aimed at the person clicking through the workflow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("File {file} was skipped: wrong file extension")]
    WrongExtension { file: String },

    #[error("Corrupted file '{file}' was skipped: {reason}")]
    CorruptedFile { file: String, reason: String },

    #[error("Failed to open folder {}: {reason}", .path.display())]
    FolderUnavailable { path: PathBuf, reason: String },

    #[error("Did not find last two selected datapoints, please select two datapoints")]
    InsufficientPoints,

    #[error("Selected points are outside of the measured range")]
    OutOfRange,

    #[error("No data selected, please import data")]
    EmptySpectrum,

    #[error("Not enough datapoints between the selected points to integrate")]
    InsufficientSamples,

    #[error("You clicked the same point twice - unable to calculate")]
    IdenticalPoints,

    #[error("The equation is vertical, unable to calculate")]
    VerticalLine,

    #[error("The selected points are too far apart to calculate an equation")]
    UndefinedLine,

    #[error("Clicked coordinates x = {x} and y = {y} are not finite numbers")]
    InvalidPoint { x: f64, y: f64 },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
