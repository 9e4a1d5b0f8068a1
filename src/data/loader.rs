use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use super::model::MeasurementMap;
use crate::error::{AnalysisError, AnalysisResult};

// ---------------------------------------------------------------------------
// Aggregation report
// ---------------------------------------------------------------------------

/// A file that was rejected during import and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokenFile {
    pub name: String,
    pub reason: String,
}

/// Outcome of importing one folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationReport {
    /// Files with a matching extension whose content failed validation.
    pub broken_files: Vec<BrokenFile>,
    /// Files skipped because of their extension.
    pub wrong_extension_files: Vec<String>,
    /// Files whose rows were all merged.
    pub accepted_files: Vec<String>,
    /// x → summed y over all accepted files, in first-seen order.
    pub measurements: MeasurementMap,
}

impl AggregationReport {
    /// Every skipped or rejected file as a user-facing error, in the order
    /// wrong-extension files first, then broken files.
    pub fn problems(&self) -> Vec<AnalysisError> {
        let skipped = self
            .wrong_extension_files
            .iter()
            .map(|file| AnalysisError::WrongExtension { file: file.clone() });
        let broken = self.broken_files.iter().map(|b| AnalysisError::CorruptedFile {
            file: b.name.clone(),
            reason: b.reason.clone(),
        });
        skipped.chain(broken).collect()
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// List the entry names of a folder, sorted so repeated imports of the same
/// folder merge files in the same order.
pub fn list_folder(folder: &Path) -> AnalysisResult<Vec<String>> {
    let unavailable = |e: std::io::Error| AnalysisError::FolderUnavailable {
        path: folder.to_path_buf(),
        reason: e.to_string(),
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(unavailable)? {
        let entry = entry.map_err(unavailable)?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Validate every file in `file_names` (relative to `folder`) and sum the
/// accepted ones into a single mapping.
///
/// A file is merged only if every one of its rows is valid; one bad row and
/// the whole file goes to `broken_files`.
pub fn aggregate<S: AsRef<str>>(file_names: &[S], folder: &Path, extension: &str) -> AggregationReport {
    let mut report = AggregationReport::default();

    for name in file_names {
        let name = name.as_ref();
        if !has_extension(name, extension) {
            log::warn!("Skipping {name}: wrong file extension");
            report.wrong_extension_files.push(name.to_string());
            continue;
        }

        let record = std::fs::read_to_string(folder.join(name))
            .with_context(|| format!("reading {name}"))
            .and_then(|text| parse_measurements(&text));

        match record {
            Ok(record) => {
                log::debug!("Accepted {name} with {} rows", record.len());
                if report.measurements.is_empty() {
                    report.measurements = record;
                } else {
                    report.measurements.merge(&record);
                }
                report.accepted_files.push(name.to_string());
            }
            Err(e) => {
                log::warn!("Rejecting {name}: {e:#}");
                report.broken_files.push(BrokenFile {
                    name: name.to_string(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    log::info!(
        "Aggregated {} files ({} broken, {} skipped) into {} points",
        report.accepted_files.len(),
        report.broken_files.len(),
        report.wrong_extension_files.len(),
        report.measurements.len()
    );
    report
}

// ---------------------------------------------------------------------------
// Per-file parsing
// ---------------------------------------------------------------------------

fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == extension)
}

/// Parse one measurement file: every line is `<x> <y>`.
///
/// Repeated x values inside a single file overwrite each other. The error
/// names the first offending row (1-based). A file without any rows is an
/// error as well, so empty files are listed as broken instead of being
/// silently dropped.
pub fn parse_measurements(text: &str) -> Result<MeasurementMap> {
    let mut record = MeasurementMap::new();

    for (row_no, line) in text.lines().enumerate() {
        let row = row_no + 1;
        let mut tokens = line.split_whitespace();
        let (Some(x_tok), Some(y_tok), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            bail!("Row {row} does not consist of two parts");
        };

        let x = parse_value(x_tok).with_context(|| format!("Row {row}: values are not numbers"))?;
        let y = parse_value(y_tok).with_context(|| format!("Row {row}: values are not numbers"))?;
        record.insert(x, y);
    }

    if record.is_empty() {
        bail!("no data rows");
    }
    Ok(record)
}

fn parse_value(tok: &str) -> Option<f64> {
    tok.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn parses_whitespace_separated_rows() {
        let record = parse_measurements("1.0 2.0\n2.0\t3.5\n  3.0   4.0  \n").unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get(2.0), Some(3.5));
    }

    #[test]
    fn one_bad_row_rejects_the_file() {
        let err = parse_measurements("1.0 2.0\nbad row\n").unwrap_err();
        assert_eq!(err.to_string(), "Row 2: values are not numbers");
        let err = parse_measurements("1.0 2.0\n3.0\n").unwrap_err();
        assert_eq!(err.to_string(), "Row 2 does not consist of two parts");

        assert!(parse_measurements("1.0 2.0 3.0\n").is_err());
        assert!(parse_measurements("1.0 abc\n").is_err());
        assert!(parse_measurements("1.0 NaN\n").is_err());
        assert!(parse_measurements("1.0 2.0\n\n3.0 4.0\n").is_err());
        assert!(parse_measurements("").is_err());
    }

    #[test]
    fn aggregates_and_reports_every_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "1.0 5.0\n2.0 1.0\n");
        write(dir.path(), "b.txt", "1.0 3.0\n4.0 2.0\n");
        write(dir.path(), "broken.txt", "1.0 2.0\nbad row\n");
        write(dir.path(), "notes.csv", "1.0,2.0\n");

        let names = list_folder(dir.path()).unwrap();
        assert_eq!(names, vec!["a.txt", "b.txt", "broken.txt", "notes.csv"]);

        let report = aggregate(&names, dir.path(), "txt");
        assert_eq!(report.accepted_files, vec!["a.txt", "b.txt"]);
        assert_eq!(report.wrong_extension_files, vec!["notes.csv"]);
        assert_eq!(report.broken_files.len(), 1);
        assert_eq!(report.broken_files[0].name, "broken.txt");

        let pairs: Vec<_> = report.measurements.iter().collect();
        assert_eq!(pairs, vec![(1.0, 8.0), (2.0, 1.0), (4.0, 2.0)]);
        assert_eq!(report.problems().len(), 2);
    }

    #[test]
    fn broken_file_contributes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.txt", "1.0 2.0\nbad row\n");
        write(dir.path(), "good.txt", "7.0 1.0\n");

        let report = aggregate(&["bad.txt", "good.txt"], dir.path(), "txt");
        assert_eq!(report.measurements.get(1.0), None);
        assert_eq!(report.measurements.len(), 1);
    }

    #[test]
    fn unreadable_file_is_broken() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.txt")).unwrap();

        let report = aggregate(&["folder.txt", "missing.txt"], dir.path(), "txt");
        assert_eq!(report.broken_files.len(), 2);
        assert!(report.broken_files[1].reason.starts_with("reading missing.txt: "));
        assert!(report.accepted_files.is_empty());
    }

    #[test]
    fn extension_match_is_exact() {
        assert!(has_extension("scan.txt", "txt"));
        assert!(!has_extension("scan.TXT", "txt"));
        assert!(!has_extension("scan", "txt"));
        assert!(!has_extension("scan.txt.bak", "txt"));
    }

    #[test]
    fn missing_folder_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_folder(&dir.path().join("gone")).unwrap_err();
        assert!(matches!(err, AnalysisError::FolderUnavailable { .. }));
    }
}
