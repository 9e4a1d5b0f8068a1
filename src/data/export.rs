use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::Spectrum;

#[derive(Serialize)]
struct Row {
    x: f64,
    y: f64,
}

/// Write the spectrum as a two-column CSV file with an `x,y` header.
pub fn write_csv(spectrum: &Spectrum, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for (&x, &y) in spectrum.x().iter().zip(spectrum.y()) {
        writer.serialize(Row { x, y }).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    log::info!("Saved {} points to {}", spectrum.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.csv");
        let sp = Spectrum::from_points([(1.0, 2.5), (2.0, -1.0)]);

        write_csv(&sp, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "x,y\n1.0,2.5\n2.0,-1.0\n");
    }
}
