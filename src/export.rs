/*!
 * Snapshot export
 *
 * Renders a coverage snapshot to JSON (a self-describing envelope with the
 * summary, derived lists, and populated cells) or CSV (the matrix as a grid,
 * one row per city, one column per specialty, gaps rendered as 0).
 */

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data_types::{CityCoverage, CoverageSnapshot, CoverageSummary, MatrixCell, SpecialtyCoverage};
use crate::error::{ExportFormat, MatrixError, Result};

/// A renderer for one export format
pub trait MatrixExporter {
    /// Render the snapshot to a string in this exporter's format
    fn render(&self, snapshot: &CoverageSnapshot) -> Result<String>;

    /// The format this exporter produces
    fn format(&self) -> ExportFormat;

    /// Render and write to a file
    fn export_to_path<P: AsRef<Path>>(&self, snapshot: &CoverageSnapshot, path: P) -> Result<()> {
        let rendered = self.render(snapshot)?;
        std::fs::write(path, rendered)?;
        Ok(())
    }
}

/// JSON export envelope
///
/// Cells are exported as a list rather than a map: `(city, specialty)` pair
/// keys do not survive as JSON object keys.
#[derive(Serialize)]
struct JsonEnvelope<'a> {
    generated_at: DateTime<Utc>,
    summary: &'a CoverageSummary,
    cities: &'a [CityCoverage],
    specialties: &'a [SpecialtyCoverage],
    cells: Vec<&'a MatrixCell>,
}

/// Exports the snapshot as a JSON envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl MatrixExporter for JsonExporter {
    fn render(&self, snapshot: &CoverageSnapshot) -> Result<String> {
        let envelope = JsonEnvelope {
            generated_at: Utc::now(),
            summary: &snapshot.summary,
            cities: &snapshot.cities,
            specialties: &snapshot.specialties,
            cells: snapshot.matrix.values().collect(),
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }
}

/// Exports the matrix as a CSV grid
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl MatrixExporter for CsvExporter {
    fn render(&self, snapshot: &CoverageSnapshot) -> Result<String> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

        let mut header = vec!["City".to_string(), "State".to_string()];
        header.extend(snapshot.specialties.iter().map(|s| s.name.clone()));
        writer.write_record(&header)?;

        for city in &snapshot.cities {
            let mut row = vec![city.name.clone(), city.state.clone()];
            for specialty in &snapshot.specialties {
                let count = snapshot
                    .cell(&city.key, &specialty.name)
                    .map(|cell| cell.count)
                    .unwrap_or(0);
                row.push(count.to_string());
            }
            writer.write_record(&row)?;
        }

        let bytes = writer.into_inner().map_err(|e| MatrixError::Export {
            message: e.to_string(),
            format: ExportFormat::Csv,
            suggestion: None,
        })?;
        String::from_utf8(bytes).map_err(|e| MatrixError::Export {
            message: format!("rendered CSV is not valid UTF-8: {}", e),
            format: ExportFormat::Csv,
            suggestion: None,
        })
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }
}

/// Render a snapshot in the requested format
pub fn export_matrix(snapshot: &CoverageSnapshot, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => JsonExporter.render(snapshot),
        ExportFormat::Csv => CsvExporter.render(snapshot),
    }
}
