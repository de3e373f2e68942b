/*!
 * Error handling for coverage matrix operations
 *
 * Provides detailed error types with context, suggestions, and recovery guidance.
 * The engine itself never fails: malformed records and dangling references are
 * dropped during normalization. These errors belong to the I/O shell around it
 * (reader, export, config, fetch) and to gap queries on covered cells.
 */

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use serde::{Serialize, Deserialize};

/// Coverage matrix library result type
pub type Result<T> = std::result::Result<T, MatrixError>;

/// Error types with context and suggestions
#[derive(Error, Debug)]
pub enum MatrixError {
    /// File I/O errors with context
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing errors with location information
    #[error("CSV parsing error at line {line:?}: {message}")]
    CsvParse {
        message: String,
        line: Option<usize>,
    },

    /// A record failed validation and skip-invalid mode is off
    #[error("Malformed record: {message}")]
    MalformedRecord {
        message: String,
        field: Option<String>,
        line: Option<usize>,
    },

    /// File not found with suggestions
    #[error("File not found: {path}")]
    FileNotFound {
        path: PathBuf,
        suggestion: String,
    },

    /// Invalid hospital identifier
    #[error("Invalid hospital id '{id}': {reason}")]
    InvalidHospitalId {
        id: String,
        reason: String,
    },

    /// CSV header row does not match the expected registry extract schema
    #[error("Schema mismatch: {message}")]
    SchemaMismatch {
        message: String,
        missing_columns: Vec<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        suggestion: Option<String>,
    },

    /// Export errors
    #[error("Export error: {message}")]
    Export {
        message: String,
        format: ExportFormat,
        suggestion: Option<String>,
    },

    /// Gap query against an unknown city
    #[error("Unknown city '{key}'")]
    UnknownCity {
        key: String,
    },

    /// Gap query against an unknown specialty
    #[error("Unknown specialty '{name}'")]
    UnknownSpecialty {
        name: String,
    },

    /// Gap recommendation requested for a pair that already has coverage
    #[error("'{specialty}' is already offered in {city} by {count} hospital(s)")]
    CoverageExists {
        city: String,
        specialty: String,
        count: usize,
    },

    /// Registry fetch errors
    #[error("Fetch error: {message}")]
    Fetch {
        message: String,
        suggestion: Option<String>,
    },

    /// Generic errors with custom message
    #[error("{message}")]
    Custom {
        message: String,
        suggestion: Option<String>,
    },
}

/// Export format for the matrix renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl MatrixError {
    /// Create a file not found error with helpful suggestion
    pub fn file_not_found_with_suggestion(path: PathBuf) -> Self {
        let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        let suggestion = if name.contains("hospital") || name.contains("address") || name.contains("specialt") {
            format!(
                "Check if the registry extract exists at '{}'. Standard extracts are named \
                'hospitals.csv', 'hospital_addresses.csv', and 'specialty_offerings.csv'.",
                path.display()
            )
        } else {
            format!(
                "Check if the file exists at '{}'. Make sure the path is correct and you have read permissions.",
                path.display()
            )
        };

        Self::FileNotFound { path, suggestion }
    }

    /// Create an invalid hospital id error with validation details
    pub fn invalid_hospital_id(id: &str) -> Self {
        let reason = if id.is_empty() {
            "hospital id cannot be empty".to_string()
        } else {
            "hospital id must not be blank".to_string()
        };

        Self::InvalidHospitalId {
            id: id.to_string(),
            reason,
        }
    }

    /// Create a schema mismatch error listing the columns that were not found
    pub fn schema_mismatch(extract: &str, missing: Vec<String>) -> Self {
        Self::SchemaMismatch {
            message: format!(
                "{} extract is missing required column(s): {}",
                extract,
                missing.join(", ")
            ),
            missing_columns: missing,
        }
    }

    /// Create an error for a gap query on a covered cell
    pub fn coverage_exists(city: &str, specialty: &str, count: usize) -> Self {
        Self::CoverageExists {
            city: city.to_string(),
            specialty: specialty.to_string(),
            count,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::FileNotFound { suggestion, .. } => {
                format!("{}\n\nSuggestion: {}", self, suggestion)
            }
            Self::SchemaMismatch { missing_columns, .. } => {
                format!("{}\n\nExpected columns: {}", self, missing_columns.join(", "))
            }
            Self::CoverageExists { .. } => {
                format!("{}\n\nGap recommendations only apply to city/specialty pairs with no coverage.", self)
            }
            Self::Configuration { suggestion: Some(sug), .. }
            | Self::Export { suggestion: Some(sug), .. }
            | Self::Fetch { suggestion: Some(sug), .. }
            | Self::Custom { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            _ => self.to_string(),
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for MatrixError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<csv::Error> for MatrixError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line() as usize);

        Self::CsvParse {
            message: err.to_string(),
            line,
        }
    }
}

impl From<serde_json::Error> for MatrixError {
    fn from(err: serde_json::Error) -> Self {
        MatrixError::Export {
            message: err.to_string(),
            format: ExportFormat::Json,
            suggestion: Some("Check if the data is serializable to JSON.".to_string()),
        }
    }
}
