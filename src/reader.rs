/*!
 * CSV reader for registry extracts
 *
 * Reads the three registry collections from CSV files with header
 * validation, skip-invalid handling, and optional progress reporting.
 * Columns are resolved by name so the reader tolerates extra columns and
 * reordered extracts.
 */

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::debug;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::MatrixConfig;
use crate::data_types::{AddressType, Hospital, HospitalAddress, HospitalId, SpecialtyOffering};
use crate::error::{MatrixError, Result};
use crate::schema::{column_index, AddressSchema, HospitalSchema, SpecialtySchema};

/// Registry extract reader
pub struct RegistryReader {
    /// Whether to validate CSV headers against the expected extract schema
    validate_headers: bool,
    /// Whether to skip invalid records (true) or fail on first error (false)
    skip_invalid_records: bool,
    /// Whether to show a progress bar while loading
    #[cfg(feature = "progress")]
    show_progress_bar: bool,
}

impl Default for RegistryReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryReader {
    /// Create a new reader with default settings
    pub fn new() -> Self {
        Self {
            validate_headers: true,
            skip_invalid_records: true,
            #[cfg(feature = "progress")]
            show_progress_bar: true,
        }
    }

    /// Create a reader honoring a configuration
    pub fn from_config(config: &MatrixConfig) -> Self {
        Self {
            validate_headers: config.validate_headers,
            skip_invalid_records: config.skip_invalid_records,
            #[cfg(feature = "progress")]
            show_progress_bar: config.enable_progress_bar,
        }
    }

    /// Enable or disable header validation
    pub fn with_header_validation(mut self, validate: bool) -> Self {
        self.validate_headers = validate;
        self
    }

    /// Enable or disable skipping invalid records
    pub fn with_skip_invalid_records(mut self, skip: bool) -> Self {
        self.skip_invalid_records = skip;
        self
    }

    #[cfg(feature = "progress")]
    /// Enable or disable the progress bar
    pub fn with_progress_bar(mut self, show: bool) -> Self {
        self.show_progress_bar = show;
        self
    }

    /// Load the hospital master extract
    pub fn load_hospitals<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Hospital>> {
        let (mut reader, headers) = self.open(path.as_ref())?;
        if self.validate_headers {
            HospitalSchema::validate_headers(&headers)?;
        }

        let id_idx = column_index(&headers, "id");
        let name_idx = column_index(&headers, "name");
        let type_idx = column_index(&headers, "hospital_type");
        let beds_idx = column_index(&headers, "beds_operational");

        let progress = self.progress_bar("Loading hospitals");
        let mut hospitals = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line() as usize);

            let id = field(&record, id_idx).unwrap_or("");
            let name = field(&record, name_idx).unwrap_or("");
            if id.trim().is_empty() || name.is_empty() {
                if self.skip_invalid_records {
                    skipped += 1;
                    continue;
                }
                return Err(MatrixError::MalformedRecord {
                    message: "hospital record missing id or name".to_string(),
                    field: Some(if id.trim().is_empty() { "id" } else { "name" }.to_string()),
                    line,
                });
            }

            let beds_operational = field(&record, beds_idx)
                .filter(|v| !v.is_empty())
                .and_then(|v| v.parse::<u32>().ok());

            hospitals.push(Hospital {
                id: HospitalId(id.to_string()),
                name: name.to_string(),
                hospital_type: field(&record, type_idx)
                    .filter(|v| !v.is_empty())
                    .map(String::from),
                beds_operational,
            });
            tick(&progress, hospitals.len());
        }

        finish(progress);
        if skipped > 0 {
            debug!("skipped {} invalid hospital record(s)", skipped);
        }
        Ok(hospitals)
    }

    /// Load the hospital address extract
    pub fn load_addresses<P: AsRef<Path>>(&self, path: P) -> Result<Vec<HospitalAddress>> {
        let (mut reader, headers) = self.open(path.as_ref())?;
        if self.validate_headers {
            AddressSchema::validate_headers(&headers)?;
        }

        let id_idx = column_index(&headers, "hospital_id");
        let city_idx = column_index(&headers, "city_town");
        let state_idx = column_index(&headers, "state");
        let type_idx = column_index(&headers, "address_type");

        let progress = self.progress_bar("Loading addresses");
        let mut addresses = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line() as usize);

            let hospital_id = field(&record, id_idx).unwrap_or("");
            let city = field(&record, city_idx).unwrap_or("");
            let state = field(&record, state_idx).unwrap_or("");
            if hospital_id.trim().is_empty() || city.is_empty() || state.is_empty() {
                if self.skip_invalid_records {
                    skipped += 1;
                    continue;
                }
                return Err(MatrixError::MalformedRecord {
                    message: "address record missing hospital id or city/state".to_string(),
                    field: None,
                    line,
                });
            }

            addresses.push(HospitalAddress {
                hospital_id: HospitalId(hospital_id.to_string()),
                city_town: city.to_string(),
                state: state.to_string(),
                address_type: AddressType::from_code(field(&record, type_idx).unwrap_or("")),
            });
            tick(&progress, addresses.len());
        }

        finish(progress);
        if skipped > 0 {
            debug!("skipped {} invalid address record(s)", skipped);
        }
        Ok(addresses)
    }

    /// Load the specialty offering extract
    pub fn load_offerings<P: AsRef<Path>>(&self, path: P) -> Result<Vec<SpecialtyOffering>> {
        let (mut reader, headers) = self.open(path.as_ref())?;
        if self.validate_headers {
            SpecialtySchema::validate_headers(&headers)?;
        }

        let id_idx = column_index(&headers, "hospital_id");
        let name_idx = column_index(&headers, "specialty_name");
        let category_idx = column_index(&headers, "specialty_category");
        let available_idx = column_index(&headers, "is_available");

        let progress = self.progress_bar("Loading specialty offerings");
        let mut offerings = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line() as usize);

            let hospital_id = field(&record, id_idx).unwrap_or("");
            let specialty_name = field(&record, name_idx).unwrap_or("");
            if hospital_id.trim().is_empty() || specialty_name.is_empty() {
                if self.skip_invalid_records {
                    skipped += 1;
                    continue;
                }
                return Err(MatrixError::MalformedRecord {
                    message: "offering record missing hospital id or specialty name".to_string(),
                    field: None,
                    line,
                });
            }

            offerings.push(SpecialtyOffering {
                hospital_id: HospitalId(hospital_id.to_string()),
                specialty_name: specialty_name.to_string(),
                specialty_category: field(&record, category_idx)
                    .filter(|v| !v.is_empty())
                    .map(String::from),
                is_available: parse_bool(field(&record, available_idx).unwrap_or("")),
            });
            tick(&progress, offerings.len());
        }

        finish(progress);
        if skipped > 0 {
            debug!("skipped {} invalid offering record(s)", skipped);
        }
        Ok(offerings)
    }

    fn open(&self, path: &Path) -> Result<(csv::Reader<File>, Vec<String>)> {
        if !path.exists() {
            return Err(MatrixError::file_not_found_with_suggestion(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        Ok((reader, headers))
    }

    #[cfg(feature = "progress")]
    fn progress_bar(&self, message: &'static str) -> Option<ProgressBar> {
        if !self.show_progress_bar {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap(),
        );
        pb.set_message(message);
        Some(pb)
    }

    #[cfg(not(feature = "progress"))]
    fn progress_bar(&self, _message: &'static str) -> Option<()> {
        None
    }
}

fn field<'r>(record: &'r StringRecord, idx: Option<usize>) -> Option<&'r str> {
    idx.and_then(|i| record.get(i)).map(str::trim)
}

/// Registry exports serve booleans as "true"/"false", older dumps as "1"/"0"
fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "t")
}

#[cfg(feature = "progress")]
fn tick(progress: &Option<ProgressBar>, count: usize) {
    if let Some(pb) = progress {
        if count % 1000 == 0 {
            pb.set_message(format!("{} records", count));
        }
        pb.tick();
    }
}

#[cfg(not(feature = "progress"))]
fn tick(_progress: &Option<()>, _count: usize) {}

#[cfg(feature = "progress")]
fn finish(progress: Option<ProgressBar>) {
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
}

#[cfg(not(feature = "progress"))]
fn finish(_progress: Option<()>) {}
