/*!
 * In-memory registry dataset
 *
 * Bundles the three raw collections behind one handle and offers the
 * high-level operations on top of them: building a coverage snapshot,
 * filtering it, querying gaps, and exporting. The dataset stores the raw
 * collections untouched; every derived figure comes from a snapshot build.
 */

use std::path::{Path, PathBuf};

use log::info;

use crate::config::{global_config, MatrixConfig};
use crate::data_types::{
    CityKey, CoverageSnapshot, Hospital, HospitalAddress, SpecialtyOffering,
};
use crate::error::{ExportFormat, MatrixError, Result};
use crate::export::export_matrix;
use crate::gaps::{gap_recommendation, GapRecommendation};
use crate::matrix::build_coverage_matrix;
use crate::reader::RegistryReader;
use crate::view::{apply_filters, CitySort, FilteredView, MatrixFilter};

/// The three registry collections, loaded into memory
#[derive(Debug, Clone, Default)]
pub struct RegistryDataset {
    pub hospitals: Vec<Hospital>,
    pub addresses: Vec<HospitalAddress>,
    pub offerings: Vec<SpecialtyOffering>,
}

impl RegistryDataset {
    /// Wrap already-loaded collections
    pub fn new(
        hospitals: Vec<Hospital>,
        addresses: Vec<HospitalAddress>,
        offerings: Vec<SpecialtyOffering>,
    ) -> Self {
        Self {
            hospitals,
            addresses,
            offerings,
        }
    }

    /// Start building a dataset from CSV extracts
    pub fn builder() -> RegistryDatasetBuilder {
        RegistryDatasetBuilder::new()
    }

    /// Load the three standard extracts from a directory
    ///
    /// Expects `hospitals.csv`, `hospital_addresses.csv` and
    /// `specialty_offerings.csv` under `dir`.
    pub fn load_standard<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        Self::builder()
            .hospitals_path(dir.join(crate::constants::HOSPITALS_FILE))
            .addresses_path(dir.join(crate::constants::ADDRESSES_FILE))
            .offerings_path(dir.join(crate::constants::OFFERINGS_FILE))
            .load()
    }

    /// Build the coverage snapshot using the global configuration
    pub fn coverage_snapshot(&self) -> CoverageSnapshot {
        self.coverage_snapshot_with(&global_config())
    }

    /// Build the coverage snapshot with an explicit configuration
    pub fn coverage_snapshot_with(&self, config: &MatrixConfig) -> CoverageSnapshot {
        build_coverage_matrix(&self.hospitals, &self.addresses, &self.offerings, config)
    }

    /// Build a snapshot and apply filters in one step
    pub fn filtered_view(&self, filter: &MatrixFilter, sort: &CitySort) -> FilteredView {
        apply_filters(&self.coverage_snapshot(), filter, sort)
    }

    /// Recommendation for a coverage gap, using the global gap policy
    pub fn gap_recommendation(&self, city: &CityKey, specialty: &str) -> Result<GapRecommendation> {
        let config = global_config();
        let snapshot = self.coverage_snapshot_with(&config);
        gap_recommendation(&snapshot, city, specialty, &config.gap_policy)
    }

    /// Render the snapshot in the given format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        export_matrix(&self.coverage_snapshot(), format)
    }

    /// Number of records across all three collections
    pub fn record_count(&self) -> usize {
        self.hospitals.len() + self.addresses.len() + self.offerings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

/// Builder for loading a dataset from CSV extracts
pub struct RegistryDatasetBuilder {
    hospitals_path: Option<PathBuf>,
    addresses_path: Option<PathBuf>,
    offerings_path: Option<PathBuf>,
    config: MatrixConfig,
}

impl Default for RegistryDatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryDatasetBuilder {
    pub fn new() -> Self {
        Self {
            hospitals_path: None,
            addresses_path: None,
            offerings_path: None,
            config: global_config(),
        }
    }

    /// Path to the hospital master extract
    pub fn hospitals_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.hospitals_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Path to the hospital address extract
    pub fn addresses_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.addresses_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Path to the specialty offering extract
    pub fn offerings_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.offerings_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Override the configuration used for loading
    pub fn config(mut self, config: MatrixConfig) -> Self {
        self.config = config;
        self
    }

    /// Override skip-invalid behavior for this load only
    pub fn skip_invalid_records(mut self, skip: bool) -> Self {
        self.config.skip_invalid_records = skip;
        self
    }

    /// Override progress bar behavior for this load only
    pub fn show_progress(mut self, show: bool) -> Self {
        self.config.enable_progress_bar = show;
        self
    }

    /// Load all three extracts
    pub fn load(self) -> Result<RegistryDataset> {
        let hospitals_path = self.hospitals_path.ok_or_else(|| MatrixError::Configuration {
            message: "no hospitals extract path set".to_string(),
            suggestion: Some("Call hospitals_path() before load().".to_string()),
        })?;
        let addresses_path = self.addresses_path.ok_or_else(|| MatrixError::Configuration {
            message: "no addresses extract path set".to_string(),
            suggestion: Some("Call addresses_path() before load().".to_string()),
        })?;
        let offerings_path = self.offerings_path.ok_or_else(|| MatrixError::Configuration {
            message: "no offerings extract path set".to_string(),
            suggestion: Some("Call offerings_path() before load().".to_string()),
        })?;

        let reader = RegistryReader::from_config(&self.config);
        let hospitals = reader.load_hospitals(&hospitals_path)?;
        let addresses = reader.load_addresses(&addresses_path)?;
        let offerings = reader.load_offerings(&offerings_path)?;

        info!(
            "loaded {} hospital(s), {} address(es), {} offering(s)",
            hospitals.len(),
            addresses.len(),
            offerings.len()
        );

        Ok(RegistryDataset::new(hospitals, addresses, offerings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::{AddressType, HospitalId};

    fn sample_dataset() -> RegistryDataset {
        RegistryDataset::new(
            vec![Hospital {
                id: HospitalId("H1".to_string()),
                name: "City General".to_string(),
                hospital_type: None,
                beds_operational: Some(80),
            }],
            vec![HospitalAddress {
                hospital_id: HospitalId("H1".to_string()),
                city_town: "Pune".to_string(),
                state: "Maharashtra".to_string(),
                address_type: AddressType::Primary,
            }],
            vec![SpecialtyOffering {
                hospital_id: HospitalId("H1".to_string()),
                specialty_name: "Cardiology".to_string(),
                specialty_category: Some("Medical".to_string()),
                is_available: true,
            }],
        )
    }

    #[test]
    fn test_snapshot_from_dataset() {
        let snapshot = sample_dataset().coverage_snapshot_with(&MatrixConfig::default());
        assert_eq!(snapshot.cities.len(), 1);
        assert_eq!(snapshot.summary.total_cities, 1);
        assert_eq!(snapshot.summary.total_specialties, 1);
        assert_eq!(snapshot.cities[0].hospital_count, 1);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = RegistryDataset::default();
        assert!(dataset.is_empty());
        let snapshot = dataset.coverage_snapshot_with(&MatrixConfig::default());
        assert_eq!(snapshot, CoverageSnapshot::empty());
    }

    #[test]
    fn test_builder_requires_all_paths() {
        let result = RegistryDataset::builder()
            .hospitals_path("/tmp/hospitals.csv")
            .load();
        assert!(matches!(result, Err(MatrixError::Configuration { .. })));
    }
}
