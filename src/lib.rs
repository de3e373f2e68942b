/*!
 * # Specialty Coverage Matrix Engine
 *
 * A Rust library for computing a city-by-specialty healthcare coverage
 * matrix from hospital registry extracts.
 *
 * ## Features
 *
 * - 🏥 **Registry Joins**: Hospitals, addresses and specialty offerings joined
 *   into one coverage matrix with per-hospital deduplication
 * - 📊 **Derived Statistics**: Per-city coverage scores, per-specialty
 *   availability, and a system-wide summary
 * - 🔍 **Gap Analysis**: Establishment recommendations for uncovered
 *   `(city, specialty)` pairs, driven by overridable policy tables
 * - 🗂️ **Filter Views**: State, category, search and minimum-coverage filters
 *   that never re-walk the raw collections
 * - 💾 **Export**: JSON envelope and CSV grid renderers
 * - 🛡️ **Resilient Parsing**: Malformed records are dropped and counted,
 *   never fatal
 *
 * ## Quick Start
 *
 * ```no_run
 * use specmatrix::prelude::*;
 *
 * # fn main() -> Result<()> {
 * // Load the three standard extracts from a directory
 * let dataset = RegistryDataset::load_standard("./data")?;
 *
 * // Build the coverage snapshot
 * let snapshot = dataset.coverage_snapshot();
 * snapshot.summary.print_summary();
 *
 * // Check a specific cell
 * let pune = CityKey::new("Pune", "Maharashtra");
 * if snapshot.is_gap(&pune, "Oncology") {
 *     println!("Oncology is not offered in Pune");
 * }
 * # Ok(())
 * # }
 * ```
 *
 * ## Loading Data
 *
 * ```no_run
 * # use specmatrix::prelude::*;
 * # fn main() -> Result<()> {
 * let dataset = RegistryDataset::builder()
 *     .hospitals_path("data/hospitals.csv")
 *     .addresses_path("data/hospital_addresses.csv")
 *     .offerings_path("data/specialty_offerings.csv")
 *     .skip_invalid_records(true)
 *     .load()?;
 * # Ok(())
 * # }
 * ```
 *
 * ## Gap Recommendations
 *
 * ```no_run
 * # use specmatrix::prelude::*;
 * # fn main() -> Result<()> {
 * # let dataset = RegistryDataset::load_standard("./data")?;
 * let pune = CityKey::new("Pune", "Maharashtra");
 * let rec = dataset.gap_recommendation(&pune, "Oncology")?;
 * println!("{}: {} ({})", rec.specialty, rec.recommendation, rec.estimated_investment);
 * # Ok(())
 * # }
 * ```
 *
 * ## Filtering and Export
 *
 * ```no_run
 * # use specmatrix::prelude::*;
 * # fn main() -> Result<()> {
 * # let dataset = RegistryDataset::load_standard("./data")?;
 * let filter = MatrixFilter {
 *     states: vec!["Maharashtra".to_string()],
 *     min_coverage: Some(25),
 *     ..Default::default()
 * };
 * let view = apply_filters(&dataset.coverage_snapshot(), &filter, &CitySort::default());
 * println!("{} cities match", view.cities.len());
 *
 * let json = dataset.export(ExportFormat::Json)?;
 * # Ok(())
 * # }
 * ```
 *
 * ## Configuration
 *
 * ```no_run
 * # use specmatrix::prelude::*;
 * # use specmatrix::config::AddressScope;
 * # fn main() -> Result<()> {
 * let config = ConfigBuilder::new()
 *     .address_scope(AddressScope::PrimaryOnly)
 *     .progress_bar(false)
 *     .build();
 * specmatrix::config::set_global_config(config);
 * # Ok(())
 * # }
 * ```
 */

// Re-export error types from root
pub use error::{ExportFormat, MatrixError, Result};

// Public modules
pub mod config;
pub mod data_types;
pub mod dataset;
pub mod error;
pub mod export;
pub mod gaps;
pub mod index;
pub mod matrix;
pub mod normalize;
pub mod reader;
pub mod schema;
pub mod stats;
pub mod view;

#[cfg(feature = "fetch")]
pub mod fetch;

/// Registry extract constants
pub mod constants {
    /// Standard file name of the hospital master extract
    pub const HOSPITALS_FILE: &str = "hospitals.csv";
    /// Standard file name of the hospital address extract
    pub const ADDRESSES_FILE: &str = "hospital_addresses.csv";
    /// Standard file name of the specialty offering extract
    pub const OFFERINGS_FILE: &str = "specialty_offerings.csv";
}

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```
/// use specmatrix::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{global_config, set_global_config, ConfigBuilder, MatrixConfig};
    pub use crate::data_types::*;
    pub use crate::dataset::{RegistryDataset, RegistryDatasetBuilder};
    pub use crate::error::{MatrixError, Result};
    pub use crate::export::{export_matrix, CsvExporter, JsonExporter, MatrixExporter};
    pub use crate::gaps::{gap_recommendation, GapPolicy, GapRecommendation, Priority};
    pub use crate::matrix::build_coverage_matrix;
    pub use crate::reader::RegistryReader;
    pub use crate::view::{
        apply_filters, CitySort, CitySortKey, FilteredView, MatrixFilter, SortDirection,
        SpecialtySortKey,
    };
    #[cfg(feature = "fetch")]
    pub use crate::fetch::{FetchConfig, RegistryFetcher};
    pub use crate::ExportFormat;
}

/// Common recipes and utility functions
pub mod cookbook {
    use crate::data_types::{CityKey, CoverageSnapshot};

    /// All uncovered `(city, specialty)` pairs, in index order
    pub fn gap_pairs(snapshot: &CoverageSnapshot) -> Vec<(CityKey, String)> {
        let mut gaps = Vec::new();
        for city in &snapshot.cities {
            for specialty in &snapshot.specialties {
                if snapshot.is_gap(&city.key, &specialty.name) {
                    gaps.push((city.key.clone(), specialty.name.clone()));
                }
            }
        }
        gaps
    }

    /// Cities where a specialty has no offering hospital
    pub fn cities_missing_specialty<'a>(
        snapshot: &'a CoverageSnapshot,
        specialty: &str,
    ) -> Vec<&'a CityKey> {
        snapshot
            .cities
            .iter()
            .filter(|c| snapshot.is_gap(&c.key, specialty))
            .map(|c| &c.key)
            .collect()
    }

    /// Specialties offered in every known city
    pub fn universally_covered_specialties(snapshot: &CoverageSnapshot) -> Vec<&str> {
        snapshot
            .specialties
            .iter()
            .filter(|s| s.cities_covered == snapshot.cities.len() && !snapshot.cities.is_empty())
            .map(|s| s.name.as_str())
            .collect()
    }
}
