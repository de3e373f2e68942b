/*!
 * Data type definitions for hospital registry records
 *
 * This module contains type-safe representations of the three registry
 * collections the engine consumes (hospitals, hospital addresses, specialty
 * offerings) and the derived snapshot types it produces. Derived entities are
 * created fresh on every engine run and never mutated afterwards.
 */

use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

/// Hospital identifier as issued by the source registry
///
/// The registry serves ids as opaque strings; the only validation applied is
/// that an id is non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HospitalId(pub String);

impl HospitalId {
    /// Create a new hospital id, validating that it is not blank
    pub fn new(id: String) -> Result<Self, crate::MatrixError> {
        if id.trim().is_empty() {
            return Err(crate::MatrixError::invalid_hospital_id(&id));
        }
        Ok(HospitalId(id))
    }

    /// Get the id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HospitalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address type code from the registry address table
///
/// The registry distinguishes primary clinical locations from billing
/// addresses; other codes appear occasionally and are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AddressType {
    Primary,
    Billing,
    Other(String),
}

impl AddressType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            c if c.eq_ignore_ascii_case("primary") => AddressType::Primary,
            c if c.eq_ignore_ascii_case("billing") => AddressType::Billing,
            other => AddressType::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            AddressType::Primary => "Primary",
            AddressType::Billing => "Billing",
            AddressType::Other(code) => code,
        }
    }

    /// Whether this address represents the hospital's primary clinical location
    pub fn is_primary(&self) -> bool {
        matches!(self, AddressType::Primary)
    }
}

impl From<String> for AddressType {
    fn from(code: String) -> Self {
        AddressType::from_code(&code)
    }
}

impl From<AddressType> for String {
    fn from(addr_type: AddressType) -> Self {
        addr_type.as_code().to_string()
    }
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Hospital master record from the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    pub hospital_type: Option<String>,
    pub beds_operational: Option<u32>,
}

/// Hospital address row; a hospital may have zero or more of these
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalAddress {
    pub hospital_id: HospitalId,
    pub city_town: String,
    pub state: String,
    pub address_type: AddressType,
}

impl HospitalAddress {
    /// Derive the city key for this address, if city and state are present
    pub fn city_key(&self) -> Option<CityKey> {
        if self.city_town.is_empty() || self.state.is_empty() {
            return None;
        }
        Some(CityKey::new(&self.city_town, &self.state))
    }
}

/// Specialty offering row linking a hospital to a named specialty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyOffering {
    pub hospital_id: HospitalId,
    pub specialty_name: String,
    pub specialty_category: Option<String>,
    pub is_available: bool,
}

/// Unique `(city, state)` identifier used to bucket addresses and matrix rows
///
/// Keys are case-sensitive exact matches; no normalization of city-name
/// variants is performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityKey(String);

impl CityKey {
    /// Build the key in its canonical `"{city}, {state}"` form
    pub fn new(city: &str, state: &str) -> Self {
        CityKey(format!("{}, {}", city, state))
    }

    /// Reconstruct a key from its already-joined string form
    pub fn from_joined(joined: &str) -> Self {
        CityKey(joined.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key for one matrix cell: a `(city, specialty)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub city: CityKey,
    pub specialty: String,
}

impl CellKey {
    pub fn new(city: CityKey, specialty: impl Into<String>) -> Self {
        Self { city, specialty: specialty.into() }
    }
}

/// A hospital contributing to a matrix cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalRef {
    pub id: HospitalId,
    pub name: String,
    pub hospital_type: Option<String>,
    pub beds_operational: Option<u32>,
}

impl From<&Hospital> for HospitalRef {
    fn from(hospital: &Hospital) -> Self {
        Self {
            id: hospital.id.clone(),
            name: hospital.name.clone(),
            hospital_type: hospital.hospital_type.clone(),
            beds_operational: hospital.beds_operational,
        }
    }
}

/// One populated cell of the coverage matrix
///
/// Invariant: `count == hospitals.len()` and hospitals are unique by id.
/// A cell exists if and only if at least one hospital in that city offers
/// that specialty; a gap is the absence of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixCell {
    pub city_key: CityKey,
    pub specialty: String,
    pub category: Option<String>,
    pub count: usize,
    pub hospitals: Vec<HospitalRef>,
}

/// Per-city coverage statistics, recomputed on every engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCoverage {
    pub key: CityKey,
    pub name: String,
    pub state: String,
    /// Distinct hospitals physically located in this city
    pub hospital_count: usize,
    /// Distinct specialties with at least one offering hospital here
    pub specialties_covered: usize,
    /// Percentage of all known specialties available in this city, 0..=100
    pub coverage_score: u8,
}

/// Per-specialty availability statistics, recomputed on every engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyCoverage {
    pub name: String,
    pub category: Option<String>,
    /// Distinct cities where at least one hospital offers this specialty
    pub cities_covered: usize,
    /// Percentage of all known cities covered, 0..=100
    pub availability: u8,
}

/// System-wide summary derived from the matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub total_cities: usize,
    pub total_specialties: usize,
    pub total_combinations: usize,
    pub filled_combinations: usize,
    pub gap_count: usize,
    pub gap_percentage: u8,
    pub coverage_percentage: u8,
    pub best_city: Option<CityCoverage>,
    pub top_specialty: Option<SpecialtyCoverage>,
    pub average_city_score: u8,
    pub average_specialty_availability: u8,
}

impl CoverageSummary {
    /// An all-zero summary for empty inputs
    pub fn empty() -> Self {
        Self {
            total_cities: 0,
            total_specialties: 0,
            total_combinations: 0,
            filled_combinations: 0,
            gap_count: 0,
            gap_percentage: 0,
            coverage_percentage: 0,
            best_city: None,
            top_specialty: None,
            average_city_score: 0,
            average_specialty_availability: 0,
        }
    }

    /// Print formatted summary statistics
    pub fn print_summary(&self) {
        println!("=== Specialty Coverage Summary ===");
        println!("Cities: {}", self.total_cities);
        println!("Specialties: {}", self.total_specialties);
        println!("Combinations: {} ({} covered, {} gaps)",
            self.total_combinations, self.filled_combinations, self.gap_count);
        println!("Coverage: {}%  Gaps: {}%", self.coverage_percentage, self.gap_percentage);
        println!("Average city coverage score: {}%", self.average_city_score);
        println!("Average specialty availability: {}%", self.average_specialty_availability);

        if let Some(city) = &self.best_city {
            println!("Best city: {} ({}% coverage)", city.key, city.coverage_score);
        }
        if let Some(specialty) = &self.top_specialty {
            println!("Top specialty: {} ({}% availability)", specialty.name, specialty.availability);
        }
    }
}

/// Full, unfiltered result of one engine run
///
/// A snapshot is immutable once built. Any change to the input collections
/// calls for a fresh `build_coverage_matrix` run; filter/view operations only
/// read the derived lists and never touch the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSnapshot {
    /// Cities in first-encountered order
    pub cities: Vec<CityCoverage>,
    /// Specialties in first-encountered order
    pub specialties: Vec<SpecialtyCoverage>,
    /// Populated cells only; gaps are absent keys
    pub matrix: IndexMap<CellKey, MatrixCell>,
    pub summary: CoverageSummary,
}

impl CoverageSnapshot {
    /// A valid, fully-zeroed snapshot (the result for empty inputs)
    pub fn empty() -> Self {
        Self {
            cities: Vec::new(),
            specialties: Vec::new(),
            matrix: IndexMap::new(),
            summary: CoverageSummary::empty(),
        }
    }

    /// Look up a matrix cell
    pub fn cell(&self, city: &CityKey, specialty: &str) -> Option<&MatrixCell> {
        self.matrix.get(&CellKey::new(city.clone(), specialty))
    }

    /// Whether a known `(city, specialty)` pair has no coverage
    pub fn is_gap(&self, city: &CityKey, specialty: &str) -> bool {
        self.cell(city, specialty).map(|c| c.count == 0).unwrap_or(true)
    }

    /// Look up per-city statistics
    pub fn city(&self, key: &CityKey) -> Option<&CityCoverage> {
        self.cities.iter().find(|c| &c.key == key)
    }

    /// Look up per-specialty statistics
    pub fn specialty(&self, name: &str) -> Option<&SpecialtyCoverage> {
        self.specialties.iter().find(|s| s.name == name)
    }
}
