/*!
 * Filter and view layer over a coverage snapshot
 *
 * Applies state, category, free-text and minimum-coverage filters, then
 * re-sorts the derived city and specialty lists. The layer only reads the
 * already-derived collections: it is O(cities + specialties) per call and
 * never re-walks the offering list or mutates the snapshot, so it can run
 * on every keystroke while the matrix stays untouched.
 */

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::data_types::{CityCoverage, CoverageSnapshot, SpecialtyCoverage};

/// User-selected filters, applied in order: states, categories, search, minimum coverage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixFilter {
    /// Keep only cities in these states (empty = no state filter)
    pub states: Vec<String>,
    /// Keep only specialties in these categories (empty = no category filter)
    pub categories: Vec<String>,
    /// Case-insensitive search over city name, state, and specialty name
    pub search_term: Option<String>,
    /// Keep only cities at or above this coverage score
    pub min_coverage: Option<u8>,
}

impl MatrixFilter {
    /// A filter that keeps everything
    pub fn none() -> Self {
        Self::default()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Sort key for the city list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CitySortKey {
    Name,
    State,
    #[default]
    CoverageScore,
    SpecialtiesCovered,
    HospitalCount,
}

/// Sort key for the specialty list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpecialtySortKey {
    Name,
    Category,
    #[default]
    Availability,
    CitiesCovered,
}

/// Sort specification for the city list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CitySort {
    pub key: CitySortKey,
    pub direction: SortDirection,
}

/// Filtered, re-sorted views of the derived lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredView {
    pub cities: Vec<CityCoverage>,
    pub specialties: Vec<SpecialtyCoverage>,
}

/// Apply filters and sorting to a snapshot's derived lists
pub fn apply_filters(
    snapshot: &CoverageSnapshot,
    filter: &MatrixFilter,
    sort: &CitySort,
) -> FilteredView {
    let mut cities: Vec<CityCoverage> = snapshot
        .cities
        .iter()
        .filter(|city| filter.states.is_empty() || filter.states.contains(&city.state))
        .cloned()
        .collect();

    let mut specialties: Vec<SpecialtyCoverage> = snapshot
        .specialties
        .iter()
        .filter(|spec| {
            filter.categories.is_empty()
                || spec
                    .category
                    .as_ref()
                    .map(|c| filter.categories.contains(c))
                    .unwrap_or(false)
        })
        .cloned()
        .collect();

    if let Some(term) = filter.search_term.as_deref().filter(|t| !t.is_empty()) {
        let term = term.to_lowercase();
        cities.retain(|city| {
            city.name.to_lowercase().contains(&term) || city.state.to_lowercase().contains(&term)
        });
        specialties.retain(|spec| spec.name.to_lowercase().contains(&term));
    }

    if let Some(min) = filter.min_coverage {
        cities.retain(|city| city.coverage_score >= min);
    }

    sort_cities(&mut cities, sort.key, sort.direction);

    FilteredView { cities, specialties }
}

/// Sort the city list in place; stable, so ties keep their index order
pub fn sort_cities(cities: &mut [CityCoverage], key: CitySortKey, direction: SortDirection) {
    cities.sort_by(|a, b| {
        let ordering = match key {
            CitySortKey::Name => a.name.cmp(&b.name),
            CitySortKey::State => a.state.cmp(&b.state),
            CitySortKey::CoverageScore => a.coverage_score.cmp(&b.coverage_score),
            CitySortKey::SpecialtiesCovered => a.specialties_covered.cmp(&b.specialties_covered),
            CitySortKey::HospitalCount => a.hospital_count.cmp(&b.hospital_count),
        };
        apply_direction(ordering, direction)
    });
}

/// Sort the specialty list in place; stable, so ties keep their index order
pub fn sort_specialties(
    specialties: &mut [SpecialtyCoverage],
    key: SpecialtySortKey,
    direction: SortDirection,
) {
    specialties.sort_by(|a, b| {
        let ordering = match key {
            SpecialtySortKey::Name => a.name.cmp(&b.name),
            SpecialtySortKey::Category => a.category.cmp(&b.category),
            SpecialtySortKey::Availability => a.availability.cmp(&b.availability),
            SpecialtySortKey::CitiesCovered => a.cities_covered.cmp(&b.cities_covered),
        };
        apply_direction(ordering, direction)
    });
}

fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}
