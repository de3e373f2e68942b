/*!
 * Coverage statistics derived from the matrix
 *
 * Pure functions of the city index, specialty index and populated cells.
 * All scores are integer percentages in `[0, 100]`; a zero denominator
 * (no specialties or no cities known) yields 0, never NaN or a panic.
 */

use indexmap::IndexMap;

use crate::data_types::{
    CellKey, CityCoverage, CityKey, CoverageSummary, MatrixCell, SpecialtyCoverage,
};
use crate::index::{CityIndex, SpecialtyIndex};

/// Integer percentage with the zero-denominator rule applied
pub(crate) fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (100.0 * part as f64 / total as f64).round() as u8
}

/// Derive per-city, per-specialty and system-wide statistics
///
/// Returned lists follow the index order of their inputs, so the
/// first-encountered tie-break for best city and top specialty is stable
/// across runs on identical input.
pub fn calculate_statistics(
    city_index: &CityIndex,
    specialty_index: &SpecialtyIndex,
    matrix: &IndexMap<CellKey, MatrixCell>,
) -> (Vec<CityCoverage>, Vec<SpecialtyCoverage>, CoverageSummary) {
    let total_cities = city_index.len();
    let total_specialties = specialty_index.len();

    // Every cell holds at least one hospital, so counting cells per city
    // counts covered specialties directly.
    let mut covered_per_city: IndexMap<&CityKey, usize> = IndexMap::new();
    for key in matrix.keys() {
        *covered_per_city.entry(&key.city).or_insert(0) += 1;
    }

    let cities: Vec<CityCoverage> = city_index
        .iter()
        .map(|(key, entry)| {
            let covered = covered_per_city.get(key).copied().unwrap_or(0);
            CityCoverage {
                key: key.clone(),
                name: entry.name.clone(),
                state: entry.state.clone(),
                hospital_count: entry.hospital_ids.len(),
                specialties_covered: covered,
                coverage_score: percentage(covered, total_specialties),
            }
        })
        .collect();

    let specialties: Vec<SpecialtyCoverage> = specialty_index
        .iter()
        .map(|(name, entry)| SpecialtyCoverage {
            name: name.clone(),
            category: entry.category.clone(),
            cities_covered: entry.cities.len(),
            availability: percentage(entry.cities.len(), total_cities),
        })
        .collect();

    let total_combinations = total_cities * total_specialties;
    let filled_combinations = matrix.len();
    let gap_count = total_combinations - filled_combinations;

    // Any non-empty city list yields a best city, even when every score is 0;
    // ties keep the first city in index order.
    let best_city = cities
        .iter()
        .fold(None::<&CityCoverage>, |best, city| match best {
            Some(b) if b.coverage_score >= city.coverage_score => Some(b),
            _ => Some(city),
        })
        .cloned();

    let top_specialty = specialties
        .iter()
        .fold(None::<&SpecialtyCoverage>, |top, spec| match top {
            Some(t) if t.availability >= spec.availability => Some(t),
            _ => Some(spec),
        })
        .cloned();

    let average_city_score = percentage(
        cities.iter().map(|c| c.coverage_score as usize).sum(),
        cities.len() * 100,
    );
    let average_specialty_availability = percentage(
        specialties.iter().map(|s| s.availability as usize).sum(),
        specialties.len() * 100,
    );

    let summary = CoverageSummary {
        total_cities,
        total_specialties,
        total_combinations,
        filled_combinations,
        gap_count,
        gap_percentage: percentage(gap_count, total_combinations),
        coverage_percentage: percentage(filled_combinations, total_combinations),
        best_city,
        top_specialty,
        average_city_score,
        average_specialty_availability,
    };

    (cities, specialties, summary)
}
