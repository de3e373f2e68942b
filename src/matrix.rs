/*!
 * Coverage matrix construction
 *
 * Joins specialty offerings to their owning hospital, the hospital to its
 * address rows, and each address to its city, producing one cell per
 * `(city, specialty)` pair with a deduplicated hospital list. This is the
 * single implementation of the join; the dataset layer and the CLI are thin
 * consumers and never re-derive any of it.
 */

use indexmap::IndexMap;
use log::{debug, warn};

use crate::config::{AddressScope, MatrixConfig};
use crate::data_types::{
    CellKey, CoverageSnapshot, Hospital, HospitalAddress, HospitalId, HospitalRef, MatrixCell,
    SpecialtyOffering,
};
use crate::index::{build_city_index, build_specialty_index};
use crate::normalize::normalize;
use crate::stats::calculate_statistics;

/// Build the full, unfiltered coverage snapshot from the three raw collections
///
/// The computation is synchronous, single-threaded and pure: identical inputs
/// produce a structurally identical snapshot. Malformed records and dangling
/// references are dropped and counted, never fatal; empty inputs yield a
/// valid, fully-zeroed snapshot.
pub fn build_coverage_matrix(
    hospitals: &[Hospital],
    addresses: &[HospitalAddress],
    offerings: &[SpecialtyOffering],
    config: &MatrixConfig,
) -> CoverageSnapshot {
    let normalized = normalize(hospitals, addresses, offerings);

    let scoped_addresses: Vec<&HospitalAddress> = match config.address_scope {
        AddressScope::All => normalized.addresses.clone(),
        AddressScope::PrimaryOnly => normalized
            .addresses
            .iter()
            .copied()
            .filter(|a| a.address_type.is_primary())
            .collect(),
    };

    let city_index = build_city_index(scoped_addresses.iter().copied());
    let mut specialty_index = build_specialty_index(normalized.offerings.iter().copied());

    // Lookup structures for the join, built once per run.
    let hospital_by_id: IndexMap<&HospitalId, &Hospital> = normalized
        .hospitals
        .iter()
        .map(|h| (&h.id, *h))
        .collect();

    let mut addresses_by_hospital: IndexMap<&HospitalId, Vec<&HospitalAddress>> = IndexMap::new();
    for addr in &scoped_addresses {
        addresses_by_hospital
            .entry(&addr.hospital_id)
            .or_default()
            .push(addr);
    }

    let mut matrix: IndexMap<CellKey, MatrixCell> = IndexMap::new();
    let mut unknown_hospital_refs = 0usize;
    let mut unaddressed_hospital_refs = 0usize;

    for offering in &normalized.offerings {
        let Some(hospital) = hospital_by_id.get(&offering.hospital_id).copied() else {
            unknown_hospital_refs += 1;
            debug!(
                "offering '{}' references unknown hospital {}",
                offering.specialty_name, offering.hospital_id
            );
            continue;
        };

        let Some(hospital_addresses) = addresses_by_hospital.get(&hospital.id) else {
            unaddressed_hospital_refs += 1;
            debug!(
                "hospital {} offers '{}' but has no address in scope",
                hospital.id, offering.specialty_name
            );
            continue;
        };

        for addr in hospital_addresses {
            let Some(city_key) = addr.city_key() else {
                continue;
            };

            let cell = matrix
                .entry(CellKey::new(city_key.clone(), offering.specialty_name.clone()))
                .or_insert_with(|| MatrixCell {
                    city_key: city_key.clone(),
                    specialty: offering.specialty_name.clone(),
                    category: offering.specialty_category.clone(),
                    count: 0,
                    hospitals: Vec::new(),
                });

            // At most one contribution per hospital per cell, even with
            // duplicate specialty rows or duplicate addresses in one city.
            if !cell.hospitals.iter().any(|h| h.id == hospital.id) {
                cell.count += 1;
                cell.hospitals.push(HospitalRef::from(hospital));
            }

            if let Some(entry) = specialty_index.get_mut(&offering.specialty_name) {
                entry.cities.insert(city_key);
            }
        }
    }

    if unknown_hospital_refs > 0 || unaddressed_hospital_refs > 0 {
        warn!(
            "matrix build skipped {} offering(s) referencing unknown hospitals and {} offering(s) from hospitals without addresses",
            unknown_hospital_refs, unaddressed_hospital_refs,
        );
    }

    let (cities, specialties, summary) =
        calculate_statistics(&city_index, &specialty_index, &matrix);

    debug_assert!(matrix.len() <= cities.len() * specialties.len());

    CoverageSnapshot {
        cities,
        specialties,
        matrix,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::{AddressType, CityKey};

    fn hospital(id: &str, name: &str) -> Hospital {
        Hospital {
            id: HospitalId(id.to_string()),
            name: name.to_string(),
            hospital_type: Some("Multi-specialty".to_string()),
            beds_operational: Some(100),
        }
    }

    fn address(id: &str, city: &str, state: &str, addr_type: AddressType) -> HospitalAddress {
        HospitalAddress {
            hospital_id: HospitalId(id.to_string()),
            city_town: city.to_string(),
            state: state.to_string(),
            address_type: addr_type,
        }
    }

    fn offering(id: &str, name: &str) -> SpecialtyOffering {
        SpecialtyOffering {
            hospital_id: HospitalId(id.to_string()),
            specialty_name: name.to_string(),
            specialty_category: Some("Medical".to_string()),
            is_available: true,
        }
    }

    #[test]
    fn test_cell_exists_iff_offering_present() {
        let hospitals = vec![hospital("H1", "City General")];
        let addresses = vec![address("H1", "Pune", "MH", AddressType::Primary)];
        let offerings = vec![offering("H1", "Cardiology")];

        let snapshot =
            build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

        let pune = CityKey::new("Pune", "MH");
        let cell = snapshot.cell(&pune, "Cardiology").expect("cell");
        assert_eq!(cell.count, 1);
        assert_eq!(cell.hospitals[0].name, "City General");
        assert!(snapshot.cell(&pune, "Oncology").is_none());
    }

    #[test]
    fn test_hospital_contributes_once_per_cell() {
        let hospitals = vec![hospital("H1", "City General")];
        // Two addresses in the same city and a duplicated offering row.
        let addresses = vec![
            address("H1", "Pune", "MH", AddressType::Primary),
            address("H1", "Pune", "MH", AddressType::Billing),
        ];
        let offerings = vec![offering("H1", "Cardiology"), offering("H1", "Cardiology")];

        let snapshot =
            build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

        let cell = snapshot.cell(&CityKey::new("Pune", "MH"), "Cardiology").expect("cell");
        assert_eq!(cell.count, 1);
        assert_eq!(cell.hospitals.len(), 1);
    }

    #[test]
    fn test_missing_reference_offerings_are_skipped() {
        let hospitals = vec![hospital("H1", "City General")];
        let addresses = vec![address("H1", "Pune", "MH", AddressType::Primary)];
        let offerings = vec![
            offering("H1", "Cardiology"),
            offering("H9", "Oncology"), // unknown hospital
        ];

        let snapshot =
            build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

        assert_eq!(snapshot.matrix.len(), 1);
        // Oncology is still a known specialty (it had an available offering),
        // it just covers no city.
        assert_eq!(snapshot.specialties.len(), 2);
        assert_eq!(snapshot.specialty("Oncology").unwrap().cities_covered, 0);
    }

    #[test]
    fn test_hospital_without_address_is_skipped() {
        let hospitals = vec![hospital("H1", "City General"), hospital("H2", "Remote Clinic")];
        let addresses = vec![address("H1", "Pune", "MH", AddressType::Primary)];
        let offerings = vec![offering("H1", "Cardiology"), offering("H2", "Cardiology")];

        let snapshot =
            build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

        let cell = snapshot.cell(&CityKey::new("Pune", "MH"), "Cardiology").expect("cell");
        assert_eq!(cell.count, 1);
    }

    #[test]
    fn test_billing_addresses_participate_by_default() {
        let hospitals = vec![hospital("H1", "City General")];
        let addresses = vec![
            address("H1", "Pune", "MH", AddressType::Primary),
            address("H1", "Mumbai", "MH", AddressType::Billing),
        ];
        let offerings = vec![offering("H1", "Cardiology")];

        let snapshot =
            build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

        assert_eq!(snapshot.cities.len(), 2);
        assert!(snapshot.cell(&CityKey::new("Mumbai", "MH"), "Cardiology").is_some());
    }

    #[test]
    fn test_primary_only_scope_excludes_billing_addresses() {
        let hospitals = vec![hospital("H1", "City General")];
        let addresses = vec![
            address("H1", "Pune", "MH", AddressType::Primary),
            address("H1", "Mumbai", "MH", AddressType::Billing),
        ];
        let offerings = vec![offering("H1", "Cardiology")];

        let snapshot = build_coverage_matrix(
            &hospitals,
            &addresses,
            &offerings,
            &MatrixConfig::primary_only(),
        );

        assert_eq!(snapshot.cities.len(), 1);
        assert!(snapshot.cell(&CityKey::new("Mumbai", "MH"), "Cardiology").is_none());
    }

    #[test]
    fn test_empty_inputs_yield_empty_snapshot() {
        let snapshot = build_coverage_matrix(&[], &[], &[], &MatrixConfig::default());
        assert_eq!(snapshot, CoverageSnapshot::empty());
    }

    #[test]
    fn test_idempotent_on_identical_inputs() {
        let hospitals = vec![hospital("H1", "City General"), hospital("H2", "Lakeside")];
        let addresses = vec![
            address("H1", "Pune", "MH", AddressType::Primary),
            address("H2", "Nagpur", "MH", AddressType::Primary),
        ];
        let offerings = vec![offering("H1", "Cardiology"), offering("H2", "Oncology")];

        let a = build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());
        let b = build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());
        assert_eq!(a, b);
    }
}
