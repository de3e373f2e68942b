//! End-to-end tests for the coverage matrix engine: CSV loading, matrix
//! construction, statistics, gap analysis, and export.

use std::fs;

use specmatrix::config::MatrixConfig;
use specmatrix::data_types::{
    AddressType, CityKey, CoverageSnapshot, Hospital, HospitalAddress, HospitalId,
    SpecialtyOffering,
};
use specmatrix::gaps::{gap_recommendation, GapPolicy};
use specmatrix::matrix::build_coverage_matrix;
use specmatrix::prelude::*;

fn hospital(id: &str, name: &str) -> Hospital {
    Hospital {
        id: HospitalId(id.to_string()),
        name: name.to_string(),
        hospital_type: Some("Multi-specialty".to_string()),
        beds_operational: Some(100),
    }
}

fn address(id: &str, city: &str, state: &str) -> HospitalAddress {
    HospitalAddress {
        hospital_id: HospitalId(id.to_string()),
        city_town: city.to_string(),
        state: state.to_string(),
        address_type: AddressType::Primary,
    }
}

fn offering(id: &str, name: &str, available: bool) -> SpecialtyOffering {
    SpecialtyOffering {
        hospital_id: HospitalId(id.to_string()),
        specialty_name: name.to_string(),
        specialty_category: Some("Medical".to_string()),
        is_available: available,
    }
}

/// Two cities, one live specialty, one covered cell.
fn two_by_one() -> CoverageSnapshot {
    let hospitals = vec![hospital("H1", "City General"), hospital("H2", "Lakeside")];
    let addresses = vec![address("H1", "Pune", "MH"), address("H2", "Nagpur", "MH")];
    let offerings = vec![
        offering("H1", "Cardiology", true),
        offering("H2", "Oncology", false),
        offering("H1", "Oncology", false),
    ];

    build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default())
}

#[test]
fn sparse_grid_statistics() {
    // Oncology rows are all unavailable, so the grid is 2 cities x 1 specialty
    // with one covered cell.
    let snapshot = two_by_one();

    assert_eq!(snapshot.cities.len(), 2);
    assert_eq!(snapshot.specialties.len(), 1);
    assert_eq!(snapshot.matrix.len(), 1);
    assert_eq!(snapshot.summary.total_combinations, 2);
    assert_eq!(snapshot.summary.filled_combinations, 1);
    assert_eq!(snapshot.summary.gap_count, 1);
    assert_eq!(snapshot.summary.gap_percentage, 50);
    assert_eq!(snapshot.summary.coverage_percentage, 50);
}

#[test]
fn two_city_two_specialty_grid() {
    let hospitals = vec![hospital("H1", "City General"), hospital("H2", "Lakeside")];
    let addresses = vec![address("H1", "Pune", "MH"), address("H2", "Nagpur", "MH")];
    let offerings = vec![
        offering("H1", "Cardiology", true),
        // Oncology is a known specialty but only through an offering whose
        // hospital has no address, so it covers nothing.
        offering("H9", "Oncology", true),
    ];

    let snapshot =
        build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

    assert_eq!(snapshot.cities.len(), 2);
    assert_eq!(snapshot.specialties.len(), 2);
    assert_eq!(snapshot.matrix.len(), 1);
    assert_eq!(snapshot.summary.total_combinations, 4);
    assert_eq!(snapshot.summary.filled_combinations, 1);
    assert_eq!(snapshot.summary.gap_count, 3);
    assert_eq!(snapshot.summary.gap_percentage, 75);
    assert_eq!(snapshot.summary.coverage_percentage, 25);

    let pune = snapshot.city(&CityKey::new("Pune", "MH")).unwrap();
    let nagpur = snapshot.city(&CityKey::new("Nagpur", "MH")).unwrap();
    assert_eq!(pune.coverage_score, 50);
    assert_eq!(nagpur.coverage_score, 0);
    assert_eq!(snapshot.summary.best_city.as_ref().unwrap().name, "Pune");
}

#[test]
fn empty_inputs_produce_zeroed_snapshot() {
    let snapshot = build_coverage_matrix(&[], &[], &[], &MatrixConfig::default());
    assert_eq!(snapshot, CoverageSnapshot::empty());
    assert_eq!(snapshot.summary.gap_percentage, 0);
    assert!(snapshot.summary.best_city.is_none());
}

#[test]
fn unavailable_specialty_is_absent_from_denominators() {
    let hospitals = vec![hospital("H1", "City General")];
    let addresses = vec![address("H1", "Pune", "MH")];
    let offerings = vec![
        offering("H1", "Cardiology", true),
        offering("H1", "Telemedicine", false),
    ];

    let snapshot =
        build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

    assert!(snapshot.specialty("Telemedicine").is_none());
    assert_eq!(snapshot.specialties.len(), 1);
    // With one city and one specialty, the single covered cell is 100%.
    assert_eq!(snapshot.summary.coverage_percentage, 100);
    assert_eq!(snapshot.city(&CityKey::new("Pune", "MH")).unwrap().coverage_score, 100);
}

#[test]
fn hospital_contributes_once_per_cell() {
    let hospitals = vec![hospital("H1", "City General")];
    let addresses = vec![
        address("H1", "Pune", "MH"),
        address("H1", "Pune", "MH"), // duplicate address row
    ];
    let offerings = vec![
        offering("H1", "Cardiology", true),
        offering("H1", "Cardiology", true), // duplicate offering row
    ];

    let snapshot =
        build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

    let cell = snapshot.cell(&CityKey::new("Pune", "MH"), "Cardiology").unwrap();
    assert_eq!(cell.count, 1);
    assert_eq!(cell.hospitals.len(), 1);
}

#[test]
fn cell_contents_are_independent_of_input_order() {
    let hospitals = vec![hospital("H1", "City General"), hospital("H2", "Lakeside")];
    let addresses = vec![address("H1", "Pune", "MH"), address("H2", "Pune", "MH")];
    let offerings = vec![
        offering("H1", "Cardiology", true),
        offering("H2", "Cardiology", true),
    ];

    let forward =
        build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

    let hospitals_rev: Vec<_> = hospitals.iter().rev().cloned().collect();
    let addresses_rev: Vec<_> = addresses.iter().rev().cloned().collect();
    let offerings_rev: Vec<_> = offerings.iter().rev().cloned().collect();
    let reversed = build_coverage_matrix(
        &hospitals_rev,
        &addresses_rev,
        &offerings_rev,
        &MatrixConfig::default(),
    );

    assert_eq!(forward.summary, reversed.summary);
    let key = CityKey::new("Pune", "MH");
    assert_eq!(
        forward.cell(&key, "Cardiology").unwrap().count,
        reversed.cell(&key, "Cardiology").unwrap().count
    );
}

#[test]
fn gap_recommendation_for_uncovered_pair() {
    let hospitals = vec![hospital("H1", "City General"), hospital("H2", "Lakeside")];
    let addresses = vec![address("H1", "Pune", "MH"), address("H2", "Nagpur", "MH")];
    let offerings = vec![
        offering("H1", "Cardiology", true),
        offering("H1", "Oncology", true),
    ];

    let snapshot =
        build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());
    let policy = GapPolicy::default();

    let rec = gap_recommendation(&snapshot, &CityKey::new("Nagpur", "MH"), "Oncology", &policy)
        .unwrap();

    assert_eq!(rec.specialty, "Oncology");
    assert_eq!(rec.nearest_alternatives, vec![CityKey::new("Pune", "MH")]);
    assert_eq!(rec.potential_demand, 0.2); // 1 hospital x 0.2 multiplier
    assert_eq!(rec.priority, Priority::Low);
    assert_eq!(rec.estimated_investment, "₹2Cr - ₹5Cr");
    assert_eq!(rec.timeframe, "18-36 months");
}

#[test]
fn gap_recommendation_rejects_covered_pair() {
    let hospitals = vec![hospital("H1", "City General")];
    let addresses = vec![address("H1", "Pune", "MH")];
    let offerings = vec![offering("H1", "Cardiology", true)];

    let snapshot =
        build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

    let result = gap_recommendation(
        &snapshot,
        &CityKey::new("Pune", "MH"),
        "Cardiology",
        &GapPolicy::default(),
    );
    assert!(matches!(result, Err(MatrixError::CoverageExists { count: 1, .. })));
}

#[test]
fn load_standard_extracts_and_export() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("hospitals.csv"),
        "id,name,hospital_type,beds_operational\n\
         H1,City General,Multi-specialty,120\n\
         H2,Lakeside,Clinic,40\n\
         ,Broken Row,,\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("hospital_addresses.csv"),
        "hospital_id,city_town,state,address_type\n\
         H1,Pune,Maharashtra,Primary\n\
         H2,Nagpur,Maharashtra,Primary\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("specialty_offerings.csv"),
        "hospital_id,specialty_name,specialty_category,is_available\n\
         H1,Cardiology,Medical,true\n\
         H2,Cardiology,Medical,true\n\
         H2,Oncology,Medical,false\n",
    )
    .unwrap();

    let dataset = RegistryDataset::builder()
        .hospitals_path(dir.path().join("hospitals.csv"))
        .addresses_path(dir.path().join("hospital_addresses.csv"))
        .offerings_path(dir.path().join("specialty_offerings.csv"))
        .show_progress(false)
        .load()
        .unwrap();

    // The broken hospital row is skipped, everything else survives.
    assert_eq!(dataset.hospitals.len(), 2);
    assert_eq!(dataset.addresses.len(), 2);
    assert_eq!(dataset.offerings.len(), 3);

    let snapshot = dataset.coverage_snapshot_with(&MatrixConfig::default());
    assert_eq!(snapshot.cities.len(), 2);
    assert_eq!(snapshot.specialties.len(), 1);
    assert_eq!(snapshot.summary.coverage_percentage, 100);

    let csv_out = export_matrix(&snapshot, ExportFormat::Csv).unwrap();
    let mut lines = csv_out.lines();
    assert_eq!(lines.next(), Some("City,State,Cardiology"));
    assert_eq!(lines.next(), Some("Pune,Maharashtra,1"));
    assert_eq!(lines.next(), Some("Nagpur,Maharashtra,1"));

    let json_out = export_matrix(&snapshot, ExportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json_out).unwrap();
    assert_eq!(value["summary"]["total_cities"], 2);
    assert_eq!(value["cells"].as_array().unwrap().len(), 2);
}

#[test]
fn filtered_view_narrows_without_rebuilding() {
    let hospitals = vec![
        hospital("H1", "City General"),
        hospital("H2", "Lakeside"),
        hospital("H3", "Hilltop"),
    ];
    let addresses = vec![
        address("H1", "Pune", "Maharashtra"),
        address("H2", "Nagpur", "Maharashtra"),
        address("H3", "Mysore", "Karnataka"),
    ];
    let offerings = vec![
        offering("H1", "Cardiology", true),
        offering("H2", "Cardiology", true),
        offering("H3", "Oncology", true),
    ];

    let snapshot =
        build_coverage_matrix(&hospitals, &addresses, &offerings, &MatrixConfig::default());

    let filter = MatrixFilter {
        states: vec!["Maharashtra".to_string()],
        ..Default::default()
    };
    let view = apply_filters(&snapshot, &filter, &CitySort::default());

    assert_eq!(view.cities.len(), 2);
    assert!(view.cities.iter().all(|c| c.state == "Maharashtra"));
    // The snapshot itself is untouched.
    assert_eq!(snapshot.cities.len(), 3);
}
