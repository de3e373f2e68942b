/*!
 * Record normalization for the three registry collections
 *
 * Drops records missing required keys before the indexes and matrix are
 * built. All normalization is "drop and continue": an incomplete registry
 * must still yield a (possibly sparse) coverage view, so nothing here is
 * fatal. Drop counts are logged as a data-quality signal and are never
 * surfaced to the caller as errors.
 */

use log::{debug, warn};

use crate::data_types::{Hospital, HospitalAddress, SpecialtyOffering};

/// Counters for records removed during normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Hospitals with a blank id or empty name
    pub hospitals_dropped: usize,
    /// Addresses with a blank hospital id or missing city/state
    pub addresses_dropped: usize,
    /// Offerings with a blank hospital id or empty specialty name
    pub offerings_dropped: usize,
    /// Offerings filtered out because `is_available` is false
    pub offerings_unavailable: usize,
}

impl NormalizeReport {
    /// Total number of malformed records removed (excludes availability filtering)
    pub fn total_dropped(&self) -> usize {
        self.hospitals_dropped + self.addresses_dropped + self.offerings_dropped
    }

    /// Whether every input record survived normalization intact
    pub fn is_clean(&self) -> bool {
        self.total_dropped() == 0
    }
}

/// The three collections after normalization, borrowing surviving records
#[derive(Debug)]
pub struct NormalizedRegistry<'a> {
    pub hospitals: Vec<&'a Hospital>,
    pub addresses: Vec<&'a HospitalAddress>,
    pub offerings: Vec<&'a SpecialtyOffering>,
    pub report: NormalizeReport,
}

/// Validate and clean the three raw input collections
///
/// Only offerings with `is_available == true` survive; a hospital may still
/// appear with duplicate offerings or duplicate addresses here, the matrix
/// builder deduplicates per cell.
pub fn normalize<'a>(
    hospitals: &'a [Hospital],
    addresses: &'a [HospitalAddress],
    offerings: &'a [SpecialtyOffering],
) -> NormalizedRegistry<'a> {
    let mut report = NormalizeReport::default();

    let hospitals: Vec<&Hospital> = hospitals.iter()
        .filter(|h| {
            let keep = !h.id.as_str().trim().is_empty() && !h.name.is_empty();
            if !keep {
                report.hospitals_dropped += 1;
                debug!("dropping hospital record with missing id or name: {:?}", h.id);
            }
            keep
        })
        .collect();

    let addresses: Vec<&HospitalAddress> = addresses.iter()
        .filter(|a| {
            let keep = !a.hospital_id.as_str().trim().is_empty()
                && !a.city_town.is_empty()
                && !a.state.is_empty();
            if !keep {
                report.addresses_dropped += 1;
                debug!("dropping address record with missing hospital id or city/state: {:?}", a.hospital_id);
            }
            keep
        })
        .collect();

    let offerings: Vec<&SpecialtyOffering> = offerings.iter()
        .filter(|o| {
            if !o.is_available {
                report.offerings_unavailable += 1;
                return false;
            }
            let keep = !o.hospital_id.as_str().trim().is_empty() && !o.specialty_name.is_empty();
            if !keep {
                report.offerings_dropped += 1;
                debug!("dropping offering record with missing hospital id or specialty name: {:?}", o.hospital_id);
            }
            keep
        })
        .collect();

    if !report.is_clean() {
        warn!(
            "normalization dropped {} malformed record(s): {} hospitals, {} addresses, {} offerings",
            report.total_dropped(),
            report.hospitals_dropped,
            report.addresses_dropped,
            report.offerings_dropped,
        );
    }

    NormalizedRegistry { hospitals, addresses, offerings, report }
}
