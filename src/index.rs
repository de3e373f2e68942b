/*!
 * City and specialty index builders
 *
 * Groups hospital addresses into unique `(city, state)` buckets and available
 * specialty offerings by specialty name. Both indexes preserve first-encountered
 * order, which every downstream tie-break (best city, top specialty, nearest
 * alternatives) relies on.
 */

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::data_types::{CityKey, HospitalAddress, HospitalId, SpecialtyOffering};

/// One `(city, state)` bucket with the hospitals physically located there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityEntry {
    pub name: String,
    pub state: String,
    pub hospital_ids: IndexSet<HospitalId>,
}

/// Mapping `CityKey -> CityEntry` in first-encountered order
pub type CityIndex = IndexMap<CityKey, CityEntry>;

/// One specialty with its category and the cities offering it
///
/// `cities` starts empty: an offering references a hospital, not a city, so
/// the set is populated by the matrix builder once addresses are joined in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialtyEntry {
    pub category: Option<String>,
    pub cities: IndexSet<CityKey>,
}

/// Mapping specialty name -> `SpecialtyEntry` in first-encountered order
pub type SpecialtyIndex = IndexMap<String, SpecialtyEntry>;

/// Group addresses into unique `(city, state)` buckets
///
/// Addresses with missing city/state fields are skipped silently; that is a
/// data-quality signal, not an error condition.
pub fn build_city_index<'a, I>(addresses: I) -> CityIndex
where
    I: IntoIterator<Item = &'a HospitalAddress>,
{
    let mut index = CityIndex::new();

    for addr in addresses {
        let Some(key) = addr.city_key() else {
            debug!("skipping address without city/state for hospital {}", addr.hospital_id);
            continue;
        };

        let entry = index.entry(key).or_insert_with(|| CityEntry {
            name: addr.city_town.clone(),
            state: addr.state.clone(),
            hospital_ids: IndexSet::new(),
        });
        entry.hospital_ids.insert(addr.hospital_id.clone());
    }

    index
}

/// Group available specialty offerings by specialty name
///
/// Two offerings for the same specialty name but different categories: the
/// first-seen category wins. That is a deliberate policy, not an accident of
/// iteration order, and is pinned by a test below.
pub fn build_specialty_index<'a, I>(offerings: I) -> SpecialtyIndex
where
    I: IntoIterator<Item = &'a SpecialtyOffering>,
{
    let mut index = SpecialtyIndex::new();

    for offering in offerings {
        if !offering.is_available {
            continue;
        }

        index.entry(offering.specialty_name.clone()).or_insert_with(|| SpecialtyEntry {
            category: offering.specialty_category.clone(),
            cities: IndexSet::new(),
        });
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::AddressType;

    fn address(id: &str, city: &str, state: &str) -> HospitalAddress {
        HospitalAddress {
            hospital_id: HospitalId(id.to_string()),
            city_town: city.to_string(),
            state: state.to_string(),
            address_type: AddressType::Primary,
        }
    }

    fn offering(id: &str, name: &str, category: Option<&str>, available: bool) -> SpecialtyOffering {
        SpecialtyOffering {
            hospital_id: HospitalId(id.to_string()),
            specialty_name: name.to_string(),
            specialty_category: category.map(String::from),
            is_available: available,
        }
    }

    #[test]
    fn test_city_index_buckets_by_city_and_state() {
        let addresses = vec![
            address("H1", "Pune", "Maharashtra"),
            address("H2", "Pune", "Maharashtra"),
            address("H3", "Pune", "Karnataka"),
        ];

        let index = build_city_index(&addresses);
        assert_eq!(index.len(), 2);

        let pune_mh = &index[&CityKey::new("Pune", "Maharashtra")];
        assert_eq!(pune_mh.hospital_ids.len(), 2);
        let pune_ka = &index[&CityKey::new("Pune", "Karnataka")];
        assert_eq!(pune_ka.hospital_ids.len(), 1);
    }

    #[test]
    fn test_city_index_dedupes_hospital_ids() {
        let addresses = vec![
            address("H1", "Pune", "Maharashtra"),
            address("H1", "Pune", "Maharashtra"),
        ];

        let index = build_city_index(&addresses);
        assert_eq!(index[&CityKey::new("Pune", "Maharashtra")].hospital_ids.len(), 1);
    }

    #[test]
    fn test_city_index_skips_missing_city_or_state() {
        let addresses = vec![
            address("H1", "", "Maharashtra"),
            address("H2", "Pune", ""),
        ];

        let index = build_city_index(&addresses);
        assert!(index.is_empty());
    }

    #[test]
    fn test_city_index_preserves_first_encountered_order() {
        let addresses = vec![
            address("H1", "Nagpur", "Maharashtra"),
            address("H2", "Pune", "Maharashtra"),
            address("H3", "Nagpur", "Maharashtra"),
        ];

        let index = build_city_index(&addresses);
        let keys: Vec<&CityKey> = index.keys().collect();
        assert_eq!(keys[0].as_str(), "Nagpur, Maharashtra");
        assert_eq!(keys[1].as_str(), "Pune, Maharashtra");
    }

    #[test]
    fn test_specialty_index_filters_unavailable() {
        let offerings = vec![
            offering("H1", "Cardiology", Some("Medical"), true),
            offering("H2", "Oncology", Some("Medical"), false),
        ];

        let index = build_specialty_index(&offerings);
        assert_eq!(index.len(), 1);
        assert!(index.contains_key("Cardiology"));
    }

    #[test]
    fn test_specialty_index_first_seen_category_wins() {
        let offerings = vec![
            offering("H1", "Cardiology", Some("Medical"), true),
            offering("H2", "Cardiology", Some("Surgical"), true),
        ];

        let index = build_specialty_index(&offerings);
        assert_eq!(index["Cardiology"].category.as_deref(), Some("Medical"));
    }

    #[test]
    fn test_specialty_index_cities_start_empty() {
        let offerings = vec![offering("H1", "Cardiology", None, true)];
        let index = build_specialty_index(&offerings);
        assert!(index["Cardiology"].cities.is_empty());
    }
}
