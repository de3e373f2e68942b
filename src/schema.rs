/*!
 * Schema definitions for registry CSV extracts
 *
 * Column names for the three extracts served by the hospital registry, as
 * they appear in the export API. The reader resolves columns by name, so
 * extra columns are tolerated and order does not matter; missing required
 * columns are a schema mismatch.
 */

use crate::error::{MatrixError, Result};

/// Hospital master extract schema
pub struct HospitalSchema;

impl HospitalSchema {
    pub const EXTRACT_NAME: &'static str = "hospitals";

    pub fn column_names() -> Vec<&'static str> {
        vec!["id", "name", "hospital_type", "beds_operational"]
    }

    /// Columns without which a record cannot be constructed
    pub fn required_columns() -> Vec<&'static str> {
        vec!["id", "name"]
    }

    pub fn validate_headers(headers: &[String]) -> Result<()> {
        validate(Self::EXTRACT_NAME, &Self::required_columns(), headers)
    }
}

/// Hospital address extract schema
pub struct AddressSchema;

impl AddressSchema {
    pub const EXTRACT_NAME: &'static str = "hospital_addresses";

    pub fn column_names() -> Vec<&'static str> {
        vec!["hospital_id", "city_town", "state", "address_type"]
    }

    pub fn required_columns() -> Vec<&'static str> {
        vec!["hospital_id", "city_town", "state"]
    }

    pub fn validate_headers(headers: &[String]) -> Result<()> {
        validate(Self::EXTRACT_NAME, &Self::required_columns(), headers)
    }
}

/// Specialty offering extract schema
pub struct SpecialtySchema;

impl SpecialtySchema {
    pub const EXTRACT_NAME: &'static str = "specialty_offerings";

    pub fn column_names() -> Vec<&'static str> {
        vec!["hospital_id", "specialty_name", "specialty_category", "is_available"]
    }

    pub fn required_columns() -> Vec<&'static str> {
        vec!["hospital_id", "specialty_name", "is_available"]
    }

    pub fn validate_headers(headers: &[String]) -> Result<()> {
        validate(Self::EXTRACT_NAME, &Self::required_columns(), headers)
    }
}

fn validate(extract: &str, required: &[&str], headers: &[String]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MatrixError::schema_mismatch(extract, missing))
    }
}

/// Find the index of a column by name
pub(crate) fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}
