use super::record::{validate_catalog, PropertyRecord};
use crate::RealtyResult;

const SAMPLE_CATALOG_JSON: &str = include_str!("../../data/sample_catalog.json");

/// The nine showcase listings the brokerage site ships with.
pub fn sample_catalog() -> RealtyResult<Vec<PropertyRecord>> {
    let records: Vec<PropertyRecord> = serde_json::from_str(SAMPLE_CATALOG_JSON)?;
    validate_catalog(&records)?;
    Ok(records)
}
