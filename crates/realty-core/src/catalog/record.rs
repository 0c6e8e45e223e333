use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::RealtyError;
use crate::types::Money;
use crate::RealtyResult;

/// Market status of a listing. Serializes as the display label and
/// deserializes through the same lenient parser as `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ListingStatus {
    #[serde(rename = "For Sale")]
    ForSale,
    #[serde(rename = "For Rent")]
    ForRent,
    Pending,
    Sold,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 4] = [
        ListingStatus::ForSale,
        ListingStatus::ForRent,
        ListingStatus::Pending,
        ListingStatus::Sold,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ListingStatus::ForSale => "For Sale",
            ListingStatus::ForRent => "For Rent",
            ListingStatus::Pending => "Pending",
            ListingStatus::Sold => "Sold",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts "For Sale", "for-sale", "for_sale", "forsale" and so on.
impl FromStr for ListingStatus {
    type Err = RealtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "forsale" | "sale" | "buy" => Ok(ListingStatus::ForSale),
            "forrent" | "rent" => Ok(ListingStatus::ForRent),
            "pending" => Ok(ListingStatus::Pending),
            "sold" => Ok(ListingStatus::Sold),
            _ => Err(RealtyError::invalid_query(
                "status",
                s,
                "expected one of: For Sale, For Rent, Pending, Sold",
            )),
        }
    }
}

impl TryFrom<String> for ListingStatus {
    type Error = RealtyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Land-use category of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PropertyType {
    Residential,
    Commercial,
    Agricultural,
    Industrial,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Residential,
        PropertyType::Commercial,
        PropertyType::Agricultural,
        PropertyType::Industrial,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PropertyType::Residential => "Residential",
            PropertyType::Commercial => "Commercial",
            PropertyType::Agricultural => "Agricultural",
            PropertyType::Industrial => "Industrial",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PropertyType {
    type Err = RealtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "residential" => Ok(PropertyType::Residential),
            "commercial" => Ok(PropertyType::Commercial),
            "agricultural" => Ok(PropertyType::Agricultural),
            "industrial" => Ok(PropertyType::Industrial),
            _ => Err(RealtyError::invalid_query(
                "property_type",
                s,
                "expected one of: residential, commercial, agricultural, industrial",
            )),
        }
    }
}

impl TryFrom<String> for PropertyType {
    type Error = RealtyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// (latitude, longitude)
    pub coordinates: (f64, f64),
}

impl Location {
    /// Case-insensitive match against city, address or state.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.city, &self.address, &self.state]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpecs {
    pub beds: u32,
    pub baths: u32,
    pub sqft: u32,
    pub year_built: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(rename = "photo")]
    pub photo_uri: String,
}

/// A single catalog listing. Never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: String,
    pub title: String,
    /// Sale price, or monthly rent for `ForRent` listings
    pub price: Money,
    pub location: Location,
    pub specs: PropertySpecs,
    pub images: Vec<String>,
    pub description: String,
    pub features: Vec<String>,
    pub agent: Agent,
    #[serde(rename = "listed")]
    pub listed_date: NaiveDate,
    pub status: ListingStatus,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

impl PropertyRecord {
    pub fn validate(&self) -> RealtyResult<()> {
        if self.id.trim().is_empty() {
            return Err(RealtyError::invalid_input("id", "listing id must not be blank"));
        }
        if self.images.is_empty() {
            return Err(RealtyError::invalid_input(
                "images",
                format!("listing {} has no images", self.id),
            ));
        }
        if self.price < Money::ZERO {
            return Err(RealtyError::invalid_input(
                "price",
                format!("listing {} has a negative price", self.id),
            ));
        }
        Ok(())
    }
}

/// Checks every record and that ids are unique.
pub fn validate_catalog(records: &[PropertyRecord]) -> RealtyResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        record.validate()?;
        if !seen.insert(record.id.as_str()) {
            return Err(RealtyError::invalid_input(
                "id",
                format!("duplicate listing id {}", record.id),
            ));
        }
    }
    Ok(())
}

/// Lowercase and drop separators so UI values like "For-Sale" parse.
pub(crate) fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_ui_spellings() {
        for s in ["For Sale", "for-sale", "FOR_SALE", "forsale"] {
            assert_eq!(s.parse::<ListingStatus>().unwrap(), ListingStatus::ForSale);
        }
        assert_eq!("For Rent".parse::<ListingStatus>().unwrap(), ListingStatus::ForRent);
        assert_eq!("sold".parse::<ListingStatus>().unwrap(), ListingStatus::Sold);
    }

    #[test]
    fn test_unknown_status_is_invalid_query() {
        let err = "leased".parse::<ListingStatus>().unwrap_err();
        match err {
            RealtyError::InvalidQuerySpec { field, value, .. } => {
                assert_eq!(field, "status");
                assert_eq!(value, "leased");
            }
            other => panic!("expected InvalidQuerySpec, got {other:?}"),
        }
    }

    #[test]
    fn test_property_type_parses_select_values() {
        for t in PropertyType::ALL {
            let lower = t.label().to_lowercase();
            assert_eq!(lower.parse::<PropertyType>().unwrap(), t);
            assert_eq!(t.label().parse::<PropertyType>().unwrap(), t);
        }
        assert!("residental".parse::<PropertyType>().is_err());
        assert!("".parse::<PropertyType>().is_err());
    }

    #[test]
    fn test_status_serde_uses_display_labels() {
        let json = serde_json::to_string(&ListingStatus::ForRent).unwrap();
        assert_eq!(json, "\"For Rent\"");
        let back: ListingStatus = serde_json::from_str("\"For Sale\"").unwrap();
        assert_eq!(back, ListingStatus::ForSale);
        for s in ListingStatus::ALL {
            assert_eq!(s.to_string(), s.label());
        }
    }

    #[test]
    fn test_enum_deserialize_uses_lenient_parser() {
        let status: ListingStatus = serde_json::from_str("\"for-rent\"").unwrap();
        assert_eq!(status, ListingStatus::ForRent);
        let kind: PropertyType = serde_json::from_str("\"commercial\"").unwrap();
        assert_eq!(kind, PropertyType::Commercial);

        let err = serde_json::from_str::<PropertyType>("\"residental\"").unwrap_err();
        assert!(err.to_string().contains("property_type"));
        assert_eq!(
            serde_json::to_string(&PropertyType::Commercial).unwrap(),
            "\"Commercial\""
        );
    }

    #[test]
    fn test_location_matches_any_field_case_insensitive() {
        let loc = Location {
            address: "Tech Park Plaza".into(),
            city: "Bangalore".into(),
            state: "Karnataka".into(),
            zip: "560001".into(),
            coordinates: (12.9716, 77.5946),
        };
        assert!(loc.matches("bangalore"));
        assert!(loc.matches("TECH PARK"));
        assert!(loc.matches("karna"));
        assert!(!loc.matches("Mumbai"));
    }
}
