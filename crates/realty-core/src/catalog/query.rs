use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use std::time::Instant;

use super::record::{normalize, ListingStatus, PropertyRecord, PropertyType};
use crate::error::RealtyError;
use crate::types::{with_metadata, ComputationOutput, Money, PRECISION_DECIMAL};
use crate::RealtyResult;

/// Result ordering. Every key breaks ties by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    AreaDesc,
    DateDesc,
}

impl SortKey {
    pub fn compare(self, a: &PropertyRecord, b: &PropertyRecord) -> Ordering {
        let primary = match self {
            SortKey::PriceAsc => a.price.cmp(&b.price),
            SortKey::PriceDesc => b.price.cmp(&a.price),
            SortKey::AreaDesc => b.specs.sqft.cmp(&a.specs.sqft),
            SortKey::DateDesc => b.listed_date.cmp(&a.listed_date),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Accepts the camelCase keys plus the rent page's select values
/// ("rent-low", "rent-high", "area-large", "date-new").
impl FromStr for SortKey {
    type Err = RealtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "priceasc" | "pricelow" | "rentlow" | "lowtohigh" => Ok(SortKey::PriceAsc),
            "pricedesc" | "pricehigh" | "renthigh" | "hightolow" => Ok(SortKey::PriceDesc),
            "areadesc" | "arealarge" | "largest" => Ok(SortKey::AreaDesc),
            "datedesc" | "datenew" | "newest" => Ok(SortKey::DateDesc),
            _ => Err(RealtyError::invalid_query(
                "sort_by",
                s,
                "expected one of: price-asc, price-desc, area-desc, date-desc",
            )),
        }
    }
}

impl TryFrom<String> for SortKey {
    type Error = RealtyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Inclusive price bounds. `max: None` is open-ended ("₹1Cr+").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceRange {
    pub min: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Money>,
}

impl PriceRange {
    pub fn between(min: Money, max: Money) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn at_least(min: Money) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, price: Money) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }

    pub fn validate(&self) -> RealtyResult<()> {
        if self.min < Decimal::ZERO {
            return Err(RealtyError::invalid_query(
                "price_range",
                self.to_string(),
                "minimum price must not be negative",
            ));
        }
        if let Some(max) = self.max {
            if max < self.min {
                return Err(RealtyError::invalid_query(
                    "price_range",
                    self.to_string(),
                    "maximum price is below the minimum",
                ));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

/// Parses budget select values: "1000000-5000000" or "10000000+".
impl FromStr for PriceRange {
    type Err = RealtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | ',' | '₹'))
            .collect();

        let range = if let Some(min) = cleaned.strip_suffix('+') {
            PriceRange::at_least(parse_money("budget", s, min)?)
        } else if let Some((min, max)) = cleaned.split_once('-') {
            PriceRange::between(
                parse_money("budget", s, min)?,
                parse_money("budget", s, max)?,
            )
        } else {
            return Err(RealtyError::invalid_query(
                "budget",
                s,
                "expected \"<min>-<max>\" or \"<min>+\"",
            ));
        };

        range.validate()?;
        Ok(range)
    }
}

/// Typed filter and sort criteria. Every `None` means "don't filter".
///
/// Deserialization goes through a raw-string wire shape, so unknown keys and
/// unknown enum strings are rejected rather than dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuerySpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_substring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_area_sqft: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<SortKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<ListingStatus>,
}

/// Wire shape of a `QuerySpec`, with enum fields still as raw strings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuerySpecFields {
    #[serde(default)]
    location_substring: Option<String>,
    #[serde(default)]
    property_type: Option<String>,
    #[serde(default)]
    price_range: Option<PriceRange>,
    #[serde(default)]
    min_area_sqft: Option<u32>,
    #[serde(default)]
    sort_key: Option<String>,
    #[serde(default)]
    status_filter: Option<String>,
}

impl QuerySpecFields {
    fn into_spec(self) -> RealtyResult<QuerySpec> {
        let spec = QuerySpec {
            location_substring: self.location_substring,
            property_type: parse_field("property_type", self.property_type.as_deref())?,
            price_range: self.price_range,
            min_area_sqft: self.min_area_sqft,
            sort_key: parse_field("sort_key", self.sort_key.as_deref())?,
            status_filter: parse_field("status_filter", self.status_filter.as_deref())?,
        };
        spec.validate()?;
        Ok(spec)
    }
}

impl<'de> Deserialize<'de> for QuerySpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        QuerySpecFields::deserialize(deserializer)?
            .into_spec()
            .map_err(serde::de::Error::custom)
    }
}

impl QuerySpec {
    /// The buy page: everything currently for sale.
    pub fn for_sale() -> Self {
        Self {
            status_filter: Some(ListingStatus::ForSale),
            ..Self::default()
        }
    }

    /// The rent page: everything currently for rent.
    pub fn for_rent() -> Self {
        Self {
            status_filter: Some(ListingStatus::ForRent),
            ..Self::default()
        }
    }

    /// Parse a typed spec from JSON.
    ///
    /// Unknown keys, unknown enum strings and bad price ranges all come back
    /// as `InvalidQuerySpec`; only malformed JSON is a `Serialization` error.
    pub fn from_json(json: &str) -> RealtyResult<Self> {
        let fields: QuerySpecFields =
            serde_json::from_str(json).map_err(|e| query_json_error("spec", json, e))?;
        fields.into_spec()
    }

    pub fn validate(&self) -> RealtyResult<()> {
        if let Some(range) = &self.price_range {
            range.validate()?;
        }
        Ok(())
    }

    fn location_needle(&self) -> Option<&str> {
        self.location_substring
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// True when `record` passes every filter that is set.
    pub fn matches(&self, record: &PropertyRecord) -> bool {
        if self.status_filter.is_some_and(|s| s != record.status) {
            return false;
        }
        if self.property_type.is_some_and(|t| t != record.property_type) {
            return false;
        }
        if let Some(needle) = self.location_needle() {
            if !record.location.matches(needle) {
                return false;
            }
        }
        if let Some(range) = &self.price_range {
            if !range.contains(record.price) {
                return false;
            }
        }
        if self.min_area_sqft.is_some_and(|min| record.specs.sqft < min) {
            return false;
        }
        true
    }
}

/// Search form values as submitted. Blank strings are treated as unset;
/// unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryForm {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    /// Budget select value: "<min>-<max>" or "<min>+"
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub min_area: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl QueryForm {
    /// Read form values from JSON, reporting unknown keys as `InvalidQuerySpec`.
    pub fn from_json(json: &str) -> RealtyResult<Self> {
        serde_json::from_str(json).map_err(|e| query_json_error("form", json, e))
    }

    /// Parse the raw form values into a `QuerySpec`.
    ///
    /// Unknown enum strings fail with `InvalidQuerySpec` instead of silently
    /// matching nothing.
    pub fn parse(&self) -> RealtyResult<QuerySpec> {
        let property_type = non_blank(&self.property_type)
            .map(str::parse::<PropertyType>)
            .transpose()?;
        let status_filter = non_blank(&self.status)
            .map(str::parse::<ListingStatus>)
            .transpose()?;
        let sort_key = non_blank(&self.sort_by)
            .map(str::parse::<SortKey>)
            .transpose()?;

        let min_area_sqft = non_blank(&self.min_area)
            .map(|raw| {
                raw.replace(',', "").trim().parse::<u32>().map_err(|_| {
                    RealtyError::invalid_query("min_area", raw, "expected a whole number of sq ft")
                })
            })
            .transpose()?;

        let price_range = self.price_range()?;

        Ok(QuerySpec {
            location_substring: non_blank(&self.location).map(str::to_string),
            property_type,
            price_range,
            min_area_sqft,
            sort_key,
            status_filter,
        })
    }

    fn price_range(&self) -> RealtyResult<Option<PriceRange>> {
        let budget = non_blank(&self.budget);
        let min = non_blank(&self.min_price);
        let max = non_blank(&self.max_price);

        if let Some(budget) = budget {
            if min.is_some() || max.is_some() {
                return Err(RealtyError::invalid_query(
                    "budget",
                    budget,
                    "cannot be combined with min_price / max_price",
                ));
            }
            return budget.parse::<PriceRange>().map(Some);
        }

        let range = match (min, max) {
            (None, None) => return Ok(None),
            (Some(min), None) => PriceRange::at_least(parse_money("min_price", min, min)?),
            (None, Some(max)) => {
                PriceRange::between(Decimal::ZERO, parse_money("max_price", max, max)?)
            }
            (Some(min), Some(max)) => PriceRange::between(
                parse_money("min_price", min, min)?,
                parse_money("max_price", max, max)?,
            ),
        };
        range.validate()?;
        Ok(Some(range))
    }
}

/// Filter then sort. Returns borrowed records; the input is never reordered.
pub fn query<'a>(
    records: &'a [PropertyRecord],
    spec: &QuerySpec,
) -> RealtyResult<Vec<&'a PropertyRecord>> {
    spec.validate()?;

    let mut hits: Vec<&PropertyRecord> = records.iter().filter(|r| spec.matches(r)).collect();
    if let Some(key) = spec.sort_key {
        hits.sort_by(|a, b| key.compare(a, b));
    }
    Ok(hits)
}

/// Parse a raw search form and run it.
pub fn query_form<'a>(
    records: &'a [PropertyRecord],
    form: &QueryForm,
) -> RealtyResult<Vec<&'a PropertyRecord>> {
    let spec = form.parse()?;
    query(records, &spec)
}

/// Look up a single listing for the details view.
pub fn find_by_id<'a>(records: &'a [PropertyRecord], id: &str) -> Option<&'a PropertyRecord> {
    records.iter().find(|r| r.id == id)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    pub total_matched: usize,
    pub total_listings: usize,
    pub records: Vec<PropertyRecord>,
}

/// Run a query and wrap the owned results in the standard output envelope.
pub fn search(
    records: &[PropertyRecord],
    spec: &QuerySpec,
) -> RealtyResult<ComputationOutput<CatalogPage>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let hits = query(records, spec)?;
    if hits.is_empty() {
        warnings.push("No listings match the query; try widening the filters".into());
    }
    if spec.status_filter == Some(ListingStatus::ForRent) && spec.price_range.is_some() {
        warnings.push("For Rent prices are monthly rents".into());
    }

    let page = CatalogPage {
        total_matched: hits.len(),
        total_listings: records.len(),
        records: hits.into_iter().cloned().collect(),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Conjunctive filter then stable sort (ties by id)",
        spec,
        warnings,
        elapsed,
        PRECISION_DECIMAL,
        page,
    ))
}

/// Parse an optional enum field, reporting failures under `field`.
fn parse_field<T>(field: &str, raw: Option<&str>) -> RealtyResult<Option<T>>
where
    T: FromStr<Err = RealtyError>,
{
    raw.map(|value| {
        value.parse::<T>().map_err(|e| match e {
            RealtyError::InvalidQuerySpec { value, reason, .. } => {
                RealtyError::invalid_query(field, value, reason)
            }
            other => other,
        })
    })
    .transpose()
}

/// Data errors (unknown keys, wrong types, rejected enum strings) are query
/// errors; syntax errors stay `Serialization`.
fn query_json_error(field: &str, json: &str, e: serde_json::Error) -> RealtyError {
    if e.is_data() {
        RealtyError::invalid_query(field, json.trim(), e.to_string())
    } else {
        RealtyError::from(e)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_money(field: &str, raw: &str, digits: &str) -> RealtyResult<Money> {
    let cleaned: String = digits
        .chars()
        .filter(|c| !matches!(c, ' ' | ',' | '₹'))
        .collect();
    Decimal::from_str(&cleaned)
        .map_err(|_| RealtyError::invalid_query(field, raw, "expected an amount in rupees"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_catalog;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn ids(hits: &[&PropertyRecord]) -> Vec<String> {
        hits.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_empty_spec_returns_everything_in_order() {
        let records = sample_catalog().unwrap();
        let hits = query(&records, &QuerySpec::default()).unwrap();
        assert_eq!(ids(&hits), ["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    }

    #[test]
    fn test_rent_preset() {
        let records = sample_catalog().unwrap();
        let hits = query(&records, &QuerySpec::for_rent()).unwrap();
        assert_eq!(ids(&hits), ["6", "9"]);
    }

    #[test]
    fn test_location_matches_city_address_or_state() {
        let records = sample_catalog().unwrap();
        let spec = QuerySpec {
            location_substring: Some("maharashtra".into()),
            ..QuerySpec::default()
        };
        assert_eq!(ids(&query(&records, &spec).unwrap()), ["1", "2", "8", "9"]);

        let spec = QuerySpec {
            location_substring: Some("airport".into()),
            ..QuerySpec::default()
        };
        assert_eq!(ids(&query(&records, &spec).unwrap()), ["7"]);
    }

    #[test]
    fn test_blank_location_is_ignored() {
        let records = sample_catalog().unwrap();
        let spec = QuerySpec {
            location_substring: Some("   ".into()),
            ..QuerySpec::default()
        };
        assert_eq!(query(&records, &spec).unwrap().len(), 9);
    }

    #[test]
    fn test_price_range_inclusive_and_open_ended() {
        let records = sample_catalog().unwrap();
        let spec = QuerySpec {
            price_range: Some(PriceRange::between(dec!(2800000), dec!(5500000))),
            ..QuerySpec::default()
        };
        assert_eq!(ids(&query(&records, &spec).unwrap()), ["1", "2", "7"]);

        let spec = QuerySpec {
            price_range: Some(PriceRange::at_least(dec!(10000000))),
            ..QuerySpec::default()
        };
        assert_eq!(ids(&query(&records, &spec).unwrap()), ["3", "5"]);
    }

    #[test]
    fn test_min_area_and_type_combine() {
        let records = sample_catalog().unwrap();
        let spec = QuerySpec {
            property_type: Some(PropertyType::Residential),
            min_area_sqft: Some(2500),
            ..QuerySpec::default()
        };
        assert_eq!(ids(&query(&records, &spec).unwrap()), ["1", "5"]);
    }

    #[test]
    fn test_sort_keys() {
        let records = sample_catalog().unwrap();
        let sorted = |key| {
            let spec = QuerySpec {
                sort_key: Some(key),
                ..QuerySpec::default()
            };
            ids(&query(&records, &spec).unwrap())
        };
        assert_eq!(
            sorted(SortKey::PriceAsc),
            ["9", "6", "2", "7", "1", "8", "4", "3", "5"]
        );
        assert_eq!(
            sorted(SortKey::PriceDesc),
            ["5", "3", "4", "8", "1", "7", "2", "6", "9"]
        );
        assert_eq!(
            sorted(SortKey::AreaDesc),
            ["2", "4", "3", "5", "8", "1", "6", "9", "7"]
        );
        assert_eq!(
            sorted(SortKey::DateDesc),
            ["9", "8", "7", "6", "5", "4", "3", "2", "1"]
        );
    }

    #[test]
    fn test_ties_break_by_id() {
        let mut records = sample_catalog().unwrap();
        records.truncate(3);
        for r in &mut records {
            r.price = dec!(1000);
        }
        records.reverse();
        let spec = QuerySpec {
            sort_key: Some(SortKey::PriceDesc),
            ..QuerySpec::default()
        };
        assert_eq!(ids(&query(&records, &spec).unwrap()), ["1", "2", "3"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let records = sample_catalog().unwrap();
        let spec = QuerySpec {
            property_type: Some(PropertyType::Industrial),
            location_substring: Some("Nonexistent City".into()),
            ..QuerySpec::default()
        };
        assert!(query(&records, &spec).unwrap().is_empty());
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let records = sample_catalog().unwrap();
        let spec = QuerySpec {
            price_range: Some(PriceRange::between(dec!(500), dec!(100))),
            ..QuerySpec::default()
        };
        assert!(matches!(
            query(&records, &spec),
            Err(RealtyError::InvalidQuerySpec { .. })
        ));
    }

    #[test]
    fn test_budget_strings() {
        assert_eq!(
            "0-1000000".parse::<PriceRange>().unwrap(),
            PriceRange::between(dec!(0), dec!(1000000))
        );
        assert_eq!(
            "10000000+".parse::<PriceRange>().unwrap(),
            PriceRange::at_least(dec!(10000000))
        );
        assert_eq!(
            "₹10,00,000 - ₹50,00,000".parse::<PriceRange>().unwrap(),
            PriceRange::between(dec!(1000000), dec!(5000000))
        );
        assert!("cheap".parse::<PriceRange>().is_err());
        assert!("5000-100".parse::<PriceRange>().is_err());
        assert_eq!(PriceRange::at_least(dec!(5)).to_string(), "5+");
    }

    #[test]
    fn test_sort_key_parses_rent_page_values() {
        assert_eq!("rent-low".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!("rent-high".parse::<SortKey>().unwrap(), SortKey::PriceDesc);
        assert_eq!("area-large".parse::<SortKey>().unwrap(), SortKey::AreaDesc);
        assert_eq!("date-new".parse::<SortKey>().unwrap(), SortKey::DateDesc);
        assert_eq!("priceAsc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_form_parse_full() {
        let form = QueryForm {
            location: Some(" Mumbai ".into()),
            property_type: Some("commercial".into()),
            min_price: Some("10,000".into()),
            max_price: Some("50000".into()),
            min_area: Some("1,000".into()),
            sort_by: Some("rent-high".into()),
            status: Some("For Rent".into()),
            ..QueryForm::default()
        };
        let spec = form.parse().unwrap();
        assert_eq!(
            spec,
            QuerySpec {
                location_substring: Some("Mumbai".into()),
                property_type: Some(PropertyType::Commercial),
                price_range: Some(PriceRange::between(dec!(10000), dec!(50000))),
                min_area_sqft: Some(1000),
                sort_key: Some(SortKey::PriceDesc),
                status_filter: Some(ListingStatus::ForRent),
            }
        );
        let records = sample_catalog().unwrap();
        assert_eq!(ids(&query_form(&records, &form).unwrap()), ["9"]);
    }

    #[test]
    fn test_form_blank_fields_are_unset() {
        let form = QueryForm {
            location: Some(String::new()),
            property_type: Some("  ".into()),
            sort_by: Some(String::new()),
            ..QueryForm::default()
        };
        assert_eq!(form.parse().unwrap(), QuerySpec::default());
    }

    #[test]
    fn test_form_rejects_typo_in_type() {
        let form = QueryForm {
            property_type: Some("residental".into()),
            ..QueryForm::default()
        };
        match form.parse().unwrap_err() {
            RealtyError::InvalidQuerySpec { field, value, .. } => {
                assert_eq!(field, "property_type");
                assert_eq!(value, "residental");
            }
            other => panic!("expected InvalidQuerySpec, got {other:?}"),
        }
    }

    #[test]
    fn test_form_rejects_budget_with_bounds() {
        let form = QueryForm {
            budget: Some("0-1000000".into()),
            min_price: Some("5".into()),
            ..QueryForm::default()
        };
        assert!(form.parse().is_err());
    }

    #[test]
    fn test_form_max_only_and_bad_area() {
        let form = QueryForm {
            max_price: Some("50000".into()),
            ..QueryForm::default()
        };
        let spec = form.parse().unwrap();
        assert_eq!(spec.price_range, Some(PriceRange::between(dec!(0), dec!(50000))));

        let form = QueryForm {
            min_area: Some("big".into()),
            ..QueryForm::default()
        };
        assert!(matches!(
            form.parse(),
            Err(RealtyError::InvalidQuerySpec { field, .. }) if field == "min_area"
        ));
    }

    #[test]
    fn test_spec_json_accepts_lenient_enums() {
        let spec = QuerySpec::from_json(
            r#"{"property_type":"residential","status_filter":"for-sale","sort_key":"price-desc",
                "price_range":{"min":"1000000"}}"#,
        )
        .unwrap();
        assert_eq!(spec.property_type, Some(PropertyType::Residential));
        assert_eq!(spec.status_filter, Some(ListingStatus::ForSale));
        assert_eq!(spec.sort_key, Some(SortKey::PriceDesc));
        assert_eq!(spec.price_range, Some(PriceRange::at_least(dec!(1000000))));
    }

    #[test]
    fn test_spec_json_unknown_enum_names_the_field() {
        let cases = [
            (r#"{"property_type":"residental"}"#, "property_type", "residental"),
            (r#"{"status_filter":"For Rnt"}"#, "status_filter", "For Rnt"),
            (r#"{"sort_key":"popularity"}"#, "sort_key", "popularity"),
        ];
        for (json, expected_field, expected_value) in cases {
            match QuerySpec::from_json(json).unwrap_err() {
                RealtyError::InvalidQuerySpec { field, value, .. } => {
                    assert_eq!(field, expected_field);
                    assert_eq!(value, expected_value);
                }
                other => panic!("expected InvalidQuerySpec, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_spec_json_rejects_unknown_keys_and_bad_ranges() {
        for json in [
            r#"{"propertyType":"residential"}"#,
            r#"{"type":"residential"}"#,
            r#"{"price_range":{"min":"500","max":"100"}}"#,
            r#"{"price_range":{"min":"0","mx":"100"}}"#,
        ] {
            assert!(
                matches!(
                    QuerySpec::from_json(json),
                    Err(RealtyError::InvalidQuerySpec { .. })
                ),
                "{json} should be rejected"
            );
        }
        assert!(matches!(
            QuerySpec::from_json("{not json"),
            Err(RealtyError::Serialization(_))
        ));
    }

    #[test]
    fn test_spec_serde_round_trip_keeps_labels() {
        let spec = QuerySpec {
            sort_key: Some(SortKey::AreaDesc),
            status_filter: Some(ListingStatus::ForRent),
            ..QuerySpec::default()
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"sort_key":"areaDesc","status_filter":"For Rent"}"#);
        let back: QuerySpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_form_json_rejects_unknown_keys() {
        let form = QueryForm::from_json(r#"{"property_type":"commercial","sort_by":"rent-low"}"#)
            .unwrap();
        assert_eq!(form.property_type.as_deref(), Some("commercial"));

        match QueryForm::from_json(r#"{"propertyType":"commercial"}"#).unwrap_err() {
            RealtyError::InvalidQuerySpec { field, reason, .. } => {
                assert_eq!(field, "form");
                assert!(reason.contains("propertyType"));
            }
            other => panic!("expected InvalidQuerySpec, got {other:?}"),
        }
    }

    #[test]
    fn test_find_by_id() {
        let records = sample_catalog().unwrap();
        assert_eq!(find_by_id(&records, "5").unwrap().location.city, "Goa");
        assert!(find_by_id(&records, "42").is_none());
    }

    #[test]
    fn test_search_envelope() {
        let records = sample_catalog().unwrap();
        let out = search(&records, &QuerySpec::for_rent()).unwrap();
        assert_eq!(out.result.total_matched, 2);
        assert_eq!(out.result.total_listings, 9);
        assert!(out.warnings.is_empty());
        assert_eq!(out.assumptions["status_filter"], "For Rent");

        let spec = QuerySpec {
            location_substring: Some("Atlantis".into()),
            ..QuerySpec::default()
        };
        let out = search(&records, &spec).unwrap();
        assert_eq!(out.result.total_matched, 0);
        assert_eq!(out.warnings.len(), 1);
    }
}
