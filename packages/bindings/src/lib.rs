use chrono::Local;
use napi::Result as NapiResult;
use napi_derive::napi;

use realty_core::amortization::{self, LoanParameters};
use realty_core::catalog::{self, PropertyRecord, QueryForm, QuerySpec};
use realty_core::consultation::{self, ConsultationForm};
use realty_core::listing::{self, ListingDraft};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Listings to search: the caller's own JSON array, or the built-in sample set.
fn records_or_sample(records_json: Option<String>) -> NapiResult<Vec<PropertyRecord>> {
    match records_json {
        Some(json) => {
            let records: Vec<PropertyRecord> =
                serde_json::from_str(&json).map_err(to_napi_error)?;
            catalog::validate_catalog(&records).map_err(to_napi_error)?;
            Ok(records)
        }
        None => catalog::sample_catalog().map_err(to_napi_error),
    }
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_emi(input_json: String) -> NapiResult<String> {
    let input: LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

fn run_search(spec: &QuerySpec, records_json: Option<String>) -> NapiResult<String> {
    let records = records_or_sample(records_json)?;
    let output = catalog::search(&records, spec).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Query with a typed spec (`property_type`, `status_filter`, `sort_key`, ...).
#[napi]
pub fn query_catalog_spec(spec_json: String, records_json: Option<String>) -> NapiResult<String> {
    let spec = QuerySpec::from_json(&spec_json).map_err(to_napi_error)?;
    run_search(&spec, records_json)
}

/// Query with raw search-form strings (`budget`, `sort_by`, `status`, ...).
#[napi]
pub fn query_catalog_form(form_json: String, records_json: Option<String>) -> NapiResult<String> {
    let form = QueryForm::from_json(&form_json).map_err(to_napi_error)?;
    let spec = form.parse().map_err(to_napi_error)?;
    run_search(&spec, records_json)
}

#[napi]
pub fn find_listing(id: String, records_json: Option<String>) -> NapiResult<Option<String>> {
    let records = records_or_sample(records_json)?;
    catalog::find_by_id(&records, &id)
        .map(|record| serde_json::to_string(record).map_err(to_napi_error))
        .transpose()
}

#[napi]
pub fn sample_catalog() -> NapiResult<String> {
    let records = catalog::sample_catalog().map_err(to_napi_error)?;
    serde_json::to_string(&records).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sell listing
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_listing(input_json: String) -> NapiResult<String> {
    let input: ListingDraft = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = listing::validate_listing(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Consultation
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_consultation(input_json: String) -> NapiResult<String> {
    let input: ConsultationForm = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let today = Local::now().date_naive();
    let output = consultation::validate_consultation(&input, today).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
