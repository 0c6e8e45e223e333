use clap::Args;
use serde_json::{json, Value};

use realty_core::catalog::{
    self, find_by_id, ListingStatus, PropertyRecord, QueryForm,
};

use crate::input;
use crate::output::currency::{format_compact, format_inr};

/// Arguments shared by `search`, `buy` and `rent`
#[derive(Args)]
pub struct SearchArgs {
    /// City, area or state (case-insensitive substring)
    #[arg(long)]
    pub location: Option<String>,

    /// residential, commercial, agricultural or industrial
    #[arg(long = "type")]
    pub property_type: Option<String>,

    /// Budget band, e.g. "1000000-5000000" or "10000000+"
    #[arg(long)]
    pub budget: Option<String>,

    /// Minimum price (or monthly rent)
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price (or monthly rent)
    #[arg(long)]
    pub max_price: Option<String>,

    /// Minimum area in sq ft
    #[arg(long)]
    pub min_area: Option<String>,

    /// price-asc, price-desc, area-desc or date-desc (rent-low, rent-high,
    /// area-large, date-new also accepted)
    #[arg(long)]
    pub sort: Option<String>,

    /// For Sale, For Rent, Pending or Sold
    #[arg(long)]
    pub status: Option<String>,

    /// JSON catalog to search instead of the built-in sample listings
    #[arg(long)]
    pub catalog: Option<String>,

    /// Path to JSON/YAML search form (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for showing a single listing
#[derive(Args)]
pub struct ShowArgs {
    /// Listing id
    pub id: String,

    /// JSON catalog to search instead of the built-in sample listings
    #[arg(long)]
    pub catalog: Option<String>,
}

pub fn run_search(
    args: SearchArgs,
    preset: Option<ListingStatus>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_catalog(args.catalog.as_deref())?;

    let mut form = match input::from_file_or_stdin::<QueryForm>(args.input.as_deref())? {
        Some(form) => form,
        None => QueryForm {
            location: args.location,
            property_type: args.property_type,
            budget: args.budget,
            min_price: args.min_price,
            max_price: args.max_price,
            min_area: args.min_area,
            sort_by: args.sort,
            status: args.status,
        },
    };

    if let Some(preset) = preset {
        apply_status_preset(&mut form, preset)?;
    }

    let spec = form.parse()?;
    tracing::debug!(?spec, listings = records.len(), "running catalog query");

    let output = catalog::search(&records, &spec)?;
    let rows: Vec<Value> = output.result.records.iter().map(listing_row).collect();
    tracing::debug!(matched = rows.len(), "catalog query finished");

    let mut value = serde_json::to_value(output)?;
    value["results"] = Value::Array(rows);
    Ok(value)
}

pub fn run_show(args: ShowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_catalog(args.catalog.as_deref())?;
    let record = find_by_id(&records, &args.id)
        .ok_or_else(|| format!("No listing with id '{}'", args.id))?;

    Ok(json!({
        "result": record,
        "formatted": {
            "id": record.id,
            "title": record.title,
            "price": format_inr(record.price),
            "status": record.status.label(),
            "type": record.property_type.label(),
            "address": format!(
                "{}, {}, {} {}",
                record.location.address,
                record.location.city,
                record.location.state,
                record.location.zip
            ),
            "area_sqft": record.specs.sqft,
            "beds": record.specs.beds,
            "baths": record.specs.baths,
            "year_built": record.specs.year_built,
            "listed": record.listed_date.to_string(),
            "features": record.features,
            "agent": format!("{} ({}, {})", record.agent.name, record.agent.phone, record.agent.email),
        },
    }))
}

/// The buy/rent pages pin the status; a conflicting --status is an error.
fn apply_status_preset(
    form: &mut QueryForm,
    preset: ListingStatus,
) -> Result<(), Box<dyn std::error::Error>> {
    let requested = form
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(requested) = requested {
        let status: ListingStatus = requested.parse()?;
        if status != preset {
            return Err(format!(
                "--status {} conflicts with this command, which only lists {} properties",
                status, preset
            )
            .into());
        }
    }

    form.status = Some(preset.label().to_string());
    Ok(())
}

fn load_catalog(path: Option<&str>) -> Result<Vec<PropertyRecord>, Box<dyn std::error::Error>> {
    let records = match path {
        Some(path) => {
            let records: Vec<PropertyRecord> = input::file::read_input(path)?;
            catalog::validate_catalog(&records)?;
            records
        }
        None => catalog::sample_catalog()?,
    };
    tracing::debug!(listings = records.len(), custom = path.is_some(), "loaded catalog");
    Ok(records)
}

/// One line per hit for table and CSV output.
fn listing_row(record: &PropertyRecord) -> Value {
    json!({
        "id": record.id,
        "title": record.title,
        "city": record.location.city,
        "type": record.property_type.label(),
        "status": record.status.label(),
        "price": format_compact(record.price),
        "sqft": record.specs.sqft,
        "listed": record.listed_date.to_string(),
    })
}
