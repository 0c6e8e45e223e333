use clap::Args;
use serde_json::{json, Value};

use realty_core::listing::{validate_listing, ContactDetails, ListingDraft};

use crate::input;
use crate::output::currency::format_inr;

/// Arguments for validating a sell-property listing
#[derive(Args)]
pub struct ListingArgs {
    /// residential, commercial, agricultural or industrial
    #[arg(long = "type")]
    pub property_type: Option<String>,

    /// City, area or locality
    #[arg(long)]
    pub location: Option<String>,

    /// Total area in sq ft
    #[arg(long)]
    pub area: Option<String>,

    /// Expected price in rupees
    #[arg(long)]
    pub price: Option<String>,

    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,

    /// Contact name
    #[arg(long)]
    pub name: Option<String>,

    /// Contact phone
    #[arg(long)]
    pub phone: Option<String>,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,

    /// Path to JSON/YAML listing draft (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_list_draft(args: ListingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let draft = match input::from_file_or_stdin::<ListingDraft>(args.input.as_deref())? {
        Some(draft) => draft,
        None => ListingDraft {
            property_type: args.property_type.unwrap_or_default(),
            location: args.location.unwrap_or_default(),
            area: args.area.unwrap_or_default(),
            expected_price: args.price.unwrap_or_default(),
            description: args.description.unwrap_or_default(),
            contact: ContactDetails {
                name: args.name.unwrap_or_default(),
                phone: args.phone.unwrap_or_default(),
                email: args.email.unwrap_or_default(),
            },
        },
    };

    let output = validate_listing(&draft)?;
    tracing::debug!(
        property_type = %output.result.property_type,
        area_sqft = output.result.area_sqft,
        "listing draft accepted"
    );

    let formatted = json!({
        "property_type": output.result.property_type.label(),
        "location": output.result.location,
        "area_sqft": output.result.area_sqft,
        "expected_price": format_inr(output.result.expected_price),
        "price_per_sqft": format_inr(output.result.price_per_sqft),
        "contact": output.result.contact.name,
    });

    let mut value = serde_json::to_value(output)?;
    value["formatted"] = formatted;
    Ok(value)
}
