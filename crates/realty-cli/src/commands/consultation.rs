use chrono::Local;
use clap::Args;
use serde_json::{json, Value};

use realty_core::consultation::{validate_consultation, ConsultationForm};
use realty_core::listing::ContactDetails;

use crate::input;

/// Arguments for a consultation request
#[derive(Args)]
pub struct ConsultArgs {
    /// expert or legal
    #[arg(long, default_value = "expert")]
    pub service: String,

    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// residential, commercial, agricultural or industrial
    #[arg(long = "type")]
    pub property_type: Option<String>,

    /// buying, selling, renting or investment
    #[arg(long)]
    pub topic: Option<String>,

    /// Requirements in free text
    #[arg(long)]
    pub message: Option<String>,

    /// Preferred date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// morning, afternoon, evening or night
    #[arg(long)]
    pub time: Option<String>,

    /// Path to JSON/YAML consultation form (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_consult(args: ConsultArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let form = match input::from_file_or_stdin::<ConsultationForm>(args.input.as_deref())? {
        Some(form) => form,
        None => ConsultationForm {
            service: args.service,
            contact: ContactDetails {
                name: args.name.unwrap_or_default(),
                phone: args.phone.unwrap_or_default(),
                email: args.email.unwrap_or_default(),
            },
            property_type: args.property_type.unwrap_or_default(),
            consultation_type: args.topic.unwrap_or_default(),
            message: args.message.unwrap_or_default(),
            preferred_date: args.date.unwrap_or_default(),
            preferred_time: args.time.unwrap_or_default(),
        },
    };

    let today = Local::now().date_naive();
    let output = validate_consultation(&form, today)?;
    tracing::debug!(service = ?output.result.service, "consultation request accepted");

    let request = &output.result;
    let formatted = json!({
        "service": output.methodology,
        "name": request.contact.name,
        "phone": request.contact.phone,
        "email": request.contact.email,
        "property_type": request.property_type.map(|t| t.label()),
        "preferred_date": request.preferred_date.map(|d| d.format("%d %b %Y").to_string()),
        "preferred_time": request.preferred_time.map(|t| t.label()),
        "next_step": "An expert will contact you within 24 hours",
    });

    let mut value = serde_json::to_value(output)?;
    value["formatted"] = formatted;
    Ok(value)
}
