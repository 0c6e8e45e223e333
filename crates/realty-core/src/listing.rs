use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

use crate::catalog::PropertyType;
use crate::error::RealtyError;
use crate::types::{with_metadata, ComputationOutput, Money, PRECISION_DECIMAL};
use crate::RealtyResult;

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

/// Position in the sell-property flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PropertyDetails,
    ContactDetails,
    Submitted,
}

impl WizardStep {
    /// 1-based index as shown in the progress bar.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::PropertyDetails => 1,
            WizardStep::ContactDetails => 2,
            WizardStep::Submitted => 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Raw sell-form values, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDraft {
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub location: String,
    /// Total area in sq ft
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub expected_price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact: ContactDetails,
}

/// A validated listing, ready to hand to an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSubmission {
    pub property_type: PropertyType,
    pub location: String,
    pub area_sqft: u32,
    pub expected_price: Money,
    pub price_per_sqft: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub contact: ContactDetails,
}

/// Three-step sell flow: property details, contact details, submitted.
///
/// Each `advance` validates only the fields belonging to the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingWizard {
    step: WizardStep,
}

impl Default for ListingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::PropertyDetails,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn advance(&mut self, draft: &ListingDraft) -> RealtyResult<WizardStep> {
        self.step = match self.step {
            WizardStep::PropertyDetails => {
                validate_property_details(draft)?;
                WizardStep::ContactDetails
            }
            WizardStep::ContactDetails => {
                validate_contact(&draft.contact)?;
                WizardStep::Submitted
            }
            WizardStep::Submitted => {
                return Err(RealtyError::invalid_input(
                    "step",
                    "listing already submitted",
                ))
            }
        };
        Ok(self.step)
    }

    /// Step back one screen. No-op on the first step and once submitted.
    pub fn back(&mut self) -> WizardStep {
        if self.step == WizardStep::ContactDetails {
            self.step = WizardStep::PropertyDetails;
        }
        self.step
    }

    /// Build the submission. Only valid once the wizard reached `Submitted`.
    pub fn finish(&self, draft: &ListingDraft) -> RealtyResult<ListingSubmission> {
        if self.step != WizardStep::Submitted {
            return Err(RealtyError::invalid_input(
                "step",
                format!("wizard is on step {}, not submitted", self.step.number()),
            ));
        }
        let details = validate_property_details(draft)?;
        let description = Some(draft.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(ListingSubmission {
            property_type: details.property_type,
            location: details.location,
            area_sqft: details.area_sqft,
            expected_price: details.expected_price,
            price_per_sqft: (details.expected_price / Decimal::from(details.area_sqft))
                .round_dp(2),
            description,
            contact: ContactDetails {
                name: draft.contact.name.trim().to_string(),
                phone: draft.contact.phone.trim().to_string(),
                email: draft.contact.email.trim().to_string(),
            },
        })
    }
}

/// Run a draft through the whole wizard and wrap the submission.
pub fn validate_listing(
    draft: &ListingDraft,
) -> RealtyResult<ComputationOutput<ListingSubmission>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut wizard = ListingWizard::new();
    while wizard.step() != WizardStep::Submitted {
        wizard.advance(draft)?;
    }
    let submission = wizard.finish(draft)?;

    if submission.description.is_none() {
        warnings.push("No description provided; listings with one get more enquiries".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Sell listing wizard: property details, then contact details",
        draft,
        warnings,
        elapsed,
        PRECISION_DECIMAL,
        submission,
    ))
}

struct PropertyDetails {
    property_type: PropertyType,
    location: String,
    area_sqft: u32,
    expected_price: Money,
}

fn validate_property_details(draft: &ListingDraft) -> RealtyResult<PropertyDetails> {
    let property_type = PropertyType::from_str(draft.property_type.trim()).map_err(|_| {
        RealtyError::invalid_input(
            "property_type",
            format!(
                "{:?} is not one of residential, commercial, agricultural, industrial",
                draft.property_type
            ),
        )
    })?;

    let location = draft.location.trim();
    if location.is_empty() {
        return Err(RealtyError::invalid_input("location", "location is required"));
    }

    let area_sqft = strip_grouping(&draft.area)
        .parse::<u32>()
        .ok()
        .filter(|a| *a > 0)
        .ok_or_else(|| {
            RealtyError::invalid_input("area", "area must be a whole number of sq ft above zero")
        })?;

    let expected_price = Decimal::from_str(&strip_grouping(&draft.expected_price))
        .ok()
        .filter(|p| *p > Decimal::ZERO)
        .ok_or_else(|| {
            RealtyError::invalid_input("expected_price", "expected price must be above zero")
        })?;

    Ok(PropertyDetails {
        property_type,
        location: location.to_string(),
        area_sqft,
        expected_price,
    })
}

pub(crate) fn validate_contact(contact: &ContactDetails) -> RealtyResult<()> {
    if contact.name.trim().is_empty() {
        return Err(RealtyError::invalid_input("name", "contact name is required"));
    }

    let phone = contact.phone.trim();
    if phone
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')')))
    {
        return Err(RealtyError::invalid_input(
            "phone",
            "phone may only contain digits, spaces, '+', '-' and parentheses",
        ));
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(RealtyError::invalid_input(
            "phone",
            format!("expected {MIN_PHONE_DIGITS}-{MAX_PHONE_DIGITS} digits, got {digits}"),
        ));
    }

    if !is_plausible_email(contact.email.trim()) {
        return Err(RealtyError::invalid_input(
            "email",
            format!("{:?} is not a valid email address", contact.email),
        ));
    }

    Ok(())
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

fn strip_grouping(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | ',' | '₹'))
        .collect()
}
