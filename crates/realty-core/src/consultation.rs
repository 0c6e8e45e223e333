use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::catalog::PropertyType;
use crate::error::RealtyError;
use crate::listing::{validate_contact, ContactDetails};
use crate::types::{with_metadata, ComputationOutput, PRECISION_DECIMAL};
use crate::RealtyResult;

/// Which services-page card opened the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Expert,
    Legal,
}

impl ServiceKind {
    pub fn title(self) -> &'static str {
        match self {
            ServiceKind::Expert => "Expert Property Consultation",
            ServiceKind::Legal => "Legal Services Consultation",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = RealtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expert" => Ok(ServiceKind::Expert),
            "legal" => Ok(ServiceKind::Legal),
            _ => Err(RealtyError::invalid_input(
                "service",
                format!("{s:?} is not one of expert, legal"),
            )),
        }
    }
}

/// What the caller wants to talk about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationTopic {
    Buying,
    Selling,
    Renting,
    Investment,
}

impl FromStr for ConsultationTopic {
    type Err = RealtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buying" | "buy" => Ok(ConsultationTopic::Buying),
            "selling" | "sell" => Ok(ConsultationTopic::Selling),
            "renting" | "rent" => Ok(ConsultationTopic::Renting),
            "investment" | "invest" => Ok(ConsultationTopic::Investment),
            _ => Err(RealtyError::invalid_input(
                "consultation_type",
                format!("{s:?} is not one of buying, selling, renting, investment"),
            )),
        }
    }
}

/// Call-back window offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning (9 AM - 12 PM)",
            TimeSlot::Afternoon => "Afternoon (12 PM - 3 PM)",
            TimeSlot::Evening => "Evening (3 PM - 6 PM)",
            TimeSlot::Night => "Night (6 PM - 9 PM)",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = RealtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(TimeSlot::Morning),
            "afternoon" => Ok(TimeSlot::Afternoon),
            "evening" => Ok(TimeSlot::Evening),
            "night" => Ok(TimeSlot::Night),
            _ => Err(RealtyError::invalid_input(
                "preferred_time",
                format!("{s:?} is not one of morning, afternoon, evening, night"),
            )),
        }
    }
}

/// Consultation popup values, as typed. Only the contact fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationForm {
    #[serde(default)]
    pub service: String,
    #[serde(flatten)]
    pub contact: ContactDetails,
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub consultation_type: String,
    #[serde(default)]
    pub message: String,
    /// `YYYY-MM-DD`, as produced by a date input
    #[serde(default)]
    pub preferred_date: String,
    #[serde(default)]
    pub preferred_time: String,
}

/// A validated consultation request, ready for an agent to call back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub service: ServiceKind,
    pub contact: ContactDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_type: Option<ConsultationTopic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<TimeSlot>,
}

/// Validate a consultation form. `today` bounds the preferred date; a date
/// before it is rejected.
pub fn validate_consultation(
    form: &ConsultationForm,
    today: NaiveDate,
) -> RealtyResult<ComputationOutput<ConsultationRequest>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_contact(&form.contact)?;

    let service = match non_blank(&form.service) {
        Some(raw) => raw.parse()?,
        None => ServiceKind::Expert,
    };

    let property_type = non_blank(&form.property_type)
        .map(|raw| {
            raw.parse::<PropertyType>().map_err(|_| {
                RealtyError::invalid_input(
                    "property_type",
                    format!("{raw:?} is not one of residential, commercial, agricultural, industrial"),
                )
            })
        })
        .transpose()?;

    let consultation_type = non_blank(&form.consultation_type)
        .map(str::parse::<ConsultationTopic>)
        .transpose()?;

    let preferred_date = non_blank(&form.preferred_date)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                RealtyError::invalid_input(
                    "preferred_date",
                    format!("{raw:?} is not a YYYY-MM-DD date"),
                )
            })
        })
        .transpose()?;
    if let Some(date) = preferred_date {
        if date < today {
            return Err(RealtyError::invalid_input(
                "preferred_date",
                format!("{date} is in the past"),
            ));
        }
    }

    let preferred_time = non_blank(&form.preferred_time)
        .map(str::parse::<TimeSlot>)
        .transpose()?;

    if preferred_date.is_none() && preferred_time.is_none() {
        warnings.push("No preferred date or time; an agent will call to arrange one".into());
    }

    let request = ConsultationRequest {
        service,
        contact: ContactDetails {
            name: form.contact.name.trim().to_string(),
            phone: form.contact.phone.trim().to_string(),
            email: form.contact.email.trim().to_string(),
        },
        property_type,
        consultation_type,
        message: non_blank(&form.message).map(str::to_string),
        preferred_date,
        preferred_time,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        service.title(),
        form,
        warnings,
        elapsed,
        PRECISION_DECIMAL,
        request,
    ))
}

fn non_blank(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn form() -> ConsultationForm {
        ConsultationForm {
            service: "legal".into(),
            contact: ContactDetails {
                name: " Ravi Kumar ".into(),
                phone: "+91 98765 43210".into(),
                email: "ravi@example.com".into(),
            },
            property_type: "Commercial".into(),
            consultation_type: "investment".into(),
            message: "Title check on a Pune office".into(),
            preferred_date: "2024-06-03".into(),
            preferred_time: "afternoon".into(),
        }
    }

    fn field_of(err: RealtyError) -> String {
        match err {
            RealtyError::InvalidInput { field, .. } => field,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_full_request() {
        let out = validate_consultation(&form(), today()).unwrap();
        let req = out.result;
        assert_eq!(req.service, ServiceKind::Legal);
        assert_eq!(req.contact.name, "Ravi Kumar");
        assert_eq!(req.property_type, Some(PropertyType::Commercial));
        assert_eq!(req.consultation_type, Some(ConsultationTopic::Investment));
        assert_eq!(req.preferred_date, NaiveDate::from_ymd_opt(2024, 6, 3));
        assert_eq!(req.preferred_time, Some(TimeSlot::Afternoon));
        assert!(out.warnings.is_empty());
        assert_eq!(out.methodology, "Legal Services Consultation");
    }

    #[test]
    fn test_only_contact_is_required() {
        let minimal = ConsultationForm {
            contact: form().contact,
            ..ConsultationForm::default()
        };
        let out = validate_consultation(&minimal, today()).unwrap();
        assert_eq!(out.result.service, ServiceKind::Expert);
        assert!(out.result.property_type.is_none());
        assert!(out.result.message.is_none());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_contact_rules_match_listing_wizard() {
        let mut f = form();
        f.contact.email = "ravi.example.com".into();
        assert_eq!(field_of(validate_consultation(&f, today()).unwrap_err()), "email");

        let mut f = form();
        f.contact.phone = "12345".into();
        assert_eq!(field_of(validate_consultation(&f, today()).unwrap_err()), "phone");
    }

    #[test]
    fn test_bad_select_values_name_the_field() {
        let cases: [(fn(&mut ConsultationForm), &str); 5] = [
            (|f: &mut ConsultationForm| f.service = "tax".into(), "service"),
            (|f: &mut ConsultationForm| f.property_type = "castle".into(), "property_type"),
            (|f: &mut ConsultationForm| f.consultation_type = "leasing".into(), "consultation_type"),
            (|f: &mut ConsultationForm| f.preferred_date = "03/06/2024".into(), "preferred_date"),
            (|f: &mut ConsultationForm| f.preferred_time = "dawn".into(), "preferred_time"),
        ];
        for (mutate, field) in cases {
            let mut f = form();
            mutate(&mut f);
            assert_eq!(field_of(validate_consultation(&f, today()).unwrap_err()), field);
        }
    }

    #[test]
    fn test_past_date_rejected_today_allowed() {
        let mut f = form();
        f.preferred_date = "2024-05-31".into();
        assert_eq!(field_of(validate_consultation(&f, today()).unwrap_err()), "preferred_date");

        f.preferred_date = "2024-06-01".into();
        assert!(validate_consultation(&f, today()).is_ok());
    }

    #[test]
    fn test_form_reads_flat_json() {
        let f: ConsultationForm = serde_json::from_str(
            r#"{"name":"Asha","phone":"9876543210","email":"asha@example.com","preferred_time":"night"}"#,
        )
        .unwrap();
        assert_eq!(f.contact.name, "Asha");
        let out = validate_consultation(&f, today()).unwrap();
        assert_eq!(out.result.preferred_time, Some(TimeSlot::Night));
        assert_eq!(out.result.preferred_time.unwrap().to_string(), "Night (6 PM - 9 PM)");
    }
}
