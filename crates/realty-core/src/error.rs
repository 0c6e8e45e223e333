use thiserror::Error;

#[derive(Debug, Error)]
pub enum RealtyError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Degenerate loan: {context}")]
    DegenerateLoan { context: String },

    #[error("Invalid query spec: {field} = {value:?} — {reason}")]
    InvalidQuerySpec {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RealtyError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        RealtyError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_query(
        field: &str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RealtyError::InvalidQuerySpec {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RealtyError {
    fn from(e: serde_json::Error) -> Self {
        RealtyError::Serialization(e.to_string())
    }
}
