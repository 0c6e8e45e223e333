use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All listing prices and budgets, in whole rupees.
pub type Money = Decimal;

/// Percent as typed by a user (8.5 = 8.5%). Used only at the loan boundary.
pub type Percent = f64;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    precision: &str,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: precision.to_string(),
        },
    }
}

/// Precision label for f64 computations.
pub const PRECISION_F64: &str = "ieee754_f64";

/// Precision label for Decimal computations.
pub const PRECISION_DECIMAL: &str = "rust_decimal_128bit";

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_with_metadata_envelope() {
        let out = with_metadata(
            "test",
            &serde_json::json!({ "principal": 100 }),
            vec!["careful".into()],
            42,
            PRECISION_DECIMAL,
            dec!(1.5),
        );
        assert_eq!(out.result, dec!(1.5));
        assert_eq!(out.methodology, "test");
        assert_eq!(out.assumptions["principal"], 100);
        assert_eq!(out.warnings, vec!["careful".to_string()]);
        assert_eq!(out.metadata.computation_time_us, 42);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.metadata.version, env!("CARGO_PKG_VERSION"));
    }
}
