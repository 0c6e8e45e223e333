pub mod error;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "catalog")]
pub mod catalog;

#[cfg(feature = "listing")]
pub mod listing;

#[cfg(feature = "consultation")]
pub mod consultation;

pub use error::RealtyError;
pub use types::*;

/// Standard result type for all realty operations
pub type RealtyResult<T> = Result<T, RealtyError>;
