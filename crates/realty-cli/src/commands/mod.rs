pub mod catalog;
pub mod consultation;
pub mod emi;
pub mod listing;
