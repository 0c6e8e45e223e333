pub mod query;
pub mod record;
pub mod sample;

pub use query::{
    find_by_id, query, query_form, search, CatalogPage, PriceRange, QueryForm, QuerySpec, SortKey,
};
pub use record::{
    validate_catalog, Agent, ListingStatus, Location, PropertyRecord, PropertySpecs, PropertyType,
};
pub use sample::sample_catalog;
