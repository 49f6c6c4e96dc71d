//! Remote NEO catalog: record types and the caching client.
pub mod client;
pub mod records;

pub use client::CatalogClient;
pub use records::BodyRecord;
