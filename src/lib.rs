pub mod animator;
pub mod cache_store;
pub mod catalog;
pub mod constants;
pub mod display;
pub mod env_state;
pub mod orrery;
pub mod orrery_errors;
pub mod pointer_query;
pub mod registry;

pub use catalog::{BodyRecord, CatalogClient};
pub use orrery::OrreryState;
pub use orrery_errors::OrreryError;
