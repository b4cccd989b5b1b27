//! Filesystem-backed services behind the HTTP API and the catalog job

pub mod catalog_builder;
pub mod config_store;
pub mod media_index;

pub use catalog_builder::{write_catalog, Catalog, CatalogBuild, CatalogBuilder, Condition};
pub use config_store::{ConfigStore, Document, Resource};
pub use media_index::MediaIndex;
