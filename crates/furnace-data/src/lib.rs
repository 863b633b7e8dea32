pub mod loader;
pub mod schema;

pub use loader::{CatalogData, DataLoadError, load_catalog_builder, load_catalog_data, load_tiers};
