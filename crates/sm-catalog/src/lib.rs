pub mod catalog;
pub mod error;
pub mod universe;

pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use universe::UniverseFile;
