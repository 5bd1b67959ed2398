pub mod item;
pub mod catalog;
pub mod components;
pub mod codec;
pub mod error;

pub use item::{Component, Item, ItemDetail, ItemKind};
pub use catalog::Products;
pub use components::{components_string, parse_components};
pub use error::{CatalogError, CatalogResult};
