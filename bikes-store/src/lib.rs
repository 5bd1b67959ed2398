pub mod app_config;
pub mod error;
pub mod file_repo;
pub mod session;

pub use error::{StoreError, StoreResult};
pub use file_repo::{CatalogRepository, FileCatalogRepository};
pub use session::CatalogSession;
