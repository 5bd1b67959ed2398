use std::path::PathBuf;
use bikes_catalog::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("ID already exists: {0}")]
    DuplicateId(String),

    #[error("{id} is used by {}", .referenced_by.join(", "))]
    ReferentialIntegrityViolation {
        id: String,
        referenced_by: Vec<String>,
    },

    #[error("Invalid name or ID: {0}")]
    InvalidName(String),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
