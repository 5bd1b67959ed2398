/// Catalog engine errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord {
        line: usize,
        reason: String,
    },

    #[error("Invalid component list: {0}")]
    InvalidComponentSpec(String),

    #[error("Cyclic dependency through item: {0}")]
    CyclicDependency(String),

    #[error("Cost of {0} overflows")]
    CostOverflow(String),

    #[error("Item is not a part: {0}")]
    NotAPart(String),

    #[error("Item is not a compound: {0}")]
    NotACompound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
