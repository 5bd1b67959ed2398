use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use bikes_catalog::{codec, Products};
use tempfile::NamedTempFile;
use crate::error::{StoreError, StoreResult};

/// Persistence for whole catalogs
pub trait CatalogRepository {
    /// Read a catalog into a fresh `Products`. Nothing is returned unless
    /// every record decoded.
    fn load(&self, path: &Path) -> StoreResult<Products>;

    fn save(&self, path: &Path, products: &Products) -> StoreResult<()>;
}

/// Plain text files in the record format of [`bikes_catalog::codec`]
#[derive(Debug, Clone, Default)]
pub struct FileCatalogRepository;

impl FileCatalogRepository {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl CatalogRepository for FileCatalogRepository {
    fn load(&self, path: &Path) -> StoreResult<Products> {
        let file = File::open(path).map_err(io_error(path))?;
        let products = codec::decode(BufReader::new(file))?;

        tracing::info!("Loaded {} items from {}", products.len(), path.display());
        Ok(products)
    }

    fn save(&self, path: &Path, products: &Products) -> StoreResult<()> {
        // Encode up front so a catalog that cannot be costed never touches disk
        let text = codec::encode_to_string(products)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir).map_err(io_error(path))?;
        staged.write_all(text.as_bytes()).map_err(io_error(path))?;
        staged.as_file().sync_all().map_err(io_error(path))?;
        staged.persist(path).map_err(|e| io_error(path)(e.error))?;

        tracing::info!("Saved {} items to {}", products.len(), path.display());
        Ok(())
    }
}
