//! Asset stores: where imports are read from and exports are written to.

use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::RwLock;
use thiserror::Error;

/// Asset store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Store error: {0}")]
    Other(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async reads and writes.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A named collection of binary assets.
///
/// Reads are asynchronous so a caller can keep the scene untouched until
/// the bytes have arrived.
pub trait AssetStore: Send + Sync {
    /// Read an asset's bytes.
    fn read(&self, name: &str) -> BoxFuture<'_, StoreResult<Vec<u8>>>;

    /// Create or replace an asset.
    fn write(&self, name: &str, data: Vec<u8>) -> BoxFuture<'_, StoreResult<()>>;

    /// Check if an asset exists.
    fn exists(&self, name: &str) -> BoxFuture<'_, StoreResult<bool>>;
}

/// Assets kept as files in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Use `base_path`, creating it if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StoreError::Io(format!("Failed to create {}: {}", base_path.display(), e))
            })?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of an asset. Absolute names are used as-is.
    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

impl AssetStore for FileStore {
    fn read(&self, name: &str) -> BoxFuture<'_, StoreResult<Vec<u8>>> {
        let path = self.asset_path(name);
        let name = name.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StoreError::NotFound(name));
            }
            fs::read(&path)
                .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))
        })
    }

    fn write(&self, name: &str, data: Vec<u8>) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.asset_path(name);
        Box::pin(async move {
            fs::write(&path, data)
                .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", path.display(), e)))
        })
    }

    fn exists(&self, name: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let path = self.asset_path(name);
        Box::pin(async move { Ok(path.is_file()) })
    }
}

/// In-memory assets, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    assets: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_asset(self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut assets) = self.assets.write() {
            assets.insert(name.into(), data.into());
        }
        self
    }

    /// Names of every stored asset, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .assets
            .read()
            .map(|assets| assets.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl AssetStore for MemoryStore {
    fn read(&self, name: &str) -> BoxFuture<'_, StoreResult<Vec<u8>>> {
        let name = name.to_string();
        Box::pin(async move {
            let assets = self
                .assets
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            assets.get(&name).cloned().ok_or(StoreError::NotFound(name))
        })
    }

    fn write(&self, name: &str, data: Vec<u8>) -> BoxFuture<'_, StoreResult<()>> {
        let name = name.to_string();
        Box::pin(async move {
            let mut assets = self
                .assets
                .write()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            assets.insert(name, data);
            Ok(())
        })
    }

    fn exists(&self, name: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let name = name.to_string();
        Box::pin(async move {
            let assets = self
                .assets
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            Ok(assets.contains_key(&name))
        })
    }
}
