//! Storage for review item collections
//!
//! Directory structure:
//! ```text
//! {base}/collections/
//! └── {name}.json   # Array of review items, one file per collection
//! ```
//!
//! The engine itself never performs I/O; this store is the
//! collection-owner side of the contract, for callers that want a
//! ready-made JSON persistence layer.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::ReviewItem;
use crate::session::{ReviewSession, SessionError};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Invalid collection name: {0}")]
    InvalidCollectionName(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// File-backed store for named collections of review items
pub struct CollectionStore {
    /// Base data path (e.g., ~/.local/share/glossa)
    base_path: PathBuf,
}

impl CollectionStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn collections_dir(&self) -> PathBuf {
        self.base_path.join("collections")
    }

    /// Collection names become file names, so path separators are out
    fn collection_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(StorageError::InvalidCollectionName(name.to_string()));
        }
        Ok(self.collections_dir().join(format!("{}.json", name)))
    }

    /// Initialize the storage directory
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.collections_dir())?;
        Ok(())
    }

    /// List all stored collection names, sorted
    pub fn list_collections(&self) -> Result<Vec<String>> {
        let dir = self.collections_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Load a collection's items
    pub fn load_collection(&self, name: &str) -> Result<Vec<ReviewItem>> {
        let path = self.collection_path(name)?;
        if !path.exists() {
            return Err(StorageError::CollectionNotFound(name.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        let items: Vec<ReviewItem> = serde_json::from_str(&content)?;
        Ok(items)
    }

    /// Write a collection, creating it if needed
    pub fn save_collection(&self, name: &str, items: &[ReviewItem]) -> Result<()> {
        self.init()?;
        let path = self.collection_path(name)?;
        fs::write(&path, serde_json::to_string_pretty(items)?)?;
        log::debug!("Saved collection '{}' ({} items)", name, items.len());
        Ok(())
    }

    /// Add an item to a collection, creating the collection if needed.
    /// An existing item with the same identity is replaced, keeping
    /// identities unique within the collection.
    pub fn add_item(&self, name: &str, item: ReviewItem) -> Result<()> {
        let mut items = match self.load_collection(name) {
            Ok(items) => items,
            Err(StorageError::CollectionNotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };

        items.retain(|existing| existing.identity != item.identity);
        items.push(item);
        self.save_collection(name, &items)
    }

    /// Delete a collection and all its items
    pub fn delete_collection(&self, name: &str) -> Result<()> {
        let path = self.collection_path(name)?;
        if !path.exists() {
            return Err(StorageError::CollectionNotFound(name.to_string()));
        }

        fs::remove_file(&path)?;
        log::info!("Deleted collection '{}'", name);
        Ok(())
    }

    /// Fold a completed session's staged results back into a stored
    /// collection. Returns how many items were updated.
    pub fn commit_session(&self, name: &str, session: ReviewSession) -> Result<usize> {
        let mut items = self.load_collection(name)?;
        let applied = session.commit_into(&mut items)?;
        self.save_collection(name, &items)?;
        Ok(applied)
    }
}
