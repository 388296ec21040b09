//! Document persistence.
//!
//! The editor never touches storage; the shell loads a [`Document`]
//! through a [`Repository`], edits it, and saves it back. [`DocumentStore`]
//! is a thread-safe in-memory repository with optional JSON files on disk,
//! shared by the HTTP handlers of the server.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::{Document, DocumentId};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The internal lock was poisoned by a panicking thread.
    #[error("Lock poisoned")]
    LockPoisoned,
    /// The requested document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Criteria for listing documents. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentFilter {
    /// Only documents in this category.
    pub category_id: Option<String>,
    /// Only documents whose name contains this text (case-insensitive).
    pub name_contains: Option<String>,
}

impl DocumentFilter {
    /// Whether a document satisfies the filter.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        let category_ok = self
            .category_id
            .as_deref()
            .map_or(true, |c| document.category_id.as_deref() == Some(c));
        let name_ok = self.name_contains.as_deref().map_or(true, |needle| {
            document
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        category_ok && name_ok
    }
}

/// Typed load/save/delete access to persisted documents.
pub trait Repository {
    /// Documents matching the filter, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self, filter: &DocumentFilter) -> Result<Vec<Document>, StoreError>;

    /// A single document.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// Insert or replace a document, returning the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn save(&self, document: Document) -> Result<Document, StoreError>;

    /// Replace a document that must already exist, returning the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist, or
    /// an error if it cannot be written.
    fn update(&self, document: Document) -> Result<Document, StoreError>;

    /// Remove a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist.
    fn delete(&self, id: DocumentId) -> Result<(), StoreError>;
}

/// Thread-safe document storage.
///
/// # Example
///
/// ```
/// use layout_core::store::{DocumentFilter, DocumentStore, Repository};
/// use layout_core::{Document, Layer};
///
/// let store = DocumentStore::new();
/// let mut document = Document::new("Parte").with_category("parte");
/// document.add_layer(Layer::text("In memoriam"));
///
/// let saved = store.save(document).unwrap();
/// assert_eq!(store.load(&DocumentFilter::default()).unwrap().len(), 1);
/// store.delete(saved.id).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Arc<RwLock<HashMap<DocumentId, Document>>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

impl DocumentStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store persisted as one JSON file per document in `data_dir`.
    ///
    /// The directory is created if missing and existing documents are
    /// loaded. Files that fail to parse are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created or read.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        let documents = load_directory(&data_dir)?;
        tracing::info!(
            "Loaded {} documents from {}",
            documents.len(),
            data_dir.display()
        );
        Ok(Self {
            documents: Arc::new(RwLock::new(documents)),
            data_dir: Some(data_dir),
        })
    }

    /// Number of stored documents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents.len())
    }

    /// Whether the store holds no documents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|n| n == 0)
    }

    fn path_for(data_dir: &Path, id: DocumentId) -> PathBuf {
        data_dir.join(format!("{id}.json"))
    }

    fn persist(&self, document: &Document) -> Result<(), StoreError> {
        let Some(ref data_dir) = self.data_dir else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        std::fs::write(Self::path_for(data_dir, document.id), json)?;
        Ok(())
    }

    fn remove_file(&self, id: DocumentId) -> Result<(), StoreError> {
        let Some(ref data_dir) = self.data_dir else {
            return Ok(());
        };
        let path = Self::path_for(data_dir, id);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

impl Repository for DocumentStore {
    fn load(&self, filter: &DocumentFilter) -> Result<Vec<Document>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let mut matching: Vec<Document> = documents
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
        });
        Ok(matching)
    }

    fn get(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents.get(&id).cloned())
    }

    fn save(&self, document: Document) -> Result<Document, StoreError> {
        // Disk and memory change under the same write lock.
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        self.persist(&document)?;
        documents.insert(document.id, document.clone());
        tracing::debug!(document = %document.id, "Document saved");
        Ok(document)
    }

    fn update(&self, document: Document) -> Result<Document, StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        if !documents.contains_key(&document.id) {
            return Err(StoreError::NotFound(document.id.to_string()));
        }
        self.persist(&document)?;
        documents.insert(document.id, document.clone());
        tracing::debug!(document = %document.id, "Document updated");
        Ok(document)
    }

    fn delete(&self, id: DocumentId) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        if !documents.contains_key(&id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.remove_file(id)?;
        documents.remove(&id);
        tracing::debug!(document = %id, "Document deleted");
        Ok(())
    }
}

fn load_directory(data_dir: &Path) -> Result<HashMap<DocumentId, Document>, StoreError> {
    let mut documents = HashMap::new();
    for entry in std::fs::read_dir(data_dir)? {
        let path = entry?.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        let contents = std::fs::read_to_string(&path)?;
        match serde_json::from_str::<Document>(&contents) {
            Ok(document) => {
                documents.insert(document.id, document);
            }
            Err(e) => tracing::warn!("Skipping unreadable document {}: {e}", path.display()),
        }
    }
    Ok(documents)
}
