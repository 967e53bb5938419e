//! Persisted page store
//!
//! One JSON file per generated page, named `<uuid>.json`, under a store
//! directory. No index file; listing scans the directory.

use crate::pipeline::{BusinessData, FinalContent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Page not found: {id}")]
    NotFound { id: String },
}

/// A generated page together with its input and timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPage {
    pub id: String,
    pub business: BusinessData,
    pub content: FinalContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredPage {
    pub fn new(business: BusinessData, content: FinalContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            business,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Directory-backed page store
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Opens a store at the given directory, creating it if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn page_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// Writes a new page and returns its id
    pub fn save(&self, business: BusinessData, content: FinalContent) -> Result<String, StoreError> {
        let page = StoredPage::new(business, content);
        self.write_page(&page)?;
        debug!(id = %page.id, "saved page");
        Ok(page.id)
    }

    /// Loads a page by id
    pub fn get(&self, id: &str) -> Result<StoredPage, StoreError> {
        let path = self.page_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Replaces a page's content, bumping `updated_at`
    pub fn update(&self, id: &str, content: FinalContent) -> Result<(), StoreError> {
        let mut page = self.get(id)?;
        page.content = content;
        page.updated_at = Utc::now();
        self.write_page(&page)
    }

    /// Removes a page by id
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.page_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        fs::remove_file(path)?;
        Ok(())
    }

    /// Lists every readable page, newest first. Unparsable files are
    /// skipped with a warning rather than failing the whole listing.
    pub fn list_all(&self) -> Result<Vec<StoredPage>, StoreError> {
        let mut pages = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path)
                .map_err(StoreError::from)
                .and_then(|raw| serde_json::from_str::<StoredPage>(&raw).map_err(StoreError::from))
            {
                Ok(page) => pages.push(page),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable page file"),
            }
        }
        pages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pages)
    }

    fn write_page(&self, page: &StoredPage) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(page)?;
        fs::write(self.page_path(&page.id), raw)?;
        Ok(())
    }
}
