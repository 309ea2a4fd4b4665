//! Catalog repository over `watches.json`.
//!
//! The repository trusts its caller: validation and admin checks happen in
//! the routes.

use watchshop_core::WatchId;

use super::{JsonStore, RepositoryError};
use crate::models::watch::{WatchDraft, WatchRecord};

/// Repository for catalog records.
pub struct WatchRepository<'a> {
    store: &'a JsonStore<WatchRecord>,
}

impl<'a> WatchRepository<'a> {
    /// Create a new watch repository.
    #[must_use]
    pub const fn new(store: &'a JsonStore<WatchRecord>) -> Self {
        Self { store }
    }

    /// All watches, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    pub async fn list(&self) -> Result<Vec<WatchRecord>, RepositoryError> {
        self.store.load().await
    }

    /// Get a watch by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no watch has this id.
    pub async fn get_by_id(&self, id: WatchId) -> Result<WatchRecord, RepositoryError> {
        self.store
            .load()
            .await?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or(RepositoryError::NotFound)
    }

    /// Append a new watch with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or saved.
    pub async fn create(&self, draft: WatchDraft) -> Result<WatchRecord, RepositoryError> {
        self.store
            .update(|table| {
                let record = draft.into_record(WatchId::new(table.allocate_id()));
                table.push(record.clone());
                Ok(record)
            })
            .await
    }

    /// Append several watches in one write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or saved.
    pub async fn create_many(
        &self,
        drafts: Vec<WatchDraft>,
    ) -> Result<Vec<WatchRecord>, RepositoryError> {
        self.store
            .update(|table| {
                let mut created = Vec::with_capacity(drafts.len());
                for draft in drafts {
                    let record = draft.into_record(WatchId::new(table.allocate_id()));
                    table.push(record.clone());
                    created.push(record);
                }
                Ok(created)
            })
            .await
    }

    /// Replace every field of a watch except its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no watch has this id.
    pub async fn replace(
        &self,
        id: WatchId,
        draft: WatchDraft,
    ) -> Result<WatchRecord, RepositoryError> {
        self.store
            .update(|table| {
                let watch = table
                    .find_mut(|w| w.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                *watch = draft.into_record(id);
                Ok(watch.clone())
            })
            .await
    }

    /// Remove a watch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no watch has this id.
    pub async fn delete(&self, id: WatchId) -> Result<WatchRecord, RepositoryError> {
        self.store
            .update(|table| {
                table
                    .remove_first(|w| w.id == id)
                    .ok_or(RepositoryError::NotFound)
            })
            .await
    }

    /// Remove every watch. Ids keep counting from where they were.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or saved.
    pub async fn clear(&self) -> Result<usize, RepositoryError> {
        self.store
            .update(|table| -> Result<usize, RepositoryError> {
                let removed = table.records().len();
                table.clear();
                Ok(removed)
            })
            .await
    }
}
