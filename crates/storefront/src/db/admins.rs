//! Admin credential repository over `admins.json`.
//!
//! The server only reads this file; `ws-cli admin create` appends to it.

use watchshop_core::Username;

use super::{JsonStore, RepositoryError};
use crate::models::admin::AdminRecord;

/// Repository for admin credentials.
pub struct AdminRepository<'a> {
    store: &'a JsonStore<AdminRecord>,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(store: &'a JsonStore<AdminRecord>) -> Self {
        Self { store }
    }

    /// All admin records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    pub async fn list(&self) -> Result<Vec<AdminRecord>, RepositoryError> {
        self.store.load().await
    }

    /// Find an admin by username, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<AdminRecord>, RepositoryError> {
        Ok(self
            .store
            .load()
            .await?
            .into_iter()
            .find(|a| a.username.matches(username)))
    }

    /// Append an admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is already listed.
    pub async fn create(&self, admin: AdminRecord) -> Result<(), RepositoryError> {
        self.store
            .update(|table| {
                if table
                    .records()
                    .iter()
                    .any(|a| a.username.matches(&admin.username))
                {
                    return Err(RepositoryError::Conflict(
                        "admin already exists".to_owned(),
                    ));
                }
                table.push(admin);
                Ok(())
            })
            .await
    }
}
