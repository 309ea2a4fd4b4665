//! User repository over `users.json`.

use watchshop_core::{UserId, Username};

use super::{JsonStore, RepositoryError};
use crate::models::user::{Address, UserRecord};

/// Fields of a user that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
    pub is_admin: bool,
    pub address: Address,
}

/// Repository for user records.
pub struct UserRepository<'a> {
    store: &'a JsonStore<UserRecord>,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a JsonStore<UserRecord>) -> Self {
        Self { store }
    }

    /// All users, in file order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` or `RepositoryError::DataCorruption` if
    /// the file cannot be loaded.
    pub async fn list(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        self.store.load().await
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self.store.load().await?.into_iter().find(|u| u.id == id))
    }

    /// Get a user by username, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self
            .store
            .load()
            .await?
            .into_iter()
            .find(|u| u.username.matches(username)))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is already taken.
    pub async fn create(&self, user: NewUser) -> Result<UserRecord, RepositoryError> {
        self.store
            .update(|table| {
                if table
                    .records()
                    .iter()
                    .any(|u| u.username.matches(&user.username))
                {
                    return Err(RepositoryError::Conflict(
                        "username already exists".to_owned(),
                    ));
                }

                let record = UserRecord {
                    id: UserId::new(table.allocate_id()),
                    username: user.username,
                    password_hash: user.password_hash,
                    is_admin: user.is_admin,
                    address: user.address,
                };
                table.push(record.clone());
                Ok(record)
            })
            .await
    }

    /// Change a user's username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if another user owns `username`.
    pub async fn set_username(
        &self,
        id: UserId,
        username: Username,
    ) -> Result<UserRecord, RepositoryError> {
        self.store
            .update(|table| {
                if table.position(|u| u.id == id).is_none() {
                    return Err(RepositoryError::NotFound);
                }
                if table
                    .records()
                    .iter()
                    .any(|u| u.id != id && u.username.matches(&username))
                {
                    return Err(RepositoryError::Conflict(
                        "username already exists".to_owned(),
                    ));
                }

                let user = table
                    .find_mut(|u| u.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                user.username = username;
                Ok(user.clone())
            })
            .await
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: String,
    ) -> Result<UserRecord, RepositoryError> {
        self.store
            .update(|table| {
                let user = table
                    .find_mut(|u| u.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                user.password_hash = password_hash;
                Ok(user.clone())
            })
            .await
    }

    /// Replace every address field of a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_address(
        &self,
        id: UserId,
        address: Address,
    ) -> Result<UserRecord, RepositoryError> {
        self.store
            .update(|table| {
                let user = table
                    .find_mut(|u| u.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                user.address = address;
                Ok(user.clone())
            })
            .await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn delete(&self, id: UserId) -> Result<UserRecord, RepositoryError> {
        self.store
            .update(|table| {
                table
                    .remove_first(|u| u.id == id)
                    .ok_or(RepositoryError::NotFound)
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: Username::parse(name).unwrap(),
            password_hash: "hash".to_owned(),
            is_admin: false,
            address: Address::default(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("users.json"));
        let users = UserRepository::new(&store);

        let a = users.create(new_user("a")).await.unwrap();
        let b = users.create(new_user("b")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_in_other_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"[{"id":1,"username":"Alice","password":"x","isAdmin":false}]"#,
        )
        .unwrap();
        let store = JsonStore::new(&path);
        let users = UserRepository::new(&store);

        let err = users.create(new_user("ALICE")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_numeric_postalcode_does_not_block_other_users() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"[
  {"id":1,"username":"ann","password":"x","isAdmin":false},
  {"id":2,"username":"bob","password":"y","isAdmin":false,"postalcode":90210}
]"#,
        )
        .unwrap();
        let store = JsonStore::new(&path);
        let users = UserRepository::new(&store);

        let ann = users
            .get_by_username(&Username::parse("ann").unwrap())
            .await
            .unwrap();
        assert!(ann.is_some());

        let bob = users.get_by_id(UserId::new(2)).await.unwrap().unwrap();
        assert_eq!(bob.address.postalcode.as_deref(), Some("90210"));
    }

    #[tokio::test]
    async fn test_set_username_conflicts_only_with_others() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("users.json"));
        let users = UserRepository::new(&store);
        let a = users.create(new_user("a")).await.unwrap();
        users.create(new_user("b")).await.unwrap();

        let same = users
            .set_username(a.id, Username::parse("A").unwrap())
            .await
            .unwrap();
        assert_eq!(same.username.as_str(), "a");

        let err = users
            .set_username(a.id, Username::parse("b").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("users.json"));
        let users = UserRepository::new(&store);
        let a = users.create(new_user("a")).await.unwrap();

        users.delete(a.id).await.unwrap();
        assert!(users.get_by_id(a.id).await.unwrap().is_none());
        assert!(matches!(
            users.delete(a.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_set_address_replaces_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("users.json"));
        let users = UserRepository::new(&store);
        let mut user = new_user("a");
        user.address.street = Some("Old Road".to_owned());
        let a = users.create(user).await.unwrap();

        let updated = users
            .set_address(
                a.id,
                Address {
                    city: Some("Oslo".to_owned()),
                    ..Address::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.address.street, None);
        assert_eq!(updated.address.city.as_deref(), Some("Oslo"));
    }
}
