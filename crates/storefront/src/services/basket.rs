//! Shopping basket.
//!
//! A basket is an ordered list of watch snapshots with quantities. It lives
//! in the client's session and is never written to the data directory.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use watchshop_core::WatchId;

use crate::db::{RepositoryError, WatchRepository};
use crate::models::watch::WatchRecord;

/// Errors from basket operations.
#[derive(Debug, Error)]
pub enum BasketError {
    /// The catalog has no watch with this id.
    #[error("watch not found")]
    WatchNotFound(WatchId),

    /// The basket has no line for this id.
    #[error("item not found in basket")]
    NotInBasket(WatchId),

    /// Quantities must be at least 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Catalog lookup failed.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// One basket line: the watch as it was when added, plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketItem {
    #[serde(flatten)]
    pub watch: WatchRecord,
    pub quantity: u32,
}

/// The basket for one session, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Basket {
    items: Vec<BasketItem>,
}

impl Basket {
    /// Current lines, in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[BasketItem] {
        &self.items
    }

    /// Whether the basket has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look the watch up in the catalog and add one of it.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::WatchNotFound` if the catalog has no such watch.
    pub async fn add(
        &mut self,
        watches: &WatchRepository<'_>,
        id: WatchId,
    ) -> Result<WatchRecord, BasketError> {
        let watch = watches.get_by_id(id).await.map_err(|e| match e {
            RepositoryError::NotFound => BasketError::WatchNotFound(id),
            other => BasketError::Repository(other),
        })?;

        self.insert(watch.clone());
        Ok(watch)
    }

    /// Add one of `watch`: bump the quantity of an existing line or append a
    /// new line with quantity 1.
    pub fn insert(&mut self, watch: WatchRecord) {
        if let Some(item) = self.line_mut(watch.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(BasketItem { watch, quantity: 1 });
        }
    }

    /// Overwrite a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::InvalidQuantity` for 0 and
    /// `BasketError::NotInBasket` if there is no such line.
    pub fn set_quantity(&mut self, id: WatchId, quantity: u32) -> Result<(), BasketError> {
        if quantity == 0 {
            return Err(BasketError::InvalidQuantity);
        }
        let item = self.line_mut(id).ok_or(BasketError::NotInBasket(id))?;
        item.quantity = quantity;
        Ok(())
    }

    /// Take one away; drop the line when it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::NotInBasket` if there is no such line.
    pub fn decrement_or_remove(&mut self, id: WatchId) -> Result<(), BasketError> {
        let index = self.position(id).ok_or(BasketError::NotInBasket(id))?;
        match self.items.get_mut(index) {
            Some(item) if item.quantity > 1 => item.quantity -= 1,
            _ => {
                self.items.remove(index);
            }
        }
        Ok(())
    }

    /// Drop a line regardless of its quantity.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::NotInBasket` if there is no such line.
    pub fn remove_entirely(&mut self, id: WatchId) -> Result<(), BasketError> {
        let index = self.position(id).ok_or(BasketError::NotInBasket(id))?;
        self.items.remove(index);
        Ok(())
    }

    /// Empty the basket.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, id: WatchId) -> Option<usize> {
        self.items.iter().position(|item| item.watch.id == id)
    }

    fn line_mut(&mut self, id: WatchId) -> Option<&mut BasketItem> {
        self.items.iter_mut().find(|item| item.watch.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::db::JsonStore;

    fn watch(id: i32) -> WatchRecord {
        WatchRecord {
            id: WatchId::new(id),
            img: format!("{id}.png"),
            name: format!("Watch {id}"),
            collection: "Field".to_owned(),
            price: "250".parse().unwrap(),
            description: String::new(),
        }
    }

    #[test]
    fn test_insert_twice_bumps_quantity() {
        let mut basket = Basket::default();
        basket.insert(watch(42));
        basket.insert(watch(42));

        assert_eq!(basket.items().len(), 1);
        assert_eq!(basket.items()[0].quantity, 2);
    }

    #[test]
    fn test_decrement_twice_removes() {
        let mut basket = Basket::default();
        basket.insert(watch(42));
        basket.insert(watch(42));

        basket.decrement_or_remove(WatchId::new(42)).unwrap();
        assert_eq!(basket.items()[0].quantity, 1);
        basket.decrement_or_remove(WatchId::new(42)).unwrap();
        assert!(basket.is_empty());
        assert!(matches!(
            basket.decrement_or_remove(WatchId::new(42)),
            Err(BasketError::NotInBasket(_))
        ));
    }

    #[test]
    fn test_order_is_insertion_order() {
        let mut basket = Basket::default();
        basket.insert(watch(3));
        basket.insert(watch(1));
        basket.insert(watch(3));

        let ids: Vec<i32> = basket.items().iter().map(|i| i.watch.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_set_quantity() {
        let mut basket = Basket::default();
        basket.insert(watch(7));

        basket.set_quantity(WatchId::new(7), 5).unwrap();
        assert_eq!(basket.items()[0].quantity, 5);
        assert!(matches!(
            basket.set_quantity(WatchId::new(7), 0),
            Err(BasketError::InvalidQuantity)
        ));
        assert!(matches!(
            basket.set_quantity(WatchId::new(8), 1),
            Err(BasketError::NotInBasket(_))
        ));
    }

    #[test]
    fn test_remove_entirely_and_clear() {
        let mut basket = Basket::default();
        basket.insert(watch(1));
        basket.insert(watch(1));
        basket.insert(watch(2));

        basket.remove_entirely(WatchId::new(1)).unwrap();
        assert_eq!(basket.items().len(), 1);

        basket.clear();
        assert!(basket.items().is_empty());
    }

    #[test]
    fn test_item_serializes_flat() {
        let mut basket = Basket::default();
        basket.insert(watch(9));

        let json = serde_json::to_value(&basket).unwrap();
        assert_eq!(json[0]["id"], 9);
        assert_eq!(json[0]["quantity"], 1);
        assert_eq!(json[0]["price"], 250);

        let back: Basket = serde_json::from_value(json).unwrap();
        assert_eq!(back, basket);
    }

    #[tokio::test]
    async fn test_add_checks_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("watches.json"));
        store.save(&[watch(42)]).await.unwrap();
        let watches = WatchRepository::new(&store);
        let mut basket = Basket::default();

        basket.add(&watches, WatchId::new(42)).await.unwrap();
        basket.add(&watches, WatchId::new(42)).await.unwrap();
        assert_eq!(basket.items()[0].quantity, 2);

        assert!(matches!(
            basket.add(&watches, WatchId::new(41)).await,
            Err(BasketError::WatchNotFound(_))
        ));
    }
}
