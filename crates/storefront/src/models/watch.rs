//! Catalog types.

use serde::{Deserialize, Serialize};

use watchshop_core::{Price, WatchId};

use crate::db::Identified;

/// A watch as persisted in `watches.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchRecord {
    pub id: WatchId,
    #[serde(default)]
    pub img: String,
    pub name: String,
    #[serde(default)]
    pub collection: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
}

impl Identified for WatchRecord {
    fn id(&self) -> i32 {
        self.id.as_i32()
    }
}

/// Watch fields without an id, as submitted by an admin or a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchDraft {
    #[serde(default)]
    pub img: String,
    pub name: String,
    #[serde(default)]
    pub collection: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
}

impl WatchDraft {
    /// Check the fields an admin can get wrong.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message if the name is blank or the price is
    /// negative.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_owned());
        }
        if self.price.is_negative() {
            return Err("price cannot be negative".to_owned());
        }
        Ok(())
    }

    /// Attach an id.
    #[must_use]
    pub fn into_record(self, id: WatchId) -> WatchRecord {
        WatchRecord {
            id,
            img: self.img,
            name: self.name,
            collection: self.collection,
            price: self.price,
            description: self.description,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_field_order() {
        let record = WatchRecord {
            id: WatchId::new(4),
            img: "diver.png".to_owned(),
            name: "Diver".to_owned(),
            collection: "Sea".to_owned(),
            price: "1299".parse().unwrap(),
            description: "200m".to_owned(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"id":4,"img":"diver.png","name":"Diver","collection":"Sea","price":1299,"description":"200m"}"#
        );
    }

    #[test]
    fn test_validate() {
        let mut draft: WatchDraft = serde_json::from_str(r#"{"name":"Pilot","price":10}"#).unwrap();
        assert!(draft.validate().is_ok());

        draft.name = "   ".to_owned();
        assert!(draft.validate().is_err());

        let negative: WatchDraft =
            serde_json::from_str(r#"{"name":"Pilot","price":-1}"#).unwrap();
        assert_eq!(negative.validate().unwrap_err(), "price cannot be negative");
    }

    #[test]
    fn test_into_record_keeps_fields() {
        let draft: WatchDraft =
            serde_json::from_str(r#"{"img":"a.png","name":"A","collection":"C","price":9.5,"description":"d"}"#)
                .unwrap();
        let record = draft.into_record(WatchId::new(8));
        assert_eq!(record.id, WatchId::new(8));
        assert_eq!(record.price.to_string(), "9.5");
    }
}
