//! Catalog record types.

use serde::{Deserialize, Serialize};

/// A product record as persisted in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned surrogate key.
    pub id: i64,

    /// Unique business key.
    pub code: String,

    pub name: String,

    pub description: String,
}

/// A record that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub code: String,
    pub name: String,
    pub description: String,
}

impl NewRecord {
    /// Create a new unsaved record.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// Attach the id the store assigned.
    pub fn with_id(self, id: i64) -> Record {
        Record {
            id,
            code: self.code,
            name: self.name,
            description: self.description,
        }
    }
}

/// The catalog a store instance is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    Chart,
    Purchase,
    Warehouse,
}

impl Catalog {
    /// Table holding this catalog's records.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Chart => "product_chart",
            Self::Purchase => "product_purchase",
            Self::Warehouse => "product_warehouse",
        }
    }
}
