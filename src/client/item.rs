use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An item as the client sees it. `id` is wide enough to hold the
/// millisecond temporary ids handed out before the server assigns a
/// real one; `created_at` stays an opaque ISO-8601 string and is only
/// ever compared lexicographically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "customFields")]
    pub custom_fields: HashMap<String, String>,
}

impl Item {
    /// Sortable total: always recomputed from the operands so unsaved
    /// optimistic items order the same way as persisted ones, missing
    /// operands counting as zero.
    pub fn total_value(&self) -> f64 {
        self.quantity.unwrap_or(0.0) * self.price.unwrap_or(0.0)
    }

    /// The `YYYY-MM-DD` grouping key, or `None` when the timestamp does
    /// not start with one.
    pub(crate) fn date_key(&self) -> Option<&str> {
        let bytes = self.created_at.as_bytes();
        if bytes.len() < 10 {
            return None;
        }

        let shaped = bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

        if shaped {
            Some(&self.created_at[..10])
        } else {
            None
        }
    }
}

/// Fields a user can type into the item form. The rest of an [`Item`]
/// is filled in by the server (or provisionally by the store).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "customFields")]
    pub custom_fields: HashMap<String, String>,
}

impl ItemDraft {
    pub fn derived_total(&self) -> Option<f64> {
        match (self.quantity, self.price) {
            (Some(quantity), Some(price)) => Some(quantity * price),
            _ => None,
        }
    }
}
