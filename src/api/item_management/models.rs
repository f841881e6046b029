use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::user_management::models::{Principal, Role};
use crate::schema::items;

#[derive(Queryable, Debug)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub created_by: String,
    pub owner_email: String,
    pub created_at: DateTime<Utc>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub total: Option<f64>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub custom_fields: Option<Value>,
}

#[derive(Insertable)]
#[table_name = "items"]
pub struct NewItem {
    pub name: String,
    pub created_by: String,
    pub owner_email: String,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub total: Option<f64>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub custom_fields: Option<Value>,
}

/// Update writes every optional column, NULLing the ones the payload
/// left out; only `name` falls back to the stored value.
#[derive(AsChangeset)]
#[table_name = "items"]
#[changeset_options(treat_none_as_null = "true")]
pub struct ItemChangeset {
    pub name: String,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub total: Option<f64>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub custom_fields: Option<Value>,
}

/// Client-supplied item fields. `owner_email`, `created_by` and
/// `created_at` are never taken from here; they come from the session
/// principal and the database.
#[derive(Deserialize)]
pub struct ItemPayload {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "customFields")]
    pub custom_fields: Option<HashMap<String, String>>,
}

#[derive(Serialize)]
pub struct ItemOut {
    pub id: i32,
    pub name: String,
    pub created_by: String,
    pub owner_email: String,
    pub created_at: String,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub total: Option<f64>,
    pub notes: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "customFields")]
    pub custom_fields: HashMap<String, String>,
}

impl From<Item> for ItemOut {
    fn from(item: Item) -> ItemOut {
        ItemOut {
            id: item.id,
            name: item.name,
            created_by: item.created_by,
            owner_email: item.owner_email,
            created_at: item.created_at.to_rfc3339(),
            quantity: item.quantity,
            price: item.price,
            total: item.total,
            notes: item.notes,
            category: item.category,
            custom_fields: custom_fields_map(item.custom_fields),
        }
    }
}

#[derive(Serialize)]
pub struct Acknowledgement {
    pub success: bool,
}

/// `total` exists exactly when both operands do.
pub(crate) fn derived_total(quantity: Option<f64>, price: Option<f64>) -> Option<f64> {
    match (quantity, price) {
        (Some(quantity), Some(price)) => Some(quantity * price),
        _ => None,
    }
}

/// Mutations are allowed for the row owner and for admins, decided
/// against the stored `owner_email`, never a client-supplied one.
pub(crate) fn can_modify(principal: &Principal, owner_email: &str) -> bool {
    principal.role == Role::Admin || principal.email == owner_email
}

pub(crate) fn custom_fields_column(fields: Option<&HashMap<String, String>>) -> Option<Value> {
    fields.and_then(|map| serde_json::to_value(map).ok())
}

pub(crate) fn custom_fields_map(column: Option<Value>) -> HashMap<String, String> {
    match column {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(text) => (key, text),
                other => (key, other.to_string()),
            })
            .collect(),
        _ => HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(email: &str, role: Role) -> Principal {
        Principal {
            id: 1,
            name: "Tester".to_string(),
            email: email.to_string(),
            role,
        }
    }

    #[test]
    fn total_is_quantity_times_price() {
        assert_eq!(derived_total(Some(4.0), Some(2.5)), Some(10.0));
        assert_eq!(derived_total(Some(3.0), Some(0.0)), Some(0.0));
    }

    #[test]
    fn total_is_absent_when_an_operand_is_missing() {
        assert_eq!(derived_total(None, Some(2.5)), None);
        assert_eq!(derived_total(Some(4.0), None), None);
        assert_eq!(derived_total(None, None), None);
    }

    #[test]
    fn owners_and_admins_may_modify() {
        assert!(can_modify(&principal("a@example.com", Role::User), "a@example.com"));
        assert!(can_modify(&principal("root@example.com", Role::Admin), "a@example.com"));
    }

    #[test]
    fn other_users_may_not_modify() {
        assert!(!can_modify(&principal("b@example.com", Role::User), "a@example.com"));
    }

    #[test]
    fn custom_fields_survive_the_column_round_trip() {
        let mut fields = HashMap::new();
        fields.insert("colour".to_string(), "red".to_string());
        fields.insert("supplier".to_string(), "Acme".to_string());

        let column = custom_fields_column(Some(&fields));
        assert!(column.as_ref().map_or(false, Value::is_object));
        assert_eq!(custom_fields_map(column), fields);
    }

    #[test]
    fn missing_or_malformed_columns_read_as_empty() {
        assert!(custom_fields_map(None).is_empty());
        assert!(custom_fields_map(Some(Value::String("junk".to_string()))).is_empty());
        assert_eq!(custom_fields_column(None), None);
    }
}
