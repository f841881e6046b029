use chrono::Utc;

use super::confirm::Intent;
use super::item::{Item, ItemDraft};

/// Request the transport must perform after an optimistic change was
/// applied. `Create`/`Update` serialize the draft as the JSON body
/// (plus the id for updates); `Delete` sends `{id}`.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    Create { draft: ItemDraft },
    Update { id: i64, draft: ItemDraft },
    Delete { id: i64 },
}

/// The client's authoritative item collection. Mutated only through
/// the operations below, always from confirmed-flow callbacks or a
/// (re)fetch, so applications are strictly ordered.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    last_error: Option<String>,
}

impl ItemStore {
    pub fn new() -> ItemStore {
        ItemStore::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replaces the whole collection with a server fetch and clears any
    /// stale error.
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items = items;
        self.last_error = None;
    }

    /// Appends a provisional item under a client-generated temporary id
    /// and the current client timestamp, returning the id.
    pub fn optimistic_add(&mut self, draft: ItemDraft) -> i64 {
        let mut temp_id = Utc::now().timestamp_millis();
        while self.items.iter().any(|item| item.id == temp_id) {
            temp_id += 1;
        }

        let total = draft.derived_total();
        self.items.push(Item {
            id: temp_id,
            name: draft.name,
            created_by: draft.created_by,
            created_at: Utc::now().to_rfc3339(),
            quantity: draft.quantity,
            price: draft.price,
            total,
            notes: draft.notes,
            category: draft.category,
            custom_fields: draft.custom_fields,
        });

        temp_id
    }

    /// Rewrites the item matching `id` with the draft's fields, keeping
    /// the stored author and timestamp.
    pub fn optimistic_edit(&mut self, id: i64, draft: &ItemDraft) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.name = draft.name.clone();
            item.quantity = draft.quantity;
            item.price = draft.price;
            item.total = draft.derived_total();
            item.notes = draft.notes.clone();
            item.category = draft.category.clone();
            item.custom_fields = draft.custom_fields.clone();
        }
    }

    pub fn optimistic_delete(&mut self, id: i64) {
        self.items.retain(|item| item.id != id);
    }

    /// Applies the optimistic half of a confirmed intent and yields the
    /// request the transport must now perform.
    pub fn begin(&mut self, intent: Intent) -> Mutation {
        match intent {
            Intent::Save { id: None, draft } => {
                self.optimistic_add(draft.clone());
                Mutation::Create { draft }
            }
            Intent::Save {
                id: Some(id),
                draft,
            } => {
                self.optimistic_edit(id, &draft);
                Mutation::Update { id, draft }
            }
            Intent::Delete(id) => {
                self.optimistic_delete(id);
                Mutation::Delete { id }
            }
        }
    }

    /// Reconciles a finished round trip. Success carries the full
    /// refetched list and replaces everything — optimistic entries,
    /// temporary ids and all. Failure records the error and leaves the
    /// optimistic change in place until the next refetch.
    pub fn settle(&mut self, result: Result<Vec<Item>, String>) {
        match result {
            Ok(fresh) => self.replace_all(fresh),
            Err(err) => self.last_error = Some(err),
        }
    }
}
