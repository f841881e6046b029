//! In-memory state machinery for the browsing client: the item store
//! with its optimistic mutation protocol, the two-phase confirmation
//! flow, and the search/sort/group/paginate view derivation. Everything
//! here is transport-agnostic; mutations leave as [`store::Mutation`]
//! descriptors aimed at `/api/items`.

// Driven by the UI shell and the tests; the server binary itself never
// calls in.
#![allow(dead_code)]

pub(crate) mod confirm;
pub(crate) mod item;
pub(crate) mod store;
pub(crate) mod view;
