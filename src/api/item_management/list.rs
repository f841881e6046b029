use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::State;

use crate::api::item_management::models::{Item, ItemOut};
use crate::db::Storage;
use crate::error::ErrorResponse;
use crate::schema;

/// Anyone may list; newest first.
#[get("/items")]
pub(crate) fn list_items(db: &State<Storage>) -> Result<Json<Vec<ItemOut>>, ErrorResponse> {
    let conn = db.conn()?;

    use schema::items::dsl::*;

    let rows = items
        .order(created_at.desc())
        .load::<Item>(&conn)
        .map_err(|_| ErrorResponse::internal("Couldn't load items"))?;

    Ok(Json(rows.into_iter().map(ItemOut::from).collect()))
}
