use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;

use crate::api::item_management::models::{can_modify, Acknowledgement, Item};
use crate::api::user_management::models::Principal;
use crate::db::Storage;
use crate::error::ErrorResponse;
use crate::schema;

#[derive(Deserialize)]
pub struct DeletePayload {
    pub id: Option<i32>,
}

#[delete("/items", data = "<payload>")]
pub(crate) fn delete_item(
    payload: Json<DeletePayload>,
    principal: Principal,
    db: &State<Storage>,
) -> Result<Json<Acknowledgement>, ErrorResponse> {
    let item_id = payload
        .id
        .ok_or_else(|| ErrorResponse::validation("Item id is required"))?;

    let conn = db.conn()?;

    use schema::items::dsl::*;

    let existing = items
        .find(item_id)
        .first::<Item>(&conn)
        .optional()
        .map_err(|_| ErrorResponse::internal("Couldn't load item"))?
        .ok_or_else(|| ErrorResponse::not_found("Item not found"))?;

    if !can_modify(&principal, &existing.owner_email) {
        return Err(ErrorResponse::forbidden(
            "Only the owner or an admin can delete this item",
        ));
    }

    diesel::delete(items.find(item_id))
        .execute(&conn)
        .map_err(|_| ErrorResponse::internal("Failed to delete item"))?;

    Ok(Json(Acknowledgement { success: true }))
}

#[delete("/items", rank = 2)]
pub(crate) fn delete_item_unauthorised() -> ErrorResponse {
    ErrorResponse::unauthorized("Login required")
}
