use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::State;

use crate::api::item_management::models::{
    can_modify, custom_fields_column, derived_total, Item, ItemChangeset, ItemOut, ItemPayload,
};
use crate::api::user_management::models::Principal;
use crate::db::Storage;
use crate::error::ErrorResponse;
use crate::schema;

#[put("/items", data = "<payload>")]
pub(crate) fn edit_item(
    payload: Json<ItemPayload>,
    principal: Principal,
    db: &State<Storage>,
) -> Result<Json<ItemOut>, ErrorResponse> {
    let payload = payload.into_inner();

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
            "Only the owner or an admin can modify this item",
        ));
    }

    let changes = ItemChangeset {
        name: payload
            .name
            .as_deref()
            .map(str::trim)
            .filter(|trimmed| !trimmed.is_empty())
            .map(String::from)
            .unwrap_or(existing.name),
        quantity: payload.quantity,
        price: payload.price,
        total: derived_total(payload.quantity, payload.price),
        notes: payload.notes,
        category: payload.category,
        custom_fields: custom_fields_column(payload.custom_fields.as_ref()),
    };

    let updated = diesel::update(items.find(item_id))
        .set(&changes)
        .get_result::<Item>(&conn)
        .map_err(|_| ErrorResponse::internal("Failed to update item"))?;

    Ok(Json(ItemOut::from(updated)))
}

#[put("/items", rank = 2)]
pub(crate) fn edit_item_unauthorised() -> ErrorResponse {
    ErrorResponse::unauthorized("Login required")
}
