use diesel::prelude::*;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;

use crate::api::item_management::models::{
    custom_fields_column, derived_total, Item, ItemOut, ItemPayload, NewItem,
};
use crate::api::user_management::models::Principal;
use crate::db::Storage;
use crate::error::ErrorResponse;
use crate::schema;

#[post("/items", data = "<payload>")]
pub(crate) fn create_item(
    payload: Json<ItemPayload>,
    principal: Principal,
    db: &State<Storage>,
) -> Result<status::Created<Json<ItemOut>>, ErrorResponse> {
    let payload = payload.into_inner();

    let item_name = payload.name.as_deref().unwrap_or("").trim().to_string();
    if item_name.is_empty() {
        return Err(ErrorResponse::validation("Name is required"));
    }

    let conn = db.conn()?;

    let new_item = NewItem {
        name: item_name,
        created_by: principal.display_name().to_string(),
        owner_email: principal.email.clone(),
        quantity: payload.quantity,
        price: payload.price,
        // Derived at write time, inside the same insert.
        total: derived_total(payload.quantity, payload.price),
        notes: payload.notes,
        category: payload.category,
        custom_fields: custom_fields_column(payload.custom_fields.as_ref()),
    };

    use schema::items::dsl::*;

    let inserted = diesel::insert_into(items)
        .values(&new_item)
        .get_result::<Item>(&conn)
        .map_err(|err| {
            ErrorResponse::with_details(
                Status::InternalServerError,
                "Failed to add item",
                err.to_string(),
            )
        })?;

    // Return the freshly read row, server timestamp included.
    let fresh = items
        .find(inserted.id)
        .first::<Item>(&conn)
        .map_err(|_| ErrorResponse::internal("Couldn't load created item"))?;

    Ok(status::Created::new("/api/items").body(Json(ItemOut::from(fresh))))
}

#[post("/items", rank = 2)]
pub(crate) fn create_item_unauthorised() -> ErrorResponse {
    ErrorResponse::unauthorized("Login required")
}
