mod api;
mod client;
mod cors;
mod db;
mod error;
mod schema;
mod settings;

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;
extern crate dotenv;
#[macro_use]
extern crate diesel_migrations;

use cors::CORS;
use settings::Settings;

use api::user_management::sessions::SessionStore;

#[get("/")]
fn index() -> &'static str {
    "listkeeper API"
}

#[launch]
fn rocket() -> _ {
    dotenv::dotenv().ok();

    let settings = Settings::new();
    let storage = db::Storage::connect(settings.database_url.as_deref());
    db::run_migrations(&storage);

    rocket::build()
        .attach(CORS)
        .manage(settings)
        .manage(storage)
        .manage(SessionStore::new())
        .register("/", catchers![error::default_catcher])
        .mount("/", routes![index, cors::preflight])
        .mount(
            "/api",
            routes![
                api::item_management::list::list_items,
                api::item_management::create::create_item,
                api::item_management::create::create_item_unauthorised,
                api::item_management::edit::edit_item,
                api::item_management::edit::edit_item_unauthorised,
                api::item_management::delete::delete_item,
                api::item_management::delete::delete_item_unauthorised,
            ],
        )
        .mount(
            "/api/auth",
            routes![
                api::user_management::login::google_login,
                api::user_management::login::login,
                api::user_management::login::session,
                api::user_management::login::session_unauthorised,
                api::user_management::login::logout,
                api::user_management::register::register,
            ],
        )
}
