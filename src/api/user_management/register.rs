use diesel::prelude::*;
use rocket::http::CookieJar;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::api::user_management::models::{resolve_role, NewUser, Principal, User};
use crate::api::user_management::sessions::{create_session, SessionStore};
use crate::db::Storage;
use crate::error::ErrorResponse;
use crate::schema;
use crate::settings::Settings;

#[derive(Deserialize)]
pub struct Registration {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Re-registering an existing email is a sign-in: it must prove the
/// stored password. Federated-only accounts have no hash and cannot be
/// claimed this way at all.
fn password_matches(stored_hash: Option<&str>, password: &str) -> bool {
    let hash = match stored_hash {
        Some(hash) => hash,
        None => return false,
    };

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Creates a credentials account and logs the session in, mirroring the
/// register-then-sign-in flow of the web client. For an email that
/// already has an account, the supplied password is verified against
/// the stored hash before any session exists; only the display name is
/// refreshed.
#[post("/register", data = "<registration>")]
pub(crate) fn register(
    registration: Json<Registration>,
    store: &State<SessionStore>,
    db: &State<Storage>,
    settings: &State<Settings>,
    cookies: &CookieJar<'_>,
) -> Result<Json<Principal>, ErrorResponse> {
    let registration = registration.into_inner();

    let account_email = registration.email.trim().to_string();
    if account_email.is_empty() || registration.password.is_empty() {
        return Err(ErrorResponse::validation("Email and password are required"));
    }

    let account_name = registration
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| account_email.clone());

    let conn = db.conn()?;

    use schema::users::dsl::*;

    let existing = users
        .filter(email.eq(&account_email))
        .first::<User>(&conn)
        .optional()
        .map_err(|_| ErrorResponse::internal("Couldn't load user from database"))?;

    let user = match existing {
        Some(user) => {
            if !password_matches(user.password_hash.as_deref(), &registration.password) {
                return Err(ErrorResponse::unauthorized("Invalid credentials"));
            }

            diesel::update(users.find(user.id))
                .set(name.eq(account_name))
                .get_result::<User>(&conn)
                .map_err(|_| ErrorResponse::internal("Couldn't update user"))?
        }
        None => {
            let salt = SaltString::generate(&mut OsRng);
            let hash = Argon2::default()
                .hash_password(registration.password.as_bytes(), &salt)
                .map_err(|err| {
                    ErrorResponse::with_details(
                        rocket::http::Status::InternalServerError,
                        "Couldn't hash password",
                        err.to_string(),
                    )
                })?
                .to_string();

            let new_user = NewUser {
                name: account_name,
                email: account_email,
                password_hash: Some(hash),
                role: "user".to_string(),
            };

            diesel::insert_into(users)
                .values(&new_user)
                .get_result::<User>(&conn)
                .map_err(|_| ErrorResponse::internal("Couldn't register user"))?
        }
    };

    let principal = Principal {
        id: user.id,
        name: user.name,
        role: resolve_role(&user.role, &user.email, &settings.admin_email),
        email: user.email,
    };

    create_session(store, cookies, &principal)?;

    Ok(Json(principal))
}
