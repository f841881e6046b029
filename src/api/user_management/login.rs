use diesel::prelude::*;
use rocket::http::CookieJar;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;

use argon2::{Argon2, PasswordHash, PasswordVerifier};

use crate::api::user_management::models::{resolve_role, NewUser, Principal, Role, User};
use crate::api::user_management::sessions::{
    create_session, SessionCookie, SessionStore, SESSION_COOKIE,
};
use crate::db::Storage;
use crate::error::ErrorResponse;
use crate::schema;
use crate::settings::Settings;

#[derive(Debug, Deserialize)]
struct TokenClaims {
    pub email: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Federated flow: the body is the raw Google ID token. The identity is
/// upserted on email and converges on the same session contract as the
/// credentials flow.
#[post("/google", data = "<token>")]
pub(crate) async fn google_login(
    token: String,
    store: &State<SessionStore>,
    db: &State<Storage>,
    settings: &State<Settings>,
    cookies: &CookieJar<'_>,
) -> Result<Json<Principal>, ErrorResponse> {
    let parser = jsonwebtoken_google::Parser::new(&settings.google_client_id);
    let claims = parser
        .parse::<TokenClaims>(&token)
        .await
        .map_err(|_| ErrorResponse::unauthorized("Couldn't validate Google account"))?;

    let conn = db.conn()?;

    let new_user = NewUser {
        name: if claims.name.is_empty() {
            claims.email.clone()
        } else {
            claims.name
        },
        email: claims.email,
        password_hash: None,
        role: "user".to_string(),
    };

    use schema::users::dsl::*;

    let user = diesel::insert_into(users)
        .values(&new_user)
        .on_conflict(email)
        .do_update()
        .set(name.eq(new_user.name.clone()))
        .get_result::<User>(&conn)
        .map_err(|_| ErrorResponse::internal("Couldn't update user"))?;

    let principal = Principal {
        id: user.id,
        name: user.name,
        role: resolve_role(&user.role, &user.email, &settings.admin_email),
        email: user.email,
    };

    create_session(store, cookies, &principal)?;

    Ok(Json(principal))
}

/// Local flow: email/password JSON body. The designated admin pair from
/// settings short-circuits to an admin principal without touching the
/// store.
#[post("/login", data = "<credentials>")]
pub(crate) fn login(
    credentials: Json<Credentials>,
    store: &State<SessionStore>,
    db: &State<Storage>,
    settings: &State<Settings>,
    cookies: &CookieJar<'_>,
) -> Result<Json<Principal>, ErrorResponse> {
    let credentials = credentials.into_inner();

    if !settings.admin_password.is_empty()
        && credentials.email == settings.admin_email
        && credentials.password == settings.admin_password
    {
        let principal = Principal {
            id: 0,
            name: "Admin".to_string(),
            email: settings.admin_email.clone(),
            role: Role::Admin,
        };

        create_session(store, cookies, &principal)?;
        return Ok(Json(principal));
    }

    let conn = db.conn()?;

    use schema::users::dsl::*;

    let user = users
        .filter(email.eq(&credentials.email))
        .first::<User>(&conn)
        .optional()
        .map_err(|_| ErrorResponse::internal("Couldn't load user from database"))?
        .ok_or_else(|| ErrorResponse::unauthorized("Invalid credentials"))?;

    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ErrorResponse::unauthorized("Invalid credentials"))?;

    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| ErrorResponse::internal("Invalid password hash in database"))?;

    Argon2::default()
        .verify_password(credentials.password.as_bytes(), &parsed_hash)
        .map_err(|_| ErrorResponse::unauthorized("Invalid credentials"))?;

    let principal = Principal {
        id: user.id,
        name: user.name,
        role: resolve_role(&user.role, &user.email, &settings.admin_email),
        email: user.email,
    };

    create_session(store, cookies, &principal)?;

    Ok(Json(principal))
}

#[get("/session")]
pub(crate) fn session(principal: Principal) -> Json<Principal> {
    Json(principal)
}

#[get("/session", rank = 2)]
pub(crate) fn session_unauthorised() -> ErrorResponse {
    ErrorResponse::unauthorized("Login required")
}

#[post("/logout")]
pub(crate) fn logout(
    store: &State<SessionStore>,
    cookies: &CookieJar<'_>,
) -> Json<serde_json::Value> {
    if let Some(cookie) = cookies.get_private(SESSION_COOKIE) {
        if let Ok(session) = serde_json::from_str::<SessionCookie>(cookie.value()) {
            store.remove(&session.session_key);
        }
    }

    cookies.remove_private(SESSION_COOKIE);

    Json(serde_json::json!({ "success": true }))
}
