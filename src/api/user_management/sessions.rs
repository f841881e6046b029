use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use rocket::http::{Cookie, CookieJar, Status};
use rocket::request::{self, FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};

use crate::api::user_management::models::Principal;
use crate::error::{ApiError, ErrorResponse};

pub(crate) const SESSION_COOKIE: &str = "session";
const SESSION_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 30);

/// Server-side session table, constructed at launch and handed to
/// handlers as managed state.
pub(crate) struct SessionStore {
    sessions: Mutex<HashMap<String, Principal>>,
}

impl SessionStore {
    pub(crate) fn new() -> SessionStore {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn insert(&self, principal: Principal) -> Result<String, ErrorResponse> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ErrorResponse::internal("Couldn't update user session"))?;

        let session_key = generate_session_key();
        sessions.insert(session_key.clone(), principal);

        Ok(session_key)
    }

    pub(crate) fn get(&self, session_key: &str) -> Option<Principal> {
        self.sessions.lock().ok()?.get(session_key).cloned()
    }

    pub(crate) fn remove(&self, session_key: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(session_key);
        }
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct SessionCookie {
    pub(crate) session_key: String,
    pub(crate) creation_time: SystemTime,
}

fn generate_session_key() -> String {
    const LEN: usize = 32;

    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(LEN)
        .map(char::from)
        .collect()
}

/// Stores the principal server-side and drops the session key into a
/// private cookie.
pub(crate) fn create_session(
    store: &SessionStore,
    cookies: &CookieJar<'_>,
    principal: &Principal,
) -> Result<(), ErrorResponse> {
    let session_key = store.insert(principal.clone())?;

    let cookie = SessionCookie {
        session_key,
        creation_time: SystemTime::now(),
    };

    let cookie_string = serde_json::to_string(&cookie).map_err(|err| {
        ErrorResponse::with_details(
            Status::InternalServerError,
            "Couldn't create session cookie",
            err.to_string(),
        )
    })?;

    cookies.add_private(Cookie::new(SESSION_COOKIE, cookie_string));

    Ok(())
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Principal {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let cookie = match req.cookies().get_private(SESSION_COOKIE) {
            Some(cookie) => cookie,
            None => return Outcome::Forward(Status::Unauthorized),
        };

        let session: SessionCookie = match serde_json::from_str(cookie.value()) {
            Ok(session) => session,
            Err(_) => return Outcome::Forward(Status::Unauthorized),
        };

        // A clock that ran backwards counts as an expired session.
        match session.creation_time.elapsed() {
            Ok(age) if age <= SESSION_MAX_AGE => {}
            _ => return Outcome::Forward(Status::Unauthorized),
        }

        let store = match req.guard::<&State<SessionStore>>().await {
            Outcome::Success(store) => store,
            _ => {
                return Outcome::Error((
                    Status::InternalServerError,
                    ApiError::new("Couldn't get session store".to_string()),
                ))
            }
        };

        match store.get(&session.session_key) {
            Some(principal) => Outcome::Success(principal),
            None => Outcome::Forward(Status::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::user_management::models::Role;

    fn principal() -> Principal {
        Principal {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn session_keys_are_alphanumeric_and_long_enough() {
        let key = generate_session_key();
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn inserted_sessions_resolve_to_their_principal() {
        let store = SessionStore::new();
        let key = store.insert(principal()).unwrap();

        let found = store.get(&key).unwrap();
        assert_eq!(found.email, "alice@example.com");
        assert_eq!(found.role, Role::User);
    }

    #[test]
    fn unknown_and_removed_keys_resolve_to_nothing() {
        let store = SessionStore::new();
        assert!(store.get("nope").is_none());

        let key = store.insert(principal()).unwrap();
        store.remove(&key);
        assert!(store.get(&key).is_none());
    }
}
