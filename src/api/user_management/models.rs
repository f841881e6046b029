use crate::schema::users;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Debug)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
}

#[derive(Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// The authenticated actor behind a request, as stored in the session.
#[derive(Clone, Debug, Serialize)]
pub struct Principal {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    /// Display name, falling back to the email for accounts that never
    /// supplied one.
    pub(crate) fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// The designated admin email is granted admin unconditionally; every
/// other identity gets its stored role, defaulting to a plain user.
pub(crate) fn resolve_role(stored: &str, email: &str, admin_email: &str) -> Role {
    if !admin_email.is_empty() && email == admin_email {
        Role::Admin
    } else if stored == "admin" {
        Role::Admin
    } else {
        Role::User
    }
}
