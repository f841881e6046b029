use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub google_client_id: String,
    pub admin_email: String,
    pub admin_password: String,
    pub database_url: Option<String>,
}

impl Settings {
    pub fn new() -> Self {
        Config::builder()
            .set_default("google_client_id", "")
            .unwrap()
            .set_default("admin_email", "")
            .unwrap()
            .set_default("admin_password", "")
            .unwrap()
            .add_source(Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}
