use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager};

use crate::error::ErrorResponse;

pub(crate) type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub(crate) type Conn = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Managed handle to the item/user store. The pool is absent when no
/// `DATABASE_URL` is configured; every request that needs persistence
/// then fails with a distinct "database not configured" error instead
/// of a connection fault.
pub(crate) struct Storage(Option<Pool>);

impl Storage {
    pub(crate) fn connect(database_url: Option<&str>) -> Storage {
        let pool = database_url.and_then(|url| {
            let manager = ConnectionManager::<PgConnection>::new(url);
            match Pool::builder().build(manager) {
                Ok(pool) => Some(pool),
                Err(err) => {
                    log::error!("Couldn't create database pool: {}", err);
                    None
                }
            }
        });

        if pool.is_none() {
            log::warn!("DATABASE_URL not set; persistence is unavailable");
        }

        Storage(pool)
    }

    pub(crate) fn conn(&self) -> Result<Conn, ErrorResponse> {
        let pool = self
            .0
            .as_ref()
            .ok_or_else(|| ErrorResponse::service_unavailable("Database not configured"))?;

        pool.get()
            .map_err(|_| ErrorResponse::internal("Couldn't connect to database"))
    }

    fn try_conn(&self) -> Option<Conn> {
        self.0.as_ref().and_then(|pool| pool.get().ok())
    }
}

embed_migrations!();

pub(crate) fn run_migrations(storage: &Storage) {
    if let Some(conn) = storage.try_conn() {
        if let Err(err) = embedded_migrations::run(&*conn) {
            log::error!("Couldn't run database migrations: {}", err);
        }
    }
}
