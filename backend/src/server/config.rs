//! HTTP server configuration assembled from the environment.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use chirp::outbound::persistence::{DbPool, PoolConfig};
use tracing::warn;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from explicit values.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// Without a pool the server runs on the in-memory stores, which is the
    /// local-development mode.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Assemble configuration from the environment.
    ///
    /// - `BIND_ADDR` (default `0.0.0.0:8080`)
    /// - `SESSION_KEY_FILE` (default `/var/run/secrets/session_key`); when
    ///   unreadable, debug builds and `SESSION_ALLOW_EPHEMERAL=1` fall back
    ///   to a generated key, release builds refuse to start
    /// - `SESSION_COOKIE_SECURE` (`0` disables the `Secure` cookie flag)
    /// - `DATABASE_URL` (optional; enables the PostgreSQL adapters)
    pub async fn from_env() -> std::io::Result<Self> {
        let key_path =
            env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
        let key = match std::fs::read(&key_path) {
            Ok(bytes) => Key::derive_from(&bytes),
            Err(e) => {
                let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                    Key::generate()
                } else {
                    return Err(std::io::Error::other(format!(
                        "failed to read session key at {key_path}: {e}"
                    )));
                }
            }
        };

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

        let mut config = Self::new(key, cookie_secure, SameSite::Lax, bind_addr);
        if let Ok(database_url) = env::var("DATABASE_URL") {
            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
            config = config.with_db_pool(pool);
        }
        Ok(config)
    }
}
