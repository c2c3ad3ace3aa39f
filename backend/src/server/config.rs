//! Server settings loaded via OrthoConfig and the assembled server config.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use ticketclass::outbound::persistence::{DEFAULT_MAX_SIZE, DbPool};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Process settings read from CLI flags, `TICKETCLASS_*` environment
/// variables and configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TICKETCLASS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Parse the bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw}: {err}"),
            )
        })
    }

    /// Return the database URL; startup cannot proceed without one.
    pub fn database_url(&self) -> std::io::Result<&str> {
        self.database_url.as_deref().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "TICKETCLASS_DATABASE_URL is not set",
            )
        })
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_MAX_SIZE)
    }
}

/// Everything `create_server` needs to build the application.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        db_pool: DbPool,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Settings parsing against a locked environment.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "TICKETCLASS_BIND_ADDR",
        "TICKETCLASS_DATABASE_URL",
        "TICKETCLASS_POOL_MAX_SIZE",
        "TICKETCLASS_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("ticketclass")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal address")
        );
        assert!(settings.database_url().is_err());
        assert_eq!(settings.pool_max_size(), DEFAULT_MAX_SIZE);
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TICKETCLASS_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "TICKETCLASS_DATABASE_URL",
                Some("postgres://helpdesk@db/ticketclass".to_owned()),
            ),
            ("TICKETCLASS_POOL_MAX_SIZE", Some("4".to_owned())),
            ("TICKETCLASS_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address").to_string(),
            "127.0.0.1:9000"
        );
        assert_eq!(
            settings.database_url().expect("url"),
            "postgres://helpdesk@db/ticketclass"
        );
        assert_eq!(settings.pool_max_size(), 4);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn malformed_bind_address_is_rejected() {
        let settings = ServerSettings {
            bind_addr: Some("localhost".to_owned()),
            database_url: None,
            pool_max_size: None,
            run_migrations: true,
        };
        let err = settings.bind_addr().expect_err("missing port");
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
