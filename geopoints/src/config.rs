//! Database connection settings.
//!
//! Settings are read from the environment:
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DB_HOST` | Database host | `localhost` |
//! | `DB_PORT` | Database port | `5432` |
//! | `DB_USER` | Database user | `postgres` |
//! | `DB_PASSWORD` | Database password | None |
//! | `DB_NAME` | Database name | `mnaccidents` |
//! | `DB_SSLMODE` | `disable`, `allow`, `prefer`, `require`, `verify-ca` or `verify-full` | `disable` |
//! | `DB_MAX_CONNECTIONS` | Connection pool size | 10 |

use std::fmt;
use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::error::ConfigError;

/// Default pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection settings for the PostGIS database.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub sslmode: PgSslMode,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: None,
            database: "mnaccidents".to_string(),
            sslmode: PgSslMode::Disable,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("sslmode", &self.sslmode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    /// Read the configuration from `DB_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `DB_PORT`, `DB_SSLMODE` or `DB_MAX_CONNECTIONS`
    /// is set to a value that cannot be parsed, or `DB_MAX_CONNECTIONS` is 0.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: get("DB_HOST").unwrap_or(defaults.host),
            port: parse_var(&get, "DB_PORT")?.unwrap_or(defaults.port),
            user: get("DB_USER").unwrap_or(defaults.user),
            password: get("DB_PASSWORD"),
            database: get("DB_NAME").unwrap_or(defaults.database),
            sslmode: parse_var(&get, "DB_SSLMODE")?.unwrap_or(defaults.sslmode),
            max_connections: parse_max_connections(&get)?
                .unwrap_or(defaults.max_connections),
        })
    }

    /// Set the database host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the database port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the user to authenticate as.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the password used to authenticate.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the TLS negotiation mode.
    pub fn sslmode(mut self, sslmode: PgSslMode) -> Self {
        self.sslmode = sslmode;
        self
    }

    /// Build sqlx connection options from this configuration.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database)
            .ssl_mode(self.sslmode);

        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

fn parse_var<G, T>(get: &G, key: &'static str) -> Result<Option<T>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    get(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value })
        })
        .transpose()
}

/// A pool of zero connections could never serve a query.
fn parse_max_connections<G>(get: &G) -> Result<Option<u32>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    const KEY: &str = "DB_MAX_CONNECTIONS";

    match parse_var::<_, u32>(get, KEY)? {
        Some(0) => Err(ConfigError::InvalidValue {
            key: KEY,
            value: get(KEY).unwrap_or_default(),
        }),
        other => Ok(other),
    }
}
