use serde::{Deserialize, Serialize};
use std::env;

/// Secret used when `SECRET_KEY` is unset outside production.
pub const DEVELOPMENT_SECRET: &str = "cook-taste-development-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub secret_key: Option<String>,
    pub token_ttl_secs: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SECRET_KEY must be set in production")]
    MissingSecret,

    #[error("Invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(#[from] url::ParseError),

    #[error("DATABASE_URL cannot carry credentials: {0}")]
    CredentialsRejected(String),
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("RUST_LOG") {
            self.server.log_filter = v;
        }

        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_USER") {
            self.database.user = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("DB_PASSWORD") {
            self.database.password = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        if let Ok(v) = env::var("SECRET_KEY") {
            self.security.secret_key = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("TOKEN_TTL_SECS") {
            self.security.token_ttl_secs = v.parse().unwrap_or(self.security.token_ttl_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 5000,
                log_filter: "cook_taste_api=debug,tower_http=debug".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/cook_taste".to_string(),
                user: None,
                password: None,
                max_connections: 5,
            },
            security: SecurityConfig {
                secret_key: None,
                token_ttl_secs: 60 * 60,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 5000,
                log_filter: "info".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/cook_taste".to_string(),
                user: None,
                password: None,
                max_connections: 20,
            },
            security: SecurityConfig {
                secret_key: None,
                token_ttl_secs: 60 * 60,
            },
        }
    }

    /// Signing secret for identity tokens.
    ///
    /// Production refuses to start without `SECRET_KEY`; development falls back
    /// to [`DEVELOPMENT_SECRET`].
    pub fn secret_key(&self) -> Result<String, ConfigError> {
        match (&self.security.secret_key, self.environment) {
            (Some(secret), _) => Ok(secret.clone()),
            (None, Environment::Production) => Err(ConfigError::MissingSecret),
            (None, Environment::Development) => {
                tracing::warn!("SECRET_KEY not set, using the development secret");
                Ok(DEVELOPMENT_SECRET.to_string())
            }
        }
    }

    /// Postgres connection string with `DB_USER` / `DB_PASSWORD` spliced in.
    pub fn connection_string(&self) -> Result<String, ConfigError> {
        let mut url = url::Url::parse(&self.database.url)?;
        if let Some(user) = &self.database.user {
            url.set_username(user)
                .map_err(|_| ConfigError::CredentialsRejected(self.database.url.clone()))?;
        }
        if let Some(password) = &self.database.password {
            url.set_password(Some(password))
                .map_err(|_| ConfigError::CredentialsRejected(self.database.url.clone()))?;
        }
        Ok(url.to_string())
    }
}
