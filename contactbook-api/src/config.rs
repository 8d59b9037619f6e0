/// Configuration management for the API server
///
/// Configuration is layered, later sources overriding earlier ones:
///
/// 1. Built-in defaults ([`Config::default`])
/// 2. `config.json` in the working directory or its parent (optional)
/// 3. `APP__<SECTION>__<KEY>` environment variables, e.g. `APP__WEB__PORT=8080`
/// 4. Shorthands: `APP_PORT` (web port) and `DATABASE_URL`
///
/// A `.env` file is loaded into the environment first, if present.
///
/// # Environment Variables
///
/// - `APP_PORT`: Port to bind to (default: 3000)
/// - `DATABASE_URL`: PostgreSQL connection string; empty runs the in-memory store
/// - `RUST_LOG`: Log filter, overrides `log.level`
///
/// # Example
///
/// ```no_run
/// use contactbook_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use ::config::{builder::DefaultState, ConfigBuilder, Environment, File};
use contactbook_shared::auth::password::PasswordParams;
use contactbook_shared::db::pool::DatabaseConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub web: WebConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Password hashing cost
    pub security: SecurityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Path prefix for every resource route (health stays at the root)
    pub prefix: String,

    /// Allowed CORS origins; `"*"` allows any
    pub cors_origins: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            prefix: "/api".to_string(),
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,

    /// `pretty` or `json`
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Argon2id cost settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let params = PasswordParams::default();
        Self {
            argon2_memory_kib: params.memory_kib,
            argon2_iterations: params.iterations,
            argon2_parallelism: params.parallelism,
        }
    }
}

impl Config {
    /// Loads configuration from defaults, `config.json` and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or a value has the
    /// wrong type (e.g. a non-numeric port).
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let builder = Self::defaults()?
            .add_source(File::with_name("../config").required(false))
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("web.port", env::var("APP_PORT").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?;

        Self::finish(builder)
    }

    fn defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
        Ok(::config::Config::builder().add_source(::config::Config::try_from(&Config::default())?))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let config: Config = builder.build()?.try_deserialize()?;

        if !config.web.prefix.is_empty() && !config.web.prefix.starts_with('/') {
            anyhow::bail!("web.prefix must start with '/': {}", config.web.prefix);
        }

        Ok(config)
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.web.host, self.web.port)
    }

    /// Route prefix without a trailing slash (`""` for none)
    pub fn route_prefix(&self) -> &str {
        self.web.prefix.trim_end_matches('/')
    }

    /// Argon2id parameters for new password hashes
    pub fn password_params(&self) -> PasswordParams {
        PasswordParams {
            memory_kib: self.security.argon2_memory_kib,
            iterations: self.security.argon2_iterations,
            parallelism: self.security.argon2_parallelism,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::FileFormat;

    fn from_json(json: &str) -> anyhow::Result<Config> {
        Config::finish(Config::defaults()?.add_source(File::from_str(json, FileFormat::Json)))
    }

    #[test]
    fn test_defaults() {
        let config = from_json("{}").unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.route_prefix(), "/api");
        assert_eq!(config.web.cors_origins, vec!["*".to_string()]);
        assert!(!config.database.is_configured());
        assert_eq!(config.password_params(), PasswordParams::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = from_json(
            r#"{
                "web": { "port": 8080, "prefix": "/v2/" },
                "database": { "url": "postgresql://localhost/test", "max_connections": 3 },
                "security": { "argon2_memory_kib": 1024 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.route_prefix(), "/v2");
        assert_eq!(config.database.url, "postgresql://localhost/test");
        assert_eq!(config.database.max_connections, 3);
        assert_eq!(config.database.min_connections, 2);
        assert_eq!(config.password_params().memory_kib, 1024);
        assert_eq!(config.password_params().iterations, 3);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(from_json(r#"{ "web": { "port": "not-a-port" } }"#).is_err());
        assert!(from_json(r#"{ "web": { "prefix": "api" } }"#).is_err());
    }
}
