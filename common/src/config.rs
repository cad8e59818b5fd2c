// common/src/config.rs
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use config::{Config as ConfigFile, File, Environment};

/// Central configuration for the dashboard
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub web_server_addr: String,
    /// Base URL of the backend REST API, e.g. `http://localhost:3000/api`
    pub api_base_url: String,
    pub log_level: String,

    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Treat expired or undecodable tokens as "no session" in the route guard
    pub enforce_expiry: bool,
    /// Send the user back to the page they asked for after logging in
    pub return_to_origin: bool,
    /// Mark session cookies `Secure` (requires HTTPS)
    pub secure_cookies: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: i64,
    pub cleanup_interval_seconds: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaticFilesConfig {
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_server_addr: "127.0.0.1:8081".to_string(),
            api_base_url: "http://localhost:3000/api".to_string(),
            log_level: "info".to_string(),

            auth: AuthConfig {
                enforce_expiry: true,
                return_to_origin: true,
                secure_cookies: false,
            },
            cache: CacheConfig {
                ttl_seconds: 30,
                cleanup_interval_seconds: 60,
            },
            static_files: StaticFilesConfig {
                path: "./static".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Check if we're in the project root or a subcrate
                let mut path = PathBuf::from("./config");
                if !path.exists() {
                    path = PathBuf::from("../config");
                }
                path
            });

        tracing::info!("Loading configuration from {}", config_dir.display());
        tracing::info!("Using run mode: {}", run_mode);

        let defaults = Config::default();

        let config = ConfigFile::builder()
            .set_default("web_server_addr", defaults.web_server_addr)?
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("log_level", defaults.log_level)?
            .set_default("auth.enforce_expiry", defaults.auth.enforce_expiry)?
            .set_default("auth.return_to_origin", defaults.auth.return_to_origin)?
            .set_default("auth.secure_cookies", defaults.auth.secure_cookies)?
            .set_default("cache.ttl_seconds", defaults.cache.ttl_seconds)?
            .set_default("cache.cleanup_interval_seconds", defaults.cache.cleanup_interval_seconds)?
            .set_default("static_files.path", defaults.static_files.path)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", run_mode))).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // APP__API_BASE_URL, APP__AUTH__ENFORCE_EXPIRY, ...
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load from files, falling back to plain environment variables
    pub fn from_env() -> Self {
        match Self::load() {
            Ok(config) => {
                tracing::info!("Configuration loaded from files and environment");
                config
            },
            Err(e) => {
                tracing::warn!("Failed to load configuration from files: {}", e);
                tracing::info!("Falling back to environment variables only");

                let defaults = Config::default();

                let web_server_addr = env::var("WEB_SERVER_ADDR")
                    .unwrap_or(defaults.web_server_addr);

                let api_base_url = env::var("API_BASE_URL")
                    .unwrap_or(defaults.api_base_url);

                let log_level = env::var("LOG_LEVEL")
                    .unwrap_or(defaults.log_level);

                let enforce_expiry = env::var("ENFORCE_TOKEN_EXPIRY")
                    .map(|v| v.to_lowercase() == "true")
                    .unwrap_or(defaults.auth.enforce_expiry);

                let return_to_origin = env::var("RETURN_TO_ORIGIN")
                    .map(|v| v.to_lowercase() == "true")
                    .unwrap_or(defaults.auth.return_to_origin);

                let secure_cookies = env::var("SECURE_COOKIES")
                    .map(|v| v.to_lowercase() == "true")
                    .unwrap_or(defaults.auth.secure_cookies);

                let ttl_seconds = env::var("CACHE_TTL_SECONDS")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok())
                    .unwrap_or(defaults.cache.ttl_seconds);

                let cleanup_interval_seconds = env::var("CACHE_CLEANUP_INTERVAL_SECONDS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(defaults.cache.cleanup_interval_seconds);

                let static_files_path = env::var("STATIC_FILES_PATH")
                    .unwrap_or(defaults.static_files.path);

                Self {
                    web_server_addr,
                    api_base_url,
                    log_level,
                    auth: AuthConfig {
                        enforce_expiry,
                        return_to_origin,
                        secure_cookies,
                    },
                    cache: CacheConfig {
                        ttl_seconds,
                        cleanup_interval_seconds,
                    },
                    static_files: StaticFilesConfig {
                        path: static_files_path,
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enforce_expiry() {
        let config = Config::default();
        assert!(config.auth.enforce_expiry);
        assert!(config.auth.return_to_origin);
        assert_eq!(config.api_base_url, "http://localhost:3000/api");
    }

    #[test]
    fn test_deserialize_from_toml_source() {
        let toml = r#"
            web_server_addr = "0.0.0.0:9000"
            api_base_url = "http://api.internal/api"
            log_level = "debug"

            [auth]
            enforce_expiry = false
            return_to_origin = false
            secure_cookies = true

            [cache]
            ttl_seconds = 5
            cleanup_interval_seconds = 10

            [static_files]
            path = "/srv/static"
        "#;

        let config: Config = ConfigFile::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api_base_url, "http://api.internal/api");
        assert!(!config.auth.enforce_expiry);
        assert!(config.auth.secure_cookies);
        assert_eq!(config.cache.ttl_seconds, 5);
    }
}
