/// Configuration management for the API service
///
/// Everything is read from environment variables; `main` loads a `.env`
/// file first when one exists. Database pool settings are read separately by
/// `db_pool::DbConfig` and only when the Postgres backend is selected.
use db_pool::env_utils::{parse_env_list, parse_env_strict};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MIN_JWT_SECRET_BYTES: usize = 32;
const DEV_JWT_SECRET: &str = "connect-development-secret-do-not-use-in-prod";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    #[serde(skip_serializing)]
    pub auth: AuthConfig,
    pub store: StoreBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; a single `*` allows any origin (non-production only)
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity issuer
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = env.eq_ignore_ascii_case("production");

        let app = AppConfig {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_strict("API_PORT", 5000)?,
            env,
        };

        let allowed_origins = match parse_env_list("CORS_ALLOWED_ORIGINS") {
            Some(origins) => origins,
            None if production => {
                return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
            }
            None => vec!["http://localhost:3000".to_string()],
        };

        if production && allowed_origins.iter().any(|o| o == "*") {
            return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
        }

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if production => return Err("JWT_SECRET must be set in production".to_string()),
            Err(_) => DEV_JWT_SECRET.to_string(),
        };

        if production && jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(format!(
                "JWT_SECRET must be at least {} bytes in production",
                MIN_JWT_SECRET_BYTES
            ));
        }

        let store = match std::env::var("STORE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StoreBackend::Postgres,
        };

        Ok(Config {
            app,
            cors: CorsConfig { allowed_origins },
            auth: AuthConfig { jwt_secret },
            store,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors.allowed_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "APP_ENV",
        "API_HOST",
        "API_PORT",
        "CORS_ALLOWED_ORIGINS",
        "JWT_SECRET",
        "STORE_BACKEND",
    ];

    fn clear() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_development_defaults() {
        clear();
        let config = Config::from_env().unwrap();

        assert_eq!(config.app.port, 5000);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.store, StoreBackend::Postgres);
        assert!(!config.is_production());
        assert!(!config.auth.jwt_secret.is_empty());
    }

    #[test]
    #[serial]
    fn test_production_requires_cors_and_secret() {
        clear();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().unwrap_err().contains("CORS_ALLOWED_ORIGINS"));

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().unwrap_err().contains("'*'"));

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://connect.example.com");
        assert!(Config::from_env().unwrap_err().contains("JWT_SECRET"));

        std::env::set_var("JWT_SECRET", "short");
        assert!(Config::from_env().unwrap_err().contains("at least"));

        std::env::set_var("JWT_SECRET", "a".repeat(32));
        let config = Config::from_env().unwrap();
        assert!(config.is_production());
        clear();
    }

    #[test]
    #[serial]
    fn test_store_backend_and_port_parsing() {
        clear();
        std::env::set_var("STORE_BACKEND", "Memory");
        std::env::set_var("API_PORT", "8080");
        let config = Config::from_env().unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.app.port, 8080);

        std::env::set_var("STORE_BACKEND", "mongo");
        assert!(Config::from_env().is_err());

        std::env::set_var("STORE_BACKEND", "memory");
        std::env::set_var("API_PORT", "eighty");
        assert!(Config::from_env().is_err());
        clear();
    }

    #[test]
    fn test_secret_is_redacted() {
        let auth = AuthConfig {
            jwt_secret: "super-secret".to_string(),
        };
        assert!(!format!("{:?}", auth).contains("super-secret"));
    }
}
