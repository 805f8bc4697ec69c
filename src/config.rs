//! Environment-driven configuration.
//!
//! Everything is read once at start-up. Optional credentials that are absent
//! disable their integration instead of failing the boot; only `DATABASE_URL`
//! is mandatory.

use std::time::Duration;

use crate::auth::AuthMode;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_IDENTITY_API_URL: &str = "https://api.clerk.com/v1";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";
pub const DEFAULT_HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Variables whose absence marks the environment as `missing_variables`.
pub const REQUIRED_VARS: &[&str] = &["DATABASE_URL", "IDENTITY_SECRET_KEY", "IDENTITY_PUBLISHABLE_KEY"];

/// Variables whose absence only produces a warning in the health report.
pub const OPTIONAL_VARS: &[&str] = &[
    "GROQ_API_KEY",
    "ANTHROPIC_API_KEY",
    "HUGGINGFACE_API_KEY",
    "PEXELS_API_KEY",
    "NEO4J_URI",
    "NEO4J_USERNAME",
    "NEO4J_PASSWORD",
];

#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    pub groq: Option<String>,
    pub groq_base_url: String,
    pub anthropic: Option<String>,
    pub anthropic_base_url: String,
    pub anthropic_model: String,
    pub huggingface: Option<String>,
    pub huggingface_base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub session_key: Option<String>,
    pub app_env: String,
    pub identity_api_url: String,
    pub identity_secret_key: Option<String>,
    pub identity_publishable_key: Option<String>,
    pub providers: ProviderKeys,
    pub pexels_api_key: Option<String>,
    pub neo4j: Option<Neo4jConfig>,
    pub http_timeout: Duration,
    pub outline_slide_count: usize,
    pub max_generated_slides: usize,
    pub missing_vars: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{name} must be set"),
            ConfigError::Invalid { name, value } => write!(f, "{name} has invalid value '{value}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Load configuration from the process environment (after `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary lookup, used by tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let neo4j = match (get("NEO4J_URI"), get("NEO4J_USERNAME"), get("NEO4J_PASSWORD")) {
            (Some(uri), Some(username), Some(password)) => Some(Neo4jConfig { uri, username, password }),
            _ => None,
        };

        let missing_vars = REQUIRED_VARS
            .iter()
            .filter(|name| get(name).is_none())
            .map(|name| name.to_string())
            .collect();
        let warnings = OPTIONAL_VARS
            .iter()
            .filter(|name| get(name).is_none())
            .map(|name| format!("Optional variable {name} is not set"))
            .collect();

        Ok(AppConfig {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), 8)?,
            session_key: get("SESSION_KEY"),
            app_env: get("APP_ENV").unwrap_or_else(|| "production".to_string()),
            identity_api_url: get("IDENTITY_API_URL").unwrap_or_else(|| DEFAULT_IDENTITY_API_URL.to_string()),
            identity_secret_key: get("IDENTITY_SECRET_KEY"),
            identity_publishable_key: get("IDENTITY_PUBLISHABLE_KEY"),
            providers: ProviderKeys {
                groq: get("GROQ_API_KEY"),
                groq_base_url: get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
                anthropic: get("ANTHROPIC_API_KEY"),
                anthropic_base_url: get("ANTHROPIC_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
                anthropic_model: get("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
                huggingface: get("HUGGINGFACE_API_KEY"),
                huggingface_base_url: get("HUGGINGFACE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_HUGGINGFACE_BASE_URL.to_string()),
            },
            pexels_api_key: get("PEXELS_API_KEY"),
            neo4j,
            http_timeout: Duration::from_secs(parse_or("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"), 30)?),
            outline_slide_count: parse_or("OUTLINE_SLIDE_COUNT", get("OUTLINE_SLIDE_COUNT"), 8)?,
            max_generated_slides: parse_or("MAX_GENERATED_SLIDES", get("MAX_GENERATED_SLIDES"), 10)?,
            missing_vars,
            warnings,
        })
    }

    /// The development bypass only applies when both the environment and
    /// the provider secret say this is a throwaway setup.
    pub fn auth_mode(&self) -> AuthMode {
        let dev_env = self.app_env.eq_ignore_ascii_case("development");
        let dev_secret = self
            .identity_secret_key
            .as_deref()
            .is_some_and(|key| key.contains("test") || key.contains("development"));
        if dev_env && dev_secret {
            AuthMode::DevBypass
        } else {
            AuthMode::Enforced
        }
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}
