use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub pairing: PairingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_input_type")]
    pub input_type: String,
    pub batch_size: Option<usize>,
    pub timeout_secs: Option<u64>,
}

fn default_embedding_endpoint() -> String { "https://api.cohere.ai/v1".to_string() }
fn default_embedding_model() -> String { "embed-english-v3.0".to_string() }
fn default_input_type() -> String { "classification".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    /// Unset means the in-memory user store is used
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Unset means L1-only caching
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairingSettings {
    #[serde(default = "default_max_profiles")]
    pub max_profiles: usize,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            max_profiles: default_max_profiles(),
        }
    }
}

fn default_max_profiles() -> usize { crate::core::DEFAULT_MAX_PROFILES }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PAIRING__)
    /// 5. DATABASE_URL, REDIS_URL and COHERE_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PAIRING__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        let settings = apply_env_overrides(settings, |name| std::env::var(name).ok())?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("PAIRING")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Conventional variables that override the structured ones
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis_url"),
    ("COHERE_API_KEY", "embedding.api_key"),
];

fn apply_env_overrides<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    for (var, key) in ENV_OVERRIDES {
        if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
            builder = builder.set_override(*key, value)?;
        }
    }

    builder.build()
}
