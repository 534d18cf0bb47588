use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Model artifact configuration
    pub model: ModelConfig,

    /// Keyword lexicon configuration
    pub lexicon: LexiconConfig,

    /// Inbound authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: CLASSIFIER_)
            .add_source(
                config::Environment::with_prefix("CLASSIFIER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                http_port: default_http_port(),
                request_timeout_secs: default_request_timeout(),
            },
            model: ModelConfig {
                artifact_path: default_artifact_path(),
                metadata_path: default_metadata_path(),
                base_descriptor: default_base_descriptor(),
            },
            lexicon: LexiconConfig {
                path: default_lexicon_path(),
            },
            auth: AuthConfig::default(),
            observability: ObservabilityConfig {
                log_level: default_log_level(),
                json_logs: false,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Request timeout (seconds), applied by the transport layer around
    /// the whole per-request pipeline
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the trained model artifact (JSON)
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,

    /// Path to the training metadata sidecar (JSON)
    #[serde(default = "default_metadata_path")]
    pub metadata_path: String,

    /// Descriptor reported when no trained artifact is available
    #[serde(default = "default_base_descriptor")]
    pub base_descriptor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Path to the keyword lexicon document (JSON)
    #[serde(default = "default_lexicon_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Environment variable holding the inbound API key; when unset or
    /// empty, authentication is disabled
    pub api_key_env: Option<String>,
}

impl AuthConfig {
    /// Resolve the configured API key from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .filter(|v| !v.is_empty())
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8001
}

fn default_request_timeout() -> u64 {
    10
}

fn default_artifact_path() -> String {
    "data/model/artifact.json".to_string()
}

fn default_metadata_path() -> String {
    "data/model/metadata.json".to_string()
}

fn default_base_descriptor() -> String {
    "base-multilingual-generic".to_string()
}

fn default_lexicon_path() -> String {
    "config/keywords.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_http_port(), 8001);
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_lexicon_path(), "config/keywords.json");
    }

    #[test]
    fn test_auth_disabled_by_default() {
        let auth = AuthConfig::default();
        assert!(auth.resolve_api_key().is_none());
    }

    #[test]
    fn test_embedded_default_config_parses() {
        let parsed: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(parsed.server.http_port, 8001);
    }
}
