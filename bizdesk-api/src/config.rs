use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub backend: BackendConfig,
    pub server: Option<ServerConfig>,
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub validation: ValidationMode,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            }),
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:5173".to_string()],
            }),
            validation: ValidationMode::Lenient,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Hosted,
    #[default]
    Local,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    /// Base URL of the hosted backend, e.g. `https://xyz.supabase.co`
    pub url: Option<String>,
    pub anon_key: Option<String>,
    /// Token of an already signed-in user
    pub access_token: Option<String>,
    /// SQLite file for the local backend
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Whether submits are range-checked before reaching the backend.
///
/// `lenient` stores whatever the form produced (e.g. probability 150);
/// `strict` rejects required-field gaps and out-of-range numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Lenient,
    Strict,
}

impl ApiConfig {
    /// Load from the default location, creating it with defaults on first run.
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();
        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = toml::to_string_pretty(&ApiConfig::default()).map_err(|e| {
                ConfigError::Message(format!("Failed to render default config: {e}"))
            })?;
            std::fs::write(config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        // BIZDESK_BACKEND__URL, BIZDESK_BACKEND__ANON_KEY, ... override the file
        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .add_source(
                Environment::with_prefix("BIZDESK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        builder.try_deserialize()
    }

    pub fn listen_address(&self) -> (String, u16) {
        match &self.server {
            Some(server) => (server.host.clone(), server.port),
            None => ("127.0.0.1".to_string(), 8080),
        }
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("bizdesk").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
