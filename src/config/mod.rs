use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Application configuration structure
///
/// Features:
/// - AppSettings
/// - ServerConfig
/// - DatabaseConfig
/// - UploadConfig

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub debug: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Document database configuration
///
/// A `url` starting with `memory://` keeps the catalog in process memory,
/// which is handy for local runs without a MongoDB instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub collection: String,
}

/// Image upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory uploaded images are written to
    pub dir: String,
    /// URL prefix the upload directory is served under
    pub public_path: String,
    /// Size ceiling for a single image, in bytes
    pub max_file_size: usize,
}

pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.url.starts_with("memory://")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "food-del".to_string(),
                version: "1.0.0".to_string(),
                debug: true,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
            },
            database: DatabaseConfig {
                url: "mongodb://localhost:27017".to_string(),
                name: "food_del".to_string(),
                collection: "foods".to_string(),
            },
            upload: UploadConfig {
                dir: "uploads".to_string(),
                public_path: "/images".to_string(),
                max_file_size: DEFAULT_MAX_FILE_SIZE,
            },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        info!("Loading application configuration...");

        let config: AppConfig = Figment::new()
            // Start with default values
            .merge(Serialized::defaults(Self::default()))
            // Override with config file if present
            .merge(Yaml::file("config.yaml"))
            // Override with environment variables, e.g. APP_DATABASE__URL
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        info!("Configuration loaded successfully");
        info!("name: {:?}", config.app.name);
        info!("Database: {} / {}", config.database.name, config.database.collection);
        info!("Upload dir: {} (max {} bytes)", config.upload.dir, config.upload.max_file_size);

        Ok(config)
    }
}
