use crate::error::RecipeError;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// API key shared by the generative-AI services (can also be set via environment variable)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Text generation service
    #[serde(default)]
    pub text: TextModelConfig,
    /// Image generation service
    #[serde(default)]
    pub image: ImageModelConfig,
    /// Stock photo service used when image generation fails
    #[serde(default)]
    pub fallback_image: FallbackImageConfig,
    /// Where saved recipes live
    #[serde(default)]
    pub storage: StorageConfig,
    /// Base URL that share links point at
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            text: TextModelConfig::default(),
            image: ImageModelConfig::default(),
            fallback_image: FallbackImageConfig::default(),
            storage: StorageConfig::default(),
            share_base_url: default_share_base_url(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for the structured text generation service
#[derive(Debug, Deserialize, Clone)]
pub struct TextModelConfig {
    /// Provider name ("google" or "openai")
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier (e.g., "gemini-2.5-flash")
    #[serde(default = "default_text_model")]
    pub model: String,
    /// Sampling temperature; high so repeated requests give different dishes
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl Default for TextModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_text_model(),
            temperature: default_temperature(),
            base_url: None,
        }
    }
}

/// Configuration for the image generation service
#[derive(Debug, Deserialize, Clone)]
pub struct ImageModelConfig {
    /// Provider name ("google" or "openai")
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier (e.g., "imagen-4.0-generate-001")
    #[serde(default = "default_image_model")]
    pub model: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl Default for ImageModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_image_model(),
            aspect_ratio: default_aspect_ratio(),
            mime_type: default_mime_type(),
            base_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FallbackImageConfig {
    #[serde(default = "default_fallback_base_url")]
    pub base_url: String,
}

impl Default for FallbackImageConfig {
    fn default() -> Self {
        Self {
            base_url: default_fallback_base_url(),
        }
    }
}

/// Configuration for saved recipe storage
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the storage slot; platform data dir when unset
    pub dir: Option<PathBuf>,
    /// Name of the slot holding the saved collection
    #[serde(default = "default_slot")]
    pub slot: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            slot: default_slot(),
        }
    }
}

impl StorageConfig {
    /// Resolve the storage directory, falling back to `<data dir>/naija-recipes`.
    pub fn resolve_dir(&self) -> Result<PathBuf, RecipeError> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("naija-recipes"))
            .ok_or_else(|| {
                RecipeError::StorageError("Could not determine data directory".to_string())
            })
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "imagen-4.0-generate-001".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

fn default_fallback_base_url() -> String {
    "https://source.unsplash.com/1600x900/".to_string()
}

fn default_slot() -> String {
    "saved_recipes".to_string()
}

fn default_share_base_url() -> String {
    "https://naija-recipes.app/".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Environment variables consulted for the API key when the config has none
const API_KEY_VARS: [&str; 3] = ["NAIJA_API_KEY", "GEMINI_API_KEY", "OPENAI_API_KEY"];

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with NAIJA__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: NAIJA__TEXT__MODEL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// The API key from config, or from the first known environment variable.
    ///
    /// A missing key is fatal: nothing can be generated without it.
    pub fn resolve_api_key(&self) -> Result<String, RecipeError> {
        self.resolve_api_key_with(|var| std::env::var(var).ok())
    }

    /// Same as [`AppConfig::resolve_api_key`], reading variables through `lookup`.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Result<String, RecipeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                API_KEY_VARS
                    .iter()
                    .filter_map(|var| lookup(var))
                    .find(|key| !key.trim().is_empty())
            })
            .ok_or_else(|| {
                RecipeError::MissingApiKey(format!(
                    "set api_key in config.toml or one of {}",
                    API_KEY_VARS.join(", ")
                ))
            })
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout)
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: NAIJA__IMAGE__MODEL
        .add_source(
            Environment::with_prefix("NAIJA")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
