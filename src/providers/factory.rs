use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::providers::{
    GoogleTextProvider, ImageGenerator, ImagenProvider, OpenAIImageProvider, OpenAITextProvider,
    TextGenerator,
};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the text generation provider named in configuration
    pub fn create_text(
        config: &AppConfig,
        api_key: &str,
    ) -> Result<Box<dyn TextGenerator>, RecipeError> {
        let text = &config.text;
        match text.provider.as_str() {
            "google" => Ok(Box::new(GoogleTextProvider::new(
                api_key,
                text,
                config.timeout(),
            )?)),
            "openai" => Ok(Box::new(OpenAITextProvider::new(
                api_key,
                text,
                config.timeout(),
            )?)),
            other => Err(unknown_provider("text", other)),
        }
    }

    /// Create the image generation provider named in configuration
    pub fn create_image(
        config: &AppConfig,
        api_key: &str,
    ) -> Result<Box<dyn ImageGenerator>, RecipeError> {
        let image = &config.image;
        match image.provider.as_str() {
            "google" => Ok(Box::new(ImagenProvider::new(
                api_key,
                image,
                config.timeout(),
            )?)),
            "openai" => Ok(Box::new(OpenAIImageProvider::new(
                api_key,
                image,
                config.timeout(),
            )?)),
            other => Err(unknown_provider("image", other)),
        }
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai"]
    }
}

fn unknown_provider(kind: &str, name: &str) -> RecipeError {
    RecipeError::ConfigError(config::ConfigError::Message(format!(
        "Unknown {} provider: {} (available: {})",
        kind,
        name,
        ProviderFactory::available_providers().join(", ")
    )))
}
