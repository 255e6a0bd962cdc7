mod factory;
mod google;
mod imagen;
mod open_ai;
mod stock_photo;

pub use factory::ProviderFactory;
pub use google::GoogleTextProvider;
pub use imagen::ImagenProvider;
pub use open_ai::{OpenAIImageProvider, OpenAITextProvider};
pub use stock_photo::{name_signature, StockPhotoFallback};

use crate::model::GeneratedImage;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::error::Error;

pub type ProviderError = Box<dyn Error + Send + Sync>;

/// A service that answers a prompt with JSON matching a declared schema
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Generate raw JSON text for `prompt`, constrained to `schema`
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, ProviderError>;
}

/// A service that renders exactly one image for a prompt
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError>;
}

/// Read a JSON body, turning non-success statuses into errors that keep the body text.
pub(crate) async fn read_json(
    response: reqwest::Response,
    service: &str,
) -> Result<Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await?;
        return Err(format!("{} API error ({}): {}", service, status, error_text).into());
    }

    let body: Value = response.json().await?;
    debug!("{} response: {:?}", service, body);
    Ok(body)
}
