use crate::config::ImageModelConfig;
use crate::model::GeneratedImage;
use crate::providers::google::GOOGLE_BASE_URL;
use crate::providers::{read_json, ImageGenerator, ProviderError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

/// Imagen `predict` endpoint on the Gemini API
pub struct ImagenProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    aspect_ratio: String,
    mime_type: String,
}

impl ImagenProvider {
    pub fn new(
        api_key: impl Into<String>,
        config: &ImageModelConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(ImagenProvider {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| GOOGLE_BASE_URL.to_string()),
            model: config.model.clone(),
            aspect_ratio: config.aspect_ratio.clone(),
            mime_type: config.mime_type.clone(),
        })
    }
}

#[async_trait]
impl ImageGenerator for ImagenProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let url = format!("{}/v1beta/models/{}:predict", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({
                "instances": [{ "prompt": prompt }],
                "parameters": {
                    "sampleCount": 1,
                    "aspectRatio": self.aspect_ratio,
                    "outputOptions": { "mimeType": self.mime_type }
                }
            }))
            .send()
            .await?;

        let response_body = read_json(response, "Imagen").await?;

        let prediction = &response_body["predictions"][0];
        let encoded = prediction["bytesBase64Encoded"]
            .as_str()
            .ok_or("No image returned by Imagen")?;
        let bytes = STANDARD.decode(encoded)?;
        debug!("Imagen returned {} bytes", bytes.len());

        let mime_type = prediction["mimeType"]
            .as_str()
            .unwrap_or(&self.mime_type)
            .to_string();

        Ok(GeneratedImage { mime_type, bytes })
    }
}
