use crate::config::{ImageModelConfig, TextModelConfig};
use crate::model::GeneratedImage;
use crate::providers::{read_json, ImageGenerator, ProviderError, TextGenerator};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Chat completions with a strict `json_schema` response format
pub struct OpenAITextProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAITextProvider {
    /// Create a new OpenAI text provider from configuration
    pub fn new(
        api_key: impl Into<String>,
        config: &TextModelConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(OpenAITextProvider {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

/// Strict structured outputs reject objects that allow extra properties.
fn to_strict_schema(schema: &Value) -> Value {
    let mut strict = schema.clone();
    if let Some(object) = strict.as_object_mut() {
        object.insert("additionalProperties".to_string(), json!(false));
    }
    strict
}

#[async_trait]
impl TextGenerator for OpenAITextProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "user", "content": prompt}
                ],
                "temperature": self.temperature,
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {
                        "name": "recipe",
                        "strict": true,
                        "schema": to_strict_schema(schema)
                    }
                }
            }))
            .send()
            .await?;

        let response_body = read_json(response, "OpenAI").await?;
        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("Failed to extract content from response")?
            .to_string();

        Ok(content)
    }
}

/// Image generations returning base64 payloads
pub struct OpenAIImageProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    size: &'static str,
}

impl OpenAIImageProvider {
    pub fn new(
        api_key: impl Into<String>,
        config: &ImageModelConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(OpenAIImageProvider {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            model: config.model.clone(),
            size: size_for_aspect_ratio(&config.aspect_ratio),
        })
    }
}

/// Closest supported image size for an aspect ratio; square when unknown.
fn size_for_aspect_ratio(aspect_ratio: &str) -> &'static str {
    match aspect_ratio {
        "16:9" | "4:3" => "1792x1024",
        "9:16" | "3:4" => "1024x1792",
        _ => "1024x1024",
    }
}

#[async_trait]
impl ImageGenerator for OpenAIImageProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "n": 1,
                "size": self.size,
                "response_format": "b64_json"
            }))
            .send()
            .await?;

        let response_body = read_json(response, "OpenAI").await?;
        let encoded = response_body["data"][0]["b64_json"]
            .as_str()
            .ok_or("No image returned by OpenAI")?;

        Ok(GeneratedImage {
            mime_type: "image/png".to_string(),
            bytes: STANDARD.decode(encoded)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::recipe_schema;
    use mockito::{Matcher, Server};

    fn text_provider(base_url: String) -> OpenAITextProvider {
        let config = TextModelConfig {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: Some(base_url),
            ..Default::default()
        };
        OpenAITextProvider::new("fake_api_key", &config, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "response_format": {
                    "type": "json_schema",
                    "json_schema": { "strict": true }
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "content": "{\"recipeName\": \"Moi Moi\"}"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let content = text_provider(server.url())
            .generate_json("Generate a recipe", &recipe_schema())
            .await
            .unwrap();
        assert!(content.contains("Moi Moi"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_json_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Invalid request"}"#)
            .create_async()
            .await;

        let result = text_provider(server.url())
            .generate_json("Generate a recipe", &recipe_schema())
            .await;
        assert!(result.is_err());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_image() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/images/generations")
            .match_body(Matcher::PartialJson(json!({
                "n": 1,
                "size": "1792x1024",
                "response_format": "b64_json"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": [{"b64_json": "cG5n"}]}"#)
            .create_async()
            .await;

        let config = ImageModelConfig {
            provider: "openai".to_string(),
            model: "dall-e-3".to_string(),
            base_url: Some(server.url()),
            ..Default::default()
        };
        let provider =
            OpenAIImageProvider::new("fake_api_key", &config, Duration::from_secs(5)).unwrap();
        let image = provider.generate_image("A plate of Nigerian Akara").await.unwrap();

        assert_eq!(image.bytes, b"png".to_vec());
        assert_eq!(image.mime_type, "image/png");
        mock.assert_async().await;
    }

    #[test]
    fn test_strict_schema_forbids_extra_fields() {
        let strict = to_strict_schema(&recipe_schema());
        assert_eq!(strict["additionalProperties"], false);
        assert_eq!(strict["required"], recipe_schema()["required"]);
    }

    #[test]
    fn test_size_for_aspect_ratio() {
        assert_eq!(size_for_aspect_ratio("16:9"), "1792x1024");
        assert_eq!(size_for_aspect_ratio("9:16"), "1024x1792");
        assert_eq!(size_for_aspect_ratio("1:1"), "1024x1024");
    }
}
