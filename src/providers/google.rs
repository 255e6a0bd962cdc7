use crate::config::TextModelConfig;
use crate::providers::{read_json, ProviderError, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;

pub(crate) const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` with a JSON response schema
pub struct GoogleTextProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GoogleTextProvider {
    /// Create a new Gemini text provider from configuration
    pub fn new(
        api_key: impl Into<String>,
        config: &TextModelConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(GoogleTextProvider {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| GOOGLE_BASE_URL.to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

/// Gemini expects OpenAPI-style upper-case type names in `responseSchema`.
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let converted: Map<String, Value> = map
                .iter()
                .map(|(key, value)| match (key.as_str(), value) {
                    ("type", Value::String(ty)) => (key.clone(), json!(ty.to_uppercase())),
                    _ => (key.clone(), to_gemini_schema(value)),
                })
                .collect();
            Value::Object(converted)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

#[async_trait]
impl TextGenerator for GoogleTextProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({
                "contents": [{
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "responseMimeType": "application/json",
                    "responseSchema": to_gemini_schema(schema)
                }
            }))
            .send()
            .await?;

        let response_body = read_json(response, "Google Gemini").await?;

        if let Some(error) = response_body.get("error") {
            let error_code = error["code"].as_i64().unwrap_or(0);
            let error_message = error["message"].as_str().unwrap_or("Unknown error");
            return Err(format!(
                "Google Gemini API error ({}): {}",
                error_code, error_message
            )
            .into());
        }

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or("Failed to extract content from Google Gemini response")?
            .to_string();

        Ok(text)
    }
}
