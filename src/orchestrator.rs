use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::model::{GeneratedRecipe, ImageReference, Recipe, RecipeRequest};
use crate::prompt::{build_image_prompt, build_recipe_prompt, recipe_schema};
use crate::providers::{ImageGenerator, ProviderFactory, StockPhotoFallback, TextGenerator};
use log::{debug, info, warn};

/// Turns a request into a recipe and a picture.
///
/// The text call runs first because the image prompt needs the recipe name.
/// Text failures are returned to the caller; image failures are replaced by a
/// stock photo URL derived from the recipe name.
pub struct RecipeOrchestrator {
    text: Box<dyn TextGenerator>,
    image: Box<dyn ImageGenerator>,
    fallback: StockPhotoFallback,
}

impl RecipeOrchestrator {
    pub fn new(
        text: Box<dyn TextGenerator>,
        image: Box<dyn ImageGenerator>,
        fallback: StockPhotoFallback,
    ) -> Self {
        RecipeOrchestrator {
            text,
            image,
            fallback,
        }
    }

    /// Build an orchestrator from configuration. Fails when no API key is available.
    pub fn from_config(config: &AppConfig) -> Result<Self, RecipeError> {
        let api_key = config.resolve_api_key()?;
        Ok(Self::new(
            ProviderFactory::create_text(config, &api_key)?,
            ProviderFactory::create_image(config, &api_key)?,
            StockPhotoFallback::from_config(&config.fallback_image),
        ))
    }

    pub async fn generate(&self, request: &RecipeRequest) -> Result<GeneratedRecipe, RecipeError> {
        let recipe = self.generate_recipe(request).await?;
        let image = self.generate_image(&recipe.name).await;
        Ok(GeneratedRecipe { recipe, image })
    }

    async fn generate_recipe(&self, request: &RecipeRequest) -> Result<Recipe, RecipeError> {
        let prompt = build_recipe_prompt(request);
        debug!("Recipe prompt: {}", prompt);

        let raw = self
            .text
            .generate_json(&prompt, &recipe_schema())
            .await
            .map_err(|e| RecipeError::GenerationError(e.to_string()))?;

        let recipe = Recipe::from_json(&raw)?;
        info!(
            "Generated '{}' using {}",
            recipe.name,
            self.text.provider_name()
        );
        Ok(recipe)
    }

    async fn generate_image(&self, recipe_name: &str) -> ImageReference {
        let prompt = build_image_prompt(recipe_name);
        match self.image.generate_image(&prompt).await {
            Ok(image) => {
                info!(
                    "Generated image for '{}' using {}",
                    recipe_name,
                    self.image.provider_name()
                );
                ImageReference::Inline(image)
            }
            Err(e) => {
                warn!(
                    "Image generation failed for '{}', using stock photo: {}",
                    recipe_name, e
                );
                ImageReference::Remote(self.fallback.url_for(recipe_name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cuisine, GeneratedImage, MealType};
    use crate::providers::{name_signature, ProviderError};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    const SUYA: &str = r#"{
        "recipeName": "Suya",
        "description": "Spicy grilled beef skewers",
        "ingredients": ["500g beef", "3 tbsp yaji spice"],
        "instructions": ["Slice the beef", "Coat with yaji", "Grill"]
    }"#;

    struct ScriptedText {
        reply: Result<String, String>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl TextGenerator for ScriptedText {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        async fn generate_json(
            &self,
            prompt: &str,
            _schema: &Value,
        ) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(ProviderError::from)
        }
    }

    struct ScriptedImage {
        fail: bool,
    }

    #[async_trait]
    impl ImageGenerator for ScriptedImage {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
            if self.fail {
                return Err("billing required".into());
            }
            Ok(GeneratedImage {
                mime_type: "image/jpeg".to_string(),
                bytes: prompt.as_bytes().to_vec(),
            })
        }
    }

    fn orchestrator(
        reply: Result<&str, &str>,
        image_fails: bool,
    ) -> (RecipeOrchestrator, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let text = ScriptedText {
            reply: reply.map(String::from).map_err(String::from),
            prompts: prompts.clone(),
        };
        let orchestrator = RecipeOrchestrator::new(
            Box::new(text),
            Box::new(ScriptedImage { fail: image_fails }),
            StockPhotoFallback::new("https://photos.example.com/"),
        );
        (orchestrator, prompts)
    }

    #[tokio::test]
    async fn test_generate_with_inline_image() {
        let (orchestrator, _) = orchestrator(Ok(SUYA), false);
        let result = orchestrator
            .generate(&RecipeRequest::named("Suya"))
            .await
            .unwrap();

        assert_eq!(result.recipe.name, "Suya");
        assert_eq!(result.recipe.instructions.len(), 3);
        match result.image {
            ImageReference::Inline(image) => {
                let prompt = String::from_utf8(image.bytes).unwrap();
                assert!(prompt.contains("plate of Nigerian Suya"));
            }
            ImageReference::Remote(url) => panic!("Expected inline image, got {}", url),
        }
    }

    #[tokio::test]
    async fn test_filters_reach_the_prompt() {
        let (orchestrator, prompts) = orchestrator(Ok(SUYA), false);
        let request = RecipeRequest::surprise()
            .with_cuisine(Some(Cuisine::Yoruba))
            .with_meal_type(Some(MealType::Dinner));
        orchestrator.generate(&request).await.unwrap();

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Yoruba"));
        assert!(prompts[0].contains("Dinner"));
        assert!(prompts[0].contains("popular and delicious"));
        assert!(!prompts[0].contains("dish \""));
    }

    #[tokio::test]
    async fn test_text_failure_carries_detail() {
        let (orchestrator, _) = orchestrator(Err("quota exhausted"), false);
        let err = orchestrator
            .generate(&RecipeRequest::surprise())
            .await
            .unwrap_err();

        assert!(matches!(err, RecipeError::GenerationError(_)));
        assert!(err.to_string().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn test_incomplete_recipe_is_rejected() {
        let (orchestrator, _) = orchestrator(Ok(r#"{"recipeName": "Suya"}"#), false);
        let err = orchestrator
            .generate(&RecipeRequest::surprise())
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::GenerationError(_)));
    }

    #[tokio::test]
    async fn test_image_failure_falls_back_to_stock_photo() {
        let (orchestrator, _) = orchestrator(Ok(SUYA), true);
        let result = orchestrator
            .generate(&RecipeRequest::surprise())
            .await
            .unwrap();

        assert!(result.image.is_fallback());
        assert_eq!(
            result.image.as_url(),
            format!(
                "https://photos.example.com/?Suya%20nigerian%20food&sig={}",
                name_signature("Suya")
            )
        );
    }

    #[test]
    fn test_from_config_with_api_key() {
        let config = AppConfig {
            api_key: Some("configured".to_string()),
            ..Default::default()
        };
        assert!(RecipeOrchestrator::from_config(&config).is_ok());
    }
}
