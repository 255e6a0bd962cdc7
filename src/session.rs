use crate::error::RecipeError;
use crate::model::{GeneratedRecipe, RecipeRequest, SavedRecipe};
use crate::orchestrator::RecipeOrchestrator;
use crate::store::{RecipeStore, Storage};
use log::error;

/// State owned by the single user-facing actor: the last request, what it
/// produced, and the saved collection.
///
/// Methods take `&mut self`, so only one generation can be in flight.
pub struct KitchenSession<S: Storage> {
    orchestrator: RecipeOrchestrator,
    store: RecipeStore<S>,
    request: RecipeRequest,
    current: Option<GeneratedRecipe>,
    last_error: Option<String>,
}

impl<S: Storage> KitchenSession<S> {
    /// Start a session, hydrating saved recipes from `storage`
    pub fn new(orchestrator: RecipeOrchestrator, storage: S) -> Self {
        KitchenSession {
            orchestrator,
            store: RecipeStore::load(storage),
            request: RecipeRequest::default(),
            current: None,
            last_error: None,
        }
    }

    /// Run a request. The previous result is cleared first, so after a failure
    /// there is no current recipe to save.
    pub async fn generate(
        &mut self,
        request: RecipeRequest,
    ) -> Result<&GeneratedRecipe, RecipeError> {
        self.request = request;
        self.current = None;
        self.last_error = None;

        match self.orchestrator.generate(&self.request).await {
            Ok(generated) => Ok(&*self.current.insert(generated)),
            Err(e) => {
                error!("{}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn request(&self) -> &RecipeRequest {
        &self.request
    }

    pub fn current(&self) -> Option<&GeneratedRecipe> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn saved(&self) -> &[SavedRecipe] {
        self.store.recipes()
    }

    pub fn is_current_saved(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| self.store.contains(&current.recipe.name))
    }

    /// Save the current recipe with its image reference
    pub fn save_current(&mut self) -> Result<&[SavedRecipe], RecipeError> {
        let current = self.current.as_ref().ok_or_else(|| {
            RecipeError::StorageError("No recipe has been generated yet".to_string())
        })?;
        self.store.save(&current.recipe, &current.image.as_url())
    }

    pub fn delete(&mut self, name: &str) -> Result<&[SavedRecipe], RecipeError> {
        self.store.delete(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeneratedImage;
    use crate::providers::{
        ImageGenerator, ProviderError, StockPhotoFallback, TextGenerator,
    };
    use crate::store::MemoryStorage;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers each call with the next scripted reply; `None` is a service failure.
    struct FixedText(Mutex<VecDeque<Option<&'static str>>>);

    #[async_trait]
    impl TextGenerator for FixedText {
        fn provider_name(&self) -> &str {
            "fixed"
        }

        async fn generate_json(&self, _: &str, _: &Value) -> Result<String, ProviderError> {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .flatten()
                .map(str::to_string)
                .ok_or_else(|| ProviderError::from("service unavailable"))
        }
    }

    struct NoImage;

    #[async_trait]
    impl ImageGenerator for NoImage {
        fn provider_name(&self) -> &str {
            "none"
        }

        async fn generate_image(&self, _: &str) -> Result<GeneratedImage, ProviderError> {
            Err("billing required".into())
        }
    }

    fn session(reply: Option<&'static str>) -> KitchenSession<MemoryStorage> {
        scripted_session(vec![reply])
    }

    fn scripted_session(replies: Vec<Option<&'static str>>) -> KitchenSession<MemoryStorage> {
        let orchestrator = RecipeOrchestrator::new(
            Box::new(FixedText(Mutex::new(replies.into()))),
            Box::new(NoImage),
            StockPhotoFallback::default(),
        );
        KitchenSession::new(orchestrator, MemoryStorage::new())
    }

    const AKARA: &str = r#"{
        "recipeName": "Akara",
        "description": "Bean fritters",
        "ingredients": ["2 cups black-eyed peas"],
        "instructions": ["Peel", "Blend", "Fry"]
    }"#;

    #[tokio::test]
    async fn test_generate_then_save() {
        let mut session = session(Some(AKARA));
        assert!(!session.is_current_saved());

        session
            .generate(RecipeRequest::named("Akara"))
            .await
            .unwrap();
        assert_eq!(session.request().query, "Akara");
        assert!(!session.is_current_saved());

        session.save_current().unwrap();
        session.save_current().unwrap();
        assert!(session.is_current_saved());
        assert_eq!(session.saved().len(), 1);
        assert!(session.saved()[0].image_url.contains("Akara%20nigerian%20food"));

        session.delete("Akara").unwrap();
        assert!(!session.is_current_saved());
        assert!(session.saved().is_empty());
    }

    #[tokio::test]
    async fn test_failed_generation_records_error() {
        let mut session = session(None);
        let result = session.generate(RecipeRequest::surprise()).await;
        assert!(result.is_err());
        assert!(session.current().is_none());
        assert!(session.last_error().unwrap().contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_failed_generation_clears_previous_recipe() {
        let mut session = scripted_session(vec![Some(AKARA), None]);
        session
            .generate(RecipeRequest::named("Akara"))
            .await
            .unwrap();
        assert_eq!(session.current().unwrap().recipe.name, "Akara");

        let result = session.generate(RecipeRequest::named("Suya")).await;
        assert!(result.is_err());
        assert!(session.current().is_none());
        assert!(!session.is_current_saved());
        assert!(session.save_current().is_err());
        assert!(session.saved().is_empty());
    }

    #[test]
    fn test_save_without_recipe() {
        let mut session = session(Some(AKARA));
        assert!(session.save_current().is_err());
    }
}
