use std::time::Duration;

use crate::{
    config::AppConfig,
    model::{Cuisine, GeneratedRecipe, MealType, RecipeRequest},
    orchestrator::RecipeOrchestrator,
    share::parse_share_link,
    RecipeError,
};

/// Optional generative-AI provider selection
#[derive(Debug, Clone)]
pub enum Provider {
    Google,
    OpenAI,
}

impl Provider {
    /// Convert to provider name string used by the factory
    fn as_str(&self) -> &str {
        match self {
            Provider::Google => "google",
            Provider::OpenAI => "openai",
        }
    }
}

/// Builder for configuring and running a recipe request
#[derive(Debug, Default)]
pub struct RecipeGeneratorBuilder {
    request: RecipeRequest,
    share_link: Option<String>,
    config: Option<AppConfig>,
    provider: Option<Provider>,
    timeout: Option<Duration>,
    api_key: Option<String>,
    text_model: Option<String>,
    image_model: Option<String>,
}

impl RecipeGeneratorBuilder {
    /// Ask for a specific dish. An empty query is the same as a surprise.
    ///
    /// # Example
    /// ```
    /// use naija_recipes::RecipeGenerator;
    ///
    /// let builder = RecipeGenerator::builder().query("Egusi Soup");
    /// ```
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.request.query = query.into();
        self
    }

    /// Let the model pick a popular dish
    pub fn surprise(mut self) -> Self {
        self.request.query.clear();
        self
    }

    /// Restrict the dish to a regional cuisine
    ///
    /// # Example
    /// ```
    /// use naija_recipes::{Cuisine, RecipeGenerator};
    ///
    /// let builder = RecipeGenerator::builder()
    ///     .surprise()
    ///     .cuisine(Cuisine::Hausa);
    /// ```
    pub fn cuisine(mut self, cuisine: Cuisine) -> Self {
        self.request.cuisine = Some(cuisine);
        self
    }

    /// Restrict the dish to a meal occasion
    pub fn meal_type(mut self, meal_type: MealType) -> Self {
        self.request.meal_type = Some(meal_type);
        self
    }

    /// Take query and filters from a share link, replacing anything set before
    ///
    /// # Example
    /// ```
    /// use naija_recipes::RecipeGenerator;
    ///
    /// let builder = RecipeGenerator::builder()
    ///     .share_link("https://naija-recipes.app/?q=Suya&cuisine=Hausa");
    /// ```
    pub fn share_link(mut self, link: impl Into<String>) -> Self {
        self.share_link = Some(link.into());
        self
    }

    /// Use an explicit configuration instead of loading `config.toml` and the environment
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use the same provider for text and images
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the API key directly instead of relying on environment variables or config files
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = Some(model.into());
        self
    }

    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = Some(model.into());
        self
    }

    /// The request this builder would send
    pub fn request(&self) -> Result<RecipeRequest, RecipeError> {
        match &self.share_link {
            Some(link) => parse_share_link(link),
            None => Ok(self.request.clone()),
        }
    }

    fn resolve_config(&mut self) -> Result<AppConfig, RecipeError> {
        let mut config = match self.config.take() {
            Some(config) => config,
            None => AppConfig::load()?,
        };

        if let Some(provider) = &self.provider {
            config.text.provider = provider.as_str().to_string();
            config.image.provider = provider.as_str().to_string();
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout.as_secs().max(1);
        }
        if let Some(key) = self.api_key.take() {
            config.api_key = Some(key);
        }
        if let Some(model) = self.text_model.take() {
            config.text.model = model;
        }
        if let Some(model) = self.image_model.take() {
            config.image.model = model;
        }

        Ok(config)
    }

    /// Generate the recipe and its image
    ///
    /// # Errors
    /// Returns `RecipeError` if:
    /// - The share link cannot be parsed
    /// - Configuration cannot be loaded or no API key is available
    /// - The text service fails or returns an incomplete recipe
    ///
    /// Image failures never surface; a stock photo URL is used instead.
    ///
    /// # Example
    /// ```no_run
    /// # use naija_recipes::{MealType, RecipeGenerator};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let generated = RecipeGenerator::builder()
    ///     .surprise()
    ///     .meal_type(MealType::Breakfast)
    ///     .build()
    ///     .await?;
    /// println!("{}", generated.recipe.name);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(mut self) -> Result<GeneratedRecipe, RecipeError> {
        let request = self.request()?;
        let config = self.resolve_config()?;
        let orchestrator = RecipeOrchestrator::from_config(&config)?;
        orchestrator.generate(&request).await
    }
}

/// Main entry point for the builder API
pub struct RecipeGenerator;

impl RecipeGenerator {
    /// Creates a new builder for generating recipes
    pub fn builder() -> RecipeGeneratorBuilder {
        RecipeGeneratorBuilder::default()
    }
}
