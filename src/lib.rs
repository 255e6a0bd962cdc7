pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod share;
pub mod store;

// Re-export commonly used types
pub use builder::{Provider, RecipeGenerator, RecipeGeneratorBuilder};
pub use crate::config::AppConfig;
pub use error::RecipeError;
pub use model::{
    Cuisine, GeneratedImage, GeneratedRecipe, ImageReference, MealType, Recipe, RecipeRequest,
    SavedRecipe,
};
pub use orchestrator::RecipeOrchestrator;
pub use session::KitchenSession;
pub use share::{parse_share_link, recipe_markdown, recipe_text, share_link};
pub use store::{FileStorage, MemoryStorage, RecipeStore, Storage};

/// Generate a recipe for a named dish using configuration from `config.toml` and the environment.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let generated = naija_recipes::generate_recipe("Jollof Rice").await?;
/// println!("{}", naija_recipes::recipe_text(&generated.recipe));
/// # Ok(())
/// # }
/// ```
pub async fn generate_recipe(dish: &str) -> Result<GeneratedRecipe, RecipeError> {
    RecipeGenerator::builder().query(dish).build().await
}

/// Let the model pick a popular Nigerian dish.
pub async fn surprise_recipe() -> Result<GeneratedRecipe, RecipeError> {
    RecipeGenerator::builder().surprise().build().await
}

/// Open the saved-recipe collection configured in `config.toml` and the environment.
pub fn open_saved_recipes(config: &AppConfig) -> Result<RecipeStore<FileStorage>, RecipeError> {
    Ok(RecipeStore::load(FileStorage::from_config(&config.storage)?))
}
