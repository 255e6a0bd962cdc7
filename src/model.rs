use crate::error::RecipeError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A structured recipe as produced by the text generation service.
///
/// The wire form uses `recipeName` for the name so that the same shape is
/// accepted from the model and written to the saved collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "recipeName")]
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl Recipe {
    /// Parse a model response strictly against the four-field recipe shape.
    ///
    /// Every field must be present with the right type and the name must not
    /// be blank. Unknown fields are ignored.
    pub fn from_json(raw: &str) -> Result<Self, RecipeError> {
        let recipe: Recipe = serde_json::from_str(raw.trim()).map_err(|e| {
            RecipeError::GenerationError(format!("malformed recipe response: {}", e))
        })?;

        if recipe.name.trim().is_empty() {
            return Err(RecipeError::GenerationError(
                "malformed recipe response: recipeName is empty".to_string(),
            ));
        }

        Ok(recipe)
    }
}

/// A recipe the user chose to keep, together with its image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl SavedRecipe {
    pub fn new(recipe: Recipe, image_url: impl Into<String>) -> Self {
        SavedRecipe {
            recipe,
            image_url: image_url.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.recipe.name
    }
}

/// Raw image bytes returned by an image generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Where the picture for a generated recipe comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// Image produced by the image generation service
    Inline(GeneratedImage),
    /// Stock photo URL derived from the recipe name
    Remote(String),
}

impl ImageReference {
    /// The text form stored as `imageUrl`: a data URI or a remote URL.
    pub fn as_url(&self) -> String {
        match self {
            ImageReference::Inline(image) => image.to_data_uri(),
            ImageReference::Remote(url) => url.clone(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ImageReference::Remote(_))
    }
}

/// Result of one generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRecipe {
    pub recipe: Recipe,
    pub image: ImageReference,
}

impl GeneratedRecipe {
    pub fn to_saved(&self) -> SavedRecipe {
        SavedRecipe::new(self.recipe.clone(), self.image.as_url())
    }
}

/// Regional cuisines a request can be narrowed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cuisine {
    Yoruba,
    Igbo,
    Hausa,
    Efik,
    Edo,
    Ijaw,
}

impl Cuisine {
    pub const ALL: [Cuisine; 6] = [
        Cuisine::Yoruba,
        Cuisine::Igbo,
        Cuisine::Hausa,
        Cuisine::Efik,
        Cuisine::Edo,
        Cuisine::Ijaw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::Yoruba => "Yoruba",
            Cuisine::Igbo => "Igbo",
            Cuisine::Hausa => "Hausa",
            Cuisine::Efik => "Efik",
            Cuisine::Edo => "Edo",
            Cuisine::Ijaw => "Ijaw",
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cuisine {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cuisine::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RecipeError::InvalidFilter {
                kind: "cuisine",
                value: s.to_string(),
            })
    }
}

/// Meal occasions a request can be narrowed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
    Drink,
}

impl MealType {
    pub const ALL: [MealType; 6] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
        MealType::Dessert,
        MealType::Drink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
            MealType::Dessert => "Dessert",
            MealType::Drink => "Drink",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RecipeError::InvalidFilter {
                kind: "meal type",
                value: s.to_string(),
            })
    }
}

/// The sentinel meaning "no filter"
pub const ANY: &str = "Any";

/// Parse a filter value where `"Any"` (any case) or an empty string means no filter.
pub fn parse_filter<T>(value: &str) -> Result<Option<T>, RecipeError>
where
    T: FromStr<Err = RecipeError>,
{
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ANY) {
        Ok(None)
    } else {
        trimmed.parse().map(Some)
    }
}

/// What the user asked for. An empty query means "surprise me".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeRequest {
    pub query: String,
    pub cuisine: Option<Cuisine>,
    pub meal_type: Option<MealType>,
}

impl RecipeRequest {
    pub fn surprise() -> Self {
        Self::default()
    }

    pub fn named(query: impl Into<String>) -> Self {
        RecipeRequest {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_cuisine(mut self, cuisine: Option<Cuisine>) -> Self {
        self.cuisine = cuisine;
        self
    }

    pub fn with_meal_type(mut self, meal_type: Option<MealType>) -> Self {
        self.meal_type = meal_type;
        self
    }

    /// The trimmed query, or `None` when the user asked for a surprise.
    pub fn dish(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}
