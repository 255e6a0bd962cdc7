use crate::model::RecipeRequest;
use serde_json::{json, Value};

/// Fixed instruction describing the parts every recipe must contain.
pub const RECIPE_REQUIREMENTS: &str = "Provide a short, enticing description, a list of ingredients with quantities, and simple step-by-step instructions suitable for a beginner cook.";

/// Build the recipe prompt from the user's request.
///
/// An empty query asks for a popular dish instead of naming one. Cuisine and
/// meal type clauses are only added when the filter is set.
pub fn build_recipe_prompt(request: &RecipeRequest) -> String {
    let mut prompt = match request.dish() {
        Some(dish) => format!("Generate a recipe for the Nigerian dish \"{}\".", dish),
        None => "Generate a recipe for a popular and delicious Nigerian dish.".to_string(),
    };

    prompt.push(' ');
    prompt.push_str(RECIPE_REQUIREMENTS);

    if let Some(cuisine) = request.cuisine {
        prompt.push_str(&format!(
            " The dish should be from the {} cuisine of Nigeria.",
            cuisine
        ));
    }

    if let Some(meal_type) = request.meal_type {
        prompt.push_str(&format!(" It should be served as {}.", meal_type));
    }

    prompt
}

/// Build the photographic prompt for the recipe's picture.
pub fn build_image_prompt(recipe_name: &str) -> String {
    format!(
        "A delicious, mouth-watering plate of Nigerian {}, professionally photographed, vibrant colors, served hot.",
        recipe_name
    )
}

/// JSON schema the text service must answer with. All four fields are required.
pub fn recipe_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recipeName": {
                "type": "string",
                "description": "The name of the Nigerian dish."
            },
            "description": {
                "type": "string",
                "description": "A short, enticing description of the dish."
            },
            "ingredients": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Ingredients, each with its quantity."
            },
            "instructions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Step-by-step cooking instructions in order."
            }
        },
        "required": ["recipeName", "description", "ingredients", "instructions"]
    })
}
