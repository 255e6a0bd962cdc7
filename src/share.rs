use crate::error::RecipeError;
use crate::model::{parse_filter, Cuisine, MealType, Recipe, RecipeRequest};
use log::debug;
use url::Url;

/// Deep link that reproduces a search and its filters.
///
/// `q`, `cuisine` and `meal` are only present when they differ from the
/// defaults (empty query, "Any").
pub fn share_link(base_url: &str, request: &RecipeRequest) -> Result<String, RecipeError> {
    let mut url =
        Url::parse(base_url).map_err(|e| RecipeError::InvalidShareLink(e.to_string()))?;

    let params: Vec<(&str, String)> = [
        ("q", request.dish().map(str::to_string)),
        ("cuisine", request.cuisine.map(|c| c.to_string())),
        ("meal", request.meal_type.map(|m| m.to_string())),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|v| (key, v)))
    .collect();

    if params.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(params);
    }

    Ok(url.to_string())
}

/// Restore a request from a deep link.
///
/// Unknown filter values fall back to "Any" so that a stale link still opens.
pub fn parse_share_link(link: &str) -> Result<RecipeRequest, RecipeError> {
    let url = Url::parse(link).map_err(|e| RecipeError::InvalidShareLink(e.to_string()))?;

    let mut request = RecipeRequest::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "q" => request.query = value.trim().to_string(),
            "cuisine" => request.cuisine = lenient_filter::<Cuisine>(&value),
            "meal" => request.meal_type = lenient_filter::<MealType>(&value),
            _ => {}
        }
    }

    Ok(request)
}

fn lenient_filter<T>(value: &str) -> Option<T>
where
    T: std::str::FromStr<Err = RecipeError>,
{
    parse_filter(value).unwrap_or_else(|e| {
        debug!("Ignoring share link filter: {}", e);
        None
    })
}

/// Plain text rendering used when copying a recipe.
pub fn recipe_text(recipe: &Recipe) -> String {
    let mut text = format!("{}\n\n{}\n\nIngredients:\n", recipe.name, recipe.description);
    for ingredient in &recipe.ingredients {
        text.push_str(&format!("- {}\n", ingredient));
    }
    text.push_str("\nInstructions:\n");
    for (i, step) in recipe.instructions.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, step));
    }
    text
}

/// Markdown rendering used when sharing a recipe.
pub fn recipe_markdown(recipe: &Recipe, image_url: Option<&str>) -> String {
    let mut md = format!("# {}\n\n", recipe.name);
    if let Some(url) = image_url.filter(|url| !url.starts_with("data:")) {
        md.push_str(&format!("![{}]({})\n\n", recipe.name, url));
    }
    md.push_str(&format!("{}\n\n## Ingredients\n\n", recipe.description));
    for ingredient in &recipe.ingredients {
        md.push_str(&format!("- {}\n", ingredient));
    }
    md.push_str("\n## Instructions\n\n");
    for (i, step) in recipe.instructions.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, step));
    }
    md
}
