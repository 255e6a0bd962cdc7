use crate::config::FallbackImageConfig;

/// Stable signature for a recipe name.
///
/// Folds the UTF-16 code units with `h = h * 31 + unit` in wrapping 32-bit
/// signed arithmetic, then takes the absolute value. The same name always
/// yields the same signature, so the fallback picture never changes between
/// sessions.
pub fn name_signature(name: &str) -> u32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// Builds stock photo query URLs used when image generation is unavailable
#[derive(Debug, Clone)]
pub struct StockPhotoFallback {
    base_url: String,
}

impl StockPhotoFallback {
    pub fn new(base_url: impl Into<String>) -> Self {
        StockPhotoFallback {
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &FallbackImageConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    /// `{base}?{encoded "<name> nigerian food"}&sig={signature}`
    pub fn url_for(&self, recipe_name: &str) -> String {
        let terms = format!("{} nigerian food", recipe_name);
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}&sig={}",
            self.base_url,
            separator,
            urlencoding::encode(&terms),
            name_signature(recipe_name)
        )
    }
}

impl Default for StockPhotoFallback {
    fn default() -> Self {
        Self::from_config(&FallbackImageConfig::default())
    }
}
