use crate::config::StorageConfig;
use crate::error::RecipeError;
use crate::model::{Recipe, SavedRecipe};
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A single named slot of durable text storage
pub trait Storage {
    /// Current slot contents, `None` when nothing was ever written
    fn read(&self) -> Result<Option<String>, RecipeError>;

    /// Replace the slot contents
    fn write(&mut self, contents: &str) -> Result<(), RecipeError>;
}

/// Slot stored as `<dir>/<slot>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>, slot: &str) -> Self {
        FileStorage {
            path: dir.as_ref().join(format!("{}.json", slot)),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, RecipeError> {
        Ok(Self::new(config.resolve_dir()?, &config.slot))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Result<Option<String>, RecipeError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), RecipeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        debug!("Wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }
}

/// In-memory slot. Clones share the same contents, which lets a second store
/// stand in for a fresh session reading the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        MemoryStorage {
            contents: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, RecipeError> {
        let guard = self
            .contents
            .lock()
            .map_err(|e| RecipeError::StorageError(e.to_string()))?;
        Ok(guard.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), RecipeError> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|e| RecipeError::StorageError(e.to_string()))?;
        *guard = Some(contents.to_string());
        Ok(())
    }
}

/// Read the saved collection. Missing or unreadable data yields an empty collection.
pub fn load_saved<S: Storage>(storage: &S) -> Vec<SavedRecipe> {
    let contents = match storage.read() {
        Ok(Some(contents)) => contents,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Could not read saved recipes: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(recipes) => recipes,
        Err(e) => {
            warn!("Ignoring unparseable saved recipes: {}", e);
            Vec::new()
        }
    }
}

/// The user's saved recipes, at most one per exact recipe name.
///
/// Every change rewrites the whole collection to storage.
pub struct RecipeStore<S: Storage> {
    storage: S,
    recipes: Vec<SavedRecipe>,
}

impl<S: Storage> RecipeStore<S> {
    /// Hydrate the collection from storage
    pub fn load(storage: S) -> Self {
        let recipes = load_saved(&storage);
        debug!("Loaded {} saved recipes", recipes.len());
        RecipeStore { storage, recipes }
    }

    pub fn recipes(&self) -> &[SavedRecipe] {
        &self.recipes
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.iter().any(|saved| saved.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&SavedRecipe> {
        self.recipes.iter().find(|saved| saved.name() == name)
    }

    /// Save a recipe with its image reference. A name that is already saved is left alone.
    pub fn save(
        &mut self,
        recipe: &Recipe,
        image_url: &str,
    ) -> Result<&[SavedRecipe], RecipeError> {
        if self.contains(&recipe.name) {
            debug!("'{}' is already saved", recipe.name);
            return Ok(&self.recipes);
        }

        let mut updated = self.recipes.clone();
        updated.push(SavedRecipe::new(recipe.clone(), image_url));
        self.persist(updated)
    }

    /// Remove every entry named exactly `name`
    pub fn delete(&mut self, name: &str) -> Result<&[SavedRecipe], RecipeError> {
        let updated: Vec<SavedRecipe> = self
            .recipes
            .iter()
            .filter(|saved| saved.name() != name)
            .cloned()
            .collect();
        self.persist(updated)
    }

    fn persist(&mut self, updated: Vec<SavedRecipe>) -> Result<&[SavedRecipe], RecipeError> {
        let contents = serde_json::to_string(&updated)
            .map_err(|e| RecipeError::StorageError(e.to_string()))?;
        self.storage.write(&contents)?;
        self.recipes = updated;
        Ok(&self.recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str) -> Recipe {
        Recipe {
            name: name.to_string(),
            description: format!("{} the way mama makes it", name),
            ingredients: vec!["2 cups rice".to_string()],
            instructions: vec!["Cook".to_string()],
        }
    }

    #[test]
    fn test_load_missing_slot_is_empty() {
        let store = RecipeStore::load(MemoryStorage::new());
        assert!(store.recipes().is_empty());
    }

    #[test]
    fn test_load_corrupt_slot_is_empty() {
        let store = RecipeStore::load(MemoryStorage::with_contents("{not json"));
        assert!(store.recipes().is_empty());

        let store = RecipeStore::load(MemoryStorage::with_contents(r#"{"recipeName": "x"}"#));
        assert!(store.recipes().is_empty());
    }

    #[test]
    fn test_save_is_idempotent_per_name() {
        let mut store = RecipeStore::load(MemoryStorage::new());
        for _ in 0..3 {
            store.save(&recipe("Jollof Rice"), "https://img/1").unwrap();
        }
        assert_eq!(store.recipes().len(), 1);

        let mut other = recipe("Jollof Rice");
        other.description = "different".to_string();
        store.save(&other, "https://img/2").unwrap();
        assert_eq!(store.recipes().len(), 1);
        assert_eq!(store.recipes()[0].image_url, "https://img/1");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut store = RecipeStore::load(MemoryStorage::new());
        store.save(&recipe("Suya"), "a").unwrap();
        store.save(&recipe("suya"), "b").unwrap();
        assert_eq!(store.recipes().len(), 2);
        assert!(store.contains("Suya"));
        assert!(!store.contains("SUYA"));
    }

    #[test]
    fn test_save_then_fresh_load() {
        let storage = MemoryStorage::new();
        let mut store = RecipeStore::load(storage.clone());
        store.save(&recipe("Egusi Soup"), "data:image/jpeg;base64,AAAA").unwrap();

        let fresh = RecipeStore::load(storage);
        assert_eq!(
            fresh.recipes(),
            &[SavedRecipe::new(recipe("Egusi Soup"), "data:image/jpeg;base64,AAAA")]
        );
    }

    #[test]
    fn test_delete() {
        let storage = MemoryStorage::new();
        let mut store = RecipeStore::load(storage.clone());
        store.save(&recipe("Moi Moi"), "a").unwrap();
        store.save(&recipe("Akara"), "b").unwrap();

        let remaining = store.delete("Moi Moi").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name(), "Akara");

        let fresh = RecipeStore::load(storage);
        assert!(!fresh.contains("Moi Moi"));
        assert!(fresh.get("Akara").is_some());
    }

    #[test]
    fn test_delete_missing_name_leaves_collection_unchanged() {
        let mut store = RecipeStore::load(MemoryStorage::new());
        store.save(&recipe("Akara"), "b").unwrap();
        let before = store.recipes().to_vec();

        let after = store.delete("Puff Puff").unwrap();
        assert_eq!(after, before.as_slice());
    }
}
