use crate::error::{QuizError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A learnable flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique code, e.g. ISO 3166 alpha-2
    pub code: String,
    pub name: String,
    /// Grouping tag such as the continent
    pub category: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub layout: String,
}

impl Item {
    pub fn new(code: &str, name: &str, category: &str, colors: &[&str], layout: &str) -> Self {
        Item {
            code: code.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
            layout: layout.to_string(),
        }
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}

/// Anything that can provide the item list at startup
pub trait CatalogSource {
    fn load(&self) -> Result<Vec<Item>>;
}

/// Reads the catalog from a JSON array of items
pub struct JsonCatalogSource {
    path: PathBuf,
}

impl JsonCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonCatalogSource {
    fn load(&self) -> Result<Vec<Item>> {
        let content = fs::read_to_string(&self.path)?;
        let items: Vec<Item> = serde_json::from_str(&content)?;
        Ok(items)
    }
}

/// Static, read-only collection of items
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// An empty catalog cannot back a session, and codes must be unique
    pub fn new(items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            return Err(QuizError::NoItemsAvailable("catalog is empty".to_string()));
        }
        let mut codes = HashSet::new();
        if let Some(dup) = items.iter().find(|item| !codes.insert(item.code.as_str())) {
            let msg = format!("duplicate item code '{}' in catalog", dup.code);
            return Err(QuizError::InvalidConfig(msg));
        }
        drop(codes);
        Ok(Catalog { items })
    }

    pub fn from_source(source: &dyn CatalogSource) -> Result<Self> {
        let catalog = Self::new(source.load()?)?;
        info!("Loaded catalog with {} item(s)", catalog.len());
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_source(&JsonCatalogSource::new(path))
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.code == code)
    }

    pub fn in_category(&self, category: &str) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.in_category(category))
            .collect()
    }

    /// Distinct category names, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.items.iter().map(|i| i.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Item whose display name equals `name` ignoring case and surrounding spaces
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        let wanted = name.trim();
        self.items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"code": "fr", "name": "France", "category": "Europe", "colors": ["blue", "white", "red"], "layout": "vertical-tricolor"},
        {"code": "it", "name": "Italy", "category": "Europe", "colors": ["green", "white", "red"], "layout": "vertical-tricolor"},
        {"code": "jp", "name": "Japan", "category": "Asia", "colors": ["white", "red"], "layout": "disc"}
    ]"#;

    #[test]
    fn test_from_json_str() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("jp").unwrap().name, "Japan");
        assert_eq!(catalog.get("jp").unwrap().layout, "disc");
    }

    #[test]
    fn test_missing_optional_attributes_default() {
        let catalog =
            Catalog::from_json_str(r#"[{"code": "xx", "name": "Nowhere", "category": "None"}]"#)
                .unwrap();
        let item = catalog.get("xx").unwrap();
        assert!(item.colors.is_empty());
        assert_eq!(item.layout, "");
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let result = Catalog::from_json_str("[]");
        assert!(matches!(result, Err(QuizError::NoItemsAvailable(_))));
    }

    #[test]
    fn test_duplicate_codes_are_rejected() {
        let result = Catalog::from_json_str(
            r#"[
                {"code": "ng", "name": "Nigeria", "category": "Africa"},
                {"code": "ne", "name": "Niger", "category": "Africa"},
                {"code": "ng", "name": "Nigeria again", "category": "Africa"}
            ]"#,
        );
        match result {
            Err(QuizError::InvalidConfig(msg)) => assert!(msg.contains("'ng'")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_catalog_is_an_error() {
        let result = Catalog::from_json_str("{not json");
        assert!(matches!(result, Err(QuizError::Catalog(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Catalog::load(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(QuizError::Io(_))));
    }

    #[test]
    fn test_in_category_is_case_insensitive() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let europe = catalog.in_category("europe");
        assert_eq!(europe.len(), 2);
        assert!(catalog.in_category("Africa").is_empty());
    }

    #[test]
    fn test_categories_sorted_and_unique() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.categories(), vec!["Asia", "Europe"]);
    }

    #[test]
    fn test_find_by_name() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.find_by_name("  italy ").unwrap().code, "it");
        assert!(catalog.find_by_name("Spain").is_none());
    }

    #[test]
    fn test_sample_catalog_file_loads() {
        let catalog = Catalog::load(Path::new("data/flags.json")).unwrap();
        assert!(catalog.len() >= 30);
        assert!(catalog.get("us").is_some());
    }
}
