//! Catalog asset loading.
//!
//! This module provides:
//! - Loading item catalogs from TOML (a single file or a directory of files)
//! - The built-in Archnemesis catalog embedded in the binary
//! - Schema version checks and graph validation on load

use std::fs;
use std::path::{Path, PathBuf};

use nemesis_advisor::catalog::{Catalog, Item};
use nemesis_common::{CatalogError, SchemaVersion};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Built-in catalog used when no catalog path is configured.
pub const BUILTIN_CATALOG: &str = include_str!("../assets/catalogs/archnemesis.toml");

/// Errors that can occur during catalog loading.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// Path does not exist.
    #[error("Catalog not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read a file.
    #[error("Failed to read catalog file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse catalog TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Version string is not `major.minor.patch`.
    #[error("Invalid catalog version: {0}")]
    InvalidVersion(String),

    /// Catalog was written for an incompatible schema.
    #[error("Incompatible catalog version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Supported version.
        expected: SchemaVersion,
        /// Version declared by the file.
        found: SchemaVersion,
    },

    /// Graph integrity violation.
    #[error("Invalid catalog: {0}")]
    Invalid(#[from] CatalogError),
}

/// Result type for catalog loading operations.
pub type CatalogLoadResult<T> = Result<T, CatalogLoadError>;

/// An item definition as written in a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique item name.
    pub name: String,
    /// Components, absent for drop-only items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Vec<String>>,
    /// Whether the item is a virtual goal.
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
    /// Icon file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ItemDefinition {
    /// Converts to a catalog item.
    #[must_use]
    pub fn to_item(&self) -> Item {
        Item {
            name: self.name.clone(),
            recipe: self.recipe.clone(),
            is_virtual: self.is_virtual,
            image: self.image.clone().filter(|image| !image.is_empty()),
        }
    }
}

/// The contents of one catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Items in this file.
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
}

fn default_version() -> String {
    SchemaVersion::CATALOG.to_string()
}

impl CatalogFile {
    /// Parses a catalog file and checks its version.
    pub fn parse(text: &str) -> CatalogLoadResult<Self> {
        let file: Self = toml::from_str(text)?;
        file.check_version()?;
        Ok(file)
    }

    /// Checks that this build can read the file.
    pub fn check_version(&self) -> CatalogLoadResult<SchemaVersion> {
        let found = SchemaVersion::parse(&self.version)
            .ok_or_else(|| CatalogLoadError::InvalidVersion(self.version.clone()))?;
        if !SchemaVersion::CATALOG.can_read(&found) {
            return Err(CatalogLoadError::VersionMismatch {
                expected: SchemaVersion::CATALOG,
                found,
            });
        }
        if !SchemaVersion::CATALOG.is_compatible_with(&found) {
            warn!(
                "Catalog version {found} is newer than {}; unknown fields are ignored",
                SchemaVersion::CATALOG
            );
        }
        Ok(found)
    }
}

/// Builds and validates a catalog from item definitions.
pub fn build_catalog(definitions: &[ItemDefinition]) -> CatalogLoadResult<Catalog> {
    let catalog = Catalog::new(definitions.iter().map(ItemDefinition::to_item).collect())?;
    catalog.validate()?;
    Ok(catalog)
}

/// Parses and validates a catalog from TOML text.
pub fn parse_catalog(text: &str) -> CatalogLoadResult<Catalog> {
    build_catalog(&CatalogFile::parse(text)?.items)
}

/// Loads the built-in catalog.
pub fn builtin_catalog() -> CatalogLoadResult<Catalog> {
    parse_catalog(BUILTIN_CATALOG)
}

/// Statistics for the catalog loader.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogLoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Number of item definitions read.
    pub items_loaded: u32,
}

/// Catalog loader for a file or a directory of files.
pub struct CatalogLoader {
    path: PathBuf,
    stats: CatalogLoaderStats,
}

impl CatalogLoader {
    /// Creates a loader for a path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stats: CatalogLoaderStats::default(),
        }
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &CatalogLoaderStats {
        &self.stats
    }

    /// Loads every definition under the path and builds one catalog.
    ///
    /// Directories are read non-recursively; `*.toml` files are merged in
    /// path order. Any unreadable or invalid file fails the whole load,
    /// since a partial recipe graph would give wrong advice.
    pub fn load(&mut self) -> CatalogLoadResult<Catalog> {
        self.stats = CatalogLoaderStats::default();
        if !self.path.exists() {
            return Err(CatalogLoadError::NotFound(self.path.clone()));
        }

        let files = if self.path.is_dir() {
            let mut files: Vec<PathBuf> = fs::read_dir(&self.path)?
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
                .collect();
            files.sort();
            files
        } else {
            vec![self.path.clone()]
        };

        let mut definitions = Vec::new();
        for file in &files {
            definitions.extend(self.load_file(file)?);
        }

        let catalog = build_catalog(&definitions)?;
        info!(
            "Loaded {} items from {} catalog files",
            self.stats.items_loaded, self.stats.files_loaded
        );
        Ok(catalog)
    }

    fn load_file(&mut self, path: &Path) -> CatalogLoadResult<Vec<ItemDefinition>> {
        debug!("Loading catalog file: {:?}", path);

        let content = fs::read_to_string(path)?;
        let file = CatalogFile::parse(&content)?;

        self.stats.files_loaded += 1;
        self.stats.items_loaded += file.items.len() as u32;
        debug!("Read {} items from {:?}", file.items.len(), path);

        Ok(file.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DROPS: &str = r#"
version = "1.0.0"

[[items]]
name = "Toxic"

[[items]]
name = "Bloodletter"
image = "bloodletter.png"
"#;

    const RECIPES: &str = r#"
[[items]]
name = "Entangler"
recipe = ["Toxic", "Bloodletter"]

[[items]]
name = "Goal"
recipe = ["Entangler"]
virtual = true
"#;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = builtin_catalog().expect("built-in catalog is valid");
        assert_eq!(catalog.len(), 64);
        assert_eq!(catalog.drops().count(), 27);

        let goals: Vec<_> = catalog.goals().map(|id| catalog.name(id)).collect();
        assert_eq!(goals, vec!["Currency"]);

        let kitava = catalog.id("Kitava-touched").expect("kitava");
        assert_eq!(catalog.recipe(kitava).map(<[_]>::len), Some(4));
    }

    #[test]
    fn test_parse_definition_fields() {
        let file = CatalogFile::parse(DROPS).expect("parse");
        assert_eq!(file.items.len(), 2);
        assert_eq!(file.items[0].recipe, None);
        assert_eq!(file.items[1].image.as_deref(), Some("bloodletter.png"));
        assert!(!file.items[1].is_virtual);
    }

    #[test]
    fn test_missing_version_defaults_to_current() {
        let file = CatalogFile::parse(RECIPES).expect("parse");
        assert_eq!(file.version, "1.0.0");
        assert!(file.items[1].is_virtual);
    }

    #[test]
    fn test_incompatible_version_rejected() {
        let result = CatalogFile::parse("version = \"2.0.0\"\nitems = []\n");
        assert!(matches!(
            result,
            Err(CatalogLoadError::VersionMismatch { found, .. }) if found.major == 2
        ));

        let result = CatalogFile::parse("version = \"latest\"\n");
        assert!(matches!(result, Err(CatalogLoadError::InvalidVersion(_))));
    }

    #[test]
    fn test_cycle_rejected_on_load() {
        let text = r#"
[[items]]
name = "A"
recipe = ["B"]

[[items]]
name = "B"
recipe = ["A"]
"#;
        assert!(matches!(
            parse_catalog(text),
            Err(CatalogLoadError::Invalid(CatalogError::Cycle(_)))
        ));
    }

    #[test]
    fn test_unknown_component_rejected_on_load() {
        assert!(matches!(
            parse_catalog(RECIPES),
            Err(CatalogLoadError::Invalid(CatalogError::UnknownComponent { .. }))
        ));
    }

    #[test]
    fn test_load_directory_merges_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("01-drops.toml"), DROPS).expect("write drops");
        fs::write(temp_dir.path().join("02-recipes.toml"), RECIPES).expect("write recipes");
        fs::write(temp_dir.path().join("notes.txt"), "ignored").expect("write notes");

        let mut loader = CatalogLoader::new(temp_dir.path());
        let catalog = loader.load().expect("load directory");

        assert_eq!(catalog.len(), 4);
        assert_eq!(
            loader.stats(),
            &CatalogLoaderStats {
                files_loaded: 2,
                items_loaded: 4
            }
        );
    }

    #[test]
    fn test_stats_reset_between_loads() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("01-drops.toml"), DROPS).expect("write drops");
        fs::write(temp_dir.path().join("02-recipes.toml"), RECIPES).expect("write recipes");

        let mut loader = CatalogLoader::new(temp_dir.path());
        loader.load().expect("first load");
        loader.load().expect("second load");

        assert_eq!(
            loader.stats(),
            &CatalogLoaderStats {
                files_loaded: 2,
                items_loaded: 4
            }
        );
    }

    #[test]
    fn test_load_single_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("catalog.toml");
        fs::write(&path, format!("{DROPS}\n{RECIPES}")).expect("write catalog");

        let catalog = CatalogLoader::new(&path).load().expect("load file");

        assert!(catalog.id("Entangler").is_some());
    }

    #[test]
    fn test_load_missing_path() {
        let mut loader = CatalogLoader::new("/nonexistent/catalog.toml");
        assert!(matches!(loader.load(), Err(CatalogLoadError::NotFound(_))));
    }
}
