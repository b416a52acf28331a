//! Category table — maps tab names to member titles.
//!
//! Loaded from `categories.toml`; the bundled table is used when the user has
//! not provided one.

use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use crate::channel::Channel;

const BUILTIN_CATEGORIES: &str = include_str!("../data/categories.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    #[serde(default)]
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryTable {
    #[serde(rename = "category", default)]
    categories: Vec<CategoryDef>,
    #[serde(default = "default_catch_all")]
    catch_all: String,
}

fn default_catch_all() -> String {
    "Other".to_string()
}

impl CategoryTable {
    pub fn builtin() -> Self {
        // The bundled table is covered by tests; an empty table is still usable.
        Self::parse(BUILTIN_CATEGORIES).unwrap_or_else(|e| {
            warn!("bundled category table is invalid: {}", e);
            Self::new(Vec::new(), default_catch_all())
        })
    }

    pub fn new(categories: Vec<CategoryDef>, catch_all: impl Into<String>) -> Self {
        Self {
            categories,
            catch_all: catch_all.into(),
        }
    }

    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Read `path`, falling back to the bundled table when it is missing.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::builtin());
        }
        let content = std::fs::read_to_string(path)?;
        let table = Self::parse(&content)?;
        info!("category table loaded from {:?}", path);
        Ok(table)
    }

    pub fn catch_all(&self) -> &str {
        &self.catch_all
    }

    /// Tab names in display order, catch-all last.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.iter().map(|c| c.name.as_str()).collect();
        if !names.contains(&self.catch_all.as_str()) {
            names.push(self.catch_all.as_str());
        }
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        name == self.catch_all || self.categories.iter().any(|c| c.name == name)
    }

    /// Category by exact title membership, catch-all when no entry lists it.
    pub fn classify(&self, title: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.titles.iter().any(|t| t == title))
            .map(|c| c.name.as_str())
            .unwrap_or(self.catch_all.as_str())
    }

    /// Stored category when it names a configured tab, else by title.
    pub fn classify_channel<'a>(&'a self, channel: &'a Channel) -> &'a str {
        if self.contains(&channel.category) {
            return channel.category.as_str();
        }
        self.classify(&channel.title)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}
