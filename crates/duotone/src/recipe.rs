//! Recipes: per-mode maps from token name to color.
//!
//! A theme is generated from two recipes, one for Light and one for Dark.
//! Each maps catalog token names to a [`RecipeColor`]. Recipes usually
//! arrive as JSON from a UI, but can also be written by hand as TOML:
//!
//! ```toml
//! "accent/primary/primary" = "#2E86AB"
//! "base/other/shadow" = { r = 0.0, g = 0.0, b = 0.0 }
//! ```
//!
//! A recipe is not required to cover the whole catalog to parse; coverage
//! gaps surface later as per-token failures when the theme is applied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog;
use crate::color::RecipeColor;

/// Error produced when recipe text cannot be parsed.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// JSON that does not parse, or parses to something other than a map
    /// of token names to colors.
    #[error("invalid JSON recipe: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML that does not parse, or parses to something other than a map
    /// of token names to colors.
    #[error("invalid TOML recipe: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A map from token name to the color to write for one mode.
///
/// Keys are ordered, so serialization and iteration are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(BTreeMap<String, RecipeColor>);

impl Recipe {
    /// Creates an empty recipe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a recipe from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::Json`] when the text is not valid JSON or an
    /// entry is neither a hex string nor an `r`/`g`/`b` map.
    pub fn from_json(json: &str) -> Result<Self, RecipeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a recipe from a TOML table.
    ///
    /// Token names contain slashes, so keys must be quoted.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::Toml`] when the text is not valid TOML or an
    /// entry is neither a hex string nor an `r`/`g`/`b` table.
    pub fn from_toml(toml: &str) -> Result<Self, RecipeError> {
        Ok(toml::from_str(toml)?)
    }

    /// Serializes the recipe as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, RecipeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the color for a token, replacing any existing entry.
    pub fn set(&mut self, token: impl Into<String>, color: impl Into<RecipeColor>) {
        self.0.insert(token.into(), color.into());
    }

    /// Builder form of [`set`](Self::set).
    ///
    /// ```
    /// use duotone::Recipe;
    ///
    /// let recipe = Recipe::new()
    ///     .with("accent/primary/primary", "#2E86AB")
    ///     .with("accent/secondary/secondary", "#C0F5A1");
    /// assert_eq!(recipe.len(), 2);
    /// ```
    #[must_use]
    pub fn with(mut self, token: impl Into<String>, color: impl Into<RecipeColor>) -> Self {
        self.set(token, color);
        self
    }

    /// Returns the color for a token, if the recipe has one.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<&RecipeColor> {
        self.0.get(token)
    }

    /// Removes a token's entry, returning it if it was present.
    pub fn remove(&mut self, token: &str) -> Option<RecipeColor> {
        self.0.remove(token)
    }

    /// Number of entries in the recipe.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the recipe has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over entries in token-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecipeColor)> {
        self.0.iter().map(|(token, color)| (token.as_str(), color))
    }

    /// Catalog tokens this recipe has no entry for, in catalog order.
    ///
    /// Entries for names outside the catalog are legal and ignored by the
    /// generator; this only reports the catalog side of the difference.
    #[must_use]
    pub fn missing_tokens(&self) -> Vec<&'static str> {
        catalog::names()
            .filter(|name| !self.0.contains_key(*name))
            .collect()
    }

    /// Whether the recipe covers the entire catalog.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_tokens().is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Recipe
where
    K: Into<String>,
    V: Into<RecipeColor>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(token, color)| (token.into(), color.into()))
                .collect(),
        )
    }
}
