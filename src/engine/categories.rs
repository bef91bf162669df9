//! Cookie categories.
//!
//! A [`Category`] is derived from every settings block that carries a toggle.
//! The [`CategoryModel`] keeps them in configuration order and answers the
//! two static questions the widget needs: "what are all categories" (accept
//! all) and "which categories can never be declined" (reject all).

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::engine::config::{SettingsText, ToggleBlock};

/// Identifier of a cookie category (e.g. `"necessary"`, `"analytics"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for CategoryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category of cookies the visitor can allow or decline as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    /// Toggle is checked before the visitor made any choice
    pub default_enabled: bool,
    /// Toggle cannot be changed by the visitor
    pub locked: bool,
    /// Index of the settings block this category was declared in
    pub block_index: usize,
}

impl Category {
    pub fn from_toggle(toggle: &ToggleBlock, block_index: usize) -> Self {
        Self {
            id: CategoryId::new(toggle.value.clone()),
            default_enabled: toggle.enabled,
            locked: toggle.readonly,
            block_index,
        }
    }

    /// Only a locked category that is on by default is always enabled.
    pub fn always_enabled(&self) -> bool {
        self.locked && self.default_enabled
    }
}

/// Immutable, ordered set of categories built from the settings configuration.
#[derive(Debug, Clone, Default)]
pub struct CategoryModel {
    categories: Vec<Category>,
}

impl CategoryModel {
    pub fn from_settings(settings: &SettingsText) -> Self {
        let mut model = Self::default();
        for (index, block) in settings.blocks.iter().enumerate() {
            if let Some(toggle) = &block.toggle {
                model.insert(Category::from_toggle(toggle, index));
            }
        }
        model
    }

    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut model = Self::default();
        for category in categories {
            model.insert(category);
        }
        model
    }

    // A repeated id replaces the earlier definition but keeps its position
    fn insert(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => {
                log::warn!("category {} declared more than once, last declaration wins", category.id);
                *existing = category;
            }
            None => self.categories.push(category),
        }
    }

    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// All category ids, in configuration order.
    pub fn all_category_ids(&self) -> Vec<CategoryId> {
        self.categories.iter().map(|c| c.id.clone()).collect()
    }

    /// Ids of the categories that are included in every consent record.
    pub fn always_enabled_category_ids(&self) -> Vec<CategoryId> {
        self.categories
            .iter()
            .filter(|c| c.always_enabled())
            .map(|c| c.id.clone())
            .collect()
    }
}
