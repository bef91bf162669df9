//! Category controls registry.
//!
//! Every category of the settings dialog owns one live control: a toggle
//! (checked / unchecked, possibly read-only) paired with a collapsible detail
//! panel. Controls live in an arena (`Vec<CategoryControls>`) and are looked
//! up through an index keyed by [`CategoryId`]; both are built once when the
//! settings dialog is constructed and never rebuilt.
//!
//! The displayed state of the toggles is the only state the registry keeps.
//! It is overwritten from the consent record by [`ControlsRegistry::reconcile`]
//! every time the settings dialog is shown, and changed by visitor clicks in
//! between.

use std::collections::HashMap;

use crate::engine::categories::{CategoryId, CategoryModel};

/// Index of a control in the registry arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ControlId(usize);

/// State of a collapsible detail panel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanelState {
    Collapsed,
    Expanded,
}

/// Live controls of one category.
#[derive(Debug, Clone)]
pub struct CategoryControls {
    pub category: CategoryId,
    /// Element id of the detail panel (`c-ac-<block index>`)
    pub panel_id: String,
    panel: PanelState,
    checked: bool,
    readonly: bool,
}

impl CategoryControls {
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    pub fn is_expanded(&self) -> bool {
        self.panel == PanelState::Expanded
    }
}

#[derive(Debug, Default)]
pub struct ControlsRegistry {
    controls: Vec<CategoryControls>,
    index: HashMap<CategoryId, ControlId>,
}

impl ControlsRegistry {
    /// Creates one control per category, pre-checked from the category defaults.
    pub fn from_model(model: &CategoryModel) -> Self {
        let mut registry = Self::default();
        for category in model.iter() {
            let id = ControlId(registry.controls.len());
            registry.controls.push(CategoryControls {
                category: category.id.clone(),
                panel_id: format!("c-ac-{}", category.block_index),
                panel: PanelState::Collapsed,
                checked: category.default_enabled,
                readonly: category.locked,
            });
            registry.index.insert(category.id.clone(), id);
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn control_id(&self, category: &CategoryId) -> Option<ControlId> {
        self.index.get(category).copied()
    }

    pub fn get(&self, category: &CategoryId) -> Option<&CategoryControls> {
        let id = self.control_id(category)?;
        self.controls.get(id.0)
    }

    fn get_mut(&mut self, category: &CategoryId) -> Option<&mut CategoryControls> {
        let id = self.control_id(category)?;
        self.controls.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryControls> {
        self.controls.iter()
    }

    /// Ids of the categories whose toggle is currently checked, in configuration order.
    pub fn accepted_category_ids(&self) -> Vec<CategoryId> {
        self.controls
            .iter()
            .filter(|c| c.checked)
            .map(|c| c.category.clone())
            .collect()
    }

    /// Sets every toggle to whether its category is part of `consent`.
    ///
    /// Ids in `consent` without a registered control are ignored.
    pub fn reconcile(&mut self, consent: &[CategoryId]) {
        for control in self.controls.iter_mut() {
            control.checked = consent.contains(&control.category);
        }
    }

    /// Collapses every detail panel.
    pub fn collapse_all(&mut self) {
        for control in self.controls.iter_mut() {
            control.panel = PanelState::Collapsed;
        }
    }

    /// Flips the toggle of `category` the way a visitor click does.
    ///
    /// Returns the new checked state, or `None` if the category is unknown or
    /// its toggle is read-only.
    pub fn toggle(&mut self, category: &CategoryId) -> Option<bool> {
        let control = self.get_mut(category)?;
        if control.readonly {
            return None;
        }
        control.checked = !control.checked;
        Some(control.checked)
    }

    /// Expands or collapses the detail panel of `category`, returning the new state.
    pub fn toggle_panel(&mut self, category: &CategoryId) -> Option<PanelState> {
        let control = self.get_mut(category)?;
        control.panel = match control.panel {
            PanelState::Collapsed => PanelState::Expanded,
            PanelState::Expanded => PanelState::Collapsed,
        };
        Some(control.panel)
    }
}
