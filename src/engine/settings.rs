//! Settings dialog.
//!
//! Full per-category toggle surface. The dialog exclusively owns the
//! [`ControlsRegistry`]; every `show()` reconciles the toggles from the
//! consent store before the dialog becomes visible, so a previous session of
//! unsaved clicks never leaks into the next opening.

use crate::engine::categories::{CategoryId, CategoryModel};
use crate::engine::config::SettingsText;
use crate::engine::consent_store::ConsentStore;
use crate::engine::controls::{ControlsRegistry, PanelState};
use crate::engine::dialog::{Transition, Visibility};

/// Element ids of the settings buttons.
pub const SETTINGS_ACCEPT_ID: &str = "s-all-bn";
pub const SETTINGS_REJECT_ID: &str = "s-rall-bn";
pub const SETTINGS_SAVE_ID: &str = "s-sv-bn";
pub const SETTINGS_CLOSE_ID: &str = "s-c-bn";

#[derive(Debug)]
pub struct SettingsDialog {
    text: SettingsText,
    model: CategoryModel,
    controls: ControlsRegistry,
    visibility: Visibility,
}

impl SettingsDialog {
    pub fn new(text: SettingsText) -> Self {
        let model = CategoryModel::from_settings(&text);
        let controls = ControlsRegistry::from_model(&model);
        Self {
            text,
            model,
            controls,
            visibility: Visibility::Hidden,
        }
    }

    pub fn text(&self) -> &SettingsText {
        &self.text
    }

    pub fn model(&self) -> &CategoryModel {
        &self.model
    }

    pub fn controls(&self) -> &ControlsRegistry {
        &self.controls
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Reconciles the toggles from `store`, collapses the panels and shows the dialog.
    pub fn show(&mut self, store: &ConsentStore) -> Transition {
        self.controls.reconcile(&store.read_categories());
        self.controls.collapse_all();
        Transition::to(&mut self.visibility, Visibility::Shown)
    }

    pub fn hide(&mut self) -> Transition {
        Transition::to(&mut self.visibility, Visibility::Hidden)
    }

    /// Categories whose toggle is currently checked.
    pub fn accepted_category_ids(&self) -> Vec<CategoryId> {
        self.controls.accepted_category_ids()
    }

    pub fn all_category_ids(&self) -> Vec<CategoryId> {
        self.model.all_category_ids()
    }

    pub fn always_enabled_category_ids(&self) -> Vec<CategoryId> {
        self.model.always_enabled_category_ids()
    }

    /// Visitor click on a category toggle. Read-only toggles do not change.
    pub fn toggle_category(&mut self, category: &CategoryId) -> Option<bool> {
        self.controls.toggle(category)
    }

    /// Visitor click on a category title, expanding or collapsing its details.
    pub fn toggle_details(&mut self, category: &CategoryId) -> Option<PanelState> {
        self.controls.toggle_panel(category)
    }
}
