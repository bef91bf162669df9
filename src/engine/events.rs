//! Widget commands, user actions and events.
//!
//! - [`UserAction`]: what a visitor did, as the widget understands it.
//! - [`WidgetCommand`]: messages sent from a [`WidgetHandle`](crate::handle::WidgetHandle)
//!   to the widget run loop.
//! - [`WidgetEvent`]: broadcast by the widget after every observable change.

use std::fmt::Display;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::engine::categories::CategoryId;
use crate::engine::controls::PanelState;
use crate::engine::dialog::{DialogKind, Visibility};
use crate::engine::widget::WidgetId;

/// A visitor interaction with one of the dialogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// "Accept all" on the given dialog
    AcceptAll(DialogKind),
    /// "Reject all" on the given dialog
    RejectAll(DialogKind),
    /// "Save settings" on the settings dialog
    SaveSettings,
    /// Any "open settings" trigger
    OpenSettings,
    /// "Close" on the settings dialog
    CloseSettings,
    /// Click on a category toggle
    ToggleCategory(CategoryId),
    /// Click on a category title (expand / collapse its details)
    ToggleDetails(CategoryId),
}

/// The three terminal decisions a visitor can make. Each one is reported
/// through its own host callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Decision {
    AcceptAll,
    RejectAll,
    ApplySettings,
}

impl Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::AcceptAll => write!(f, "AcceptAll"),
            Decision::RejectAll => write!(f, "RejectAll"),
            Decision::ApplySettings => write!(f, "ApplySettings"),
        }
    }
}

/// Commands accepted by a running widget.
#[derive(Debug)]
pub enum WidgetCommand {
    /// Applies a user action
    Dispatch(UserAction),
    /// Activates the element with the given id or marker
    Activate(String),
    /// Schedules the consent prompt
    PresentAfterDelay(Duration),
    /// Returns the current state of the widget
    Snapshot { reply: oneshot::Sender<WidgetSnapshot> },
    /// Tears the widget down and stops the run loop
    Teardown { reply: oneshot::Sender<()> },
}

/// Events emitted by a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// A dialog became visible
    DialogShown { widget: WidgetId, dialog: DialogKind },
    /// A dialog became hidden
    DialogHidden { widget: WidgetId, dialog: DialogKind },
    /// The scheduled presentation fired but the visitor already decided
    PresentationSkipped { widget: WidgetId },
    /// A category toggle changed after a visitor click
    ToggleChanged { widget: WidgetId, category: CategoryId, checked: bool },
    /// A detail panel was expanded or collapsed
    DetailsToggled { widget: WidgetId, category: CategoryId, panel: PanelState },
    /// A consent record was written
    ConsentStored { widget: WidgetId, categories: Vec<CategoryId> },
    /// A decision was reported to the host
    DecisionApplied { widget: WidgetId, decision: Decision, categories: Vec<CategoryId> },
    /// The widget was torn down
    TornDown { widget: WidgetId },
}

/// Point-in-time view of a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSnapshot {
    pub widget: WidgetId,
    pub prompt: Visibility,
    pub settings: Visibility,
    /// Displayed state of every category toggle, in configuration order
    pub toggles: Vec<(CategoryId, bool)>,
    /// The stored consent record, if any
    pub stored: Option<Vec<CategoryId>>,
    pub wired: bool,
    pub presentation_pending: bool,
}

impl WidgetSnapshot {
    pub fn is_checked(&self, category: &CategoryId) -> Option<bool> {
        self.toggles
            .iter()
            .find(|(id, _)| id == category)
            .map(|(_, checked)| *checked)
    }
}
