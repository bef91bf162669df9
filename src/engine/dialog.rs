//! Dialog visibility.
//!
//! Both dialogs of the widget are two-state machines: [`Visibility::Hidden`]
//! and [`Visibility::Shown`], starting hidden. Guards on `show()` live in the
//! dialogs themselves and are re-evaluated on every call.

use std::fmt::Display;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

impl Visibility {
    pub fn is_shown(self) -> bool {
        self == Visibility::Shown
    }
}

/// The two dialogs of the widget.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DialogKind {
    /// Consent banner
    Prompt,
    /// Detailed per-category settings
    Settings,
}

impl Display for DialogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogKind::Prompt => write!(f, "Prompt"),
            DialogKind::Settings => write!(f, "Settings"),
        }
    }
}

/// Outcome of a `show()` / `hide()` request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The dialog changed state
    Changed(Visibility),
    /// The dialog already was in the requested state
    Unchanged(Visibility),
    /// A guard prevented the transition
    Blocked,
}

impl Transition {
    pub fn changed(self) -> bool {
        matches!(self, Transition::Changed(_))
    }

    pub(crate) fn to(current: &mut Visibility, target: Visibility) -> Self {
        if *current == target {
            Transition::Unchanged(target)
        } else {
            *current = target;
            Transition::Changed(target)
        }
    }
}
