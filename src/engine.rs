//! Consent-state engine.
//!
//! This module contains everything a cookie-consent widget needs besides the
//! actual rendering: the category model, the persisted consent record, the
//! two dialogs and the widget that coordinates them.
//!
//! # Concepts
//!
//! - **Categories**: tracking categories declared by the settings blocks of
//!   the configuration. A category that is both enabled and read-only is
//!   *always enabled* and part of every stored decision.
//! - **Consent record**: the set of allowed category ids, stored as a JSON
//!   array in one cookie scoped to the registrable domain. Its presence means
//!   "the visitor already decided".
//! - **Dialogs**: the consent prompt (banner) and the settings dialog. Each
//!   is either hidden or shown; the prompt refuses to show once a decision
//!   exists, the settings dialog reconciles its toggles from the record every
//!   time it opens.
//! - **Widget**: owns the store and both dialogs, translates visitor actions
//!   into decisions (store, hide, callback) and publishes [`WidgetEvent`]s.
//!
//! # Available types
//!
//! - [`ConsentConfig`], [`WidgetOptions`]: configuration.
//! - [`CategoryModel`], [`ControlsRegistry`]: categories and their live controls.
//! - [`ConsentStore`]: reads and writes the consent record through a [`CookieJar`].
//! - [`ConsentPrompt`], [`SettingsDialog`]: the two dialogs.
//! - [`ConsentWidget`], [`WidgetHandle`]: the widget, driven directly or from a tokio task.
//! - [`MountPoint`], [`WidgetContainer`]: the boundary to the host renderer.
//!
//! # Example
//!
//! ```no_run
//! use cookie_consent::{ConsentCallbacks, ConsentConfig, ConsentWidget, DefaultCookieJar, NullMount, WidgetOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsentConfig::from_path("consent.json")?;
//! let options = WidgetOptions::builder().host("www.example.com").build()?;
//! let callbacks = ConsentCallbacks::new(
//!     |c| println!("accepted {:?}", c),
//!     |c| println!("rejected, kept {:?}", c),
//!     |c| println!("saved {:?}", c),
//! );
//!
//! let mut widget = ConsentWidget::initialize(
//!     Box::new(NullMount::new()),
//!     config,
//!     options,
//!     DefaultCookieJar::new().into_handle(),
//!     callbacks,
//! )?;
//! widget.wire_interactions();
//! widget.present_now();
//! widget.activate("c-p-bn");
//! # Ok(()) }
//! ```

/// Category ids and the category model.
pub mod categories;
/// Configuration texts and runtime options.
pub mod config;
/// Persisted consent record.
pub mod consent_store;
/// Live per-category controls.
pub mod controls;
/// Cookie jars and their persistent stores.
pub mod cookies;
/// Dialog visibility states.
pub mod dialog;
pub mod errors;
/// Commands, actions and events.
pub mod events;
pub mod handle;
/// Consent prompt (banner).
pub mod prompt;
/// Settings dialog.
pub mod settings;
/// Boundary to the host renderer.
pub mod view;
/// The widget.
pub mod widget;

/// Capacity of the command and event channels of a running widget.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 128;

pub use categories::{Category, CategoryId, CategoryModel};
pub use config::{ConsentConfig, WidgetOptions, WidgetOptionsBuilder, WidgetOptionsError};
pub use consent_store::{registrable_domain, ConsentStore};
pub use controls::{ControlsRegistry, PanelState};
pub use cookies::{Cookie, CookieJar, CookieJarHandle, DefaultCookieJar};
pub use dialog::{DialogKind, Transition, Visibility};
pub use errors::ConsentError;
pub use events::{Decision, UserAction, WidgetCommand, WidgetEvent, WidgetSnapshot};
pub use handle::WidgetHandle;
pub use prompt::ConsentPrompt;
pub use settings::SettingsDialog;
pub use view::{MountPoint, NullMount, WidgetContainer};
pub use widget::{ConsentCallbacks, ConsentWidget, WidgetId};
