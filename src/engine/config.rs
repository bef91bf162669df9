//! Widget configuration.
//!
//! Two kinds of configuration exist:
//!
//! - [`ConsentConfig`]: the textual description of both dialogs (titles,
//!   button labels, settings blocks, cookie tables). It is usually loaded
//!   from JSON with the same field names the web widget uses
//!   (`primaryButton`, `cookieTableHeaders`, `cookieTable`, ...).
//! - [`WidgetOptions`]: runtime knobs (storage key, host name, presentation
//!   delay, settings trigger marker), created through
//!   [`WidgetOptions::builder()`] with validation.
//!
//! # Examples
//!
//! ```rust
//! use cookie_consent::config::{ConsentConfig, WidgetOptions};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsentConfig::from_json_str(r#"{
//!     "consent": { "title": "Cookies", "description": "We use cookies",
//!                  "primaryButton": "Accept all", "secondaryButton": "Reject all",
//!                  "settingsButton": "Settings" },
//!     "settings": { "title": "Cookie settings", "primaryButton": "Accept all",
//!                   "secondaryButton": "Reject all", "saveButton": "Save",
//!                   "closeButton": "Close", "cookieTableHeaders": { "name": "Name" },
//!                   "blocks": [ { "title": "Necessary", "description": "",
//!                                 "toggle": { "value": "necessary", "enabled": true, "readonly": true } } ] }
//! }"#)?;
//! assert_eq!(config.settings.blocks.len(), 1);
//!
//! let options = WidgetOptions::builder()
//!     .storage_key("consent")
//!     .host("www.example.com")
//!     .presentation_delay(std::time::Duration::from_millis(150))
//!     .build()?;
//! assert_eq!(options.host, "www.example.com");
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::engine::errors::ConsentError;

/// Default name of the cookie holding the consent record.
pub const DEFAULT_STORAGE_KEY: &str = "consent";
/// Default marker value of elements that open the settings dialog.
pub const DEFAULT_SETTINGS_TRIGGER: &str = "c-settings";
/// Host used when the page host is unknown.
pub const DEFAULT_HOST: &str = "localhost";

/// Main configuration: text of the consent prompt and of the settings dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsentConfig {
    pub consent: ConsentText,
    pub settings: SettingsText,
}

impl ConsentConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConsentError> {
        serde_json::from_str(json).map_err(|e| ConsentError::Config(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConsentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// Displayed text on the consent prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentText {
    pub title: String,
    pub description: String,
    /// Label of the "accept all" button
    pub primary_button: String,
    /// Label of the "reject all" button
    pub secondary_button: String,
    pub settings_button: String,
}

/// Displayed text on the settings dialog, including its blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsText {
    pub title: String,
    pub primary_button: String,
    pub secondary_button: String,
    pub save_button: String,
    pub close_button: String,
    pub cookie_table_headers: CookieTableHeaders,
    pub blocks: Vec<SettingsBlock>,
}

/// A section of the settings dialog. Blocks with a toggle describe a cookie category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsBlock {
    pub title: String,
    pub description: String,
    pub toggle: Option<ToggleBlock>,
    pub cookie_table: Vec<CookieRow>,
}

/// Toggle descriptor of a block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleBlock {
    /// Category identifier
    pub value: String,
    /// Checked before the visitor made any choice
    pub enabled: bool,
    /// Visitor cannot change the toggle
    pub readonly: bool,
}

/// One cookie description, keyed by table header key (`name`, `provider`, ...).
pub type CookieRow = HashMap<String, String>;

/// Cookie table headers as `(key, label)` pairs, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieTableHeaders(pub Vec<(String, String)>);

impl CookieTableHeaders {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|(_, label)| label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CookieTableHeaders {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, label) in &self.0 {
            map.serialize_entry(key, label)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CookieTableHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = CookieTableHeaders;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of table header keys to labels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut headers: Vec<(String, String)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, label)) = access.next_entry::<String, String>()? {
                    // Last label wins for a repeated key, first position is kept
                    if let Some(existing) = headers.iter_mut().find(|(k, _)| *k == key) {
                        existing.1 = label;
                    } else {
                        headers.push((key, label));
                    }
                }
                Ok(CookieTableHeaders(headers))
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}

/// Runtime options of a consent widget.
#[derive(Debug, Clone)]
pub struct WidgetOptions {
    /// Name of the cookie holding the consent record
    pub storage_key: String,
    /// Host name of the page; the storage scope is derived from it
    pub host: String,
    /// Delay [`ConsentWidget::present`](crate::ConsentWidget::present) waits before showing the prompt
    pub presentation_delay: Duration,
    /// Marker value of elements that open the settings dialog
    pub settings_trigger: String,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            host: DEFAULT_HOST.to_string(),
            presentation_delay: Duration::ZERO,
            settings_trigger: DEFAULT_SETTINGS_TRIGGER.to_string(),
        }
    }
}

impl WidgetOptions {
    pub fn builder() -> WidgetOptionsBuilder {
        WidgetOptionsBuilder::default()
    }

    /// Checks options that were assembled without the builder.
    pub fn validate(&self) -> Result<(), WidgetOptionsError> {
        validate(self)
    }
}

/// Builder for [`WidgetOptions`].
#[derive(Debug, Clone, Default)]
pub struct WidgetOptionsBuilder {
    inner: WidgetOptions,
}

impl WidgetOptionsBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut WidgetOptions)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn storage_key<S: Into<String>>(self, key: S) -> Self { self.map(|o| o.storage_key = key.into()) }
    pub fn host<S: Into<String>>(self, host: S) -> Self { self.map(|o| o.host = host.into()) }
    pub fn presentation_delay(self, delay: Duration) -> Self { self.map(|o| o.presentation_delay = delay) }
    pub fn settings_trigger<S: Into<String>>(self, marker: S) -> Self { self.map(|o| o.settings_trigger = marker.into()) }

    /// Takes the host from the page URL. URLs without a host (`file:`, `data:`) leave it unchanged.
    pub fn page_url(self, url: &Url) -> Self {
        match url.host_str() {
            Some(host) => {
                let host = host.to_string();
                self.map(|o| o.host = host)
            }
            None => self,
        }
    }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut WidgetOptions)) -> Self { self.map(f) }

    /// Validate and build the final options.
    pub fn build(self) -> Result<WidgetOptions, WidgetOptionsError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOptionsError {
    EmptyStorageKey,
    InvalidStorageKey(String),
    EmptyHost,
    EmptySettingsTrigger,
}

impl fmt::Display for WidgetOptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetOptionsError::EmptyStorageKey =>
                write!(f, "storage_key must not be empty"),
            WidgetOptionsError::InvalidStorageKey(key) =>
                write!(f, "storage_key {key:?} is not a valid cookie name"),
            WidgetOptionsError::EmptyHost =>
                write!(f, "host must not be empty"),
            WidgetOptionsError::EmptySettingsTrigger =>
                write!(f, "settings_trigger must not be empty"),
        }
    }
}
impl std::error::Error for WidgetOptionsError {}

fn validate(o: &WidgetOptions) -> Result<(), WidgetOptionsError> {
    if o.storage_key.is_empty() {
        return Err(WidgetOptionsError::EmptyStorageKey);
    }
    if o.storage_key.chars().any(|c| c.is_whitespace() || c.is_control() || matches!(c, '=' | ';' | ',')) {
        return Err(WidgetOptionsError::InvalidStorageKey(o.storage_key.clone()));
    }
    if o.host.trim().is_empty() {
        return Err(WidgetOptionsError::EmptyHost);
    }
    if o.settings_trigger.is_empty() {
        return Err(WidgetOptionsError::EmptySettingsTrigger);
    }
    Ok(())
}
