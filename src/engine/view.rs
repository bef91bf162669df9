//! Presentation boundary.
//!
//! The widget does not build DOM nodes itself. At initialization it hands a
//! single [`WidgetContainer`] to the host's [`MountPoint`]; the container
//! describes both dialogs (texts, block sections, cookie tables, element ids)
//! and the host renders it however it likes. Visibility and toggle changes
//! afterwards are published as [`WidgetEvent`](crate::events::WidgetEvent)s.

use anyhow::Result;

use crate::engine::categories::CategoryId;
use crate::engine::config::{ConsentConfig, CookieTableHeaders, SettingsBlock};
use crate::engine::widget::WidgetId;

/// Element id of the top-level container.
pub const CONTAINER_ELEMENT_ID: &str = "cc--main";

/// Host-provided render target. Receives exactly one container per widget.
pub trait MountPoint: Send {
    /// Name of the mount point, for diagnostics.
    fn name(&self) -> &str;

    /// Attaches the widget container.
    fn attach(&mut self, container: &WidgetContainer) -> Result<()>;

    /// Removes the container attached earlier. Must not fail.
    fn detach(&mut self, container: &WidgetContainer);
}

/// Mount point that renders nothing.
#[derive(Debug, Default)]
pub struct NullMount {
    attached: Option<WidgetId>,
}

impl NullMount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(&self) -> Option<WidgetId> {
        self.attached
    }
}

impl MountPoint for NullMount {
    fn name(&self) -> &str {
        "NullMount"
    }

    fn attach(&mut self, container: &WidgetContainer) -> Result<()> {
        self.attached = Some(container.widget);
        Ok(())
    }

    fn detach(&mut self, _container: &WidgetContainer) {
        self.attached = None;
    }
}

/// Everything a host needs to render the widget.
#[derive(Debug, Clone)]
pub struct WidgetContainer {
    pub widget: WidgetId,
    pub element_id: String,
    pub prompt: PromptView,
    pub settings: SettingsView,
}

#[derive(Debug, Clone)]
pub struct PromptView {
    pub title: String,
    pub description: String,
    pub accept_label: String,
    pub reject_label: String,
    pub settings_label: String,
    /// Marker carried by the "settings" button, shared with external triggers
    pub settings_trigger: String,
}

#[derive(Debug, Clone)]
pub struct SettingsView {
    pub title: String,
    pub accept_label: String,
    pub reject_label: String,
    pub save_label: String,
    pub close_label: String,
    pub blocks: Vec<BlockView>,
}

#[derive(Debug, Clone)]
pub struct BlockView {
    pub title: String,
    pub description: String,
    pub toggle: Option<ToggleView>,
    pub table: Option<CookieTableView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleView {
    pub category: CategoryId,
    /// Element id of the collapsible detail panel
    pub panel_id: String,
    pub readonly: bool,
    pub initially_checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieTableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CookieTableView {
    /// One column per header, in header order. Missing cells render empty.
    pub fn build(headers: &CookieTableHeaders, block: &SettingsBlock) -> Self {
        let rows = block
            .cookie_table
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|(key, _)| row.get(key).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self {
            headers: headers.labels(),
            rows,
        }
    }
}

impl WidgetContainer {
    pub fn build(widget: WidgetId, config: &ConsentConfig, settings_trigger: &str) -> Self {
        let consent = &config.consent;
        let settings = &config.settings;

        let blocks = settings
            .blocks
            .iter()
            .enumerate()
            .map(|(index, block)| {
                // Only category blocks carry a toggle and a cookie table
                let toggle = block.toggle.as_ref().map(|t| ToggleView {
                    category: CategoryId::new(t.value.clone()),
                    panel_id: format!("c-ac-{index}"),
                    readonly: t.readonly,
                    initially_checked: t.enabled,
                });
                let table = toggle
                    .as_ref()
                    .map(|_| CookieTableView::build(&settings.cookie_table_headers, block));

                BlockView {
                    title: block.title.clone(),
                    description: block.description.clone(),
                    toggle,
                    table,
                }
            })
            .collect();

        Self {
            widget,
            element_id: CONTAINER_ELEMENT_ID.to_string(),
            prompt: PromptView {
                title: consent.title.clone(),
                description: consent.description.clone(),
                accept_label: consent.primary_button.clone(),
                reject_label: consent.secondary_button.clone(),
                settings_label: consent.settings_button.clone(),
                settings_trigger: settings_trigger.to_string(),
            },
            settings: SettingsView {
                title: settings.title.clone(),
                accept_label: settings.primary_button.clone(),
                reject_label: settings.secondary_button.clone(),
                save_label: settings.save_button.clone(),
                close_label: settings.close_button.clone(),
                blocks,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{CookieRow, SettingsText, ToggleBlock};

    fn headers() -> CookieTableHeaders {
        CookieTableHeaders(vec![
            ("name".into(), "Name".into()),
            ("provider".into(), "Provider".into()),
            ("retention".into(), "Retention".into()),
        ])
    }

    fn row(pairs: &[(&str, &str)]) -> CookieRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn table_cells_follow_header_order_and_default_to_empty() {
        let block = SettingsBlock {
            cookie_table: vec![
                row(&[("retention", "Session"), ("name", "consent"), ("provider", "Acme")]),
                row(&[("name", "_ga"), ("unknown", "ignored")]),
            ],
            ..Default::default()
        };

        let table = CookieTableView::build(&headers(), &block);
        assert_eq!(table.headers, vec!["Name", "Provider", "Retention"]);
        assert_eq!(table.rows[0], vec!["consent", "Acme", "Session"]);
        assert_eq!(table.rows[1], vec!["_ga", "", ""]);
    }

    #[test]
    fn container_describes_both_dialogs() {
        let config = ConsentConfig {
            settings: SettingsText {
                cookie_table_headers: headers(),
                blocks: vec![
                    SettingsBlock { title: "Intro".into(), ..Default::default() },
                    SettingsBlock {
                        title: "Analytics".into(),
                        toggle: Some(ToggleBlock { value: "analytics".into(), enabled: false, readonly: false }),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
            ..Default::default()
        };

        let container = WidgetContainer::build(WidgetId::new(), &config, "c-settings");
        assert_eq!(container.element_id, "cc--main");
        assert_eq!(container.prompt.settings_trigger, "c-settings");

        let blocks = &container.settings.blocks;
        assert!(blocks[0].toggle.is_none() && blocks[0].table.is_none());

        let toggle = blocks[1].toggle.as_ref().unwrap();
        assert_eq!(toggle.panel_id, "c-ac-1");
        assert!(!toggle.initially_checked);

        // a category without cookie rows still gets a header-only table
        let table = blocks[1].table.as_ref().unwrap();
        assert_eq!(table.headers.len(), 3);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn null_mount_tracks_attachment() {
        let container = WidgetContainer::build(WidgetId::new(), &ConsentConfig::default(), "c-settings");
        let mut mount = NullMount::new();

        mount.attach(&container).unwrap();
        assert_eq!(mount.attached(), Some(container.widget));
        mount.detach(&container);
        assert!(mount.attached().is_none());
    }
}
