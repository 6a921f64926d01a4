//! File-backed viewer settings.
//!
//! [`ViewerSettings`] is the serializable half of a [`ViewerConfig`]: layout,
//! counts, timing, the empty state, and an `[assets]` table feeding the
//! image registry. Callbacks, mappers and renderers stay in code.
//!
//! ```
//! use carrel::settings::ViewerSettings;
//! use carrel::view::LayoutMode;
//!
//! let settings = ViewerSettings::from_toml_str(r#"
//!     category = "course"
//!     layout = "horizontal-scroll"
//!     auto-scroll = true
//!     max-display-count = 16
//!
//!     [assets]
//!     calculus = "/img/calculus.webp"
//! "#).unwrap();
//!
//! assert_eq!(settings.layout, LayoutMode::HorizontalScroll);
//! assert_eq!(settings.initial_display_count, 6);
//! assert_eq!(settings.asset_registry().len(), 1);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use carrel_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::delegate::{AssetRegistry, Category};
use crate::error::{Result, ViewerError};
use crate::view::{EmptyState, LayoutMode, ViewerConfig};

/// Serializable viewer settings, keyed in kebab-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ViewerSettings {
    pub category: Category,
    pub layout: LayoutMode,
    pub initial_display_count: usize,
    pub max_display_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_more_increment: Option<usize>,
    pub auto_scroll: bool,
    pub auto_scroll_interval_ms: u64,
    pub reset_timeout_ms: u64,
    pub show_view_all_button: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skeleton_count: Option<usize>,
    pub empty_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
    /// Asset identifier to concrete image source.
    pub assets: BTreeMap<String, String>,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        let config = ViewerConfig::default();
        Self {
            category: config.category,
            layout: config.layout,
            initial_display_count: config.initial_display_count,
            max_display_count: config.max_display_count,
            load_more_increment: None,
            auto_scroll: config.auto_scroll,
            auto_scroll_interval_ms: duration_ms(config.auto_scroll_interval),
            reset_timeout_ms: duration_ms(config.reset_timeout),
            show_view_all_button: config.show_view_all,
            skeleton_count: None,
            empty_title: config.empty_state.title,
            empty_message: config.empty_state.message,
            assets: BTreeMap::new(),
        }
    }
}

impl ViewerSettings {
    /// Parses settings from TOML text and validates them.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, "inline settings")
    }

    /// Reads settings from a TOML file and validates them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ViewerError::io(path, e))?;
        let settings = Self::parse(&text, path.display().to_string())?;
        tracing::debug!(target: targets::SETTINGS, path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Writes settings to a TOML file.
    ///
    /// The file is written next to its destination and renamed into place.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ViewerError::io(parent, e))?;
        }
        let staging = path.with_extension("toml.tmp");
        fs::write(&staging, text).map_err(|e| ViewerError::io(&staging, e))?;
        fs::rename(&staging, path).map_err(|e| ViewerError::io(path, e))?;
        tracing::debug!(target: targets::SETTINGS, path = %path.display(), "settings saved");
        Ok(())
    }

    /// Serializes to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ViewerError::Serialize(e.to_string()))
    }

    /// Rejects values no viewer can work with.
    ///
    /// Softer problems (an initial count above the max, a zero increment)
    /// are clamped later by [`ViewerConfig::sanitized`].
    pub fn validate(&self) -> Result<()> {
        if self.max_display_count == 0 {
            return Err(ViewerError::invalid_value("max-display-count", "must be at least 1"));
        }
        if self.auto_scroll_interval_ms == 0 {
            return Err(ViewerError::invalid_value(
                "auto-scroll-interval-ms",
                "must be at least 1",
            ));
        }
        if self.reset_timeout_ms == 0 {
            return Err(ViewerError::invalid_value("reset-timeout-ms", "must be at least 1"));
        }
        Ok(())
    }

    /// Builds a viewer configuration with no callbacks.
    pub fn into_config(self) -> ViewerConfig {
        ViewerConfig {
            category: self.category,
            layout: self.layout,
            initial_display_count: self.initial_display_count,
            max_display_count: self.max_display_count,
            load_more_increment: self.load_more_increment,
            auto_scroll: self.auto_scroll,
            auto_scroll_interval: Duration::from_millis(self.auto_scroll_interval_ms),
            reset_timeout: Duration::from_millis(self.reset_timeout_ms),
            show_view_all: self.show_view_all_button,
            skeleton_count: self.skeleton_count,
            empty_state: EmptyState {
                title: self.empty_title,
                message: self.empty_message,
            },
            ..ViewerConfig::default()
        }
    }

    /// Builds an image registry from the `[assets]` table.
    pub fn asset_registry(&self) -> AssetRegistry {
        self.assets
            .iter()
            .map(|(id, source)| (id.clone(), source.clone()))
            .collect()
    }

    fn parse(text: &str, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let settings: Self = toml::from_str(text).map_err(|e| ViewerError::parse(origin, e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let settings = ViewerSettings::from_toml_str("").unwrap();
        assert_eq!(settings, ViewerSettings::default());
        assert_eq!(settings.auto_scroll_interval_ms, 3000);
        assert_eq!(settings.reset_timeout_ms, 5000);
        assert!(settings.show_view_all_button);
    }

    #[test]
    fn test_into_config() {
        let settings = ViewerSettings::from_toml_str(
            r#"
            category = "instructor"
            layout = "vertical-scroll"
            initial-display-count = 4
            load-more-increment = 2
            auto-scroll-interval-ms = 2500
            empty-title = "No instructors yet"
            "#,
        )
        .unwrap();
        let config = settings.into_config();

        assert_eq!(config.category, Category::Instructor);
        assert_eq!(config.layout, LayoutMode::VerticalScroll);
        assert_eq!(config.initial_display_count, 4);
        assert_eq!(config.load_more_increment(), 2);
        assert_eq!(config.auto_scroll_interval, Duration::from_millis(2500));
        assert_eq!(config.empty_state.title, "No instructors yet");
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let settings = ViewerSettings::from_toml_str(r#"category = "faculty""#).unwrap();
        assert_eq!(settings.category, Category::Default);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ViewerSettings::from_toml_str("max-display-count = 0").unwrap_err();
        assert!(matches!(err, ViewerError::InvalidValue { ref field, .. } if field == "max-display-count"));

        let err = ViewerSettings::from_toml_str("reset-timeout-ms = 0").unwrap_err();
        assert!(matches!(err, ViewerError::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = ViewerSettings::from_toml_str("layout = ").unwrap_err();
        assert!(matches!(err, ViewerError::Parse { .. }));

        let err = ViewerSettings::from_toml_str(r#"layout = "carousel""#).unwrap_err();
        assert!(matches!(err, ViewerError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ViewerSettings::load("/nonexistent/carrel/viewer.toml").unwrap_err();
        assert!(matches!(err, ViewerError::Io { .. }));
    }
}
