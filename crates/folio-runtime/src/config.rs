#![forbid(unsafe_code)]

//! Configuration-as-data for the desk.
//!
//! [`FolioConfig`] gathers every tunable in one document that can be loaded
//! from TOML (feature `toml-config`) or JSON:
//!
//! ```toml
//! [breakpoints]
//! tablet = 768
//! desktop = 1024
//! large = 1440
//!
//! [layout]
//! storage_key = "portfolioPanels"
//! placement = { strategy = "cascade", step = 30, max_attempts = 10 }
//!
//! [drag]
//! grid_snap = true
//!
//! [palette]
//! mouse_window_ms = 1500
//! ```
//!
//! Every field defaults to the constant the site ships with, so
//! `FolioConfig::default()` reproduces the stock behaviour and a partial
//! document only overrides what it names.

use std::path::Path;

use folio_core::motion::{DEFAULT_MOMENTUM_DECAY, DEFAULT_VELOCITY_WINDOW_MS};
use folio_layout::{Breakpoints, LayoutEngine, Placement, STORAGE_KEY};
use folio_widgets::command_palette::{
    CommandPalette, CommandRegistry, DEFAULT_MOUSE_WINDOW, LinkConfig, MatchPolicy,
};
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Grid pitch used when snapping is enabled.
pub const DEFAULT_GRID_PITCH: f64 = 20.0;

/// Errors from loading a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "toml-config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub breakpoints: Breakpoints,
    pub layout: LayoutConfig,
    pub drag: DragConfig,
    pub palette: PaletteConfig,
    pub links: LinkConfig,
}

/// Where layouts are stored and how reopened panels are placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub storage_key: String,
    pub placement: Placement,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_owned(),
            placement: Placement::FixedSlot,
        }
    }
}

/// Drag release behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Round committed positions to the grid.
    pub grid_snap: bool,
    pub grid_pitch: f64,
    /// Carry release velocity into the committed position.
    pub momentum: bool,
    pub momentum_decay: f64,
    /// Trailing window used to estimate release velocity.
    pub velocity_window_ms: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            grid_snap: false,
            grid_pitch: DEFAULT_GRID_PITCH,
            momentum: false,
            momentum_decay: DEFAULT_MOMENTUM_DECAY,
            velocity_window_ms: DEFAULT_VELOCITY_WINDOW_MS,
        }
    }
}

/// Command palette tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Minimum fuzzy score for a suggestion that is neither a key prefix
    /// nor a label substring.
    pub threshold: u32,
    pub max_suggestions: usize,
    /// How long mouse movement keeps hover in control of the cursor.
    pub mouse_window_ms: u64,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let policy = MatchPolicy::default();
        Self {
            threshold: policy.threshold,
            max_suggestions: policy.max_suggestions,
            mouse_window_ms: DEFAULT_MOUSE_WINDOW.as_millis() as u64,
        }
    }
}

impl PaletteConfig {
    #[must_use]
    pub const fn policy(&self) -> MatchPolicy {
        MatchPolicy {
            threshold: self.threshold,
            max_suggestions: self.max_suggestions,
        }
    }

    #[must_use]
    pub const fn mouse_window(&self) -> Duration {
        Duration::from_millis(self.mouse_window_ms)
    }
}

impl FolioConfig {
    /// Load from a TOML string.
    #[cfg(feature = "toml-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "toml-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every parameter. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.breakpoints.is_ordered() {
            errors.push(format!(
                "breakpoints must be positive and increasing (got tablet={}, desktop={}, large={})",
                self.breakpoints.tablet, self.breakpoints.desktop, self.breakpoints.large
            ));
        }

        if self.layout.storage_key.trim().is_empty() {
            errors.push("layout.storage_key must not be empty".into());
        }
        if let Placement::Cascade { step, max_attempts } = self.layout.placement {
            if !(step.is_finite() && step > 0.0) {
                errors.push(format!("layout.placement.step must be > 0 (got {step})"));
            }
            if max_attempts == 0 {
                errors.push("layout.placement.max_attempts must be >= 1".into());
            }
        }

        let drag = &self.drag;
        if !(drag.grid_pitch.is_finite() && drag.grid_pitch > 0.0) {
            errors.push(format!("drag.grid_pitch must be > 0 (got {})", drag.grid_pitch));
        }
        if !(0.0..=1.0).contains(&drag.momentum_decay) {
            errors.push(format!(
                "drag.momentum_decay must be in [0, 1] (got {})",
                drag.momentum_decay
            ));
        }
        if !(drag.velocity_window_ms.is_finite() && drag.velocity_window_ms > 0.0) {
            errors.push(format!(
                "drag.velocity_window_ms must be > 0 (got {})",
                drag.velocity_window_ms
            ));
        }

        if self.palette.max_suggestions == 0 {
            errors.push("palette.max_suggestions must be >= 1".into());
        }

        errors
    }

    /// [`validate`](Self::validate) as a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Layout engine built from the breakpoint and placement sections.
    #[must_use]
    pub fn layout_engine(&self) -> LayoutEngine {
        LayoutEngine::new(self.breakpoints).with_placement(self.layout.placement)
    }

    /// Palette built from the palette and link sections.
    #[must_use]
    pub fn command_palette(&self) -> CommandPalette {
        CommandPalette::new(CommandRegistry::new(&self.links))
            .with_policy(self.palette.policy())
            .with_mouse_window(self.palette.mouse_window())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_match_constants() {
        let config = FolioConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.layout.storage_key, "portfolioPanels");
        assert_eq!(config.drag.grid_pitch, 20.0);
        assert_eq!(config.drag.momentum_decay, 0.95);
        assert_eq!(config.palette.threshold, 120);
        assert_eq!(config.palette.max_suggestions, 8);
        assert_eq!(config.palette.mouse_window_ms, 1500);
        assert_eq!(config.breakpoints.tablet, 768.0);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = FolioConfig::from_json_str(r#"{"drag":{"grid_snap":true}}"#).unwrap();
        assert!(config.drag.grid_snap);
        assert_eq!(config.drag.grid_pitch, 20.0);
        assert_eq!(config.palette, PaletteConfig::default());
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(FolioConfig::from_json_str("{}").unwrap(), FolioConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            FolioConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn toml_selects_cascade_placement() {
        let config = FolioConfig::from_toml_str(
            r#"
            [layout]
            placement = { strategy = "cascade", step = 30.0, max_attempts = 10 }
            "#,
        )
        .unwrap();
        assert_eq!(
            config.layout.placement,
            Placement::Cascade {
                step: 30.0,
                max_attempts: 10
            }
        );
        assert_eq!(config.layout_engine().placement(), config.layout.placement);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn toml_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[palette]\nmouse_window_ms = 500\n").unwrap();
        let config = FolioConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.palette.mouse_window(), Duration::from_millis(500));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FolioConfig::from_json_file("/nonexistent/folio.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn validation_reports_each_problem() {
        let mut config = FolioConfig::default();
        config.breakpoints.desktop = 100.0;
        config.layout.storage_key = "  ".into();
        config.layout.placement = Placement::Cascade {
            step: 0.0,
            max_attempts: 0,
        };
        config.drag.grid_pitch = -1.0;
        config.drag.momentum_decay = 1.5;
        config.palette.max_suggestions = 0;
        let errors = config.validate();
        assert_eq!(errors.len(), 7, "{errors:?}");
        assert!(matches!(
            config.validated(),
            Err(ConfigError::Validation(list)) if list.len() == 7
        ));
    }

    #[test]
    fn palette_uses_configured_policy() {
        let mut config = FolioConfig::default();
        config.palette.max_suggestions = 2;
        let mut palette = config.command_palette();
        palette.open();
        palette.set_query("e");
        assert!(palette.visible_len() <= 2);
    }
}
