#![forbid(unsafe_code)]

//! Persisted layout snapshot with versioning and legacy migration.
//!
//! A [`LayoutSnapshot`] is the full `{panel → state}` mapping plus the
//! z-order counter and the viewport class it was produced under. It is
//! stored as JSON under [`STORAGE_KEY`].
//!
//! # Schema Versioning Policy
//!
//! - Version 1 is the legacy bare map written by earlier builds of the site:
//!   `{"about": {...}, "projects": {...}}` with no counter and no class.
//!   It is migrated on load.
//! - Version 2 wraps the map with `schemaVersion`, `viewportClass` and
//!   `highestZIndex`.
//! - Versions newer than [`LAYOUT_SCHEMA_VERSION`] are rejected.
//!
//! # Failure Modes
//!
//! Loading never panics. Malformed JSON, a non-object root, an unsupported
//! version, or an object with no recognizable panel all produce a
//! [`SnapshotError`]; callers treat every error as "absent" and fall back to
//! defaults. Missing panels are filled from the supplied defaults. Unknown
//! keys and entries that do not decode as a panel state are dropped one by
//! one; every repair is reported as a warning.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::panel::{PanelKey, PanelState, PanelTable};
use crate::responsive::ViewportClass;

/// Current snapshot schema version.
pub const LAYOUT_SCHEMA_VERSION: u16 = 2;

/// Version assigned to bare legacy maps.
pub const LEGACY_SCHEMA_VERSION: u16 = 1;

/// Storage key the snapshot is persisted under.
pub const STORAGE_KEY: &str = "portfolioPanels";

/// Errors from decoding a stored snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot root must be a JSON object")]
    NotAnObject,
    #[error("unsupported layout schema version {found} (expected at most {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("snapshot contains no recognizable panels")]
    NoPanels,
}

/// Serializable layout state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub schema_version: u16,
    pub viewport_class: ViewportClass,
    pub highest_z_index: u32,
    pub panels: PanelTable<PanelState>,
}

/// Outcome of decoding a stored snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotLoad {
    pub snapshot: LayoutSnapshot,
    /// Version found in storage before migration.
    pub from_version: u16,
    /// Repairs applied while loading.
    pub warnings: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionedSnapshot {
    schema_version: u16,
    #[serde(default)]
    viewport_class: ViewportClass,
    #[serde(default)]
    highest_z_index: u32,
    panels: Map<String, Value>,
}

impl LayoutSnapshot {
    /// Build a current-version snapshot.
    #[must_use]
    pub fn new(
        viewport_class: ViewportClass,
        highest_z_index: u32,
        panels: PanelTable<PanelState>,
    ) -> Self {
        Self {
            schema_version: LAYOUT_SCHEMA_VERSION,
            viewport_class,
            highest_z_index,
            panels,
        }
    }

    /// Largest z-index carried by any panel.
    #[must_use]
    pub fn max_panel_z(&self) -> u32 {
        self.panels.values().map(|p| p.z_index).max().unwrap_or(1)
    }

    /// Keys of the panels currently open.
    pub fn active_keys(&self) -> impl Iterator<Item = PanelKey> + '_ {
        self.panels
            .iter()
            .filter(|(_, state)| state.active)
            .map(|(key, _)| key)
    }

    /// Encode as the persisted JSON document.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored document, migrating legacy maps.
    ///
    /// `defaults` supplies states for panels the document does not mention
    /// and the class for legacy documents that never recorded one.
    pub fn from_json(json: &str, defaults: &LayoutSnapshot) -> Result<SnapshotLoad, SnapshotError> {
        let root: Value = serde_json::from_str(json)?;
        let Value::Object(map) = root else {
            return Err(SnapshotError::NotAnObject);
        };

        let mut warnings = Vec::new();
        let (from_version, class, stored_counter, raw_panels) = if map.contains_key("schemaVersion")
        {
            let versioned: VersionedSnapshot = serde_json::from_value(Value::Object(map))?;
            if versioned.schema_version > LAYOUT_SCHEMA_VERSION {
                return Err(SnapshotError::UnsupportedVersion {
                    found: versioned.schema_version,
                    expected: LAYOUT_SCHEMA_VERSION,
                });
            }
            (
                versioned.schema_version,
                versioned.viewport_class,
                versioned.highest_z_index,
                versioned.panels,
            )
        } else {
            warnings.push(format!(
                "migrated legacy layout (v{LEGACY_SCHEMA_VERSION} -> v{LAYOUT_SCHEMA_VERSION})"
            ));
            (LEGACY_SCHEMA_VERSION, defaults.viewport_class, 0, map)
        };

        let mut panels = defaults.panels;
        let mut recognized = 0usize;
        let mut seen = PanelTable::<bool>::default();
        for (id, raw) in raw_panels {
            let Ok(key) = id.parse::<PanelKey>() else {
                warnings.push(format!("dropped unknown panel {id:?}"));
                continue;
            };
            match serde_json::from_value::<PanelState>(raw) {
                Ok(state) => {
                    panels[key] = PanelState {
                        z_index: state.z_index.max(1),
                        ..state
                    };
                    seen[key] = true;
                    recognized += 1;
                }
                Err(e) => warnings.push(format!("dropped malformed panel {key}: {e}")),
            }
        }
        if recognized == 0 {
            return Err(SnapshotError::NoPanels);
        }
        for (key, present) in seen.iter() {
            if !present {
                warnings.push(format!("filled missing panel {key} from defaults"));
            }
        }

        let mut snapshot = LayoutSnapshot::new(class, stored_counter, panels);
        let floor = snapshot.max_panel_z();
        if snapshot.highest_z_index < floor {
            if from_version != LEGACY_SCHEMA_VERSION {
                warnings.push(format!(
                    "raised z-order counter from {} to {floor}",
                    snapshot.highest_z_index
                ));
            }
            snapshot.highest_z_index = floor;
        }

        Ok(SnapshotLoad {
            snapshot,
            from_version,
            warnings,
        })
    }
}
