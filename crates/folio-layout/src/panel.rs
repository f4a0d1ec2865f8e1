#![forbid(unsafe_code)]

//! Panel catalogue and per-panel state.
//!
//! The set of panels is closed: [`PanelKey`] enumerates them and every
//! per-kind attribute (titles, icon, dimensions) lives in one static
//! [`PanelSpec`] table indexed by the key. Adding a panel means adding a
//! variant and a table row; the compiler finds every other site.
//!
//! # Invariants
//!
//! 1. `PanelKey::ALL[k.index()] == k` for every key.
//! 2. [`PanelKey::as_str`] and [`PanelKey::from_str`] round-trip.
//! 3. A [`PanelTable`] always holds exactly one value per key.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use folio_core::{Point, Size};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Errors raised by panel lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    /// A string did not name any panel.
    #[error("unknown panel key {key:?}")]
    UnknownPanelKey { key: String },
}

/// Identifier of one of the desk's panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKey {
    About,
    Projects,
    Experience,
    Message,
    Stack,
    Achievements,
}

impl PanelKey {
    /// Every key, in catalogue order.
    pub const ALL: [PanelKey; 6] = [
        Self::About,
        Self::Projects,
        Self::Experience,
        Self::Message,
        Self::Stack,
        Self::Achievements,
    ];

    /// Number of panels.
    pub const COUNT: usize = Self::ALL.len();

    /// Stable lowercase id used in storage and commands.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Projects => "projects",
            Self::Experience => "experience",
            Self::Message => "message",
            Self::Stack => "stack",
            Self::Achievements => "achievements",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Static attributes of this panel.
    #[must_use]
    pub fn spec(self) -> &'static PanelSpec {
        &PANEL_SPECS[self.index()]
    }

    /// Fixed panel size.
    #[must_use]
    pub fn dimensions(self) -> Size {
        self.spec().dimensions
    }
}

impl fmt::Display for PanelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelKey {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| PanelError::UnknownPanelKey { key: s.to_owned() })
    }
}

/// Static per-kind panel attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSpec {
    pub key: PanelKey,
    /// Header title on the free-form canvas.
    pub title: &'static str,
    /// Header title in the stacked mobile column.
    pub mobile_title: &'static str,
    /// Icon name understood by the host's icon set.
    pub icon: &'static str,
    /// Tooltip label in the dock.
    pub dock_label: &'static str,
    pub dimensions: Size,
}

static PANEL_SPECS: [PanelSpec; PanelKey::COUNT] = [
    PanelSpec {
        key: PanelKey::About,
        title: "About Me",
        mobile_title: "About Me",
        icon: "user",
        dock_label: "About",
        dimensions: Size::new(450.0, 300.0),
    },
    PanelSpec {
        key: PanelKey::Projects,
        title: "Projects",
        mobile_title: "Projects",
        icon: "briefcase",
        dock_label: "Projects",
        dimensions: Size::new(500.0, 600.0),
    },
    PanelSpec {
        key: PanelKey::Experience,
        title: "Experience",
        mobile_title: "Experience & Education",
        icon: "history",
        dock_label: "Experience",
        dimensions: Size::new(470.0, 550.0),
    },
    PanelSpec {
        key: PanelKey::Message,
        title: "Leave a Message",
        mobile_title: "Message Constellation",
        icon: "file-text",
        dock_label: "Message Constellation",
        dimensions: Size::new(800.0, 500.0),
    },
    PanelSpec {
        key: PanelKey::Stack,
        title: "Tech Stack",
        mobile_title: "Tech Stack",
        icon: "layers",
        dock_label: "Tech Stack",
        dimensions: Size::new(450.0, 270.0),
    },
    PanelSpec {
        key: PanelKey::Achievements,
        title: "Achievements",
        mobile_title: "Achievements",
        icon: "award",
        dock_label: "Achievements",
        dimensions: Size::new(450.0, 300.0),
    },
];

/// Dock button order.
pub const DOCK_ORDER: [PanelKey; PanelKey::COUNT] = [
    PanelKey::About,
    PanelKey::Projects,
    PanelKey::Experience,
    PanelKey::Message,
    PanelKey::Achievements,
    PanelKey::Stack,
];

/// Top-to-bottom order of the stacked mobile column.
pub const MOBILE_ORDER: [PanelKey; PanelKey::COUNT] = [
    PanelKey::About,
    PanelKey::Stack,
    PanelKey::Achievements,
    PanelKey::Experience,
    PanelKey::Projects,
    PanelKey::Message,
];

/// Mutable state of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelState {
    #[serde(default)]
    pub active: bool,
    pub position: Point,
    #[serde(default)]
    pub minimized: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default = "default_z_index")]
    pub z_index: u32,
}

fn default_z_index() -> u32 {
    1
}

impl PanelState {
    /// A closed, unpinned panel at `position` with the base z-index.
    #[must_use]
    pub const fn closed_at(position: Point) -> Self {
        Self {
            active: false,
            position,
            minimized: false,
            pinned: false,
            z_index: 1,
        }
    }

    /// Whether a drag session may start on this panel.
    #[must_use]
    pub const fn is_draggable(&self) -> bool {
        self.active && !self.pinned
    }
}

/// One value per [`PanelKey`], stored densely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelTable<T> {
    slots: [T; PanelKey::COUNT],
}

impl<T> PanelTable<T> {
    /// Build a table from values ordered as [`PanelKey::ALL`].
    pub const fn from_slots(slots: [T; PanelKey::COUNT]) -> Self {
        Self { slots }
    }

    /// Build a table by evaluating `f` for every key in catalogue order.
    pub fn from_fn(mut f: impl FnMut(PanelKey) -> T) -> Self {
        Self {
            slots: PanelKey::ALL.map(&mut f),
        }
    }

    /// Iterate `(key, value)` pairs in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (PanelKey, &T)> {
        PanelKey::ALL.into_iter().zip(self.slots.iter())
    }

    /// Iterate `(key, value)` pairs mutably in catalogue order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PanelKey, &mut T)> {
        PanelKey::ALL.into_iter().zip(self.slots.iter_mut())
    }

    /// Iterate values in catalogue order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    #[must_use]
    pub fn map<U>(&self, mut f: impl FnMut(PanelKey, &T) -> U) -> PanelTable<U> {
        PanelTable::from_fn(|key| f(key, &self.slots[key.index()]))
    }
}

impl<T: Default> Default for PanelTable<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<PanelKey> for PanelTable<T> {
    type Output = T;

    fn index(&self, key: PanelKey) -> &T {
        &self.slots[key.index()]
    }
}

impl<T> IndexMut<PanelKey> for PanelTable<T> {
    fn index_mut(&mut self, key: PanelKey) -> &mut T {
        &mut self.slots[key.index()]
    }
}

impl<T: Serialize> Serialize for PanelTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PanelKey::COUNT))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_strings() {
        for key in PanelKey::ALL {
            assert_eq!(key.as_str().parse::<PanelKey>(), Ok(key));
            assert_eq!(PanelKey::ALL[key.index()], key);
        }
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = "sidebar".parse::<PanelKey>().unwrap_err();
        assert_eq!(
            err,
            PanelError::UnknownPanelKey {
                key: "sidebar".into()
            }
        );
        assert_eq!(err.to_string(), r#"unknown panel key "sidebar""#);
    }

    #[test]
    fn key_parsing_is_case_sensitive() {
        assert!("About".parse::<PanelKey>().is_err());
    }

    #[test]
    fn spec_table_is_indexed_by_key() {
        for key in PanelKey::ALL {
            assert_eq!(key.spec().key, key);
        }
        assert_eq!(PanelKey::About.dimensions(), Size::new(450.0, 300.0));
        assert_eq!(PanelKey::Message.dimensions(), Size::new(800.0, 500.0));
    }

    #[test]
    fn orders_cover_every_panel() {
        for order in [DOCK_ORDER, MOBILE_ORDER] {
            let mut seen = order;
            seen.sort();
            assert_eq!(seen, PanelKey::ALL);
        }
    }

    #[test]
    fn panel_state_uses_camel_case_z_index() {
        let state = PanelState {
            z_index: 4,
            ..PanelState::closed_at(Point::new(10.0, 20.0))
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["zIndex"], 4);
        assert_eq!(json["position"]["x"], 10.0);
    }

    #[test]
    fn panel_state_fills_missing_flags() {
        let state: PanelState =
            serde_json::from_str(r#"{"active":true,"position":{"x":1,"y":2}}"#).unwrap();
        assert!(state.active);
        assert!(!state.pinned);
        assert_eq!(state.z_index, 1);
    }

    #[test]
    fn pinned_or_closed_panels_are_not_draggable() {
        let mut state = PanelState::closed_at(Point::ORIGIN);
        assert!(!state.is_draggable());
        state.active = true;
        assert!(state.is_draggable());
        state.pinned = true;
        assert!(!state.is_draggable());
    }

    #[test]
    fn table_serializes_as_keyed_map() {
        let table = PanelTable::from_fn(|key| key.index());
        let json = serde_json::to_value(table).unwrap();
        assert_eq!(json["about"], 0);
        assert_eq!(json["achievements"], 5);
    }
}
