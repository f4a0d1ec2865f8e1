#![forbid(unsafe_code)]

//! Viewport classes and breakpoint-aware values.
//!
//! A [`ViewportClass`] is derived from the canvas width, never stored as
//! user state. [`Responsive<T>`] maps classes to values with inheritance
//! from the next smaller class, so a table only spells out the tiers where
//! behaviour actually changes.
//!
//! ```
//! use folio_layout::{Responsive, ViewportClass};
//!
//! let columns = Responsive::new(1).at(ViewportClass::Desktop, 3);
//! assert_eq!(*columns.resolve(ViewportClass::Tablet), 1);
//! assert_eq!(*columns.resolve(ViewportClass::Large), 3);
//! ```
//!
//! # Invariants
//!
//! 1. `Mobile` always has a value (set via `new()`).
//! 2. A missing tier inherits from the nearest smaller tier with a value.
//! 3. `resolve()` never fails.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse viewport tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
    Large,
}

impl ViewportClass {
    /// All classes, smallest first.
    pub const ALL: [ViewportClass; 4] = [Self::Mobile, Self::Tablet, Self::Desktop, Self::Large];

    /// Whether this class uses the stacked, all-panels-open regime.
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }

    /// Whether moving between `self` and `other` crosses the
    /// mobile/free-form boundary.
    #[must_use]
    pub const fn crosses_regime(self, other: ViewportClass) -> bool {
        self.is_mobile() != other.is_mobile()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for ViewportClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum widths (CSS pixels) at which each non-mobile class begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub tablet: f64,
    pub desktop: f64,
    pub large: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tablet: 768.0,
            desktop: 1024.0,
            large: 1440.0,
        }
    }
}

impl Breakpoints {
    /// Classify a canvas width.
    #[must_use]
    pub fn classify(&self, width: f64) -> ViewportClass {
        if width < self.tablet {
            ViewportClass::Mobile
        } else if width < self.desktop {
            ViewportClass::Tablet
        } else if width < self.large {
            ViewportClass::Desktop
        } else {
            ViewportClass::Large
        }
    }

    /// Whether thresholds are finite, positive and strictly increasing.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        let all = [self.tablet, self.desktop, self.large];
        all.iter().all(|v| v.is_finite() && *v > 0.0)
            && self.tablet < self.desktop
            && self.desktop < self.large
    }
}

/// A class-aware value with inheritance from smaller tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responsive<T> {
    base: T,
    /// Overrides for Tablet, Desktop, Large.
    overrides: [Option<T>; 3],
}

impl<T> Responsive<T> {
    /// Create a value that applies to every class until overridden.
    #[must_use]
    pub const fn new(base: T) -> Self {
        Self {
            base,
            overrides: [None, None, None],
        }
    }

    /// Set the value for `class` and every larger class that has no override.
    #[must_use]
    pub fn at(mut self, class: ViewportClass, value: T) -> Self {
        self.set(class, value);
        self
    }

    pub fn set(&mut self, class: ViewportClass, value: T) {
        match class {
            ViewportClass::Mobile => self.base = value,
            other => self.overrides[other as usize - 1] = Some(value),
        }
    }

    /// Resolve the value for `class`.
    #[must_use]
    pub fn resolve(&self, class: ViewportClass) -> &T {
        let upto = class as usize;
        self.overrides[..upto]
            .iter()
            .rev()
            .find_map(Option::as_ref)
            .unwrap_or(&self.base)
    }
}
