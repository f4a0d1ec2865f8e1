#![forbid(unsafe_code)]

//! Core: geometry, canonical input events, and motion helpers.
//!
//! # Role in Folio
//! `folio-core` is the bottom of the stack. It owns the coordinate types that
//! every panel position is expressed in, the clamp that keeps panels inside
//! the canvas, and the normalized key/pointer events that the host forwards
//! from the browser.
//!
//! # Primary responsibilities
//! - **Geometry**: [`geometry::Point`], [`geometry::Size`], [`geometry::Rect`]
//!   and [`geometry::clamp_position`].
//! - **Events**: keys with bitflag modifiers, pointer buttons and samples.
//! - **Motion**: release velocity tracking and inertial projection.
//!
//! # How it fits in the system
//! `folio-layout` builds the panel model on these primitives; `folio-web`
//! feeds pointer samples through [`motion`] when a drag ends.

pub mod event;
pub mod geometry;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod motion;

pub use geometry::{Point, Rect, Size, clamp_position, snap_to_grid};
