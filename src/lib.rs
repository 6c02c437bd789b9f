//! # Wind Rose Card Core Library
//!
//! This library holds the parts of the wind rose dashboard card that have real
//! invariants: validating the card configuration against a live state snapshot,
//! computing the layout of the four corner readouts, and redrawing those
//! readouts on every state tick without leaking drawn elements.
//!
//! ## Data Flow
//! 1. **Validate**: [`entity_checker::check_entities`] gates the configuration
//!    against a [`state::StateSnapshot`] and resolves `auto` speed units
//! 2. **Layout**: [`dimensions::DimensionCalculator`] turns a
//!    [`config::DimensionConfig`] into anchor coordinates, once
//! 3. **Draw**: [`corner_renderer::CornerInfoRenderer`] draws labels once and
//!    values on the first tick
//! 4. **Redraw**: every following tick tears the four value elements down and
//!    draws them again from freshly resolved [`state::EntityState`] values
//!
//! ## Core Types
//! - [`Coordinate`]: a point in drawing-surface space
//! - [`Corner`]: one of the four fixed readout positions
//! - [`Corners`]: a four-slot map addressed by [`Corner`], never by index

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

// Module declarations
pub mod config;
pub mod corner_renderer;
pub mod dimensions;
pub mod entity_checker;
pub mod graphics_surface;
pub mod state;
pub mod state_source;
pub mod surface;

#[cfg(test)]
mod tests;

/// A position on the drawing surface.
///
/// Coordinates are computed once from the layout configuration and never
/// change for the lifetime of a renderer.
///
/// # Example
/// ```
/// use windrose_card_lib::Coordinate;
///
/// let anchor = Coordinate::new(10.0, 20.0);
/// assert_eq!(anchor.x, 10.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One of the four fixed readout positions around the wind rose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// All corners in check and draw order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    pub fn name(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value for each of the four corners.
///
/// Serialises as a table keyed `top_left`, `top_right`, `bottom_left` and
/// `bottom_right`, which is how corners appear in the TOML configuration.
///
/// # Example
/// ```
/// use windrose_card_lib::{Corner, Corners};
///
/// let labels = Corners::from_fn(|corner| corner.name().len());
/// assert_eq!(labels[Corner::TopLeft], 8);
/// assert_eq!(labels[Corner::BottomRight], 12);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Corners<T> {
    pub top_left: T,
    pub top_right: T,
    pub bottom_left: T,
    pub bottom_right: T,
}

impl<T> Corners<T> {
    pub fn from_fn(mut f: impl FnMut(Corner) -> T) -> Self {
        Self {
            top_left: f(Corner::TopLeft),
            top_right: f(Corner::TopRight),
            bottom_left: f(Corner::BottomLeft),
            bottom_right: f(Corner::BottomRight),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Corner, &T) -> U) -> Corners<U> {
        Corners::from_fn(|corner| f(corner, &self[corner]))
    }

    /// Iterate in [`Corner::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Corner, &T)> {
        Corner::ALL.into_iter().map(move |corner| (corner, &self[corner]))
    }
}

impl<T> Index<Corner> for Corners<T> {
    type Output = T;

    fn index(&self, corner: Corner) -> &T {
        match corner {
            Corner::TopLeft => &self.top_left,
            Corner::TopRight => &self.top_right,
            Corner::BottomLeft => &self.bottom_left,
            Corner::BottomRight => &self.bottom_right,
        }
    }
}

impl<T> IndexMut<Corner> for Corners<T> {
    fn index_mut(&mut self, corner: Corner) -> &mut T {
        match corner {
            Corner::TopLeft => &mut self.top_left,
            Corner::TopRight => &mut self.top_right,
            Corner::BottomLeft => &mut self.bottom_left,
            Corner::BottomRight => &mut self.bottom_right,
        }
    }
}
