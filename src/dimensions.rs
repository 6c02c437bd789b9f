//! # Corner Layout
//!
//! Derives the anchor points of the corner readouts from a
//! [`DimensionConfig`]. All queries are pure: the same configuration always
//! yields the same coordinates, bit for bit, so a renderer can compute its
//! anchors once and keep them for its whole lifetime.
//!
//! ## Layout
//! Each corner has a label line and a value. Top corners hang their text
//! below the anchor, bottom corners sit their text on it. At the top the
//! label anchors on the top margin and the value one label line lower; at
//! the bottom the label anchors on the bottom margin and the value one label
//! line higher:
//!
//! ```text
//!  margin.top ─ LABEL                         LABEL
//!               value                         value
//!
//!
//!               value                         value
//!               LABEL                         LABEL
//!  margin.bottom ─────────────────────────────────
//! ```
//!
//! Left corners anchor on `margin.left`, right corners on
//! `width - margin.right`.
//!
//! ## Queries
//! - [`DimensionCalculator::corner_value`] / [`DimensionCalculator::corner_label`]
//!   take a [`Corner`]
//! - the eight `info_corner_*` methods name one corner and one anchor each
//!
//! There are no error cases. A nonsensical layout (negative sizes, margins
//! wider than the card) yields nonsensical but finite coordinates; rejecting
//! it is up to whoever loads the configuration.

use crate::config::DimensionConfig;
use crate::{Coordinate, Corner};

/// Computes corner anchors from a layout configuration.
///
/// # Example
/// ```
/// use windrose_card_lib::config::DimensionConfig;
/// use windrose_card_lib::dimensions::DimensionCalculator;
/// use windrose_card_lib::{Coordinate, Corner};
///
/// let calc = DimensionCalculator::new(DimensionConfig::default());
/// assert_eq!(calc.corner_label(Corner::TopLeft), Coordinate::new(5.0, 5.0));
/// assert_eq!(calc.corner_label(Corner::BottomRight), Coordinate::new(395.0, 395.0));
/// ```
#[derive(Clone, Debug)]
pub struct DimensionCalculator {
    config: DimensionConfig,
}

impl DimensionCalculator {
    pub fn new(config: DimensionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DimensionConfig {
        &self.config
    }

    fn left_x(&self) -> f64 {
        self.config.margin.left
    }

    fn right_x(&self) -> f64 {
        self.config.width - self.config.margin.right
    }

    fn top_y(&self) -> f64 {
        self.config.margin.top
    }

    /// Baseline of the bottom label line.
    fn bottom_y(&self) -> f64 {
        self.config.height - self.config.margin.bottom
    }

    fn label_line(&self) -> f64 {
        self.config.corner_label_font_size
    }

    fn x_for(&self, corner: Corner) -> f64 {
        if corner.is_left() {
            self.left_x()
        } else {
            self.right_x()
        }
    }

    /// Anchor of a corner's value text, one label line inside the label.
    pub fn corner_value(&self, corner: Corner) -> Coordinate {
        let y = if corner.is_top() {
            self.top_y() + self.label_line()
        } else {
            self.bottom_y() - self.label_line()
        };
        Coordinate::new(self.x_for(corner), y)
    }

    /// Anchor of a corner's label text, on the top or bottom margin.
    pub fn corner_label(&self, corner: Corner) -> Coordinate {
        let y = if corner.is_top() {
            self.top_y()
        } else {
            self.bottom_y()
        };
        Coordinate::new(self.x_for(corner), y)
    }

    pub fn info_corner_left_top(&self) -> Coordinate {
        self.corner_value(Corner::TopLeft)
    }

    pub fn info_corner_right_top(&self) -> Coordinate {
        self.corner_value(Corner::TopRight)
    }

    pub fn info_corner_left_bottom(&self) -> Coordinate {
        self.corner_value(Corner::BottomLeft)
    }

    pub fn info_corner_right_bottom(&self) -> Coordinate {
        self.corner_value(Corner::BottomRight)
    }

    pub fn info_corner_label_left_top(&self) -> Coordinate {
        self.corner_label(Corner::TopLeft)
    }

    pub fn info_corner_label_right_top(&self) -> Coordinate {
        self.corner_label(Corner::TopRight)
    }

    pub fn info_corner_label_left_bottom(&self) -> Coordinate {
        self.corner_label(Corner::BottomLeft)
    }

    pub fn info_corner_label_right_bottom(&self) -> Coordinate {
        self.corner_label(Corner::BottomRight)
    }
}
