//! # Corner Readouts
//!
//! Owns the four corner text elements of the card. Anchor coordinates are
//! computed once at construction; afterwards the renderer only draws labels
//! (once) and values (every tick).
//!
//! ## Lifecycle
//! 1. **Construct**: [`CornerInfoRenderer::new`] computes the four value
//!    anchors through [`DimensionCalculator`] and takes the surface. Nothing
//!    is drawn.
//! 2. **Labels**: [`CornerInfoRenderer::draw_corner_labels`] draws each
//!    non-empty label once. Labels are never removed or redrawn.
//! 3. **First tick**: [`CornerInfoRenderer::draw_corner_values`] draws the
//!    values of shown corners whose state is active.
//! 4. **Every later tick**: [`CornerInfoRenderer::update_corner_values`]
//!    removes whatever values are drawn, then draws the new ones.
//!
//! ## Element Ownership
//! Every corner holds at most one value element, tracked as a
//! [`CornerElement`]: `Unset` or `Drawn(handle)`. An update takes each slot
//! back to `Unset` and removes the handle it held, so every drawn handle is
//! removed exactly once and repeated ticks never leave more than four value
//! elements on the surface.
//!
//! ## Alignment
//! | Corner       | Anchor  | Baseline |
//! |--------------|---------|----------|
//! | top-left     | start   | hanging  |
//! | top-right    | end     | hanging  |
//! | bottom-left  | start   | auto     |
//! | bottom-right | end     | auto     |
//!
//! Labels and values share these rules.
//!
//! ## Value Formatting
//! See [`format_corner_text`]. Formatting never fails: anything that is not a
//! finite number is shown as received.

use crate::config::{CardConfig, CornerInfo, DimensionConfig};
use crate::dimensions::DimensionCalculator;
use crate::state::EntityState;
use crate::surface::{DrawingSurface, TextAttributes};
use crate::{Coordinate, Corner, Corners};
use std::mem;

/// Drawn state of one corner value.
///
/// A corner starts `Unset`, becomes `Drawn` when its value is drawn, and
/// returns to `Unset` when an update removes that value.
#[derive(Debug, Default, PartialEq)]
pub enum CornerElement<H> {
    #[default]
    Unset,
    Drawn(H),
}

impl<H> CornerElement<H> {
    pub fn is_drawn(&self) -> bool {
        matches!(self, CornerElement::Drawn(_))
    }

    pub fn handle(&self) -> Option<&H> {
        match self {
            CornerElement::Drawn(handle) => Some(handle),
            CornerElement::Unset => None,
        }
    }

    fn take(&mut self) -> CornerElement<H> {
        mem::replace(self, CornerElement::Unset)
    }
}

/// Draws and redraws the four corner readouts on a [`DrawingSurface`].
///
/// The renderer exclusively owns its surface; get it back with
/// [`into_surface`](Self::into_surface) once rendering is done.
pub struct CornerInfoRenderer<S: DrawingSurface> {
    calculator: DimensionCalculator,
    surface: S,
    coordinates: Corners<Coordinate>,
    configs: Corners<CornerInfo>,
    elements: Corners<CornerElement<S::Handle>>,
}

impl<S: DrawingSurface> CornerInfoRenderer<S> {
    /// Compute the value anchors and take ownership of the surface. Nothing
    /// is drawn yet.
    pub fn new(corners: Corners<CornerInfo>, dimensions: DimensionConfig, surface: S) -> Self {
        let calculator = DimensionCalculator::new(dimensions);
        let coordinates = Corners::from_fn(|corner| calculator.corner_value(corner));
        Self {
            calculator,
            surface,
            coordinates,
            configs: corners,
            elements: Corners::from_fn(|_| CornerElement::Unset),
        }
    }

    /// Build a renderer from the corner and layout sections of a card.
    pub fn from_card(config: &CardConfig, surface: S) -> Self {
        Self::new(config.corners.clone(), config.dimensions.clone(), surface)
    }

    /// Draw the static label of every corner that has one.
    pub fn draw_corner_labels(&mut self) {
        let font_size = self.calculator.config().corner_label_font_size;
        for corner in Corner::ALL {
            let config = &self.configs[corner];
            let Some(label) = config.label_text() else {
                continue;
            };
            let attrs = TextAttributes::corner_label(&config.color, font_size, corner);
            self.surface
                .draw_text(self.calculator.corner_label(corner), label, &attrs);
            log::debug!("drew {} label {:?}", corner, label);
        }
    }

    /// Draw the value of every shown corner whose state is active.
    ///
    /// Previously drawn elements are not removed; call
    /// [`update_corner_values`](Self::update_corner_values) for redraws.
    pub fn draw_corner_values(&mut self, states: &Corners<EntityState>) {
        let font_size = self.calculator.config().corner_value_font_size;
        for corner in Corner::ALL {
            let config = &self.configs[corner];
            let state = &states[corner];
            if !state.active {
                continue;
            }
            if !config.show {
                log::warn!("ignoring active state for hidden {} corner", corner);
                continue;
            }

            let text = format_corner_text(Some(state), config);
            let attrs = TextAttributes::corner_value(&config.color, font_size, corner);
            let handle = self
                .surface
                .draw_text(self.coordinates[corner], &text, &attrs);
            if self.elements[corner].is_drawn() {
                log::warn!("{} value replaced without removal", corner);
            }
            self.elements[corner] = CornerElement::Drawn(handle);
            log::debug!("drew {} value {:?}", corner, text);
        }
    }

    /// Remove all drawn values, then draw `states`.
    ///
    /// Corners that were never drawn are skipped. This is the redraw entry
    /// point for every tick after the first.
    pub fn update_corner_values(&mut self, states: &Corners<EntityState>) {
        for corner in Corner::ALL {
            if let CornerElement::Drawn(handle) = self.elements[corner].take() {
                self.surface.remove(handle);
            }
        }
        self.draw_corner_values(states);
    }

    pub fn value_coordinate(&self, corner: Corner) -> Coordinate {
        self.coordinates[corner]
    }

    pub fn element(&self, corner: Corner) -> &CornerElement<S::Handle> {
        &self.elements[corner]
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Text shown for a corner value.
///
/// Numeric states are rounded to the corner's precision when one is set;
/// anything else is shown as-is. The unit, if any, is appended without a
/// separating space. A missing state yields an empty string.
///
/// # Example
/// ```
/// use windrose_card_lib::config::CornerInfo;
/// use windrose_card_lib::corner_renderer::format_corner_text;
/// use windrose_card_lib::state::EntityState;
///
/// let corner = CornerInfo {
///     precision: Some(1),
///     unit: Some("kt".to_string()),
///     ..CornerInfo::default()
/// };
/// let state = EntityState::active("12.345");
/// assert_eq!(format_corner_text(Some(&state), &corner), "12.3kt");
/// assert_eq!(format_corner_text(None, &corner), "");
/// ```
pub fn format_corner_text(state: Option<&EntityState>, config: &CornerInfo) -> String {
    let Some(raw) = state.and_then(|state| state.state.as_deref()) else {
        return String::new();
    };

    let mut text = match (config.precision, parse_finite(raw)) {
        (Some(precision), Some(value)) => round_to(value, precision).to_string(),
        _ => raw.to_string(),
    };
    if let Some(unit) = config.unit.as_deref().filter(|unit| !unit.is_empty()) {
        text.push_str(unit);
    }
    text
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Round half up to `precision` decimal places.
///
/// The decimal point is shifted through the textual representation so that
/// values like `1.005` round on their decimal digits rather than on their
/// binary approximation. When the shift overflows, the value is already
/// beyond the reach of `precision` and is returned unchanged.
fn round_to(value: f64, precision: u32) -> f64 {
    let shifted: f64 = format!("{}e{}", value, precision).parse().unwrap_or(value);
    if !shifted.is_finite() {
        return value;
    }
    let floor = shifted.floor();
    let rounded = if shifted - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    };
    let result: f64 = format!("{}e-{}", rounded, precision)
        .parse()
        .unwrap_or(rounded);
    // -0 reads as 0
    if result == 0.0 {
        0.0
    } else {
        result
    }
}
