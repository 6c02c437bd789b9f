//! Drawing surface backed by an `embedded-graphics` draw target.
//!
//! Lets the corner readouts render straight onto a pixel display (e-ink
//! panels, framebuffers, `MockDisplay` in tests). Removing an element fills
//! its bounding box with the background colour.
//!
//! Pixel targets have their own colour types, so the `color` attribute is
//! looked up in an optional palette ([`GraphicsSurface::with_palette`]); text
//! whose colour the palette doesn't know, or any text without a palette, is
//! drawn in the foreground colour. `font_size` is ignored: every element uses
//! the surface's single monospace font.

use crate::surface::{DrawingSurface, TextAnchor, TextAttributes, TextBaseline};
use crate::Coordinate;
use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoFont, MonoTextStyle},
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use std::fmt::Debug;

/// Maps a configured colour string to a target colour.
pub type Palette<C> = fn(&str) -> Option<C>;

pub struct GraphicsSurface<D: DrawTarget> {
    target: D,
    font: &'static MonoFont<'static>,
    foreground: D::Color,
    background: D::Color,
    palette: Option<Palette<D::Color>>,
}

impl<D: DrawTarget> GraphicsSurface<D> {
    /// Create a surface drawing with `FONT_10X20`.
    pub fn new(target: D, foreground: D::Color, background: D::Color) -> Self {
        Self {
            target,
            font: &FONT_10X20,
            foreground,
            background,
            palette: None,
        }
    }

    /// Resolve `TextAttributes::color` through `palette`.
    pub fn with_palette(mut self, palette: Palette<D::Color>) -> Self {
        self.palette = Some(palette);
        self
    }

    fn color_for(&self, color: &str) -> D::Color {
        self.palette
            .and_then(|palette| palette(color))
            .unwrap_or(self.foreground)
    }

    pub fn with_font(mut self, font: &'static MonoFont<'static>) -> Self {
        self.font = font;
        self
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

fn to_point(at: Coordinate) -> Point {
    Point::new(at.x.round() as i32, at.y.round() as i32)
}

fn alignment(anchor: TextAnchor) -> Alignment {
    match anchor {
        TextAnchor::Start => Alignment::Left,
        TextAnchor::End => Alignment::Right,
    }
}

fn baseline(baseline: TextBaseline) -> Baseline {
    match baseline {
        TextBaseline::Hanging => Baseline::Top,
        TextBaseline::Auto => Baseline::Alphabetic,
    }
}

impl<D> DrawingSurface for GraphicsSurface<D>
where
    D: DrawTarget,
    D::Error: Debug,
{
    /// Area covered by the drawn text.
    type Handle = Rectangle;

    fn draw_text(&mut self, at: Coordinate, text: &str, attrs: &TextAttributes) -> Rectangle {
        let character_style = MonoTextStyle::new(self.font, self.color_for(&attrs.color));
        let text_style = TextStyleBuilder::new()
            .alignment(alignment(attrs.anchor))
            .baseline(baseline(attrs.baseline))
            .build();
        let element = Text::with_text_style(text, to_point(at), character_style, text_style);
        if let Err(e) = element.draw(&mut self.target) {
            log::warn!("failed to draw {:?}: {:?}", text, e);
        }
        element.bounding_box()
    }

    fn remove(&mut self, handle: Rectangle) {
        if let Err(e) = handle
            .into_styled(PrimitiveStyle::with_fill(self.background))
            .draw(&mut self.target)
        {
            log::warn!("failed to clear {:?}: {:?}", handle, e);
        }
    }
}
