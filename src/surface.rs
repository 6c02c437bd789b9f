//! # Drawing Surfaces
//!
//! The corner renderer only needs two operations from whatever it draws on:
//! create a text node at a coordinate, and remove a node it created earlier.
//! [`DrawingSurface`] captures exactly that. [`SvgSurface`] is an in-memory
//! SVG document implementing it, used by the binary. A recording
//! [`SvgSurface`] also keeps a log of the issued operations for inspection.

use crate::{Coordinate, Corner};
use std::fmt::Write as _;

/// Horizontal alignment of text relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    pub fn for_corner(corner: Corner) -> Self {
        if corner.is_left() {
            TextAnchor::Start
        } else {
            TextAnchor::End
        }
    }

    pub fn as_svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        }
    }
}

/// Vertical placement of text relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// Text hangs below the anchor
    Hanging,
    /// Text sits on the anchor
    Auto,
}

impl TextBaseline {
    /// Top corners hang below their anchor, bottom corners sit on it.
    pub fn for_corner(corner: Corner) -> Self {
        if corner.is_top() {
            TextBaseline::Hanging
        } else {
            TextBaseline::Auto
        }
    }

    pub fn as_svg(self) -> &'static str {
        match self {
            TextBaseline::Hanging => "hanging",
            TextBaseline::Auto => "auto",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextAttributes {
    pub color: String,
    pub font_size: f64,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl TextAttributes {
    /// Attributes of a corner value: top values hang below their anchor,
    /// bottom values sit on it.
    pub fn corner_value(color: &str, font_size: f64, corner: Corner) -> Self {
        Self {
            color: color.to_string(),
            font_size,
            anchor: TextAnchor::for_corner(corner),
            baseline: TextBaseline::for_corner(corner),
        }
    }

    /// Attributes of a corner label. Aligned the same way as the value.
    pub fn corner_label(color: &str, font_size: f64, corner: Corner) -> Self {
        Self {
            color: color.to_string(),
            font_size,
            anchor: TextAnchor::for_corner(corner),
            baseline: TextBaseline::for_corner(corner),
        }
    }
}

/// Something text elements can be drawn on and removed from.
pub trait DrawingSurface {
    /// Opaque reference to a drawn element.
    type Handle;

    fn draw_text(&mut self, at: Coordinate, text: &str, attrs: &TextAttributes) -> Self::Handle;

    /// Remove a previously drawn element. The handle is consumed.
    fn remove(&mut self, handle: Self::Handle);
}

/// Handle to a node of an [`SvgSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub id: NodeId,
    pub at: Coordinate,
    pub text: String,
    pub attrs: TextAttributes,
}

/// Operation log entry of an [`SvgSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Draw(NodeId),
    Remove(NodeId),
}

/// In-memory SVG document.
///
/// Only live nodes are kept, so memory stays bounded across any number of
/// redraws. The operation log grows with every draw and remove and is
/// therefore off unless the surface is created with [`SvgSurface::recording`].
#[derive(Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    next_id: u64,
    nodes: Vec<TextNode>,
    ops: Option<Vec<SurfaceOp>>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            next_id: 0,
            nodes: Vec::new(),
            ops: None,
        }
    }

    /// Create a surface that logs every draw and remove.
    pub fn recording(width: f64, height: f64) -> Self {
        Self {
            ops: Some(Vec::new()),
            ..Self::new(width, height)
        }
    }

    fn record(&mut self, op: SurfaceOp) {
        if let Some(ops) = self.ops.as_mut() {
            ops.push(op);
        }
    }

    /// Drain the operation log, leaving recording enabled.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        self.ops.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Nodes currently attached, in drawing order.
    pub fn nodes(&self) -> &[TextNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&TextNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn live_count(&self) -> usize {
        self.nodes.len()
    }

    /// Logged operations; empty unless recording.
    pub fn ops(&self) -> &[SurfaceOp] {
        self.ops.as_deref().unwrap_or(&[])
    }

    pub fn texts(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.text.as_str()).collect()
    }

    /// Render the document as SVG markup.
    pub fn to_svg_string(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for node in &self.nodes {
            let _ = writeln!(
                svg,
                r#"  <text id="n{}" x="{}" y="{}" fill="{}" font-size="{}" text-anchor="{}" dominant-baseline="{}">{}</text>"#,
                node.id.0,
                node.at.x,
                node.at.y,
                escape_xml(&node.attrs.color),
                node.attrs.font_size,
                node.attrs.anchor.as_svg(),
                node.attrs.baseline.as_svg(),
                escape_xml(&node.text)
            );
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl DrawingSurface for SvgSurface {
    type Handle = NodeId;

    fn draw_text(&mut self, at: Coordinate, text: &str, attrs: &TextAttributes) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(TextNode {
            id,
            at,
            text: text.to_string(),
            attrs: attrs.clone(),
        });
        self.record(SurfaceOp::Draw(id));
        id
    }

    fn remove(&mut self, handle: NodeId) {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.id != handle);
        if self.nodes.len() == before {
            log::warn!("remove of unknown svg node {:?}", handle);
        }
        self.record(SurfaceOp::Remove(handle));
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
