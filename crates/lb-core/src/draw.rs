//! Draw contract between elements and a painting backend.
//!
//! Elements paint themselves in model coordinates onto a [`Surface`]; the
//! surface owns the model → screen transform. `lb-render` implements the
//! trait over a Vello scene, [`RecordingSurface`] records the calls.

use crate::element::{BoxElement, Element, ElementRef, LinkElement, SelectElement};
use crate::geometry::{LINK_ANCHOR_OFFSET, LINK_ROW_SPACING, LINK_STUB, top_left, top_right};
use crate::model::DiagramModel;
use kurbo::{Point, Rect, Vec2};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgba8(0x00, 0x00, 0x00, 0xff);
    pub const BLUE: Color = Color::rgba8(0x00, 0x00, 0xff, 0xff);
    pub const MARQUEE_BORDER: Color = Color::rgba8(0x00, 0x88, 0x88, 0xff);
    pub const MARQUEE_FILL: Color = Color::rgba8(0x00, 0xcc, 0xcc, 0x3f);

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f64,
    pub dashed: bool,
}

impl Pen {
    pub const fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub const fn dashed(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: true,
        }
    }
}

/// A painting backend. All coordinates are in model space.
pub trait Surface {
    fn stroke_rect(&mut self, rect: Rect, pen: &Pen);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn line(&mut self, from: Point, to: Point, pen: &Pen);
    fn text(&mut self, at: Point, text: &str, color: Color);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    StrokeRect { rect: Rect, pen: Pen },
    FillRect { rect: Rect, color: Color },
    Line { from: Point, to: Point, pen: Pen },
    Text { at: Point, text: String, color: Color },
}

/// A surface that only records what was drawn.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded text labels, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn stroke_rect(&mut self, rect: Rect, pen: &Pen) {
        self.commands.push(DrawCommand::StrokeRect { rect, pen: *pen });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn line(&mut self, from: Point, to: Point, pen: &Pen) {
        self.commands.push(DrawCommand::Line { from, to, pen: *pen });
    }

    fn text(&mut self, at: Point, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            color,
        });
    }
}

// ─── Element painters ────────────────────────────────────────────────────

const BOX_PEN: Pen = Pen::solid(Color::BLACK, 2.0);
const LINK_PEN: Pen = Pen::solid(Color::BLUE, 2.0);
const BOX_LABEL_OFFSET: Vec2 = Vec2::new(5.0, 15.0);
const LINK_START_LABEL_OFFSET: Vec2 = Vec2::new(5.0, -2.0);
const LINK_END_LABEL_OFFSET: Vec2 = Vec2::new(-55.0, -2.0);

impl BoxElement {
    pub fn draw(&self, surface: &mut dyn Surface, model: &DiagramModel) {
        surface.stroke_rect(model.display_rect(self), &BOX_PEN);
        surface.text(top_left(self.rect) + BOX_LABEL_OFFSET, &self.name, Color::BLACK);
    }
}

impl LinkElement {
    /// The three-segment orthogonal route, as four points.
    pub fn route(&self, model: &DiagramModel) -> Option<[Point; 4]> {
        let source = model.end_box(&self.source)?;
        let target = model.end_box(&self.target)?;
        let out_row = model.outgoing_order(source.id, self.id) as f64;
        let in_row = model.incoming_order(target.id, self.id) as f64;

        let p1 = top_right(source.rect)
            + Vec2::new(0.0, LINK_ANCHOR_OFFSET + out_row * LINK_ROW_SPACING);
        let p2 = top_left(target.rect)
            + Vec2::new(0.0, LINK_ANCHOR_OFFSET + in_row * LINK_ROW_SPACING);
        let stub = Vec2::new(LINK_STUB, 0.0);
        Some([p1, p1 + stub, p2 - stub, p2])
    }

    pub fn draw(&self, surface: &mut dyn Surface, model: &DiagramModel) {
        let Some(route) = self.route(model) else {
            log::warn!("link {} has an unresolved endpoint, not drawn", self.id);
            return;
        };
        for pair in route.windows(2) {
            surface.line(pair[0], pair[1], &LINK_PEN);
        }
        surface.text(route[0] + LINK_START_LABEL_OFFSET, &self.name, Color::BLUE);
        surface.text(route[3] + LINK_END_LABEL_OFFSET, &self.name, Color::BLUE);
    }
}

impl SelectElement {
    pub fn draw(&self, surface: &mut dyn Surface) {
        let pen = if self.rtl {
            Pen::solid(Color::MARQUEE_BORDER, 1.0)
        } else {
            Pen::dashed(Color::MARQUEE_BORDER, 1.0)
        };
        surface.fill_rect(self.rect, Color::MARQUEE_FILL);
        surface.stroke_rect(self.rect, &pen);
    }
}

impl Element {
    pub fn draw(&self, surface: &mut dyn Surface, model: &DiagramModel) {
        match self {
            Element::Box(b) => b.draw(surface, model),
            Element::Link(l) => l.draw(surface, model),
            Element::Select(s) => s.draw(surface),
            Element::Null(_) => {}
        }
    }
}

impl ElementRef<'_> {
    pub fn draw(&self, surface: &mut dyn Surface, model: &DiagramModel) {
        match self {
            ElementRef::Box(b) => b.draw(surface, model),
            ElementRef::Link(l) => l.draw(surface, model),
        }
    }
}

/// Paint the committed elements in z-order, then the feedback overlay.
pub fn draw_diagram(surface: &mut dyn Surface, model: &DiagramModel) {
    for element in model.drawables() {
        element.draw(surface, model);
    }
    for element in model.feedback() {
        element.draw(surface, model);
    }
}
