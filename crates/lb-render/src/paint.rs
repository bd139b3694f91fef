//! Diagram → Vello drawing commands.
//!
//! `SceneSurface` implements the `lb_core::Surface` draw contract over a
//! Vello `Scene`. Elements paint in model coordinates; the surface applies
//! the model → screen transform to every shape.

use kurbo::{Affine, Line, Point, Rect, Stroke as KurboStroke};
use lb_core::{Color, DiagramModel, Pen, Surface, draw_diagram};
use peniko::{Color as PenikoColor, Fill};
use vello::Scene;

/// Dash pattern for dashed pens, in model units.
const DASH_PATTERN: [f64; 2] = [4.0, 4.0];

/// A label the host must render (text shaping is left to the host).
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Baseline origin in screen coordinates.
    pub at: Point,
    pub text: String,
    pub color: Color,
}

pub struct SceneSurface<'a> {
    scene: &'a mut Scene,
    transform: Affine,
    texts: Vec<TextRun>,
}

impl<'a> SceneSurface<'a> {
    pub fn new(scene: &'a mut Scene, transform: Affine) -> Self {
        Self {
            scene,
            transform,
            texts: Vec::new(),
        }
    }

    /// Labels collected so far, in draw order.
    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    pub fn into_texts(self) -> Vec<TextRun> {
        self.texts
    }
}

impl Surface for SceneSurface<'_> {
    fn stroke_rect(&mut self, rect: Rect, pen: &Pen) {
        self.scene.stroke(&to_stroke(pen), self.transform, to_color(pen.color), None, &rect);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.scene.fill(Fill::NonZero, self.transform, to_color(color), None, &rect);
    }

    fn line(&mut self, from: Point, to: Point, pen: &Pen) {
        let line = Line::new(from, to);
        self.scene.stroke(&to_stroke(pen), self.transform, to_color(pen.color), None, &line);
    }

    fn text(&mut self, at: Point, text: &str, color: Color) {
        let at = self.transform * at;
        log::trace!("TEXT {text:?} at ({}, {})", at.x, at.y);
        self.texts.push(TextRun {
            at,
            text: text.to_string(),
            color,
        });
    }
}

/// Paint the whole diagram (committed elements, then feedback) into
/// `scene`. Call once per frame with a freshly-cleared `Scene`; the caller
/// presents it via wgpu and renders the returned labels.
pub fn paint_diagram(scene: &mut Scene, model: &DiagramModel, transform: Affine) -> Vec<TextRun> {
    let mut surface = SceneSurface::new(scene, transform);
    draw_diagram(&mut surface, model);
    log::trace!("painted {} elements + {} feedback", model.len(), model.feedback().len());
    surface.into_texts()
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn to_stroke(pen: &Pen) -> KurboStroke {
    let stroke = KurboStroke::new(pen.width);
    if pen.dashed {
        stroke.with_dashes(0.0, DASH_PATTERN)
    } else {
        stroke
    }
}

fn to_color(color: Color) -> PenikoColor {
    PenikoColor::from_rgba8(color.r, color.g, color.b, color.a)
}
