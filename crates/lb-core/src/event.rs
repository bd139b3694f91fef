//! Event model: the resolved inputs a tool accumulates.
//!
//! Events are produced by the canvas surface after it has mapped the raw
//! device input into model coordinates and hit-tested the diagram. Tools
//! treat them as opaque, order-sensitive tokens.

use crate::id::ElementId;
use crate::model::DiagramModel;
use kurbo::{Affine, Point};
use serde::Serialize;
use smallvec::SmallVec;

/// A pointer interaction (down, up or move) in model coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub screen_point: Point,
    pub model_point: Point,
    /// First element under the pointer, if any.
    pub target: Option<ElementId>,
    /// Every element under the pointer, in drawables order.
    pub target_path: SmallVec<[ElementId; 4]>,
}

impl PointerEvent {
    /// A pointer event at `model_point` that hit nothing. Screen and model
    /// coordinates coincide.
    pub fn at(model_point: Point) -> Self {
        Self {
            screen_point: model_point,
            model_point,
            target: None,
            target_path: SmallVec::new(),
        }
    }

    /// A pointer event whose hit-test results are computed against `model`.
    pub fn resolve(screen_point: Point, model_point: Point, model: &DiagramModel) -> Self {
        let target_path: SmallVec<[ElementId; 4]> =
            model.elements_at(model_point).into_iter().collect();
        Self {
            screen_point,
            model_point,
            target: target_path.first().copied(),
            target_path,
        }
    }
}

/// A settled wheel / pinch zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomEvent {
    pub pointer: PointerEvent,
    /// Signed wheel delta.
    pub zoom_value: f64,
    /// Model → screen transform at the moment the zoom was applied.
    pub transform: Affine,
}

/// Logical key codes the editor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KeyCode {
    Enter,
    Return,
    Escape,
    Backspace,
    Char(char),
    Other(u32),
}

impl KeyCode {
    /// Keys that terminate text entry.
    pub fn is_accept(self) -> bool {
        matches!(self, KeyCode::Enter | KeyCode::Return)
    }

    /// The designated cancel key.
    pub fn is_cancel(self) -> bool {
        self == KeyCode::Escape
    }
}

/// A snapshot of the key-text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    /// Full accumulated text, not just the delta.
    pub buffer: String,
    /// True only for the event that terminates text entry.
    pub finished: bool,
}

impl KeyEvent {
    /// A terminating event carrying `buffer` (what an Enter press produces).
    pub fn accepted(buffer: impl Into<String>) -> Self {
        Self {
            key: KeyCode::Enter,
            buffer: buffer.into(),
            finished: true,
        }
    }

    /// A non-terminating event (typing in progress).
    pub fn typing(key: KeyCode, buffer: impl Into<String>) -> Self {
        Self {
            key,
            buffer: buffer.into(),
            finished: false,
        }
    }

    /// The cancel event: an Escape with an emptied buffer.
    pub fn cancel() -> Self {
        Self::typing(KeyCode::Escape, "")
    }
}

/// Any input a tool can accumulate.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Pointer(PointerEvent),
    Zoom(ZoomEvent),
    Key(KeyEvent),
}

impl Event {
    pub fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            Event::Pointer(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Event::Key(k) => Some(k),
            _ => None,
        }
    }
}

impl From<PointerEvent> for Event {
    fn from(e: PointerEvent) -> Self {
        Event::Pointer(e)
    }
}

impl From<ZoomEvent> for Event {
    fn from(e: ZoomEvent) -> Self {
        Event::Zoom(e)
    }
}

impl From<KeyEvent> for Event {
    fn from(e: KeyEvent) -> Self {
        Event::Key(e)
    }
}
