pub mod build;
pub mod draw;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod id;
pub mod model;
pub mod prompt;

pub use build::Build;
pub use draw::{Color, DrawCommand, Pen, RecordingSurface, Surface, draw_diagram};
pub use element::{
    BoxElement, Element, ElementKind, ElementRef, LinkElement, LinkEnd, Metadata, NullElement,
    SelectElement,
};
pub use error::ModelError;
pub use event::{Event, KeyCode, KeyEvent, PointerEvent, ZoomEvent};
pub use id::ElementId;
pub use model::{DiagramModel, ModelPatch};
pub use prompt::Prompt;

// Re-export kurbo geometry so downstream crates share one set of types
pub use kurbo::{Affine, Point, Rect, Vec2};
