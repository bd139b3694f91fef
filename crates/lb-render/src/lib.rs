pub mod paint;

pub use paint::{SceneSurface, TextRun, paint_diagram};

// Re-export the scene type so hosts don't need a direct vello dependency
pub use vello::Scene;
