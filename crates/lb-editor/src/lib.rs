pub mod config;
pub mod input;
pub mod session;
pub mod tools;
pub mod viewport;

pub use config::{ConfigError, EditorConfig};
pub use input::KeyBuffer;
pub use session::Editor;
pub use tools::{Tool, ToolEvent, registry};
pub use viewport::{Viewport, ZoomSettle};
