//! Editor session: wires raw canvas input to the active tool.
//!
//! The host forwards pointer, key and wheel input in screen coordinates.
//! The session maps them into model space, resolves hit targets, feeds the
//! active tool and applies the resulting [`ToolEvent`] to the model:
//!
//! - pointer up and finished key entries are accepted inputs;
//! - pointer moves and unfinished key entries are tentative previews;
//! - `Changed` replaces the feedback overlay with the preview element;
//! - `Finished` commits the element and clears the overlay.

use crate::config::EditorConfig;
use crate::input::KeyBuffer;
use crate::tools::{Tool, ToolEvent, registry};
use crate::viewport::{Viewport, ZoomSettle};
use kurbo::{Point, Rect, Size};
use lb_core::{DiagramModel, ElementKind, Event, KeyCode, PointerEvent, Prompt, ZoomEvent};
use lb_render::{Scene, TextRun, paint_diagram};
use std::time::Instant;

pub struct Editor {
    model: DiagramModel,
    tools: Vec<Tool>,
    current: Option<usize>,
    viewport: Viewport,
    keys: KeyBuffer,
    zoom: ZoomSettle,
    canvas: Size,
    config: EditorConfig,
    prompts: Vec<Prompt>,
    needs_redraw: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_tools(config, registry())
    }

    pub fn with_tools(config: EditorConfig, tools: Vec<Tool>) -> Self {
        Self {
            model: DiagramModel::new(),
            tools,
            current: None,
            viewport: config.viewport(),
            keys: KeyBuffer::new(),
            zoom: config.zoom_settle(),
            canvas: config.min_canvas_size(),
            config,
            prompts: Vec::new(),
            needs_redraw: true,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn model(&self) -> &DiagramModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut DiagramModel {
        self.needs_redraw = true;
        &mut self.model
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn current_tool(&self) -> Option<&Tool> {
        self.current.map(|i| &self.tools[i])
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Prompts from the last in-progress build.
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Status line text for the host.
    pub fn status(&self) -> String {
        format!("Input Buffer: {}", self.keys.as_str())
    }

    /// `true` if anything visible changed since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Make the tool named `name` current. The previous tool loses its
    /// inputs and any preview it left behind. Unknown names are ignored.
    pub fn activate(&mut self, name: &str) -> Option<ToolEvent> {
        let Some(index) = self.tools.iter().position(|t| t.name() == name) else {
            log::warn!("no tool named {name:?}");
            return None;
        };
        if let Some(prev) = self.current {
            self.tools[prev].reset();
        }
        self.current = Some(index);
        self.keys.clear();
        self.prompts.clear();
        self.model.clear_feedback();
        self.needs_redraw = true;
        Some(self.tools[index].activate())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Pointer press. Tools act on release, so this only resolves the hit.
    pub fn pointer_down(&mut self, screen: Point) -> PointerEvent {
        let event = self.resolve(screen);
        log::debug!("pointer down at {:?} on {:?}", event.model_point, event.target);
        event
    }

    pub fn pointer_up(&mut self, screen: Point) -> Option<ToolEvent> {
        let event = self.resolve(screen);
        self.accept(event.into())
    }

    pub fn pointer_move(&mut self, screen: Point) -> Option<ToolEvent> {
        let event = self.resolve(screen);
        self.preview(event.into())
    }

    /// Key release. `text` is the printable text the key produced, if any.
    ///
    /// A finished entry (Enter/Return) is accepted by the active tool;
    /// anything else previews. Escape restarts the active tool; only the
    /// Select tool then rebuilds, which clears the selection.
    pub fn key(&mut self, key: KeyCode, text: Option<&str>) -> Option<ToolEvent> {
        let event = self.keys.press(key, text);
        self.needs_redraw = true;
        if event.key.is_cancel()
            && let Some(i) = self.current
        {
            self.tools[i].reset();
            self.model.clear_feedback();
            self.prompts.clear();
            // Only the marquee builds anything from a cancel key.
            if self.tools[i].kind() != ElementKind::Select {
                return Some(self.tools[i].activate());
            }
        }
        if event.finished {
            self.accept(event.into())
        } else {
            self.preview(event.into())
        }
    }

    /// Wheel zoom about `screen`. The returned event reflects the new
    /// viewport; `poll` reports when the zoom has settled.
    pub fn wheel(&mut self, screen: Point, delta: f64, now: Instant) -> ZoomEvent {
        let model_point = self.viewport.screen_to_model(screen);
        let pointer = PointerEvent::resolve(screen, model_point, &self.model);
        self.viewport.zoom_at(screen, delta, self.config.zoom_sensitivity);
        self.zoom.touch(now);
        self.needs_redraw = true;
        ZoomEvent {
            pointer,
            zoom_value: delta,
            transform: self.viewport.transform(),
        }
    }

    /// `true` once the wheel has been quiet for the settle window.
    pub fn poll(&mut self, now: Instant) -> bool {
        let settled = self.zoom.poll(now);
        if settled {
            log::debug!("zoom settled at scale {}", self.viewport.scale);
        }
        settled
    }

    /// Canvas resized by the host; clamped to the configured minimum.
    pub fn resize(&mut self, size: Size) {
        let min = self.config.min_canvas_size();
        self.canvas = Size::new(size.width.max(min.width), size.height.max(min.height));
        self.needs_redraw = true;
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    /// Model-space area currently on screen.
    pub fn visible_rect(&self) -> Rect {
        self.viewport.visible_rect(self.canvas)
    }

    // ─── Paint ───────────────────────────────────────────────────────────

    pub fn paint(&self, scene: &mut Scene) -> Vec<TextRun> {
        paint_diagram(scene, &self.model, self.viewport.transform())
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn resolve(&self, screen: Point) -> PointerEvent {
        let model_point = self.viewport.screen_to_model(screen);
        PointerEvent::resolve(screen, model_point, &self.model)
    }

    fn accept(&mut self, event: Event) -> Option<ToolEvent> {
        let index = self.current?;
        let tool_event = self.tools[index].add_input(event, &mut self.model);
        self.handle(&tool_event);
        Some(tool_event)
    }

    fn preview(&mut self, event: Event) -> Option<ToolEvent> {
        let index = self.current?;
        let tool_event = self.tools[index].set_tentative_input(event, &mut self.model);
        self.handle(&tool_event);
        Some(tool_event)
    }

    fn handle(&mut self, event: &ToolEvent) {
        match event {
            ToolEvent::Activated { .. } => {}
            ToolEvent::Changed {
                element, prompts, ..
            } => {
                self.model.set_feedback(vec![element.clone()]);
                self.prompts.clone_from(prompts);
            }
            ToolEvent::Finished { tool, element } => {
                match self.model.add(element.clone()) {
                    Ok(Some(id)) => log::info!("{tool}: committed {id}"),
                    Ok(None) => log::debug!("{tool}: nothing to commit"),
                    Err(e) => log::warn!("{tool}: commit failed: {e}"),
                }
                self.model.clear_feedback();
                self.prompts.clear();
            }
        }
        self.needs_redraw = true;
    }
}
