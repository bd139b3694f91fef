//! Tool system for canvas interactions.
//!
//! A tool owns an ordered list of accepted inputs and an element kind. Each
//! input reruns the kind's `build` over the whole list; the result is
//! reported as a [`ToolEvent`] for the host to act on.
//!
//! | Tool   | Completes after                          |
//! |--------|------------------------------------------|
//! | Select | two points (a cancel key restarts it)    |
//! | Box    | one point and an accepted name           |
//! | Link   | two points and an accepted name          |

use lb_core::{DiagramModel, Element, ElementKind, Event, Prompt};
use smallvec::SmallVec;

/// What happened after a tool consumed an input.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEvent {
    Activated {
        tool: String,
    },
    /// The element is still in progress; `element` is its current preview.
    Changed {
        tool: String,
        element: Element,
        prompts: Vec<Prompt>,
    },
    /// The element is final and ready to commit.
    Finished {
        tool: String,
        element: Element,
    },
}

impl ToolEvent {
    pub fn tool(&self) -> &str {
        match self {
            ToolEvent::Activated { tool }
            | ToolEvent::Changed { tool, .. }
            | ToolEvent::Finished { tool, .. } => tool,
        }
    }

    pub fn element(&self) -> Option<&Element> {
        match self {
            ToolEvent::Activated { .. } => None,
            ToolEvent::Changed { element, .. } | ToolEvent::Finished { element, .. } => {
                Some(element)
            }
        }
    }

    /// Prompt texts, empty unless the event is `Changed`.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ToolEvent::Changed { prompts, .. } => prompts.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, ToolEvent::Finished { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Tool {
    name: String,
    kind: ElementKind,
    inputs: SmallVec<[Event; 3]>,
}

impl Tool {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            inputs: SmallVec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Accepted inputs so far.
    pub fn inputs(&self) -> &[Event] {
        &self.inputs
    }

    pub fn activate(&self) -> ToolEvent {
        log::info!("tool {} activated", self.name);
        ToolEvent::Activated {
            tool: self.name.clone(),
        }
    }

    /// Accept `event` permanently and rebuild.
    ///
    /// The build's patch is applied to `model`. A complete build resets the
    /// input list and yields `Finished`; otherwise `Changed`.
    pub fn add_input(&mut self, event: Event, model: &mut DiagramModel) -> ToolEvent {
        self.inputs.push(event);
        let build = self.kind.build(&self.inputs, model);
        model.apply(&build.patch);

        if build.is_complete() {
            log::debug!("tool {} finished {}", self.name, build.element.id());
            self.inputs.clear();
            return ToolEvent::Finished {
                tool: self.name.clone(),
                element: build.element,
            };
        }
        if build.patch.clear_inputs {
            self.inputs.clear();
        }
        ToolEvent::Changed {
            tool: self.name.clone(),
            element: build.element,
            prompts: build.prompts,
        }
    }

    /// Preview what the element would look like with `event` appended,
    /// without accepting it. Always yields `Changed`, even if that build
    /// would be complete.
    pub fn set_tentative_input(&mut self, event: Event, model: &mut DiagramModel) -> ToolEvent {
        let mut inputs = self.inputs.clone();
        inputs.push(event);
        let build = self.kind.build(&inputs, model);
        model.apply(&build.patch);
        if build.patch.clear_inputs {
            self.inputs.clear();
        }
        ToolEvent::Changed {
            tool: self.name.clone(),
            element: build.element,
            prompts: build.prompts,
        }
    }

    pub fn reset(&mut self) {
        if !self.inputs.is_empty() {
            log::debug!("tool {} dropped {} inputs", self.name, self.inputs.len());
        }
        self.inputs.clear();
    }
}

/// The standard tool palette, in toolbar order.
pub fn registry() -> Vec<Tool> {
    vec![
        Tool::new("Select", ElementKind::Select),
        Tool::new("Box", ElementKind::Box),
        Tool::new("Link", ElementKind::Link),
    ]
}
