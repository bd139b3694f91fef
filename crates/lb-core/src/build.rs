//! The incremental build protocol.
//!
//! `build(inputs, model)` maps the inputs a tool has accumulated so far to
//! the prompts still outstanding, the element they describe (a preview
//! while incomplete) and a [`ModelPatch`] holding any side effects. It
//! never mutates the model, so calling it twice on the same inputs and
//! model yields equivalent results.
//!
//! | Kind   | Needs                                        |
//! |--------|----------------------------------------------|
//! | Box    | 1 pointer (anchor) + 1 accepted name         |
//! | Link   | 2 pointers (box or implicit anchor) + 1 name |
//! | Select | an even, non-zero number of pointers         |
//! | Null   | nothing                                      |

use crate::element::{
    BoxElement, Element, ElementKind, LinkElement, LinkEnd, NullElement, SelectElement,
};
use crate::event::{Event, PointerEvent};
use crate::geometry::{ANCHOR_SIZE, BOX_SIZE};
use crate::model::{DiagramModel, ModelPatch};
use crate::prompt::Prompt;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

const DEFAULT_BOX_NAME: &str = "Box";
const DEFAULT_LINK_NAME: &str = "link";

/// Output of one build step.
#[derive(Debug, Clone, PartialEq)]
pub struct Build {
    pub prompts: Vec<Prompt>,
    pub element: Element,
    pub patch: ModelPatch,
}

impl Build {
    /// No blocking prompt left: `element` is final.
    pub fn is_complete(&self) -> bool {
        !self.prompts.iter().any(|p| p.is_blocking())
    }

    pub fn messages(&self) -> Vec<String> {
        self.prompts.iter().map(ToString::to_string).collect()
    }
}

impl ElementKind {
    pub fn build(self, inputs: &[Event], model: &DiagramModel) -> Build {
        let build = match self {
            ElementKind::Box => build_box(inputs),
            ElementKind::Link => build_link(inputs, model),
            ElementKind::Select => build_select(inputs, model),
            ElementKind::Null => build_null(),
        };
        log::debug!(
            "build {} over {} inputs: {:?}",
            self.label(),
            inputs.len(),
            build.prompts
        );
        build
    }
}

// ─── Names ───────────────────────────────────────────────────────────────

enum NameInput<'a> {
    Accepted(&'a str),
    Typing(&'a str),
    Missing,
}

/// The first finished key event names the element. Until then the latest
/// unfinished buffer is only a preview. Cancel keys never name anything.
fn name_input(inputs: &[Event]) -> NameInput<'_> {
    let mut typing = None;
    for key in inputs
        .iter()
        .filter_map(Event::as_key)
        .filter(|k| !k.key.is_cancel())
    {
        if key.finished {
            return NameInput::Accepted(&key.buffer);
        }
        typing = Some(key.buffer.as_str());
    }
    typing.map_or(NameInput::Missing, NameInput::Typing)
}

fn resolve_name(
    inputs: &[Event],
    default: &str,
    missing: Prompt,
    prompts: &mut Vec<Prompt>,
) -> String {
    match name_input(inputs) {
        NameInput::Accepted(name) => name.to_string(),
        NameInput::Typing(name) => {
            prompts.push(missing);
            name.to_string()
        }
        NameInput::Missing => {
            prompts.push(missing);
            default.to_string()
        }
    }
}

// ─── Box ─────────────────────────────────────────────────────────────────

fn build_box(inputs: &[Event]) -> Build {
    let mut prompts = Vec::new();

    let anchor = match inputs.iter().find_map(Event::as_pointer) {
        Some(p) => p.model_point,
        None => {
            prompts.push(Prompt::BoxPosition);
            Point::ORIGIN
        }
    };
    let name = resolve_name(inputs, DEFAULT_BOX_NAME, Prompt::BoxName, &mut prompts);

    let rect = Rect::from_points(anchor, anchor + BOX_SIZE);
    Build {
        prompts,
        element: Element::Box(BoxElement::new(name, rect)),
        patch: ModelPatch::default(),
    }
}

// ─── Link ────────────────────────────────────────────────────────────────

/// Reuse the committed box under the pointer, or synthesize an implicit
/// 1×1 anchor box at `point`.
fn link_end(event: Option<&PointerEvent>, point: Point, model: &DiagramModel) -> LinkEnd {
    if let Some(id) = event.and_then(|e| e.target)
        && model.get_box(id).is_some()
    {
        return LinkEnd::Committed(id);
    }
    let rect = Rect::from_points(point, point + ANCHOR_SIZE);
    LinkEnd::Pending(Box::new(BoxElement::new("", rect)))
}

fn build_link(inputs: &[Event], model: &DiagramModel) -> Build {
    let anchors: SmallVec<[&PointerEvent; 2]> =
        inputs.iter().filter_map(Event::as_pointer).take(2).collect();

    let mut prompts = Vec::new();
    match anchors.len() {
        0 => prompts.push(Prompt::FirstBox),
        1 => prompts.push(Prompt::SecondBox),
        _ => {}
    }

    let first = anchors.first().copied();
    let second = anchors.get(1).copied();
    let first_point = first.map_or(Point::ORIGIN, |p| p.model_point);
    let second_point = second.map_or(first_point, |p| p.model_point);
    let source = link_end(first, first_point, model);
    let target = link_end(second, second_point, model);

    let name = resolve_name(inputs, DEFAULT_LINK_NAME, Prompt::LinkName, &mut prompts);
    Build {
        prompts,
        element: Element::Link(LinkElement::new(name, source, target)),
        patch: ModelPatch::default(),
    }
}

// ─── Select ──────────────────────────────────────────────────────────────

fn build_select(inputs: &[Event], model: &DiagramModel) -> Build {
    let mut patch = ModelPatch::default();

    // A cancel key wipes the selection and everything typed before it.
    let cancel = inputs
        .iter()
        .rposition(|e| e.as_key().is_some_and(|k| k.key.is_cancel()));
    let live = match cancel {
        Some(i) => {
            patch.clear_selection = true;
            patch.clear_inputs = true;
            &inputs[i + 1..]
        }
        None => inputs,
    };

    let points: SmallVec<[Point; 4]> = live
        .iter()
        .filter_map(Event::as_pointer)
        .map(|p| p.model_point)
        .collect();

    let mut marquee = SelectElement::new(Rect::ZERO);
    let prompt = match points.len() {
        0 => Prompt::SelectStart,
        n if n % 2 == 1 => {
            let p = points[n - 1];
            marquee.rect = Rect::from_points(p, p);
            Prompt::SelectEnd
        }
        n => {
            let (start, end) = (points[n - 2], points[n - 1]);
            marquee.rect = Rect::from_points(start, end);
            marquee.rtl = start.x < end.x;
            marquee.selection = if marquee.rtl {
                model.find_inside(marquee.rect)
            } else {
                model.find_crossing(marquee.rect)
            };
            patch.extend_selection = marquee.selection.clone();
            Prompt::SelectionReady
        }
    };

    patch.feedback = Some(vec![Element::Select(marquee.clone())]);
    Build {
        prompts: vec![prompt],
        element: Element::Select(marquee),
        patch,
    }
}

// ─── Null ────────────────────────────────────────────────────────────────

fn build_null() -> Build {
    Build {
        prompts: vec![Prompt::NullDrawable],
        element: Element::Null(NullElement::new()),
        patch: ModelPatch::default(),
    }
}
