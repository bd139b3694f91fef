//! Diagram element variants.
//!
//! `Element` is a closed union of everything a tool can build: committed
//! kinds (`Box`, `Link`) and transient ones (`Select` marquee, `Null`).
//! Construction lives in [`crate::build`], painting in [`crate::draw`].

use crate::geometry::contains_point;
use crate::id::ElementId;
use crate::model::DiagramModel;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

/// Open key/value mapping attached to boxes and links. No schema.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

// ─── Box ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct BoxElement {
    pub id: ElementId,
    pub name: String,
    /// Position and size in model space. Always normalized.
    pub rect: Rect,
    pub metadata: Metadata,
    /// Links touching this box, in registration order. Maintained by the
    /// model only.
    pub(crate) links: SmallVec<[ElementId; 4]>,
}

impl BoxElement {
    pub fn new(name: impl Into<String>, rect: Rect) -> Self {
        Self::with_id(ElementId::with_prefix("box"), name, rect)
    }

    pub fn with_id(id: ElementId, name: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            rect: rect.abs(),
            metadata: Metadata::new(),
            links: SmallVec::new(),
        }
    }

    /// Links registered on this box (as source or target).
    pub fn links(&self) -> &[ElementId] {
        &self.links
    }
}

// ─── Link ────────────────────────────────────────────────────────────────

/// One end of a link.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEnd {
    /// A box already in the diagram.
    Committed(ElementId),
    /// An implicit anchor box created by the build; committed together
    /// with the link.
    Pending(Box<BoxElement>),
}

impl LinkEnd {
    pub fn id(&self) -> ElementId {
        match self {
            LinkEnd::Committed(id) => *id,
            LinkEnd::Pending(b) => b.id,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LinkEnd::Pending(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkElement {
    pub id: ElementId,
    pub name: String,
    pub metadata: Metadata,
    pub source: LinkEnd,
    pub target: LinkEnd,
}

impl LinkElement {
    pub fn new(name: impl Into<String>, source: LinkEnd, target: LinkEnd) -> Self {
        Self {
            id: ElementId::with_prefix("link"),
            name: name.into(),
            metadata: Metadata::new(),
            source,
            target,
        }
    }

    /// A link between two committed boxes.
    pub fn between(name: impl Into<String>, source: ElementId, target: ElementId) -> Self {
        Self::new(name, LinkEnd::Committed(source), LinkEnd::Committed(target))
    }

    pub fn source_id(&self) -> ElementId {
        self.source.id()
    }

    pub fn target_id(&self) -> ElementId {
        self.target.id()
    }

    pub fn is_self_link(&self) -> bool {
        self.source_id() == self.target_id()
    }
}

// ─── Select marquee ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SelectElement {
    pub id: ElementId,
    /// Drag rectangle, normalized.
    pub rect: Rect,
    /// Elements enclosed or crossed when the marquee was built.
    pub selection: Vec<ElementId>,
    /// Left-to-right drag: "fully inside" semantics and a solid border.
    pub rtl: bool,
}

impl SelectElement {
    pub fn new(rect: Rect) -> Self {
        Self {
            id: ElementId::with_prefix("select"),
            rect: rect.abs(),
            selection: Vec::new(),
            rtl: true,
        }
    }
}

// ─── Null ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct NullElement {
    pub id: ElementId,
}

impl NullElement {
    pub fn new() -> Self {
        Self {
            id: ElementId::with_prefix("null"),
        }
    }
}

impl Default for NullElement {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// The element types a tool can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Box,
    Link,
    Select,
    Null,
}

impl ElementKind {
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Box => "Box",
            ElementKind::Link => "Link",
            ElementKind::Select => "Select",
            ElementKind::Null => "Null",
        }
    }
}

/// Any element, committed or transient.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Box(BoxElement),
    Link(LinkElement),
    Select(SelectElement),
    Null(NullElement),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Box(b) => b.id,
            Element::Link(l) => l.id,
            Element::Select(s) => s.id,
            Element::Null(n) => n.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Box(_) => ElementKind::Box,
            Element::Link(_) => ElementKind::Link,
            Element::Select(_) => ElementKind::Select,
            Element::Null(_) => ElementKind::Null,
        }
    }

    /// Display name. Marquees and null elements have none.
    pub fn name(&self) -> &str {
        match self {
            Element::Box(b) => &b.name,
            Element::Link(l) => &l.name,
            Element::Select(_) | Element::Null(_) => "",
        }
    }

    pub fn as_box(&self) -> Option<&BoxElement> {
        match self {
            Element::Box(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&LinkElement> {
        match self {
            Element::Link(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&SelectElement> {
        match self {
            Element::Select(s) => Some(s),
            _ => None,
        }
    }

    /// Hit test in model coordinates. Only boxes are hit targets.
    pub fn contains(&self, point: Point, model: &DiagramModel) -> bool {
        match self {
            Element::Box(b) => contains_point(model.display_rect(b), point),
            Element::Link(_) | Element::Select(_) | Element::Null(_) => false,
        }
    }
}

/// Borrowed view of a committed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementRef<'a> {
    Box(&'a BoxElement),
    Link(&'a LinkElement),
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> ElementId {
        match self {
            ElementRef::Box(b) => b.id,
            ElementRef::Link(l) => l.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            ElementRef::Box(b) => &b.name,
            ElementRef::Link(l) => &l.name,
        }
    }

    pub fn metadata(&self) -> &'a Metadata {
        match self {
            ElementRef::Box(b) => &b.metadata,
            ElementRef::Link(l) => &l.metadata,
        }
    }

    pub fn contains(&self, point: Point, model: &DiagramModel) -> bool {
        match self {
            ElementRef::Box(b) => contains_point(model.display_rect(b), point),
            ElementRef::Link(_) => false,
        }
    }
}
