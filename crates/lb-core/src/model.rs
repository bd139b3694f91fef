//! The diagram model: committed elements, selection and feedback overlay.
//!
//! Boxes are nodes and links are edges of a `StableDiGraph`; self-links are
//! self-loops. The graph is the arena that owns every committed element,
//! indexed by `ElementId`. Insertion order is kept separately as the
//! z-order used for painting and hit testing.

use crate::element::{BoxElement, Element, ElementRef, LinkElement, LinkEnd, Metadata};
use crate::error::ModelError;
use crate::geometry::{
    LINK_ANCHOR_OFFSET, LINK_DIRECTION_BIAS, LINK_ROW_SPACING, encloses, top_left, top_right,
    touches,
};
use crate::id::ElementId;
use kurbo::{Point, Rect, Vec2};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use std::collections::HashMap;

/// Where a committed element lives in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Box(NodeIndex),
    Link(EdgeIndex),
}

/// Side effects a `build` asks for, applied by the tool that ran it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelPatch {
    /// Empty the selection before extending it.
    pub clear_selection: bool,
    /// Ids appended to the selection (duplicates skipped).
    pub extend_selection: Vec<ElementId>,
    /// Replacement for the feedback overlay, if any.
    pub feedback: Option<Vec<Element>>,
    /// Ask the owning tool to drop its accumulated inputs.
    pub clear_inputs: bool,
}

impl ModelPatch {
    pub fn is_empty(&self) -> bool {
        !self.clear_selection
            && self.extend_selection.is_empty()
            && self.feedback.is_none()
            && !self.clear_inputs
    }
}

#[derive(Debug, Clone)]
pub struct DiagramModel {
    graph: StableDiGraph<BoxElement, LinkElement>,
    id_index: HashMap<ElementId, Slot>,
    /// Committed ids in insertion (z) order.
    drawables: Vec<ElementId>,
    /// Insertion-ordered, no duplicates.
    selection: Vec<ElementId>,
    /// Transient overlay supplied by the active tool.
    feedback: Vec<Element>,
}

impl DiagramModel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            id_index: HashMap::new(),
            drawables: Vec::new(),
            selection: Vec::new(),
            feedback: Vec::new(),
        }
    }

    // ─── Commit ──────────────────────────────────────────────────────────

    /// Commit a built element. Boxes and links are adopted; marquees and
    /// null elements are transient and yield `Ok(None)`.
    pub fn add(&mut self, element: Element) -> Result<Option<ElementId>, ModelError> {
        match element {
            Element::Box(b) => self.add_box(b).map(Some),
            Element::Link(l) => self.add_link(l).map(Some),
            Element::Select(_) | Element::Null(_) => {
                log::debug!("skipping transient {:?}", element.kind());
                Ok(None)
            }
        }
    }

    pub fn add_box(&mut self, mut b: BoxElement) -> Result<ElementId, ModelError> {
        if self.id_index.contains_key(&b.id) {
            return Err(ModelError::DuplicateId(b.id));
        }
        let id = b.id;
        b.rect = b.rect.abs();
        b.links.clear();
        let idx = self.graph.add_node(b);
        self.id_index.insert(id, Slot::Box(idx));
        self.drawables.push(id);
        log::info!("added box {id}");
        Ok(id)
    }

    /// Commit a link. Pending endpoint boxes are committed first, in the
    /// same call; nothing is changed if validation fails.
    pub fn add_link(&mut self, mut link: LinkElement) -> Result<ElementId, ModelError> {
        let id = link.id;
        if self.id_index.contains_key(&id) {
            return Err(ModelError::DuplicateId(id));
        }
        for end in [&link.source, &link.target] {
            match end {
                LinkEnd::Committed(box_id) => {
                    if !matches!(self.id_index.get(box_id), Some(Slot::Box(_))) {
                        return Err(ModelError::DanglingEndpoint {
                            link: id,
                            endpoint: *box_id,
                        });
                    }
                }
                LinkEnd::Pending(b) => {
                    if self.id_index.contains_key(&b.id) {
                        return Err(ModelError::DuplicateId(b.id));
                    }
                }
            }
        }

        let source = self.commit_end(&mut link.source)?;
        let target = self.commit_end(&mut link.target)?;
        let (Some(Slot::Box(source_idx)), Some(Slot::Box(target_idx))) =
            (self.id_index.get(&source).copied(), self.id_index.get(&target).copied())
        else {
            return Err(ModelError::DanglingEndpoint { link: id, endpoint: source });
        };

        let edge = self.graph.add_edge(source_idx, target_idx, link);
        self.id_index.insert(id, Slot::Link(edge));
        self.graph[source_idx].links.push(id);
        if target_idx != source_idx {
            self.graph[target_idx].links.push(id);
        }
        self.drawables.push(id);
        log::info!("added link {id}: {source} -> {target}");
        Ok(id)
    }

    /// Commit a pending endpoint box (if needed) and rewrite the end to
    /// reference it.
    fn commit_end(&mut self, end: &mut LinkEnd) -> Result<ElementId, ModelError> {
        let id = end.id();
        if let LinkEnd::Pending(b) = end {
            // Both ends may carry the same pending box.
            if !self.id_index.contains_key(&id) {
                self.add_box((**b).clone())?;
            }
            *end = LinkEnd::Committed(id);
        }
        Ok(id)
    }

    // ─── Lookup ──────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn contains_id(&self, id: ElementId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Committed ids in z-order.
    pub fn drawable_ids(&self) -> &[ElementId] {
        &self.drawables
    }

    /// Committed elements in z-order.
    pub fn drawables(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.drawables.iter().filter_map(|id| self.element(*id))
    }

    pub fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        match self.id_index.get(&id)? {
            Slot::Box(idx) => self.graph.node_weight(*idx).map(ElementRef::Box),
            Slot::Link(idx) => self.graph.edge_weight(*idx).map(ElementRef::Link),
        }
    }

    pub fn get_box(&self, id: ElementId) -> Option<&BoxElement> {
        match self.id_index.get(&id)? {
            Slot::Box(idx) => self.graph.node_weight(*idx),
            Slot::Link(_) => None,
        }
    }

    pub fn get_link(&self, id: ElementId) -> Option<&LinkElement> {
        match self.id_index.get(&id)? {
            Slot::Link(idx) => self.graph.edge_weight(*idx),
            Slot::Box(_) => None,
        }
    }

    /// Metadata of a committed element, looked up by identity.
    pub fn metadata(&self, id: ElementId) -> Option<&Metadata> {
        self.element(id).map(|e| e.metadata())
    }

    pub fn metadata_mut(&mut self, id: ElementId) -> Option<&mut Metadata> {
        match *self.id_index.get(&id)? {
            Slot::Box(idx) => self.graph.node_weight_mut(idx).map(|b| &mut b.metadata),
            Slot::Link(idx) => self.graph.edge_weight_mut(idx).map(|l| &mut l.metadata),
        }
    }

    pub fn boxes(&self) -> impl Iterator<Item = &BoxElement> + '_ {
        self.drawables().filter_map(|e| match e {
            ElementRef::Box(b) => Some(b),
            ElementRef::Link(_) => None,
        })
    }

    pub fn links(&self) -> impl Iterator<Item = &LinkElement> + '_ {
        self.drawables().filter_map(|e| match e {
            ElementRef::Link(l) => Some(l),
            ElementRef::Box(_) => None,
        })
    }

    // ─── Derived geometry ────────────────────────────────────────────────

    /// The box rect with its bottom edge extended to leave room for one
    /// label row per link on the busier side.
    pub fn display_rect(&self, b: &BoxElement) -> Rect {
        let mut outgoing = 0usize;
        let mut incoming = 0usize;
        for link in b.links.iter().filter_map(|id| self.get_link(*id)) {
            if link.source_id() == b.id {
                outgoing += 1;
            }
            if link.target_id() == b.id {
                incoming += 1;
            }
        }
        let rows = outgoing.max(incoming) as f64;
        Rect::new(b.rect.x0, b.rect.y0, b.rect.x1, b.rect.y1 + rows * LINK_ROW_SPACING)
    }

    /// The box behind a link end, committed or pending.
    pub fn end_box<'a>(&'a self, end: &'a LinkEnd) -> Option<&'a BoxElement> {
        match end {
            LinkEnd::Committed(id) => self.get_box(*id),
            LinkEnd::Pending(b) => Some(b),
        }
    }

    pub fn end_rect(&self, end: &LinkEnd) -> Option<Rect> {
        self.end_box(end).map(|b| b.rect)
    }

    /// Angle (radians) of the vector between a link's fixed anchors, used
    /// only to order parallel links deterministically.
    pub fn link_direction(&self, link: &LinkElement) -> f64 {
        let (Some(source), Some(target)) =
            (self.end_rect(&link.source), self.end_rect(&link.target))
        else {
            return 0.0;
        };
        let p1 = top_right(source) + Vec2::new(0.0, LINK_ANCHOR_OFFSET);
        let p2 = top_left(target) + Vec2::new(0.0, LINK_ANCHOR_OFFSET);
        let delta = p2 - p1 - Vec2::new(LINK_DIRECTION_BIAS, 0.0);
        delta.y.atan2(delta.x)
    }

    /// Rank of `link` among the box's outgoing links by ascending
    /// direction. Ties keep registration order; 0 if not registered.
    pub fn outgoing_order(&self, box_id: ElementId, link_id: ElementId) -> usize {
        let mut ranked = self.box_links_where(box_id, |l| l.source_id() == box_id);
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.iter().position(|(_, id)| *id == link_id).unwrap_or(0)
    }

    /// Rank of `link` among the box's incoming links by descending
    /// direction. Ties keep registration order; 0 if not registered.
    pub fn incoming_order(&self, box_id: ElementId, link_id: ElementId) -> usize {
        let mut ranked = self.box_links_where(box_id, |l| l.target_id() == box_id);
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        ranked.iter().position(|(_, id)| *id == link_id).unwrap_or(0)
    }

    fn box_links_where(
        &self,
        box_id: ElementId,
        keep: impl Fn(&LinkElement) -> bool,
    ) -> Vec<(f64, ElementId)> {
        let Some(b) = self.get_box(box_id) else {
            return Vec::new();
        };
        b.links
            .iter()
            .filter_map(|id| self.get_link(*id))
            .filter(|l| keep(*l))
            .map(|l| (self.link_direction(l), l.id))
            .collect()
    }

    // ─── Spatial queries ─────────────────────────────────────────────────

    /// Every committed element containing `point`, in drawables order.
    pub fn elements_at(&self, point: Point) -> Vec<ElementId> {
        self.drawables()
            .filter(|e| e.contains(point, self))
            .map(|e| e.id())
            .collect()
    }

    /// Boxes whose display rect lies entirely within `rect`.
    pub fn find_inside(&self, rect: Rect) -> Vec<ElementId> {
        let rect = rect.abs();
        self.boxes()
            .filter(|b| encloses(rect, self.display_rect(b)))
            .map(|b| b.id)
            .collect()
    }

    /// Boxes whose display rect shares any point with `rect`.
    pub fn find_crossing(&self, rect: Rect) -> Vec<ElementId> {
        let rect = rect.abs();
        self.boxes()
            .filter(|b| touches(rect, self.display_rect(b)))
            .map(|b| b.id)
            .collect()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    /// Append ids to the selection, skipping ones already selected.
    pub fn extend_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ElementId>,
    {
        for id in ids {
            if !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ─── Feedback overlay ────────────────────────────────────────────────

    pub fn feedback(&self) -> &[Element] {
        &self.feedback
    }

    pub fn set_feedback(&mut self, elements: Vec<Element>) {
        self.feedback = elements;
    }

    pub fn clear_feedback(&mut self) {
        self.feedback.clear();
    }

    /// Apply the side effects requested by a build.
    pub fn apply(&mut self, patch: &ModelPatch) {
        if patch.clear_selection {
            self.clear_selection();
        }
        self.extend_selection(patch.extend_selection.iter().copied());
        if let Some(feedback) = &patch.feedback {
            self.feedback = feedback.clone();
        }
    }
}

impl Default for DiagramModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SelectElement;
    use pretty_assertions::assert_eq;

    fn boxed(model: &mut DiagramModel, name: &str, x: f64, y: f64) -> ElementId {
        model
            .add_box(BoxElement::new(name, Rect::new(x, y, x + 150.0, y + 50.0)))
            .unwrap()
    }

    #[test]
    fn link_registers_on_both_boxes_once() {
        let mut model = DiagramModel::new();
        let a = boxed(&mut model, "a", 0.0, 0.0);
        let b = boxed(&mut model, "b", 300.0, 0.0);
        let l1 = model.add_link(LinkElement::between("l1", a, b)).unwrap();
        let l2 = model.add_link(LinkElement::between("l2", b, a)).unwrap();

        assert_eq!(model.get_box(a).unwrap().links(), &[l1, l2]);
        assert_eq!(model.get_box(b).unwrap().links(), &[l1, l2]);
        assert_eq!(model.drawable_ids(), &[a, b, l1, l2]);
    }

    #[test]
    fn self_link_registered_once() {
        let mut model = DiagramModel::new();
        let a = boxed(&mut model, "a", 0.0, 0.0);
        let l = model.add_link(LinkElement::between("loop", a, a)).unwrap();
        assert_eq!(model.get_box(a).unwrap().links(), &[l]);
        // One outgoing and one incoming row: max is 1.
        let r = model.display_rect(model.get_box(a).unwrap());
        assert_eq!(r.y1, 50.0 + LINK_ROW_SPACING);
    }

    #[test]
    fn dangling_endpoint_is_rejected_without_changes() {
        let mut model = DiagramModel::new();
        let a = boxed(&mut model, "a", 0.0, 0.0);
        let ghost = ElementId::intern("ghost_box");
        let link = LinkElement::between("l", a, ghost);
        let link_id = link.id;
        assert_eq!(
            model.add_link(link),
            Err(ModelError::DanglingEndpoint {
                link: link_id,
                endpoint: ghost
            })
        );
        assert_eq!(model.len(), 1);
        assert!(model.get_box(a).unwrap().links().is_empty());
    }

    #[test]
    fn duplicate_box_is_rejected() {
        let mut model = DiagramModel::new();
        let b = BoxElement::new("a", Rect::new(0.0, 0.0, 1.0, 1.0));
        model.add_box(b.clone()).unwrap();
        assert_eq!(model.add_box(b.clone()), Err(ModelError::DuplicateId(b.id)));
    }

    #[test]
    fn pending_endpoints_are_committed_with_the_link() {
        let mut model = DiagramModel::new();
        let a = boxed(&mut model, "a", 0.0, 0.0);
        let anchor = BoxElement::new("", Rect::new(500.0, 500.0, 501.0, 501.0));
        let anchor_id = anchor.id;
        let link = LinkElement::new(
            "l",
            LinkEnd::Committed(a),
            LinkEnd::Pending(Box::new(anchor)),
        );
        let l = model.add_link(link).unwrap();

        assert_eq!(model.drawable_ids(), &[a, anchor_id, l]);
        let stored = model.get_link(l).unwrap();
        assert_eq!(stored.target, LinkEnd::Committed(anchor_id));
        assert_eq!(model.get_box(anchor_id).unwrap().links(), &[l]);
    }

    #[test]
    fn transient_elements_are_not_committed() {
        let mut model = DiagramModel::new();
        let marquee = SelectElement::new(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(model.add(Element::Select(marquee)), Ok(None));
        assert!(model.is_empty());
    }

    #[test]
    fn outgoing_order_ranks_by_angle_not_insertion() {
        let mut model = DiagramModel::new();
        let a = boxed(&mut model, "a", 0.0, 0.0);
        let up = boxed(&mut model, "up", 300.0, -100.0);
        let level = boxed(&mut model, "level", 300.0, 0.0);
        let down = boxed(&mut model, "down", 300.0, 100.0);

        // Inserted in reverse angle order.
        let l_down = model.add_link(LinkElement::between("d", a, down)).unwrap();
        let l_level = model.add_link(LinkElement::between("l", a, level)).unwrap();
        let l_up = model.add_link(LinkElement::between("u", a, up)).unwrap();

        assert_eq!(model.outgoing_order(a, l_up), 0);
        assert_eq!(model.outgoing_order(a, l_level), 1);
        assert_eq!(model.outgoing_order(a, l_down), 2);
    }

    #[test]
    fn equal_angles_keep_insertion_order() {
        let mut model = DiagramModel::new();
        let a = boxed(&mut model, "a", 0.0, 0.0);
        let b = boxed(&mut model, "b", 300.0, 0.0);
        let first = model.add_link(LinkElement::between("1", a, b)).unwrap();
        let second = model.add_link(LinkElement::between("2", a, b)).unwrap();

        assert_eq!(model.outgoing_order(a, first), 0);
        assert_eq!(model.outgoing_order(a, second), 1);
        assert_eq!(model.incoming_order(b, first), 0);
        assert_eq!(model.incoming_order(b, second), 1);
        // Two outgoing rows reserved below `a`.
        let r = model.display_rect(model.get_box(a).unwrap());
        assert_eq!(r.y1, 50.0 + 2.0 * LINK_ROW_SPACING);
    }

    #[test]
    fn incoming_order_is_descending() {
        let mut model = DiagramModel::new();
        let hub = boxed(&mut model, "hub", 300.0, 0.0);
        let high = boxed(&mut model, "high", 0.0, -100.0);
        let low = boxed(&mut model, "low", 0.0, 100.0);
        let from_high = model.add_link(LinkElement::between("h", high, hub)).unwrap();
        let from_low = model.add_link(LinkElement::between("l", low, hub)).unwrap();

        // From `low` the vector points up (negative y) → smaller angle.
        assert!(model.link_direction(model.get_link(from_high).unwrap())
            > model.link_direction(model.get_link(from_low).unwrap()));
        assert_eq!(model.incoming_order(hub, from_high), 0);
        assert_eq!(model.incoming_order(hub, from_low), 1);
    }

    #[test]
    fn unregistered_link_ranks_zero() {
        let mut model = DiagramModel::new();
        let a = boxed(&mut model, "a", 0.0, 0.0);
        assert_eq!(model.outgoing_order(a, ElementId::intern("nope")), 0);
        assert_eq!(model.incoming_order(ElementId::intern("nobox"), a), 0);
    }

    #[test]
    fn hit_test_uses_display_rect() {
        let mut model = DiagramModel::new();
        let a = boxed(&mut model, "a", 0.0, 0.0);
        let b = boxed(&mut model, "b", 300.0, 0.0);
        assert!(model.elements_at(Point::new(10.0, 60.0)).is_empty());

        model.add_link(LinkElement::between("l", a, b)).unwrap();
        assert_eq!(model.elements_at(Point::new(10.0, 60.0)), vec![a]);
        assert!(model.elements_at(Point::new(200.0, 25.0)).is_empty());
    }

    #[test]
    fn inside_and_crossing_queries() {
        let mut model = DiagramModel::new();
        let inside = boxed(&mut model, "in", 10.0, 10.0);
        let straddle = boxed(&mut model, "half", 150.0, 10.0);
        let _away = boxed(&mut model, "away", 1000.0, 1000.0);

        let window = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(model.find_inside(window), vec![inside]);
        assert_eq!(model.find_crossing(window), vec![inside, straddle]);
    }

    #[test]
    fn selection_is_cumulative_without_duplicates() {
        let mut model = DiagramModel::new();
        let a = ElementId::intern("sel_a");
        let b = ElementId::intern("sel_b");
        model.extend_selection([a]);
        model.extend_selection([a, b]);
        assert_eq!(model.selection(), &[a, b]);
        assert!(model.is_selected(b));
        model.clear_selection();
        assert!(model.selection().is_empty());
    }

    #[test]
    fn patch_application() {
        let mut model = DiagramModel::new();
        let a = ElementId::intern("patch_a");
        let b = ElementId::intern("patch_b");
        model.extend_selection([a]);
        let marquee = Element::Select(SelectElement::new(Rect::ZERO));
        let patch = ModelPatch {
            clear_selection: true,
            extend_selection: vec![b],
            feedback: Some(vec![marquee.clone()]),
            clear_inputs: false,
        };
        assert!(!patch.is_empty());
        model.apply(&patch);
        assert_eq!(model.selection(), &[b]);
        assert_eq!(model.feedback(), &[marquee]);
    }

    #[test]
    fn metadata_lookup_by_identity() {
        let mut model = DiagramModel::new();
        let a = boxed(&mut model, "a", 0.0, 0.0);
        model
            .metadata_mut(a)
            .unwrap()
            .insert("owner".into(), serde_json::Value::from("ops"));
        assert_eq!(
            model.metadata(a).and_then(|m| m.get("owner")),
            Some(&serde_json::Value::from("ops"))
        );
    }
}
