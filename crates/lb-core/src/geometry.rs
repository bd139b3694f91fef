//! Model-space geometry helpers and the fixed routing constants.
//!
//! All coordinates are diagram (model) units. Rectangles are `kurbo::Rect`
//! values that are kept normalized (`x0 <= x1`, `y0 <= y1`).

use kurbo::{Point, Rect, Vec2};

// ─── Constants ───────────────────────────────────────────────────────────

/// Size of a freshly built box.
pub const BOX_SIZE: Vec2 = Vec2::new(150.0, 50.0);

/// Size of the implicit box synthesized when a link end hits empty space.
pub const ANCHOR_SIZE: Vec2 = Vec2::new(1.0, 1.0);

/// Vertical space reserved per link row below a box.
pub const LINK_ROW_SPACING: f64 = 15.0;

/// Vertical offset of the first link anchor from the top edge of a box.
pub const LINK_ANCHOR_OFFSET: f64 = 25.0;

/// Horizontal bias subtracted when computing a link's direction angle.
pub const LINK_DIRECTION_BIAS: f64 = 100.0;

/// Length of the horizontal stubs at both ends of a routed link.
pub const LINK_STUB: f64 = 50.0;

// ─── Rect helpers ────────────────────────────────────────────────────────

/// Top-right corner of a normalized rect.
pub fn top_right(rect: Rect) -> Point {
    Point::new(rect.x1, rect.y0)
}

/// Top-left corner of a normalized rect.
pub fn top_left(rect: Rect) -> Point {
    Point::new(rect.x0, rect.y0)
}

/// Inclusive point containment: points on the border count as inside.
pub fn contains_point(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Whether `inner` lies entirely within `outer` (borders inclusive).
pub fn encloses(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.x1 <= outer.x1 && inner.y0 >= outer.y0 && inner.y1 <= outer.y1
}

/// Whether two rects share at least one point (touching borders count).
pub fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}
