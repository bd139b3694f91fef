//! Pan/zoom state and the model ↔ screen mapping.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use std::time::{Duration, Instant};

/// Screen-space offset plus uniform scale.
///
/// `transform()` maps model → screen as `translate(offset) * scale(scale)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset: Vec2,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(offset: Vec2, scale: f64) -> Self {
        Self { offset, scale }
    }

    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    pub fn model_to_screen(&self, point: Point) -> Point {
        self.transform() * point
    }

    /// Inverse mapping. A degenerate transform maps points through unchanged.
    pub fn screen_to_model(&self, point: Point) -> Point {
        let transform = self.transform();
        let det = transform.determinant();
        if det == 0.0 || !det.is_finite() {
            log::warn!("viewport transform not invertible (scale {})", self.scale);
            return point;
        }
        transform.inverse() * point
    }

    /// Zoom about `pointer` (screen coordinates) by a wheel `delta`.
    ///
    /// The factor is `1 + delta / sensitivity`; the model point under the
    /// pointer stays put. Returns the applied factor.
    ///
    /// A non-positive sensitivity, or a step that would flip or collapse the
    /// scale, leaves the viewport unchanged and returns 1.
    pub fn zoom_at(&mut self, pointer: Point, delta: f64, sensitivity: f64) -> f64 {
        if !(sensitivity.is_finite() && sensitivity > 0.0) {
            log::warn!("ignoring zoom with sensitivity {sensitivity}");
            return 1.0;
        }
        let factor = 1.0 + delta / sensitivity;
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("ignoring zoom step {delta} (factor {factor})");
            return 1.0;
        }
        let anchor = pointer.to_vec2();
        self.scale *= factor;
        self.offset = anchor - (anchor - self.offset) * factor;
        factor
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Model-space rectangle currently visible on a canvas of `size` pixels.
    pub fn visible_rect(&self, size: Size) -> Rect {
        let origin = self.screen_to_model(Point::ORIGIN);
        let corner = self.screen_to_model(Point::new(size.width, size.height));
        Rect::from_points(origin, corner)
    }
}

/// Debounce for wheel zooming.
///
/// Each wheel step pushes the deadline out by `window`; `poll` reports once
/// when the deadline has passed, meaning the zoom has settled.
#[derive(Debug, Clone)]
pub struct ZoomSettle {
    window: Duration,
    deadline: Option<Instant>,
}

impl ZoomSettle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// `true` exactly once per settled burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(deadline) = self.deadline
            && now >= deadline
        {
            self.deadline = None;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
