//! Mapping from client-space pointer input to surface coordinates.

use kurbo::{Point, Rect, Size, Vec2};

/// Raw pointer input from the host surface, before mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    /// Mouse-originated event with a client-space position.
    Mouse { position: Point },
    /// Touch-originated event with the currently active touch points.
    Touch { touches: Vec<Point> },
}

impl PointerInput {
    /// Client-space position for this input.
    ///
    /// Touch input uses the first touch point; mouse input uses the pointer
    /// position. A touch event with no active touches has no position.
    pub fn client_position(&self) -> Option<Point> {
        match self {
            PointerInput::Mouse { position } => Some(*position),
            PointerInput::Touch { touches } => touches.first().copied(),
        }
    }
}

/// Maps client-space input onto the pad's backing store.
///
/// The backing store may be larger than the displayed size (high-density
/// scaling applied at surface creation) or differently scaled by layout, so
/// the scale factor is applied independently per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMapping {
    /// On-screen bounding rectangle of the pad, in client space.
    pub bounds: Rect,
    /// Backing-store dimensions in pixels.
    pub surface: Size,
}

impl ViewportMapping {
    /// Create a mapping from the on-screen bounds to the backing store.
    pub fn new(bounds: Rect, surface: Size) -> Self {
        Self { bounds, surface }
    }

    /// Per-axis scale factors: backing dimension over displayed dimension.
    pub fn scale(&self) -> Vec2 {
        Vec2::new(
            self.surface.width / self.bounds.width(),
            self.surface.height / self.bounds.height(),
        )
    }

    /// Map an input event to a surface-space point.
    ///
    /// Returns `None` when the input carries no position (empty touch list)
    /// or the displayed rectangle is degenerate.
    pub fn map(&self, input: &PointerInput) -> Option<Point> {
        if self.bounds.width() <= 0.0 || self.bounds.height() <= 0.0 {
            return None;
        }
        let client = input.client_position()?;
        let scale = self.scale();
        Some(Point::new(
            (client.x - self.bounds.x0) * scale.x,
            (client.y - self.bounds.y0) * scale.y,
        ))
    }
}
