//! Gesture state machine for stroke capture.

use kurbo::Point;

/// A single pen segment to stroke onto the raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// State of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CaptureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture is in progress; `last` is the most recent mapped point.
    Drawing { last: Point },
}

/// Tracks one pointer-down-to-pointer-up gesture and the content flag.
///
/// Points are not retained after the segment they close is handed out; the
/// raster is the sole record of what was drawn.
#[derive(Debug, Clone, Default)]
pub struct StrokeCapture {
    state: CaptureState,
    has_content: bool,
}

impl StrokeCapture {
    /// Create a new capture in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a gesture at the mapped point.
    ///
    /// Starting while already drawing (a missed pointer-up) begins a fresh
    /// path at the new point.
    pub fn begin(&mut self, point: Point) {
        self.state = CaptureState::Drawing { last: point };
    }

    /// Extend the gesture to the mapped point.
    ///
    /// Returns the segment to stroke immediately, or `None` when no gesture
    /// is in progress. The first successful extension of any gesture marks
    /// the pad as having content.
    pub fn extend(&mut self, point: Point) -> Option<Segment> {
        match &mut self.state {
            CaptureState::Idle => None,
            CaptureState::Drawing { last } => {
                let segment = Segment {
                    from: *last,
                    to: point,
                };
                *last = point;
                self.has_content = true;
                Some(segment)
            }
        }
    }

    /// End the gesture (pointer up or pointer leaving the surface).
    pub fn finish(&mut self) {
        self.state = CaptureState::Idle;
    }

    /// Whether a gesture is currently in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, CaptureState::Drawing { .. })
    }

    /// Whether anything has been drawn since the last clear.
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// Reset the content flag. Called only after a full clear.
    pub fn reset_content(&mut self) {
        self.has_content = false;
    }
}
