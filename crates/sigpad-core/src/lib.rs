//! SigPad Core Library
//!
//! Platform-agnostic data structures and logic for the SigPad signature pad.

pub mod capture;
pub mod config;
pub mod geometry;
pub mod intake;
pub mod style;

pub use capture::{CaptureState, Segment, StrokeCapture};
pub use config::PadConfig;
pub use geometry::{PointerInput, ViewportMapping};
pub use intake::{DocumentStore, FileUpload, MemoryPreviews, PreviewStore, UploadedDocument, PDF_MIME};
pub use style::{
    clamp_rotation, PadColor, PenStyle, MAX_PEN_WIDTH, MAX_ROTATION_DEGREES, MIN_PEN_WIDTH,
};
