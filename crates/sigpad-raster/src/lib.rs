//! Raster surface for SigPad.
//!
//! The pixel buffer here is the sole representation of the drawn signature:
//! strokes mutate it in place and nothing is retained as vector paths.

pub mod surface;

pub use surface::{SignatureSurface, SurfaceError};
