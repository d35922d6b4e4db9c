//! SigPad application shell.
//!
//! Wires the core state machine, the raster surface and the PDF overlay
//! exporter into a single event-driven controller.

pub mod controller;
pub mod download;

pub use controller::{PadEvent, SignaturePad, SIGNATURE_FILE_NAME};
pub use download::{DirectorySink, DownloadSink};
