//! The signature pad controller.
//!
//! Owns the raster, the gesture state machine, pen settings and the
//! document store, and translates host events into operations on them.
//! Everything runs on the caller's thread; each operation completes before
//! the next event is handled.

use kurbo::Rect;
use sigpad_core::capture::StrokeCapture;
use sigpad_core::config::PadConfig;
use sigpad_core::geometry::{PointerInput, ViewportMapping};
use sigpad_core::intake::{DocumentStore, FileUpload, MemoryPreviews, UploadedDocument};
use sigpad_core::style::{clamp_rotation, PadColor, PenStyle};
use sigpad_raster::{SignatureSurface, SurfaceError};

use crate::download::DownloadSink;

/// Name of the standalone signature download.
pub const SIGNATURE_FILE_NAME: &str = "signature.png";

/// Host events delivered to the pad.
#[derive(Debug, Clone, PartialEq)]
pub enum PadEvent {
    /// Gesture start (mouse down or touch start).
    PointerDown(PointerInput),
    /// Gesture continuation (mouse move or touch move).
    PointerMove(PointerInput),
    /// Gesture end (mouse up or touch end).
    PointerUp,
    /// Pointer left the pad surface.
    PointerLeave,
}

/// The interactive signature pad.
pub struct SignaturePad {
    surface: SignatureSurface,
    mapping: ViewportMapping,
    capture: StrokeCapture,
    pen: PenStyle,
    rotation_degrees: f64,
    documents: DocumentStore<MemoryPreviews>,
}

impl SignaturePad {
    /// Create a pad from its configuration.
    ///
    /// The backing store is sized once here (display size times density
    /// scale) and keeps that resolution for the pad's lifetime.
    pub fn new(config: PadConfig) -> Result<Self, SurfaceError> {
        let surface = SignatureSurface::new(config.surface_width(), config.surface_height())?;
        let bounds = Rect::new(0.0, 0.0, config.display_width, config.display_height);
        let mapping = ViewportMapping::new(bounds, surface.size());
        Ok(Self {
            surface,
            mapping,
            capture: StrokeCapture::new(),
            pen: config.pen,
            rotation_degrees: 0.0,
            documents: DocumentStore::new(MemoryPreviews::new()),
        })
    }

    /// Update the pad's on-screen bounds after a layout change.
    ///
    /// Only the input mapping follows the new bounds; already-drawn raster
    /// content is not rescaled.
    pub fn set_display_bounds(&mut self, bounds: Rect) {
        self.mapping = ViewportMapping::new(bounds, self.surface.size());
    }

    /// Handle one host event.
    pub fn handle_event(&mut self, event: PadEvent) {
        match event {
            PadEvent::PointerDown(input) => {
                if let Some(point) = self.mapping.map(&input) {
                    self.capture.begin(point);
                }
            }
            PadEvent::PointerMove(input) => {
                if !self.capture.is_drawing() {
                    return;
                }
                if let Some(point) = self.mapping.map(&input) {
                    if let Some(segment) = self.capture.extend(point) {
                        self.surface.stroke_segment(segment, &self.pen);
                    }
                }
            }
            PadEvent::PointerUp | PadEvent::PointerLeave => self.capture.finish(),
        }
    }

    /// Current pen settings.
    pub fn pen(&self) -> &PenStyle {
        &self.pen
    }

    /// Set the pen color for subsequent strokes.
    pub fn set_pen_color(&mut self, color: PadColor) {
        self.pen.set_color(color);
    }

    /// Set the pen width for subsequent strokes, clamped to the allowed
    /// range.
    pub fn set_pen_width(&mut self, width: u32) {
        self.pen.set_width(width);
    }

    /// Apply a rotation slider value.
    ///
    /// The clamped angle is applied to the current raster contents about
    /// the surface center. Each application resamples pixels, so dragging
    /// the slider back does not restore the original bitmap.
    pub fn set_rotation(&mut self, degrees: f64) {
        let clamped = clamp_rotation(degrees);
        self.rotation_degrees = clamped;
        self.surface.rotate(clamped);
    }

    /// Last applied rotation slider value, in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation_degrees
    }

    /// Blank the raster and reset the content flag.
    ///
    /// Pen color, width and the rotation slider value are left untouched.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.capture.reset_content();
    }

    /// Whether anything has been drawn since the last clear.
    pub fn has_content(&self) -> bool {
        self.capture.has_content()
    }

    /// Whether a gesture is currently in progress.
    pub fn is_drawing(&self) -> bool {
        self.capture.is_drawing()
    }

    /// Whether the "click and drag to sign" hint should be shown.
    pub fn hint_visible(&self) -> bool {
        !self.capture.is_drawing() && !self.capture.has_content()
    }

    /// The raster surface.
    pub fn surface(&self) -> &SignatureSurface {
        &self.surface
    }

    /// Offer a manually selected file to the pad.
    ///
    /// Returns whether the file was accepted as the active document.
    pub fn upload(&mut self, file: FileUpload) -> bool {
        self.documents.accept(file).is_some()
    }

    /// Offer a drag-and-drop payload to the pad.
    pub fn drop_files(&mut self, files: Vec<FileUpload>) -> bool {
        self.documents.accept_drop(files).is_some()
    }

    /// The active uploaded document, if any.
    pub fn active_document(&self) -> Option<&UploadedDocument> {
        self.documents.active()
    }

    /// Export the raster as `signature.png`.
    ///
    /// Failures are logged and otherwise swallowed.
    pub fn download_signature(&self, sink: &mut dyn DownloadSink) {
        match self.surface.encode_png() {
            Ok(bytes) => {
                if let Err(err) = sink.deliver(SIGNATURE_FILE_NAME, &bytes) {
                    log::error!("failed to deliver {SIGNATURE_FILE_NAME}: {err}");
                }
            }
            Err(err) => log::error!("failed to encode signature: {err}"),
        }
    }

    /// Flatten the raster onto page 1 of the active document and export it
    /// as `signed_<name>`.
    ///
    /// A no-op when no document is selected. Failures anywhere in the
    /// load/embed/save chain are logged and otherwise swallowed.
    pub fn save_document(&self, sink: &mut dyn DownloadSink) {
        let Some(document) = self.documents.active() else {
            return;
        };
        match sigpad_pdf::overlay_signature(&document.bytes, &self.surface) {
            Ok(bytes) => {
                let name = sigpad_pdf::signed_file_name(&document.name);
                if let Err(err) = sink.deliver(&name, &bytes) {
                    log::error!("failed to deliver {name}: {err}");
                }
            }
            Err(err) => log::error!("failed to sign {}: {err}", document.name),
        }
    }
}
