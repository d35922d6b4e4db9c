//! Command-line demo for SigPad.
//!
//! Draws a sample signature and writes `signature.png` to the current
//! directory. When given a PDF path, also writes a signed copy of it.

use kurbo::Point;
use sigpad_app::{DirectorySink, PadEvent, SignaturePad};
use sigpad_core::config::PadConfig;
use sigpad_core::geometry::PointerInput;
use sigpad_core::intake::{FileUpload, PDF_MIME};

fn main() {
    env_logger::init();
    log::info!("Starting SigPad demo");

    if let Err(err) = run() {
        log::error!("sigpad demo failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut pad = SignaturePad::new(PadConfig::default())?;

    // A plausible squiggle across the pad.
    let strokes: &[&[(f64, f64)]] = &[
        &[(80.0, 180.0), (200.0, 70.0), (320.0, 190.0), (430.0, 80.0)],
        &[(430.0, 80.0), (520.0, 160.0), (640.0, 90.0), (720.0, 140.0)],
    ];
    for stroke in strokes {
        let mut points = stroke.iter().map(|&(x, y)| Point::new(x, y));
        if let Some(first) = points.next() {
            pad.handle_event(PadEvent::PointerDown(PointerInput::Mouse {
                position: first,
            }));
            for point in points {
                pad.handle_event(PadEvent::PointerMove(PointerInput::Mouse {
                    position: point,
                }));
            }
            pad.handle_event(PadEvent::PointerUp);
        }
    }

    let mut sink = DirectorySink::new(std::env::current_dir()?);
    pad.download_signature(&mut sink);

    if let Some(path) = std::env::args().nth(1) {
        let bytes = std::fs::read(&path)?;
        let name = std::path::Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        if pad.upload(FileUpload {
            name,
            mime: PDF_MIME.to_string(),
            bytes,
        }) {
            pad.save_document(&mut sink);
        }
    }

    Ok(())
}
