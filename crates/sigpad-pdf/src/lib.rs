//! Full-bleed signature overlay onto PDF documents.
//!
//! Loads a document from raw bytes, embeds the signature raster as an image
//! XObject on the first page, stretched to exactly cover the page bounds,
//! and re-serializes the document. All other pages are left untouched.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use sigpad_raster::SignatureSurface;
use thiserror::Error;

/// Resource name under which the signature image is registered.
const OVERLAY_XOBJECT: &str = "SigOverlay";

/// Overlay errors.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("document has no pages")]
    NoPages,
    #[error("page object is not a dictionary")]
    MalformedPage,
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Page bounds from the MediaBox, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageBounds {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Derive the output name for a signed document.
pub fn signed_file_name(original: &str) -> String {
    format!("signed_{original}")
}

/// Flatten the signature raster onto page 1 of `pdf_bytes`.
///
/// The raster is embedded as a DeviceRGB image with a DeviceGray soft mask
/// carrying its alpha channel, then drawn with its origin at the page's
/// lower-left corner and scaled to the full page width and height.
/// Returns the re-serialized document.
pub fn overlay_signature(
    pdf_bytes: &[u8],
    surface: &SignatureSurface,
) -> Result<Vec<u8>, OverlayError> {
    let mut doc = Document::load_mem(pdf_bytes)?;
    let page_id = *doc.get_pages().get(&1).ok_or(OverlayError::NoPages)?;
    let bounds = page_bounds(&doc, page_id)?;

    let image_id = embed_raster(&mut doc, surface);
    install_xobject(&mut doc, page_id, image_id)?;

    log::debug!(
        "overlaying {}x{} raster onto page 1 ({} x {} pt)",
        surface.width(),
        surface.height(),
        bounds.width,
        bounds.height,
    );

    // Full-bleed placement: origin at the page's lower-left corner, scaled
    // to the page's width and height.
    let content = format!(
        "q {} 0 0 {} {} {} cm /{OVERLAY_XOBJECT} Do Q",
        bounds.width, bounds.height, bounds.x, bounds.y,
    );
    doc.add_page_contents(page_id, content.into_bytes())?;

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(lopdf::Error::from)?;
    Ok(out)
}

/// Add the raster to the document as an image XObject with a soft mask.
fn embed_raster(doc: &mut Document, surface: &SignatureSurface) -> ObjectId {
    let rgba = surface.rgba_pixels();
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(rgba.len() / 4);
    for pixel in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&pixel[..3]);
        alpha.push(pixel[3]);
    }

    let smask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => surface.width() as i64,
            "Height" => surface.height() as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        alpha,
    ));

    doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => surface.width() as i64,
            "Height" => surface.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "SMask" => smask_id,
        },
        rgb,
    ))
}

/// Register the image in the page's resource dictionary.
fn install_xobject(
    doc: &mut Document,
    page_id: ObjectId,
    image_id: ObjectId,
) -> Result<(), OverlayError> {
    let resources = {
        let page = page_dict_mut(doc, page_id)?;
        page.remove(b"Resources")
            .unwrap_or_else(|| Object::Dictionary(dictionary! {}))
    };

    match resources {
        Object::Reference(resources_id) => {
            {
                let resources = doc
                    .get_object_mut(resources_id)
                    .and_then(|obj| obj.as_dict_mut())
                    .map_err(|_| OverlayError::MalformedPage)?;
                set_xobject_entry(resources, image_id);
            }
            let page = page_dict_mut(doc, page_id)?;
            page.set("Resources", Object::Reference(resources_id));
        }
        Object::Dictionary(mut resources) => {
            set_xobject_entry(&mut resources, image_id);
            let page = page_dict_mut(doc, page_id)?;
            page.set("Resources", Object::Dictionary(resources));
        }
        _ => return Err(OverlayError::MalformedPage),
    }
    Ok(())
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary, OverlayError> {
    doc.get_object_mut(page_id)
        .and_then(|obj| obj.as_dict_mut())
        .map_err(|_| OverlayError::MalformedPage)
}

fn set_xobject_entry(resources: &mut Dictionary, image_id: ObjectId) {
    let mut xobjects = match resources.remove(b"XObject") {
        Some(Object::Dictionary(dict)) => dict,
        _ => Dictionary::new(),
    };
    xobjects.set(OVERLAY_XOBJECT, image_id);
    resources.set("XObject", Object::Dictionary(xobjects));
}

/// Resolve the page's MediaBox, walking up the page tree when inherited.
fn page_bounds(doc: &Document, page_id: ObjectId) -> Result<PageBounds, OverlayError> {
    let mut current = Some(page_id);
    while let Some(id) = current {
        let dict = doc
            .get_object(id)
            .and_then(|obj| obj.as_dict())
            .map_err(|_| OverlayError::MalformedPage)?;
        if let Some(bounds) = media_box(doc, dict) {
            return Ok(bounds);
        }
        current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
    }
    // A document without a MediaBox anywhere in its page tree is broken;
    // fall back to A4 rather than refusing to sign.
    Ok(PageBounds {
        x: 0.0,
        y: 0.0,
        width: 595.0,
        height: 842.0,
    })
}

fn media_box(doc: &Document, dict: &Dictionary) -> Option<PageBounds> {
    let raw = dict.get(b"MediaBox").ok()?;
    let resolved = match raw {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let array = resolved.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let llx = number(&array[0])?;
    let lly = number(&array[1])?;
    let urx = number(&array[2])?;
    let ury = number(&array[3])?;
    Some(PageBounds {
        x: llx,
        y: lly,
        width: urx - llx,
        height: ury - lly,
    })
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some((*value).into()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use sigpad_core::capture::Segment;
    use sigpad_core::style::PenStyle;

    /// Build a one-page PDF with the MediaBox on the page itself or on the
    /// parent Pages node.
    fn sample_pdf(media_box_on_parent: bool) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        let mut pages = dictionary! {
            "Type" => "Pages",
            "Count" => 1,
        };
        let media_box: Vec<Object> = vec![0.into(), 0.into(), 612.into(), 792.into()];
        if media_box_on_parent {
            pages.set("MediaBox", media_box);
        } else {
            page.set("MediaBox", media_box);
        }

        let page_id = doc.add_object(page);
        pages.set("Kids", vec![Object::Reference(page_id)]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    fn signed_surface() -> SignatureSurface {
        let mut surface = SignatureSurface::new(120, 40).unwrap();
        surface.stroke_segment(
            Segment {
                from: Point::new(10.0, 10.0),
                to: Point::new(100.0, 30.0),
            },
            &PenStyle::default(),
        );
        surface
    }

    #[test]
    fn test_signed_file_name() {
        assert_eq!(signed_file_name("contract.pdf"), "signed_contract.pdf");
    }

    #[test]
    fn test_overlay_installs_full_bleed_image() {
        let bytes = overlay_signature(&sample_pdf(false), &signed_surface()).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();

        // The appended content draws the overlay stretched to the page.
        let content = doc.get_page_content(page_id).unwrap();
        let content = String::from_utf8_lossy(&content);
        assert!(content.contains("/SigOverlay Do"));
        assert!(content.contains("612 0 0 792 0 0 cm"));

        // The image XObject is registered on the page resources with the
        // raster's dimensions and a soft mask.
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        let image_id = xobjects.get(b"SigOverlay").unwrap().as_reference().unwrap();
        let image = doc.get_object(image_id).unwrap().as_stream().unwrap();
        assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 120);
        assert_eq!(image.dict.get(b"Height").unwrap().as_i64().unwrap(), 40);
        assert!(image.dict.get(b"SMask").is_ok());
    }

    #[test]
    fn test_media_box_inherited_from_pages_node() {
        let bytes = overlay_signature(&sample_pdf(true), &signed_surface()).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let content = doc.get_page_content(page_id).unwrap();
        assert!(String::from_utf8_lossy(&content).contains("612 0 0 792 0 0 cm"));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = overlay_signature(b"not a pdf", &signed_surface());
        assert!(matches!(result, Err(OverlayError::Pdf(_))));
    }

    #[test]
    fn test_image_data_matches_raster() {
        let surface = signed_surface();
        let bytes = overlay_signature(&sample_pdf(false), &surface).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        let image_id = xobjects.get(b"SigOverlay").unwrap().as_reference().unwrap();
        let image = doc.get_object(image_id).unwrap().as_stream().unwrap();

        // RGB stream carries one 3-byte pixel per raster pixel.
        let expected = (surface.width() * surface.height() * 3) as usize;
        assert_eq!(image.content.len(), expected);
    }
}
