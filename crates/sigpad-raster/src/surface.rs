//! The signature raster and its operations.

use kurbo::Size;
use sigpad_core::capture::Segment;
use sigpad_core::style::{PadColor, PenStyle};
use thiserror::Error;
use tiny_skia::{
    Color, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] png::EncodingError),
}

/// The signature raster.
///
/// A transparent RGBA buffer mutated in place by stroke rendering, rotation
/// and clear. Its resolution is fixed at creation.
#[derive(Clone)]
pub struct SignatureSurface {
    pixmap: Pixmap,
}

impl SignatureSurface {
    /// Create a transparent surface with the given backing-store dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(SurfaceError::InvalidDimensions { width, height })?;
        Ok(Self { pixmap })
    }

    /// Backing-store width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Backing-store height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Backing-store dimensions as a size.
    pub fn size(&self) -> Size {
        Size::new(self.pixmap.width() as f64, self.pixmap.height() as f64)
    }

    /// Stroke a single segment with the given pen.
    ///
    /// Segments are rendered immediately with round caps and joins so that
    /// consecutive short segments from frequent move events read as one
    /// continuous stroke. Unbuildable segments (non-finite coordinates) are
    /// dropped.
    pub fn stroke_segment(&mut self, segment: Segment, pen: &PenStyle) {
        let mut builder = PathBuilder::new();
        builder.move_to(segment.from.x as f32, segment.from.y as f32);
        builder.line_to(segment.to.x as f32, segment.to.y as f32);
        let Some(path) = builder.finish() else {
            log::trace!("dropping unbuildable segment {segment:?}");
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(pen.color.r, pen.color.g, pen.color.b, pen.color.a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: pen.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Rotate the current contents by `degrees` about the surface center.
    ///
    /// Copies the raster to a scratch buffer, clears the surface, and
    /// redraws the scratch contents through the rotation transform. Each
    /// call resamples existing pixels, so repeated rotations accumulate
    /// loss and are not invertible.
    pub fn rotate(&mut self, degrees: f64) {
        let scratch = self.pixmap.clone();
        self.pixmap.fill(Color::TRANSPARENT);

        let center_x = self.pixmap.width() as f32 / 2.0;
        let center_y = self.pixmap.height() as f32 / 2.0;
        let transform = Transform::from_rotate_at(degrees as f32, center_x, center_y);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };

        self.pixmap
            .draw_pixmap(0, 0, scratch.as_ref(), &paint, transform, None);
    }

    /// Blank the entire raster.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|px| px.alpha() == 0)
    }

    /// Read one pixel as a straight (demultiplied) color.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PadColor> {
        if x >= self.pixmap.width() || y >= self.pixmap.height() {
            return None;
        }
        let index = (y * self.pixmap.width() + x) as usize;
        let color = self.pixmap.pixels()[index].demultiply();
        Some(PadColor::new(
            color.red(),
            color.green(),
            color.blue(),
            color.alpha(),
        ))
    }

    /// Straight (demultiplied) RGBA bytes, row-major.
    pub fn rgba_pixels(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixmap.pixels().len() * 4);
        for px in self.pixmap.pixels() {
            let color = px.demultiply();
            rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        rgba
    }

    /// Encode the raster as an alpha-preserving PNG at backing-store
    /// resolution.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut png_data = Vec::new();
        {
            let mut encoder =
                png::Encoder::new(&mut png_data, self.pixmap.width(), self.pixmap.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.rgba_pixels())?;
        }
        Ok(png_data)
    }
}
