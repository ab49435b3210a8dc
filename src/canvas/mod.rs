//! The drawing surface the layout engine renders onto.
//!
//! A [`Canvas`] works in page space (millimetres, top-left origin) for
//! geometry, but transforms handed to [`Canvas::concat_transform`] are in the
//! backend's native space (points, bottom-left origin). Backends keep a
//! PDF-style graphics state stack: `save_state`/`restore_state` bracket any
//! transform and style changes.

mod metrics;
mod recorder;
mod svg;

use std::path::Path;
use std::sync::Arc;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::errors::RenderError;
use crate::geometry::AffineMatrix;
use crate::types::{Length, OffsetMm, PointMm, Rgb, SizeMm, size};

pub use metrics::{HELVETICA, HELVETICA_BOLD, measure, string_unit_width};
pub use recorder::{DrawCommand, Recorder};
pub use self::svg::SvgCanvas;

/// Whether a closed shape is filled as well as outlined
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillMode {
    Stroke,
    StrokeAndFill,
}

impl FillMode {
    /// Fill only when a fill color is known.
    pub fn for_fill(fill: Option<Rgb>) -> FillMode {
        match fill {
            Some(_) => FillMode::StrokeAndFill,
            None => FillMode::Stroke,
        }
    }
}

/// One relative step of a path.
///
/// Every offset is measured from the point where the segment starts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Line { to: OffsetMm },
    Curve { c1: OffsetMm, c2: OffsetMm, to: OffsetMm },
}

impl Segment {
    /// Displacement from the start to the end of this segment
    pub fn end(&self) -> OffsetMm {
        match *self {
            Segment::Line { to } | Segment::Curve { to, .. } => to,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Size of a line of text, unrotated
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TextMetrics {
    pub width: Length,
    pub line_height: Length,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn from_extension(ext: &str) -> Option<ImageFormat> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
}

/// Already-encoded image bytes. Decoding is the embedder's business; the
/// canvas only embeds them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageHandle {
    pub format: ImageFormat,
    #[serde(skip)]
    pub data: Arc<[u8]>,
}

impl ImageHandle {
    pub fn new(format: ImageFormat, data: impl Into<Arc<[u8]>>) -> Self {
        ImageHandle {
            format,
            data: data.into(),
        }
    }
}

/// Landscape paper sizes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    pub fn size(self) -> SizeMm {
        match self {
            PaperSize::A4 => size(297.0, 210.0),
            PaperSize::Letter => size(279.4, 215.9),
        }
    }
}

/// Page-oriented vector drawing surface
#[enum_dispatch]
pub trait Canvas {
    fn page_size(&self) -> SizeMm;
    /// Number of pages, counting the current one
    fn page_count(&self) -> usize;
    fn new_page(&mut self);

    fn set_line_width(&mut self, width: Length);
    /// Dash lengths in millimetres; empty means solid.
    fn set_dash_pattern(&mut self, dashes: &[f64]);
    fn set_stroke_color(&mut self, color: Rgb);
    fn set_fill_color(&mut self, color: Rgb);
    fn set_text_color(&mut self, color: Rgb);
    fn set_font(&mut self, family: &str, weight: FontWeight);

    fn save_state(&mut self);
    /// Concatenate a native-space matrix onto the current transform.
    fn concat_transform(&mut self, matrix: AffineMatrix);
    fn restore_state(&mut self);

    fn rect(&mut self, top_left: PointMm, size: SizeMm, fill: FillMode);
    fn line(&mut self, from: PointMm, to: PointMm);
    fn path(&mut self, start: PointMm, segments: &[Segment], fill: FillMode, closed: bool);
    /// Draw `text` with its baseline starting at `origin`, rotated
    /// counter-clockwise by `angle` degrees about that origin.
    fn text(&mut self, text: &str, origin: PointMm, size_pt: f64, angle: f64);
    /// Rotation is counter-clockwise, in degrees, about `top_left`.
    fn image(&mut self, image: &ImageHandle, top_left: PointMm, size: SizeMm, rotation: f64);

    /// Measure `text` in the current font.
    fn text_metrics(&self, text: &str, size_pt: f64) -> TextMetrics;

    fn export_as_data_string(&self) -> Result<String, RenderError>;
    fn persist(&self, path: &Path) -> Result<(), RenderError>;
}

/// Any of the built-in canvases
#[enum_dispatch(Canvas)]
#[derive(Debug)]
pub enum Backend {
    Svg(SvgCanvas),
    Recorder(Recorder),
}
