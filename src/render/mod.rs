//! Drawing engine: primitives for template nets on top of a [`Canvas`].
//!
//! This module is organized into submodules:
//! - `defaults`: the constants table
//! - `path_builder`: relative segment paths
//!
//! The [`Drawer`] owns the canvas and the working origin. Builders position
//! everything with [`Drawer::p`], relative to that origin, and hand centers
//! and sizes to the primitives here. Rotated shapes are drawn upright inside
//! [`Drawer::with_rotation`], which brackets the rotation in a saved graphics
//! state.

pub mod defaults;
pub mod path_builder;

pub use path_builder::PathBuilder;

use crate::canvas::{Canvas, FillMode, FontWeight, ImageHandle, Segment};
use crate::geometry::{Orientation, rotation_about};
use crate::log::debug;
use crate::types::{Length, PointMm, Rgb, SizeMm, pt};

use defaults::{FONT_FAMILY, TEXT_HEIGHT_RATIO};

/// Canvas plus working origin
#[derive(Debug)]
pub struct Drawer<C> {
    canvas: C,
    center: PointMm,
}

impl<C: Canvas> Drawer<C> {
    /// Start drawing on `canvas` with the origin at the page center.
    pub fn new(canvas: C) -> Self {
        let mut drawer = Drawer {
            canvas,
            center: PointMm::default(),
        };
        drawer.reset_origin();
        drawer
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Current working origin
    pub fn center(&self) -> PointMm {
        self.center
    }

    pub fn page_center(&self) -> PointMm {
        let page = self.canvas.page_size();
        pt(page.w.raw() / 2.0, page.h.raw() / 2.0)
    }

    pub fn page_height(&self) -> Length {
        self.canvas.page_size().h
    }

    /// Move the origin back to the page center and return it.
    pub fn reset_origin(&mut self) -> PointMm {
        self.center = self.page_center();
        self.center
    }

    /// Move the origin to an arbitrary page point.
    pub fn set_origin(&mut self, origin: PointMm) {
        debug!(x = origin.x.raw(), y = origin.y.raw(), "origin");
        self.center = origin;
    }

    /// Page point at `(dx, dy)` from the origin
    pub fn p(&self, dx: Length, dy: Length) -> PointMm {
        self.center.offset(dx, dy)
    }

    pub fn new_page(&mut self) {
        self.canvas.new_page();
    }

    pub fn set_line_width(&mut self, width: Length) {
        self.canvas.set_line_width(width);
    }

    /// Alternating dash and gap lengths in millimetres
    pub fn set_dash_pattern(&mut self, dashes: &[f64]) {
        self.canvas.set_dash_pattern(dashes);
    }

    /// Solid strokes
    pub fn set_solid(&mut self) {
        self.set_dash_pattern(&[]);
    }

    pub fn set_stroke_color(&mut self, color: Rgb) {
        self.canvas.set_stroke_color(color);
    }

    /// Sets the fill color when there is one and reports how shapes should
    /// be painted.
    pub fn use_fill(&mut self, fill: Option<Rgb>) -> FillMode {
        if let Some(color) = fill {
            self.canvas.set_fill_color(color);
        }
        FillMode::for_fill(fill)
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.canvas.set_text_color(color);
    }

    pub fn set_font(&mut self, weight: FontWeight) {
        self.canvas.set_font(FONT_FAMILY, weight);
    }

    /// Run `body` with the coordinate system rotated by `angle` radians
    /// (counter-clockwise as seen on the page) about `pivot`.
    ///
    /// The previous graphics state is restored when `body` returns.
    pub fn with_rotation<R>(
        &mut self,
        pivot: PointMm,
        angle: f64,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let matrix = rotation_about(pivot, self.page_height(), angle);
        self.canvas.save_state();
        self.canvas.concat_transform(matrix);
        let result = body(self);
        self.canvas.restore_state();
        result
    }

    /// Axis-aligned rectangle centered on `center`
    pub fn rect(&mut self, center: PointMm, size: SizeMm, fill: FillMode) {
        self.canvas.rect(center - size.half(), size, fill);
    }

    pub fn line(&mut self, from: PointMm, to: PointMm) {
        self.canvas.line(from, to);
    }

    pub fn path(&mut self, start: PointMm, segments: &[Segment], fill: FillMode, closed: bool) {
        self.canvas.path(start, segments, fill, closed);
    }

    fn oriented_path(
        &mut self,
        center: PointMm,
        orientation: Orientation,
        outline: PathBuilder,
        fill: FillMode,
    ) {
        let (start, segments) = outline.build();
        self.with_rotation(center, orientation.angle(), |d| {
            d.path(start, &segments, fill, true);
        });
    }

    /// Bottom-left corner of an upright shape, where every outline starts
    fn outline_start(center: PointMm, size: SizeMm) -> PathBuilder {
        PathBuilder::new(center.offset(-size.w / 2.0, size.h / 2.0))
    }

    /// Flap with both free corners rounded by `attenuation`.
    ///
    /// Drawn pointing up, hinged on the bottom edge, then turned to
    /// `orientation` about its center.
    pub fn flap(
        &mut self,
        center: PointMm,
        size: SizeMm,
        attenuation: Length,
        orientation: Orientation,
        fill: FillMode,
    ) {
        let (w, h, a) = (size.w.raw(), size.h.raw(), attenuation.raw());
        let mut outline = Self::outline_start(center, size);
        outline
            .line_by(w, 0.0)
            .line_by(0.0, a - h)
            .curve_by((0.0, -a), (-a, -a), (-a, -a))
            .line_by(-(w - 2.0 * a), 0.0)
            .curve_by((-a, 0.0), (-a, a), (-a, a));
        self.oriented_path(center, orientation, outline, fill);
    }

    /// Flap with a single rounded corner: top-left when `flip` is set,
    /// top-right otherwise.
    pub fn flap_single(
        &mut self,
        center: PointMm,
        size: SizeMm,
        attenuation: Length,
        orientation: Orientation,
        flip: bool,
        fill: FillMode,
    ) {
        let (w, h, a) = (size.w.raw(), size.h.raw(), attenuation.raw());
        let mut outline = Self::outline_start(center, size);
        outline.line_by(w, 0.0);
        if flip {
            outline
                .line_by(0.0, -h)
                .line_by(a - w, 0.0)
                .curve_by((-a, 0.0), (-a, a), (-a, a));
        } else {
            outline
                .line_by(0.0, a - h)
                .curve_by((0.0, -a), (-a, -a), (-a, -a))
                .line_by(a - w, 0.0);
        }
        self.oriented_path(center, orientation, outline, fill);
    }

    /// Trapezoid flap: the free edge is `2 * attenuation` shorter than the
    /// hinge, with equal slants on both sides.
    pub fn trap(
        &mut self,
        center: PointMm,
        size: SizeMm,
        attenuation: Length,
        orientation: Orientation,
        fill: FillMode,
    ) {
        let (w, h, a) = (size.w.raw(), size.h.raw(), attenuation.raw());
        let mut outline = Self::outline_start(center, size);
        outline
            .line_by(w, 0.0)
            .line_by(-a, -h)
            .line_by(-(w - 2.0 * a), 0.0);
        self.oriented_path(center, orientation, outline, fill);
    }

    /// Draw `text` so its visual center lands on `center`, reading in the
    /// direction given by `orientation`.
    pub fn centered_text(
        &mut self,
        text: &str,
        center: PointMm,
        size_pt: f64,
        orientation: Orientation,
    ) {
        let metrics = self.canvas.text_metrics(text, size_pt);
        let w = metrics.width.raw();
        let h = (metrics.line_height * TEXT_HEIGHT_RATIO).raw();
        let (sin, cos) = orientation.angle().sin_cos();
        let rv_x = w / 2.0 * cos - h / 2.0 * sin;
        let rv_y = w / 2.0 * sin + h / 2.0 * cos;
        let origin = pt(center.x.raw() - rv_x, center.y.raw() + rv_y);
        self.canvas.text(text, origin, size_pt, orientation.degrees());
    }

    /// Image stretched over the rectangle centered on `center`
    pub fn image(&mut self, image: &ImageHandle, center: PointMm, size: SizeMm, rotation: f64) {
        self.canvas.image(image, center - size.half(), size, rotation);
    }
}
