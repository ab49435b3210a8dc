//! Template nets as pure data, and the code that hands them to a [`Drawer`].
//!
//! Each builder first computes a layout: every panel and flap as a center and
//! an upright size, positioned from its neighbours. Drawing is a second pass
//! over that data.

pub mod sleeve;
pub mod tray;
pub mod tuckbox;

use serde::Serialize;

use crate::canvas::{Canvas, FillMode};
use crate::geometry::Orientation;
use crate::render::Drawer;
use crate::render::defaults::INSIDE_FLAP_ATTENUATION;
use crate::types::{BoxMm, Length, PointMm, Size, SizeMm};

/// Axis-aligned face of a net
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Panel {
    pub center: PointMm,
    pub size: SizeMm,
}

impl Panel {
    pub fn new(center: PointMm, size: SizeMm) -> Self {
        Panel { center, size }
    }

    pub fn left(&self) -> Length {
        self.center.x - self.size.w / 2.0
    }

    pub fn right(&self) -> Length {
        self.center.x + self.size.w / 2.0
    }

    pub fn top(&self) -> Length {
        self.center.y - self.size.h / 2.0
    }

    pub fn bottom(&self) -> Length {
        self.center.y + self.size.h / 2.0
    }

    pub fn bounds(&self) -> BoxMm {
        let mut bb = BoxMm::new();
        bb.expand_rect(self.center, self.size);
        bb
    }
}

/// How a flap's free edge is shaped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlapKind {
    /// Plain rectangle
    Outside,
    /// Trapezoid with both free corners cut
    Inside,
    /// Both free corners rounded
    Curved,
    /// Only the free corner on the left rounded
    CurvedLeft,
    /// Only the free corner on the right rounded
    CurvedRight,
}

/// A panel hinged to a neighbour. `size` is upright: width along the hinge,
/// height away from it, before `orientation` turns it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Flap {
    pub center: PointMm,
    pub size: SizeMm,
    pub kind: FlapKind,
    pub orientation: Orientation,
}

impl Flap {
    pub fn new(center: PointMm, size: SizeMm, kind: FlapKind, orientation: Orientation) -> Self {
        Flap {
            center,
            size,
            kind,
            orientation,
        }
    }

    /// Size as laid on the page, after turning
    pub fn footprint(&self) -> SizeMm {
        match self.orientation {
            Orientation::Left | Orientation::Right => Size::new(self.size.h, self.size.w),
            Orientation::None | Orientation::Up | Orientation::Down => self.size,
        }
    }

    pub fn bounds(&self) -> BoxMm {
        let mut bb = BoxMm::new();
        bb.expand_rect(self.center, self.footprint());
        bb
    }

    /// Corner rounding or slant for this kind of flap
    pub fn attenuation(&self) -> Length {
        match self.kind {
            FlapKind::Outside => Length::ZERO,
            FlapKind::Inside => INSIDE_FLAP_ATTENUATION,
            FlapKind::Curved => (self.size.w / 2.0).min(self.size.h),
            FlapKind::CurvedLeft | FlapKind::CurvedRight => self.size.w.min(self.size.h),
        }
    }
}

/// Merge several bounding boxes into one.
pub fn union<I: IntoIterator<Item = BoxMm>>(boxes: I) -> BoxMm {
    let mut all = BoxMm::new();
    for bb in boxes {
        if !bb.is_empty() {
            all.expand_point(bb.min);
            all.expand_point(bb.max);
        }
    }
    all
}

pub fn draw_panel<C: Canvas>(d: &mut Drawer<C>, panel: &Panel, fill: FillMode) {
    d.rect(panel.center, panel.size, fill);
}

pub fn draw_flap<C: Canvas>(d: &mut Drawer<C>, flap: &Flap, fill: FillMode) {
    let attenuation = flap.attenuation();
    match flap.kind {
        FlapKind::Outside => d.rect(flap.center, flap.size, fill),
        FlapKind::Inside => d.trap(flap.center, flap.size, attenuation, flap.orientation, fill),
        FlapKind::Curved => d.flap(flap.center, flap.size, attenuation, flap.orientation, fill),
        FlapKind::CurvedLeft => d.flap_single(
            flap.center,
            flap.size,
            attenuation,
            flap.orientation,
            true,
            fill,
        ),
        FlapKind::CurvedRight => d.flap_single(
            flap.center,
            flap.size,
            attenuation,
            flap.orientation,
            false,
            fill,
        ),
    }
}

/// Vertices of every path drawn under a rotation, mapped back to page space.
#[cfg(test)]
pub(crate) fn rotated_outlines(
    commands: &[crate::canvas::DrawCommand],
    page_height: Length,
) -> Vec<Vec<glam::DVec2>> {
    use crate::canvas::DrawCommand;
    use glam::dvec2;

    let mut active = None;
    let mut outlines = Vec::new();
    for command in commands {
        match command {
            DrawCommand::Transform { matrix } => {
                active = Some(matrix.native_to_page_space(page_height));
            }
            DrawCommand::RestoreState => active = None,
            DrawCommand::Path { start, segments, .. } => {
                let Some(m) = active else { continue };
                let mut at = *start;
                let mut points = vec![m.apply(dvec2(at.x.raw(), at.y.raw()))];
                for segment in segments {
                    at = at + segment.end();
                    points.push(m.apply(dvec2(at.x.raw(), at.y.raw())));
                }
                outlines.push(points);
            }
            _ => {}
        }
    }
    outlines
}
