//! Divider tray insert: a base with walls on every side and a finger gap
//! in the middle of both short walls.

use serde::Serialize;

use super::{Flap, FlapKind, Panel, draw_panel, union};
use crate::canvas::{Canvas, FillMode};
use crate::geometry::Orientation;
use crate::log::{debug, warn};
use crate::render::Drawer;
use crate::render::defaults::{OUTLINE_GRAY, TRAY_FLAP_ATTENUATION};
use crate::types::{BoxMm, Length, PointMm, Size};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrayLayout {
    pub origin: PointMm,
    pub base: Panel,
    /// Long walls, right then left
    pub wings: [Panel; 2],
    /// Short walls either side of the gap
    pub winglets: [Panel; 4],
    /// Glue flaps on the ends of the long walls
    pub flaps: [Flap; 4],
}

impl TrayLayout {
    /// Width of each short wall beside the finger gap, never negative
    pub fn winglet_width(width: Length, gap: Length) -> Length {
        ((width - gap) / 2.0).max(Length::ZERO)
    }

    /// Lay the net out centered on `origin`.
    pub fn at(width: Length, length: Length, depth: Length, gap: Length, origin: PointMm) -> Self {
        let p = |dx: Length, dy: Length| origin.offset(dx, dy);
        let zero = Length::ZERO;

        let base = Panel::new(origin, Size::new(width, length));

        let wing_x = width / 2.0 + depth / 2.0;
        let wing = Size::new(depth, length);
        let wings = [Panel::new(p(wing_x, zero), wing), Panel::new(p(-wing_x, zero), wing)];

        let ww = Self::winglet_width(width, gap);
        let winglet = Size::new(ww, depth);
        let (wx, wy) = ((gap + ww) / 2.0, length / 2.0 + depth / 2.0);
        let winglets = [
            Panel::new(p(wx, wy), winglet),
            Panel::new(p(-wx, wy), winglet),
            Panel::new(p(wx, -wy), winglet),
            Panel::new(p(-wx, -wy), winglet),
        ];

        let flap_len = depth.min(ww);
        let flap = Size::new(depth, flap_len);
        let fy = length / 2.0 + flap_len / 2.0;
        let flaps = [
            Flap::new(p(wing_x, fy), flap, FlapKind::Inside, Orientation::Down),
            Flap::new(p(-wing_x, fy), flap, FlapKind::Inside, Orientation::Down),
            Flap::new(p(wing_x, -fy), flap, FlapKind::Inside, Orientation::Up),
            Flap::new(p(-wing_x, -fy), flap, FlapKind::Inside, Orientation::Up),
        ];

        TrayLayout {
            origin,
            base,
            wings,
            winglets,
            flaps,
        }
    }

    pub fn bounds(&self) -> BoxMm {
        union(
            std::iter::once(&self.base)
                .chain(&self.wings)
                .chain(&self.winglets)
                .map(Panel::bounds)
                .chain(self.flaps.iter().map(Flap::bounds)),
        )
    }
}

/// Draw the tray net around the current origin.
pub fn draw_tray<C: Canvas>(
    d: &mut Drawer<C>,
    width: Length,
    length: Length,
    depth: Length,
    gap: Length,
    fill: FillMode,
) -> TrayLayout {
    if gap >= width {
        warn!(
            width = width.raw(),
            gap = gap.raw(),
            "tray gap leaves no room for end walls"
        );
    }
    let layout = TrayLayout::at(width, length, depth, gap, d.center());
    debug!(
        width = width.raw(),
        length = length.raw(),
        depth = depth.raw(),
        winglet = TrayLayout::winglet_width(width, gap).raw(),
        "tray layout"
    );

    d.set_stroke_color(OUTLINE_GRAY);
    draw_panel(d, &layout.base, fill);
    for panel in layout.wings.iter().chain(&layout.winglets) {
        draw_panel(d, panel, fill);
    }
    for flap in &layout.flaps {
        d.trap(
            flap.center,
            flap.size,
            TRAY_FLAP_ATTENUATION,
            flap.orientation,
            fill,
        );
    }

    layout
}
