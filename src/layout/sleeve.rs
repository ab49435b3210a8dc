//! Open-ended sleeve insert.
//!
//! A linear net: front strip, bottom strip, main panel and glue tab run left
//! to right, with the side wings folded up from the main panel.

use serde::Serialize;

use super::{Flap, FlapKind, Panel, draw_panel, union};
use crate::canvas::{Canvas, FillMode, Segment};
use crate::geometry::Orientation;
use crate::log::debug;
use crate::render::defaults::{
    OUTLINE_GRAY, SLEEVE_FLAP_ATTENUATION, SLEEVE_TAB_LENGTH, SLEEVE_TAB_WIDTH,
};
use crate::render::{Drawer, PathBuilder};
use crate::types::{BoxMm, Length, PointMm, Size};

/// A closed outline drawn as a raw path
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Outline {
    pub start: PointMm,
    pub segments: Vec<Segment>,
}

impl Outline {
    fn from_builder(builder: PathBuilder) -> Self {
        let (start, segments) = builder.build();
        Outline { start, segments }
    }

    pub fn bounds(&self) -> BoxMm {
        let mut bb = BoxMm::new();
        let mut at = self.start;
        bb.expand_point(at);
        for segment in &self.segments {
            at = at + segment.end();
            bb.expand_point(at);
        }
        bb
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SleeveLayout {
    pub origin: PointMm,
    pub main: Panel,
    pub bottom: Panel,
    pub front: Panel,
    /// Bottom strip flaps, below then above
    pub bottom_flaps: [Flap; 2],
    /// Side wings, above then below the main panel
    pub wings: [Outline; 2],
    /// Flaps at the end of the wings, above then below
    pub side_flaps: [Flap; 2],
    pub tab: Flap,
}

impl SleeveLayout {
    /// Width of the front strip
    pub fn front_length(width: Length) -> Length {
        width / 2.0
    }

    /// Length of the net from the front strip to the tip of the tab
    pub fn net_length(width: Length, depth: Length) -> Length {
        Self::front_length(width) + depth + width + SLEEVE_TAB_LENGTH
    }

    pub fn at(width: Length, length: Length, depth: Length, origin: PointMm) -> Self {
        let p = |dx: Length, dy: Length| origin.offset(dx, dy);
        let zero = Length::ZERO;
        let front_len = Self::front_length(width);

        let main = Panel::new(origin, Size::new(width, length));
        let bot_x = -(width + depth) / 2.0;
        let bottom = Panel::new(p(bot_x, zero), Size::new(depth, length));
        let front = Panel::new(
            p(bot_x - (front_len + depth) / 2.0, zero),
            Size::new(front_len, length),
        );

        let flap_len = front_len.min(depth);
        let bottom_flap = |dy: Length, orientation| {
            Flap::new(
                p(bot_x, dy),
                Size::new(depth, flap_len),
                FlapKind::Inside,
                orientation,
            )
        };
        let bottom_flaps = [
            bottom_flap((length + flap_len) / 2.0, Orientation::Down),
            bottom_flap(-(length + flap_len) / 2.0, Orientation::Up),
        ];

        let (w, d, f) = (width.raw(), depth.raw(), front_len.raw());
        let mut upper = PathBuilder::new(p(-width / 2.0, -length / 2.0));
        upper.line_by(0.0, -d).line_by(f, 0.0).line_by(w - f, d);
        let mut lower = PathBuilder::new(p(-width / 2.0, length / 2.0));
        lower.line_by(0.0, d).line_by(f, 0.0).line_by(w - f, -d);
        let wings = [Outline::from_builder(upper), Outline::from_builder(lower)];

        let lr_len = (length / 2.0).min(depth);
        let lr_x = -(width - front_len) / 2.0;
        let lr_dy = length / 2.0 + depth + lr_len / 2.0;
        let side_flap = |dy: Length, orientation| {
            Flap::new(
                p(lr_x, dy),
                Size::new(front_len, lr_len),
                FlapKind::Inside,
                orientation,
            )
        };
        let side_flaps = [
            side_flap(-lr_dy, Orientation::Up),
            side_flap(lr_dy, Orientation::Down),
        ];

        let tab = Flap::new(
            p(width / 2.0 + SLEEVE_TAB_LENGTH / 2.0, zero),
            Size::new(SLEEVE_TAB_WIDTH, SLEEVE_TAB_LENGTH),
            FlapKind::Curved,
            Orientation::Right,
        );

        SleeveLayout {
            origin,
            main,
            bottom,
            front,
            bottom_flaps,
            wings,
            side_flaps,
            tab,
        }
    }

    /// Lay the net out so its length is centered on `page_center`.
    pub fn centered(width: Length, length: Length, depth: Length, page_center: PointMm) -> Self {
        let to_main_center = Self::front_length(width) + depth + width / 2.0;
        let dx = -Self::net_length(width, depth) / 2.0 + to_main_center;
        Self::at(width, length, depth, page_center.offset(dx, Length::ZERO))
    }

    pub fn panels(&self) -> [&Panel; 3] {
        [&self.main, &self.bottom, &self.front]
    }

    /// Every flap, tab last
    pub fn flaps(&self) -> [&Flap; 5] {
        [
            &self.bottom_flaps[0],
            &self.bottom_flaps[1],
            &self.side_flaps[0],
            &self.side_flaps[1],
            &self.tab,
        ]
    }

    pub fn bounds(&self) -> BoxMm {
        union(
            self.panels()
                .into_iter()
                .map(Panel::bounds)
                .chain(self.flaps().into_iter().map(Flap::bounds))
                .chain(self.wings.iter().map(Outline::bounds)),
        )
    }
}

/// Draw the sleeve net centered on the current page.
pub fn draw_sleeve<C: Canvas>(
    d: &mut Drawer<C>,
    width: Length,
    length: Length,
    depth: Length,
    fill: FillMode,
) -> SleeveLayout {
    let page_center = d.reset_origin();
    let layout = SleeveLayout::centered(width, length, depth, page_center);
    d.set_origin(layout.origin);
    debug!(
        width = width.raw(),
        length = length.raw(),
        depth = depth.raw(),
        net_length = SleeveLayout::net_length(width, depth).raw(),
        "sleeve layout"
    );

    d.set_stroke_color(OUTLINE_GRAY);
    for panel in layout.panels() {
        draw_panel(d, panel, fill);
    }
    for flap in &layout.bottom_flaps {
        d.trap(
            flap.center,
            flap.size,
            SLEEVE_FLAP_ATTENUATION,
            flap.orientation,
            fill,
        );
    }
    for wing in &layout.wings {
        d.path(wing.start, &wing.segments, fill, true);
    }
    for flap in &layout.side_flaps {
        d.trap(
            flap.center,
            flap.size,
            SLEEVE_FLAP_ATTENUATION,
            flap.orientation,
            fill,
        );
    }
    d.flap(
        layout.tab.center,
        layout.tab.size,
        SLEEVE_TAB_LENGTH / 2.0,
        layout.tab.orientation,
        fill,
    );

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{PaperSize, Recorder};
    use crate::layout::rotated_outlines;
    use crate::types::pt;

    const EPSILON: f64 = 1e-9;

    fn close(a: Length, b: Length) -> bool {
        (a.raw() - b.raw()).abs() < EPSILON
    }

    fn deck() -> SleeveLayout {
        SleeveLayout::at(Length(64.0), Length(89.0), Length(13.0), pt(0.0, 0.0))
    }

    #[test]
    fn strips_abut_the_main_panel() {
        let s = deck();
        assert!(close(s.front.right(), s.bottom.left()));
        assert!(close(s.bottom.right(), s.main.left()));
        assert!(close(s.front.size.w, Length(32.0)));
    }

    #[test]
    fn wings_close_on_the_main_panel_edge() {
        let s = deck();
        for wing in &s.wings {
            let bb = wing.bounds();
            assert!(close(bb.min.x, s.main.left()));
            assert!(close(bb.max.x, s.main.right()));
            assert!(close(bb.height(), Length(13.0)));
        }
        assert!(close(s.wings[0].bounds().max.y, s.main.top()));
        assert!(close(s.wings[1].bounds().min.y, s.main.bottom()));
    }

    #[test]
    fn side_flaps_sit_beyond_the_wings() {
        let s = deck();
        assert!(
            close(s.side_flaps[0].bounds().max.y, s.wings[0].bounds().min.y)
        );
        assert!(
            close(s.side_flaps[1].bounds().min.y, s.wings[1].bounds().max.y)
        );
        // Centered on the flat top of the wing, which is the front length wide.
        assert!(close(s.side_flaps[0].center.x, Length(-16.0)));
    }

    #[test]
    fn tab_hangs_off_the_open_end() {
        let s = deck();
        let bb = s.tab.bounds();
        assert!(close(bb.min.x, s.main.right()));
        assert!(close(bb.width(), SLEEVE_TAB_LENGTH));
        assert!(close(bb.height(), SLEEVE_TAB_WIDTH));
    }

    #[test]
    fn centered_along_its_length() {
        let center = pt(148.5, 105.0);
        let s = SleeveLayout::centered(Length(64.0), Length(89.0), Length(13.0), center);
        let bb = s.bounds();
        assert!(close(bb.center().x, center.x), "{:?}", bb.center());
        assert!(
            close(bb.width(), SleeveLayout::net_length(Length(64.0), Length(13.0)))
        );
    }

    #[test]
    fn tab_folds_out_right_of_the_main_panel() {
        let mut d = Drawer::new(Recorder::new(PaperSize::A4));
        let layout = draw_sleeve(
            &mut d,
            Length(64.0),
            Length(89.0),
            Length(13.0),
            FillMode::StrokeAndFill,
        );
        let outlines = rotated_outlines(d.canvas().commands(), d.page_height());

        let right = layout.main.right().raw();
        let tab = outlines.last().expect("the tab is drawn rotated");
        assert!(tab.iter().all(|p| p.x >= right - EPSILON), "{tab:?}");
        let max_x = tab.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert!(
            (max_x - right - SLEEVE_TAB_LENGTH.raw()).abs() < 1e-6,
            "{tab:?}"
        );
    }

    #[test]
    fn draws_three_panels_four_flaps_two_wings_and_a_tab() {
        let mut d = Drawer::new(Recorder::new(PaperSize::A4));
        draw_sleeve(
            &mut d,
            Length(64.0),
            Length(89.0),
            Length(13.0),
            FillMode::StrokeAndFill,
        );
        insta::assert_snapshot!(
            d.canvas().summary(0),
            @"rect rect rect path path path path path path path"
        );
    }
}
