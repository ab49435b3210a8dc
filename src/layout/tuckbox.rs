//! The outer tuckbox net: four body panels, nine flaps, a thumb cutout,
//! cut marks and the title.
//!
//! The panels run left to right as `bottom`, `left`, `top`, `right` around
//! the working origin, which sits on the shared edge of `left` and `top`.
//! `top` is the front face and `bottom` the back; the thumb cutout is cut
//! into the back at the open end.

use serde::{Deserialize, Serialize};

use super::{Flap, FlapKind, Panel, draw_flap, draw_panel, union};
use crate::canvas::{Canvas, FillMode, FontWeight, ImageHandle};
use crate::geometry::Orientation;
use crate::log::debug;
use crate::render::defaults::{
    CUT_MARK_COLOR, CUT_MARK_LENGTH, FRONT_TITLE_OFFSET_RATIO, LR_FLAP_MAX_HEIGHT, OUTLINE_GRAY,
    SIDE_FLAP_DEPTH_RATIO, SIDE_TITLE_FONT_SIZE, THUMB_CUTOUT_RADIUS, TITLE_FONT_SIZE,
    TOP_TOP_FLAP_MIN_HEIGHT,
};
use crate::render::{Drawer, PathBuilder};
use crate::types::{BoxMm, Length, PointMm, Rgb, Size, SizeMm};

/// Every size in the net, derived from the three box dimensions
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoxSize {
    /// Front and back faces: card length across, card width down
    pub main: SizeMm,
    pub side_panel: SizeMm,
    /// Glue flap, as (depth across, card width down)
    pub side_flap: SizeMm,
    pub lr_flap: SizeMm,
    pub bt_flap: SizeMm,
    pub top_top_flap: SizeMm,
}

impl BoxSize {
    pub fn new(width: Length, length: Length, depth: Length) -> Self {
        BoxSize {
            main: Size::new(length, width),
            side_panel: Size::new(depth, width),
            side_flap: Size::new(depth * SIDE_FLAP_DEPTH_RATIO, width),
            lr_flap: Size::new(depth, depth.min(LR_FLAP_MAX_HEIGHT)),
            bt_flap: Size::new(length, depth),
            top_top_flap: Size::new(length, (depth / 2.0).max(TOP_TOP_FLAP_MIN_HEIGHT)),
        }
    }

    /// Depth of the box, which is also the width of the side panels
    pub fn depth(&self) -> Length {
        self.side_panel.w
    }

    /// Overall (length, height) of the flat net
    pub fn net_extent(&self) -> SizeMm {
        Size::new(
            self.main.w * 2.0 + self.side_panel.w * 2.0 + self.side_flap.w,
            self.main.h + self.bt_flap.h * 2.0 + self.top_top_flap.h,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PanelLayout {
    pub top: Panel,
    pub bottom: Panel,
    pub left: Panel,
    pub right: Panel,
}

impl PanelLayout {
    /// In drawing order
    pub fn all(&self) -> [(&'static str, &Panel); 4] {
        [
            ("top", &self.top),
            ("bottom", &self.bottom),
            ("left", &self.left),
            ("right", &self.right),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FlapLayout {
    pub side: Flap,
    pub bot_bot: Flap,
    pub l_bot: Flap,
    pub l_top: Flap,
    pub r_bot: Flap,
    pub r_top: Flap,
    pub top_bot: Flap,
    pub top_top: Flap,
    pub top_top_top: Flap,
}

impl FlapLayout {
    /// In drawing order
    pub fn all(&self) -> [(&'static str, &Flap); 9] {
        [
            ("side", &self.side),
            ("bot_bot", &self.bot_bot),
            ("l_bot", &self.l_bot),
            ("r_bot", &self.r_bot),
            ("l_top", &self.l_top),
            ("r_top", &self.r_top),
            ("top_bot", &self.top_bot),
            ("top_top", &self.top_top),
            ("top_top_top", &self.top_top_top),
        ]
    }
}

/// Where the title is printed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleFaces {
    /// Front face only
    #[default]
    Front,
    /// Front, back, both sides and both top flaps
    AllFaces,
}

/// One line of title text
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TitlePlacement {
    pub center: PointMm,
    pub size_pt: f64,
    pub orientation: Orientation,
}

/// Artwork stamped onto faces of the box
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageSet {
    pub front: Option<ImageHandle>,
    pub back: Option<ImageHandle>,
    /// Used for both side panels
    pub side: Option<ImageHandle>,
    /// Used for both flaps over the open end
    pub top: Option<ImageHandle>,
}

impl ImageSet {
    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_none() && self.side.is_none() && self.top.is_none()
    }
}

/// Styling and decoration for one box
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxStyle {
    pub fill: Option<Rgb>,
    pub text_color: Option<Rgb>,
    pub title: String,
    pub title_faces: TitleFaces,
    pub images: ImageSet,
}

/// The whole net, positioned on a page
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoxLayout {
    pub size: BoxSize,
    pub origin: PointMm,
    pub panels: PanelLayout,
    pub flaps: FlapLayout,
}

impl BoxLayout {
    /// Lay the net out around `origin`.
    pub fn at(size: BoxSize, origin: PointMm) -> Self {
        let p = |dx: Length, dy: Length| origin.offset(dx, dy);
        let main = size.main;
        let depth = size.depth();

        let panels = PanelLayout {
            top: Panel::new(p(main.w / 2.0, Length::ZERO), main),
            bottom: Panel::new(p(-main.w / 2.0 - depth, Length::ZERO), main),
            left: Panel::new(p(-depth / 2.0, Length::ZERO), size.side_panel),
            right: Panel::new(p(main.w + depth / 2.0, Length::ZERO), size.side_panel),
        };

        let (top, bottom) = (panels.top.center, panels.bottom.center);
        let (left, right) = (panels.left.center, panels.right.center);
        let bt_dy = (main.h + size.bt_flap.h) / 2.0;
        let lr_dy = (main.h + size.lr_flap.h) / 2.0;

        let flaps = FlapLayout {
            side: Flap::new(
                bottom.offset(-(main.w + size.side_flap.w) / 2.0, Length::ZERO),
                Size::new(size.side_flap.h, size.side_flap.w),
                FlapKind::Inside,
                Orientation::Left,
            ),
            bot_bot: Flap::new(
                bottom.offset(Length::ZERO, bt_dy),
                size.bt_flap,
                FlapKind::Inside,
                Orientation::Down,
            ),
            l_bot: Flap::new(
                left.offset(Length::ZERO, lr_dy),
                size.lr_flap,
                FlapKind::Inside,
                Orientation::Down,
            ),
            l_top: Flap::new(
                left.offset(Length::ZERO, -lr_dy),
                size.lr_flap,
                FlapKind::CurvedLeft,
                Orientation::Up,
            ),
            r_bot: Flap::new(
                right.offset(Length::ZERO, lr_dy),
                size.lr_flap,
                FlapKind::Inside,
                Orientation::Down,
            ),
            r_top: Flap::new(
                right.offset(Length::ZERO, -lr_dy),
                size.lr_flap,
                FlapKind::CurvedRight,
                Orientation::Up,
            ),
            top_bot: Flap::new(
                top.offset(Length::ZERO, bt_dy),
                size.bt_flap,
                FlapKind::Outside,
                Orientation::None,
            ),
            top_top: Flap::new(
                top.offset(Length::ZERO, -bt_dy),
                size.bt_flap,
                FlapKind::Outside,
                Orientation::None,
            ),
            top_top_top: Flap::new(
                top.offset(
                    Length::ZERO,
                    -size.bt_flap.h - (main.h + size.top_top_flap.h) / 2.0,
                ),
                size.top_top_flap,
                FlapKind::Curved,
                Orientation::Up,
            ),
        };

        BoxLayout {
            size,
            origin,
            panels,
            flaps,
        }
    }

    /// Lay the net out so its bounding box is centered on `page_center`.
    pub fn centered(size: BoxSize, page_center: PointMm) -> Self {
        let unplaced = BoxLayout::at(size, PointMm::default());
        let shift = page_center - unplaced.bounds().center();
        BoxLayout::at(size, PointMm::default() + shift)
    }

    pub fn bounds(&self) -> BoxMm {
        union(
            self.panels
                .all()
                .into_iter()
                .map(|(_, panel)| panel.bounds())
                .chain(self.flaps.all().into_iter().map(|(_, flap)| flap.bounds())),
        )
    }

    /// Title lines for the chosen faces, front first
    pub fn titles(&self, faces: TitleFaces) -> Vec<TitlePlacement> {
        let on_face = |panel: &Panel| {
            panel
                .center
                .offset(Length::ZERO, panel.size.h * FRONT_TITLE_OFFSET_RATIO)
        };
        let place = |center, size_pt, orientation| TitlePlacement {
            center,
            size_pt,
            orientation,
        };

        let mut titles = vec![place(on_face(&self.panels.top), TITLE_FONT_SIZE, Orientation::Up)];
        if faces == TitleFaces::AllFaces {
            titles.extend([
                place(
                    self.flaps.top_top.center,
                    TITLE_FONT_SIZE,
                    Orientation::Down,
                ),
                place(self.flaps.top_bot.center, TITLE_FONT_SIZE, Orientation::Up),
                place(
                    self.panels.left.center,
                    SIDE_TITLE_FONT_SIZE,
                    Orientation::Right,
                ),
                place(
                    self.panels.right.center,
                    SIDE_TITLE_FONT_SIZE,
                    Orientation::Left,
                ),
                place(
                    on_face(&self.panels.bottom),
                    TITLE_FONT_SIZE,
                    Orientation::Up,
                ),
            ]);
        }
        titles
    }

    /// Half-round notch on the open edge of the back face, stroke only
    pub fn thumb_cutout(&self) -> PathBuilder {
        let r = THUMB_CUTOUT_RADIUS.raw();
        let bottom = &self.panels.bottom;
        let mut cutout = PathBuilder::new(
            bottom
                .center
                .offset(-THUMB_CUTOUT_RADIUS, -self.size.main.h / 2.0),
        );
        cutout.curve_by(
            (0.0, 4.0 * r / 3.0),
            (2.0 * r, 4.0 * r / 3.0),
            (2.0 * r, 0.0),
        );
        cutout
    }

    /// Short cut guides: inward along the top edge of `top_top`, then down
    /// from the top corners of the front face.
    pub fn cut_marks(&self) -> [(PointMm, PointMm); 4] {
        let half = self.size.main.w / 2.0;
        let top_top = &self.flaps.top_top;
        let top_mid = PointMm::new(top_top.center.x, top_top.center.y - top_top.size.h / 2.0);
        let front = &self.panels.top;
        let back_mid = PointMm::new(front.center.x, front.top());
        let zero = Length::ZERO;
        [
            (top_mid.offset(-half, zero), top_mid.offset(CUT_MARK_LENGTH - half, zero)),
            (top_mid.offset(half, zero), top_mid.offset(half - CUT_MARK_LENGTH, zero)),
            (back_mid.offset(-half, zero), back_mid.offset(-half, CUT_MARK_LENGTH)),
            (back_mid.offset(half, zero), back_mid.offset(half, CUT_MARK_LENGTH)),
        ]
    }
}

fn stamp<C: Canvas>(d: &mut Drawer<C>, image: Option<&ImageHandle>, faces: &[&Panel]) {
    if let Some(image) = image {
        for face in faces {
            d.image(image, face.center, face.size, 0.0);
        }
    }
}

/// Draw the tuckbox net centered on the current page.
pub fn draw_box<C: Canvas>(
    d: &mut Drawer<C>,
    width: Length,
    length: Length,
    depth: Length,
    style: &BoxStyle,
) -> BoxLayout {
    let size = BoxSize::new(width, length, depth);
    let page_center = d.reset_origin();
    let layout = BoxLayout::centered(size, page_center);
    d.set_origin(layout.origin);
    debug!(
        width = width.raw(),
        length = length.raw(),
        depth = depth.raw(),
        net_w = size.net_extent().w.raw(),
        net_h = size.net_extent().h.raw(),
        "box layout"
    );

    d.set_stroke_color(OUTLINE_GRAY);
    let fill = d.use_fill(style.fill);
    if let Some(color) = style.text_color {
        d.set_text_color(color);
    }

    let images = &style.images;
    let (panels, flaps) = (&layout.panels, &layout.flaps);
    stamp(d, images.front.as_ref(), &[&panels.top]);
    stamp(d, images.back.as_ref(), &[&panels.bottom]);
    stamp(d, images.side.as_ref(), &[&panels.left, &panels.right]);
    let top_faces = [
        Panel::new(flaps.top_top.center, flaps.top_top.size),
        Panel::new(flaps.top_bot.center, flaps.top_bot.size),
    ];
    stamp(d, images.top.as_ref(), &[&top_faces[0], &top_faces[1]]);

    let fill_unless = |image: &Option<ImageHandle>| {
        if image.is_some() {
            FillMode::Stroke
        } else {
            fill
        }
    };
    draw_panel(d, &panels.top, fill_unless(&images.front));
    draw_panel(d, &panels.bottom, fill_unless(&images.back));
    draw_panel(d, &panels.left, fill_unless(&images.side));
    draw_panel(d, &panels.right, fill_unless(&images.side));

    for (name, flap) in flaps.all() {
        let flap_fill = match name {
            "top_top" | "top_bot" => fill_unless(&images.top),
            _ => fill,
        };
        draw_flap(d, flap, flap_fill);
    }

    if !style.title.is_empty() {
        d.set_font(FontWeight::Bold);
        for title in layout.titles(style.title_faces) {
            d.centered_text(&style.title, title.center, title.size_pt, title.orientation);
        }
    }

    let (start, segments) = layout.thumb_cutout().build();
    d.path(start, &segments, FillMode::Stroke, false);

    d.set_stroke_color(CUT_MARK_COLOR);
    for (from, to) in layout.cut_marks() {
        d.line(from, to);
    }

    layout
}
