//! Page sequencing: the optional insert on its own page, then the box.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, PaperSize, SvgCanvas};
use crate::errors::{BuildError, RenderError};
use crate::layout::sleeve::{SleeveLayout, draw_sleeve};
use crate::layout::tray::{TrayLayout, draw_tray};
use crate::layout::tuckbox::{BoxLayout, BoxStyle, ImageSet, TitleFaces, draw_box};
use crate::log::info;
use crate::render::Drawer;
use crate::render::defaults::{INSERT_CLEARANCE, LINE_WIDTH, TRAY_GAP_WIDTH};
use crate::types::{Length, Rgb};

/// Insert printed ahead of the box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsideKind {
    #[default]
    None,
    Sleeve,
    Tray,
}

/// Everything needed to draw one set of templates, in millimetres
#[derive(Clone, Debug, PartialEq)]
pub struct BuildRequest {
    /// Card width
    pub width: f64,
    /// Card length
    pub length: f64,
    /// Deck thickness
    pub depth: f64,
    pub inside: InsideKind,
    pub fill: Option<Rgb>,
    pub text_color: Option<Rgb>,
    pub title: String,
    pub title_faces: TitleFaces,
    pub images: ImageSet,
    pub paper: PaperSize,
}

impl BuildRequest {
    /// A plain white box with black text and no insert
    pub fn new(width: f64, length: f64, depth: f64) -> Self {
        BuildRequest {
            width,
            length,
            depth,
            inside: InsideKind::None,
            fill: Some(Rgb::WHITE),
            text_color: Some(Rgb::BLACK),
            title: String::new(),
            title_faces: TitleFaces::Front,
            images: ImageSet::default(),
            paper: PaperSize::A4,
        }
    }

    fn style(&self) -> BoxStyle {
        BoxStyle {
            fill: self.fill,
            text_color: self.text_color,
            title: self.title.clone(),
            title_faces: self.title_faces,
            images: self.images.clone(),
        }
    }
}

/// Card dimensions the box was finally drawn with
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Dimensions {
    pub width: Length,
    pub length: Length,
    pub depth: Length,
}

impl Dimensions {
    /// Each axis grown by `by`
    pub fn padded(self, by: Length) -> Self {
        Dimensions {
            width: self.width + by,
            length: self.length + by,
            depth: self.depth + by,
        }
    }
}

/// What was drawn on one page
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageLayout {
    Sleeve(SleeveLayout),
    Tray(TrayLayout),
    Box(BoxLayout),
}

/// A finished set of templates, ready to export
#[derive(Debug)]
pub struct Tuckbox<C> {
    drawer: Drawer<C>,
    insert: Option<PageLayout>,
    layout: BoxLayout,
    dimensions: Dimensions,
}

impl<C: Canvas> Tuckbox<C> {
    pub fn page_count(&self) -> usize {
        self.drawer.canvas().page_count()
    }

    /// Final box dimensions, including any insert clearance
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn box_layout(&self) -> &BoxLayout {
        &self.layout
    }

    /// Layout of the insert page, if one was drawn
    pub fn insert(&self) -> Option<&PageLayout> {
        self.insert.as_ref()
    }

    /// Layouts in page order
    pub fn layouts(&self) -> Vec<PageLayout> {
        self.insert
            .iter()
            .cloned()
            .chain(std::iter::once(PageLayout::Box(self.layout.clone())))
            .collect()
    }

    pub fn canvas(&self) -> &C {
        self.drawer.canvas()
    }

    pub fn into_canvas(self) -> C {
        self.drawer.into_canvas()
    }

    pub fn export_as_data_string(&self) -> Result<String, RenderError> {
        self.drawer.canvas().export_as_data_string()
    }

    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.drawer.canvas().persist(path.as_ref())
    }
}

fn dimension(name: &'static str, value: f64) -> Result<Length, BuildError> {
    Length::try_positive(value).map_err(|reason| BuildError::InvalidDimension {
        name,
        value,
        reason,
    })
}

/// Build the templates onto SVG pages of the requested paper size.
pub fn build(request: &BuildRequest) -> Result<Tuckbox<SvgCanvas>, BuildError> {
    build_with(SvgCanvas::new(request.paper), request)
}

/// Build the templates onto any canvas.
///
/// Dimensions are checked before anything is drawn. When an insert is
/// requested it gets the first page and the box grows by
/// [`INSERT_CLEARANCE`] on every axis so the insert slides in.
pub fn build_with<C: Canvas>(canvas: C, request: &BuildRequest) -> Result<Tuckbox<C>, BuildError> {
    let raw = Dimensions {
        width: dimension("card width", request.width)?,
        length: dimension("card length", request.length)?,
        depth: dimension("box depth", request.depth)?,
    };

    let mut d = Drawer::new(canvas);
    d.set_line_width(LINE_WIDTH);

    let insert = match request.inside {
        InsideKind::None => None,
        InsideKind::Sleeve => {
            info!(page = 1, "drawing sleeve insert");
            let fill = d.use_fill(request.fill);
            let layout = draw_sleeve(&mut d, raw.width, raw.length, raw.depth, fill);
            d.new_page();
            Some(PageLayout::Sleeve(layout))
        }
        InsideKind::Tray => {
            info!(page = 1, "drawing tray insert");
            d.reset_origin();
            d.set_line_width(LINE_WIDTH);
            let fill = d.use_fill(request.fill);
            let layout = draw_tray(
                &mut d,
                raw.width,
                raw.length,
                raw.depth,
                TRAY_GAP_WIDTH,
                fill,
            );
            d.new_page();
            Some(PageLayout::Tray(layout))
        }
    };

    d.set_line_width(LINE_WIDTH);
    d.set_solid();
    let dimensions = if insert.is_some() {
        raw.padded(INSERT_CLEARANCE)
    } else {
        raw
    };

    info!(
        page = d.canvas().page_count(),
        width = dimensions.width.raw(),
        length = dimensions.length.raw(),
        depth = dimensions.depth.raw(),
        "drawing box"
    );
    let layout = draw_box(
        &mut d,
        dimensions.width,
        dimensions.length,
        dimensions.depth,
        &request.style(),
    );

    Ok(Tuckbox {
        drawer: d,
        insert,
        layout,
        dimensions,
    })
}
