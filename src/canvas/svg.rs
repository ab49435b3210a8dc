//! SVG backend: one `<svg>` document per page, millimetre user units.

use std::fs;
use std::path::{Path, PathBuf};

use ::svg::Document;
use ::svg::Node;
use ::svg::node::Text as TextNode;
use ::svg::node::element::{Element, Group, Image, Line, Path as SvgPath, Rectangle};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::{Canvas, FillMode, FontWeight, ImageHandle, PaperSize, Segment, TextMetrics, metrics};
use crate::errors::RenderError;
use crate::geometry::AffineMatrix;
use crate::render::defaults::FONT_FAMILY;
use crate::types::{Length, PointMm, Rgb, SizeMm};

/// Format a number with 6 significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    // Float noise from rotations would otherwise print as "-0.000000000001".
    if value.abs() < 1e-9 {
        return "0".to_string();
    }

    let abs_val = value.abs();
    let magnitude = abs_val.log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;

    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// SVG path data for a relative segment list
fn path_data(start: PointMm, segments: &[Segment], closed: bool) -> String {
    let mut d = format!("M{},{}", fmt_num(start.x.raw()), fmt_num(start.y.raw()));
    for segment in segments {
        match *segment {
            Segment::Line { to } => {
                d.push_str(&format!(
                    "l{},{}",
                    fmt_num(to.dx.raw()),
                    fmt_num(to.dy.raw()),
                ));
            }
            Segment::Curve { c1, c2, to } => {
                d.push_str(&format!(
                    "c{},{} {},{} {},{}",
                    fmt_num(c1.dx.raw()),
                    fmt_num(c1.dy.raw()),
                    fmt_num(c2.dx.raw()),
                    fmt_num(c2.dy.raw()),
                    fmt_num(to.dx.raw()),
                    fmt_num(to.dy.raw()),
                ));
            }
        }
    }
    if closed {
        d.push('Z');
    }
    d
}

#[derive(Clone, Debug, PartialEq)]
struct GraphicsState {
    line_width: Length,
    dashes: Vec<f64>,
    stroke: Rgb,
    fill: Rgb,
    text: Rgb,
    font_family: String,
    font_weight: FontWeight,
    /// Transform groups opened since the matching save
    groups: usize,
}

impl Default for GraphicsState {
    fn default() -> Self {
        GraphicsState {
            line_width: Length::mm(0.2),
            dashes: Vec::new(),
            stroke: Rgb::BLACK,
            fill: Rgb::WHITE,
            text: Rgb::BLACK,
            font_family: FONT_FAMILY.to_string(),
            font_weight: FontWeight::Normal,
            groups: 0,
        }
    }
}

/// Canvas that renders every page to its own SVG document
#[derive(Debug)]
pub struct SvgCanvas {
    paper: PaperSize,
    finished: Vec<Group>,
    /// Open groups of the current page; the first one is the page root
    open: Vec<Group>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl SvgCanvas {
    pub fn new(paper: PaperSize) -> Self {
        SvgCanvas {
            paper,
            finished: Vec::new(),
            open: vec![Group::new()],
            state: GraphicsState::default(),
            saved: Vec::new(),
        }
    }

    fn push(&mut self, node: impl Node) {
        if let Some(group) = self.open.last_mut() {
            group.append(node);
        }
    }

    fn stroke_attrs<T: Node>(&self, mut node: T, fill: FillMode) -> T {
        node.assign("stroke", self.state.stroke.to_hex());
        node.assign("stroke-width", fmt_num(self.state.line_width.raw()));
        if !self.state.dashes.is_empty() {
            let dashes: Vec<String> = self.state.dashes.iter().map(|d| fmt_num(*d)).collect();
            node.assign("stroke-dasharray", dashes.join(" "));
        }
        match fill {
            FillMode::Stroke => node.assign("fill", "none"),
            FillMode::StrokeAndFill => node.assign("fill", self.state.fill.to_hex()),
        }
        node
    }

    /// Close every open group of the current page into its root.
    fn current_page(&self) -> Group {
        let mut open = self.open.clone();
        while open.len() > 1 {
            if let Some(inner) = open.pop() {
                if let Some(outer) = open.last_mut() {
                    outer.append(inner);
                }
            }
        }
        open.pop().unwrap_or_else(Group::new)
    }

    fn pages(&self) -> Vec<Group> {
        let mut pages = self.finished.clone();
        pages.push(self.current_page());
        pages
    }

    fn document(&self, width: Length, height: Length) -> Document {
        Document::new()
            .set("width", format!("{}mm", fmt_num(width.raw())))
            .set("height", format!("{}mm", fmt_num(height.raw())))
            .set(
                "viewBox",
                format!("0 0 {} {}", fmt_num(width.raw()), fmt_num(height.raw())),
            )
    }

    /// Serialized SVG documents, one per page.
    pub fn to_svg_pages(&self) -> Vec<String> {
        let page = self.page_size();
        self.pages()
            .into_iter()
            .map(|content| self.document(page.w, page.h).add(content).to_string())
            .collect()
    }

    /// All pages stacked top to bottom in one document.
    pub fn to_stacked_svg(&self) -> String {
        let page = self.page_size();
        let pages = self.pages();
        let mut doc = self.document(page.w, page.h * pages.len() as f64);
        for (i, content) in pages.into_iter().enumerate() {
            let offset = page.h * i as f64;
            doc = doc.add(
                Group::new()
                    .set("transform", format!("translate(0 {})", fmt_num(offset.raw())))
                    .add(content),
            );
        }
        doc.to_string()
    }

    /// File names for each page: `name.svg` alone, `name-N.svg` when split.
    pub fn page_paths(&self, path: &Path) -> Vec<PathBuf> {
        let count = self.page_count();
        if count == 1 {
            return vec![path.with_extension("svg")];
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tuckbox".to_string());
        (1..=count)
            .map(|n| path.with_file_name(format!("{stem}-{n}.svg")))
            .collect()
    }
}

impl Default for SvgCanvas {
    fn default() -> Self {
        SvgCanvas::new(PaperSize::default())
    }
}

impl Canvas for SvgCanvas {
    fn page_size(&self) -> SizeMm {
        self.paper.size()
    }

    fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    fn new_page(&mut self) {
        let page = self.current_page();
        self.finished.push(page);
        self.open = vec![Group::new()];
        self.saved.clear();
        self.state.groups = 0;
    }

    fn set_line_width(&mut self, width: Length) {
        self.state.line_width = width;
    }

    fn set_dash_pattern(&mut self, dashes: &[f64]) {
        self.state.dashes = dashes.to_vec();
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.state.stroke = color;
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.state.fill = color;
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.state.text = color;
    }

    fn set_font(&mut self, family: &str, weight: FontWeight) {
        self.state.font_family = family.to_string();
        self.state.font_weight = weight;
    }

    fn save_state(&mut self) {
        let mut saved = self.state.clone();
        saved.groups = 0;
        self.saved.push(std::mem::replace(&mut self.state, saved));
    }

    fn concat_transform(&mut self, matrix: AffineMatrix) {
        let m = matrix.native_to_page_space(self.page_size().h);
        let values: Vec<String> = m.to_array().iter().map(|v| fmt_num(*v)).collect();
        self.open
            .push(Group::new().set("transform", format!("matrix({})", values.join(" "))));
        self.state.groups += 1;
    }

    fn restore_state(&mut self) {
        for _ in 0..self.state.groups {
            if self.open.len() > 1 {
                if let Some(inner) = self.open.pop() {
                    self.push(inner);
                }
            }
        }
        if let Some(state) = self.saved.pop() {
            self.state = state;
        } else {
            crate::log::warn!("restore_state without a matching save_state");
            self.state.groups = 0;
        }
    }

    fn rect(&mut self, top_left: PointMm, size: SizeMm, fill: FillMode) {
        let rect = Rectangle::new()
            .set("x", fmt_num(top_left.x.raw()))
            .set("y", fmt_num(top_left.y.raw()))
            .set("width", fmt_num(size.w.raw()))
            .set("height", fmt_num(size.h.raw()));
        let rect = self.stroke_attrs(rect, fill);
        self.push(rect);
    }

    fn line(&mut self, from: PointMm, to: PointMm) {
        let line = Line::new()
            .set("x1", fmt_num(from.x.raw()))
            .set("y1", fmt_num(from.y.raw()))
            .set("x2", fmt_num(to.x.raw()))
            .set("y2", fmt_num(to.y.raw()));
        let line = self.stroke_attrs(line, FillMode::Stroke);
        self.push(line);
    }

    fn path(&mut self, start: PointMm, segments: &[Segment], fill: FillMode, closed: bool) {
        let path = SvgPath::new().set("d", path_data(start, segments, closed));
        let path = self.stroke_attrs(path, fill);
        self.push(path);
    }

    fn text(&mut self, text: &str, origin: PointMm, size_pt: f64, angle: f64) {
        let x = fmt_num(origin.x.raw());
        let y = fmt_num(origin.y.raw());
        let mut node = Element::new("text");
        node.assign("x", x.clone());
        node.assign("y", y.clone());
        node.assign("font-family", self.state.font_family.clone());
        node.assign(
            "font-weight",
            match self.state.font_weight {
                FontWeight::Normal => "normal",
                FontWeight::Bold => "bold",
            },
        );
        node.assign("font-size", fmt_num(metrics::points_to_mm(size_pt).raw()));
        node.assign("fill", self.state.text.to_hex());
        if angle != 0.0 {
            // Page space has y pointing down, so counter-clockwise is negative.
            node.assign("transform", format!("rotate({} {x} {y})", fmt_num(-angle)));
        }
        node.append(TextNode::new(text));
        self.push(node);
    }

    fn image(&mut self, image: &ImageHandle, top_left: PointMm, size: SizeMm, rotation: f64) {
        let href = format!(
            "data:{};base64,{}",
            image.format.mime(),
            STANDARD.encode(&image.data)
        );
        let x = fmt_num(top_left.x.raw());
        let y = fmt_num(top_left.y.raw());
        let mut node = Image::new()
            .set("x", x.clone())
            .set("y", y.clone())
            .set("width", fmt_num(size.w.raw()))
            .set("height", fmt_num(size.h.raw()))
            .set("preserveAspectRatio", "none")
            .set("href", href);
        if rotation != 0.0 {
            node = node.set("transform", format!("rotate({} {x} {y})", fmt_num(-rotation)));
        }
        self.push(node);
    }

    fn text_metrics(&self, text: &str, size_pt: f64) -> TextMetrics {
        metrics::measure(text, size_pt, self.state.font_weight)
    }

    fn export_as_data_string(&self) -> Result<String, RenderError> {
        Ok(format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(self.to_stacked_svg())
        ))
    }

    fn persist(&self, path: &Path) -> Result<(), RenderError> {
        for (target, page) in self.page_paths(path).into_iter().zip(self.to_svg_pages()) {
            crate::log::debug!(path = %target.display(), "writing page");
            fs::write(&target, page).map_err(|source| RenderError::Io {
                path: target.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ImageFormat;
    use crate::geometry::{Orientation, rotation_about};
    use crate::types::{offset, pt, size};

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(1.5), "1.5");
        assert_eq!(fmt_num(148.5), "148.5");
        assert_eq!(fmt_num(-3.0), "-3");
        assert_eq!(fmt_num(100.0), "100");
        assert_eq!(fmt_num(1e-13), "0");
        assert_eq!(fmt_num(2.834645669), "2.83465");
    }

    #[test]
    fn path_data_is_relative() {
        let d = path_data(
            pt(10.0, 20.0),
            &[
                Segment::Line { to: offset(5.0, 0.0) },
                Segment::Curve {
                    c1: offset(0.0, -1.0),
                    c2: offset(-1.0, -1.0),
                    to: offset(-1.0, -1.0),
                },
            ],
            true,
        );
        assert_eq!(d, "M10,20l5,0c0,-1 -1,-1 -1,-1Z");
    }

    #[test]
    fn one_document_per_page() {
        let mut canvas = SvgCanvas::new(PaperSize::A4);
        canvas.rect(pt(0.0, 0.0), size(10.0, 10.0), FillMode::Stroke);
        canvas.new_page();
        canvas.rect(pt(5.0, 5.0), size(10.0, 10.0), FillMode::StrokeAndFill);
        let pages = canvas.to_svg_pages();
        assert_eq!(pages.len(), 2);
        for page in &pages {
            assert!(page.contains(r#"viewBox="0 0 297 210""#), "{page}");
            assert!(page.contains(r#"width="297mm""#));
        }
        assert!(pages[0].contains(r#"fill="none""#));
        assert!(pages[1].contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn restore_closes_transform_groups() {
        let mut canvas = SvgCanvas::new(PaperSize::A4);
        canvas.set_stroke_color(Rgb::gray(160));
        canvas.save_state();
        canvas.set_stroke_color(Rgb::BLACK);
        canvas.concat_transform(rotation_about(
            pt(50.0, 50.0),
            canvas.page_size().h,
            Orientation::Down.angle(),
        ));
        canvas.line(pt(0.0, 0.0), pt(1.0, 0.0));
        canvas.restore_state();
        canvas.line(pt(2.0, 0.0), pt(3.0, 0.0));

        assert_eq!(canvas.open.len(), 1);
        assert_eq!(canvas.state.stroke, Rgb::gray(160));
        let svg = &canvas.to_svg_pages()[0];
        // Half a turn about (50, 50) in page space.
        assert!(svg.contains("matrix(-1 0 0 -1 100 100)"), "{svg}");
    }

    #[test]
    fn text_rotation_is_negated() {
        let mut canvas = SvgCanvas::new(PaperSize::A4);
        canvas.set_font(FONT_FAMILY, FontWeight::Bold);
        canvas.text("Deck", pt(10.0, 20.0), 20.0, 90.0);
        let svg = &canvas.to_svg_pages()[0];
        assert!(svg.contains("rotate(-90 10 20)"), "{svg}");
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains("Deck"));
    }

    #[test]
    fn font_size_is_written_in_millimetres() {
        let mut canvas = SvgCanvas::new(PaperSize::A4);
        canvas.text("Deck", pt(10.0, 20.0), 12.0, 0.0);
        let svg = &canvas.to_svg_pages()[0];
        assert!(svg.contains(r#"font-size="4.23334""#), "{svg}");
    }

    #[test]
    fn images_are_embedded() {
        let mut canvas = SvgCanvas::new(PaperSize::A4);
        let handle = ImageHandle::new(ImageFormat::Png, vec![1u8, 2, 3]);
        canvas.image(&handle, pt(0.0, 0.0), size(10.0, 10.0), 0.0);
        let svg = &canvas.to_svg_pages()[0];
        assert!(svg.contains("data:image/png;base64,AQID"), "{svg}");
    }

    #[test]
    fn export_is_a_data_uri() {
        let canvas = SvgCanvas::new(PaperSize::Letter);
        let uri = canvas.export_as_data_string().unwrap();
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn page_paths_are_numbered_when_split() {
        let mut canvas = SvgCanvas::new(PaperSize::A4);
        assert_eq!(
            canvas.page_paths(Path::new("out/deck")),
            vec![PathBuf::from("out/deck.svg")]
        );
        canvas.new_page();
        assert_eq!(
            canvas.page_paths(Path::new("out/deck.svg")),
            vec![PathBuf::from("out/deck-1.svg"), PathBuf::from("out/deck-2.svg")]
        );
    }

    #[test]
    fn measures_in_current_font() {
        let mut canvas = SvgCanvas::new(PaperSize::A4);
        let regular = canvas.text_metrics("Deck", 20.0);
        canvas.set_font(FONT_FAMILY, FontWeight::Bold);
        let bold = canvas.text_metrics("Deck", 20.0);
        assert!(bold.width > regular.width);
        assert_eq!(bold.line_height, regular.line_height);
    }
}
