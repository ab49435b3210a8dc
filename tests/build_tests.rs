//! End-to-end builds through the public API.

use tuckbox::canvas::{DrawCommand, FillMode};
use tuckbox::{
    BuildRequest, InsideKind, Length, PageLayout, Recorder, Rgb, SvgCanvas, build, build_with,
};

fn request(inside: InsideKind, fill: &str, title: &str) -> BuildRequest {
    BuildRequest {
        inside,
        fill: Rgb::parse_lenient(fill),
        text_color: Rgb::parse_lenient("#000000"),
        title: title.to_string(),
        ..BuildRequest::new(64.0, 89.0, 13.0)
    }
}

fn count(rec: &Recorder, page: usize, name: &str) -> usize {
    rec.drawn_on(page).iter().filter(|c| c.name() == name).count()
}

/// Format a diff between two renders using dissimilar
fn format_inline_diff(a: &str, b: &str) -> String {
    use dissimilar::Chunk;

    let mut output = String::new();
    for chunk in dissimilar::diff(a, b) {
        match chunk {
            Chunk::Equal(text) if text.len() > 80 => output.push_str("[...]"),
            Chunk::Equal(text) => output.push_str(text),
            Chunk::Delete(text) => output.push_str(&format!("[-{text}-]")),
            Chunk::Insert(text) => output.push_str(&format!("[+{text}+]")),
        }
    }
    output
}

#[test]
fn plain_box_with_title() {
    let req = request(InsideKind::None, "#ffffff", "My Deck");
    let tb = build_with(Recorder::default(), &req).unwrap();
    let rec = tb.canvas();
    assert_eq!(tb.page_count(), 1);

    // Four panels plus the two outside flaps are rects; the other seven
    // flaps and the thumb cutout are paths.
    assert_eq!(count(rec, 0, "rect"), 6);
    assert_eq!(count(rec, 0, "path"), 8);
    assert_eq!(count(rec, 0, "text"), 1);
    assert_eq!(count(rec, 0, "image"), 0);
    assert_eq!(count(rec, 0, "line"), 4);

    let layout = tb.box_layout();
    assert_eq!(layout.panels.all().len(), 4);
    assert_eq!(layout.flaps.all().len(), 9);
}

#[test]
fn sleeve_then_padded_box() {
    let req = request(InsideKind::Sleeve, "#ff0000", "");
    let tb = build_with(Recorder::default(), &req).unwrap();
    let rec = tb.canvas();
    assert_eq!(tb.page_count(), 2);

    insta::assert_snapshot!(
        rec.summary(0),
        @"rect rect rect path path path path path path path"
    );
    let Some(PageLayout::Sleeve(sleeve)) = tb.insert() else {
        panic!("expected a sleeve on the first page");
    };
    assert_eq!(sleeve.bottom_flaps.len() + sleeve.side_flaps.len(), 4);

    let dims = tb.dimensions();
    assert_eq!(
        (dims.width, dims.length, dims.depth),
        (Length(65.5), Length(90.5), Length(14.5))
    );
    assert_eq!(tb.box_layout().size.main.w, Length(90.5));
    assert_eq!(count(rec, 1, "text"), 0);

    let filled = rec
        .commands()
        .iter()
        .any(|c| *c == DrawCommand::FillColor { color: Rgb(255, 0, 0) });
    assert!(filled);
}

#[test]
fn malformed_fill_draws_outlines_only() {
    let req = request(InsideKind::None, "zzzzzz", "My Deck");
    let tb = build_with(Recorder::default(), &req).unwrap();
    let rec = tb.canvas();
    assert!(!rec.commands().iter().any(|c| matches!(c, DrawCommand::FillColor { .. })));
    for cmd in rec.commands() {
        match cmd {
            DrawCommand::Rect { fill, .. } | DrawCommand::Path { fill, .. } => {
                assert_eq!(*fill, FillMode::Stroke);
            }
            _ => {}
        }
    }
}

#[test]
fn box_page_starts_solid_and_thin() {
    let req = request(InsideKind::Tray, "#ffffff", "");
    let tb = build_with(Recorder::default(), &req).unwrap();
    let pages = tb.canvas().pages();
    let second = pages[1];
    assert_eq!(second[0], DrawCommand::LineWidth { width: Length(0.2) });
    assert_eq!(second[1], DrawCommand::DashPattern { dashes: vec![] });
}

#[test]
fn identical_requests_render_identical_svg() {
    let req = request(InsideKind::Sleeve, "#ffeedd", "My Deck");
    let a = build(&req).unwrap().into_canvas().to_stacked_svg();
    let b = build(&req).unwrap().into_canvas().to_stacked_svg();
    if a != b {
        panic!("renders differ:\n{}", format_inline_diff(&a, &b));
    }

    let uri_a = build(&req).unwrap().export_as_data_string().unwrap();
    let uri_b = build(&req).unwrap().export_as_data_string().unwrap();
    assert_eq!(uri_a, uri_b);
}

#[test]
fn svg_pages_follow_the_paper() {
    let req = BuildRequest {
        paper: tuckbox::PaperSize::Letter,
        ..request(InsideKind::Tray, "#ffffff", "Deck")
    };
    let canvas: SvgCanvas = build(&req).unwrap().into_canvas();
    let pages = canvas.to_svg_pages();
    assert_eq!(pages.len(), 2);
    for page in &pages {
        assert!(page.contains("279.4mm"), "{page}");
    }
    assert!(pages[1].contains("Deck"));
}

#[test]
fn zero_depth_is_rejected() {
    let err = build(&BuildRequest::new(64.0, 89.0, 0.0)).unwrap_err();
    assert_eq!(err.to_string(), "invalid box depth: 0");
}
