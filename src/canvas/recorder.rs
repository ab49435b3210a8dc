//! In-memory canvas that records every call as a [`DrawCommand`].

use std::fs;
use std::path::Path;

use serde::Serialize;

use super::{
    Canvas, FillMode, FontWeight, ImageFormat, ImageHandle, PaperSize, Segment, TextMetrics,
    metrics,
};
use crate::errors::RenderError;
use crate::geometry::AffineMatrix;
use crate::types::{Length, PointMm, Rgb, SizeMm};

/// One recorded canvas call
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum DrawCommand {
    NewPage,
    LineWidth { width: Length },
    DashPattern { dashes: Vec<f64> },
    StrokeColor { color: Rgb },
    FillColor { color: Rgb },
    TextColor { color: Rgb },
    Font { family: String, weight: FontWeight },
    SaveState,
    Transform { matrix: AffineMatrix },
    RestoreState,
    Rect { top_left: PointMm, size: SizeMm, fill: FillMode },
    Line { from: PointMm, to: PointMm },
    Path { start: PointMm, segments: Vec<Segment>, fill: FillMode, closed: bool },
    Text { text: String, origin: PointMm, size_pt: f64, angle: f64 },
    Image { format: ImageFormat, top_left: PointMm, size: SizeMm, rotation: f64 },
}

impl DrawCommand {
    /// Short name, as used in the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            DrawCommand::NewPage => "new-page",
            DrawCommand::LineWidth { .. } => "line-width",
            DrawCommand::DashPattern { .. } => "dash-pattern",
            DrawCommand::StrokeColor { .. } => "stroke-color",
            DrawCommand::FillColor { .. } => "fill-color",
            DrawCommand::TextColor { .. } => "text-color",
            DrawCommand::Font { .. } => "font",
            DrawCommand::SaveState => "save-state",
            DrawCommand::Transform { .. } => "transform",
            DrawCommand::RestoreState => "restore-state",
            DrawCommand::Rect { .. } => "rect",
            DrawCommand::Line { .. } => "line",
            DrawCommand::Path { .. } => "path",
            DrawCommand::Text { .. } => "text",
            DrawCommand::Image { .. } => "image",
        }
    }

    /// Whether this command puts marks on the page
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            DrawCommand::Rect { .. }
                | DrawCommand::Line { .. }
                | DrawCommand::Path { .. }
                | DrawCommand::Text { .. }
                | DrawCommand::Image { .. }
        )
    }
}

#[derive(Debug, Default)]
pub struct Recorder {
    paper: PaperSize,
    commands: Vec<DrawCommand>,
    font_weight: FontWeight,
    weights: Vec<FontWeight>,
}

impl Recorder {
    pub fn new(paper: PaperSize) -> Self {
        Recorder {
            paper,
            ..Default::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands split at each page break
    pub fn pages(&self) -> Vec<&[DrawCommand]> {
        self.commands.split(|c| *c == DrawCommand::NewPage).collect()
    }

    /// Drawing commands of one page, in order (0-based page index)
    pub fn drawn_on(&self, page: usize) -> Vec<&DrawCommand> {
        self.pages()
            .get(page)
            .map(|cmds| cmds.iter().filter(|c| c.is_drawing()).collect())
            .unwrap_or_default()
    }

    /// Space-separated command names of one page's drawing commands
    pub fn summary(&self, page: usize) -> String {
        self.drawn_on(page)
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_json(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(&self.commands)?)
    }
}

impl Canvas for Recorder {
    fn page_size(&self) -> SizeMm {
        self.paper.size()
    }

    fn page_count(&self) -> usize {
        self.pages().len()
    }

    fn new_page(&mut self) {
        self.commands.push(DrawCommand::NewPage);
        self.weights.clear();
    }

    fn set_line_width(&mut self, width: Length) {
        self.commands.push(DrawCommand::LineWidth { width });
    }

    fn set_dash_pattern(&mut self, dashes: &[f64]) {
        self.commands.push(DrawCommand::DashPattern { dashes: dashes.to_vec() });
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.commands.push(DrawCommand::StrokeColor { color });
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.commands.push(DrawCommand::FillColor { color });
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.commands.push(DrawCommand::TextColor { color });
    }

    fn set_font(&mut self, family: &str, weight: FontWeight) {
        self.font_weight = weight;
        self.commands.push(DrawCommand::Font {
            family: family.to_string(),
            weight,
        });
    }

    fn save_state(&mut self) {
        self.weights.push(self.font_weight);
        self.commands.push(DrawCommand::SaveState);
    }

    fn concat_transform(&mut self, matrix: AffineMatrix) {
        self.commands.push(DrawCommand::Transform { matrix });
    }

    fn restore_state(&mut self) {
        if let Some(weight) = self.weights.pop() {
            self.font_weight = weight;
        }
        self.commands.push(DrawCommand::RestoreState);
    }

    fn rect(&mut self, top_left: PointMm, size: SizeMm, fill: FillMode) {
        self.commands.push(DrawCommand::Rect { top_left, size, fill });
    }

    fn line(&mut self, from: PointMm, to: PointMm) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn path(&mut self, start: PointMm, segments: &[Segment], fill: FillMode, closed: bool) {
        self.commands.push(DrawCommand::Path {
            start,
            segments: segments.to_vec(),
            fill,
            closed,
        });
    }

    fn text(&mut self, text: &str, origin: PointMm, size_pt: f64, angle: f64) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            size_pt,
            angle,
        });
    }

    fn image(&mut self, image: &ImageHandle, top_left: PointMm, size: SizeMm, rotation: f64) {
        self.commands.push(DrawCommand::Image {
            format: image.format,
            top_left,
            size,
            rotation,
        });
    }

    fn text_metrics(&self, text: &str, size_pt: f64) -> TextMetrics {
        metrics::measure(text, size_pt, self.font_weight)
    }

    fn export_as_data_string(&self) -> Result<String, RenderError> {
        self.to_json()
    }

    fn persist(&self, path: &Path) -> Result<(), RenderError> {
        let target = path.with_extension("json");
        fs::write(&target, self.to_json()?).map_err(|source| RenderError::Io {
            path: target.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{pt, size};

    #[test]
    fn splits_pages() {
        let mut rec = Recorder::new(PaperSize::A4);
        rec.rect(pt(0.0, 0.0), size(1.0, 1.0), FillMode::Stroke);
        rec.new_page();
        rec.set_line_width(Length::mm(0.2));
        rec.line(pt(0.0, 0.0), pt(1.0, 1.0));
        rec.text("x", pt(0.0, 0.0), 10.0, 0.0);

        assert_eq!(rec.page_count(), 2);
        assert_eq!(rec.summary(0), "rect");
        assert_eq!(rec.summary(1), "line text");
        assert!(rec.drawn_on(5).is_empty());
    }

    #[test]
    fn font_weight_follows_state_stack() {
        let mut rec = Recorder::new(PaperSize::A4);
        let regular = rec.text_metrics("Deck", 20.0);
        rec.save_state();
        rec.set_font("helvetica", FontWeight::Bold);
        assert!(rec.text_metrics("Deck", 20.0).width > regular.width);
        rec.restore_state();
        assert_eq!(rec.text_metrics("Deck", 20.0), regular);
    }

    #[test]
    fn exports_tagged_json() {
        let mut rec = Recorder::new(PaperSize::A4);
        rec.save_state();
        rec.restore_state();
        let json = rec.export_as_data_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["op"], "save-state");
        assert_eq!(value[1]["op"], "restore-state");
    }
}
