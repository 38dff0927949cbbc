//! Drawing surface abstraction
//!
//! Renderers issue drawing commands against `DrawSurface`; backends decide how
//! to realise them. Coordinates are PDF points with the origin at the TOP-LEFT
//! of the page and y growing downwards. Text is anchored at its baseline.
//!
//! Backends:
//! - `RecordingSurface`: keeps the command list (tests, layout inspection)
//! - `PdfSurface` (render::pdf): lopdf document output

use crate::error::SurfaceError;
use crate::render::fonts;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink on all sides; never produces negative sizes.
    pub fn inset(&self, by: f64) -> Rect {
        Rect::new(
            self.x + by,
            self.y + by,
            (self.width - 2.0 * by).max(0.0),
            (self.height - 2.0 * by).max(0.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components in 0.0-1.0 for PDF colour operators.
    pub fn unit(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f64,
}

impl ShapeStyle {
    pub const fn fill(color: Color) -> Self {
        Self { fill: Some(color), stroke: None, line_width: 0.0 }
    }

    pub const fn stroke(color: Color, line_width: f64) -> Self {
        Self { fill: None, stroke: Some(color), line_width }
    }

    pub const fn fill_and_stroke(fill: Color, stroke: Color, line_width: f64) -> Self {
        Self { fill: Some(fill), stroke: Some(stroke), line_width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub weight: FontWeight,
    pub color: Color,
    pub align: Align,
}

impl TextStyle {
    pub const fn new(size: f64, weight: FontWeight, color: Color) -> Self {
        Self { size, weight, color, align: Align::Left }
    }

    pub const fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Drawing command sink. One surface is exclusively borrowed per render.
pub trait DrawSurface {
    fn begin_page(&mut self);

    fn draw_rect(&mut self, rect: Rect, style: &ShapeStyle, corner_radius: f64);

    fn draw_polygon(&mut self, points: &[Point], style: &ShapeStyle);

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64);

    fn draw_circle(&mut self, center: Point, radius: f64, style: &ShapeStyle);

    /// `at` is the baseline anchor; `style.align` says which end of the run it is.
    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle);

    /// Place a data-URI image scaled into `rect`.
    fn draw_image(&mut self, data_uri: &str, rect: Rect) -> Result<(), SurfaceError>;

    fn text_width(&self, text: &str, size: f64, weight: FontWeight) -> f64 {
        fonts::text_width(text, size, weight)
    }
}

// ============================================================================
// Recording backend
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginPage,
    Rect { rect: Rect, style: ShapeStyle, corner_radius: f64 },
    Polygon { points: Vec<Point>, style: ShapeStyle },
    Line { from: Point, to: Point, color: Color, width: f64 },
    Circle { center: Point, radius: f64, style: ShapeStyle },
    Text { text: String, at: Point, style: TextStyle },
    Image { rect: Rect },
}

/// Keeps every command in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::BeginPage))
            .count()
    }

    /// All text runs, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn polygons(&self) -> Vec<&[Point]> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polygon { points, .. } => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }
}

/// Accepts `data:image/<type>;base64,<payload>` without decoding the payload.
pub fn split_data_uri(data_uri: &str) -> Result<(&str, &str), SurfaceError> {
    let rest = data_uri
        .strip_prefix("data:image/")
        .ok_or(SurfaceError::InvalidDataUri)?;
    let (kind, payload) = rest
        .split_once(";base64,")
        .ok_or(SurfaceError::InvalidDataUri)?;
    if payload.is_empty() {
        return Err(SurfaceError::InvalidDataUri);
    }
    Ok((kind, payload))
}

impl DrawSurface for RecordingSurface {
    fn begin_page(&mut self) {
        self.commands.push(DrawCommand::BeginPage);
    }

    fn draw_rect(&mut self, rect: Rect, style: &ShapeStyle, corner_radius: f64) {
        self.commands.push(DrawCommand::Rect { rect, style: *style, corner_radius });
    }

    fn draw_polygon(&mut self, points: &[Point], style: &ShapeStyle) {
        self.commands.push(DrawCommand::Polygon { points: points.to_vec(), style: *style });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.commands.push(DrawCommand::Line { from, to, color, width });
    }

    fn draw_circle(&mut self, center: Point, radius: f64, style: &ShapeStyle) {
        self.commands.push(DrawCommand::Circle { center, radius, style: *style });
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text { text: text.to_string(), at, style: *style });
    }

    fn draw_image(&mut self, data_uri: &str, rect: Rect) -> Result<(), SurfaceError> {
        split_data_uri(data_uri)?;
        self.commands.push(DrawCommand::Image { rect });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_inset_never_negative() {
        let r = Rect::new(0.0, 0.0, 10.0, 4.0).inset(3.0);
        assert_eq!(r.width, 4.0);
        assert_eq!(r.height, 0.0);
    }

    #[test]
    fn test_split_data_uri() {
        assert_eq!(
            split_data_uri("data:image/png;base64,AAAA").unwrap(),
            ("png", "AAAA")
        );
        assert!(split_data_uri("https://example.com/a.png").is_err());
        assert!(split_data_uri("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_recording_surface_counts_pages() {
        let mut surface = RecordingSurface::new();
        surface.begin_page();
        surface.draw_text("a", Point::new(0.0, 0.0), &TextStyle::new(8.0, FontWeight::Regular, Color::rgb(0, 0, 0)));
        surface.begin_page();
        assert_eq!(surface.page_count(), 2);
        assert_eq!(surface.texts(), vec!["a"]);
    }
}
