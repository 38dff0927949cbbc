//! PDF backend
//!
//! `PdfSurface` buffers content operations per page and assembles the lopdf
//! document in `finish`. Sheet coordinates are top-left based; every y is
//! flipped against the page height on the way in.
//!
//! Fonts are the standard Type1 Helvetica pair with WinAnsi encoding, so the
//! metrics in `render::fonts` match what the viewer draws.

use std::path::Path;

use base64::Engine;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::config::SheetConfig;
use crate::error::SurfaceError;
use crate::render::fonts;
use crate::render::surface::*;

/// Bezier control distance for a quarter circle.
const KAPPA: f64 = 0.552_284_75;

#[derive(Default)]
struct PageBuffer {
    operations: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
}

pub struct PdfSurface {
    doc: Document,
    pages_id: ObjectId,
    font_regular: ObjectId,
    font_bold: ObjectId,
    page_width: f64,
    page_height: f64,
    pages: Vec<PageBuffer>,
    image_count: usize,
}

fn real(value: f64) -> Object {
    (value as f32).into()
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Center-crop `image` to the aspect ratio of `rect` (cover fit).
pub fn cover_crop(image: &DynamicImage, rect: Rect) -> DynamicImage {
    let (w, h) = (image.width() as f64, image.height() as f64);
    if w == 0.0 || h == 0.0 || rect.width <= 0.0 || rect.height <= 0.0 {
        return image.clone();
    }

    let target = rect.width / rect.height;
    let (crop_w, crop_h) = if w / h > target {
        ((h * target).round().max(1.0), h)
    } else {
        (w, (w / target).round().max(1.0))
    };
    let x = ((w - crop_w) / 2.0).floor() as u32;
    let y = ((h - crop_h) / 2.0).floor() as u32;
    image.crop_imm(x, y, crop_w as u32, crop_h as u32)
}

impl PdfSurface {
    pub fn new(page_width: f64, page_height: f64) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_regular = doc.add_object(font_dictionary("Helvetica"));
        let font_bold = doc.add_object(font_dictionary("Helvetica-Bold"));

        Self {
            doc,
            pages_id,
            font_regular,
            font_bold,
            page_width,
            page_height,
            pages: Vec::new(),
            image_count: 0,
        }
    }

    pub fn for_config(config: &SheetConfig) -> Self {
        Self::new(config.page_width, config.page_height)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn flip(&self, y: f64) -> f64 {
        self.page_height - y
    }

    fn push(&mut self, operations: impl IntoIterator<Item = Operation>) {
        match self.pages.last_mut() {
            Some(page) => page.operations.extend(operations),
            None => tracing::warn!("Drawing command issued before the first page; dropped"),
        }
    }

    fn style_operations(style: &ShapeStyle) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(3);
        if let Some(fill) = style.fill {
            let [r, g, b] = fill.unit();
            ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        }
        if let Some(stroke) = style.stroke {
            let [r, g, b] = stroke.unit();
            ops.push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
            ops.push(Operation::new("w", vec![real(style.line_width)]));
        }
        ops
    }

    fn paint_operator(style: &ShapeStyle) -> &'static str {
        match (style.fill.is_some(), style.stroke.is_some()) {
            (true, true) => "B",
            (true, false) => "f",
            (false, true) => "S",
            (false, false) => "n",
        }
    }

    fn curve(c1: (f64, f64), c2: (f64, f64), to: (f64, f64)) -> Operation {
        Operation::new(
            "c",
            vec![real(c1.0), real(c1.1), real(c2.0), real(c2.1), real(to.0), real(to.1)],
        )
    }

    /// Rounded rectangle path in PDF space; (x, y) is the bottom-left corner.
    fn rounded_rect_path(x: f64, y: f64, w: f64, h: f64, radius: f64) -> Vec<Operation> {
        let r = radius.min(w / 2.0).min(h / 2.0);
        let k = r * KAPPA;
        let (right, top) = (x + w, y + h);

        vec![
            Operation::new("m", vec![real(x + r), real(y)]),
            Operation::new("l", vec![real(right - r), real(y)]),
            Self::curve((right - r + k, y), (right, y + r - k), (right, y + r)),
            Operation::new("l", vec![real(right), real(top - r)]),
            Self::curve((right, top - r + k), (right - r + k, top), (right - r, top)),
            Operation::new("l", vec![real(x + r), real(top)]),
            Self::curve((x + r - k, top), (x, top - r + k), (x, top - r)),
            Operation::new("l", vec![real(x), real(y + r)]),
            Self::curve((x, y + r - k), (x + r - k, y), (x + r, y)),
            Operation::new("h", vec![]),
        ]
    }

    /// Assemble the document. Fails when nothing was drawn.
    pub fn finish(mut self) -> Result<Document, SurfaceError> {
        if self.pages.is_empty() {
            return Err(SurfaceError::NoPage);
        }

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in std::mem::take(&mut self.pages) {
            let content = Content { operations: page.operations }.encode()?;
            let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

            let mut xobjects = Dictionary::new();
            for (name, id) in page.images {
                xobjects.set(name, id);
            }

            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        "F1" => self.font_regular,
                        "F2" => self.font_bold,
                    },
                    "XObject" => xobjects,
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), real(self.page_width), real(self.page_height)],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        tracing::debug!("Assembled PDF with {} pages", count);
        Ok(self.doc)
    }

    pub fn to_bytes(self) -> Result<Vec<u8>, SurfaceError> {
        let mut doc = self.finish()?;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn save(self, path: &Path) -> Result<(), SurfaceError> {
        let mut doc = self.finish()?;
        doc.save(path)?;
        tracing::info!("Wrote {:?}", path);
        Ok(())
    }
}

impl DrawSurface for PdfSurface {
    fn begin_page(&mut self) {
        self.pages.push(PageBuffer::default());
    }

    fn draw_rect(&mut self, rect: Rect, style: &ShapeStyle, corner_radius: f64) {
        let y = self.flip(rect.bottom());
        let mut ops = vec![Operation::new("q", vec![])];
        ops.extend(Self::style_operations(style));
        if corner_radius > 0.0 {
            ops.extend(Self::rounded_rect_path(rect.x, y, rect.width, rect.height, corner_radius));
        } else {
            ops.push(Operation::new(
                "re",
                vec![real(rect.x), real(y), real(rect.width), real(rect.height)],
            ));
        }
        ops.push(Operation::new(Self::paint_operator(style), vec![]));
        ops.push(Operation::new("Q", vec![]));
        self.push(ops);
    }

    fn draw_polygon(&mut self, points: &[Point], style: &ShapeStyle) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut ops = vec![Operation::new("q", vec![])];
        ops.extend(Self::style_operations(style));
        ops.push(Operation::new("m", vec![real(first.x), real(self.flip(first.y))]));
        for p in rest {
            ops.push(Operation::new("l", vec![real(p.x), real(self.flip(p.y))]));
        }
        ops.push(Operation::new("h", vec![]));
        ops.push(Operation::new(Self::paint_operator(style), vec![]));
        ops.push(Operation::new("Q", vec![]));
        self.push(ops);
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        let [r, g, b] = color.unit();
        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![real(width)]),
            Operation::new("m", vec![real(from.x), real(self.flip(from.y))]),
            Operation::new("l", vec![real(to.x), real(self.flip(to.y))]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ];
        self.push(ops);
    }

    fn draw_circle(&mut self, center: Point, radius: f64, style: &ShapeStyle) {
        let (cx, cy) = (center.x, self.flip(center.y));
        let (r, k) = (radius, radius * KAPPA);

        let mut ops = vec![Operation::new("q", vec![])];
        ops.extend(Self::style_operations(style));
        ops.push(Operation::new("m", vec![real(cx + r), real(cy)]));
        ops.push(Self::curve((cx + r, cy + k), (cx + k, cy + r), (cx, cy + r)));
        ops.push(Self::curve((cx - k, cy + r), (cx - r, cy + k), (cx - r, cy)));
        ops.push(Self::curve((cx - r, cy - k), (cx - k, cy - r), (cx, cy - r)));
        ops.push(Self::curve((cx + k, cy - r), (cx + r, cy - k), (cx + r, cy)));
        ops.push(Operation::new("h", vec![]));
        ops.push(Operation::new(Self::paint_operator(style), vec![]));
        ops.push(Operation::new("Q", vec![]));
        self.push(ops);
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let width = fonts::text_width(text, style.size, style.weight);
        let x = match style.align {
            Align::Left => at.x,
            Align::Center => at.x - width / 2.0,
            Align::Right => at.x - width,
        };
        let font = match style.weight {
            FontWeight::Regular => "F1",
            FontWeight::Bold => "F2",
        };
        let [r, g, b] = style.color.unit();

        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("Tf", vec![font.into(), real(style.size)]),
            Operation::new("Td", vec![real(x), real(self.flip(at.y))]),
            Operation::new(
                "Tj",
                vec![Object::String(fonts::to_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ];
        self.push(ops);
    }

    fn draw_image(&mut self, data_uri: &str, rect: Rect) -> Result<(), SurfaceError> {
        if self.pages.is_empty() {
            return Err(SurfaceError::NoPage);
        }

        let (_, payload) = split_data_uri(data_uri)?;
        let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
        let decoded = image::load_from_memory(&bytes)?;
        let rgb = cover_crop(&decoded, rect).to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            rgb.into_raw(),
        );
        // sets /Filter /FlateDecode; the document-wide pass skips filtered streams
        stream.compress()?;
        let image_id = self.doc.add_object(stream);

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        let y = self.flip(rect.bottom());
        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![real(rect.width), Object::Integer(0), Object::Integer(0), real(rect.height), real(rect.x), real(y)],
            ),
            Operation::new("Do", vec![name.as_str().into()]),
            Operation::new("Q", vec![]),
        ];

        if let Some(page) = self.pages.last_mut() {
            page.images.push((name, image_id));
        }
        self.push(ops);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_data_uri(width: u32, height: u32) -> String {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40])));
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    #[test]
    fn test_finish_without_pages_fails() {
        let surface = PdfSurface::new(595.28, 841.89);
        assert!(matches!(surface.finish(), Err(SurfaceError::NoPage)));
    }

    #[test]
    fn test_pages_and_header() {
        let mut surface = PdfSurface::new(595.28, 841.89);
        surface.begin_page();
        surface.draw_rect(Rect::new(10.0, 10.0, 100.0, 50.0), &ShapeStyle::fill(Color::rgb(0, 0, 0)), 4.0);
        surface.draw_text("Page (1)", Point::new(20.0, 40.0), &TextStyle::new(8.0, FontWeight::Bold, Color::rgb(0, 0, 0)));
        surface.begin_page();
        surface.draw_circle(Point::new(50.0, 50.0), 5.0, &ShapeStyle::stroke(Color::rgb(0, 0, 0), 1.0));
        assert_eq!(surface.page_count(), 2);

        let bytes = surface.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_image_embedding() {
        let mut surface = PdfSurface::new(200.0, 200.0);
        surface.begin_page();
        surface.draw_image(&png_data_uri(8, 4), Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        assert!(surface.draw_image("data:image/png;base64,@@@", Rect::new(0.0, 0.0, 20.0, 20.0)).is_err());
        assert!(surface.draw_image("not-an-image", Rect::new(0.0, 0.0, 20.0, 20.0)).is_err());
        assert_eq!(surface.pages[0].images.len(), 1);
    }

    #[test]
    fn test_image_stream_is_flate_compressed() {
        let mut surface = PdfSurface::new(200.0, 200.0);
        surface.begin_page();
        surface.draw_image(&png_data_uri(64, 64), Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();

        let (_, image_id) = surface.pages[0].images[0].clone();
        let stream = surface.doc.get_object(image_id).unwrap().as_stream().unwrap();
        assert_eq!(stream.dict.get(b"Filter").unwrap().as_name().unwrap(), b"FlateDecode");
        // 64x64 RGB of one colour is 12288 raw bytes
        assert!(stream.content.len() < 64 * 64 * 3);
    }

    #[test]
    fn test_image_before_page_fails() {
        let mut surface = PdfSurface::new(200.0, 200.0);
        let result = surface.draw_image(&png_data_uri(2, 2), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(matches!(result, Err(SurfaceError::NoPage)));
    }

    #[test]
    fn test_cover_crop_matches_target_aspect() {
        let wide = DynamicImage::ImageRgb8(RgbImage::new(80, 40));
        let cropped = cover_crop(&wide, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!((cropped.width(), cropped.height()), (40, 40));

        let tall = DynamicImage::ImageRgb8(RgbImage::new(30, 90));
        let cropped = cover_crop(&tall, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!((cropped.width(), cropped.height()), (30, 15));
    }
}
