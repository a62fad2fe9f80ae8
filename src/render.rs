//! Low-level PDF rendering utilities.
//!
//! This module provides a thin abstraction over [`printpdf`][]: a [`Renderer`][] collects the
//! drawing operations of a single page on one layer and writes the finished document.  Positions
//! passed to the renderer are relative to the upper left corner of the page; the renderer
//! converts them to PDF user space, whose origin is the lower left corner.
//!
//! [`printpdf`]: https://docs.rs/printpdf/latest/printpdf
//! [`Renderer`]: struct.Renderer.html

use std::io::{self, Write as _};
use std::ops;

use image::RgbImage;

use crate::error::{Context as _, Error};
use crate::fonts::{self, Font};
use crate::style::Color;
use crate::{Mm, Position, Rect, Size};

/// A position relative to the top left corner of the page.
struct PagePosition(Position);

/// A position relative to the bottom left corner of the page (“user space” in PDF terms).
struct UserSpacePosition(Position);

impl UserSpacePosition {
    fn from_page(page_size: Size, position: PagePosition) -> Self {
        Self(Position::new(position.0.x, page_size.height - position.0.y))
    }
}

impl From<UserSpacePosition> for printpdf::Point {
    fn from(pos: UserSpacePosition) -> printpdf::Point {
        printpdf::Point::new(pos.0.x.into(), pos.0.y.into())
    }
}

impl ops::Deref for UserSpacePosition {
    type Target = Position;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Renders a single-page PDF document.
///
/// This is a wrapper around a [`printpdf::PdfDocument`][].
///
/// [`printpdf::PdfDocument`]: https://docs.rs/printpdf/latest/printpdf/struct.PdfDocument.html
pub struct Renderer {
    doc: printpdf::PdfDocument,
    size: Size,
    layer_id: printpdf::LayerInternalId,
    ops: Vec<printpdf::Op>,
    fill_color: Option<Color>,
    image_count: usize,
}

impl Renderer {
    /// Creates a new renderer for one page of the given size and the given document title.
    ///
    /// # Example
    /// ```
    /// use cover_menu::render::Renderer;
    /// use cover_menu::{Mm, Size};
    ///
    /// let r = Renderer::new(Size::a4(), "cover");
    /// assert_eq!(r.size().width, Mm(210.0));
    /// ```
    pub fn new(size: impl Into<Size>, title: impl AsRef<str>) -> Renderer {
        let mut doc = printpdf::PdfDocument::new(title.as_ref());
        let layer = printpdf::Layer::new("Cover");
        let layer_id = doc.add_layer(&layer);
        Renderer {
            doc,
            size: size.into(),
            layer_id,
            ops: Vec::new(),
            fill_color: None,
            image_count: 0,
        }
    }

    /// Returns the page size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the number of images drawn so far.
    pub fn image_count(&self) -> usize {
        self.image_count
    }

    fn transform_position(&self, position: Position) -> UserSpacePosition {
        UserSpacePosition::from_page(self.size, PagePosition(position))
    }

    /// Draws `image` stretched over `rect`.
    ///
    /// `dpi` is the density the raster was prepared for; the image is scaled so that it covers
    /// `rect` exactly whatever its pixel size.
    pub fn add_image(&mut self, image: &RgbImage, rect: Rect, dpi: f32) -> Result<(), Error> {
        let (px_w, px_h) = image.dimensions();

        let mut png = Vec::new();
        image
            .write_to(&mut io::Cursor::new(&mut png), image::ImageFormat::Png)
            .context("Could not encode image for embedding")?;
        let mut warnings = Vec::new();
        let raw = printpdf::RawImage::decode_from_bytes(&png, &mut warnings)
            .context("Could not embed image in the PDF document")?;
        let id = self.doc.add_image(&raw);

        // lower left corner of the rectangle in user space
        let corner = self.transform_position(Position::new(rect.x, rect.bottom()));
        let natural_w = px_w.max(1) as f32 / dpi * 72.0;
        let natural_h = px_h.max(1) as f32 / dpi * 72.0;

        self.ops.push(printpdf::Op::UseXobject {
            id,
            transform: printpdf::XObjectTransform {
                translate_x: Some(printpdf::Pt::from(corner.x)),
                translate_y: Some(printpdf::Pt::from(corner.y)),
                scale_x: Some(rect.width.as_pt() / natural_w),
                scale_y: Some(rect.height.as_pt() / natural_h),
                dpi: Some(dpi),
                ..Default::default()
            },
        });
        self.image_count += 1;
        Ok(())
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.fill_color != Some(color) {
            self.fill_color = Some(color);
            self.ops.push(printpdf::Op::SetFillColor { col: color.into() });
        }
    }

    /// Prints `s` with its baseline starting at `position`.
    ///
    /// Characters the built-in fonts cannot encode are replaced, see
    /// [`fonts::sanitize_builtin`](../fonts/fn.sanitize_builtin.html).
    pub fn print_str(
        &mut self,
        font: Font,
        font_size: f32,
        position: Position,
        s: &str,
        color: Color,
    ) {
        if s.is_empty() {
            return;
        }
        let text = fonts::sanitize_builtin(s).into_owned();
        let cursor = self.transform_position(position);
        let builtin = font.builtin();

        self.set_fill_color(color);
        self.ops.push(printpdf::Op::StartTextSection);
        self.ops.push(printpdf::Op::SetFont {
            font: printpdf::PdfFontHandle::Builtin(builtin),
            size: printpdf::Pt(font_size),
        });
        self.ops
            .push(printpdf::Op::SetTextCursor { pos: cursor.into() });
        self.ops.push(printpdf::Op::ShowText {
            items: vec![printpdf::TextItem::Text(text)],
        });
        self.ops.push(printpdf::Op::EndTextSection);
    }

    /// Writes the PDF document to a writer.
    pub fn write(mut self, w: impl io::Write) -> Result<(), Error> {
        let mut page_ops = Vec::with_capacity(self.ops.len() + 2);
        page_ops.push(printpdf::Op::BeginLayer {
            layer_id: self.layer_id.clone(),
        });
        page_ops.append(&mut self.ops);
        page_ops.push(printpdf::Op::EndLayer);

        let page = printpdf::PdfPage::new(
            self.size.width.into(),
            self.size.height.into(),
            page_ops,
        );
        self.doc.pages.push(page);

        let mut warnings = Vec::new();
        let opts = printpdf::serialize::PdfSaveOptions::default();
        let mut buf = io::BufWriter::new(w);
        self.doc.save_writer(&mut buf, &opts, &mut warnings);
        buf.flush().context("Could not write the PDF document")?;
        Ok(())
    }
}

/// Returns the pixel size a raster should have to cover `size` at `dpi`, but at least `min_px`
/// pixels along each axis.
pub fn raster_size(size: Size, dpi: f32, min_px: u32) -> (u32, u32) {
    let px = |len: Mm| ((len.0 / 25.4 * dpi).round() as u32).max(min_px);
    (px(size.width), px(size.height))
}
