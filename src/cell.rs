//! Planning and drawing the content of one slot.
//!
//! A slot shows up to three things, top to bottom: the dish illustration, the title and the
//! phrase.  When an illustration is drawn it takes a fixed share of the slot height and the text
//! starts right below it.  Without an illustration the title and the phrase are measured as one
//! block that is centered vertically in the slot.
//!
//! Planning is pure: [`plan_cell`][] only computes rectangles and wrapped lines, so the geometry
//! can be checked without producing a PDF.  [`draw_cell`][] then loads the illustration and
//! emits the drawing operations.
//!
//! [`plan_cell`]: fn.plan_cell.html
//! [`draw_cell`]: fn.draw_cell.html

use std::path::PathBuf;

use image::DynamicImage;

use crate::config::CoverConfig;
use crate::error::Error;
use crate::fonts::{Font, TextMeasure};
use crate::imaging;
use crate::layout::{Layout, Slot};
use crate::render::{raster_size, Renderer};
use crate::selection::{Entry, SelectionItem};
use crate::wrap::wrap_truncated;
use crate::{Mm, Position, Rect};

/// A line of text placed on the page.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// The text.
    pub text: String,
    /// The start of the baseline.
    pub baseline: Position,
    /// The font.
    pub font: Font,
    /// The font size in points.
    pub font_size: f32,
}

/// The band of a slot that receives the illustration.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBand {
    /// The illustration file.
    pub path: PathBuf,
    /// The region covered by the illustration.
    pub rect: Rect,
    /// The raster size the illustration is cropped and scaled to.
    pub pixels: (u32, u32),
}

/// Everything drawn in one slot.
#[derive(Clone, Debug, PartialEq)]
pub struct CellPlan {
    /// The slot.
    pub slot: Slot,
    /// The serial of the dish shown in the slot.
    pub serial: u32,
    /// The illustration, if one is drawn.
    pub image: Option<ImageBand>,
    /// The title lines, centered.
    pub title: Vec<TextLine>,
    /// The phrase lines, left aligned.
    pub phrase: Vec<TextLine>,
}

impl CellPlan {
    /// Returns true if nothing is drawn in the slot.
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.title.is_empty() && self.phrase.is_empty()
    }
}

/// Returns the maximum number of phrase lines in `slot`.
///
/// Hero slots and every slot of a dense layout get the dense allowance; other slots get the tall
/// allowance if they are at least the threshold high and the short one otherwise.
pub fn phrase_max_lines(config: &CoverConfig, layout: Layout, slot: &Slot) -> usize {
    let lines = &config.phrase_lines;
    if slot.hero || layout.dense_phrases() {
        lines.dense
    } else if slot.rect.height >= lines.tall_threshold {
        lines.tall
    } else {
        lines.short
    }
}

/// Computes what is drawn for `item` in `slot`.
///
/// The illustration is planned only if the item shows it and the file exists; a missing file
/// falls back to the centered text layout.
pub fn plan_cell(
    config: &CoverConfig,
    layout: Layout,
    slot: &Slot,
    item: &SelectionItem,
    entry: &Entry,
) -> CellPlan {
    let padded = slot.rect.inset(config.cell_padding);
    let hero = slot.hero;

    let title_font = config.title_font();
    let title_size = config.title_size_for(hero);
    let phrase_font = config.phrase_font();
    let phrase_size = config.phrase_size;

    let title_lines = wrap_truncated(
        entry.title.trim(),
        &title_font,
        title_size,
        padded.width,
        config.title_max_lines,
    );
    let phrase_lines = if item.show_phrase && entry.has_phrase() {
        wrap_truncated(
            &entry.phrase,
            &phrase_font,
            phrase_size,
            padded.width,
            phrase_max_lines(config, layout, slot),
        )
    } else {
        Vec::new()
    };

    let image_path = match &entry.image_path {
        Some(path) if item.show_image => {
            if path.is_file() {
                Some(path.clone())
            } else {
                tracing::warn!(
                    serial = entry.serial,
                    path = %path.display(),
                    "illustration not found, falling back to text only"
                );
                None
            }
        }
        _ => None,
    };

    let title_step = config.line_height(title_size);
    let phrase_step = config.line_height(phrase_size);

    let (image, first_baseline) = match image_path {
        Some(path) => {
            let band = Rect::new(
                padded.x,
                padded.y,
                padded.width,
                slot.rect.height * config.image_band_ratio_for(hero),
            );
            let pixels = raster_size(band.size(), config.image_dpi, config.min_image_px);
            let baseline = band.bottom() + config.text_gap_below_image;
            (Some(ImageBand { path, rect: band, pixels }), baseline)
        }
        None => {
            let title_h = title_step * title_lines.len() as f32;
            let phrase_h = if phrase_lines.is_empty() {
                Mm(0.0)
            } else {
                phrase_step * phrase_lines.len() as f32 + config.phrase_gap
            };
            let block = title_h + phrase_h;
            // optical shift of one title size
            let baseline =
                slot.rect.y + (slot.rect.height - block) / 2.0 + Mm::from_pt(title_size);
            (None, baseline)
        }
    };

    let mut cursor = first_baseline;
    let title = title_lines
        .into_iter()
        .map(|text| {
            let width = title_font.str_width(&text, title_size);
            let x = padded.x + (padded.width - width) / 2.0;
            let line = TextLine {
                text,
                baseline: Position::new(x, cursor),
                font: title_font,
                font_size: title_size,
            };
            cursor += title_step;
            line
        })
        .collect();

    if !phrase_lines.is_empty() {
        cursor += config.phrase_gap;
    }
    let phrase = phrase_lines
        .into_iter()
        .map(|text| {
            let line = TextLine {
                text,
                baseline: Position::new(padded.x, cursor),
                font: phrase_font,
                font_size: phrase_size,
            };
            cursor += phrase_step;
            line
        })
        .collect();

    CellPlan {
        slot: *slot,
        serial: entry.serial,
        image,
        title,
        phrase,
    }
}

/// Draws a planned cell.
///
/// Fails if the illustration exists but cannot be decoded.
pub fn draw_cell(
    renderer: &mut Renderer,
    config: &CoverConfig,
    plan: &CellPlan,
) -> Result<(), Error> {
    if let Some(band) = &plan.image {
        let source = imaging::load_image(&band.path)?;
        let opaque = DynamicImage::ImageRgb8(imaging::flatten(&source, config.image_background));
        let filled = imaging::crop_fill(&opaque, band.pixels.0, band.pixels.1).to_rgb8();
        renderer.add_image(&filled, band.rect, config.image_dpi)?;
    }

    for line in plan.title.iter().chain(plan.phrase.iter()) {
        renderer.print_str(
            line.font,
            line.font_size,
            line.baseline,
            &line.text,
            config.text_color,
        );
    }
    Ok(())
}
