//! The page composer.
//!
//! [`render_cover`][] turns a [`CoverRequest`][] into a single page PDF: it computes the content
//! rectangle of the page, splits it into the slots of the requested layout, plans one cell per
//! selected dish and finally draws the optional background artwork and the cells.
//!
//! [`render_cover`]: fn.render_cover.html
//! [`CoverRequest`]: struct.CoverRequest.html

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::cell::{draw_cell, plan_cell, CellPlan};
use crate::config::CoverConfig;
use crate::error::{Context as _, Error, ErrorKind};
use crate::imaging;
use crate::layout::{compute_slots, content_rect, Layout, Slot};
use crate::render::Renderer;
use crate::selection::{EntryLookup, SelectionItem};
use crate::Rect;

/// What to put on a cover page.
pub struct CoverRequest<'a, L: EntryLookup + ?Sized> {
    /// The layout of the page.
    pub layout: Layout,
    /// The dishes in placement order.
    pub items: &'a [SelectionItem],
    /// Resolves the serials of `items`.
    pub entries: &'a L,
    /// An optional full page background image.
    pub background: Option<PathBuf>,
}

impl<'a, L: EntryLookup + ?Sized> CoverRequest<'a, L> {
    /// Creates a request without background.
    pub fn new(layout: Layout, items: &'a [SelectionItem], entries: &'a L) -> Self {
        CoverRequest {
            layout,
            items,
            entries,
            background: None,
        }
    }

    /// Sets the background image, drawn stretched over the whole page below everything else.
    pub fn with_background(mut self, path: impl Into<PathBuf>) -> Self {
        self.background = Some(path.into());
        self
    }
}

/// The planned geometry of a cover page.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverPlan {
    /// The region available to the slots.
    pub content: Rect,
    /// All slots of the layout, including the ones left empty.
    pub slots: Vec<Slot>,
    /// One plan per placed dish, in slot order.
    pub cells: Vec<CellPlan>,
    /// The number of items that did not fit into the layout.
    pub dropped: usize,
}

/// Plans the cover page without drawing anything.
///
/// Items beyond the capacity of the layout are ignored.  Fails with
/// [`ErrorKind::UnknownEntry`](../error/enum.ErrorKind.html) if a placed item refers to a serial
/// that the lookup does not know.
pub fn plan_cover<L: EntryLookup + ?Sized>(
    config: &CoverConfig,
    request: &CoverRequest<'_, L>,
) -> Result<CoverPlan, Error> {
    let content = content_rect(config.page_size, config.margin, config.header_band);
    let slots = compute_slots(request.layout, content);

    let dropped = request.items.len().saturating_sub(slots.len());
    if dropped > 0 {
        tracing::debug!(
            layout = %request.layout,
            capacity = slots.len(),
            dropped,
            "selection exceeds layout capacity"
        );
    }

    let cells = slots
        .iter()
        .zip(request.items)
        .map(|(slot, item)| {
            let entry = request.entries.get_entry(item.serial).ok_or_else(|| {
                Error::new(
                    format!("No archived dish with serial {}", item.serial),
                    ErrorKind::UnknownEntry(item.serial),
                )
            })?;
            Ok(plan_cell(config, request.layout, slot, item, entry))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    tracing::debug!(layout = %request.layout, cells = cells.len(), "planned cover");
    Ok(CoverPlan {
        content,
        slots,
        cells,
        dropped,
    })
}

/// Renders the cover page and writes the PDF document to `w`.
///
/// A background that is missing or cannot be decoded is skipped with a warning.  Returns the
/// plan that was drawn.
pub fn render_cover<L: EntryLookup + ?Sized>(
    config: &CoverConfig,
    request: &CoverRequest<'_, L>,
    w: impl io::Write,
) -> Result<CoverPlan, Error> {
    let plan = plan_cover(config, request)?;
    let mut renderer = Renderer::new(config.page_size, format!("Cover {}", request.layout));

    if let Some(background) = &request.background {
        draw_background(&mut renderer, config, background)?;
    }
    for cell in &plan.cells {
        draw_cell(&mut renderer, config, cell)?;
    }

    renderer.write(w)?;
    Ok(plan)
}

/// Renders the cover page into the file at `path`, replacing it if it exists.
pub fn render_cover_to_file<L: EntryLookup + ?Sized>(
    config: &CoverConfig,
    request: &CoverRequest<'_, L>,
    path: impl AsRef<Path>,
) -> Result<CoverPlan, Error> {
    let path = path.as_ref();
    let file = fs::File::create(path)
        .with_context(|| format!("Could not create output file {}", path.display()))?;
    render_cover(config, request, file)
}

fn draw_background(
    renderer: &mut Renderer,
    config: &CoverConfig,
    path: &Path,
) -> Result<(), Error> {
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "background not found, skipping");
        return Ok(());
    }
    let image = match imaging::load_image(path) {
        Ok(image) => image,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unreadable background, skipping");
            return Ok(());
        }
    };
    let opaque = imaging::flatten(&image, config.image_background);
    renderer.add_image(&opaque, Rect::from_size(renderer.size()), config.image_dpi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Entry;
    use float_cmp::approx_eq;
    use image::{Rgb, RgbImage};
    use std::collections::HashMap;

    fn archive(dir: &Path, count: u32) -> HashMap<u32, Entry> {
        (1..=count)
            .map(|serial| {
                let path = dir.join(format!("{}.png", serial));
                RgbImage::from_pixel(32, 32, Rgb([serial as u8 * 20, 90, 60]))
                    .save(&path)
                    .expect("save png");
                let entry = Entry::new(
                    serial,
                    format!("Piatto numero {}", serial),
                    "Una frase breve che racconta il piatto",
                    Some(path),
                );
                (serial, entry)
            })
            .collect()
    }

    fn items(count: u32) -> Vec<SelectionItem> {
        (1..=count).map(|s| SelectionItem::new(s, true, true)).collect()
    }

    fn xobject_count(pdf: &[u8]) -> usize {
        let mut warnings = Vec::new();
        let options = printpdf::PdfParseOptions::default();
        let doc = printpdf::PdfDocument::parse(pdf, &options, &mut warnings).expect("parse");
        assert_eq!(doc.pages.len(), 1);
        doc.pages[0]
            .ops
            .iter()
            .filter(|op| matches!(op, printpdf::Op::UseXobject { .. }))
            .count()
    }

    #[test]
    fn test_hero_layout_with_five_dishes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entries = archive(dir.path(), 5);
        let items = items(5);
        let request = CoverRequest::new(Layout::Hero3x2, &items, &entries);
        let config = CoverConfig::default();

        let plan = plan_cover(&config, &request).expect("plan");
        assert_eq!(plan.cells.len(), 5);
        assert_eq!(plan.dropped, 0);
        let hero = &plan.cells[2];
        assert!(hero.slot.hero);
        assert_eq!(hero.serial, 3);
        assert!(approx_eq!(f32, hero.slot.rect.width.0, plan.content.width.0, epsilon = 1e-4));
        assert_eq!(hero.title[0].font_size, 13.0);
        assert!(plan.cells.iter().all(|c| c.image.is_some()));

        let mut pdf = Vec::new();
        render_cover(&config, &request, &mut pdf).expect("render");
        assert_eq!(xobject_count(&pdf), 5);
    }

    #[test]
    fn test_overflowing_selection_is_clamped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entries = archive(dir.path(), 6);
        let items = items(6);
        let request = CoverRequest::new(Layout::Grid2x2, &items, &entries);
        let config = CoverConfig::default();

        let mut pdf = Vec::new();
        let plan = render_cover(&config, &request, &mut pdf).expect("render");
        assert_eq!(plan.cells.len(), 4);
        assert_eq!(plan.dropped, 2);
        let serials: Vec<_> = plan.cells.iter().map(|c| c.serial).collect();
        assert_eq!(serials, vec![1, 2, 3, 4]);
        assert_eq!(xobject_count(&pdf), 4);
    }

    #[test]
    fn test_unknown_serial_is_an_error() {
        let entries: Vec<Entry> = vec![Entry::new(1, "Minestrone", "", None)];
        let items = vec![SelectionItem::new(1, false, false), SelectionItem::new(9, false, false)];
        let request = CoverRequest::new(Layout::TwoRows, &items, &entries);
        let err = plan_cover(&CoverConfig::default(), &request).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnknownEntry(9)));
    }

    #[test]
    fn test_unknown_serial_beyond_capacity_is_ignored() {
        let entries: Vec<Entry> = vec![Entry::new(1, "Minestrone", "", None)];
        let items = vec![SelectionItem::new(1, false, false), SelectionItem::new(9, false, false)];
        let request = CoverRequest::new(Layout::Single, &items, &entries);
        let plan = plan_cover(&CoverConfig::default(), &request).expect("plan");
        assert_eq!(plan.cells.len(), 1);
    }

    #[test]
    fn test_background_is_drawn_or_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entries = archive(dir.path(), 1);
        let items = items(1);
        let config = CoverConfig::default();

        let bg = dir.path().join("bg.png");
        RgbImage::from_pixel(21, 30, Rgb([250, 240, 220])).save(&bg).expect("save bg");
        let request = CoverRequest::new(Layout::Single, &items, &entries).with_background(&bg);
        let mut pdf = Vec::new();
        render_cover(&config, &request, &mut pdf).expect("render");
        assert_eq!(xobject_count(&pdf), 2);

        let request = CoverRequest::new(Layout::Single, &items, &entries)
            .with_background(dir.path().join("missing.png"));
        let mut pdf = Vec::new();
        render_cover(&config, &request, &mut pdf).expect("render without background");
        assert_eq!(xobject_count(&pdf), 1);

        let broken = dir.path().join("broken.png");
        fs::write(&broken, b"not a png").expect("write");
        let request = CoverRequest::new(Layout::Single, &items, &entries).with_background(&broken);
        let mut pdf = Vec::new();
        render_cover(&config, &request, &mut pdf).expect("render with broken background");
        assert_eq!(xobject_count(&pdf), 1);
    }

    #[test]
    fn test_render_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entries: Vec<Entry> = Vec::new();
        let request = CoverRequest::new(Layout::Single, &[], &entries);
        let out = dir.path().join("no").join("such").join("cover.pdf");
        assert!(render_cover_to_file(&CoverConfig::default(), &request, out).is_err());
    }
}
