//! Rendering configuration.
//!
//! Every measure the composer and the cell renderer use is collected in [`CoverConfig`][].  The
//! defaults reproduce the house style of the printed menus; a JSON file can override any subset
//! of the fields:
//!
//! ```json
//! { "margin": 12.0, "title_size": 12.0, "text_color": { "rgb": [40, 30, 20] } }
//! ```
//!
//! [`CoverConfig`]: struct.CoverConfig.html

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Context as _, Error};
use crate::fonts::{Font, FontFamily, FontWeight};
use crate::style::Color;
use crate::{Mm, Size};

/// Maximum phrase line counts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseLines {
    /// Lines for hero slots and for every slot of a dense layout.
    pub dense: usize,
    /// Lines for other slots at least `tall_threshold` high.
    pub tall: usize,
    /// Lines for the remaining slots.
    pub short: usize,
    /// Slot height from which a slot counts as tall (inclusive).
    pub tall_threshold: Mm,
}

impl Default for PhraseLines {
    fn default() -> Self {
        PhraseLines {
            dense: 5,
            tall: 4,
            short: 3,
            tall_threshold: Mm(70.0),
        }
    }
}

/// The measures and styles of a cover page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// The page size.
    pub page_size: Size,
    /// The safety margin on every side of the page.
    pub margin: Mm,
    /// The band below the top margin that is left to the background artwork.
    pub header_band: Mm,
    /// The inner padding of every slot.
    pub cell_padding: Mm,
    /// Image band height as a fraction of the slot height, for plain slots.
    pub image_band_ratio: f32,
    /// Image band height as a fraction of the slot height, for hero slots.
    pub hero_image_band_ratio: f32,
    /// The raster density used to size cropped images.
    pub image_dpi: f32,
    /// The minimum raster size of a cropped image along each axis.
    pub min_image_px: u32,
    /// The distance from the bottom of the image band to the first title baseline.
    pub text_gap_below_image: Mm,
    /// The distance between the title block and the phrase.
    pub phrase_gap: Mm,
    /// The font family for titles and phrases.
    pub font_family: FontFamily,
    /// Title size in points for plain slots.
    pub title_size: f32,
    /// Title size in points for hero slots.
    pub hero_title_size: f32,
    /// Phrase size in points.
    pub phrase_size: f32,
    /// Line height as a multiple of the font size.
    pub line_gap: f32,
    /// Maximum title lines.
    pub title_max_lines: usize,
    /// Maximum phrase lines.
    pub phrase_lines: PhraseLines,
    /// The text color.
    pub text_color: Color,
    /// The color transparent image pixels are flattened against.
    pub image_background: Color,
}

impl Default for CoverConfig {
    fn default() -> Self {
        CoverConfig {
            page_size: Size::a4(),
            margin: Mm(10.0),
            header_band: Mm(30.0),
            cell_padding: Mm(6.0),
            image_band_ratio: 0.65,
            hero_image_band_ratio: 0.75,
            image_dpi: 150.0,
            min_image_px: 200,
            text_gap_below_image: Mm(6.0),
            phrase_gap: Mm(2.0),
            font_family: FontFamily::Helvetica,
            title_size: 11.0,
            hero_title_size: 13.0,
            phrase_size: 8.0,
            line_gap: 1.2,
            title_max_lines: 2,
            phrase_lines: PhraseLines::default(),
            text_color: Color::Greyscale(0),
            image_background: Color::Rgb(255, 255, 255),
        }
    }
}

impl CoverConfig {
    /// Loads a configuration from a JSON file; missing fields keep their default value.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<CoverConfig, Error> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Could not read configuration {}", path.display()))?;
        CoverConfig::from_json_str(&data)
            .with_context(|| format!("Invalid configuration {}", path.display()))
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json_str(data: &str) -> Result<CoverConfig, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// The bold face used for titles.
    pub fn title_font(&self) -> Font {
        Font::new(self.font_family, FontWeight::Bold)
    }

    /// The regular face used for phrases.
    pub fn phrase_font(&self) -> Font {
        Font::new(self.font_family, FontWeight::Regular)
    }

    /// The title size for a hero or plain slot.
    pub fn title_size_for(&self, hero: bool) -> f32 {
        if hero {
            self.hero_title_size
        } else {
            self.title_size
        }
    }

    /// The image band ratio for a hero or plain slot.
    pub fn image_band_ratio_for(&self, hero: bool) -> f32 {
        if hero {
            self.hero_image_band_ratio
        } else {
            self.image_band_ratio
        }
    }

    /// The height of one text line set at `font_size`.
    pub fn line_height(&self, font_size: f32) -> Mm {
        Mm::from_pt(font_size * self.line_gap)
    }
}
