//! Text metrics for the PDF built-in fonts.
//!
//! Cover pages are set in one of the standard PDF fonts, so no font file is embedded and the
//! glyph advances come from the Adobe font metrics of the standard 14 fonts.  Widths are stored
//! in thousandths of an em for the printable ASCII range; accented Latin letters are measured
//! like their base letter, which matches the metrics of Helvetica and Courier.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::Mm;

/// Measures the width of a string set at a given font size.
pub trait TextMeasure {
    /// Returns the advance width of `s` at `font_size` (in points).
    fn str_width(&self, s: &str, font_size: f32) -> Mm;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn str_width(&self, s: &str, font_size: f32) -> Mm {
        (**self).str_width(s, font_size)
    }
}

/// A built-in font family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Helvetica, the proportional sans serif used for menus.
    #[default]
    Helvetica,
    /// Courier, a monospaced family.
    Courier,
}

/// The weight of a font within its family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// Regular weight, used for phrases.
    Regular,
    /// Bold weight, used for titles.
    Bold,
}

/// One face of a built-in font family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Font {
    /// The family.
    pub family: FontFamily,
    /// The weight.
    pub weight: FontWeight,
}

impl Font {
    /// Creates a new font.
    pub fn new(family: FontFamily, weight: FontWeight) -> Font {
        Font { family, weight }
    }

    /// Returns the matching `printpdf` built-in font.
    pub fn builtin(&self) -> printpdf::BuiltinFont {
        match (self.family, self.weight) {
            (FontFamily::Helvetica, FontWeight::Regular) => printpdf::BuiltinFont::Helvetica,
            (FontFamily::Helvetica, FontWeight::Bold) => printpdf::BuiltinFont::HelveticaBold,
            (FontFamily::Courier, FontWeight::Regular) => printpdf::BuiltinFont::Courier,
            (FontFamily::Courier, FontWeight::Bold) => printpdf::BuiltinFont::CourierBold,
        }
    }

    /// Returns the advance width of `c` in thousandths of an em.
    pub fn char_width(&self, c: char) -> u16 {
        if self.family == FontFamily::Courier {
            return 600;
        }
        let bold = self.weight == FontWeight::Bold;
        let c = LATIN_FOLD.get(&c).copied().unwrap_or(c);
        match c {
            ' '..='~' => {
                let idx = c as usize - 0x20;
                if bold {
                    HELVETICA_BOLD[idx]
                } else {
                    HELVETICA[idx]
                }
            }
            _ => EXTRA_WIDTHS
                .iter()
                .find(|(ch, _, _)| *ch == c)
                .map(|(_, regular, bold_w)| if bold { *bold_w } else { *regular })
                .unwrap_or(FALLBACK_WIDTH),
        }
    }
}

impl TextMeasure for Font {
    fn str_width(&self, s: &str, font_size: f32) -> Mm {
        let units: u32 = s.chars().map(|c| u32::from(self.char_width(c))).sum();
        Mm::from_pt(units as f32 * font_size / 1000.0)
    }
}

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

// (char, regular, bold)
static EXTRA_WIDTHS: &[(char, u16, u16)] = &[
    ('\u{a0}', 278, 278),
    ('…', 1000, 1000),
    ('‘', 222, 278),
    ('’', 222, 278),
    ('“', 333, 500),
    ('”', 333, 500),
    ('–', 556, 556),
    ('—', 1000, 1000),
    ('«', 556, 556),
    ('»', 556, 556),
    ('°', 400, 400),
    ('€', 556, 556),
    ('·', 278, 278),
    ('•', 350, 350),
    ('ì', 278, 278),
    ('í', 278, 278),
    ('î', 278, 278),
    ('ï', 278, 278),
];

static LATIN_FOLD: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let groups: &[(&str, char)] = &[
        ("àáâãäå", 'a'),
        ("ÀÁÂÃÄÅ", 'A'),
        ("èéêë", 'e'),
        ("ÈÉÊË", 'E'),
        ("ÌÍÎÏ", 'I'),
        ("òóôõö", 'o'),
        ("ÒÓÔÕÖ", 'O'),
        ("ùúûü", 'u'),
        ("ÙÚÛÜ", 'U'),
        ("ç", 'c'),
        ("Ç", 'C'),
        ("ñ", 'n'),
        ("Ñ", 'N'),
        ("ýÿ", 'y'),
        ("Ý", 'Y'),
    ];
    groups
        .iter()
        .flat_map(|(chars, base)| chars.chars().map(move |c| (c, *base)))
        .collect()
});

/// Replaces the characters that the Windows-1252 encoding of the built-in fonts cannot represent.
///
/// Typographic quotes, dashes, the euro sign and the ellipsis are kept.  Everything else outside
/// of Latin-1 becomes `?`.
pub fn sanitize_builtin(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_win1252) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(
            s.chars()
                .map(|c| if is_win1252(c) { c } else { '?' })
                .collect(),
        )
    }
}

/// Returns true if the character has a Windows-1252 code point.
pub fn is_win1252(c: char) -> bool {
    matches!(
        c as u32,
        0x20..=0x7E
            | 0xA0..=0xFF
            | 0x20AC
            | 0x201A
            | 0x0192
            | 0x201E
            | 0x2026
            | 0x2020
            | 0x2021
            | 0x02C6
            | 0x2030
            | 0x0160
            | 0x2039
            | 0x0152
            | 0x017D
            | 0x2018
            | 0x2019
            | 0x201C
            | 0x201D
            | 0x2022
            | 0x2013
            | 0x2014
            | 0x02DC
            | 0x2122
            | 0x0161
            | 0x203A
            | 0x0153
            | 0x017E
            | 0x0178
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_helvetica_widths() {
        let regular = Font::new(FontFamily::Helvetica, FontWeight::Regular);
        let bold = Font::new(FontFamily::Helvetica, FontWeight::Bold);
        assert_eq!(regular.char_width(' '), 278);
        assert_eq!(regular.char_width('i'), 222);
        assert_eq!(bold.char_width('i'), 278);
        assert_eq!(regular.char_width('W'), 944);
        assert_eq!(regular.char_width('~'), 584);
        assert_eq!(bold.char_width('m'), 889);
    }

    #[test]
    fn test_accented_letters_use_base_width() {
        let regular = Font::new(FontFamily::Helvetica, FontWeight::Regular);
        assert_eq!(regular.char_width('è'), regular.char_width('e'));
        assert_eq!(regular.char_width('Ò'), regular.char_width('O'));
        assert_eq!(regular.char_width('ì'), 278);
        assert_eq!(regular.char_width('…'), 1000);
        assert_eq!(regular.char_width('漢'), FALLBACK_WIDTH);
    }

    #[test]
    fn test_courier_is_monospaced() {
        let courier = Font::new(FontFamily::Courier, FontWeight::Bold);
        // 10 chars * 600/1000 * 10pt = 60pt
        let width = courier.str_width("abcdefghij", 10.0);
        assert!(approx_eq!(f32, width.as_pt(), 60.0, epsilon = 1e-3));
    }

    #[test]
    fn test_str_width_scales_with_size() {
        let font = Font::new(FontFamily::Helvetica, FontWeight::Regular);
        let small = font.str_width("Tagliatelle", 8.0);
        let big = font.str_width("Tagliatelle", 16.0);
        assert!(approx_eq!(f32, big.0, small.0 * 2.0, epsilon = 1e-4));
        assert_eq!(font.str_width("", 12.0), Mm(0.0));
    }

    #[test]
    fn test_builtin_mapping() {
        let font = Font::new(FontFamily::Helvetica, FontWeight::Bold);
        assert_eq!(font.builtin(), printpdf::BuiltinFont::HelveticaBold);
        let font = Font::new(FontFamily::Courier, FontWeight::Regular);
        assert_eq!(font.builtin(), printpdf::BuiltinFont::Courier);
    }

    #[test]
    fn test_sanitize_builtin() {
        assert!(matches!(sanitize_builtin("Hello, world!"), Cow::Borrowed(_)));
        assert_eq!(sanitize_builtin("Caffè “buono”…"), "Caffè “buono”…");
        assert_eq!(sanitize_builtin("Hello ☺"), "Hello ?");
    }
}
