// Copyright (c) 2025 Ismael Theiskaa
// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Utilities for text wrapping.

use std::mem;

use crate::fonts::TextMeasure;
use crate::Mm;

/// The character appended to a truncated line.
pub const ELLIPSIS: &str = "…";

/// Combines a sequence of words into lines with a maximum width.
///
/// Words are never split: a word that is wider than the maximum width is emitted on a line of
/// its own and the wrapper records that it has overflowed.
pub struct Wrapper<'m, 's, M: TextMeasure + ?Sized, I: Iterator<Item = &'s str>> {
    iter: I,
    measure: &'m M,
    font_size: f32,
    width: Mm,
    buf: String,
    has_overflowed: bool,
}

impl<'m, 's, M: TextMeasure + ?Sized, I: Iterator<Item = &'s str>> Wrapper<'m, 's, M, I> {
    /// Creates a new wrapper for the given word sequence and with the given maximum width.
    pub fn new(iter: I, measure: &'m M, font_size: f32, width: Mm) -> Wrapper<'m, 's, M, I> {
        Wrapper {
            iter,
            measure,
            font_size,
            width,
            buf: String::new(),
            has_overflowed: false,
        }
    }

    /// Returns true if this wrapper has emitted a word that is wider than the maximum width.
    pub fn has_overflowed(&self) -> bool {
        self.has_overflowed
    }

    fn fits(&self, s: &str) -> bool {
        self.measure.str_width(s, self.font_size) <= self.width
    }
}

impl<'m, 's, M: TextMeasure + ?Sized, I: Iterator<Item = &'s str>> Iterator
    for Wrapper<'m, 's, M, I>
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(word) = self.iter.next() {
            if !self.fits(word) {
                self.has_overflowed = true;
            }

            if self.buf.is_empty() {
                self.buf.push_str(word);
                continue;
            }

            let candidate = format!("{} {}", self.buf, word);
            if self.fits(&candidate) {
                self.buf = candidate;
            } else {
                // Close the current line; the word starts the next one
                return Some(mem::replace(&mut self.buf, word.to_owned()));
            }
        }

        if self.buf.is_empty() {
            None
        } else {
            Some(mem::take(&mut self.buf))
        }
    }
}

/// Greedily wraps `text` into lines no wider than `max_width`.
///
/// Whitespace (including newlines) only separates words.  Empty or all-whitespace input yields
/// no lines.
pub fn wrap_lines<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    font_size: f32,
    max_width: Mm,
) -> Vec<String> {
    Wrapper::new(text.split_whitespace(), measure, font_size, max_width).collect()
}

/// Keeps at most `max_lines` lines, ellipsizing the last kept line if lines were dropped.
///
/// The last kept line loses characters from its end until the line followed by [`ELLIPSIS`][]
/// fits into `max_width`.  If not even one character fits, the ellipsis joins the previous line
/// when that line followed by a space and the ellipsis still fits, so that wrapping the result
/// again yields the same lines.  Otherwise the line is the ellipsis alone.
///
/// [`ELLIPSIS`]: constant.ELLIPSIS.html
pub fn truncate_lines<M: TextMeasure + ?Sized>(
    mut lines: Vec<String>,
    measure: &M,
    font_size: f32,
    max_width: Mm,
    max_lines: usize,
) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);

    if let Some(mut last) = lines.pop() {
        while !last.is_empty()
            && measure.str_width(&format!("{}{}", last, ELLIPSIS), font_size) > max_width
        {
            last.pop();
        }
        let last = last.trim_end();
        if last.is_empty() {
            if let Some(prev) = lines.last_mut() {
                let joined = format!("{} {}", prev, ELLIPSIS);
                if measure.str_width(&joined, font_size) <= max_width {
                    *prev = joined;
                    return lines;
                }
            }
        }
        lines.push(format!("{}{}", last, ELLIPSIS));
    }
    lines
}

/// Wraps `text` and truncates the result to `max_lines` lines.
///
/// # Examples
///
/// ```
/// use cover_menu::fonts::{Font, FontFamily, FontWeight};
/// use cover_menu::wrap::wrap_truncated;
/// use cover_menu::Mm;
///
/// let font = Font::new(FontFamily::Courier, FontWeight::Regular);
/// // Courier at 10pt: 6pt per character, so 61pt hold ten characters.
/// let lines = wrap_truncated("the quick brown fox jumps", &font, 10.0, Mm::from_pt(61.0), 2);
/// assert_eq!(lines, vec!["the quick", "brown fox…"]);
/// ```
pub fn wrap_truncated<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    font_size: f32,
    max_width: Mm,
    max_lines: usize,
) -> Vec<String> {
    let lines = wrap_lines(text, measure, font_size, max_width);
    truncate_lines(lines, measure, font_size, max_width, max_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{Font, FontFamily, FontWeight};

    fn courier() -> Font {
        Font::new(FontFamily::Courier, FontWeight::Regular)
    }

    fn helvetica() -> Font {
        Font::new(FontFamily::Helvetica, FontWeight::Regular)
    }

    // Ten Courier characters at 10pt.
    fn ten_chars() -> Mm {
        Mm::from_pt(61.0)
    }

    const SAMPLES: &[&str] = &[
        "Risotto mantecato allo zafferano con midollo arrosto e polvere di liquirizia",
        "Un piatto che racconta la pianura: nebbia, burro, pazienza e il rumore lontano di una \
         cucina che si sveglia presto",
        "Precipitevolissimevolmente breve",
        "a b c d e f g h i j k l m n o p q r s t u v w x y z",
        "  spazi   multipli\n e ritorni\ta capo  ",
    ];

    #[test]
    fn test_greedy_wrap() {
        let lines = wrap_lines("the quick brown fox jumps", &courier(), 10.0, ten_chars());
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_empty_input_yields_no_lines() {
        assert!(wrap_lines("", &courier(), 10.0, ten_chars()).is_empty());
        assert!(wrap_lines(" \n\t ", &courier(), 10.0, ten_chars()).is_empty());
    }

    #[test]
    fn test_overlong_word_stays_whole() {
        let font = courier();
        let mut wrapper = Wrapper::new(
            "a supercalifragilistic b".split_whitespace(),
            &font,
            10.0,
            ten_chars(),
        );
        assert_eq!(wrapper.next().as_deref(), Some("a"));
        assert_eq!(wrapper.next().as_deref(), Some("supercalifragilistic"));
        assert_eq!(wrapper.next().as_deref(), Some("b"));
        assert!(wrapper.next().is_none());
        assert!(wrapper.has_overflowed());
    }

    #[test]
    fn test_lines_fit_unless_single_word() {
        let font = helvetica();
        for width in [20.0f32, 35.0, 60.0] {
            for sample in SAMPLES {
                for line in wrap_lines(sample, &font, 9.0, Mm(width)) {
                    let fits = font.str_width(&line, 9.0) <= Mm(width);
                    let single_word = line.split_whitespace().count() == 1;
                    assert!(fits || single_word, "line {:?} too wide at {}", line, width);
                }
            }
        }
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let font = helvetica();
        for sample in SAMPLES {
            let lines = wrap_lines(sample, &font, 8.0, Mm(40.0));
            let again = wrap_lines(&lines.join("\n"), &font, 8.0, Mm(40.0));
            assert_eq!(lines, again);
        }
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        let lines = wrap_truncated("the quick brown fox jumps", &courier(), 10.0, ten_chars(), 2);
        assert_eq!(lines, vec!["the quick", "brown fox…"]);
    }

    #[test]
    fn test_truncate_shortens_last_line() {
        let lines = wrap_truncated("quick brownfoxes jumps", &courier(), 10.0, ten_chars(), 1);
        assert_eq!(lines, vec!["quick…"]);
        // A full ten-character line leaves no room for the ellipsis
        let lines = wrap_truncated("abcdefghij klm", &courier(), 10.0, ten_chars(), 1);
        assert_eq!(lines, vec!["abcdefghi…"]);
    }

    #[test]
    fn test_truncate_to_ellipsis_alone() {
        // Not even one character fits next to the ellipsis
        let lines = wrap_truncated("ab cd", &courier(), 10.0, Mm::from_pt(7.0), 1);
        assert_eq!(lines, vec![ELLIPSIS]);
    }

    #[test]
    fn test_lone_ellipsis_joins_previous_line() {
        let font = helvetica();
        // "W…" is wider than 17pt, "i …" is 15pt wide
        let lines = wrap_truncated("i WWW WWW", &font, 10.0, Mm::from_pt(17.0), 2);
        assert_eq!(lines, vec!["i …"]);
        let again = wrap_truncated(&lines.join("\n"), &font, 10.0, Mm::from_pt(17.0), 2);
        assert_eq!(lines, again);

        // Without room on the previous line the ellipsis stays on its own
        let lines = wrap_truncated("iiiiiii WWW WWW", &font, 10.0, Mm::from_pt(17.0), 2);
        assert_eq!(lines, vec!["iiiiiii", ELLIPSIS]);
        let again = wrap_truncated(&lines.join("\n"), &font, 10.0, Mm::from_pt(17.0), 2);
        assert_eq!(lines, again);
    }

    #[test]
    fn test_no_ellipsis_without_truncation() {
        let lines = wrap_truncated("the quick", &courier(), 10.0, ten_chars(), 2);
        assert_eq!(lines, vec!["the quick"]);
        let lines = wrap_truncated("", &courier(), 10.0, ten_chars(), 2);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_truncation_bounds_and_stability() {
        let font = helvetica();
        for sample in SAMPLES {
            for max_lines in 1..4 {
                let full = wrap_lines(sample, &font, 8.0, Mm(30.0));
                let lines = wrap_truncated(sample, &font, 8.0, Mm(30.0), max_lines);
                assert!(lines.len() <= max_lines);
                if full.len() > max_lines {
                    assert!(lines.last().unwrap().ends_with(ELLIPSIS));
                    let again = wrap_truncated(&lines.join("\n"), &font, 8.0, Mm(30.0), max_lines);
                    assert_eq!(lines, again);
                } else {
                    assert_eq!(lines, full);
                }
            }
        }
    }

    #[test]
    fn test_zero_lines() {
        let lines = wrap_truncated("anything", &courier(), 10.0, ten_chars(), 0);
        assert!(lines.is_empty());
    }
}
