//! Layout descriptors and the grid engine.
//!
//! A [`Layout`][] names a fixed grid of rows and columns.  The grid engine splits the usable
//! content rectangle of the page into equally sized cells and enumerates them in reading order,
//! which is also the order in which selected dishes are placed.  A layout may carry
//! [`MergeRule`][]s that widen one cell over its neighbours; such a widened cell is a *hero*
//! slot.
//!
//! [`Layout`]: enum.Layout.html
//! [`MergeRule`]: struct.MergeRule.html

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};
use crate::{Mm, Rect};

/// Widens the cell at `(row, col)` so that it spans `span` columns.
///
/// The cells covered by the widened cell do not produce slots of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeRule {
    /// The row of the widened cell (zero-based, top to bottom).
    pub row: usize,
    /// The first column of the widened cell.
    pub col: usize,
    /// The number of columns the cell spans.
    pub span: usize,
}

const HERO_MERGES: &[MergeRule] = &[MergeRule {
    row: 1,
    col: 0,
    span: 2,
}];

/// The fixed set of cover layouts.
///
/// The keys follow the `rows x cols` convention of the menu designers: `2x1` is two rows of one
/// column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    /// One slot filling the page (`1x1`).
    #[serde(rename = "1x1")]
    Single,
    /// Two stacked slots (`2x1`).
    #[serde(rename = "2x1")]
    TwoRows,
    /// Three stacked slots (`3x1`).
    #[serde(rename = "3x1")]
    ThreeRows,
    /// A two by two grid (`2x2`).
    #[serde(rename = "2x2")]
    Grid2x2,
    /// Three rows of two columns with the middle row merged into one hero slot (`3x2-hero`).
    #[serde(rename = "3x2-hero")]
    Hero3x2,
    /// Three rows of two columns (`3x2`).
    #[serde(rename = "3x2")]
    Grid3x2,
}

impl Layout {
    /// All layouts, in increasing capacity.
    pub const ALL: [Layout; 6] = [
        Layout::Single,
        Layout::TwoRows,
        Layout::ThreeRows,
        Layout::Grid2x2,
        Layout::Hero3x2,
        Layout::Grid3x2,
    ];

    /// The key of this layout, for example `3x2-hero`.
    pub fn key(self) -> &'static str {
        match self {
            Layout::Single => "1x1",
            Layout::TwoRows => "2x1",
            Layout::ThreeRows => "3x1",
            Layout::Grid2x2 => "2x2",
            Layout::Hero3x2 => "3x2-hero",
            Layout::Grid3x2 => "3x2",
        }
    }

    /// The number of grid rows.
    pub fn rows(self) -> usize {
        match self {
            Layout::Single => 1,
            Layout::TwoRows | Layout::Grid2x2 => 2,
            Layout::ThreeRows | Layout::Hero3x2 | Layout::Grid3x2 => 3,
        }
    }

    /// The number of grid columns.
    pub fn cols(self) -> usize {
        match self {
            Layout::Single | Layout::TwoRows | Layout::ThreeRows => 1,
            Layout::Grid2x2 | Layout::Hero3x2 | Layout::Grid3x2 => 2,
        }
    }

    /// The merge rules of this layout.
    pub fn merges(self) -> &'static [MergeRule] {
        match self {
            Layout::Hero3x2 => HERO_MERGES,
            _ => &[],
        }
    }

    /// The number of slots, that is the maximum number of dishes on the page.
    pub fn capacity(self) -> usize {
        let merged_away: usize = self.merges().iter().map(|m| m.span.saturating_sub(1)).sum();
        self.rows() * self.cols() - merged_away
    }

    /// Returns true if the slots of this layout get the larger phrase allowance.
    pub fn dense_phrases(self) -> bool {
        matches!(self, Layout::Hero3x2 | Layout::Grid3x2)
    }

    fn merge_at(self, row: usize, col: usize) -> Option<&'static MergeRule> {
        self.merges().iter().find(|m| m.row == row && m.col == col)
    }

    fn is_covered(self, row: usize, col: usize) -> bool {
        self.merges()
            .iter()
            .any(|m| m.row == row && col > m.col && col < m.col + m.span)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Layout {
    type Err = Error;

    /// Parses a layout key; the historical `LO1` to `LO6` names are accepted as well.
    fn from_str(s: &str) -> Result<Layout, Error> {
        let key = s.trim().to_ascii_lowercase();
        let layout = match key.as_str() {
            "1x1" | "lo1" => Layout::Single,
            "2x1" | "lo2" => Layout::TwoRows,
            "3x1" | "lo3" => Layout::ThreeRows,
            "2x2" | "lo4" => Layout::Grid2x2,
            "3x2-hero" | "3x2hero" | "hero" | "lo5" => Layout::Hero3x2,
            "3x2" | "lo6" => Layout::Grid3x2,
            _ => {
                return Err(Error::new(
                    format!(
                        "Unknown layout '{}', expected one of 1x1, 2x1, 3x1, 2x2, 3x2-hero, 3x2",
                        s
                    ),
                    ErrorKind::InvalidData,
                ))
            }
        };
        Ok(layout)
    }
}

/// One placement region of a layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    /// The region on the page.
    pub rect: Rect,
    /// True for a merged, widened slot.
    pub hero: bool,
}

/// Computes the slots of `layout` inside `content`, in placement order.
///
/// Cells are enumerated row by row from the top, and from left to right within a row.
pub fn compute_slots(layout: Layout, content: Rect) -> Vec<Slot> {
    let rows = layout.rows();
    let cols = layout.cols();
    let cell_w = content.width / cols as f32;
    let cell_h = content.height / rows as f32;

    let mut slots = Vec::with_capacity(layout.capacity());
    for row in 0..rows {
        for col in 0..cols {
            if layout.is_covered(row, col) {
                continue;
            }
            let x = content.x + cell_w * col as f32;
            let y = content.y + cell_h * row as f32;
            let (width, hero) = match layout.merge_at(row, col) {
                Some(merge) => (cell_w * merge.span as f32, true),
                None => (cell_w, false),
            };
            slots.push(Slot {
                rect: Rect::new(x, y, width, cell_h),
                hero,
            });
        }
    }
    slots
}

/// Returns the usable content rectangle of a page: the page minus `margin` on every side, minus
/// a header band of `header` below the top margin.
pub fn content_rect(page: crate::Size, margin: Mm, header: Mm) -> Rect {
    Rect::new(
        margin,
        margin + header,
        page.width - margin * 2.0,
        page.height - margin * 2.0 - header,
    )
}
