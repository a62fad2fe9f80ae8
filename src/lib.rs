// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Print-ready cover menus for archived dishes.
//!
//! `cover_menu` composes a single A4 page that presents a handful of dishes taken from an
//! [`archive`][]: every dish gets a slot of a fixed grid [`layout::Layout`][], and every slot shows
//! the dish illustration, its title and its iconic phrase, depending on the visibility flags of
//! the [`selection::SelectionItem`][].
//!
//! The crate is split into small layers:
//!
//! - [`fonts`][] measures strings set in the PDF built-in fonts,
//! - [`wrap`][] breaks and ellipsizes text to a maximum width,
//! - [`imaging`][] crops illustrations to fill a target box,
//! - [`layout`][] computes the slot rectangles of a layout,
//! - [`cell`][] plans and draws the content of one slot,
//! - [`compose`][] drives everything and writes the page through [`render`][].
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use cover_menu::compose::{render_cover_to_file, CoverRequest};
//! use cover_menu::config::CoverConfig;
//! use cover_menu::layout::Layout;
//! use cover_menu::selection::{Entry, SelectionItem};
//!
//! let entry = Entry::new(1, "Risotto allo zafferano", "Oro che profuma di casa.", None);
//! let items = vec![SelectionItem::for_entry(&entry)];
//! let entries: HashMap<u32, Entry> = [(entry.serial, entry)].into_iter().collect();
//!
//! let request = CoverRequest::new(Layout::Single, &items, &entries);
//! render_cover_to_file(&CoverConfig::default(), &request, "cover.pdf").expect("render");
//! ```
//!
//! [`archive`]: archive/index.html

#![warn(missing_docs, rust_2018_idioms)]

pub mod archive;
pub mod cell;
pub mod compose;
pub mod config;
pub mod error;
pub mod fonts;
pub mod imaging;
pub mod layout;
pub mod render;
pub mod selection;
pub mod style;
pub mod wrap;

use derive_more::{Add, AddAssign, Div, DivAssign, From, Into, Mul, MulAssign, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};

pub use error::{Context, Error, ErrorKind};

const MM_PER_PT: f32 = 25.4 / 72.0;

/// A length measured in millimeters.
///
/// All geometry in this crate is expressed in millimeters, with the origin in the upper left
/// corner of the page.  Font sizes are the only values given in points.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Div,
    DivAssign,
    From,
    Into,
    Mul,
    MulAssign,
    Sub,
    SubAssign,
    Sum,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Mm(pub f32);

impl Mm {
    /// Converts a length in PDF points to millimeters.
    pub fn from_pt(pt: f32) -> Mm {
        Mm(pt * MM_PER_PT)
    }

    /// Returns this length in PDF points.
    pub fn as_pt(self) -> f32 {
        self.0 / MM_PER_PT
    }

    /// Returns the raw value.
    pub fn as_f32(self) -> f32 {
        self.0
    }

    /// Returns the larger of the two lengths.
    pub fn max(self, other: Mm) -> Mm {
        if other > self {
            other
        } else {
            self
        }
    }

    /// Returns the smaller of the two lengths.
    pub fn min(self, other: Mm) -> Mm {
        if other < self {
            other
        } else {
            self
        }
    }
}

impl From<f64> for Mm {
    fn from(value: f64) -> Mm {
        Mm(value as f32)
    }
}

impl From<i32> for Mm {
    fn from(value: i32) -> Mm {
        Mm(value as f32)
    }
}

impl From<printpdf::Mm> for Mm {
    fn from(mm: printpdf::Mm) -> Mm {
        Mm(mm.0)
    }
}

impl From<Mm> for printpdf::Mm {
    fn from(mm: Mm) -> printpdf::Mm {
        printpdf::Mm(mm.0)
    }
}

impl From<printpdf::Pt> for Mm {
    fn from(pt: printpdf::Pt) -> Mm {
        Mm::from_pt(pt.0)
    }
}

impl From<Mm> for printpdf::Pt {
    fn from(mm: Mm) -> printpdf::Pt {
        printpdf::Pt(mm.as_pt())
    }
}

/// A position on a page, relative to its upper left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Add, AddAssign, Sub, SubAssign)]
pub struct Position {
    /// The horizontal offset.
    pub x: Mm,
    /// The vertical offset, growing downwards.
    pub y: Mm,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: impl Into<Mm>, y: impl Into<Mm>) -> Position {
        Position {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// The size of an area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// The width.
    pub width: Mm,
    /// The height.
    pub height: Mm,
}

impl Size {
    /// Creates a new size.
    pub fn new(width: impl Into<Mm>, height: impl Into<Mm>) -> Size {
        Size {
            width: width.into(),
            height: height.into(),
        }
    }

    /// The ISO A4 portrait page size.
    pub fn a4() -> Size {
        Size::new(Mm(210.0), Mm(297.0))
    }
}

/// Margins around an area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    /// The top margin.
    pub top: Mm,
    /// The right margin.
    pub right: Mm,
    /// The bottom margin.
    pub bottom: Mm,
    /// The left margin.
    pub left: Mm,
}

impl Margins {
    /// Creates margins with the given top, right, bottom and left values.
    pub fn trbl(
        top: impl Into<Mm>,
        right: impl Into<Mm>,
        bottom: impl Into<Mm>,
        left: impl Into<Mm>,
    ) -> Margins {
        Margins {
            top: top.into(),
            right: right.into(),
            bottom: bottom.into(),
            left: left.into(),
        }
    }

    /// Creates margins with the same value on all sides.
    pub fn all(value: impl Into<Mm>) -> Margins {
        let value = value.into();
        Margins::trbl(value, value, value, value)
    }
}

/// An axis-aligned rectangle; `x` and `y` locate its upper left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: Mm,
    /// Top edge.
    pub y: Mm,
    /// Width.
    pub width: Mm,
    /// Height.
    pub height: Mm,
}

impl Rect {
    /// Creates a new rectangle from its upper left corner and its size.
    pub fn new(
        x: impl Into<Mm>,
        y: impl Into<Mm>,
        width: impl Into<Mm>,
        height: impl Into<Mm>,
    ) -> Rect {
        Rect {
            x: x.into(),
            y: y.into(),
            width: width.into(),
            height: height.into(),
        }
    }

    /// Creates a rectangle covering an area of the given size at the origin.
    pub fn from_size(size: Size) -> Rect {
        Rect::new(Mm(0.0), Mm(0.0), size.width, size.height)
    }

    /// The upper left corner.
    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// The size of the rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The right edge.
    pub fn right(&self) -> Mm {
        self.x + self.width
    }

    /// The bottom edge.
    pub fn bottom(&self) -> Mm {
        self.y + self.height
    }

    /// Returns the rectangle shrunk by the given margins.
    pub fn inset(&self, margins: impl Into<Margins>) -> Rect {
        let margins = margins.into();
        Rect {
            x: self.x + margins.left,
            y: self.y + margins.top,
            width: self.width - margins.left - margins.right,
            height: self.height - margins.top - margins.bottom,
        }
    }

    /// Returns true if the two rectangles share a region of non-zero area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        self.x.0 + EPS < other.right().0
            && other.x.0 + EPS < self.right().0
            && self.y.0 + EPS < other.bottom().0
            && other.y.0 + EPS < self.bottom().0
    }
}

impl From<Mm> for Margins {
    fn from(value: Mm) -> Margins {
        Margins::all(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_mm_pt_conversion() {
        let mm = Mm::from_pt(72.0);
        assert!(approx_eq!(f32, mm.0, 25.4, epsilon = 1e-4));
        assert!(approx_eq!(f32, Mm(25.4).as_pt(), 72.0, epsilon = 1e-3));
        let pt: printpdf::Pt = Mm(25.4).into();
        assert!(approx_eq!(f32, pt.0, 72.0, epsilon = 1e-3));
    }

    #[test]
    fn test_mm_arithmetic() {
        let a = Mm(10.0) + Mm(5.0) - Mm(3.0);
        assert_eq!(a, Mm(12.0));
        assert_eq!(a * 2.0, Mm(24.0));
        assert_eq!(a / 4.0, Mm(3.0));
        assert_eq!(Mm(1.0).max(Mm(2.0)), Mm(2.0));
        assert_eq!(Mm(1.0).min(Mm(2.0)), Mm(1.0));
        let total: Mm = vec![Mm(1.0), Mm(2.5)].into_iter().sum();
        assert_eq!(total, Mm(3.5));
    }

    #[test]
    fn test_rect_inset_and_overlap() {
        let r = Rect::new(Mm(0.0), Mm(0.0), Mm(100.0), Mm(50.0));
        let inner = r.inset(Mm(10.0));
        assert_eq!(inner, Rect::new(Mm(10.0), Mm(10.0), Mm(80.0), Mm(30.0)));
        assert!(r.overlaps(&inner));

        let right = Rect::new(Mm(100.0), Mm(0.0), Mm(20.0), Mm(50.0));
        assert!(!r.overlaps(&right), "touching edges do not overlap");
        assert_eq!(r.bottom(), Mm(50.0));
        assert_eq!(r.right(), Mm(100.0));
    }
}
