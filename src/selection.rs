//! Dishes and the selection of dishes placed on a cover.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};
use crate::layout::Layout;

/// An archived dish.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The unique serial number of the dish.
    pub serial: u32,
    /// The title.
    pub title: String,
    /// The iconic phrase; may be empty.
    pub phrase: String,
    /// The illustration, if one was archived.
    pub image_path: Option<PathBuf>,
}

impl Entry {
    /// Creates a new entry.
    pub fn new(
        serial: u32,
        title: impl Into<String>,
        phrase: impl Into<String>,
        image_path: Option<PathBuf>,
    ) -> Entry {
        Entry {
            serial,
            title: title.into(),
            phrase: phrase.into(),
            image_path,
        }
    }

    /// Returns true if an illustration path is recorded.
    pub fn has_image(&self) -> bool {
        self.image_path.is_some()
    }

    /// Returns true if the phrase is not blank.
    pub fn has_phrase(&self) -> bool {
        !self.phrase.trim().is_empty()
    }
}

/// Resolves serial numbers to entries.
pub trait EntryLookup {
    /// Returns the entry with the given serial, if any.
    fn get_entry(&self, serial: u32) -> Option<&Entry>;
}

impl EntryLookup for HashMap<u32, Entry> {
    fn get_entry(&self, serial: u32) -> Option<&Entry> {
        self.get(&serial)
    }
}

impl EntryLookup for BTreeMap<u32, Entry> {
    fn get_entry(&self, serial: u32) -> Option<&Entry> {
        self.get(&serial)
    }
}

impl EntryLookup for [Entry] {
    fn get_entry(&self, serial: u32) -> Option<&Entry> {
        self.iter().find(|e| e.serial == serial)
    }
}

impl EntryLookup for Vec<Entry> {
    fn get_entry(&self, serial: u32) -> Option<&Entry> {
        self.as_slice().get_entry(serial)
    }
}

/// A reference to one dish together with what to show of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionItem {
    /// The serial of the referenced entry.
    pub serial: u32,
    /// Whether the illustration is drawn.
    pub show_image: bool,
    /// Whether the phrase is drawn.
    pub show_phrase: bool,
}

impl SelectionItem {
    /// Creates an item with explicit flags.
    pub fn new(serial: u32, show_image: bool, show_phrase: bool) -> SelectionItem {
        SelectionItem {
            serial,
            show_image,
            show_phrase,
        }
    }

    /// Creates an item for `entry` that shows whatever content the entry has.
    pub fn for_entry(entry: &Entry) -> SelectionItem {
        SelectionItem::new(entry.serial, entry.has_image(), entry.has_phrase())
    }
}

/// A draft selection bound to a layout.
///
/// The draft never holds more items than the layout has slots, never holds the same dish twice,
/// and never enables a flag for content the dish does not have.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    layout: Layout,
    items: Vec<SelectionItem>,
}

impl Selection {
    /// Creates an empty selection for `layout`.
    pub fn new(layout: Layout) -> Selection {
        Selection {
            layout,
            items: Vec::new(),
        }
    }

    /// The layout of this selection.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Switches to another layout; the draft is cleared if the layout changes.
    pub fn set_layout(&mut self, layout: Layout) {
        if layout != self.layout {
            self.layout = layout;
            self.items.clear();
        }
    }

    /// The selected items in placement order.
    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    /// The number of selected items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if every slot of the layout is taken.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.layout.capacity()
    }

    /// Returns true if the dish with `serial` is already selected.
    pub fn contains(&self, serial: u32) -> bool {
        self.items.iter().any(|it| it.serial == serial)
    }

    /// Appends `entry` with the default flags.
    pub fn add(&mut self, entry: &Entry) -> Result<(), Error> {
        if self.is_full() {
            return Err(Error::new(
                format!(
                    "Layout {} holds at most {} dishes",
                    self.layout,
                    self.layout.capacity()
                ),
                ErrorKind::SelectionFull,
            ));
        }
        if self.contains(entry.serial) {
            return Err(Error::new(
                format!("Dish {} is already selected", entry.serial),
                ErrorKind::InvalidData,
            ));
        }
        self.items.push(SelectionItem::for_entry(entry));
        Ok(())
    }

    /// Removes the item at `index`.
    pub fn remove(&mut self, index: usize) -> Option<SelectionItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Moves the item at `index` one position earlier; returns false if it cannot move.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.items.len() {
            return false;
        }
        self.items.swap(index - 1, index);
        true
    }

    /// Moves the item at `index` one position later; returns false if it cannot move.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.items.len() {
            return false;
        }
        self.items.swap(index, index + 1);
        true
    }

    /// Sets the image flag of the item at `index`; the flag stays off if `entry` has no image.
    pub fn set_show_image(&mut self, index: usize, show: bool, entry: &Entry) {
        if let Some(item) = self.items.get_mut(index) {
            item.show_image = show && entry.has_image();
        }
    }

    /// Sets the phrase flag of the item at `index`; the flag stays off if `entry` has no phrase.
    pub fn set_show_phrase(&mut self, index: usize, show: bool, entry: &Entry) {
        if let Some(item) = self.items.get_mut(index) {
            item.show_phrase = show && entry.has_phrase();
        }
    }

    /// Returns the entries that can still be added.
    pub fn available<'e>(&self, entries: &'e [Entry]) -> Vec<&'e Entry> {
        entries.iter().filter(|e| !self.contains(e.serial)).collect()
    }

    /// Consumes the draft and returns the confirmed items.
    pub fn into_items(self) -> Vec<SelectionItem> {
        self.items
    }
}
