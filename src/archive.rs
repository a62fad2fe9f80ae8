//! The append-only dish archive.
//!
//! An archive is a directory holding an `archive.jsonl` file, one JSON record per line, and an
//! `images/` directory with the illustrations of the archived dishes.  Records are only ever
//! appended; serials grow monotonically.
//!
//! Illustrations of older archives live in an `img/` directory and are named after the serial
//! (`img/<serial>.png`); they are used when a record has no usable image path.

use std::fs;
use std::io::{BufRead as _, BufReader, Write as _};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Context as _, Error, ErrorKind};
use crate::selection::Entry;

/// The name of the record file inside an archive directory.
pub const RECORDS_FILE: &str = "archive.jsonl";
/// The directory that receives new illustrations.
pub const IMAGES_DIR: &str = "images";
/// The directory of illustrations named `<serial>.png`.
pub const LEGACY_IMAGES_DIR: &str = "img";

/// One archived dish as stored on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The serial number.
    pub serial: u32,
    /// The title.
    pub title: String,
    /// The full recipe text.
    #[serde(default)]
    pub recipe: String,
    /// The iconic phrase.
    #[serde(default)]
    pub phrase: String,
    /// The illustration, relative to the archive directory.
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    /// Free form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Local time of archiving, `YYYY-mm-dd HH:MM:SS`.
    #[serde(default)]
    pub archived_at: String,
}

/// A dish about to be archived.
#[derive(Clone, Debug, Default)]
pub struct NewDish {
    /// The title.
    pub title: String,
    /// The full recipe text.
    pub recipe: String,
    /// The iconic phrase.
    pub phrase: String,
    /// Free form tags.
    pub tags: Vec<String>,
}

/// An archive directory.
#[derive(Clone, Debug)]
pub struct Archive {
    root: PathBuf,
}

impl Archive {
    /// Opens the archive in `root`, creating the directory, the record file and the image
    /// directory if they do not exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Archive, Error> {
        let archive = Archive { root: root.into() };
        fs::create_dir_all(archive.images_dir()).with_context(|| {
            format!("Could not create archive directory {}", archive.root.display())
        })?;
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(archive.records_path())
            .with_context(|| format!("Could not open {}", archive.records_path().display()))?;
        Ok(archive)
    }

    /// The archive directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path of the record file.
    pub fn records_path(&self) -> PathBuf {
        self.root.join(RECORDS_FILE)
    }

    /// The directory receiving new illustrations.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    /// Reads all records in file order.  Blank lines are ignored.
    pub fn records(&self) -> Result<Vec<Record>, Error> {
        let path = self.records_path();
        let file = fs::File::open(&path)
            .with_context(|| format!("Could not open {}", path.display()))?;

        let mut records: Vec<Record> = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("Could not read {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line)
                .with_context(|| format!("Malformed record at {}:{}", path.display(), idx + 1))?;
            records.push(record);
        }
        Ok(records)
    }

    /// Returns the serial the next archived dish gets: one more than the largest serial, or 1 for
    /// an empty archive. Fails with [`ErrorKind::InvalidData`] once the largest serial is
    /// `u32::MAX`.
    pub fn next_serial(&self) -> Result<u32, Error> {
        match self.records()?.iter().map(|r| r.serial).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                Error::new(
                    format!("Serial {} of {} is the last one", max, self.records_path().display()),
                    ErrorKind::InvalidData,
                )
            }),
        }
    }

    /// Archives a dish together with its illustration, given as encoded PNG bytes.
    ///
    /// Returns the serial of the new dish and the path of the stored illustration.
    pub fn add_entry(&self, dish: NewDish, image_png: &[u8]) -> Result<(u32, PathBuf), Error> {
        let serial = self.next_serial()?;
        let now = chrono::Local::now();

        let relative = Path::new(IMAGES_DIR).join(format!(
            "dish_{}_{}.png",
            serial,
            now.format("%Y%m%d_%H%M%S")
        ));
        let image_path = self.root.join(&relative);
        fs::write(&image_path, image_png)
            .with_context(|| format!("Could not write image {}", image_path.display()))?;

        let record = Record {
            serial,
            title: dish.title,
            recipe: dish.recipe,
            phrase: dish.phrase,
            image_path: Some(relative),
            tags: dish.tags,
            archived_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        let mut line = serde_json::to_string(&record).context("Could not encode record")?;
        line.push('\n');

        let path = self.records_path();
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Could not open {}", path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("Could not append to {}", path.display()))?;

        tracing::info!(serial, title = %record.title, "archived dish");
        Ok((serial, image_path))
    }

    /// Returns the archived dishes as entries for the cover composer.
    ///
    /// Records with a blank title are skipped; titles and phrases are trimmed.  The illustration
    /// is the recorded image if it exists, else `img/<serial>.png` if that exists.
    pub fn entries(&self) -> Result<Vec<Entry>, Error> {
        let entries = self
            .records()?
            .into_iter()
            .filter(|r| !r.title.trim().is_empty())
            .map(|r| {
                let image = self.resolve_image(&r);
                Entry::new(r.serial, r.title.trim(), r.phrase.trim(), image)
            })
            .collect();
        Ok(entries)
    }

    fn resolve_image(&self, record: &Record) -> Option<PathBuf> {
        let recorded = record
            .image_path
            .as_ref()
            .map(|p| self.root.join(p))
            .filter(|p| p.is_file());
        recorded.or_else(|| {
            let legacy = self
                .root
                .join(LEGACY_IMAGES_DIR)
                .join(format!("{}.png", record.serial));
            if legacy.is_file() {
                Some(legacy)
            } else {
                None
            }
        })
    }
}
