// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

use std::io::Cursor;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cover_menu::archive::{Archive, NewDish};
use cover_menu::compose::{render_cover_to_file, CoverRequest};
use cover_menu::config::CoverConfig;
use cover_menu::imaging;
use cover_menu::layout::Layout;
use cover_menu::selection::{EntryLookup as _, Selection};
use cover_menu::{Error, ErrorKind};

#[derive(Parser, Debug)]
#[command(name = "cover-menu")]
#[command(about = "Compose print-ready cover menus from a dish archive", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available layouts
    Layouts,
    /// List the dishes of an archive
    List {
        /// The archive directory
        #[arg(long, value_name = "DIR")]
        archive: PathBuf,
    },
    /// Archive a new dish
    Add {
        /// The archive directory
        #[arg(long, value_name = "DIR")]
        archive: PathBuf,
        /// The dish title
        #[arg(long)]
        title: String,
        /// The iconic phrase
        #[arg(long, default_value = "")]
        phrase: String,
        /// The recipe text
        #[arg(long, default_value = "")]
        recipe: String,
        /// A tag; may be repeated
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// The illustration, in any supported image format
        #[arg(long, value_name = "FILE")]
        image: PathBuf,
    },
    /// Render a cover page
    Render {
        /// The archive directory
        #[arg(long, value_name = "DIR")]
        archive: PathBuf,
        /// The layout key, for example 2x2 or 3x2-hero
        #[arg(long, default_value = "2x2")]
        layout: Layout,
        /// A dish to place, as SERIAL[:noimg][:nophrase]; may be repeated
        #[arg(long = "item", value_name = "SPEC", required = true, value_parser = parse_item)]
        items: Vec<ItemSpec>,
        /// A full page background image
        #[arg(long, value_name = "FILE")]
        background: Option<PathBuf>,
        /// A JSON file overriding the rendering configuration
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// The output PDF
        #[arg(short, long, value_name = "FILE", default_value = "cover.pdf")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug)]
struct ItemSpec {
    serial: u32,
    hide_image: bool,
    hide_phrase: bool,
}

fn parse_item(s: &str) -> Result<ItemSpec, String> {
    let mut parts = s.split(':');
    let serial = parts
        .next()
        .unwrap_or_default()
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid serial in '{}': {}", s, e))?;
    let mut spec = ItemSpec {
        serial,
        hide_image: false,
        hide_phrase: false,
    };
    for flag in parts {
        match flag.trim() {
            "noimg" => spec.hide_image = true,
            "nophrase" => spec.hide_phrase = true,
            other => return Err(format!("unknown item flag '{}'", other)),
        }
    }
    Ok(spec)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::Layouts => {
            for layout in Layout::ALL {
                let hero = if layout.merges().is_empty() { "" } else { ", hero" };
                println!(
                    "{:<9} {} x {}, {} dishes{}",
                    layout.key(),
                    layout.rows(),
                    layout.cols(),
                    layout.capacity(),
                    hero
                );
            }
        }
        Command::List { archive } => {
            let archive = Archive::open(archive)?;
            for entry in archive.entries()? {
                let image = if entry.has_image() { "img" } else { "   " };
                println!("{:>5}  {}  {}", entry.serial, image, entry.title);
                if entry.has_phrase() {
                    println!("              {}", entry.phrase);
                }
            }
        }
        Command::Add {
            archive,
            title,
            phrase,
            recipe,
            tags,
            image: image_path,
        } => {
            let archive = Archive::open(archive)?;
            let decoded = imaging::load_image(&image_path)?;
            let mut png = Vec::new();
            decoded.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;

            let dish = NewDish {
                title,
                recipe,
                phrase,
                tags,
            };
            let (serial, path) = archive.add_entry(dish, &png)?;
            println!("Archived dish {} ({})", serial, path.display());
        }
        Command::Render {
            archive,
            layout,
            items,
            background,
            config,
            output,
        } => {
            let config = match config {
                Some(path) => CoverConfig::from_json_file(path)?,
                None => CoverConfig::default(),
            };
            let entries = Archive::open(archive)?.entries()?;

            let mut selection = Selection::new(layout);
            for spec in &items {
                let entry = entries.get_entry(spec.serial).ok_or_else(|| {
                    Error::new(
                        format!("No archived dish with serial {}", spec.serial),
                        ErrorKind::UnknownEntry(spec.serial),
                    )
                })?;
                selection.add(entry)?;
                let idx = selection.len() - 1;
                selection.set_show_image(idx, !spec.hide_image, entry);
                selection.set_show_phrase(idx, !spec.hide_phrase, entry);
            }

            let items = selection.into_items();
            let mut request = CoverRequest::new(layout, &items, &entries);
            if let Some(background) = background {
                request = request.with_background(background);
            }
            let plan = render_cover_to_file(&config, &request, &output)?;
            println!(
                "Wrote {} ({} dishes, layout {})",
                output.display(),
                plan.cells.len(),
                layout
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        let spec = parse_item("12").unwrap();
        assert_eq!((spec.serial, spec.hide_image, spec.hide_phrase), (12, false, false));
        let spec = parse_item("3:nophrase:noimg").unwrap();
        assert_eq!((spec.serial, spec.hide_image, spec.hide_phrase), (3, true, true));
        assert!(parse_item("x").is_err());
        assert!(parse_item("4:bold").is_err());
    }
}
