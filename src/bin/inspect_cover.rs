// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

use clap::Parser;
use lopdf::content::Content;
use lopdf::{Document, Object};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inspect_cover")]
#[command(about = "List the illustrations and text runs of a cover PDF", long_about = None)]
struct Args {
    /// Path to the PDF file to inspect
    #[arg(value_name = "FILE")]
    pdf_file: PathBuf,

    /// Also list the text runs of every page
    #[arg(short, long)]
    text: bool,
}

fn get_string_value(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).to_string()),
        Object::Name(name) => Some(String::from_utf8_lossy(name).to_string()),
        _ => None,
    }
}

/// Decodes the bytes of a string operand; UTF-8 when valid, otherwise one byte per character.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

fn push_strings(obj: &Object, out: &mut String) {
    match obj {
        Object::String(bytes, _) => out.push_str(&decode_text(bytes)),
        Object::Array(items) => items.iter().for_each(|item| push_strings(item, out)),
        _ => {}
    }
}

/// Collects the strings shown by the `Tj`, `TJ`, `'` and `"` operators, one entry per operator.
fn text_runs(content: &Content) -> Vec<String> {
    let mut runs = Vec::new();
    for op in &content.operations {
        let shown = match op.operator.as_str() {
            "Tj" | "TJ" | "'" => op.operands.first(),
            "\"" => op.operands.get(2),
            _ => continue,
        };
        let mut run = String::new();
        if let Some(obj) = shown {
            push_strings(obj, &mut run);
        }
        if !run.is_empty() {
            runs.push(run);
        }
    }
    runs
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if !args.pdf_file.exists() {
        eprintln!(
            "Error: The file '{}' does not exist",
            args.pdf_file.display()
        );
        std::process::exit(1);
    }

    let document = Document::load(&args.pdf_file)?;
    println!("Cover: {}", args.pdf_file.display());
    println!("Pages: {}", document.get_pages().len());

    let mut images = Vec::new();
    for (obj_id, obj) in document.objects.iter() {
        if let Object::Stream(stream) = obj {
            let is_image = stream
                .dict
                .get(b"Subtype")
                .ok()
                .and_then(get_string_value)
                .map_or(false, |s| s == "Image");
            if !is_image {
                continue;
            }
            let width = match stream.dict.get(b"Width") {
                Ok(Object::Integer(w)) => *w,
                _ => 0,
            };
            let height = match stream.dict.get(b"Height") {
                Ok(Object::Integer(h)) => *h,
                _ => 0,
            };
            let color_space = stream
                .dict
                .get(b"ColorSpace")
                .ok()
                .and_then(get_string_value)
                .unwrap_or_else(|| "?".to_string());
            images.push((*obj_id, width, height, color_space));
        }
    }

    println!("Image XObjects: {}", images.len());
    for (obj_id, width, height, color_space) in &images {
        println!("  {:?}: {}x{} px, {}", obj_id, width, height, color_space);
    }

    if args.text {
        for (page_no, page_id) in document.get_pages() {
            println!("Page {} text:", page_no);
            let content = document.get_and_decode_page_content(page_id)?;
            for run in text_runs(&content) {
                println!("  {}", run);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;
    use lopdf::StringFormat;

    #[test]
    fn test_text_runs_decode_literal_and_hex_strings() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        "Caffè corretto".as_bytes().to_vec(),
                        StringFormat::Hexadecimal,
                    )],
                ),
                Operation::new(
                    "TJ",
                    vec![Object::Array(vec![
                        Object::String(b"Tiramisu".to_vec(), StringFormat::Literal),
                        Object::Integer(-250),
                        Object::String(b" classico".to_vec(), StringFormat::Literal),
                    ])],
                ),
                Operation::new(
                    "Tj",
                    vec![Object::Array(vec![Object::String(
                        "Panna cotta".as_bytes().to_vec(),
                        StringFormat::Hexadecimal,
                    )])],
                ),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(8)]),
                Operation::new("ET", vec![]),
            ],
        };
        assert_eq!(
            text_runs(&content),
            vec![
                "Caffè corretto".to_string(),
                "Tiramisu classico".to_string(),
                "Panna cotta".to_string(),
            ]
        );
    }

    #[test]
    fn test_decode_text_falls_back_to_single_bytes() {
        assert_eq!(decode_text(b"Caff\xe8"), "Caffè");
    }
}
