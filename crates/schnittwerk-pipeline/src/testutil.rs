// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for pipeline tests.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, dictionary};

use schnittwerk_core::config::WatchConfig;

/// Build an in-memory PDF with `pages` pages, each carrying a text content
/// stream reading "Page <n>" (1-indexed).
pub fn build_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for n in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {n}"))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(lopdf::Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = pages as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save");
    bytes
}

/// Write a synthetic PDF to `path`.
pub fn write_pdf(path: &Path, pages: usize) {
    std::fs::write(path, build_pdf(pages)).expect("write pdf fixture");
}

/// Build a configuration rooted at `root`, with the workload and preprocess
/// folders created and compression disabled.
pub fn test_config(root: &Path) -> WatchConfig {
    let config = WatchConfig {
        workload_folder: root.join("workload"),
        preprocess_folder: root.join("preprocess"),
        final_folder: None,
        compress_timeout_secs: 120,
    };
    std::fs::create_dir_all(&config.workload_folder).expect("create workload folder");
    config.ensure_output_folders().expect("create output folders");
    config
}
