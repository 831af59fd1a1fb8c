// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open existing PDF documents and trim their first and last page
// using the `lopdf` crate.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use schnittwerk_core::error::SchnittwerkError;
use tracing::{debug, info, instrument, warn};

/// Reads existing PDF files and produces trimmed copies.
///
/// Wraps `lopdf::Document`. The only mutation offered is [`PdfReader::trim`],
/// which deep-copies every interior page into a fresh document; the source is
/// never modified.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SchnittwerkError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            SchnittwerkError::Pdf(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, SchnittwerkError> {
        let document = Document::load_mem(data).map_err(|err| {
            SchnittwerkError::Pdf(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    // -- Trimming -------------------------------------------------------------

    /// Copy every page except the first and the last into a new document and
    /// return its serialised bytes.
    ///
    /// For an input with N >= 3 pages the output has exactly N - 2 pages, in
    /// the original order. Inputs with 0, 1, or 2 pages have no interior pages
    /// and produce a valid zero-page document; this is deliberate behaviour,
    /// flagged with a warning rather than rejected.
    #[instrument(skip(self), fields(source = self.source_path.as_deref().unwrap_or("<memory>")))]
    pub fn trim(&self) -> Result<Vec<u8>, SchnittwerkError> {
        let pages = self.document.get_pages();
        let total = pages.len() as u32;

        let mut target = Document::with_version("1.5");
        let pages_root_id = target.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        if total >= 3 {
            // lopdf keys pages by 1-indexed page number; the interior is 2..=N-1.
            for page_num in 2..total {
                let page_id = *pages.get(&page_num).ok_or_else(|| {
                    SchnittwerkError::Pdf(format!("page {} not found in page tree", page_num))
                })?;
                let cloned_id =
                    clone_page_into(&self.document, &mut target, page_id, pages_root_id)?;
                kids.push(Object::Reference(cloned_id));
            }
        } else {
            warn!(total, "input has no interior pages — producing an empty document");
        }

        let kept = kids.len();
        let mut pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => kept as i64,
        };

        // MediaBox and Resources may be inherited from the source page tree
        // root; carry them over so pages relying on inheritance keep their
        // geometry and fonts.
        if let Some(source_pages) = root_pages_dict(&self.document) {
            for key in [b"MediaBox".as_slice(), b"Resources".as_slice()] {
                if let Ok(value) = source_pages.get(key) {
                    let cloned = deep_clone_object(&self.document, &mut target, value)?;
                    pages_dict.set(key, cloned);
                }
            }
        }

        target
            .objects
            .insert(pages_root_id, Object::Dictionary(pages_dict));

        let catalog_id = target.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_root_id,
        });
        target.trailer.set("Root", catalog_id);

        let mut output = Vec::new();
        target.save_to(&mut output).map_err(|err| {
            SchnittwerkError::Pdf(format!("failed to serialise trimmed PDF: {}", err))
        })?;

        info!(total, kept, output_bytes = output.len(), "PDF trimmed");
        Ok(output)
    }
}

/// Resolve the source document's page tree root dictionary, if reachable.
fn root_pages_dict(doc: &Document) -> Option<&Dictionary> {
    let catalog = doc.catalog().ok()?;
    let pages_id = catalog.get(b"Pages").ok()?.as_reference().ok()?;
    doc.get_dictionary(pages_id).ok()
}

/// Clone a single page object (and its referenced resources) from `source`
/// into `target`, parenting it under `parent_id`.
///
/// This performs a deep clone — stream data, fonts, and images referenced by
/// the page dictionary are copied as new objects in the target document.
fn clone_page_into(
    source: &Document,
    target: &mut Document,
    page_id: ObjectId,
    parent_id: ObjectId,
) -> Result<ObjectId, SchnittwerkError> {
    let page_object = source.get_object(page_id).map_err(|err| {
        SchnittwerkError::Pdf(format!("cannot read page object {:?}: {}", page_id, err))
    })?;

    let cloned = deep_clone_object(source, target, page_object)?;
    let cloned_id = target.add_object(cloned);

    // Point the cloned page at the target's page tree root.
    if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_id) {
        page_dict.set("Parent", Object::Reference(parent_id));
    }

    Ok(cloned_id)
}

/// Deep-clone a single lopdf Object, recursively resolving references (except
/// /Parent which is deliberately skipped to avoid circular cloning; the caller
/// patches it).
fn deep_clone_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
) -> Result<Object, SchnittwerkError> {
    match object {
        Object::Dictionary(dict) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned_value = deep_clone_object(source, target, value)?;
                new_dict.set(key.clone(), cloned_value);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(deep_clone_object(source, target, item)?);
            }
            Ok(Object::Array(new_arr))
        }
        Object::Reference(ref_id) => {
            // Resolve the reference in the source, clone it, and return a new
            // reference in the target.
            match source.get_object(*ref_id) {
                Ok(referenced) => {
                    let cloned = deep_clone_object(source, target, referenced)?;
                    let new_id = target.add_object(cloned);
                    Ok(Object::Reference(new_id))
                }
                Err(err) => {
                    warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                    Ok(Object::Null)
                }
            }
        }
        Object::Stream(stream) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in stream.dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned_value = deep_clone_object(source, target, value)?;
                new_dict.set(key.clone(), cloned_value);
            }
            Ok(Object::Stream(lopdf::Stream::new(
                new_dict,
                stream.content.clone(),
            )))
        }
        // All other object types (Boolean, Integer, Real, String, Name, Null)
        // are trivially cloneable.
        other => Ok(other.clone()),
    }
}
