use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::path::Path;
use tracing::{debug, info};

use crate::page_range::PageRange;

/// An opened source PDF. Read-only for the lifetime of a split.
pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        info!(path = %path_str, pages = doc.get_pages().len(), "opened PDF");
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    /// Load from an in-memory buffer, e.g. an uploaded file
    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<Self> {
        let doc = Document::load_mem(bytes)
            .with_context(|| format!("Failed to parse PDF: {}", name))?;
        Ok(PdfDocument {
            doc,
            path: name.to_string(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// File stem of the source, used to name split outputs
    pub fn base_name(&self) -> String {
        Path::new(&self.path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string()
    }

    /// Get metadata from the document info dictionary
    pub fn get_info(&self) -> PdfInfo {
        let mut info = PdfInfo::default();

        if let Ok(Object::Reference(info_ref)) = self.doc.trailer.get(b"Info") {
            if let Ok(Object::Dictionary(dict)) = self.doc.get_object(*info_ref) {
                info.title = get_string_from_dict(dict, b"Title");
                info.author = get_string_from_dict(dict, b"Author");
                info.creator = get_string_from_dict(dict, b"Creator");
                info.producer = get_string_from_dict(dict, b"Producer");
                info.creation_date = get_string_from_dict(dict, b"CreationDate");
                info.mod_date = get_string_from_dict(dict, b"ModDate");
            }
        }

        info.page_count = self.page_count();
        info
    }

    /// Build a new document holding only the pages of `range`, in order.
    ///
    /// Page objects are carried over untouched; objects that were only
    /// reachable from dropped pages are pruned.
    pub fn extract_range(&self, range: PageRange) -> Result<Document> {
        let total = self.page_count();
        if !range.is_within(total) {
            anyhow::bail!("Pages {} are out of range (1-{})", range, total);
        }

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .into_iter()
            .map(|(num, _)| num)
            .filter(|num| *num < range.start || *num > range.end)
            .collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }
        let pruned = new_doc.prune_objects();
        debug!(%range, deleted = pages_to_delete.len(), pruned = pruned.len(), "extracted pages");

        Ok(new_doc)
    }

    /// Serialize a document to an in-memory buffer
    pub fn to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .context("Failed to serialize PDF")?;
        Ok(buffer)
    }
}

#[derive(Debug, Default, Clone)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
    pub page_count: u32,
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        _ => None,
    })
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    // UTF-16 BE with BOM, otherwise treat as PDFDocEncoding (approximated by Latin-1)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16(&u16_chars).ok()
    } else {
        Some(bytes.iter().map(|&b| b as char).collect())
    }
}
