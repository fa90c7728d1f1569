//! PDF text extraction.
//!
//! Every page of every source is read in order and the page texts are
//! concatenated without any separator. A single page that fails to decode
//! contributes an empty string; a source that is not a PDF at all is fatal.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use lopdf::Document;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::DocPrepError;

/// PDF files must announce themselves within the first KiB.
const HEADER_WINDOW: usize = 1024;
const PDF_MAGIC: &[u8] = b"%PDF-";

/// One PDF input: a file on disk or bytes uploaded through the API.
#[derive(Debug, Clone)]
pub enum PdfSource {
    Path(PathBuf),
    Bytes { name: String, bytes: Vec<u8> },
}

impl PdfSource {
    pub fn path(p: impl Into<PathBuf>) -> Self {
        Self::Path(p.into())
    }

    pub fn bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Bytes {
            name: name.into(),
            bytes,
        }
    }

    /// Display name used in logs and errors.
    pub fn name(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::Bytes { name, .. } => name.clone(),
        }
    }
}

/// Concatenated text of all sources plus page statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub pages: usize,
    pub failed_pages: usize,
}

/// Extracts and concatenates the text of all `sources`, in input order.
///
/// # Errors
/// [`DocPrepError::Io`], [`DocPrepError::NotPdf`] or [`DocPrepError::Unreadable`]
/// for the first source that cannot be opened as a PDF.
pub fn extract_text(sources: &[PdfSource]) -> Result<ExtractedText, DocPrepError> {
    let mut out = ExtractedText::default();

    for src in sources {
        let name = src.name();
        let doc = match src {
            PdfSource::Path(p) => load_path(p, &name)?,
            PdfSource::Bytes { bytes, .. } => load_bytes(bytes, &name)?,
        };

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let part = extract_pages_text(
            page_numbers
                .iter()
                .map(|&no| (no, doc.extract_text(&[no]))),
        );

        info!(
            source = %name,
            pages = part.pages,
            failed_pages = part.failed_pages,
            chars = part.text.chars().count(),
            "pdf text extracted"
        );

        out.text.push_str(&part.text);
        out.pages += part.pages;
        out.failed_pages += part.failed_pages;
    }

    Ok(out)
}

/// Applies the per-page rule: successful pages are appended in order,
/// failed pages contribute nothing and are counted.
pub fn extract_pages_text<I, E>(pages: I) -> ExtractedText
where
    I: IntoIterator<Item = (u32, Result<String, E>)>,
    E: Display,
{
    let mut out = ExtractedText::default();
    for (page_no, res) in pages {
        out.pages += 1;
        match res {
            Ok(text) => out.text.push_str(&text),
            Err(e) => {
                out.failed_pages += 1;
                warn!(page = page_no, error = %e, "page text extraction failed; using empty text");
            }
        }
    }
    out
}

fn load_path(path: &Path, name: &str) -> Result<Document, DocPrepError> {
    let bytes = std::fs::read(path).map_err(|source| DocPrepError::Io {
        name: name.to_string(),
        source,
    })?;
    load_bytes(&bytes, name)
}

fn load_bytes(bytes: &[u8], name: &str) -> Result<Document, DocPrepError> {
    let head = &bytes[..bytes.len().min(HEADER_WINDOW)];
    if !head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
        return Err(DocPrepError::NotPdf {
            name: name.to_string(),
        });
    }

    debug!(source = %name, size = bytes.len(), "parsing pdf");
    Document::load_mem(bytes).map_err(|e| DocPrepError::Unreadable {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Builds a small PDF with one page per entry of `pages`.
    fn make_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn single_page_text_is_extracted() {
        let pdf = make_pdf(&["Hello world."]);
        let out = extract_text(&[PdfSource::bytes("hello.pdf", pdf)]).unwrap();
        assert_eq!(out.pages, 1);
        assert_eq!(out.failed_pages, 0);
        assert_eq!(out.text.trim(), "Hello world.");
    }

    #[test]
    fn sources_and_pages_keep_their_order() {
        let a = make_pdf(&["alpha", "beta"]);
        let b = make_pdf(&["gamma"]);
        let out = extract_text(&[PdfSource::bytes("a.pdf", a), PdfSource::bytes("b.pdf", b)])
            .unwrap();
        assert_eq!(out.pages, 3);
        let ia = out.text.find("alpha").unwrap();
        let ib = out.text.find("beta").unwrap();
        let ig = out.text.find("gamma").unwrap();
        assert!(ia < ib && ib < ig);
    }

    #[test]
    fn failed_page_contributes_empty_text() {
        let pages = vec![
            (1, Ok::<_, String>("A".to_string())),
            (2, Err("broken content stream".to_string())),
            (3, Ok("C".to_string())),
        ];
        let out = extract_pages_text(pages);
        assert_eq!(out.text, "AC");
        assert_eq!(out.pages, 3);
        assert_eq!(out.failed_pages, 1);
    }

    #[test]
    fn non_pdf_bytes_are_rejected() {
        let err = extract_text(&[PdfSource::bytes("notes.txt", b"just text".to_vec())])
            .unwrap_err();
        assert!(matches!(err, DocPrepError::NotPdf { .. }));
    }

    #[test]
    fn truncated_pdf_is_unreadable() {
        let err = extract_text(&[PdfSource::bytes("cut.pdf", b"%PDF-1.5\n%garbage".to_vec())])
            .unwrap_err();
        assert!(matches!(err, DocPrepError::Unreadable { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = extract_text(&[PdfSource::path("/definitely/not/here.pdf")]).unwrap_err();
        assert!(matches!(err, DocPrepError::Io { .. }));
    }
}
