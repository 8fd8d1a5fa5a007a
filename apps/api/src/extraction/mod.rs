//! Text extraction from uploaded PDFs.
//!
//! A file that cannot be parsed at all is a hard failure. A single page that
//! fails to extract degrades to an empty string and the rest continue.

pub mod handlers;

use lopdf::Document;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_MAX_WORDS: usize = 200;

/// Separator placed between pages in the concatenated text.
const PAGE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("not a PDF: {0}")]
    NotPdf(String),

    #[error("could not read PDF: {0}")]
    Unreadable(String),
}

/// Outcome for one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageExtraction {
    Extracted(String),
    Failed(String),
}

impl PageExtraction {
    /// Extracted text, or empty for a failed page.
    pub fn text(&self) -> &str {
        match self {
            PageExtraction::Extracted(text) => text,
            PageExtraction::Failed(_) => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// `None` or `Some(0)` reads every page.
    pub max_pages: Option<usize>,
    /// `0` disables truncation.
    pub max_words: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_pages: None,
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub filename: String,
    pub num_pages: usize,
    pub extracted_pages: usize,
    pub max_words: usize,
    /// `full_text` cut to the first `max_words` words.
    pub text: String,
    pub full_text: String,
    pub pages: Vec<String>,
}

/// Rejects uploads that are not named `*.pdf` or lack the `%PDF-` header.
pub fn ensure_pdf(filename: &str, bytes: &[u8]) -> Result<(), ExtractionError> {
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(ExtractionError::NotPdf(format!(
            "'{filename}' does not have a .pdf extension"
        )));
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err(ExtractionError::NotPdf(format!(
            "'{filename}' does not start with a PDF header"
        )));
    }
    Ok(())
}

pub fn extract(
    filename: &str,
    bytes: &[u8],
    options: ExtractOptions,
) -> Result<ExtractionResult, ExtractionError> {
    ensure_pdf(filename, bytes)?;

    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Unreadable(e.to_string()))?;
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let num_pages = page_numbers.len();
    let limit = match options.max_pages {
        Some(n) if n > 0 => n.min(num_pages),
        _ => num_pages,
    };

    let outcomes = collect_pages(&page_numbers[..limit], |n| {
        doc.extract_text(&[n]).map_err(|e| e.to_string())
    });
    let pages: Vec<String> = outcomes.iter().map(|p| p.text().to_string()).collect();
    let full_text = pages.join(PAGE_SEPARATOR);
    let text = truncate_words(&full_text, options.max_words);

    Ok(ExtractionResult {
        filename: filename.to_string(),
        num_pages,
        extracted_pages: pages.len(),
        max_words: options.max_words,
        text,
        full_text,
        pages,
    })
}

fn collect_pages<F>(page_numbers: &[u32], mut extract_page: F) -> Vec<PageExtraction>
where
    F: FnMut(u32) -> Result<String, String>,
{
    page_numbers
        .iter()
        .map(|&n| match extract_page(n) {
            Ok(text) => PageExtraction::Extracted(text.trim().to_string()),
            Err(reason) => {
                warn!("Text extraction failed on page {n}: {reason}");
                PageExtraction::Failed(reason)
            }
        })
        .collect()
}

/// First `max_words` whitespace-delimited words joined by single spaces.
/// Text with no more words than the limit (or a limit of 0) is returned as is.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    if max_words == 0 || text.split_whitespace().nth(max_words).is_none() {
        return text.to_string();
    }
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::documents::canvas::{Font, PdfCanvas, A4};

    /// A PDF whose pages each carry one line of text.
    pub(crate) fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
        let mut canvas = PdfCanvas::new(A4);
        for line in lines {
            canvas.set_font(Font::Helvetica, 11.0);
            canvas.draw_string(50.0, 780.0, line);
            canvas.show_page().unwrap();
        }
        let mut bytes = Vec::new();
        canvas.write_to(&mut bytes).unwrap();
        bytes
    }

    fn fifty_words() -> String {
        (1..=50).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_ensure_pdf() {
        assert!(ensure_pdf("a.PDF", b"%PDF-1.7").is_ok());
        assert!(matches!(
            ensure_pdf("a.txt", b"%PDF-1.7"),
            Err(ExtractionError::NotPdf(_))
        ));
        assert!(matches!(
            ensure_pdf("a.pdf", b"hello"),
            Err(ExtractionError::NotPdf(_))
        ));
    }

    #[test]
    fn test_all_pages_when_no_limit() {
        let bytes = pdf_with_pages(&["alpha", "beta", "gamma"]);
        for max_pages in [None, Some(0)] {
            let opts = ExtractOptions {
                max_pages,
                ..Default::default()
            };
            let result = extract("three.pdf", &bytes, opts).unwrap();
            assert_eq!(result.num_pages, 3);
            assert_eq!(result.extracted_pages, 3);
            assert_eq!(result.pages.len(), 3);
            assert!(result.pages[2].contains("gamma"));
        }
    }

    #[test]
    fn test_page_limit() {
        let bytes = pdf_with_pages(&["alpha", "beta", "gamma"]);
        let opts = ExtractOptions {
            max_pages: Some(2),
            ..Default::default()
        };
        let result = extract("three.pdf", &bytes, opts).unwrap();
        assert_eq!(result.num_pages, 3);
        assert_eq!(result.extracted_pages, 2);
        assert!(!result.full_text.contains("gamma"));
        assert_eq!(result.full_text, result.pages.join("\n\n"));
    }

    #[test]
    fn test_page_limit_larger_than_document() {
        let bytes = pdf_with_pages(&["alpha"]);
        let opts = ExtractOptions {
            max_pages: Some(10),
            ..Default::default()
        };
        assert_eq!(extract("one.pdf", &bytes, opts).unwrap().extracted_pages, 1);
    }

    #[test]
    fn test_word_limit_keeps_full_text() {
        let words = fifty_words();
        let bytes = pdf_with_pages(&[words.as_str()]);
        let opts = ExtractOptions {
            max_pages: None,
            max_words: 5,
        };
        let result = extract("words.pdf", &bytes, opts).unwrap();
        assert_eq!(result.text, "word1 word2 word3 word4 word5");
        assert_eq!(result.max_words, 5);
        assert_eq!(result.full_text.split_whitespace().count(), 50);
    }

    #[test]
    fn test_unreadable_pdf_is_hard_failure() {
        let err = extract("bad.pdf", b"%PDF-1.7\nnot really a pdf", ExtractOptions::default())
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)));
    }

    #[test]
    fn test_failed_page_degrades_to_empty() {
        let outcomes = collect_pages(&[1, 2, 3], |n| {
            if n == 2 {
                Err("bad content stream".to_string())
            } else {
                Ok(format!("  page {n}\n"))
            }
        });
        assert_eq!(outcomes[0], PageExtraction::Extracted("page 1".to_string()));
        assert_eq!(outcomes[1].text(), "");
        assert!(matches!(outcomes[1], PageExtraction::Failed(_)));
        assert_eq!(outcomes[2].text(), "page 3");
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("a  b\nc d", 2), "a b");
        assert_eq!(truncate_words("a  b\nc", 3), "a  b\nc");
        assert_eq!(truncate_words("a b c", 0), "a b c");
        assert_eq!(truncate_words("", 5), "");
    }
}
