//! PDF Processor
//!
//! Splits report PDFs into per-page text.

use pdf_extract::{Document, PlainTextOutput};
use std::panic::{self, AssertUnwindSafe};
use toxref_models::{PageIssue, TextPage};
use toxref_utils::{ToxrefError, ToxrefResult};
use tracing::warn;

/// Pages with usable text plus the pages that had none.
#[derive(Debug, Clone, Default)]
pub struct PdfPages {
    pub pages: Vec<TextPage>,
    pub issues: Vec<PageIssue>,
}

pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts text page by page. A document that cannot be opened is an
    /// error; a page that fails or has no text is recorded as an issue and
    /// the remaining pages are still read.
    pub fn extract_pages(&self, data: &[u8]) -> ToxrefResult<PdfPages> {
        let mut document = Document::load_mem(data)
            .map_err(|e| ToxrefError::document_processing(format!("Failed to open PDF: {}", e)))?;
        if document.is_encrypted() {
            document.decrypt("").map_err(|e| {
                ToxrefError::document_processing(format!("Failed to decrypt PDF: {}", e))
            })?;
        }

        let outcomes = document
            .get_pages()
            .into_keys()
            .map(|page| (page, Self::page_text(&document, page)));

        Ok(Self::collect_pages(outcomes))
    }

    fn page_text(document: &Document, page: u32) -> Result<String, String> {
        // pdf-extract panics on some malformed fonts and content streams.
        panic::catch_unwind(AssertUnwindSafe(|| {
            let mut text = String::new();
            {
                let mut output = PlainTextOutput::new(&mut text);
                pdf_extract::output_doc_page(document, &mut output, page)
                    .map_err(|e| format!("{:?}", e))?;
            }
            Ok(text)
        }))
        .unwrap_or_else(|_| Err("PDF parser aborted on malformed page".to_string()))
    }

    /// Sorts per-page outcomes into text pages and issues.
    pub fn collect_pages<I>(outcomes: I) -> PdfPages
    where
        I: IntoIterator<Item = (u32, Result<String, String>)>,
    {
        let mut result = PdfPages::default();
        for (page, outcome) in outcomes {
            match outcome {
                Ok(text) if !text.trim().is_empty() => {
                    result.pages.push(TextPage::new(text, page));
                }
                Ok(_) => {
                    warn!(page, "No text found on PDF page");
                    result.issues.push(PageIssue {
                        page,
                        message: format!("No text found on page {}", page),
                    });
                }
                Err(message) => {
                    warn!(page, error = %message, "Failed to extract text from PDF page");
                    result.issues.push(PageIssue {
                        page,
                        message: format!("Error extracting text from page {}: {}", page, message),
                    });
                }
            }
        }
        result
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}
