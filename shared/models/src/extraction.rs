//! Extraction results shared between the lookup service and its clients.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Toxicological value category searched for in reports and dossiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Noael,
    Ld50,
    Dnel,
}

impl Category {
    /// Categories scanned in paginated CIR reports.
    pub const REPORT: [Category; 2] = [Category::Noael, Category::Ld50];
    /// Categories scanned in ECHA dossier pages.
    pub const DOSSIER: [Category; 3] = [Category::Noael, Category::Ld50, Category::Dnel];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Noael => "NOAEL",
            Category::Ld50 => "LD50",
            Category::Dnel => "DNEL",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Text of one PDF page, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPage {
    pub text: String,
    pub page: u32,
}

impl TextPage {
    pub fn new(text: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            page,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Plain,
    /// Numeric value, rendered bold red.
    Value,
    /// Vocabulary term, rendered yellow.
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

/// Snippet split into styled segments instead of inline markup.
///
/// Renderers decide how to present each style; [`HighlightedText::to_html`]
/// produces the classic span markup with the text escaped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightedText {
    segments: Vec<Segment>,
}

impl HighlightedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        let mut highlighted = Self::new();
        highlighted.push(text, Style::Plain);
        highlighted
    }

    /// Appends a segment. Empty text is dropped and adjacent plain
    /// segments are merged.
    pub fn push(&mut self, text: impl Into<String>, style: Style) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if style == Style::Plain {
            if let Some(last) = self.segments.last_mut() {
                if last.style == Style::Plain {
                    last.text.push_str(&text);
                    return;
                }
            }
        }
        self.segments.push(Segment { text, style });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The snippet without any styling.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Texts of every segment carrying `style`, in order.
    pub fn styled(&self, style: Style) -> Vec<&str> {
        self.segments
            .iter()
            .filter(|s| s.style == style)
            .map(|s| s.text.as_str())
            .collect()
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            let text = escape_html(&segment.text);
            match segment.style {
                Style::Plain => html.push_str(&text),
                Style::Value => {
                    html.push_str("<b style=\"color:red;\">");
                    html.push_str(&text);
                    html.push_str("</b>");
                }
                Style::Keyword => {
                    html.push_str("<span style=\"color:yellow\">");
                    html.push_str(&text);
                    html.push_str("</span>");
                }
            }
        }
        html
    }
}

impl From<Vec<Segment>> for HighlightedText {
    fn from(segments: Vec<Segment>) -> Self {
        let mut highlighted = Self::new();
        for segment in segments {
            highlighted.push(segment.text, segment.style);
        }
        highlighted
    }
}

impl Serialize for HighlightedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HighlightedText", 2)?;
        state.serialize_field("segments", &self.segments)?;
        state.serialize_field("html", &self.to_html())?;
        state.end()
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// One extracted mention. `page` is set for report matches only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub snippet: HighlightedText,
    pub page: Option<u32>,
}

/// A page that yielded no usable text or failed to parse. Never aborts the
/// extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageIssue {
    pub page: u32,
    pub message: String,
}

/// Values found in an ingredient's CIR report PDF.
#[derive(Debug, Clone, Serialize)]
pub struct PdfExtraction {
    pub ingredient: String,
    pub pdf_url: String,
    pub noael: Vec<Match>,
    pub ld50: Vec<Match>,
    pub page_issues: Vec<PageIssue>,
    pub notice: Option<String>,
}

/// Values found on an ECHA registration dossier page.
#[derive(Debug, Clone, Serialize)]
pub struct DossierExtraction {
    pub key: String,
    pub dossier_url: String,
    pub noael: Vec<Match>,
    pub ld50: Vec<Match>,
    pub dnel: Vec<Match>,
    /// HTTP status of the dossier page when it was not a success. The page
    /// body is still scanned.
    pub upstream_status: Option<u16>,
    pub notice: Option<String>,
}
