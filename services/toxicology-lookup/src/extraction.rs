//! Toxicological value extraction.
//!
//! Each category is found with one case-insensitive pattern: the category
//! term, then a number followed by a unit-like token, then everything up to
//! the next period or the end of the line. The tail is lazy but unbounded
//! within a line, so a mention without a closing period runs on to the end of
//! that line.

use lazy_static::lazy_static;
use regex::Regex;
use toxref_models::{Category, Match, TextPage};

use crate::highlight::highlight;

lazy_static! {
    static ref NOAEL_RE: Regex = category_pattern("NOAEL");
    static ref LD50_RE: Regex = category_pattern("LD50");
    static ref DNEL_RE: Regex = category_pattern("DNEL");
}

fn category_pattern(term: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)(.*?{}.*?\d+\.?\d*\s*[a-zA-Z/]+.*?(\.|$))",
        regex::escape(term)
    ))
    .unwrap()
}

pub fn pattern(category: Category) -> &'static Regex {
    match category {
        Category::Noael => &NOAEL_RE,
        Category::Ld50 => &LD50_RE,
        Category::Dnel => &DNEL_RE,
    }
}

/// NOAEL and LD50 mentions found in a paginated report.
#[derive(Debug, Clone, Default)]
pub struct ReportScan {
    pub noael: Vec<Match>,
    pub ld50: Vec<Match>,
}

impl ReportScan {
    pub fn is_empty(&self) -> bool {
        self.noael.is_empty() && self.ld50.is_empty()
    }
}

/// Raw mentions found in a flat text blob, one list per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextScan {
    pub noael: Vec<String>,
    pub ld50: Vec<String>,
    pub dnel: Vec<String>,
}

/// Scans pages line by line.
///
/// A matching line is reported together with the line above it, since PDF
/// layout often splits a sentence across lines. Matches keep page order, then
/// line order; nothing is merged across pages.
pub fn scan_pages<'a, I>(pages: I) -> ReportScan
where
    I: IntoIterator<Item = &'a TextPage>,
{
    let mut scan = ReportScan::default();

    for page in pages {
        let lines: Vec<&str> = page.text.split('\n').collect();
        for (i, line) in lines.iter().enumerate() {
            for category in Category::REPORT {
                if !pattern(category).is_match(line) {
                    continue;
                }
                let previous = if i > 0 { lines[i - 1] } else { "" };
                let found = Match {
                    snippet: highlight(&format!("{}\n{}", previous, line)),
                    page: Some(page.page),
                };
                match category {
                    Category::Noael => scan.noael.push(found),
                    _ => scan.ld50.push(found),
                }
            }
        }
    }

    scan
}

/// Collects every non-overlapping mention of each category in `text`,
/// searching the whole string rather than line by line.
///
/// A single trailing newline is ignored, so a mention on the last line may
/// end at that newline instead of a period.
pub fn scan_text(text: &str) -> TextScan {
    let text = text.strip_suffix('\n').unwrap_or(text);
    let mut scan = TextScan::default();

    for category in Category::DOSSIER {
        let found = pattern(category)
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        match category {
            Category::Noael => scan.noael = found,
            Category::Ld50 => scan.ld50 = found,
            Category::Dnel => scan.dnel = found,
        }
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use toxref_models::Style;

    #[test]
    fn test_noael_match_includes_previous_line() {
        let page = TextPage::new(
            "Study conducted over 90 days.\nNOAEL value was 1,234.5 mg/kg/day for rats.",
            4,
        );
        let scan = scan_pages([&page]);

        assert_eq!(scan.noael.len(), 1);
        assert!(scan.ld50.is_empty());

        let found = &scan.noael[0];
        assert_eq!(found.page, Some(4));
        assert_eq!(
            found.snippet.plain_text(),
            "Study conducted over 90 days.\nNOAEL value was 1,234.5 mg/kg/day for rats."
        );
        assert_eq!(found.snippet.styled(Style::Value), vec!["1,234.5"]);
        let keywords = found.snippet.styled(Style::Keyword);
        assert!(keywords.contains(&"rats"));
        assert!(keywords.contains(&"mg/kg/day"));
    }

    #[test]
    fn test_first_line_has_empty_context() {
        let page = TextPage::new("Oral LD50 in rats was 5 g/kg.\nunrelated", 1);
        let scan = scan_pages([&page]);

        assert_eq!(scan.ld50.len(), 1);
        assert_eq!(scan.ld50[0].snippet.plain_text(), "\nOral LD50 in rats was 5 g/kg.");
    }

    #[test]
    fn test_no_mentions_yields_empty_scan() {
        let pages = vec![
            TextPage::new("Cosmetic Ingredient Review\nFinal report", 1),
            TextPage::new("Nothing about toxicity here.", 2),
        ];
        let scan = scan_pages(&pages);

        assert!(scan.noael.is_empty());
        assert!(scan.ld50.is_empty());
        assert!(scan.is_empty());
    }

    #[test]
    fn test_mention_without_value_is_ignored() {
        let page = TextPage::new("The NOAEL could not be established", 1);
        assert!(scan_pages([&page]).is_empty());
    }

    #[test]
    fn test_line_can_match_both_categories() {
        let page = TextPage::new("The noael was 100 mg/kg and the LD50 was 2 g/kg", 2);
        let scan = scan_pages([&page]);

        assert_eq!(scan.noael.len(), 1);
        assert_eq!(scan.ld50.len(), 1);
    }

    #[test]
    fn test_matches_follow_page_then_line_order() {
        let pages = vec![
            TextPage::new("LD50 of 1 g/kg\nfiller\nLD50 of 2 g/kg", 1),
            TextPage::new("LD50 of 3 g/kg", 2),
        ];
        let scan = scan_pages(&pages);

        let order: Vec<(String, Option<u32>)> = scan
            .ld50
            .iter()
            .map(|m| (m.snippet.plain_text(), m.page))
            .collect();
        assert_eq!(
            order,
            vec![
                ("\nLD50 of 1 g/kg".to_string(), Some(1)),
                ("filler\nLD50 of 2 g/kg".to_string(), Some(1)),
                ("\nLD50 of 3 g/kg".to_string(), Some(2)),
            ]
        );
    }

    #[test]
    fn test_scan_text_finds_dnel_only() {
        let scan = scan_text("DNEL for workers: 5 mg/kg.");

        assert_eq!(scan.dnel, vec!["DNEL for workers: 5 mg/kg."]);
        assert!(scan.noael.is_empty());
        assert!(scan.ld50.is_empty());
    }

    #[test]
    fn test_scan_text_collects_every_mention_in_order() {
        let text = "Summary. NOAEL: 50 mg/kg bw/day. Other text. NOAEL: 150 mg/kg bw/day.\nLD50 > 2000 mg/kg bw";
        let scan = scan_text(text);

        assert_eq!(
            scan.noael,
            vec![
                "Summary. NOAEL: 50 mg/kg bw/day.",
                " Other text. NOAEL: 150 mg/kg bw/day."
            ]
        );
        // Runs to the end of the text when no period follows.
        assert_eq!(scan.ld50, vec!["LD50 > 2000 mg/kg bw"]);
    }

    #[test]
    fn test_last_line_ends_before_trailing_newline() {
        let scan = scan_text("Intro.\nAcute LD50 2000 mg/kg bw\n");
        assert_eq!(scan.ld50, vec!["Acute LD50 2000 mg/kg bw"]);

        // Only one trailing newline is dropped.
        let scan = scan_text("Intro.\nAcute LD50 2000 mg/kg bw\n\n");
        assert!(scan.ld50.is_empty());
    }

    #[test]
    fn test_tail_runs_to_next_period() {
        let scan = scan_text("NOAEL 10 mg/kg in one study and LD50 20 mg/kg in another.");

        // One NOAEL match swallows the LD50 sentence; the LD50 pattern
        // still finds its own mention independently.
        assert_eq!(scan.noael, vec!["NOAEL 10 mg/kg in one study and LD50 20 mg/kg in another."]);
        assert_eq!(scan.ld50.len(), 1);
    }
}
