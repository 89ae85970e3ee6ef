//! Snippet highlighting.
//!
//! Two passes over the plain parts of a snippet: thousands-grouped numbers
//! first, then the fixed toxicology vocabulary. Segments that already carry a
//! style are never rescanned, so a highlighted snippet can be fed back in
//! without nesting.

use lazy_static::lazy_static;
use regex::Regex;
use toxref_models::{HighlightedText, Style};

/// Terms marked as keywords. Matched case-sensitively on word boundaries.
pub const KEYWORDS: [&str; 9] = [
    "rat", "NOAEL", "LD50", "rats", "rabbits", "ld50", "g/kg", "mg/kg/day", "mg/kg",
];

lazy_static! {
    static ref VALUE_RE: Regex = Regex::new(r"\d+,\d+\.?\d*").unwrap();
    static ref KEYWORD_RE: Regex = Regex::new(&format!(
        r"\b({})\b",
        KEYWORDS.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|")
    ))
    .unwrap();
}

pub fn highlight(text: &str) -> HighlightedText {
    highlight_segments(HighlightedText::plain(text))
}

/// Runs both passes over the plain segments of `text`.
pub fn highlight_segments(text: HighlightedText) -> HighlightedText {
    let with_values = mark_plain(text, &VALUE_RE, Style::Value);
    mark_plain(with_values, &KEYWORD_RE, Style::Keyword)
}

fn mark_plain(text: HighlightedText, pattern: &Regex, style: Style) -> HighlightedText {
    let mut marked = HighlightedText::new();
    for segment in text.into_segments() {
        if segment.style != Style::Plain {
            marked.push(segment.text, segment.style);
            continue;
        }

        let mut last = 0;
        for found in pattern.find_iter(&segment.text) {
            marked.push(&segment.text[last..found.start()], Style::Plain);
            marked.push(found.as_str(), style);
            last = found.end();
        }
        marked.push(&segment.text[last..], Style::Plain);
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_values_and_keywords_are_marked() {
        let text = highlight("Study conducted over 90 days.\nNOAEL value was 1,234.5 mg/kg/day for rats.");

        assert_eq!(text.styled(Style::Value), vec!["1,234.5"]);
        assert_eq!(text.styled(Style::Keyword), vec!["NOAEL", "mg/kg/day", "rats"]);
        assert_eq!(
            text.to_html(),
            "Study conducted over 90 days.\n<span style=\"color:yellow\">NOAEL</span> value was \
             <b style=\"color:red;\">1,234.5</b> <span style=\"color:yellow\">mg/kg/day</span> for \
             <span style=\"color:yellow\">rats</span>."
        );
    }

    #[test]
    fn test_plain_numbers_are_not_values() {
        let text = highlight("LD50 was 2000 mg/kg in rabbits");
        assert!(text.styled(Style::Value).is_empty());
        assert_eq!(text.styled(Style::Keyword), vec!["LD50", "mg/kg", "rabbits"]);
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        let text = highlight("Pirate ratio; Ld50 and NOAELs");
        assert!(text.styled(Style::Keyword).is_empty());

        let text = highlight("5 g/kg bw, ld50 in a rat");
        assert_eq!(text.styled(Style::Keyword), vec!["g/kg", "ld50", "rat"]);
    }

    #[test]
    fn test_value_without_decimal_part() {
        let text = highlight("1,000 and 12,5. and 3,14159");
        assert_eq!(text.styled(Style::Value), vec!["1,000", "12,5.", "3,14159"]);
    }

    #[test]
    fn test_highlighting_twice_does_not_nest() {
        let once = highlight("NOAEL of 1,500 mg/kg in rats");
        let twice = highlight_segments(once.clone());

        assert_eq!(once, twice);
        assert_eq!(twice.to_html().matches("<b ").count(), 1);
    }

    proptest! {
        #[test]
        fn prop_highlight_preserves_text(text in "[a-zA-Z0-9 ,./]{0,60}") {
            prop_assert_eq!(highlight(&text).plain_text(), text);
        }

        #[test]
        fn prop_highlight_is_idempotent(text in "(rat|rats|NOAEL|LD50|mg/kg|[0-9]{1,3},[0-9]{1,3}|[a-z ]{1,4}|[.,/ ])*") {
            let once = highlight(&text);
            prop_assert_eq!(highlight_segments(once.clone()), once);
        }
    }
}
