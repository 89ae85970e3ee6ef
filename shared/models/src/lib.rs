//! # Toxref Domain Models
//!
//! Data types shared across the toxref workspace.
//!
//! ## Key Models
//!
//! - **IngredientIndex**: CIR ingredient name → report identifier
//! - **CrossReferenceIndex**: nested ECHA substance index, decoded into a **KeyTree**
//! - **TextPage**: text of a single PDF page with its 1-based page number
//! - **Match**: a highlighted snippet with its optional page number
//! - **HighlightedText**: snippet as styled segments, rendered to escaped HTML on demand

pub mod extraction;
pub mod ingredient;

pub use extraction::*;
pub use ingredient::*;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_match_serialization() {
        let m = Match {
            snippet: HighlightedText::plain("LD50 > 5 g/kg"),
            page: Some(3),
        };

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["page"], 3);
        assert_eq!(json["snippet"]["html"], "LD50 &gt; 5 g/kg");
    }

    proptest! {
        /// Segmenting never loses or reorders text.
        #[test]
        fn prop_plain_text_is_concatenation(parts in prop::collection::vec(("[a-z ,.<>&]{0,8}", 0u8..3), 0..10)) {
            let mut text = HighlightedText::new();
            let mut expected = String::new();
            for (part, style) in &parts {
                let style = match style {
                    0 => Style::Plain,
                    1 => Style::Value,
                    _ => Style::Keyword,
                };
                text.push(part.clone(), style);
                expected.push_str(part);
            }

            prop_assert_eq!(text.plain_text(), expected);
            prop_assert!(text.segments().iter().all(|s| !s.text.is_empty()));
        }
    }
}
