//! Portable JSON documents for import/export.
//!
//! Export writes the whole store as a pretty-printed array. Import accepts an
//! array of records; anything else fails as a whole.

use crate::error::{QuoteError, Result};
use crate::models::QuoteRecord;

pub fn export(quotes: &[QuoteRecord]) -> Result<String> {
    serde_json::to_string_pretty(quotes).map_err(|e| QuoteError::Storage(e.to_string()))
}

pub fn parse_import(document: &str) -> Result<Vec<QuoteRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(document).map_err(|e| QuoteError::ImportParse(e.to_string()))?;

    if !value.is_array() {
        return Err(QuoteError::ImportParse(
            "expected a JSON array of quotes".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| QuoteError::ImportParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_quotes;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_export_import_round_trip() {
        let mut quotes = seed_quotes();
        quotes.push(QuoteRecord::remote(
            "From afar",
            "General",
            11,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));

        let document = export(&quotes).unwrap();
        assert!(document.contains('\n'), "export should be pretty-printed");
        assert_eq!(parse_import(&document).unwrap(), quotes);
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(export(&[]).unwrap(), "[]");
        assert!(parse_import("[]").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_array() {
        let err = parse_import(r#"{"text": "a", "category": "b"}"#).unwrap_err();
        assert_eq!(
            err,
            QuoteError::ImportParse("expected a JSON array of quotes".into())
        );
    }

    #[test]
    fn test_rejects_unparsable_json() {
        assert!(matches!(
            parse_import("[{\"text\": "),
            Err(QuoteError::ImportParse(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_shape_elements() {
        assert!(matches!(
            parse_import(r#"[{"text": "only text"}]"#),
            Err(QuoteError::ImportParse(_))
        ));
        assert!(matches!(
            parse_import("[1, 2, 3]"),
            Err(QuoteError::ImportParse(_))
        ));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let quotes = parse_import(r#"[{"text": "a", "category": "b", "author": "c"}]"#).unwrap();
        assert_eq!(quotes, vec![QuoteRecord::local("a", "b")]);
    }
}
