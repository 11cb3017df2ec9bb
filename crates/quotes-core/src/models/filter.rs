use std::fmt;

use crate::constants::ALL_CATEGORIES;
use crate::models::QuoteRecord;

/// Active category selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse a stored or user-supplied value. Blank and `all` (any case) mean `All`.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(category) => category,
        }
    }

    pub fn matches(&self, quote: &QuoteRecord) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => quote.in_category(category),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(" ALL "), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" Life "),
            CategoryFilter::Category("Life".to_string())
        );
    }

    #[test]
    fn test_matches_ignores_case() {
        let quote = QuoteRecord::local("x", "Life");
        assert!(CategoryFilter::All.matches(&quote));
        assert!(CategoryFilter::parse("life").matches(&quote));
        assert!(!CategoryFilter::parse("Dreams").matches(&quote));
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for filter in [CategoryFilter::All, CategoryFilter::parse("Success")] {
            assert_eq!(CategoryFilter::parse(&filter.to_string()), filter);
        }
    }
}
