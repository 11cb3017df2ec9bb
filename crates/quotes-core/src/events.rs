use crate::models::QuoteRecord;

/// Commands the UI layer dispatches into `QuoteApp::handle`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Show another random quote from the current filter
    ShowAnother,
    AddQuote { text: String, category: String },
    SetFilter(String),
    /// Contents of a user-supplied import document
    Import { document: String },
    Export,
    /// Ask the sync worker to fetch now
    RefreshRemote,
    /// Re-populate the category selector
    Categories,
}

/// What the quote display region should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteDisplay {
    Quote(QuoteRecord),
    /// The store is empty
    NoQuotes,
    /// The store has quotes, none in the selected category
    NoQuotesInCategory(String),
}

/// Instructions for the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    Display(QuoteDisplay),
    Categories {
        categories: Vec<String>,
        selected: String,
    },
    Status {
        message: String,
        is_error: bool,
    },
    Exported {
        document: String,
        count: usize,
    },
}

impl CoreEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
            is_error: true,
        }
    }
}
