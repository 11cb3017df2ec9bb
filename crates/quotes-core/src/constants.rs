//! Application-wide constants
//!
//! Centralized location for storage keys, remote endpoint defaults and the
//! built-in quote list.

/// Default remote source (a placeholder REST API serving `/posts`)
pub const REMOTE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Seconds between remote polls
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Maximum number of remote items requested per poll
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Category assigned to remote items whose origin id has no mapping
pub const DEFAULT_REMOTE_CATEGORY: &str = "General";

/// `userId` sent with pushed quotes
pub const PUSH_USER_ID: u64 = 1;

/// Sentinel filter value meaning "every category"
pub const ALL_CATEGORIES: &str = "all";

/// Default file name for exported quote documents
pub const EXPORT_FILE_NAME: &str = "quotes.json";

// Persisted key-value store keys
pub mod keys {
    /// JSON-serialized quote list
    pub const QUOTES: &str = "quotes";
    /// Selected category filter string
    pub const SELECTED_CATEGORY: &str = "selectedCategory";
}

/// Remote origin id -> category label.
/// Only used to categorize records synthesized from the remote source.
pub const ORIGIN_CATEGORIES: [(u64, &str); 10] = [
    (1, "Motivation"),
    (2, "Leadership"),
    (3, "Life"),
    (4, "Dreams"),
    (5, "Inspiration"),
    (6, "Success"),
    (7, "Opportunity"),
    (8, "Wisdom"),
    (9, "Happiness"),
    (10, "Courage"),
];

/// Built-in quotes used until something is persisted
pub const SEED_QUOTES: [(&str, &str); 8] = [
    (
        "The only way to do great work is to love what you do.",
        "Motivation",
    ),
    (
        "Innovation distinguishes between a leader and a follower.",
        "Leadership",
    ),
    (
        "Life is what happens to you while you're busy making other plans.",
        "Life",
    ),
    (
        "The future belongs to those who believe in the beauty of their dreams.",
        "Dreams",
    ),
    (
        "It is during our darkest moments that we must focus to see the light.",
        "Inspiration",
    ),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Success",
    ),
    (
        "The only impossible journey is the one you never begin.",
        "Motivation",
    ),
    (
        "In the middle of difficulty lies opportunity.",
        "Opportunity",
    ),
];
