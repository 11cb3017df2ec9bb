use std::path::PathBuf;

use quotes_core::constants::EXPORT_FILE_NAME;
use quotes_core::AppEvent;

/// CLI command parsed from arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show a random quote from the selected category, or from `category`
    /// without changing the selection
    Show { category: Option<String> },
    /// Add a quote, pushing it to the remote unless `no_push`
    Add {
        text: String,
        category: String,
        no_push: bool,
    },
    /// List categories and the current selection
    Categories,
    /// Change the selected category
    Filter { value: String },
    /// Write all quotes to a JSON file
    Export { path: PathBuf },
    /// Append quotes from a JSON file
    Import { path: PathBuf },
    /// Fetch once from the remote and merge
    Sync,
    /// Interactive session with background sync
    Run,
}

/// One line typed into an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Dispatched straight into the app
    App(AppEvent),
    Export { path: PathBuf },
    Import { path: PathBuf },
    Status,
    Help,
    Quit,
}

pub const SESSION_HELP: &str = "\
Commands:
  next                     show another quote (or just press enter)
  add <category>: <text>   add a new quote
  filter <category>        select a category (\"all\" for everything)
  categories               list categories
  sync                     fetch from the server now
  export [path]            write quotes to a JSON file
  import <path>            append quotes from a JSON file
  status                   show sync status
  help                     show this help
  quit                     leave";

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" | "next" | "n" => Ok(Self::App(AppEvent::ShowAnother)),
            "add" => {
                let (category, text) = rest
                    .split_once(':')
                    .ok_or_else(|| "usage: add <category>: <text>".to_string())?;
                Ok(Self::App(AppEvent::AddQuote {
                    text: text.trim().to_string(),
                    category: category.trim().to_string(),
                }))
            }
            "filter" => Ok(Self::App(AppEvent::SetFilter(rest.to_string()))),
            "categories" => Ok(Self::App(AppEvent::Categories)),
            "sync" => Ok(Self::App(AppEvent::RefreshRemote)),
            "export" => {
                let path = if rest.is_empty() { EXPORT_FILE_NAME } else { rest };
                Ok(Self::Export {
                    path: PathBuf::from(path),
                })
            }
            "import" if rest.is_empty() => Err("usage: import <path>".to_string()),
            "import" => Ok(Self::Import {
                path: PathBuf::from(rest),
            }),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        assert_eq!(
            SessionCommand::parse("add Life: Keep going: always."),
            Ok(SessionCommand::App(AppEvent::AddQuote {
                text: "Keep going: always.".into(),
                category: "Life".into(),
            }))
        );
        assert!(SessionCommand::parse("add no separator").is_err());
    }

    #[test]
    fn test_blank_add_parts_reach_the_app() {
        // Validation of empty fields belongs to the store
        assert_eq!(
            SessionCommand::parse("add : text"),
            Ok(SessionCommand::App(AppEvent::AddQuote {
                text: "text".into(),
                category: "".into(),
            }))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(
            SessionCommand::parse(""),
            Ok(SessionCommand::App(AppEvent::ShowAnother))
        );
        assert_eq!(
            SessionCommand::parse("  NEXT "),
            Ok(SessionCommand::App(AppEvent::ShowAnother))
        );
        assert_eq!(
            SessionCommand::parse("filter Self Improvement"),
            Ok(SessionCommand::App(AppEvent::SetFilter(
                "Self Improvement".into()
            )))
        );
        assert_eq!(
            SessionCommand::parse("sync"),
            Ok(SessionCommand::App(AppEvent::RefreshRemote))
        );
        assert_eq!(SessionCommand::parse("exit"), Ok(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_file_commands() {
        assert_eq!(
            SessionCommand::parse("export"),
            Ok(SessionCommand::Export {
                path: PathBuf::from("quotes.json")
            })
        );
        assert_eq!(
            SessionCommand::parse("import /tmp/mine.json"),
            Ok(SessionCommand::Import {
                path: PathBuf::from("/tmp/mine.json")
            })
        );
        assert!(SessionCommand::parse("import").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = SessionCommand::parse("dance").unwrap_err();
        assert!(err.contains("dance"));
    }
}
