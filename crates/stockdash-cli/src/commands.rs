//! Command parsing for the dashboard prompt

use stockdash_core::{DashError, Result};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the available categories
    Categories,
    /// Load a category, or re-show the current one
    List { category: Option<String> },
    /// Reload the current category from the provider
    Refresh,
    /// Select a stock by symbol or by its row number
    Select { target: SelectTarget },
    /// Request analysis, optionally selecting a symbol first
    Analyze { symbol: Option<String> },
    /// Show the analysis lifecycle
    Status,
    /// Abandon the running analysis
    Cancel,
    /// Check the analysis service
    Health,
    /// Show help
    Help,
    /// Exit the dashboard
    Exit,
}

/// How a stock is picked out of the current list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectTarget {
    Symbol(String),
    /// 1-based row number
    Row(usize),
}

impl Command {
    /// Parse a command from user input; a leading `/` is optional
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let input = input.strip_prefix('/').unwrap_or(input);

        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err(DashError::InvalidInput("Empty command".to_string()));
        };

        match cmd.to_lowercase().as_str() {
            "categories" | "cats" | "c" => Ok(Command::Categories),
            "list" | "ls" | "open" | "l" => Ok(Command::List {
                category: args.first().map(|c| c.to_lowercase()),
            }),
            "refresh" | "r" => Ok(Command::Refresh),
            "select" | "sel" | "s" => {
                let arg = args.first().ok_or_else(|| {
                    DashError::InvalidInput("Missing symbol or row for select command".to_string())
                })?;
                Ok(Command::Select {
                    target: parse_target(arg)?,
                })
            }
            "analyze" | "a" => Ok(Command::Analyze {
                symbol: args.first().map(|s| s.to_uppercase()),
            }),
            "status" | "st" => Ok(Command::Status),
            "cancel" | "x" => Ok(Command::Cancel),
            "health" => Ok(Command::Health),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(DashError::InvalidInput(format!("Unknown command: {cmd}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Stock Dashboard Commands
========================

Browsing:
  categories             List categories
  list <category>        Load a category (tech, finance, ...)
  list                   Show the current category again
  refresh                Reload the current category

Analysis:
  select <symbol|#>      Select a stock from the current list
  analyze [symbol]       Request an AI analysis of the selected stock
  status                 Show the current analysis state
  cancel                 Abandon the running analysis
  health                 Check the analysis service

Other:
  help                   Show help
  exit                   Exit

Aliases: c = categories, l = list, r = refresh, s = select, a = analyze,
         st = status, x = cancel, q = exit
"
    }
}

fn parse_target(arg: &str) -> Result<SelectTarget> {
    if arg.chars().all(|c| c.is_ascii_digit()) {
        let row: usize = arg
            .parse()
            .map_err(|_| DashError::InvalidInput(format!("Invalid row number: {arg}")))?;
        if row == 0 {
            return Err(DashError::InvalidInput("Row numbers start at 1".to_string()));
        }
        return Ok(SelectTarget::Row(row));
    }
    Ok(SelectTarget::Symbol(arg.to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            Command::parse("list Tech").unwrap(),
            Command::List {
                category: Some("tech".to_string())
            }
        );
        assert_eq!(Command::parse("/ls").unwrap(), Command::List { category: None });
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(
            Command::parse("select aapl").unwrap(),
            Command::Select {
                target: SelectTarget::Symbol("AAPL".to_string())
            }
        );
        assert_eq!(
            Command::parse("s 3").unwrap(),
            Command::Select {
                target: SelectTarget::Row(3)
            }
        );
        assert!(Command::parse("select 0").is_err());
        assert!(Command::parse("select").is_err());
    }

    #[test]
    fn test_parse_analyze() {
        assert_eq!(
            Command::parse("analyze").unwrap(),
            Command::Analyze { symbol: None }
        );
        assert_eq!(
            Command::parse("/a msft").unwrap(),
            Command::Analyze {
                symbol: Some("MSFT".to_string())
            }
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("categories").unwrap(), Command::Categories);
        assert_eq!(Command::parse("refresh").unwrap(), Command::Refresh);
        assert_eq!(Command::parse("STATUS").unwrap(), Command::Status);
        assert_eq!(Command::parse("cancel").unwrap(), Command::Cancel);
        assert_eq!(Command::parse("health").unwrap(), Command::Health);
        assert_eq!(Command::parse("?").unwrap(), Command::Help);
        assert_eq!(Command::parse("q").unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse("   "),
            Err(DashError::InvalidInput(msg)) if msg == "Empty command"
        ));
        assert!(matches!(
            Command::parse("buy AAPL"),
            Err(DashError::InvalidInput(msg)) if msg.contains("buy")
        ));
    }
}
