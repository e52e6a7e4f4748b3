//! Parsing of interactive input lines

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Empty input")]
    Empty,

    #[error("Unknown command: /{0}")]
    UnknownCommand(String),

    #[error("Expected a single ticker, got {0:?}")]
    TrailingInput(String),
}

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Select a ticker; validated by the orchestrator
    Ticker(String),
    /// Refetch the current ticker
    Retry,
    Help,
    Exit,
}

impl Input {
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(InputError::Empty);
        }

        let Some(command) = line.strip_prefix('/') else {
            if line.split_whitespace().nth(1).is_some() {
                return Err(InputError::TrailingInput(line.to_string()));
            }
            return Ok(Input::Ticker(line.to_string()));
        };

        let name = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match name.as_str() {
            "retry" | "r" | "refresh" => Ok(Input::Retry),
            "help" | "h" | "?" => Ok(Input::Help),
            "exit" | "quit" | "q" => Ok(Input::Exit),
            "ticker" | "t" => match command.split_whitespace().nth(1) {
                Some(symbol) => Ok(Input::Ticker(symbol.to_string())),
                None => Err(InputError::Empty),
            },
            _ => Err(InputError::UnknownCommand(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ticker() {
        assert_eq!(Input::parse("msft").unwrap(), Input::Ticker("msft".to_string()));
        assert_eq!(Input::parse("  BRK.B \n").unwrap(), Input::Ticker("BRK.B".to_string()));
        assert_eq!(Input::parse("/t aapl").unwrap(), Input::Ticker("aapl".to_string()));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Input::parse("/retry").unwrap(), Input::Retry);
        assert_eq!(Input::parse("/R").unwrap(), Input::Retry);
        assert_eq!(Input::parse("/help").unwrap(), Input::Help);
        assert_eq!(Input::parse("/quit").unwrap(), Input::Exit);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Input::parse("   "), Err(InputError::Empty));
        assert_eq!(Input::parse("/"), Err(InputError::UnknownCommand(String::new())));
        assert_eq!(
            Input::parse("/analyze msft"),
            Err(InputError::UnknownCommand("analyze".to_string()))
        );
        assert!(matches!(Input::parse("msft aapl"), Err(InputError::TrailingInput(_))));
        assert_eq!(Input::parse("/ticker"), Err(InputError::Empty));
    }
}
