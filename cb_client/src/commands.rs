use std::fmt;

/// A user intent typed at the console.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// Start a game, optionally with a palette size.
    Start(Option<usize>),
    /// Select the hit count for the current proposal.
    Hits(i64),
    /// Submit the selected hit count, or the given one.
    Submit(Option<i64>),
    /// Fetch the next proposal after a failed fetch.
    Retry,
    History,
    Show,
    /// Abandon the current game and start another.
    New(Option<usize>),
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A number argument couldn't be parsed.
    InvalidNumber { command: String, value: String },
    /// `hits` without a count.
    MissingHitCount,
    /// A command that takes no arguments got some.
    UnexpectedArgument(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber { command, value } => write!(
                f,
                "Invalid number '{}' for '{}'. Must be a whole number (e.g., '{} 2')",
                value, command, command
            ),
            Self::MissingHitCount => {
                write!(f, "Hits requires a count (e.g., 'hits 2')")
            }
            Self::UnexpectedArgument(cmd) => {
                write!(f, "'{}' doesn't take any arguments", cmd)
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use cb_client::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("start"), Ok(Command::Start(None)));
/// assert_eq!(parse_command("start 6"), Ok(Command::Start(Some(6))));
/// assert_eq!(parse_command("hits 2"), Ok(Command::Hits(2)));
/// assert_eq!(parse_command("submit"), Ok(Command::Submit(None)));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let parts: Vec<&str> = input.split_ascii_whitespace().collect();
    let Some(first) = parts.first() else {
        return Err(ParseError::UnrecognizedCommand(String::new()));
    };
    let name = first.to_lowercase();
    let arg = parts.get(1).copied();
    if parts.len() > 2 {
        return Err(ParseError::UnexpectedArgument(input.trim().to_string()));
    }

    match name.as_str() {
        "start" => Ok(Command::Start(parse_opt(&name, arg)?)),
        "new" => Ok(Command::New(parse_opt(&name, arg)?)),
        "hits" | "h" => match arg {
            Some(value) => Ok(Command::Hits(parse_number(&name, value)?)),
            None => Err(ParseError::MissingHitCount),
        },
        "submit" | "s" => Ok(Command::Submit(parse_opt(&name, arg)?)),
        "retry" => no_args(Command::Retry, &name, arg),
        "history" => no_args(Command::History, &name, arg),
        "show" => no_args(Command::Show, &name, arg),
        "help" | "?" => no_args(Command::Help, &name, arg),
        "quit" | "exit" => no_args(Command::Quit, &name, arg),
        _ => Err(ParseError::UnrecognizedCommand(input.trim().to_string())),
    }
}

fn parse_number<T: std::str::FromStr>(command: &str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        command: command.to_string(),
        value: value.to_string(),
    })
}

fn parse_opt<T: std::str::FromStr>(
    command: &str,
    arg: Option<&str>,
) -> Result<Option<T>, ParseError> {
    arg.map(|value| parse_number(command, value)).transpose()
}

fn no_args(command: Command, name: &str, arg: Option<&str>) -> Result<Command, ParseError> {
    match arg {
        None => Ok(command),
        Some(_) => Err(ParseError::UnexpectedArgument(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Single-word command tests ===

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("retry"), Ok(Command::Retry));
        assert_eq!(parse_command("history"), Ok(Command::History));
        assert_eq!(parse_command("show"), Ok(Command::Show));
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert_eq!(parse_command("?"), Ok(Command::Help));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(parse_command("  SUBMIT  "), Ok(Command::Submit(None)));
        assert_eq!(parse_command("Hits 3\n"), Ok(Command::Hits(3)));
    }

    // === Commands with arguments ===

    #[test]
    fn test_parse_start() {
        assert_eq!(parse_command("start"), Ok(Command::Start(None)));
        assert_eq!(parse_command("start 9"), Ok(Command::Start(Some(9))));
        assert_eq!(parse_command("new 3"), Ok(Command::New(Some(3))));
    }

    #[test]
    fn test_parse_start_rejects_negative_palette() {
        assert_eq!(
            parse_command("start -4"),
            Err(ParseError::InvalidNumber {
                command: "start".to_string(),
                value: "-4".to_string()
            })
        );
    }

    #[test]
    fn test_parse_hits_keeps_sign() {
        // Range checks happen in the session, not the parser
        assert_eq!(parse_command("hits -1"), Ok(Command::Hits(-1)));
        assert_eq!(parse_command("h 0"), Ok(Command::Hits(0)));
        assert_eq!(parse_command("s 4"), Ok(Command::Submit(Some(4))));
    }

    #[test]
    fn test_parse_hits_requires_count() {
        assert_eq!(parse_command("hits"), Err(ParseError::MissingHitCount));
    }

    #[test]
    fn test_parse_invalid_number() {
        assert!(matches!(
            parse_command("hits two"),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    // === Error cases ===

    #[test]
    fn test_parse_unexpected_argument() {
        assert_eq!(
            parse_command("retry now"),
            Err(ParseError::UnexpectedArgument("retry".to_string()))
        );
        assert!(matches!(
            parse_command("hits 1 2"),
            Err(ParseError::UnexpectedArgument(_))
        ));
    }

    #[test]
    fn test_parse_unrecognized() {
        assert_eq!(
            parse_command("guess"),
            Err(ParseError::UnrecognizedCommand("guess".to_string()))
        );
        assert!(parse_command("").is_err());
    }

    #[test]
    fn test_error_messages_are_helpful() {
        let msg = parse_command("hits x").unwrap_err().to_string();
        assert!(msg.contains("'x'"));
        assert!(msg.contains("hits 2"));
        let msg = parse_command("dance").unwrap_err().to_string();
        assert!(msg.contains("help"));
    }
}
