//! Slash command parsing for the chat shell.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat shell without sending messages
//! to the backend.

/// A parsed chat command.
///
/// These commands control the chat shell and are never sent to the backend
/// as conversation turns.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Start a fresh conversation with a new widget and no session.
    New,

    /// Show the conversation the backend has recorded for this session.
    History,

    /// Display widget statistics (message count, session id, turn counts).
    Stats,

    /// Probe the backend's health route.
    Health,

    /// Display help information.
    Help,

    /// Exit the chat shell.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use twinchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/history").is_some());
/// assert!(parse_command("Hello, twin!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();

    let result = match command.as_str() {
        "new" | "reset" => ChatCommand::New,
        "history" => ChatCommand::History,
        "stats" | "status" => ChatCommand::Stats,
        "health" => ChatCommand::Health,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns the help text listing all available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a fresh conversation
  /history               Show the conversation recorded by the backend
  /stats                 Show widget statistics
  /health                Check backend health
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_new() {
        assert_eq!(parse_command("/new"), Some(ChatCommand::New));
        assert_eq!(parse_command("/reset"), Some(ChatCommand::New));
        assert_eq!(parse_command("/NEW"), Some(ChatCommand::New));
    }

    #[test]
    fn parse_history() {
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
    }

    #[test]
    fn parse_stats_and_health() {
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/health"), Some(ChatCommand::Health));
    }

    #[test]
    fn parse_help() {
        assert_eq!(parse_command("/help"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn unknown_commands_are_invalid() {
        assert_eq!(
            parse_command("/frobnicate"),
            Some(ChatCommand::Invalid(
                "Unknown command: /frobnicate".to_string()
            ))
        );
    }

    #[test]
    fn trailing_arguments_are_ignored() {
        assert_eq!(parse_command("/quit now"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/stats verbose"), Some(ChatCommand::Stats));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello, twin!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn slash_mid_sentence_is_not_a_command() {
        assert_eq!(parse_command("either/or"), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(!help.is_empty());
        assert!(help.contains("/quit"));
        assert!(help.contains("/new"));
        assert!(help.contains("/history"));
        assert!(help.contains("/stats"));
        assert!(help.contains("/health"));
    }
}
