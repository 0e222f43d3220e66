//! Message parser - classifies raw text into commands or free-form text

use crate::domain::entities::{Message, ParsedCommand};

/// Classifies incoming text. A message is a command iff it begins with the
/// prefix followed immediately by a non-whitespace token; everything else
/// passes through as free-form text.
pub struct MessageParser {
    prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parse a raw text message. The verbatim text is kept on the message
    /// either way; classification only fills in the parsed command.
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>) -> Message {
        let message = Message::new(chat_id, text);
        match self.classify(&message.text) {
            Some(command) => message.with_command(command),
            None => message,
        }
    }

    /// Token and arguments, split on runs of whitespace. No type coercion:
    /// arguments stay strings, in order.
    fn classify(&self, text: &str) -> Option<ParsedCommand> {
        let rest = text.strip_prefix(&self.prefix)?;
        let first = rest.chars().next()?;
        if first.is_whitespace() {
            return None;
        }

        let mut tokens = rest.split_whitespace();
        let name = tokens.next()?.to_string();
        let args = tokens.map(str::to_string).collect();
        Some(ParsedCommand { name, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MessageParser {
        MessageParser::new("/")
    }

    #[test]
    fn plain_text_is_not_a_command() {
        let msg = parser().parse("c1", "hello there");
        assert!(msg.command.is_none());
        assert_eq!(msg.text, "hello there");
    }

    #[test]
    fn prefixed_token_parses_into_name_and_args() {
        let msg = parser().parse("c1", "/set color blue");
        let cmd = msg.command.expect("should classify as command");
        assert_eq!(cmd.name, "set");
        assert_eq!(cmd.args, vec!["color".to_string(), "blue".to_string()]);
        // The verbatim text survives classification.
        assert_eq!(msg.text, "/set color blue");
    }

    #[test]
    fn runs_of_whitespace_collapse_during_tokenization() {
        let msg = parser().parse("c1", "/set   color   blue");
        let cmd = msg.command.expect("should classify as command");
        assert_eq!(cmd.args, vec!["color".to_string(), "blue".to_string()]);
    }

    #[test]
    fn bare_prefix_is_free_form_text() {
        assert!(parser().parse("c1", "/").command.is_none());
    }

    #[test]
    fn prefix_followed_by_whitespace_is_free_form_text() {
        assert!(parser().parse("c1", "/ get key").command.is_none());
    }

    #[test]
    fn leading_whitespace_defeats_classification() {
        assert!(parser().parse("c1", " /get key").command.is_none());
    }

    #[test]
    fn token_case_is_preserved() {
        let msg = parser().parse("c1", "/Get key");
        assert_eq!(msg.command.expect("command").name, "Get");
    }

    #[test]
    fn custom_prefix() {
        let parser = MessageParser::new("!");
        assert_eq!(
            parser.parse("c1", "!help").command.expect("command").name,
            "help"
        );
        assert!(parser.parse("c1", "/help").command.is_none());
    }
}
