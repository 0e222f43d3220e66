use chrono::{DateTime, Utc};

/// A command parsed out of a message: the token (prefix stripped) and the
/// positional arguments, in order, untyped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// An incoming message. Immutable once constructed: `text` is the verbatim
/// text as received from the transport, `command` is filled by the parser
/// when the text classifies as a command.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub text: String,
    pub command: Option<ParsedCommand>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            text: text.into(),
            command: None,
            timestamp: Utc::now(),
        }
    }

    pub fn from_text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(chat_id, text)
    }

    pub fn from_command(
        chat_id: impl Into<String>,
        name: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        let name = name.into();
        let text = if args.is_empty() {
            format!("/{}", name)
        } else {
            format!("/{} {}", name, args.join(" "))
        };
        let mut msg = Self::new(chat_id, text);
        msg.command = Some(ParsedCommand { name, args });
        msg
    }

    pub fn with_command(mut self, command: ParsedCommand) -> Self {
        self.command = Some(command);
        self
    }

    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }
}
