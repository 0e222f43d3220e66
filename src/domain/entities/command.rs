use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::application::errors::{BotError, ConfigError};
use crate::domain::traits::KvStore;

/// Result of a single command invocation. Exactly one variant per invocation.
#[derive(Debug)]
pub enum Outcome {
    /// Reply text, sent to the user unmodified.
    Success(String),
    /// The user got the syntax wrong; the text carries the correct invocation.
    UsageError(String),
    /// Something failed underneath. The cause is logged at the router
    /// boundary, never shown to the user.
    InternalError(BotError),
}

/// How many positional arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == *n,
            Arity::AtLeast(n) => count >= *n,
        }
    }
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Outcome> + Send>>;

/// Command handler function type. Handlers receive the positional arguments
/// and the store handle; they own argument conversion and return a typed
/// Outcome rather than an error.
pub type Handler = Box<dyn Fn(Vec<String>, Arc<dyn KvStore>) -> HandlerFuture + Send + Sync>;

/// A registered command: its token, user-facing usage line, arity contract,
/// and handler.
pub struct Command {
    pub name: String,
    pub description: String,
    pub usage: String,
    pub arity: Arity,
    handler: Option<Handler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            usage: String::new(),
            arity: Arity::AtLeast(0),
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Vec<String>, Arc<dyn KvStore>) -> HandlerFuture + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// The usage-error reply for this command.
    pub fn usage_error(&self) -> Outcome {
        Outcome::UsageError(format!("Usage: {}", self.usage))
    }

    pub async fn invoke(&self, args: Vec<String>, store: Arc<dyn KvStore>) -> Outcome {
        match &self.handler {
            Some(handler) => handler(args, store).await,
            None => Outcome::InternalError(BotError::Internal(format!(
                "command /{} has no handler",
                self.name
            ))),
        }
    }
}

/// The set of available commands, built once at startup and read-only
/// afterwards. Insertion order is preserved so generated listings are
/// deterministic.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    order: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Tokens are unique; a second registration under the
    /// same token is a configuration error, not a replacement.
    pub fn register(&mut self, command: Command) -> Result<(), ConfigError> {
        if self.commands.contains_key(&command.name) {
            return Err(ConfigError::DuplicateCommand(command.name));
        }
        self.order.push(command.name.clone());
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    /// Case-sensitive token lookup.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// All commands, in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.order.iter().filter_map(|name| self.commands.get(name))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_token_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("ping").with_description("first"))
            .expect("first registration");

        let err = registry
            .register(Command::new("ping").with_description("second"))
            .expect_err("second registration must fail");
        assert!(matches!(err, ConfigError::DuplicateCommand(name) if name == "ping"));

        // The original registration survives.
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("ping").map(|c| c.description.as_str()),
            Some("first")
        );
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("get")).expect("register");

        assert!(registry.get("get").is_some());
        assert!(registry.get("GET").is_none());
        assert!(registry.get("Get").is_none());
    }

    #[test]
    fn registration_order_is_preserved() {
        let mut registry = CommandRegistry::new();
        for name in ["add", "set", "get"] {
            registry.register(Command::new(name)).expect("register");
        }

        let names: Vec<&str> = registry.all().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["add", "set", "get"]);
    }

    #[test]
    fn arity_accepts() {
        assert!(Arity::Exact(1).accepts(1));
        assert!(!Arity::Exact(1).accepts(0));
        assert!(!Arity::Exact(1).accepts(2));
        assert!(Arity::AtLeast(0).accepts(0));
        assert!(Arity::AtLeast(0).accepts(5));
        assert!(!Arity::AtLeast(2).accepts(1));
    }
}
