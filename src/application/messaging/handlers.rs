//! Built-in command handlers
//!
//! Each handler is a pure function of (arguments, store) returning an
//! Outcome. Arity is declared on the command and enforced by the router
//! before invocation, so handlers see a well-shaped argument list; the slice
//! matches below only re-state the contract.

use std::sync::Arc;

use crate::application::errors::ConfigError;
use crate::domain::entities::{Arity, Command, CommandRegistry, Outcome};
use crate::domain::traits::KvStore;

async fn hello(args: Vec<String>, _store: Arc<dyn KvStore>) -> Outcome {
    let [name] = args.as_slice() else {
        return Outcome::UsageError("Usage: /hello <name>".to_string());
    };
    Outcome::Success(format!("Good day, {}!", name))
}

async fn add(args: Vec<String>, store: Arc<dyn KvStore>) -> Outcome {
    let [keyword] = args.as_slice() else {
        return Outcome::UsageError("Usage: /add <keyword>".to_string());
    };
    tracing::info!("Incrementing keyword '{}'", keyword);
    match store.increment(keyword).await {
        Ok(count) => Outcome::Success(format!(
            "You have said \"{}\" for {} times.",
            keyword, count
        )),
        Err(e) => Outcome::InternalError(e.into()),
    }
}

async fn set(args: Vec<String>, store: Arc<dyn KvStore>) -> Outcome {
    let [key, value] = args.as_slice() else {
        return Outcome::UsageError("Usage: /set <key> <value>".to_string());
    };
    tracing::info!("Setting key '{}' to value '{}'", key, value);
    match store.set(key, value).await {
        Ok(()) => Outcome::Success(format!("Successfully set {} to {}.", key, value)),
        Err(e) => Outcome::InternalError(e.into()),
    }
}

async fn get(args: Vec<String>, store: Arc<dyn KvStore>) -> Outcome {
    let [key] = args.as_slice() else {
        return Outcome::UsageError("Usage: /get <key>".to_string());
    };
    match store.get(key).await {
        Ok(Some(value)) => Outcome::Success(format!("The value of {} is {}.", key, value)),
        // Absence is a normal reply, not an error.
        Ok(None) => Outcome::Success(format!("{} does not exist.", key)),
        Err(e) => Outcome::InternalError(e.into()),
    }
}

async fn delete(args: Vec<String>, store: Arc<dyn KvStore>) -> Outcome {
    let [key] = args.as_slice() else {
        return Outcome::UsageError("Usage: /delete <key>".to_string());
    };
    tracing::info!("Deleting key '{}'", key);
    match store.delete(key).await {
        Ok(true) => Outcome::Success(format!("Successfully deleted {}.", key)),
        Ok(false) => Outcome::Success(format!("{} does not exist.", key)),
        Err(e) => Outcome::InternalError(e.into()),
    }
}

/// Register the built-in commands. Called once at startup; the resulting
/// registry is immutable afterwards.
pub fn register_builtins(registry: &mut CommandRegistry) -> Result<(), ConfigError> {
    registry.register(
        Command::new("add")
            .with_description("Add a keyword")
            .with_usage("/add <keyword>")
            .with_arity(Arity::Exact(1))
            .with_handler(|args, store| Box::pin(add(args, store))),
    )?;

    registry.register(
        Command::new("set")
            .with_description("Set a key-value pair")
            .with_usage("/set <key> <value>")
            .with_arity(Arity::Exact(2))
            .with_handler(|args, store| Box::pin(set(args, store))),
    )?;

    registry.register(
        Command::new("get")
            .with_description("Get the value of a key")
            .with_usage("/get <key>")
            .with_arity(Arity::Exact(1))
            .with_handler(|args, store| Box::pin(get(args, store))),
    )?;

    registry.register(
        Command::new("delete")
            .with_description("Delete a key")
            .with_usage("/delete <key>")
            .with_arity(Arity::Exact(1))
            .with_handler(|args, store| Box::pin(delete(args, store))),
    )?;

    registry.register(
        Command::new("hello")
            .with_description("Send a greeting")
            .with_usage("/hello <name>")
            .with_arity(Arity::Exact(1))
            .with_handler(|args, store| Box::pin(hello(args, store))),
    )?;

    // help lists every registered token with its one-line usage, itself
    // included; the text is generated here so it stays in lockstep with the
    // registry and never drifts.
    let mut lines = vec!["Available commands:".to_string()];
    for cmd in registry.all() {
        lines.push(format!("{} - {}", cmd.usage, cmd.description));
    }
    lines.push("/help - List available commands".to_string());
    let help_text = lines.join("\n");

    registry.register(
        Command::new("help")
            .with_description("List available commands")
            .with_usage("/help")
            .with_arity(Arity::AtLeast(0))
            .with_handler(move |_args, _store| {
                let text = help_text.clone();
                Box::pin(async move { Outcome::Success(text) })
            }),
    )?;

    Ok(())
}

/// The full built-in registry, ready for the router.
pub fn builtin_registry() -> Result<CommandRegistry, ConfigError> {
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_all_six_commands() {
        let registry = builtin_registry().expect("registry builds");
        assert_eq!(registry.len(), 6);
        for name in ["add", "set", "get", "delete", "hello", "help"] {
            assert!(registry.get(name).is_some(), "missing /{}", name);
        }
    }

    #[tokio::test]
    async fn help_text_lists_every_command_once() {
        let registry = builtin_registry().expect("registry builds");
        let help = registry.get("help").expect("help registered");
        assert_eq!(help.arity, Arity::AtLeast(0));

        // The listing is generated at registration in insertion order.
        let store = std::sync::Arc::new(crate::infrastructure::storage::MemoryStore::new());
        let outcome = help.invoke(vec![], store).await;
        let Outcome::Success(text) = outcome else {
            panic!("help should succeed");
        };
        let expected = "Available commands:\n\
                        /add <keyword> - Add a keyword\n\
                        /set <key> <value> - Set a key-value pair\n\
                        /get <key> - Get the value of a key\n\
                        /delete <key> - Delete a key\n\
                        /hello <name> - Send a greeting\n\
                        /help - List available commands";
        assert_eq!(text, expected);
    }
}
