//! Message router - classifies each inbound message and dispatches it to
//! exactly one handler, or to the completion service.

use std::sync::Arc;

use crate::domain::entities::{CommandRegistry, Message, Outcome};
use crate::domain::traits::{Completion, KvStore};

use super::parser::MessageParser;

/// Shown to the user whenever a collaborator fails. Causes stay in the logs.
pub const FAILURE_REPLY: &str = "Sorry, there was an error.";

/// Routes each inbound message down exactly one path:
///
/// - a recognized command token goes to its handler (after arity validation,
///   which never touches the store),
/// - everything else, unrecognized tokens included, is forwarded verbatim to
///   the completion service.
///
/// Every fault from a handler or collaborator is absorbed here and rendered
/// as a fixed failure reply; nothing propagates to the transport layer.
pub struct Router {
    parser: MessageParser,
    registry: CommandRegistry,
    store: Arc<dyn KvStore>,
    completion: Arc<dyn Completion>,
}

impl Router {
    pub fn new(
        prefix: impl Into<String>,
        registry: CommandRegistry,
        store: Arc<dyn KvStore>,
        completion: Arc<dyn Completion>,
    ) -> Self {
        Self {
            parser: MessageParser::new(prefix),
            registry,
            store,
            completion,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Parse raw transport text and route it.
    pub async fn route_text(&self, chat_id: &str, text: &str) -> String {
        let message = self.parser.parse(chat_id, text);
        self.route(&message).await
    }

    /// Produce the single outbound reply for an inbound message.
    pub async fn route(&self, message: &Message) -> String {
        if let Some(cmd) = &message.command {
            if let Some(command) = self.registry.get(&cmd.name) {
                tracing::debug!("Dispatching /{} with {} args", cmd.name, cmd.args.len());
                if !command.arity.accepts(cmd.args.len()) {
                    return self.render(command.usage_error());
                }
                let outcome = command.invoke(cmd.args.clone(), Arc::clone(&self.store)).await;
                return self.render(outcome);
            }
            // Unknown tokens are conversation content, not errors.
            tracing::debug!("Unknown command /{}, forwarding to completion", cmd.name);
        }
        self.complete(&message.text).await
    }

    async fn complete(&self, text: &str) -> String {
        match self.completion.complete(text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Completion request via {} failed: {}", self.completion.name(), e);
                FAILURE_REPLY.to_string()
            }
        }
    }

    fn render(&self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Success(text) => text,
            Outcome::UsageError(text) => text,
            Outcome::InternalError(cause) => {
                tracing::error!("Command failed: {}", cause);
                FAILURE_REPLY.to_string()
            }
        }
    }
}
