use async_trait::async_trait;

use crate::application::errors::CompletionError;

/// Completion trait - abstraction for the external text-completion service.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Issue one single-turn completion. `text` is forwarded verbatim; the
    /// implementation must not mutate or truncate it.
    async fn complete(&self, text: &str) -> Result<String, CompletionError>;
}
