//! Completion service integration

pub mod azure;

pub use azure::AzureChatProvider;
