//! Message handling - classification, built-in commands, routing

pub mod handlers;
pub mod parser;
pub mod router;

pub use parser::MessageParser;
pub use router::Router;
