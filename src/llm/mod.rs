//! Remote inference integration module

pub mod client;
pub mod extractor;
pub mod prompts;

pub use client::OllamaClient;
pub use extractor::RemoteExtractor;
