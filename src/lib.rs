//! Resume skills library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod llm;
pub mod ner;
pub mod output;

pub use error::{Result, ResumeSkillsError};
pub use config::Config;
pub use processing::{ExtractionResult, SkillEngine, SkillReport};
