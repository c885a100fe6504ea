//! Skill processing module

pub mod catalog;
pub mod embeddings;
pub mod engine;
pub mod recommender;
pub mod schema;
pub mod validator;

pub use catalog::SkillCatalog;
pub use engine::{SkillEngine, SkillReport};
pub use recommender::{Recommendation, Recommender};
pub use schema::{ExtractedSkills, ExtractionResult, FlatSkills, SkillProfile, StrategyKind};
