//! NER-based skill extraction module

pub mod labels;
pub mod model_manager;
pub mod pipeline;

pub use model_manager::ModelManager;
pub use pipeline::NerPipeline;
