//! Configuration management for the resume skills engine

use crate::error::{Result, ResumeSkillsError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub ollama: OllamaConfig,
    pub models: ModelConfig,
    pub recommender: RecommenderConfig,
    pub output: OutputConfig,
}

/// Which skill extraction backend the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Local token-classification model (BERT NER).
    Ner,
    /// Prompt call to an Ollama-style inference server.
    Remote,
    /// Extraction disabled; always yields the empty template.
    None,
}

/// JSON shape the remote model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptSchema {
    /// Nested category mapping (technical/business/soft/...).
    Categorized,
    /// Flat skills list plus an uncertain-terms bucket.
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub strategy: ExtractionStrategy,
    pub prompt_schema: PromptSchema,
    /// Substring-validate remote model output against the source text.
    pub validate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub num_ctx: usize,
    /// Source text is truncated to this many characters before prompting.
    pub max_prompt_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub ner_model: String,
    pub embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommenderConfig {
    pub enabled: bool,
    pub catalog_path: PathBuf,
    pub top_k: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-skills")
            .join("models");

        Self {
            extraction: ExtractionConfig {
                strategy: ExtractionStrategy::Remote,
                prompt_schema: PromptSchema::Categorized,
                validate: true,
            },
            ollama: OllamaConfig {
                endpoint: "http://localhost:11434".to_string(),
                model: "mistral".to_string(),
                timeout_secs: 60,
                num_ctx: 8192,
                max_prompt_chars: 20_000,
            },
            models: ModelConfig {
                models_dir,
                ner_model: "dslim/bert-base-NER".to_string(),
                embedding_model: "minishlab/M2V_base_output".to_string(),
            },
            recommender: RecommenderConfig {
                enabled: true,
                catalog_path: PathBuf::from("data/skills_db.json"),
                top_k: 10,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeSkillsError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeSkillsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-skills")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    pub fn ensure_models_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.models.models_dir)?;
        Ok(())
    }

    /// Request timeout for the remote inference call.
    pub fn ollama_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ollama.timeout_secs)
    }
}
