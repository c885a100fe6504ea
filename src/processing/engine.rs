//! Extraction engine: strategy dispatch, validation, recommendations

use crate::config::{Config, ExtractionStrategy, PromptSchema};
use crate::error::{Result, ResumeSkillsError};
use crate::llm::RemoteExtractor;
use crate::ner::{ModelManager, NerPipeline};
use crate::processing::catalog::SkillCatalog;
use crate::processing::embeddings::EmbeddingEngine;
use crate::processing::recommender::{Recommendation, Recommender};
use crate::processing::schema::{ExtractedSkills, ExtractionResult, FlatSkills, StrategyKind};
use crate::processing::validator;
use chrono::{DateTime, Utc};
use serde::Serialize;

enum ExtractorKind {
    Ner(NerPipeline),
    Remote(RemoteExtractor),
    Disabled,
}

/// Full analysis output: what was extracted plus what to learn next.
#[derive(Debug, Clone, Serialize)]
pub struct SkillReport {
    pub extraction: ExtractionResult,
    pub recommendations: Vec<Recommendation>,
    pub source_chars: usize,
    pub generated_at: DateTime<Utc>,
}

/// The orchestrator. Built once from configuration; loads only the
/// backends the configuration calls for. All post-construction state is
/// read-only, so one engine serves concurrent callers.
pub struct SkillEngine {
    extractor: ExtractorKind,
    validate: bool,
    recommender: Option<Recommender>,
}

impl SkillEngine {
    pub async fn new(config: &Config) -> Result<Self> {
        let extractor = match config.extraction.strategy {
            ExtractionStrategy::Ner => {
                let manager = ModelManager::new(config.models_dir().clone()).await?;
                let model_dir = manager.ensure_downloaded(&config.models.ner_model).await?;
                ExtractorKind::Ner(NerPipeline::load(&model_dir)?)
            }
            ExtractionStrategy::Remote => ExtractorKind::Remote(RemoteExtractor::new(
                &config.ollama,
                config.extraction.prompt_schema,
            )?),
            ExtractionStrategy::None => {
                log::info!("Skill extraction is disabled");
                ExtractorKind::Disabled
            }
        };

        let recommender = if config.recommender.enabled {
            let embeddings = EmbeddingEngine::from_config(config)?;
            let catalog = SkillCatalog::load(&config.recommender.catalog_path)?;
            Some(Recommender::new(
                embeddings,
                catalog,
                config.recommender.top_k,
            ))
        } else {
            None
        };

        Ok(Self {
            extractor,
            validate: config.extraction.validate,
            recommender,
        })
    }

    /// Run the configured strategy over already-extracted text. Never
    /// fails: empty input and every internal error degrade to the empty
    /// schema template for the configured shape.
    pub async fn extract_skills(&self, text: &str) -> ExtractionResult {
        if text.trim().is_empty() {
            log::debug!("No text to extract skills from");
            return self.empty_result();
        }

        match &self.extractor {
            ExtractorKind::Ner(pipeline) => match pipeline.extract_skills(text) {
                Ok(skills) => ExtractionResult::new(
                    ExtractedSkills::Flat(FlatSkills {
                        skills,
                        uncertain_terms: Vec::new(),
                    }),
                    StrategyKind::Ner,
                    false,
                ),
                Err(e) => {
                    log::warn!("NER extraction failed: {}", e);
                    self.empty_result()
                }
            },
            ExtractorKind::Remote(extractor) => {
                match self.remote_extract(extractor, text).await {
                    Ok(result) => result,
                    Err(e) => {
                        log::warn!("Remote extraction failed: {}", e);
                        self.empty_result()
                    }
                }
            }
            ExtractorKind::Disabled => {
                ExtractionResult::empty_categorized(StrategyKind::Disabled, true)
            }
        }
    }

    async fn remote_extract(
        &self,
        extractor: &RemoteExtractor,
        text: &str,
    ) -> Result<ExtractionResult> {
        let raw = extractor.extract(text).await?;
        if self.validate {
            let validated = validator::validate(raw, text)?;
            Ok(ExtractionResult::new(
                validated,
                StrategyKind::RemoteInference,
                true,
            ))
        } else {
            Ok(ExtractionResult::new(
                raw,
                StrategyKind::RemoteInference,
                false,
            ))
        }
    }

    /// The empty template matching the configured strategy and schema.
    fn empty_result(&self) -> ExtractionResult {
        match &self.extractor {
            ExtractorKind::Ner(_) => ExtractionResult::empty_flat(StrategyKind::Ner, false),
            ExtractorKind::Remote(extractor) => match extractor.schema() {
                PromptSchema::Categorized => ExtractionResult::empty_categorized(
                    StrategyKind::RemoteInference,
                    self.validate,
                ),
                PromptSchema::Flat => {
                    ExtractionResult::empty_flat(StrategyKind::RemoteInference, self.validate)
                }
            },
            ExtractorKind::Disabled => {
                ExtractionResult::empty_categorized(StrategyKind::Disabled, true)
            }
        }
    }

    pub fn recommendations_enabled(&self) -> bool {
        self.recommender.is_some()
    }

    /// Recommend catalog skills similar to the known set. Errors when
    /// recommendations are disabled in the configuration.
    pub fn recommend(
        &self,
        document_skills: &[String],
        declared_skills: &[String],
    ) -> Result<Vec<Recommendation>> {
        let recommender = self.recommender.as_ref().ok_or_else(|| {
            ResumeSkillsError::Configuration(
                "Recommendations are disabled in the configuration".to_string(),
            )
        })?;
        recommender.recommend(document_skills, declared_skills)
    }

    /// Full pipeline: extract skills from the text, then recommend catalog
    /// entries similar to everything now known.
    pub async fn analyze(&self, text: &str, declared_skills: &[String]) -> Result<SkillReport> {
        let extraction = self.extract_skills(text).await;
        let document_skills = extraction.flatten();

        let recommendations = match &self.recommender {
            Some(recommender) => recommender.recommend(&document_skills, declared_skills)?,
            None => Vec::new(),
        };

        Ok(SkillReport {
            extraction,
            recommendations,
            source_chars: text.chars().count(),
            generated_at: Utc::now(),
        })
    }
}
