//! Remote extraction strategy backed by an Ollama server

use crate::config::{OllamaConfig, PromptSchema};
use crate::error::Result;
use crate::llm::client::{parse_model_json, OllamaClient};
use crate::llm::prompts::PromptTemplates;
use crate::processing::schema::{ExtractedSkills, FlatSkills, SkillProfile};

/// Skill extractor that delegates to a locally running inference server.
/// The prompt schema is fixed at construction; the completion is parsed
/// back into the matching shape, tolerating partial payloads.
pub struct RemoteExtractor {
    client: OllamaClient,
    templates: PromptTemplates,
    schema: PromptSchema,
    max_prompt_chars: usize,
}

impl RemoteExtractor {
    pub fn new(config: &OllamaConfig, schema: PromptSchema) -> Result<Self> {
        Ok(Self {
            client: OllamaClient::new(config)?,
            templates: PromptTemplates::default(),
            schema,
            max_prompt_chars: config.max_prompt_chars,
        })
    }

    pub fn schema(&self) -> PromptSchema {
        self.schema
    }

    /// One extraction round trip: render the prompt, query the server,
    /// parse the completion into the configured schema shape.
    pub async fn extract(&self, text: &str) -> Result<ExtractedSkills> {
        let prompt = self
            .templates
            .render(self.schema, text, self.max_prompt_chars);

        log::debug!(
            "Requesting {} extraction from model {}",
            match self.schema {
                PromptSchema::Categorized => "categorized",
                PromptSchema::Flat => "flat",
            },
            self.client.model()
        );

        let completion = self.client.generate(&prompt).await?;

        match self.schema {
            PromptSchema::Categorized => {
                let profile: SkillProfile = parse_model_json(&completion)?;
                log::info!("Model extracted {} skills", profile.total_skills());
                Ok(ExtractedSkills::Categorized(profile))
            }
            PromptSchema::Flat => {
                let flat: FlatSkills = parse_model_json(&completion)?;
                log::info!(
                    "Model extracted {} skills ({} uncertain)",
                    flat.skills.len(),
                    flat.uncertain_terms.len()
                );
                Ok(ExtractedSkills::Flat(flat))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResumeSkillsError;
    use httpmock::prelude::*;

    fn test_config(endpoint: String) -> OllamaConfig {
        OllamaConfig {
            endpoint,
            model: "mistral".to_string(),
            timeout_secs: 5,
            num_ctx: 8192,
            max_prompt_chars: 20_000,
        }
    }

    fn completion_body(inner: &serde_json::Value) -> serde_json::Value {
        serde_json::json!({"response": inner.to_string()})
    }

    #[tokio::test]
    async fn test_categorized_extraction_round_trip() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(completion_body(&serde_json::json!({
                "technical_skills": {"programming_languages": ["Python"]},
                "soft_skills": ["Teamwork"]
            })));
        });

        let extractor =
            RemoteExtractor::new(&test_config(server.base_url()), PromptSchema::Categorized)
                .unwrap();
        let skills = extractor.extract("Python and teamwork").await.unwrap();

        match skills {
            ExtractedSkills::Categorized(profile) => {
                assert_eq!(
                    profile.technical_skills.programming_languages,
                    vec!["Python"]
                );
                assert_eq!(profile.soft_skills, vec!["Teamwork"]);
                assert!(profile.business_skills.management.is_empty());
            }
            other => panic!("Expected categorized skills, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_flat_extraction_round_trip() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(completion_body(&serde_json::json!({
                "skills": ["Docker"],
                "uncertain_terms": ["synergy"]
            })));
        });

        let extractor =
            RemoteExtractor::new(&test_config(server.base_url()), PromptSchema::Flat).unwrap();
        let skills = extractor.extract("Docker experience").await.unwrap();

        match skills {
            ExtractedSkills::Flat(flat) => {
                assert_eq!(flat.skills, vec!["Docker"]);
                assert_eq!(flat.uncertain_terms, vec!["synergy"]);
            }
            other => panic!("Expected flat skills, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fenced_completion_still_parses() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(serde_json::json!({
                "response": "```json\n{\"skills\": [\"Rust\"], \"uncertain_terms\": []}\n```"
            }));
        });

        let extractor =
            RemoteExtractor::new(&test_config(server.base_url()), PromptSchema::Flat).unwrap();
        let skills = extractor.extract("Rust developer").await.unwrap();

        match skills {
            ExtractedSkills::Flat(flat) => assert_eq!(flat.skills, vec!["Rust"]),
            other => panic!("Expected flat skills, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_completion_is_malformed_output() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .json_body(serde_json::json!({"response": "Sure! Here are the skills I found:"}));
        });

        let extractor =
            RemoteExtractor::new(&test_config(server.base_url()), PromptSchema::Categorized)
                .unwrap();
        let result = extractor.extract("some resume").await;

        assert!(matches!(
            result,
            Err(ResumeSkillsError::MalformedModelOutput(_))
        ));
    }
}
