//! HTTP client for Ollama generation requests

use crate::config::OllamaConfig;
use crate::error::{Result, ResumeSkillsError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_ctx: usize,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    format: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for a running Ollama server. One request per extraction, no
/// retries: a failed or slow server surfaces as an error and the caller
/// decides what to do with it.
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
    num_ctx: usize,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ResumeSkillsError::Http)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            num_ctx: config.num_ctx,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one generation request and return the raw completion text.
    /// Temperature is pinned to 0.0 so identical prompts stay reproducible.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            format: "json",
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                num_ctx: self.num_ctx,
            },
        };

        log::debug!("Sending generation request to {} (model: {})", url, self.model);

        let response = self.client.post(&url).json(&request_body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::warn!("Inference server returned {}: {}", status, message);
            return Err(ResumeSkillsError::InferenceServer {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            ResumeSkillsError::MalformedModelOutput(format!("Invalid response envelope: {}", e))
        })?;

        if parsed.response.trim().is_empty() {
            return Err(ResumeSkillsError::MalformedModelOutput(
                "Model returned an empty completion".to_string(),
            ));
        }

        Ok(parsed.response)
    }
}

/// Parse a model completion as JSON after stripping any markdown fences.
pub fn parse_model_json<T: DeserializeOwned>(completion: &str) -> Result<T> {
    let cleaned = strip_json_fences(completion);
    serde_json::from_str(cleaned).map_err(|e| {
        ResumeSkillsError::MalformedModelOutput(format!("Model returned invalid JSON: {}", e))
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_model_json_rejects_garbage() {
        let result: Result<serde_json::Value> = parse_model_json("not json at all");
        assert!(matches!(
            result,
            Err(ResumeSkillsError::MalformedModelOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_sends_expected_request_shape() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/generate").json_body_partial(
                r#"{
                    "model": "mistral",
                    "format": "json",
                    "stream": false,
                    "options": {"temperature": 0.0, "num_ctx": 8192}
                }"#,
            );
            then.status(200)
                .json_body(serde_json::json!({"response": "{\"soft_skills\": []}"}));
        });

        let client = OllamaClient::new(&test_config(server.base_url())).unwrap();
        let completion = client.generate("extract skills").await.unwrap();

        mock.assert();
        assert_eq!(completion, "{\"soft_skills\": []}");
    }

    #[tokio::test]
    async fn test_generate_surfaces_server_errors() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500).body("model not loaded");
        });

        let client = OllamaClient::new(&test_config(server.base_url())).unwrap();
        let result = client.generate("extract skills").await;

        match result {
            Err(ResumeSkillsError::InferenceServer { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.contains("model not loaded"));
            }
            other => panic!("Expected InferenceServer error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_generate_rejects_missing_response_field() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(serde_json::json!({"done": true}));
        });

        let client = OllamaClient::new(&test_config(server.base_url())).unwrap();
        let result = client.generate("extract skills").await;

        assert!(matches!(
            result,
            Err(ResumeSkillsError::MalformedModelOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_trims_trailing_endpoint_slash() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .json_body(serde_json::json!({"response": "{}"}));
        });

        let endpoint = format!("{}/", server.base_url());
        let client = OllamaClient::new(&test_config(endpoint)).unwrap();
        client.generate("extract skills").await.unwrap();

        mock.assert();
    }
}
