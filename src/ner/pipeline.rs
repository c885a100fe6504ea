//! Token-classification pipeline for NER-based skill extraction

use crate::error::{Result, ResumeSkillsError};
use crate::ner::labels::{is_allowed_group, parse_bio};
use crate::processing::schema::dedup_case_insensitive;
use candle_core::{Device, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use std::collections::HashMap;
use std::path::Path;
use tokenizers::Tokenizer;

/// Get the best available device for inference (GPU if available, CPU fallback)
pub fn get_best_device() -> Result<Device> {
    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            log::info!("Using CUDA GPU for token classification");
            return Ok(device);
        }
    }

    if cfg!(target_os = "macos") {
        match Device::new_metal(0) {
            Ok(device) => {
                log::info!("Using Metal GPU for token classification");
                return Ok(device);
            }
            Err(e) => {
                log::warn!("Metal GPU initialization failed: {}", e);
            }
        }
    }

    Ok(Device::Cpu)
}

/// Get device with optional user override from environment variable
pub fn get_device_with_override() -> Result<Device> {
    if let Ok(device_preference) = std::env::var("RESUME_SKILLS_DEVICE") {
        match device_preference.to_lowercase().as_str() {
            "cuda" => {
                #[cfg(feature = "cuda")]
                {
                    return Device::new_cuda(0).map_err(|e| {
                        ResumeSkillsError::ModelError(format!("Failed to initialize CUDA: {}", e))
                    });
                }
                #[cfg(not(feature = "cuda"))]
                {
                    return Err(ResumeSkillsError::ModelError(
                        "CUDA support not compiled in".to_string(),
                    ));
                }
            }
            "metal" => {
                #[cfg(feature = "metal")]
                {
                    return Device::new_metal(0).map_err(|e| {
                        ResumeSkillsError::ModelError(format!("Failed to initialize Metal: {}", e))
                    });
                }
                #[cfg(not(feature = "metal"))]
                {
                    return Err(ResumeSkillsError::ModelError(
                        "Metal support not compiled in".to_string(),
                    ));
                }
            }
            "cpu" => {
                return Ok(Device::Cpu);
            }
            _ => {
                log::warn!(
                    "Unknown device '{}', falling back to auto-detection",
                    device_preference
                );
            }
        }
    }

    get_best_device()
}

/// An aggregated entity span with its group tag.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecognizedEntity {
    pub text: String,
    pub group: String,
}

/// BERT NER model with a linear token-classification head. Weights and
/// tokenizer load once; every field is read-only afterwards.
pub struct NerPipeline {
    model: BertModel,
    classifier: Linear,
    tokenizer: Tokenizer,
    id2label: HashMap<u32, String>,
    max_tokens: usize,
    device: Device,
}

impl NerPipeline {
    /// Load from a model directory holding `config.json`, `tokenizer.json`
    /// and `model.safetensors` (the standard NER checkpoint layout).
    pub fn load(model_dir: &Path) -> Result<Self> {
        log::info!("Loading NER model from: {}", model_dir.display());
        let device = get_device_with_override()?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            ResumeSkillsError::ModelLoading(format!("Failed to load tokenizer: {}", e))
        })?;

        let config_path = model_dir.join("config.json");
        let config_content = std::fs::read_to_string(&config_path).map_err(|e| {
            ResumeSkillsError::ModelLoading(format!("Failed to read model config: {}", e))
        })?;

        let bert_config: BertConfig = serde_json::from_str(&config_content).map_err(|e| {
            ResumeSkillsError::ModelLoading(format!("Failed to parse model config: {}", e))
        })?;

        let raw_config: serde_json::Value = serde_json::from_str(&config_content)?;
        let id2label = parse_id2label(&raw_config)?;

        let weights_path = model_dir.join("model.safetensors");
        if !weights_path.exists() {
            return Err(ResumeSkillsError::ModelLoading(format!(
                "Model weights not found at {}",
                weights_path.display()
            )));
        }

        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)? };
        let model = BertModel::load(vb.pp("bert"), &bert_config)?;
        let classifier = candle_nn::linear(
            bert_config.hidden_size,
            id2label.len(),
            vb.pp("classifier"),
        )?;

        let max_tokens = bert_config.max_position_embeddings.min(512);

        log::info!("NER model loaded ({} labels)", id2label.len());
        Ok(Self {
            model,
            classifier,
            tokenizer,
            id2label,
            max_tokens,
            device,
        })
    }

    /// Run the full extraction: classify tokens, aggregate entity spans,
    /// filter to skill candidates. Returns a deduplicated set of surface
    /// strings with no ordering guarantee.
    pub fn extract_skills(&self, text: &str) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ResumeSkillsError::ModelError(format!("Tokenization failed: {}", e)))?;

        let len = encoding.get_ids().len().min(self.max_tokens);
        if len == 0 {
            return Ok(Vec::new());
        }

        let ids = &encoding.get_ids()[..len];
        let type_ids = &encoding.get_type_ids()[..len];
        let tokens: Vec<String> = encoding.get_tokens()[..len].to_vec();
        let special_mask: Vec<u32> = encoding.get_special_tokens_mask()[..len].to_vec();

        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(type_ids, &self.device)?.unsqueeze(0)?;

        let hidden = self.model.forward(&input_ids, &token_type_ids, None)?;
        let logits = self.classifier.forward(&hidden)?;
        let predictions = logits.argmax(D::Minus1)?.squeeze(0)?.to_vec1::<u32>()?;

        let labels: Vec<String> = predictions
            .iter()
            .map(|id| {
                self.id2label
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| "O".to_string())
            })
            .collect();

        let entities = aggregate_entities(&tokens, &labels, &special_mask);
        Ok(filter_skill_candidates(entities))
    }
}

/// Parse the `id2label` mapping out of a HuggingFace model config.
fn parse_id2label(config: &serde_json::Value) -> Result<HashMap<u32, String>> {
    let map = config
        .get("id2label")
        .and_then(|v| v.as_object())
        .ok_or_else(|| {
            ResumeSkillsError::ModelLoading("Model config has no id2label mapping".to_string())
        })?;

    let mut id2label = HashMap::new();
    for (key, value) in map {
        let id: u32 = key.parse().map_err(|_| {
            ResumeSkillsError::ModelLoading(format!("Non-numeric label id: {}", key))
        })?;
        let label = value.as_str().ok_or_else(|| {
            ResumeSkillsError::ModelLoading(format!("Non-string label for id {}", id))
        })?;
        id2label.insert(id, label.to_string());
    }

    if id2label.is_empty() {
        return Err(ResumeSkillsError::ModelLoading(
            "Empty id2label mapping".to_string(),
        ));
    }
    Ok(id2label)
}

/// Group consecutive same-group tokens into entity spans (simple
/// aggregation). A `B-` tag or a group change starts a new span; special
/// tokens and `O` tags close the open span.
pub(crate) fn aggregate_entities(
    tokens: &[String],
    labels: &[String],
    special_mask: &[u32],
) -> Vec<RecognizedEntity> {
    let mut entities = Vec::new();
    let mut pieces: Vec<&str> = Vec::new();
    let mut group: Option<&str> = None;

    let mut flush = |pieces: &mut Vec<&str>, group: &mut Option<&str>| {
        if let Some(g) = group.take() {
            if !pieces.is_empty() {
                entities.push(RecognizedEntity {
                    text: render_span(pieces),
                    group: g.to_string(),
                });
            }
        }
        pieces.clear();
    };

    for i in 0..tokens.len().min(labels.len()) {
        if special_mask.get(i).copied().unwrap_or(0) == 1 {
            flush(&mut pieces, &mut group);
            continue;
        }

        match parse_bio(&labels[i]) {
            None => flush(&mut pieces, &mut group),
            Some(bio) => {
                let starts_new = bio.begins || group != Some(bio.group);
                if starts_new {
                    flush(&mut pieces, &mut group);
                    group = Some(bio.group);
                }
                pieces.push(&tokens[i]);
            }
        }
    }
    flush(&mut pieces, &mut group);

    entities
}

/// Join wordpieces back into a surface string. Inner continuations glue
/// without the `##` marker; a span that starts on a continuation keeps it
/// so the fragment filter can reject the span.
fn render_span(pieces: &[&str]) -> String {
    let mut out = String::new();
    for (i, piece) in pieces.iter().enumerate() {
        match piece.strip_prefix("##") {
            Some(rest) if i > 0 => out.push_str(rest),
            Some(_) => out.push_str(piece),
            None => {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(piece);
            }
        }
    }
    out
}

/// Apply the skill-candidate filter: allowed entity groups only, no
/// continuation fragments, no single-character tokens, case-insensitive
/// dedup. Set semantics; order carries no meaning.
pub(crate) fn filter_skill_candidates(entities: Vec<RecognizedEntity>) -> Vec<String> {
    dedup_case_insensitive(
        entities
            .into_iter()
            .filter(|entity| is_allowed_group(&entity.group))
            .map(|entity| entity.text)
            .filter(|text| !text.starts_with("##"))
            .filter(|text| text.chars().count() > 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn aggregates_wordpieces_into_one_entity() {
        let tokens = strings(&["[CLS]", "Micro", "##soft", "[SEP]"]);
        let labels = strings(&["O", "B-ORG", "I-ORG", "O"]);
        let special = vec![1, 0, 0, 1];

        let entities = aggregate_entities(&tokens, &labels, &special);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Microsoft");
        assert_eq!(entities[0].group, "ORG");
    }

    #[test]
    fn multi_word_entities_join_with_spaces() {
        let tokens = strings(&["[CLS]", "New", "York", "Times", "[SEP]"]);
        let labels = strings(&["O", "B-ORG", "I-ORG", "I-ORG", "O"]);
        let special = vec![1, 0, 0, 0, 1];

        let entities = aggregate_entities(&tokens, &labels, &special);
        assert_eq!(entities[0].text, "New York Times");
    }

    #[test]
    fn adjacent_begin_tags_split_entities() {
        let tokens = strings(&["[CLS]", "Python", "Docker", "[SEP]"]);
        let labels = strings(&["O", "B-MISC", "B-MISC", "O"]);
        let special = vec![1, 0, 0, 1];

        let entities = aggregate_entities(&tokens, &labels, &special);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].text, "Python");
        assert_eq!(entities[1].text, "Docker");
    }

    #[test]
    fn group_change_splits_entities() {
        let tokens = strings(&["[CLS]", "Rust", "Torvalds", "[SEP]"]);
        let labels = strings(&["O", "I-MISC", "I-PER", "O"]);
        let special = vec![1, 0, 0, 1];

        let entities = aggregate_entities(&tokens, &labels, &special);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].group, "MISC");
        assert_eq!(entities[1].group, "PER");
    }

    #[test]
    fn outside_tags_close_spans() {
        let tokens = strings(&["[CLS]", "Python", "and", "Docker", "[SEP]"]);
        let labels = strings(&["O", "B-MISC", "O", "B-MISC", "O"]);
        let special = vec![1, 0, 0, 0, 1];

        let entities = aggregate_entities(&tokens, &labels, &special);
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn filter_keeps_allowed_groups_only() {
        let entities = vec![
            RecognizedEntity {
                text: "Python".to_string(),
                group: "MISC".to_string(),
            },
            RecognizedEntity {
                text: "Berlin".to_string(),
                group: "LOC".to_string(),
            },
            RecognizedEntity {
                text: "Google".to_string(),
                group: "ORG".to_string(),
            },
        ];

        assert_eq!(filter_skill_candidates(entities), vec!["Python", "Google"]);
    }

    #[test]
    fn filter_drops_continuation_fragments_and_short_tokens() {
        let entities = vec![
            RecognizedEntity {
                text: "##soft".to_string(),
                group: "ORG".to_string(),
            },
            RecognizedEntity {
                text: "R".to_string(),
                group: "MISC".to_string(),
            },
            RecognizedEntity {
                text: "Go".to_string(),
                group: "MISC".to_string(),
            },
        ];

        assert_eq!(filter_skill_candidates(entities), vec!["Go"]);
    }

    #[test]
    fn filter_dedupes_case_insensitively() {
        let entities = vec![
            RecognizedEntity {
                text: "Docker".to_string(),
                group: "MISC".to_string(),
            },
            RecognizedEntity {
                text: "DOCKER".to_string(),
                group: "ORG".to_string(),
            },
        ];

        assert_eq!(filter_skill_candidates(entities), vec!["Docker"]);
    }

    #[test]
    fn identical_input_aggregates_identically() {
        let tokens = strings(&["[CLS]", "Python", "and", "Docker", "[SEP]"]);
        let labels = strings(&["O", "B-MISC", "O", "B-MISC", "O"]);
        let special = vec![1, 0, 0, 0, 1];

        let first = filter_skill_candidates(aggregate_entities(&tokens, &labels, &special));
        let second = filter_skill_candidates(aggregate_entities(&tokens, &labels, &special));
        assert_eq!(first, second);
    }

    #[test]
    fn parse_id2label_reads_numeric_keys() {
        let config = serde_json::json!({
            "id2label": {"0": "O", "1": "B-ORG", "2": "I-ORG"}
        });
        let map = parse_id2label(&config).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&1).unwrap(), "B-ORG");
    }

    #[test]
    fn missing_id2label_is_an_error() {
        let config = serde_json::json!({"hidden_size": 768});
        assert!(parse_id2label(&config).is_err());
    }
}
