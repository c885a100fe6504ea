//! Embeddings generation using Model2Vec

use crate::config::Config;
use crate::error::{Result, ResumeSkillsError};
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::time::Instant;

/// Thin wrapper around a static embedding model. Loaded once, read-only
/// afterwards; safe to share across concurrent callers.
pub struct EmbeddingEngine {
    model: StaticModel,
    model_name: String,
}

impl EmbeddingEngine {
    pub fn new(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        log::info!("Loading embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| ResumeSkillsError::Embedding(format!("Failed to load model: {}", e)))?;

        log::info!("Embedding model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }

    /// Load the configured embedding model: a previously downloaded copy
    /// under the models dir when present, otherwise the HuggingFace repo id
    /// (model2vec resolves and fetches it).
    pub fn from_config(config: &Config) -> Result<Self> {
        let model_name = &config.models.embedding_model;
        let local_path = config
            .models_dir()
            .join(model_name.replace('/', "--"));

        if local_path.exists() {
            Self::new(&local_path, model_name)
        } else {
            Self::new(Path::new(model_name), model_name)
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn encode_texts(&self, texts: &[String]) -> Vec<Vec<f32>> {
        self.model.encode(texts)
    }

    pub fn encode_single(&self, text: &str) -> Vec<f32> {
        self.model.encode_single(text)
    }

    /// Cosine similarity between two vectors. Zero-magnitude vectors score
    /// 0.0; mismatched dimensions are a programming error.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(ResumeSkillsError::Embedding(format!(
                "Embedding dimensions don't match: {} vs {}",
                a.len(),
                b.len()
            )));
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            Ok(0.0)
        } else {
            Ok(dot_product / (norm_a * norm_b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.5, 0.5, 0.1];
        let score = EmbeddingEngine::cosine_similarity(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        let score = EmbeddingEngine::cosine_similarity(&a, &b).unwrap();
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn cosine_of_opposite_vectors_is_negative_one() {
        let a = vec![1.0, 2.0];
        let b = vec![-1.0, -2.0];
        let score = EmbeddingEngine::cosine_similarity(&a, &b).unwrap();
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(EmbeddingEngine::cosine_similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let a = vec![1.0];
        let b = vec![1.0, 2.0];
        assert!(EmbeddingEngine::cosine_similarity(&a, &b).is_err());
    }
}
