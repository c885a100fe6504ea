//! Skill recommendations by embedding similarity against the catalog

use crate::error::Result;
use crate::processing::catalog::SkillCatalog;
use crate::processing::embeddings::EmbeddingEngine;
use crate::processing::schema::dedup_case_insensitive;
use serde::Serialize;
use std::cmp::Ordering;

/// One recommended skill with its averaged similarity score and a short
/// justification referencing the known skills it was scored against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub skill: String,
    pub score: f32,
    pub reason: String,
}

/// Ranks catalog entries by mean cosine similarity to the known skills.
/// Catalog vectors are computed once at construction; known skills are
/// encoded per call with the same model instance.
pub struct Recommender {
    embeddings: EmbeddingEngine,
    catalog: SkillCatalog,
    catalog_vectors: Vec<Vec<f32>>,
    top_k: usize,
}

impl Recommender {
    pub fn new(embeddings: EmbeddingEngine, catalog: SkillCatalog, top_k: usize) -> Self {
        let catalog_vectors = embeddings.encode_texts(catalog.skills());
        log::info!(
            "Recommender ready: {} catalog entries embedded with {}",
            catalog.len(),
            embeddings.model_name()
        );
        Self {
            embeddings,
            catalog,
            catalog_vectors,
            top_k,
        }
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    /// Recommend additional skills given what the document showed and what
    /// the user already declared.
    ///
    /// The known set is the case-insensitive, order-preserving union of the
    /// two inputs. An empty known set yields no recommendations (the mean
    /// over zero vectors is undefined); a fully covered catalog yields an
    /// empty list as well.
    pub fn recommend(
        &self,
        document_skills: &[String],
        declared_skills: &[String],
    ) -> Result<Vec<Recommendation>> {
        let known = combine_known(document_skills, declared_skills);
        if known.is_empty() {
            log::debug!("No known skills supplied; skipping recommendations");
            return Ok(Vec::new());
        }

        let candidate_indices = self.catalog.candidate_indices(&known);
        if candidate_indices.is_empty() {
            log::debug!("Catalog fully covered by known skills");
            return Ok(Vec::new());
        }

        let known_vectors = self.embeddings.encode_texts(&known);
        let candidates: Vec<(&str, &[f32])> = candidate_indices
            .iter()
            .map(|&i| {
                (
                    self.catalog.skills()[i].as_str(),
                    self.catalog_vectors[i].as_slice(),
                )
            })
            .collect();

        let ranked = rank_by_mean_similarity(&known_vectors, &candidates, self.top_k)?;
        let reason = build_reason(&known);

        Ok(ranked
            .into_iter()
            .map(|(skill, score)| Recommendation {
                skill,
                score: round3(score),
                reason: reason.clone(),
            })
            .collect())
    }
}

/// Case-insensitive, order-preserving union of document and declared
/// skills; blanks dropped.
fn combine_known(document_skills: &[String], declared_skills: &[String]) -> Vec<String> {
    dedup_case_insensitive(
        document_skills
            .iter()
            .chain(declared_skills.iter())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    )
}

/// Score every candidate by its mean cosine similarity across all known
/// vectors, sort descending, and keep the first `top_k`. The sort is stable
/// so equal scores keep candidate (catalog) order.
fn rank_by_mean_similarity(
    known_vectors: &[Vec<f32>],
    candidates: &[(&str, &[f32])],
    top_k: usize,
) -> Result<Vec<(String, f32)>> {
    let mut scored = Vec::with_capacity(candidates.len());
    for (skill, candidate_vector) in candidates {
        let mut total = 0.0f32;
        for known_vector in known_vectors {
            total += EmbeddingEngine::cosine_similarity(known_vector, candidate_vector)?;
        }
        let mean = total / known_vectors.len() as f32;
        scored.push(((*skill).to_string(), mean));
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(top_k);
    Ok(scored)
}

fn build_reason(known: &[String]) -> String {
    let referenced: Vec<&str> = known.iter().take(3).map(|s| s.as_str()).collect();
    format!(
        "Recommended due to similarity with: {}",
        referenced.join(", ")
    )
}

fn round3(score: f32) -> f32 {
    (score * 1000.0).round() / 1000.0
}
