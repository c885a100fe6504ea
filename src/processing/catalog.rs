//! Skill catalog: the fixed reference list used for recommendations

use crate::error::{Result, ResumeSkillsError};
use crate::processing::schema::dedup_case_insensitive;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    skills: Vec<String>,
}

/// Flat ordered list of known skill names. Loaded once, immutable after.
/// Catalog order is the tie-break for equal recommendation scores.
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    skills: Vec<String>,
}

impl SkillCatalog {
    /// Load from a JSON file with a top-level `skills` key.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResumeSkillsError::Catalog(format!(
                "Failed to read catalog {}: {}",
                path.display(),
                e
            ))
        })?;

        let parsed: CatalogFile = serde_json::from_str(&content).map_err(|e| {
            ResumeSkillsError::Catalog(format!(
                "Failed to parse catalog {}: {}",
                path.display(),
                e
            ))
        })?;

        let catalog = Self::from_skills(parsed.skills);
        log::info!(
            "Loaded skill catalog from {} ({} entries)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Build a catalog from raw entries: blanks dropped, case-insensitive
    /// dedup, first occurrence and its casing kept, order preserved.
    pub fn from_skills(skills: Vec<String>) -> Self {
        let skills = dedup_case_insensitive(
            skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );
        Self { skills }
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Catalog entries not already known, compared case-insensitively,
    /// in catalog order.
    pub fn candidates(&self, known: &[String]) -> Vec<String> {
        self.candidate_indices(known)
            .into_iter()
            .map(|i| self.skills[i].clone())
            .collect()
    }

    /// Indices of candidate entries, in catalog order.
    pub fn candidate_indices(&self, known: &[String]) -> Vec<usize> {
        let known_lower: HashSet<String> = known.iter().map(|s| s.to_lowercase()).collect();
        self.skills
            .iter()
            .enumerate()
            .filter(|(_, skill)| !known_lower.contains(&skill.to_lowercase()))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_catalog(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("skills_db.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_skills_key_from_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_catalog(&dir, r#"{"skills": ["Python", "Java", "SQL"]}"#);

        let catalog = SkillCatalog::load(&path).unwrap();
        assert_eq!(catalog.skills(), ["Python", "Java", "SQL"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = SkillCatalog::load(&dir.path().join("nonexistent.json"));
        assert!(result.is_err());
    }

    #[test]
    fn missing_skills_key_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_catalog(&dir, r#"{"entries": []}"#);
        assert!(SkillCatalog::load(&path).is_err());
    }

    #[test]
    fn dedupes_case_variants_and_drops_blanks() {
        let catalog = SkillCatalog::from_skills(vec![
            "Python".to_string(),
            "python".to_string(),
            "  ".to_string(),
            " Java ".to_string(),
            "".to_string(),
        ]);
        assert_eq!(catalog.skills(), ["Python", "Java"]);
    }

    #[test]
    fn candidates_exclude_known_case_insensitively() {
        let catalog = SkillCatalog::from_skills(vec![
            "Python".to_string(),
            "Java".to_string(),
            "SQL".to_string(),
        ]);

        let candidates = catalog.candidates(&["python".to_string()]);
        assert_eq!(candidates, ["Java", "SQL"]);
    }

    #[test]
    fn candidates_keep_catalog_order() {
        let catalog = SkillCatalog::from_skills(vec![
            "Zig".to_string(),
            "Ada".to_string(),
            "Perl".to_string(),
        ]);

        let candidates = catalog.candidates(&[]);
        assert_eq!(candidates, ["Zig", "Ada", "Perl"]);
    }

    #[test]
    fn fully_known_catalog_yields_no_candidates() {
        let catalog = SkillCatalog::from_skills(vec!["Python".to_string(), "Java".to_string()]);
        let candidates = catalog.candidates(&["Java".to_string(), "Python".to_string()]);
        assert!(candidates.is_empty());
    }
}
