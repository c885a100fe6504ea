//! Model checkpoint management for downloading and caching Hugging Face models

use crate::error::{Result, ResumeSkillsError};
use hf_hub::api::tokio::Api;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files a checkpoint directory must hold before we consider it usable.
const REQUIRED_FILES: [&str; 3] = ["config.json", "tokenizer.json", "model.safetensors"];

/// Optional extras downloaded when the repository has them.
const OPTIONAL_FILES: [&str; 2] = ["tokenizer_config.json", "special_tokens_map.json"];

/// Manager for model checkpoints - handles download, caching, and removal.
/// Both the NER model and the embedding model use the same directory layout
/// (config, tokenizer, safetensors weights), so one manager covers both.
pub struct ModelManager {
    models_dir: PathBuf,
    api: Api,
}

impl ModelManager {
    /// Create a new model manager rooted at `models_dir`
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ResumeSkillsError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let api = Api::new().map_err(|e| {
            ResumeSkillsError::ModelError(format!("Failed to initialize HF API: {}", e))
        })?;

        Ok(Self { models_dir, api })
    }

    /// Local directory a repository downloads into. Slashes in the repo id
    /// are mapped to `--` so the id stays recoverable from the dir name.
    pub fn model_dir(&self, repo_id: &str) -> PathBuf {
        self.models_dir.join(repo_id.replace('/', "--"))
    }

    /// Check whether a repository is fully downloaded
    pub async fn is_downloaded(&self, repo_id: &str) -> bool {
        Self::is_valid_model_directory(&self.model_dir(repo_id)).await
    }

    /// Check if a directory contains every required checkpoint file
    async fn is_valid_model_directory(path: &Path) -> bool {
        for file in &REQUIRED_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Return the local path for a repository, downloading it first when
    /// it is missing or incomplete.
    pub async fn ensure_downloaded(&self, repo_id: &str) -> Result<PathBuf> {
        let model_dir = self.model_dir(repo_id);
        if Self::is_valid_model_directory(&model_dir).await {
            log::debug!("Model {} already downloaded", repo_id);
            return Ok(model_dir);
        }
        self.download(repo_id).await
    }

    /// Download a model checkpoint from Hugging Face Hub
    pub async fn download(&self, repo_id: &str) -> Result<PathBuf> {
        let model_dir = self.model_dir(repo_id);

        println!("📥 Downloading model: {}", repo_id);

        fs::create_dir_all(&model_dir).await.map_err(|e| {
            ResumeSkillsError::ModelError(format!("Failed to create model directory: {}", e))
        })?;

        let repo = self.api.repo(hf_hub::Repo::model(repo_id.to_string()));

        for file in &REQUIRED_FILES {
            let file_path = repo.get(file).await.map_err(|e| {
                ResumeSkillsError::ModelError(format!(
                    "Failed to download {} from {}: {}",
                    file, repo_id, e
                ))
            })?;
            let dest_path = model_dir.join(file);
            fs::copy(&file_path, &dest_path).await.map_err(|e| {
                ResumeSkillsError::ModelError(format!("Failed to copy {}: {}", file, e))
            })?;
            println!("  ✅ Downloaded: {}", file);
        }

        for file in &OPTIONAL_FILES {
            if let Ok(file_path) = repo.get(file).await {
                let dest_path = model_dir.join(file);
                fs::copy(&file_path, &dest_path).await.map_err(|e| {
                    ResumeSkillsError::ModelError(format!("Failed to copy {}: {}", file, e))
                })?;
                println!("  ✅ Downloaded: {}", file);
            }
        }

        println!("✅ Model {} downloaded successfully!", repo_id);
        Ok(model_dir)
    }

    /// Remove a downloaded model checkpoint
    pub async fn remove(&self, repo_id: &str) -> Result<()> {
        let model_dir = self.model_dir(repo_id);
        if !model_dir.exists() {
            return Err(ResumeSkillsError::ModelNotFound(repo_id.to_string()));
        }
        fs::remove_dir_all(&model_dir).await.map_err(|e| {
            ResumeSkillsError::ModelError(format!("Failed to remove {}: {}", repo_id, e))
        })?;
        log::info!("Removed model {}", repo_id);
        Ok(())
    }

    /// List repository ids of every complete checkpoint under the models dir
    pub async fn list_downloaded(&self) -> Result<Vec<String>> {
        let mut downloaded = Vec::new();

        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            ResumeSkillsError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            ResumeSkillsError::ModelError(format!("Failed to read directory entry: {}", e))
        })? {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| {
                    ResumeSkillsError::ModelError(format!("Failed to get file type: {}", e))
                })?
                .is_dir();

            if is_dir && Self::is_valid_model_directory(&entry.path()).await {
                let dir_name = entry.file_name().to_string_lossy().to_string();
                downloaded.push(dir_name.replace("--", "/"));
            }
        }

        downloaded.sort();
        Ok(downloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn stage_checkpoint(manager: &ModelManager, repo_id: &str) {
        let dir = manager.model_dir(repo_id);
        fs::create_dir_all(&dir).await.unwrap();
        for file in &REQUIRED_FILES {
            fs::write(dir.join(file), b"{}").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_model_manager_creation() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ModelManager::new(temp_dir.path().join("models")).await;
        assert!(manager.is_ok());
        assert!(temp_dir.path().join("models").exists());
    }

    #[tokio::test]
    async fn test_model_dir_maps_slashes() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        let dir = manager.model_dir("dslim/bert-base-NER");
        assert!(dir.ends_with("dslim--bert-base-NER"));
    }

    #[tokio::test]
    async fn test_incomplete_checkpoint_is_not_downloaded() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        assert!(!manager.is_downloaded("dslim/bert-base-NER").await);

        let dir = manager.model_dir("dslim/bert-base-NER");
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join("config.json"), b"{}").await.unwrap();
        assert!(!manager.is_downloaded("dslim/bert-base-NER").await);
    }

    #[tokio::test]
    async fn test_complete_checkpoint_is_listed() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        stage_checkpoint(&manager, "dslim/bert-base-NER").await;
        assert!(manager.is_downloaded("dslim/bert-base-NER").await);

        let listed = manager.list_downloaded().await.unwrap();
        assert_eq!(listed, vec!["dslim/bert-base-NER".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_deletes_checkpoint() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        stage_checkpoint(&manager, "minishlab/M2V_base_output").await;
        manager.remove("minishlab/M2V_base_output").await.unwrap();
        assert!(!manager.is_downloaded("minishlab/M2V_base_output").await);

        let missing = manager.remove("minishlab/M2V_base_output").await;
        assert!(missing.is_err());
    }
}
