use crate::types::AssistantState;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File-backed persistence for [`AssistantState`].
///
/// Best-effort by contract: a missing file loads as defaults, and saves go
/// through a temp file + rename so a crash never leaves a half-written
/// state behind.
pub struct StateStore {
    base_path: PathBuf,
}

impl StateStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub async fn initialize(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.base_path).await?;
        tracing::info!("State store initialized at {:?}", self.base_path);
        Ok(())
    }

    pub async fn load(&self) -> Result<AssistantState, StoreError> {
        let path = self.state_path();

        if !path.exists() {
            tracing::info!("No saved state found, starting fresh");
            return Ok(AssistantState::default());
        }

        let content = fs::read_to_string(&path).await?;
        let state: AssistantState = serde_json::from_str(&content)?;

        tracing::info!(
            "Loaded state: {} closed tabs, {} chat records",
            state.recently_closed.len(),
            state.chat_history.len()
        );
        Ok(state)
    }

    pub async fn save(&self, state: &AssistantState) -> Result<(), StoreError> {
        let path = self.state_path();
        let temp_path = path.with_extension("tmp");
        let content = serde_json::to_string_pretty(state)?;

        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!("Saved assistant state");
        Ok(())
    }

    fn state_path(&self) -> PathBuf {
        self.base_path.join("state.json")
    }
}
