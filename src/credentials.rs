//! Credential store for provider API keys.
//!
//! Keys live in a plaintext `KEY=VALUE` file that is rewritten wholesale on
//! every save. The in-memory map is shared with the provider registry, so a
//! save takes effect for the rest of the process without ambient environment
//! mutation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::llm::Provider;

/// Confirmation returned to the UI after a successful save.
pub const SAVE_CONFIRMATION: &str = "API keys saved successfully!";

/// One secret per known provider. The empty string means "not configured";
/// a key is never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(default)]
    pub google: String,
    #[serde(default)]
    pub anthropic: String,
    #[serde(default)]
    pub openai: String,
}

/// The process-wide credential state shared between the store and the
/// provider registry.
pub type SharedKeys = Arc<RwLock<ApiKeys>>;

impl ApiKeys {
    pub fn for_provider(&self, provider: Provider) -> &str {
        match provider {
            Provider::Gemini => &self.google,
            Provider::Claude => &self.anthropic,
            Provider::Openai => &self.openai,
        }
    }

    fn slot_mut(&mut self, credential_key: &str) -> Option<&mut String> {
        match credential_key {
            "GOOGLE_API_KEY" => Some(&mut self.google),
            "ANTHROPIC_API_KEY" => Some(&mut self.anthropic),
            "OPENAI_API_KEY" => Some(&mut self.openai),
            _ => None,
        }
    }

    /// Fill unconfigured keys from the process environment.
    fn fill_from_env(&mut self) {
        if self.google.is_empty() {
            self.google = std::env::var("GOOGLE_API_KEY").unwrap_or_default();
        }
        if self.anthropic.is_empty() {
            self.anthropic = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        }
        if self.openai.is_empty() {
            self.openai = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        }
    }

    fn to_file_contents(&self) -> String {
        format!(
            "GOOGLE_API_KEY={}\nANTHROPIC_API_KEY={}\nOPENAI_API_KEY={}\n",
            self.google, self.anthropic, self.openai
        )
    }

    pub fn into_shared(self) -> SharedKeys {
        Arc::new(RwLock::new(self))
    }
}

/// File-backed credential store.
#[derive(Clone)]
pub struct CredentialStore {
    path: PathBuf,
    keys: SharedKeys,
}

impl CredentialStore {
    /// Load credentials from the key file, falling back to process
    /// environment variables for keys the file does not define. A missing
    /// file is not an error.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut keys = ApiKeys::default();

        match fs::read_to_string(&path).await {
            Ok(contents) => {
                for line in contents.lines() {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    let Some((name, value)) = line.split_once('=') else {
                        warn!(path = %path.display(), line, "skipping malformed credential line");
                        continue;
                    };
                    if let Some(slot) = keys.slot_mut(name.trim()) {
                        *slot = value.trim().to_string();
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read credential file");
            }
        }

        keys.fill_from_env();

        Self {
            path,
            keys: keys.into_shared(),
        }
    }

    /// The shared key state, for wiring into the provider registry.
    pub fn keys(&self) -> SharedKeys {
        Arc::clone(&self.keys)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current credential mapping.
    pub async fn current(&self) -> ApiKeys {
        self.keys.read().await.clone()
    }

    /// Replace all provider secrets at once and rewrite the key file.
    ///
    /// Last writer wins; there is no partial update.
    pub async fn save(&self, keys: ApiKeys) -> Result<&'static str, CredentialError> {
        fs::write(&self.path, keys.to_file_contents()).await?;
        *self.keys.write().await = keys;
        info!(path = %self.path.display(), "saved API keys");
        Ok(SAVE_CONFIRMATION)
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to write credential file: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_keys() -> ApiKeys {
        ApiKeys {
            google: "g-123".to_string(),
            anthropic: "a-456".to_string(),
            openai: "o-789".to_string(),
        }
    }

    #[tokio::test]
    async fn load_missing_file_yields_empty_keys() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::load(dir.path().join("absent.env")).await;
        let keys = store.current().await;
        // Empty unless the test environment happens to define them.
        assert!(keys.google.is_empty() || std::env::var("GOOGLE_API_KEY").is_ok());
    }

    #[tokio::test]
    async fn save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.env");

        let store = CredentialStore::load(&path).await;
        let confirmation = store.save(sample_keys()).await.unwrap();
        assert_eq!(confirmation, SAVE_CONFIRMATION);

        let reloaded = CredentialStore::load(&path).await;
        assert_eq!(reloaded.current().await, sample_keys());
    }

    #[tokio::test]
    async fn save_overwrites_all_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.env");

        let store = CredentialStore::load(&path).await;
        store.save(sample_keys()).await.unwrap();

        let mut next = sample_keys();
        next.anthropic = String::new();
        store.save(next.clone()).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("GOOGLE_API_KEY=g-123"));
        assert!(contents.contains("ANTHROPIC_API_KEY=\n"));
        assert_eq!(store.current().await, next);
    }

    #[tokio::test]
    async fn load_skips_unknown_and_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.env");
        std::fs::write(
            &path,
            "# comment\nOPENAI_API_KEY=o-1\nSOME_OTHER=x\nnot a key line\n",
        )
        .unwrap();

        let store = CredentialStore::load(&path).await;
        let keys = store.current().await;
        assert_eq!(keys.openai, "o-1");
    }

    #[tokio::test]
    async fn shared_keys_reflect_saves() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::load(dir.path().join("keys.env")).await;
        let shared = store.keys();

        store.save(sample_keys()).await.unwrap();
        assert_eq!(shared.read().await.openai, "o-789");
    }
}
