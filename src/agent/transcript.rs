// ABOUTME: Transcript storage for agent conversations.
// ABOUTME: Persists conversation snapshots so an agent can be resumed later.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Trait for storing and retrieving agent transcripts.
///
/// Transcripts are the strings produced by `Agent::snapshot`, keyed by
/// agent id. Implement this trait for other backends (database, object
/// store, etc.).
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Save a transcript for an agent, replacing any previous one.
    async fn save(&self, agent_id: &str, snapshot: &str) -> Result<(), anyhow::Error>;

    /// Load a transcript for an agent.
    /// Returns None if no transcript exists for the given agent_id.
    async fn load(&self, agent_id: &str) -> Result<Option<String>, anyhow::Error>;

    /// Delete a transcript. Deleting a missing transcript is not an error.
    async fn delete(&self, agent_id: &str) -> Result<(), anyhow::Error>;

    /// List all stored agent IDs.
    async fn list(&self) -> Result<Vec<String>, anyhow::Error>;
}

/// In-memory transcript store.
///
/// Useful for testing and short-lived sessions where persistence is not
/// required.
#[derive(Default)]
pub struct MemoryTranscriptStore {
    transcripts: RwLock<HashMap<String, String>>,
}

impl MemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptStore for MemoryTranscriptStore {
    async fn save(&self, agent_id: &str, snapshot: &str) -> Result<(), anyhow::Error> {
        self.transcripts
            .write()
            .await
            .insert(agent_id.to_string(), snapshot.to_string());
        Ok(())
    }

    async fn load(&self, agent_id: &str) -> Result<Option<String>, anyhow::Error> {
        Ok(self.transcripts.read().await.get(agent_id).cloned())
    }

    async fn delete(&self, agent_id: &str) -> Result<(), anyhow::Error> {
        self.transcripts.write().await.remove(agent_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, anyhow::Error> {
        let mut ids: Vec<_> = self.transcripts.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// Stores each transcript as `<agent_id>.json` under a directory.
#[derive(Debug, Clone)]
pub struct FileTranscriptStore {
    dir: PathBuf,
}

impl FileTranscriptStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, agent_id: &str) -> Result<PathBuf, anyhow::Error> {
        let valid = !agent_id.is_empty()
            && agent_id != "."
            && agent_id != ".."
            && !agent_id.contains(['/', '\\']);
        if !valid {
            anyhow::bail!("invalid agent id for transcript file: {agent_id:?}");
        }
        Ok(self.dir.join(format!("{agent_id}.json")))
    }
}

#[async_trait]
impl TranscriptStore for FileTranscriptStore {
    async fn save(&self, agent_id: &str, snapshot: &str) -> Result<(), anyhow::Error> {
        let path = self.path_for(agent_id)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating {}", self.dir.display()))?;

        // Write then rename so a crash never leaves a half-written transcript.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, snapshot)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("renaming {} to {}", tmp.display(), path.display()))?;
        Ok(())
    }

    async fn load(&self, agent_id: &str) -> Result<Option<String>, anyhow::Error> {
        let path = self.path_for(agent_id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    async fn delete(&self, agent_id: &str) -> Result<(), anyhow::Error> {
        let path = self.path_for(agent_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }

    async fn list(&self) -> Result<Vec<String>, anyhow::Error> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("listing {}", self.dir.display()));
            }
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
