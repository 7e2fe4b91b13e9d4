use moka::future::Cache;
use std::path::PathBuf;

use crate::domain::tts::OutputFormat;

/// Deterministic cache key for one synthesis: lowercase hex MD5 of
/// `"{text}_{voice}_{language}"`
pub fn fingerprint(text: &str, voice_id: &str, language: &str) -> String {
    format!(
        "{:x}",
        md5::compute(format!("{}_{}_{}", text, voice_id, language))
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedAudio {
    pub audio: Vec<u8>,
    pub format: OutputFormat,
    /// Engine that originally produced the audio
    pub engine: String,
}

/// Synthesized audio keyed by fingerprint.
///
/// Entries never expire. The in-memory tier is unbounded unless a capacity is
/// given; the optional disk tier survives restarts and is consulted on a
/// memory miss. Disk failures are logged and otherwise ignored.
pub struct AudioCache {
    memory: Cache<String, CachedAudio>,
    disk_dir: Option<PathBuf>,
}

impl AudioCache {
    pub fn new(max_entries: Option<u64>, disk_dir: Option<PathBuf>) -> Self {
        let mut builder = Cache::builder();
        if let Some(max) = max_entries {
            builder = builder.max_capacity(max);
        }

        Self {
            memory: builder.build(),
            disk_dir,
        }
    }

    pub async fn get(&self, key: &str) -> Option<CachedAudio> {
        if let Some(hit) = self.memory.get(key).await {
            return Some(hit);
        }

        let hit = self.read_disk(key).await?;
        tracing::debug!(fingerprint = key, "Audio cache disk hit, promoting to memory");
        self.memory.insert(key.to_string(), hit.clone()).await;
        Some(hit)
    }

    /// Last write wins for concurrent stores of the same key
    pub async fn insert(&self, key: &str, entry: CachedAudio) {
        self.write_disk(key, &entry).await;
        self.memory.insert(key.to_string(), entry).await;
    }

    pub async fn entry_count(&self) -> u64 {
        self.memory.run_pending_tasks().await;
        self.memory.entry_count()
    }

    pub async fn total_bytes(&self) -> u64 {
        self.memory.run_pending_tasks().await;
        self.memory
            .iter()
            .map(|(_, entry)| entry.audio.len() as u64)
            .sum()
    }

    async fn read_disk(&self, key: &str) -> Option<CachedAudio> {
        let dir = self.disk_dir.as_ref()?;

        for format in [OutputFormat::Mp3, OutputFormat::Wav] {
            let path = dir.join(format!("{}.{}", key, format.extension()));
            match tokio::fs::read(&path).await {
                Ok(audio) if !audio.is_empty() => {
                    return Some(CachedAudio {
                        audio,
                        format,
                        engine: "cache".to_string(),
                    });
                }
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read cached audio");
                }
            }
        }

        None
    }

    async fn write_disk(&self, key: &str, entry: &CachedAudio) {
        let Some(dir) = self.disk_dir.as_ref() else {
            return;
        };

        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to create cache directory");
            return;
        }

        let path = dir.join(format!("{}.{}", key, entry.format.extension()));
        if let Err(e) = tokio::fs::write(&path, &entry.audio).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write cached audio");
        }
    }
}
