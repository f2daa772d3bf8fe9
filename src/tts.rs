//! Speech synthesis collaborator and in-memory audio store.
//!
//! The analyze pipeline synthesizes the Tamil summary to MP3 so clients can
//! play it back from `GET /audio/{document_id}`. Synthesis is best-effort:
//! when the provider is disabled or the remote call fails, analysis completes
//! without an audio reference.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::TtsConfig;

/// Text-to-speech backend interface.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` in language `lang` (BCP-47 code, e.g. `"ta"`).
    /// Returns encoded MP3 bytes.
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>>;
}

/// A no-op synthesizer that always returns errors.
///
/// Used when `tts.provider = "disabled"`; the pipeline skips audio.
pub struct DisabledTts;

#[async_trait]
impl SpeechSynthesizer for DisabledTts {
    async fn synthesize(&self, _text: &str, _lang: &str) -> Result<Vec<u8>> {
        bail!("Speech synthesis is disabled")
    }
}

/// Synthesizer backed by a remote HTTP endpoint.
///
/// Sends `{"text": ..., "lang": ...}` and expects the raw audio bytes
/// (`audio/mpeg`) in the response body.
pub struct RemoteTts {
    endpoint: String,
    timeout: Duration,
}

impl RemoteTts {
    pub fn new(config: &TtsConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| anyhow::anyhow!("tts.endpoint required for remote provider"))?;
        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for RemoteTts {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let body = serde_json::json!({ "text": text, "lang": lang });

        let response = client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("TTS API error {}: {}", status, body_text);
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            bail!("TTS API returned empty audio");
        }
        Ok(bytes.to_vec())
    }
}

/// Create the appropriate [`SpeechSynthesizer`] based on configuration.
pub fn create_synthesizer(config: &TtsConfig) -> Result<Box<dyn SpeechSynthesizer>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledTts)),
        "remote" => Ok(Box::new(RemoteTts::new(config)?)),
        other => bail!("Unknown tts provider: {}", other),
    }
}

/// In-memory MP3 store keyed by document id.
///
/// Audio lives and dies with the document: delete the document, delete its
/// recording.
#[derive(Default)]
pub struct AudioStore {
    clips: RwLock<HashMap<String, Arc<Vec<u8>>>>,
}

impl AudioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, document_id: &str, bytes: Vec<u8>) {
        let mut clips = self.clips.write().await;
        clips.insert(document_id.to_string(), Arc::new(bytes));
    }

    pub async fn get(&self, document_id: &str) -> Option<Arc<Vec<u8>>> {
        let clips = self.clips.read().await;
        clips.get(document_id).cloned()
    }

    pub async fn delete(&self, document_id: &str) -> bool {
        let mut clips = self.clips.write().await;
        clips.remove(document_id).is_some()
    }
}
