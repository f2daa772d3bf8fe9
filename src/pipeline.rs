//! End-to-end analysis orchestration.
//!
//! One [`Pipeline`] owns the collaborators (tagger, embedder, synthesizer)
//! and the document/audio stores, and runs the full flow: extract text →
//! fuse facts → assess risk → render summaries → synthesize audio → build
//! and store the retrieval index. The same pipeline serves both the HTTP
//! handlers and the one-shot CLI path.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::embedding::{create_provider, EmbeddingProvider};
use crate::extract::extract_text;
use crate::facts::extract_facts;
use crate::index::{build_document_index, index_summary};
use crate::models::{AnswerResult, Facts, IndexSummary, Risk, Summaries};
use crate::ner::{create_tagger, EntityTagger};
use crate::query::answer_question;
use crate::risk::compute_risk;
use crate::store::{DocumentStore, InMemoryStore};
use crate::summary::{english_summary, tamil_summary};
use crate::tts::{create_synthesizer, AudioStore, SpeechSynthesizer};

/// Maximum characters of raw text echoed back in the analyze response.
const DOC_TEXT_PREVIEW_CHARS: usize = 5000;

/// Full analysis result for one document.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub document_id: String,
    pub index_info: IndexSummary,
    /// Leading slice of the extracted text, for client-side display.
    pub doc_text: String,
    pub facts: Facts,
    pub summaries: Summaries,
    /// `None` when synthesis is disabled or failed; analysis still succeeds.
    pub audio: Option<AudioRef>,
    pub risk: Risk,
}

#[derive(Debug, Serialize)]
pub struct AudioRef {
    pub tamil_summary_mp3_url: String,
}

pub struct Pipeline {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
    audio: Arc<AudioStore>,
    tagger: Option<Box<dyn EntityTagger>>,
    embedder: Option<Box<dyn EmbeddingProvider>>,
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
}

impl Pipeline {
    /// Build a pipeline with an in-memory store from configuration.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let tagger = if config.ner.is_enabled() {
            Some(create_tagger(&config.ner).context("Failed to create entity tagger")?)
        } else {
            None
        };
        let embedder = if config.embedding.is_enabled() {
            Some(create_provider(&config.embedding).context("Failed to create embedding provider")?)
        } else {
            None
        };
        let synthesizer = if config.tts.is_enabled() {
            Some(create_synthesizer(&config.tts).context("Failed to create speech synthesizer")?)
        } else {
            None
        };

        Ok(Self {
            config,
            store: Arc::new(InMemoryStore::new()),
            audio: Arc::new(AudioStore::new()),
            tagger,
            embedder,
            synthesizer,
        })
    }

    /// Analyze an uploaded document end to end.
    ///
    /// Stores the retrieval index (and audio, when synthesized) under a fresh
    /// document id. Tagger and synthesizer failures are non-fatal: extraction
    /// proceeds regex-only and the report just omits the audio reference.
    pub async fn analyze(
        &self,
        bytes: &[u8],
        content_type: &str,
        filename: &str,
    ) -> Result<AnalysisReport> {
        let text = extract_text(bytes, content_type, filename).context("invalid document")?;

        let tagged = match &self.tagger {
            Some(tagger) => match tagger.tag(&text).await {
                Ok(entities) => entities,
                Err(e) => {
                    tracing::warn!(error = %e, "entity tagger failed, using regex-only extraction");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let facts = extract_facts(&text, &tagged);
        let risk = compute_risk(&facts);
        let summaries = Summaries {
            english: english_summary(&text, &facts, &risk),
            tamil: tamil_summary(&text, &facts, &risk),
        };

        let document_id = Uuid::new_v4().to_string();

        let index = build_document_index(
            &text,
            facts.clone(),
            self.embedder.as_deref(),
            &self.config.chunking,
        )
        .await
        .context("Failed to build document index")?;
        let info = index_summary(&document_id, &index);
        self.store.put(&document_id, index).await?;

        let audio = match &self.synthesizer {
            Some(tts) => match tts.synthesize(&summaries.tamil, &self.config.tts.language).await {
                Ok(mp3) => {
                    self.audio.put(&document_id, mp3).await;
                    Some(AudioRef {
                        tamil_summary_mp3_url: format!("/audio/{}", document_id),
                    })
                }
                Err(e) => {
                    tracing::warn!(error = %e, "speech synthesis failed, skipping audio");
                    None
                }
            },
            None => None,
        };

        tracing::info!(
            document_id = %document_id,
            num_chunks = info.num_chunks,
            risk = %risk.color,
            "document analyzed"
        );

        Ok(AnalysisReport {
            document_id,
            index_info: info,
            doc_text: text.chars().take(DOC_TEXT_PREVIEW_CHARS).collect(),
            facts,
            summaries,
            audio,
            risk,
        })
    }

    /// Answer a question against a stored document.
    ///
    /// Returns `Ok(None)` when the document id is unknown.
    pub async fn answer(
        &self,
        document_id: &str,
        question: &str,
    ) -> Result<Option<AnswerResult>> {
        let Some(index) = self.store.get(document_id).await? else {
            return Ok(None);
        };
        let result = answer_question(
            question,
            &index,
            self.embedder.as_deref(),
            &self.config.retrieval,
        )
        .await?;
        Ok(Some(result))
    }

    pub async fn list_documents(&self) -> Result<Vec<String>> {
        self.store.list_ids().await
    }

    /// Delete a document and its audio. Returns whether the document existed.
    pub async fn delete_document(&self, document_id: &str) -> Result<bool> {
        let existed = self.store.delete(document_id).await?;
        if existed {
            self.audio.delete(document_id).await;
        }
        Ok(existed)
    }

    pub async fn audio_clip(&self, document_id: &str) -> Option<Arc<Vec<u8>>> {
        self.audio.get(document_id).await
    }
}
