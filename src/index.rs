//! Document indexing: chunk the deed text and embed every chunk.
//!
//! The index is the retrieval substrate for question answering. Chunks are cut
//! from whitespace-normalized text so window boundaries are stable across PDF
//! layout noise; the raw text is retained alongside for previews.

use anyhow::Result;
use chrono::Utc;

use crate::chunk::{chunk_text, normalize_whitespace};
use crate::config::ChunkingConfig;
use crate::embedding::EmbeddingProvider;
use crate::models::{DocumentIndex, Facts, IndexSummary};

/// Build a retrieval index for one document.
///
/// Embeds every chunk through the configured provider; the provider guarantees
/// unit-norm vectors, so retrieval can score with plain dot products. With no
/// provider (embeddings disabled) the index carries chunks but no vectors and
/// retrieval degrades to the low-confidence path.
pub async fn build_document_index(
    text: &str,
    facts: Facts,
    provider: Option<&dyn EmbeddingProvider>,
    chunking: &ChunkingConfig,
) -> Result<DocumentIndex> {
    let clean = normalize_whitespace(text);
    let chunks = chunk_text(&clean, chunking.chunk_size, chunking.overlap);
    let embeddings = match provider {
        Some(p) if !chunks.is_empty() => p.embed(&chunks).await?,
        _ => Vec::new(),
    };

    Ok(DocumentIndex {
        chunks,
        embeddings,
        text: text.to_string(),
        facts,
        ingested_at: Utc::now(),
    })
}

/// Summarize an index for the analyze response.
pub fn index_summary(document_id: &str, index: &DocumentIndex) -> IndexSummary {
    let avg_chunk_length = if index.chunks.is_empty() {
        0.0
    } else {
        let total: usize = index.chunks.iter().map(|c| c.len()).sum();
        total as f64 / index.chunks.len() as f64
    };

    IndexSummary {
        document_id: document_id.to_string(),
        num_chunks: index.chunks.len(),
        avg_chunk_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic provider for tests: maps each text to a fixed-dim unit
    /// vector derived from its length.
    struct StubProvider;

    #[async_trait]
    impl EmbeddingProvider for StubProvider {
        fn model_name(&self) -> &str {
            "stub"
        }
        fn dims(&self) -> usize {
            2
        }
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let x = (t.len() % 7) as f32 + 1.0;
                    crate::embedding::normalize(&[x, 1.0])
                })
                .collect())
        }
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn test_index_has_one_embedding_per_chunk() {
        let chunking = ChunkingConfig {
            chunk_size: 160,
            overlap: 40,
        };
        let text = words(400);
        let index = build_document_index(&text, Facts::default(), Some(&StubProvider), &chunking)
            .await
            .unwrap();
        assert!(index.chunks.len() > 1);
        assert_eq!(index.chunks.len(), index.embeddings.len());
        assert_eq!(index.text, text);
    }

    #[tokio::test]
    async fn test_index_normalizes_before_chunking() {
        let chunking = ChunkingConfig {
            chunk_size: 5,
            overlap: 1,
        };
        let text = "alpha   beta\n\ngamma\tdelta  epsilon zeta";
        let index = build_document_index(text, Facts::default(), Some(&StubProvider), &chunking)
            .await
            .unwrap();
        assert_eq!(index.chunks[0], "alpha beta gamma delta epsilon");
        // Raw text survives untouched for previews.
        assert_eq!(index.text, text);
    }

    #[tokio::test]
    async fn test_empty_text_yields_empty_index() {
        let chunking = ChunkingConfig {
            chunk_size: 160,
            overlap: 40,
        };
        let index = build_document_index("   ", Facts::default(), Some(&StubProvider), &chunking)
            .await
            .unwrap();
        assert!(index.chunks.is_empty());
        assert!(index.embeddings.is_empty());
    }

    #[tokio::test]
    async fn test_no_provider_leaves_embeddings_empty() {
        let chunking = ChunkingConfig {
            chunk_size: 160,
            overlap: 40,
        };
        let index = build_document_index(&words(300), Facts::default(), None, &chunking)
            .await
            .unwrap();
        assert!(!index.chunks.is_empty());
        assert!(index.embeddings.is_empty());
    }

    #[tokio::test]
    async fn test_index_summary_average_is_char_based() {
        let chunking = ChunkingConfig {
            chunk_size: 160,
            overlap: 40,
        };
        let index = build_document_index("one two three", Facts::default(), Some(&StubProvider), &chunking)
            .await
            .unwrap();
        let summary = index_summary("doc-1", &index);
        assert_eq!(summary.document_id, "doc-1");
        assert_eq!(summary.num_chunks, 1);
        assert!((summary.avg_chunk_length - 13.0).abs() < 1e-9);
    }
}
