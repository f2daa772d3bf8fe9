use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub ner: NerConfig,
    #[serde(default)]
    pub tts: TtsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8700".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Window size in words.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Words shared between adjacent windows.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    160
}
fn default_overlap() -> usize {
    40
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Below this best-chunk similarity the router refuses to answer.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Snippet width (chars) for per-source excerpts.
    #[serde(default = "default_snippet_window")]
    pub snippet_window: usize,
    /// Snippet width (chars) for the overall answer text.
    #[serde(default = "default_answer_window")]
    pub answer_window: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_confidence: default_min_confidence(),
            snippet_window: default_snippet_window(),
            answer_window: default_answer_window(),
        }
    }
}

fn default_top_k() -> usize {
    3
}
fn default_min_confidence() -> f64 {
    0.25
}
fn default_snippet_window() -> usize {
    260
}
fn default_answer_window() -> usize {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            model: None,
            dims: None,
            endpoint: None,
            batch_size: 64,
            max_retries: 5,
            timeout_secs: 30,
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct NerConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            endpoint: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TtsConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_tts_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            endpoint: None,
            language: default_tts_language(),
            timeout_secs: 30,
        }
    }
}

fn default_tts_language() -> String {
    "ta".to_string()
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

impl NerConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

impl TtsConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate chunking
    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }
    if config.chunking.overlap >= config.chunking.chunk_size {
        anyhow::bail!("chunking.overlap must be < chunking.chunk_size");
    }

    // Validate retrieval
    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }
    if !(-1.0..=1.0).contains(&config.retrieval.min_confidence) {
        anyhow::bail!("retrieval.min_confidence must be in [-1.0, 1.0]");
    }

    // Validate embedding
    if config.embedding.is_enabled() {
        if config.embedding.dims.is_none() || config.embedding.dims == Some(0) {
            anyhow::bail!(
                "embedding.dims must be > 0 when provider is '{}'",
                config.embedding.provider
            );
        }
        if config.embedding.model.is_none() {
            anyhow::bail!(
                "embedding.model must be specified when provider is '{}'",
                config.embedding.provider
            );
        }
    }

    match config.embedding.provider.as_str() {
        "disabled" | "remote" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled or remote.",
            other
        ),
    }

    match config.ner.provider.as_str() {
        "disabled" | "remote" => {}
        other => anyhow::bail!("Unknown ner provider: '{}'. Must be disabled or remote.", other),
    }
    if config.ner.provider == "remote" && config.ner.endpoint.is_none() {
        anyhow::bail!("ner.endpoint must be set when ner.provider is 'remote'");
    }

    match config.tts.provider.as_str() {
        "disabled" | "remote" => {}
        other => anyhow::bail!("Unknown tts provider: '{}'. Must be disabled or remote.", other),
    }
    if config.tts.provider == "remote" && config.tts.endpoint.is_none() {
        anyhow::bail!("tts.endpoint must be set when tts.provider is 'remote'");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let f = write_config("");
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.chunking.chunk_size, 160);
        assert_eq!(config.chunking.overlap, 40);
        assert_eq!(config.retrieval.top_k, 3);
        assert!((config.retrieval.min_confidence - 0.25).abs() < 1e-9);
        assert_eq!(config.embedding.provider, "disabled");
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let f = write_config("[chunking]\nchunk_size = 40\noverlap = 40\n");
        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn test_remote_embedding_requires_model_and_dims() {
        let f = write_config("[embedding]\nprovider = \"remote\"\n");
        assert!(load_config(f.path()).is_err());

        let f = write_config(
            "[embedding]\nprovider = \"remote\"\nmodel = \"all-MiniLM-L6-v2\"\ndims = 384\n",
        );
        assert!(load_config(f.path()).is_ok());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let f = write_config("[embedding]\nprovider = \"quantum\"\n");
        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn test_remote_ner_requires_endpoint() {
        let f = write_config("[ner]\nprovider = \"remote\"\n");
        assert!(load_config(f.path()).is_err());
    }
}
