//! Named-entity tagger collaborator.
//!
//! The extractor's regex rules carry most of the load; the tagger supplements
//! them with PERSON/DATE/MONEY spans it finds in free text. Two backends:
//! - **[`DisabledTagger`]** — returns no entities, leaving extraction
//!   regex-only. This is the default and keeps `extract_facts` total.
//! - **[`RemoteTagger`]** — posts the text to an HTTP tagging service and
//!   reads back labeled spans.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::NerConfig;

/// Entity labels the extractor consumes. Anything else a backend emits is
/// dropped at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Person,
    Date,
    Money,
}

/// One labeled span of document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedEntity {
    pub label: EntityLabel,
    pub text: String,
}

/// Tagger backend interface.
#[async_trait]
pub trait EntityTagger: Send + Sync {
    /// Tag entities in `text`. Order follows document order.
    async fn tag(&self, text: &str) -> Result<Vec<TaggedEntity>>;
}

/// No-op tagger used when `ner.provider = "disabled"`.
pub struct DisabledTagger;

#[async_trait]
impl EntityTagger for DisabledTagger {
    async fn tag(&self, _text: &str) -> Result<Vec<TaggedEntity>> {
        Ok(Vec::new())
    }
}

/// Tagger backed by an HTTP service.
///
/// Posts `{"text": ...}` to the configured endpoint and expects
/// `{"entities": [{"label": "PERSON", "text": ...}, ...]}`. Spans with labels
/// outside PERSON/DATE/MONEY are silently dropped.
pub struct RemoteTagger {
    endpoint: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct TagResponse {
    entities: Vec<RawEntity>,
}

#[derive(Deserialize)]
struct RawEntity {
    label: String,
    text: String,
}

impl RemoteTagger {
    pub fn new(config: &NerConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| anyhow::anyhow!("ner.endpoint required for remote tagger"))?;
        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[async_trait]
impl EntityTagger for RemoteTagger {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedEntity>> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let response = client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .with_context(|| format!("Tagger request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Tagger error {}: {}", status, body);
        }

        let parsed: TagResponse = response
            .json()
            .await
            .with_context(|| "Invalid tagger response")?;

        let entities = parsed
            .entities
            .into_iter()
            .filter_map(|e| {
                let label = match e.label.as_str() {
                    "PERSON" => EntityLabel::Person,
                    "DATE" => EntityLabel::Date,
                    "MONEY" => EntityLabel::Money,
                    _ => return None,
                };
                Some(TaggedEntity {
                    label,
                    text: e.text,
                })
            })
            .collect();

        Ok(entities)
    }
}

/// Create the appropriate [`EntityTagger`] based on configuration.
pub fn create_tagger(config: &NerConfig) -> Result<Box<dyn EntityTagger>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledTagger)),
        "remote" => Ok(Box::new(RemoteTagger::new(config)?)),
        other => bail!("Unknown ner provider: {}", other),
    }
}
