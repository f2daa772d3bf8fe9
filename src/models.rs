//! Core data models used throughout DeedScope.
//!
//! These types represent the facts, risk verdicts, document indexes, and
//! answers that flow through the analysis and question-answering pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vendor/purchaser names pulled from role headings or the
/// `BETWEEN ... AND ...` recital block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleParties {
    pub vendor: Option<String>,
    pub purchaser: Option<String>,
}

/// Land-registry identifiers captured from the property schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub survey_no: Option<String>,
    pub patta_no: Option<String>,
    pub village: Option<String>,
    pub taluk: Option<String>,
    pub district: Option<String>,
}

/// Structured facts extracted from one document.
///
/// Every field is best-effort: a pattern that fails to match leaves the field
/// `None`/empty, never an error. The party/date/amount lists are deduplicated,
/// insertion-ordered, and capped at four entries each.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facts {
    pub parties: Vec<String>,
    pub role_parties: RoleParties,
    pub dates: Vec<String>,
    pub amounts: Vec<String>,
    pub property: PropertyDetails,
}

/// Traffic-light completeness verdict. `Green` is best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskColor {
    Green,
    Orange,
    Red,
}

impl std::fmt::Display for RiskColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskColor::Green => write!(f, "Green"),
            RiskColor::Orange => write!(f, "Orange"),
            RiskColor::Red => write!(f, "Red"),
        }
    }
}

/// Completeness verdict derived from [`Facts`].
///
/// `missing_fields` is the display superset: it includes `survey_no` and
/// `patta_no` when absent, even though only `parties`/`dates`/`amounts`
/// drive the color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub color: RiskColor,
    pub missing_fields: Vec<String>,
}

/// English and Tamil narrative summaries of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summaries {
    pub english: String,
    pub tamil: String,
}

/// Per-document semantic index held by the store.
///
/// Created once at ingestion and never mutated in place; re-analyzing a
/// document produces a fresh index under a new identifier.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    /// Overlapping word-window chunks of the normalized text.
    pub chunks: Vec<String>,
    /// One unit-norm embedding per chunk, same order as `chunks`.
    pub embeddings: Vec<Vec<f32>>,
    /// Original full document text, retained for snippet fallback.
    pub text: String,
    /// Facts cached at ingestion time, read by the intent router.
    pub facts: Facts,
    pub ingested_at: DateTime<Utc>,
}

/// Summary statistics returned after indexing a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSummary {
    pub document_id: String,
    pub num_chunks: usize,
    pub avg_chunk_length: f64,
}

/// How an answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Resolved directly from cached [`Facts`].
    StructuredFacts,
    /// Nearest-neighbor retrieval over chunk embeddings.
    Retrieval,
    /// Best similarity fell below the confidence threshold.
    LowConfidence,
}

/// Intent category a question was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    Parties,
    Amount,
    Property,
    Dates,
    /// No intent matched; the question went through retrieval.
    General,
}

impl IntentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentType::Parties => "parties",
            IntentType::Amount => "amount",
            IntentType::Property => "property",
            IntentType::Dates => "dates",
            IntentType::General => "general",
        }
    }
}

/// One supporting source for an answer.
///
/// Structured-facts answers carry a single synthetic source with
/// `chunk_id = -1` and `score = 1.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    pub chunk_id: i64,
    pub score: f64,
    pub text: String,
}

/// Result of answering one question against one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<SourceRecord>,
    pub best_score: f64,
    pub answer_source: AnswerSource,
    pub intent_type: IntentType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_color_ordering() {
        assert!(RiskColor::Green < RiskColor::Orange);
        assert!(RiskColor::Orange < RiskColor::Red);
    }

    #[test]
    fn test_answer_source_serialization() {
        let json = serde_json::to_string(&AnswerSource::StructuredFacts).unwrap();
        assert_eq!(json, "\"structured_facts\"");
        let json = serde_json::to_string(&AnswerSource::LowConfidence).unwrap();
        assert_eq!(json, "\"low_confidence\"");
    }

    #[test]
    fn test_intent_type_serialization() {
        let json = serde_json::to_string(&IntentType::Parties).unwrap();
        assert_eq!(json, "\"parties\"");
        let json = serde_json::to_string(&IntentType::General).unwrap();
        assert_eq!(json, "\"general\"");
    }
}
