//! Question answering: rule-based intent routing with semantic retrieval
//! fallback.
//!
//! Stage 1 checks the question against keyword lists in a fixed order
//! (parties, amount, property, dates) and answers straight from the cached
//! [`Facts`] when the matched category has data. A matched category with no
//! data falls through to the next. Stage 2 embeds the question and ranks
//! chunks by dot product against the stored unit-norm vectors; a best score
//! below the confidence threshold yields a refusal rather than a bad answer.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RetrievalConfig;
use crate::embedding::{dot, embed_query, EmbeddingProvider};
use crate::models::{AnswerResult, AnswerSource, DocumentIndex, Facts, IntentType, SourceRecord};

const PARTY_KEYWORDS: &[&str] = &[
    "party",
    "parties",
    "vendor",
    "purchaser",
    "buyer",
    "seller",
    "who",
    "name",
    "person",
];

const AMOUNT_KEYWORDS: &[&str] = &[
    "amount",
    "price",
    "consideration",
    "rupees",
    "rs",
    "₹",
    "money",
    "payment",
    "cost",
    "value",
];

const PROPERTY_KEYWORDS: &[&str] = &[
    "property", "land", "survey", "patta", "village", "taluk", "district", "location", "address",
];

const DATE_KEYWORDS: &[&str] = &[
    "date", "when", "executed", "signed", "day", "month", "year", "time",
];

const LOW_CONFIDENCE_ANSWER: &str = "I'm not confident about the answer. Try asking about \
specific fields like 'Vendor', 'Purchaser', 'Amount', 'Survey Number', or 'Property details'.";

fn matches_any(q: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| q.contains(k))
}

/// Route a question to a fact category and answer from structured data.
///
/// Returns `None` when no category both matches and has data; the caller then
/// falls back to retrieval.
pub fn detect_intent(question: &str, facts: &Facts) -> Option<(IntentType, String)> {
    let q = question.to_lowercase();

    if matches_any(&q, PARTY_KEYWORDS) {
        if let (Some(vendor), Some(purchaser)) =
            (&facts.role_parties.vendor, &facts.role_parties.purchaser)
        {
            let answer = if q.contains("vendor") || q.contains("seller") {
                format!("Vendor/Seller: {}", vendor)
            } else if q.contains("purchaser") || q.contains("buyer") {
                format!("Purchaser/Buyer: {}", purchaser)
            } else {
                format!(
                    "Vendor (seller): {}, Purchaser (buyer): {}",
                    vendor, purchaser
                )
            };
            return Some((IntentType::Parties, answer));
        }
        if !facts.parties.is_empty() {
            return Some((
                IntentType::Parties,
                format!("Parties involved: {}", facts.parties.join(", ")),
            ));
        }
    }

    if matches_any(&q, AMOUNT_KEYWORDS) && !facts.amounts.is_empty() {
        let primary = &facts.amounts[0];
        let answer = if facts.amounts.len() > 1 {
            format!(
                "Multiple amounts mentioned: {}. Primary amount: {}",
                facts.amounts.join(", "),
                primary
            )
        } else {
            format!("Amount/consideration: {}", primary)
        };
        return Some((IntentType::Amount, answer));
    }

    if matches_any(&q, PROPERTY_KEYWORDS) {
        let prop = &facts.property;
        let mut parts = Vec::new();
        if let Some(ref s) = prop.survey_no {
            parts.push(format!("Survey No: {}", s));
        }
        if let Some(ref p) = prop.patta_no {
            parts.push(format!("Patta No: {}", p));
        }
        if let Some(ref v) = prop.village {
            parts.push(format!("Village: {}", v));
        }
        if let Some(ref t) = prop.taluk {
            parts.push(format!("Taluk: {}", t));
        }
        if let Some(ref d) = prop.district {
            parts.push(format!("District: {}", d));
        }

        if !parts.is_empty() {
            let answer = if q.contains("survey") {
                format!(
                    "Survey Number: {}",
                    prop.survey_no.as_deref().unwrap_or("Not specified")
                )
            } else if q.contains("patta") {
                format!(
                    "Patta Number: {}",
                    prop.patta_no.as_deref().unwrap_or("Not specified")
                )
            } else if q.contains("village") {
                format!(
                    "Village: {}",
                    prop.village.as_deref().unwrap_or("Not specified")
                )
            } else if q.contains("taluk") {
                format!(
                    "Taluk: {}",
                    prop.taluk.as_deref().unwrap_or("Not specified")
                )
            } else if q.contains("district") {
                format!(
                    "District: {}",
                    prop.district.as_deref().unwrap_or("Not specified")
                )
            } else {
                format!("Property details: {}", parts.join(" | "))
            };
            return Some((IntentType::Property, answer));
        }
    }

    if matches_any(&q, DATE_KEYWORDS) && !facts.dates.is_empty() {
        let primary = &facts.dates[0];
        let answer = if facts.dates.len() > 1 {
            format!(
                "Multiple dates mentioned: {}. Primary date: {}",
                facts.dates.join(", "),
                primary
            )
        } else {
            format!("Document date: {}", primary)
        };
        return Some((IntentType::Dates, answer));
    }

    None
}

/// Answer one question against one indexed document.
///
/// `provider` is `None` when embeddings are disabled; retrieval then degrades
/// to the low-confidence refusal.
pub async fn answer_question(
    question: &str,
    index: &DocumentIndex,
    provider: Option<&dyn EmbeddingProvider>,
    retrieval: &RetrievalConfig,
) -> Result<AnswerResult> {
    if let Some((intent, answer)) = detect_intent(question, &index.facts) {
        return Ok(AnswerResult {
            answer,
            sources: vec![SourceRecord {
                chunk_id: -1,
                score: 1.0,
                text: format!(
                    "Answer based on extracted {} information.",
                    intent.as_str()
                ),
            }],
            best_score: 1.0,
            answer_source: AnswerSource::StructuredFacts,
            intent_type: intent,
        });
    }

    let provider = match provider {
        Some(p) if !index.embeddings.is_empty() => p,
        _ => return Ok(low_confidence(0.0)),
    };

    let query_vec = embed_query(provider, question).await?;

    // Zip bounds the iteration so a chunk/embedding count mismatch can never
    // index chunks out of range.
    let mut scored: Vec<(usize, f64)> = index
        .chunks
        .iter()
        .zip(index.embeddings.iter())
        .enumerate()
        .map(|(i, (_, e))| (i, dot(e, &query_vec) as f64))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(retrieval.top_k);

    let best_score = scored.first().map(|&(_, s)| s).unwrap_or(0.0);
    if best_score < retrieval.min_confidence {
        return Ok(low_confidence(best_score));
    }

    let sources = scored
        .iter()
        .map(|&(i, score)| SourceRecord {
            chunk_id: i as i64,
            score,
            text: snippet_around(&index.chunks[i], question, retrieval.snippet_window),
        })
        .collect();

    let answer = snippet_around(
        &index.chunks[scored[0].0],
        question,
        retrieval.answer_window,
    );

    Ok(AnswerResult {
        answer,
        sources,
        best_score,
        answer_source: AnswerSource::Retrieval,
        intent_type: IntentType::General,
    })
}

fn low_confidence(best_score: f64) -> AnswerResult {
    AnswerResult {
        answer: LOW_CONFIDENCE_ANSWER.to_string(),
        sources: Vec::new(),
        best_score,
        answer_source: AnswerSource::LowConfidence,
        intent_type: IntentType::General,
    }
}

// ============ Snippets ============

static QUERY_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").unwrap());

/// Extract a snippet of roughly `window` bytes centered on the earliest
/// occurrence of a meaningful query word (ASCII, longer than 3 chars).
///
/// Falls back to the first `window` bytes when no query word is present.
/// Boundary ellipses mark whichever side was truncated. Cuts always land on
/// UTF-8 character boundaries, which matters for mixed Tamil/English deeds.
pub fn snippet_around(text: &str, query: &str, window: usize) -> String {
    let q_words: Vec<String> = QUERY_WORD
        .find_iter(query)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.len() > 3)
        .collect();

    let hits: Vec<usize> = q_words
        .iter()
        .filter_map(|w| find_ascii_ci(text, w))
        .collect();

    let Some(&pos) = hits.iter().min() else {
        if text.len() > window {
            let end = floor_boundary(text, window);
            return format!("{}...", &text[..end]);
        }
        return text.to_string();
    };

    let start = floor_boundary(text, pos.saturating_sub(window / 2));
    let end = floor_boundary(text, (start + window).min(text.len()));

    if start == 0 && end < text.len() {
        format!("{}...", &text[..end])
    } else if end == text.len() && start > 0 {
        format!("...{}", &text[start..])
    } else if start > 0 && end < text.len() {
        format!("...{}...", &text[start..end])
    } else {
        text[start..end].to_string()
    }
}

/// Byte offset of the first ASCII-case-insensitive match of `needle`.
///
/// `needle` is ASCII (query words are `[A-Za-z]+`), so a matching offset is
/// always a character boundary in `haystack`.
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let hb = haystack.as_bytes();
    let nb = needle.as_bytes();
    if nb.is_empty() || hb.len() < nb.len() {
        return None;
    }
    hb.windows(nb.len())
        .position(|w| w.eq_ignore_ascii_case(nb))
}

/// Largest character boundary not exceeding `i`.
fn floor_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
