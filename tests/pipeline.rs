//! End-to-end pipeline tests: config loading through analysis and question
//! answering, with all remote collaborators disabled.

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use deedscope::config::load_config;
use deedscope::models::{AnswerSource, RiskColor};
use deedscope::pipeline::Pipeline;

const DEED: &str = "REGISTERED SALE DEED\n\
VENDOR\n\
Mr. Kumar Raj, son of Late R. Raj, residing at 12 Gandhi Street\n\
PURCHASER\n\
Mrs. Anita Devi, daughter of S. Mohan, residing at 4 Anna Nagar, PIN: 641004\n\
This deed is executed on 15-03-2024 for a total consideration of \
Rs. 25,00,000/- (Rupees Twenty Five Lakhs Only) paid in full.\n\
Survey No: 142/3B\n\
Patta No: 8871\n\
Village: Peelamedu\n\
Document No. 2145 / 2025\n\
Coimbatore District, Tamil Nadu\n";

fn pipeline_from_toml(extra: &str) -> Pipeline {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("deedscope.toml");
    fs::write(
        &path,
        format!(
            r#"[server]
bind = "127.0.0.1:8700"

[chunking]
chunk_size = 160
overlap = 40

[retrieval]
top_k = 3
min_confidence = 0.25

{extra}
"#
        ),
    )
    .unwrap();
    let config = load_config(&path).unwrap();
    Pipeline::from_config(Arc::new(config)).unwrap()
}

#[tokio::test]
async fn analyze_extracts_facts_and_summaries() {
    let pipeline = pipeline_from_toml("");
    let report = pipeline
        .analyze(DEED.as_bytes(), "text/plain", "deed.txt")
        .await
        .unwrap();

    assert_eq!(report.facts.role_parties.vendor.as_deref(), Some("Kumar Raj"));
    assert_eq!(
        report.facts.role_parties.purchaser.as_deref(),
        Some("Anita Devi")
    );
    assert_eq!(report.facts.property.survey_no.as_deref(), Some("142/3B"));
    assert_eq!(report.facts.property.patta_no.as_deref(), Some("8871"));
    assert_eq!(report.facts.property.district.as_deref(), Some("Coimbatore"));
    assert_eq!(report.risk.color, RiskColor::Green);

    assert!(report.summaries.english.starts_with("Sale Deed:"));
    assert!(report.summaries.english.contains("Kumar Raj"));
    assert!(report.summaries.tamil.contains("Kumar Raj"));
    assert!(report.index_info.num_chunks >= 1);
    // TTS disabled in this config.
    assert!(report.audio.is_none());
}

#[tokio::test]
async fn pin_code_never_leaks_into_dates_or_amounts() {
    let pipeline = pipeline_from_toml("");
    let report = pipeline
        .analyze(DEED.as_bytes(), "text/plain", "deed.txt")
        .await
        .unwrap();

    assert!(!report.facts.dates.iter().any(|d| d.contains("641004")));
    assert!(!report.facts.amounts.iter().any(|a| a.contains("641004")));
    assert!(report.facts.dates.contains(&"15-03-2024".to_string()));
}

#[tokio::test]
async fn vendor_question_answers_vendor_not_purchaser() {
    let pipeline = pipeline_from_toml("");
    let report = pipeline
        .analyze(DEED.as_bytes(), "text/plain", "deed.txt")
        .await
        .unwrap();

    let result = pipeline
        .answer(&report.document_id, "Who is the vendor?")
        .await
        .unwrap()
        .expect("document should exist");

    assert_eq!(result.answer_source, AnswerSource::StructuredFacts);
    assert!(result.answer.contains("Kumar Raj"));
    assert!(!result.answer.contains("Anita Devi"));
    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.sources[0].chunk_id, -1);
}

#[tokio::test]
async fn unmatched_question_without_embeddings_refuses() {
    let pipeline = pipeline_from_toml("");
    let report = pipeline
        .analyze(DEED.as_bytes(), "text/plain", "deed.txt")
        .await
        .unwrap();

    // No intent keyword matches and embeddings are disabled, so the router
    // must refuse rather than guess.
    let result = pipeline
        .answer(&report.document_id, "describe the boundaries")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.answer_source, AnswerSource::LowConfidence);
    assert!(result.sources.is_empty());
}

#[tokio::test]
async fn delete_then_ask_reports_not_found() {
    let pipeline = pipeline_from_toml("");
    let report = pipeline
        .analyze(DEED.as_bytes(), "text/plain", "deed.txt")
        .await
        .unwrap();

    assert!(pipeline.delete_document(&report.document_id).await.unwrap());
    let result = pipeline
        .answer(&report.document_id, "who is the vendor")
        .await
        .unwrap();
    assert!(result.is_none());

    let ids = pipeline.list_documents().await.unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn reanalysis_assigns_fresh_document_ids() {
    let pipeline = pipeline_from_toml("");
    let a = pipeline
        .analyze(DEED.as_bytes(), "text/plain", "deed.txt")
        .await
        .unwrap();
    let b = pipeline
        .analyze(DEED.as_bytes(), "text/plain", "deed.txt")
        .await
        .unwrap();

    assert_ne!(a.document_id, b.document_id);
    assert_eq!(pipeline.list_documents().await.unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_config_is_rejected_at_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("deedscope.toml");
    // Overlap must be smaller than the chunk size.
    fs::write(
        &path,
        "[chunking]\nchunk_size = 40\noverlap = 40\n",
    )
    .unwrap();
    assert!(load_config(&path).is_err());
}
