//! # DeedScope
//!
//! A sale-deed analysis service for Tamil Nadu property documents.
//!
//! DeedScope ingests a deed (PDF or plain text), extracts structured facts
//! (parties, dates, amounts, land-registry identifiers) by fusing regex
//! patterns with an optional NLP entity tagger, computes a completeness/risk
//! verdict, renders bilingual English/Tamil summaries, and answers free-text
//! questions using rule-based intent detection with fallback to semantic
//! retrieval over overlapping text chunks.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────────────────┐   ┌───────────┐
//! │  Upload  │──▶│  Pipeline                  │──▶│ In-memory  │
//! │ PDF/text │   │ facts+risk+summaries+index │   │   store    │
//! └──────────┘   └───────────────────────────┘   └─────┬─────┘
//!                                                      │
//!                                  ┌───────────────────┤
//!                                  ▼                   ▼
//!                             ┌──────────┐       ┌──────────┐
//!                             │   CLI    │       │   HTTP   │
//!                             │(deedscope)│      │  (axum)  │
//!                             └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! deedscope analyze deed.pdf        # one-shot analysis, JSON to stdout
//! deedscope serve                   # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | PDF/plain-text extraction |
//! | [`facts`] | Regex + tagger fact extraction |
//! | [`ner`] | Entity tagger abstraction |
//! | [`risk`] | Completeness/risk assessment |
//! | [`summary`] | English + Tamil summaries |
//! | [`chunk`] | Text chunking |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`store`] | Document store |
//! | [`index`] | Retrieval index construction |
//! | [`query`] | Intent routing + semantic retrieval |
//! | [`tts`] | Speech synthesis abstraction |
//! | [`pipeline`] | End-to-end orchestration |
//! | [`server`] | HTTP server |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod extract;
pub mod facts;
pub mod index;
pub mod models;
pub mod ner;
pub mod pipeline;
pub mod query;
pub mod risk;
pub mod server;
pub mod store;
pub mod summary;
pub mod tts;

pub use config::{load_config, Config};
pub use models::{AnswerResult, Facts, Risk, RiskColor};
pub use pipeline::{AnalysisReport, Pipeline};
