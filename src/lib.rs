//! # kbqa — Local Knowledge-Base Question Answering
//!
//! Offline question answering over a static corpus of
//! question/evidence/answer records: evidence texts are segmented, indexed
//! as TF-IDF vectors, ranked by cosine similarity against a query, and the
//! best match is turned into an answer with its provenance.
//!
//! ## Architecture
//!
//! - **[`tokenizer`]** — Word segmentation (jieba dictionary) behind a trait, plus a mock
//! - **[`kb`]** — Knowledge base model, JSON loader/validation, ID renumbering
//! - **[`index`]** — TF-IDF index build and similarity search
//! - **[`answer`]** — Answer synthesis from ranked results
//! - **[`engine`]** — `QaEngine`: load / search / answer / stats
//! - **[`config`]** — Configuration loading and validation
//! - **[`repl`]** — Interactive text menu
//! - **[`mcp`]** — MCP server exposing the engine as tools (stdio transport via rmcp)

pub mod answer;
pub mod config;
pub mod engine;
pub mod index;
pub mod kb;
pub mod mcp;
pub mod repl;
pub mod tokenizer;
