//! Markdown import: tolerant field extraction for vaga auto-fill.
//!
//! Upstream content (AI analyses, user-pasted notes, exported files) follows
//! no single convention, so extraction is best-effort: every field resolves
//! independently through an ordered pattern chain and is simply absent when
//! nothing matches. The extractor never fails on unparsable input.

pub mod fields;
pub mod handlers;
pub mod markdown;

pub use fields::{extract_vaga_draft, VagaDraft};
pub use markdown::normalize_markdown;
