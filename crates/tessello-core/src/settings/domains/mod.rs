//! Per-domain tier records and resolution
//!
//! One module per configuration domain. Each defines its org / team / user
//! tier records (guardrails has no user tier), the effective wire shape, the
//! patch payloads for each tier, and a `resolve` function over the tiers.

pub mod chat;
pub mod guardrails;
pub mod llm;
pub mod rag;
pub mod theme;

// vim: ts=4
