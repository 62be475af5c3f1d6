//! Shared data structures for the airport services query engine
//!
//! This module defines the core types flowing through the pipeline:
//! - Query + Intent + entities (classifier input/output)
//! - ConversationContext (per-session bounded history)
//! - KnowledgeEntry / KnowledgeMatch (curated fast path)
//! - ContentBlock / CacheEntry (scraped external content)
//! - EngineResponse (final assembled output)

mod content;
mod context;
mod knowledge;
mod query;
mod response;

pub use content::*;
pub use context::*;
pub use knowledge::*;
pub use query::*;
pub use response::*;
