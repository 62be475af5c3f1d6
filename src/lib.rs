//! AeroDesk: Airport Services Query Engine
//!
//! Query understanding and knowledge retrieval for Muscat International
//! Airport passenger questions.
//!
//! ## Pipeline
//!
//! - **Pattern Classifier**: ordered first-match-wins intent rules + an
//!   independent entity pass
//! - **Context Store**: bounded per-session history behind an async LRU cache
//! - **Knowledge Base**: curated Q&A entries with a scored matcher and a
//!   short-circuit fast path
//! - **Content Acquisition**: rate-limited source fetching with a TTL cache
//!   and content-hash deduplication
//! - **Answer Synthesizer**: two-tier specific-answer / sub-type-template
//!   dispatch
//! - **Response Assembler**: final response object with suggested actions

pub mod acquisition;
pub mod classifier;
pub mod config;
pub mod context;
pub mod engine;
pub mod knowledge;
pub mod synthesizer;
pub mod types;

// Re-export configuration
pub use config::EngineConfig;

// Re-export the pipeline entry points
pub use engine::{QueryEngine, QueryEngineBuilder, ResponseAssembler};

// Re-export commonly used types
pub use types::{
    Classification, ContentBlock, ContentCategory, ConversationContext, EngineResponse,
    EntityKind, Intent, IntentKind, KnowledgeEntry, KnowledgeMatch, MatchOutcome, Query,
    SourceRef, Turn, MAX_CONTEXT_TURNS,
};

// Re-export trait seams for injected collaborators
pub use acquisition::{ContentCache, MemoryContentCache, PageFetcher, SledContentCache};
pub use context::{HistoryProvider, NoHistory};
pub use knowledge::{KnowledgeBase, KnowledgeProvider};
