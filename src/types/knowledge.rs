//! Curated knowledge base entries and match results.

use serde::{Deserialize, Serialize};

/// One curated fact. Immutable at query time; mutated only by an
/// administrative collaborator behind the `KnowledgeProvider` seam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub category: String,
    pub subcategory: String,
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
    /// Tie-break rank; higher wins.
    pub priority: u8,
}

/// A scored knowledge entry.
#[derive(Debug, Clone)]
pub struct KnowledgeMatch {
    pub entry: KnowledgeEntry,
    /// Raw additive score before normalization.
    pub score: u32,
    /// Normalized relevance in [0,1].
    pub relevance: f64,
}

/// Outcome of matching a query against the knowledge base.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// Relevance cleared the short-circuit threshold: answer directly,
    /// skip content acquisition entirely.
    ShortCircuit(KnowledgeMatch),
    /// Above the floor but not decisive: top candidates (≤3) for blending
    /// into the synthesizer's fallback path.
    Candidates(Vec<KnowledgeMatch>),
    /// Nothing cleared the relevance floor.
    Miss,
}

impl MatchOutcome {
    /// Best match regardless of which branch fired.
    pub fn top(&self) -> Option<&KnowledgeMatch> {
        match self {
            Self::ShortCircuit(m) => Some(m),
            Self::Candidates(c) => c.first(),
            Self::Miss => None,
        }
    }
}
