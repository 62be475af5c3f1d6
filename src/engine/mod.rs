//! Query Engine
//!
//! Wires the pipeline together: classify → context → knowledge match →
//! content acquisition → synthesis → assembly → context update. One call per
//! query; safe across concurrent queries.
//!
//! Every collaborator degrades rather than fails, so the only remaining
//! failure mode is a programming fault. That is caught once here and turned
//! into a fixed low-confidence apology with `requires_human` set.

mod assembler;

pub use assembler::ResponseAssembler;

use crate::acquisition::{ContentAcquisition, ContentCache, HttpFetcher, PageFetcher};
use crate::classifier::{detect_language, PatternClassifier};
use crate::config::{defaults, EngineConfig};
use crate::context::{ContextStore, HistoryProvider, NoHistory};
use crate::knowledge::{KnowledgeBase, KnowledgeMatcher, KnowledgeProvider};
use crate::synthesizer::AnswerSynthesizer;
use crate::types::{
    ContentCategory, EngineResponse, Intent, IntentKind, MatchOutcome, Query, SourceRef, Turn,
};
use anyhow::Context as _;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info};

const GREETING_TEXT: &str =
    "Hello! I can help with parking, transportation, flights, and services at \
     Muscat International Airport. What would you like to know?";

const COMPLAINT_TEXT: &str =
    "I'm sorry to hear about your experience. I've flagged this for our customer \
     relations team, who will follow up with you.";

const REPHRASE_TEXT: &str =
    "I'm not sure I understood that. Could you rephrase your question? I can help \
     with parking, transportation, flights, and airport services.";

const APOLOGY_TEXT: &str =
    "I'm sorry, something went wrong while handling your question. A member of \
     staff will assist you shortly.";

/// Content category consulted for an intent's live search.
fn category_for(kind: IntentKind) -> ContentCategory {
    match kind {
        IntentKind::Parking => ContentCategory::Parking,
        IntentKind::Taxi
        | IntentKind::CarRental
        | IntentKind::Directions
        | IntentKind::Transportation => ContentCategory::Transportation,
        IntentKind::FlightInquiry => ContentCategory::Flight,
        IntentKind::Services | IntentKind::Facilities => ContentCategory::Services,
        IntentKind::Greeting | IntentKind::Complaint | IntentKind::GeneralInfo => {
            ContentCategory::General
        }
    }
}

/// Assembles a `QueryEngine` from injected collaborators.
pub struct QueryEngineBuilder {
    config: EngineConfig,
    fetcher: Option<Arc<dyn PageFetcher>>,
    cache: Option<Arc<dyn ContentCache>>,
    history: Option<Arc<dyn HistoryProvider>>,
    knowledge: Option<Arc<dyn KnowledgeProvider>>,
}

impl QueryEngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            fetcher: None,
            cache: None,
            history: None,
            knowledge: None,
        }
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn ContentCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn history(mut self, provider: Arc<dyn HistoryProvider>) -> Self {
        self.history = Some(provider);
        self
    }

    pub fn knowledge(mut self, provider: Arc<dyn KnowledgeProvider>) -> Self {
        self.knowledge = Some(provider);
        self
    }

    /// Validate the config and wire the pipeline.
    pub fn build(self) -> anyhow::Result<QueryEngine> {
        self.config
            .validate()
            .context("engine configuration rejected")?;

        let fetcher: Arc<dyn PageFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(
                HttpFetcher::new(Duration::from_secs(
                    self.config.acquisition.fetch_timeout_secs,
                ))
                .context("building the http client")?,
            ),
        };
        let cache = self
            .cache
            .context("a content cache is required (sled or in-memory)")?;
        let history = self.history.unwrap_or_else(|| Arc::new(NoHistory));
        let knowledge = match self.knowledge {
            Some(provider) => KnowledgeBase::with_provider(provider),
            None => KnowledgeBase::seeded(),
        };

        let acquisition = ContentAcquisition::new(
            fetcher,
            cache,
            self.config.sources.clone(),
            self.config.acquisition.clone(),
        );
        let swept = acquisition.sweep_expired();
        info!(
            sources = self.config.sources.len(),
            knowledge_entries = knowledge.len(),
            swept,
            "Query engine ready"
        );

        Ok(QueryEngine {
            classifier: PatternClassifier::new(),
            context: ContextStore::new(history, self.config.context.session_cache_capacity),
            matcher: KnowledgeMatcher::new(self.config.matcher.clone()),
            knowledge,
            acquisition,
            synthesizer: AnswerSynthesizer::new(),
            assembler: ResponseAssembler,
        })
    }
}

/// The full query pipeline.
pub struct QueryEngine {
    classifier: PatternClassifier,
    context: ContextStore,
    matcher: KnowledgeMatcher,
    knowledge: KnowledgeBase,
    acquisition: ContentAcquisition,
    synthesizer: AnswerSynthesizer,
    assembler: ResponseAssembler,
}

/// Intermediate answer before assembly.
struct Draft {
    text: String,
    confidence: f64,
    sources: Vec<SourceRef>,
    escalate: bool,
}

impl QueryEngine {
    pub fn builder(config: EngineConfig) -> QueryEngineBuilder {
        QueryEngineBuilder::new(config)
    }

    /// Handle one query end to end. Never returns an error to the caller:
    /// a fault anywhere in the pipeline becomes the apology response.
    pub async fn handle(&self, query: &Query) -> EngineResponse {
        let started = Instant::now();
        match AssertUnwindSafe(self.run(query, started)).catch_unwind().await {
            Ok(response) => response,
            Err(_) => {
                error!(session = %query.session_id, "Query pipeline fault");
                self.assembler.assemble(
                    Intent::new(IntentKind::GeneralInfo, defaults::APOLOGY_CONFIDENCE),
                    APOLOGY_TEXT.to_string(),
                    defaults::APOLOGY_CONFIDENCE,
                    Vec::new(),
                    true,
                    "en",
                    started,
                )
            }
        }
    }

    async fn run(&self, query: &Query, started: Instant) -> EngineResponse {
        let snapshot = self.context.snapshot(&query.session_id).await;
        let classification = self.classifier.classify(&query.text, &snapshot);
        let intent = classification.intent;

        let language = detect_language(&query.text)
            .map(str::to_string)
            .unwrap_or_else(|| snapshot.language.clone());

        let draft = self.answer(query, intent).await;
        let response = self.assembler.assemble(
            intent,
            draft.text,
            draft.confidence,
            draft.sources,
            draft.escalate,
            &language,
            started,
        );

        // Apply the turn under the session lock so exchanges land in request
        // order even under concurrent queries to the same session.
        let handle = self.context.get(&query.session_id).await;
        {
            let mut ctx = handle.lock().await;
            ctx.language = language;
            ctx.merge_entities(&classification.entities);
            ctx.push_exchange(
                Turn::user(query.text.clone(), intent.kind),
                Turn::assistant(response.text.clone()),
            );
        }

        debug!(
            session = %query.session_id,
            intent = %intent.kind,
            confidence = response.confidence,
            elapsed_ms = response.elapsed_ms,
            "Query handled"
        );
        response
    }

    /// Produce the answer draft for a classified query.
    async fn answer(&self, query: &Query, intent: Intent) -> Draft {
        match intent.kind {
            IntentKind::Greeting => {
                return Draft {
                    text: GREETING_TEXT.to_string(),
                    confidence: intent.confidence,
                    sources: Vec::new(),
                    escalate: false,
                }
            }
            IntentKind::Complaint => {
                return Draft {
                    text: COMPLAINT_TEXT.to_string(),
                    confidence: intent.confidence,
                    sources: Vec::new(),
                    escalate: false,
                }
            }
            _ => {}
        }

        let entries = self.knowledge.snapshot();
        let outcome = self.matcher.best_match(&query.text, &entries);

        if let MatchOutcome::ShortCircuit(m) = &outcome {
            debug!(relevance = m.relevance, "Knowledge short-circuit");
            return Draft {
                text: m.entry.answer.clone(),
                confidence: m.relevance,
                sources: Vec::new(),
                escalate: false,
            };
        }

        let blocks = self
            .acquisition
            .search(&query.text, category_for(intent.kind))
            .await;

        if let Some(synthesis) = self.synthesizer.synthesize(&query.text, &blocks) {
            return Draft {
                text: synthesis.text,
                confidence: synthesis.confidence,
                sources: synthesis.sources,
                escalate: synthesis.escalate,
            };
        }

        // Synthesizer had nothing: blend in the best knowledge candidate
        // before giving up.
        if let Some(top) = outcome.top() {
            return Draft {
                text: top.entry.answer.clone(),
                confidence: top.relevance,
                sources: Vec::new(),
                escalate: false,
            };
        }

        Draft {
            text: REPHRASE_TEXT.to_string(),
            confidence: defaults::REPHRASE_CONFIDENCE,
            sources: Vec::new(),
            escalate: false,
        }
    }

    /// Re-pull the active knowledge entries from the provider.
    pub async fn refresh_knowledge(&self) -> usize {
        self.knowledge.refresh().await
    }

    /// Sessions currently held in the context cache.
    pub async fn cached_sessions(&self) -> usize {
        self.context.cached_sessions().await
    }
}
