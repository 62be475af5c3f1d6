//! Answer Synthesizer
//!
//! Two-tier dispatcher over the candidate content blocks. Tier 1 answers
//! narrowly-scoped rate/fare questions with the literal figure extracted
//! from a block. Tier 2 detects a fine-grained sub-type and fills its
//! parameterized template with fact sentences from the blocks, falling back
//! to the sub-type's static text when no block contributes. With neither a
//! block-backed answer nor a static template, it yields `None` and the
//! engine falls back further.

mod rates;
mod subtypes;
mod templates;

pub use rates::{duration_label, RateExtractor};
pub use subtypes::{detect_subtype, QuerySubtype};
pub use templates::{extract_facts, render, template_for};

use crate::config::defaults::TEMPLATE_CONFIDENCE;
use crate::types::{ContentBlock, SourceRef};
use tracing::debug;

/// A synthesized answer, pre-assembly.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub text: String,
    pub confidence: f64,
    pub sources: Vec<SourceRef>,
    pub subtype: Option<QuerySubtype>,
    /// Set when the answer needs human follow-through (assistance desks).
    pub escalate: bool,
}

pub struct AnswerSynthesizer {
    rates: RateExtractor,
}

impl AnswerSynthesizer {
    pub fn new() -> Self {
        Self {
            rates: RateExtractor::new(),
        }
    }

    /// Synthesize an answer from the query and its candidate blocks.
    pub fn synthesize(&self, query: &str, blocks: &[ContentBlock]) -> Option<Synthesis> {
        let subtype = detect_subtype(query);

        if let Some(synthesis) = self.specific_answer(query, blocks, subtype) {
            debug!(subtype = ?synthesis.subtype, "Synthesized specific answer");
            return Some(synthesis);
        }

        let subtype = subtype?;
        let def = template_for(subtype)?;

        let facts = extract_facts(def, blocks);
        if facts.is_empty() {
            let fallback = def.fallback?;
            debug!(subtype = subtype.label(), "Synthesized from static template");
            return Some(Synthesis {
                text: fallback.to_string(),
                confidence: TEMPLATE_CONFIDENCE,
                sources: Vec::new(),
                subtype: Some(subtype),
                escalate: needs_escalation(subtype),
            });
        }

        let text = render(def, &facts);
        let mut contributing: Vec<usize> = facts.iter().map(|f| f.block_idx).collect();
        contributing.dedup();
        let confidence = mean_relevance(blocks, &contributing).max(TEMPLATE_CONFIDENCE);
        let sources = contributing
            .iter()
            .map(|&i| source_ref(&blocks[i]))
            .collect();

        debug!(subtype = subtype.label(), facts = facts.len(), "Synthesized from content");
        Some(Synthesis {
            text,
            confidence,
            sources,
            subtype: Some(subtype),
            escalate: needs_escalation(subtype),
        })
    }

    /// Tier 1: literal rate/fare answers.
    fn specific_answer(
        &self,
        query: &str,
        blocks: &[ContentBlock],
        subtype: Option<QuerySubtype>,
    ) -> Option<Synthesis> {
        if let Some(minutes) = self.rates.target_minutes(query) {
            if asks_for_cost(query) {
                if let Some(hit) = self.rates.find_rate(blocks, minutes) {
                    let block = &blocks[hit.block_idx];
                    return Some(Synthesis {
                        text: format!(
                            "Parking for {} costs OMR {} (source: {}).",
                            duration_label(hit.minutes),
                            hit.amount,
                            block.title
                        ),
                        confidence: block.relevance.max(TEMPLATE_CONFIDENCE),
                        sources: vec![source_ref(block)],
                        subtype: subtype.or(Some(QuerySubtype::ParkingRates)),
                        escalate: false,
                    });
                }
            }
        }

        if subtype == Some(QuerySubtype::TaxiFare) {
            if let Some((amount, idx)) = self.rates.find_taxi_fare(blocks) {
                let block = &blocks[idx];
                return Some(Synthesis {
                    text: format!(
                        "A taxi from the airport typically costs OMR {amount}; taxis are \
                         metered and wait outside arrivals."
                    ),
                    confidence: block.relevance.max(TEMPLATE_CONFIDENCE),
                    sources: vec![source_ref(block)],
                    subtype,
                    escalate: false,
                });
            }
        }

        None
    }
}

impl Default for AnswerSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

fn asks_for_cost(query: &str) -> bool {
    let lower = query.to_lowercase();
    ["rate", "cost", "price", "charge", "how much", "fee", "tariff"]
        .iter()
        .any(|c| lower.contains(c))
}

/// Desk-bound subjects are flagged for human follow-through.
fn needs_escalation(subtype: QuerySubtype) -> bool {
    matches!(
        subtype,
        QuerySubtype::LostBaggage | QuerySubtype::SpecialAssistance
    )
}

fn source_ref(block: &ContentBlock) -> SourceRef {
    SourceRef {
        title: block.title.clone(),
        url: block.source_url.clone(),
        relevance: block.relevance,
    }
}

fn mean_relevance(blocks: &[ContentBlock], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let sum: f64 = indices.iter().map(|&i| blocks[i].relevance).sum();
    sum / indices.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{content_hash, ContentCategory};
    use chrono::Utc;

    fn block(title: &str, body: &str, relevance: f64) -> ContentBlock {
        ContentBlock {
            source_name: "muscat-parking".to_string(),
            source_url: "https://x.test/parking".to_string(),
            title: title.to_string(),
            body: body.to_string(),
            category: ContentCategory::Parking,
            relevance,
            content_hash: content_hash(body),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_specific_rate_answer_with_source() {
        let synth = AnswerSynthesizer::new();
        let blocks = vec![block(
            "Parking Rates",
            "30 minutes | OMR 0.600\n1 hour | OMR 1.200",
            0.9,
        )];
        let s = synth
            .synthesize("what is the parking rate for 30 minutes", &blocks)
            .expect("synthesis");
        assert!(s.text.contains("OMR 0.600"));
        assert!(s.text.contains("30 minutes"));
        assert_eq!(s.sources.len(), 1);
        assert_eq!(s.sources[0].url, "https://x.test/parking");
    }

    #[test]
    fn test_taxi_fare_specific_answer() {
        let synth = AnswerSynthesizer::new();
        let blocks = vec![block(
            "Taxi Services",
            "Airport taxis charge around OMR 10-12 to the city centre.",
            0.8,
        )];
        let s = synth
            .synthesize("how much does a taxi cost", &blocks)
            .expect("synthesis");
        assert!(s.text.contains("OMR 10-12"));
        assert_eq!(s.subtype, Some(QuerySubtype::TaxiFare));
    }

    #[test]
    fn test_car_rental_gets_specific_answer_not_generic() {
        let synth = AnswerSynthesizer::new();
        let s = synth
            .synthesize("is car rental available at muscat airport", &[])
            .expect("synthesis");
        assert_eq!(s.subtype, Some(QuerySubtype::CarRental));
        assert!(s.text.to_lowercase().contains("rental"));
    }

    #[test]
    fn test_content_backed_answer_blends_relevance() {
        let synth = AnswerSynthesizer::new();
        let blocks = vec![block(
            "Car Rental",
            "Several rental desks operate 24 hours in the arrivals hall.",
            0.9,
        )];
        let s = synth
            .synthesize("is car rental available at muscat airport", &blocks)
            .expect("synthesis");
        assert!(s.confidence >= 0.9 - f64::EPSILON);
        assert_eq!(s.sources.len(), 1);
    }

    #[test]
    fn test_template_fallback_confidence_floor() {
        let synth = AnswerSynthesizer::new();
        let s = synth.synthesize("where are the prayer rooms", &[]).expect("synthesis");
        assert!((s.confidence - TEMPLATE_CONFIDENCE).abs() < f64::EPSILON);
        assert!(s.sources.is_empty());
    }

    #[test]
    fn test_no_subtype_no_blocks_is_none() {
        let synth = AnswerSynthesizer::new();
        assert!(synth.synthesize("tell me a story", &[]).is_none());
    }

    #[test]
    fn test_flight_status_without_content_is_none() {
        // No static fallback exists for live flight data.
        let synth = AnswerSynthesizer::new();
        assert!(synth
            .synthesize("is flight WY123 delayed, what is its status", &[])
            .is_none());
    }

    #[test]
    fn test_escalation_flag_for_lost_baggage() {
        let synth = AnswerSynthesizer::new();
        let s = synth.synthesize("I lost my bag at the airport", &[]).expect("synthesis");
        assert!(s.escalate);
        assert_eq!(s.subtype, Some(QuerySubtype::LostBaggage));
    }
}
