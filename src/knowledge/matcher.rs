//! Scored matching of queries against curated knowledge entries.
//!
//! Additive scoring with configurable weights:
//! - keyword whole-word hits in the query
//! - content words shared between query and entry question
//! - concept-to-keyword matches (synonym table below)
//! - grammatical question-form agreement
//!
//! Entries above the raw floor and relevance floor are kept; ties break by
//! entry priority, then insertion order. A relevance above the short-circuit
//! threshold skips content acquisition entirely.

use crate::config::MatcherConfig;
use crate::types::{KnowledgeEntry, KnowledgeMatch, MatchOutcome};
use std::collections::BTreeSet;

/// Words ignored when counting shared content words. Question words are
/// excluded here because form agreement scores them separately.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "what", "where", "when", "which",
    "who", "why", "how", "can", "could", "do", "does", "did", "will", "would", "i", "you", "we",
    "my", "your", "me", "it", "at", "in", "on", "of", "for", "to", "and", "or", "there", "please",
    "much", "many",
];

/// Concept synonym table: a query mentioning any cue word matches entry
/// keywords equal to (or prefixed by) the concept.
const CONCEPTS: &[(&str, &[&str])] = &[
    ("parking", &["park", "parking", "car park", "garage", "forecourt"]),
    ("rate", &["rate", "rates", "cost", "price", "fee", "charge", "tariff"]),
    ("taxi", &["taxi", "cab"]),
    ("rental", &["rental", "rent", "hire"]),
    ("wifi", &["wifi", "wi-fi", "internet"]),
    ("lounge", &["lounge", "lounges"]),
    ("luggage", &["luggage", "baggage", "bags", "suitcase"]),
    ("food", &["food", "restaurant", "eat", "dining", "cafe"]),
    ("prayer", &["prayer", "mosque", "musalla"]),
    ("flight", &["flight", "arrival", "departure"]),
    ("bus", &["bus", "shuttle", "coach"]),
];

/// Grammatical form of a question, detected from its leading words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuestionForm {
    YesNo,
    Which,
    Where,
    When,
    HowMuch,
    How,
    What,
}

fn detect_form(text: &str) -> Option<QuestionForm> {
    let lower = text.trim().to_lowercase();
    let mut words = lower.split_whitespace();
    let first = words.next()?;
    match first {
        "is" | "are" | "can" | "could" | "do" | "does" | "did" | "will" | "would" => {
            Some(QuestionForm::YesNo)
        }
        "which" => Some(QuestionForm::Which),
        "where" => Some(QuestionForm::Where),
        "when" => Some(QuestionForm::When),
        "how" => match words.next() {
            Some("much") | Some("many") => Some(QuestionForm::HowMuch),
            _ => Some(QuestionForm::How),
        },
        "what" => Some(QuestionForm::What),
        _ => None,
    }
}

fn content_words(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1 && !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Whole-word containment check that also handles multi-word keywords.
fn contains_whole(haystack_lower: &str, words: &BTreeSet<String>, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if needle.contains(' ') {
        haystack_lower.contains(&needle)
    } else {
        words.contains(&needle)
    }
}

pub struct KnowledgeMatcher {
    weights: MatcherConfig,
}

impl KnowledgeMatcher {
    pub fn new(weights: MatcherConfig) -> Self {
        Self { weights }
    }

    /// Score one query against the entry set.
    pub fn best_match(&self, query: &str, entries: &[KnowledgeEntry]) -> MatchOutcome {
        let query_lower = query.to_lowercase();
        let query_words = content_words(query);
        let query_form = detect_form(query);

        let mut scored: Vec<(usize, KnowledgeMatch)> = entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let score = self.score_entry(entry, &query_lower, &query_words, query_form);
                if score < self.weights.raw_floor {
                    return None;
                }
                let relevance =
                    (f64::from(score) / self.weights.score_normalizer).clamp(0.0, 1.0);
                if relevance <= self.weights.relevance_floor {
                    return None;
                }
                Some((
                    idx,
                    KnowledgeMatch {
                        entry: entry.clone(),
                        score,
                        relevance,
                    },
                ))
            })
            .collect();

        // Score desc, then priority desc, then insertion order.
        scored.sort_by(|(ia, a), (ib, b)| {
            b.score
                .cmp(&a.score)
                .then(b.entry.priority.cmp(&a.entry.priority))
                .then(ia.cmp(ib))
        });

        let mut matches: Vec<KnowledgeMatch> = scored.into_iter().map(|(_, m)| m).collect();
        match matches.first() {
            None => MatchOutcome::Miss,
            Some(top) if top.relevance > self.weights.short_circuit => {
                MatchOutcome::ShortCircuit(matches.swap_remove(0))
            }
            Some(_) => {
                matches.truncate(self.weights.max_candidates);
                MatchOutcome::Candidates(matches)
            }
        }
    }

    fn score_entry(
        &self,
        entry: &KnowledgeEntry,
        query_lower: &str,
        query_words: &BTreeSet<String>,
        query_form: Option<QuestionForm>,
    ) -> u32 {
        let mut score = 0u32;

        for keyword in &entry.keywords {
            if contains_whole(query_lower, query_words, keyword) {
                score += self.weights.keyword_hit;
            }
        }

        let question_words = content_words(&entry.question);
        let shared = query_words.intersection(&question_words).count() as u32;
        score += shared * self.weights.shared_word;

        for (concept, cues) in CONCEPTS {
            let cue_present = cues
                .iter()
                .any(|cue| contains_whole(query_lower, query_words, cue));
            if !cue_present {
                continue;
            }
            let keyword_covers = entry.keywords.iter().any(|k| {
                let k = k.to_lowercase();
                k == *concept || k.starts_with(concept) || concept.starts_with(k.as_str())
            });
            if keyword_covers {
                score += self.weights.concept_match;
            }
        }

        if let (Some(qf), Some(ef)) = (query_form, detect_form(&entry.question)) {
            if qf == ef {
                score += self.weights.form_match;
            }
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(question: &str, keywords: &[&str], priority: u8) -> KnowledgeEntry {
        KnowledgeEntry {
            category: "test".to_string(),
            subcategory: "test".to_string(),
            question: question.to_string(),
            answer: format!("answer to: {question}"),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            priority,
        }
    }

    fn matcher() -> KnowledgeMatcher {
        KnowledgeMatcher::new(MatcherConfig::default())
    }

    #[test]
    fn test_parking_rates_round_trip() {
        let entries = vec![entry(
            "What are the parking rates?",
            &["parking", "rate"],
            5,
        )];
        let outcome = matcher().best_match("What are the parking rates at the airport?", &entries);
        let top = outcome.top().expect("expected a match");
        assert!(top.relevance > 0.25, "relevance was {}", top.relevance);
    }

    #[test]
    fn test_relevance_bounds() {
        let entries = vec![entry(
            "What are the parking rates?",
            &["parking", "rate", "rates", "cost", "price", "airport"],
            5,
        )];
        let outcome =
            matcher().best_match("what are the parking rates cost price airport", &entries);
        if let Some(top) = outcome.top() {
            assert!((0.0..=1.0).contains(&top.relevance));
        }
    }

    #[test]
    fn test_unrelated_query_misses() {
        let entries = vec![entry("What are the parking rates?", &["parking", "rate"], 5)];
        let outcome = matcher().best_match("do penguins dream", &entries);
        assert!(matches!(outcome, MatchOutcome::Miss));
    }

    #[test]
    fn test_priority_breaks_ties() {
        let entries = vec![
            entry("Where is the taxi rank?", &["taxi"], 1),
            entry("Where is the taxi rank?", &["taxi"], 9),
        ];
        let outcome = matcher().best_match("Where is the taxi rank?", &entries);
        let top = outcome.top().expect("expected a match");
        assert_eq!(top.entry.priority, 9);
    }

    #[test]
    fn test_insertion_order_breaks_remaining_ties() {
        let entries = vec![
            entry("Where is the taxi rank?", &["taxi"], 5),
            entry("Where is the taxi rank?", &["taxi"], 5),
        ];
        let outcome = matcher().best_match("Where is the taxi rank?", &entries);
        // Identical scores and priorities: the first inserted entry wins.
        let top = outcome.top().expect("expected a match");
        assert_eq!(top.entry.answer, entries[0].answer);
    }

    #[test]
    fn test_short_circuit_for_near_verbatim() {
        let entries = vec![entry(
            "What are the parking rates at Muscat airport terminal?",
            &["parking", "rates", "muscat", "airport", "terminal", "car park"],
            5,
        )];
        let outcome = matcher().best_match(
            "What are the parking rates at Muscat airport terminal?",
            &entries,
        );
        assert!(
            matches!(outcome, MatchOutcome::ShortCircuit(_)),
            "expected short-circuit, got {outcome:?}"
        );
    }

    #[test]
    fn test_candidates_capped_at_three() {
        let entries = vec![
            entry("What are the parking rates?", &["parking"], 1),
            entry("Where can I park?", &["parking"], 2),
            entry("Is parking available?", &["parking"], 3),
            entry("How do I pay for parking?", &["parking"], 4),
        ];
        let outcome = matcher().best_match("what about airport parking areas", &entries);
        if let MatchOutcome::Candidates(c) = outcome {
            assert!(c.len() <= 3);
        }
    }

    #[test]
    fn test_form_detection() {
        assert_eq!(detect_form("Is parking available?"), Some(QuestionForm::YesNo));
        assert_eq!(detect_form("which terminal"), Some(QuestionForm::Which));
        assert_eq!(detect_form("how much is it"), Some(QuestionForm::HowMuch));
        assert_eq!(detect_form("how do I pay"), Some(QuestionForm::How));
        assert_eq!(detect_form("thanks"), None);
    }
}
