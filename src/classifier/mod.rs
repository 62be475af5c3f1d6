//! Pattern Classifier
//!
//! Maps raw query text to an intent label, a fixed confidence, and extracted
//! entities. Intent matching is an ordered rule table evaluated
//! first-match-wins: transportation sub-types (taxi, car rental, parking,
//! directions) before generic transportation/service matchers, before
//! greeting/complaint, before the context-continuation fallback. There is no
//! scoring across matchers; the ordering is the priority mechanism and must
//! stay deterministic.
//!
//! Entity extraction is a second, independent pass over the same text and is
//! always attempted regardless of which intent fired.

mod entities;

pub use entities::EntityExtractor;

use crate::config::defaults;
use crate::types::{Classification, ConversationContext, Intent, IntentKind};
use regex::Regex;
use tracing::debug;

/// One intent rule: any pattern firing selects the intent.
struct IntentRule {
    kind: IntentKind,
    confidence: f64,
    patterns: Vec<Regex>,
}

impl IntentRule {
    fn new(kind: IntentKind, confidence: f64, patterns: &[&str]) -> Self {
        Self {
            kind,
            confidence,
            patterns: compile_all(patterns),
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

// Rule patterns are compile-time constants.
#[allow(clippy::expect_used)]
fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("invalid built-in intent pattern"))
        .collect()
}

/// Deterministic pattern-based intent classifier.
pub struct PatternClassifier {
    rules: Vec<IntentRule>,
    strong_continuation: Vec<Regex>,
    weak_continuation: Vec<Regex>,
    extractor: EntityExtractor,
}

impl PatternClassifier {
    /// Build the fixed rule table. Rule order is the priority order.
    pub fn new() -> Self {
        let rules = vec![
            // Transportation sub-types first: these must never fall through
            // to the generic matchers below.
            IntentRule::new(IntentKind::Taxi, 0.85, &[r"\btaxis?\b", r"\bcabs?\b"]),
            IntentRule::new(
                IntentKind::CarRental,
                0.8,
                &[
                    r"\bcar\s+(?:rental|hire)\b",
                    r"\brent(?:al)?\s+(?:a\s+)?car\b",
                    r"\bhire\s+(?:a\s+)?car\b",
                ],
            ),
            IntentRule::new(
                IntentKind::Parking,
                0.85,
                &[r"\bpark(?:ing)?\b", r"\bcar\s*park\b", r"\bforecourt\b"],
            ),
            IntentRule::new(
                IntentKind::Directions,
                0.8,
                &[
                    r"\bdirections?\b",
                    r"\bhow\s+(?:do|can)\s+i\s+(?:get|reach|go)\b",
                    r"\b(?:way|route)\s+to\b",
                ],
            ),
            IntentRule::new(
                IntentKind::Transportation,
                0.75,
                &[
                    r"\btransport(?:ation)?\b",
                    r"\bshuttle\b",
                    r"\bbus(?:es)?\b",
                    r"\bpick[\s-]?up\b",
                    r"\bdrop[\s-]?off\b",
                ],
            ),
            // Generic service matchers.
            IntentRule::new(
                IntentKind::FlightInquiry,
                0.85,
                &[
                    r"\bflights?\b",
                    r"\b(?:arrival|departure)s?\b",
                    r"\bdelayed?\b",
                    r"\bgates?\b",
                ],
            ),
            IntentRule::new(
                IntentKind::Services,
                0.7,
                &[
                    r"\bwi-?fi\b",
                    r"\blounges?\b",
                    r"\b(?:baggage|luggage)\b",
                    r"\blost\s+(?:and|&)\s+found\b",
                    r"\bcurrency\b",
                    r"\bexchange\b",
                    r"\bduty.?free\b",
                    r"\bshopping\b",
                ],
            ),
            IntentRule::new(
                IntentKind::Facilities,
                0.7,
                &[
                    r"\bprayer\b",
                    r"\b(?:toilet|restroom)s?\b",
                    r"\bsmoking\b",
                    r"\brestaurants?\b",
                    r"\bfood\b",
                    r"\bcaf[eé]s?\b",
                    r"\batms?\b",
                    r"\bmedical\b",
                    r"\bpharmacy\b",
                    r"\bfacilit(?:y|ies)\b",
                ],
            ),
            // Greeting / complaint last among the concrete rules.
            IntentRule::new(
                IntentKind::Greeting,
                0.9,
                &[
                    r"^\s*(?:hi|hello|hey|marhaba|salam)\b",
                    r"^\s*good\s+(?:morning|afternoon|evening)\b",
                ],
            ),
            IntentRule::new(
                IntentKind::Complaint,
                0.85,
                &[
                    r"\bcomplain(?:t)?s?\b",
                    r"\b(?:terrible|awful|unacceptable|rude|worst|disappointed|angry)\b",
                ],
            ),
        ];

        Self {
            rules,
            strong_continuation: compile_all(&[
                r"\b(?:cost|price|fee|charge|rate)s?\b",
                r"\bhow\s+much\b",
                r"\bafter\s+\d+\s*(?:minutes?|mins?|hours?|hrs?)\b",
            ]),
            weak_continuation: compile_all(&[
                r"\b(?:what|how)\s+about\b",
                r"\band\s+(?:for|the)\b",
                r"\btell\s+me\s+more\b",
                r"\bmore\s+(?:info|details)\b",
            ]),
            extractor: EntityExtractor::new(),
        }
    }

    /// Classify one query against the rule table and the session context.
    ///
    /// Deterministic: the same (query, context snapshot) pair always yields
    /// the same result.
    pub fn classify(&self, text: &str, context: &ConversationContext) -> Classification {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Classification {
                intent: Intent::new(IntentKind::GeneralInfo, defaults::DEFAULT_CONFIDENCE),
                entities: Default::default(),
            };
        }

        let intent = self
            .match_rules(trimmed)
            .or_else(|| self.continue_topic(trimmed, context))
            .unwrap_or_else(|| {
                Intent::new(IntentKind::GeneralInfo, defaults::DEFAULT_CONFIDENCE)
            });

        // Always run the entity pass, independent of the intent outcome.
        let entities = self.extractor.extract(trimmed);

        debug!(
            intent = %intent.kind,
            confidence = intent.confidence,
            entity_count = entities.len(),
            "Query classified"
        );

        Classification { intent, entities }
    }

    fn match_rules(&self, text: &str) -> Option<Intent> {
        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map(|rule| Intent::new(rule.kind, rule.confidence))
    }

    /// Context-continuation fallback: reuse the prior topic at reduced
    /// confidence when the query looks like a follow-up.
    fn continue_topic(&self, text: &str, context: &ConversationContext) -> Option<Intent> {
        let topic = context.current_topic?;
        let strong = self.strong_continuation.iter().any(|p| p.is_match(text));
        let weak = self.weak_continuation.iter().any(|p| p.is_match(text));

        if strong && topic.is_transportation() {
            Some(Intent::new(
                topic,
                defaults::CONTINUATION_STRONG_CONFIDENCE,
            ))
        } else if strong || weak {
            Some(Intent::new(topic, defaults::CONTINUATION_WEAK_CONFIDENCE))
        } else {
            None
        }
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect a language preference from the query text.
///
/// Arabic script flips the session preference to "ar"; anything else leaves
/// the stored preference untouched.
pub fn detect_language(text: &str) -> Option<&'static str> {
    if text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
        Some("ar")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityKind;

    fn ctx() -> ConversationContext {
        ConversationContext::new("test")
    }

    fn classify(text: &str) -> Classification {
        PatternClassifier::new().classify(text, &ctx())
    }

    #[test]
    fn test_empty_query_defaults() {
        let c = classify("   ");
        assert_eq!(c.intent.kind, IntentKind::GeneralInfo);
        assert!((c.intent.confidence - 0.5).abs() < f64::EPSILON);
        assert!(c.entities.is_empty());
    }

    #[test]
    fn test_transportation_subtypes_win_over_generic() {
        // None of these may fall through to general_info or even the
        // generic transportation matcher.
        assert_eq!(classify("How much is a taxi to the city?").intent.kind, IntentKind::Taxi);
        assert_eq!(
            classify("Is car rental available at Muscat Airport?").intent.kind,
            IntentKind::CarRental
        );
        assert_eq!(
            classify("What are the parking rates?").intent.kind,
            IntentKind::Parking
        );
        assert_eq!(
            classify("Directions to the terminal please").intent.kind,
            IntentKind::Directions
        );
    }

    #[test]
    fn test_car_rental_confidence() {
        let c = classify("Is car rental available at Muscat Airport?");
        assert!((c.intent.confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_greeting_and_complaint() {
        assert_eq!(classify("Hello there").intent.kind, IntentKind::Greeting);
        assert_eq!(
            classify("I want to complain about the service").intent.kind,
            IntentKind::Complaint
        );
    }

    #[test]
    fn test_topic_continuation_strong_cue() {
        let mut context = ctx();
        context.current_topic = Some(IntentKind::Parking);
        let classifier = PatternClassifier::new();
        let c = classifier.classify("and after 30 minutes?", &context);
        assert_eq!(c.intent.kind, IntentKind::Parking);
        assert!((c.intent.confidence - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_topic_continuation_weak_cue() {
        let mut context = ctx();
        context.current_topic = Some(IntentKind::Services);
        let classifier = PatternClassifier::new();
        let c = classifier.classify("tell me more", &context);
        assert_eq!(c.intent.kind, IntentKind::Services);
        assert!((c.intent.confidence - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_topic_no_continuation() {
        let c = classify("tell me more");
        assert_eq!(c.intent.kind, IntentKind::GeneralInfo);
    }

    #[test]
    fn test_entities_extracted_regardless_of_intent() {
        let c = classify("Is flight WY123 from Salalah delayed today?");
        assert_eq!(c.intent.kind, IntentKind::FlightInquiry);
        assert_eq!(c.entities[&EntityKind::FlightNumber], "WY123");
        assert_eq!(c.entities[&EntityKind::AirportCode], "SLL");
        assert_eq!(c.entities[&EntityKind::TimeReference], "today");
    }

    #[test]
    fn test_classify_idempotent() {
        let classifier = PatternClassifier::new();
        let context = ctx();
        let text = "What is the parking rate for 30 minutes?";
        let a = classifier.classify(text, &context);
        let b = classifier.classify(text, &context);
        assert_eq!(a, b);
    }

    #[test]
    fn test_language_detection() {
        assert_eq!(detect_language("أين مواقف السيارات"), Some("ar"));
        assert_eq!(detect_language("where is parking"), None);
    }
}
