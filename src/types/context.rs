//! Per-session conversational context.
//!
//! One `ConversationContext` exists per session id. It is created lazily on
//! the first message (seeded from persistent history if available), cached in
//! memory for the session's lifetime, and updated after every turn. The
//! in-memory cache is a performance layer over durable storage, never the
//! source of truth.

use crate::types::{EntityMap, IntentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Hard bound on retained turns (5 user/assistant exchanges).
/// Unbounded growth must never happen.
pub const MAX_CONTEXT_TURNS: usize = 10;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One utterance in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Intent detected for this turn (user turns only).
    pub intent: Option<IntentKind>,
}

impl Turn {
    pub fn user(text: impl Into<String>, intent: IntentKind) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            timestamp: Utc::now(),
            intent: Some(intent),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
            intent: None,
        }
    }
}

/// Bounded conversational state for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub session_id: String,
    /// Prior turns, newest first.
    pub turns: VecDeque<Turn>,
    /// Topic carried forward for continuation queries.
    pub current_topic: Option<IntentKind>,
    /// Language preference ("en", "ar").
    pub language: String,
    /// Entities merged (not overwritten) across turns.
    pub entities: EntityMap,
}

impl ConversationContext {
    /// Fresh, empty context for a session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            turns: VecDeque::with_capacity(MAX_CONTEXT_TURNS),
            current_topic: None,
            language: "en".to_string(),
            entities: EntityMap::new(),
        }
    }

    /// Rebuild a context from persisted history (newest-first input).
    ///
    /// The current topic is recovered from the most recent user turn that
    /// carried an intent.
    pub fn from_history(session_id: impl Into<String>, history: Vec<Turn>) -> Self {
        let mut ctx = Self::new(session_id);
        for turn in history.into_iter().take(MAX_CONTEXT_TURNS) {
            ctx.turns.push_back(turn);
        }
        ctx.current_topic = ctx
            .turns
            .iter()
            .find(|t| t.role == TurnRole::User)
            .and_then(|t| t.intent)
            .filter(|i| i.carries_topic());
        ctx
    }

    /// Prepend a user/assistant exchange and enforce the turn bound.
    ///
    /// Truncation keeps the newest `MAX_CONTEXT_TURNS` turns: on the 11th
    /// turn the oldest is evicted.
    pub fn push_exchange(&mut self, user: Turn, assistant: Turn) {
        if let Some(intent) = user.intent.filter(|i| i.carries_topic()) {
            self.current_topic = Some(intent);
        }
        self.turns.push_front(assistant);
        self.turns.push_front(user);
        while self.turns.len() > MAX_CONTEXT_TURNS {
            self.turns.pop_back();
        }
    }

    /// Merge this turn's entities into the session map without overwriting
    /// values captured in earlier turns.
    pub fn merge_entities(&mut self, entities: &EntityMap) {
        for (kind, value) in entities {
            self.entities.entry(*kind).or_insert_with(|| value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_bound() {
        let mut ctx = ConversationContext::new("s1");
        for i in 0..11 {
            ctx.push_exchange(
                Turn::user(format!("q{i}"), IntentKind::Parking),
                Turn::assistant(format!("a{i}")),
            );
        }
        assert_eq!(ctx.turns.len(), MAX_CONTEXT_TURNS);
        // Newest exchange at the front.
        assert_eq!(ctx.turns[0].text, "q10");
        assert_eq!(ctx.turns[1].text, "a10");
    }

    #[test]
    fn test_entity_merge_does_not_overwrite() {
        use crate::types::EntityKind;

        let mut ctx = ConversationContext::new("s1");
        let mut first = EntityMap::new();
        first.insert(EntityKind::FlightNumber, "WY123".to_string());
        ctx.merge_entities(&first);

        let mut second = EntityMap::new();
        second.insert(EntityKind::FlightNumber, "EK202".to_string());
        second.insert(EntityKind::AirportCode, "MCT".to_string());
        ctx.merge_entities(&second);

        assert_eq!(ctx.entities[&EntityKind::FlightNumber], "WY123");
        assert_eq!(ctx.entities[&EntityKind::AirportCode], "MCT");
    }

    #[test]
    fn test_non_subject_intents_never_become_topic() {
        let mut ctx = ConversationContext::new("s1");
        ctx.push_exchange(Turn::user("hello", IntentKind::Greeting), Turn::assistant("hi"));
        assert!(ctx.current_topic.is_none());

        ctx.push_exchange(
            Turn::user("parking rates?", IntentKind::Parking),
            Turn::assistant("rates are..."),
        );
        assert_eq!(ctx.current_topic, Some(IntentKind::Parking));

        // A generic follow-up keeps the established subject.
        ctx.push_exchange(
            Turn::user("thanks", IntentKind::GeneralInfo),
            Turn::assistant("welcome"),
        );
        assert_eq!(ctx.current_topic, Some(IntentKind::Parking));
    }

    #[test]
    fn test_topic_recovered_from_history() {
        let history = vec![
            Turn::assistant("here are the rates"),
            Turn::user("parking rates?", IntentKind::Parking),
        ];
        let ctx = ConversationContext::from_history("s1", history);
        assert_eq!(ctx.current_topic, Some(IntentKind::Parking));
    }
}
