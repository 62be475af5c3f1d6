//! Entity extraction pass.
//!
//! Independent of intent matching: flight numbers, known airport names or
//! codes, and date/time references. Scan order is fixed and the first match
//! per entity kind wins.

use crate::types::{EntityKind, EntityMap};
use regex::Regex;

/// Known airports, scanned in this order. Name match wins over a bare code.
const AIRPORTS: &[(&str, &str)] = &[
    ("muscat", "MCT"),
    ("salalah", "SLL"),
    ("duqm", "DQM"),
    ("sohar", "OHS"),
    ("dubai", "DXB"),
    ("abu dhabi", "AUH"),
    ("doha", "DOH"),
    ("jeddah", "JED"),
    ("london", "LHR"),
];

pub struct EntityExtractor {
    flight: Regex,
    airport_code: Regex,
    /// Time patterns in fixed scan order: clock, "at N am/pm", duration,
    /// day words.
    time: Vec<Regex>,
}

impl EntityExtractor {
    pub fn new() -> Self {
        #[allow(clippy::expect_used)] // patterns are compile-time constants
        let compile = |p: &str| Regex::new(p).expect("invalid built-in entity pattern");
        Self {
            // Case-sensitive: airline designators are written in caps (WY123).
            flight: compile(r"\b([A-Z]{2}\s?\d{2,4})\b"),
            airport_code: compile(r"\b(MCT|SLL|DQM|OHS|DXB|AUH|DOH|JED|LHR)\b"),
            time: vec![
                compile(r"(?i)\b\d{1,2}:\d{2}\s*(?:am|pm)?\b"),
                compile(r"(?i)\bat\s+(\d{1,2}\s*(?:am|pm))\b"),
                compile(r"(?i)\b\d+\s*(?:minutes?|mins?|hours?|hrs?)\b"),
                compile(r"(?i)\b(?:today|tomorrow|tonight|yesterday|this\s+(?:morning|afternoon|evening))\b"),
            ],
        }
    }

    /// Extract all recognized entities from one query.
    pub fn extract(&self, text: &str) -> EntityMap {
        let mut entities = EntityMap::new();

        if let Some(m) = self.flight.captures(text).and_then(|c| c.get(1)) {
            entities.insert(
                EntityKind::FlightNumber,
                m.as_str().replace(' ', "").to_string(),
            );
        }

        if let Some(code) = self.find_airport(text) {
            entities.insert(EntityKind::AirportCode, code.to_string());
        }

        for pattern in &self.time {
            if let Some(m) = pattern.find(text) {
                entities.insert(
                    EntityKind::TimeReference,
                    m.as_str().trim().to_lowercase(),
                );
                break;
            }
        }

        entities
    }

    fn find_airport(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        for (name, code) in AIRPORTS {
            if lower.contains(name) {
                return Some(code);
            }
        }
        self.airport_code
            .find(text)
            .and_then(|m| AIRPORTS.iter().find(|(_, c)| *c == m.as_str()))
            .map(|(_, code)| *code)
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}
