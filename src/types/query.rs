//! Query, intent, and entity types produced by the pattern classifier.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single incoming question, scoped to a session. Ephemeral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Raw user text, untrimmed.
    pub text: String,
    /// Session identifier used to load/merge conversational context.
    pub session_id: String,
}

impl Query {
    pub fn new(text: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            session_id: session_id.into(),
        }
    }
}

/// Coarse category of what the user wants.
///
/// Transportation sub-types (`Taxi`, `CarRental`, `Parking`, `Directions`)
/// are first-class intents: the classifier checks them before the generic
/// `Transportation` matcher so they never collapse into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Taxi,
    CarRental,
    Parking,
    Directions,
    Transportation,
    FlightInquiry,
    Services,
    Facilities,
    Greeting,
    Complaint,
    GeneralInfo,
}

impl IntentKind {
    /// Stable wire label (matches the serde representation).
    pub fn label(self) -> &'static str {
        match self {
            Self::Taxi => "taxi",
            Self::CarRental => "car_rental",
            Self::Parking => "parking",
            Self::Directions => "directions",
            Self::Transportation => "transportation",
            Self::FlightInquiry => "flight_inquiry",
            Self::Services => "services",
            Self::Facilities => "facilities",
            Self::Greeting => "greeting",
            Self::Complaint => "complaint",
            Self::GeneralInfo => "general_info",
        }
    }

    /// Whether this intent names a subject that follow-up queries can
    /// continue. Greetings, complaints, and the general fallback carry no
    /// topic.
    pub fn carries_topic(self) -> bool {
        !matches!(self, Self::Greeting | Self::Complaint | Self::GeneralInfo)
    }

    /// Whether this intent belongs to the transportation family
    /// (used for topic-continuation confidence and follow-up actions).
    pub fn is_transportation(self) -> bool {
        matches!(
            self,
            Self::Taxi | Self::CarRental | Self::Parking | Self::Directions | Self::Transportation
        )
    }
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Detected intent with its fixed rule confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    /// Confidence in [0,1]; fixed per matching rule, not scored across rules.
    pub confidence: f64,
}

impl Intent {
    pub fn new(kind: IntentKind, confidence: f64) -> Self {
        Self { kind, confidence }
    }
}

/// Kinds of entities the extraction pass recognizes.
///
/// Ordered (`BTreeMap` key) so entity maps serialize deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    FlightNumber,
    AirportCode,
    TimeReference,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FlightNumber => f.write_str("flight_number"),
            Self::AirportCode => f.write_str("airport_code"),
            Self::TimeReference => f.write_str("time_reference"),
        }
    }
}

/// Extracted entities for one turn. First match per kind wins.
pub type EntityMap = BTreeMap<EntityKind, String>;

/// Full classifier output for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub entities: EntityMap,
}
