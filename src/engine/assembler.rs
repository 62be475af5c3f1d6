//! Response Assembler
//!
//! Pure combination step: answer text + intent + sources + timing into the
//! final `EngineResponse`. No network or store access happens here.

use crate::types::{EngineResponse, Intent, IntentKind, SourceRef};
use tokio::time::Instant;

/// Fixed intent → suggested follow-up actions table (up to 3 each).
const SUGGESTED_ACTIONS: &[(IntentKind, &[&str])] = &[
    (
        IntentKind::Taxi,
        &["Ask for the fare to your destination", "Ask where the taxi rank is"],
    ),
    (
        IntentKind::CarRental,
        &["Ask which rental agencies have desks", "Ask about rental requirements"],
    ),
    (
        IntentKind::Parking,
        &[
            "Ask for the rate for a specific duration",
            "Ask how to pay for parking",
            "Ask about long-term parking",
        ],
    ),
    (
        IntentKind::Directions,
        &["Ask about parking on arrival", "Ask about taxi or bus options"],
    ),
    (
        IntentKind::Transportation,
        &["Ask about taxis", "Ask about the public bus", "Ask about car rental"],
    ),
    (
        IntentKind::FlightInquiry,
        &["Provide your flight number for details", "Ask about check-in times"],
    ),
    (
        IntentKind::Services,
        &["Ask about the lounge", "Ask about WiFi access", "Ask about baggage services"],
    ),
    (
        IntentKind::Facilities,
        &["Ask where the prayer rooms are", "Ask about food and drink options"],
    ),
    (
        IntentKind::Greeting,
        &["Ask about parking rates", "Ask about transportation", "Ask about flights"],
    ),
    (
        IntentKind::Complaint,
        &["Ask to be connected with customer relations"],
    ),
    (
        IntentKind::GeneralInfo,
        &["Ask about parking", "Ask about getting to the city", "Ask about services"],
    ),
];

fn actions_for(kind: IntentKind) -> Vec<String> {
    SUGGESTED_ACTIONS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, actions)| actions.iter().map(|a| (*a).to_string()).collect())
        .unwrap_or_default()
}

/// Stateless assembler; one instance serves all queries.
pub struct ResponseAssembler;

impl ResponseAssembler {
    /// Combine the synthesized pieces into the final response.
    ///
    /// `requires_human` is set only for complaint intent or an explicit
    /// escalation signal from the synthesizer.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        &self,
        intent: Intent,
        text: String,
        confidence: f64,
        sources: Vec<SourceRef>,
        escalate: bool,
        language: &str,
        started: Instant,
    ) -> EngineResponse {
        EngineResponse {
            text,
            confidence: confidence.clamp(0.0, 1.0),
            sources,
            intent: intent.kind,
            requires_human: intent.kind == IntentKind::Complaint || escalate,
            suggested_actions: actions_for(intent.kind),
            elapsed_ms: started.elapsed().as_millis() as u64,
            language: language.to_string(),
        }
    }
}
