//! Parameterized answer skeletons and static fallbacks per sub-type.
//!
//! One `TemplateDef` per sub-type: a lead-in line, the cue words used to pull
//! fact sentences out of candidate blocks, and an optional hand-authored
//! fallback used when no block contributes a fact. Sub-types that only make
//! sense with live data (flight status) have no fallback.

use super::subtypes::QuerySubtype;
use crate::types::ContentBlock;

pub struct TemplateDef {
    pub subtype: QuerySubtype,
    /// First line of a fact-filled answer.
    pub lead: &'static str,
    /// Sentences containing any of these are treated as facts.
    pub cues: &'static [&'static str],
    /// Hand-authored answer when no block contributes a fact.
    pub fallback: Option<&'static str>,
}

const TEMPLATES: &[TemplateDef] = &[
    TemplateDef {
        subtype: QuerySubtype::ParkingRates,
        lead: "Parking at Muscat International Airport is charged as follows:",
        cues: &["omr", "rate", "charge", "tariff", "minutes", "hour"],
        fallback: Some(
            "Short-term parking starts at OMR 0.600 for 30 minutes in zones P1 and P2, \
             with long-term parking in P3 at OMR 3.000 per day.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::ParkingPayment,
        lead: "Paying for parking:",
        cues: &["pay", "payment", "card", "cash", "station"],
        fallback: Some(
            "Pay at the automated stations by each car park exit before returning to \
             your vehicle; cash (OMR) and major credit cards are accepted.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::ParkingComparison,
        lead: "Comparing the parking options:",
        cues: &["short-term", "long-term", "p1", "p2", "p3", "omr"],
        fallback: Some(
            "P1 and P2 are short-term zones next to the terminal; P3 is the cheaper \
             long-term option a short walk away. For stays over a day, P3 costs less.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::ParkingLongTerm,
        lead: "Long-term parking:",
        cues: &["long-term", "long term", "day", "daily", "p3", "omr"],
        fallback: Some(
            "Long-term parking is available in zone P3 at OMR 3.000 per day, with a \
             shuttle connection to the terminal.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::ParkingShortTerm,
        lead: "Short-term parking:",
        cues: &["short-term", "short term", "minutes", "hour", "omr"],
        fallback: Some(
            "Short-term parking in P1 and P2, directly opposite the terminal, starts \
             at OMR 0.600 for 30 minutes.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::ParkingAreas,
        lead: "Parking areas at the airport:",
        cues: &["p1", "p2", "p3", "zone", "area", "located"],
        fallback: Some(
            "Zones P1 and P2 face the terminal for short stays; zone P3 handles \
             long-term parking. All are signposted from the approach road.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::ForecourtCharges,
        lead: "Forecourt use:",
        cues: &["forecourt", "free", "minutes", "charge"],
        fallback: Some(
            "The forecourt allows a free stop of 10 minutes for drop-off; beyond that \
             charges apply. For longer waits use the short-term car park.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::BusinessDropOff,
        lead: "Business-class drop-off:",
        cues: &["business", "drop", "forecourt", "premium"],
        fallback: Some(
            "A dedicated business and first-class drop-off lane is signposted on the \
             departures forecourt, nearest the premium check-in entrance.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::DropOff,
        lead: "Dropping off passengers:",
        cues: &["drop", "forecourt", "minutes"],
        fallback: Some(
            "Use the departures forecourt for a quick drop-off (free for the first 10 \
             minutes), then follow the exit signs back to the highway.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::PickupTiming,
        lead: "Picking up arriving passengers:",
        cues: &["pick", "arrivals", "wait", "minutes", "park"],
        fallback: Some(
            "For pick-ups, wait in the short-term car park until your passenger has \
             cleared arrivals; the forecourt is limited to active loading.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::TaxiFare,
        lead: "Taxi fares from the airport:",
        cues: &["taxi", "omr", "fare", "meter"],
        fallback: Some(
            "Airport taxis are metered; a trip to central Muscat typically costs \
             OMR 10-12 depending on the destination.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::TaxiAvailability,
        lead: "Taxis at the airport:",
        cues: &["taxi", "arrivals", "rank", "24"],
        fallback: Some(
            "Official airport taxis wait at the rank outside the arrivals hall around \
             the clock; no booking is needed.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::CarRental,
        lead: "Car rental at the airport:",
        cues: &["rental", "rent", "hire", "desk", "arrivals"],
        fallback: Some(
            "Car rental desks operate 24/7 in the arrivals hall, with international \
             and local agencies represented. Booking ahead is recommended in peak \
             season.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::ShuttleBus,
        lead: "Shuttle services:",
        cues: &["shuttle", "hotel", "terminal"],
        fallback: Some(
            "Hotel shuttles pick up from the designated bay outside arrivals; check \
             with your hotel for its schedule.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::PublicBus,
        lead: "Public buses from the airport:",
        cues: &["bus", "mwasalat", "route", "ticket"],
        fallback: Some(
            "Mwasalat public buses connect the airport with Ruwi and other Muscat \
             districts; the stop is outside arrivals and tickets are sold on board.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::HotelTransfer,
        lead: "Getting to your hotel:",
        cues: &["hotel", "shuttle", "taxi", "transfer"],
        fallback: Some(
            "Most Muscat hotels offer pre-booked transfers; otherwise metered taxis \
             at the arrivals rank reach any city hotel in 20-40 minutes.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::Directions,
        lead: "Getting to the airport:",
        cues: &["highway", "road", "exit", "direction", "route"],
        fallback: Some(
            "Muscat International Airport lies on Sultan Qaboos Highway, about 30 \
             minutes from the city centre; follow the airport signs from either \
             direction.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::TerminalTransfer,
        lead: "Transferring within the airport:",
        cues: &["terminal", "transfer", "connect", "gate"],
        fallback: Some(
            "All passenger operations run from the single main terminal; transfer \
             passengers follow the signposted transfer channel without changing \
             buildings.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::FlightStatus,
        lead: "Flight status:",
        cues: &["flight", "status", "delayed", "on time", "gate"],
        fallback: None,
    },
    TemplateDef {
        subtype: QuerySubtype::FlightArrival,
        lead: "Arrivals information:",
        cues: &["arrival", "arriving", "landed", "belt"],
        fallback: None,
    },
    TemplateDef {
        subtype: QuerySubtype::FlightDeparture,
        lead: "Departures information:",
        cues: &["departure", "departing", "gate", "boarding"],
        fallback: None,
    },
    TemplateDef {
        subtype: QuerySubtype::CheckIn,
        lead: "Check-in:",
        cues: &["check-in", "check in", "counter", "hours", "online"],
        fallback: Some(
            "Check-in counters open 3 hours before departure and close 60 minutes \
             before for international flights; online check-in depends on your \
             airline.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::BaggageServices,
        lead: "Baggage services:",
        cues: &["baggage", "luggage", "wrap", "porter", "storage"],
        fallback: Some(
            "Baggage wrapping, porters, and left-luggage counters are in the check-in \
             hall on the departures level.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::LostBaggage,
        lead: "Lost baggage:",
        cues: &["lost", "baggage", "claim", "report"],
        fallback: Some(
            "Report lost or delayed baggage at the baggage services desk in the \
             arrivals hall before leaving the baggage reclaim area; keep your bag \
             tag receipts.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::Wifi,
        lead: "WiFi at the airport:",
        cues: &["wifi", "wi-fi", "internet", "network"],
        fallback: Some(
            "Free WiFi covers the whole terminal: connect to the airport network and \
             verify with an SMS code.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::Lounge,
        lead: "Lounges:",
        cues: &["lounge", "primeclass", "access"],
        fallback: Some(
            "The Primeclass Lounge in departures admits business-class passengers and \
             walk-in guests for a fee, with food, showers, and workspaces.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::PrayerRoom,
        lead: "Prayer rooms:",
        cues: &["prayer", "mosque", "musalla"],
        fallback: Some(
            "Prayer rooms for men and women are available landside near check-in and \
             airside near the gates, signposted throughout the terminal.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::Food,
        lead: "Food and drink:",
        cues: &["restaurant", "cafe", "food", "dining", "coffee"],
        fallback: Some(
            "Cafes and restaurants operate landside on the mezzanine and airside near \
             the gates; several are open 24 hours.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::Shopping,
        lead: "Shopping:",
        cues: &["shop", "duty", "store", "retail"],
        fallback: Some(
            "Duty-free and retail outlets are concentrated airside after security, \
             with a smaller landside selection in the public hall.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::CurrencyExchange,
        lead: "Currency exchange:",
        cues: &["currency", "exchange", "atm", "bank"],
        fallback: Some(
            "Currency exchange counters and ATMs are in both the check-in hall and \
             the arrivals hall, open for all flights.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::SmokingArea,
        lead: "Smoking:",
        cues: &["smoking", "smoke"],
        fallback: Some(
            "The terminal is non-smoking; designated smoking rooms are located \
             airside near the gates.",
        ),
    },
    TemplateDef {
        subtype: QuerySubtype::SpecialAssistance,
        lead: "Special assistance:",
        cues: &["wheelchair", "assistance", "mobility"],
        fallback: Some(
            "Special assistance is arranged through your airline, ideally 48 hours \
             before travel; dedicated counters and wheelchair services are available \
             at the terminal.",
        ),
    },
];

pub fn template_for(subtype: QuerySubtype) -> Option<&'static TemplateDef> {
    TEMPLATES.iter().find(|t| t.subtype == subtype)
}

/// A sentence pulled from a block, with the index of its block.
#[derive(Debug)]
pub struct Fact {
    pub sentence: String,
    pub block_idx: usize,
}

/// Maximum fact sentences included in one rendered answer.
const MAX_FACTS: usize = 3;

/// Pull cue-matching sentences out of the candidate blocks, in block order.
pub fn extract_facts(def: &TemplateDef, blocks: &[ContentBlock]) -> Vec<Fact> {
    let mut facts = Vec::new();
    for (idx, block) in blocks.iter().enumerate() {
        for sentence in split_sentences(&block.body) {
            let lower = sentence.to_lowercase();
            if def.cues.iter().any(|c| lower.contains(c)) {
                facts.push(Fact {
                    sentence: sentence.to_string(),
                    block_idx: idx,
                });
                if facts.len() == MAX_FACTS {
                    return facts;
                }
            }
        }
    }
    facts
}

/// Render the lead line plus fact sentences as a short answer.
pub fn render(def: &TemplateDef, facts: &[Fact]) -> String {
    let mut out = String::from(def.lead);
    for fact in facts {
        out.push(' ');
        out.push_str(fact.sentence.trim());
        if !fact.sentence.trim_end().ends_with(['.', '!', '?']) {
            out.push('.');
        }
    }
    out
}

/// Split on sentence terminators and newlines. A dot between digits is a
/// decimal point (OMR 0.600), not a terminator.
fn split_sentences(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    for (i, c) in body.char_indices() {
        let boundary = match c {
            '!' | '?' | '\n' => true,
            '.' => {
                let prev_digit = i > 0 && bytes[i - 1].is_ascii_digit();
                let next_digit = bytes.get(i + 1).is_some_and(|b| b.is_ascii_digit());
                !(prev_digit && next_digit)
            }
            _ => false,
        };
        if boundary {
            let end = i + c.len_utf8();
            let sentence = body[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }
    let tail = body[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}
