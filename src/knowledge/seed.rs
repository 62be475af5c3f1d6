//! Built-in curated entry set for Muscat International Airport.
//!
//! Used until an external provider snapshot replaces it, so the engine
//! answers common questions out of the box.

use crate::types::KnowledgeEntry;

fn entry(
    category: &str,
    subcategory: &str,
    question: &str,
    answer: &str,
    keywords: &[&str],
    priority: u8,
) -> KnowledgeEntry {
    KnowledgeEntry {
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        question: question.to_string(),
        answer: answer.to_string(),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        priority,
    }
}

/// The seed knowledge set. Keywords use the matcher's concept vocabulary.
pub fn seed_entries() -> Vec<KnowledgeEntry> {
    vec![
        entry(
            "parking",
            "rates",
            "What are the parking rates?",
            "Short-term parking at Muscat International Airport starts at OMR 0.600 \
             for 30 minutes and OMR 1.200 for one hour in zones P1 and P2. Long-term \
             parking in P3 is OMR 3.000 per day.",
            &["parking", "rate", "cost"],
            8,
        ),
        entry(
            "parking",
            "payment",
            "How do I pay for parking?",
            "Parking is paid at the automated pay stations located at each exit of \
             the car park before returning to your vehicle. Stations accept cash \
             (OMR) and major credit cards.",
            &["parking", "payment", "pay"],
            6,
        ),
        entry(
            "transportation",
            "taxi",
            "Where can I find a taxi?",
            "Airport taxis are available 24/7 from the designated rank outside the \
             arrivals hall. Fares are metered; a trip to central Muscat is typically \
             OMR 10-12.",
            &["taxi", "fare"],
            7,
        ),
        entry(
            "transportation",
            "car_rental",
            "Is car rental available at the airport?",
            "Yes - several car rental companies operate desks in the arrivals hall, \
             open around the clock, including international and local agencies. \
             Pre-booking online is recommended during peak season.",
            &["rental", "car"],
            7,
        ),
        entry(
            "transportation",
            "bus",
            "Is there a public bus from the airport?",
            "Mwasalat operates scheduled public buses from the airport to Ruwi and \
             other Muscat districts. The stop is outside arrivals, and tickets can \
             be bought from the driver.",
            &["bus", "shuttle"],
            5,
        ),
        entry(
            "services",
            "wifi",
            "Is there free WiFi at the airport?",
            "Complimentary WiFi is available throughout the terminal. Connect to \
             the airport network and verify with an SMS code to start a free \
             session.",
            &["wifi", "internet"],
            6,
        ),
        entry(
            "services",
            "lounge",
            "Which lounges are available?",
            "The Primeclass Lounge in the departures area is open to business-class \
             passengers and walk-in guests for a fee, offering food, showers, and \
             workspaces.",
            &["lounge"],
            5,
        ),
        entry(
            "services",
            "luggage",
            "Where are the baggage services?",
            "Baggage wrapping, porter services, and left-luggage counters are in \
             the check-in hall. Lost baggage claims are handled at the arrivals \
             baggage services desk.",
            &["luggage", "baggage"],
            5,
        ),
        entry(
            "facilities",
            "prayer",
            "Where are the prayer rooms?",
            "Prayer rooms for men and women are located both landside near check-in \
             and airside near the departure gates, signposted throughout the \
             terminal.",
            &["prayer"],
            5,
        ),
        entry(
            "facilities",
            "food",
            "Where can I eat at the airport?",
            "Cafes and restaurants are located landside on the mezzanine and \
             airside near the gates, ranging from coffee shops to full-service \
             dining, with several open 24 hours.",
            &["food", "restaurant"],
            4,
        ),
    ]
}
