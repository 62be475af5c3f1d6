//! Fine-grained query sub-types and the rule table that detects them.
//!
//! First-match-wins over an ordered rule list. Compound rules come before
//! the generic single-keyword rules so "parking payment methods" is never
//! shadowed by a bare "parking" rule. The ordering is load-bearing.

/// Fine-grained question type driving the synthesizer's second tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuerySubtype {
    // Parking and forecourt
    ParkingRates,
    ParkingPayment,
    ParkingComparison,
    ParkingLongTerm,
    ParkingShortTerm,
    ParkingAreas,
    ForecourtCharges,
    BusinessDropOff,
    DropOff,
    PickupTiming,
    // Ground transportation
    TaxiFare,
    TaxiAvailability,
    CarRental,
    ShuttleBus,
    PublicBus,
    HotelTransfer,
    Directions,
    TerminalTransfer,
    // Flights
    FlightStatus,
    FlightArrival,
    FlightDeparture,
    CheckIn,
    // Baggage
    BaggageServices,
    LostBaggage,
    // Facilities and services
    Wifi,
    Lounge,
    PrayerRoom,
    Food,
    Shopping,
    CurrencyExchange,
    SmokingArea,
    SpecialAssistance,
}

impl QuerySubtype {
    pub fn label(self) -> &'static str {
        match self {
            Self::ParkingRates => "parking_rates",
            Self::ParkingPayment => "parking_payment",
            Self::ParkingComparison => "parking_comparison",
            Self::ParkingLongTerm => "parking_long_term",
            Self::ParkingShortTerm => "parking_short_term",
            Self::ParkingAreas => "parking_areas",
            Self::ForecourtCharges => "forecourt_charges",
            Self::BusinessDropOff => "business_drop_off",
            Self::DropOff => "drop_off",
            Self::PickupTiming => "pickup_timing",
            Self::TaxiFare => "taxi_fare",
            Self::TaxiAvailability => "taxi_availability",
            Self::CarRental => "car_rental",
            Self::ShuttleBus => "shuttle_bus",
            Self::PublicBus => "public_bus",
            Self::HotelTransfer => "hotel_transfer",
            Self::Directions => "directions",
            Self::TerminalTransfer => "terminal_transfer",
            Self::FlightStatus => "flight_status",
            Self::FlightArrival => "flight_arrival",
            Self::FlightDeparture => "flight_departure",
            Self::CheckIn => "check_in",
            Self::BaggageServices => "baggage_services",
            Self::LostBaggage => "lost_baggage",
            Self::Wifi => "wifi",
            Self::Lounge => "lounge",
            Self::PrayerRoom => "prayer_room",
            Self::Food => "food",
            Self::Shopping => "shopping",
            Self::CurrencyExchange => "currency_exchange",
            Self::SmokingArea => "smoking_area",
            Self::SpecialAssistance => "special_assistance",
        }
    }
}

/// One detection rule: every `all` term must appear, plus at least one `any`
/// term when the list is non-empty.
struct SubtypeRule {
    subtype: QuerySubtype,
    all: &'static [&'static str],
    any: &'static [&'static str],
}

/// Phrase terms match as substrings; single words of 4+ chars match as word
/// prefixes (so "park" covers "parking"), shorter ones only as whole words
/// (so "bus" never fires on "business").
fn term_present(lower: &str, words: &[&str], term: &str) -> bool {
    if term.contains(' ') || term.contains('-') {
        lower.contains(term)
    } else if term.len() >= 4 {
        words.iter().any(|w| w.starts_with(term))
    } else {
        words.iter().any(|w| *w == term)
    }
}

impl SubtypeRule {
    fn matches(&self, lower: &str, words: &[&str]) -> bool {
        self.all.iter().all(|t| term_present(lower, words, t))
            && (self.any.is_empty() || self.any.iter().any(|t| term_present(lower, words, t)))
    }
}

/// Ordered rule table, most specific first.
const RULES: &[SubtypeRule] = &[
    // Compound parking rules before the generic ones.
    SubtypeRule {
        subtype: QuerySubtype::BusinessDropOff,
        all: &["business"],
        any: &["drop", "forecourt", "class"],
    },
    SubtypeRule {
        subtype: QuerySubtype::ForecourtCharges,
        all: &["forecourt"],
        any: &[],
    },
    SubtypeRule {
        subtype: QuerySubtype::ParkingPayment,
        all: &["park"],
        any: &["pay", "payment", "card", "cash"],
    },
    SubtypeRule {
        subtype: QuerySubtype::ParkingComparison,
        all: &["park"],
        any: &["compare", "difference", "cheaper", "versus", " vs "],
    },
    SubtypeRule {
        subtype: QuerySubtype::ParkingLongTerm,
        all: &["park"],
        any: &["long-term", "long term", "overnight", "per day", "daily", "week"],
    },
    SubtypeRule {
        subtype: QuerySubtype::ParkingShortTerm,
        all: &["park"],
        any: &["short-term", "short term", "minutes", "half hour"],
    },
    SubtypeRule {
        subtype: QuerySubtype::ParkingAreas,
        all: &["park"],
        any: &["where", "area", "zone", "p1", "p2", "p3", "closest", "nearest"],
    },
    SubtypeRule {
        subtype: QuerySubtype::ParkingRates,
        all: &["park"],
        any: &["rate", "cost", "price", "charge", "fee", "tariff", "how much"],
    },
    SubtypeRule {
        subtype: QuerySubtype::PickupTiming,
        all: &[],
        any: &["pick up", "pickup", "pick-up", "collect", "meeting someone"],
    },
    SubtypeRule {
        subtype: QuerySubtype::DropOff,
        all: &[],
        any: &["drop off", "drop-off", "dropping"],
    },
    // Ground transportation.
    SubtypeRule {
        subtype: QuerySubtype::TaxiFare,
        all: &["taxi"],
        any: &["fare", "cost", "price", "how much", "charge"],
    },
    SubtypeRule {
        subtype: QuerySubtype::TaxiAvailability,
        all: &["taxi"],
        any: &[],
    },
    SubtypeRule {
        subtype: QuerySubtype::CarRental,
        all: &[],
        any: &["car rental", "rent a car", "rental car", "car hire", "hire a car"],
    },
    SubtypeRule {
        subtype: QuerySubtype::HotelTransfer,
        all: &["hotel"],
        any: &["shuttle", "transfer", "get to"],
    },
    SubtypeRule {
        subtype: QuerySubtype::ShuttleBus,
        all: &["shuttle"],
        any: &[],
    },
    SubtypeRule {
        subtype: QuerySubtype::PublicBus,
        all: &["bus"],
        any: &[],
    },
    SubtypeRule {
        subtype: QuerySubtype::TerminalTransfer,
        all: &["terminal"],
        any: &["transfer", "between", "connect", "change"],
    },
    SubtypeRule {
        subtype: QuerySubtype::Directions,
        all: &[],
        any: &["how do i get", "how to get", "directions", "way to", "route to"],
    },
    // Flights.
    SubtypeRule {
        subtype: QuerySubtype::FlightArrival,
        all: &[],
        any: &["arrival", "arriving", "landed", "lands"],
    },
    SubtypeRule {
        subtype: QuerySubtype::FlightDeparture,
        all: &[],
        any: &["departure", "departing", "departs", "take off"],
    },
    SubtypeRule {
        subtype: QuerySubtype::CheckIn,
        all: &[],
        any: &["check in", "check-in", "checkin", "boarding pass"],
    },
    SubtypeRule {
        subtype: QuerySubtype::FlightStatus,
        all: &["flight"],
        any: &["status", "on time", "delayed", "cancelled"],
    },
    // Baggage.
    SubtypeRule {
        subtype: QuerySubtype::LostBaggage,
        all: &[],
        any: &["lost baggage", "lost luggage", "missing bag", "lost my bag"],
    },
    SubtypeRule {
        subtype: QuerySubtype::BaggageServices,
        all: &[],
        any: &["baggage", "luggage", "suitcase", "porter", "left luggage"],
    },
    // Facilities and services.
    SubtypeRule {
        subtype: QuerySubtype::Wifi,
        all: &[],
        any: &["wifi", "wi-fi", "internet"],
    },
    SubtypeRule {
        subtype: QuerySubtype::Lounge,
        all: &["lounge"],
        any: &[],
    },
    SubtypeRule {
        subtype: QuerySubtype::PrayerRoom,
        all: &[],
        any: &["prayer", "mosque", "musalla"],
    },
    SubtypeRule {
        subtype: QuerySubtype::CurrencyExchange,
        all: &[],
        any: &["currency", "exchange money", "atm", "money changer"],
    },
    SubtypeRule {
        subtype: QuerySubtype::SmokingArea,
        all: &[],
        any: &["smoking", "smoke"],
    },
    SubtypeRule {
        subtype: QuerySubtype::SpecialAssistance,
        all: &[],
        any: &["wheelchair", "special assistance", "reduced mobility", "disabled"],
    },
    SubtypeRule {
        subtype: QuerySubtype::Food,
        all: &[],
        any: &["food", "restaurant", "eat", "cafe", "coffee", "dining"],
    },
    SubtypeRule {
        subtype: QuerySubtype::Shopping,
        all: &[],
        any: &["shop", "duty free", "duty-free", "buy"],
    },
];

/// Detect the query's sub-type, first matching rule wins.
pub fn detect_subtype(query: &str) -> Option<QuerySubtype> {
    let lower = query.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    RULES
        .iter()
        .find(|r| r.matches(&lower, &words))
        .map(|r| r.subtype)
}
