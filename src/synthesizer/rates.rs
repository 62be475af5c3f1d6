//! Tier-1 specific-answer extraction: literal rates and fares.
//!
//! Scrapes structured rate fragments (`"<duration> | OMR <amount>"` and the
//! colon/dash variants) out of block bodies and answers duration questions
//! with the exact figure instead of a summary paragraph.

use crate::types::ContentBlock;
use regex::Regex;

/// A rate figure found in a block, with its provenance index.
#[derive(Debug, Clone)]
pub struct RateHit {
    pub minutes: u32,
    pub amount: String,
    /// Index of the contributing block in the candidate slice.
    pub block_idx: usize,
}

pub struct RateExtractor {
    duration: Regex,
    rate_line: Regex,
    taxi_fare: Regex,
}

fn to_minutes(value: u32, unit: &str) -> u32 {
    if unit.starts_with('h') {
        value * 60
    } else {
        value
    }
}

impl RateExtractor {
    pub fn new() -> Self {
        #[allow(clippy::expect_used)] // patterns are compile-time constants
        let compile = |p: &str| Regex::new(p).expect("invalid built-in rate pattern");
        Self {
            duration: compile(r"(?i)\b(\d+)\s*(min(?:ute)?s?|h(?:ou)?rs?)\b"),
            rate_line: compile(
                r"(?i)(\d+)\s*(min(?:ute)?s?|h(?:ou)?rs?)\s*[|:\-–]\s*(?:OMR|RO)\s*(\d+(?:\.\d+)?)",
            ),
            taxi_fare: compile(
                r"(?i)(?:OMR|RO)\s*(\d+(?:\.\d+)?(?:\s*[-–]\s*\d+(?:\.\d+)?)?)",
            ),
        }
    }

    /// Target duration the query asks about, normalized to minutes.
    /// "half an hour" is the only worded duration the sources use.
    pub fn target_minutes(&self, query: &str) -> Option<u32> {
        if query.to_lowercase().contains("half an hour") || query.to_lowercase().contains("half hour")
        {
            return Some(30);
        }
        let caps = self.duration.captures(query)?;
        let value: u32 = caps.get(1)?.as_str().parse().ok()?;
        let unit = caps.get(2)?.as_str().to_lowercase();
        Some(to_minutes(value, &unit))
    }

    /// Scan candidate blocks for a rate line matching the target duration.
    pub fn find_rate(&self, blocks: &[ContentBlock], minutes: u32) -> Option<RateHit> {
        for (idx, block) in blocks.iter().enumerate() {
            for caps in self.rate_line.captures_iter(&block.body) {
                let value: u32 = caps.get(1)?.as_str().parse().ok()?;
                let unit = caps.get(2)?.as_str().to_lowercase();
                if to_minutes(value, &unit) == minutes {
                    return Some(RateHit {
                        minutes,
                        amount: caps.get(3)?.as_str().to_string(),
                        block_idx: idx,
                    });
                }
            }
        }
        None
    }

    /// First OMR figure in a taxi-related block, for fare questions.
    pub fn find_taxi_fare(&self, blocks: &[ContentBlock]) -> Option<(String, usize)> {
        for (idx, block) in blocks.iter().enumerate() {
            let text = format!("{} {}", block.title, block.body).to_lowercase();
            if !text.contains("taxi") {
                continue;
            }
            if let Some(caps) = self.taxi_fare.captures(&block.body) {
                if let Some(amount) = caps.get(1) {
                    return Some((amount.as_str().to_string(), idx));
                }
            }
        }
        None
    }
}

impl Default for RateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Human label for a normalized duration.
pub fn duration_label(minutes: u32) -> String {
    if minutes >= 60 && minutes % 60 == 0 {
        let hours = minutes / 60;
        if hours == 1 {
            "1 hour".to_string()
        } else {
            format!("{hours} hours")
        }
    } else {
        format!("{minutes} minutes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{content_hash, ContentCategory};
    use chrono::Utc;

    fn block(body: &str) -> ContentBlock {
        ContentBlock {
            source_name: "parking".to_string(),
            source_url: "https://x.test/parking".to_string(),
            title: "Parking Rates".to_string(),
            body: body.to_string(),
            category: ContentCategory::Parking,
            relevance: 0.8,
            content_hash: content_hash(body),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_target_duration_minutes_and_hours() {
        let ex = RateExtractor::new();
        assert_eq!(ex.target_minutes("parking rate for 30 minutes"), Some(30));
        assert_eq!(ex.target_minutes("how much for 2 hours of parking"), Some(120));
        assert_eq!(ex.target_minutes("cost for half an hour"), Some(30));
        assert_eq!(ex.target_minutes("what are the parking rates"), None);
    }

    #[test]
    fn test_rate_line_pipe_format() {
        let ex = RateExtractor::new();
        let blocks = vec![block("30 minutes | OMR 0.600\n1 hour | OMR 1.200")];
        let hit = ex.find_rate(&blocks, 30).expect("rate hit");
        assert_eq!(hit.amount, "0.600");
        let hit = ex.find_rate(&blocks, 60).expect("rate hit");
        assert_eq!(hit.amount, "1.200");
    }

    #[test]
    fn test_rate_line_colon_and_dash_variants() {
        let ex = RateExtractor::new();
        let blocks = vec![block("Short stays: 30 mins: OMR 0.600. Long: 2 hrs - RO 2.100")];
        assert_eq!(ex.find_rate(&blocks, 30).expect("hit").amount, "0.600");
        assert_eq!(ex.find_rate(&blocks, 120).expect("hit").amount, "2.100");
    }

    #[test]
    fn test_missing_duration_yields_none() {
        let ex = RateExtractor::new();
        let blocks = vec![block("30 minutes | OMR 0.600")];
        assert!(ex.find_rate(&blocks, 45).is_none());
    }

    #[test]
    fn test_taxi_fare_only_from_taxi_blocks() {
        let ex = RateExtractor::new();
        let mut taxi = block("Airport taxis charge around OMR 10-12 to the city centre.");
        taxi.title = "Taxi Services".to_string();
        let parking = block("30 minutes | OMR 0.600");
        let (amount, idx) = ex
            .find_taxi_fare(&[parking, taxi])
            .expect("fare hit");
        assert_eq!(amount, "10-12");
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_duration_label() {
        assert_eq!(duration_label(30), "30 minutes");
        assert_eq!(duration_label(60), "1 hour");
        assert_eq!(duration_label(120), "2 hours");
        assert_eq!(duration_label(90), "90 minutes");
    }
}
