//! Event tiering and naming hygiene.
//!
//! Scraped event names sometimes arrive with page chrome glued on
//! ("...ongoingStatus", prize pools, date ranges); `clean_event_name` strips
//! the known corruption patterns. `categorize_event` then maps the clean name
//! to a competition tier and an event type, which drive sorting and reporting
//! but never affect per-match stage classification.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTier {
    One,
    Two,
    Three,
    Unknown,
}

impl EventTier {
    pub fn as_str(self) -> &'static str {
        match self {
            EventTier::One => "Tier 1",
            EventTier::Two => "Tier 2",
            EventTier::Three => "Tier 3",
            EventTier::Unknown => "Unknown",
        }
    }

    fn priority(self) -> u32 {
        match self {
            EventTier::One => 100,
            EventTier::Two => 50,
            EventTier::Three => 10,
            EventTier::Unknown => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    GameChangers,
    Collegiate,
    Challengers,
    Masters,
    Champions,
    Playoffs,
    Qualifier,
    Open,
    Invitational,
    Cup,
    Series,
    League,
    Tournament,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::GameChangers => "Game Changers",
            EventType::Collegiate => "Collegiate",
            EventType::Challengers => "Challengers",
            EventType::Masters => "Masters",
            EventType::Champions => "Champions",
            EventType::Playoffs => "Playoffs",
            EventType::Qualifier => "Qualifier",
            EventType::Open => "Open",
            EventType::Invitational => "Invitational",
            EventType::Cup => "Cup",
            EventType::Series => "Series",
            EventType::League => "League",
            EventType::Tournament => "Tournament",
        }
    }

    fn priority(self) -> u32 {
        match self {
            EventType::Champions => 50,
            EventType::Masters => 40,
            EventType::Challengers => 30,
            EventType::GameChangers => 25,
            EventType::Playoffs => 20,
            EventType::Qualifier => 15,
            EventType::Open => 10,
            EventType::Tournament => 5,
            _ => 0,
        }
    }
}

impl std::fmt::Display for EventTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCategory {
    pub tier: EventTier,
    pub event_type: EventType,
}

impl EventCategory {
    /// Numeric priority for sorting; higher means a bigger event.
    pub fn priority(self) -> u32 {
        self.tier.priority() + self.event_type.priority()
    }
}

const TIER1_KEYWORDS: &[&str] = &[
    "champions tour",
    "masters",
    "champions",
    "world championship",
    "international",
    "global",
    "world cup",
    "valorant champions",
];

const TIER2_KEYWORDS: &[&str] = &[
    "challengers",
    "regional",
    "league",
    "pro league",
    "esports league",
    "vct",
    "valorant champions tour",
];

const TIER3_KEYWORDS: &[&str] = &[
    "open",
    "qualifier",
    "qualification",
    "circuit",
    "series",
    "cup",
    "invitational",
    "showdown",
    "clash",
    "minor",
    "local",
];

/// Type rules, first match wins. Game Changers and Collegiate outrank the
/// circuit names so "Game Changers Masters" stays a Game Changers event.
const TYPE_RULES: &[(&[&str], EventType)] = &[
    (
        &["game changers", "gc", "women", "female", "queens", "girls"],
        EventType::GameChangers,
    ),
    (
        &["collegiate", "college", "university", "academic", "student", "campus", "school"],
        EventType::Collegiate,
    ),
    (&["challengers"], EventType::Challengers),
    (&["masters"], EventType::Masters),
    (&["champions"], EventType::Champions),
    (&["playoff"], EventType::Playoffs),
    (&["qualifier", "qualification"], EventType::Qualifier),
    (&["open"], EventType::Open),
    (&["invitational"], EventType::Invitational),
    (&["cup"], EventType::Cup),
    (&["series"], EventType::Series),
    (&["league"], EventType::League),
];

/// Corruption suffixes observed in scraped event listings. Each pattern
/// deletes from its first match to the end of the name.
static CORRUPTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)ongoingStatus.*$",
        r"(?i)completedStatus.*$",
        r"(?i)upcomingStatus.*$",
        r"(?i)Prize Pool.*$",
        r"(?i)DatesRegion.*$",
        r"(?i)Status.*$",
        r"(?i)\$[\d,]+.*$",
        r"(?i)TBD.*$",
        r"(?i)[A-Za-z]{3}\s+\d{1,2}—[A-Za-z]{3}\s+\d{1,2}.*$",
        r"(?i)\d{4}—\d{4}.*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("corruption pattern must compile"))
    .collect()
});

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid pattern"));
static TRAILING_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[:\-]\s*$").expect("valid pattern"));

/// Strip page chrome from an event name and normalize whitespace. Clean names
/// pass through unchanged.
pub fn clean_event_name(event_name: &str) -> String {
    let mut name = event_name.to_string();
    for pattern in CORRUPTION_PATTERNS.iter() {
        if let Some(m) = pattern.find(&name) {
            name.truncate(m.start());
        }
    }
    let name = WHITESPACE_RUN.replace_all(name.trim(), " ");
    TRAILING_PUNCT.replace(&name, "").into_owned()
}

fn contains_any(text: &str, table: &[&str]) -> bool {
    table.iter().any(|kw| text.contains(kw))
}

/// Tier and type for an event name. The name is cleaned first, so corrupted
/// and clean spellings of the same event categorize identically.
pub fn categorize_event(event_name: &str) -> EventCategory {
    let name = clean_event_name(event_name).to_lowercase();

    let tier = if contains_any(&name, TIER1_KEYWORDS) {
        EventTier::One
    } else if contains_any(&name, TIER2_KEYWORDS) {
        EventTier::Two
    } else if contains_any(&name, TIER3_KEYWORDS) {
        EventTier::Three
    } else {
        EventTier::Unknown
    };

    let event_type = TYPE_RULES
        .iter()
        .find(|(keywords, _)| contains_any(&name, keywords))
        .map(|&(_, event_type)| event_type)
        .unwrap_or(EventType::Tournament);

    EventCategory { tier, event_type }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circuit_events_are_tier_one() {
        let cat = categorize_event("Champions Tour 2025: Masters Toronto");
        assert_eq!(cat.tier, EventTier::One);
        assert_eq!(cat.event_type, EventType::Masters);

        let cat = categorize_event("Valorant Champions 2025");
        assert_eq!(cat.tier, EventTier::One);
        assert_eq!(cat.event_type, EventType::Champions);
    }

    #[test]
    fn challengers_and_community_events_rank_below() {
        let cat = categorize_event("VCT 2025: Americas Challengers Stage 2");
        // "challengers" is tier 2; tier 1 keywords take precedence when both
        // appear, and none do here.
        assert_eq!(cat.tier, EventTier::Two);
        assert_eq!(cat.event_type, EventType::Challengers);

        let cat = categorize_event("FunhaverGG: ZERO//IN - Qualifier 7");
        assert_eq!(cat.tier, EventTier::Three);
        assert_eq!(cat.event_type, EventType::Qualifier);
    }

    #[test]
    fn game_changers_and_collegiate_beat_circuit_types() {
        let cat = categorize_event("Game Changers 2025: Championship");
        assert_eq!(cat.event_type, EventType::GameChangers);

        let cat = categorize_event("College VALORANT 2024-2025: East");
        assert_eq!(cat.event_type, EventType::Collegiate);
    }

    #[test]
    fn unmatched_names_default_to_tournament() {
        let cat = categorize_event("Red Bull Home Ground");
        assert_eq!(cat.tier, EventTier::Unknown);
        assert_eq!(cat.event_type, EventType::Tournament);
    }

    #[test]
    fn priority_orders_tiers_and_types() {
        let champions = categorize_event("Valorant Champions 2025").priority();
        let challengers = categorize_event("Challengers League: North America").priority();
        let local = categorize_event("City Open Qualifier").priority();
        assert!(champions > challengers);
        assert!(challengers > local);
        assert_eq!(champions, 150);
    }

    #[test]
    fn corrupted_suffixes_are_stripped() {
        assert_eq!(
            clean_event_name("Champions Tour 2025: Masters TorontoongoingStatus: live"),
            "Champions Tour 2025: Masters Toronto"
        );
        assert_eq!(
            clean_event_name("Some Cup Prize Pool $25,000"),
            "Some Cup"
        );
        assert_eq!(clean_event_name("Event Name $100,000 dates"), "Event Name");
        assert_eq!(clean_event_name("  Spaced   Out  Event "), "Spaced Out Event");
        // A trailing separator left behind by truncation is dropped too.
        assert_eq!(clean_event_name("Masters Toronto: completedStatus"), "Masters Toronto");
    }

    #[test]
    fn clean_names_pass_through_unchanged() {
        let name = "Champions Tour 2025: EMEA Stage 2";
        assert_eq!(clean_event_name(name), name);
    }

    #[test]
    fn categorization_ignores_corruption() {
        let clean = categorize_event("Valorant Champions 2025");
        let corrupted = categorize_event("Valorant Champions 2025completedStatus: over");
        assert_eq!(clean, corrupted);
    }
}
