//! Tournament-stage classification.
//!
//! Maps a free-text bracket-stage label (plus an optional event name) to one of
//! three categories via an ordered rule pipeline. Exclusion keywords veto
//! everything; group/swiss context vetoes playoff keywords that appear inside
//! group-stage labels ("Group A: Lower Bracket Final" is a group match, not a
//! bracket final); everything unrecognized falls back to Regular Season so
//! ambiguous real matches are never silently dropped from analysis.

use once_cell::sync::Lazy;
use tracing::debug;

/// Output category of the classifier. Assignment is rule-driven; there is no
/// ranking between the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Playoffs,
    RegularSeason,
    Excluded,
}

impl Category {
    /// Text form stored in the `game_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Playoffs => "Playoffs",
            Category::RegularSeason => "Regular Season",
            Category::Excluded => "Excluded",
        }
    }

    pub fn from_db(raw: &str) -> Option<Category> {
        match raw {
            "Playoffs" => Some(Category::Playoffs),
            "Regular Season" => Some(Category::RegularSeason),
            "Excluded" => Some(Category::Excluded),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword tables driving the classifier. Read-only after construction; built
/// once at startup and passed by reference so the tables can be swapped out
/// wholesale (e.g. for a revised convention set) without any mutable global.
#[derive(Debug)]
pub struct StageRules {
    /// Showmatch/exhibition vocabulary. Highest-priority veto.
    pub excluded: &'static [&'static str],
    /// Group/swiss/league context. Vetoes playoff keywords in the same label.
    pub group_stage_indicators: &'static [&'static str],
    pub play_ins: &'static [&'static str],
    pub playoff_keywords: &'static [&'static str],
    pub regular_season_keywords: &'static [&'static str],
    pub playoff_prefixes: &'static [&'static str],
    pub regular_prefixes: &'static [&'static str],
    /// Prefixes that say nothing by themselves; the text after the colon decides.
    pub context_prefixes: &'static [&'static str],
    pub playoff_after_colon: &'static [&'static str],
    pub regular_after_colon: &'static [&'static str],
    pub international_events: &'static [&'static str],
    pub international_playoff_keywords: &'static [&'static str],
    /// Generic terms that default to Regular Season when nothing else matched.
    pub generic_stage_terms: &'static [&'static str],
}

static STANDARD_RULES: Lazy<StageRules> = Lazy::new(StageRules::vlr_defaults);

impl StageRules {
    /// Process-wide default table set.
    pub fn standard() -> &'static StageRules {
        &STANDARD_RULES
    }

    fn vlr_defaults() -> StageRules {
        StageRules {
            excluded: &[
                "showmatch",
                "show match",
                "exhibition",
                "all-star",
                "all star",
                "charity match",
                "fun match",
                "demonstration",
                "showcase",
            ],
            group_stage_indicators: &[
                "group a",
                "group b",
                "group c",
                "group d",
                "group e",
                "group f",
                "group stage",
                "group phase",
                "swiss",
                "league",
                "regular season",
                "season",
                "qualification",
                "qualifying",
                "play-in",
                "play ins",
                "week",
                "day",
                "matchday",
            ],
            play_ins: &["play-ins", "play ins", "playin", "play-in"],
            playoff_keywords: &[
                "grand final",
                "grand finals",
                "final",
                "finals",
                "championship",
                "upper bracket final",
                "lower bracket final",
                "upper bracket semifinal",
                "lower bracket semifinal",
                "upper bracket quarterfinal",
                "lower bracket quarterfinal",
                "upper bracket round",
                "lower bracket round",
                "semifinal",
                "semifinals",
                "quarterfinal",
                "quarterfinals",
                "round of 16",
                "round of 32",
                "round of 8",
                "round of 4",
                "elimination",
                "knockout",
                "consolation final",
                "bronze final",
                "3rd place match",
                "bronze match",
                "third place match",
                "gold medal match",
                "silver medal match",
                "bronze medal match",
                "bronze",
                "third place",
                "3rd place",
                "medal match",
                "place match",
                "consolation",
                "placement final",
                "5th place match",
                "fourth place match",
            ],
            regular_season_keywords: &[
                "group stage",
                "group a",
                "group b",
                "group c",
                "group d",
                "group a -",
                "group b -",
                "group c -",
                "group d -",
                "swiss stage",
                "swiss round",
                "swiss phase",
                "opening matches",
                "winners' match",
                "losers' match",
                "qualification",
                "qualifying",
                "round robin",
                "league stage",
                "regular season",
                "round 1",
                "round 2",
                "round 3",
                "round 4",
                "round 5",
                "round 6",
            ],
            playoff_prefixes: &["playoffs:", "playoff:", "knockout:", "elimination:"],
            regular_prefixes: &[
                "group stage:",
                "group:",
                "swiss:",
                "qualification:",
                "play-in:",
            ],
            context_prefixes: &["main event:", "tournament:", "championship:"],
            playoff_after_colon: &[
                "grand final",
                "semifinal",
                "quarterfinal",
                "upper bracket",
                "lower bracket",
                "final",
                "finals",
                "round of",
                "elimination",
                "knockout",
                "bronze",
                "third place",
                "medal",
            ],
            regular_after_colon: &[
                "group", "round 1", "round 2", "round 3", "round 4", "opening", "winners",
                "losers", "swiss",
            ],
            international_events: &[
                "olympics",
                "olympic",
                "asian games",
                "sea games",
                "commonwealth games",
                "world cup",
                "continental championship",
            ],
            international_playoff_keywords: &[
                "gold medal",
                "silver medal",
                "bronze medal",
                "final",
                "semifinal",
            ],
            generic_stage_terms: &["group", "round", "pool"],
        }
    }

    /// Classify a bracket-stage label. Total over all inputs: a missing or blank
    /// stage is a defined case (Regular Season), never an error.
    pub fn classify(&self, bracket_stage: Option<&str>, event_name: Option<&str>) -> Category {
        let Some(raw) = bracket_stage else {
            return Category::RegularSeason;
        };
        if raw.trim().is_empty() {
            return Category::RegularSeason;
        }

        let label = StageLabel {
            stage: raw.trim().to_lowercase(),
            event: event_name.map(|e| e.trim().to_lowercase()).unwrap_or_default(),
        };

        for tier in TIERS {
            if let Some(category) = (tier.apply)(self, &label) {
                debug!(stage = %label.stage, tier = tier.name, %category, "stage classified");
                return category;
            }
        }
        debug!(stage = %label.stage, "no tier matched, defaulting");
        Category::RegularSeason
    }
}

/// Lower-cased, trimmed inputs shared by every tier.
struct StageLabel {
    stage: String,
    event: String,
}

/// One rule tier: a named predicate with a final outcome. Tiers run in order
/// with first-match-wins semantics; reordering or inserting a tier only touches
/// the `TIERS` list.
struct RuleTier {
    /// Shown in debug logs when this tier decides a label.
    name: &'static str,
    apply: fn(&StageRules, &StageLabel) -> Option<Category>,
}

const TIERS: &[RuleTier] = &[
    RuleTier {
        name: "excluded-veto",
        apply: excluded_veto,
    },
    RuleTier {
        name: "group-context-veto",
        apply: group_context_veto,
    },
    RuleTier {
        name: "play-ins",
        apply: play_ins,
    },
    RuleTier {
        name: "playoff-keywords",
        apply: playoff_keywords,
    },
    RuleTier {
        name: "regular-season-keywords",
        apply: regular_season_keywords,
    },
    RuleTier {
        name: "stage-prefixes",
        apply: stage_prefixes,
    },
    RuleTier {
        name: "context-prefix",
        apply: context_prefix,
    },
    RuleTier {
        name: "international-event",
        apply: international_event,
    },
    RuleTier {
        name: "generic-fallback",
        apply: generic_fallback,
    },
];

fn contains_any(text: &str, table: &[&str]) -> bool {
    table.iter().any(|kw| text.contains(kw))
}

fn starts_with_any(text: &str, table: &[&str]) -> bool {
    table.iter().any(|prefix| text.starts_with(prefix))
}

/// Showmatches and exhibitions must never leak into either real category.
fn excluded_veto(rules: &StageRules, label: &StageLabel) -> Option<Category> {
    contains_any(&label.stage, rules.excluded).then_some(Category::Excluded)
}

/// Group/swiss context dominates playoff keywords: tournament naming nests
/// playoff-sounding words inside group-stage labels.
fn group_context_veto(rules: &StageRules, label: &StageLabel) -> Option<Category> {
    contains_any(&label.stage, rules.group_stage_indicators).then_some(Category::RegularSeason)
}

fn play_ins(rules: &StageRules, label: &StageLabel) -> Option<Category> {
    contains_any(&label.stage, rules.play_ins).then_some(Category::RegularSeason)
}

fn playoff_keywords(rules: &StageRules, label: &StageLabel) -> Option<Category> {
    contains_any(&label.stage, rules.playoff_keywords).then_some(Category::Playoffs)
}

fn regular_season_keywords(rules: &StageRules, label: &StageLabel) -> Option<Category> {
    contains_any(&label.stage, rules.regular_season_keywords).then_some(Category::RegularSeason)
}

fn stage_prefixes(rules: &StageRules, label: &StageLabel) -> Option<Category> {
    if starts_with_any(&label.stage, rules.playoff_prefixes) {
        return Some(Category::Playoffs);
    }
    if starts_with_any(&label.stage, rules.regular_prefixes) {
        return Some(Category::RegularSeason);
    }
    None
}

/// "Main Event:" and friends say nothing by themselves; the text after the
/// first colon carries the stage information.
fn context_prefix(rules: &StageRules, label: &StageLabel) -> Option<Category> {
    if !starts_with_any(&label.stage, rules.context_prefixes) {
        return None;
    }
    let (_, after) = label.stage.split_once(':')?;
    let after = after.trim();
    if contains_any(after, rules.playoff_after_colon) {
        return Some(Category::Playoffs);
    }
    if contains_any(after, rules.regular_after_colon) {
        return Some(Category::RegularSeason);
    }
    None
}

/// Olympic-style events label their brackets by medal rather than bracket
/// round; only the event name reveals that convention.
fn international_event(rules: &StageRules, label: &StageLabel) -> Option<Category> {
    if label.event.is_empty() || !contains_any(&label.event, rules.international_events) {
        return None;
    }
    contains_any(&label.stage, rules.international_playoff_keywords).then_some(Category::Playoffs)
}

/// Ambiguous generic terms default safe to Regular Season, never to Excluded.
fn generic_fallback(rules: &StageRules, label: &StageLabel) -> Option<Category> {
    contains_any(&label.stage, rules.generic_stage_terms).then_some(Category::RegularSeason)
}

/// Classify with the standard rule tables.
pub fn classify_stage(bracket_stage: Option<&str>, event_name: Option<&str>) -> Category {
    StageRules::standard().classify(bracket_stage, event_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_stage_is_regular_season() {
        assert_eq!(classify_stage(None, None), Category::RegularSeason);
        assert_eq!(classify_stage(Some(""), None), Category::RegularSeason);
        assert_eq!(classify_stage(Some("   "), None), Category::RegularSeason);
    }

    #[test]
    fn exclusion_beats_everything() {
        assert_eq!(
            classify_stage(Some("Grand Final Showmatch"), None),
            Category::Excluded
        );
        assert_eq!(
            classify_stage(Some("Group A Exhibition"), None),
            Category::Excluded
        );
    }

    #[test]
    fn group_context_vetoes_playoff_keywords() {
        assert_eq!(
            classify_stage(Some("Group A: Lower Bracket Final"), None),
            Category::RegularSeason
        );
        assert_eq!(
            classify_stage(Some("Lower Swiss Phase: Round 3"), None),
            Category::RegularSeason
        );
    }

    #[test]
    fn context_prefix_splits_on_first_colon() {
        assert_eq!(
            classify_stage(Some("Main Event: Grand Final"), None),
            Category::Playoffs
        );
        assert_eq!(
            classify_stage(Some("Main Event: Group A"), None),
            Category::RegularSeason
        );
    }

    #[test]
    fn international_events_read_medal_stages_as_playoffs() {
        assert_eq!(
            classify_stage(Some("Gold Medal"), Some("Asian Games 2026")),
            Category::Playoffs
        );
        // Same stage without the international event context: "gold medal" is
        // not a direct playoff keyword ("gold medal match" is), so it falls
        // back to Regular Season.
        assert_eq!(classify_stage(Some("Gold Medal"), None), Category::RegularSeason);
    }

    #[test]
    fn generic_terms_fall_back_to_regular_season() {
        assert_eq!(classify_stage(Some("Pool Play"), None), Category::RegularSeason);
        assert_eq!(classify_stage(Some("Decider"), None), Category::RegularSeason);
    }

    #[test]
    fn tier_names_are_unique() {
        let mut names: Vec<&str> = TIERS.iter().map(|t| t.name).collect();
        assert!(names.iter().all(|n| !n.is_empty()));
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TIERS.len());
    }

    #[test]
    fn category_db_round_trip() {
        for c in [Category::Playoffs, Category::RegularSeason, Category::Excluded] {
            assert_eq!(Category::from_db(c.as_str()), Some(c));
        }
        assert_eq!(Category::from_db("Unknown"), None);
    }
}
