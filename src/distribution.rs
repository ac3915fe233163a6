//! Sanity checks on a classified batch.
//!
//! Diagnostic only: callers may proceed regardless of the verdict. The
//! thresholds exist to catch silent rule-table regressions when new
//! tournament-naming conventions show up in scraped data.

use crate::stage_classifier::{Category, StageRules};

/// Fixed thresholds on category shares, in percent.
const MAX_PLAYOFF_PCT: f64 = 50.0;
const MIN_PLAYOFF_PCT: f64 = 5.0;
const MIN_REGULAR_PCT: f64 = 10.0;
const MAX_EXCLUDED_PCT: f64 = 10.0;

#[derive(Debug, Clone, Default)]
pub struct DistributionReport {
    pub total: usize,
    pub playoff: usize,
    pub regular: usize,
    pub excluded: usize,
    pub playoff_pct: f64,
    pub regular_pct: f64,
    pub excluded_pct: f64,
    pub warnings: Vec<String>,
}

impl DistributionReport {
    pub fn is_reasonable(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Tally a batch of categories and flag implausible shares. Aggregation is
/// order-insensitive; shuffling the input yields identical counts.
pub fn validate_distribution<I>(categories: I) -> DistributionReport
where
    I: IntoIterator<Item = Category>,
{
    let mut report = DistributionReport::default();
    for category in categories {
        report.total += 1;
        match category {
            Category::Playoffs => report.playoff += 1,
            Category::RegularSeason => report.regular += 1,
            Category::Excluded => report.excluded += 1,
        }
    }
    if report.total == 0 {
        report
            .warnings
            .push("Empty batch - nothing classified".to_string());
        return report;
    }

    let pct = |n: usize| n as f64 / report.total as f64 * 100.0;
    report.playoff_pct = pct(report.playoff);
    report.regular_pct = pct(report.regular);
    report.excluded_pct = pct(report.excluded);

    if report.playoff_pct > MAX_PLAYOFF_PCT {
        report.warnings.push(format!(
            "High playoff percentage ({:.1}%) - review classification",
            report.playoff_pct
        ));
    }
    if report.playoff_pct < MIN_PLAYOFF_PCT {
        report.warnings.push(format!(
            "Low playoff percentage ({:.1}%) - review classification",
            report.playoff_pct
        ));
    }
    if report.regular_pct < MIN_REGULAR_PCT {
        report.warnings.push(format!(
            "Low regular season percentage ({:.1}%) - review classification",
            report.regular_pct
        ));
    }
    if report.excluded_pct > MAX_EXCLUDED_PCT {
        report.warnings.push(format!(
            "High excluded percentage ({:.1}%) - review filters",
            report.excluded_pct
        ));
    }
    report
}

/// Raw stage labels worth a manual look. Never alters classification.
#[derive(Debug, Clone, Default)]
pub struct EdgeCaseScan {
    /// Group-context labels that also carry playoff vocabulary.
    pub group_with_playoff_terms: Vec<String>,
    /// Playoff-looking labels using placement vocabulary instead of the common
    /// bracket terms.
    pub playoff_with_unusual_names: Vec<String>,
}

const PLAYOFF_TERMS_IN_GROUPS: &[&str] = &["final", "semifinal", "lower", "upper"];
const UNUSUAL_PLAYOFF_TERMS: &[&str] = &["bronze", "medal", "3rd place", "consolation"];

pub fn scan_edge_cases<'a, I>(stages: I, rules: &StageRules) -> EdgeCaseScan
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scan = EdgeCaseScan::default();
    for raw in stages {
        let stage = raw.to_lowercase();
        let in_group_context = rules
            .group_stage_indicators
            .iter()
            .any(|kw| stage.contains(kw));
        if in_group_context && PLAYOFF_TERMS_IN_GROUPS.iter().any(|t| stage.contains(t)) {
            scan.group_with_playoff_terms.push(raw.to_string());
        }
        if UNUSUAL_PLAYOFF_TERMS.iter().any(|t| stage.contains(t))
            && !stage.contains("group")
            && !stage.contains("swiss")
        {
            scan.playoff_with_unusual_names.push(raw.to_string());
        }
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_is_flagged() {
        let report = validate_distribution(std::iter::empty());
        assert_eq!(report.total, 0);
        assert!(!report.is_reasonable());
    }

    #[test]
    fn balanced_batch_is_reasonable() {
        let mut batch = vec![Category::Playoffs; 25];
        batch.extend(vec![Category::RegularSeason; 73]);
        batch.extend(vec![Category::Excluded; 2]);
        let report = validate_distribution(batch);
        assert!(report.is_reasonable(), "warnings: {:?}", report.warnings);
        assert_eq!(report.total, 100);
    }

    #[test]
    fn edge_scan_picks_out_group_labels_with_bracket_words() {
        let scan = scan_edge_cases(
            ["Group A: Lower Bracket Final", "Grand Final", "Bronze Match"],
            StageRules::standard(),
        );
        assert_eq!(
            scan.group_with_playoff_terms,
            vec!["Group A: Lower Bracket Final".to_string()]
        );
        assert_eq!(scan.playoff_with_unusual_names, vec!["Bronze Match".to_string()]);
    }
}
