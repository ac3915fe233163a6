//! Batch stage labeling.
//!
//! Classifies every stored row and writes the category into `game_type`.
//! Rows are independent, so classification runs in parallel; the write-back
//! is a single transaction.

use anyhow::Result;
use rayon::prelude::*;
use rusqlite::Connection;
use tracing::info;

use crate::distribution::{DistributionReport, EdgeCaseScan, scan_edge_cases, validate_distribution};
use crate::stage_classifier::{Category, StageRules};
use crate::store::{StageRow, load_stage_rows, update_game_types};

#[derive(Debug, Clone)]
pub struct LabelSummary {
    pub rows: usize,
    pub updated: usize,
    /// Rows whose stored label differed from the fresh classification.
    pub changed: Vec<(i64, Option<String>, Category)>,
    categories: Vec<Category>,
    stages: Vec<String>,
}

impl LabelSummary {
    pub fn distribution(&self) -> DistributionReport {
        validate_distribution(self.categories.iter().copied())
    }

    pub fn edge_cases(&self, rules: &StageRules) -> EdgeCaseScan {
        scan_edge_cases(self.stages.iter().map(String::as_str), rules)
    }
}

/// Classify all rows and persist the labels. With `dry_run`, nothing is
/// written; the summary still reports what would change.
pub fn label_all(conn: &mut Connection, rules: &StageRules, dry_run: bool) -> Result<LabelSummary> {
    let rows = load_stage_rows(conn)?;
    let classified = classify_rows(rules, &rows);

    let changed: Vec<(i64, Option<String>, Category)> = rows
        .iter()
        .zip(&classified)
        .filter(|(row, category)| row.game_type.as_deref() != Some(category.as_str()))
        .map(|(row, category)| (row.rowid, row.game_type.clone(), *category))
        .collect();

    let updated = if dry_run {
        0
    } else {
        let batch: Vec<(i64, Category)> =
            changed.iter().map(|(rowid, _, category)| (*rowid, *category)).collect();
        update_game_types(conn, &batch)?
    };
    info!(rows = rows.len(), updated, dry_run, "stage labeling pass complete");

    Ok(LabelSummary {
        rows: rows.len(),
        updated,
        changed,
        categories: classified,
        stages: rows.into_iter().filter_map(|r| r.bracket_stage).collect(),
    })
}

fn classify_rows(rules: &StageRules, rows: &[StageRow]) -> Vec<Category> {
    rows.par_iter()
        .map(|row| rules.classify(row.bracket_stage.as_deref(), row.event_name.as_deref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_row(rowid: i64, stage: &str) -> StageRow {
        StageRow {
            rowid,
            bracket_stage: Some(stage.to_string()),
            event_name: None,
            game_type: None,
        }
    }

    #[test]
    fn parallel_classification_matches_serial() {
        let rows = vec![
            stage_row(1, "Grand Final"),
            stage_row(2, "Group Stage: Group A"),
            stage_row(3, "Showmatch"),
        ];
        let rules = StageRules::standard();
        let parallel = classify_rows(rules, &rows);
        let serial: Vec<Category> = rows
            .iter()
            .map(|r| rules.classify(r.bracket_stage.as_deref(), r.event_name.as_deref()))
            .collect();
        assert_eq!(parallel, serial);
        assert_eq!(
            parallel,
            vec![Category::Playoffs, Category::RegularSeason, Category::Excluded]
        );
    }
}
