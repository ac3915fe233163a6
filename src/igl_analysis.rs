//! IGL vs non-IGL performance comparison.
//!
//! Loads cleaned map rows for the cohort, labels each row's player role,
//! compares ACS between in-game leaders and the rest (normality-gated choice
//! of test, plus effect size), and aggregates a per-player table of
//! team-relative ACS delta against team win rate.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::igl_cohort::Cohort;
use crate::stats::{self, EffectSize, NormalityCheck, TestResult};
use crate::store::{PlayerMapRow, load_player_rows};

/// Minimum maps for a player's delta/win-rate averages to be treated as
/// stable. The per-player table keeps everyone; this only gates the summary
/// highlight.
const MIN_MAPS_PER_PLAYER: usize = 5;

#[derive(Debug, Clone)]
pub struct PlayerDeltaRow {
    pub player_name: String,
    pub is_igl: bool,
    pub maps: usize,
    pub acs_delta_avg: f64,
    pub team_win_rate: f64,
}

#[derive(Debug)]
pub struct IglReport {
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub n_igl: usize,
    pub n_non_igl: usize,
    pub normality: NormalityCheck,
    pub comparison: TestResult,
    pub effect: EffectSize,
    pub per_player: Vec<PlayerDeltaRow>,
}

pub fn run_igl_analysis(conn: &Connection, cohort: &Cohort) -> Result<IglReport> {
    let players: Vec<String> = cohort.players.iter().cloned().collect();
    let rows = load_player_rows(conn, &players)?;
    let rows_loaded = rows.len();
    let (rows, duplicates_removed) = dedup_rows(rows);
    if duplicates_removed > 0 {
        warn!(duplicates_removed, "dropped duplicate map rows");
    }

    // Keep only rows whose player role is known.
    let labeled: Vec<(PlayerMapRow, bool)> = rows
        .into_iter()
        .filter_map(|row| cohort.is_igl(&row.player_name).map(|is_igl| (row, is_igl)))
        .collect();
    if labeled.is_empty() {
        return Err(anyhow!("no rows with a known IGL label; check the cohort files"));
    }

    let igl_acs: Vec<f64> = labeled.iter().filter(|(_, igl)| *igl).map(|(r, _)| r.acs).collect();
    let non_igl_acs: Vec<f64> =
        labeled.iter().filter(|(_, igl)| !*igl).map(|(r, _)| r.acs).collect();
    info!(igl = igl_acs.len(), non_igl = non_igl_acs.len(), "labeled map rows");

    let combined: Vec<f64> = igl_acs.iter().chain(&non_igl_acs).copied().collect();
    let normality = stats::normality(&combined).context("ACS normality check")?;
    let comparison = if normality.use_parametric {
        stats::welch_t_test(&igl_acs, &non_igl_acs)?
    } else {
        stats::mann_whitney_u(&igl_acs, &non_igl_acs)?
    };
    let effect = stats::cohens_d(&igl_acs, &non_igl_acs)?;

    let per_player = per_player_table(&labeled);

    Ok(IglReport {
        rows_loaded,
        duplicates_removed,
        n_igl: igl_acs.len(),
        n_non_igl: non_igl_acs.len(),
        normality,
        comparison,
        effect,
        per_player,
    })
}

/// One row per (match_id, map_name, player_name), keeping the first.
fn dedup_rows(rows: Vec<PlayerMapRow>) -> (Vec<PlayerMapRow>, usize) {
    let mut seen = HashSet::new();
    let before = rows.len();
    let rows: Vec<PlayerMapRow> = rows
        .into_iter()
        .filter(|row| {
            seen.insert((row.match_id.clone(), row.map_name.clone(), row.player_name.clone()))
        })
        .collect();
    let removed = before - rows.len();
    (rows, removed)
}

fn team_won(row: &PlayerMapRow) -> Option<bool> {
    if row.player_team == row.team1_name {
        Some(row.team1_score > row.team2_score)
    } else if row.player_team == row.team2_name {
        Some(row.team2_score > row.team1_score)
    } else {
        None
    }
}

/// Per-player mean ACS delta (vs. team average on the same map) and team win
/// rate. Every labeled player appears, however few maps they have; consumers
/// decide their own reliability cut.
fn per_player_table(labeled: &[(PlayerMapRow, bool)]) -> Vec<PlayerDeltaRow> {
    // Team average ACS per (match, map, team) over everyone on the scoreboard.
    let mut team_totals: HashMap<(String, String, String), (f64, usize)> = HashMap::new();
    for (row, _) in labeled {
        let entry = team_totals
            .entry((row.match_id.clone(), row.map_name.clone(), row.player_team.clone()))
            .or_insert((0.0, 0));
        entry.0 += row.acs;
        entry.1 += 1;
    }

    struct Acc {
        is_igl: bool,
        delta_sum: f64,
        wins: usize,
        decided: usize,
        maps: usize,
    }
    let mut by_player: BTreeMap<String, Acc> = BTreeMap::new();
    for (row, is_igl) in labeled {
        let key = (row.match_id.clone(), row.map_name.clone(), row.player_team.clone());
        let Some(&(total, count)) = team_totals.get(&key) else {
            continue;
        };
        let team_avg = total / count as f64;
        let acc = by_player.entry(row.player_name.clone()).or_insert(Acc {
            is_igl: *is_igl,
            delta_sum: 0.0,
            wins: 0,
            decided: 0,
            maps: 0,
        });
        acc.maps += 1;
        acc.delta_sum += row.acs - team_avg;
        if let Some(won) = team_won(row) {
            acc.decided += 1;
            if won {
                acc.wins += 1;
            }
        }
    }

    by_player
        .into_iter()
        .map(|(player_name, acc)| PlayerDeltaRow {
            player_name,
            is_igl: acc.is_igl,
            maps: acc.maps,
            acs_delta_avg: acc.delta_sum / acc.maps as f64,
            team_win_rate: if acc.decided > 0 {
                acc.wins as f64 / acc.decided as f64
            } else {
                0.0
            },
        })
        .collect()
}

impl IglReport {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "IGL Performance Analysis - Summary");
        let _ = writeln!(out, "{}", "=".repeat(50));
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Rows loaded: {} ({} duplicates removed)",
            self.rows_loaded, self.duplicates_removed
        );
        let _ = writeln!(out, "Sample sizes: IGL {} | non-IGL {}", self.n_igl, self.n_non_igl);
        let _ = writeln!(out);
        let _ = writeln!(out, "ACS distribution");
        let _ = writeln!(
            out,
            "  Jarque-Bera = {:.4}, p = {:.3e} (n = {})",
            self.normality.statistic, self.normality.p_value, self.normality.n
        );
        let _ = writeln!(out, "  Parametric test used: {}", self.normality.use_parametric);
        let _ = writeln!(out);
        let _ = writeln!(out, "IGL vs non-IGL ({})", self.comparison.test);
        let _ = writeln!(
            out,
            "  statistic = {:.4}, p = {:.3e}",
            self.comparison.statistic, self.comparison.p_value
        );
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Effect size: Cohen's d = {:.4} ({})",
            self.effect.d, self.effect.interpretation
        );
        let _ = writeln!(
            out,
            "  mean ACS: IGL {:.2} | non-IGL {:.2}",
            self.effect.mean_a, self.effect.mean_b
        );
        let _ = writeln!(out);
        let reliable = self
            .per_player
            .iter()
            .filter(|row| row.maps >= MIN_MAPS_PER_PLAYER)
            .count();
        let _ = writeln!(
            out,
            "Per-player table: {} players ({} with >= {} maps)",
            self.per_player.len(),
            reliable,
            MIN_MAPS_PER_PLAYER
        );
        out
    }

    /// CSV of the per-player delta/win-rate table.
    pub fn render_csv(&self) -> String {
        let mut out = String::from("player_name,is_igl,maps,acs_delta_avg,team_win_rate\n");
        for row in &self.per_player {
            let _ = writeln!(
                out,
                "{},{},{},{:.3},{:.3}",
                row.player_name, row.is_igl, row.maps, row.acs_delta_avg, row.team_win_rate
            );
        }
        out
    }
}
