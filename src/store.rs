//! SQLite persistence for scraped map rows.
//!
//! One table, `map_stats`, keyed by (match_id, map_name, player_name).
//! Re-scraping a match updates every scraped column but leaves the derived
//! `game_type` label untouched, so labeling does not have to be redone after
//! each scrape. `scrape_runs` records per-event ingest outcomes for audit.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, Transaction, params};

use crate::scoreboard::MapStatRow;
use crate::stage_classifier::Category;

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS map_stats (
            event_id            TEXT,
            event_name          TEXT,
            bracket_stage       TEXT,
            match_id            TEXT NOT NULL,
            match_datetime      TEXT,
            patch               TEXT,

            map_name            TEXT NOT NULL,
            team1_name          TEXT,
            team1_score         INTEGER,
            team2_name          TEXT,
            team2_score         INTEGER,

            player_name         TEXT NOT NULL,
            player_team         TEXT,
            player_country      TEXT,
            agent_played        TEXT,

            rounds_played       INTEGER,
            rating_2_0          REAL,
            game_score          REAL,
            ACS                 REAL,
            KDRatio             REAL,
            KAST_pct            REAL,

            ADR                 REAL,
            KPR                 REAL,
            APR                 REAL,
            FKPR                REAL,
            FDPR                REAL,
            HS_pct              REAL,
            CL_pct              REAL,
            CL_count            INTEGER,

            max_kills_in_round  INTEGER,
            total_kills         INTEGER,
            total_deaths        INTEGER,
            total_assists       INTEGER,
            total_first_kills   INTEGER,
            total_first_deaths  INTEGER,

            game_type           TEXT NULL,
            updated_at          TEXT NOT NULL,
            PRIMARY KEY (match_id, map_name, player_name)
        );
        CREATE INDEX IF NOT EXISTS idx_map_stats_event ON map_stats(event_id);
        CREATE INDEX IF NOT EXISTS idx_map_stats_player ON map_stats(player_name);
        CREATE INDEX IF NOT EXISTS idx_map_stats_game_type ON map_stats(game_type);

        CREATE TABLE IF NOT EXISTS scrape_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            event_id TEXT NOT NULL,
            matches_total INTEGER NOT NULL,
            matches_succeeded INTEGER NOT NULL,
            rows_upserted INTEGER NOT NULL,
            errors_json TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

pub fn upsert_map_stats(tx: &Transaction<'_>, row: &MapStatRow) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO map_stats (
            event_id, event_name, bracket_stage, match_id, match_datetime, patch,
            map_name, team1_name, team1_score, team2_name, team2_score,
            player_name, player_team, player_country, agent_played,
            rounds_played, rating_2_0, game_score, ACS, KDRatio, KAST_pct,
            ADR, KPR, APR, FKPR, FDPR, HS_pct, CL_pct, CL_count,
            max_kills_in_round, total_kills, total_deaths, total_assists,
            total_first_kills, total_first_deaths, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6,
            ?7, ?8, ?9, ?10, ?11,
            ?12, ?13, ?14, ?15,
            ?16, ?17, ?18, ?19, ?20, ?21,
            ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29,
            ?30, ?31, ?32, ?33,
            ?34, ?35, ?36
        )
        ON CONFLICT(match_id, map_name, player_name) DO UPDATE SET
            event_id = excluded.event_id,
            event_name = excluded.event_name,
            bracket_stage = excluded.bracket_stage,
            match_datetime = excluded.match_datetime,
            patch = excluded.patch,
            team1_name = excluded.team1_name,
            team1_score = excluded.team1_score,
            team2_name = excluded.team2_name,
            team2_score = excluded.team2_score,
            player_team = excluded.player_team,
            player_country = excluded.player_country,
            agent_played = excluded.agent_played,
            rounds_played = excluded.rounds_played,
            rating_2_0 = excluded.rating_2_0,
            game_score = excluded.game_score,
            ACS = excluded.ACS,
            KDRatio = excluded.KDRatio,
            KAST_pct = excluded.KAST_pct,
            ADR = excluded.ADR,
            KPR = excluded.KPR,
            APR = excluded.APR,
            FKPR = excluded.FKPR,
            FDPR = excluded.FDPR,
            HS_pct = excluded.HS_pct,
            CL_pct = excluded.CL_pct,
            CL_count = excluded.CL_count,
            max_kills_in_round = excluded.max_kills_in_round,
            total_kills = excluded.total_kills,
            total_deaths = excluded.total_deaths,
            total_assists = excluded.total_assists,
            total_first_kills = excluded.total_first_kills,
            total_first_deaths = excluded.total_first_deaths,
            updated_at = excluded.updated_at
        "#,
        params![
            row.event_id,
            row.event_name,
            row.bracket_stage,
            row.match_id,
            row.match_datetime,
            row.patch,
            row.map_name,
            row.team1_name,
            row.team1_score,
            row.team2_name,
            row.team2_score,
            row.player_name,
            row.player_team,
            row.player_country,
            row.agent_played,
            row.rounds_played,
            row.rating_2_0,
            row.game_score,
            row.acs,
            row.kd_ratio,
            row.kast_pct,
            row.adr,
            row.kpr,
            row.apr,
            row.fkpr,
            row.fdpr,
            row.hs_pct,
            row.cl_pct,
            row.cl_count,
            row.max_kills_in_round,
            row.total_kills,
            row.total_deaths,
            row.total_assists,
            row.total_first_kills,
            row.total_first_deaths,
            Utc::now().to_rfc3339(),
        ],
    )
    .context("upsert map_stats row")?;
    Ok(())
}

pub fn record_scrape_run(conn: &Connection, event_id: &str, matches_total: usize) -> Result<i64> {
    conn.execute(
        "INSERT INTO scrape_runs(started_at, finished_at, event_id, matches_total, matches_succeeded, rows_upserted, errors_json)
         VALUES (?1, NULL, ?2, ?3, 0, 0, '[]')",
        params![Utc::now().to_rfc3339(), event_id, matches_total as i64],
    )
    .context("insert scrape run")?;
    Ok(conn.last_insert_rowid())
}

pub fn finish_scrape_run(
    conn: &Connection,
    run_id: i64,
    matches_succeeded: usize,
    rows_upserted: usize,
    errors: &[String],
) -> Result<()> {
    let errors_json = serde_json::to_string(errors).unwrap_or_else(|_| "[]".to_string());
    conn.execute(
        "UPDATE scrape_runs
         SET finished_at = ?1, matches_succeeded = ?2, rows_upserted = ?3, errors_json = ?4
         WHERE run_id = ?5",
        params![
            Utc::now().to_rfc3339(),
            matches_succeeded as i64,
            rows_upserted as i64,
            errors_json,
            run_id
        ],
    )
    .context("update scrape run")?;
    Ok(())
}

/// Inputs for stage classification, one per stored row.
#[derive(Debug, Clone)]
pub struct StageRow {
    pub rowid: i64,
    pub bracket_stage: Option<String>,
    pub event_name: Option<String>,
    pub game_type: Option<String>,
}

pub fn load_stage_rows(conn: &Connection) -> Result<Vec<StageRow>> {
    let mut stmt = conn
        .prepare("SELECT rowid, bracket_stage, event_name, game_type FROM map_stats")
        .context("prepare stage rows query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StageRow {
                rowid: row.get(0)?,
                bracket_stage: row.get(1)?,
                event_name: row.get(2)?,
                game_type: row.get(3)?,
            })
        })
        .context("query stage rows")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("read stage rows")?;
    Ok(rows)
}

/// Write classified categories back by rowid, in one transaction.
pub fn update_game_types(conn: &mut Connection, batch: &[(i64, Category)]) -> Result<usize> {
    let tx = conn.transaction().context("begin game_type transaction")?;
    let mut updated = 0usize;
    {
        let mut stmt = tx
            .prepare("UPDATE map_stats SET game_type = ?1 WHERE rowid = ?2")
            .context("prepare game_type update")?;
        for (rowid, category) in batch {
            updated += stmt
                .execute(params![category.as_str(), rowid])
                .context("update game_type")?;
        }
    }
    tx.commit().context("commit game_type transaction")?;
    Ok(updated)
}

/// One analysis-ready row for the IGL comparison.
#[derive(Debug, Clone)]
pub struct PlayerMapRow {
    pub match_id: String,
    pub map_name: String,
    pub match_datetime: Option<String>,
    pub player_name: String,
    pub player_team: String,
    pub team1_name: String,
    pub team1_score: i64,
    pub team2_name: String,
    pub team2_score: i64,
    pub acs: f64,
}

/// Rows for the named players, cleaned the way the analysis expects: played
/// rounds only, per-map rows (no `All Maps` aggregate), and no rows labeled
/// Excluded. Name matching is case-insensitive on trimmed names.
pub fn load_player_rows(conn: &Connection, players: &[String]) -> Result<Vec<PlayerMapRow>> {
    if players.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = std::iter::repeat("?")
        .take(players.len())
        .collect::<Vec<_>>()
        .join(",");
    let sql = format!(
        r#"
        SELECT match_id, map_name, match_datetime, player_name, player_team,
               team1_name, team1_score, team2_name, team2_score, ACS
        FROM map_stats
        WHERE LOWER(TRIM(player_name)) IN ({placeholders})
          AND rounds_played > 0
          AND map_name IS NOT NULL AND map_name != 'All Maps'
          AND (game_type IS NULL OR game_type != 'Excluded')
        ORDER BY match_datetime, match_id, player_name
        "#
    );
    let mut stmt = conn.prepare(&sql).context("prepare player rows query")?;
    let lowered: Vec<String> = players.iter().map(|n| n.trim().to_lowercase()).collect();
    let rows = stmt
        .query_map(rusqlite::params_from_iter(lowered.iter()), |row| {
            Ok(PlayerMapRow {
                match_id: row.get(0)?,
                map_name: row.get(1)?,
                match_datetime: row.get(2)?,
                player_name: row.get(3)?,
                player_team: row.get(4)?,
                team1_name: row.get(5)?,
                team1_score: row.get(6)?,
                team2_name: row.get(7)?,
                team2_score: row.get(8)?,
                acs: row.get(9)?,
            })
        })
        .context("query player rows")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("read player rows")?;
    Ok(rows)
}
