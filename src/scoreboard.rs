//! Scoreboard extraction.
//!
//! A vlr.gg match page carries one header block (stage, datetime, patch, two
//! teams with series scores) and one stats section per map, each with a table
//! of per-player rows. Every player row becomes one `MapStatRow`, so a single
//! match produces many rows sharing the same match metadata.

use anyhow::{Context, Result, anyhow};
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::http_client::polite_get;

/// One player's line on one map, in the fixed `map_stats` column order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapStatRow {
    // Match metadata
    pub event_id: String,
    pub event_name: String,
    pub bracket_stage: Option<String>,
    pub match_id: String,
    pub match_datetime: String,
    pub patch: String,

    // Map and teams
    pub map_name: String,
    pub team1_name: String,
    pub team1_score: i64,
    pub team2_name: String,
    pub team2_score: i64,

    // Player identity
    pub player_name: String,
    pub player_team: String,
    pub player_country: String,
    pub agent_played: String,

    // Core stats
    pub rounds_played: i64,
    pub rating_2_0: f64,
    pub game_score: f64,
    pub acs: f64,
    pub kd_ratio: f64,
    pub kast_pct: f64,

    // Advanced stats
    pub adr: f64,
    pub kpr: f64,
    pub apr: f64,
    pub fkpr: f64,
    pub fdpr: f64,
    pub hs_pct: f64,
    pub cl_pct: f64,
    pub cl_count: i64,

    // Raw stats
    pub max_kills_in_round: i64,
    pub total_kills: i64,
    pub total_deaths: i64,
    pub total_assists: i64,
    pub total_first_kills: i64,
    pub total_first_deaths: i64,
}

/// Number of stat cells a player row must have.
const EXPECTED_CELLS: usize = 24;

fn selector(raw: &'static str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| anyhow!("invalid selector {raw}: {e}"))
}

pub fn fetch_scoreboard(match_id: &str) -> Result<Vec<MapStatRow>> {
    let url = format!("https://www.vlr.gg/match/{match_id}/");
    let html = polite_get(&url).with_context(|| format!("fetch match {match_id}"))?;
    let rows = parse_scoreboard(&html, match_id)
        .with_context(|| format!("parse scoreboard for match {match_id}"))?;
    info!(match_id, rows = rows.len(), "scoreboard parsed");
    Ok(rows)
}

/// Parse a match page into per-map player rows. Event fields are left empty;
/// the scrape loop fills them from the event config before persisting.
pub fn parse_scoreboard(html: &str, match_id: &str) -> Result<Vec<MapStatRow>> {
    let document = Html::parse_document(html);

    let header_sel = selector(".vm-header")?;
    let header = document
        .select(&header_sel)
        .next()
        .ok_or_else(|| anyhow!("match header not found"))?;

    let stage_sel = selector(".vm-header__stage")?;
    let bracket_stage = header
        .select(&stage_sel)
        .next()
        .map(|e| collect_text(&e))
        .filter(|s| !s.is_empty());
    if bracket_stage.is_none() {
        // Defined case downstream: the classifier treats it as Regular Season.
        warn!(match_id, "bracket stage missing from match header");
    }

    let time_sel = selector(".vm-header__time")?;
    let match_datetime = header
        .select(&time_sel)
        .next()
        .and_then(|e| e.value().attr("data-utc-ts"))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("match datetime not found in header"))?;

    let patch_sel = selector(".vm-header__patch")?;
    let patch = header
        .select(&patch_sel)
        .next()
        .map(|e| collect_text(&e))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let team_sel = selector(".vm-header__team")?;
    let teams: Vec<ElementRef<'_>> = header.select(&team_sel).collect();
    if teams.len() != 2 {
        return Err(anyhow!("expected exactly 2 teams in match header, got {}", teams.len()));
    }
    let name_sel = selector(".vm-header__team-name")?;
    let score_sel = selector(".vm-header__score")?;
    let (team1_name, team1_score) = parse_team(&teams[0], &name_sel, &score_sel)?;
    let (team2_name, team2_score) = parse_team(&teams[1], &name_sel, &score_sel)?;

    let map_sel = selector(".vm-stats__layout")?;
    let map_header_sel = selector(".vm-stats__header")?;
    let table_sel = selector("table")?;
    let row_sel = selector("tbody tr")?;
    let cell_sel = selector("td")?;
    let flag_sel = selector("img")?;

    let mut rows = Vec::new();
    for map_section in document.select(&map_sel) {
        let Some(map_name) = map_section.select(&map_header_sel).next().map(|e| collect_text(&e))
        else {
            warn!(match_id, "map section without a header, skipping");
            continue;
        };
        let Some(table) = map_section.select(&table_sel).next() else {
            warn!(match_id, map = %map_name, "no stats table for map");
            continue;
        };

        for player_row in table.select(&row_sel) {
            let cells: Vec<ElementRef<'_>> = player_row.select(&cell_sel).collect();
            if cells.len() < EXPECTED_CELLS {
                warn!(
                    match_id,
                    map = %map_name,
                    cells = cells.len(),
                    "short player row, skipping"
                );
                continue;
            }

            let player_country = cells[2]
                .select(&flag_sel)
                .next()
                .and_then(|img| img.value().attr("title"))
                .unwrap_or("Unknown")
                .to_string();

            rows.push(MapStatRow {
                event_id: String::new(),
                event_name: String::new(),
                bracket_stage: bracket_stage.clone(),
                match_id: match_id.to_string(),
                match_datetime: match_datetime.clone(),
                patch: patch.clone(),
                map_name: map_name.clone(),
                team1_name: team1_name.clone(),
                team1_score,
                team2_name: team2_name.clone(),
                team2_score,
                player_name: collect_text(&cells[0]),
                player_team: collect_text(&cells[1]),
                player_country,
                agent_played: collect_text(&cells[3]),
                rounds_played: parse_int(&cells[4]).context("rounds_played")?,
                rating_2_0: parse_float(&cells[5]).context("rating_2_0")?,
                game_score: parse_float(&cells[6]).context("game_score")?,
                acs: parse_float(&cells[7]).context("ACS")?,
                kd_ratio: parse_float(&cells[8]).context("KDRatio")?,
                kast_pct: parse_float(&cells[9]).context("KAST_pct")?,
                adr: parse_float(&cells[10]).context("ADR")?,
                kpr: parse_float(&cells[11]).context("KPR")?,
                apr: parse_float(&cells[12]).context("APR")?,
                fkpr: parse_float(&cells[13]).context("FKPR")?,
                fdpr: parse_float(&cells[14]).context("FDPR")?,
                hs_pct: parse_float(&cells[15]).context("HS_pct")?,
                cl_pct: parse_float(&cells[16]).context("CL_pct")?,
                cl_count: parse_int(&cells[17]).context("CL_count")?,
                max_kills_in_round: parse_int(&cells[18]).context("max_kills_in_round")?,
                total_kills: parse_int(&cells[19]).context("total_kills")?,
                total_deaths: parse_int(&cells[20]).context("total_deaths")?,
                total_assists: parse_int(&cells[21]).context("total_assists")?,
                total_first_kills: parse_int(&cells[22]).context("total_first_kills")?,
                total_first_deaths: parse_int(&cells[23]).context("total_first_deaths")?,
            });
        }
    }

    if rows.is_empty() {
        return Err(anyhow!("no player rows found in scoreboard"));
    }
    Ok(rows)
}

fn parse_team(
    team: &ElementRef<'_>,
    name_sel: &Selector,
    score_sel: &Selector,
) -> Result<(String, i64)> {
    let name = team
        .select(name_sel)
        .next()
        .map(|e| collect_text(&e))
        .ok_or_else(|| anyhow!("team name missing"))?;
    let score = team
        .select(score_sel)
        .next()
        .map(|e| collect_text(&e))
        .ok_or_else(|| anyhow!("team score missing"))?
        .parse::<i64>()
        .context("team score not numeric")?;
    Ok((name, score))
}

fn collect_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_int(cell: &ElementRef<'_>) -> Result<i64> {
    let text = collect_text(cell);
    text.parse::<i64>()
        .with_context(|| format!("expected integer, got {text:?}"))
}

/// Floats may carry a trailing percent sign (KAST, HS%, CL%).
fn parse_float(cell: &ElementRef<'_>) -> Result<f64> {
    let text = collect_text(cell);
    text.trim_end_matches('%')
        .parse::<f64>()
        .with_context(|| format!("expected number, got {text:?}"))
}
