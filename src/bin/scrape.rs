use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{error, info};

use vlr_mapstats::events_config::{Event, events_in_window, load_events};
use vlr_mapstats::match_index::fetch_match_ids;
use vlr_mapstats::scoreboard::fetch_scoreboard;
use vlr_mapstats::store;

const DEFAULT_CONFIG: &str = "config/events.yaml";
const DEFAULT_DB: &str = "data/map_stats.db";

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config_path = arg_value("--config").unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let db_path = arg_value("--db").unwrap_or_else(|| PathBuf::from(DEFAULT_DB));
    let from = date_arg("--from")?;
    let to = date_arg("--to")?;

    let events = load_events(&config_path)?;
    let selected = events_in_window(&events, from, to);
    info!(
        total = events.len(),
        selected = selected.len(),
        "events selected for scraping"
    );

    let mut conn = store::open_db(&db_path)?;
    for event in selected {
        if let Err(err) = scrape_event(&mut conn, event) {
            // An event failure never stops the run; the next event may be fine.
            error!(event_id = %event.event_id, error = %err, "event failed");
        }
    }

    println!("Scrape complete. DB: {}", db_path.display());
    Ok(())
}

fn scrape_event(conn: &mut rusqlite::Connection, event: &Event) -> Result<()> {
    let category = event.category();
    info!(
        event_id = %event.event_id,
        name = %event.event_name,
        tier = %category.tier,
        event_type = %category.event_type,
        "scraping event"
    );
    let match_ids = fetch_match_ids(&event.event_id)?;
    let run_id = store::record_scrape_run(conn, &event.event_id, match_ids.len())?;

    let mut matches_succeeded = 0usize;
    let mut rows_upserted = 0usize;
    let mut errors: Vec<String> = Vec::new();

    for match_id in &match_ids {
        match scrape_match(conn, event, match_id) {
            Ok(rows) => {
                matches_succeeded += 1;
                rows_upserted += rows;
            }
            Err(err) => {
                error!(match_id, error = %err, "match failed");
                errors.push(format!("match {match_id}: {err}"));
            }
        }
    }

    store::finish_scrape_run(conn, run_id, matches_succeeded, rows_upserted, &errors)?;
    println!(
        "event {}: matches {}/{} rows={} errors={}",
        event.event_id,
        matches_succeeded,
        match_ids.len(),
        rows_upserted,
        errors.len()
    );
    Ok(())
}

fn scrape_match(conn: &mut rusqlite::Connection, event: &Event, match_id: &str) -> Result<usize> {
    let mut rows = fetch_scoreboard(match_id)?;
    for row in &mut rows {
        row.event_id = event.event_id.clone();
        row.event_name = event.event_name.clone();
    }
    let tx = conn.transaction().context("begin scrape transaction")?;
    for row in &rows {
        store::upsert_map_stats(&tx, row)?;
    }
    tx.commit().context("commit scrape transaction")?;
    Ok(rows.len())
}

fn arg_value(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&format!("{flag}=")) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}

fn date_arg(flag: &str) -> Result<Option<NaiveDate>> {
    let Some(raw) = arg_value(flag) else {
        return Ok(None);
    };
    let raw = raw.to_string_lossy();
    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .with_context(|| format!("{flag} expects YYYY-MM-DD, got {raw:?}"))?;
    Ok(Some(date))
}
