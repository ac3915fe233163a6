use std::path::PathBuf;

use anyhow::Result;

use vlr_mapstats::label::label_all;
use vlr_mapstats::stage_classifier::StageRules;
use vlr_mapstats::store;

const DEFAULT_DB: &str = "data/map_stats.db";

/// Re-run classification over an already-labeled database. With --dry-run,
/// prints the rows whose stored label would change without writing anything;
/// useful after a keyword-table revision.
fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = arg_value("--db").unwrap_or_else(|| PathBuf::from(DEFAULT_DB));
    let dry_run = std::env::args().any(|arg| arg == "--dry-run");

    let mut conn = store::open_db(&db_path)?;
    let summary = label_all(&mut conn, StageRules::standard(), dry_run)?;

    if summary.changed.is_empty() {
        println!("No label changes across {} rows.", summary.rows);
        return Ok(());
    }

    println!(
        "{} of {} rows {} reclassified:",
        summary.changed.len(),
        summary.rows,
        if dry_run { "would be" } else { "were" }
    );
    for (rowid, old, new) in summary.changed.iter().take(50) {
        println!("  rowid {rowid}: {} -> {new}", old.as_deref().unwrap_or("(unlabeled)"));
    }
    if summary.changed.len() > 50 {
        println!("  ... and {} more", summary.changed.len() - 50);
    }

    Ok(())
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
