use std::path::PathBuf;

use anyhow::{Context, Result};

use vlr_mapstats::igl_analysis::run_igl_analysis;
use vlr_mapstats::igl_cohort::Cohort;
use vlr_mapstats::store;

const DEFAULT_DB: &str = "data/map_stats.db";
const DEFAULT_ROSTER: &str = "igl_analysis/igl_non_igl_player.txt";
const DEFAULT_CROSSREF: &str = "igl_analysis/crossreference_list.txt";
const SUMMARY_OUT: &str = "igl_analysis/analysis_summary.txt";
const TABLE_OUT: &str = "igl_analysis/acs_delta_winrate_table.csv";

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = arg_value("--db").unwrap_or_else(|| PathBuf::from(DEFAULT_DB));
    let roster = arg_value("--roster").unwrap_or_else(|| PathBuf::from(DEFAULT_ROSTER));
    let crossref = arg_value("--crossref").unwrap_or_else(|| PathBuf::from(DEFAULT_CROSSREF));

    let cohort = Cohort::load(&roster, &crossref)?;
    let conn = store::open_db(&db_path)?;
    let report = run_igl_analysis(&conn, &cohort)?;

    let summary = report.render_text();
    print!("{summary}");

    let summary_path = PathBuf::from(SUMMARY_OUT);
    if let Some(dir) = summary_path.parent() {
        std::fs::create_dir_all(dir).ok();
    }
    std::fs::write(&summary_path, &summary).context("write analysis summary")?;
    std::fs::write(TABLE_OUT, report.render_csv()).context("write per-player table")?;
    println!("Summary written to {SUMMARY_OUT}");
    println!("Table written to {TABLE_OUT}");

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
