use std::path::PathBuf;

use anyhow::Result;

use vlr_mapstats::label::label_all;
use vlr_mapstats::stage_classifier::StageRules;
use vlr_mapstats::store;

const DEFAULT_DB: &str = "data/map_stats.db";

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = arg_value("--db").unwrap_or_else(|| PathBuf::from(DEFAULT_DB));
    let mut conn = store::open_db(&db_path)?;

    let rules = StageRules::standard();
    let summary = label_all(&mut conn, rules, false)?;

    println!("Labeled {} rows ({} updated)", summary.rows, summary.updated);

    let report = summary.distribution();
    println!(
        "Playoffs: {} ({:.1}%) | Regular Season: {} ({:.1}%) | Excluded: {} ({:.1}%)",
        report.playoff,
        report.playoff_pct,
        report.regular,
        report.regular_pct,
        report.excluded,
        report.excluded_pct
    );
    if report.is_reasonable() {
        println!("Distribution looks reasonable.");
    } else {
        // Diagnostic only; a warning here never blocks the pipeline.
        for warning in &report.warnings {
            println!("WARNING: {warning}");
        }
    }

    let edge = summary.edge_cases(rules);
    if !edge.group_with_playoff_terms.is_empty() {
        println!(
            "\nGroup labels with playoff vocabulary ({}):",
            edge.group_with_playoff_terms.len()
        );
        for stage in edge.group_with_playoff_terms.iter().take(20) {
            println!("  - {stage}");
        }
    }
    if !edge.playoff_with_unusual_names.is_empty() {
        println!(
            "\nPlacement-style playoff labels ({}):",
            edge.playoff_with_unusual_names.len()
        );
        for stage in edge.playoff_with_unusual_names.iter().take(20) {
            println!("  - {stage}");
        }
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
