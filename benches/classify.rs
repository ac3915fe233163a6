use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use vlr_mapstats::distribution::validate_distribution;
use vlr_mapstats::scoreboard::parse_scoreboard;
use vlr_mapstats::stage_classifier::{Category, StageRules, classify_stage};

// A realistic mix of stage labels, weighted the way scraped data looks:
// mostly group/swiss rounds, a playoff tail, a stray showmatch.
const STAGE_LABELS: &[&str] = &[
    "Group Stage: Group A",
    "Group Stage: Group B",
    "Swiss Stage: Round 1",
    "Swiss Stage: Round 2",
    "Swiss Stage: Round 3",
    "Play-Ins: Round 1",
    "Main Event: Group A",
    "Group A: Lower Bracket Final",
    "Opening Matches",
    "Winners' Match",
    "Main Event: Grand Final",
    "Upper Bracket Final",
    "Lower Bracket Semifinal",
    "Quarterfinal",
    "Round of 16",
    "Showmatch",
];

fn bench_classify_single(c: &mut Criterion) {
    c.bench_function("classify_single", |b| {
        b.iter(|| {
            let category = classify_stage(black_box(Some("Group A: Lower Bracket Final")), None);
            black_box(category);
        })
    });
}

fn bench_classify_batch(c: &mut Criterion) {
    // 10k labels approximates one full relabeling pass over a season of data.
    let labels: Vec<&str> = STAGE_LABELS.iter().cycle().take(10_000).copied().collect();
    let rules = StageRules::standard();

    c.bench_function("classify_batch_10k", |b| {
        b.iter(|| {
            let categories: Vec<Category> = labels
                .iter()
                .map(|stage| rules.classify(black_box(Some(stage)), None))
                .collect();
            black_box(categories.len());
        })
    });
}

fn bench_validate_distribution(c: &mut Criterion) {
    let rules = StageRules::standard();
    let categories: Vec<Category> = STAGE_LABELS
        .iter()
        .cycle()
        .take(10_000)
        .map(|stage| rules.classify(Some(stage), None))
        .collect();

    c.bench_function("validate_distribution_10k", |b| {
        b.iter(|| {
            let report = validate_distribution(black_box(categories.iter().copied()));
            black_box(report.warnings.len());
        })
    });
}

fn bench_scoreboard_parse(c: &mut Criterion) {
    c.bench_function("scoreboard_parse", |b| {
        b.iter(|| {
            let rows = parse_scoreboard(black_box(MATCH_PAGE_HTML), "490311").unwrap();
            black_box(rows.len());
        })
    });
}

criterion_group!(
    classify,
    bench_classify_single,
    bench_classify_batch,
    bench_validate_distribution,
    bench_scoreboard_parse
);
criterion_main!(classify);

static MATCH_PAGE_HTML: &str = include_str!("../tests/fixtures/match_page.html");
