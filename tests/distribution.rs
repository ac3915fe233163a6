use vlr_mapstats::distribution::validate_distribution;
use vlr_mapstats::stage_classifier::Category;

fn batch(playoffs: usize, regular: usize, excluded: usize) -> Vec<Category> {
    let mut out = vec![Category::Playoffs; playoffs];
    out.extend(vec![Category::RegularSeason; regular]);
    out.extend(vec![Category::Excluded; excluded]);
    out
}

#[test]
fn sixty_percent_playoffs_is_flagged() {
    let report = validate_distribution(batch(60, 40, 0));
    assert_eq!(report.total, 100);
    assert!((report.playoff_pct - 60.0).abs() < 1e-9);
    assert!(!report.is_reasonable());
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("High playoff percentage")),
        "warnings: {:?}",
        report.warnings
    );
}

#[test]
fn low_playoff_share_is_flagged() {
    let report = validate_distribution(batch(2, 98, 0));
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("Low playoff percentage"))
    );
}

#[test]
fn heavy_exclusion_is_flagged() {
    let report = validate_distribution(batch(25, 55, 20));
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("High excluded percentage"))
    );
}

#[test]
fn vanishing_regular_share_is_flagged() {
    let report = validate_distribution(batch(45, 5, 50));
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("Low regular season percentage"))
    );
}

#[test]
fn plausible_distribution_passes() {
    let report = validate_distribution(batch(25, 72, 3));
    assert!(report.is_reasonable(), "warnings: {:?}", report.warnings);
}

#[test]
fn aggregation_is_order_insensitive() {
    let forward = batch(30, 65, 5);
    let mut reversed = forward.clone();
    reversed.reverse();
    // Interleave as a second permutation.
    let mut interleaved = Vec::with_capacity(forward.len());
    let half = forward.len() / 2;
    for i in 0..half {
        interleaved.push(forward[i]);
        interleaved.push(forward[forward.len() - 1 - i]);
    }

    let a = validate_distribution(forward);
    let b = validate_distribution(reversed);
    let c = validate_distribution(interleaved);
    for report in [&b, &c] {
        assert_eq!(a.total, report.total);
        assert_eq!(a.playoff, report.playoff);
        assert_eq!(a.regular, report.regular);
        assert_eq!(a.excluded, report.excluded);
        assert_eq!(a.warnings, report.warnings);
    }
}
