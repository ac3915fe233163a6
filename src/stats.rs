//! Two-sample statistics for the IGL comparison.
//!
//! Normality gate (Jarque-Bera), Welch's t-test for the parametric branch,
//! Mann-Whitney U with tie correction for the rank-based branch, and Cohen's d
//! for effect size. p-values come from statrs distributions.

use anyhow::{Context, Result, anyhow};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal, StudentsT};

const ALPHA: f64 = 0.05;

#[derive(Debug, Clone, Copy)]
pub struct NormalityCheck {
    pub n: usize,
    pub statistic: f64,
    pub p_value: f64,
    /// p >= 0.05: no evidence against normality, parametric test is fine.
    pub use_parametric: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TestResult {
    pub test: &'static str,
    pub statistic: f64,
    pub p_value: f64,
    pub n_a: usize,
    pub n_b: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct EffectSize {
    pub d: f64,
    pub interpretation: &'static str,
    pub mean_a: f64,
    pub mean_b: f64,
}

/// Jarque-Bera test: skewness and excess kurtosis against a chi-squared(2)
/// reference. Needs a handful of observations to mean anything.
pub fn normality(sample: &[f64]) -> Result<NormalityCheck> {
    let n = sample.len();
    if n < 8 {
        return Err(anyhow!("normality check needs at least 8 observations, got {n}"));
    }
    let nf = n as f64;
    let mean = sample.iter().sum::<f64>() / nf;
    let m2 = central_moment(sample, mean, 2);
    if m2 <= 0.0 {
        return Err(anyhow!("normality check on a constant sample"));
    }
    let m3 = central_moment(sample, mean, 3);
    let m4 = central_moment(sample, mean, 4);
    let skew = m3 / m2.powf(1.5);
    let excess_kurtosis = m4 / (m2 * m2) - 3.0;
    let jb = nf / 6.0 * (skew * skew + excess_kurtosis * excess_kurtosis / 4.0);
    let chi2 = ChiSquared::new(2.0).context("chi-squared(2)")?;
    let p_value = 1.0 - chi2.cdf(jb);
    Ok(NormalityCheck {
        n,
        statistic: jb,
        p_value,
        use_parametric: p_value >= ALPHA,
    })
}

/// Welch's unequal-variance t-test, two-sided.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Result<TestResult> {
    if a.len() < 2 || b.len() < 2 {
        return Err(anyhow!("t-test needs at least 2 observations per group"));
    }
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, m2) = (mean(a), mean(b));
    let (v1, v2) = (sample_variance(a, m1), sample_variance(b, m2));
    let se2 = v1 / n1 + v2 / n2;
    if se2 <= 0.0 {
        return Err(anyhow!("t-test on constant samples"));
    }
    let t = (m1 - m2) / se2.sqrt();
    // Welch-Satterthwaite degrees of freedom.
    let df = se2 * se2
        / ((v1 / n1).powi(2) / (n1 - 1.0) + (v2 / n2).powi(2) / (n2 - 1.0));
    let dist = StudentsT::new(0.0, 1.0, df).context("students-t")?;
    let p_value = (2.0 * (1.0 - dist.cdf(t.abs()))).min(1.0);
    Ok(TestResult {
        test: "welch-t",
        statistic: t,
        p_value,
        n_a: a.len(),
        n_b: b.len(),
    })
}

/// Mann-Whitney U, two-sided, normal approximation with tie correction and
/// continuity correction. Statistic reported is U of the first sample.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Result<TestResult> {
    if a.is_empty() || b.is_empty() {
        return Err(anyhow!("rank-sum test needs non-empty groups"));
    }
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let n = n1 + n2;

    let (rank_sum_a, tie_term) = rank_sums(a, b)?;
    let u1 = rank_sum_a - n1 * (n1 + 1.0) / 2.0;

    let mu = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(anyhow!("rank-sum variance is zero (all values tied)"));
    }
    // Continuity correction toward the mean.
    let z = (u1 - mu - 0.5 * (u1 - mu).signum()) / variance.sqrt();
    let normal = Normal::new(0.0, 1.0).context("standard normal")?;
    let p_value = (2.0 * (1.0 - normal.cdf(z.abs()))).min(1.0);
    Ok(TestResult {
        test: "mann-whitney",
        statistic: u1,
        p_value,
        n_a: a.len(),
        n_b: b.len(),
    })
}

/// Cohen's d with pooled standard deviation.
pub fn cohens_d(a: &[f64], b: &[f64]) -> Result<EffectSize> {
    if a.len() < 2 || b.len() < 2 {
        return Err(anyhow!("effect size needs at least 2 observations per group"));
    }
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, m2) = (mean(a), mean(b));
    let (v1, v2) = (sample_variance(a, m1), sample_variance(b, m2));
    let pooled = (((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / (n1 + n2 - 2.0)).sqrt();
    if pooled <= 0.0 {
        return Err(anyhow!("effect size on constant samples"));
    }
    let d = (m1 - m2) / pooled;
    Ok(EffectSize {
        d,
        interpretation: interpret_d(d),
        mean_a: m1,
        mean_b: m2,
    })
}

fn interpret_d(d: f64) -> &'static str {
    let abs = d.abs();
    if abs < 0.2 {
        "negligible"
    } else if abs < 0.5 {
        "small"
    } else if abs < 0.8 {
        "medium"
    } else {
        "large"
    }
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn sample_variance(xs: &[f64], mean: f64) -> f64 {
    xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() as f64 - 1.0)
}

fn central_moment(xs: &[f64], mean: f64, order: i32) -> f64 {
    xs.iter().map(|x| (x - mean).powi(order)).sum::<f64>() / xs.len() as f64
}

/// Average ranks over the pooled sample. Returns the rank sum of `a` and the
/// tie term sum(t^3 - t) for the variance correction.
fn rank_sums(a: &[f64], b: &[f64]) -> Result<(f64, f64)> {
    let mut pooled: Vec<(f64, bool)> = a
        .iter()
        .map(|&x| (x, true))
        .chain(b.iter().map(|&x| (x, false)))
        .collect();
    if pooled.iter().any(|(x, _)| x.is_nan()) {
        return Err(anyhow!("NaN in rank-sum input"));
    }
    pooled.sort_by(|(x, _), (y, _)| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));

    let mut rank_sum_a = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < pooled.len() {
        let mut j = i;
        while j + 1 < pooled.len() && pooled[j + 1].0 == pooled[i].0 {
            j += 1;
        }
        // Ranks are 1-based; tied values share the average rank of the run.
        let avg_rank = (i + 1 + j + 1) as f64 / 2.0;
        let run = (j - i + 1) as f64;
        if run > 1.0 {
            tie_term += run * run * run - run;
        }
        for k in i..=j {
            if pooled[k].1 {
                rank_sum_a += avg_rank;
            }
        }
        i = j + 1;
    }
    Ok((rank_sum_a, tie_term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welch_t_on_identical_groups_is_insignificant() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let r = welch_t_test(&a, &a).unwrap();
        assert!(r.statistic.abs() < 1e-12);
        assert!((r.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn welch_t_detects_a_clear_shift() {
        let a = [10.0, 11.0, 9.5, 10.5, 10.2, 9.8, 10.1, 10.4];
        let b = [20.0, 21.0, 19.5, 20.5, 20.2, 19.8, 20.1, 20.4];
        let r = welch_t_test(&a, &b).unwrap();
        assert!(r.statistic < 0.0);
        assert!(r.p_value < 0.001);
    }

    #[test]
    fn mann_whitney_u_statistic_matches_hand_computation() {
        // a = [1,2,3], b = [4,5,6]: every pair favors b, so U1 = 0.
        let r = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert!(r.statistic.abs() < 1e-12);

        // Interleaved groups: rank sum of a is 1+3+5 = 9, so U1 = 9 - 6 = 3.
        let r = mann_whitney_u(&[1.0, 3.0, 5.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((r.statistic - 3.0).abs() < 1e-12);
        assert!(r.p_value > 0.5);
    }

    #[test]
    fn mann_whitney_handles_ties() {
        let r = mann_whitney_u(&[1.0, 2.0, 2.0, 3.0], &[2.0, 4.0, 4.0, 5.0]).unwrap();
        assert!(r.p_value > 0.0 && r.p_value <= 1.0);
    }

    #[test]
    fn cohens_d_is_antisymmetric() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [3.0, 4.0, 5.0, 6.0];
        let ab = cohens_d(&a, &b).unwrap();
        let ba = cohens_d(&b, &a).unwrap();
        assert!((ab.d + ba.d).abs() < 1e-12);
        assert_eq!(ab.interpretation, "large");
    }

    #[test]
    fn normality_accepts_symmetric_bell_like_data() {
        // Symmetric, light-tailed sample: JB should not reject.
        let sample = [
            -2.0, -1.5, -1.0, -1.0, -0.5, -0.5, -0.2, 0.0, 0.0, 0.2, 0.5, 0.5, 1.0, 1.0, 1.5, 2.0,
        ];
        let check = normality(&sample).unwrap();
        assert!(check.use_parametric, "p = {}", check.p_value);
    }

    #[test]
    fn normality_rejects_heavily_skewed_data() {
        let mut sample = vec![1.0; 40];
        sample.extend([50.0, 60.0, 80.0, 120.0]);
        let check = normality(&sample).unwrap();
        assert!(!check.use_parametric, "p = {}", check.p_value);
    }

    #[test]
    fn tiny_samples_are_rejected() {
        assert!(normality(&[1.0, 2.0]).is_err());
        assert!(welch_t_test(&[1.0], &[2.0, 3.0]).is_err());
        assert!(mann_whitney_u(&[], &[1.0]).is_err());
    }
}
