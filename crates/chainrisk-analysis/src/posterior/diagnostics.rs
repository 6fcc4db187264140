//! Convergence diagnostics and summaries for MCMC draws.

use serde::Serialize;

/// Summary of the retained draws of one category estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    /// Posterior mean of θ pooled across chains.
    pub mean: f64,
    pub std_dev: f64,
    /// Retained draws per chain.
    pub draws: usize,
    pub chains: usize,
    /// Split R-hat across all chains.
    pub r_hat: f64,
    /// Accepted proposals / total proposals after warm-up.
    pub acceptance_rate: f64,
}

impl SampleSummary {
    pub fn from_chains(chains: &[Vec<f64>], acceptance_rate: f64) -> Self {
        let pooled: Vec<f64> = chains.iter().flatten().copied().collect();
        let (mean, variance) = mean_and_variance(&pooled);
        Self {
            mean,
            std_dev: variance.sqrt(),
            draws: chains.first().map_or(0, Vec::len),
            chains: chains.len(),
            r_hat: split_r_hat(chains),
            acceptance_rate,
        }
    }
}

/// Sample mean and unbiased variance. Variance is 0 for fewer than two values.
pub fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (mean, 0.0);
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (mean, ss / (n - 1) as f64)
}

/// Split R-hat (Gelman–Rubin on half-chains).
///
/// Each chain is cut in two so that within-chain drift also shows up as
/// between-sequence variance. Values near 1.0 indicate convergence.
/// Returns `INFINITY` when sequences are individually constant but disagree.
pub fn split_r_hat(chains: &[Vec<f64>]) -> f64 {
    let half = chains.iter().map(Vec::len).min().unwrap_or(0) / 2;
    if half < 2 {
        return f64::NAN;
    }

    let sequences: Vec<&[f64]> = chains
        .iter()
        .flat_map(|c| [&c[..half], &c[half..2 * half]])
        .collect();

    let stats: Vec<(f64, f64)> = sequences.iter().map(|s| mean_and_variance(s)).collect();
    let n = half as f64;
    let within = stats.iter().map(|(_, v)| v).sum::<f64>() / stats.len() as f64;
    let seq_means: Vec<f64> = stats.iter().map(|(m, _)| *m).collect();
    let (_, between_over_n) = mean_and_variance(&seq_means);

    if within <= 0.0 {
        return if between_over_n <= 0.0 { 1.0 } else { f64::INFINITY };
    }

    let var_plus = (n - 1.0) / n * within + between_over_n;
    (var_plus / within).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let (m, v) = mean_and_variance(&[1.0, 2.0, 3.0, 4.0]);
        assert!((m - 2.5).abs() < 1e-12);
        assert!((v - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_r_hat_near_one_for_identical_mixing_chains() {
        let chain: Vec<f64> = (0..400).map(|i| ((i * 37) % 101) as f64 / 100.0).collect();
        let r = split_r_hat(&[chain.clone(), chain]);
        assert!(r < 1.05, "r_hat = {r}");
    }

    #[test]
    fn test_r_hat_flags_disagreeing_chains() {
        let a: Vec<f64> = (0..200).map(|i| 0.2 + (i % 5) as f64 * 0.001).collect();
        let b: Vec<f64> = (0..200).map(|i| 0.8 + (i % 5) as f64 * 0.001).collect();
        assert!(split_r_hat(&[a, b]) > 2.0);
    }

    #[test]
    fn test_r_hat_flags_drifting_chain() {
        let drift: Vec<f64> = (0..400).map(|i| i as f64 / 400.0).collect();
        assert!(split_r_hat(&[drift.clone(), drift]) > 1.1);
    }

    #[test]
    fn test_r_hat_degenerate_inputs() {
        assert!(split_r_hat(&[vec![0.5; 2]]).is_nan());
        assert_eq!(split_r_hat(&[vec![0.5; 10], vec![0.5; 10]]), 1.0);
        assert!(split_r_hat(&[vec![0.1; 10], vec![0.9; 10]]).is_infinite());
    }

    #[test]
    fn test_summary_pools_chains() {
        let summary = SampleSummary::from_chains(&[vec![0.2, 0.4, 0.2, 0.4], vec![0.3, 0.3, 0.3, 0.3]], 0.5);
        assert!((summary.mean - 0.3).abs() < 1e-12);
        assert_eq!(summary.draws, 4);
        assert_eq!(summary.chains, 2);
        assert_eq!(summary.acceptance_rate, 0.5);
    }
}
