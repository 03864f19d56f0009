//! Tukey's honestly significant difference (HSD) test.
//!
//! Compares all pairs of group means after a one-way layout, using the
//! studentized range distribution with k = number of groups and
//! ν = total observations − k. Unequal group sizes use the Tukey–Kramer
//! standard error.

use crate::distribution::StudentizedRange;
use crate::error::{StatsError, StatsResult};
use crate::quadrature::QuadOptions;

/// One pairwise mean comparison from [`tukey_hsd`].
#[derive(Debug, Clone)]
pub struct PairwiseComparison {
    /// Index of the first group
    pub i: usize,
    /// Index of the second group
    pub j: usize,
    /// Difference of sample means, mean(i) − mean(j)
    pub mean_difference: f64,
    /// Studentized range statistic, mean difference over standard error
    pub statistic: f64,
    /// Two-group-adjusted p-value, S(|statistic|; k, ν)
    pub pvalue: f64,
    /// Lower simultaneous confidence bound for the mean difference
    pub lower: f64,
    /// Upper simultaneous confidence bound for the mean difference
    pub upper: f64,
}

/// Result of [`tukey_hsd`] over all group pairs.
#[derive(Debug, Clone)]
pub struct TukeyHsdResult {
    /// Number of groups (k)
    pub k: usize,
    /// Error degrees of freedom (ν = total observations − k)
    pub nu: f64,
    /// Confidence level used for the simultaneous intervals
    pub confidence_level: f64,
    /// Critical value q such that F(q; k, ν) = confidence_level
    pub critical_value: f64,
    /// All pairwise comparisons with i < j, in index order
    pub comparisons: Vec<PairwiseComparison>,
}

/// Tukey's HSD test over two or more groups of observations.
///
/// Returns every pairwise comparison with its studentized range statistic,
/// adjusted p-value and simultaneous confidence interval at
/// `confidence_level`.
///
/// # Errors
///
/// `InvalidParameter` if fewer than two groups are given, any group has
/// fewer than two observations, an observation is non-finite, or the pooled
/// within-group variance is zero. `InvalidProbability` if
/// `confidence_level` is outside (0, 1).
pub fn tukey_hsd(groups: &[&[f64]], confidence_level: f64) -> StatsResult<TukeyHsdResult> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(StatsError::InvalidProbability {
            value: confidence_level,
        });
    }
    let k = groups.len();
    if k < 2 {
        return Err(StatsError::InvalidParameter {
            name: "groups".to_string(),
            value: k as f64,
            reason: "need at least two groups".to_string(),
        });
    }

    let mut nobs = 0usize;
    let mut means = Vec::with_capacity(k);
    let mut sse = 0.0;
    for (idx, group) in groups.iter().enumerate() {
        let n = group.len();
        if n < 2 {
            return Err(StatsError::InvalidParameter {
                name: "groups".to_string(),
                value: idx as f64,
                reason: "each group needs at least two observations".to_string(),
            });
        }
        if group.iter().any(|x| !x.is_finite()) {
            return Err(StatsError::InvalidParameter {
                name: "groups".to_string(),
                value: idx as f64,
                reason: "observations must be finite".to_string(),
            });
        }
        let mean = group.iter().sum::<f64>() / n as f64;
        sse += group.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>();
        means.push(mean);
        nobs += n;
    }

    let nu = (nobs - k) as f64;
    let mse = sse / nu;
    if mse <= 0.0 {
        return Err(StatsError::InvalidParameter {
            name: "groups".to_string(),
            value: mse,
            reason: "pooled within-group variance is zero".to_string(),
        });
    }

    let sr = StudentizedRange::new(k, nu)?;
    let options = QuadOptions::default();
    let critical_value = sr.ppf_with(confidence_level, &options)?.value;

    let mut comparisons = Vec::with_capacity(k * (k - 1) / 2);
    for i in 0..k {
        for j in (i + 1)..k {
            let n_i = groups[i].len() as f64;
            let n_j = groups[j].len() as f64;
            // Tukey-Kramer standard error; reduces to sqrt(MSE / n) for
            // balanced groups
            let se = (0.5 * mse * (1.0 / n_i + 1.0 / n_j)).sqrt();
            let mean_difference = means[i] - means[j];
            let statistic = mean_difference / se;
            let pvalue = sr.sf_with(statistic.abs(), &options)?.value;
            let halfwidth = critical_value * se;
            comparisons.push(PairwiseComparison {
                i,
                j,
                mean_difference,
                statistic,
                pvalue,
                lower: mean_difference - halfwidth,
                upper: mean_difference + halfwidth,
            });
        }
    }

    Ok(TukeyHsdResult {
        k,
        nu,
        confidence_level,
        critical_value,
        comparisons,
    })
}
