//! Batch evaluation over slices of arguments.
//!
//! The distribution value is `Copy` and every evaluation is pure, so batches
//! parallelize with a plain `par_iter` and per-element results come back in
//! input order. Each element carries its own `Result`; one failing argument
//! does not poison the rest of the batch.

use rayon::prelude::*;

use crate::distribution::StudentizedRange;
use crate::error::StatsResult;
use crate::quadrature::{IntegrationResult, QuadOptions};

impl StudentizedRange {
    /// CDF at each point of `q`, in parallel.
    pub fn cdf_many(
        &self,
        q: &[f64],
        options: &QuadOptions,
    ) -> Vec<StatsResult<IntegrationResult>> {
        q.par_iter().map(|&x| self.cdf_with(x, options)).collect()
    }

    /// Survival function at each point of `q`, in parallel.
    pub fn sf_many(&self, q: &[f64], options: &QuadOptions) -> Vec<StatsResult<IntegrationResult>> {
        q.par_iter().map(|&x| self.sf_with(x, options)).collect()
    }

    /// PDF at each point of `q`, in parallel.
    pub fn pdf_many(
        &self,
        q: &[f64],
        options: &QuadOptions,
    ) -> Vec<StatsResult<IntegrationResult>> {
        q.par_iter().map(|&x| self.pdf_with(x, options)).collect()
    }

    /// Quantile at each probability of `p`, in parallel.
    pub fn ppf_many(
        &self,
        p: &[f64],
        options: &QuadOptions,
    ) -> Vec<StatsResult<IntegrationResult>> {
        p.par_iter().map(|&x| self.ppf_with(x, options)).collect()
    }
}
