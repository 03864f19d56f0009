//! Quantile (inverse CDF) evaluation by bracketed root finding.
//!
//! The CDF is smooth and strictly increasing in q, so the quantile is found
//! by bracketing followed by bisection. Every CDF evaluation along the way
//! is convergence-checked: a quantile built on an unconverged CDF value
//! would be silently wrong, so it is reported as an error instead.

use crate::distribution::StudentizedRange;
use crate::error::{StatsError, StatsResult};
use crate::quadrature::{IntegrationResult, QuadOptions};

// Bracket growth and refinement budgets.
const MAX_DOUBLINGS: usize = 64;
const MAX_BISECTIONS: usize = 100;

impl StudentizedRange {
    /// Quantile q with F(q; k, ν) = p, with default accuracy.
    pub fn ppf(&self, p: f64) -> StatsResult<IntegrationResult> {
        self.ppf_with(p, &QuadOptions::default())
    }

    /// Quantile with caller-supplied accuracy.
    ///
    /// In the returned result `value` is the quantile, `error` the final
    /// bracket width and `evaluations` the total CDF integrand evaluations.
    ///
    /// # Errors
    ///
    /// `InvalidProbability` for p outside (0, 1); `NonConvergence` if the
    /// bisection budget runs out or an intermediate CDF fails to converge.
    pub fn ppf_with(&self, p: f64, options: &QuadOptions) -> StatsResult<IntegrationResult> {
        if !(p > 0.0 && p < 1.0) {
            return Err(StatsError::InvalidProbability { value: p });
        }

        let mut evaluations = 0usize;

        // Grow the bracket upward until the CDF crosses p
        let mut lo = 0.0;
        let mut hi = 1.0;
        let mut f_hi = self.checked_cdf(hi, options, &mut evaluations)?;
        let mut doublings = 0;
        while f_hi < p {
            lo = hi;
            hi *= 2.0;
            doublings += 1;
            if doublings > MAX_DOUBLINGS {
                return Err(StatsError::InvalidParameter {
                    name: "p".to_string(),
                    value: p,
                    reason: "no finite quantile bracket found".to_string(),
                });
            }
            f_hi = self.checked_cdf(hi, options, &mut evaluations)?;
        }

        // Bisect; the CDF is monotone so the bracket always contains the root
        let tol = options.atol.max(options.rtol * p);
        for _ in 0..MAX_BISECTIONS {
            let mid = 0.5 * (lo + hi);
            let f_mid = self.checked_cdf(mid, options, &mut evaluations)?;
            if (f_mid - p).abs() <= tol || hi - lo <= options.atol.max(options.rtol * mid) {
                return Ok(IntegrationResult {
                    value: mid,
                    error: hi - lo,
                    converged: true,
                    evaluations,
                });
            }
            if f_mid < p {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        Err(StatsError::NonConvergence {
            iterations: evaluations,
            best: 0.5 * (lo + hi),
            context: format!(
                "quantile search (p = {}, k = {}, nu = {})",
                p,
                self.k(),
                self.nu()
            ),
        })
    }

    /// Inverse survival function: q with S(q; k, ν) = p.
    pub fn isf(&self, p: f64) -> StatsResult<IntegrationResult> {
        self.isf_with(p, &QuadOptions::default())
    }

    /// Inverse survival function with caller-supplied accuracy.
    ///
    /// Solved through the CDF complement, so the smallest resolvable tail
    /// probability is bounded by the rounding of `1 - p`: below about
    /// p = 1e-15 the complement saturates and the result degrades toward
    /// `ppf(1)`'s behavior rather than tracking p.
    pub fn isf_with(&self, p: f64, options: &QuadOptions) -> StatsResult<IntegrationResult> {
        if !(p > 0.0 && p < 1.0) {
            return Err(StatsError::InvalidProbability { value: p });
        }
        self.ppf_with(1.0 - p, options)
    }

    /// CDF value that is safe to use inside the root search.
    fn checked_cdf(
        &self,
        q: f64,
        options: &QuadOptions,
        evaluations: &mut usize,
    ) -> StatsResult<f64> {
        let r = self.cdf_with(q, options)?;
        *evaluations += r.evaluations;
        if !r.converged {
            return Err(StatsError::NonConvergence {
                iterations: *evaluations,
                best: r.value,
                context: format!(
                    "cdf evaluation inside quantile search (q = {}, k = {}, nu = {})",
                    q,
                    self.k(),
                    self.nu()
                ),
            });
        }
        Ok(r.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_probability() {
        let sr = StudentizedRange::new(3, 10.0).unwrap();
        for p in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            assert!(sr.ppf(p).is_err(), "p = {} accepted", p);
            assert!(sr.isf(p).is_err());
        }
    }

    #[test]
    fn test_ppf_tabulated_critical_value() {
        // Tukey critical value q_{0.95}(3, 10) ≈ 3.877
        let sr = StudentizedRange::new(3, 10.0).unwrap();
        let r = sr.ppf(0.95).unwrap();
        assert!(r.converged);
        assert!((r.value - 3.877).abs() < 2e-3, "q = {}", r.value);
    }

    #[test]
    fn test_ppf_k2_reduces_to_student_t() {
        // q_{0.95}(2, 10) = sqrt(2) · t_{0.975}(10) = sqrt(2) · 2.228139 = 3.15108
        let sr = StudentizedRange::new(2, 10.0).unwrap();
        let r = sr.ppf(0.95).unwrap();
        assert!((r.value - 3.151_08).abs() < 2e-3, "q = {}", r.value);
    }

    #[test]
    fn test_ppf_cdf_roundtrip() {
        let sr = StudentizedRange::new(4, 15.0).unwrap();
        for p in [0.05, 0.5, 0.9, 0.99] {
            let q = sr.ppf(p).unwrap().value;
            let back = sr.cdf(q).unwrap().value;
            assert!(
                (back - p).abs() < 1e-6,
                "roundtrip p = {}: cdf(ppf(p)) = {}",
                p,
                back
            );
        }
    }

    #[test]
    fn test_ppf_monotone_in_p() {
        let sr = StudentizedRange::new(3, 20.0).unwrap();
        let mut last = 0.0;
        for p in [0.1, 0.3, 0.5, 0.7, 0.9, 0.99] {
            let q = sr.ppf(p).unwrap().value;
            assert!(q > last);
            last = q;
        }
    }

    #[test]
    fn test_isf_complements_ppf() {
        let sr = StudentizedRange::new(3, 12.0).unwrap();
        let a = sr.isf(0.05).unwrap().value;
        let b = sr.ppf(0.95).unwrap().value;
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_ppf_infinite_nu() {
        // k = 2, nu = inf: F(q) = erf(q/2), so ppf(erf(1)) = 2
        let sr = StudentizedRange::new(2, f64::INFINITY).unwrap();
        let r = sr.ppf(0.842_700_792_949_714_9).unwrap();
        assert!((r.value - 2.0).abs() < 1e-6, "q = {}", r.value);
    }
}
