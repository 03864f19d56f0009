//! Studentized range distribution.

use crate::error::{StatsError, StatsResult};
use crate::integrand::{
    cdf_integrand, cdf_integrand_inf, cdf_log_const, pdf_integrand, pdf_integrand_inf,
    pdf_log_const, s_window, z_window,
};
use crate::quadrature::{adaptive_quad, IntegrationResult, QuadOptions};
use std::cell::Cell;

/// Studentized range distribution.
///
/// Distribution of the range (max − min) of `k` sample means from a standard
/// normal population, scaled by an independent standard-deviation estimate
/// with `nu` degrees of freedom. `nu = f64::INFINITY` is the known-variance
/// limiting case.
///
/// The CDF is a two-dimensional integral,
///
/// F(q; k, ν) = C(k, ν) ∫₀^∞ s^(ν−1) e^(−νs²/2) ∫ φ(z) [Φ(sq+z) − Φ(z)]^(k−1) dz ds
///
/// evaluated by nested adaptive quadrature over tolerance-scaled windows,
/// with all factors accumulated in the log domain (see `integrand`).
///
/// The type is a plain value: `Copy`, no interior state, safe to share
/// across threads; every evaluation is pure and reentrant.
///
/// # Examples
///
/// ```ignore
/// use studentized_range::StudentizedRange;
///
/// let sr = StudentizedRange::new(3, 10.0).unwrap();
/// let f = sr.cdf(3.0).unwrap();
/// assert!((f.value - 0.8679).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StudentizedRange {
    /// Number of groups (k)
    k: usize,
    /// Degrees of freedom (ν), possibly infinite
    nu: f64,
}

impl StudentizedRange {
    /// Create a new studentized range distribution.
    ///
    /// # Arguments
    ///
    /// * `k` - Number of groups (must be at least 2)
    /// * `nu` - Degrees of freedom (must be positive; `f64::INFINITY` allowed)
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `k < 2` or `nu` is not positive.
    pub fn new(k: usize, nu: f64) -> StatsResult<Self> {
        if k < 2 {
            return Err(StatsError::InvalidParameter {
                name: "k".to_string(),
                value: k as f64,
                reason: "number of groups must be at least 2".to_string(),
            });
        }
        if !(nu > 0.0) {
            return Err(StatsError::InvalidParameter {
                name: "nu".to_string(),
                value: nu,
                reason: "degrees of freedom must be positive".to_string(),
            });
        }
        Ok(Self { k, nu })
    }

    /// Get the number of groups.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Get the degrees of freedom.
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// CDF F(q; k, ν) with default accuracy.
    pub fn cdf(&self, q: f64) -> StatsResult<IntegrationResult> {
        self.cdf_with(q, &QuadOptions::default())
    }

    /// CDF F(q; k, ν) with caller-supplied accuracy.
    ///
    /// The result's `converged` flag reports whether the quadrature met the
    /// requested tolerance; an exhausted budget still returns the best
    /// estimate with `converged = false`, never a silently-wrong value.
    pub fn cdf_with(&self, q: f64, options: &QuadOptions) -> StatsResult<IntegrationResult> {
        validate_q(q)?;
        if q == 0.0 {
            return Ok(IntegrationResult::exact(0.0));
        }
        if q.is_infinite() {
            return Ok(IntegrationResult::exact(1.0));
        }

        let k = self.k;
        let result = if self.nu.is_infinite() {
            let (z_lo, z_hi) = z_window(k, options);
            adaptive_quad(|z| cdf_integrand_inf(z, q, k), z_lo, z_hi, options)
        } else {
            let nu = self.nu;
            let log_c = cdf_log_const(k, nu);
            self.double_integral(|s, z| cdf_integrand(s, z, q, k, nu, log_c), options)?
        };

        if !result.value.is_finite() {
            return Err(self.instability("cdf", q));
        }
        Ok(IntegrationResult {
            value: result.value.clamp(0.0, 1.0),
            ..result
        })
    }

    /// Survival function 1 − F(q; k, ν) with default accuracy.
    pub fn sf(&self, q: f64) -> StatsResult<IntegrationResult> {
        self.sf_with(q, &QuadOptions::default())
    }

    /// Survival function with caller-supplied accuracy.
    ///
    /// For small CDF values the complement is exact; once the CDF exceeds
    /// 3/4 the tail mass is integrated directly, ∫_q^∞ f(t) dt under the
    /// half-line substitution t = q + x/(1−x), so large-q survival values
    /// keep full relative precision instead of cancelling against 1.
    pub fn sf_with(&self, q: f64, options: &QuadOptions) -> StatsResult<IntegrationResult> {
        validate_q(q)?;
        if q == 0.0 {
            return Ok(IntegrationResult::exact(1.0));
        }
        if q.is_infinite() {
            return Ok(IntegrationResult::exact(0.0));
        }

        let cdf = self.cdf_with(q, options)?;
        if cdf.value <= 0.75 {
            return Ok(IntegrationResult {
                value: (1.0 - cdf.value).clamp(0.0, 1.0),
                ..cdf
            });
        }

        let pdf_options = tighter(options);
        let failed = Cell::new(false);
        let sub_converged = Cell::new(true);
        let evaluations = Cell::new(cdf.evaluations);
        let tail = adaptive_quad(
            |x: f64| {
                let u = 1.0 - x;
                if u <= 0.0 {
                    return 0.0;
                }
                let t = q + x / u;
                match self.pdf_with(t, &pdf_options) {
                    Ok(r) => {
                        evaluations.set(evaluations.get() + r.evaluations);
                        if !r.converged {
                            sub_converged.set(false);
                        }
                        r.value / (u * u)
                    }
                    Err(_) => {
                        failed.set(true);
                        0.0
                    }
                }
            },
            0.0,
            1.0,
            options,
        );
        if failed.get() {
            return Err(self.instability("sf", q));
        }
        Ok(IntegrationResult {
            value: tail.value.clamp(0.0, 1.0),
            error: tail.error,
            converged: tail.converged && sub_converged.get(),
            evaluations: evaluations.get(),
        })
    }

    /// PDF f(q; k, ν) with default accuracy.
    pub fn pdf(&self, q: f64) -> StatsResult<IntegrationResult> {
        self.pdf_with(q, &QuadOptions::default())
    }

    /// PDF f(q; k, ν) with caller-supplied accuracy.
    ///
    /// Uses the dedicated density integral (never a CDF difference, which
    /// would amplify quadrature noise):
    ///
    /// f(q) = C'(k, ν) ∫₀^∞ s^ν e^(−νs²/2) ∫ φ(z) φ(sq+z) [Φ(sq+z) − Φ(z)]^(k−2) dz ds
    pub fn pdf_with(&self, q: f64, options: &QuadOptions) -> StatsResult<IntegrationResult> {
        validate_q(q)?;
        if q.is_infinite() {
            return Ok(IntegrationResult::exact(0.0));
        }

        let k = self.k;
        let result = if self.nu.is_infinite() {
            let (z_lo, z_hi) = z_window(k, options);
            adaptive_quad(|z| pdf_integrand_inf(z, q, k), z_lo, z_hi, options)
        } else {
            let nu = self.nu;
            let log_c = pdf_log_const(k, nu);
            self.double_integral(|s, z| pdf_integrand(s, z, q, k, nu, log_c), options)?
        };

        if !result.value.is_finite() {
            return Err(self.instability("pdf", q));
        }
        Ok(IntegrationResult {
            value: result.value.max(0.0),
            ..result
        })
    }

    /// Outer (s) integration driving the inner (z) integration.
    ///
    /// The inner integral runs one decade tighter than the caller's
    /// tolerance so its error does not dominate the outer estimate. Inner
    /// convergence flags and error estimates are accumulated and folded
    /// into the combined result; any non-finite integrand value aborts with
    /// `NumericalInstability`.
    fn double_integral<G>(
        &self,
        integrand: G,
        options: &QuadOptions,
    ) -> StatsResult<IntegrationResult>
    where
        G: Fn(f64, f64) -> f64,
    {
        let (z_lo, z_hi) = z_window(self.k, options);
        let (s_lo, s_hi) = s_window(self.nu, options);
        let inner_options = tighter(options);

        let inner_converged = Cell::new(true);
        let inner_error = Cell::new(0.0_f64);
        let evaluations = Cell::new(0_usize);
        let nonfinite = Cell::new(false);

        let outer = adaptive_quad(
            |s: f64| {
                let inner = adaptive_quad(
                    |z: f64| {
                        let v = integrand(s, z);
                        if !v.is_finite() {
                            nonfinite.set(true);
                            return 0.0;
                        }
                        v
                    },
                    z_lo,
                    z_hi,
                    &inner_options,
                );
                evaluations.set(evaluations.get() + inner.evaluations);
                if !inner.converged {
                    inner_converged.set(false);
                }
                inner_error.set(inner_error.get().max(inner.error));
                inner.value
            },
            s_lo,
            s_hi,
            options,
        );

        if nonfinite.get() {
            return Err(StatsError::NumericalInstability {
                context: format!(
                    "studentized range integrand (k = {}, nu = {})",
                    self.k, self.nu
                ),
            });
        }
        Ok(IntegrationResult {
            value: outer.value,
            error: outer.error + inner_error.get() * (s_hi - s_lo),
            converged: outer.converged && inner_converged.get(),
            evaluations: evaluations.get(),
        })
    }

    fn instability(&self, operation: &str, q: f64) -> StatsError {
        StatsError::NumericalInstability {
            context: format!(
                "studentized range {}(q = {}, k = {}, nu = {})",
                operation, q, self.k, self.nu
            ),
        }
    }
}

/// One decade tighter than the caller's tolerances, same budget.
fn tighter(options: &QuadOptions) -> QuadOptions {
    QuadOptions {
        atol: options.atol * 1e-1,
        rtol: options.rtol * 1e-1,
        limit: options.limit,
    }
}

fn validate_q(q: f64) -> StatsResult<()> {
    if q.is_nan() || q < 0.0 {
        return Err(StatsError::InvalidParameter {
            name: "q".to_string(),
            value: q,
            reason: "must be a nonnegative real".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation() {
        assert!(StudentizedRange::new(2, 1.0).is_ok());
        assert!(StudentizedRange::new(40, 1000.0).is_ok());
        assert!(StudentizedRange::new(3, f64::INFINITY).is_ok());

        assert!(StudentizedRange::new(1, 10.0).is_err());
        assert!(StudentizedRange::new(0, 10.0).is_err());
        assert!(StudentizedRange::new(3, 0.0).is_err());
        assert!(StudentizedRange::new(3, -2.0).is_err());
        assert!(StudentizedRange::new(3, f64::NAN).is_err());
    }

    #[test]
    fn test_invalid_q() {
        let sr = StudentizedRange::new(3, 10.0).unwrap();
        assert!(sr.cdf(-0.5).is_err());
        assert!(sr.cdf(f64::NAN).is_err());
        assert!(sr.pdf(-1.0).is_err());
        assert!(sr.sf(-1.0).is_err());
    }

    #[test]
    fn test_cdf_endpoints() {
        let sr = StudentizedRange::new(3, 10.0).unwrap();
        let r = sr.cdf(0.0).unwrap();
        assert!(r.value == 0.0 && r.converged);
        let r = sr.cdf(f64::INFINITY).unwrap();
        assert!(r.value == 1.0 && r.converged);
        // Large finite q is essentially 1
        let r = sr.cdf(50.0).unwrap();
        assert!(r.converged);
        assert!((r.value - 1.0).abs() < 1e-7, "cdf(50) = {}", r.value);
    }

    #[test]
    fn test_cdf_tabulated_value() {
        // High-precision reference: F(3.0; 3, 10) = 0.865016584810436,
        // consistent with the tabulated critical value F(3.877; 3, 10) = 0.95
        let sr = StudentizedRange::new(3, 10.0).unwrap();
        let r = sr.cdf(3.0).unwrap();
        assert!(r.converged);
        assert!(
            (r.value - 0.865_016_584_810_436).abs() < 1e-7,
            "cdf = {}",
            r.value
        );
    }

    #[test]
    fn test_cdf_k2_reduces_to_student_t() {
        // For k = 2: F(q; 2, nu) = 2 F_t(q/sqrt(2); nu) − 1.
        // F_t(1; 10) = 0.8295534, so F(sqrt(2); 2, 10) = 0.6591069.
        let sr = StudentizedRange::new(2, 10.0).unwrap();
        let r = sr.cdf(std::f64::consts::SQRT_2).unwrap();
        assert!(r.converged);
        assert!((r.value - 0.659_106_9).abs() < 5e-6, "cdf = {}", r.value);
    }

    #[test]
    fn test_cdf_infinite_nu_closed_form() {
        // For k = 2, nu = inf: F(q) = erf(q/2); erf(1) = 0.8427007929497149
        let sr = StudentizedRange::new(2, f64::INFINITY).unwrap();
        let r = sr.cdf(2.0).unwrap();
        assert!(r.converged);
        assert!(
            (r.value - 0.842_700_792_949_714_9).abs() < 1e-8,
            "cdf = {}",
            r.value
        );
    }

    #[test]
    fn test_cdf_monotone_in_q() {
        let sr = StudentizedRange::new(4, 8.0).unwrap();
        let mut last = 0.0;
        for q in [0.25, 0.5, 1.0, 2.0, 3.0, 4.5, 6.0] {
            let v = sr.cdf(q).unwrap().value;
            assert!(v >= last, "cdf not monotone at q = {}", q);
            assert!((0.0..=1.0).contains(&v));
            last = v;
        }
    }

    #[test]
    fn test_cdf_extreme_parameters_stable() {
        // Regression guard: naive evaluation overflows for these parameters
        let sr = StudentizedRange::new(40, 1000.0).unwrap();
        let mut last = 0.0;
        for q in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0] {
            let r = sr.cdf(q).unwrap();
            assert!(r.converged, "not converged at q = {}", q);
            assert!(r.value.is_finite());
            assert!((0.0..=1.0).contains(&r.value));
            assert!(r.value >= last);
            last = r.value;
        }
        // The distribution's mass sits in a sensible place
        assert!(sr.cdf(6.0).unwrap().value > 0.9);
        assert!(sr.cdf(1.0).unwrap().value < 1e-6);
    }

    #[test]
    fn test_finite_nu_approaches_infinite_nu() {
        let inf = StudentizedRange::new(3, f64::INFINITY).unwrap();
        let f_inf = inf.cdf(3.0).unwrap().value;

        let large = StudentizedRange::new(3, 1e6).unwrap();
        let f_large = large.cdf(3.0).unwrap().value;
        assert!(
            (f_large - f_inf).abs() < 1e-5,
            "nu=1e6: {} vs inf: {}",
            f_large,
            f_inf
        );

        let ten_k = StudentizedRange::new(3, 1e4).unwrap();
        let f_ten_k = ten_k.cdf(3.0).unwrap().value;
        assert!((f_ten_k - f_inf).abs() < 1e-4);
    }

    #[test]
    fn test_sf_complementarity() {
        let sr = StudentizedRange::new(3, 10.0).unwrap();
        for q in [0.5, 1.5, 3.0, 4.5] {
            let cdf = sr.cdf(q).unwrap().value;
            let sf = sr.sf(q).unwrap().value;
            assert!(
                (cdf + sf - 1.0).abs() < 1e-6,
                "q = {}: cdf + sf = {}",
                q,
                cdf + sf
            );
        }
    }

    #[test]
    fn test_sf_large_q_no_cancellation() {
        // sf must keep relative precision where 1 − cdf is pure noise.
        // For k = 2: S(q) = 2 F_t(-q/sqrt(2); nu);
        // S(10·sqrt(2); 2, 10) = 2 F_t(-10; 10) = 2 · 7.947766e-7 ≈ 1.58955e-6
        let sr = StudentizedRange::new(2, 10.0).unwrap();
        let r = sr.sf(10.0 * std::f64::consts::SQRT_2).unwrap();
        assert!(r.value > 0.0);
        assert!(
            (r.value / 1.589_553e-6 - 1.0).abs() < 1e-2,
            "sf = {}",
            r.value
        );
    }

    #[test]
    fn test_pdf_nonnegative_and_known_value() {
        // For k = 2: f(q; 2, nu) = sqrt(2) f_t(q/sqrt(2); nu);
        // f(sqrt(2); 2, 10) = sqrt(2) · f_t(1; 10) = 0.325775
        let sr = StudentizedRange::new(2, 10.0).unwrap();
        let r = sr.pdf(std::f64::consts::SQRT_2).unwrap();
        assert!(r.converged);
        assert!((r.value - 0.325_775).abs() < 1e-4, "pdf = {}", r.value);

        for q in [0.1, 1.0, 2.5, 6.0] {
            assert!(sr.pdf(q).unwrap().value >= 0.0);
        }
    }

    #[test]
    fn test_pdf_infinite_nu_closed_form() {
        // For k = 2, nu = inf: f(q) = exp(-q²/4)/sqrt(pi);
        // f(2) = e^(-1)/sqrt(pi) = 0.20755375
        let sr = StudentizedRange::new(2, f64::INFINITY).unwrap();
        let r = sr.pdf(2.0).unwrap();
        assert!(r.converged);
        assert!((r.value - 0.207_553_75).abs() < 1e-7, "pdf = {}", r.value);
    }

    #[test]
    fn test_pdf_integrates_to_one() {
        let sr = StudentizedRange::new(3, 10.0).unwrap();
        let pdf_options = QuadOptions {
            atol: 1e-8,
            rtol: 1e-7,
            limit: 40,
        };
        let outer = QuadOptions {
            atol: 1e-6,
            rtol: 1e-6,
            limit: 30,
        };
        let r = adaptive_quad(
            |q: f64| sr.pdf_with(q, &pdf_options).map(|r| r.value).unwrap_or(0.0),
            0.0,
            15.0,
            &outer,
        );
        assert!((r.value - 1.0).abs() < 1e-3, "integral = {}", r.value);
    }
}
