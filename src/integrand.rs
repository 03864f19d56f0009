//! Log-domain integrand evaluation for the studentized range distribution.
//!
//! The CDF integrand
//!
//!   g(s, z) = s^(ν−1) · e^(−νs²/2) · φ(z) · [Φ(sq + z) − Φ(z)]^(k−1)
//!
//! and its normalization C(k, ν) = k ν^(ν/2) / (Γ(ν/2) 2^(ν/2−1)) both leave
//! the representable double range for realistic parameters (ν in the
//! thousands, k in the dozens). Every factor is therefore accumulated as a
//! logarithm and the constant's logarithm is folded into the exponent, so a
//! single final exponentiation happens on a bounded value; underflow clamps
//! to zero instead of propagating NaN or infinity.

use crate::quadrature::QuadOptions;
use crate::special::{lgamma, ln_norm_pdf, norm_cdf_diff};
use std::f64::consts::LN_2;

// exp() underflows to a subnormal around e^-745; below that the integrand
// contributes nothing.
const EXP_UNDERFLOW: f64 = -745.0;

#[inline]
fn exp_or_zero(log: f64) -> f64 {
    if log < EXP_UNDERFLOW {
        0.0
    } else {
        log.exp()
    }
}

/// log C(k, ν) for the CDF: ln k + (ν/2) ln ν − ln Γ(ν/2) − (ν/2 − 1) ln 2.
pub(crate) fn cdf_log_const(k: usize, nu: f64) -> f64 {
    (k as f64).ln() + 0.5 * nu * nu.ln() - lgamma(0.5 * nu) - (0.5 * nu - 1.0) * LN_2
}

/// log C'(k, ν) for the PDF: the CDF constant with an extra factor (k − 1).
pub(crate) fn pdf_log_const(k: usize, nu: f64) -> f64 {
    cdf_log_const(k, nu) + ((k - 1) as f64).ln()
}

/// CDF integrand at (s, z) with the log-normalization folded in.
pub(crate) fn cdf_integrand(s: f64, z: f64, q: f64, k: usize, nu: f64, log_const: f64) -> f64 {
    if s <= 0.0 {
        return 0.0;
    }
    let delta = norm_cdf_diff(z, s * q + z);
    if delta <= 0.0 {
        return 0.0;
    }
    let log = log_const + (nu - 1.0) * s.ln() - 0.5 * nu * s * s
        + ln_norm_pdf(z)
        + (k as f64 - 1.0) * delta.ln();
    exp_or_zero(log)
}

/// CDF integrand for ν = +∞: k · φ(z) · [Φ(q + z) − Φ(z)]^(k−1).
pub(crate) fn cdf_integrand_inf(z: f64, q: f64, k: usize) -> f64 {
    let delta = norm_cdf_diff(z, q + z);
    if delta <= 0.0 {
        return 0.0;
    }
    let log = (k as f64).ln() + ln_norm_pdf(z) + (k as f64 - 1.0) * delta.ln();
    exp_or_zero(log)
}

/// PDF integrand at (s, z) with the log-normalization folded in.
///
/// f(q) = C'(k, ν) ∫∫ s^ν e^(−νs²/2) φ(z) φ(sq + z) [Φ(sq + z) − Φ(z)]^(k−2).
/// For k = 2 the bracket power vanishes and the Δ factor is skipped entirely
/// (Δ = 0 is then a legitimate point, not a zero of the integrand).
pub(crate) fn pdf_integrand(s: f64, z: f64, q: f64, k: usize, nu: f64, log_const: f64) -> f64 {
    if s <= 0.0 {
        return 0.0;
    }
    let mut log = log_const + nu * s.ln() - 0.5 * nu * s * s
        + ln_norm_pdf(z)
        + ln_norm_pdf(s * q + z);
    if k > 2 {
        let delta = norm_cdf_diff(z, s * q + z);
        if delta <= 0.0 {
            return 0.0;
        }
        log += (k as f64 - 2.0) * delta.ln();
    }
    exp_or_zero(log)
}

/// PDF integrand for ν = +∞: k(k−1) · φ(z) · φ(q + z) · [Φ(q+z) − Φ(z)]^(k−2).
pub(crate) fn pdf_integrand_inf(z: f64, q: f64, k: usize) -> f64 {
    let mut log =
        (k as f64).ln() + ((k - 1) as f64).ln() + ln_norm_pdf(z) + ln_norm_pdf(q + z);
    if k > 2 {
        let delta = norm_cdf_diff(z, q + z);
        if delta <= 0.0 {
            return 0.0;
        }
        log += (k as f64 - 2.0) * delta.ln();
    }
    exp_or_zero(log)
}

/// Gaussian tail half-width for the requested tolerance.
fn tail_halfwidth(options: &QuadOptions) -> f64 {
    // Truncate where the Gaussian tail mass falls two decades below the
    // absolute tolerance; Φ vanishes identically beyond |z| = 38.
    let eps = 1e-2 * options.atol.min(options.rtol).max(1e-300);
    (-2.0 * eps.ln()).sqrt().clamp(7.0, 38.0)
}

/// Integration window for z.
///
/// The integrand is bounded by φ(z), so a tolerance-scaled half-width
/// suffices; the left end is widened by √(2 ln k) because the k−1 bracket
/// power shifts the integrand's mass toward negative z as k grows.
pub(crate) fn z_window(k: usize, options: &QuadOptions) -> (f64, f64) {
    let w = tail_halfwidth(options);
    (-(w + (2.0 * (k as f64).ln()).sqrt()), w)
}

/// Integration window for s.
///
/// νs² follows a χ²_ν distribution, so the effective range of s comes from
/// Wilson–Hilferty χ² quantiles at the same tail level used for z: the
/// window collapses toward s = 1 as ν grows and the lower end clamps to 0
/// for small ν (the s = 0 endpoint itself is never evaluated by the
/// interior-node quadrature).
pub(crate) fn s_window(nu: f64, options: &QuadOptions) -> (f64, f64) {
    let w = tail_halfwidth(options);
    let h = 2.0 / (9.0 * nu);
    let spread = w * h.sqrt();
    let lo_base = 1.0 - h - spread;
    let hi_base = 1.0 - h + spread;
    let lo = if lo_base <= 0.0 { 0.0 } else { lo_base.powf(1.5) };
    (lo, hi_base.powf(1.5))
}
