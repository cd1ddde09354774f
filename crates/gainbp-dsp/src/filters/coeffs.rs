// SPDX-License-Identifier: LGPL-3.0-or-later

//! Biquad coefficient calculation using the RBJ Audio EQ Cookbook.
//!
//! Design runs in f64 and the result is rounded to f32, the processing
//! precision. Cutoffs that cannot be designed safely produce the identity
//! section instead of an error.

use std::f64::consts::PI;

use crate::types::FilterCoefficients;

/// Quality factor used for both stages (second-order Butterworth).
pub const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Fraction of the sample rate above which no filter is designed.
pub const NYQUIST_LIMIT: f64 = 0.49;

/// Supported biquad responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// Second-order low-pass filter.
    Lowpass,
    /// Second-order high-pass filter.
    Highpass,
}

/// Calculate normalized biquad coefficients.
///
/// # Parameters
///
/// - `filter_type` -- low-pass or high-pass
/// - `sample_rate` -- sample rate in Hz
/// - `freq` -- cutoff frequency in Hz
/// - `q` -- quality factor (must be > 0)
///
/// Returns [`FilterCoefficients::IDENTITY`] when `freq <= 0`,
/// `freq >= 0.49 * sample_rate`, or when any input is not a usable number
/// (non-positive rate, non-positive or non-finite Q, NaN cutoff).
pub fn calc_biquad_coeffs(
    filter_type: FilterType,
    sample_rate: f64,
    freq: f64,
    q: f64,
) -> FilterCoefficients {
    if !is_designable(sample_rate, freq) || !(q > 0.0 && q.is_finite()) {
        return FilterCoefficients::IDENTITY;
    }

    let w0 = 2.0 * PI * freq / sample_rate;
    let cos_w0 = w0.cos();
    let alpha = w0.sin() / (2.0 * q);

    let (b0, b1, b2) = match filter_type {
        FilterType::Lowpass => {
            let b1 = 1.0 - cos_w0;
            (b1 * 0.5, b1, b1 * 0.5)
        }
        FilterType::Highpass => {
            let b0 = (1.0 + cos_w0) * 0.5;
            (b0, -(1.0 + cos_w0), b0)
        }
    };
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha;

    FilterCoefficients {
        b0: (b0 / a0) as f32,
        b1: (b1 / a0) as f32,
        b2: (b2 / a0) as f32,
        a1: (a1 / a0) as f32,
        a2: (a2 / a0) as f32,
    }
}

/// Return true if `freq` lies strictly inside `(0, 0.49 * sample_rate)`.
pub fn is_designable(sample_rate: f64, freq: f64) -> bool {
    freq > 0.0 && freq < sample_rate * NYQUIST_LIMIT
}
