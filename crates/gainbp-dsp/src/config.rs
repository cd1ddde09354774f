// SPDX-License-Identifier: LGPL-3.0-or-later

//! User-facing processor parameters and their domains.

/// Lowest accepted linear gain.
pub const GAIN_MIN: f64 = 0.0;
/// Highest accepted linear gain (+36 dB).
pub const GAIN_MAX: f64 = 64.0;
/// Lowest accepted cutoff frequency in Hz.
pub const CUTOFF_MIN: f64 = 0.0;
/// Highest accepted cutoff frequency in Hz.
pub const CUTOFF_MAX: f64 = 192_000.0;

/// Default linear gain (unity).
pub const DEFAULT_GAIN: f64 = 1.0;
/// Default high-pass cutoff in Hz.
pub const DEFAULT_LOW_CUTOFF_HZ: f64 = 100.0;
/// Default low-pass cutoff in Hz.
pub const DEFAULT_HIGH_CUTOFF_HZ: f64 = 8000.0;

/// Gain and band edges.
///
/// `low_cutoff_hz` is the high-pass cutoff (bottom of the band) and
/// `high_cutoff_hz` the low-pass cutoff (top of the band). Values reaching
/// the processor through its setters are always inside the declared
/// domains; see [`ProcessorConfig::clamped`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessorConfig {
    pub gain: f64,
    pub low_cutoff_hz: f64,
    pub high_cutoff_hz: f64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            gain: DEFAULT_GAIN,
            low_cutoff_hz: DEFAULT_LOW_CUTOFF_HZ,
            high_cutoff_hz: DEFAULT_HIGH_CUTOFF_HZ,
        }
    }
}

impl ProcessorConfig {
    /// Return a copy with every field clamped into its domain.
    ///
    /// Non-finite fields fall back to their default value.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        Self {
            gain: clamp_or(self.gain, GAIN_MIN, GAIN_MAX, defaults.gain),
            low_cutoff_hz: clamp_or(
                self.low_cutoff_hz,
                CUTOFF_MIN,
                CUTOFF_MAX,
                defaults.low_cutoff_hz,
            ),
            high_cutoff_hz: clamp_or(
                self.high_cutoff_hz,
                CUTOFF_MIN,
                CUTOFF_MAX,
                defaults.high_cutoff_hz,
            ),
        }
    }
}

/// Clamp `value` into `[min, max]`, or return `fallback` if it is NaN or
/// infinite.
pub(crate) fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
