// SPDX-License-Identifier: LGPL-3.0-or-later

//! Filter bank: one high-pass and one low-pass section per channel.
//!
//! Every channel shares the same coefficients but keeps its own delay
//! memory, so channels never leak into each other.

use super::biquad::Biquad;
use crate::types::{BiquadState, FilterCoefficients};

/// Per-channel HPF -> LPF cascade.
///
/// # Examples
///
/// ```
/// use gainbp_dsp::filters::bank::FilterBank;
/// use gainbp_dsp::filters::coeffs::{BUTTERWORTH_Q, FilterType, calc_biquad_coeffs};
///
/// let mut bank = FilterBank::new(2);
/// bank.set_coefficients(
///     calc_biquad_coeffs(FilterType::Highpass, 48000.0, 100.0, BUTTERWORTH_Q),
///     calc_biquad_coeffs(FilterType::Lowpass, 48000.0, 8000.0, BUTTERWORTH_Q),
/// );
/// bank.reset_all();
///
/// let left = bank.process_sample(0, 1.0);
/// let right = bank.process_sample(1, 1.0);
/// assert_eq!(left, right);
/// ```
#[derive(Debug, Clone)]
pub struct FilterBank {
    hpf: Vec<Biquad>,
    lpf: Vec<Biquad>,
    hpf_coeffs: FilterCoefficients,
    lpf_coeffs: FilterCoefficients,
}

impl FilterBank {
    /// Create a bank for `channels` channels with pass-through sections.
    pub fn new(channels: usize) -> Self {
        Self {
            hpf: vec![Biquad::default(); channels],
            lpf: vec![Biquad::default(); channels],
            hpf_coeffs: FilterCoefficients::IDENTITY,
            lpf_coeffs: FilterCoefficients::IDENTITY,
        }
    }

    /// Return the number of channels.
    pub fn channels(&self) -> usize {
        self.hpf.len()
    }

    /// Return true if the bank has no channels.
    pub fn is_empty(&self) -> bool {
        self.hpf.is_empty()
    }

    /// Grow or shrink to `channels`.
    ///
    /// Added channels get zeroed memory and the current coefficients.
    pub fn resize(&mut self, channels: usize) {
        self.hpf.resize(channels, Biquad::new(self.hpf_coeffs));
        self.lpf.resize(channels, Biquad::new(self.lpf_coeffs));
    }

    /// Apply the same coefficients to every channel. Memory is untouched.
    pub fn set_coefficients(&mut self, hpf: FilterCoefficients, lpf: FilterCoefficients) {
        self.hpf_coeffs = hpf;
        self.lpf_coeffs = lpf;
        for bq in &mut self.hpf {
            bq.coeffs = hpf;
        }
        for bq in &mut self.lpf {
            bq.coeffs = lpf;
        }
    }

    /// Zero the memory of every section. Coefficients are kept.
    pub fn reset_all(&mut self) {
        for bq in self.hpf.iter_mut().chain(self.lpf.iter_mut()) {
            bq.reset();
        }
    }

    /// Current high-pass coefficients.
    pub fn hpf_coefficients(&self) -> FilterCoefficients {
        self.hpf_coeffs
    }

    /// Current low-pass coefficients.
    pub fn lpf_coefficients(&self) -> FilterCoefficients {
        self.lpf_coeffs
    }

    /// `(hpf, lpf)` memory of `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= channels()`.
    pub fn state(&self, channel: usize) -> (BiquadState, BiquadState) {
        (self.hpf[channel].state, self.lpf[channel].state)
    }

    /// Run one sample of `channel` through its HPF then its LPF.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= channels()`.
    #[inline]
    pub fn process_sample(&mut self, channel: usize, x: f32) -> f32 {
        let y = self.hpf[channel].process(x);
        self.lpf[channel].process(y)
    }
}
