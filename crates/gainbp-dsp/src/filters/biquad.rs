// SPDX-License-Identifier: LGPL-3.0-or-later

//! A single biquad section: coefficients paired with their delay memory.

use crate::types::{BiquadState, FilterCoefficients};

/// One second-order section.
///
/// Coefficients are replaced wholesale; call [`reset`](Biquad::reset)
/// afterwards so old memory is never combined with new poles.
/// [`FilterBank`](super::bank::FilterBank) does this for every channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Biquad {
    pub coeffs: FilterCoefficients,
    pub state: BiquadState,
}

impl Biquad {
    /// Create a section with the given coefficients and zeroed memory.
    pub fn new(coeffs: FilterCoefficients) -> Self {
        Self {
            coeffs,
            state: BiquadState::default(),
        }
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        self.state.process(&self.coeffs, x)
    }

    /// Process a single-channel block in place.
    pub fn process_inplace(&mut self, buf: &mut [f32]) {
        for sample in buf.iter_mut() {
            *sample = self.state.process(&self.coeffs, *sample);
        }
    }

    /// Clear the delay memory. Coefficients are kept.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}
