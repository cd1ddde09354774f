// SPDX-License-Identifier: LGPL-3.0-or-later

//! Core data types: biquad coefficients and state, stream description.

use std::f64::consts::PI;

// ─── Biquad types ──────────────────────────────────────────────────────────

/// Coefficients for a single normalized biquad section.
///
/// Uses the standard cookbook sign convention with `a0` divided out:
/// ```text
///   y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl FilterCoefficients {
    /// Pass-through section: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Return true if these are exactly the identity coefficients.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Magnitude of the frequency response at `freq` Hz for sample rate
    /// `sample_rate`, linear (not dB).
    pub fn magnitude_at(&self, freq: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * freq / sample_rate;
        let (b0, b1, b2) = (self.b0 as f64, self.b1 as f64, self.b2 as f64);
        let (a1, a2) = (self.a1 as f64, self.a2 as f64);

        // H(e^jw) = (b0 + b1 e^-jw + b2 e^-j2w) / (1 + a1 e^-jw + a2 e^-j2w)
        let num_re = b0 + b1 * w.cos() + b2 * (2.0 * w).cos();
        let num_im = -b1 * w.sin() - b2 * (2.0 * w).sin();
        let den_re = 1.0 + a1 * w.cos() + a2 * (2.0 * w).cos();
        let den_im = -a1 * w.sin() - a2 * (2.0 * w).sin();

        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }
}

impl Default for FilterCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Delay memory of one biquad section: the two most recent inputs and
/// outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    pub x1: f32,
    pub x2: f32,
    pub y1: f32,
    pub y2: f32,
}

impl BiquadState {
    /// Run one sample through the difference equation and shift history.
    #[inline]
    pub fn process(&mut self, c: &FilterCoefficients, x: f32) -> f32 {
        let y = c.b0 * x + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    /// Zero the delay memory.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ─── Stream description ────────────────────────────────────────────────────

/// Sample representation announced by the host.
///
/// Only [`SampleFormat::F32Le`] can be processed; the others exist so a
/// host can report what it negotiated and get a typed rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    F32Le,
    F32Be,
    F64Le,
    F64Be,
    S16Le,
    S16Be,
    S24Le,
    S32Le,
    U8,
    /// Anything the host could not map to the variants above.
    Other,
}

/// Channel layout of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Frame-major, channel-minor: `L0 R0 L1 R1 ...`.
    Interleaved,
    /// One contiguous plane per channel.
    NonInterleaved,
}

/// Highest channel count the processor accepts.
pub const MAX_CHANNELS: usize = 8;

/// Stream parameters fixed for one processing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamParams {
    pub sample_rate: u32,
    pub channels: usize,
    pub format: SampleFormat,
    pub layout: Layout,
}

impl StreamParams {
    /// Describe an interleaved stream.
    pub fn interleaved(sample_rate: u32, channels: usize, format: SampleFormat) -> Self {
        Self {
            sample_rate,
            channels,
            format,
            layout: Layout::Interleaved,
        }
    }

    /// Return true for the one representation the processor handles.
    pub fn is_supported_format(&self) -> bool {
        self.format == SampleFormat::F32Le && self.layout == Layout::Interleaved
    }

    /// Return true if rate and channel count are within range.
    pub fn is_valid(&self) -> bool {
        self.sample_rate > 0 && (1..=MAX_CHANNELS).contains(&self.channels)
    }
}
