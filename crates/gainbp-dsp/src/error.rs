// SPDX-License-Identifier: LGPL-3.0-or-later

//! Error types for stream configuration and buffer processing.

use thiserror::Error;

use crate::types::{Layout, SampleFormat};

/// Result type for processor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`BandPassGain`](crate::BandPassGain).
///
/// Degenerate filter parameters are never errors: cutoffs outside the
/// designable range turn the stage into a pass-through.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The stream offered a sample representation other than interleaved
    /// little-endian f32. Recoverable by reconfiguring.
    #[error("unsupported sample format {format:?} ({layout:?}), expected interleaved F32LE")]
    UnsupportedFormat { format: SampleFormat, layout: Layout },

    /// Sample rate is zero or the channel count is outside the supported range.
    #[error("invalid stream parameters: {sample_rate} Hz, {channels} channels")]
    InvalidStream { sample_rate: u32, channels: usize },

    /// Buffer sample count is not a whole number of frames. The buffer is
    /// left untouched.
    #[error("malformed buffer: {samples} samples is not a multiple of {channels} channels")]
    MalformedBuffer { samples: usize, channels: usize },

    /// Processing was requested before a stream was configured.
    #[error("processor has no configured stream")]
    NotConfigured,
}
