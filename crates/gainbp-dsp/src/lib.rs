// SPDX-License-Identifier: LGPL-3.0-or-later

//! # gainbp-dsp
//!
//! In-place gain + band-pass processing for interleaved f32 audio.
//!
//! Each channel runs through a second-order high-pass section, then a
//! second-order low-pass section (together a band-pass), then a linear
//! gain. It includes:
//!
//! - **Coefficient design**: RBJ cookbook low-pass / high-pass biquads
//! - **Biquad**: direct-form I section with its own delay memory
//! - **Filter bank**: one HPF + LPF pair per channel
//! - **Processor**: [`BandPassGain`], the stream-level state machine with
//!   lazy coefficient redesign
//!
//! ## Example
//!
//! ```
//! use gainbp_dsp::{BandPassGain, SampleFormat, StreamParams};
//!
//! let mut proc = BandPassGain::new();
//! proc.configure_stream(StreamParams::interleaved(48000, 2, SampleFormat::F32Le))
//!     .unwrap();
//! proc.set_gain(2.0);
//!
//! let mut buf = [0.5f32, -0.5, 0.25, -0.25];
//! proc.process(&mut buf).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod filters;
pub mod processor;
pub mod types;

pub use config::ProcessorConfig;
pub use error::{Error, Result};
pub use processor::{BandPassGain, ProcessorState, Redesign};
pub use types::{FilterCoefficients, Layout, SampleFormat, StreamParams};
