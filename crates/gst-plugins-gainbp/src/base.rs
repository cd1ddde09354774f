// SPDX-License-Identifier: LGPL-3.0-or-later

//! Caps, pad templates and format mapping for the gain + band-pass element.
//!
//! The element is an `AudioFilter` subclass operating in-place on
//! interleaved F32LE buffers; this module keeps the GStreamer-facing
//! format plumbing out of the element itself.

use gainbp_dsp::types::MAX_CHANNELS;
use gainbp_dsp::{Layout, SampleFormat};
use gstreamer_audio::{AudioFormat, AudioLayout};
use once_cell::sync::Lazy;

/// Highest sample rate advertised in the caps.
pub const MAX_RATE: i32 = 192_000;

/// Interleaved F32LE caps, 1..=192000 Hz, 1..=8 channels.
///
/// Use this in [`AudioFilterImpl::allowed_caps`] and
/// [`ElementImpl::pad_templates`].
pub static F32LE_INTERLEAVED_CAPS: Lazy<gstreamer::Caps> = Lazy::new(|| {
    gstreamer_audio::AudioCapsBuilder::new_interleaved()
        .format(AudioFormat::F32le)
        .rate_range(1..=MAX_RATE)
        .channels_range(1..=MAX_CHANNELS as i32)
        .build()
});

/// Create the src + sink pad templates for the in-place filter.
pub fn f32le_pad_templates() -> Vec<gstreamer::PadTemplate> {
    let caps = &*F32LE_INTERLEAVED_CAPS;

    let src = gstreamer::PadTemplate::new(
        "src",
        gstreamer::PadDirection::Src,
        gstreamer::PadPresence::Always,
        caps,
    )
    .expect("failed to create src pad template");

    let sink = gstreamer::PadTemplate::new(
        "sink",
        gstreamer::PadDirection::Sink,
        gstreamer::PadPresence::Always,
        caps,
    )
    .expect("failed to create sink pad template");

    vec![src, sink]
}

/// Map a negotiated GStreamer audio format onto the processor's format.
pub fn sample_format(format: AudioFormat) -> SampleFormat {
    match format {
        AudioFormat::F32le => SampleFormat::F32Le,
        AudioFormat::F32be => SampleFormat::F32Be,
        AudioFormat::F64le => SampleFormat::F64Le,
        AudioFormat::F64be => SampleFormat::F64Be,
        AudioFormat::S16le => SampleFormat::S16Le,
        AudioFormat::S16be => SampleFormat::S16Be,
        AudioFormat::S24le => SampleFormat::S24Le,
        AudioFormat::S32le => SampleFormat::S32Le,
        AudioFormat::U8 => SampleFormat::U8,
        _ => SampleFormat::Other,
    }
}

/// Map a negotiated GStreamer channel layout onto the processor's layout.
pub fn layout(layout: AudioLayout) -> Layout {
    match layout {
        AudioLayout::Interleaved => Layout::Interleaved,
        _ => Layout::NonInterleaved,
    }
}
