// SPDX-License-Identifier: LGPL-3.0-or-later

//! GStreamer gain + band-pass plugin.
//!
//! Registers a single element backed by [`gainbp_dsp::BandPassGain`]:
//!
//! | Element  | Description                                          |
//! |----------|------------------------------------------------------|
//! | `gainbp` | High-pass + low-pass (band-pass) and linear gain     |
//!
//! ```text
//! gst-launch-1.0 audiotestsrc ! audioconvert ! gainbp lowcut=300 highcut=3400 gain=2 ! autoaudiosink
//! ```

use gstreamer::glib;
use gstreamer::prelude::*;

mod base;
mod gainbp;

glib::wrapper! {
    /// Public GLib type for the gain + band-pass element.
    pub struct GainBp(ObjectSubclass<gainbp::GainBp>)
        @extends gstreamer_audio::AudioFilter, gstreamer_base::BaseTransform,
                 gstreamer::Element, gstreamer::Object;
}

/// GStreamer plugin entry point.
fn plugin_init(plugin: &gstreamer::Plugin) -> Result<(), glib::BoolError> {
    gstreamer::Element::register(
        Some(plugin),
        "gainbp",
        gstreamer::Rank::NONE,
        GainBp::static_type(),
    )
}

gstreamer::plugin_define!(
    gainbp,
    env!("CARGO_PKG_DESCRIPTION"),
    plugin_init,
    concat!(env!("CARGO_PKG_VERSION")),
    "LGPL",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_REPOSITORY"),
    "2026-10-19"
);
