// SPDX-License-Identifier: LGPL-3.0-or-later

//! GStreamer element wrapping [`gainbp_dsp::BandPassGain`].
//!
//! High-pass + low-pass (band-pass) and linear gain as an `AudioFilter` /
//! `BaseTransform` element operating in-place on interleaved F32LE audio.
//! Properties are mutable while playing; a cutoff change is picked up at
//! the start of the next buffer.

use gstreamer::glib;
use gstreamer::prelude::*;
use gstreamer::subclass::prelude::*;
use gstreamer_audio::subclass::prelude::*;

use gainbp_dsp::config::{
    CUTOFF_MAX, CUTOFF_MIN, DEFAULT_GAIN, DEFAULT_HIGH_CUTOFF_HZ, DEFAULT_LOW_CUTOFF_HZ, GAIN_MAX,
    GAIN_MIN,
};
use gainbp_dsp::{BandPassGain, StreamParams};

use crate::base;
use once_cell::sync::Lazy;
use std::sync::Mutex;

static CAT: Lazy<gstreamer::DebugCategory> = Lazy::new(|| {
    gstreamer::DebugCategory::new(
        "gainbp",
        gstreamer::DebugColorFlags::empty(),
        Some("Gain + band-pass filter"),
    )
});

const PROP_GAIN: &str = "gain";
const PROP_LOWCUT: &str = "lowcut";
const PROP_HIGHCUT: &str = "highcut";

const SAMPLE_BYTES: usize = std::mem::size_of::<f32>();

/// GStreamer gain + band-pass element backed by `gainbp_dsp`.
#[derive(Default)]
pub struct GainBp {
    processor: Mutex<BandPassGain>,
}

#[glib::object_subclass]
impl ObjectSubclass for GainBp {
    const NAME: &'static str = "GstGainBp";
    type Type = super::GainBp;
    type ParentType = gstreamer_audio::AudioFilter;
}

impl ObjectImpl for GainBp {
    fn properties() -> &'static [glib::ParamSpec] {
        static PROPERTIES: Lazy<Vec<glib::ParamSpec>> = Lazy::new(|| {
            vec![
                glib::ParamSpecDouble::builder(PROP_GAIN)
                    .nick("Gain")
                    .blurb("Linear gain applied after filtering")
                    .minimum(GAIN_MIN)
                    .maximum(GAIN_MAX)
                    .default_value(DEFAULT_GAIN)
                    .mutable_playing()
                    .build(),
                glib::ParamSpecDouble::builder(PROP_LOWCUT)
                    .nick("Low cutoff")
                    .blurb("High-pass cutoff frequency in Hz (0 disables)")
                    .minimum(CUTOFF_MIN)
                    .maximum(CUTOFF_MAX)
                    .default_value(DEFAULT_LOW_CUTOFF_HZ)
                    .mutable_playing()
                    .build(),
                glib::ParamSpecDouble::builder(PROP_HIGHCUT)
                    .nick("High cutoff")
                    .blurb("Low-pass cutoff frequency in Hz (0 disables)")
                    .minimum(CUTOFF_MIN)
                    .maximum(CUTOFF_MAX)
                    .default_value(DEFAULT_HIGH_CUTOFF_HZ)
                    .mutable_playing()
                    .build(),
            ]
        });
        PROPERTIES.as_ref()
    }

    fn set_property(&self, _id: usize, value: &glib::Value, pspec: &glib::ParamSpec) {
        let mut processor = self.processor.lock().expect("mutex poisoned");
        let v: f64 = value.get().expect("type checked");
        match pspec.name() {
            PROP_GAIN => processor.set_gain(v),
            PROP_LOWCUT => processor.set_low_cutoff_hz(v),
            PROP_HIGHCUT => processor.set_high_cutoff_hz(v),
            name => panic!("unknown property {}", name),
        }
        gstreamer::debug!(CAT, imp = self, "{} set to {}", pspec.name(), v);
    }

    fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
        let processor = self.processor.lock().expect("mutex poisoned");
        match pspec.name() {
            PROP_GAIN => processor.gain().to_value(),
            PROP_LOWCUT => processor.low_cutoff_hz().to_value(),
            PROP_HIGHCUT => processor.high_cutoff_hz().to_value(),
            name => panic!("unknown property {}", name),
        }
    }
}

impl GstObjectImpl for GainBp {}

impl ElementImpl for GainBp {
    fn metadata() -> Option<&'static gstreamer::subclass::ElementMetadata> {
        static ELEMENT_METADATA: Lazy<gstreamer::subclass::ElementMetadata> = Lazy::new(|| {
            gstreamer::subclass::ElementMetadata::new(
                "Gain + Band-pass Filter",
                "Filter/Effect/Audio",
                "Applies high-pass + low-pass (band-pass) and gain to F32LE audio",
                "gainbp developers <noreply@gainbp.dev>",
            )
        });
        Some(&*ELEMENT_METADATA)
    }

    fn pad_templates() -> &'static [gstreamer::PadTemplate] {
        static PAD_TEMPLATES: Lazy<Vec<gstreamer::PadTemplate>> =
            Lazy::new(base::f32le_pad_templates);
        PAD_TEMPLATES.as_ref()
    }
}

impl BaseTransformImpl for GainBp {
    const MODE: gstreamer_base::subclass::BaseTransformMode =
        gstreamer_base::subclass::BaseTransformMode::AlwaysInPlace;
    const PASSTHROUGH_ON_SAME_CAPS: bool = false;
    const TRANSFORM_IP_ON_PASSTHROUGH: bool = false;

    fn start(&self) -> Result<(), gstreamer::ErrorMessage> {
        let mut processor = self
            .processor
            .lock()
            .map_err(|_| gstreamer::error_msg!(gstreamer::CoreError::Failed, ["Mutex poisoned"]))?;
        processor.start();
        Ok(())
    }

    fn stop(&self) -> Result<(), gstreamer::ErrorMessage> {
        let mut processor = self
            .processor
            .lock()
            .map_err(|_| gstreamer::error_msg!(gstreamer::CoreError::Failed, ["Mutex poisoned"]))?;
        processor.stop();
        gstreamer::debug!(CAT, imp = self, "stopped, filter state released");
        Ok(())
    }

    fn transform_ip(
        &self,
        buf: &mut gstreamer::BufferRef,
    ) -> Result<gstreamer::FlowSuccess, gstreamer::FlowError> {
        let mut processor = self.processor.lock().map_err(|_| {
            gstreamer::element_error!(self.obj(), gstreamer::CoreError::Failed, ["Mutex poisoned"]);
            gstreamer::FlowError::Error
        })?;

        let mut map = buf.map_writable().map_err(|_| {
            gstreamer::element_error!(
                self.obj(),
                gstreamer::CoreError::Failed,
                ["Failed to map buffer writable"]
            );
            gstreamer::FlowError::Error
        })?;

        let channels = processor.channels();
        let bytes = map.len();
        if channels == 0 || bytes % SAMPLE_BYTES != 0 || (bytes / SAMPLE_BYTES) % channels != 0 {
            gstreamer::warning!(
                CAT,
                imp = self,
                "malformed buffer: {} bytes for {} channels",
                bytes,
                channels
            );
            gstreamer::element_error!(
                self.obj(),
                gstreamer::StreamError::Format,
                ["Buffer of {} bytes is not a whole number of frames", bytes]
            );
            return Err(gstreamer::FlowError::Error);
        }

        match processor.prepare() {
            Ok(Some(r)) => gstreamer::debug!(
                CAT,
                imp = self,
                "redesign: fs={}, ch={}, low={:.2}, high={:.2}",
                r.sample_rate,
                r.channels,
                r.low_cutoff_hz,
                r.high_cutoff_hz
            ),
            Ok(None) => {}
            Err(err) => {
                gstreamer::element_error!(self.obj(), gstreamer::StreamError::Format, ["{}", err]);
                return Err(gstreamer::FlowError::Error);
            }
        }

        // Safety: caps negotiation guarantees F32LE interleaved audio and the
        // byte length was checked to be a whole number of f32 samples.
        let samples: &mut [f32] = unsafe {
            let ptr = map.as_mut_ptr() as *mut f32;
            std::slice::from_raw_parts_mut(ptr, bytes / SAMPLE_BYTES)
        };

        processor.process(samples).map_err(|err| {
            gstreamer::warning!(CAT, imp = self, "processing failed: {}", err);
            gstreamer::element_error!(self.obj(), gstreamer::StreamError::Format, ["{}", err]);
            gstreamer::FlowError::Error
        })?;

        drop(map);
        Ok(gstreamer::FlowSuccess::Ok)
    }
}

impl AudioFilterImpl for GainBp {
    fn allowed_caps() -> &'static gstreamer::Caps {
        &base::F32LE_INTERLEAVED_CAPS
    }

    fn setup(&self, info: &gstreamer_audio::AudioInfo) -> Result<(), gstreamer::LoggableError> {
        self.parent_setup(info)?;

        let params = StreamParams {
            sample_rate: info.rate(),
            channels: info.channels() as usize,
            format: base::sample_format(info.format()),
            layout: base::layout(info.layout()),
        };

        let mut processor = self.processor.lock().map_err(|_| {
            gstreamer::loggable_error!(CAT, "Mutex poisoned in AudioFilterImpl::setup")
        })?;

        processor
            .configure_stream(params)
            .map_err(|err| gstreamer::loggable_error!(CAT, "Rejected stream: {}", err))?;

        gstreamer::info!(
            CAT,
            imp = self,
            "configured: {} Hz, {} channels, {:?}",
            params.sample_rate,
            params.channels,
            info.format()
        );
        Ok(())
    }
}
