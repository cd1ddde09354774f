// SPDX-License-Identifier: LGPL-3.0-or-later

//! Stream-level gain + band-pass processor.
//!
//! [`BandPassGain`] owns the per-channel [`FilterBank`] and redesigns its
//! coefficients lazily: any change to a cutoff or to the stream marks the
//! coefficients stale, and the next [`prepare`](BandPassGain::prepare)
//! (called by [`process`](BandPassGain::process)) designs both stages,
//! resets all filter memory and marks them valid again. A buffer is
//! therefore always filtered with one consistent set of coefficients.
//!
//! State transitions:
//!
//! ```text
//!   Unconfigured --configure_stream--> Invalid --prepare/process--> Valid
//!        ^                              ^   |                        |
//!        |                              |   +---- set_*_cutoff ------+
//!        +------------- stop -----------+-------- start / configure -+
//! ```

use crate::config::{
    CUTOFF_MAX, CUTOFF_MIN, GAIN_MAX, GAIN_MIN, ProcessorConfig, clamp_or,
};
use crate::error::{Error, Result};
use crate::filters::bank::FilterBank;
use crate::filters::coeffs::{BUTTERWORTH_Q, FilterType, NYQUIST_LIMIT, calc_biquad_coeffs};
use crate::types::StreamParams;

/// When `low >= high`, the high-pass cutoff is pulled down to this
/// fraction of the low-pass cutoff.
pub const BAND_COLLAPSE_RATIO: f64 = 0.8;

/// Where the processor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// No stream parameters yet (or the session was stopped).
    Unconfigured,
    /// Stream known, coefficients stale.
    Invalid,
    /// Ready to process.
    Valid,
}

/// Outcome of a coefficient redesign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Redesign {
    pub sample_rate: u32,
    pub channels: usize,
    /// High-pass cutoff actually designed, in Hz.
    pub low_cutoff_hz: f64,
    /// Low-pass cutoff actually designed, in Hz.
    pub high_cutoff_hz: f64,
}

/// Resolve the configured band edges into the cutoffs that get designed.
///
/// Low is clamped to `>= 0`, high to `[0, 0.49 * sample_rate]`, and an
/// empty or inverted band (`low >= high > 0`) moves low to
/// `0.8 * high`. A zero high cutoff disables the low-pass stage and leaves
/// low untouched.
pub fn effective_cutoffs(low_hz: f64, high_hz: f64, sample_rate: f64) -> (f64, f64) {
    let mut low = low_hz.max(0.0);
    let high = high_hz.max(0.0).min(sample_rate * NYQUIST_LIMIT);
    if high > 0.0 && low >= high {
        low = high * BAND_COLLAPSE_RATIO;
    }
    (low, high)
}

/// In-place HPF -> LPF -> gain processor for interleaved f32 audio.
///
/// Construct it, configure the stream, then feed buffers:
///
/// ```
/// use gainbp_dsp::{BandPassGain, ProcessorState, SampleFormat, StreamParams};
///
/// let mut proc = BandPassGain::new();
/// assert_eq!(proc.state(), ProcessorState::Unconfigured);
///
/// proc.configure_stream(StreamParams::interleaved(44100, 1, SampleFormat::F32Le))
///     .unwrap();
/// proc.set_low_cutoff_hz(300.0);
/// proc.set_high_cutoff_hz(3400.0);
///
/// let mut buf = vec![0.0f32; 512];
/// proc.process(&mut buf).unwrap();
/// assert_eq!(proc.state(), ProcessorState::Valid);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BandPassGain {
    config: ProcessorConfig,
    stream: Option<StreamParams>,
    bank: Option<FilterBank>,
    coeffs_valid: bool,
    last_redesign: Option<Redesign>,
}

impl BandPassGain {
    /// Create an unconfigured processor with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unconfigured processor with the given parameters,
    /// clamped into their domains.
    pub fn with_config(config: ProcessorConfig) -> Self {
        Self {
            config: config.clamped(),
            ..Self::default()
        }
    }

    // ── Configuration ─────────────────────────────────────────────

    /// Current parameters.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Replace every parameter at once.
    pub fn set_config(&mut self, config: ProcessorConfig) {
        self.set_gain(config.gain);
        self.set_low_cutoff_hz(config.low_cutoff_hz);
        self.set_high_cutoff_hz(config.high_cutoff_hz);
    }

    /// Linear gain applied after both filter stages.
    pub fn gain(&self) -> f64 {
        self.config.gain
    }

    /// Set the linear gain, clamped to `[0, 64]`. Non-finite values are
    /// ignored. Does not invalidate the coefficients.
    pub fn set_gain(&mut self, gain: f64) {
        self.config.gain = clamp_or(gain, GAIN_MIN, GAIN_MAX, self.config.gain);
    }

    /// High-pass cutoff in Hz.
    pub fn low_cutoff_hz(&self) -> f64 {
        self.config.low_cutoff_hz
    }

    /// Set the high-pass cutoff, clamped to `[0, 192000]`. Non-finite
    /// values are ignored.
    pub fn set_low_cutoff_hz(&mut self, hz: f64) {
        self.config.low_cutoff_hz =
            clamp_or(hz, CUTOFF_MIN, CUTOFF_MAX, self.config.low_cutoff_hz);
        self.coeffs_valid = false;
    }

    /// Low-pass cutoff in Hz.
    pub fn high_cutoff_hz(&self) -> f64 {
        self.config.high_cutoff_hz
    }

    /// Set the low-pass cutoff, clamped to `[0, 192000]`. Non-finite
    /// values are ignored.
    pub fn set_high_cutoff_hz(&mut self, hz: f64) {
        self.config.high_cutoff_hz =
            clamp_or(hz, CUTOFF_MIN, CUTOFF_MAX, self.config.high_cutoff_hz);
        self.coeffs_valid = false;
    }

    // ── Stream lifecycle ──────────────────────────────────────────

    /// Accept new stream parameters.
    ///
    /// Only interleaved little-endian f32 with a non-zero rate and 1..=8
    /// channels is accepted; on rejection the previous stream (if any)
    /// stays in effect. On success the coefficients become stale and the
    /// bank is resized to the new channel count.
    pub fn configure_stream(&mut self, params: StreamParams) -> Result<()> {
        if !params.is_supported_format() {
            return Err(Error::UnsupportedFormat {
                format: params.format,
                layout: params.layout,
            });
        }
        if !params.is_valid() {
            return Err(Error::InvalidStream {
                sample_rate: params.sample_rate,
                channels: params.channels,
            });
        }

        self.bank
            .get_or_insert_with(|| FilterBank::new(params.channels))
            .resize(params.channels);
        self.stream = Some(params);
        self.coeffs_valid = false;
        Ok(())
    }

    /// Begin a processing session: clear filter memory and force a
    /// redesign before the next buffer.
    pub fn start(&mut self) {
        if let Some(ref mut bank) = self.bank {
            bank.reset_all();
        }
        self.coeffs_valid = false;
    }

    /// End the processing session: release all per-channel state and
    /// forget the stream. Parameters are kept.
    pub fn stop(&mut self) {
        self.bank = None;
        self.stream = None;
        self.coeffs_valid = false;
        self.last_redesign = None;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProcessorState {
        match (self.stream, self.coeffs_valid) {
            (None, _) => ProcessorState::Unconfigured,
            (Some(_), false) => ProcessorState::Invalid,
            (Some(_), true) => ProcessorState::Valid,
        }
    }

    /// Return true once a stream has been configured.
    pub fn is_configured(&self) -> bool {
        self.stream.is_some()
    }

    /// Return true if the next buffer can be processed without a redesign.
    pub fn coefficients_valid(&self) -> bool {
        self.stream.is_some() && self.coeffs_valid
    }

    /// Negotiated stream parameters.
    pub fn stream(&self) -> Option<&StreamParams> {
        self.stream.as_ref()
    }

    /// Negotiated channel count, or 0 when unconfigured.
    pub fn channels(&self) -> usize {
        self.stream.map_or(0, |s| s.channels)
    }

    /// Per-channel filters, if allocated.
    pub fn bank(&self) -> Option<&FilterBank> {
        self.bank.as_ref()
    }

    /// Cutoffs used by the most recent redesign.
    pub fn effective_cutoffs(&self) -> Option<(f64, f64)> {
        self.last_redesign.map(|r| (r.low_cutoff_hz, r.high_cutoff_hz))
    }

    // ── Processing ────────────────────────────────────────────────

    /// Make the coefficients valid.
    ///
    /// Returns `Some` with the designed cutoffs if a redesign happened,
    /// `None` if the coefficients were already up to date.
    pub fn prepare(&mut self) -> Result<Option<Redesign>> {
        let stream = self.stream.ok_or(Error::NotConfigured)?;
        if self.coeffs_valid {
            return Ok(None);
        }

        let fs = f64::from(stream.sample_rate);
        let (low, high) = effective_cutoffs(
            self.config.low_cutoff_hz,
            self.config.high_cutoff_hz,
            fs,
        );
        let hpf = calc_biquad_coeffs(FilterType::Highpass, fs, low, BUTTERWORTH_Q);
        let lpf = calc_biquad_coeffs(FilterType::Lowpass, fs, high, BUTTERWORTH_Q);

        let bank = self
            .bank
            .get_or_insert_with(|| FilterBank::new(stream.channels));
        bank.resize(stream.channels);
        bank.set_coefficients(hpf, lpf);
        bank.reset_all();

        let redesign = Redesign {
            sample_rate: stream.sample_rate,
            channels: stream.channels,
            low_cutoff_hz: low,
            high_cutoff_hz: high,
        };
        self.coeffs_valid = true;
        self.last_redesign = Some(redesign);
        Ok(Some(redesign))
    }

    /// Filter and amplify an interleaved buffer in place.
    ///
    /// The buffer is validated before anything else happens: if its length
    /// is not a multiple of the channel count it is returned untouched with
    /// [`Error::MalformedBuffer`], and the coefficient state is unchanged.
    pub fn process(&mut self, buf: &mut [f32]) -> Result<()> {
        let channels = self.stream.ok_or(Error::NotConfigured)?.channels;
        if buf.len() % channels != 0 {
            return Err(Error::MalformedBuffer {
                samples: buf.len(),
                channels,
            });
        }

        self.prepare()?;

        let gain = self.config.gain as f32;
        let Some(bank) = self.bank.as_mut() else {
            return Err(Error::NotConfigured);
        };

        for frame in buf.chunks_exact_mut(channels) {
            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample = bank.process_sample(ch, *sample) * gain;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BiquadState, FilterCoefficients, Layout, SampleFormat};

    fn stereo_48k() -> StreamParams {
        StreamParams::interleaved(48000, 2, SampleFormat::F32Le)
    }

    fn configured() -> BandPassGain {
        let mut p = BandPassGain::new();
        p.configure_stream(stereo_48k()).expect("configure");
        p
    }

    #[test]
    fn defaults() {
        let p = BandPassGain::new();
        assert_eq!(p.gain(), 1.0);
        assert_eq!(p.low_cutoff_hz(), 100.0);
        assert_eq!(p.high_cutoff_hz(), 8000.0);
        assert_eq!(p.state(), ProcessorState::Unconfigured);
        assert!(!p.is_configured());
        assert!(p.bank().is_none());
        assert_eq!(p.channels(), 0);
    }

    #[test]
    fn with_config_clamps() {
        let p = BandPassGain::with_config(ProcessorConfig {
            gain: 1000.0,
            low_cutoff_hz: 50.0,
            high_cutoff_hz: 1e9,
        });
        assert_eq!(p.gain(), GAIN_MAX);
        assert_eq!(p.low_cutoff_hz(), 50.0);
        assert_eq!(p.high_cutoff_hz(), CUTOFF_MAX);
    }

    #[test]
    fn configure_moves_to_invalid() {
        let p = configured();
        assert_eq!(p.state(), ProcessorState::Invalid);
        assert_eq!(p.channels(), 2);
        assert_eq!(p.bank().map(FilterBank::channels), Some(2));
    }

    #[test]
    fn unsupported_format_rejected() {
        let mut p = BandPassGain::new();
        let err = p
            .configure_stream(StreamParams::interleaved(48000, 2, SampleFormat::S16Le))
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedFormat {
                format: SampleFormat::S16Le,
                layout: Layout::Interleaved
            }
        );
        assert_eq!(p.state(), ProcessorState::Unconfigured);

        let planar = StreamParams {
            layout: Layout::NonInterleaved,
            ..stereo_48k()
        };
        assert!(matches!(
            p.configure_stream(planar),
            Err(Error::UnsupportedFormat { .. })
        ));

        // Recoverable by reconfiguring with the supported format.
        p.configure_stream(stereo_48k()).expect("configure");
        assert_eq!(p.state(), ProcessorState::Invalid);
    }

    #[test]
    fn rejection_keeps_previous_stream() {
        let mut p = configured();
        p.process(&mut [0.0; 4]).expect("process");
        assert!(
            p.configure_stream(StreamParams::interleaved(48000, 2, SampleFormat::F32Be))
                .is_err()
        );
        assert_eq!(p.stream(), Some(&stereo_48k()));
        assert_eq!(p.state(), ProcessorState::Valid);
    }

    #[test]
    fn invalid_stream_rejected() {
        let mut p = BandPassGain::new();
        assert_eq!(
            p.configure_stream(StreamParams::interleaved(0, 2, SampleFormat::F32Le)),
            Err(Error::InvalidStream {
                sample_rate: 0,
                channels: 2
            })
        );
        assert!(
            p.configure_stream(StreamParams::interleaved(48000, 9, SampleFormat::F32Le))
                .is_err()
        );
        assert!(!p.is_configured());
    }

    #[test]
    fn process_unconfigured_fails() {
        let mut p = BandPassGain::new();
        let mut buf = [1.0f32; 4];
        assert_eq!(p.process(&mut buf), Err(Error::NotConfigured));
        assert_eq!(p.prepare(), Err(Error::NotConfigured));
        assert_eq!(buf, [1.0; 4]);
    }

    #[test]
    fn prepare_redesigns_once() {
        let mut p = configured();
        let r = p.prepare().expect("prepare").expect("redesign");
        assert_eq!(r.sample_rate, 48000);
        assert_eq!(r.channels, 2);
        assert_eq!(r.low_cutoff_hz, 100.0);
        assert_eq!(r.high_cutoff_hz, 8000.0);
        assert_eq!(p.state(), ProcessorState::Valid);
        assert!(p.coefficients_valid());
        assert_eq!(p.effective_cutoffs(), Some((100.0, 8000.0)));

        assert_eq!(p.prepare(), Ok(None));
    }

    #[test]
    fn gain_does_not_invalidate() {
        let mut p = configured();
        p.prepare().expect("prepare");
        p.set_gain(2.0);
        assert_eq!(p.state(), ProcessorState::Valid);
        assert_eq!(p.gain(), 2.0);
    }

    #[test]
    fn cutoff_setters_invalidate() {
        let mut p = configured();
        p.prepare().expect("prepare");
        p.set_low_cutoff_hz(200.0);
        assert_eq!(p.state(), ProcessorState::Invalid);

        p.prepare().expect("prepare");
        p.set_high_cutoff_hz(4000.0);
        assert_eq!(p.state(), ProcessorState::Invalid);
    }

    #[test]
    fn setters_clamp_and_ignore_non_finite() {
        let mut p = BandPassGain::new();
        p.set_gain(-1.0);
        assert_eq!(p.gain(), 0.0);
        p.set_gain(f64::NAN);
        assert_eq!(p.gain(), 0.0);
        p.set_gain(65.0);
        assert_eq!(p.gain(), 64.0);

        p.set_low_cutoff_hz(-20.0);
        assert_eq!(p.low_cutoff_hz(), 0.0);
        p.set_high_cutoff_hz(500_000.0);
        assert_eq!(p.high_cutoff_hz(), 192_000.0);
        p.set_high_cutoff_hz(f64::INFINITY);
        assert_eq!(p.high_cutoff_hz(), 192_000.0);
    }

    #[test]
    fn set_config_applies_all_fields() {
        let mut p = configured();
        p.prepare().expect("prepare");
        let cfg = ProcessorConfig {
            gain: 0.5,
            low_cutoff_hz: 300.0,
            high_cutoff_hz: 3400.0,
        };
        p.set_config(cfg);
        assert_eq!(*p.config(), cfg);
        assert_eq!(p.state(), ProcessorState::Invalid);
    }

    #[test]
    fn effective_cutoffs_rules() {
        let fs = 48000.0;
        assert_eq!(effective_cutoffs(100.0, 8000.0, fs), (100.0, 8000.0));
        // High clamped to the Nyquist-adjacent limit.
        assert_eq!(effective_cutoffs(100.0, 30000.0, fs), (100.0, fs * NYQUIST_LIMIT));
        // Inverted band collapses low to 0.8 * high.
        let collapsed = 1000.0 * BAND_COLLAPSE_RATIO;
        assert_eq!(effective_cutoffs(5000.0, 1000.0, fs), (collapsed, 1000.0));
        assert_eq!(effective_cutoffs(1000.0, 1000.0, fs), (collapsed, 1000.0));
        // Collapse uses the clamped high.
        let lim = fs * NYQUIST_LIMIT;
        assert_eq!(
            effective_cutoffs(40000.0, 40000.0, fs),
            (lim * BAND_COLLAPSE_RATIO, lim)
        );
        // Zero high disables the LPF and leaves low alone.
        assert_eq!(effective_cutoffs(500.0, 0.0, fs), (500.0, 0.0));
        // Negative inputs clamp to zero.
        assert_eq!(effective_cutoffs(-1.0, -1.0, fs), (0.0, 0.0));
    }

    #[test]
    fn inverted_band_designs_hpf_at_collapsed_cutoff() {
        let mut p = configured();
        p.set_low_cutoff_hz(6000.0);
        p.set_high_cutoff_hz(2000.0);
        let r = p.prepare().expect("prepare").expect("redesign");
        let collapsed = 2000.0 * BAND_COLLAPSE_RATIO;
        assert_eq!(r.low_cutoff_hz, collapsed);

        let bank = p.bank().expect("bank");
        let expected = calc_biquad_coeffs(FilterType::Highpass, 48000.0, collapsed, BUTTERWORTH_Q);
        assert_eq!(bank.hpf_coefficients(), expected);
        // The raw configured value is kept for the next redesign.
        assert_eq!(p.low_cutoff_hz(), 6000.0);
    }

    #[test]
    fn disabled_cutoffs_are_passthrough() {
        let mut p = configured();
        p.set_low_cutoff_hz(0.0);
        p.set_high_cutoff_hz(0.0);
        let src = [0.1f32, -0.2, 0.3, -0.4, 0.5, -0.6];
        let mut buf = src;
        p.process(&mut buf).expect("process");
        assert_eq!(buf, src);

        let bank = p.bank().expect("bank");
        assert!(bank.hpf_coefficients().is_identity());
        assert!(bank.lpf_coefficients().is_identity());
    }

    #[test]
    fn malformed_buffer_left_untouched() {
        let mut p = BandPassGain::new();
        p.configure_stream(StreamParams::interleaved(48000, 3, SampleFormat::F32Le))
            .expect("configure");

        let mut buf = [0.5f32; 10];
        assert_eq!(
            p.process(&mut buf),
            Err(Error::MalformedBuffer {
                samples: 10,
                channels: 3
            })
        );
        assert_eq!(buf, [0.5; 10]);
        assert_eq!(p.state(), ProcessorState::Invalid);

        // Later well-formed buffers still go through.
        let mut ok = [0.5f32; 9];
        p.process(&mut ok).expect("process");
        assert_eq!(p.state(), ProcessorState::Valid);
    }

    #[test]
    fn empty_buffer_is_fine() {
        let mut p = configured();
        p.process(&mut []).expect("process");
        assert_eq!(p.state(), ProcessorState::Valid);
    }

    #[test]
    fn redesign_resets_state() {
        let mut p = configured();
        p.process(&mut [1.0, 1.0, 0.5, 0.5]).expect("process");
        let bank = p.bank().expect("bank");
        assert_ne!(bank.state(0).0, BiquadState::default());

        p.set_high_cutoff_hz(4000.0);
        p.prepare().expect("prepare");
        let bank = p.bank().expect("bank");
        for ch in 0..2 {
            assert_eq!(bank.state(ch), (BiquadState::default(), BiquadState::default()));
        }
    }

    #[test]
    fn start_clears_memory_and_invalidates() {
        let mut p = configured();
        p.process(&mut [1.0, 1.0, 0.5, 0.5]).expect("process");
        p.start();
        assert_eq!(p.state(), ProcessorState::Invalid);
        let bank = p.bank().expect("bank");
        assert_eq!(bank.state(1), (BiquadState::default(), BiquadState::default()));
    }

    #[test]
    fn start_unconfigured_stays_unconfigured() {
        let mut p = BandPassGain::new();
        p.start();
        assert_eq!(p.state(), ProcessorState::Unconfigured);
    }

    #[test]
    fn stop_releases_state_keeps_config() {
        let mut p = configured();
        p.set_gain(3.0);
        p.set_low_cutoff_hz(250.0);
        p.process(&mut [1.0, 1.0]).expect("process");

        p.stop();
        assert_eq!(p.state(), ProcessorState::Unconfigured);
        assert!(p.bank().is_none());
        assert!(p.effective_cutoffs().is_none());
        assert_eq!(p.gain(), 3.0);
        assert_eq!(p.low_cutoff_hz(), 250.0);
        assert_eq!(p.process(&mut [1.0, 1.0]), Err(Error::NotConfigured));
    }

    #[test]
    fn reconfigure_resizes_bank() {
        let mut p = configured();
        p.process(&mut [1.0, 1.0]).expect("process");

        p.configure_stream(StreamParams::interleaved(48000, 5, SampleFormat::F32Le))
            .expect("configure");
        assert_eq!(p.state(), ProcessorState::Invalid);
        assert_eq!(p.bank().map(FilterBank::channels), Some(5));

        p.prepare().expect("prepare");
        let bank = p.bank().expect("bank");
        for ch in 0..5 {
            assert_eq!(bank.state(ch), (BiquadState::default(), BiquadState::default()));
        }
    }

    #[test]
    fn gain_zero_silences() {
        let mut p = configured();
        p.set_gain(0.0);
        let mut buf = [1.0f32, -1.0, 0.5, 0.25];
        p.process(&mut buf).expect("process");
        assert!(buf.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn identity_with_gain_scales_exactly() {
        let mut p = configured();
        p.set_low_cutoff_hz(0.0);
        p.set_high_cutoff_hz(0.0);
        p.set_gain(4.0);
        let mut buf = [0.25f32, -0.5, 0.125, 1.0];
        p.process(&mut buf).expect("process");
        assert_eq!(buf, [1.0, -2.0, 0.5, 4.0]);
        assert_eq!(
            p.bank().expect("bank").lpf_coefficients(),
            FilterCoefficients::IDENTITY
        );
    }
}
