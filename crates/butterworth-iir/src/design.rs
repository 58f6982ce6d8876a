// SPDX-License-Identifier: LGPL-3.0-or-later

//! High-level Butterworth filter designer and processor.
//!
//! [`ButterworthFilter`] owns the complete pipeline: an analog prototype
//! is generated, frequency-transformed in the s-plane, digitalized with
//! the bilinear transform and assembled into a biquad cascade. All of the
//! intermediate storage is allocated once at construction for the maximum
//! supported order, so [`setup`](ButterworthFilter::setup) is
//! allocation-free and safe to call from a realtime parameter-update path.

use std::f64::consts::PI;
use std::fmt;

use crate::analog;
use crate::bilinear;
use crate::cascade::{Biquad, Cascade};
use crate::error::DesignError;
use crate::layout::Layout;
use crate::transform;

/// Default sample rate assumed until changed, Hz.
pub const DFL_SAMPLE_RATE: f32 = 48000.0;

/// The seven supported Butterworth response shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFamily {
    LowPass,
    HighPass,
    BandPass,
    BandStop,
    LowShelf,
    HighShelf,
    BandShelf,
}

impl FilterFamily {
    /// Human-readable name of the response shape.
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterFamily::LowPass => "Butterworth Low Pass",
            FilterFamily::HighPass => "Butterworth High Pass",
            FilterFamily::BandPass => "Butterworth Band Pass",
            FilterFamily::BandStop => "Butterworth Band Stop",
            FilterFamily::LowShelf => "Butterworth Low Shelf",
            FilterFamily::HighShelf => "Butterworth High Shelf",
            FilterFamily::BandShelf => "Butterworth Band Shelf",
        }
    }
}

impl fmt::Display for FilterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Complete set of design parameters for one filter configuration.
///
/// Frequencies are in Hz, gains in dB. Band shapes take a center
/// frequency and a total width; the band edges are
/// `center - width/2` and `center + width/2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterSpec {
    LowPass { order: usize, cutoff: f32 },
    HighPass { order: usize, cutoff: f32 },
    BandPass { order: usize, center: f32, width: f32 },
    BandStop { order: usize, center: f32, width: f32 },
    LowShelf { order: usize, cutoff: f32, gain_db: f32 },
    HighShelf { order: usize, cutoff: f32, gain_db: f32 },
    BandShelf { order: usize, center: f32, width: f32, gain_db: f32 },
}

impl FilterSpec {
    /// The response shape this parameter set selects.
    pub fn family(&self) -> FilterFamily {
        match self {
            FilterSpec::LowPass { .. } => FilterFamily::LowPass,
            FilterSpec::HighPass { .. } => FilterFamily::HighPass,
            FilterSpec::BandPass { .. } => FilterFamily::BandPass,
            FilterSpec::BandStop { .. } => FilterFamily::BandStop,
            FilterSpec::LowShelf { .. } => FilterFamily::LowShelf,
            FilterSpec::HighShelf { .. } => FilterFamily::HighShelf,
            FilterSpec::BandShelf { .. } => FilterFamily::BandShelf,
        }
    }

    /// The prototype order.
    pub fn order(&self) -> usize {
        match *self {
            FilterSpec::LowPass { order, .. }
            | FilterSpec::HighPass { order, .. }
            | FilterSpec::BandPass { order, .. }
            | FilterSpec::BandStop { order, .. }
            | FilterSpec::LowShelf { order, .. }
            | FilterSpec::HighShelf { order, .. }
            | FilterSpec::BandShelf { order, .. } => order,
        }
    }
}

/// A complete Butterworth filter: designer plus stateful biquad cascade.
///
/// Construct once with the maximum order the instance must support, then
/// reconfigure with [`setup`](ButterworthFilter::setup) as often as
/// needed. A failed setup leaves the previous configuration (and the
/// delay state) untouched.
pub struct ButterworthFilter {
    max_order: usize,
    sample_rate: f32,
    family: Option<FilterFamily>,
    proto: Layout,
    digital: Layout,
    cascade: Cascade,
}

impl ButterworthFilter {
    /// Create an unconfigured filter supporting prototype orders up to
    /// `max_order` (at least 1).
    ///
    /// All internal storage is sized here: band shapes need one section
    /// per prototype order, the other shapes half that.
    pub fn new(max_order: usize) -> Self {
        let max_order = max_order.max(1);
        Self {
            max_order,
            sample_rate: DFL_SAMPLE_RATE,
            family: None,
            proto: Layout::with_capacity(max_order.div_ceil(2)),
            digital: Layout::with_capacity(max_order),
            cascade: Cascade::with_stages(max_order),
        }
    }

    /// Set the sample rate in Hz. Takes effect on the next
    /// [`setup`](ButterworthFilter::setup) call.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> &mut Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Currently configured sample rate, Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Maximum prototype order fixed at construction.
    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// The response shape of the last successful setup, if any.
    pub fn family(&self) -> Option<FilterFamily> {
        self.family
    }

    /// Number of active biquad sections.
    pub fn num_stages(&self) -> usize {
        self.cascade.num_stages()
    }

    /// The active sections, in processing order.
    pub fn stages(&self) -> &[Biquad] {
        self.cascade.stages()
    }

    /// Design the filter described by `spec` and load its coefficients
    /// into the cascade.
    ///
    /// Validation happens before any state is touched, so on error the
    /// previous coefficients keep processing unchanged. Delay state is
    /// carried across successful setups; call
    /// [`clear`](ButterworthFilter::clear) when switching streams.
    pub fn setup(&mut self, spec: &FilterSpec) -> Result<(), DesignError> {
        self.validate(spec)?;

        let fs = self.sample_rate as f64;
        match *spec {
            FilterSpec::LowPass { order, cutoff } => {
                analog::design_low_pass(order, &mut self.proto);
                transform::low_pass(&self.proto, prewarp(cutoff, fs), &mut self.digital);
            }
            FilterSpec::HighPass { order, cutoff } => {
                analog::design_low_pass(order, &mut self.proto);
                transform::high_pass(&self.proto, prewarp(cutoff, fs), &mut self.digital);
            }
            FilterSpec::BandPass { order, center, width } => {
                analog::design_low_pass(order, &mut self.proto);
                let (w0, bw) = prewarp_band(center, width, fs);
                transform::band_pass(&self.proto, w0, bw, &mut self.digital);
            }
            FilterSpec::BandStop { order, center, width } => {
                analog::design_low_pass(order, &mut self.proto);
                let (w0, bw) = prewarp_band(center, width, fs);
                transform::band_stop(&self.proto, w0, bw, &mut self.digital);
            }
            FilterSpec::LowShelf { order, cutoff, gain_db } => {
                analog::design_low_shelf(order, gain_db as f64, &mut self.proto);
                transform::low_pass(&self.proto, prewarp(cutoff, fs), &mut self.digital);
            }
            FilterSpec::HighShelf { order, cutoff, gain_db } => {
                analog::design_low_shelf(order, gain_db as f64, &mut self.proto);
                transform::high_pass(&self.proto, prewarp(cutoff, fs), &mut self.digital);
            }
            FilterSpec::BandShelf { order, center, width, gain_db } => {
                analog::design_low_shelf(order, gain_db as f64, &mut self.proto);
                let (w0, bw) = prewarp_band(center, width, fs);
                transform::band_pass(&self.proto, w0, bw, &mut self.digital);
            }
        }

        bilinear::digitalize(&mut self.digital, fs);

        // Band-stop and band-shelf must be normalized away from the band,
        // where the response is known to be flat at unity.
        match spec.family() {
            FilterFamily::BandStop | FilterFamily::BandShelf => {
                let center = match *spec {
                    FilterSpec::BandStop { center, .. }
                    | FilterSpec::BandShelf { center, .. } => center,
                    _ => unreachable!(),
                };
                let w = if center < self.sample_rate / 4.0 { PI } else { 0.0 };
                self.digital.set_normal(w, 1.0);
            }
            _ => {}
        }

        self.cascade.set_layout(&self.digital);
        self.family = Some(spec.family());

        log::debug!(
            "{}: order={} fs={} stages={}",
            spec.family(),
            spec.order(),
            self.sample_rate,
            self.cascade.num_stages()
        );
        Ok(())
    }

    fn validate(&self, spec: &FilterSpec) -> Result<(), DesignError> {
        let order = spec.order();
        if order < 1 || order > self.max_order {
            return Err(DesignError::InvalidOrder {
                order,
                max: self.max_order,
            });
        }

        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(DesignError::InvalidFrequency {
                frequency: self.sample_rate,
            });
        }

        let nyquist = self.sample_rate / 2.0;
        let check_corner = |frequency: f32| {
            if frequency.is_finite() && frequency > 0.0 && frequency < nyquist {
                Ok(())
            } else {
                Err(DesignError::InvalidFrequency { frequency })
            }
        };
        let check_band = |center: f32, width: f32| {
            check_corner(center)?;
            let lo = center - 0.5 * width;
            let hi = center + 0.5 * width;
            if width.is_finite() && width > 0.0 && lo > 0.0 && hi < nyquist {
                Ok(())
            } else {
                Err(DesignError::InvalidBandwidth { width })
            }
        };

        match *spec {
            FilterSpec::LowPass { cutoff, .. }
            | FilterSpec::HighPass { cutoff, .. }
            | FilterSpec::LowShelf { cutoff, .. }
            | FilterSpec::HighShelf { cutoff, .. } => check_corner(cutoff),
            FilterSpec::BandPass { center, width, .. }
            | FilterSpec::BandStop { center, width, .. }
            | FilterSpec::BandShelf { center, width, .. } => check_band(center, width),
        }
    }

    /// Feed one sample through the cascade.
    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        self.cascade.process_sample(x)
    }

    /// Process a block from `src` into `dst`.
    pub fn process(&mut self, dst: &mut [f32], src: &[f32]) {
        self.cascade.process(dst, src);
    }

    /// Process a block in place.
    pub fn process_inplace(&mut self, buf: &mut [f32]) {
        self.cascade.process_inplace(buf);
    }

    /// Zero the delay state, keeping the coefficients.
    pub fn clear(&mut self) {
        self.cascade.clear();
    }

    /// Magnitude (linear) and phase (radians) of the configured filter at
    /// `freq` Hz.
    pub fn freq_response(&self, freq: f32) -> (f32, f32) {
        let w = 2.0 * std::f32::consts::PI * freq / self.sample_rate;
        self.cascade.freq_response(w)
    }
}

/// Map a corner frequency in Hz onto the analog frequency (rad/s) that
/// the bilinear transform will bring back to exactly `f`.
fn prewarp(f: f32, fs: f64) -> f64 {
    2.0 * fs * (PI * f as f64 / fs).tan()
}

/// Pre-warp both band edges and return the geometric-mean center and the
/// edge difference in rad/s.
fn prewarp_band(center: f32, width: f32, fs: f64) -> (f64, f64) {
    let w1 = prewarp(center - 0.5 * width, fs);
    let w2 = prewarp(center + 0.5 * width, fs);
    ((w1 * w2).sqrt(), w2 - w1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn display_names() {
        assert_eq!(FilterFamily::LowPass.to_string(), "Butterworth Low Pass");
        assert_eq!(FilterFamily::BandShelf.to_string(), "Butterworth Band Shelf");
    }

    #[test]
    fn order_zero_is_rejected() {
        let mut f = ButterworthFilter::new(8);
        let err = f
            .setup(&FilterSpec::LowPass { order: 0, cutoff: 1000.0 })
            .unwrap_err();
        assert_eq!(err, DesignError::InvalidOrder { order: 0, max: 8 });
    }

    #[test]
    fn order_above_max_is_rejected() {
        let mut f = ButterworthFilter::new(4);
        let err = f
            .setup(&FilterSpec::HighPass { order: 5, cutoff: 1000.0 })
            .unwrap_err();
        assert_eq!(err, DesignError::InvalidOrder { order: 5, max: 4 });
    }

    #[test]
    fn corner_outside_nyquist_is_rejected() {
        let mut f = ButterworthFilter::new(8);
        for cutoff in [0.0f32, -100.0, 24000.0, 30000.0, f32::NAN] {
            let res = f.setup(&FilterSpec::LowPass { order: 2, cutoff });
            assert!(
                matches!(res, Err(DesignError::InvalidFrequency { .. })),
                "cutoff {cutoff} accepted"
            );
        }
    }

    #[test]
    fn bad_sample_rate_is_rejected() {
        let mut f = ButterworthFilter::new(8);
        for sr in [0.0f32, -48000.0, f32::NAN, f32::INFINITY] {
            f.set_sample_rate(sr);
            let res = f.setup(&FilterSpec::LowPass { order: 2, cutoff: 1000.0 });
            assert!(
                matches!(res, Err(DesignError::InvalidFrequency { .. })),
                "sample rate {sr} accepted"
            );
        }
    }

    #[test]
    fn band_edge_outside_nyquist_is_rejected() {
        let mut f = ButterworthFilter::new(8);
        // lower edge at or below DC
        let res = f.setup(&FilterSpec::BandPass { order: 4, center: 400.0, width: 800.0 });
        assert!(matches!(res, Err(DesignError::InvalidBandwidth { .. })));
        // upper edge at or above Nyquist
        let res = f.setup(&FilterSpec::BandStop { order: 4, center: 23000.0, width: 2500.0 });
        assert!(matches!(res, Err(DesignError::InvalidBandwidth { .. })));
        // degenerate width
        let res = f.setup(&FilterSpec::BandPass { order: 4, center: 1000.0, width: 0.0 });
        assert!(matches!(res, Err(DesignError::InvalidBandwidth { .. })));
    }

    #[test]
    fn failed_setup_keeps_previous_configuration() {
        let mut f = ButterworthFilter::new(8);
        f.set_sample_rate(44100.0);
        f.setup(&FilterSpec::LowPass { order: 2, cutoff: 1000.0 })
            .unwrap();
        let before: Vec<u32> = f
            .stages()
            .iter()
            .flat_map(|s| [s.b0, s.b1, s.b2, s.a1, s.a2])
            .map(f32::to_bits)
            .collect();

        assert!(f
            .setup(&FilterSpec::LowPass { order: 99, cutoff: 1000.0 })
            .is_err());
        assert!(f
            .setup(&FilterSpec::BandPass { order: 4, center: 100.0, width: 5000.0 })
            .is_err());

        let after: Vec<u32> = f
            .stages()
            .iter()
            .flat_map(|s| [s.b0, s.b1, s.b2, s.a1, s.a2])
            .map(f32::to_bits)
            .collect();
        assert_eq!(before, after);
        assert_eq!(f.family(), Some(FilterFamily::LowPass));
    }

    #[test]
    fn setup_is_idempotent() {
        let spec = FilterSpec::BandPass { order: 4, center: 2000.0, width: 500.0 };
        let mut f1 = ButterworthFilter::new(8);
        let mut f2 = ButterworthFilter::new(8);
        f1.setup(&spec).unwrap();
        f1.setup(&spec).unwrap();
        f2.setup(&spec).unwrap();

        for (s1, s2) in f1.stages().iter().zip(f2.stages()) {
            assert_eq!(s1.b0.to_bits(), s2.b0.to_bits());
            assert_eq!(s1.b1.to_bits(), s2.b1.to_bits());
            assert_eq!(s1.b2.to_bits(), s2.b2.to_bits());
            assert_eq!(s1.a1.to_bits(), s2.a1.to_bits());
            assert_eq!(s1.a2.to_bits(), s2.a2.to_bits());
        }
    }

    #[test]
    fn section_counts_follow_the_shape() {
        let mut f = ButterworthFilter::new(8);
        for order in 1..=8 {
            f.setup(&FilterSpec::LowPass { order, cutoff: 1000.0 }).unwrap();
            assert_eq!(f.num_stages(), order.div_ceil(2), "low-pass order {order}");

            f.setup(&FilterSpec::BandPass { order, center: 2000.0, width: 500.0 })
                .unwrap();
            assert_eq!(f.num_stages(), order, "band-pass order {order}");
        }
    }

    #[test]
    fn low_pass_dc_gain_is_unity() {
        let mut f = ButterworthFilter::new(8);
        f.set_sample_rate(44100.0);
        for order in 1..=8 {
            f.setup(&FilterSpec::LowPass { order, cutoff: 1000.0 }).unwrap();
            let (mag, _) = f.freq_response(0.0);
            assert_approx_eq!(f32, mag, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn unconfigured_filter_passes_samples_through() {
        let mut f = ButterworthFilter::new(4);
        assert_eq!(f.family(), None);
        assert_eq!(f.num_stages(), 0);
        assert_eq!(f.process_sample(0.5), 0.5);
    }
}
