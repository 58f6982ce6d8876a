// SPDX-License-Identifier: LGPL-3.0-or-later

//! # butterworth-iir
//!
//! Butterworth IIR filter design realized as cascades of digital
//! second-order sections (biquads).
//!
//! The crate implements the classical analog-derived design pipeline:
//!
//! 1. [`analog`] — normalized half-band analog prototype (poles on the
//!    unit circle, cutoff 1 rad/s), plain and shelving variants.
//! 2. [`transform`] — s-plane frequency transform onto the requested
//!    low-pass / high-pass / band-pass / band-stop shape, with frequency
//!    pre-warping for the later bilinear step.
//! 3. [`bilinear`] — bilinear mapping of the transformed poles/zeros into
//!    the z-plane at a given sample rate.
//! 4. [`cascade`] — assembly of the digital pole/zero layout into
//!    normalized biquad sections with persistent per-instance delay state.
//!
//! The [`design`] module ties the stages together behind a strongly-typed
//! façade: pick a [`FilterSpec`] variant, call
//! [`ButterworthFilter::setup`], then stream samples through it.
//!
//! ```ignore
//! use butterworth_iir::{ButterworthFilter, FilterSpec};
//!
//! let mut filt = ButterworthFilter::new(8);
//! filt.set_sample_rate(48000.0);
//! filt.setup(&FilterSpec::LowPass { order: 4, cutoff: 1000.0 })?;
//!
//! let input = vec![1.0f32; 4096];
//! let mut output = vec![0.0f32; 4096];
//! filt.process(&mut output, &input);
//! # Ok::<(), butterworth_iir::DesignError>(())
//! ```
//!
//! Design mathematics run in `f64` complex arithmetic; runtime processing
//! is `f32`, allocation-free, and bounded by the maximum order chosen at
//! construction time.

pub mod analog;
pub mod bilinear;
pub mod cascade;
pub mod design;
pub mod error;
pub mod layout;
pub mod transform;
pub mod units;

pub use cascade::{Biquad, Cascade};
pub use design::{ButterworthFilter, FilterFamily, FilterSpec};
pub use error::DesignError;
pub use layout::{Layout, PoleZeroPair};
