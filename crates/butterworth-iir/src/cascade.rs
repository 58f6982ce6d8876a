// SPDX-License-Identifier: LGPL-3.0-or-later

//! Digital biquad sections and the cascade that runs them.
//!
//! [`Cascade::set_layout`] turns a digital pole/zero [`Layout`] into an
//! ordered list of second-order sections: each [`PoleZeroPair`] becomes
//! one [`Biquad`] (first-order remainders get `b2 = a2 = 0`), in layout
//! storage order, so identical design parameters always produce
//! bit-identical coefficients. The overall gain is scaled on the first
//! section so the response matches the layout's normalization reference.
//!
//! Processing uses transposed direct form II per section, two delay
//! states each, allocation-free.

use num_complex::Complex64;

use crate::layout::{Layout, PoleZeroPair};

/// One second-order section in transposed direct form II.
///
/// Coefficients follow the standard audio cookbook convention with `a0`
/// normalized to 1:
/// ```text
///   y[n] = b0*x[n] + z1
///   z1   = b1*x[n] - a1*y[n] + z2
///   z2   = b2*x[n] - a2*y[n]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
    z1: f32,
    z2: f32,
}

impl Default for Biquad {
    fn default() -> Self {
        Self::identity()
    }
}

impl Biquad {
    /// Identity section: passes samples through unchanged.
    pub fn identity() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Replace the coefficients, keeping the delay state.
    fn set_coefficients(&mut self, b: [f64; 3], a: [f64; 2]) {
        self.b0 = b[0] as f32;
        self.b1 = b[1] as f32;
        self.b2 = b[2] as f32;
        self.a1 = a[0] as f32;
        self.a2 = a[1] as f32;
    }

    /// Feed one sample through the section.
    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }

    /// Process a block from `src` into `dst` (the shorter length wins).
    pub fn process(&mut self, dst: &mut [f32], src: &[f32]) {
        for (out, &inp) in dst.iter_mut().zip(src.iter()) {
            *out = self.process_sample(inp);
        }
    }

    /// Process a block in place.
    pub fn process_inplace(&mut self, buf: &mut [f32]) {
        for sample in buf.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Zero the delay state, keeping the coefficients.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// Section coefficients kept in `f64` while the cascade is assembled and
/// normalized, before rounding to the runtime `f32` representation.
#[derive(Debug, Clone, Copy, Default)]
struct Section {
    b: [f64; 3],
    a: [f64; 2],
}

impl Section {
    fn from_pair(pair: &PoleZeroPair) -> Self {
        if pair.is_single() {
            let p = pair.poles()[0];
            let z = pair.zeros()[0];
            Self {
                b: [1.0, -z.re, 0.0],
                a: [-p.re, 0.0],
            }
        } else {
            // sum/product cover both the conjugate and the two-real case
            let (p1, p2) = (pair.poles()[0], pair.poles()[1]);
            let (z1, z2) = (pair.zeros()[0], pair.zeros()[1]);
            Self {
                b: [1.0, -(z1 + z2).re, (z1 * z2).re],
                a: [-(p1 + p2).re, (p1 * p2).re],
            }
        }
    }
}

/// Evaluate the transfer function of `sections` at `w` radians/sample.
fn response(sections: &[Section], w: f64) -> Complex64 {
    let zn1 = Complex64::from_polar(1.0, -w);
    let zn2 = Complex64::from_polar(1.0, -2.0 * w);
    let mut h = Complex64::new(1.0, 0.0);
    for s in sections {
        let num = Complex64::new(s.b[0], 0.0) + zn1.scale(s.b[1]) + zn2.scale(s.b[2]);
        let den = Complex64::new(1.0, 0.0) + zn1.scale(s.a[0]) + zn2.scale(s.a[1]);
        h *= num / den;
    }
    h
}

/// A fixed-capacity cascade of biquad sections with persistent per-instance
/// delay state.
///
/// Coefficients are written only by [`set_layout`](Cascade::set_layout);
/// processing mutates the delay state only. [`clear`](Cascade::clear)
/// zeroes the state without touching coefficients, for use when a filter
/// instance moves to an unrelated sample stream.
#[derive(Debug, Clone)]
pub struct Cascade {
    stages: Vec<Biquad>,
    scratch: Vec<Section>,
    n_stages: usize,
}

impl Cascade {
    /// Create a cascade able to hold up to `max_stages` sections.
    ///
    /// Storage is fixed here; neither [`set_layout`](Cascade::set_layout)
    /// nor processing allocates.
    pub fn with_stages(max_stages: usize) -> Self {
        Self {
            stages: vec![Biquad::identity(); max_stages],
            scratch: vec![Section::default(); max_stages],
            n_stages: 0,
        }
    }

    /// Number of active sections.
    pub fn num_stages(&self) -> usize {
        self.n_stages
    }

    /// Maximum number of sections fixed at construction.
    pub fn max_stages(&self) -> usize {
        self.stages.len()
    }

    /// The active sections, in processing order.
    pub fn stages(&self) -> &[Biquad] {
        &self.stages[..self.n_stages]
    }

    /// Build the section list from a digital pole/zero layout.
    ///
    /// One section per layout entry, in storage order. Coefficients are
    /// assembled in `f64`, the overall gain is scaled on the first section
    /// so that `|H(normal_w)| == normal_gain`, and the result is stored as
    /// `f32`. Delay state is preserved; call [`clear`](Cascade::clear) to
    /// discard it.
    ///
    /// # Panics
    ///
    /// Panics if the layout holds more entries than `max_stages`.
    pub fn set_layout(&mut self, layout: &Layout) {
        let pairs = layout.pairs();
        assert!(
            pairs.len() <= self.stages.len(),
            "layout needs {} sections, cascade holds {}",
            pairs.len(),
            self.stages.len()
        );

        for (section, pair) in self.scratch.iter_mut().zip(pairs.iter()) {
            *section = Section::from_pair(pair);
        }
        let n = pairs.len();

        if n > 0 {
            let h = response(&self.scratch[..n], layout.normal_w());
            let scale = layout.normal_gain() / h.norm();
            let first = &mut self.scratch[0];
            first.b[0] *= scale;
            first.b[1] *= scale;
            first.b[2] *= scale;
        }

        for (stage, section) in self.stages.iter_mut().zip(&self.scratch[..n]) {
            stage.set_coefficients(section.b, section.a);
        }
        for stage in self.stages.iter_mut().skip(n) {
            *stage = Biquad::identity();
        }
        self.n_stages = n;
    }

    /// Feed one sample through every active section in series.
    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        let mut y = x;
        for stage in &mut self.stages[..self.n_stages] {
            y = stage.process_sample(y);
        }
        y
    }

    /// Process a block from `src` into `dst` (the shorter length wins).
    pub fn process(&mut self, dst: &mut [f32], src: &[f32]) {
        let n = dst.len().min(src.len());
        if n == 0 {
            return;
        }
        if self.n_stages == 0 {
            dst[..n].copy_from_slice(&src[..n]);
            return;
        }

        self.stages[0].process(&mut dst[..n], &src[..n]);
        for stage in &mut self.stages[1..self.n_stages] {
            stage.process_inplace(&mut dst[..n]);
        }
    }

    /// Process a block in place.
    pub fn process_inplace(&mut self, buf: &mut [f32]) {
        for stage in &mut self.stages[..self.n_stages] {
            stage.process_inplace(buf);
        }
    }

    /// Zero all delay state, keeping the coefficients.
    pub fn clear(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Magnitude (linear) and phase (radians) of the active sections at
    /// `w` radians per sample.
    pub fn freq_response(&self, w: f32) -> (f32, f32) {
        let w = w as f64;
        let zn1 = Complex64::from_polar(1.0, -w);
        let zn2 = Complex64::from_polar(1.0, -2.0 * w);
        let mut h = Complex64::new(1.0, 0.0);
        for stage in &self.stages[..self.n_stages] {
            let num = Complex64::new(stage.b0 as f64, 0.0)
                + zn1.scale(stage.b1 as f64)
                + zn2.scale(stage.b2 as f64);
            let den = Complex64::new(1.0, 0.0)
                + zn1.scale(stage.a1 as f64)
                + zn2.scale(stage.a2 as f64);
            h *= num / den;
        }
        (h.norm() as f32, h.arg() as f32)
    }
}
