// SPDX-License-Identifier: LGPL-3.0-or-later

//! Pole/zero storage for filter design.
//!
//! A [`Layout`] is an ordered, fixed-capacity collection of
//! [`PoleZeroPair`] entries plus a normalization reference (the frequency
//! at which the assembled cascade is scaled to a known gain). The same
//! structure carries an analog (s-plane) layout through the frequency
//! transform and, after the bilinear map rewrites it in place, the digital
//! (z-plane) layout consumed by the cascade assembler.

use num_complex::Complex64;

/// Complex value standing in for a pole or zero at infinity.
///
/// Only analog layouts contain such entries; the bilinear transform maps
/// them onto finite z-plane positions.
pub fn infinity() -> Complex64 {
    Complex64::new(f64::INFINITY, 0.0)
}

/// Returns `true` if `c` represents a point at infinity.
pub fn is_infinite(c: Complex64) -> bool {
    c.re.is_infinite() || c.im.is_infinite()
}

/// A second-order group of two poles and two zeros, or a single
/// first-order pole/zero remainder.
///
/// Complex poles and zeros are always stored together with their
/// conjugate so that the section coefficients derived from a pair are
/// real-valued.
#[derive(Debug, Clone, Copy)]
pub struct PoleZeroPair {
    poles: [Complex64; 2],
    zeros: [Complex64; 2],
    single: bool,
}

impl PoleZeroPair {
    /// Pair a pole and a zero with their complex conjugates.
    pub fn conjugate(pole: Complex64, zero: Complex64) -> Self {
        Self {
            poles: [pole, pole.conj()],
            zeros: [zero, zero.conj()],
            single: false,
        }
    }

    /// Build a pair from two explicit poles and two explicit zeros.
    ///
    /// Used when a transform produces two real poles (or zeros) that do
    /// not form a conjugate pair but still share one section.
    pub fn from_parts(poles: [Complex64; 2], zeros: [Complex64; 2]) -> Self {
        Self {
            poles,
            zeros,
            single: false,
        }
    }

    /// A single real pole and zero (first-order remainder of odd orders).
    pub fn single(pole: Complex64, zero: Complex64) -> Self {
        let fill = Complex64::new(0.0, 0.0);
        Self {
            poles: [pole, fill],
            zeros: [zero, fill],
            single: true,
        }
    }

    /// Returns `true` for a first-order (single pole) entry.
    pub fn is_single(&self) -> bool {
        self.single
    }

    /// The active poles: one entry for a single pair, two otherwise.
    pub fn poles(&self) -> &[Complex64] {
        &self.poles[..self.len()]
    }

    /// The active zeros, matching [`poles`](Self::poles) in count.
    pub fn zeros(&self) -> &[Complex64] {
        &self.zeros[..self.len()]
    }

    /// Apply `f` to every active pole and zero, preserving arity.
    pub fn map(&self, f: impl Fn(Complex64) -> Complex64) -> Self {
        let mut out = *self;
        for i in 0..self.len() {
            out.poles[i] = f(self.poles[i]);
            out.zeros[i] = f(self.zeros[i]);
        }
        out
    }

    fn len(&self) -> usize {
        if self.single {
            1
        } else {
            2
        }
    }
}

/// Ordered pole/zero layout with a fixed capacity and a normalization
/// reference.
///
/// `normal_w` is an angular frequency: rad/s while the layout is analog,
/// radians per sample once digitalized. `f64::INFINITY` means "at
/// infinity" (which the bilinear transform maps to Nyquist).
#[derive(Debug, Clone)]
pub struct Layout {
    pairs: Vec<PoleZeroPair>,
    max_pairs: usize,
    normal_w: f64,
    normal_gain: f64,
}

impl Layout {
    /// Create an empty layout able to hold up to `max_pairs` entries.
    ///
    /// The bound is fixed for the lifetime of the layout; pushes never
    /// allocate beyond it.
    pub fn with_capacity(max_pairs: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(max_pairs),
            max_pairs,
            normal_w: 0.0,
            normal_gain: 1.0,
        }
    }

    /// Remove all entries and restore the default normalization,
    /// keeping the allocated storage.
    pub fn reset(&mut self) {
        self.pairs.clear();
        self.normal_w = 0.0;
        self.normal_gain = 1.0;
    }

    /// Append an entry.
    ///
    /// # Panics
    ///
    /// Panics if the layout is already at capacity.
    pub fn push(&mut self, pair: PoleZeroPair) {
        assert!(
            self.pairs.len() < self.max_pairs,
            "layout capacity {} exceeded",
            self.max_pairs
        );
        self.pairs.push(pair);
    }

    /// The stored entries, in insertion order.
    pub fn pairs(&self) -> &[PoleZeroPair] {
        &self.pairs
    }

    pub(crate) fn pairs_mut(&mut self) -> &mut [PoleZeroPair] {
        &mut self.pairs
    }

    /// Maximum number of entries this layout can hold.
    pub fn capacity(&self) -> usize {
        self.max_pairs
    }

    /// Total number of poles across all entries.
    pub fn num_poles(&self) -> usize {
        self.pairs.iter().map(|p| p.poles().len()).sum()
    }

    /// Set the normalization reference: the cascade is later scaled so
    /// its response at `w` has magnitude `gain`.
    pub fn set_normal(&mut self, w: f64, gain: f64) {
        self.normal_w = w;
        self.normal_gain = gain;
    }

    /// Normalization angular frequency.
    pub fn normal_w(&self) -> f64 {
        self.normal_w
    }

    /// Normalization gain (linear).
    pub fn normal_gain(&self) -> f64 {
        self.normal_gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjugate_pair_is_closed_under_conjugation() {
        let p = Complex64::new(-0.5, 0.8);
        let z = Complex64::new(0.0, 1.0);
        let pair = PoleZeroPair::conjugate(p, z);

        assert!(!pair.is_single());
        assert_eq!(pair.poles().len(), 2);
        assert_eq!(pair.poles()[1], p.conj());
        assert_eq!(pair.zeros()[1], z.conj());
    }

    #[test]
    fn single_pair_has_one_pole() {
        let pair = PoleZeroPair::single(Complex64::new(-1.0, 0.0), infinity());
        assert!(pair.is_single());
        assert_eq!(pair.poles().len(), 1);
        assert_eq!(pair.zeros().len(), 1);
        assert!(is_infinite(pair.zeros()[0]));
    }

    #[test]
    fn map_preserves_arity() {
        let pair = PoleZeroPair::single(Complex64::new(-1.0, 0.0), Complex64::new(-2.0, 0.0));
        let mapped = pair.map(|c| 2.0 * c);
        assert!(mapped.is_single());
        assert_eq!(mapped.poles()[0], Complex64::new(-2.0, 0.0));
        assert_eq!(mapped.zeros()[0], Complex64::new(-4.0, 0.0));
    }

    #[test]
    fn layout_counts_poles() {
        let mut layout = Layout::with_capacity(4);
        layout.push(PoleZeroPair::conjugate(
            Complex64::new(-0.7, 0.7),
            infinity(),
        ));
        layout.push(PoleZeroPair::single(Complex64::new(-1.0, 0.0), infinity()));
        assert_eq!(layout.num_poles(), 3);
        assert_eq!(layout.pairs().len(), 2);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut layout = Layout::with_capacity(2);
        layout.push(PoleZeroPair::single(Complex64::new(-1.0, 0.0), infinity()));
        layout.set_normal(std::f64::consts::PI, 0.5);

        layout.reset();
        assert!(layout.pairs().is_empty());
        assert_eq!(layout.normal_w(), 0.0);
        assert_eq!(layout.normal_gain(), 1.0);
        assert_eq!(layout.capacity(), 2);
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn push_past_capacity_panics() {
        let mut layout = Layout::with_capacity(1);
        layout.push(PoleZeroPair::single(Complex64::new(-1.0, 0.0), infinity()));
        layout.push(PoleZeroPair::single(Complex64::new(-0.5, 0.0), infinity()));
    }
}
