// SPDX-License-Identifier: LGPL-3.0-or-later

//! Bilinear mapping of analog layouts into the z-plane.
//!
//! Applies `z = (2*fs + s)/(2*fs - s)` to every pole and zero, rewriting
//! the layout in place. Frequency pre-warping has already happened in the
//! transform stage, so the mapping is exact at the design frequencies.
//! The conformal property guarantees that every pole with negative real
//! part lands strictly inside the unit circle; points at infinity land on
//! z = -1.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::layout::{is_infinite, Layout};

/// Map every pole and zero of `layout` into the z-plane and convert the
/// normalization frequency from rad/s to radians per sample.
pub fn digitalize(layout: &mut Layout, sample_rate: f64) {
    let fs2 = 2.0 * sample_rate;
    for pair in layout.pairs_mut() {
        *pair = pair.map(|s| {
            if is_infinite(s) {
                Complex64::new(-1.0, 0.0)
            } else {
                (Complex64::new(fs2, 0.0) + s) / (Complex64::new(fs2, 0.0) - s)
            }
        });
    }

    let wn = layout.normal_w();
    let gain = layout.normal_gain();
    let w_d = if wn.is_infinite() {
        PI
    } else {
        2.0 * (wn / fs2).atan()
    };
    layout.set_normal(w_d, gain);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{infinity, PoleZeroPair};
    use crate::{analog, transform};
    use float_cmp::assert_approx_eq;

    const FS: f64 = 48000.0;

    #[test]
    fn left_half_plane_maps_inside_unit_circle() {
        let mut layout = Layout::with_capacity(8);
        analog::design_low_pass(8, &mut layout);
        let mut warped = Layout::with_capacity(8);
        transform::low_pass(&layout, 2.0 * FS * (PI * 1000.0 / FS).tan(), &mut warped);
        digitalize(&mut warped, FS);

        for pair in warped.pairs() {
            for &p in pair.poles() {
                assert!(p.norm() < 1.0, "digital pole {p} not strictly stable");
            }
        }
    }

    #[test]
    fn infinity_maps_to_minus_one() {
        let mut layout = Layout::with_capacity(1);
        layout.push(PoleZeroPair::single(
            Complex64::new(-1000.0, 0.0),
            infinity(),
        ));
        digitalize(&mut layout, FS);

        let pair = &layout.pairs()[0];
        assert_eq!(pair.zeros()[0], Complex64::new(-1.0, 0.0));
    }

    #[test]
    fn imaginary_axis_maps_onto_unit_circle() {
        // s = j*w maps to |z| = 1 at angle 2*atan(w/(2*fs))
        let w = 7000.0;
        let mut layout = Layout::with_capacity(1);
        layout.push(PoleZeroPair::single(
            Complex64::new(-1.0, 0.0),
            Complex64::new(0.0, w),
        ));
        digitalize(&mut layout, FS);

        let z = layout.pairs()[0].zeros()[0];
        assert_approx_eq!(f64, z.norm(), 1.0, epsilon = 1e-12);
        assert_approx_eq!(f64, z.arg(), 2.0 * (w / (2.0 * FS)).atan(), epsilon = 1e-12);
    }

    #[test]
    fn normal_frequency_conversion() {
        let mut layout = Layout::with_capacity(1);
        layout.push(PoleZeroPair::single(
            Complex64::new(-1.0, 0.0),
            Complex64::new(0.0, 0.0),
        ));

        layout.set_normal(0.0, 1.0);
        digitalize(&mut layout, FS);
        assert_eq!(layout.normal_w(), 0.0);

        layout.set_normal(f64::INFINITY, 1.0);
        digitalize(&mut layout, FS);
        assert_eq!(layout.normal_w(), PI);

        let w0 = 6000.0;
        layout.set_normal(w0, 1.0);
        digitalize(&mut layout, FS);
        assert_approx_eq!(
            f64,
            layout.normal_w(),
            2.0 * (w0 / (2.0 * FS)).atan(),
            epsilon = 1e-12
        );
    }
}
