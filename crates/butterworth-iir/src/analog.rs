// SPDX-License-Identifier: LGPL-3.0-or-later

//! Normalized analog Butterworth prototypes (s-plane, cutoff 1 rad/s).
//!
//! The plain prototype places its poles on the unit circle in the left
//! half-plane at angles `pi/2 + (2k+1)*pi/(2N)`, giving the maximally flat
//! magnitude response with no finite zeros. The shelving prototype derives
//! pole and zero radii from the requested gain so the response transitions
//! between `gain_db` and 0 dB while keeping Butterworth flatness in both
//! asymptotic regions.

use std::f64::consts::{FRAC_PI_2, PI};

use num_complex::Complex64;

use crate::layout::{infinity, Layout, PoleZeroPair};
use crate::units::db_to_gain64;

/// Populate `layout` with the half-band Butterworth low-pass prototype of
/// the given order.
///
/// Zeros are all at infinity; the normalization reference is unity gain at
/// DC. Order validation is the caller's responsibility (see
/// [`design`](crate::design)).
pub fn design_low_pass(order: usize, layout: &mut Layout) {
    layout.reset();
    let n2 = (2 * order) as f64;

    for k in 0..order / 2 {
        let theta = FRAC_PI_2 + (2 * k + 1) as f64 * PI / n2;
        let pole = Complex64::from_polar(1.0, theta);
        layout.push(PoleZeroPair::conjugate(pole, infinity()));
    }
    if order % 2 == 1 {
        layout.push(PoleZeroPair::single(Complex64::new(-1.0, 0.0), infinity()));
    }
    layout.set_normal(0.0, 1.0);
}

/// Populate `layout` with the half-band Butterworth low-shelf prototype.
///
/// Poles sit at radius `1/g` and zeros at radius `g`, with
/// `g = (10^(gain_db/20))^(1/2N)`, on the angular pattern of the plain
/// prototype. The response is `gain_db` at DC and 0 dB at infinity; the
/// normalization reference is unity gain at infinity.
pub fn design_low_shelf(order: usize, gain_db: f64, layout: &mut Layout) {
    layout.reset();
    let n2 = (2 * order) as f64;
    let g = db_to_gain64(gain_db).powf(1.0 / n2);
    let gp = -1.0 / g;
    let gz = -g;

    for i in 1..=order / 2 {
        let theta = PI * (0.5 - (2 * i - 1) as f64 / n2);
        layout.push(PoleZeroPair::conjugate(
            Complex64::from_polar(gp, theta),
            Complex64::from_polar(gz, theta),
        ));
    }
    if order % 2 == 1 {
        layout.push(PoleZeroPair::single(
            Complex64::new(gp, 0.0),
            Complex64::new(gz, 0.0),
        ));
    }
    layout.set_normal(f64::INFINITY, 1.0);
}
