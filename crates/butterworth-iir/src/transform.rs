// SPDX-License-Identifier: LGPL-3.0-or-later

//! s-plane frequency transforms of the normalized prototype.
//!
//! All frequencies here are analog angular frequencies (rad/s) that the
//! caller has already pre-warped (`w = 2*fs*tan(pi*f/fs)`), so that the
//! later bilinear map lands the band edges exactly where requested.
//!
//! The band transforms substitute `s -> (s^2 + w0^2)/(bw*s)` (band-pass)
//! or its reciprocal (band-stop). Each prototype pole/zero then yields two
//! transformed points, doubling the section count of the band shapes.

use num_complex::Complex64;

use crate::layout::{infinity, is_infinite, Layout, PoleZeroPair};

/// Scale the prototype onto a pre-warped low-pass cutoff `wc`.
pub fn low_pass(proto: &Layout, wc: f64, out: &mut Layout) {
    out.reset();
    for pair in proto.pairs() {
        out.push(pair.map(|c| if is_infinite(c) { c } else { wc * c }));
    }
    // 0 and infinity are fixed points of the scaling
    out.set_normal(proto.normal_w() * wc, proto.normal_gain());
}

/// Invert the prototype onto a pre-warped high-pass cutoff: `s -> wc/s`.
///
/// Zeros at infinity move to DC, which the bilinear map later places at
/// z = 1.
pub fn high_pass(proto: &Layout, wc: f64, out: &mut Layout) {
    out.reset();
    for pair in proto.pairs() {
        out.push(pair.map(|c| {
            if is_infinite(c) {
                Complex64::new(0.0, 0.0)
            } else {
                wc / c
            }
        }));
    }
    let wn = proto.normal_w();
    let normal = if wn == 0.0 {
        f64::INFINITY
    } else if wn.is_infinite() {
        0.0
    } else {
        wc / wn
    };
    out.set_normal(normal, proto.normal_gain());
}

/// Transform the prototype onto a band-pass shape:
/// `s -> (s^2 + w0^2)/(bw*s)`.
///
/// `w0` is the pre-warped geometric-mean center and `bw` the pre-warped
/// edge difference. Every prototype entry yields two output entries.
///
/// When the prototype normalizes at infinity (shelving), the reference
/// maps ambiguously to both DC and Nyquist; callers pick the side away
/// from the band (see [`design`](crate::design)).
pub fn band_pass(proto: &Layout, w0: f64, bw: f64, out: &mut Layout) {
    out.reset();
    for pair in proto.pairs() {
        let (p1, p2) = band_pass_points(pair.poles()[0], w0, bw);
        let (z1, z2) = band_pass_points(pair.zeros()[0], w0, bw);
        if pair.is_single() {
            // the two roots of a real prototype pole share one section
            out.push(PoleZeroPair::from_parts([p1, p2], [z1, z2]));
        } else {
            out.push(PoleZeroPair::conjugate(p1, z1));
            out.push(PoleZeroPair::conjugate(p2, z2));
        }
    }
    let normal = if proto.normal_w() == 0.0 {
        w0
    } else {
        f64::INFINITY
    };
    out.set_normal(normal, proto.normal_gain());
}

/// Transform the prototype onto a band-stop shape:
/// `s -> bw*s/(s^2 + w0^2)`.
///
/// Zeros at infinity land on the notch at `±j*w0`. The normalization
/// reference defaults to infinity (above the band); callers adjust it to
/// the side away from the notch.
pub fn band_stop(proto: &Layout, w0: f64, bw: f64, out: &mut Layout) {
    out.reset();
    for pair in proto.pairs() {
        let (p1, p2) = band_stop_points(pair.poles()[0], w0, bw);
        let (z1, z2) = band_stop_points(pair.zeros()[0], w0, bw);
        if pair.is_single() {
            out.push(PoleZeroPair::from_parts([p1, p2], [z1, z2]));
        } else {
            out.push(PoleZeroPair::conjugate(p1, z1));
            out.push(PoleZeroPair::conjugate(p2, z2));
        }
    }
    out.set_normal(f64::INFINITY, proto.normal_gain());
}

/// Solutions of `(s^2 + w0^2)/(bw*s) = c`.
fn band_pass_points(c: Complex64, w0: f64, bw: f64) -> (Complex64, Complex64) {
    if is_infinite(c) {
        // the point at infinity splits into DC and infinity
        return (Complex64::new(0.0, 0.0), infinity());
    }
    let half = 0.5 * bw * c;
    let d = (half * half - Complex64::new(w0 * w0, 0.0)).sqrt();
    (half + d, half - d)
}

/// Solutions of `bw*s/(s^2 + w0^2) = c`.
fn band_stop_points(c: Complex64, w0: f64, bw: f64) -> (Complex64, Complex64) {
    if is_infinite(c) {
        // the point at infinity lands on the notch
        return (Complex64::new(0.0, w0), Complex64::new(0.0, -w0));
    }
    let half = 0.5 * bw / c;
    let d = (half * half - Complex64::new(w0 * w0, 0.0)).sqrt();
    (half + d, half - d)
}
