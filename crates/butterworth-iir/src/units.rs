// SPDX-License-Identifier: LGPL-3.0-or-later

//! Unit conversion functions.

/// Convert decibels to linear gain (amplitude ratio).
///
/// # Arguments
/// * `db` - Level in decibels
///
/// # Returns
/// Linear gain (amplitude ratio)
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    (db * (std::f32::consts::LN_10 / 20.0)).exp()
}

/// Convert linear gain (amplitude ratio) to decibels.
///
/// # Arguments
/// * `gain` - Linear gain (amplitude ratio)
///
/// # Returns
/// Level in decibels
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    gain.ln() * (20.0 / std::f32::consts::LN_10)
}

/// `f64` variant of [`db_to_gain`] for design-time math.
#[inline]
pub fn db_to_gain64(db: f64) -> f64 {
    (db * (std::f64::consts::LN_10 / 20.0)).exp()
}

/// `f64` variant of [`gain_to_db`] for design-time math.
#[inline]
pub fn gain_to_db64(gain: f64) -> f64 {
    gain.ln() * (20.0 / std::f64::consts::LN_10)
}
