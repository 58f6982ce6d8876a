// SPDX-License-Identifier: LGPL-3.0-or-later

//! Configuration error taxonomy for filter design.

use thiserror::Error;

/// Errors raised while validating filter design parameters.
///
/// All variants are raised synchronously from `setup`, before any
/// coefficient or state mutation. A failed call leaves the previously
/// configured cascade processing exactly as before.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DesignError {
    /// Order is zero or exceeds the construction-time maximum.
    #[error("filter order {order} out of range 1..={max}")]
    InvalidOrder { order: usize, max: usize },

    /// Sample rate, cutoff or center frequency is not inside (0, Nyquist).
    #[error("frequency {frequency} Hz not inside (0, Nyquist)")]
    InvalidFrequency { frequency: f32 },

    /// Bandwidth is non-positive or pushes a band edge outside (0, Nyquist).
    #[error("bandwidth {width} Hz places a band edge outside (0, Nyquist)")]
    InvalidBandwidth { width: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let e = DesignError::InvalidOrder { order: 9, max: 8 };
        assert_eq!(e.to_string(), "filter order 9 out of range 1..=8");

        let e = DesignError::InvalidFrequency { frequency: -1.0 };
        assert!(e.to_string().contains("-1"));

        let e = DesignError::InvalidBandwidth { width: 0.0 };
        assert!(e.to_string().contains("bandwidth"));
    }
}
