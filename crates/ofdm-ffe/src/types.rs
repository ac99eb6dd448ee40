//! Core types for fine frequency offset estimation
//!
//! The estimator consumes complex baseband I/Q samples and produces a real
//! phase-per-sample estimate for every input sample.
//!
//! ```text
//!   I/Q samples ──┐
//!                 ├──► FfeEstimator ──► rad/sample (1:1 with input)
//!   trigger bits ─┘
//! ```

use num_complex::Complex64;

/// A single I/Q sample point
pub type IQSample = Complex64;

/// Phase value in radians
pub type Radians = f64;

/// Result type for estimator operations
pub type FfeResult<T> = Result<T, FfeError>;

/// Errors raised while setting up or driving the estimator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FfeError {
    #[error("Invalid symbol length: must be > 0")]
    InvalidSymbolLength,

    #[error("Invalid FFT length {fft_length}: must be > 0 and < symbol length {symbol_length}")]
    InvalidFftLength {
        symbol_length: usize,
        fft_length: usize,
    },

    #[error("Invalid number of averaged symbols: must be >= 1")]
    InvalidNumSymbols,

    #[error("Invalid smoothing factor: {0}. Must be in (0, 1]")]
    InvalidAlpha(f64),

    #[error("Invalid sample rate: {0} Hz. Must be positive")]
    InvalidSampleRate(f64),

    #[error("Sample window too short: need {required} samples, have {available}")]
    WindowTooShort { required: usize, available: usize },

    #[error("Input length mismatch: {samples} samples but {triggers} trigger flags")]
    LengthMismatch { samples: usize, triggers: usize },

    #[error("Output buffer too short: need {required} slots, have {available}")]
    OutputTooShort { required: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FfeError::InvalidFftLength {
            symbol_length: 10,
            fft_length: 10,
        };
        assert_eq!(
            err.to_string(),
            "Invalid FFT length 10: must be > 0 and < symbol length 10"
        );

        let err = FfeError::WindowTooShort {
            required: 11,
            available: 4,
        };
        assert!(err.to_string().contains("need 11"));
    }
}
