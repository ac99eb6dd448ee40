//! Cyclic Prefix Correlation — per-symbol phase offset measurement
//!
//! Every cyclic-prefix sample is a copy of the sample `fft_length` later in
//! the same symbol. A residual carrier offset of `w` rad/sample rotates the
//! later copy by `w * fft_length`, so the argument of
//!
//! ```text
//!   P = Σ r[i - N] · conj(r[i]),   i = -L … -1   (N = fft_length)
//! ```
//!
//! taken over the prefix measures `-w * N`, the phase drift across one FFT
//! length. Offsets are relative to the sample at which the symbol boundary
//! is reached (offset 0), and the correlation reads offsets
//! `-symbol_length ..= -1`, so the window must reach `symbol_length`
//! samples back.
//!
//! When the frame trigger marks a symbol's first sample, the boundary is
//! reached on that symbol's last sample: the symbol sits at
//! `-(symbol_length - 1) ..= 0` and the correlated span starts one sample
//! earlier. The oldest pair then reaches into the previous symbol, which
//! costs one of the `L` prefix products.
//!
//! The emitted value is the rotation rate that undoes the offset: multiply
//! the stream by `exp(j · phase / N · n)` to correct it.
//!
//! ## Example
//!
//! ```rust
//! use ofdm_ffe::cp_correlation::measure_symbol_offset;
//! use ofdm_ffe::FfeParams;
//! use num_complex::Complex64;
//!
//! let params = FfeParams::new(10, 8, 1, 0.1, 1.0);
//! // Pure tone: every sample pair one FFT length apart differs by 0.4 rad
//! let w = -0.4 / 8.0;
//! let window: Vec<Complex64> = (0..11)
//!     .map(|n| Complex64::from_polar(1.0, w * n as f64))
//!     .collect();
//! let phase = measure_symbol_offset(&window, &params).unwrap();
//! assert!((phase - 0.4).abs() < 1e-9);
//! ```

use num_complex::Complex64;

use crate::history::SampleWindow;
use crate::params::FfeParams;
use crate::types::{FfeError, FfeResult, Radians};

/// Raw CP correlation sum for the symbol ending at offset 0.
///
/// Its magnitude grows with signal energy in the prefix; its argument is
/// the symbol's phase estimate.
pub fn cp_correlation<W: SampleWindow + ?Sized>(
    window: &W,
    symbol_length: usize,
    fft_length: usize,
) -> Complex64 {
    let cp_length = (symbol_length - fft_length) as isize;
    let n = fft_length as isize;

    let mut sum = Complex64::new(0.0, 0.0);
    for i in -cp_length..0 {
        sum += window.sample(i - n) * window.sample(i).conj();
    }
    sum
}

/// Per-symbol phase estimate in (-π, π].
///
/// Fails if `window` cannot reach `symbol_length` samples behind the
/// current one.
pub fn measure_symbol_offset<W: SampleWindow + ?Sized>(
    window: &W,
    params: &FfeParams,
) -> FfeResult<Radians> {
    let required = params.required_lookback();
    if window.depth() < required {
        return Err(FfeError::WindowTooShort {
            required,
            available: window.depth(),
        });
    }
    Ok(symbol_phase(window, params))
}

/// [`measure_symbol_offset`] without the depth check, for callers that
/// sized the window at construction.
pub(crate) fn symbol_phase<W: SampleWindow + ?Sized>(window: &W, params: &FfeParams) -> Radians {
    cp_correlation(window, params.symbol_length, params.fft_length).arg()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// QPSK payload of `fft` samples with a `cp`-sample prefix.
    fn ofdm_symbol(fft: usize, cp: usize, seed: usize) -> Vec<Complex64> {
        let payload: Vec<Complex64> = (0..fft)
            .map(|i| {
                let q = (i * 7 + seed * 13 + i * i) % 4;
                Complex64::from_polar(1.0, PI / 4.0 + q as f64 * PI / 2.0)
            })
            .collect();
        let mut out = payload[fft - cp..].to_vec();
        out.extend_from_slice(&payload);
        out
    }

    fn rotate(samples: &mut [Complex64], w: f64) {
        for (n, s) in samples.iter_mut().enumerate() {
            *s *= Complex64::from_polar(1.0, w * n as f64);
        }
    }

    /// The symbol followed by one more sample: the boundary is detected
    /// on the sample after the symbol, so the prefix sits at offsets
    /// `-symbol_length ..= -fft_length - 1`.
    fn window_for(symbol: &[Complex64]) -> Vec<Complex64> {
        let mut w = symbol.to_vec();
        w.push(Complex64::new(0.3, -0.1));
        w
    }

    #[test]
    fn test_zero_offset_is_zero() {
        let params = FfeParams::new(80, 64, 1, 0.1, 1.0);
        for seed in 0..5 {
            let window = window_for(&ofdm_symbol(64, 16, seed));
            let sum = cp_correlation(window.as_slice(), 80, 64);
            assert_relative_eq!(sum.re, 16.0, epsilon = 1e-9);
            assert!(measure_symbol_offset(&window, &params).unwrap().abs() < 1e-12);
        }

        // Constant signal: every pair identical
        let window = vec![Complex64::new(0.7, 0.7); 81];
        let phase = measure_symbol_offset(&window, &params).unwrap();
        assert_eq!(phase, 0.0);
    }

    #[test]
    fn test_tone_phase() {
        let params = FfeParams::new(10, 8, 1, 0.1, 1.0);
        for &target in &[0.05, -0.3, 1.2, -2.5] {
            let w = -target / 8.0;
            let window: Vec<Complex64> = (0..11)
                .map(|n| Complex64::from_polar(1.0, w * n as f64))
                .collect();
            let phase = measure_symbol_offset(&window, &params).unwrap();
            assert_relative_eq!(phase, target, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rotated_symbol() {
        let params = FfeParams::new(80, 64, 1, 0.1, 1.0);
        let mut sym = window_for(&ofdm_symbol(64, 16, 3));
        let w = 0.002;
        rotate(&mut sym, w);
        let phase = measure_symbol_offset(&sym, &params).unwrap();
        assert!(phase < 0.0, "positive offset measures negative, got {phase}");
        assert_relative_eq!(phase, -w * 64.0, epsilon = 1e-9);
    }

    #[test]
    fn test_window_too_short() {
        let params = FfeParams::new(10, 8, 1, 0.1, 1.0);
        let window = vec![Complex64::new(1.0, 0.0); 10];
        assert_eq!(
            measure_symbol_offset(&window, &params),
            Err(FfeError::WindowTooShort {
                required: 11,
                available: 10
            })
        );
    }

    #[test]
    fn test_unchecked_phase_matches_measurement() {
        let params = FfeParams::new(80, 64, 1, 0.1, 1.0);
        let mut window = window_for(&ofdm_symbol(64, 16, 1));
        rotate(&mut window, -0.004);
        assert_eq!(
            measure_symbol_offset(&window, &params),
            Ok(symbol_phase(&window, &params))
        );
        assert_relative_eq!(symbol_phase(&window, &params), 0.004 * 64.0, epsilon = 1e-9);
    }

    #[test]
    fn test_trigger_aligned_symbol_loses_one_pair() {
        // Window ends on the symbol's last sample, as when the trigger
        // marks its first sample: one zero sample precedes the symbol
        let sym = ofdm_symbol(64, 16, 2);
        let mut window = vec![Complex64::new(0.0, 0.0)];
        window.extend_from_slice(&sym);
        let sum = cp_correlation(window.as_slice(), 80, 64);
        assert_relative_eq!(sum.norm(), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_silence_measures_zero() {
        let params = FfeParams::new(10, 8, 1, 0.1, 1.0);
        let window = vec![Complex64::new(0.0, 0.0); 11];
        assert_eq!(measure_symbol_offset(&window, &params), Ok(0.0));
    }
}
