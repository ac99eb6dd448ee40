//! Estimator Parameters
//!
//! Fixed per-instance configuration of the fine frequency estimator.
//!
//! ## Symbol Geometry
//!
//! ```text
//! |<-------------------- symbol_length -------------------->|
//! |<-- CP (L) -->|<------------- fft_length --------------->|
//! |  copy of ──────────────────────────────────►  this tail |
//! ```
//!
//! The cyclic prefix length `L = symbol_length - fft_length` must be at
//! least one sample, otherwise there is nothing to correlate.
//!
//! ## DAB Transmission Modes
//!
//! | Mode | FFT  | Guard | Symbol |
//! |------|------|-------|--------|
//! | I    | 2048 | 504   | 2552   |
//! | II   | 512  | 126   | 638    |
//! | III  | 256  | 63    | 319    |
//! | IV   | 1024 | 252   | 1276   |
//!
//! All modes run at 2.048 MHz.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::types::{FfeError, FfeResult};

/// DAB sample rate shared by all transmission modes.
pub const DAB_SAMPLE_RATE: f64 = 2.048e6;

/// DAB transmission mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DabMode {
    /// Mode I: 2048-point FFT, VHF Band III.
    #[default]
    I,
    /// Mode II: 512-point FFT, L-Band.
    II,
    /// Mode III: 256-point FFT, below 3 GHz.
    III,
    /// Mode IV: 1024-point FFT, L-Band.
    IV,
}

impl DabMode {
    /// `(symbol_length, fft_length)` in samples.
    pub fn symbol_geometry(&self) -> (usize, usize) {
        match self {
            DabMode::I => (2552, 2048),
            DabMode::II => (638, 512),
            DabMode::III => (319, 256),
            DabMode::IV => (1276, 1024),
        }
    }
}

impl fmt::Display for DabMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DabMode::I => write!(f, "Mode I"),
            DabMode::II => write!(f, "Mode II"),
            DabMode::III => write!(f, "Mode III"),
            DabMode::IV => write!(f, "Mode IV"),
        }
    }
}

/// Fine frequency estimator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FfeParams {
    /// OFDM symbol length including the cyclic prefix, in samples.
    pub symbol_length: usize,
    /// Useful (FFT) part of the symbol, in samples.
    pub fft_length: usize,
    /// Symbols averaged per estimate update.
    pub num_symbols: usize,
    /// Smoothing factor for slow tracking, in (0, 1].
    pub alpha: f64,
    /// Sample rate in Hz. Only used for reporting.
    pub sample_rate: f64,
}

impl Default for FfeParams {
    fn default() -> Self {
        Self::dab(DabMode::default())
    }
}

impl FfeParams {
    /// Create parameters, unchecked. Call [`validate`](Self::validate)
    /// before streaming.
    pub fn new(
        symbol_length: usize,
        fft_length: usize,
        num_symbols: usize,
        alpha: f64,
        sample_rate: f64,
    ) -> Self {
        Self {
            symbol_length,
            fft_length,
            num_symbols,
            alpha,
            sample_rate,
        }
    }

    /// Preset for a DAB transmission mode.
    pub fn dab(mode: DabMode) -> Self {
        let (symbol_length, fft_length) = mode.symbol_geometry();
        Self::new(symbol_length, fft_length, 8, 0.1, DAB_SAMPLE_RATE)
    }

    /// Create a new builder, starting from the DAB mode I preset.
    pub fn builder() -> FfeParamsBuilder {
        FfeParamsBuilder::default()
    }

    /// Cyclic prefix length in samples.
    pub fn cp_length(&self) -> usize {
        self.symbol_length.saturating_sub(self.fft_length)
    }

    /// Samples of lookback the correlation needs, current sample included.
    pub fn required_lookback(&self) -> usize {
        self.symbol_length + 1
    }

    /// Convert a phase-per-sample value to Hz.
    pub fn per_sample_to_hz(&self, per_sample: f64) -> f64 {
        per_sample * self.sample_rate / (2.0 * PI)
    }

    /// Check the structural preconditions of the estimator.
    pub fn validate(&self) -> FfeResult<()> {
        if self.symbol_length == 0 {
            return Err(FfeError::InvalidSymbolLength);
        }
        if self.fft_length == 0 || self.fft_length >= self.symbol_length {
            return Err(FfeError::InvalidFftLength {
                symbol_length: self.symbol_length,
                fft_length: self.fft_length,
            });
        }
        if self.num_symbols == 0 {
            return Err(FfeError::InvalidNumSymbols);
        }
        // NaN fails both comparisons
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(FfeError::InvalidAlpha(self.alpha));
        }
        if !(self.sample_rate > 0.0) || !self.sample_rate.is_finite() {
            return Err(FfeError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }
}

/// Builder for FfeParams
#[derive(Default)]
pub struct FfeParamsBuilder {
    params: FfeParams,
}

impl FfeParamsBuilder {
    pub fn mode(mut self, mode: DabMode) -> Self {
        let (symbol_length, fft_length) = mode.symbol_geometry();
        self.params.symbol_length = symbol_length;
        self.params.fft_length = fft_length;
        self.params.sample_rate = DAB_SAMPLE_RATE;
        self
    }

    pub fn symbol_length(mut self, len: usize) -> Self {
        self.params.symbol_length = len;
        self
    }

    pub fn fft_length(mut self, len: usize) -> Self {
        self.params.fft_length = len;
        self
    }

    pub fn num_symbols(mut self, n: usize) -> Self {
        self.params.num_symbols = n;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.params.alpha = alpha;
        self
    }

    pub fn sample_rate(mut self, rate_hz: f64) -> Self {
        self.params.sample_rate = rate_hz;
        self
    }

    pub fn build(self) -> FfeParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dab_presets() {
        let p = FfeParams::dab(DabMode::I);
        assert_eq!(p.symbol_length, 2552);
        assert_eq!(p.fft_length, 2048);
        assert_eq!(p.cp_length(), 504);
        assert_eq!(p.required_lookback(), 2553);

        for mode in [DabMode::I, DabMode::II, DabMode::III, DabMode::IV] {
            assert!(FfeParams::dab(mode).validate().is_ok(), "{mode}");
        }
        assert_eq!(FfeParams::dab(DabMode::III).cp_length(), 63);
    }

    #[test]
    fn test_builder() {
        let p = FfeParams::builder()
            .symbol_length(10)
            .fft_length(8)
            .num_symbols(4)
            .alpha(0.1)
            .sample_rate(1.0)
            .build();
        assert_eq!(p, FfeParams::new(10, 8, 4, 0.1, 1.0));
        assert_eq!(p.cp_length(), 2);

        let p = FfeParams::builder().mode(DabMode::II).num_symbols(3).build();
        assert_eq!(p.symbol_length, 638);
        assert_eq!(p.num_symbols, 3);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            FfeParams::new(0, 0, 1, 0.5, 1.0).validate(),
            Err(FfeError::InvalidSymbolLength)
        );
        assert_eq!(
            FfeParams::new(8, 8, 1, 0.5, 1.0).validate(),
            Err(FfeError::InvalidFftLength {
                symbol_length: 8,
                fft_length: 8
            })
        );
        assert_eq!(
            FfeParams::new(10, 8, 0, 0.5, 1.0).validate(),
            Err(FfeError::InvalidNumSymbols)
        );
        assert!(matches!(
            FfeParams::new(10, 8, 1, 0.0, 1.0).validate(),
            Err(FfeError::InvalidAlpha(_))
        ));
        assert!(matches!(
            FfeParams::new(10, 8, 1, f64::NAN, 1.0).validate(),
            Err(FfeError::InvalidAlpha(_))
        ));
        assert!(matches!(
            FfeParams::new(10, 8, 1, 1.0, -2.0).validate(),
            Err(FfeError::InvalidSampleRate(_))
        ));
        assert!(FfeParams::new(10, 8, 1, 1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_per_sample_to_hz() {
        let p = FfeParams::new(10, 8, 1, 0.1, 1000.0);
        let hz = p.per_sample_to_hz(2.0 * PI * 0.01);
        assert!((hz - 10.0).abs() < 1e-9);
    }
}
