//! # OFDM Fine Frequency Estimation
//!
//! Streaming estimator of the residual (fine) carrier frequency offset of an
//! OFDM signal, measured from cyclic-prefix self-correlation. Built for DAB
//! receivers but parameterized for any CP-OFDM symbol geometry.
//!
//! ## Signal Flow
//!
//! ```text
//! coarse sync ──► I/Q + frame trigger ──► FfeEstimator ──► rad/sample ──► corrector
//!                                           │
//!                                           ├─ CP correlation per symbol
//!                                           ├─ unwrap + average over N symbols
//!                                           └─ fast acquire / slow smoothing
//! ```
//!
//! Symbol timing and the correction itself happen elsewhere; this crate only
//! measures.
//!
//! ## Example
//!
//! ```rust
//! use ofdm_ffe::prelude::*;
//! use num_complex::Complex64;
//!
//! let params = FfeParams::builder().mode(DabMode::II).num_symbols(4).build();
//! let mut ffe = FfeEstimator::new(params).unwrap();
//!
//! let samples = vec![Complex64::new(1.0, 0.0); 4096];
//! let mut triggers = vec![false; 4096];
//! triggers[0] = true;
//!
//! let estimates = ffe.process(&samples, &triggers).unwrap();
//! assert_eq!(estimates.len(), samples.len());
//! ```

pub mod config;
pub mod cp_correlation;
pub mod estimator;
pub mod history;
pub mod logging;
pub mod observe;
pub mod params;
pub mod phase_unwrap;
pub mod types;

pub use config::{ConfigError, FfeConfig};
pub use cp_correlation::measure_symbol_offset;
pub use estimator::{FfeEstimator, FfeState};
pub use history::{SampleHistory, SampleWindow};
pub use observe::{FfeEvent, FfeObserver, RecordingObserver, TracingObserver};
pub use params::{DabMode, FfeParams};
pub use types::{FfeError, FfeResult, IQSample};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::estimator::FfeEstimator;
    pub use crate::history::SampleWindow;
    pub use crate::observe::{FfeEvent, FfeObserver};
    pub use crate::params::{DabMode, FfeParams};
    pub use crate::types::{FfeError, FfeResult, IQSample};
}
