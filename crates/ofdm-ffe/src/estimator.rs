//! Fine Frequency Estimator — streaming CP-correlation offset tracking
//!
//! Measures the residual carrier offset of an OFDM stream after coarse
//! synchronization. Unlike a PLL/FLL it does not correct anything; it emits
//! one phase-per-sample estimate for every input sample.
//!
//! ## Per-sample step
//!
//! ```text
//! trigger? ──► reset symbol/sample counters and error_sum
//!   │
//! sample_index += 1
//!   │
//! symbol boundary? ──no──► emit last published estimate
//!   │yes
//!   ├─ symbol_index < num_symbols:
//!   │     raw = arg(CP correlation), unwrap against running average,
//!   │     error_sum += raw
//!   ├─ symbol_index == num_symbols - 1:
//!   │     avg = error_sum / num_symbols, unwrap published estimate against avg,
//!   │     estimate = avg (first time) or alpha*avg + (1-alpha)*estimate,
//!   │     publish estimate / fft_length
//!   └─ symbol_index += 1
//! ```
//!
//! The estimator starts idle: nothing is accumulated until the first
//! trigger. After a window completes the symbol index saturates, so each
//! triggered frame yields exactly one update.
//!
//! ## Example
//!
//! ```rust
//! use ofdm_ffe::{FfeEstimator, FfeParams};
//! use num_complex::Complex64;
//!
//! let params = FfeParams::new(10, 8, 4, 0.1, 1.0);
//! let mut ffe = FfeEstimator::new(params).unwrap();
//!
//! // Tone whose CP correlation rotates by 0.05 rad per symbol
//! let w = -0.05 / 8.0;
//! let samples: Vec<Complex64> = (0..60)
//!     .map(|n| Complex64::from_polar(1.0, w * n as f64))
//!     .collect();
//! let mut triggers = vec![false; 60];
//! triggers[15] = true;
//!
//! let out = ffe.process(&samples, &triggers).unwrap();
//! assert_eq!(out[53], 0.0);
//! assert!((out[54] - 0.05 / 8.0).abs() < 1e-9);
//! ```

use crate::cp_correlation::symbol_phase;
use crate::history::{SampleHistory, SampleWindow};
use crate::observe::{FfeEvent, FfeObserver, TracingObserver};
use crate::params::FfeParams;
use crate::phase_unwrap::detect_wrap;
use crate::types::{FfeError, FfeResult, IQSample, Radians};

/// Mutable state of the estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct FfeState {
    /// Symbol within the averaging window, in `[0, num_symbols]`.
    current_symbol_index: usize,
    /// Position within the current symbol, in `[0, symbol_length)`.
    current_sample_index: usize,
    /// Sum of unwrapped per-symbol phases in the active window.
    error_sum: Radians,
    /// Published phase offset over one FFT length.
    estimated_error: Radians,
    /// `estimated_error / fft_length`, emitted for every sample.
    estimated_error_per_sample: Radians,
}

impl FfeState {
    /// Idle state: no window is open until the first trigger.
    pub fn new(params: &FfeParams) -> Self {
        Self {
            current_symbol_index: params.num_symbols,
            current_sample_index: 0,
            error_sum: 0.0,
            estimated_error: 0.0,
            estimated_error_per_sample: 0.0,
        }
    }

    pub fn current_symbol_index(&self) -> usize {
        self.current_symbol_index
    }

    pub fn current_sample_index(&self) -> usize {
        self.current_sample_index
    }

    pub fn error_sum(&self) -> Radians {
        self.error_sum
    }

    pub fn estimated_error(&self) -> Radians {
        self.estimated_error
    }

    pub fn estimated_error_per_sample(&self) -> Radians {
        self.estimated_error_per_sample
    }

    /// Advance by one sample. `window` offset 0 must be the sample just
    /// received, with at least `symbol_length` samples behind it.
    ///
    /// Returns the estimate to emit for this sample.
    pub fn advance<W, O>(
        &mut self,
        params: &FfeParams,
        window: &W,
        trigger: bool,
        observer: &mut O,
    ) -> Radians
    where
        W: SampleWindow + ?Sized,
        O: FfeObserver + ?Sized,
    {
        if trigger {
            self.current_symbol_index = 0;
            self.current_sample_index = 0;
            self.error_sum = 0.0;
        }

        self.current_sample_index += 1;

        if self.current_sample_index == params.symbol_length {
            self.current_sample_index = 0;

            if self.current_symbol_index < params.num_symbols {
                self.accumulate_symbol(params, window, observer);

                if self.current_symbol_index == params.num_symbols - 1 {
                    self.publish(params, observer);
                }

                self.current_symbol_index += 1;
            }
        }

        self.estimated_error_per_sample
    }

    fn accumulate_symbol<W, O>(&mut self, params: &FfeParams, window: &W, observer: &mut O)
    where
        W: SampleWindow + ?Sized,
        O: FfeObserver + ?Sized,
    {
        let raw = symbol_phase(window, params);
        let mut estimate = raw;

        if self.current_symbol_index > 0 {
            let running_avg = self.error_sum / self.current_symbol_index as f64;
            if let Some(direction) = detect_wrap(running_avg, raw) {
                estimate = direction.align_value(raw);
                observer.on_event(&FfeEvent::SymbolUnwrapped {
                    symbol_index: self.current_symbol_index,
                    direction,
                    raw,
                    unwrapped: estimate,
                });
            }
        }

        self.error_sum += estimate;
    }

    fn publish<O: FfeObserver + ?Sized>(&mut self, params: &FfeParams, observer: &mut O) {
        let window_avg = self.error_sum / params.num_symbols as f64;

        // Offsets near half the subcarrier spacing flip between +π and -π
        // from one window to the next
        if let Some(direction) = detect_wrap(self.estimated_error, window_avg) {
            observer.on_event(&FfeEvent::DiscontinuityDetected {
                direction,
                previous_estimate: self.estimated_error,
                window_average: window_avg,
            });
            self.estimated_error = direction.align_reference(self.estimated_error);
        }

        // Exact comparison: only a never-updated estimate is zero
        let fast_acquisition = self.estimated_error == 0.0;
        self.estimated_error = if fast_acquisition {
            window_avg
        } else {
            params.alpha * window_avg + (1.0 - params.alpha) * self.estimated_error
        };
        self.estimated_error_per_sample = self.estimated_error / params.fft_length as f64;

        observer.on_event(&FfeEvent::EstimateUpdated {
            estimated_error: self.estimated_error,
            per_sample: self.estimated_error_per_sample,
            offset_hz: params.per_sample_to_hz(self.estimated_error_per_sample),
            fast_acquisition,
        });
    }
}

/// Streaming fine frequency estimator.
///
/// Owns its parameters, state, a one-symbol sample history and an event
/// observer. One instance per stream.
#[derive(Debug, Clone)]
pub struct FfeEstimator<O = TracingObserver> {
    params: FfeParams,
    state: FfeState,
    history: SampleHistory,
    observer: O,
}

impl FfeEstimator<TracingObserver> {
    /// Create an estimator that logs through `tracing`.
    pub fn new(params: FfeParams) -> FfeResult<Self> {
        Self::with_observer(params, TracingObserver)
    }
}

impl<O: FfeObserver> FfeEstimator<O> {
    /// Create an estimator reporting to `observer`.
    pub fn with_observer(params: FfeParams, observer: O) -> FfeResult<Self> {
        params.validate()?;
        tracing::debug!(
            symbol_length = params.symbol_length,
            fft_length = params.fft_length,
            num_symbols = params.num_symbols,
            alpha = params.alpha,
            "fine frequency estimator created"
        );
        Ok(Self {
            state: FfeState::new(&params),
            history: SampleHistory::new(params.required_lookback()),
            params,
            observer,
        })
    }

    /// Process one sample. `trigger` marks the first sample of a frame.
    ///
    /// Returns the current estimate in rad/sample, already reflecting an
    /// update made on this call.
    #[inline]
    pub fn process_sample(&mut self, sample: IQSample, trigger: bool) -> Radians {
        self.history.push(sample);
        self.state
            .advance(&self.params, &self.history, trigger, &mut self.observer)
    }

    /// Process one sample whose lookback lives in a caller-owned window.
    /// Offset 0 of `window` is the new sample. The internal history is
    /// not touched.
    ///
    /// # Panics
    ///
    /// May panic at a symbol boundary if `window` is shallower than
    /// `symbol_length + 1` samples.
    pub fn step<W: SampleWindow + ?Sized>(&mut self, window: &W, trigger: bool) -> Radians {
        debug_assert!(window.depth() >= self.params.required_lookback());
        self.state
            .advance(&self.params, window, trigger, &mut self.observer)
    }

    /// Process a block of samples with their trigger flags, one output
    /// per input.
    pub fn process(&mut self, samples: &[IQSample], triggers: &[bool]) -> FfeResult<Vec<Radians>> {
        let mut output = vec![0.0; samples.len()];
        self.process_into(samples, triggers, &mut output)?;
        Ok(output)
    }

    /// Like [`process`](Self::process), writing into `output`.
    /// Returns the number of samples processed, always `samples.len()`.
    ///
    /// `output` may be longer than `samples`; the tail is left untouched.
    /// Nothing is consumed when either length check fails.
    pub fn process_into(
        &mut self,
        samples: &[IQSample],
        triggers: &[bool],
        output: &mut [Radians],
    ) -> FfeResult<usize> {
        if samples.len() != triggers.len() {
            return Err(FfeError::LengthMismatch {
                samples: samples.len(),
                triggers: triggers.len(),
            });
        }
        if output.len() < samples.len() {
            return Err(FfeError::OutputTooShort {
                required: samples.len(),
                available: output.len(),
            });
        }
        for ((out, &sample), &trigger) in output.iter_mut().zip(samples).zip(triggers) {
            *out = self.process_sample(sample, trigger);
        }
        Ok(samples.len())
    }

    /// Return to the construction state: idle, zero estimate, empty history.
    pub fn reset(&mut self) {
        self.state = FfeState::new(&self.params);
        self.history.clear();
    }

    pub fn params(&self) -> &FfeParams {
        &self.params
    }

    pub fn state(&self) -> &FfeState {
        &self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Current estimate in rad/sample.
    pub fn estimate_per_sample(&self) -> Radians {
        self.state.estimated_error_per_sample
    }

    /// Current estimate in Hz.
    pub fn estimated_offset_hz(&self) -> f64 {
        self.params
            .per_sample_to_hz(self.state.estimated_error_per_sample)
    }
}
