//! # Estimator Observability
//!
//! The estimator reports what it decided through [`FfeEvent`]s handed to an
//! [`FfeObserver`]. Decision logic stays free of I/O; the observer decides
//! what to do with each event.
//!
//! - [`TracingObserver`] (default) forwards events to `tracing`
//! - [`RecordingObserver`] keeps them in memory for inspection
//!
//! ```text
//! FfeState::advance ──► FfeEvent ──► FfeObserver
//!                                      ├─ TracingObserver  → info!/warn!/debug!
//!                                      └─ RecordingObserver → Vec<FfeEvent>
//! ```

use crate::phase_unwrap::PhaseWrap;

/// Something the estimator decided while processing a sample.
#[derive(Debug, Clone, PartialEq)]
pub enum FfeEvent {
    /// A symbol's raw phase was moved by 2π to sit next to the running
    /// average of the current window.
    SymbolUnwrapped {
        symbol_index: usize,
        direction: PhaseWrap,
        raw: f64,
        unwrapped: f64,
    },
    /// The new window average lies across ±π from the published
    /// estimate; the published estimate was moved by 2π before smoothing.
    DiscontinuityDetected {
        direction: PhaseWrap,
        previous_estimate: f64,
        window_average: f64,
    },
    /// A window completed and a new estimate was published.
    EstimateUpdated {
        /// Smoothed phase offset over one FFT length (rad).
        estimated_error: f64,
        /// Emitted value (rad/sample).
        per_sample: f64,
        /// Offset in Hz.
        offset_hz: f64,
        /// True when the estimate was assigned directly rather than smoothed.
        fast_acquisition: bool,
    },
}

/// Receiver for estimator events.
pub trait FfeObserver {
    fn on_event(&mut self, event: &FfeEvent);
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FfeObserver for TracingObserver {
    fn on_event(&mut self, event: &FfeEvent) {
        match *event {
            FfeEvent::SymbolUnwrapped {
                symbol_index,
                direction,
                raw,
                unwrapped,
            } => {
                tracing::debug!(symbol_index, %direction, raw, unwrapped, "symbol phase unwrapped");
            }
            FfeEvent::DiscontinuityDetected {
                direction,
                previous_estimate,
                window_average,
            } => {
                tracing::warn!(
                    %direction,
                    previous_estimate,
                    window_average,
                    "phase discontinuity detected"
                );
            }
            FfeEvent::EstimateUpdated {
                estimated_error,
                per_sample,
                offset_hz,
                fast_acquisition,
            } => {
                tracing::info!(
                    estimated_error,
                    per_sample,
                    offset_hz,
                    fast_acquisition,
                    "fine frequency estimate updated"
                );
            }
        }
    }
}

/// Keeps every event in order of arrival.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Vec<FfeEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[FfeEvent] {
        &self.events
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<FfeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of published estimates seen.
    pub fn updates(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, FfeEvent::EstimateUpdated { .. }))
            .count()
    }

    /// Directions of the discontinuities seen.
    pub fn discontinuities(&self) -> Vec<PhaseWrap> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FfeEvent::DiscontinuityDetected { direction, .. } => Some(*direction),
                _ => None,
            })
            .collect()
    }
}

impl FfeObserver for RecordingObserver {
    fn on_event(&mut self, event: &FfeEvent) {
        self.events.push(event.clone());
    }
}
