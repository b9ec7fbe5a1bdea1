//! Bounded sliding window of recent measurements.
//!
//! Each batch keeps the last [`WINDOW_CAPACITY`] measurements for trend
//! display and export. Storing whole rows keeps the per-parameter series
//! aligned by construction; the parallel-sequence view chart sinks expect
//! is derived on demand by [`TrendWindow::to_series`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum number of measurements retained per batch.
pub const WINDOW_CAPACITY: usize = 50;

/// One of the three tracked fermentation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Ph,
    Temperature,
    Co2,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Parameter::Ph, Parameter::Temperature, Parameter::Co2];

    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Temperature => "Temperature",
            Parameter::Co2 => "CO2",
        }
    }

    /// Display unit, empty for the dimensionless pH scale.
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Ph => "",
            Parameter::Temperature => "°C",
            Parameter::Co2 => "g/L",
        }
    }

    /// Cycle to the next parameter (wraps around).
    pub fn next(self) -> Self {
        match self {
            Parameter::Ph => Parameter::Temperature,
            Parameter::Temperature => Parameter::Co2,
            Parameter::Co2 => Parameter::Ph,
        }
    }
}

/// Readings for the three tracked parameters, actual or ideal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamValues {
    pub ph: f64,
    pub temperature: f64,
    pub co2: f64,
}

impl ParamValues {
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Ph => self.ph,
            Parameter::Temperature => self.temperature,
            Parameter::Co2 => self.co2,
        }
    }
}

/// One timestamped reading with its golden-standard comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Elapsed process time in hours.
    pub timestamp: f64,
    pub actual: ParamValues,
    pub ideal: ParamValues,
    /// 0-100 similarity score computed upstream.
    pub score: f64,
}

/// Aligned per-parameter view of a window, ready for a chart sink.
///
/// Every vector has the same length as `timestamps`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowSeries {
    pub timestamps: Vec<f64>,
    pub actual: SeriesSet,
    pub ideal: SeriesSet,
    pub scores: Vec<f64>,
}

/// One series per parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    pub ph: Vec<f64>,
    pub temperature: Vec<f64>,
    pub co2: Vec<f64>,
}

/// Fixed-capacity FIFO of recent measurements for one batch.
#[derive(Debug, Clone)]
pub struct TrendWindow {
    capacity: usize,
    entries: VecDeque<Measurement>,
}

impl Default for TrendWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendWindow {
    /// Create an empty window with the standard capacity.
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    /// Create an empty window with a custom capacity (used by tests).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a measurement, evicting the oldest entry once full.
    pub fn push(&mut self, measurement: Measurement) {
        self.entries.push_back(measurement);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recent measurement, if any.
    pub fn latest(&self) -> Option<&Measurement> {
        self.entries.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.entries.iter()
    }

    /// Extract the aligned per-parameter series.
    pub fn to_series(&self) -> WindowSeries {
        let mut series = WindowSeries::default();
        for m in &self.entries {
            series.timestamps.push(m.timestamp);
            series.actual.ph.push(m.actual.ph);
            series.actual.temperature.push(m.actual.temperature);
            series.actual.co2.push(m.actual.co2);
            series.ideal.ph.push(m.ideal.ph);
            series.ideal.temperature.push(m.ideal.temperature);
            series.ideal.co2.push(m.ideal.co2);
            series.scores.push(m.score);
        }
        series
    }

    /// Actual readings for one parameter as (timestamp, value) chart points.
    pub fn actual_points(&self, parameter: Parameter) -> Vec<(f64, f64)> {
        self.entries.iter().map(|m| (m.timestamp, m.actual.get(parameter))).collect()
    }

    /// Ideal readings for one parameter as (timestamp, value) chart points.
    pub fn ideal_points(&self, parameter: Parameter) -> Vec<(f64, f64)> {
        self.entries.iter().map(|m| (m.timestamp, m.ideal.get(parameter))).collect()
    }

    /// Recent scores, oldest to newest, for sparkline rendering.
    pub fn scores(&self) -> Vec<f64> {
        self.entries.iter().map(|m| m.score).collect()
    }
}
