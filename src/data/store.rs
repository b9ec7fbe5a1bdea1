//! Per-batch state: current tier, trend window, transition log, advisories.
//!
//! [`BatchStore`] owns one [`BatchRecord`] per configured batch id.
//! [`BatchStore::apply_update`] is the only mutation path; every consumer
//! of batch state (views, export) reads through the store. A rejected
//! update leaves the store exactly as it was.

use std::collections::{BTreeMap, VecDeque};

use chrono::Utc;
use thiserror::Error;

use super::advisory::{advisory_for, Advisory, TransitionEvent};
use super::tier::{classify, InvalidScore, QualityTier};
use super::window::{Measurement, TrendWindow};

/// Maximum number of advisories retained per batch.
pub const ADVISORY_CAP: usize = 10;

/// Why an update was rejected. Rejections never mutate state.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum UpdateError {
    #[error("unknown batch id: {0}")]
    UnknownUnit(u32),
    #[error(transparent)]
    InvalidScore(#[from] InvalidScore),
}

/// Everything tracked for one monitored batch.
#[derive(Debug, Clone)]
pub struct BatchRecord {
    pub id: u32,
    /// None until the first classified observation arrives.
    pub current_tier: Option<QualityTier>,
    pub window: TrendWindow,
    /// Append-only transition history, unbounded.
    pub log: Vec<TransitionEvent>,
    /// Most-recent-first, capped at [`ADVISORY_CAP`].
    pub advisories: VecDeque<Advisory>,
}

impl BatchRecord {
    fn new(id: u32) -> Self {
        Self {
            id,
            current_tier: None,
            window: TrendWindow::new(),
            log: Vec::new(),
            advisories: VecDeque::new(),
        }
    }

    /// The most recent measurement, if any.
    pub fn latest(&self) -> Option<&Measurement> {
        self.window.latest()
    }
}

/// Result of applying one measurement.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub tier: QualityTier,
    /// Present when the tier changed (or was set for the first time).
    pub transition: Option<TransitionEvent>,
    /// Present when the transition matched an advisory rule.
    pub advisory: Option<Advisory>,
}

/// Owns every batch record for the session.
#[derive(Debug, Clone)]
pub struct BatchStore {
    records: BTreeMap<u32, BatchRecord>,
}

impl BatchStore {
    /// Create a store tracking batch ids `1..=units`.
    pub fn with_units(units: u32) -> Self {
        Self::new(1..=units)
    }

    /// Create a store tracking exactly the given batch ids.
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            records: ids.into_iter().map(|id| (id, BatchRecord::new(id))).collect(),
        }
    }

    /// Apply one measurement to one batch.
    ///
    /// Validates the id, classifies the score, records a transition event
    /// (and an advisory when the transition has a rule) if the tier
    /// changed, then appends the measurement to the window. On
    /// [`UpdateError`] nothing is mutated.
    pub fn apply_update(
        &mut self,
        unit_id: u32,
        measurement: Measurement,
    ) -> Result<UpdateOutcome, UpdateError> {
        let record = self
            .records
            .get_mut(&unit_id)
            .ok_or(UpdateError::UnknownUnit(unit_id))?;
        let tier = classify(measurement.score)?;

        let transition = match record.current_tier {
            Some(previous) if previous == tier => None,
            previous => {
                let event = TransitionEvent {
                    timestamp: measurement.timestamp,
                    from: previous,
                    to: tier,
                    occurred_at: Utc::now(),
                };
                record.log.push(event);
                Some(event)
            }
        };

        // First observation (from = None) is logged but never advisory-worthy
        let advisory = transition
            .and_then(|event| event.from)
            .and_then(|from| advisory_for(from, tier, measurement.timestamp));
        if let Some(advisory) = advisory {
            record.advisories.push_front(advisory);
            record.advisories.truncate(ADVISORY_CAP);
        }

        record.current_tier = Some(tier);
        record.window.push(measurement);

        Ok(UpdateOutcome {
            tier,
            transition,
            advisory,
        })
    }

    pub fn record(&self, unit_id: u32) -> Option<&BatchRecord> {
        self.records.get(&unit_id)
    }

    /// Iterate records in ascending id order.
    pub fn records(&self) -> impl Iterator<Item = &BatchRecord> {
        self.records.values()
    }

    /// Configured batch ids, ascending.
    pub fn unit_ids(&self) -> Vec<u32> {
        self.records.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Advisories across all batches, most recent first.
    pub fn all_advisories(&self) -> Vec<(u32, &Advisory)> {
        let mut advisories: Vec<(u32, &Advisory)> = self
            .records
            .values()
            .flat_map(|r| r.advisories.iter().map(|a| (r.id, a)))
            .collect();
        advisories.sort_by(|a, b| b.1.occurred_at.cmp(&a.1.occurred_at));
        advisories
    }
}
