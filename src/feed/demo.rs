//! Built-in synthetic backend.
//!
//! Generates the reference fermentation run locally so the tracker can be
//! tried without a server. Ideal values follow the golden fermentation
//! curves (a 72-hour run sampled every 30 minutes); each of the four
//! batches gets its own personality by deviating from those curves:
//!
//!   batch 1  steady mid-grade run
//!   batch 2  textbook run, barely off the curve
//!   batch 3  degrades from start to finish, crossing every tier
//!   batch 4  persistently poor, hovering near failure
//!
//! Frames are encoded through the same wire types the live feed decodes,
//! so the demo exercises the full dispatch path.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing::{info, warn};

use super::message::{Comparison, DataPoint, StreamMessage, UnitSnapshot};
use super::{Feed, FeedEvent, LinkStatus};
use crate::data::ParamValues;

const BATCH_COUNT: u32 = 4;
/// Length of the reference run, in hours.
const RUN_HOURS: f64 = 72.0;
/// Sampling interval, in hours.
const STEP_HOURS: f64 = 0.5;
const TOTAL_STEPS: u64 = (RUN_HOURS / STEP_HOURS) as u64;

/// A feed that synthesizes the reference batches locally.
#[derive(Debug)]
pub struct DemoFeed {
    receiver: mpsc::Receiver<FeedEvent>,
    description: String,
    stop_tx: watch::Sender<bool>,
}

impl DemoFeed {
    /// Spawn the generator, one round of batch updates every `cadence`.
    pub fn spawn(cadence: Duration) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let (stop_tx, stop_rx) = watch::channel(false);

        tokio::spawn(run_demo(cadence, tx, stop_rx));

        Self {
            receiver: rx,
            description: format!("demo: {} synthetic batches", BATCH_COUNT),
            stop_tx,
        }
    }

    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }
}

impl Drop for DemoFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Feed for DemoFeed {
    fn poll(&mut self) -> Option<FeedEvent> {
        self.receiver.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Ideal parameter values `t` hours into the run.
///
/// pH falls along a sigmoid from 5.8 toward 4.8, temperature peaks at
/// 21 °C fifteen hours in, and CO2 builds logistically toward 12 g/L.
fn golden(t: f64) -> ParamValues {
    let midpoint = RUN_HOURS / 2.0;
    ParamValues {
        ph: 5.8 - 1.0 / (1.0 + (-0.1 * (t - midpoint)).exp()),
        temperature: 18.0 + 3.0 * (-(t - 15.0).powi(2) / 200.0).exp(),
        co2: 12.0 / (1.0 + (-0.15 * (t - midpoint)).exp()),
    }
}

/// How many quality points batch `batch` is off the curve at hour `t`.
fn penalty(batch: u32, t: f64, rng: &mut impl Rng) -> f64 {
    let raw = match batch {
        1 => 8.0 + rng.gen_range(-1.5..=1.5),
        2 => 0.5 + rng.gen_range(-0.4..=0.4),
        // Deterministic ramp so the run crosses every tier boundary
        3 => 3.0 + 29.0 * (t / RUN_HOURS).clamp(0.0, 1.0),
        _ => 15.0 + rng.gen_range(-2.0..=2.0),
    };
    raw.max(0.0)
}

/// One measurement for `batch` at sample `step`.
///
/// Deviations are sized so the backend's scoring formula (pH allowance
/// 1.0, temperature and CO2 allowance 5.0, averaged) lands exactly
/// `penalty` points below 100.
fn sample(batch: u32, step: u64, rng: &mut impl Rng) -> (DataPoint, Comparison) {
    let t = step as f64 * STEP_HOURS;
    let ideal = golden(t);
    let off = penalty(batch, t, rng);

    let actual = ParamValues {
        ph: ideal.ph + 0.01 * off,
        temperature: ideal.temperature + 0.05 * off,
        co2: ideal.co2 + 0.05 * off,
    };
    let quality_score = ((100.0 - off) * 10.0).round() / 10.0;

    let point = DataPoint {
        timestamp: t,
        ph: actual.ph,
        temperature: actual.temperature,
        co2: actual.co2,
    };
    let comparison = Comparison {
        actual,
        ideal,
        quality_score,
    };
    (point, comparison)
}

fn encode(message: &StreamMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!(error = %e, "demo frame encode failed");
            None
        }
    }
}

async fn run_demo(
    cadence: Duration,
    events: mpsc::Sender<FeedEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut rng = StdRng::from_entropy();

    if events.send(FeedEvent::Link(LinkStatus::Connecting)).await.is_err() {
        return;
    }
    if events.send(FeedEvent::Link(LinkStatus::Connected)).await.is_err() {
        return;
    }

    let mut data = BTreeMap::new();
    for batch in 1..=BATCH_COUNT {
        let (point, comparison) = sample(batch, 0, &mut rng);
        data.insert(
            batch.to_string(),
            UnitSnapshot {
                data_point: point,
                comparison,
            },
        );
    }
    if let Some(frame) = encode(&StreamMessage::InitialState { data }) {
        if events.send(FeedEvent::Frame(frame)).await.is_err() {
            return;
        }
    }

    let mut step: u64 = 1;
    let mut ticker = time::interval(cadence);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for batch in 1..=BATCH_COUNT {
                    let (point, comparison) = sample(batch, step, &mut rng);
                    let message = StreamMessage::BatchUpdate {
                        batch_number: batch,
                        data_point: point,
                        comparison,
                    };
                    if let Some(frame) = encode(&message) {
                        if events.send(FeedEvent::Frame(frame)).await.is_err() {
                            return;
                        }
                    }
                }

                step += 1;
                if step > TOTAL_STEPS {
                    info!("demo run complete, starting over");
                    step = 0;
                }
            }
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    return;
                }
            }
        }
    }
}
