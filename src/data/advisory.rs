//! Tier-transition events and operator advisories.
//!
//! Every tier change is recorded as a [`TransitionEvent`]. A fixed table
//! keyed by the ordered `(from, to)` tier pair decides whether the change
//! also raises an [`Advisory`]: every degradation alerts, two recoveries
//! alert, and all other improvements stay silent. Titles and urgency are
//! fixed per pair; the body is drawn at random from the pair's candidates
//! so repeated alerts do not read identically.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;

use super::tier::QualityTier;
use QualityTier::{Acceptable, Concerning, Failed, Perfect};

/// How urgently an advisory needs operator attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

/// One tier change in a batch's history. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionEvent {
    /// Process time (hours) of the measurement that triggered the change.
    pub timestamp: f64,
    /// None only for the first classification of a batch.
    pub from: Option<QualityTier>,
    pub to: QualityTier,
    /// Wall-clock capture time.
    pub occurred_at: DateTime<Utc>,
}

/// An operator-facing recommendation raised by a tier transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advisory {
    /// Process time (hours) of the triggering measurement.
    pub timestamp: f64,
    pub from: QualityTier,
    pub to: QualityTier,
    pub title: &'static str,
    pub body: &'static str,
    pub urgency: Urgency,
    pub occurred_at: DateTime<Utc>,
}

impl Advisory {
    /// The `"{from} -> {to}"` form shown on the dashboard.
    pub fn transition_key(&self) -> String {
        format!("{} -> {}", self.from, self.to)
    }
}

/// Fixed advisory rule for one ordered tier pair.
#[derive(Debug)]
pub struct AdvisoryTemplate {
    pub transition: (QualityTier, QualityTier),
    pub title: &'static str,
    pub urgency: Urgency,
    pub bodies: &'static [&'static str],
}

/// Sparse transition table. Pairs not listed raise no advisory.
static TEMPLATES: &[AdvisoryTemplate] = &[
    AdvisoryTemplate {
        transition: (Perfect, Acceptable),
        title: "Quality Dip",
        urgency: Urgency::Low,
        bodies: &[
            "Minor drift from the golden standard. Watch the next few samples.",
            "Readings slipped slightly below ideal. No intervention needed yet.",
        ],
    },
    AdvisoryTemplate {
        transition: (Perfect, Concerning),
        title: "Quality Degrading",
        urgency: Urgency::Medium,
        bodies: &[
            "Readings moved well off the golden curve. Check temperature regulation and pH.",
            "Batch drifted from ideal faster than expected. Inspect fermentation conditions.",
        ],
    },
    AdvisoryTemplate {
        transition: (Perfect, Failed),
        title: "Critical Quality Loss",
        urgency: Urgency::High,
        bodies: &[
            "Batch dropped straight from ideal to failing. Check for contamination or a sensor fault.",
            "Severe deviation across parameters. Inspect the tank immediately.",
        ],
    },
    AdvisoryTemplate {
        transition: (Acceptable, Concerning),
        title: "Quality Degrading",
        urgency: Urgency::Medium,
        bodies: &[
            "Deviation from the golden standard is growing. Verify temperature control and CO2 activity.",
            "Batch is trending away from ideal. Review recent parameter changes.",
            "Monitor pH levels closely - drift at this stage often precedes a stall.",
        ],
    },
    AdvisoryTemplate {
        transition: (Acceptable, Failed),
        title: "Batch Failing",
        urgency: Urgency::High,
        bodies: &[
            "Quality collapsed past the failure line. Check pH - possible contamination or acid imbalance.",
            "Batch went from viable to failing in one step. Check CO2 output for a stuck fermentation.",
        ],
    },
    AdvisoryTemplate {
        transition: (Concerning, Failed),
        title: "Batch Failed",
        urgency: Urgency::High,
        bodies: &[
            "Quality fell below the recovery threshold. Adjust temperature control - risk of yeast stress.",
            "Check fermentation activity - CO2 production suggests a stall.",
            "Readings far outside tolerance on multiple parameters. Manual inspection required.",
        ],
    },
    AdvisoryTemplate {
        transition: (Concerning, Acceptable),
        title: "Batch Recovering",
        urgency: Urgency::Low,
        bodies: &[
            "Readings are converging back toward the golden standard.",
            "Deviation is shrinking. Recent corrections appear to be working.",
        ],
    },
    AdvisoryTemplate {
        transition: (Failed, Concerning),
        title: "Recovery in Progress",
        urgency: Urgency::Medium,
        bodies: &[
            "Batch is climbing out of the failure band. Continue corrective measures.",
            "Quality improving from failed. Keep the current adjustments in place.",
        ],
    },
];

/// Look up the advisory rule for a transition, if one exists.
pub fn template_for(from: QualityTier, to: QualityTier) -> Option<&'static AdvisoryTemplate> {
    TEMPLATES.iter().find(|t| t.transition == (from, to))
}

/// Generate an advisory for a transition, or None for unlisted pairs.
///
/// Title and urgency are deterministic per pair; the body is picked
/// uniformly at random from the template's candidates.
pub fn advisory_for(from: QualityTier, to: QualityTier, timestamp: f64) -> Option<Advisory> {
    let template = template_for(from, to)?;
    let body = template.bodies.choose(&mut rand::thread_rng()).copied()?;

    Some(Advisory {
        timestamp,
        from,
        to,
        title: template.title,
        body,
        urgency: template.urgency,
        occurred_at: Utc::now(),
    })
}
