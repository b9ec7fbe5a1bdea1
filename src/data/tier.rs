//! Quality tier classification.
//!
//! Maps the 0-100 similarity score computed upstream into a discrete
//! quality tier. Thresholds are fixed; boundary scores classify into the
//! higher tier, so exactly 90.0 is Acceptable and exactly 95.0 is Perfect.

use std::fmt;

use thiserror::Error;

/// A score that cannot be classified (NaN or infinite).
///
/// Fatal for the message that carried the score, never for the process.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("quality score is not a finite number: {0}")]
pub struct InvalidScore(pub f64);

/// Discrete quality classification of a batch.
///
/// Declared best-to-worst, so sorting descending puts failing batches
/// first, the order operators want to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityTier {
    Perfect,
    Acceptable,
    Concerning,
    Failed,
}

impl QualityTier {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            QualityTier::Perfect => "PERF",
            QualityTier::Acceptable => "OK",
            QualityTier::Concerning => "WARN",
            QualityTier::Failed => "FAIL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Perfect => "Perfect",
            QualityTier::Acceptable => "Acceptable",
            QualityTier::Concerning => "Concerning",
            QualityTier::Failed => "Failed",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a quality score into a tier.
///
/// Total over all finite scores: values above 100 still classify as
/// Perfect and negative values as Failed, so a slightly out-of-range
/// score from the comparator never kills the message.
pub fn classify(score: f64) -> Result<QualityTier, InvalidScore> {
    if !score.is_finite() {
        return Err(InvalidScore(score));
    }

    Ok(if score >= 95.0 {
        QualityTier::Perfect
    } else if score >= 90.0 {
        QualityTier::Acceptable
    } else if score >= 80.0 {
        QualityTier::Concerning
    } else {
        QualityTier::Failed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_partitions_score_range() {
        assert_eq!(classify(100.0).unwrap(), QualityTier::Perfect);
        assert_eq!(classify(97.3).unwrap(), QualityTier::Perfect);
        assert_eq!(classify(92.0).unwrap(), QualityTier::Acceptable);
        assert_eq!(classify(85.0).unwrap(), QualityTier::Concerning);
        assert_eq!(classify(79.9).unwrap(), QualityTier::Failed);
        assert_eq!(classify(0.0).unwrap(), QualityTier::Failed);
    }

    #[test]
    fn test_classify_boundaries_go_to_higher_tier() {
        assert_eq!(classify(95.0).unwrap(), QualityTier::Perfect);
        assert_eq!(classify(90.0).unwrap(), QualityTier::Acceptable);
        assert_eq!(classify(80.0).unwrap(), QualityTier::Concerning);

        // Just below each boundary falls into the lower tier
        assert_eq!(classify(94.999).unwrap(), QualityTier::Acceptable);
        assert_eq!(classify(89.999).unwrap(), QualityTier::Concerning);
        assert_eq!(classify(79.999).unwrap(), QualityTier::Failed);
    }

    #[test]
    fn test_classify_is_total_over_finite_scores() {
        // Out-of-range but finite scores still classify
        assert_eq!(classify(150.0).unwrap(), QualityTier::Perfect);
        assert_eq!(classify(-20.0).unwrap(), QualityTier::Failed);
    }

    #[test]
    fn test_classify_rejects_non_finite_scores() {
        assert!(classify(f64::NAN).is_err());
        assert!(classify(f64::INFINITY).is_err());
        assert!(classify(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_tier_ordering_tracks_severity() {
        assert!(QualityTier::Perfect < QualityTier::Failed);
        assert!(QualityTier::Acceptable < QualityTier::Concerning);
    }
}
