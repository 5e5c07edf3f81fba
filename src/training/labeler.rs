use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::models::{FeatureVector, MatchType, Outcome, TrainingEvent};

/// Sampled outcome plus its binary label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledOutcome {
    pub outcome: Outcome,
    pub label: u8,
}

impl LabeledOutcome {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            label: outcome.label(),
        }
    }

    /// Attach the labeled outcome to its features
    pub fn into_event(
        self,
        match_type: MatchType,
        features: FeatureVector,
        preset: impl Into<String>,
        timestamp: i64,
    ) -> TrainingEvent {
        TrainingEvent {
            match_type,
            features,
            outcome: self.outcome,
            label: self.label,
            preset: preset.into(),
            timestamp,
            source: crate::models::training::default_source(),
        }
    }
}

/// Turns a feature vector into an accept probability
///
/// The feature extraction contract stays fixed; implementations of this
/// trait can be replaced once real interaction data exists.
pub trait OutcomeModel: Send + Sync {
    /// Probability in [0, 1] that a pair with this compatibility is accepted
    fn probability(&self, compatibility: f64) -> f64;

    /// Collapse features into a single compatibility value
    fn compatibility(&self, features: &FeatureVector) -> f64 {
        features.mean()
    }

    fn sample(&self, features: &FeatureVector, rng: &mut dyn RngCore) -> LabeledOutcome {
        let p = self.probability(self.compatibility(features));
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };

        if rng.gen_bool(p) {
            LabeledOutcome::new(Outcome::Accept)
        } else {
            LabeledOutcome::new(Outcome::Ignore)
        }
    }
}

/// Accept-rate tiers keyed by minimum compatibility, highest first
const ACCEPT_TIERS: [(f64, f64); 3] = [(0.7, 0.8), (0.5, 0.5), (0.3, 0.2)];
const FLOOR_ACCEPT_RATE: f64 = 0.05;

/// Threshold table labeler used to bootstrap the dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedLabeler;

impl OutcomeModel for RuleBasedLabeler {
    fn probability(&self, compatibility: f64) -> f64 {
        ACCEPT_TIERS
            .iter()
            .find(|(min, _)| compatibility >= *min)
            .map_or(FLOOR_ACCEPT_RATE, |(_, rate)| *rate)
    }
}

/// Label a feature vector with the rule-based model
pub fn label_outcome(features: &FeatureVector, rng: &mut dyn RngCore) -> LabeledOutcome {
    RuleBasedLabeler.sample(features, rng)
}
