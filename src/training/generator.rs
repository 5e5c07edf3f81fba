use std::fmt;
use std::str::FromStr;

use rand::seq::index;
use rand::{Rng, RngCore};
use serde::Serialize;

use crate::models::{GroupProfile, MatchType, Outcome, TrainingEvent, TripProfile};
use crate::training::features::{extract, MatchTarget};
use crate::training::labeler::{OutcomeModel, RuleBasedLabeler};

/// Traveler pair share, in tenths, when both kinds are requested
const SOLO_TENTHS: usize = 7;
/// Timestamps are spread over this many milliseconds after the base
const TIMESTAMP_SPREAD_MS: i64 = 1_000_000;

/// Which pair kinds to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSelection {
    Solo,
    Group,
    #[default]
    Both,
}

impl FromStr for MatchSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solo" => Ok(Self::Solo),
            "group" => Ok(Self::Group),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown match type '{}', expected solo, group or both", other)),
        }
    }
}

impl fmt::Display for MatchSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Solo => "solo",
            Self::Group => "group",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

impl MatchSelection {
    /// Split a total into (solo, group) targets
    pub fn split(self, count: usize) -> (usize, usize) {
        match self {
            Self::Solo => (count, 0),
            Self::Group => (0, count),
            Self::Both => {
                (count * SOLO_TENTHS / 10, count * (10 - SOLO_TENTHS) / 10)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub count: usize,
    pub selection: MatchSelection,
    pub preset: String,
    pub base_timestamp_ms: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 300,
            selection: MatchSelection::Both,
            preset: "balanced".to_string(),
            base_timestamp_ms: 0,
        }
    }
}

/// Counts reported after a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub total: usize,
    pub solo: usize,
    pub group: usize,
    pub accepts: usize,
    pub ignores: usize,
}

impl GenerationSummary {
    pub fn from_events(events: &[TrainingEvent]) -> Self {
        let mut summary = Self {
            total: events.len(),
            ..Default::default()
        };
        for event in events {
            match event.match_type {
                MatchType::UserUser => summary.solo += 1,
                MatchType::UserGroup => summary.group += 1,
            }
            match event.outcome {
                Outcome::Accept => summary.accepts += 1,
                Outcome::Ignore => summary.ignores += 1,
                Outcome::Chat => {}
            }
        }
        summary
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedEvents {
    pub events: Vec<TrainingEvent>,
    pub summary: GenerationSummary,
}

/// Builds a synthetic dataset from a population of travelers and groups
#[derive(Debug, Clone, Default)]
pub struct EventGenerator<M = RuleBasedLabeler> {
    model: M,
    config: GeneratorConfig,
}

impl EventGenerator<RuleBasedLabeler> {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_model(RuleBasedLabeler, config)
    }
}

impl<M: OutcomeModel> EventGenerator<M> {
    pub fn with_model(model: M, config: GeneratorConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Label a single pair
    pub fn event_for(
        &self,
        user: &TripProfile,
        target: MatchTarget<'_>,
        rng: &mut dyn RngCore,
    ) -> TrainingEvent {
        let features = extract(user, target);
        let labeled = self.model.sample(&features, rng);
        let timestamp = self.config.base_timestamp_ms + rng.gen_range(0..TIMESTAMP_SPREAD_MS);
        labeled.into_event(target.match_type(), features, self.config.preset.clone(), timestamp)
    }

    /// Generate events for a random sample of pairs
    ///
    /// Travelers without a destination have no active trip and are left out,
    /// as are sampled pairs sharing a user id. Pairs are drawn by index so
    /// memory stays proportional to `count`. Output is sorted by timestamp.
    pub fn generate(
        &self,
        travelers: &[TripProfile],
        groups: &[GroupProfile],
        rng: &mut dyn RngCore,
    ) -> GeneratedEvents {
        let active: Vec<&TripProfile> = travelers.iter().filter(|t| t.destination.is_some()).collect();
        let (solo_target, group_target) = self.config.selection.split(self.config.count);

        let mut events = Vec::with_capacity(solo_target + group_target);

        if solo_target > 0 && active.len() > 1 {
            // Ordered pairs (i, j) with i != j, indexed as i * (n - 1) + offset
            let others = active.len() - 1;
            let total = active.len() * others;
            let pairs = index::sample(&mut *rng, total, solo_target.min(total));

            tracing::debug!("Generating {} traveler pair events", pairs.len());
            for k in pairs {
                let (i, offset) = (k / others, k % others);
                let j = if offset < i { offset } else { offset + 1 };
                if same_user(active[i], active[j]) {
                    continue;
                }
                events.push(self.event_for(active[i], MatchTarget::Traveler(active[j]), rng));
            }
        }

        if group_target > 0 && !groups.is_empty() {
            let total = active.len() * groups.len();
            let pairs = index::sample(&mut *rng, total, group_target.min(total));

            tracing::debug!("Generating {} group pair events", pairs.len());
            for k in pairs {
                let (i, g) = (k / groups.len(), k % groups.len());
                events.push(self.event_for(active[i], MatchTarget::Group(&groups[g]), rng));
            }
        }

        events.sort_by_key(|event| event.timestamp);
        let summary = GenerationSummary::from_events(&events);

        GeneratedEvents { events, summary }
    }
}

fn same_user(a: &TripProfile, b: &TripProfile) -> bool {
    !a.user_id.is_empty() && a.user_id == b.user_id
}
