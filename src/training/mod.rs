// Training data bootstrap: features, labels, dataset
pub mod dataset;
pub mod features;
pub mod generator;
pub mod labeler;

pub use dataset::{read_events, DatasetError, DatasetWriter};
pub use features::{count_active_features, extract, extract_features, extract_group_features, MatchTarget};
pub use generator::{EventGenerator, GeneratedEvents, GenerationSummary, GeneratorConfig, MatchSelection};
pub use labeler::{label_outcome, LabeledOutcome, OutcomeModel, RuleBasedLabeler};
