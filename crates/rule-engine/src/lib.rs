//! Antenatal Rule Engine
//!
//! Evaluates a bank of independent clinical decision rules over a patient's
//! lab and vital observations:
//! - Anemia and iron deficiency
//! - Hypertension and preeclampsia
//! - Gestational diabetes
//! - Thyroid dysfunction
//! - Low and excessive gestational weight gain, obesity
//! - Liver dysfunction (ICP, HELLP, AFLP)
//!
//! Each rule produces alerts, supplement recommendations, and dietary advice.
//! The [`RuleEngine`] runs every rule in a fixed order and merges the results
//! into one deduplicated [`RuleOutcome`].

pub mod config;
pub mod engine;
pub mod ladder;
pub mod observation;
pub mod outcome;
pub mod rules;

pub use config::{ClinicalThresholds, ThresholdError};
pub use engine::RuleEngine;
pub use ladder::Ladder;
pub use observation::{ObservationSet, Trimester};
pub use outcome::{Condition, OrderedSet, RuleOutcome, RuleOutput};
pub use rules::ClinicalRule;
