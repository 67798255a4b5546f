//! Rule Engine Implementation

use crate::config::{ClinicalThresholds, ThresholdError};
use crate::observation::ObservationSet;
use crate::outcome::RuleOutcome;
use crate::rules::{default_rules, ClinicalRule};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs every clinical rule in a fixed order and merges their output.
///
/// The engine holds no mutable state: one instance can serve any number of
/// concurrent evaluations.
pub struct RuleEngine {
    /// Threshold table shared by every rule
    thresholds: Arc<ClinicalThresholds>,
    /// Rules in evaluation order
    rules: Vec<Box<dyn ClinicalRule>>,
}

impl RuleEngine {
    /// Create an engine over a validated threshold table
    pub fn new(thresholds: ClinicalThresholds) -> Result<Self, ThresholdError> {
        thresholds.validate()?;
        Ok(Self::with_rules(Arc::new(thresholds), default_rules()))
    }

    /// Create an engine with a custom rule list
    pub fn with_rules(thresholds: Arc<ClinicalThresholds>, rules: Vec<Box<dyn ClinicalRule>>) -> Self {
        info!("Creating rule engine with {} rules", rules.len());
        Self { thresholds, rules }
    }

    /// Evaluate every rule and merge the results.
    ///
    /// Alerts, recommendations, and dietary advice keep rule order, then
    /// emission order within a rule. Each text appears once, at its first
    /// occurrence.
    pub fn evaluate(&self, obs: &ObservationSet) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();

        for rule in &self.rules {
            let output = rule.evaluate(obs, &self.thresholds);
            if !output.is_empty() {
                debug!(
                    "Rule {} produced {} alerts, {} recommendations, {} diet items",
                    rule.name(),
                    output.alerts.len(),
                    output.recommendations.len(),
                    output.diet.len()
                );
            }
            outcome.absorb(output);
        }

        debug!(
            "Evaluated {} rules: {} alerts, {} conditions",
            self.rules.len(),
            outcome.alerts.len(),
            outcome.conditions.len()
        );
        outcome
    }

    /// Rule names in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_rules(Arc::new(ClinicalThresholds::default()), default_rules())
    }
}
