//! Priority-ordered diagnostic ladder
//!
//! A ladder is a list of rungs checked top-down. Each rung inspects the
//! observations and either yields a finding or passes. The first rung that
//! yields wins; the rungs below it are never consulted.

use crate::config::ClinicalThresholds;
use crate::observation::ObservationSet;

/// A single rung: returns a finding when its pattern matches
pub type Rung<F> = fn(&ObservationSet, &ClinicalThresholds) -> Option<F>;

/// Ordered list of rungs producing findings of type `F`
pub struct Ladder<F: 'static> {
    rungs: &'static [(&'static str, Rung<F>)],
}

impl<F: 'static> Ladder<F> {
    /// Build a ladder from named rungs, highest priority first
    pub const fn new(rungs: &'static [(&'static str, Rung<F>)]) -> Self {
        Self { rungs }
    }

    /// Walk the rungs and return the first finding, if any
    pub fn climb(&self, obs: &ObservationSet, thresholds: &ClinicalThresholds) -> Option<F> {
        self.rungs.iter().find_map(|(name, rung)| {
            let finding = rung(obs, thresholds);
            if finding.is_some() {
                tracing::trace!(rung = *name, "ladder rung matched");
            }
            finding
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Level {
        High,
        Low,
    }

    fn high(obs: &ObservationSet, _: &ClinicalThresholds) -> Option<Level> {
        obs.ast.filter(|v| *v > 100.0).map(|_| Level::High)
    }

    fn low(obs: &ObservationSet, _: &ClinicalThresholds) -> Option<Level> {
        obs.ast.filter(|v| *v > 10.0).map(|_| Level::Low)
    }

    const RUNGS: [(&str, Rung<Level>); 2] = [("high", high), ("low", low)];
    static LADDER: Ladder<Level> = Ladder::new(&RUNGS);

    #[test]
    fn test_first_matching_rung_wins() {
        let thresholds = ClinicalThresholds::default();
        let obs = ObservationSet {
            ast: Some(150.0),
            ..Default::default()
        };
        assert_eq!(LADDER.climb(&obs, &thresholds), Some(Level::High));
    }

    #[test]
    fn test_falls_through_to_lower_rung() {
        let thresholds = ClinicalThresholds::default();
        let obs = ObservationSet {
            ast: Some(50.0),
            ..Default::default()
        };
        assert_eq!(LADDER.climb(&obs, &thresholds), Some(Level::Low));
    }

    #[test]
    fn test_no_rung_matches() {
        let thresholds = ClinicalThresholds::default();
        assert_eq!(LADDER.climb(&ObservationSet::default(), &thresholds), None);
    }
}
