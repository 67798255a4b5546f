//! Voting ensemble over three classifiers

use crate::classifier::Classifier;
use crate::features::{FeatureSchema, RiskTask};
use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Number of classifiers in every ensemble
pub const ENSEMBLE_SIZE: usize = 3;

/// Tolerance on the sum of a member's probability vector
const SUM_TOLERANCE: f64 = 1e-3;

/// How member outputs are combined into a class decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotingStrategy {
    /// Argmax of the averaged probabilities
    #[default]
    Soft,
    /// Majority of the members' own argmax votes
    Hard,
}

/// Combined ensemble output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsemblePrediction {
    /// Elementwise mean of the member probability vectors, scaled to sum to 1
    pub probabilities: Vec<f64>,
    /// Winning class index
    pub predicted_class: usize,
}

impl EnsemblePrediction {
    /// Probabilities rounded half away from zero to `decimals` places
    pub fn rounded(&self, decimals: i32) -> Vec<f64> {
        let scale = 10f64.powi(decimals);
        self.probabilities.iter().map(|p| (p * scale).round() / scale).collect()
    }
}

/// Three classifiers for one task, combined by voting.
///
/// Holds only shared references to loaded models; `predict` takes `&self`
/// and can run on any number of threads at once.
pub struct EnsemblePredictor {
    task: RiskTask,
    members: Vec<Arc<dyn Classifier>>,
    voting: VotingStrategy,
}

impl EnsemblePredictor {
    pub fn new(task: RiskTask, members: Vec<Arc<dyn Classifier>>, voting: VotingStrategy) -> Result<Self, InferenceError> {
        if members.len() != ENSEMBLE_SIZE {
            return Err(InferenceError::MemberCount {
                expected: ENSEMBLE_SIZE,
                actual: members.len(),
            });
        }

        info!(
            "Creating {} ensemble ({:?} voting): {}",
            task.as_str(),
            voting,
            members.iter().map(|m| m.name()).collect::<Vec<_>>().join(", ")
        );
        Ok(Self { task, members, voting })
    }

    /// Predict from a raw feature vector in schema order
    pub fn predict(&self, features: &[f64]) -> Result<EnsemblePrediction, InferenceError> {
        let start = Instant::now();

        let expected = self.task.feature_count();
        if features.len() != expected {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[{}]", expected),
                actual: format!("[{}]", features.len()),
            });
        }

        let classes = self.task.class_count();
        let mut outputs = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let probabilities = member.predict_proba(features)?;
            check_probabilities(member.name(), &probabilities, classes)?;
            outputs.push(probabilities);
        }

        let mut probabilities = vec![0.0; classes];
        for output in &outputs {
            for (sum, p) in probabilities.iter_mut().zip(output) {
                *sum += p;
            }
        }
        let weight = outputs.len() as f64;
        probabilities.iter_mut().for_each(|p| *p /= weight);

        // members may be off by up to the tolerance; the mean must sum to 1
        let total: f64 = probabilities.iter().sum();
        if total > 0.0 {
            probabilities.iter_mut().for_each(|p| *p /= total);
        }

        let predicted_class = match self.voting {
            VotingStrategy::Soft => argmax(&probabilities),
            VotingStrategy::Hard => majority(outputs.iter().map(|o| argmax(o)), classes),
        };

        debug!(
            "{} ensemble predicted class {} in {}us",
            self.task.as_str(),
            predicted_class,
            start.elapsed().as_micros()
        );

        Ok(EnsemblePrediction {
            probabilities,
            predicted_class,
        })
    }

    /// Predict from a typed feature set
    pub fn predict_features<F: FeatureSchema>(&self, features: &F) -> Result<EnsemblePrediction, InferenceError> {
        if F::TASK != self.task {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("{} features", self.task.as_str()),
                actual: format!("{} features", F::TASK.as_str()),
            });
        }
        self.predict(&features.values())
    }

    pub fn task(&self) -> RiskTask {
        self.task
    }

    pub fn voting(&self) -> VotingStrategy {
        self.voting
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name()).collect()
    }
}

fn check_probabilities(name: &str, probabilities: &[f64], classes: usize) -> Result<(), InferenceError> {
    let invalid = |reason: String| InferenceError::InvalidProbabilities {
        classifier: name.to_string(),
        reason,
    };

    if probabilities.len() != classes {
        return Err(invalid(format!("expected {} classes, got {}", classes, probabilities.len())));
    }
    if let Some(p) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(invalid(format!("value {} is not a probability", p)));
    }
    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(invalid(format!("values sum to {}", sum)));
    }
    Ok(())
}

/// Index of the largest value; the first one wins ties
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Most frequent vote; ties go to the class voted for first
fn majority(votes: impl Iterator<Item = usize>, classes: usize) -> usize {
    let votes: Vec<usize> = votes.collect();
    let mut counts = vec![0usize; classes];
    for &v in &votes {
        counts[v] += 1;
    }

    let mut winner = votes.first().copied().unwrap_or(0);
    for &v in &votes {
        if counts[v] > counts[winner] {
            winner = v;
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StaticClassifier;
    use crate::features::PregnancyFeatures;
    use proptest::prelude::*;

    fn members(outputs: [[f64; 3]; 3]) -> Vec<Arc<dyn Classifier>> {
        outputs
            .iter()
            .enumerate()
            .map(|(i, p)| Arc::new(StaticClassifier::new(&format!("m{}", i), p.to_vec())) as Arc<dyn Classifier>)
            .collect()
    }

    fn pregnancy(outputs: [[f64; 3]; 3], voting: VotingStrategy) -> EnsemblePredictor {
        EnsemblePredictor::new(RiskTask::Pregnancy, members(outputs), voting).unwrap()
    }

    #[test]
    fn test_soft_vote_averages_members() {
        let ensemble = pregnancy(
            [[0.1, 0.6, 0.3], [0.2, 0.5, 0.3], [0.0, 0.7, 0.3]],
            VotingStrategy::Soft,
        );
        let prediction = ensemble.predict(&[0.0; 8]).unwrap();

        assert_eq!(prediction.predicted_class, 1);
        let expected = [0.1, 0.6, 0.3];
        for (p, e) in prediction.probabilities.iter().zip(expected) {
            assert!((p - e).abs() < 1e-9);
        }
        assert_eq!(prediction.rounded(4), vec![0.1, 0.6, 0.3]);
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let ensemble = pregnancy(
            [[0.4, 0.4, 0.2], [0.4, 0.4, 0.2], [0.4, 0.4, 0.2]],
            VotingStrategy::Soft,
        );
        assert_eq!(ensemble.predict(&[0.0; 8]).unwrap().predicted_class, 0);
    }

    #[test]
    fn test_hard_vote_majority() {
        // averaged mean favours class 0, but two members vote class 2
        let ensemble = pregnancy(
            [[0.98, 0.01, 0.01], [0.3, 0.3, 0.4], [0.3, 0.3, 0.4]],
            VotingStrategy::Hard,
        );
        let prediction = ensemble.predict(&[0.0; 8]).unwrap();
        assert_eq!(prediction.predicted_class, 2);
        assert!(prediction.probabilities[0] > prediction.probabilities[2]);
    }

    #[test]
    fn test_hard_vote_three_way_split() {
        let ensemble = pregnancy(
            [[0.1, 0.8, 0.1], [0.8, 0.1, 0.1], [0.1, 0.1, 0.8]],
            VotingStrategy::Hard,
        );
        assert_eq!(ensemble.predict(&[0.0; 8]).unwrap().predicted_class, 1);
    }

    #[test]
    fn test_mean_renormalized_within_member_tolerance() {
        let ensemble = pregnancy([[0.3, 0.3, 0.4009]; 3], VotingStrategy::Soft);
        let prediction = ensemble.predict(&[0.0; 8]).unwrap();

        let sum: f64 = prediction.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert_eq!(prediction.predicted_class, 2);
        let rounded_sum: f64 = prediction.rounded(4).iter().sum();
        assert!((rounded_sum - 1.0).abs() < 1e-4 + 1e-12);
    }

    #[test]
    fn test_wrong_member_count() {
        let two: Vec<Arc<dyn Classifier>> = vec![
            Arc::new(StaticClassifier::uniform("a", 3)),
            Arc::new(StaticClassifier::uniform("b", 3)),
        ];
        let result = EnsemblePredictor::new(RiskTask::Fetal, two, VotingStrategy::Soft);
        assert!(matches!(
            result,
            Err(InferenceError::MemberCount { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_wrong_feature_count() {
        let ensemble = pregnancy([[1.0, 0.0, 0.0]; 3], VotingStrategy::Soft);
        let result = ensemble.predict(&[0.0; 21]);
        assert!(matches!(result, Err(InferenceError::InvalidInputShape { .. })));
    }

    #[test]
    fn test_invalid_member_output() {
        let ensemble = pregnancy(
            [[0.5, 0.5, 0.5], [0.2, 0.5, 0.3], [0.2, 0.5, 0.3]],
            VotingStrategy::Soft,
        );
        match ensemble.predict(&[0.0; 8]) {
            Err(InferenceError::InvalidProbabilities { classifier, .. }) => assert_eq!(classifier, "m0"),
            other => panic!("unexpected {:?}", other),
        }

        let short: Vec<Arc<dyn Classifier>> = vec![
            Arc::new(StaticClassifier::new("ok", vec![0.2, 0.5, 0.3])),
            Arc::new(StaticClassifier::new("two_class", vec![0.5, 0.5])),
            Arc::new(StaticClassifier::new("ok2", vec![0.2, 0.5, 0.3])),
        ];
        let ensemble = EnsemblePredictor::new(RiskTask::Pregnancy, short, VotingStrategy::Soft).unwrap();
        assert!(ensemble.predict(&[0.0; 8]).is_err());
    }

    #[test]
    fn test_typed_features() {
        let ensemble = pregnancy([[0.7, 0.2, 0.1]; 3], VotingStrategy::Soft);
        let prediction = ensemble.predict_features(&PregnancyFeatures::default()).unwrap();
        assert_eq!(prediction.predicted_class, 0);
        assert_eq!(ensemble.member_names(), vec!["m0", "m1", "m2"]);
    }

    #[test]
    fn test_voting_deserializes_lowercase() {
        let voting: VotingStrategy = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(voting, VotingStrategy::Hard);
    }

    fn distribution() -> impl Strategy<Value = [f64; 3]> {
        (0.01f64..1.0, 0.01f64..1.0, 0.01f64..1.0).prop_map(|(a, b, c)| {
            let sum = a + b + c;
            [a / sum, b / sum, c / sum]
        })
    }

    proptest! {
        #[test]
        fn prop_soft_vote_is_distribution(a in distribution(), b in distribution(), c in distribution()) {
            let ensemble = pregnancy([a, b, c], VotingStrategy::Soft);
            let prediction = ensemble.predict(&[0.0; 8]).unwrap();

            prop_assert!(prediction.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
            prop_assert!((prediction.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-4);
            let max = prediction.probabilities.iter().cloned().fold(f64::MIN, f64::max);
            prop_assert_eq!(prediction.probabilities[prediction.predicted_class], max);
        }
    }
}
