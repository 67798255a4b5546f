//! Clinical rule evaluators
//!
//! Each rule is a pure function of the observation set and the threshold
//! table. Rules never fail: a missing observation disables the checks that
//! need it and the rule returns whatever the remaining checks produce.

mod anemia;
mod gdm;
mod hypertension;
mod liver;
mod obesity;
mod preeclampsia;
mod thyroid;
mod weight_gain;

pub use anemia::{AnemiaFinding, AnemiaRule};
pub use gdm::GdmRule;
pub use hypertension::HypertensionRule;
pub use liver::{LiverFinding, LiverRule};
pub use obesity::ObesityRule;
pub use preeclampsia::PreeclampsiaRule;
pub use thyroid::ThyroidRule;
pub use weight_gain::{weekly_gain, BmiBand, LowWeightGainRule};

use crate::config::ClinicalThresholds;
use crate::observation::ObservationSet;
use crate::outcome::RuleOutput;

/// A clinical decision rule
pub trait ClinicalRule: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Evaluate the rule against one observation set
    fn evaluate(&self, obs: &ObservationSet, thresholds: &ClinicalThresholds) -> RuleOutput;
}

/// Every rule, in evaluation order
pub fn default_rules() -> Vec<Box<dyn ClinicalRule>> {
    vec![
        Box::new(AnemiaRule),
        Box::new(HypertensionRule),
        Box::new(GdmRule),
        Box::new(PreeclampsiaRule),
        Box::new(ThyroidRule),
        Box::new(LowWeightGainRule),
        Box::new(ObesityRule),
        Box::new(LiverRule),
    ]
}

/// Whether blood pressure meets the hypertension criteria
pub(crate) fn is_hypertensive(sbp: f64, dbp: f64, thresholds: &ClinicalThresholds) -> bool {
    sbp >= thresholds.blood_pressure.systolic || dbp >= thresholds.blood_pressure.diastolic
}
