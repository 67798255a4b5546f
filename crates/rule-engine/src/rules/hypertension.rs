//! Hypertension

use super::{is_hypertensive, ClinicalRule};
use crate::config::ClinicalThresholds;
use crate::observation::{reading, ObservationSet};
use crate::outcome::{Condition, RuleOutput};
use tracing::debug;

const RECOMMENDATIONS: [&str; 3] = [
    "Elevated blood pressure after 20 weeks gestation without proteinuria may suggest gestational hypertension. ",
    "Monitoring BP, fetal growth, and signs of preeclampsia (e.g., headaches, vision changes) may be important. ",
    "Antihypertensives like labetalol or nifedipine may be considered based on clinical judgment.",
];

const DIET: [&str; 3] = [
    "A low-sodium diet with fresh fruits, vegetables, whole grains, and lean proteins may support blood pressure control. ",
    "Reducing pickles, papads, processed snacks, and salty packaged foods might help. ",
    "Potassium-rich foods such as bananas, coconut water, and spinach could be beneficial.",
];

/// Hypertension rule: needs both systolic and diastolic readings
pub struct HypertensionRule;

impl ClinicalRule for HypertensionRule {
    fn name(&self) -> &'static str {
        "hypertension"
    }

    fn evaluate(&self, obs: &ObservationSet, thresholds: &ClinicalThresholds) -> RuleOutput {
        let mut out = RuleOutput::new();
        let (Some(sbp), Some(dbp)) = (obs.sbp, obs.dbp) else {
            return out;
        };

        if is_hypertensive(sbp, dbp, thresholds) {
            debug!("Hypertension rule fired: {}/{}", sbp, dbp);
            out.alert(format!(
                "Elevated BP {}/{} – evaluate for pre‑eclampsia",
                reading(sbp),
                reading(dbp)
            ))
            .recommend(RECOMMENDATIONS)
            .diet(DIET)
            .tag(Condition::Hypertension);
        }

        out
    }
}
