//! Gestational diabetes

use super::ClinicalRule;
use crate::config::ClinicalThresholds;
use crate::observation::{nonzero, ObservationSet};
use crate::outcome::{Condition, RuleOutput};
use tracing::debug;

const ALERT: &str = "Possible GDM – schedule OGTT confirmation & endocrinology review";

const RECOMMENDATIONS: [&str; 4] = [
    "Elevated OGTT values suggest gestational diabetes. ",
    "Medical Nutrition Therapy and physical activity may be the first line of management. ",
    "If glucose remains uncontrolled, insulin therapy could be indicated. ",
    "Regular monitoring of fasting and postprandial glucose is advised.",
];

const DIET: [&str; 4] = [
    "A diet focused on complex carbohydrates (whole wheat, oats), fiber (salads, fruits), and lean proteins is recommended. ",
    "Meals should be small and frequent to stabilize blood sugar. ",
    "Limit sugary items, juices, white rice, and bakery products. ",
    "Include fenugreek seeds, soaked overnight, which may help regulate glucose.",
];

/// GDM rule: any OGTT timepoint at or above its cutoff.
///
/// A zero OGTT reading counts as absent.
pub struct GdmRule;

impl ClinicalRule for GdmRule {
    fn name(&self) -> &'static str {
        "gdm"
    }

    fn evaluate(&self, obs: &ObservationSet, thresholds: &ClinicalThresholds) -> RuleOutput {
        let mut out = RuleOutput::new();
        let cutoffs = &thresholds.gdm;

        let breached = [
            (obs.ogtt_f, cutoffs.fasting),
            (obs.ogtt_1h, cutoffs.one_hour),
            (obs.ogtt_2h, cutoffs.two_hour),
        ]
        .into_iter()
        .any(|(value, cutoff)| nonzero(value).is_some_and(|v| v >= cutoff));

        if breached {
            debug!("GDM rule fired");
            out.alert(ALERT)
                .recommend(RECOMMENDATIONS)
                .diet(DIET)
                .tag(Condition::GestationalDiabetes);
        }

        out
    }
}
