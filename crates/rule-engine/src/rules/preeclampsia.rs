//! Preeclampsia

use super::{is_hypertensive, ClinicalRule};
use crate::config::ClinicalThresholds;
use crate::observation::{nonzero, ObservationSet};
use crate::outcome::{Condition, RuleOutput};
use tracing::debug;

const LIKELY_ALERT: &str = "BP + Proteinuria/Edema – Likely Preeclampsia";
const ISOLATED_ALERT: &str = "Isolated high BP – Monitor for preeclampsia evolution";

const RECOMMENDATIONS: [&str; 3] = [
    "Hypertension with proteinuria or signs of end-organ damage after 20 weeks may indicate preeclampsia. ",
    "Frequent BP monitoring, urine dipstick or 24-hour protein analysis, and fetal assessments are essential. ",
    "Magnesium sulfate for seizure prophylaxis and planning for timely delivery may be considered.",
];

const DIET: [&str; 3] = [
    "A diet rich in antioxidants (e.g., berries, broccoli), moderate salt intake, and adequate hydration may be considered. ",
    "Including foods with omega-3s (e.g., flaxseeds, walnuts) may help reduce inflammation. ",
    "Avoid processed foods and trans fats, which could contribute to oxidative stress and worsen endothelial dysfunction.",
];

/// Preeclampsia rule. For hypertensive input exactly one of the "likely
/// preeclampsia" and "isolated high BP" alerts is emitted.
///
/// Zero blood pressure readings count as absent here.
pub struct PreeclampsiaRule;

impl ClinicalRule for PreeclampsiaRule {
    fn name(&self) -> &'static str {
        "preeclampsia"
    }

    fn evaluate(&self, obs: &ObservationSet, thresholds: &ClinicalThresholds) -> RuleOutput {
        let mut out = RuleOutput::new();
        let (Some(sbp), Some(dbp)) = (nonzero(obs.sbp), nonzero(obs.dbp)) else {
            return out;
        };
        if !is_hypertensive(sbp, dbp, thresholds) {
            return out;
        }

        let significant_proteinuria = obs
            .proteinuria
            .is_some_and(|p| p > thresholds.preeclampsia.proteinuria);

        if significant_proteinuria {
            debug!("Preeclampsia rule fired: likely preeclampsia");
            out.alert(LIKELY_ALERT)
                .recommend(RECOMMENDATIONS)
                .diet(DIET)
                .tag(Condition::Preeclampsia);
        } else {
            debug!("Preeclampsia rule fired: isolated high BP");
            out.alert(ISOLATED_ALERT).tag(Condition::Hypertension);
        }

        out
    }
}
