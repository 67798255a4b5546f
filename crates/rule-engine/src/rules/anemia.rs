//! Anemia and iron deficiency
//!
//! Iron markers outrank hemoglobin: a low ferritin or transferrin saturation
//! reading suppresses the trimester hemoglobin screen entirely.

use super::ClinicalRule;
use crate::config::ClinicalThresholds;
use crate::ladder::{Ladder, Rung};
use crate::observation::{reading, ObservationSet, Trimester};
use crate::outcome::{Condition, RuleOutput};
use tracing::debug;

const IRON_RICH_DIET: [&str; 3] = [
    "Iron-rich foods such as leafy greens (spinach, methi), lentils, dates, jaggery, and red meat (if not vegetarian) may help. ",
    "Vitamin C-rich foods like oranges or amla juice taken with meals may enhance iron absorption. ",
    "Avoid consuming tea/coffee with iron-rich meals as it may inhibit absorption.",
];

const SEVERE_IRON_RECOMMENDATIONS: [&str; 3] = [
    "Parenteral iron therapy is often beneficial in such cases. ",
    "Iron sucrose (100 mg IV on alternate days) or ferric carboxymaltose (based on weight and Hb) may be used. ",
    "It may be helpful to avoid delaying treatment due to poor oral iron response or late gestation.",
];

const MILD_IRON_RECOMMENDATIONS: [&str; 3] = [
    "Oral iron therapy may be started—ferrous sulfate 100–200 mg elemental iron daily is typically suggested. ",
    "Vitamin C may be co-administered to improve absorption. ",
    "Parenteral iron may still be considered if oral is poorly tolerated or patient is in late 2nd/3rd trimester.",
];

const TSAT_RECOMMENDATIONS: [&str; 1] = [
    "Suggest initiating oral iron (e.g., IFA 100 mg elemental iron daily). Monitor ferritin after 4–6 weeks if symptoms persist or inadequate response.",
];

const HEMOGLOBIN_RECOMMENDATIONS: [&str; 2] = [
    "Oral iron supplementation (e.g., ferrous sulfate 100–200 mg daily) could be initiated based on tolerance. ",
    "Severe anemia (Hb < 7 g/dL) may require IV iron or blood transfusion. Monitoring ferritin may guide response to treatment.",
];

/// Highest-priority anemia finding for one observation set
#[derive(Debug, Clone, PartialEq)]
pub enum AnemiaFinding {
    SevereIronDeficiency { ferritin: f64 },
    IronDeficiency { ferritin: f64 },
    LowTransferrinSaturation { tsat: f64 },
    /// Every trimester whose hemoglobin is below its cutoff
    LowHemoglobin(Vec<(Trimester, f64)>),
}

impl AnemiaFinding {
    fn into_output(self) -> RuleOutput {
        let mut out = RuleOutput::new();
        match self {
            AnemiaFinding::SevereIronDeficiency { ferritin } => {
                out.alert(format!("Severe iron deficiency: Ferritin {} µg/L", reading(ferritin)))
                    .recommend(SEVERE_IRON_RECOMMENDATIONS)
                    .tag(Condition::IronDeficiency);
            }
            AnemiaFinding::IronDeficiency { ferritin } => {
                out.alert(format!("Iron deficiency: Ferritin {} µg/L", reading(ferritin)))
                    .recommend(MILD_IRON_RECOMMENDATIONS)
                    .tag(Condition::IronDeficiency);
            }
            AnemiaFinding::LowTransferrinSaturation { tsat } => {
                out.alert(format!("Iron deficiency: Transferrin saturation {}%", reading(tsat)))
                    .recommend(TSAT_RECOMMENDATIONS)
                    .tag(Condition::IronDeficiency);
            }
            AnemiaFinding::LowHemoglobin(breaches) => {
                for (trimester, hb) in breaches {
                    out.alert(format!(
                        "Anemia detected: Hb {} g/dL in {} trimester",
                        reading(hb),
                        trimester.ordinal()
                    ));
                }
                out.recommend(HEMOGLOBIN_RECOMMENDATIONS).tag(Condition::Anemia);
            }
        }
        out.diet(IRON_RICH_DIET);
        out
    }
}

fn severe_ferritin(obs: &ObservationSet, t: &ClinicalThresholds) -> Option<AnemiaFinding> {
    obs.ferritin
        .filter(|f| *f < t.anemia.ferritin_severe)
        .map(|ferritin| AnemiaFinding::SevereIronDeficiency { ferritin })
}

fn low_ferritin(obs: &ObservationSet, t: &ClinicalThresholds) -> Option<AnemiaFinding> {
    obs.ferritin
        .filter(|f| *f < t.anemia.ferritin_mild)
        .map(|ferritin| AnemiaFinding::IronDeficiency { ferritin })
}

fn low_tsat(obs: &ObservationSet, t: &ClinicalThresholds) -> Option<AnemiaFinding> {
    obs.tsat
        .filter(|s| *s < t.anemia.tsat)
        .map(|tsat| AnemiaFinding::LowTransferrinSaturation { tsat })
}

fn low_hemoglobin(obs: &ObservationSet, t: &ClinicalThresholds) -> Option<AnemiaFinding> {
    let breaches: Vec<_> = Trimester::ALL
        .iter()
        .filter_map(|&trimester| {
            let hb = obs.hemoglobin(trimester)?;
            let cutoff = match trimester {
                Trimester::Second => t.anemia.hb_second,
                Trimester::First | Trimester::Third => t.anemia.hb_first_third,
            };
            (hb < cutoff).then_some((trimester, hb))
        })
        .collect();

    (!breaches.is_empty()).then_some(AnemiaFinding::LowHemoglobin(breaches))
}

const RUNGS: [(&str, Rung<AnemiaFinding>); 4] = [
    ("severe_ferritin", severe_ferritin),
    ("low_ferritin", low_ferritin),
    ("low_tsat", low_tsat),
    ("low_hemoglobin", low_hemoglobin),
];

static LADDER: Ladder<AnemiaFinding> = Ladder::new(&RUNGS);

/// Anemia rule
pub struct AnemiaRule;

impl AnemiaRule {
    /// The finding that would be reported, without rendering text
    pub fn finding(obs: &ObservationSet, thresholds: &ClinicalThresholds) -> Option<AnemiaFinding> {
        LADDER.climb(obs, thresholds)
    }
}

impl ClinicalRule for AnemiaRule {
    fn name(&self) -> &'static str {
        "anemia"
    }

    fn evaluate(&self, obs: &ObservationSet, thresholds: &ClinicalThresholds) -> RuleOutput {
        match Self::finding(obs, thresholds) {
            Some(finding) => {
                debug!("Anemia rule fired: {:?}", finding);
                finding.into_output()
            }
            None => RuleOutput::new(),
        }
    }
}
