//! Liver dysfunction
//!
//! Without any liver panel value the rule only screens symptoms and history
//! and asks for a panel. With a panel it climbs the diagnostic ladder
//! ICP → HELLP → AFLP → non-specific abnormality, reporting the first match.

use super::ClinicalRule;
use crate::config::ClinicalThresholds;
use crate::ladder::{Ladder, Rung};
use crate::observation::{reading, ObservationSet};
use crate::outcome::{Condition, RuleOutput};
use tracing::debug;

const RISK_SYMPTOMS: [&str; 4] = ["pruritus", "severe itching", "ruq", "jaundice"];
const RISK_CONDITIONS: [&str; 3] = ["preeclampsia", "hep B", "hellp history"];

/// ICP severity by bile acid level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CholestasisGrade {
    Mild,
    Moderate,
    Severe,
}

/// First matching rung of the liver ladder
#[derive(Debug, Clone, PartialEq)]
pub enum LiverFinding {
    Cholestasis { bile_acids: f64, grade: CholestasisGrade },
    Hellp,
    AcuteFattyLiver,
    NonSpecific,
}

impl LiverFinding {
    fn into_output(self) -> RuleOutput {
        let mut out = RuleOutput::new();
        match self {
            LiverFinding::Cholestasis { bile_acids, grade } => {
                out.alert(format!(
                    "Bile acids elevated ({} µmol/L) — Suggestive of Intrahepatic Cholestasis of Pregnancy (ICP)",
                    reading(bile_acids)
                ))
                .tag(Condition::Cholestasis);
                match grade {
                    CholestasisGrade::Severe => out.recommend([
                        "It may be helpful to consider initiating Ursodeoxycholic acid (UDCA) at 300 mg three times daily if symptoms persist or bile acid levels rise. ",
                        "Some guidelines indicate that if bile acids exceed 40 µmol/L, delivery around 37 weeks might be appropriate, ",
                        "and if bile acids exceed 100 µmol/L, earlier delivery could be considered. ",
                        "Close monitoring of fetal well-being and maternal liver function may be beneficial.",
                    ]),
                    CholestasisGrade::Moderate => out.recommend([
                        "Starting **UDCA 300 mg orally TID** may be beneficial. Delivery could be planned around **37 weeks gestation** to minimize risks.",
                    ]),
                    CholestasisGrade::Mild => out.recommend([
                        "It may be helpful to start **UDCA 300 mg orally TID**. Weekly monitoring of bile acid levels and maternal symptoms is advised.",
                    ]),
                };
                out.diet([
                    "A balanced liver-supportive diet rich in fruits (e.g., papaya, apple), vegetables (e.g., spinach, beetroot), and whole grains is suggested. Avoid spicy, oily, or fried foods. Drinking plenty of water may support bile clearance.",
                ]);
            }
            LiverFinding::Hellp => {
                out.alert("LFT pattern consistent with HELLP Syndrome (AST↑, Platelets↓, LDH↑)")
                    .recommend([
                        "Consider urgent hospitalization. Administer **Magnesium Sulfate (MgSO₄) 4 g IV over 20 minutes followed by 1 g/hr infusion** for seizure prophylaxis.",
                        "Stabilization and **planning for delivery regardless of gestational age** may be needed if maternal/fetal status is unstable.",
                    ])
                    .diet([
                        "During stabilization, the patient may be NPO (nothing by mouth). Once stable, a soft diet low in sodium and rich in antioxidants (e.g., vitamin C and E) may support recovery.",
                    ])
                    .tag(Condition::HellpSyndrome);
            }
            LiverFinding::AcuteFattyLiver => {
                out.alert("Findings suggest Acute Fatty Liver of Pregnancy (AFLP)")
                    .recommend([
                        "Immediate **ICU admission** may be required. Consider **IV Dextrose 10–20% infusion** if hypoglycemia persists, and prepare for **urgent delivery**.",
                        "Monitoring renal and coagulation parameters may also be necessary.",
                    ])
                    .diet([
                        "In AFLP, patients are usually NPO initially. Once oral intake is allowed, a bland, low-protein diet may help reduce liver load under medical supervision.",
                    ])
                    .tag(Condition::AcuteFattyLiver);
            }
            LiverFinding::NonSpecific => {
                out.alert("Abnormal liver enzymes without definitive diagnostic pattern")
                    .recommend([
                        "Further evaluation may include testing for **Hepatitis B/C, autoimmune markers (ANA, AMA), and gallbladder ultrasound**.",
                        "Referral to a hepatologist could be considered if abnormalities persist or worsen.",
                    ])
                    .diet([
                        "Suggest maintaining a liver-friendly diet with foods like oats, turmeric, berries, and avoiding alcohol, red meat, processed snacks, and high-fat meals.",
                    ])
                    .tag(Condition::LiverDysfunction);
            }
        }
        out
    }
}

fn cholestasis(obs: &ObservationSet, t: &ClinicalThresholds) -> Option<LiverFinding> {
    let bile_acids = obs.bile_acids.filter(|b| *b >= t.liver.bile_acids_icp)?;
    let grade = if bile_acids > t.liver.bile_acids_severe {
        CholestasisGrade::Severe
    } else if bile_acids > t.liver.bile_acids_moderate {
        CholestasisGrade::Moderate
    } else {
        CholestasisGrade::Mild
    };
    Some(LiverFinding::Cholestasis { bile_acids, grade })
}

fn hellp(obs: &ObservationSet, t: &ClinicalThresholds) -> Option<LiverFinding> {
    let matched = obs.ast.is_some_and(|v| v >= t.liver.hellp_ast)
        && obs.platelets.is_some_and(|v| v < t.liver.hellp_platelets)
        && obs.ldh.is_some_and(|v| v >= t.liver.hellp_ldh);
    matched.then_some(LiverFinding::Hellp)
}

fn acute_fatty_liver(obs: &ObservationSet, t: &ClinicalThresholds) -> Option<LiverFinding> {
    let matched = obs.ast.is_some_and(|v| v > t.liver.aflp_ast)
        && obs.bilirubin.is_some_and(|v| v > t.liver.aflp_bilirubin)
        && obs.glucose.is_some_and(|v| v < t.liver.aflp_glucose);
    matched.then_some(LiverFinding::AcuteFattyLiver)
}

fn non_specific(obs: &ObservationSet, _: &ClinicalThresholds) -> Option<LiverFinding> {
    let any_enzyme = [obs.ast, obs.ldh, obs.bilirubin, obs.bile_acids]
        .iter()
        .any(Option::is_some);
    any_enzyme.then_some(LiverFinding::NonSpecific)
}

const RUNGS: [(&str, Rung<LiverFinding>); 4] = [
    ("cholestasis", cholestasis),
    ("hellp", hellp),
    ("acute_fatty_liver", acute_fatty_liver),
    ("non_specific", non_specific),
];

static LADDER: Ladder<LiverFinding> = Ladder::new(&RUNGS);

fn has_risk_history(obs: &ObservationSet) -> bool {
    obs.symptoms().iter().any(|s| RISK_SYMPTOMS.contains(&s.as_str()))
        || obs.conditions().iter().any(|c| RISK_CONDITIONS.contains(&c.as_str()))
}

/// Liver dysfunction rule
pub struct LiverRule;

impl ClinicalRule for LiverRule {
    fn name(&self) -> &'static str {
        "liver_dysfunction"
    }

    fn evaluate(&self, obs: &ObservationSet, thresholds: &ClinicalThresholds) -> RuleOutput {
        if !obs.has_liver_panel() {
            let mut out = RuleOutput::new();
            if has_risk_history(obs) {
                debug!("Liver rule: risk history without panel");
                out.recommend([
                    "Liver-related symptoms or risk conditions present — recommend ordering LFT panel",
                ])
                .tag(Condition::LiverRisk);
            }
            return out;
        }

        match LADDER.climb(obs, thresholds) {
            Some(finding) => {
                debug!("Liver rule fired: {:?}", finding);
                finding.into_output()
            }
            None => RuleOutput::new(),
        }
    }
}
