//! Thyroid dysfunction

use super::ClinicalRule;
use crate::config::ClinicalThresholds;
use crate::observation::{reading, ObservationSet, Trimester};
use crate::outcome::{Condition, RuleOutput};
use tracing::debug;

/// Outcome of the confirmatory FT4 / TPO-Ab step once TSH is elevated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirmation {
    OvertHypothyroidism,
    SubclinicalAutoimmune,
    PanelMissing,
    /// FT4 normal and TPO-Ab not positive: nothing further to report
    Inconclusive,
}

fn confirm(obs: &ObservationSet, thresholds: &ClinicalThresholds) -> Confirmation {
    match obs.ft4 {
        Some(ft4) if ft4 < thresholds.thyroid.ft4_low => Confirmation::OvertHypothyroidism,
        Some(_) if obs.tpo_ab == Some(true) => Confirmation::SubclinicalAutoimmune,
        Some(_) => Confirmation::Inconclusive,
        None => Confirmation::PanelMissing,
    }
}

/// Thyroid rule: trimester-specific TSH screen, then FT4 / TPO-Ab confirmation
pub struct ThyroidRule;

impl ClinicalRule for ThyroidRule {
    fn name(&self) -> &'static str {
        "thyroid"
    }

    fn evaluate(&self, obs: &ObservationSet, thresholds: &ClinicalThresholds) -> RuleOutput {
        let mut out = RuleOutput::new();

        let mut flagged = false;
        for trimester in Trimester::ALL {
            let Some(tsh) = obs.tsh(trimester) else {
                continue;
            };
            let cutoff = match trimester {
                Trimester::First => thresholds.thyroid.tsh_first,
                Trimester::Second | Trimester::Third => thresholds.thyroid.tsh_second_third,
            };
            if tsh > cutoff {
                out.alert(format!(
                    "TSH elevated in {} trimester: {} mIU/L",
                    trimester.ordinal(),
                    reading(tsh)
                ));
                flagged = true;
            }
        }

        if !flagged {
            return out;
        }

        out.tag(Condition::ThyroidDysfunction);
        let confirmation = confirm(obs, thresholds);
        debug!("Thyroid rule fired: {:?}", confirmation);

        match confirmation {
            Confirmation::OvertHypothyroidism => {
                out.alert("FT4 low – Overt hypothyroidism")
                    .recommend([
                        "Overt hypothyroidism is confirmed by elevated TSH and low FT4. ",
                        "Start Levothyroxine under medical supervision. Dosage adjustments may be required during pregnancy.",
                    ])
                    .diet([
                        "Include iodine-rich foods such as iodized salt, dairy products, and eggs. ",
                        "Ensure adequate selenium and zinc intake. Avoid soy-based products as they can interfere with hormone absorption.",
                    ]);
            }
            Confirmation::SubclinicalAutoimmune => {
                out.alert("FT4 normal but TPO-Ab positive – Subclinical autoimmune hypothyroidism")
                    .recommend([
                        "TSH is elevated with normal FT4 and positive TPO antibodies, indicating subclinical autoimmune hypothyroidism. ",
                        "Specialist consultation is recommended. Levothyroxine may be initiated depending on clinical judgement.",
                    ])
                    .diet([
                        "Consume iodine-rich foods in moderation. Include selenium-rich foods like Brazil nuts and fish. ",
                        "Avoid raw cruciferous vegetables and soy products.",
                    ]);
            }
            Confirmation::PanelMissing => {
                out.recommend([
                    "TSH levels are elevated but FT4 is not available. Order FT4 and TPO-Ab tests to confirm diagnosis. ",
                    "Treatment decisions should be made after full thyroid panel results.",
                ])
                .diet([
                    "Maintain a balanced diet with adequate iodine from dietary sources (e.g., dairy, eggs, seafood). ",
                    "Avoid excessive soy intake until diagnosis is confirmed.",
                ]);
            }
            Confirmation::Inconclusive => {}
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(obs: ObservationSet) -> RuleOutput {
        ThyroidRule.evaluate(&obs, &ClinicalThresholds::default())
    }

    #[test]
    fn test_every_trimester_screened() {
        let out = evaluate(ObservationSet {
            tsh_1: Some(2.6),
            tsh_2: Some(3.0),
            tsh_3: Some(3.2),
            ft4: Some(1.1),
            ..Default::default()
        });
        assert_eq!(
            out.alerts,
            vec![
                "TSH elevated in 1st trimester: 2.6 mIU/L",
                "TSH elevated in 3rd trimester: 3.2 mIU/L",
            ]
        );
        assert!(out.recommendations.is_empty());
        assert_eq!(out.conditions, vec![Condition::ThyroidDysfunction]);
    }

    #[test]
    fn test_overt_hypothyroidism() {
        let out = evaluate(ObservationSet {
            tsh_2: Some(4.0),
            ft4: Some(0.6),
            tpo_ab: Some(true),
            ..Default::default()
        });
        assert_eq!(out.alerts.len(), 2);
        assert_eq!(out.alerts[1], "FT4 low – Overt hypothyroidism");
        assert_eq!(out.recommendations.len(), 2);
    }

    #[test]
    fn test_subclinical_autoimmune() {
        let out = evaluate(ObservationSet {
            tsh_1: Some(3.5),
            ft4: Some(0.8),
            tpo_ab: Some(true),
            ..Default::default()
        });
        assert!(out.alerts[1].contains("Subclinical autoimmune hypothyroidism"));
    }

    #[test]
    fn test_missing_ft4_requests_panel() {
        let out = evaluate(ObservationSet {
            tsh_3: Some(5.0),
            tpo_ab: Some(true),
            ..Default::default()
        });
        assert_eq!(out.alerts, vec!["TSH elevated in 3rd trimester: 5.0 mIU/L"]);
        assert!(out.recommendations[0].contains("Order FT4 and TPO-Ab tests"));
        assert_eq!(out.diet.len(), 2);
    }

    #[test]
    fn test_confirmation_needs_elevated_tsh() {
        let out = evaluate(ObservationSet {
            tsh_1: Some(2.5),
            ft4: Some(0.5),
            ..Default::default()
        });
        assert!(out.is_empty());
    }
}
