//! Gestational weight gain tracking

use super::ClinicalRule;
use crate::config::{BandLimits, ClinicalThresholds};
use crate::observation::ObservationSet;
use crate::outcome::{Condition, RuleOutput};
use tracing::debug;

const RECOMMENDATIONS: [&str; 2] = [
    "Frequent calorie-dense, nutrient-rich meals and addressing underlying issues (nausea, infections) may help. ",
    "Referral to a dietician or supplementation might be warranted.",
];

const DIET: [&str; 3] = [
    "High-protein, high-calorie foods like peanut butter, nuts, ghee, milkshakes, and eggs may help support healthy weight gain. ",
    "Small, frequent meals and snacks (e.g., laddoos, dry fruits, paneer) can be useful. ",
    "Ensure iron and folate intake is adequate. Avoid skipping meals.",
];

/// Pre-pregnancy BMI band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiBand {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiBand {
    pub fn classify(bmi: f64, thresholds: &ClinicalThresholds) -> Self {
        let w = &thresholds.weight_gain;
        if bmi < w.bmi_underweight {
            BmiBand::Underweight
        } else if bmi < w.bmi_overweight {
            BmiBand::Normal
        } else if bmi < w.bmi_obese {
            BmiBand::Overweight
        } else {
            BmiBand::Obese
        }
    }

    /// The limit for this band
    pub fn limit(&self, limits: &BandLimits) -> f64 {
        match self {
            BmiBand::Underweight => limits.underweight,
            BmiBand::Normal => limits.normal,
            BmiBand::Overweight => limits.overweight,
            BmiBand::Obese => limits.obese,
        }
    }
}

/// Average weekly gain (kg/week) since gain tracking started.
///
/// Needs gestational age, both weights and BMI, and a gestational age strictly
/// inside the tracking window; otherwise `None`.
pub fn weekly_gain(obs: &ObservationSet, thresholds: &ClinicalThresholds) -> Option<f64> {
    let w = &thresholds.weight_gain;
    let age = obs.gestational_age_weeks?;
    let current = obs.current_weight?;
    let before = obs.pre_pregnancy_weight?;
    obs.bmi?;

    if !(w.tracking_start_week < age && age < w.tracking_end_week) {
        return None;
    }
    let weeks = age - w.tracking_start_week;
    if weeks <= 0.0 {
        return None;
    }

    Some((current - before) / weeks)
}

/// Low weight gain rule
pub struct LowWeightGainRule;

impl ClinicalRule for LowWeightGainRule {
    fn name(&self) -> &'static str {
        "low_weight_gain"
    }

    fn evaluate(&self, obs: &ObservationSet, thresholds: &ClinicalThresholds) -> RuleOutput {
        let mut out = RuleOutput::new();
        let (Some(gain), Some(bmi)) = (weekly_gain(obs, thresholds), obs.bmi) else {
            return out;
        };

        let band = BmiBand::classify(bmi, thresholds);
        let minimum = band.limit(&thresholds.weight_gain.min_weekly_gain);
        if gain < minimum {
            debug!("Low weight gain rule fired: {:.2} kg/week ({:?})", gain, band);
            out.alert(format!("Low weight gain: {:.1} kg", gain))
                .recommend(RECOMMENDATIONS)
                .diet(DIET)
                .tag(Condition::LowWeightGain);
        }

        out
    }
}
