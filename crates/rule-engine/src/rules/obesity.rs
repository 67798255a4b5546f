//! Obesity and excessive weight gain
//!
//! Two independent checks on the same inputs: the static BMI band, and the
//! weekly gain against the band's maximum. Both may fire.

use super::weight_gain::{weekly_gain, BmiBand};
use super::ClinicalRule;
use crate::config::ClinicalThresholds;
use crate::observation::ObservationSet;
use crate::outcome::{Condition, RuleOutput};
use tracing::debug;

const WEIGHT_MANAGEMENT_DIET: [&str; 3] = [
    "Encourage structured meal timing, whole grains, seasonal fruits, and adequate protein intake. ",
    "Avoid sugary or refined-carb-rich snacks. A food diary may help in identifying excess caloric intake. ",
    "Gentle physical activity may support weight management.",
];

fn bmi_band_check(bmi: f64, thresholds: &ClinicalThresholds, out: &mut RuleOutput) {
    match BmiBand::classify(bmi, thresholds) {
        BmiBand::Obese => {
            out.alert("Obese pregnancy – GDM/HTN risk ↑, monitor fetal size")
                .recommend([
                    "BMI ≥ 30 suggests obesity, which may elevate the risk of gestational diabetes, hypertensive disorders, ",
                    "and delivery complications such as cesarean section. Regular fetal growth monitoring and maternal vitals ",
                    "could be considered. Suggest setting personalized weight gain goals with dietary and physical activity support.",
                ])
                .diet(WEIGHT_MANAGEMENT_DIET)
                .tag(Condition::Obesity);
        }
        BmiBand::Overweight => {
            out.alert("Overweight – recommend diet + controlled weight gain")
                .recommend([
                    "A structured meal plan and monitoring of weight gain trends could help maintain optimal maternal and fetal outcomes.",
                ])
                .diet([
                    "Encourage whole foods, fresh fruits, and vegetables; prefer grilled or boiled options over fried items. ",
                    "Incorporate balanced portions of complex carbs (e.g., millet, barley), proteins (dal, paneer), and healthy fats (nuts, seeds). ",
                    "Avoid added sugars and fast food. Moderate exercise, such as walking or prenatal stretching, can be beneficial.",
                ])
                .tag(Condition::Overweight);
        }
        BmiBand::Underweight | BmiBand::Normal => {}
    }
}

fn excess_gain_check(gain: f64, bmi: f64, thresholds: &ClinicalThresholds, out: &mut RuleOutput) {
    let band = BmiBand::classify(bmi, thresholds);
    if gain <= band.limit(&thresholds.weight_gain.max_weekly_gain) {
        return;
    }

    debug!("Excessive weight gain: {:.2} kg/week ({:?})", gain, band);
    out.alert(format!("Excessive weight gain: {:.1} kg", gain))
        .tag(Condition::ExcessiveWeightGain);

    match band {
        BmiBand::Underweight | BmiBand::Normal => {
            out.recommend([
                "Observed weekly weight gain > 0.5 kg in a normal BMI pregnancy. Suggest reviewing nutrition, ",
                "activity pattern, and ensuring caloric intake is in line with trimester-specific needs.",
            ])
            .diet(WEIGHT_MANAGEMENT_DIET);
        }
        BmiBand::Overweight => {
            out.recommend([
                "Observed weekly weight gain > 0.4 kg in an overweight pregnancy. This may increase maternal-fetal risk. ",
                "A structured approach to nutrition and physical activity may help mitigate excessive gain.",
            ])
            .diet([
                "Advise meal planning with portion control, nutrient-dense foods (e.g., dals, lentils, non-starchy vegetables), ",
                "and avoiding high-fat, high-sugar snacks. Hydration and light exercise like walking are recommended.",
            ]);
        }
        BmiBand::Obese => {
            out.recommend([
                "Observed weekly weight gain > 0.3 kg in an obese pregnancy. Suggest reviewing calorie intake and promoting physical activity, ",
                "as sustained excess weight gain may increase pregnancy and delivery-related complications.",
            ])
            .diet([
                "Recommend high-satiety, low-calorie meals with complex carbohydrates, proteins, and steamed vegetables. ",
                "Avoid late-night snacking, sugar-sweetened beverages, and processed snacks. ",
                "Supervised physical activity may support better outcomes.",
            ]);
        }
    }
}

/// Obesity / excessive weight gain rule
pub struct ObesityRule;

impl ClinicalRule for ObesityRule {
    fn name(&self) -> &'static str {
        "obesity"
    }

    fn evaluate(&self, obs: &ObservationSet, thresholds: &ClinicalThresholds) -> RuleOutput {
        let mut out = RuleOutput::new();
        let Some(bmi) = obs.bmi else {
            return out;
        };

        bmi_band_check(bmi, thresholds, &mut out);
        if let Some(gain) = weekly_gain(obs, thresholds) {
            excess_gain_check(gain, bmi, thresholds, &mut out);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(obs: ObservationSet) -> RuleOutput {
        ObesityRule.evaluate(&obs, &ClinicalThresholds::default())
    }

    fn tracked(bmi: f64, before: f64, current: f64) -> ObservationSet {
        // 10 weeks since tracking started
        ObservationSet {
            bmi: Some(bmi),
            gestational_age_weeks: Some(23.0),
            pre_pregnancy_weight: Some(before),
            current_weight: Some(current),
            ..Default::default()
        }
    }

    #[test]
    fn test_obese_band_only() {
        let out = evaluate(ObservationSet {
            bmi: Some(31.0),
            ..Default::default()
        });
        assert_eq!(out.alerts, vec!["Obese pregnancy – GDM/HTN risk ↑, monitor fetal size"]);
        assert_eq!(out.recommendations.len(), 3);
        assert_eq!(out.conditions, vec![Condition::Obesity]);
    }

    #[test]
    fn test_overweight_band() {
        let out = evaluate(ObservationSet {
            bmi: Some(27.5),
            ..Default::default()
        });
        assert_eq!(out.alerts, vec!["Overweight – recommend diet + controlled weight gain"]);
        assert_eq!(out.recommendations.len(), 1);
        assert_eq!(out.diet.len(), 3);
    }

    #[test]
    fn test_band_and_excess_fire_together() {
        // 4 kg over 10 weeks = 0.4 kg/week, above the 0.3 obese maximum
        let out = evaluate(tracked(32.0, 90.0, 94.0));
        assert_eq!(
            out.alerts,
            vec![
                "Obese pregnancy – GDM/HTN risk ↑, monitor fetal size",
                "Excessive weight gain: 0.4 kg",
            ]
        );
        assert_eq!(out.conditions, vec![Condition::Obesity, Condition::ExcessiveWeightGain]);
        assert_eq!(out.diet.len(), 6);
    }

    #[test]
    fn test_normal_bmi_excess_gain() {
        let out = evaluate(tracked(22.0, 60.0, 66.0));
        assert_eq!(out.alerts, vec!["Excessive weight gain: 0.6 kg"]);
        assert!(out.recommendations[0].contains("> 0.5 kg in a normal BMI pregnancy"));
    }

    #[test]
    fn test_maximum_is_exclusive() {
        // exactly 0.5 kg/week for a normal BMI is acceptable
        assert!(evaluate(tracked(22.0, 60.0, 65.0)).is_empty());
    }
}
