//! Clinical threshold table

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a threshold table is internally inconsistent
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ThresholdError {
    /// A cutoff that must be strictly below another is not
    #[error("{lower} ({lower_value}) must be below {upper} ({upper_value})")]
    Ordering {
        lower: &'static str,
        lower_value: f64,
        upper: &'static str,
        upper_value: f64,
    },

    /// A cutoff is negative or not a number
    #[error("{field} must be a finite non-negative number, got {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Anemia cutoffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnemiaThresholds {
    /// Hemoglobin cutoff for the 1st and 3rd trimesters (g/dL)
    pub hb_first_third: f64,
    /// Hemoglobin cutoff for the 2nd trimester (g/dL)
    pub hb_second: f64,
    /// Ferritin below this is severe iron deficiency (µg/L)
    pub ferritin_severe: f64,
    /// Ferritin below this is iron deficiency (µg/L)
    pub ferritin_mild: f64,
    /// Transferrin saturation cutoff (%)
    pub tsat: f64,
}

impl Default for AnemiaThresholds {
    fn default() -> Self {
        Self {
            hb_first_third: 11.0,
            hb_second: 10.5,
            ferritin_severe: 15.0,
            ferritin_mild: 30.0,
            tsat: 20.0,
        }
    }
}

/// Blood pressure cutoffs (mmHg)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloodPressureThresholds {
    pub systolic: f64,
    pub diastolic: f64,
}

impl Default for BloodPressureThresholds {
    fn default() -> Self {
        Self {
            systolic: 140.0,
            diastolic: 90.0,
        }
    }
}

/// Oral glucose tolerance cutoffs (mg/dL)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GdmThresholds {
    pub fasting: f64,
    pub one_hour: f64,
    pub two_hour: f64,
}

impl Default for GdmThresholds {
    fn default() -> Self {
        Self {
            fasting: 92.0,
            one_hour: 180.0,
            two_hour: 153.0,
        }
    }
}

/// Preeclampsia cutoffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreeclampsiaThresholds {
    /// Proteinuria above this is significant (mg/24h)
    pub proteinuria: f64,
}

impl Default for PreeclampsiaThresholds {
    fn default() -> Self {
        Self { proteinuria: 300.0 }
    }
}

/// Thyroid cutoffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThyroidThresholds {
    /// TSH cutoff in the 1st trimester (mIU/L)
    pub tsh_first: f64,
    /// TSH cutoff in the 2nd and 3rd trimesters (mIU/L)
    pub tsh_second_third: f64,
    /// Free T4 below this is low (ng/dL)
    pub ft4_low: f64,
}

impl Default for ThyroidThresholds {
    fn default() -> Self {
        Self {
            tsh_first: 2.5,
            tsh_second_third: 3.0,
            ft4_low: 0.8,
        }
    }
}

/// Per-BMI-band weekly gain limits (kg/week)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandLimits {
    pub underweight: f64,
    pub normal: f64,
    pub overweight: f64,
    pub obese: f64,
}

/// Gestational weight gain and BMI cutoffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightGainThresholds {
    /// BMI below this is underweight
    pub bmi_underweight: f64,
    /// BMI at or above this is overweight
    pub bmi_overweight: f64,
    /// BMI at or above this is obese
    pub bmi_obese: f64,
    /// Gain tracking starts after this gestational week
    pub tracking_start_week: f64,
    /// Gain tracking stops at this gestational week
    pub tracking_end_week: f64,
    /// Minimum expected weekly gain per band
    pub min_weekly_gain: BandLimits,
    /// Maximum acceptable weekly gain per band. Underweight shares the normal band.
    pub max_weekly_gain: BandLimits,
}

impl Default for WeightGainThresholds {
    fn default() -> Self {
        Self {
            bmi_underweight: 18.5,
            bmi_overweight: 25.0,
            bmi_obese: 30.0,
            tracking_start_week: 13.0,
            tracking_end_week: 40.0,
            min_weekly_gain: BandLimits {
                underweight: 0.5,
                normal: 0.4,
                overweight: 0.3,
                obese: 0.2,
            },
            max_weekly_gain: BandLimits {
                underweight: 0.5,
                normal: 0.5,
                overweight: 0.4,
                obese: 0.3,
            },
        }
    }
}

/// Liver panel cutoffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiverThresholds {
    /// Bile acids at or above this suggest ICP (µmol/L)
    pub bile_acids_icp: f64,
    /// Bile acids above this are moderate ICP
    pub bile_acids_moderate: f64,
    /// Bile acids above this are severe ICP
    pub bile_acids_severe: f64,
    /// HELLP: AST at or above (U/L)
    pub hellp_ast: f64,
    /// HELLP: platelets below (per mm³)
    pub hellp_platelets: f64,
    /// HELLP: LDH at or above (U/L)
    pub hellp_ldh: f64,
    /// AFLP: AST above (U/L)
    pub aflp_ast: f64,
    /// AFLP: bilirubin above (mg/dL)
    pub aflp_bilirubin: f64,
    /// AFLP: glucose below (mg/dL)
    pub aflp_glucose: f64,
}

impl Default for LiverThresholds {
    fn default() -> Self {
        Self {
            bile_acids_icp: 19.0,
            bile_acids_moderate: 40.0,
            bile_acids_severe: 100.0,
            hellp_ast: 70.0,
            hellp_platelets: 100_000.0,
            hellp_ldh: 600.0,
            aflp_ast: 300.0,
            aflp_bilirubin: 5.0,
            aflp_glucose: 60.0,
        }
    }
}

/// Immutable table of every cutoff the rules consult.
///
/// Built once at startup and shared read-only by every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicalThresholds {
    pub anemia: AnemiaThresholds,
    pub blood_pressure: BloodPressureThresholds,
    pub gdm: GdmThresholds,
    pub preeclampsia: PreeclampsiaThresholds,
    pub thyroid: ThyroidThresholds,
    pub weight_gain: WeightGainThresholds,
    pub liver: LiverThresholds,
}

impl ClinicalThresholds {
    /// Check that every cutoff is usable and that graded cutoffs are ordered
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let a = &self.anemia;
        let w = &self.weight_gain;
        let l = &self.liver;

        let values = [
            ("anemia.hb_first_third", a.hb_first_third),
            ("anemia.hb_second", a.hb_second),
            ("anemia.ferritin_severe", a.ferritin_severe),
            ("anemia.ferritin_mild", a.ferritin_mild),
            ("anemia.tsat", a.tsat),
            ("blood_pressure.systolic", self.blood_pressure.systolic),
            ("blood_pressure.diastolic", self.blood_pressure.diastolic),
            ("gdm.fasting", self.gdm.fasting),
            ("gdm.one_hour", self.gdm.one_hour),
            ("gdm.two_hour", self.gdm.two_hour),
            ("preeclampsia.proteinuria", self.preeclampsia.proteinuria),
            ("thyroid.tsh_first", self.thyroid.tsh_first),
            ("thyroid.tsh_second_third", self.thyroid.tsh_second_third),
            ("thyroid.ft4_low", self.thyroid.ft4_low),
            ("weight_gain.bmi_underweight", w.bmi_underweight),
            ("weight_gain.tracking_start_week", w.tracking_start_week),
            ("liver.bile_acids_icp", l.bile_acids_icp),
            ("liver.hellp_platelets", l.hellp_platelets),
            ("liver.aflp_glucose", l.aflp_glucose),
        ];
        for (field, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ThresholdError::Invalid { field, value });
            }
        }

        let ordered = [
            ("anemia.ferritin_severe", a.ferritin_severe, "anemia.ferritin_mild", a.ferritin_mild),
            ("weight_gain.bmi_underweight", w.bmi_underweight, "weight_gain.bmi_overweight", w.bmi_overweight),
            ("weight_gain.bmi_overweight", w.bmi_overweight, "weight_gain.bmi_obese", w.bmi_obese),
            (
                "weight_gain.tracking_start_week",
                w.tracking_start_week,
                "weight_gain.tracking_end_week",
                w.tracking_end_week,
            ),
            ("liver.bile_acids_icp", l.bile_acids_icp, "liver.bile_acids_moderate", l.bile_acids_moderate),
            ("liver.bile_acids_moderate", l.bile_acids_moderate, "liver.bile_acids_severe", l.bile_acids_severe),
        ];
        for (lower, lower_value, upper, upper_value) in ordered {
            if lower_value >= upper_value {
                return Err(ThresholdError::Ordering {
                    lower,
                    lower_value,
                    upper,
                    upper_value,
                });
            }
        }

        Ok(())
    }
}
