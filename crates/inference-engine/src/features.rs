//! Feature schemas for the two prediction tasks

use serde::{Deserialize, Serialize};

/// Prediction task served by an ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTask {
    /// Maternal pregnancy risk
    Pregnancy,
    /// Fetal cardiotocograph (CTG) status
    Fetal,
}

impl RiskTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTask::Pregnancy => "pregnancy",
            RiskTask::Fetal => "fetal",
        }
    }

    /// Ordered feature names the models were trained on
    pub fn feature_names(&self) -> &'static [&'static str] {
        match self {
            RiskTask::Pregnancy => PregnancyFeatures::NAMES,
            RiskTask::Fetal => FetalFeatures::NAMES,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names().len()
    }

    /// Class labels, indexed by class id
    pub fn class_labels(&self) -> &'static [&'static str] {
        match self {
            RiskTask::Pregnancy => &["low", "medium", "high"],
            RiskTask::Fetal => &["normal", "suspect", "pathological"],
        }
    }

    pub fn class_count(&self) -> usize {
        self.class_labels().len()
    }
}

/// A named, fixed-order feature set
pub trait FeatureSchema {
    /// The task this schema feeds
    const TASK: RiskTask;
    /// Feature names in model input order
    const NAMES: &'static [&'static str];

    /// Feature values in model input order
    fn values(&self) -> Vec<f64>;
}

/// Maternal vitals for pregnancy risk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PregnancyFeatures {
    pub age: f64,
    pub systolic: f64,
    pub diastolic: f64,
    /// Blood sugar
    pub bs: f64,
    pub bmi: f64,
    pub heart_rate: f64,
    pub body_temp: f64,
    pub previous_complications: f64,
}

impl FeatureSchema for PregnancyFeatures {
    const TASK: RiskTask = RiskTask::Pregnancy;
    const NAMES: &'static [&'static str] = &[
        "age",
        "systolic",
        "diastolic",
        "bs",
        "bmi",
        "heart_rate",
        "body_temp",
        "previous_complications",
    ];

    fn values(&self) -> Vec<f64> {
        vec![
            self.age,
            self.systolic,
            self.diastolic,
            self.bs,
            self.bmi,
            self.heart_rate,
            self.body_temp,
            self.previous_complications,
        ]
    }
}

/// Cardiotocograph-derived features for fetal risk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetalFeatures {
    /// Baseline fetal heart rate (bpm)
    pub baseline_value: f64,
    pub accelerations: f64,
    pub fetal_movement: f64,
    pub uterine_contractions: f64,
    pub light_decelerations: f64,
    pub severe_decelerations: f64,
    pub prolongued_decelerations: f64,
    pub abnormal_short_term_variability: f64,
    pub mean_value_of_short_term_variability: f64,
    pub percentage_of_time_with_abnormal_long_term_variability: f64,
    pub mean_value_of_long_term_variability: f64,
    pub histogram_width: f64,
    pub histogram_min: f64,
    pub histogram_max: f64,
    pub histogram_number_of_peaks: f64,
    pub histogram_number_of_zeroes: f64,
    pub histogram_mode: f64,
    pub histogram_mean: f64,
    pub histogram_median: f64,
    pub histogram_variance: f64,
    pub histogram_tendency: f64,
}

impl FeatureSchema for FetalFeatures {
    const TASK: RiskTask = RiskTask::Fetal;
    const NAMES: &'static [&'static str] = &[
        "baseline_value",
        "accelerations",
        "fetal_movement",
        "uterine_contractions",
        "light_decelerations",
        "severe_decelerations",
        "prolongued_decelerations",
        "abnormal_short_term_variability",
        "mean_value_of_short_term_variability",
        "percentage_of_time_with_abnormal_long_term_variability",
        "mean_value_of_long_term_variability",
        "histogram_width",
        "histogram_min",
        "histogram_max",
        "histogram_number_of_peaks",
        "histogram_number_of_zeroes",
        "histogram_mode",
        "histogram_mean",
        "histogram_median",
        "histogram_variance",
        "histogram_tendency",
    ];

    fn values(&self) -> Vec<f64> {
        vec![
            self.baseline_value,
            self.accelerations,
            self.fetal_movement,
            self.uterine_contractions,
            self.light_decelerations,
            self.severe_decelerations,
            self.prolongued_decelerations,
            self.abnormal_short_term_variability,
            self.mean_value_of_short_term_variability,
            self.percentage_of_time_with_abnormal_long_term_variability,
            self.mean_value_of_long_term_variability,
            self.histogram_width,
            self.histogram_min,
            self.histogram_max,
            self.histogram_number_of_peaks,
            self.histogram_number_of_zeroes,
            self.histogram_mode,
            self.histogram_mean,
            self.histogram_median,
            self.histogram_variance,
            self.histogram_tendency,
        ]
    }
}
