//! Patient observation set

use serde::{Deserialize, Serialize};

/// Pregnancy trimester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// All trimesters in chronological order
    pub const ALL: [Trimester; 3] = [Trimester::First, Trimester::Second, Trimester::Third];

    /// Ordinal label used in alert text ("1st", "2nd", "3rd")
    pub fn ordinal(&self) -> &'static str {
        match self {
            Trimester::First => "1st",
            Trimester::Second => "2nd",
            Trimester::Third => "3rd",
        }
    }
}

/// Named clinical observations for one patient.
///
/// Every field is optional. An absent field means "not evaluable" and simply
/// disables the checks that depend on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationSet {
    /// Hemoglobin, 1st trimester (g/dL)
    pub hb_1st: Option<f64>,
    /// Hemoglobin, 2nd trimester (g/dL)
    pub hb_2nd: Option<f64>,
    /// Hemoglobin, 3rd trimester (g/dL)
    pub hb_3rd: Option<f64>,
    /// Serum ferritin (µg/L)
    pub ferritin: Option<f64>,
    /// Transferrin saturation (%)
    pub tsat: Option<f64>,

    /// Systolic blood pressure (mmHg)
    pub sbp: Option<f64>,
    /// Diastolic blood pressure (mmHg)
    pub dbp: Option<f64>,
    /// 24-hour urine protein (mg/24h)
    pub proteinuria: Option<f64>,

    /// OGTT fasting glucose (mg/dL)
    pub ogtt_f: Option<f64>,
    /// OGTT 1-hour glucose (mg/dL)
    pub ogtt_1h: Option<f64>,
    /// OGTT 2-hour glucose (mg/dL)
    pub ogtt_2h: Option<f64>,

    /// TSH, 1st trimester (mIU/L)
    pub tsh_1: Option<f64>,
    /// TSH, 2nd trimester (mIU/L)
    pub tsh_2: Option<f64>,
    /// TSH, 3rd trimester (mIU/L)
    pub tsh_3: Option<f64>,
    /// Free T4 (ng/dL)
    pub ft4: Option<f64>,
    /// Thyroid peroxidase antibody positive
    pub tpo_ab: Option<bool>,

    pub gestational_age_weeks: Option<f64>,
    pub bmi: Option<f64>,
    /// Pre-pregnancy weight (kg)
    pub pre_pregnancy_weight: Option<f64>,
    /// Current weight (kg)
    pub current_weight: Option<f64>,

    #[serde(alias = "sysmptoms")]
    pub symptoms: Option<Vec<String>>,
    pub conditions: Option<Vec<String>>,

    /// Serum bile acids (µmol/L)
    pub bile_acids: Option<f64>,
    /// Aspartate aminotransferase (U/L)
    pub ast: Option<f64>,
    /// Platelet count (per mm³)
    pub platelets: Option<f64>,
    /// Lactate dehydrogenase (U/L)
    pub ldh: Option<f64>,
    /// Total bilirubin (mg/dL)
    pub bilirubin: Option<f64>,
    /// Random plasma glucose (mg/dL)
    pub glucose: Option<f64>,
}

impl ObservationSet {
    /// Hemoglobin reading for a trimester
    pub fn hemoglobin(&self, trimester: Trimester) -> Option<f64> {
        match trimester {
            Trimester::First => self.hb_1st,
            Trimester::Second => self.hb_2nd,
            Trimester::Third => self.hb_3rd,
        }
    }

    /// TSH reading for a trimester
    pub fn tsh(&self, trimester: Trimester) -> Option<f64> {
        match trimester {
            Trimester::First => self.tsh_1,
            Trimester::Second => self.tsh_2,
            Trimester::Third => self.tsh_3,
        }
    }

    /// Whether any liver panel value is present
    pub fn has_liver_panel(&self) -> bool {
        [
            self.bile_acids,
            self.ast,
            self.platelets,
            self.ldh,
            self.bilirubin,
            self.glucose,
        ]
        .iter()
        .any(Option::is_some)
    }

    /// Reported symptoms, empty when absent
    pub fn symptoms(&self) -> &[String] {
        self.symptoms.as_deref().unwrap_or_default()
    }

    /// Known conditions, empty when absent
    pub fn conditions(&self) -> &[String] {
        self.conditions.as_deref().unwrap_or_default()
    }
}

/// Treat a zero reading as absent.
///
/// Several rules only consider a reading present when it is non-zero, so a
/// legitimate `0` is indistinguishable from a missing value there. Kept for
/// behavioural compatibility; it contradicts the absent-vs-zero contract of
/// [`ObservationSet`].
pub(crate) fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Render a reading for alert text: integral values keep one decimal (`10.0`),
/// everything else prints its shortest exact form (`10.4`). Magnitudes below
/// 1e-4 or from 1e16 up switch to exponent form with a signed, two-digit
/// exponent (`1e-05`, `2.5e+16`).
pub(crate) fn reading(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_finite() && magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{:e}", value);
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            }
            None => scientific,
        };
    }

    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
