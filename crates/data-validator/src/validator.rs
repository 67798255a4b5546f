//! Data Validator for Range Checking

use crate::error::ValidationError;
use rule_engine::ObservationSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive `(min, max)` bounds
pub type Range = (f64, f64);

/// Physiologically plausible bounds for each observation.
///
/// These reject data-entry mistakes (wrong units, swapped fields), not
/// abnormal results: every clinically abnormal value the rules look for
/// lies well inside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Hemoglobin (g/dL), all trimesters
    pub hemoglobin_range: Range,
    /// Ferritin (µg/L)
    pub ferritin_range: Range,
    /// Transferrin saturation (%)
    pub tsat_range: Range,
    /// Systolic BP (mmHg)
    pub sbp_range: Range,
    /// Diastolic BP (mmHg)
    pub dbp_range: Range,
    /// Urine protein (mg/24h)
    pub proteinuria_range: Range,
    /// OGTT glucose (mg/dL), all three draws
    pub ogtt_range: Range,
    /// TSH (mIU/L), all trimesters
    pub tsh_range: Range,
    /// Free T4 (ng/dL)
    pub ft4_range: Range,
    pub gestational_age_range: Range,
    pub bmi_range: Range,
    /// Body weight (kg), before and during pregnancy
    pub weight_range: Range,
    /// Bile acids (µmol/L)
    pub bile_acids_range: Range,
    /// AST (U/L)
    pub ast_range: Range,
    /// Platelets (per mm³)
    pub platelets_range: Range,
    /// LDH (U/L)
    pub ldh_range: Range,
    /// Bilirubin (mg/dL)
    pub bilirubin_range: Range,
    /// Random glucose (mg/dL)
    pub glucose_range: Range,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            hemoglobin_range: (3.0, 22.0),
            ferritin_range: (0.0, 5000.0),
            tsat_range: (0.0, 100.0),
            sbp_range: (50.0, 300.0),
            dbp_range: (20.0, 200.0),
            proteinuria_range: (0.0, 30000.0),
            ogtt_range: (20.0, 800.0),
            tsh_range: (0.0, 150.0),
            ft4_range: (0.0, 10.0),
            gestational_age_range: (0.0, 45.0),
            bmi_range: (10.0, 80.0),
            weight_range: (25.0, 300.0),
            bile_acids_range: (0.0, 500.0),
            ast_range: (0.0, 10000.0),
            platelets_range: (0.0, 2_000_000.0),
            ldh_range: (0.0, 20000.0),
            bilirubin_range: (0.0, 50.0),
            glucose_range: (10.0, 1000.0),
        }
    }
}

/// Result of validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// Every rejected field, in field order
    pub errors: Vec<ValidationError>,
    /// Number of present fields examined
    pub fields_checked: usize,
}

impl ValidationResult {
    fn new(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            fields_checked,
        }
    }

    /// `Ok` when valid, otherwise every collected error
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Collects range violations across a whole input instead of stopping at
/// the first one.
#[derive(Default)]
struct Checker {
    errors: Vec<ValidationError>,
    checked: usize,
}

impl Checker {
    fn check(&mut self, field: &'static str, value: Option<f64>, range: Range) {
        let Some(value) = value else { return };
        self.checked += 1;
        if let Err(e) = Validator::validate_range(field, value, range) {
            self.errors.push(e);
        }
    }

    /// Like `check`, but a zero is the "not measured" placeholder and passes
    fn check_reading(&mut self, field: &'static str, value: Option<f64>, range: Range) {
        self.check(field, value.filter(|v| *v != 0.0), range);
    }

    fn finish(self) -> ValidationResult {
        ValidationResult::new(self.errors, self.checked)
    }
}

/// Boundary validator for observation sets and feature vectors
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(field: &'static str, value: f64, range: Range) -> Result<(), ValidationError> {
        if !value.is_finite() {
            Err(ValidationError::NonFinite { field, value })
        } else if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Check every present numeric observation. Absent fields are never errors,
    /// and neither is a zero blood pressure or OGTT reading, which the rules
    /// treat as not measured.
    pub fn validate_observations(&self, obs: &ObservationSet) -> ValidationResult {
        let c = &self.config;
        let mut checker = Checker::default();

        checker.check("hb_1st", obs.hb_1st, c.hemoglobin_range);
        checker.check("hb_2nd", obs.hb_2nd, c.hemoglobin_range);
        checker.check("hb_3rd", obs.hb_3rd, c.hemoglobin_range);
        checker.check("ferritin", obs.ferritin, c.ferritin_range);
        checker.check("tsat", obs.tsat, c.tsat_range);

        checker.check_reading("sbp", obs.sbp, c.sbp_range);
        checker.check_reading("dbp", obs.dbp, c.dbp_range);
        checker.check("proteinuria", obs.proteinuria, c.proteinuria_range);

        checker.check_reading("ogtt_f", obs.ogtt_f, c.ogtt_range);
        checker.check_reading("ogtt_1h", obs.ogtt_1h, c.ogtt_range);
        checker.check_reading("ogtt_2h", obs.ogtt_2h, c.ogtt_range);

        checker.check("tsh_1", obs.tsh_1, c.tsh_range);
        checker.check("tsh_2", obs.tsh_2, c.tsh_range);
        checker.check("tsh_3", obs.tsh_3, c.tsh_range);
        checker.check("ft4", obs.ft4, c.ft4_range);

        checker.check("gestational_age_weeks", obs.gestational_age_weeks, c.gestational_age_range);
        checker.check("bmi", obs.bmi, c.bmi_range);
        checker.check("pre_pregnancy_weight", obs.pre_pregnancy_weight, c.weight_range);
        checker.check("current_weight", obs.current_weight, c.weight_range);

        checker.check("bile_acids", obs.bile_acids, c.bile_acids_range);
        checker.check("ast", obs.ast, c.ast_range);
        checker.check("platelets", obs.platelets, c.platelets_range);
        checker.check("ldh", obs.ldh, c.ldh_range);
        checker.check("bilirubin", obs.bilirubin, c.bilirubin_range);
        checker.check("glucose", obs.glucose, c.glucose_range);

        let result = checker.finish();
        debug!(
            "Validated {} observations, {} rejected",
            result.fields_checked,
            result.errors.len()
        );
        result
    }

    /// Check a model feature vector against its ordered names: the length
    /// must match and every value must be finite.
    pub fn validate_features(&self, names: &'static [&'static str], values: &[f64]) -> ValidationResult {
        if names.len() != values.len() {
            return ValidationResult::new(
                vec![ValidationError::WrongLength {
                    field: "features",
                    expected: names.len(),
                    actual: values.len(),
                }],
                0,
            );
        }

        let errors = names
            .iter()
            .zip(values)
            .filter(|(_, v)| !v.is_finite())
            .map(|(&field, &value)| ValidationError::NonFinite { field, value })
            .collect();
        ValidationResult::new(errors, values.len())
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_observations_valid() {
        let result = Validator::default().validate_observations(&ObservationSet::default());
        assert!(result.valid);
        assert_eq!(result.fields_checked, 0);
    }

    #[test]
    fn test_clinically_abnormal_values_pass() {
        let obs = ObservationSet {
            hb_1st: Some(7.5),
            ferritin: Some(4.0),
            sbp: Some(185.0),
            dbp: Some(120.0),
            proteinuria: Some(2500.0),
            ogtt_f: Some(140.0),
            tsh_1: Some(12.0),
            bile_acids: Some(160.0),
            platelets: Some(45000.0),
            ..Default::default()
        };
        let result = Validator::default().validate_observations(&obs);
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(result.fields_checked, 9);
    }

    #[test]
    fn test_all_violations_collected() {
        let obs = ObservationSet {
            hb_1st: Some(110.0),
            sbp: Some(15.0),
            bmi: Some(f64::NAN),
            ..Default::default()
        };
        let errors = Validator::default()
            .validate_observations(&obs)
            .into_result()
            .unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["hb_1st", "sbp", "bmi"]);
        assert!(matches!(errors[2], ValidationError::NonFinite { .. }));
    }

    #[test]
    fn test_zero_placeholder_readings_pass() {
        let obs = ObservationSet {
            sbp: Some(0.0),
            dbp: Some(0.0),
            ogtt_f: Some(0.0),
            ogtt_1h: Some(0.0),
            ogtt_2h: Some(160.0),
            ..Default::default()
        };
        let result = Validator::default().validate_observations(&obs);
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(result.fields_checked, 1);

        let result = Validator::default().validate_observations(&ObservationSet {
            hb_1st: Some(0.0),
            ogtt_f: Some(5.0),
            ..Default::default()
        });
        let fields: Vec<_> = result.errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["hb_1st", "ogtt_f"]);
    }

    #[test]
    fn test_range_bounds_inclusive() {
        assert!(Validator::validate_range("tsat", 0.0, (0.0, 100.0)).is_ok());
        assert!(Validator::validate_range("tsat", 100.0, (0.0, 100.0)).is_ok());
        assert!(Validator::validate_range("tsat", 100.1, (0.0, 100.0)).is_err());
    }

    #[test]
    fn test_custom_config() {
        let config: ValidationConfig = serde_json::from_str(r#"{ "bmi_range": [15.0, 50.0] }"#).unwrap();
        assert_eq!(config.sbp_range, ValidationConfig::default().sbp_range);

        let validator = Validator::new(config);
        let result = validator.validate_observations(&ObservationSet {
            bmi: Some(55.0),
            ..Default::default()
        });
        assert!(!result.valid);
    }

    const NAMES: &[&str] = &["a", "b", "c"];

    #[test]
    fn test_feature_vector() {
        let validator = Validator::default();
        assert!(validator.validate_features(NAMES, &[1.0, -1.0, 0.0]).valid);

        let result = validator.validate_features(NAMES, &[1.0, f64::INFINITY, f64::NAN]);
        let fields: Vec<_> = result.errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["b", "c"]);

        let result = validator.validate_features(NAMES, &[1.0]);
        assert!(matches!(
            result.errors.as_slice(),
            [ValidationError::WrongLength { expected: 3, actual: 1, .. }]
        ));
    }

    proptest! {
        #[test]
        fn prop_in_range_hemoglobin_accepted(hb in 3.0f64..=22.0) {
            let result = Validator::default().validate_observations(&ObservationSet {
                hb_1st: Some(hb),
                hb_2nd: Some(hb),
                ..Default::default()
            });
            prop_assert!(result.valid);
            prop_assert_eq!(result.fields_checked, 2);
        }

        #[test]
        fn prop_errors_never_exceed_fields_checked(sbp in -500.0f64..500.0, dbp in -500.0f64..500.0) {
            let result = Validator::default().validate_observations(&ObservationSet {
                sbp: Some(sbp),
                dbp: Some(dbp),
                ..Default::default()
            });
            prop_assert!(result.errors.len() <= result.fields_checked);
            prop_assert_eq!(result.valid, result.errors.is_empty());
        }
    }
}
