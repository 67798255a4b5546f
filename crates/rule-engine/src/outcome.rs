//! Rule outputs and the aggregated outcome

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::hash::Hash;

/// Structured tag for the clinical concern behind an alert.
///
/// Consumers branch on tags instead of parsing alert prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Low hemoglobin for the trimester
    Anemia,
    /// Low ferritin or transferrin saturation
    IronDeficiency,
    Hypertension,
    GestationalDiabetes,
    Preeclampsia,
    ThyroidDysfunction,
    LowWeightGain,
    ExcessiveWeightGain,
    Overweight,
    Obesity,
    /// Intrahepatic cholestasis of pregnancy
    Cholestasis,
    HellpSyndrome,
    AcuteFattyLiver,
    /// Abnormal liver values without a definitive pattern
    LiverDysfunction,
    /// Liver-related symptoms or history, no panel available
    LiverRisk,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Anemia => "anemia",
            Condition::IronDeficiency => "iron_deficiency",
            Condition::Hypertension => "hypertension",
            Condition::GestationalDiabetes => "gestational_diabetes",
            Condition::Preeclampsia => "preeclampsia",
            Condition::ThyroidDysfunction => "thyroid_dysfunction",
            Condition::LowWeightGain => "low_weight_gain",
            Condition::ExcessiveWeightGain => "excessive_weight_gain",
            Condition::Overweight => "overweight",
            Condition::Obesity => "obesity",
            Condition::Cholestasis => "cholestasis",
            Condition::HellpSyndrome => "hellp_syndrome",
            Condition::AcuteFattyLiver => "acute_fatty_liver",
            Condition::LiverDysfunction => "liver_dysfunction",
            Condition::LiverRisk => "liver_risk",
        }
    }
}

/// Insertion-ordered set. The first insertion of a value fixes its position;
/// later insertions of an equal value are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSet<T: Eq + Hash + Clone> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Insert a value, returning whether it was new
    pub fn insert(&mut self, item: T) -> bool {
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(item);
        true
    }

    pub fn contains(&self, item: &T) -> bool {
        self.seen.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Eq + Hash + Clone> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Eq + Hash + Clone + Serialize> Serialize for OrderedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

/// Output of a single rule, in emission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutput {
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
    pub diet: Vec<String>,
    pub conditions: Vec<Condition>,
}

impl RuleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alert(&mut self, text: impl Into<String>) -> &mut Self {
        self.alerts.push(text.into());
        self
    }

    pub fn recommend<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn diet<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.diet.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn tag(&mut self, condition: Condition) -> &mut Self {
        if !self.conditions.contains(&condition) {
            self.conditions.push(condition);
        }
        self
    }

    /// Whether the rule produced nothing
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty() && self.recommendations.is_empty() && self.diet.is_empty()
    }
}

/// Aggregated, deduplicated result of every rule
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub supplement_recommendations: OrderedSet<String>,
    pub alerts: OrderedSet<String>,
    pub dietary_recommendations: OrderedSet<String>,
    pub conditions: OrderedSet<Condition>,
}

impl RuleOutcome {
    /// Merge one rule's output, keeping first occurrences only
    pub fn absorb(&mut self, output: RuleOutput) {
        self.alerts.extend(output.alerts);
        self.supplement_recommendations.extend(output.recommendations);
        self.dietary_recommendations.extend(output.diet);
        self.conditions.extend(output.conditions);
    }

    pub fn has(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
            && self.supplement_recommendations.is_empty()
            && self.dietary_recommendations.is_empty()
    }
}
