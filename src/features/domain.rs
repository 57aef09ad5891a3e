//! Categorical encodings and the fixed-order feature tuples fed to the models.
//!
//! Each category is a closed enum with explicit conversions in both
//! directions, so the numeric codes live in exactly one place.

use serde::{Serialize, Serializer};

/// Self-reported gender, encoded for the classifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::NonBinary,
        Gender::PreferNotToSay,
    ];

    /// Parse the wire label. Matching is exact and case-sensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|gender| gender.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::NonBinary => "Non-binary",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
            Gender::NonBinary => 2,
            Gender::PreferNotToSay => 3,
        }
    }
}

/// Self-reported stress level, encoded for the classifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl StressLevel {
    pub const ALL: [StressLevel; 3] = [StressLevel::Low, StressLevel::Medium, StressLevel::High];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StressLevel::Low => "Low",
            StressLevel::Medium => "Medium",
            StressLevel::High => "High",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            StressLevel::Low => 0,
            StressLevel::Medium => 1,
            StressLevel::High => 2,
        }
    }
}

/// Severity predicted by the classifier. `None` is a real label, not absence.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
    None,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::None,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::None => "None",
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Severity::Low => 0,
            Severity::Medium => 1,
            Severity::High => 2,
            Severity::None => 3,
        }
    }

    /// Decode a classifier output. Codes outside 0..=3 have no label.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|severity| severity.code() == code)
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Regressor input in its fixed order: (Sleep_Hours, Work_Hours, Age).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegressorFeatures {
    pub sleep_hours: f64,
    pub work_hours: f64,
    pub age: f64,
}

impl RegressorFeatures {
    pub const NAMES: [&'static str; 3] = ["Sleep_Hours", "Work_Hours", "Age"];

    pub fn to_array(&self) -> [f64; 3] {
        [self.sleep_hours, self.work_hours, self.age]
    }
}

/// Classifier input in its fixed order: (Gender, Stress_Level, Work_Hours,
/// Sleep_Hours, Physical_Activity_Hours, Age).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClassifierFeatures {
    pub gender: Gender,
    pub stress_level: StressLevel,
    pub work_hours: f64,
    pub sleep_hours: f64,
    pub physical_activity_hours: f64,
    pub age: f64,
}

impl ClassifierFeatures {
    pub const NAMES: [&'static str; 6] = [
        "Gender",
        "Stress_Level",
        "Work_Hours",
        "Sleep_Hours",
        "Physical_Activity_Hours",
        "Age",
    ];

    pub fn to_array(&self) -> [f64; 6] {
        [
            f64::from(self.gender.code()),
            f64::from(self.stress_level.code()),
            self.work_hours,
            self.sleep_hours,
            self.physical_activity_hours,
            self.age,
        ]
    }
}
