use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A lab measurement the extractor recognizes.
///
/// Declaration order is the classifier's feature order. `LabTest::ALL`, the
/// derived `Ord`, and the trained model must all agree; reordering any of them
/// silently corrupts predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LabTest {
    #[serde(rename = "Blood Glucose")]
    BloodGlucose,
    #[serde(rename = "HbA1C")]
    HbA1c,
    #[serde(rename = "Systolic BP")]
    SystolicBp,
    #[serde(rename = "Diastolic BP")]
    DiastolicBp,
    #[serde(rename = "LDL")]
    Ldl,
    #[serde(rename = "HDL")]
    Hdl,
    #[serde(rename = "Triglycerides")]
    Triglycerides,
    #[serde(rename = "Haemoglobin")]
    Haemoglobin,
    #[serde(rename = "MCV")]
    Mcv,
}

impl LabTest {
    pub const COUNT: usize = 9;

    pub const ALL: [LabTest; Self::COUNT] = [
        LabTest::BloodGlucose,
        LabTest::HbA1c,
        LabTest::SystolicBp,
        LabTest::DiastolicBp,
        LabTest::Ldl,
        LabTest::Hdl,
        LabTest::Triglycerides,
        LabTest::Haemoglobin,
        LabTest::Mcv,
    ];

    /// Canonical name as printed on reports and used in serialized output.
    pub fn name(self) -> &'static str {
        match self {
            Self::BloodGlucose => "Blood Glucose",
            Self::HbA1c => "HbA1C",
            Self::SystolicBp => "Systolic BP",
            Self::DiastolicBp => "Diastolic BP",
            Self::Ldl => "LDL",
            Self::Hdl => "HDL",
            Self::Triglycerides => "Triglycerides",
            Self::Haemoglobin => "Haemoglobin",
            Self::Mcv => "MCV",
        }
    }

    /// Position of this test in the feature vector.
    pub fn feature_index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LabTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabTest(pub String);

impl fmt::Display for UnknownLabTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown lab test '{}'", self.0)
    }
}

impl std::error::Error for UnknownLabTest {}

impl FromStr for LabTest {
    type Err = UnknownLabTest;

    /// Case-insensitive match against the canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|test| test.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLabTest(s.to_string()))
    }
}
