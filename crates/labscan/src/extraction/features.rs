use serde::Serialize;

use super::extractor::ExtractedValues;
use super::vocabulary::LabTest;

/// Ordered classifier input. Index `i` holds the value for `LabTest::ALL[i]`.
///
/// Absent measurements are stored as `0.0`, so a zero here may mean either a
/// measured zero or a missing test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn assemble(values: &ExtractedValues) -> Self {
        Self(
            LabTest::ALL
                .iter()
                .map(|test| values.get(*test).unwrap_or(0.0))
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Wraps an arbitrary vector, e.g. one built against a different schema.
impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&ExtractedValues> for FeatureVector {
    fn from(values: &ExtractedValues) -> Self {
        Self::assemble(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_give_all_zeros() {
        let features = FeatureVector::assemble(&ExtractedValues::new());
        assert_eq!(features.as_slice(), &[0.0; LabTest::COUNT]);
    }

    #[test]
    fn test_values_land_at_vocabulary_index() {
        let values: ExtractedValues = [
            (LabTest::Mcv, 88.0),
            (LabTest::BloodGlucose, 110.0),
            (LabTest::Hdl, 42.5),
        ]
        .into_iter()
        .collect();

        let features = FeatureVector::assemble(&values);
        assert_eq!(
            features.as_slice(),
            &[110.0, 0.0, 0.0, 0.0, 0.0, 42.5, 0.0, 0.0, 88.0]
        );
    }

    #[test]
    fn test_every_subset_has_fixed_length_and_zero_gaps() {
        // All 2^9 subsets of the vocabulary
        for mask in 0u32..(1 << LabTest::COUNT) {
            let values: ExtractedValues = LabTest::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(i, test)| (*test, (i + 1) as f64))
                .collect();

            let features = FeatureVector::assemble(&values);
            assert_eq!(features.len(), LabTest::COUNT);

            for (i, test) in LabTest::ALL.iter().enumerate() {
                let expected = values.get(*test).unwrap_or(0.0);
                assert_eq!(features.as_slice()[i], expected, "mask {:#b} index {}", mask, i);
                if mask & (1 << i) == 0 {
                    assert_eq!(features.as_slice()[i], 0.0);
                }
            }
        }
    }

    #[test]
    fn test_measured_zero_indistinguishable_from_absent() {
        let measured: ExtractedValues = [(LabTest::Ldl, 0.0)].into_iter().collect();
        let absent = ExtractedValues::new();
        assert_eq!(
            FeatureVector::assemble(&measured),
            FeatureVector::assemble(&absent)
        );
    }
}
