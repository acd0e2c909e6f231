use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::vocabulary::LabTest;

/// Measurements found in a report, keyed by test. A test that does not occur
/// in the text is absent, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedValues(BTreeMap<LabTest, f64>);

impl ExtractedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, test: LabTest) -> Option<f64> {
        self.0.get(&test).copied()
    }

    /// Record a value, replacing any earlier one for the same test.
    pub fn insert(&mut self, test: LabTest, value: f64) -> Option<f64> {
        self.0.insert(test, value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LabTest, f64)> + '_ {
        self.0.iter().map(|(test, value)| (*test, *value))
    }
}

impl FromIterator<(LabTest, f64)> for ExtractedValues {
    fn from_iter<I: IntoIterator<Item = (LabTest, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Finds lab-test names in OCR text and reads the number that follows each.
///
/// The scan is two explicit steps, repeated left to right without overlap:
///
/// 1. Vocabulary match: the leftmost case-insensitive occurrence of any test
///    name at or after the cursor.
/// 2. Number match: after at least one non-digit character, the first run of
///    decimal digits, optionally followed by `.` and more digits. Everything in
///    between (units, punctuation, other words) is skipped. Digits from any
///    script count (full-width `１２０` reads as 120).
///
/// When step 2 succeeds the value is recorded and the cursor moves past the
/// number; a later occurrence of the same test overwrites the earlier value.
/// When it fails the cursor moves one character past the start of the name.
#[derive(Debug, Clone)]
pub struct ValueExtractor {
    names: Regex,
    number: Regex,
    decimal_digit: Regex,
}

impl ValueExtractor {
    pub fn new() -> Self {
        // One capture group per test, in vocabulary order
        let alternatives: Vec<String> = LabTest::ALL
            .iter()
            .map(|test| format!("({})", regex::escape(test.name())))
            .collect();
        let names = Regex::new(&format!("(?i){}", alternatives.join("|")))
            .expect("vocabulary pattern is built from escaped literals");
        let number = Regex::new(r"\A\D+(\d+(?:\.\d+)?)")
            .expect("number pattern is a valid literal");
        let decimal_digit = Regex::new(r"\A\d\z").expect("digit pattern is a valid literal");

        Self {
            names,
            number,
            decimal_digit,
        }
    }

    pub fn extract(&self, text: &str) -> ExtractedValues {
        let mut values = ExtractedValues::new();
        let mut cursor = 0;

        while let Some((test, start, end)) = self.match_vocabulary(text, cursor) {
            match self.match_number(text, end) {
                Some((value, number_end)) => {
                    if let Some(previous) = values.insert(test, value) {
                        tracing::debug!(%test, previous, value, "Later occurrence overrides value");
                    }
                    cursor = number_end;
                }
                None => {
                    cursor = start + text[start..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        values
    }

    /// Step 1: leftmost test name at or after `from`, as (test, start, end).
    fn match_vocabulary(&self, text: &str, from: usize) -> Option<(LabTest, usize, usize)> {
        if from >= text.len() {
            return None;
        }
        let caps = self.names.captures_at(text, from)?;
        let whole = caps.get(0)?;
        let index = (0..LabTest::COUNT).find(|i| caps.get(i + 1).is_some())?;

        Some((LabTest::ALL[index], whole.start(), whole.end()))
    }

    /// Step 2: the first numeric run after a test name ending at `from`, as
    /// (value, end of number).
    fn match_number(&self, text: &str, from: usize) -> Option<(f64, usize)> {
        let caps = self.number.captures(&text[from..])?;
        let literal = caps.get(1)?;
        let value = self.parse_decimal(literal.as_str())?;
        Some((value, from + literal.end()))
    }

    fn parse_decimal(&self, literal: &str) -> Option<f64> {
        if literal.is_ascii() {
            return literal.parse().ok();
        }
        let ascii = literal
            .chars()
            .map(|c| if c == '.' { Some(c) } else { self.ascii_digit(c) })
            .collect::<Option<String>>()?;
        ascii.parse().ok()
    }

    /// ASCII equivalent of a Unicode decimal digit.
    ///
    /// Decimal digits are encoded as contiguous runs of ten starting at zero,
    /// so the value is the distance from the start of the run, modulo 10.
    fn ascii_digit(&self, c: char) -> Option<char> {
        if c.is_ascii_digit() {
            return Some(c);
        }
        let is_digit = |ch: char| self.decimal_digit.is_match(ch.encode_utf8(&mut [0; 4]));
        if !is_digit(c) {
            return None;
        }

        let mut zero = u32::from(c);
        while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
            if !is_digit(prev) {
                break;
            }
            zero -= 1;
        }
        char::from_digit((u32::from(c) - zero) % 10, 10)
    }
}

impl Default for ValueExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> ExtractedValues {
        ValueExtractor::new().extract(text)
    }

    #[test]
    fn test_name_followed_by_units_and_second_test() {
        let values = extract("Blood Glucose: 110 mg/dL, HbA1C 5.4%");
        assert_eq!(values.len(), 2);
        assert_eq!(values.get(LabTest::BloodGlucose), Some(110.0));
        assert_eq!(values.get(LabTest::HbA1c), Some(5.4));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let values = extract("Systolic BP 120, Systolic BP 130");
        assert_eq!(values.len(), 1);
        assert_eq!(values.get(LabTest::SystolicBp), Some(130.0));
    }

    #[test]
    fn test_empty_and_whitespace_text() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t  ").is_empty());
    }

    #[test]
    fn test_case_insensitive_names_use_canonical_key() {
        let values = extract("hba1c: 6.1\nblood glucose = 98\nmcv 88.5 fL");
        assert_eq!(values.get(LabTest::HbA1c), Some(6.1));
        assert_eq!(values.get(LabTest::BloodGlucose), Some(98.0));
        assert_eq!(values.get(LabTest::Mcv), Some(88.5));

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"Blood Glucose":98.0,"HbA1C":6.1,"MCV":88.5}"#);
    }

    #[test]
    fn test_full_report_extracts_every_test() {
        let text = "PATIENT LAB REPORT\n\
                    Blood Glucose (Fasting): 126 mg/dL\n\
                    HbA1C: 7.2 %\n\
                    Systolic BP: 142 mmHg\n\
                    Diastolic BP: 91 mmHg\n\
                    LDL Cholesterol: 160 mg/dL\n\
                    HDL Cholesterol: 38 mg/dL\n\
                    Triglycerides: 210 mg/dL\n\
                    Haemoglobin: 13.5 g/dL\n\
                    MCV: 85 fL\n";
        let values = extract(text);
        assert_eq!(values.len(), LabTest::COUNT);
        assert_eq!(values.get(LabTest::DiastolicBp), Some(91.0));
        assert_eq!(values.get(LabTest::Ldl), Some(160.0));
        assert_eq!(values.get(LabTest::Hdl), Some(38.0));
        assert_eq!(values.get(LabTest::Triglycerides), Some(210.0));
        assert_eq!(values.get(LabTest::Haemoglobin), Some(13.5));
    }

    #[test]
    fn test_number_must_not_touch_name() {
        // No separator between name and digits: nothing recorded
        assert!(extract("LDL120").is_empty());
        // The separator rule is per occurrence; a later valid one still counts
        assert_eq!(extract("LDL120 then LDL: 99").get(LabTest::Ldl), Some(99.0));
    }

    #[test]
    fn test_name_without_number_is_ignored() {
        assert!(extract("Haemoglobin: not measured").is_empty());
    }

    #[test]
    fn test_first_numeric_run_skips_intervening_words() {
        // The skipped span may contain another test name; that name's own value
        // is consumed by the first match
        let values = extract("LDL: see HDL 45");
        assert_eq!(values.get(LabTest::Ldl), Some(45.0));
        assert_eq!(values.get(LabTest::Hdl), None);
    }

    #[test]
    fn test_negative_and_scientific_not_recognized() {
        let values = extract("Triglycerides: -150");
        assert_eq!(values.get(LabTest::Triglycerides), Some(150.0));

        let values = extract("MCV 8.5e1");
        assert_eq!(values.get(LabTest::Mcv), Some(8.5));
    }

    #[test]
    fn test_trailing_period_not_part_of_number() {
        assert_eq!(extract("HDL is 50.").get(LabTest::Hdl), Some(50.0));
        assert_eq!(extract("HDL is 50,5").get(LabTest::Hdl), Some(50.0));
    }

    #[test]
    fn test_unrelated_numbers_ignored() {
        let values = extract("Sample ID 99812, collected 2024-03-01. Cholesterol 200");
        assert!(values.is_empty());
    }

    #[test]
    fn test_hba1c_digit_inside_name() {
        // The '1' inside the name is part of the vocabulary match, not the value
        assert_eq!(extract("HbA1C - 5.9").get(LabTest::HbA1c), Some(5.9));
    }

    #[test]
    fn test_non_ascii_text_between_name_and_value() {
        let values = extract("Hämoglobin… Haemoglobin — 12.1 g/dL");
        assert_eq!(values.get(LabTest::Haemoglobin), Some(12.1));
    }

    #[test]
    fn test_digits_from_other_scripts() {
        // Full-width, as OCR engines emit for CJK-formatted reports
        assert_eq!(
            extract("Systolic BP: １２０ mmHg").get(LabTest::SystolicBp),
            Some(120.0)
        );
        // Arabic-Indic
        assert_eq!(extract("HbA1C ٥.٤").get(LabTest::HbA1c), Some(5.4));
        // Mathematical monospace, the last of five adjacent digit runs
        assert_eq!(extract("MCV 𝟿𝟶 fL").get(LabTest::Mcv), Some(90.0));
    }

    #[test]
    fn test_superscripts_are_not_digits() {
        assert_eq!(extract("LDL ² 130").get(LabTest::Ldl), Some(130.0));
    }

    #[test]
    fn test_extraction_is_idempotent_on_doubled_text() {
        let samples = [
            "Blood Glucose: 110 mg/dL, HbA1C 5.4%",
            "Systolic BP 120, Systolic BP 130",
            "LDL: see HDL 45",
            "MCV 80\nHaemoglobin 14.2",
            "",
        ];
        for text in samples {
            let once = extract(text);
            let doubled = extract(&format!("{}{}", text, text));
            assert_eq!(once, doubled, "doubled text changed result for {:?}", text);
        }
    }
}
