use serde::{Deserialize, Serialize};

use super::LabelDecoder;
use crate::error::PredictionError;

/// Maps encoded class codes back to disease names. Code `i` is `classes[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("label encoder has no classes".to_string());
        }
        if let Some(i) = self.classes.iter().position(|c| c.trim().is_empty()) {
            return Err(format!("class {} has an empty name", i));
        }
        Ok(())
    }
}

impl LabelDecoder for LabelEncoder {
    fn inverse_transform(&self, code: i64) -> Result<String, PredictionError> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.classes.get(i))
            .cloned()
            .ok_or_else(|| {
                PredictionError::Decoding(format!(
                    "y contains previously unseen label: {} (known labels 0..{})",
                    code,
                    self.classes.len()
                ))
            })
    }
}
