//! Builders for test inputs: model artifact JSON and DOCX uploads.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use serde_json::{json, Value};

/// Disease names in label-encoder order.
pub const DISEASES: [&str; 3] = ["Anemia", "Diabetes", "Healthy"];

/// Builder for a linear classifier artifact over the lab test vocabulary.
///
/// The default model scores:
/// - Anemia: low haemoglobin and low MCV
/// - Diabetes: high glucose and high HbA1C
/// - Healthy: constant 0.5
pub struct LinearModelBuilder {
    n_features: usize,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearModelBuilder {
    pub fn new() -> Self {
        let mut anemia = vec![0.0; 9];
        anemia[7] = -1.0;
        anemia[8] = -0.5;
        let mut diabetes = vec![0.0; 9];
        diabetes[0] = 1.0;
        diabetes[1] = 1.0;
        let healthy = vec![0.0; 9];

        Self {
            n_features: 9,
            coef: vec![anemia, diabetes, healthy],
            intercept: vec![0.0, 0.0, 0.5],
        }
    }

    /// Drop the last `n` features, producing a model trained on another schema.
    pub fn truncate_features(mut self, n: usize) -> Self {
        self.n_features -= n;
        for row in &mut self.coef {
            row.truncate(self.n_features);
        }
        self
    }

    pub fn build(self) -> Value {
        json!({
            "kind": "linear",
            "n_features_in": self.n_features,
            "classes": [0, 1, 2],
            "coef": self.coef,
            "intercept": self.intercept,
        })
    }
}

impl Default for LinearModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A one-tree forest that predicts Diabetes when glucose (scaled) is above 2.
pub fn glucose_forest() -> Value {
    json!({
        "kind": "forest",
        "n_features_in": 9,
        "classes": [0, 1, 2],
        "trees": [{
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [0, -2, -2],
            "threshold": [2.0, -2.0, -2.0],
            "value": [[0.0, 5.0, 5.0], [0.0, 1.0, 9.0], [0.0, 8.0, 2.0]]
        }]
    })
}

pub fn label_encoder() -> Value {
    json!({ "classes": DISEASES })
}

/// Typical adult reference means and spreads, in vocabulary order.
pub fn standard_scaler() -> Value {
    json!({
        "mean": [100.0, 5.5, 120.0, 80.0, 100.0, 50.0, 150.0, 14.0, 90.0],
        "scale": [20.0, 0.5, 15.0, 10.0, 30.0, 10.0, 50.0, 1.5, 8.0],
    })
}

fn paragraph_xml(text: &str) -> String {
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text)
}

/// A minimal DOCX containing one body-level `w:p` per entry.
pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs.iter().map(|p| paragraph_xml(p)).collect();
    docx_with_body(&body)
}

/// A DOCX with a heading paragraph followed by a two-column table.
pub fn docx_with_table(heading: &str, rows: &[(&str, &str)]) -> Vec<u8> {
    let cell = |text: &str| format!("<w:tc>{}</w:tc>", paragraph_xml(text));
    let table: String = rows
        .iter()
        .map(|(name, value)| format!("<w:tr>{}{}</w:tr>", cell(name), cell(value)))
        .collect();
    docx_with_body(&format!("{}<w:tbl>{}</w:tbl>", paragraph_xml(heading), table))
}

/// A DOCX whose `w:body` holds the given raw WordprocessingML.
pub fn docx_with_body(body: &str) -> Vec<u8> {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(br#"<?xml version="1.0"?><Types/>"#).unwrap();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buffer.into_inner()
}
