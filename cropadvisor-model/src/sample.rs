use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of inputs the classifier consumes.
pub const FEATURE_COUNT: usize = 7;

/// Seven soil/climate measurements in classifier order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

/// Why a form field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    NotNumeric,
    NotFinite,
}

impl FieldProblem {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "required",
            Self::NotNumeric => "not_numeric",
            Self::NotFinite => "not_finite",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

impl fmt::Display for SampleFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problem {
            FieldProblem::Missing => write!(f, "{} is required", self.field),
            FieldProblem::NotNumeric => write!(f, "{} must be a number", self.field),
            FieldProblem::NotFinite => write!(f, "{} must be a finite number", self.field),
        }
    }
}

impl SoilSample {
    /// Form keys, in classifier order.
    pub const FIELDS: [&'static str; FEATURE_COUNT] =
        ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

    pub fn from_features(x: [f64; FEATURE_COUNT]) -> Self {
        Self {
            nitrogen: x[0],
            phosphorus: x[1],
            potassium: x[2],
            temperature: x[3],
            humidity: x[4],
            ph: x[5],
            rainfall: x[6],
        }
    }

    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }

    /// Parse the seven measurements from submitted form fields.
    ///
    /// Every problem is reported, not just the first one.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, Vec<SampleFieldError>> {
        let mut values = [0.0; FEATURE_COUNT];
        let mut errors = Vec::new();

        for (slot, field) in values.iter_mut().zip(Self::FIELDS) {
            let raw = form.get(field).map(|v| v.trim()).unwrap_or("");
            if raw.is_empty() {
                errors.push(SampleFieldError {
                    field,
                    problem: FieldProblem::Missing,
                });
                continue;
            }
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => *slot = v,
                Ok(_) => errors.push(SampleFieldError {
                    field,
                    problem: FieldProblem::NotFinite,
                }),
                Err(_) => errors.push(SampleFieldError {
                    field,
                    problem: FieldProblem::NotNumeric,
                }),
            }
        }

        if errors.is_empty() {
            Ok(Self::from_features(values))
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_in_classifier_order() {
        let f = form(&[
            ("N", "90"),
            ("P", "42"),
            ("K", "43"),
            ("temperature", "20.8"),
            ("humidity", "82"),
            ("ph", " 6.5 "),
            ("rainfall", "202.9"),
        ]);
        let s = SoilSample::from_form(&f).expect("valid");
        assert_eq!(s.features(), [90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]);
    }

    #[test]
    fn reports_every_bad_field() {
        let f = form(&[
            ("N", "90"),
            ("P", "lots"),
            ("temperature", "inf"),
            ("humidity", ""),
            ("ph", "6.5"),
            ("rainfall", "NaN"),
        ]);
        let errs = SoilSample::from_form(&f).unwrap_err();
        let got: Vec<_> = errs.iter().map(|e| (e.field, e.problem)).collect();
        assert_eq!(
            got,
            vec![
                ("P", FieldProblem::NotNumeric),
                ("K", FieldProblem::Missing),
                ("temperature", FieldProblem::NotFinite),
                ("humidity", FieldProblem::Missing),
                ("rainfall", FieldProblem::NotFinite),
            ]
        );
        assert_eq!(errs[0].to_string(), "P must be a number");
    }
}
