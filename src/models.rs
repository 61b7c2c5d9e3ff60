//! Form fields, prediction results and batch job state

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A required form field as described in the settings file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub options: Vec<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, options: &[&str]) -> Self {
        FieldSpec {
            name: name.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// A selectable form field and its current choice
#[derive(Clone, Debug, PartialEq)]
pub struct FormField {
    pub name: String,
    pub options: Vec<String>,
    /// Index into `options`; `None` means nothing selected
    pub selected: Option<usize>,
}

impl FormField {
    pub fn new(spec: &FieldSpec) -> Self {
        FormField {
            name: spec.name.clone(),
            options: spec.options.clone(),
            selected: None,
        }
    }

    /// Current value, empty when nothing is selected
    pub fn value(&self) -> &str {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Step forward through the options, wrapping back to "nothing selected"
    pub fn select_next(&mut self) {
        self.selected = match self.selected {
            None if !self.options.is_empty() => Some(0),
            Some(i) if i + 1 < self.options.len() => Some(i + 1),
            _ => None,
        };
    }

    /// Step backward through the options, wrapping through "nothing selected"
    pub fn select_prev(&mut self) {
        self.selected = match self.selected {
            None if !self.options.is_empty() => Some(self.options.len() - 1),
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }
}

/// The full set of required fields, in declaration order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub fields: Vec<FormField>,
}

impl FormState {
    pub fn from_specs(specs: &[FieldSpec]) -> Self {
        FormState {
            fields: specs.iter().map(FormField::new).collect(),
        }
    }

    /// Select `value` for `name`; returns false if either is unknown
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.name == name) else {
            return false;
        };
        match field.options.iter().position(|o| o == value) {
            Some(i) => {
                field.selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// Form-data pairs for every field, in declaration order
    pub fn to_form_data(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.value().to_string()))
            .collect()
    }
}

/// Successful single prediction as returned by the server
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub price: f64,
    /// Field/value pairs echoed back by the server, in response order
    pub input_echo: Vec<(String, String)>,
}

/// A rendered single prediction; replaced on the next submit
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionResult {
    predicted_price: f64,
    input_echo: Vec<(String, String)>,
}

impl PredictionResult {
    pub fn new(prediction: Prediction) -> Self {
        PredictionResult {
            predicted_price: prediction.price,
            input_echo: prediction.input_echo,
        }
    }

    pub fn predicted_price(&self) -> f64 {
        self.predicted_price
    }

    pub fn input_echo(&self) -> &[(String, String)] {
        &self.input_echo
    }
}

/// A file chosen for batch prediction
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

/// Lifecycle of the batch upload
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BatchStatus {
    #[default]
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

impl BatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BatchStatus::Idle => "Idle",
            BatchStatus::Uploading => "Uploading",
            BatchStatus::Succeeded => "Succeeded",
            BatchStatus::Failed => "Failed",
        }
    }
}

/// Body of `GET /health`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub preprocessor_loaded: bool,
    #[serde(default)]
    pub features_count: usize,
}

impl HealthStatus {
    pub fn is_ready(&self) -> bool {
        self.status == "healthy" && self.model_loaded && self.preprocessor_loaded
    }
}
