//! Inquiry form validator
//!
//! Submission is always intercepted. Validation runs in a fixed order:
//! built-in field constraints first, then the minimum length of the trimmed
//! project brief. A valid form produces a flat payload for the transport, and
//! its fields are cleared. Every outcome overwrites the single status region.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::FormConfig;

/// Input type of a field, as declared in markup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Url,
    Tel,
    Textarea,
}

/// A named form control and its built-in constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            required: false,
            min_length: None,
            max_length: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Which built-in constraint failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    ValueMissing,
    TypeMismatch,
    TooShort { min: usize },
    TooLong { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub field: String,
    pub kind: ConstraintKind,
}

impl ConstraintViolation {
    /// Message in the style of native validation bubbles
    pub fn message(&self) -> String {
        match self.kind {
            ConstraintKind::ValueMissing => format!("{}: please fill out this field", self.field),
            ConstraintKind::TypeMismatch => format!("{}: please enter a valid value", self.field),
            ConstraintKind::TooShort { min } => {
                format!("{}: please use at least {} characters", self.field, min)
            }
            ConstraintKind::TooLong { max } => {
                format!("{}: please use no more than {} characters", self.field, max)
            }
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email pattern is valid")
    })
}

/// Check one value against its field's constraints
pub fn check_field(spec: &FieldSpec, value: &str) -> Option<ConstraintKind> {
    if value.is_empty() {
        return spec.required.then_some(ConstraintKind::ValueMissing);
    }

    let type_ok = match spec.kind {
        FieldKind::Email => email_regex().is_match(value.trim()),
        FieldKind::Url => url::Url::parse(value.trim()).is_ok(),
        FieldKind::Text | FieldKind::Tel | FieldKind::Textarea => true,
    };
    if !type_ok {
        return Some(ConstraintKind::TypeMismatch);
    }

    let len = value.chars().count();
    if let Some(min) = spec.min_length {
        if len < min {
            return Some(ConstraintKind::TooShort { min });
        }
    }
    if let Some(max) = spec.max_length {
        if len > max {
            return Some(ConstraintKind::TooLong { max });
        }
    }
    None
}

/// Field name → value mapping handed to the transport
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InquiryPayload(pub BTreeMap<String, String>);

impl InquiryPayload {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Success,
    ValidationError,
}

/// Styling category of the status region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Success,
    Error,
}

impl StatusCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusCategory::Success => "success",
            StatusCategory::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmissionResult {
    pub status: SubmissionStatus,
    pub message: String,
}

impl FormSubmissionResult {
    pub fn category(&self) -> StatusCategory {
        match self.status {
            SubmissionStatus::Success => StatusCategory::Success,
            SubmissionStatus::ValidationError => StatusCategory::Error,
        }
    }
}

/// The single shared status area; each update replaces the previous one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRegion {
    message: String,
    category: Option<StatusCategory>,
}

impl StatusRegion {
    pub fn set(&mut self, message: impl Into<String>, category: Option<StatusCategory>) {
        self.message = message.into();
        self.category = category;
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> Option<StatusCategory> {
        self.category
    }
}

/// Everything a submission attempt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub result: FormSubmissionResult,
    /// Failed built-in constraints, for the native-validation surface
    pub violations: Vec<ConstraintViolation>,
    /// Present only on success
    pub payload: Option<InquiryPayload>,
}

/// Brief field, minimum length and status texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRules {
    pub brief_field: String,
    pub min_brief_chars: usize,
    pub required_message: String,
    pub brief_message: String,
    pub success_message: String,
}

impl Default for FormRules {
    fn default() -> Self {
        Self::from(&FormConfig::default())
    }
}

impl From<&FormConfig> for FormRules {
    fn from(config: &FormConfig) -> Self {
        Self {
            brief_field: config.brief_field.clone(),
            min_brief_chars: config.min_brief_chars,
            required_message: config.required_message.clone(),
            brief_message: config.brief_message.clone(),
            success_message: config.success_message.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InquiryForm {
    fields: Vec<FieldSpec>,
    values: Vec<String>,
    rules: FormRules,
    status: StatusRegion,
}

impl InquiryForm {
    pub fn new(fields: Vec<FieldSpec>, rules: FormRules) -> Self {
        let values = vec![String::new(); fields.len()];
        Self {
            fields,
            values,
            rules,
            status: StatusRegion::default(),
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn rules(&self) -> &FormRules {
        &self.rules
    }

    pub fn status(&self) -> &StatusRegion {
        &self.status
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.values[i].as_str())
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Set a field's value; returns `false` for unknown fields
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.position(name) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    pub fn value_at_mut(&mut self, index: usize) -> Option<&mut String> {
        self.values.get_mut(index)
    }

    /// Clear every field
    pub fn reset(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
    }

    /// Built-in constraint check across all fields, in field order
    pub fn check_validity(&self) -> Vec<ConstraintViolation> {
        self.fields
            .iter()
            .zip(&self.values)
            .filter_map(|(spec, value)| {
                check_field(spec, value).map(|kind| ConstraintViolation {
                    field: spec.name.clone(),
                    kind,
                })
            })
            .collect()
    }

    fn payload(&self) -> InquiryPayload {
        InquiryPayload(
            self.fields
                .iter()
                .zip(&self.values)
                .map(|(spec, value)| (spec.name.clone(), value.clone()))
                .collect(),
        )
    }

    fn finish(&mut self, status: SubmissionStatus, message: String) -> FormSubmissionResult {
        let result = FormSubmissionResult { status, message };
        self.status.set(result.message.clone(), Some(result.category()));
        result
    }

    /// Handle a submission attempt
    pub fn submit(&mut self) -> SubmitOutcome {
        let violations = self.check_validity();
        if !violations.is_empty() {
            debug!(count = violations.len(), "Form failed built-in constraints");
            let message = self.rules.required_message.clone();
            return SubmitOutcome {
                result: self.finish(SubmissionStatus::ValidationError, message),
                violations,
                payload: None,
            };
        }

        let payload = self.payload();
        let brief_chars = payload
            .get(&self.rules.brief_field)
            .unwrap_or_default()
            .trim()
            .chars()
            .count();
        if brief_chars < self.rules.min_brief_chars {
            debug!(
                brief_chars,
                min = self.rules.min_brief_chars,
                "Project brief too short"
            );
            let message = self.rules.brief_message.clone();
            return SubmitOutcome {
                result: self.finish(SubmissionStatus::ValidationError, message),
                violations,
                payload: None,
            };
        }

        let message = self.rules.success_message.clone();
        let result = self.finish(SubmissionStatus::Success, message);
        self.reset();
        info!(fields = payload.len(), "Inquiry accepted");

        SubmitOutcome {
            result,
            violations,
            payload: Some(payload),
        }
    }
}
