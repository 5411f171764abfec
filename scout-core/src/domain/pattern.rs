//! Query pattern domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Kind of query a pattern runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    #[default]
    Pipeline,
    Python,
}

/// Stored query pattern
///
/// The catalog listing returns the same shape without `pipeline`; the detail
/// endpoint fills it in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryPattern {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: PatternType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda_arn: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::domain::timestamp::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl QueryPattern {
    /// Names of the parameters in substitution order
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// Parameters that must be bound to a non-empty value before execution
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| p.required)
    }

    /// Checks that parameter names are unique within the pattern
    pub fn validate_parameters(&self) -> Result<(), PatternError> {
        let mut seen = HashSet::new();
        for name in self.parameter_names() {
            if !seen.insert(name) {
                return Err(PatternError::DuplicateParameter {
                    pattern: self.name.clone(),
                    parameter: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Errors raised by local pattern checks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Pattern '{pattern}' declares parameter '{parameter}' more than once")]
    DuplicateParameter { pattern: String, parameter: String },

    #[error("Pattern '{pattern}' has no parameter named '{parameter}'")]
    UnknownParameter { pattern: String, parameter: String },

    #[error("Required parameter(s) missing: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
}

/// Declared pattern parameter
///
/// On the wire a parameter is either a bare name or an object with optional
/// `type` and `required` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawParameter")]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    pub required: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawParameter {
    Name(String),
    Spec {
        name: String,
        #[serde(rename = "type", default)]
        param_type: Option<String>,
        #[serde(default)]
        required: bool,
    },
}

impl From<RawParameter> for ParameterSpec {
    fn from(raw: RawParameter) -> Self {
        match raw {
            RawParameter::Name(name) => Self {
                name,
                param_type: None,
                required: false,
            },
            RawParameter::Spec {
                name,
                param_type,
                required,
            } => Self {
                name,
                param_type,
                required,
            },
        }
    }
}

/// How a parameter is best collected from a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Checkbox,
}

impl ParameterSpec {
    /// Human label: underscores become spaces, each word capitalized
    pub fn label(&self) -> String {
        self.name
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn input_kind(&self) -> InputKind {
        match self.param_type.as_deref().map(str::to_lowercase).as_deref() {
            Some("boolean") => InputKind::Checkbox,
            Some("number") | Some("integer") => InputKind::Number,
            _ => InputKind::Text,
        }
    }
}

/// Values bound to a pattern's parameters for one execution attempt
///
/// Entries follow the pattern's declared parameter order. Unbound parameters
/// hold the empty string, which the backend treats as "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBinding {
    pattern: String,
    values: Vec<(String, String)>,
}

impl ParameterBinding {
    /// All-empty binding for a pattern
    pub fn for_pattern(pattern: &QueryPattern) -> Self {
        Self {
            pattern: pattern.name.clone(),
            values: pattern
                .parameter_names()
                .map(|name| (name.to_string(), String::new()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Binds a value to a declared parameter
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), PatternError> {
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(PatternError::UnknownParameter {
                pattern: self.pattern.clone(),
                parameter: name.to_string(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Checks every required parameter of `pattern` has a non-blank value
    pub fn check_required(&self, pattern: &QueryPattern) -> Result<(), PatternError> {
        let missing: Vec<String> = pattern
            .required_parameters()
            .filter(|p| self.get(&p.name).is_none_or(|v| v.trim().is_empty()))
            .map(|p| p.name.clone())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PatternError::MissingRequired(missing))
        }
    }

    /// JSON object sent as `parameters` in an execute request
    pub fn to_json(&self) -> Map<String, JsonValue> {
        self.values
            .iter()
            .map(|(n, v)| (n.clone(), JsonValue::String(v.clone())))
            .collect()
    }
}
