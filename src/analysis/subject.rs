use crate::config::SubjectIdStyle;
use crate::error::ConfigError;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static SUBJECT_WITH_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)([A-Z]+)$").unwrap());

/// "12AB" -> "12"; anything else is returned as is.
pub fn clean_subject_id(raw: &str) -> String {
    match SUBJECT_WITH_SUFFIX.captures(raw) {
        Some(caps) => {
            let digits = &caps[1];
            digits
                .parse::<u64>()
                .map(|n| n.to_string())
                .unwrap_or_else(|_| digits.to_string())
        }
        None => raw.to_string(),
    }
}

pub fn normalize_subject_id(raw: &str, style: SubjectIdStyle) -> String {
    match style {
        SubjectIdStyle::Raw => raw.to_string(),
        SubjectIdStyle::StripSuffix => clean_subject_id(raw),
    }
}

/// Values to write into every output row of a subject, e.g. the order in
/// which that subject ran the conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedValues {
    per_subject: BTreeMap<String, BTreeMap<String, Value>>,
}

impl FixedValues {
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let per_subject = serde_json::from_str(json).map_err(|e| ConfigError::Json {
            path: origin.to_string(),
            source: e,
        })?;
        Ok(Self { per_subject })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&json, &path.display().to_string())
    }

    /// Every column set for at least one subject, sorted.
    pub fn columns(&self) -> Vec<String> {
        let columns: BTreeSet<&String> = self.per_subject.values().flat_map(|v| v.keys()).collect();
        columns.into_iter().cloned().collect()
    }

    /// The values for `subject`, one per entry of [`Self::columns`].
    pub fn row_values(&self, subject: &str) -> Vec<String> {
        let values = self.per_subject.get(subject);
        self.columns()
            .iter()
            .map(|column| {
                values
                    .and_then(|v| v.get(column))
                    .map(value_to_field)
                    .unwrap_or_default()
            })
            .collect()
    }
}

fn value_to_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
