use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Options of the numeral coder itself.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CoderConfig {
    /// Symbol -> digit entries on top of 0-9 (e.g. F = 2)
    pub digit_mapping: BTreeMap<String, i64>,
    /// Count the bare word "thousand" as the digit 1 in the thousands class
    pub thousand_as_digit: bool,
    pub teens: bool,
    /// Reject rows where a "+" placeholder is ambiguous instead of warning
    pub fail_on_segment_order_error: bool,
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            digit_mapping: BTreeMap::new(),
            thousand_as_digit: false,
            teens: true,
            fail_on_segment_order_error: false,
        }
    }
}

/// Input column names. An empty string disables the optional ones.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub subject: String,
    pub block: String,
    pub condition: String,
    pub item_num: String,
    pub target: String,
    pub response: String,
    pub n_words: String,
    pub exclude: String,
    pub manual: String,
    pub word_order: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            subject: "Subject".into(),
            block: "Block".into(),
            condition: "Condition".into(),
            item_num: "ItemNum".into(),
            target: "target".into(),
            response: "response".into(),
            n_words: "NWordsPerTarget".into(),
            exclude: "exclude".into(),
            manual: "manual".into(),
            word_order: "WordOrder".into(),
        }
    }
}

impl ColumnNames {
    fn enabled(name: &str) -> Option<&str> {
        (!name.is_empty()).then_some(name)
    }

    pub fn block(&self) -> Option<&str> {
        Self::enabled(&self.block)
    }

    pub fn n_words(&self) -> Option<&str> {
        Self::enabled(&self.n_words)
    }

    pub fn exclude(&self) -> Option<&str> {
        Self::enabled(&self.exclude)
    }

    pub fn manual(&self) -> Option<&str> {
        Self::enabled(&self.manual)
    }

    pub fn word_order(&self) -> Option<&str> {
        Self::enabled(&self.word_order)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("condition", &self.condition),
            ("item_num", &self.item_num),
            ("target", &self.target),
            ("response", &self.response),
        ];
        for (key, name) in required {
            if name.is_empty() {
                return Err(ConfigError::RequiredColumn(key));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectIdStyle {
    /// Use the ID as written
    #[default]
    Raw,
    /// "12AB" -> "12"
    StripSuffix,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub coder: CoderConfig,
    pub columns: ColumnNames,
    /// Read the subject ID from the subject column; otherwise each input
    /// table is one subject, named after the table.
    pub subject_id_in_table: bool,
    pub subject_id_style: SubjectIdStyle,
    /// Columns holding counts of phonological errors, summed per row
    pub phonological_error_columns: Vec<String>,
    /// JSON file of per-subject values copied into every output row
    pub fixed_values_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coder: CoderConfig::default(),
            columns: ColumnNames::default(),
            subject_id_in_table: true,
            subject_id_style: SubjectIdStyle::Raw,
            phonological_error_columns: Vec::new(),
            fixed_values_file: None,
        }
    }
}

pub fn parse_config(contents: &str, origin: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(contents).map_err(|e| ConfigError::Toml {
        path: origin.to_string(),
        source: e,
    })?;
    config.columns.validate()?;
    if let Some(file) = &config.fixed_values_file {
        // Relative paths are relative to the config file
        if file.is_relative() {
            if let Some(dir) = Path::new(origin).parent() {
                config.fixed_values_file = Some(dir.join(file));
            }
        }
    }
    Ok(config)
}

pub fn load_config_from_file(file_path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::Io {
        path: file_path.display().to_string(),
        source: e,
    })?;
    parse_config(&contents, &file_path.display().to_string())
}
