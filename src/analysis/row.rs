use crate::error::RowError;
use crate::scoring::TrialScore;
use crate::types::cell::Cell;
use serde::Serialize;

/// Error counts a human entered for a row the parser cannot handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualCounts {
    pub n_missing_words: i64,
    pub n_missing_digits: i64,
    pub n_missing_classes: i64,
    /// The declared number of target words
    pub n_target_words: usize,
}

/// How a row's error counts were obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum RowResult {
    Parsed(TrialScore),
    ManualOverride(ManualCounts),
}

impl RowResult {
    pub fn n_missing_words(&self) -> i64 {
        match self {
            RowResult::Parsed(trial) => trial.counts.n_missing_words as i64,
            RowResult::ManualOverride(manual) => manual.n_missing_words,
        }
    }

    pub fn n_missing_digits(&self) -> i64 {
        match self {
            RowResult::Parsed(trial) => trial.counts.n_missing_digits as i64,
            RowResult::ManualOverride(manual) => manual.n_missing_digits,
        }
    }

    pub fn n_missing_classes(&self) -> i64 {
        match self {
            RowResult::Parsed(trial) => trial.counts.n_missing_classes as i64,
            RowResult::ManualOverride(manual) => manual.n_missing_classes,
        }
    }

    /// Unknown for manual rows, whose target is never parsed
    pub fn n_target_digits(&self) -> Option<usize> {
        match self {
            RowResult::Parsed(trial) => Some(trial.counts.n_target_digits),
            RowResult::ManualOverride(_) => None,
        }
    }

    pub fn p_missing_words(&self) -> f64 {
        match self {
            RowResult::Parsed(trial) => trial.counts.p_missing_words(),
            RowResult::ManualOverride(manual) => manual_ratio(manual.n_missing_words, manual),
        }
    }

    /// Manual rows have no digit count, so their digit errors are relative
    /// to the number of words.
    pub fn p_missing_digits(&self) -> Option<f64> {
        match self {
            RowResult::Parsed(trial) => trial.counts.p_missing_digits(),
            RowResult::ManualOverride(manual) => Some(manual_ratio(manual.n_missing_digits, manual)),
        }
    }

    pub fn p_missing_classes(&self) -> f64 {
        match self {
            RowResult::Parsed(trial) => trial.counts.p_missing_classes(),
            RowResult::ManualOverride(manual) => manual_ratio(manual.n_missing_classes, manual),
        }
    }

    pub fn p_missing_morphemes(&self) -> Option<f64> {
        match self {
            RowResult::Parsed(trial) => Some(trial.counts.p_missing_morphemes()),
            RowResult::ManualOverride(_) => None,
        }
    }
}

fn manual_ratio(n: i64, manual: &ManualCounts) -> f64 {
    if manual.n_target_words == 0 {
        0.0
    } else {
        n as f64 / manual.n_target_words as f64
    }
}

/// A coded row of the output table.
#[derive(Debug, Clone, PartialEq)]
pub struct CodedRow {
    pub table: String,
    pub row_number: usize,
    pub subject: String,
    /// Input values copied through, aligned with the layout's copy columns
    pub copied: Vec<Cell>,
    pub result: RowResult,
    pub phonological_errors: Option<f64>,
    /// Per-subject fixed values, aligned with the layout's fixed columns
    pub fixed: Vec<String>,
}

/// What happened to one input row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Blank target and response
    Empty,
    /// Marked in the exclude column
    Excluded,
    Failed(RowError),
    Coded(Box<CodedRow>),
}

/// One target word of one trial, in the long-format per-word table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordRecord {
    pub subject: String,
    pub block: String,
    pub condition: String,
    pub item_num: String,
    pub n_target_words: usize,
    pub target: String,
    pub response: String,
    pub word_order: usize,
    pub word_class: &'static str,
    pub word_class_order: Option<u8>,
    pub target_word: String,
    pub word_ok: u8,
    pub digit_ok: Option<u8>,
}
