//! Batch coding of input tables.
//!
//! Each table is one "worksheet" of an experiment. Rows are coded one at a
//! time and independently; a row that cannot be coded is logged and counted,
//! and the batch moves on. Only a table missing a mandatory column stops the
//! run, and that is checked before any row is touched.

use super::row::{CodedRow, ManualCounts, RowOutcome, RowResult, WordRecord};
use super::subject::{normalize_subject_id, FixedValues};
use super::table::{Table, TableRow};
use crate::config::Config;
use crate::error::{CodingError, ConfigError, ParseError, RowError, TableError};
use crate::scoring::{NumeralCoder, TrialScore};
use crate::types::cell::Cell;
use tracing::{debug, info, warn};

/// Input columns holding hand-coded counts for manual rows
const MANUAL_WORDS_COLUMN: &str = "NMissingWords";
const MANUAL_DIGITS_COLUMN: &str = "NMissingDigits";
const MANUAL_CLASSES_COLUMN: &str = "NMissingClasses";

const MEASURE_COLUMNS: [&str; 8] = [
    "NTargetDigits",
    "NMissingWords",
    "PMissingWords",
    "NMissingDigits",
    "PMissingDigits",
    "NMissingClasses",
    "PMissingClasses",
    "PMissingMorphemes",
];

/// Column order of the coded-row output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub copy_columns: Vec<String>,
    pub phonological: bool,
    pub fixed_columns: Vec<String>,
}

impl OutputLayout {
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["Subject".to_string()];
        header.extend(self.copy_columns.iter().cloned());
        header.extend(MEASURE_COLUMNS.iter().map(|c| c.to_string()));
        if self.phonological {
            header.push("NPhonologicalErrors".to_string());
        }
        header.extend(self.fixed_columns.iter().cloned());
        header
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectStats {
    pub subject: String,
    pub n_excluded: usize,
    /// Only when phonological error columns are configured
    pub n_phonological_errors: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub layout: OutputLayout,
    pub rows: Vec<CodedRow>,
    pub words: Vec<WordRecord>,
    pub subjects: Vec<SubjectStats>,
    pub n_failed: usize,
}

impl AnalysisResult {
    pub fn is_ok(&self) -> bool {
        self.n_failed == 0
    }
}

#[derive(Debug, Clone)]
pub struct ErrorAnalyzer {
    config: Config,
    coder: NumeralCoder,
    fixed_values: FixedValues,
}

impl ErrorAnalyzer {
    /// Builds the coder and loads the fixed-values file, if one is set.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let coder = NumeralCoder::from_config(&config.coder)?;
        let fixed_values = match &config.fixed_values_file {
            Some(path) => FixedValues::load(path)?,
            None => FixedValues::default(),
        };
        Ok(Self {
            config,
            coder,
            fixed_values,
        })
    }

    pub fn with_fixed_values(mut self, fixed_values: FixedValues) -> Self {
        self.fixed_values = fixed_values;
        self
    }

    fn mandatory_columns(&self) -> Vec<&str> {
        let cols = &self.config.columns;
        let mut mandatory = Vec::new();
        mandatory.extend(cols.block());
        mandatory.extend([
            cols.condition.as_str(),
            cols.item_num.as_str(),
            cols.target.as_str(),
            cols.response.as_str(),
        ]);
        mandatory.extend(cols.n_words());
        mandatory
    }

    fn required_columns(&self) -> Vec<&str> {
        let mut required = self.mandatory_columns();
        if self.config.subject_id_in_table {
            required.insert(0, self.config.columns.subject.as_str());
        }
        required.extend(self.config.phonological_error_columns.iter().map(String::as_str));
        required
    }

    pub fn layout(&self) -> OutputLayout {
        let cols = &self.config.columns;
        let mut copy_columns: Vec<String> = self.mandatory_columns().into_iter().map(String::from).collect();
        copy_columns.extend(cols.exclude().map(String::from));
        copy_columns.extend(cols.manual().map(String::from));
        OutputLayout {
            copy_columns,
            phonological: !self.config.phonological_error_columns.is_empty(),
            fixed_columns: self.fixed_values.columns(),
        }
    }

    /// Codes every row of every table.
    pub fn run(&self, tables: &[Table]) -> Result<AnalysisResult, TableError> {
        let required = self.required_columns();
        for table in tables {
            table.require_columns(&required)?;
        }

        let mut result = AnalysisResult {
            layout: self.layout(),
            rows: Vec::new(),
            words: Vec::new(),
            subjects: Vec::new(),
            n_failed: 0,
        };

        for table in tables {
            self.run_table(table, &mut result);
        }

        if result.is_ok() {
            info!("{} rows were processed, no errors found", result.rows.len());
        } else {
            warn!(
                "{} rows were processed, {} rows failed. Set 1 in the \"{}\" column to override automatic error coding",
                result.rows.len(),
                result.n_failed,
                self.config.columns.manual
            );
        }
        Ok(result)
    }

    fn run_table(&self, table: &Table, result: &mut AnalysisResult) {
        info!(table = %table.name, rows = table.len(), "processing table");

        if let Some(manual) = self.config.columns.manual() {
            let n_repeat = table
                .rows()
                .filter(|row| row.get(manual).to_string().contains("repeat"))
                .count();
            if n_repeat > 0 {
                info!(table = %table.name, "{} excluded&repeated trials", n_repeat);
            }
        }

        let fixed = self.fixed_values.row_values(&table.name);
        let mut n_empty = 0;
        let mut n_excluded = 0;
        let mut n_phonological_errors = 0.0;

        for row in table.rows() {
            match self.code_row(table, row) {
                RowOutcome::Empty => n_empty += 1,
                RowOutcome::Excluded => n_excluded += 1,
                RowOutcome::Failed(e) => {
                    warn!(table = %table.name, row = row.number, "row ignored: {}", e);
                    result.n_failed += 1;
                }
                RowOutcome::Coded(_) if n_empty > 0 => {
                    warn!(table = %table.name, row = row.number, "row ignored: {}", RowError::DataAfterEmptyRows);
                    result.n_failed += 1;
                }
                RowOutcome::Coded(mut coded) => {
                    n_phonological_errors += coded.phonological_errors.unwrap_or(0.0);
                    if let RowResult::Parsed(trial) = &coded.result {
                        result.words.extend(self.word_records(row, &coded.subject, trial));
                    }
                    coded.fixed = fixed.clone();
                    result.rows.push(*coded);
                }
            }
        }

        if n_empty > 0 {
            info!(table = %table.name, "{} empty rows", n_empty);
        }

        result.subjects.push(SubjectStats {
            subject: table.name.clone(),
            n_excluded,
            n_phonological_errors: (!self.config.phonological_error_columns.is_empty())
                .then_some(n_phonological_errors),
        });
    }

    /// Codes a single row.
    pub fn code_row(&self, table: &Table, row: TableRow<'_>) -> RowOutcome {
        let cols = &self.config.columns;

        if let Some(exclude) = cols.exclude() {
            if row.get(exclude).as_count() == Some(1) {
                return RowOutcome::Excluded;
            }
        }

        let raw_target = row.get(&cols.target);
        let raw_response = row.get(&cols.response);
        if raw_target.is_empty() {
            if raw_response.is_empty() {
                return RowOutcome::Empty;
            }
            return RowOutcome::Failed(RowError::Coding(CodingError::Target {
                text: String::new(),
                source: ParseError::EmptyCell,
            }));
        }

        match self.code_nonempty_row(table, row) {
            Ok(coded) => RowOutcome::Coded(Box::new(coded)),
            Err(e) => RowOutcome::Failed(e),
        }
    }

    fn code_nonempty_row(&self, table: &Table, row: TableRow<'_>) -> Result<CodedRow, RowError> {
        let cols = &self.config.columns;

        let raw_subject = if self.config.subject_id_in_table {
            row.get(&cols.subject).to_string()
        } else {
            table.name.clone()
        };
        let subject = normalize_subject_id(&raw_subject, self.config.subject_id_style);

        let declared_words = match cols.n_words() {
            None => None,
            Some(column) => match row.get(column) {
                Cell::Empty => return Err(RowError::MissingWordCount(column.to_string())),
                cell => Some(count_value(cell, column)?),
            },
        };

        let manual = cols.manual().is_some_and(|c| row.get(c).as_count() == Some(1));
        let result = if manual {
            RowResult::ManualOverride(self.manual_counts(row, declared_words)?)
        } else {
            let target = self.coder.parse_target(row.get(&cols.target))?;
            let n_words = target.collapse_segments().len();
            if let Some(expected) = declared_words {
                if expected != n_words {
                    return Err(RowError::WordCountMismatch {
                        expected,
                        found: n_words,
                    });
                }
            }

            let trial = self.coder.code_parsed_target(&target, row.get(&cols.response))?;
            for warning in &trial.warnings {
                warn!(table = %table.name, row = row.number, "\"+\" is ambiguous: {}", warning);
            }
            debug!(
                table = %table.name,
                row = row.number,
                words = trial.counts.n_missing_words,
                classes = trial.counts.n_missing_classes,
                digits = trial.counts.n_missing_digits,
                "coded trial"
            );
            RowResult::Parsed(trial)
        };

        let phonological_errors = self.phonological_errors(table, row);

        let mut copied: Vec<Cell> = self
            .mandatory_columns()
            .into_iter()
            .map(|c| row.get(c).clone())
            .collect();
        copied.extend(cols.exclude().map(|c| row.get(c).clone()));
        copied.extend(cols.manual().map(|c| row.get(c).clone()));

        Ok(CodedRow {
            table: table.name.clone(),
            row_number: row.number,
            subject,
            copied,
            result,
            phonological_errors,
            fixed: Vec::new(),
        })
    }

    fn manual_counts(&self, row: TableRow<'_>, declared_words: Option<usize>) -> Result<ManualCounts, RowError> {
        let cols = &self.config.columns;
        let n_target_words = declared_words
            .ok_or_else(|| RowError::MissingWordCount(cols.n_words.clone()))?;

        let mut n_missing_words = optional_count(row, MANUAL_WORDS_COLUMN)?;
        let mut words_column = MANUAL_WORDS_COLUMN.to_string();
        if let Some(word_order) = cols.word_order() {
            let n_order_errors = optional_count(row, word_order)?;
            if n_order_errors != 0 {
                n_missing_words -= n_order_errors;
                words_column = format!("{} - {}", MANUAL_WORDS_COLUMN, word_order);
            }
        }
        let n_missing_digits = optional_count(row, MANUAL_DIGITS_COLUMN)?;
        let n_missing_classes = optional_count(row, MANUAL_CLASSES_COLUMN)?;

        for (column, value) in [
            (words_column.as_str(), n_missing_words),
            (MANUAL_DIGITS_COLUMN, n_missing_digits),
            (MANUAL_CLASSES_COLUMN, n_missing_classes),
        ] {
            if value < 0 || value as usize > n_target_words {
                return Err(RowError::ManualCountOutOfRange {
                    column: column.to_string(),
                    value,
                    n_target_words,
                });
            }
        }

        Ok(ManualCounts {
            n_missing_words,
            n_missing_digits,
            n_missing_classes,
            n_target_words,
        })
    }

    /// Sum of the phonological error columns. A non-numeric value is
    /// reported and leaves the row's total blank; the row is still coded.
    fn phonological_errors(&self, table: &Table, row: TableRow<'_>) -> Option<f64> {
        if self.config.phonological_error_columns.is_empty() {
            return None;
        }

        let mut total = 0.0;
        for column in &self.config.phonological_error_columns {
            let cell = row.get(column);
            if cell.is_empty() {
                continue;
            }
            match cell.as_number() {
                Some(n) => total += n,
                None => {
                    let e = RowError::InvalidNumber {
                        column: column.clone(),
                        value: cell.to_string(),
                    };
                    warn!(table = %table.name, row = row.number, "{}", e);
                    return None;
                }
            }
        }
        Some(total)
    }

    fn word_records(&self, row: TableRow<'_>, subject: &str, trial: &TrialScore) -> Vec<WordRecord> {
        let cols = &self.config.columns;
        let block = cols.block().map(|c| row.get(c).to_string()).unwrap_or_default();
        let condition = row.get(&cols.condition).to_string();
        let item_num = row.get(&cols.item_num).to_string();
        let target = row.get(&cols.target).to_string();
        let response = row.get(&cols.response).to_string();
        let n_target_words = trial.target.len();

        trial
            .word_results()
            .into_iter()
            .map(|w| WordRecord {
                subject: subject.to_string(),
                block: block.clone(),
                condition: condition.clone(),
                item_num: item_num.clone(),
                n_target_words,
                target: target.clone(),
                response: response.clone(),
                word_order: w.word_order,
                word_class: w.word.lexical_class.name(),
                word_class_order: w.word.lexical_class.order(),
                target_word: w.word.to_string(),
                word_ok: u8::from(w.word_ok),
                digit_ok: w.digit_ok.map(u8::from),
            })
            .collect()
    }
}

fn count_value(cell: &Cell, column: &str) -> Result<usize, RowError> {
    cell.as_count()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| RowError::InvalidNumber {
            column: column.to_string(),
            value: cell.to_string(),
        })
}

/// Blank cells count as 0
fn optional_count(row: TableRow<'_>, column: &str) -> Result<i64, RowError> {
    let cell = row.get(column);
    if cell.is_empty() {
        return Ok(0);
    }
    cell.as_count().ok_or_else(|| RowError::InvalidNumber {
        column: column.to_string(),
        value: cell.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubjectIdStyle;
    use pretty_assertions::assert_eq;

    fn table(name: &str, csv: &str) -> Table {
        Table::from_reader(name, csv.as_bytes(), "inline").unwrap()
    }

    fn analyzer() -> ErrorAnalyzer {
        ErrorAnalyzer::new(Config::default()).unwrap()
    }

    const HEADER: &str = "Subject,Block,Condition,ItemNum,target,response,NWordsPerTarget";

    #[test]
    fn test_codes_rows() {
        let t = table(
            "data",
            &format!("{HEADER}\n12AB,1,A,1,1002,1000/2,2\n12AB,1,A,2,23,32,2\n"),
        );
        let result = analyzer().run(&[t]).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].result.n_missing_words(), 0);
        assert_eq!(result.rows[1].result.n_missing_words(), 2);
        assert_eq!(result.rows[1].result.n_missing_digits(), 0);
        assert_eq!(result.rows[0].subject, "12AB");
        assert_eq!(result.words.len(), 4);
        assert_eq!(result.words[2].word_class, "tens");
        assert_eq!(result.words[2].word_ok, 0);
        assert_eq!(result.words[2].digit_ok, Some(1));
    }

    #[test]
    fn test_subject_id_style() {
        let config = Config {
            subject_id_style: SubjectIdStyle::StripSuffix,
            ..Config::default()
        };
        let t = table("data", &format!("{HEADER}\n12AB,1,A,1,2,2,1\n"));
        let result = ErrorAnalyzer::new(config).unwrap().run(&[t]).unwrap();
        assert_eq!(result.rows[0].subject, "12");
    }

    #[test]
    fn test_failed_rows_do_not_stop_the_batch() {
        let t = table(
            "data",
            &format!("{HEADER}\nS1,1,A,1,2x,2,1\nS1,1,A,2,23,+,3\nS1,1,A,3,2,,1\nS1,1,A,4,2,2,1\n"),
        );
        let result = analyzer().run(&[t]).unwrap();
        assert_eq!(result.n_failed, 3);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].row_number, 5);
    }

    #[test]
    fn test_word_count_mismatch() {
        let t = table("data", &format!("{HEADER}\nS1,1,A,1,23,+,3\n"));
        let row = t.rows().next().unwrap();
        assert_eq!(
            analyzer().code_row(&t, row),
            RowOutcome::Failed(RowError::WordCountMismatch { expected: 3, found: 2 })
        );
    }

    #[test]
    fn test_empty_rows() {
        let t = table(
            "data",
            &format!("{HEADER}\nS1,1,A,1,2,2,1\n,,,,,,\nS1,1,A,3,2,2,1\n"),
        );
        let result = analyzer().run(&[t]).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.n_failed, 1);
    }

    #[test]
    fn test_excluded_and_manual_rows() {
        let header = format!("{HEADER},exclude,manual,NMissingWords,NMissingDigits,NMissingClasses,WordOrder");
        let t = table(
            "data",
            &format!(
                "{header}\nS1,1,A,1,2,3,1,1,,,,,\nS1,1,A,2,2 3 4,whatever,3,,1,2,1,1,1\n"
            ),
        );
        let result = analyzer().run(&[t]).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.subjects[0].n_excluded, 1);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(
            result.rows[0].result,
            RowResult::ManualOverride(ManualCounts {
                n_missing_words: 1,
                n_missing_digits: 1,
                n_missing_classes: 1,
                n_target_words: 3,
            })
        );
        assert!(result.words.is_empty());
    }

    #[test]
    fn test_manual_counts_out_of_range() {
        let header = format!("{HEADER},manual,NMissingWords,NMissingDigits,NMissingClasses,WordOrder");
        let t = table(
            "data",
            &format!(
                "{header}\nS1,1,A,1,23,x,2,1,0,0,0,1\nS1,1,A,2,23,x,2,1,5,0,0,\nS1,1,A,3,23,x,2,1,2,0,3,\n"
            ),
        );
        let rows: Vec<_> = t.rows().collect();
        let a = analyzer();
        assert_eq!(
            a.code_row(&t, rows[0]),
            RowOutcome::Failed(RowError::ManualCountOutOfRange {
                column: "NMissingWords - WordOrder".into(),
                value: -1,
                n_target_words: 2,
            })
        );
        assert_eq!(
            a.code_row(&t, rows[1]),
            RowOutcome::Failed(RowError::ManualCountOutOfRange {
                column: "NMissingWords".into(),
                value: 5,
                n_target_words: 2,
            })
        );
        assert_eq!(
            a.code_row(&t, rows[2]),
            RowOutcome::Failed(RowError::ManualCountOutOfRange {
                column: "NMissingClasses".into(),
                value: 3,
                n_target_words: 2,
            })
        );

        let result = a.run(&[t]).unwrap();
        assert_eq!(result.n_failed, 3);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_missing_columns_abort_before_any_row() {
        let good = table("SC1", &format!("{HEADER}\nS1,1,A,1,2,2,1\n"));
        let bad = table("SC2", "Subject,target,response\nS1,2,2\n");
        assert!(matches!(
            analyzer().run(&[good, bad]),
            Err(TableError::MissingColumns { .. })
        ));
    }

    #[test]
    fn test_table_name_as_subject_with_fixed_values() {
        let mut config = Config {
            subject_id_in_table: false,
            phonological_error_columns: vec!["Phon1".into(), "Phon2".into()],
            ..Config::default()
        };
        config.columns.block = String::new();
        config.columns.n_words = String::new();

        let fixed = FixedValues::from_json_str(r#"{"SC3": {"orderA": 2}}"#, "inline").unwrap();
        let analyzer = ErrorAnalyzer::new(config).unwrap().with_fixed_values(fixed);

        let t = table(
            "SC3",
            "Condition,ItemNum,target,response,Phon1,Phon2\nA,1,21t,21t,1,2\nA,2,5,5,x,\nA,3,5,5,,1\n",
        );
        let result = analyzer.run(&[t]).unwrap();

        assert_eq!(
            result.layout.header(),
            vec![
                "Subject", "Condition", "ItemNum", "target", "response", "exclude", "manual",
                "NTargetDigits", "NMissingWords", "PMissingWords", "NMissingDigits",
                "PMissingDigits", "NMissingClasses", "PMissingClasses", "PMissingMorphemes",
                "NPhonologicalErrors", "orderA",
            ]
        );
        assert_eq!(result.rows[0].subject, "SC3");
        assert_eq!(result.rows[0].fixed, vec!["2"]);
        assert_eq!(result.rows[0].phonological_errors, Some(3.0));
        assert_eq!(result.rows[1].phonological_errors, None);
        assert_eq!(result.subjects[0].n_phonological_errors, Some(4.0));
    }
}
