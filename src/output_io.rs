use crate::analysis::analyzer::AnalysisResult;
use crate::analysis::row::CodedRow;
use crate::error::OutputError;
use std::fs;
use std::path::{Path, PathBuf};

/// The files written for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub coded: PathBuf,
    pub words: PathBuf,
    pub subjects: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: &Path, prefix: &str) -> Self {
        Self {
            coded: out_dir.join(format!("{}.csv", prefix)),
            words: out_dir.join(format!("{}_words.csv", prefix)),
            subjects: out_dir.join(format!("{}_subjstat.csv", prefix)),
        }
    }
}

/// Writes the coded rows, the per-word table and the per-subject stats.
pub fn save_results(result: &AnalysisResult, out_dir: &Path, prefix: &str) -> Result<OutputPaths, OutputError> {
    fs::create_dir_all(out_dir).map_err(|e| OutputError::Io {
        path: out_dir.display().to_string(),
        source: e,
    })?;

    let paths = OutputPaths::new(out_dir, prefix);
    write_coded_rows(result, &paths.coded)?;
    write_words(result, &paths.words)?;
    write_subject_stats(result, &paths.subjects)?;
    Ok(paths)
}

fn open_writer(path: &Path) -> Result<csv::Writer<fs::File>, OutputError> {
    csv::Writer::from_path(path).map_err(|e| OutputError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> OutputError + '_ {
    move |e| OutputError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> OutputError + '_ {
    move |e| OutputError::Io {
        path: path.display().to_string(),
        source: e,
    }
}

fn write_coded_rows(result: &AnalysisResult, path: &Path) -> Result<(), OutputError> {
    let mut writer = open_writer(path)?;
    writer.write_record(result.layout.header()).map_err(csv_error(path))?;
    for row in &result.rows {
        writer
            .write_record(coded_row_fields(row, result.layout.phonological))
            .map_err(csv_error(path))?;
    }
    writer.flush().map_err(io_error(path))
}

/// Fields of one output row, in [`crate::analysis::analyzer::OutputLayout::header`] order.
pub fn coded_row_fields(row: &CodedRow, phonological: bool) -> Vec<String> {
    let r = &row.result;
    let mut fields = vec![row.subject.clone()];
    fields.extend(row.copied.iter().map(|c| c.to_string()));
    fields.extend([
        optional(r.n_target_digits()),
        r.n_missing_words().to_string(),
        r.p_missing_words().to_string(),
        r.n_missing_digits().to_string(),
        optional(r.p_missing_digits()),
        r.n_missing_classes().to_string(),
        r.p_missing_classes().to_string(),
        optional(r.p_missing_morphemes()),
    ]);
    if phonological {
        fields.push(optional(row.phonological_errors));
    }
    fields.extend(row.fixed.iter().cloned());
    fields
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_words(result: &AnalysisResult, path: &Path) -> Result<(), OutputError> {
    let mut writer = open_writer(path)?;
    for record in &result.words {
        writer.serialize(record).map_err(csv_error(path))?;
    }
    writer.flush().map_err(io_error(path))
}

fn write_subject_stats(result: &AnalysisResult, path: &Path) -> Result<(), OutputError> {
    let mut writer = open_writer(path)?;
    let mut header = vec!["subject", "n_excluded"];
    if result.layout.phonological {
        header.push("n_phonerr");
    }
    writer.write_record(&header).map_err(csv_error(path))?;

    for stats in &result.subjects {
        let mut fields = vec![stats.subject.clone(), stats.n_excluded.to_string()];
        if result.layout.phonological {
            fields.push(optional(stats.n_phonological_errors.map(|n| n as i64)));
        }
        writer.write_record(&fields).map_err(csv_error(path))?;
    }
    writer.flush().map_err(io_error(path))
}
