use crate::error::TableError;
use crate::types::cell::Cell;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// An in-memory input table: one header row, then data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    index: HashMap<String, usize>,
}

/// A data row, numbered as in a spreadsheet (the first data row is row 2).
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    table: &'a Table,
    pub number: usize,
    cells: &'a [Cell],
}

static EMPTY: Cell = Cell::Empty;

impl<'a> TableRow<'a> {
    /// The cell in `column`; missing columns and short rows read as empty.
    pub fn get(&self, column: &str) -> &'a Cell {
        self.table
            .index
            .get(column)
            .and_then(|&i| self.cells.get(i))
            .unwrap_or(&EMPTY)
    }
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            name: name.into(),
            columns,
            rows,
            index,
        }
    }

    /// Reads a CSV table; the table is named after the file stem.
    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|e| TableError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_reader(name, file, &path.display().to_string())
    }

    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R, origin: &str) -> Result<Self, TableError> {
        let csv_error = |e| TableError::Csv {
            path: origin.to_string(),
            source: e,
        };

        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let columns: Vec<String> = csv_reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(csv_error)?;
            rows.push(record.iter().map(Cell::from_field).collect());
        }

        Ok(Self::new(name, columns, rows))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().enumerate().map(move |(i, cells)| TableRow {
            table: self,
            number: i + 2,
            cells,
        })
    }

    /// Fails if any of `required` is not a column of this table.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), TableError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TableError::MissingColumns {
                table: self.name.clone(),
                missing,
            })
        }
    }
}
