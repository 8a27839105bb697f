use thiserror::Error;

/// A target/response cell that does not follow the transcription grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The cell was blank
    #[error("empty cell")]
    EmptyCell,

    /// A character that is neither a digit nor a mapped digit symbol
    #[error("unsupported symbol '{symbol}' in segment \"{segment}\"")]
    InvalidSymbol { symbol: char, segment: String },

    /// A segment that should contain digits contained none
    #[error("no digits in segment \"{0}\"")]
    NoDigits(String),

    /// Only numbers below one million are modelled
    #[error("too many digits in segment \"{0}\" (at most 6 are supported)")]
    TooManyDigits(String),

    /// "1234t" and the like
    #[error("more than 3 digits before the thousand marker in \"{0}\"")]
    TooManyPreThousandDigits(String),

    /// "+" and "!" only make sense in a response
    #[error("placeholder \"{0}\" is not allowed in a target")]
    PlaceholderInTarget(String),
}

/// Failure to code a single target/response pair
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodingError {
    #[error("unsupported target format \"{text}\": {source}")]
    Target { text: String, source: ParseError },

    #[error("unsupported response format \"{text}\": {source}")]
    Response { text: String, source: ParseError },

    #[error("the response cell is empty")]
    MissingResponse,

    #[error("the target \"{0}\" contains no words")]
    EmptyTarget(String),

    /// Only raised in strict mode; tolerant mode logs and continues
    #[error("\"+\" is ambiguous: {0}")]
    AmbiguousPlaceholder(String),
}

/// A row that was rejected; the batch continues with the next row
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("'{0}' was not specified")]
    MissingWordCount(String),

    #[error("invalid number of words ({found}), expecting {expected} words")]
    WordCountMismatch { expected: usize, found: usize },

    #[error("invalid value \"{value}\" in column '{column}'")]
    InvalidNumber { column: String, value: String },

    /// A hand-entered count outside 0..=NWordsPerTarget
    #[error("'{column}' gives {value} missing items, expecting 0 to {n_target_words}")]
    ManualCountOutOfRange {
        column: String,
        value: i64,
        n_target_words: usize,
    },

    #[error("row contains data but there were empty rows before it")]
    DataAfterEmptyRows,

    #[error(transparent)]
    Coding(#[from] CodingError),
}

/// Structural problems with an input table. These abort the batch.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to decode CSV in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("invalid file format in table \"{table}\": columns {} are missing", .missing.join(","))]
    MissingColumns { table: String, missing: Vec<String> },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },

    #[error("failed to parse fixed values in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid digit mapping entry '{symbol}' = {digit}: {reason}")]
    InvalidDigitMapping {
        symbol: String,
        digit: i64,
        reason: &'static str,
    },

    #[error("column '{0}' cannot be disabled")]
    RequiredColumn(&'static str),
}

/// Failures while writing the output tables
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Csv { path: String, source: csv::Error },
}
