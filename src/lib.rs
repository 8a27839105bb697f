//! Morpheme-level error coding for verbal recall of multi-digit numbers.
//!
//! A target ("21002") and a transcribed response ("21/1000/2") are parsed
//! into number words, matched as multisets, and scored for missing words,
//! missing digits and missing lexical classes.

pub mod config;
pub mod error;
pub mod types {
    pub mod cell;
    pub mod number_word;
}
pub mod parsing {
    pub mod digit_mapping;
    pub mod numeral_parser;
    pub mod response;
}
pub mod scoring;
pub mod analysis {
    pub mod analyzer;
    pub mod row;
    pub mod subject;
    pub mod table;
}
pub mod output_io;

pub use config::{Config, CoderConfig};
pub use scoring::{ErrorCounts, NumeralCoder, TrialScore};
pub use types::cell::Cell;
pub use types::number_word::{LexicalClass, NumberWord, ParsedItem, Segment};
