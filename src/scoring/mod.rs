pub mod error_counts;
pub mod matcher;

pub use error_counts::ErrorCounts;
pub use matcher::{PairCheck, WordsSaid};

use crate::config::CoderConfig;
use crate::error::{CodingError, ConfigError};
use crate::parsing::digit_mapping::DigitMapping;
use crate::parsing::numeral_parser::NumeralParser;
use crate::parsing::response::{resolve_response, AmbiguityWarning};
use crate::types::cell::Cell;
use crate::types::number_word::{NumberWord, ParsedItem};
use serde::Serialize;

/// Parses target and response cells and scores one against the other.
#[derive(Debug, Clone, Default)]
pub struct NumeralCoder {
    parser: NumeralParser,
    fail_on_segment_order_error: bool,
}

/// The outcome for one target word of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordResult {
    /// 1 = leftmost word of the target
    pub word_order: usize,
    pub word: NumberWord,
    pub word_ok: bool,
    pub digit_ok: Option<bool>,
}

/// A coded trial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialScore {
    pub target: Vec<NumberWord>,
    pub response: Vec<NumberWord>,
    pub said: WordsSaid,
    pub counts: ErrorCounts,
    pub warnings: Vec<AmbiguityWarning>,
}

impl TrialScore {
    pub fn word_results(&self) -> Vec<WordResult> {
        self.target
            .iter()
            .zip(self.said.word_said.iter().zip(&self.said.digit_said))
            .enumerate()
            .map(|(i, (&word, (&word_ok, &digit_ok)))| WordResult {
                word_order: i + 1,
                word,
                word_ok,
                digit_ok,
            })
            .collect()
    }

    /// Adjacency check for every pair of neighbouring target words.
    pub fn adjacent_pairs(&self) -> Vec<PairCheck> {
        (0..self.target.len().saturating_sub(1))
            .filter_map(|i| matcher::adjacent_pair(&self.target, &self.response, i))
            .collect()
    }
}

impl NumeralCoder {
    pub fn new(parser: NumeralParser, fail_on_segment_order_error: bool) -> Self {
        Self {
            parser,
            fail_on_segment_order_error,
        }
    }

    pub fn from_config(config: &CoderConfig) -> Result<Self, ConfigError> {
        let mapping = DigitMapping::with_extra(&config.digit_mapping)?;
        let parser = NumeralParser::new(mapping, config.thousand_as_digit, config.teens);
        Ok(Self::new(parser, config.fail_on_segment_order_error))
    }

    /// Parses a target cell; a target must contain at least one word.
    pub fn parse_target(&self, raw_target: &Cell) -> Result<ParsedItem, CodingError> {
        let text = raw_target.canonical_text().unwrap_or_default();
        let target = self
            .parser
            .parse_target(raw_target)
            .map_err(|source| CodingError::Target {
                text: text.clone(),
                source,
            })?;
        if target.segments.iter().all(|s| s.is_empty()) {
            return Err(CodingError::EmptyTarget(text));
        }
        Ok(target)
    }

    pub fn code_trial(&self, raw_target: &Cell, raw_response: &Cell) -> Result<TrialScore, CodingError> {
        let target = self.parse_target(raw_target)?;
        self.code_parsed_target(&target, raw_response)
    }

    /// Scores a response against a target that was already parsed.
    pub fn code_parsed_target(&self, target: &ParsedItem, raw_response: &Cell) -> Result<TrialScore, CodingError> {
        let resolved = resolve_response(
            &self.parser,
            raw_response,
            target,
            self.fail_on_segment_order_error,
        )?;

        let target = target.collapse_segments();
        let response = resolved.item.collapse_segments();

        let said = matcher::target_items_said(&target, &response);
        let counts = ErrorCounts {
            n_missing_words: said.n_missing_words(),
            n_missing_digits: said.n_missing_digits(),
            n_missing_classes: matcher::n_missing_classes(&target, &response),
            n_target_words: target.len(),
            n_target_digits: target.iter().filter(|w| w.has_digit()).count(),
        };

        Ok(TrialScore {
            target,
            response,
            said,
            counts,
            warnings: resolved.warnings,
        })
    }

    /// Convenience wrapper over [`Self::code_trial`] for text cells.
    pub fn score(&self, target: &str, response: &str) -> Result<ErrorCounts, CodingError> {
        self.code_trial(&Cell::from_field(target), &Cell::from_field(response))
            .map(|trial| trial.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::number_word::LexicalClass;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_word_results_are_numbered_from_the_left() {
        let coder = NumeralCoder::default();
        let trial = coder.code_trial(&Cell::from_field("1002"), &Cell::from_field("3")).unwrap();
        assert_eq!(
            trial.word_results(),
            vec![
                WordResult {
                    word_order: 1,
                    word: NumberWord::thousand(false),
                    word_ok: false,
                    digit_ok: None,
                },
                WordResult {
                    word_order: 2,
                    word: NumberWord::new(LexicalClass::Ones, 2),
                    word_ok: false,
                    digit_ok: Some(false),
                },
            ]
        );
    }

    #[test]
    fn test_empty_target_is_rejected() {
        let coder = NumeralCoder::default();
        assert_eq!(
            coder.code_trial(&Cell::from_field("-"), &Cell::from_field("-")),
            Err(CodingError::EmptyTarget("-".into()))
        );
    }

    #[test]
    fn test_adjacent_pairs_of_trial() {
        let coder = NumeralCoder::default();
        let trial = coder.code_trial(&Cell::from_field("56"), &Cell::from_field("6/50")).unwrap();
        assert_eq!(
            trial.adjacent_pairs(),
            vec![PairCheck {
                found: true,
                order_mismatch: true
            }]
        );
    }

    #[test]
    fn test_from_config() {
        let config = CoderConfig {
            thousand_as_digit: true,
            ..CoderConfig::default()
        };
        let coder = NumeralCoder::from_config(&config).unwrap();
        assert_eq!(coder.score("1000", "-").unwrap().missing(), (1, 1, 1));
    }
}
