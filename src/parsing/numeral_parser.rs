//! Text-to-morpheme parsing of target and response cells.
//!
//! Grammar of a cell:
//!
//! ```text
//! cell      = segment ('/' segment)*
//! segment   = pre? 't' post?        the word "thousand"
//!           | '+' | '!'             placeholder: "same as the target here"
//!           | '-' | '?'             nothing said
//!           | digits
//! digits    = (symbol | ',')+       symbol = 0-9 or a mapped letter
//! ```
//!
//! The number of digits before `t` decides how "thousand" is said: alone
//! (`t`), fused with one multiplier digit (`4t` = "4000"), or as a separate
//! word after a 2-3 digit number (`21t` = "21 thousand").

use super::digit_mapping::DigitMapping;
use crate::error::ParseError;
use crate::types::cell::Cell;
use crate::types::number_word::{LexicalClass, NumberWord, ParsedItem, Segment};
use regex::Regex;
use std::sync::LazyLock;

static THOUSAND_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\st]*)\s*t\s*([^\st]+)?$").unwrap());

/// Most digits a single segment may have (up to 999,999).
const MAX_DIGITS: usize = 6;

/// One segment of a cell before placeholders are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSegment {
    Words(Segment),
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct NumeralParser {
    mapping: DigitMapping,
    thousand_as_digit: bool,
    teens: bool,
}

impl Default for NumeralParser {
    fn default() -> Self {
        Self::new(DigitMapping::default(), false, true)
    }
}

impl NumeralParser {
    pub fn new(mapping: DigitMapping, thousand_as_digit: bool, teens: bool) -> Self {
        Self {
            mapping,
            thousand_as_digit,
            teens,
        }
    }

    /// Parses a target cell. Targets cannot contain placeholders.
    pub fn parse_target(&self, cell: &Cell) -> Result<ParsedItem, ParseError> {
        let text = cell.canonical_text().ok_or(ParseError::EmptyCell)?;
        let segments = self
            .parse_segments(&text)?
            .into_iter()
            .map(|segment| match segment {
                ParsedSegment::Words(words) => Ok(words),
                ParsedSegment::Placeholder => Err(ParseError::PlaceholderInTarget(text.clone())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ParsedItem::from_segments(segments))
    }

    /// Splits a cell on "/" and parses each segment.
    pub fn parse_segments(&self, text: &str) -> Result<Vec<ParsedSegment>, ParseError> {
        text.split('/')
            .map(|segment| self.parse_segment(segment.trim()))
            .collect()
    }

    fn parse_segment(&self, segment: &str) -> Result<ParsedSegment, ParseError> {
        match segment {
            "+" | "!" => return Ok(ParsedSegment::Placeholder),
            "-" | "?" => return Ok(ParsedSegment::Words(Segment::default())),
            _ => {}
        }

        let words = match THOUSAND_SEGMENT.captures(segment) {
            Some(caps) => {
                let pre = caps.get(1).map_or("", |m| m.as_str());
                let mut words = self.parse_pre_thousand(pre, segment)?;
                if let Some(post) = caps.get(2) {
                    words.extend(self.parse_digits(post.as_str())?);
                }
                words
            }
            None => self.parse_digits(segment)?,
        };
        Ok(ParsedSegment::Words(Segment(words)))
    }

    /// The digits before "t", together with the thousand word itself.
    fn parse_pre_thousand(&self, pre: &str, segment: &str) -> Result<Vec<NumberWord>, ParseError> {
        let n_symbols = pre.chars().filter(|&c| c != ',').count();
        match n_symbols {
            0 => Ok(vec![NumberWord::thousand(self.thousand_as_digit)]),
            // 4-digit number: "thousand" is fused with the preceding digit
            1 => self.parse_digits(&format!("{}000", pre)),
            // 5-6 digit number: "thousand" is a word of its own
            2 | 3 => {
                let mut words = self.parse_digits(pre)?;
                words.push(NumberWord::thousand(self.thousand_as_digit));
                Ok(words)
            }
            _ => Err(ParseError::TooManyPreThousandDigits(segment.to_string())),
        }
    }

    /// Parses a digit string into words, most significant first.
    pub fn parse_digits(&self, text: &str) -> Result<Vec<NumberWord>, ParseError> {
        let digits = text
            .chars()
            .filter(|&c| c != ',')
            .map(|c| {
                self.mapping.digit(c).ok_or_else(|| ParseError::InvalidSymbol {
                    symbol: c,
                    segment: text.to_string(),
                })
            })
            .collect::<Result<Vec<u8>, _>>()?;

        if digits.is_empty() {
            return Err(ParseError::NoDigits(text.to_string()));
        }

        let first_significant = digits.iter().position(|&d| d != 0).unwrap_or(digits.len());
        let digits = &digits[first_significant..];
        if digits.len() > MAX_DIGITS {
            return Err(ParseError::TooManyDigits(text.to_string()));
        }

        Ok(self.digits_to_words(digits))
    }

    fn digits_to_words(&self, digits: &[u8]) -> Vec<NumberWord> {
        let n = digits.len();
        let digit_at = |pos: usize| digits[n - 1 - pos];
        let mut words = Vec::with_capacity(n + 1);

        let mut pos = n;
        while pos > 0 {
            pos -= 1;
            let d = digit_at(pos);

            if n == 4 && pos == 3 {
                match d {
                    0 => {}
                    1 => words.push(NumberWord::thousand(self.thousand_as_digit)),
                    _ => words.push(NumberWord::new(LexicalClass::Thousands, d)),
                }
                continue;
            }

            if self.teens && pos % 3 == 1 && d == 1 && digit_at(pos - 1) != 0 {
                words.push(NumberWord::new(LexicalClass::Teens, digit_at(pos - 1)));
                pos -= 1;
            } else if d != 0 {
                words.push(NumberWord::new(LexicalClass::for_group_position(pos), d));
            }

            // Known approximation: in 5-6 digit numbers "thousand" follows
            // the thousands group as a separate word.
            if n > 4 && pos == 3 {
                words.push(NumberWord::thousand(self.thousand_as_digit));
            }
        }

        words
    }
}
