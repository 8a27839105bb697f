use serde::Serialize;
use std::fmt;

/// The positional role of a number word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LexicalClass {
    Ones,
    Tens,
    Hundreds,
    /// The leading digit of a 4-digit number, fused with "thousand" ("4000")
    Thousands,
    /// 11..19
    Teens,
    /// The word "thousand" said on its own, without a fused multiplier digit
    ThousandWord,
}

impl LexicalClass {
    /// Class for a digit at `position` (0 = rightmost) of a 3-digit group.
    pub fn for_group_position(position: usize) -> Self {
        match position % 3 {
            0 => LexicalClass::Ones,
            1 => LexicalClass::Tens,
            _ => LexicalClass::Hundreds,
        }
    }

    /// Rank used by per-class accuracy plots. Teens and the bare thousand
    /// word have no place in the decimal order.
    pub fn order(self) -> Option<u8> {
        match self {
            LexicalClass::Ones => Some(0),
            LexicalClass::Tens => Some(1),
            LexicalClass::Hundreds => Some(2),
            LexicalClass::Thousands => Some(3),
            LexicalClass::Teens | LexicalClass::ThousandWord => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LexicalClass::Ones => "ones",
            LexicalClass::Tens => "tens",
            LexicalClass::Hundreds => "hundreds",
            LexicalClass::Thousands => "thousands",
            LexicalClass::Teens => "teens",
            LexicalClass::ThousandWord => "thousand",
        }
    }
}

impl fmt::Display for LexicalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One morpheme of a spoken number: a digit in a lexical class, or a
/// class-only word such as "thousand".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NumberWord {
    pub lexical_class: LexicalClass,
    pub digit: Option<u8>,
}

impl NumberWord {
    pub fn new(lexical_class: LexicalClass, digit: u8) -> Self {
        Self {
            lexical_class,
            digit: Some(digit),
        }
    }

    /// The standalone word "thousand". When it counts as a digit it is
    /// "one thousand", i.e. the thousands class with digit 1.
    pub fn thousand(as_digit: bool) -> Self {
        if as_digit {
            Self::new(LexicalClass::Thousands, 1)
        } else {
            Self {
                lexical_class: LexicalClass::ThousandWord,
                digit: None,
            }
        }
    }

    pub fn has_digit(&self) -> bool {
        self.digit.is_some()
    }
}

impl fmt::Display for NumberWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.digit {
            Some(d) => write!(f, "{}:{}", self.lexical_class, d),
            None => write!(f, "{}", self.lexical_class),
        }
    }
}

/// The words of one "/"-delimited chunk, most significant first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Segment(pub Vec<NumberWord>);

impl Segment {
    pub fn words(&self) -> &[NumberWord] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<NumberWord>> for Segment {
    fn from(words: Vec<NumberWord>) -> Self {
        Segment(words)
    }
}

/// A parsed target or response: its segments, plus words whose position in
/// the utterance is unknown (the `;` suffix of a response).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedItem {
    pub segments: Vec<Segment>,
    pub unplaced: Vec<NumberWord>,
}

impl ParsedItem {
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            unplaced: Vec::new(),
        }
    }

    /// All words in reading order, unplaced words last.
    pub fn collapse_segments(&self) -> Vec<NumberWord> {
        self.segments
            .iter()
            .flat_map(|s| s.words().iter().copied())
            .chain(self.unplaced.iter().copied())
            .collect()
    }

    pub fn has_duplicate_segments(&self) -> bool {
        self.segments
            .iter()
            .enumerate()
            .any(|(i, s)| self.segments[i + 1..].contains(s))
    }
}
