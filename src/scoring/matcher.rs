//! Multiset matching of response words against target words.
//!
//! Matching ignores position: each response item can account for at most one
//! target item, and the first still-unmatched equal target item is taken.

use crate::types::number_word::{LexicalClass, NumberWord};
use serde::Serialize;

/// Number of target items with no equal item left in the response.
pub fn n_missing_items<T: PartialEq>(target: &[T], response: &[T]) -> usize {
    let mut remaining: Vec<Option<&T>> = target.iter().map(Some).collect();
    for r in response {
        if let Some(slot) = remaining.iter_mut().find(|t| t.is_some_and(|t| t == r)) {
            *slot = None;
        }
    }
    remaining.iter().filter(|t| t.is_some()).count()
}

/// Missing lexical classes, ignoring digit identity.
pub fn n_missing_classes(target: &[NumberWord], response: &[NumberWord]) -> usize {
    let target: Vec<LexicalClass> = target.iter().map(|w| w.lexical_class).collect();
    let response: Vec<LexicalClass> = response.iter().map(|w| w.lexical_class).collect();
    n_missing_items(&target, &response)
}

/// Missing digits, ignoring class. Words without a digit take no part.
pub fn n_missing_digits(target: &[NumberWord], response: &[NumberWord]) -> usize {
    let target: Vec<u8> = target.iter().filter_map(|w| w.digit).collect();
    let response: Vec<u8> = response.iter().filter_map(|w| w.digit).collect();
    n_missing_items(&target, &response)
}

/// Per target word: was it said, and was its digit said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordsSaid {
    pub word_said: Vec<bool>,
    /// `None` for words without a digit (the bare "thousand")
    pub digit_said: Vec<Option<bool>>,
}

impl WordsSaid {
    pub fn n_missing_words(&self) -> usize {
        self.word_said.iter().filter(|&&said| !said).count()
    }

    pub fn n_missing_digits(&self) -> usize {
        self.digit_said.iter().filter(|&&said| said == Some(false)).count()
    }
}

/// Marks each target word as said or not.
///
/// First every response word consumes an identical target word. Then the
/// digits of the leftover response words are matched against the digits of
/// the leftover target words: a digit said in the wrong class still counts
/// as a said digit.
pub fn target_items_said(target: &[NumberWord], response: &[NumberWord]) -> WordsSaid {
    let mut target_left: Vec<bool> = vec![true; target.len()];
    let mut response_left: Vec<&NumberWord> = Vec::new();

    for r in response {
        let hit = target
            .iter()
            .zip(target_left.iter_mut())
            .find(|(t, left)| **left && *t == r);
        match hit {
            Some((_, left)) => *left = false,
            None => response_left.push(r),
        }
    }

    let word_said: Vec<bool> = target_left.iter().map(|&left| !left).collect();
    let mut digit_said: Vec<Option<bool>> = target
        .iter()
        .zip(&word_said)
        .map(|(t, &said)| t.digit.map(|_| said))
        .collect();

    for digit in response_left.iter().filter_map(|r| r.digit) {
        let hit = target
            .iter()
            .enumerate()
            .find(|(i, t)| target_left[*i] && t.digit == Some(digit))
            .map(|(i, _)| i);
        if let Some(i) = hit {
            target_left[i] = false;
            digit_said[i] = Some(true);
        }
    }

    WordsSaid {
        word_said,
        digit_said,
    }
}

/// Whether a pair of adjacent target words was said, and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairCheck {
    /// Target words `i` and `i + 1` both appear in the response
    pub found: bool,
    /// Both appear, but never adjacent and in the target's order
    pub order_mismatch: bool,
}

/// Checks target words `index` and `index + 1` against the response.
/// Returns `None` when `index` is the last target word.
pub fn adjacent_pair(target: &[NumberWord], response: &[NumberWord], index: usize) -> Option<PairCheck> {
    let first = target.get(index)?;
    let second = target.get(index + 1)?;

    if !response.contains(first) || !response.contains(second) {
        return Some(PairCheck {
            found: false,
            order_mismatch: false,
        });
    }

    let in_order = response
        .windows(2)
        .any(|pair| pair[0] == *first && pair[1] == *second);

    Some(PairCheck {
        found: true,
        order_mismatch: !in_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use LexicalClass::*;

    fn w(class: LexicalClass, digit: u8) -> NumberWord {
        NumberWord::new(class, digit)
    }

    #[test]
    fn test_multiset_difference() {
        assert_eq!(n_missing_items(&[1, 2, 2, 3], &[2, 3, 3]), 2);
        assert_eq!(n_missing_items::<u8>(&[1, 2], &[]), 2);
        assert_eq!(n_missing_items(&[1, 2], &[2, 1]), 0);
    }

    #[test]
    fn test_exact_words() {
        let said = target_items_said(&[w(Tens, 2), w(Ones, 3)], &[w(Ones, 3)]);
        assert_eq!(said.word_said, vec![false, true]);
        assert_eq!(said.digit_said, vec![Some(false), Some(true)]);
    }

    #[test]
    fn test_digit_said_in_wrong_class() {
        let target = [w(Tens, 2), w(Ones, 3)];
        let response = [w(Ones, 2), w(Tens, 3)];
        let said = target_items_said(&target, &response);
        assert_eq!(said.word_said, vec![false, false]);
        assert_eq!(said.digit_said, vec![Some(true), Some(true)]);
        assert_eq!(said.n_missing_words(), 2);
        assert_eq!(said.n_missing_digits(), 0);
        assert_eq!(n_missing_classes(&target, &response), 0);
    }

    #[test]
    fn test_words_without_digit() {
        let target = [w(Tens, 2), NumberWord::thousand(false)];
        let said = target_items_said(&target, &[w(Tens, 2)]);
        assert_eq!(said.digit_said, vec![Some(true), None]);
        assert_eq!(said.n_missing_words(), 1);
        assert_eq!(said.n_missing_digits(), 0);
    }

    #[test]
    fn test_repeated_digits_match_once_each() {
        let target = [w(Hundreds, 2), w(Tens, 2), w(Ones, 2)];
        let response = [w(Thousands, 2), w(Ones, 2)];
        let said = target_items_said(&target, &response);
        assert_eq!(said.word_said, vec![false, false, true]);
        assert_eq!(said.digit_said, vec![Some(true), Some(false), Some(true)]);
        assert_eq!(said.n_missing_digits(), n_missing_digits(&target, &response));
    }

    #[test]
    fn test_adjacent_pairs() {
        let target = [w(Hundreds, 5), w(Tens, 6), w(Ones, 3)];
        assert_eq!(
            adjacent_pair(&target, &[w(Hundreds, 5), w(Tens, 6)], 0),
            Some(PairCheck { found: true, order_mismatch: false })
        );
        assert_eq!(
            adjacent_pair(&target, &[w(Tens, 6), w(Hundreds, 5)], 0),
            Some(PairCheck { found: true, order_mismatch: true })
        );
        assert_eq!(
            adjacent_pair(&target, &[w(Tens, 6)], 0),
            Some(PairCheck { found: false, order_mismatch: false })
        );
        assert_eq!(adjacent_pair(&target, &target, 2), None);
    }
}
