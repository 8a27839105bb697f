use serde::Serialize;

/// Per-trial error counts.
///
/// Words and classes are out of `n_target_words`, digits out of
/// `n_target_digits`. The three views come from the same word lists and do
/// not add up to anything by themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorCounts {
    pub n_missing_words: usize,
    pub n_missing_digits: usize,
    pub n_missing_classes: usize,
    pub n_target_words: usize,
    pub n_target_digits: usize,
}

impl ErrorCounts {
    pub fn p_missing_words(&self) -> f64 {
        ratio(self.n_missing_words, self.n_target_words)
    }

    /// `None` when the target has no digit-bearing words (e.g. "1000")
    pub fn p_missing_digits(&self) -> Option<f64> {
        (self.n_target_digits > 0).then(|| ratio(self.n_missing_digits, self.n_target_digits))
    }

    pub fn p_missing_classes(&self) -> f64 {
        ratio(self.n_missing_classes, self.n_target_words)
    }

    /// (class errors + digit errors) / (target words + target digits)
    pub fn p_missing_morphemes(&self) -> f64 {
        ratio(
            self.n_missing_classes + self.n_missing_digits,
            self.n_target_words + self.n_target_digits,
        )
    }

    /// The (words, classes, digits) triple used throughout the tests.
    pub fn missing(&self) -> (usize, usize, usize) {
        (self.n_missing_words, self.n_missing_classes, self.n_missing_digits)
    }
}

fn ratio(n: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        n as f64 / total as f64
    }
}
