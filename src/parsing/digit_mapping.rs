use crate::error::ConfigError;
use std::collections::{BTreeMap, HashMap};

/// Characters with a meaning of their own in the transcription grammar.
const RESERVED: &[char] = &['t', '/', ',', '+', '-', '!', '?', ';', 'v', 'V'];

/// Symbol-to-digit lookup used when transcriptions code digits with letters
/// (e.g. F=2, T=3). The decimal digits always map to themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitMapping {
    symbols: HashMap<char, u8>,
}

impl Default for DigitMapping {
    fn default() -> Self {
        let symbols = ('0'..='9').zip(0u8..).collect();
        Self { symbols }
    }
}

impl DigitMapping {
    /// Adds extra symbols on top of 0-9. Keys come straight from the config
    /// file, so each is validated.
    pub fn with_extra(extra: &BTreeMap<String, i64>) -> Result<Self, ConfigError> {
        let mut mapping = Self::default();
        for (key, &digit) in extra {
            let invalid = |reason| ConfigError::InvalidDigitMapping {
                symbol: key.clone(),
                digit,
                reason,
            };

            let mut chars = key.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(invalid("symbols must be a single character")),
            };
            if symbol.is_whitespace() || RESERVED.contains(&symbol) {
                return Err(invalid("symbol is reserved by the transcription grammar"));
            }
            if symbol.is_ascii_digit() {
                return Err(invalid("decimal digits cannot be remapped"));
            }
            if !(0..=9).contains(&digit) {
                return Err(invalid("digit must be between 0 and 9"));
            }
            mapping.symbols.insert(symbol, digit as u8);
        }
        Ok(mapping)
    }

    pub fn digit(&self, symbol: char) -> Option<u8> {
        self.symbols.get(&symbol).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_decimal() {
        let m = DigitMapping::default();
        assert_eq!(m.digit('0'), Some(0));
        assert_eq!(m.digit('7'), Some(7));
        assert_eq!(m.digit('F'), None);
    }

    #[test]
    fn test_extra_symbols() {
        let extra = BTreeMap::from([("F".to_string(), 2), ("x".to_string(), 0)]);
        let m = DigitMapping::with_extra(&extra).unwrap();
        assert_eq!(m.digit('F'), Some(2));
        assert_eq!(m.digit('x'), Some(0));
        assert_eq!(m.digit('3'), Some(3));
    }

    #[test]
    fn test_rejects_bad_entries() {
        for (key, digit) in [("t", 1), ("FF", 2), ("Q", 12), ("/", 3), ("5", 3), ("0", 0)] {
            let extra = BTreeMap::from([(key.to_string(), digit)]);
            assert!(
                matches!(
                    DigitMapping::with_extra(&extra),
                    Err(ConfigError::InvalidDigitMapping { .. })
                ),
                "{key} = {digit} should be rejected"
            );
        }
    }
}
