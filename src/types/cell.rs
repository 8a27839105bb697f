use std::fmt;

/// A single value of an input table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Type a raw CSV field the way a spreadsheet would: integers and finite
    /// floats become numbers, everything else stays text.
    pub fn from_field(raw: &str) -> Self {
        let field = raw.trim();
        if field.is_empty() {
            return Cell::Empty;
        }
        if let Ok(n) = field.parse::<i64>() {
            return Cell::Int(n);
        }
        // "inf", "NaN" and friends are transcriptions, not numbers
        let looks_numeric = field
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '.');
        if looks_numeric {
            if let Ok(x) = field.parse::<f64>() {
                if x.is_finite() {
                    return Cell::Float(x);
                }
            }
        }
        Cell::Text(field.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Canonical decimal text: no scientific notation, no trailing decimals.
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Int(n) => Some(n.to_string()),
            Cell::Float(x) => Some(format!("{:.0}", x)),
            Cell::Text(s) => Some(s.clone()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Int(n) => Some(*n as f64),
            Cell::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Integer value, accepting floats with no fractional part ("3.0").
    pub fn as_count(&self) -> Option<i64> {
        match self {
            Cell::Int(n) => Some(*n),
            Cell::Float(x) if x.fract() == 0.0 => Some(*x as i64),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::from_field(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_typing() {
        assert_eq!(Cell::from_field("  "), Cell::Empty);
        assert_eq!(Cell::from_field("1002"), Cell::Int(1002));
        assert_eq!(Cell::from_field("1002.0"), Cell::Float(1002.0));
        assert_eq!(Cell::from_field("1000 / 2"), Cell::Text("1000 / 2".into()));
        assert_eq!(Cell::from_field("-"), Cell::Text("-".into()));
        assert_eq!(Cell::from_field("nan"), Cell::Text("nan".into()));
    }

    #[test]
    fn test_canonical_text_has_no_exponent_or_decimals() {
        assert_eq!(Cell::from_field("4.8725e4").canonical_text().as_deref(), Some("48725"));
        assert_eq!(Cell::Float(21002.0).canonical_text().as_deref(), Some("21002"));
        assert_eq!(Cell::Empty.canonical_text(), None);
    }

    #[test]
    fn test_as_count() {
        assert_eq!(Cell::Float(3.0).as_count(), Some(3));
        assert_eq!(Cell::Float(3.5).as_count(), None);
        assert_eq!(Cell::Text("x".into()).as_count(), None);
    }
}
