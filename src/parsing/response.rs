//! Resolution of response shorthand against an already-parsed target.

use super::numeral_parser::{NumeralParser, ParsedSegment};
use crate::error::CodingError;
use crate::types::cell::Cell;
use crate::types::number_word::{NumberWord, ParsedItem, Segment};
use serde::Serialize;
use std::fmt;

/// Something about a "+" placeholder that makes its meaning uncertain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AmbiguityWarning {
    /// The response has a different number of segments than the target
    SegmentCount { target: usize, response: usize },
    /// The target segment at this index was also said elsewhere, so the
    /// segments may have been said in a different order
    SegmentOrder { index: usize },
    /// A placeholder in the `;` suffix has no position to refer to
    UnplacedPlaceholder,
}

impl fmt::Display for AmbiguityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmbiguityWarning::SegmentCount { target, response } => write!(
                f,
                "the target has {} segments and the response has {}",
                target, response
            ),
            AmbiguityWarning::SegmentOrder { index } => write!(
                f,
                "segment {} may have been said in a different order",
                index + 1
            ),
            AmbiguityWarning::UnplacedPlaceholder => {
                write!(f, "\"+\" after ';' does not refer to any target segment")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResponse {
    pub item: ParsedItem,
    pub warnings: Vec<AmbiguityWarning>,
}

impl ResolvedResponse {
    fn clean(item: ParsedItem) -> Self {
        Self {
            item,
            warnings: Vec::new(),
        }
    }
}

/// Parses a response and replaces its "+" placeholders with the target
/// segments at the same positions.
///
/// In strict mode any ambiguity rejects the response; otherwise it is
/// reported in [`ResolvedResponse::warnings`] and the substitution is done
/// anyway where a target segment exists.
pub fn resolve_response(
    parser: &NumeralParser,
    raw: &Cell,
    target: &ParsedItem,
    strict: bool,
) -> Result<ResolvedResponse, CodingError> {
    let text = raw.canonical_text().ok_or(CodingError::MissingResponse)?;
    let text = text.trim();

    match text {
        "" => return Err(CodingError::MissingResponse),
        "+" | "!" | "v" | "V" => {
            return Ok(ResolvedResponse::clean(ParsedItem::from_segments(target.segments.clone())));
        }
        "-" => return Ok(ResolvedResponse::clean(ParsedItem::default())),
        _ => {}
    }

    let response_error = |source| CodingError::Response {
        text: text.to_string(),
        source,
    };

    let mut warnings = Vec::new();

    // "...;extra" - words said at an unknown position
    let (main, unplaced) = match text.rsplit_once(';') {
        Some((main, extra)) if extra.trim().is_empty() => (main, Vec::new()),
        Some((main, extra)) => {
            let mut unplaced: Vec<NumberWord> = Vec::new();
            for segment in parser.parse_segments(extra).map_err(response_error)? {
                match segment {
                    ParsedSegment::Words(words) => unplaced.extend(words.0),
                    ParsedSegment::Placeholder => warnings.push(AmbiguityWarning::UnplacedPlaceholder),
                }
            }
            (main, unplaced)
        }
        _ => (text, Vec::new()),
    };

    let mut segments = parser.parse_segments(main).map_err(response_error)?;

    let has_placeholder = segments.contains(&ParsedSegment::Placeholder);
    if has_placeholder && segments.len() != target.segments.len() {
        let warning = AmbiguityWarning::SegmentCount {
            target: target.segments.len(),
            response: segments.len(),
        };
        if strict {
            return Err(CodingError::AmbiguousPlaceholder(warning.to_string()));
        }
        warnings.push(warning);
    }

    // With duplicate target segments, finding a segment elsewhere in the
    // response says nothing about order.
    let check_order = !target.has_duplicate_segments();

    for index in 0..segments.len() {
        if segments[index] != ParsedSegment::Placeholder {
            continue;
        }

        let Some(target_segment) = target.segments.get(index) else {
            // No target segment at this position; the placeholder is dropped
            let warning = AmbiguityWarning::SegmentOrder { index };
            if strict {
                return Err(CodingError::AmbiguousPlaceholder(warning.to_string()));
            }
            warnings.push(warning);
            continue;
        };

        let resolved = ParsedSegment::Words(target_segment.clone());
        if check_order && segments.contains(&resolved) {
            let warning = AmbiguityWarning::SegmentOrder { index };
            if strict {
                return Err(CodingError::AmbiguousPlaceholder(warning.to_string()));
            }
            warnings.push(warning);
        }
        segments[index] = resolved;
    }

    let segments: Vec<Segment> = segments
        .into_iter()
        .filter_map(|segment| match segment {
            ParsedSegment::Words(words) => Some(words),
            ParsedSegment::Placeholder => None,
        })
        .collect();

    Ok(ResolvedResponse {
        item: ParsedItem { segments, unplaced },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn target(text: &str) -> ParsedItem {
        NumeralParser::default().parse_target(&Cell::from_field(text)).unwrap()
    }

    fn resolve(target_text: &str, response: &str, strict: bool) -> Result<ResolvedResponse, CodingError> {
        resolve_response(
            &NumeralParser::default(),
            &Cell::from_field(response),
            &target(target_text),
            strict,
        )
    }

    #[test]
    fn test_whole_response_shorthands() {
        for plus in ["+", "!", "v", "V"] {
            let resolved = resolve("23/560", plus, false).unwrap();
            assert_eq!(resolved.item, target("23/560"));
            assert!(resolved.warnings.is_empty());
        }
        assert_eq!(resolve("23/560", "-", false).unwrap().item, ParsedItem::default());
    }

    #[test]
    fn test_missing_response() {
        assert_eq!(
            resolve_response(&NumeralParser::default(), &Cell::Empty, &target("2"), false),
            Err(CodingError::MissingResponse)
        );
    }

    #[test]
    fn test_placeholders_take_target_segment_at_same_position() {
        let resolved = resolve("2/3", "+ / 4", false).unwrap();
        assert_eq!(resolved.item, target("2/4"));
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_unplaced_suffix() {
        let resolved = resolve("23/560", "23;560", false).unwrap();
        assert_eq!(resolved.item.segments, target("23").segments);
        assert_eq!(resolved.item.unplaced, target("560").collapse_segments());
    }

    #[test]
    fn test_blank_unplaced_suffix_is_ignored() {
        for response in ["23;", "23; ", "+;"] {
            let resolved = resolve("23", response, false).unwrap();
            assert_eq!(resolved.item, target("23"), "{response}");
            assert!(resolved.warnings.is_empty());
        }
    }

    #[test]
    fn test_segment_count_mismatch() {
        let resolved = resolve("2/3", "+", false).unwrap();
        assert!(resolved.warnings.is_empty(), "a lone + is the whole target");

        let resolved = resolve("2/3/4", "+/3", false).unwrap();
        assert_eq!(
            resolved.warnings,
            vec![AmbiguityWarning::SegmentCount { target: 3, response: 2 }]
        );
        assert_eq!(resolved.item, target("2/3"));

        assert!(matches!(
            resolve("2/3/4", "+/3", true),
            Err(CodingError::AmbiguousPlaceholder(_))
        ));
    }

    #[test]
    fn test_order_mismatch() {
        // "2/+" for target "3/2": the 2 was said first, so "+" is suspicious
        let resolved = resolve("3/2", "2/+", false).unwrap();
        assert_eq!(resolved.warnings, vec![AmbiguityWarning::SegmentOrder { index: 1 }]);
        assert_eq!(resolved.item, target("2/2"));

        assert!(resolve("3/2", "2/+", true).is_err());
    }

    #[test]
    fn test_duplicate_target_segments_disable_order_check() {
        let resolved = resolve("23/23", "23/+", true).unwrap();
        assert!(resolved.warnings.is_empty());
        assert_eq!(resolved.item, target("23/23"));
    }

    #[test]
    fn test_invalid_response() {
        assert!(matches!(
            resolve("2", "2z", false),
            Err(CodingError::Response { .. })
        ));
    }
}
