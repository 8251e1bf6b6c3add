/// Route module for pattern-based view routing
///
/// Contains pure components for pattern parsing and parameter extraction.

pub mod pattern;

use std::collections::HashMap;

pub use pattern::{classify_segment, parse_pattern, PatternSegment};

/// Matches URL segments against pattern segments, collecting parameters
///
/// Arity must be equal: a pattern never matches a path with more or fewer
/// segments than it declares.
pub(crate) fn match_segments(
    pattern: &[PatternSegment],
    path: &[&str],
    case_insensitive: bool,
) -> Option<HashMap<String, String>> {
    if pattern.len() != path.len() {
        return None;
    }

    pattern
        .iter()
        .zip(path)
        .try_fold(HashMap::new(), |mut params, (seg, value)| {
            if !seg.accepts(value, case_insensitive) {
                return None;
            }
            if let Some(name) = seg.param_name() {
                params.insert(name.to_string(), crate::path::decode_segment(value));
            }
            Some(params)
        })
}
