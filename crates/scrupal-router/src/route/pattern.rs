/// Pattern parsing for route segments
///
/// Pure parsing of `/`-delimited route patterns into typed segments.
/// All functions are **pure**: same input → same output, no side effects.

/// A single segment of a route pattern
///
/// # Examples
///
/// ```
/// use scrupal_router::route::pattern::{classify_segment, PatternSegment};
///
/// assert_eq!(classify_segment("modules"), PatternSegment::Static("modules".to_string()));
/// assert_eq!(classify_segment(":id"), PatternSegment::Param("id".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Named parameter: `:name`, binds exactly one non-empty URL segment
    Param(String),
    /// Literal text; the empty literal stands for a trailing slash or the root
    Static(String),
}

impl PatternSegment {
    /// Parameter name, if this is a named segment
    pub fn param_name(&self) -> Option<&str> {
        match self {
            PatternSegment::Param(name) => Some(name),
            PatternSegment::Static(_) => None,
        }
    }

    /// Tests one URL segment against this pattern segment
    ///
    /// Parameters accept any non-empty value; literals compare exactly, or
    /// ignoring ASCII case when `case_insensitive` is set.
    pub fn accepts(&self, segment: &str, case_insensitive: bool) -> bool {
        match self {
            PatternSegment::Param(_) => !segment.is_empty(),
            PatternSegment::Static(text) if case_insensitive => text.eq_ignore_ascii_case(segment),
            PatternSegment::Static(text) => text == segment,
        }
    }
}

/// Classifies one pattern segment (pure function)
///
/// A leading `:` makes a named parameter, anything else is literal text.
pub fn classify_segment(segment: &str) -> PatternSegment {
    match segment.strip_prefix(':') {
        Some(name) => PatternSegment::Param(name.to_string()),
        None => PatternSegment::Static(segment.to_string()),
    }
}

/// Splits a pattern into typed segments
///
/// Only the leading `/` is dropped, so `/` yields one empty literal and a
/// trailing slash yields a trailing empty literal. This keeps `/a/:b` and
/// `/a/:b/` distinct, each with its own arity.
///
/// # Examples
///
/// ```
/// use scrupal_router::route::pattern::{parse_pattern, PatternSegment};
///
/// let segs = parse_pattern("/:method/:kind/");
/// assert_eq!(segs.len(), 3);
/// assert_eq!(segs[2], PatternSegment::Static(String::new()));
/// ```
pub fn parse_pattern(pattern: &str) -> Vec<PatternSegment> {
    pattern
        .strip_prefix('/')
        .unwrap_or(pattern)
        .split('/')
        .map(classify_segment)
        .collect()
}
