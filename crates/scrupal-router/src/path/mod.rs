/// Path utilities for turning navigation targets into matchable segments
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
///
/// Unlike server-side routers, nothing here normalizes trailing or doubled
/// slashes. Each `/` delimits a segment, so `/a/` has two segments (`a` and
/// the empty one) and only a pattern that declares the trailing slash matches it.

use std::borrow::Cow;

/// Extracts the path part of a navigation target
///
/// Drops any query string or fragment and guarantees a leading `/`.
/// Returns `Cow::Borrowed` when nothing needs to change.
///
/// # Examples
///
/// ```
/// use scrupal_router::path::location_path;
///
/// assert_eq!(location_path("/GET/modules?x=1"), "/GET/modules");
/// assert_eq!(location_path("/GET#top"), "/GET");
/// assert_eq!(location_path("GET"), "/GET");
/// assert_eq!(location_path(""), "/");
/// ```
pub fn location_path(target: &str) -> Cow<'_, str> {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    let path = &target[..end];

    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// Splits a path into its segments
///
/// # Examples
///
/// ```
/// use scrupal_router::path::split_segments;
///
/// assert_eq!(split_segments("/"), vec![""]);
/// assert_eq!(split_segments("/GET/modules"), vec!["GET", "modules"]);
/// assert_eq!(split_segments("/GET/modules/"), vec!["GET", "modules", ""]);
/// ```
pub fn split_segments(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

/// Percent-decodes one segment, keeping it verbatim when it is not valid UTF-8 after decoding
pub fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| segment.to_string())
}

/// Percent-encodes a parameter value for substitution into a path
pub fn encode_segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
