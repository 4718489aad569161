//! Dynamic parameter extraction for segment names
//!
//! Pure functional parsing of bracketed segment names into typed parameters.
//! All functions are **pure**: same input → same output, no side effects.

/// Interception markers that may prefix a segment name, matched in this order
pub const INTERCEPTION_ROUTE_MARKERS: [&str; 4] = ["(..)(..)", "(.)", "(..)", "(...)"];

/// Kind of dynamic parameter a segment declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicParamKind {
    /// `[name]`
    Dynamic,
    /// `[...name]`, matches one or more path parts
    CatchAll,
    /// `[[...name]]`, matches zero or more path parts
    OptionalCatchAll,
}

/// Parameter extracted from a dynamic segment name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentParam {
    pub param: String,
    pub kind: DynamicParamKind,
}

/// Signature of a parameter extractor, replaceable on the collector
pub type ParamExtractor = fn(&str) -> Option<SegmentParam>;

/// Extracts the dynamic parameter declared by a segment name (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. Leading interception marker (`(.)`, `(..)`, `(...)`, `(..)(..)`) is stripped
/// 2. **Optional catch-all**: `[[...name]]`
/// 3. **Catch-all**: `[...name]`
/// 4. **Dynamic**: `[name]`
/// 5. Anything else carries no parameter
///
/// # Examples
///
/// ```
/// use rhtmx_segments::param::{segment_param, DynamicParamKind};
///
/// let p = segment_param("[slug]").unwrap();
/// assert_eq!(p.param, "slug");
/// assert_eq!(p.kind, DynamicParamKind::Dynamic);
///
/// let p = segment_param("[[...path]]").unwrap();
/// assert_eq!(p.kind, DynamicParamKind::OptionalCatchAll);
///
/// assert!(segment_param("about").is_none());
/// ```
pub fn segment_param(segment: &str) -> Option<SegmentParam> {
    let segment = strip_interception_marker(segment);

    if let Some(inner) = segment
        .strip_prefix("[[...")
        .and_then(|s| s.strip_suffix("]]"))
    {
        return Some(SegmentParam {
            param: inner.to_string(),
            kind: DynamicParamKind::OptionalCatchAll,
        });
    }

    let inner = segment.strip_prefix('[').and_then(|s| s.strip_suffix(']'))?;

    match inner.strip_prefix("...") {
        Some(param) => Some(SegmentParam {
            param: param.to_string(),
            kind: DynamicParamKind::CatchAll,
        }),
        None => Some(SegmentParam {
            param: inner.to_string(),
            kind: DynamicParamKind::Dynamic,
        }),
    }
}

/// Removes a leading interception marker, if any
fn strip_interception_marker(segment: &str) -> &str {
    INTERCEPTION_ROUTE_MARKERS
        .iter()
        .find_map(|marker| segment.strip_prefix(marker))
        .unwrap_or(segment)
}
