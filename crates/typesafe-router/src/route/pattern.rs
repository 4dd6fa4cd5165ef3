/// Pattern parsing for route path segments
///
/// Pure functional parsing of `/`-delimited route patterns into typed segments.
/// All functions are **pure**: same input → same output, no side effects.

use crate::error::{Result, RouteError};

/// Represents the different kinds of path pattern segments
///
/// # Examples
///
/// ```
/// use typesafe_router::route::pattern::{classify_segment, SegmentType};
///
/// assert_eq!(classify_segment("about"), SegmentType::Static("about".to_string()));
/// assert_eq!(classify_segment(":id"), SegmentType::Dynamic("id".to_string()));
/// assert_eq!(classify_segment(":id?"), SegmentType::OptionalDynamic("id".to_string()));
/// assert_eq!(classify_segment("lang?"), SegmentType::OptionalStatic("lang".to_string()));
/// assert_eq!(classify_segment("*"), SegmentType::Splat);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentType {
    /// Catch-all segment: `*`
    Splat,
    /// Optional parameter: `:name?`
    OptionalDynamic(String),
    /// Required parameter: `:name`
    Dynamic(String),
    /// Optional literal: `name?`
    OptionalStatic(String),
    /// Static text segment
    Static(String),
}

impl SegmentType {
    /// Whether the segment may be left out of a concrete path
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::OptionalDynamic(_) | Self::OptionalStatic(_))
    }

    /// The segment as written in a concrete path (trailing `?` dropped)
    pub fn concrete(&self) -> String {
        match self {
            Self::Splat => "*".to_string(),
            Self::OptionalDynamic(name) | Self::Dynamic(name) => format!(":{}", name),
            Self::OptionalStatic(text) | Self::Static(text) => text.clone(),
        }
    }

    /// Parameter name this segment binds, if any
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Self::Splat => Some("*"),
            Self::OptionalDynamic(name) | Self::Dynamic(name) => Some(name),
            _ => None,
        }
    }
}

/// Classifies a single segment (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Splat**: `*`
/// 2. **Optional param**: `:name?`
/// 3. **Required param**: `:name`
/// 4. **Optional static**: `text?`
/// 5. **Static**: any other text
pub fn classify_segment(segment: &str) -> SegmentType {
    if segment == "*" {
        return SegmentType::Splat;
    }

    match segment.strip_prefix(':') {
        Some(param) => match param.strip_suffix('?') {
            Some(name) => SegmentType::OptionalDynamic(name.to_string()),
            None => SegmentType::Dynamic(param.to_string()),
        },
        None => match segment.strip_suffix('?') {
            Some(text) => SegmentType::OptionalStatic(text.to_string()),
            None => SegmentType::Static(segment.to_string()),
        },
    }
}

/// Parses a normalized pattern into its segments
///
/// The empty pattern (the root `/` after normalization) has no segments.
/// A splat is only accepted as the final segment and parameter names must be
/// non-empty.
///
/// # Examples
///
/// ```
/// use typesafe_router::route::pattern::{parse_pattern, SegmentType};
///
/// let segments = parse_pattern("users/:id/*").unwrap();
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[2], SegmentType::Splat);
///
/// assert!(parse_pattern("*/users").is_err());
/// ```
pub fn parse_pattern(pattern: &str) -> Result<Vec<SegmentType>> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    let raw: Vec<&str> = pattern.split('/').collect();
    let last = raw.len() - 1;

    raw.iter()
        .enumerate()
        .map(|(index, segment)| {
            let classified = classify_segment(segment);

            match &classified {
                SegmentType::Splat if index != last => Err(RouteError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: "`*` is only valid as the final segment".to_string(),
                }),
                SegmentType::Dynamic(name) | SegmentType::OptionalDynamic(name)
                    if name.is_empty() =>
                {
                    Err(RouteError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: "parameter segments need a name".to_string(),
                    })
                }
                _ => Ok(classified),
            }
        })
        .collect()
}

/// Expands optional segments into every concrete path they allow
///
/// Each segment ending in `?` is independently kept (without the `?`) or
/// dropped, so a pattern with `k` optional segments yields up to `2^k` strings.
/// Segments keep their relative order and are re-joined with `/`; dropping a
/// segment never leaves a leading, doubled or dangling slash behind. The
/// variant with every optional segment present comes first.
///
/// # Examples
///
/// ```
/// use typesafe_router::route::pattern::convert_optional_path_segments;
///
/// assert_eq!(
///     convert_optional_path_segments("one?/two/three"),
///     vec!["one/two/three", "two/three"]
/// );
/// assert_eq!(convert_optional_path_segments("one/two"), vec!["one/two"]);
/// ```
pub fn convert_optional_path_segments(pattern: &str) -> Vec<String> {
    if pattern.is_empty() {
        return vec![String::new()];
    }

    let segments: Vec<SegmentType> = pattern.split('/').map(classify_segment).collect();

    // Each variant is the list of kept segments; fold branches on optional ones.
    let variants = segments
        .iter()
        .fold(vec![Vec::<String>::new()], |variants, segment| {
            let concrete = segment.concrete();

            if segment.is_optional() {
                variants
                    .iter()
                    .map(|kept| {
                        let mut with = kept.clone();
                        with.push(concrete.clone());
                        with
                    })
                    .chain(variants.iter().cloned())
                    .collect()
            } else {
                variants
                    .into_iter()
                    .map(|mut kept| {
                        kept.push(concrete.clone());
                        kept
                    })
                    .collect()
            }
        });

    let mut expanded: Vec<String> = Vec::with_capacity(variants.len());
    for joined in variants.into_iter().map(|kept| kept.join("/")) {
        if !expanded.contains(&joined) {
            expanded.push(joined);
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_static() {
        assert_eq!(classify_segment("about"), SegmentType::Static("about".to_string()));
    }

    #[test]
    fn test_classify_dynamic() {
        assert_eq!(classify_segment(":id"), SegmentType::Dynamic("id".to_string()));
        assert_eq!(
            classify_segment(":1-2-1?"),
            SegmentType::OptionalDynamic("1-2-1".to_string())
        );
    }

    #[test]
    fn test_classify_optional_static() {
        let seg = classify_segment("3?");
        assert!(seg.is_optional());
        assert_eq!(seg.concrete(), "3");
    }

    #[test]
    fn test_parse_pattern_root() {
        assert!(parse_pattern("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_pattern_rejects_inner_splat() {
        let err = parse_pattern("docs/*/edit").unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern { .. }));
    }

    #[test]
    fn test_parse_pattern_rejects_nameless_param() {
        assert!(parse_pattern("users/:").is_err());
        assert!(parse_pattern("users/:?").is_err());
    }

    #[test]
    fn test_convert_trailing_optional() {
        assert_eq!(
            convert_optional_path_segments("one/two/three?"),
            vec!["one/two/three", "one/two"]
        );
    }

    #[test]
    fn test_convert_optional_dynamic() {
        assert_eq!(
            convert_optional_path_segments("1-2/:1-2-1?"),
            vec!["1-2/:1-2-1", "1-2"]
        );
    }

    #[test]
    fn test_convert_all_optional() {
        let mut expanded = convert_optional_path_segments("one?/two?/three?");
        expanded.sort();
        assert_eq!(
            expanded,
            vec!["", "one", "one/three", "one/two", "one/two/three", "three", "two", "two/three"]
        );
    }
}
