/// Path building for navigation helpers
///
/// The one piece of runtime string building in the crate: substitutes
/// `:name` segments, then appends a query string and a hash.

use std::collections::BTreeMap;

use crate::error::{Result, RouteError};

/// Structured inputs for building a navigation target
///
/// # Examples
///
/// ```
/// use typesafe_router::utils::{create_path, PathOptions};
///
/// let options = PathOptions::new()
///     .with_param("id", "42")
///     .with_search_param("tab", "info")
///     .with_hash("top");
///
/// assert_eq!(create_path("users/:id", &options).unwrap(), "users/42?tab=info#top");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathOptions {
    pub params: BTreeMap<String, String>,
    pub search_params: Vec<(String, String)>,
    pub hash: Option<String>,
}

impl PathOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Replaces all params, e.g. with a generated params struct's `into_map()`
    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_search_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.search_params.push((name.into(), value.into()));
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

/// Builds `{substituted pattern}{?query}{#hash}`
///
/// Pattern rules:
/// - a leading `/` is kept
/// - `:name` is replaced by its value, missing values are an error
/// - `:name?` is replaced by its value, or dropped when absent
/// - a final `*` is replaced by the `*` value, or dropped when absent
/// - a trailing `?` on a literal segment is stripped
/// - empty segments are removed
///
/// Search params are form-urlencoded and joined with `&`. Empty search
/// params and an empty hash add nothing.
///
/// # Examples
///
/// ```
/// use typesafe_router::utils::{create_path, PathOptions};
///
/// assert_eq!(create_path("", &PathOptions::new()).unwrap(), "");
/// assert_eq!(create_path("/docs/*", &PathOptions::new()).unwrap(), "/docs");
/// assert_eq!(
///     create_path("/docs/*", &PathOptions::new().with_param("*", "a/b")).unwrap(),
///     "/docs/a/b"
/// );
/// assert!(create_path(":id", &PathOptions::new()).is_err());
/// ```
pub fn create_path(to: &str, options: &PathOptions) -> Result<String> {
    let mut path = generate_path(to, &options.params)?;

    if !options.search_params.is_empty() {
        path.push('?');
        path.push_str(&encode_search_params(&options.search_params));
    }

    if let Some(hash) = options.hash.as_deref().filter(|hash| !hash.is_empty()) {
        path.push('#');
        path.push_str(hash);
    }

    Ok(path)
}

/// Substitutes params into a pattern
pub fn generate_path(pattern: &str, params: &BTreeMap<String, String>) -> Result<String> {
    let prefix = if pattern.starts_with('/') { "/" } else { "" };
    let raw: Vec<&str> = pattern.split('/').filter(|segment| !segment.is_empty()).collect();
    let last = raw.len().saturating_sub(1);

    let mut segments = Vec::with_capacity(raw.len());
    for (position, segment) in raw.iter().enumerate() {
        let resolved = if position == last && *segment == "*" {
            params.get("*").cloned().unwrap_or_default()
        } else if let Some(name) = segment.strip_prefix(':') {
            match name.strip_suffix('?') {
                Some(optional) => params.get(optional).cloned().unwrap_or_default(),
                None => params
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RouteError::MissingParam(name.to_string()))?,
            }
        } else {
            segment.strip_suffix('?').unwrap_or(segment).to_string()
        };

        if !resolved.is_empty() {
            segments.push(resolved);
        }
    }

    Ok(format!("{}{}", prefix, segments.join("/")))
}

/// `application/x-www-form-urlencoded` serialization of key/value pairs
pub fn encode_search_params(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| format!("{}={}", form_encode(name), form_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Form encoding: space as `+`, `*` kept, `~` escaped
fn form_encode(value: &str) -> String {
    urlencoding::encode(value)
        .replace("%20", "+")
        .replace("%2A", "*")
        .replace('~', "%7E")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_optional_literal_is_kept_without_marker() {
        assert_eq!(generate_path("3?/3-1", &BTreeMap::new()).unwrap(), "3/3-1");
    }

    #[test]
    fn test_optional_param_dropped() {
        assert_eq!(generate_path("/a/:b?/c", &BTreeMap::new()).unwrap(), "/a/c");
    }

    #[test]
    fn test_missing_param_message() {
        let err = generate_path(":id", &BTreeMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "missing \":id\" param");
    }

    #[test]
    fn test_relative_segments_kept() {
        let params = BTreeMap::from([("id".to_string(), "7".to_string())]);
        assert_eq!(generate_path("../../:id", &params).unwrap(), "../../7");
    }

    #[test]
    fn test_search_params_encoding() {
        let pairs = vec![("q".to_string(), "a b&c".to_string())];
        assert_eq!(encode_search_params(&pairs), "q=a+b%26c");
    }

    #[test]
    fn test_search_params_star_and_tilde() {
        let pairs = vec![("k*".to_string(), "a*b~".to_string())];
        assert_eq!(encode_search_params(&pairs), "k*=a*b%7E");
    }

    #[test]
    fn test_root_only() {
        assert_eq!(create_path("/", &PathOptions::new()).unwrap(), "/");
    }
}
