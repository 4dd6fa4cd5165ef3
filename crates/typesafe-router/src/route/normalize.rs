/// Route normalization: slash stripping and identifier synthesis
///
/// All functions are **pure**: given same input, always produce same output
/// with no side effects.

use std::borrow::Cow;

use tracing::trace;

use super::{NormalizedRoute, RouteInput};
use crate::error::{Result, RouteError};

/// Id segment used for index routes
pub const INDEX_SEGMENT: &str = "_index";

/// Id segment used for pathless layout routes
pub const LAYOUT_SEGMENT: &str = "_";

/// Removes all leading and trailing `/` characters
///
/// Internal slashes are kept verbatim. Returns `Cow::Borrowed` when there is
/// nothing to strip.
///
/// # Examples
///
/// ```
/// use typesafe_router::route::normalize_path;
/// use std::borrow::Cow;
///
/// assert_eq!(normalize_path("///path"), "path");
/// assert_eq!(normalize_path("path///"), "path");
/// assert_eq!(normalize_path("/"), "");
/// assert!(matches!(normalize_path("a/b"), Cow::Borrowed("a/b")));
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let trimmed = path.trim_matches('/');

    if trimmed.len() == path.len() {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(trimmed.to_string())
    }
}

/// Id segment for a route: its path, `_index`, or `_` for layouts
pub fn set_id_segment<'a>(path: Option<&'a str>, index: bool) -> &'a str {
    match path {
        Some(path) => path,
        None if index => INDEX_SEGMENT,
        None => LAYOUT_SEGMENT,
    }
}

/// Synthesizes the id of a route from its parent's id
///
/// An explicit non-empty id wins. Otherwise the id is
/// `{parent id}/{segment}`, where a parent id of `/` (the root) contributes
/// an empty prefix. The root route `/` itself normalizes to an empty segment
/// and so reads as `/`.
///
/// # Examples
///
/// ```
/// use typesafe_router::route::set_id;
///
/// assert_eq!(set_id(None, Some(""), false, None), "/");
/// assert_eq!(set_id(None, Some(":id"), false, Some("/")), "/:id");
/// assert_eq!(set_id(None, None, true, Some("/2")), "/2/_index");
/// assert_eq!(set_id(Some("root"), Some(""), false, None), "root");
/// ```
pub fn set_id(
    explicit: Option<&str>,
    path: Option<&str>,
    index: bool,
    parent_id: Option<&str>,
) -> String {
    if let Some(id) = explicit.filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    let prefix = match parent_id {
        Some("/") | None => "",
        Some(parent) => parent,
    };

    format!("{}/{}", prefix, set_id_segment(path, index))
}

/// Normalizes a route tree, preserving order and nesting
///
/// Ids are computed top-down from the already computed parent id. Index
/// routes may not carry a path or children.
pub fn normalize_routes(routes: &[RouteInput]) -> Result<Vec<NormalizedRoute>> {
    normalize_children(routes, None)
}

fn normalize_children(
    routes: &[RouteInput],
    parent_id: Option<&str>,
) -> Result<Vec<NormalizedRoute>> {
    routes
        .iter()
        .map(|input| normalize_route(input, parent_id))
        .collect()
}

fn normalize_route(input: &RouteInput, parent_id: Option<&str>) -> Result<NormalizedRoute> {
    let path = input
        .path
        .as_deref()
        .map(|path| normalize_path(path).into_owned());
    let id = set_id(input.id.as_deref(), path.as_deref(), input.index, parent_id);

    if input.index {
        if path.is_some() {
            return Err(RouteError::InvalidIndexRoute { id, field: "a path" });
        }
        if !input.children.is_empty() {
            return Err(RouteError::InvalidIndexRoute { id, field: "children" });
        }
    }

    trace!(id = %id, path = ?path, "normalized route");

    let children = normalize_children(&input.children, Some(&id))?;

    Ok(NormalizedRoute {
        id,
        path,
        index: input.index,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_strips_slashes() {
        assert_eq!(normalize_path("///path"), "path");
        assert_eq!(normalize_path("path///"), "path");
        assert_eq!(normalize_path("/segment1/segment2/"), "segment1/segment2");
    }

    #[test]
    fn test_normalize_path_is_idempotent() {
        let once = normalize_path("//a/:b/c?//").into_owned();
        assert_eq!(normalize_path(&once), once.as_str());
        assert!(matches!(normalize_path(&once), Cow::Borrowed(_)));
    }

    #[test]
    fn test_set_id_segment() {
        assert_eq!(set_id_segment(Some("path"), false), "path");
        assert_eq!(set_id_segment(None, true), "_index");
        assert_eq!(set_id_segment(None, false), "_");
    }

    #[test]
    fn test_empty_explicit_id_falls_back_to_synthesis() {
        assert_eq!(set_id(Some(""), Some("a"), false, Some("/x")), "/x/a");
    }

    #[test]
    fn test_normalize_routes_ids() {
        let routes = vec![RouteInput::path("/").with_children([
            RouteInput::index(),
            RouteInput::path(":id"),
            RouteInput::layout().with_children([RouteInput::path("inner/")]),
        ])];

        let normalized = normalize_routes(&routes).unwrap();
        let root = &normalized[0];
        assert_eq!(root.id, "/");
        assert_eq!(root.path.as_deref(), Some(""));

        let ids: Vec<&str> = root.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["/_index", "/:id", "/_"]);
        assert_eq!(root.children[2].children[0].id, "/_/inner");
        assert_eq!(root.children[2].children[0].path.as_deref(), Some("inner"));
    }

    #[test]
    fn test_explicit_id_scopes_children() {
        let routes = vec![RouteInput::path("app")
            .with_id("shell")
            .with_children([RouteInput::path("home")])];

        let normalized = normalize_routes(&routes).unwrap();
        assert_eq!(normalized[0].id, "shell");
        assert_eq!(normalized[0].children[0].id, "shell/home");
    }

    #[test]
    fn test_index_route_with_path_is_rejected() {
        let mut route = RouteInput::index();
        route.path = Some("oops".to_string());

        let err = normalize_routes(&[route]).unwrap_err();
        assert!(matches!(err, RouteError::InvalidIndexRoute { .. }));
    }
}
