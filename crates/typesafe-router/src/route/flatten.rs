/// Route flattening: nested tree → id-addressable records
///
/// Each normalized route becomes one `FlatRoute` carrying its parent id,
/// immediate child ids and the parameter shape of its own pattern. Lookup by
/// id is a single hash probe.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::pattern::convert_optional_path_segments;
use super::NormalizedRoute;
use crate::error::{Result, RouteError};
use crate::params::{set_params, ParamShape};

/// A normalized route lifted out of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRoute {
    /// Unique identifier
    pub id: String,

    /// Normalized pattern, `None` for index and layout routes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Concrete paths the pattern expands to (optional segments resolved)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,

    /// Whether this is an index route
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub index: bool,

    /// Parent id, absent for roots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Immediate children, empty for leaves
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_ids: Vec<String>,

    /// Params of this route's own pattern (not accumulated)
    pub params: ParamShape,
}

impl FlatRoute {
    /// Whether this is a pathless layout route
    pub fn is_layout(&self) -> bool {
        self.path.is_none() && !self.index
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.child_ids.is_empty()
    }
}

/// The flat route collection
///
/// Keeps pre-order insertion order for deterministic iteration next to an
/// id → position index.
#[derive(Debug, Clone, Default)]
pub struct FlatRoutes {
    routes: Vec<FlatRoute>,
    by_id: HashMap<String, usize>,
}

impl FlatRoutes {
    /// Looks a route up by id
    pub fn get(&self, id: &str) -> Option<&FlatRoute> {
        self.by_id.get(id).map(|&position| &self.routes[position])
    }

    /// Looks a route up by id, failing for unknown ids
    pub fn require(&self, id: &str) -> Result<&FlatRoute> {
        self.get(id)
            .ok_or_else(|| RouteError::UnknownRoute(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Routes in pre-order
    pub fn iter(&self) -> impl Iterator<Item = &FlatRoute> {
        self.routes.iter()
    }

    /// Routes without a parent
    pub fn roots(&self) -> impl Iterator<Item = &FlatRoute> {
        self.routes.iter().filter(|route| route.is_root())
    }

    /// Immediate children of a route
    pub fn children(&self, id: &str) -> Result<Vec<&FlatRoute>> {
        self.require(id)?
            .child_ids
            .iter()
            .map(|child_id| self.require(child_id))
            .collect()
    }

    /// Ancestors of a route, nearest first
    pub fn ancestors(&self, id: &str) -> Result<Vec<&FlatRoute>> {
        let mut ancestors = Vec::new();
        let mut current = self.require(id)?;

        while let Some(parent_id) = current.parent_id.as_deref() {
            current = self.require(parent_id)?;
            ancestors.push(current);
        }

        Ok(ancestors)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn push(&mut self, route: FlatRoute) -> Result<()> {
        if self.by_id.contains_key(&route.id) {
            return Err(RouteError::DuplicateRouteId(route.id));
        }

        self.by_id.insert(route.id.clone(), self.routes.len());
        self.routes.push(route);
        Ok(())
    }
}

/// Flattens a normalized tree in pre-order
///
/// Fails on identifier collisions (duplicate explicit ids, or two pathless
/// siblings without explicit ids) and on invalid patterns.
///
/// # Examples
///
/// ```
/// use typesafe_router::route::{flatten_routes, normalize_routes};
/// use typesafe_router::RouteInput;
///
/// let tree = normalize_routes(&[RouteInput::path("/").with_children([
///     RouteInput::index(),
///     RouteInput::path(":id"),
/// ])])
/// .unwrap();
///
/// let flat = flatten_routes(&tree).unwrap();
/// assert_eq!(flat.len(), 3);
/// assert_eq!(flat.get("/:id").unwrap().parent_id.as_deref(), Some("/"));
/// assert_eq!(flat.get("/").unwrap().child_ids, vec!["/_index", "/:id"]);
/// ```
pub fn flatten_routes(routes: &[NormalizedRoute]) -> Result<FlatRoutes> {
    let mut flat = FlatRoutes::default();
    flatten_into(&mut flat, routes, None)?;

    debug!(count = flat.len(), "flattened route tree");
    Ok(flat)
}

fn flatten_into(
    flat: &mut FlatRoutes,
    routes: &[NormalizedRoute],
    parent_id: Option<&str>,
) -> Result<()> {
    for route in routes {
        let (paths, params) = match route.path.as_deref() {
            Some(path) => (convert_optional_path_segments(path), set_params(path)?),
            None => (Vec::new(), ParamShape::new()),
        };

        flat.push(FlatRoute {
            id: route.id.clone(),
            path: route.path.clone(),
            paths,
            index: route.index,
            parent_id: parent_id.map(str::to_string),
            child_ids: route.children.iter().map(|child| child.id.clone()).collect(),
            params,
        })?;

        flatten_into(flat, &route.children, Some(&route.id))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{normalize_routes, RouteInput};

    #[test]
    fn test_links_are_consistent() {
        let tree = normalize_routes(&[RouteInput::path("/").with_children([
            RouteInput::path("a").with_children([RouteInput::path("b")]),
            RouteInput::path("c"),
        ])])
        .unwrap();
        let flat = flatten_routes(&tree).unwrap();

        for route in flat.iter() {
            for child in flat.children(&route.id).unwrap() {
                assert_eq!(child.parent_id.as_deref(), Some(route.id.as_str()));
            }
            if let Some(parent_id) = &route.parent_id {
                assert!(flat.get(parent_id).unwrap().child_ids.contains(&route.id));
            }
        }
    }

    #[test]
    fn test_two_pathless_siblings_collide() {
        let tree = normalize_routes(&[RouteInput::path("/").with_children([
            RouteInput::layout(),
            RouteInput::layout(),
        ])])
        .unwrap();

        let err = flatten_routes(&tree).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRouteId(id) if id == "/_"));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let tree = normalize_routes(&[RouteInput::path("/").with_children([
            RouteInput::path("a").with_children([RouteInput::path("b")]),
        ])])
        .unwrap();
        let flat = flatten_routes(&tree).unwrap();

        let ids: Vec<&str> = flat
            .ancestors("/a/b")
            .unwrap()
            .iter()
            .map(|route| route.id.as_str())
            .collect();
        assert_eq!(ids, vec!["/a", "/"]);
    }

    #[test]
    fn test_unknown_route() {
        let flat = FlatRoutes::default();
        assert!(matches!(flat.require("/nope"), Err(RouteError::UnknownRoute(_))));
    }
}
