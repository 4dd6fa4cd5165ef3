/// The route table: one validated, queryable view of a route tree
///
/// Built once at startup. Construction normalizes, flattens and validates
/// every pattern, so any identifier collision or malformed pattern fails
/// here rather than at first navigation. Derived path sets are memoised per
/// route on first use.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, RouteError};
use crate::params::{self, ParamShape, ParamsUnion};
use crate::path::{self, PathSet};
use crate::route::{flatten_routes, normalize_routes, FlatRoute, FlatRoutes, NormalizedRoute, RouteInput};

/// How two routes relate in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// The same route
    Same,
    /// The other route is an ancestor (always mounted above)
    Ancestor,
    /// The other route is a descendant (may or may not be mounted)
    Descendant,
    /// Different branches, never mounted together
    Unrelated,
}

/// Validated route table
///
/// # Examples
///
/// ```
/// use typesafe_router::{RouteInput, RouteTable};
///
/// let table = RouteTable::new(&[RouteInput::path("/").with_children([
///     RouteInput::index(),
///     RouteInput::path(":id"),
/// ])])
/// .unwrap();
///
/// let ids: Vec<&str> = table.ids().collect();
/// assert_eq!(ids, vec!["/", "/_index", "/:id"]);
/// assert_eq!(table.params("/:id").unwrap().merged().to_string(), "{ id: string }");
/// ```
#[derive(Debug)]
pub struct RouteTable {
    tree: Vec<NormalizedRoute>,
    flat: FlatRoutes,
    absolute: OnceCell<PathSet>,
    paths: HashMap<String, OnceCell<PathSet>>,
}

impl RouteTable {
    /// Normalizes, flattens and validates a route tree
    pub fn new(routes: &[RouteInput]) -> Result<Self> {
        let tree = normalize_routes(routes)?;
        let flat = flatten_routes(&tree)?;

        let paths = flat
            .iter()
            .map(|route| (route.id.clone(), OnceCell::new()))
            .collect();

        debug!(routes = flat.len(), "route table ready");

        Ok(Self {
            tree,
            flat,
            absolute: OnceCell::new(),
            paths,
        })
    }

    /// The normalized tree, in author order
    pub fn tree(&self) -> &[NormalizedRoute] {
        &self.tree
    }

    /// The flat route collection
    pub fn flat(&self) -> &FlatRoutes {
        &self.flat
    }

    /// Looks a route up by id, failing for unknown ids
    pub fn route(&self, id: &str) -> Result<&FlatRoute> {
        self.flat.require(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.flat.contains(id)
    }

    /// Route ids in pre-order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.flat.iter().map(|route| route.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    // ========================================================================
    // Paths
    // ========================================================================

    /// Descendant paths relative to the route itself
    pub fn descendant_paths(&self, id: &str) -> Result<PathSet> {
        path::descendant_paths(&self.flat, id, &[String::new()])
    }

    pub fn ancestor_paths(&self, id: &str) -> Result<PathSet> {
        path::ancestor_paths(&self.flat, id)
    }

    /// Absolute paths of the whole table (memoised)
    pub fn absolute_paths(&self) -> Result<&PathSet> {
        self.absolute
            .get_or_try_init(|| path::absolute_paths(&self.flat))
    }

    /// Every navigation target allowed from a route (memoised)
    pub fn paths(&self, id: &str) -> Result<&PathSet> {
        let cell = self
            .paths
            .get(id)
            .ok_or_else(|| RouteError::UnknownRoute(id.to_string()))?;

        cell.get_or_try_init(|| path::paths(&self.flat, id))
    }

    /// Whether `to` is a navigation target reachable from route `id`
    pub fn is_reachable(&self, id: &str, to: &str) -> Result<bool> {
        Ok(self.paths(id)?.contains(to))
    }

    // ========================================================================
    // Params
    // ========================================================================

    /// Params of the route's own pattern only
    pub fn own_params(&self, id: &str) -> Result<&ParamShape> {
        Ok(&self.route(id)?.params)
    }

    pub fn ancestor_params(&self, id: &str) -> Result<ParamShape> {
        params::ancestor_params(&self.flat, id)
    }

    /// Alternative shapes contributed by the subtree, starting from nothing
    pub fn descendant_params(&self, id: &str) -> Result<ParamsUnion> {
        params::descendant_params(&self.flat, id, &ParamShape::new())
    }

    /// Every shape a route can observe
    pub fn params(&self, id: &str) -> Result<ParamsUnion> {
        params::params(&self.flat, id)
    }

    // ========================================================================
    // Relations
    // ========================================================================

    /// How `other` relates to `id`
    pub fn relation(&self, id: &str, other: &str) -> Result<Relation> {
        self.route(other)?;

        if id == other {
            self.route(id)?;
            return Ok(Relation::Same);
        }

        if self.flat.ancestors(id)?.iter().any(|route| route.id == other) {
            return Ok(Relation::Ancestor);
        }

        if self.flat.ancestors(other)?.iter().any(|route| route.id == id) {
            return Ok(Relation::Descendant);
        }

        Ok(Relation::Unrelated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new(&[RouteInput::path("/").with_children([
            RouteInput::path("a").with_children([RouteInput::path("b")]),
            RouteInput::path("c"),
        ])])
        .unwrap()
    }

    #[test]
    fn test_relation() {
        let table = table();
        assert_eq!(table.relation("/a/b", "/a/b").unwrap(), Relation::Same);
        assert_eq!(table.relation("/a/b", "/").unwrap(), Relation::Ancestor);
        assert_eq!(table.relation("/a", "/a/b").unwrap(), Relation::Descendant);
        assert_eq!(table.relation("/a/b", "/c").unwrap(), Relation::Unrelated);
        assert!(matches!(
            table.relation("/a", "/nope"),
            Err(RouteError::UnknownRoute(_))
        ));
    }

    #[test]
    fn test_paths_are_memoised() {
        let table = table();
        let first = table.paths("/a").unwrap() as *const PathSet;
        let second = table.paths("/a").unwrap() as *const PathSet;
        assert_eq!(first, second);
    }

    #[test]
    fn test_paths_unknown_route() {
        let table = table();
        assert!(matches!(table.paths("/x"), Err(RouteError::UnknownRoute(id)) if id == "/x"));
    }

    #[test]
    fn test_is_reachable() {
        let table = table();
        assert!(table.is_reachable("/a/b", "../..").unwrap());
        assert!(table.is_reachable("/a/b", "/c").unwrap());
        assert!(!table.is_reachable("/a/b", "../../../..").unwrap());
    }
}
