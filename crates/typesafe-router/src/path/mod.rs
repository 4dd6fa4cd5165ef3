/// Path algebra: navigation targets reachable from a route
///
/// All functions are **pure**: given the same flat route collection they
/// always produce the same path sets. Sets are unordered in meaning; a
/// `BTreeSet` is used only so output is deterministic.

use std::collections::BTreeSet;

pub mod hierarchy;
pub use hierarchy::AncestorHops;

use crate::error::Result;
use crate::route::FlatRoutes;

/// A set of navigation strings
pub type PathSet = BTreeSet<String>;

/// Joins an accumulated path with a route path
///
/// Empty sides contribute nothing, so no leading, doubled or trailing slash
/// is ever produced.
fn join(prefix: &str, path: &str) -> String {
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{}/{}", prefix, path),
    }
}

/// Paths of every descendant, relative to the given parent paths
///
/// A child with a path extends each accumulated parent path with each of its
/// concrete paths; a pathless child passes the accumulated paths through
/// unchanged while still recursing. Empty results are omitted.
///
/// # Examples
///
/// ```
/// use typesafe_router::{RouteInput, RouteTable};
/// use typesafe_router::path::descendant_paths;
///
/// let table = RouteTable::new(&[RouteInput::path("/").with_children([
///     RouteInput::path("a").with_children([RouteInput::path("b")]),
/// ])])
/// .unwrap();
///
/// let paths = descendant_paths(table.flat(), "/", &[String::new()]).unwrap();
/// assert_eq!(paths.into_iter().collect::<Vec<_>>(), vec!["a", "a/b"]);
/// ```
pub fn descendant_paths(routes: &FlatRoutes, id: &str, parent_paths: &[String]) -> Result<PathSet> {
    let mut paths = PathSet::new();

    for child in routes.children(id)? {
        let cumulative: Vec<String> = if child.path.is_some() {
            parent_paths
                .iter()
                .flat_map(|parent| child.paths.iter().map(move |own| join(parent, own)))
                .collect()
        } else {
            parent_paths.to_vec()
        };

        paths.extend(cumulative.iter().filter(|path| !path.is_empty()).cloned());
        paths.extend(descendant_paths(routes, &child.id, &cumulative)?);
    }

    Ok(paths)
}

/// Relative paths reaching ancestors and their other descendants
///
/// Each path-bearing ancestor contributes its `..` prefix and its own
/// descendant paths under that prefix; pathless ancestors are skipped
/// without consuming a hop.
pub fn ancestor_paths(routes: &FlatRoutes, id: &str) -> Result<PathSet> {
    routes.require(id)?;

    let mut paths = PathSet::new();
    for (prefix, ancestor) in AncestorHops::new(routes, id) {
        paths.extend(descendant_paths(routes, &ancestor.id, std::slice::from_ref(&prefix))?);
        paths.insert(prefix);
    }

    Ok(paths)
}

/// Absolute paths of the whole table
///
/// A root with a path yields `/` + each of its concrete paths and each of its
/// descendant paths. A pathless root contributes nothing itself; its children
/// are treated as roots instead.
pub fn absolute_paths(routes: &FlatRoutes) -> Result<PathSet> {
    let mut paths = PathSet::new();

    for root in routes.roots() {
        absolute_paths_from(routes, &root.id, &mut paths)?;
    }

    Ok(paths)
}

fn absolute_paths_from(routes: &FlatRoutes, id: &str, paths: &mut PathSet) -> Result<()> {
    let route = routes.require(id)?;

    if route.path.is_none() {
        for child_id in &route.child_ids {
            absolute_paths_from(routes, child_id, paths)?;
        }
        return Ok(());
    }

    for own in &route.paths {
        paths.insert(format!("/{}", own));
    }
    for descendant in descendant_paths(routes, id, &route.paths)? {
        paths.insert(format!("/{}", descendant));
    }

    Ok(())
}

/// Every navigation target allowed from a route
///
/// `absolute ∪ ancestor ∪ descendant`, where an index route is replaced by
/// its parent since it renders at the parent's URL.
pub fn paths(routes: &FlatRoutes, id: &str) -> Result<PathSet> {
    let route = routes.require(id)?;
    let anchor = match (route.index, route.parent_id.as_deref()) {
        (true, Some(parent_id)) => parent_id,
        _ => id,
    };

    let mut paths = absolute_paths(routes)?;
    paths.extend(ancestor_paths(routes, anchor)?);
    paths.extend(descendant_paths(routes, anchor, &[String::new()])?);
    Ok(paths)
}
