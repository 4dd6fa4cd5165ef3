use crate::route::{FlatRoute, FlatRoutes};

/// Lazy iterator over the `..` hops available from a route
///
/// Walks up through `parent_id` links. Only ancestors that have a path (the
/// root's empty path included) contribute a hop; pathless layouts are passed
/// through without consuming one, since they add nothing to the URL depth.
///
/// For route `/a/_/b/c` under layout `_`, yields:
/// `("..", /a/_/b)` → `("../..", /a)` → ...
///
/// # Examples
///
/// ```
/// use typesafe_router::{RouteInput, RouteTable};
/// use typesafe_router::path::AncestorHops;
///
/// let table = RouteTable::new(&[RouteInput::path("/").with_children([
///     RouteInput::path("a").with_children([RouteInput::path("b")]),
/// ])])
/// .unwrap();
///
/// let hops: Vec<(String, String)> = AncestorHops::new(table.flat(), "/a/b")
///     .map(|(prefix, route)| (prefix, route.id.clone()))
///     .collect();
/// assert_eq!(
///     hops,
///     vec![("..".to_string(), "/a".to_string()), ("../..".to_string(), "/".to_string())]
/// );
/// ```
#[derive(Clone)]
pub struct AncestorHops<'a> {
    routes: &'a FlatRoutes,
    current: Option<&'a FlatRoute>,
    prefix: String,
}

impl<'a> AncestorHops<'a> {
    /// Starts walking from the route with the given id
    ///
    /// An unknown id yields nothing.
    pub fn new(routes: &'a FlatRoutes, id: &str) -> Self {
        Self {
            routes,
            current: routes.get(id),
            prefix: "..".to_string(),
        }
    }
}

impl<'a> Iterator for AncestorHops<'a> {
    type Item = (String, &'a FlatRoute);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let parent = self
                .current?
                .parent_id
                .as_deref()
                .and_then(|parent_id| self.routes.get(parent_id));
            self.current = parent;
            let parent = parent?;

            if parent.path.is_some() {
                let prefix = self.prefix.clone();
                self.prefix = format!("../{}", self.prefix);
                return Some((prefix, parent));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RouteInput, RouteTable};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clone_resumes_from_same_hop() {
        let table = RouteTable::new(&[RouteInput::path("/").with_children([
            RouteInput::layout().with_children([RouteInput::path("a").with_children([RouteInput::path("b")])]),
        ])])
        .unwrap();

        let mut hops = AncestorHops::new(table.flat(), "/_/a/b");
        let first = hops.next().map(|(prefix, route)| (prefix, route.id.clone()));
        assert_eq!(first, Some(("..".to_string(), "/_/a".to_string())));

        let rest: Vec<String> = hops.clone().map(|(prefix, _)| prefix).collect();
        let original: Vec<String> = hops.map(|(prefix, _)| prefix).collect();
        assert_eq!(rest, vec!["../.."]);
        assert_eq!(rest, original);
    }
}
