/// Route module for route-tree definitions
///
/// Contains the author-facing route input, its normalized form and the flat
/// identifier-addressable records derived from it:
/// - `pattern` - segment classification and optional-segment expansion
/// - `normalize` - slash stripping and id synthesis
/// - `flatten` - tree → flat collection with parent/child links

pub mod flatten;
pub mod normalize;
pub mod pattern;

use serde::{Deserialize, Serialize};

pub use flatten::{flatten_routes, FlatRoute, FlatRoutes};
pub use normalize::{normalize_path, normalize_routes, set_id, set_id_segment};
pub use pattern::{classify_segment, convert_optional_path_segments, parse_pattern, SegmentType};

/// Author-supplied route description
///
/// A route is either an *index route* (`index = true`, no path, no children)
/// or a *non-index route* (optional path, optional children). Routes without
/// a path that are not index routes are pathless layout routes.
///
/// # Examples
///
/// ```
/// use typesafe_router::RouteInput;
///
/// let routes = vec![RouteInput::path("/").with_children([
///     RouteInput::index(),
///     RouteInput::path(":id"),
///     RouteInput::layout().with_children([RouteInput::path("settings")]),
/// ])];
///
/// assert_eq!(routes[0].children.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInput {
    /// Explicit identifier, bypasses id synthesis for this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Path pattern like `users/:id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Whether this is an index route
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub index: bool,

    /// Nested routes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteInput>,
}

impl RouteInput {
    /// Creates a route with a path pattern
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Creates an index route
    pub fn index() -> Self {
        Self {
            index: true,
            ..Self::default()
        }
    }

    /// Creates a pathless layout route
    pub fn layout() -> Self {
        Self::default()
    }

    /// Sets an explicit identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Appends child routes
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = RouteInput>,
    {
        self.children.extend(children);
        self
    }
}

/// A route after path normalization and id synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRoute {
    /// Unique identifier, forms a prefix hierarchy mirroring the tree
    pub id: String,

    /// Pattern without leading or trailing slashes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Whether this is an index route
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub index: bool,

    /// Normalized children
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NormalizedRoute>,
}

impl NormalizedRoute {
    /// Whether this is a pathless layout route
    pub fn is_layout(&self) -> bool {
        self.path.is_none() && !self.index
    }
}
