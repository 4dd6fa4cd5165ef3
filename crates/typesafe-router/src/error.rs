/// Error types for route configuration, registration and navigation
///
/// Every configuration-time problem surfaces here as a value returned from the
/// call that caused it, so a misconfigured route table fails at startup rather
/// than at first navigation.

use crate::binding::PropKind;

/// Errors produced while building or using a route table
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Two routes resolved to the same identifier
    #[error("duplicate route id '{0}'")]
    DuplicateRouteId(String),

    /// An index route declared a path or children
    #[error("index route '{id}' cannot have {field}")]
    InvalidIndexRoute { id: String, field: &'static str },

    /// A path pattern could not be parsed
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A route id that is not part of the table
    #[error("unknown route id '{0}'")]
    UnknownRoute(String),

    /// A second entry of the same kind for one route
    #[error("multiple {kind} entries found for route '{id}'")]
    DuplicateRegistration { kind: PropKind, id: String },

    /// An entry passed to the wrong registration call
    #[error("entry for route '{id}' is a {found}, not a valid {expected} or lazy {expected}")]
    MalformedRegistration {
        id: String,
        expected: PropKind,
        found: PropKind,
    },

    /// A lazy module resolved without the entry it was registered for
    #[error("lazy module for route '{id}' does not provide a valid {kind}")]
    MalformedLazyModule { id: String, kind: PropKind },

    /// A lazy thunk failed to resolve
    #[error("lazy resolution failed for route '{id}': {source}")]
    LazyResolution {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    /// A navigation target outside the paths reachable from a route
    #[error("'{to}' is not a valid path from route '{from}'")]
    InvalidNavigation { from: String, to: String },

    /// A required path parameter was not supplied
    #[error("missing \":{0}\" param")]
    MissingParam(String),

    /// Loader data that must be present (self or ancestor) was absent
    #[error("no loader data available for route '{0}'")]
    MissingLoaderData(String),

    /// Loader or action data of an unexpected type
    #[error("data for route '{id}' is not a {expected}")]
    DataTypeMismatch { id: String, expected: &'static str },

    /// A configured name that cannot be used as a Rust identifier
    #[error("'{0}' is not a valid Rust identifier")]
    InvalidIdentifier(String),

    /// Data requested from a route that is never mounted alongside the caller
    #[error("route '{target}' is not an ancestor or descendant of '{from}'")]
    UnrelatedRoute { from: String, target: String },
}

/// Convenience alias used throughout the crate
pub type Result<T, E = RouteError> = std::result::Result<T, E>;
