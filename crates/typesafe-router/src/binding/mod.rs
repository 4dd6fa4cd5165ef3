/// Binding layer: loaders, actions, components and error boundaries
///
/// Entries are created against a `RouteTable` (so every route id is checked
/// up front), registered on a typestate builder that accepts each kind at
/// most once, and finally turned into a `RouteObject` tree for the router:
/// - `data` - loader/action creators, redirect helper
/// - `render` - component/error-boundary creators, enhanced render utilities
/// - `builder` - `RouteConfig` / `RenderConfig` and `to_routes`
/// - `lazy` - on-demand modules and their concurrent resolution

pub mod builder;
pub mod data;
pub mod lazy;
pub mod render;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use builder::{create_route_config, Filled, Open, RenderConfig, RouteConfig, RouteObject};
pub use data::{
    ActionArgs, DataArgs, DataCreators, DataUtils, DefaultDataUtils, LoaderArgs, RedirectOptions,
    Redirector,
};
pub use lazy::{lazy, LazyModule, LazyResolver, LazyValue, LazyWrapper, ResolvedProps};
pub use render::{NavigateOptions, RenderCreators, RenderUtils, RouterPrimitives, SubmitOptions};

// ============================================================================
// Kinds & wrappers
// ============================================================================

/// The four kinds of entry a route node can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropKind {
    #[serde(rename = "loader")]
    Loader,
    #[serde(rename = "action")]
    Action,
    Component,
    ErrorBoundary,
}

impl PropKind {
    pub const ALL: [PropKind; 4] = [
        PropKind::Action,
        PropKind::Loader,
        PropKind::Component,
        PropKind::ErrorBoundary,
    ];

    /// Prop name on the router's route object
    pub fn as_str(self) -> &'static str {
        match self {
            PropKind::Loader => "loader",
            PropKind::Action => "action",
            PropKind::Component => "Component",
            PropKind::ErrorBoundary => "ErrorBoundary",
        }
    }
}

impl fmt::Display for PropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value bound to one route id and tagged with its kind
///
/// Normally produced by `DataCreators` or `RenderCreators`, which check the
/// id and set the tag.
#[derive(Clone)]
pub struct Wrapper<T> {
    id: String,
    kind: PropKind,
    value: T,
}

impl<T> Wrapper<T> {
    pub fn new(id: impl Into<String>, kind: PropKind, value: T) -> Self {
        Self {
            id: id.into(),
            kind,
            value,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> PropKind {
        self.kind
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> fmt::Debug for Wrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// An entry that is either available now or loaded on demand
pub enum EagerOrLazy<T, C> {
    Eager(Wrapper<T>),
    Lazy(LazyWrapper<C>),
}

impl<T, C> EagerOrLazy<T, C> {
    /// Route id the entry is bound to
    pub fn id(&self) -> &str {
        match self {
            EagerOrLazy::Eager(wrapper) => wrapper.id(),
            EagerOrLazy::Lazy(wrapper) => wrapper.id(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, EagerOrLazy::Lazy(_))
    }
}

impl<T, C> From<Wrapper<T>> for EagerOrLazy<T, C> {
    fn from(wrapper: Wrapper<T>) -> Self {
        EagerOrLazy::Eager(wrapper)
    }
}

impl<T, C> From<LazyWrapper<C>> for EagerOrLazy<T, C> {
    fn from(wrapper: LazyWrapper<C>) -> Self {
        EagerOrLazy::Lazy(wrapper)
    }
}

impl<T, C> fmt::Debug for EagerOrLazy<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EagerOrLazy::Eager(wrapper) => f.debug_tuple("Eager").field(wrapper).finish(),
            EagerOrLazy::Lazy(wrapper) => f.debug_tuple("Lazy").field(&wrapper.id()).finish(),
        }
    }
}

/// A loader or action entry, eager or lazy
pub type DataEntry<C> = EagerOrLazy<DataFunction, C>;

/// A component or error-boundary entry, eager or lazy
pub type RenderEntry<C> = EagerOrLazy<C, C>;

// ============================================================================
// Data functions
// ============================================================================

/// Type-erased loader/action result
pub type DataValue = Arc<dyn Any + Send + Sync>;

/// What the router calls for a loader or action
pub type DataFunction =
    Arc<dyn Fn(DataFunctionArgs) -> BoxFuture<'static, anyhow::Result<DataResponse>> + Send + Sync>;

/// Minimal request view handed to data functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub url: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            method: "POST".to_string(),
            body: Some(body),
        }
    }
}

/// Raw arguments from the router: the request and the matched params
#[derive(Debug, Clone)]
pub struct DataFunctionArgs {
    pub request: Request,
    pub params: HashMap<String, String>,
}

impl DataFunctionArgs {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Outcome of a loader or action
#[derive(Clone)]
pub enum DataResponse {
    Data(DataValue),
    Redirect(Redirect),
}

impl DataResponse {
    /// The data, if it is a `T`
    pub fn data<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            DataResponse::Data(value) => value.clone().downcast::<T>().ok(),
            DataResponse::Redirect(_) => None,
        }
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            DataResponse::Redirect(redirect) => Some(redirect),
            DataResponse::Data(_) => None,
        }
    }
}

impl fmt::Debug for DataResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataResponse::Data(_) => f.write_str("Data(..)"),
            DataResponse::Redirect(redirect) => f.debug_tuple("Redirect").field(redirect).finish(),
        }
    }
}

/// Status and headers for a redirect response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInit {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

/// A redirect response
///
/// Loaders and actions return it as an error (`Err(redirect.into())`); the
/// wrapper turns it into `DataResponse::Redirect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("redirect to '{location}' ({status})")]
pub struct Redirect {
    pub location: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prop_kind_names() {
        let names: Vec<String> = PropKind::ALL.iter().map(|kind| kind.to_string()).collect();
        assert_eq!(names, vec!["action", "loader", "Component", "ErrorBoundary"]);
    }

    #[test]
    fn test_data_response_downcast() {
        let response = DataResponse::Data(Arc::new(42u32));
        assert_eq!(response.data::<u32>().as_deref(), Some(&42));
        assert!(response.data::<String>().is_none());
        assert!(response.redirect().is_none());
    }

    #[test]
    fn test_eager_or_lazy_id() {
        let entry: RenderEntry<&'static str> =
            Wrapper::new("/a", PropKind::Component, "component").into();
        assert_eq!(entry.id(), "/a");
        assert!(!entry.is_lazy());
    }
}
