use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DataValue, PropKind, Wrapper};
use crate::error::{Result, RouteError};
use crate::params::Params;
use crate::table::{Relation, RouteTable};
use crate::utils::{create_path, PathOptions};

/// Options forwarded to the router's navigate primitives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigateOptions {
    #[serde(default)]
    pub replace: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<serde_json::Value>,
}

/// Options forwarded to the router's submit primitive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enc_type: Option<String>,
    #[serde(default)]
    pub replace: bool,
}

/// Raw render primitives supplied by the router/UI framework
///
/// Each takes an already composed target string. `RenderUtils` wraps them
/// so callers pass a pattern plus `PathOptions` instead.
pub trait RouterPrimitives: Send + Sync + 'static {
    /// Rendered output of the element primitives
    type Element;
    /// Extra props of `link`/`nav_link`
    type LinkProps;
    /// Extra props of `form`
    type FormProps;

    fn link(&self, to: String, props: Self::LinkProps) -> Self::Element;
    fn nav_link(&self, to: String, props: Self::LinkProps) -> Self::Element;
    fn navigate_element(&self, to: String, options: NavigateOptions) -> Self::Element;
    fn form(&self, action: String, props: Self::FormProps) -> Self::Element;

    fn navigate(&self, to: String, options: NavigateOptions);
    fn submit(&self, target: serde_json::Value, action: String, options: SubmitOptions);

    /// Params matched for the current location
    fn params(&self) -> HashMap<String, String>;
    /// Loader data of a mounted route, if any
    fn loader_data(&self, route_id: &str) -> Option<DataValue>;
    /// Data of the last action of the current route, if any
    fn action_data(&self) -> Option<DataValue>;
}

/// Render utilities bound to one route
///
/// Every navigation target is checked against the route's reachable paths
/// (the empty target means "here") before `create_path` composes it.
pub struct RenderUtils<P: RouterPrimitives> {
    route_id: String,
    table: Arc<RouteTable>,
    primitives: Arc<P>,
}

impl<P: RouterPrimitives> Clone for RenderUtils<P> {
    fn clone(&self) -> Self {
        Self {
            route_id: self.route_id.clone(),
            table: Arc::clone(&self.table),
            primitives: Arc::clone(&self.primitives),
        }
    }
}

impl<P: RouterPrimitives> RenderUtils<P> {
    pub fn new(route_id: impl Into<String>, table: Arc<RouteTable>, primitives: Arc<P>) -> Self {
        Self {
            route_id: route_id.into(),
            table,
            primitives,
        }
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    /// Validates and composes a navigation target
    pub fn href(&self, to: &str, path: &PathOptions) -> Result<String> {
        if !to.is_empty() && !self.table.is_reachable(&self.route_id, to)? {
            return Err(RouteError::InvalidNavigation {
                from: self.route_id.clone(),
                to: to.to_string(),
            });
        }

        create_path(to, path)
    }

    // ========================================================================
    // Elements & navigation
    // ========================================================================

    pub fn link(&self, to: &str, path: &PathOptions, props: P::LinkProps) -> Result<P::Element> {
        Ok(self.primitives.link(self.href(to, path)?, props))
    }

    pub fn nav_link(&self, to: &str, path: &PathOptions, props: P::LinkProps) -> Result<P::Element> {
        Ok(self.primitives.nav_link(self.href(to, path)?, props))
    }

    pub fn navigate_element(
        &self,
        to: &str,
        path: &PathOptions,
        options: NavigateOptions,
    ) -> Result<P::Element> {
        Ok(self.primitives.navigate_element(self.href(to, path)?, options))
    }

    /// Form posting to `action`; only params are substituted
    pub fn form(&self, action: &str, params: &PathOptions, props: P::FormProps) -> Result<P::Element> {
        let path = PathOptions::new().with_params(params.params.clone());
        Ok(self.primitives.form(self.href(action, &path)?, props))
    }

    pub fn navigate(&self, to: &str, path: &PathOptions, options: NavigateOptions) -> Result<()> {
        self.primitives.navigate(self.href(to, path)?, options);
        Ok(())
    }

    /// Submits to `action`; only params are substituted
    pub fn submit(
        &self,
        target: serde_json::Value,
        action: &str,
        params: &PathOptions,
        options: SubmitOptions,
    ) -> Result<()> {
        let path = PathOptions::new().with_params(params.params.clone());
        self.primitives.submit(target, self.href(action, &path)?, options);
        Ok(())
    }

    // ========================================================================
    // Data
    // ========================================================================

    /// Params of the current location, checked against this route's shape
    pub fn params(&self) -> Result<Params> {
        let shape = self.table.params(&self.route_id)?.merged();
        Params::from_raw(shape, &self.primitives.params())
    }

    /// Loader data of this route
    pub fn loader_data<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        self.required_loader_data(&self.route_id)
    }

    /// Loader data of a related route
    ///
    /// Self and ancestors are always mounted, so their data is required.
    /// Descendants may not be mounted, so theirs is optional. Routes on
    /// other branches are rejected.
    pub fn route_loader_data<T: Any + Send + Sync>(&self, id: &str) -> Result<Option<Arc<T>>> {
        match self.table.relation(&self.route_id, id)? {
            Relation::Same | Relation::Ancestor => self.required_loader_data(id).map(Some),
            Relation::Descendant => self
                .primitives
                .loader_data(id)
                .map(|value| downcast(id, value))
                .transpose(),
            Relation::Unrelated => Err(RouteError::UnrelatedRoute {
                from: self.route_id.clone(),
                target: id.to_string(),
            }),
        }
    }

    /// Data of the last action, if one ran
    pub fn action_data<T: Any + Send + Sync>(&self) -> Result<Option<Arc<T>>> {
        self.primitives
            .action_data()
            .map(|value| downcast(&self.route_id, value))
            .transpose()
    }

    fn required_loader_data<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
        let value = self
            .primitives
            .loader_data(id)
            .ok_or_else(|| RouteError::MissingLoaderData(id.to_string()))?;

        downcast(id, value)
    }
}

fn downcast<T: Any + Send + Sync>(id: &str, value: DataValue) -> Result<Arc<T>> {
    value.downcast::<T>().map_err(|_| RouteError::DataTypeMismatch {
        id: id.to_string(),
        expected: type_name::<T>(),
    })
}

/// Creates components and error boundaries bound to route ids
pub struct RenderCreators<P: RouterPrimitives> {
    table: Arc<RouteTable>,
    primitives: Arc<P>,
}

impl<P: RouterPrimitives> Clone for RenderCreators<P> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            primitives: Arc::clone(&self.primitives),
        }
    }
}

impl<P: RouterPrimitives> RenderCreators<P> {
    pub fn new(table: Arc<RouteTable>, primitives: P) -> Self {
        Self {
            table,
            primitives: Arc::new(primitives),
        }
    }

    /// Builds a component from utilities bound to `id`
    pub fn create_component<C, F>(&self, id: &str, component: F) -> Result<Wrapper<C>>
    where
        F: FnOnce(RenderUtils<P>) -> C,
    {
        self.create(PropKind::Component, id, component)
    }

    pub fn create_error_boundary<C, F>(&self, id: &str, error_boundary: F) -> Result<Wrapper<C>>
    where
        F: FnOnce(RenderUtils<P>) -> C,
    {
        self.create(PropKind::ErrorBoundary, id, error_boundary)
    }

    fn create<C, F>(&self, kind: PropKind, id: &str, build: F) -> Result<Wrapper<C>>
    where
        F: FnOnce(RenderUtils<P>) -> C,
    {
        self.table.route(id)?;
        let utils = RenderUtils::new(id, Arc::clone(&self.table), Arc::clone(&self.primitives));

        debug!(route = id, %kind, "created render entry");
        Ok(Wrapper::new(id, kind, build(utils)))
    }
}
