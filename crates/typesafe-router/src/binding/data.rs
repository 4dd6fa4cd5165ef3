use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use tracing::debug;

use super::{
    DataFunction, DataFunctionArgs, DataResponse, PropKind, Redirect, Request, ResponseInit, Wrapper,
};
use crate::error::{Result, RouteError};
use crate::params::Params;
use crate::table::RouteTable;
use crate::utils::{create_path, PathOptions};

/// Raw data utilities supplied by the router
pub trait DataUtils: Send + Sync {
    /// Builds a redirect to an already composed location
    fn redirect(&self, location: &str, init: Option<ResponseInit>) -> Redirect;
}

/// `302 Found` redirects with the given headers
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDataUtils;

impl DataUtils for DefaultDataUtils {
    fn redirect(&self, location: &str, init: Option<ResponseInit>) -> Redirect {
        let init = init.unwrap_or_default();
        Redirect {
            location: location.to_string(),
            status: init.status.unwrap_or(302),
            headers: init.headers,
        }
    }
}

/// Options for `Redirector::redirect`
#[derive(Debug, Clone, Default)]
pub struct RedirectOptions {
    pub path: PathOptions,
    pub init: Option<ResponseInit>,
}

impl RedirectOptions {
    pub fn new(path: PathOptions) -> Self {
        Self { path, init: None }
    }

    pub fn with_init(mut self, init: ResponseInit) -> Self {
        self.init = Some(init);
        self
    }
}

/// Redirect helper bound to one route
///
/// Only targets in the route's reachable paths are accepted. The empty
/// target (the current location) is always allowed.
#[derive(Clone)]
pub struct Redirector {
    route_id: String,
    table: Arc<RouteTable>,
    utils: Arc<dyn DataUtils>,
}

impl Redirector {
    pub fn new(route_id: impl Into<String>, table: Arc<RouteTable>, utils: Arc<dyn DataUtils>) -> Self {
        Self {
            route_id: route_id.into(),
            table,
            utils,
        }
    }

    /// Builds a redirect to `to`
    ///
    /// Without options the target is passed through verbatim; with options
    /// it is composed by `create_path` first.
    pub fn redirect(&self, to: &str, options: Option<RedirectOptions>) -> Result<Redirect> {
        if !to.is_empty() && !self.table.is_reachable(&self.route_id, to)? {
            return Err(RouteError::InvalidNavigation {
                from: self.route_id.clone(),
                to: to.to_string(),
            });
        }

        match options {
            None => Ok(self.utils.redirect(to, None)),
            Some(options) => {
                let location = create_path(to, &options.path)?;
                Ok(self.utils.redirect(&location, options.init))
            }
        }
    }
}

/// What a loader or action closure receives
pub struct DataArgs {
    pub request: Request,
    pub params: Params,
    pub redirect: Redirector,
}

pub type LoaderArgs = DataArgs;
pub type ActionArgs = DataArgs;

/// Creates loaders and actions bound to route ids
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use typesafe_router::binding::{DataCreators, DefaultDataUtils, PropKind};
/// use typesafe_router::{RouteInput, RouteTable};
///
/// let table = Arc::new(RouteTable::new(&[RouteInput::path("/:id")]).unwrap());
/// let data = DataCreators::new(table, DefaultDataUtils);
///
/// let loader = data
///     .create_loader("/:id", |args| async move {
///         Ok::<_, anyhow::Error>(args.params.require("id")?.to_string())
///     })
///     .unwrap();
/// assert_eq!(loader.kind(), PropKind::Loader);
///
/// assert!(data.create_loader("/nope", |_| async { Ok::<_, anyhow::Error>(()) }).is_err());
/// ```
#[derive(Clone)]
pub struct DataCreators {
    table: Arc<RouteTable>,
    utils: Arc<dyn DataUtils>,
}

impl DataCreators {
    pub fn new(table: Arc<RouteTable>, utils: impl DataUtils + 'static) -> Self {
        Self {
            table,
            utils: Arc::new(utils),
        }
    }

    pub fn create_loader<F, Fut, T>(&self, id: &str, loader: F) -> Result<Wrapper<DataFunction>>
    where
        F: Fn(LoaderArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Any + Send + Sync,
    {
        self.create(PropKind::Loader, id, loader)
    }

    pub fn create_action<F, Fut, T>(&self, id: &str, action: F) -> Result<Wrapper<DataFunction>>
    where
        F: Fn(ActionArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Any + Send + Sync,
    {
        self.create(PropKind::Action, id, action)
    }

    fn create<F, Fut, T>(&self, kind: PropKind, id: &str, function: F) -> Result<Wrapper<DataFunction>>
    where
        F: Fn(DataArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Any + Send + Sync,
    {
        let shape = self.table.params(id)?.merged();
        let redirect = Redirector::new(id, Arc::clone(&self.table), Arc::clone(&self.utils));
        let function = Arc::new(function);

        let data_function: DataFunction = Arc::new(move |args: DataFunctionArgs| {
            let function = Arc::clone(&function);
            let shape = shape.clone();
            let redirect = redirect.clone();

            async move {
                let params = Params::from_raw(shape, &args.params)?;
                let result = (*function)(DataArgs {
                    request: args.request,
                    params,
                    redirect,
                })
                .await;

                match result {
                    Ok(value) => Ok(DataResponse::Data(Arc::new(value))),
                    Err(err) => match err.downcast::<Redirect>() {
                        Ok(redirect) => Ok(DataResponse::Redirect(redirect)),
                        Err(err) => Err(err),
                    },
                }
            }
            .boxed()
        });

        debug!(route = id, %kind, "created data function");
        Ok(Wrapper::new(id, kind, data_function))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteInput;

    fn table() -> Arc<RouteTable> {
        Arc::new(
            RouteTable::new(&[RouteInput::path("/").with_children([
                RouteInput::path("users/:id"),
                RouteInput::path("login"),
            ])])
            .unwrap(),
        )
    }

    #[test]
    fn test_default_redirect_status() {
        let redirect = DefaultDataUtils.redirect("/login", None);
        assert_eq!(redirect.status, 302);
        assert_eq!(redirect.location, "/login");
    }

    #[test]
    fn test_redirector_rejects_unreachable() {
        let redirector = Redirector::new("/users/:id", table(), Arc::new(DefaultDataUtils));
        let err = redirector.redirect("/nowhere", None).unwrap_err();
        assert!(matches!(err, RouteError::InvalidNavigation { .. }));
    }

    #[test]
    fn test_redirector_composes_path() {
        let redirector = Redirector::new("/login", table(), Arc::new(DefaultDataUtils));
        let options = RedirectOptions::new(PathOptions::new().with_param("id", "7")).with_init(ResponseInit {
            status: Some(303),
            headers: Vec::new(),
        });

        let redirect = redirector.redirect("/users/:id", Some(options)).unwrap();
        assert_eq!(redirect.location, "/users/7");
        assert_eq!(redirect.status, 303);
    }

    #[tokio::test]
    async fn test_loader_returns_data() {
        let data = DataCreators::new(table(), DefaultDataUtils);
        let loader = data
            .create_loader("/users/:id", |args| async move {
                Ok::<_, anyhow::Error>(format!("user {}", args.params.require("id")?))
            })
            .unwrap();

        let response = (loader.value())(
            DataFunctionArgs::new(Request::get("/users/7")).with_param("id", "7"),
        )
        .await
        .unwrap();

        assert_eq!(response.data::<String>().as_deref().map(String::as_str), Some("user 7"));
    }

    #[tokio::test]
    async fn test_loader_redirect_becomes_response() {
        let data = DataCreators::new(table(), DefaultDataUtils);
        let loader = data
            .create_loader("/users/:id", |args| async move {
                Err::<(), anyhow::Error>(args.redirect.redirect("/login", None)?.into())
            })
            .unwrap();

        let response = (loader.value())(
            DataFunctionArgs::new(Request::get("/users/7")).with_param("id", "7"),
        )
        .await
        .unwrap();

        assert_eq!(response.redirect().map(|r| r.location.as_str()), Some("/login"));
    }

    #[tokio::test]
    async fn test_loader_missing_param_fails() {
        let data = DataCreators::new(table(), DefaultDataUtils);
        let action = data
            .create_action("/users/:id", |_args| async move { Ok::<_, anyhow::Error>(()) })
            .unwrap();

        let err = (action.value())(DataFunctionArgs::new(Request::get("/users")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing \":id\" param"));
    }
}
