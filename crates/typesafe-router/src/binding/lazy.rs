use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use tracing::{debug, warn};

use super::{DataFunction, PropKind, Wrapper};
use crate::error::{Result, RouteError};

/// Zero-argument thunk producing a lazy module
pub type LazyValue<C> =
    Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<LazyModule<C>>> + Send + Sync>;

/// What a lazy thunk resolves to: any subset of the four entry kinds
///
/// Only the kinds the module was registered for are read; the rest are
/// ignored, so one module can back a loader and a component at once.
pub struct LazyModule<C> {
    pub loader: Option<Wrapper<DataFunction>>,
    pub action: Option<Wrapper<DataFunction>>,
    pub component: Option<Wrapper<C>>,
    pub error_boundary: Option<Wrapper<C>>,
}

impl<C> Default for LazyModule<C> {
    fn default() -> Self {
        Self {
            loader: None,
            action: None,
            component: None,
            error_boundary: None,
        }
    }
}

impl<C> LazyModule<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loader(mut self, loader: Wrapper<DataFunction>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn with_action(mut self, action: Wrapper<DataFunction>) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_component(mut self, component: Wrapper<C>) -> Self {
        self.component = Some(component);
        self
    }

    pub fn with_error_boundary(mut self, error_boundary: Wrapper<C>) -> Self {
        self.error_boundary = Some(error_boundary);
        self
    }
}

/// A lazy entry bound to a route id
pub struct LazyWrapper<C> {
    id: String,
    load: LazyValue<C>,
}

impl<C> LazyWrapper<C> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn load(&self) -> LazyValue<C> {
        Arc::clone(&self.load)
    }
}

impl<C> Clone for LazyWrapper<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            load: Arc::clone(&self.load),
        }
    }
}

/// Wraps an async thunk as a lazy entry for a route
///
/// # Examples
///
/// ```
/// use typesafe_router::binding::{lazy, LazyModule, PropKind, Wrapper};
///
/// let entry = lazy("/about", || async {
///     Ok::<_, anyhow::Error>(LazyModule::new().with_component(Wrapper::new(
///         "/about",
///         PropKind::Component,
///         "about",
///     )))
/// });
/// assert_eq!(entry.id(), "/about");
/// ```
pub fn lazy<C, F, Fut>(id: impl Into<String>, load: F) -> LazyWrapper<C>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<LazyModule<C>>> + Send + 'static,
{
    LazyWrapper {
        id: id.into(),
        load: Arc::new(move || load().boxed()),
    }
}

/// Entries produced by resolving every lazy thunk of one route node
pub struct ResolvedProps<C> {
    pub loader: Option<DataFunction>,
    pub action: Option<DataFunction>,
    pub component: Option<C>,
    pub error_boundary: Option<C>,
}

impl<C> Default for ResolvedProps<C> {
    fn default() -> Self {
        Self {
            loader: None,
            action: None,
            component: None,
            error_boundary: None,
        }
    }
}

impl<C> fmt::Debug for ResolvedProps<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedProps")
            .field("loader", &self.loader.is_some())
            .field("action", &self.action.is_some())
            .field("component", &self.component.is_some())
            .field("error_boundary", &self.error_boundary.is_some())
            .finish()
    }
}

/// Resolves the lazy entries of one route node
///
/// Attached to a `RouteObject` only when the node has at least one lazy
/// entry. Every thunk is started together and awaited as one join; the
/// first failure fails the whole node. Nothing is cached or retried.
pub struct LazyResolver<C> {
    id: String,
    entries: Vec<(PropKind, LazyValue<C>)>,
}

impl<C> Clone for LazyResolver<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            entries: self.entries.clone(),
        }
    }
}

impl<C> LazyResolver<C> {
    pub(crate) fn new(id: impl Into<String>, entries: Vec<(PropKind, LazyValue<C>)>) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        Some(Self {
            id: id.into(),
            entries,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kinds this node resolves lazily
    pub fn kinds(&self) -> impl Iterator<Item = PropKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }
}

impl<C: Send + 'static> LazyResolver<C> {
    /// Awaits every lazy thunk of the node concurrently
    pub async fn resolve(&self) -> Result<ResolvedProps<C>> {
        debug!(route = %self.id, count = self.entries.len(), "resolving lazy entries");

        let pending = self.entries.iter().map(|(kind, load)| {
            let kind = *kind;
            let id = self.id.clone();
            let future = load();

            async move {
                future
                    .await
                    .map(|module| (kind, module))
                    .map_err(|source| {
                        warn!(route = %id, %kind, "lazy entry failed to load");
                        RouteError::LazyResolution { id, source }
                    })
            }
        });

        let mut props = ResolvedProps::default();
        for (kind, module) in try_join_all(pending).await? {
            match kind {
                PropKind::Loader => props.loader = Some(self.extract(kind, module.loader)?),
                PropKind::Action => props.action = Some(self.extract(kind, module.action)?),
                PropKind::Component => props.component = Some(self.extract(kind, module.component)?),
                PropKind::ErrorBoundary => {
                    props.error_boundary = Some(self.extract(kind, module.error_boundary)?)
                }
            }
        }

        Ok(props)
    }

    /// Checks that a module entry exists and belongs to this node
    fn extract<T>(&self, kind: PropKind, wrapper: Option<Wrapper<T>>) -> Result<T> {
        match wrapper {
            Some(wrapper) if wrapper.id() == self.id && wrapper.kind() == kind => Ok(wrapper.into_value()),
            _ => Err(RouteError::MalformedLazyModule {
                id: self.id.clone(),
                kind,
            }),
        }
    }
}

impl<C> fmt::Debug for LazyResolver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyResolver")
            .field("id", &self.id)
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(id: &str) -> Wrapper<&'static str> {
        Wrapper::new(id, PropKind::Component, "component")
    }

    #[test]
    fn test_no_entries_no_resolver() {
        assert!(LazyResolver::<()>::new("/a", Vec::new()).is_none());
    }

    #[tokio::test]
    async fn test_resolves_component() {
        let entry = lazy("/a", || async {
            Ok::<_, anyhow::Error>(LazyModule::new().with_component(component("/a")))
        });
        let resolver = LazyResolver::new("/a", vec![(PropKind::Component, entry.load())]).unwrap();

        let props = resolver.resolve().await.unwrap();
        assert_eq!(props.component, Some("component"));
        assert!(props.loader.is_none());
    }

    #[tokio::test]
    async fn test_missing_kind_is_malformed() {
        let entry = lazy("/a", || async { Ok::<_, anyhow::Error>(LazyModule::<&'static str>::new()) });
        let resolver = LazyResolver::new("/a", vec![(PropKind::Component, entry.load())]).unwrap();

        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(
            err,
            RouteError::MalformedLazyModule { kind: PropKind::Component, .. }
        ));
    }

    #[tokio::test]
    async fn test_foreign_id_is_malformed() {
        let entry = lazy("/a", || async {
            Ok::<_, anyhow::Error>(LazyModule::new().with_component(component("/b")))
        });
        let resolver = LazyResolver::new("/a", vec![(PropKind::Component, entry.load())]).unwrap();

        assert!(matches!(
            resolver.resolve().await,
            Err(RouteError::MalformedLazyModule { .. })
        ));
    }

    #[tokio::test]
    async fn test_thunk_failure_propagates() {
        let entry = lazy("/a", || async {
            Err::<LazyModule<&'static str>, _>(anyhow::anyhow!("chunk failed"))
        });
        let resolver = LazyResolver::new("/a", vec![(PropKind::Component, entry.load())]).unwrap();

        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, RouteError::LazyResolution { ref id, .. } if id == "/a"));
        assert!(err.to_string().contains("chunk failed"));
    }
}
