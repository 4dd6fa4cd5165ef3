use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use super::{DataEntry, DataFunction, EagerOrLazy, LazyResolver, LazyValue, PropKind, RenderEntry};
use crate::error::{Result, RouteError};
use crate::route::{NormalizedRoute, RouteInput};
use crate::table::RouteTable;

// ============================================================================
// Typestate markers
// ============================================================================

/// Registration of this kind is still available
#[derive(Debug, Clone, Copy)]
pub struct Open;

/// Registration of this kind has happened; the method is gone
#[derive(Debug, Clone, Copy)]
pub struct Filled;

// ============================================================================
// Registry
// ============================================================================

struct Registry<C> {
    loaders: HashMap<String, DataEntry<C>>,
    actions: HashMap<String, DataEntry<C>>,
    components: HashMap<String, RenderEntry<C>>,
    error_boundaries: HashMap<String, RenderEntry<C>>,
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self {
            loaders: HashMap::new(),
            actions: HashMap::new(),
            components: HashMap::new(),
            error_boundaries: HashMap::new(),
        }
    }
}

/// Indexes one kind of entry by route id
///
/// Fails on an eager entry tagged with another kind, on an id the table
/// does not know, and on a second entry for the same id.
fn index_entries<T, C, I>(table: &RouteTable, kind: PropKind, entries: I) -> Result<HashMap<String, EagerOrLazy<T, C>>>
where
    I: IntoIterator<Item = EagerOrLazy<T, C>>,
{
    let mut indexed = HashMap::new();

    for entry in entries {
        if let EagerOrLazy::Eager(wrapper) = &entry {
            if wrapper.kind() != kind {
                return Err(RouteError::MalformedRegistration {
                    id: wrapper.id().to_string(),
                    expected: kind,
                    found: wrapper.kind(),
                });
            }
        }

        let id = entry.id().to_string();
        table.route(&id)?;

        if indexed.contains_key(&id) {
            return Err(RouteError::DuplicateRegistration { kind, id });
        }

        debug!(route = %id, %kind, lazy = entry.is_lazy(), "registered entry");
        indexed.insert(id, entry);
    }

    Ok(indexed)
}

// ============================================================================
// Builders
// ============================================================================

/// Data phase of the route configuration
///
/// `L` and `A` track whether loaders and actions were added. Each `add_*`
/// method exists only while its marker is `Open`, so a second call does not
/// compile. Adding components or error boundaries moves on to the render
/// phase.
///
/// # Examples
///
/// ```
/// use typesafe_router::binding::{create_route_config, DataCreators, DefaultDataUtils};
/// use typesafe_router::RouteInput;
///
/// let config = create_route_config::<&'static str>(&[RouteInput::path("/").with_children([
///     RouteInput::index(),
///     RouteInput::path(":id"),
/// ])])
/// .unwrap();
///
/// let data = DataCreators::new(config.table(), DefaultDataUtils);
/// let loader = data
///     .create_loader("/:id", |args| async move {
///         Ok::<_, anyhow::Error>(args.params.require("id")?.len())
///     })
///     .unwrap();
///
/// let routes = config.add_loaders([loader.into()]).unwrap().to_routes();
/// assert_eq!(routes[0].children[1].id, "/:id");
/// assert!(routes[0].children[1].loader.is_some());
/// ```
///
/// Loaders can be added once:
///
/// ```compile_fail
/// use typesafe_router::binding::create_route_config;
/// use typesafe_router::RouteInput;
///
/// let config = create_route_config::<&'static str>(&[RouteInput::path("/")]).unwrap();
/// let config = config.add_loaders(Vec::new()).unwrap();
/// let config = config.add_loaders(Vec::new()).unwrap();
/// ```
///
/// and not at all once the render phase has started:
///
/// ```compile_fail
/// use typesafe_router::binding::create_route_config;
/// use typesafe_router::RouteInput;
///
/// let config = create_route_config::<&'static str>(&[RouteInput::path("/")]).unwrap();
/// let config = config.add_components(Vec::new()).unwrap();
/// let config = config.add_loaders(Vec::new()).unwrap();
/// ```
pub struct RouteConfig<C, L = Open, A = Open> {
    table: Arc<RouteTable>,
    registry: Registry<C>,
    _state: PhantomData<(L, A)>,
}

/// Render phase of the route configuration
///
/// Loaders and actions are fixed at this point. Components and error
/// boundaries can each be added once, in either order:
///
/// ```
/// use typesafe_router::binding::create_route_config;
/// use typesafe_router::RouteInput;
///
/// let config = create_route_config::<&'static str>(&[RouteInput::path("/")]).unwrap();
/// let routes = config
///     .add_error_boundaries(Vec::new())
///     .unwrap()
///     .add_components(Vec::new())
///     .unwrap()
///     .to_routes();
/// assert_eq!(routes.len(), 1);
/// ```
///
/// ```compile_fail
/// use typesafe_router::binding::create_route_config;
/// use typesafe_router::RouteInput;
///
/// let config = create_route_config::<&'static str>(&[RouteInput::path("/")]).unwrap();
/// let config = config.add_error_boundaries(Vec::new()).unwrap();
/// let config = config.add_error_boundaries(Vec::new()).unwrap();
/// ```
pub struct RenderConfig<C, Co = Open, E = Open> {
    table: Arc<RouteTable>,
    registry: Registry<C>,
    _state: PhantomData<(Co, E)>,
}

/// Starts a route configuration from a route tree
///
/// The tree is validated immediately; `C` is the component type the render
/// phase will carry.
pub fn create_route_config<C>(routes: &[RouteInput]) -> Result<RouteConfig<C>> {
    Ok(RouteConfig::new(Arc::new(RouteTable::new(routes)?)))
}

impl<C> RouteConfig<C> {
    /// Starts a configuration over an existing table
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            registry: Registry::default(),
            _state: PhantomData,
        }
    }
}

impl<C, L, A> RouteConfig<C, L, A> {
    pub fn table(&self) -> Arc<RouteTable> {
        Arc::clone(&self.table)
    }

    /// Moves to the render phase without registering anything yet
    pub fn into_render(self) -> RenderConfig<C> {
        RenderConfig {
            table: self.table,
            registry: self.registry,
            _state: PhantomData,
        }
    }

    pub fn add_components<I>(self, components: I) -> Result<RenderConfig<C, Filled, Open>>
    where
        I: IntoIterator<Item = RenderEntry<C>>,
    {
        self.into_render().add_components(components)
    }

    pub fn add_error_boundaries<I>(self, error_boundaries: I) -> Result<RenderConfig<C, Open, Filled>>
    where
        I: IntoIterator<Item = RenderEntry<C>>,
    {
        self.into_render().add_error_boundaries(error_boundaries)
    }
}

impl<C, A> RouteConfig<C, Open, A> {
    pub fn add_loaders<I>(self, loaders: I) -> Result<RouteConfig<C, Filled, A>>
    where
        I: IntoIterator<Item = DataEntry<C>>,
    {
        let loaders = index_entries(&self.table, PropKind::Loader, loaders)?;
        let RouteConfig { table, mut registry, .. } = self;
        registry.loaders = loaders;
        Ok(RouteConfig {
            table,
            registry,
            _state: PhantomData,
        })
    }
}

impl<C, L> RouteConfig<C, L, Open> {
    pub fn add_actions<I>(self, actions: I) -> Result<RouteConfig<C, L, Filled>>
    where
        I: IntoIterator<Item = DataEntry<C>>,
    {
        let actions = index_entries(&self.table, PropKind::Action, actions)?;
        let RouteConfig { table, mut registry, .. } = self;
        registry.actions = actions;
        Ok(RouteConfig {
            table,
            registry,
            _state: PhantomData,
        })
    }
}

impl<C, Co, E> RenderConfig<C, Co, E> {
    pub fn table(&self) -> Arc<RouteTable> {
        Arc::clone(&self.table)
    }
}

impl<C, E> RenderConfig<C, Open, E> {
    pub fn add_components<I>(self, components: I) -> Result<RenderConfig<C, Filled, E>>
    where
        I: IntoIterator<Item = RenderEntry<C>>,
    {
        let components = index_entries(&self.table, PropKind::Component, components)?;
        let RenderConfig { table, mut registry, .. } = self;
        registry.components = components;
        Ok(RenderConfig {
            table,
            registry,
            _state: PhantomData,
        })
    }
}

impl<C, Co> RenderConfig<C, Co, Open> {
    pub fn add_error_boundaries<I>(self, error_boundaries: I) -> Result<RenderConfig<C, Co, Filled>>
    where
        I: IntoIterator<Item = RenderEntry<C>>,
    {
        let error_boundaries = index_entries(&self.table, PropKind::ErrorBoundary, error_boundaries)?;
        let RenderConfig { table, mut registry, .. } = self;
        registry.error_boundaries = error_boundaries;
        Ok(RenderConfig {
            table,
            registry,
            _state: PhantomData,
        })
    }
}

// ============================================================================
// Output
// ============================================================================

/// One node of the route tree handed to the router
pub struct RouteObject<C> {
    pub id: String,
    pub path: Option<String>,
    pub index: bool,
    pub loader: Option<DataFunction>,
    pub action: Option<DataFunction>,
    pub component: Option<C>,
    pub error_boundary: Option<C>,
    /// Present only when at least one entry of this node is lazy
    pub lazy: Option<LazyResolver<C>>,
    pub children: Vec<RouteObject<C>>,
}

impl<C> fmt::Debug for RouteObject<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteObject")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("index", &self.index)
            .field("loader", &self.loader.is_some())
            .field("action", &self.action.is_some())
            .field("component", &self.component.is_some())
            .field("error_boundary", &self.error_boundary.is_some())
            .field("lazy", &self.lazy)
            .field("children", &self.children)
            .finish()
    }
}

impl<C: Clone> Registry<C> {
    fn to_routes(&self, routes: &[NormalizedRoute]) -> Vec<RouteObject<C>> {
        routes.iter().map(|route| self.to_route(route)).collect()
    }

    fn to_route(&self, route: &NormalizedRoute) -> RouteObject<C> {
        let mut lazy: Vec<(PropKind, LazyValue<C>)> = Vec::new();

        let loader = split(&self.loaders, &route.id, PropKind::Loader, &mut lazy);
        let action = split(&self.actions, &route.id, PropKind::Action, &mut lazy);
        let component = split(&self.components, &route.id, PropKind::Component, &mut lazy);
        let error_boundary = split(&self.error_boundaries, &route.id, PropKind::ErrorBoundary, &mut lazy);

        RouteObject {
            id: route.id.clone(),
            path: route.path.clone(),
            index: route.index,
            loader,
            action,
            component,
            error_boundary,
            lazy: LazyResolver::new(route.id.clone(), lazy),
            children: self.to_routes(&route.children),
        }
    }
}

/// Eager value of an entry, collecting lazy thunks on the side
fn split<T: Clone, C>(
    entries: &HashMap<String, EagerOrLazy<T, C>>,
    id: &str,
    kind: PropKind,
    lazy: &mut Vec<(PropKind, LazyValue<C>)>,
) -> Option<T> {
    match entries.get(id)? {
        EagerOrLazy::Eager(wrapper) => Some(wrapper.value().clone()),
        EagerOrLazy::Lazy(wrapper) => {
            lazy.push((kind, wrapper.load()));
            None
        }
    }
}

impl<C: Clone, L, A> RouteConfig<C, L, A> {
    /// Produces the router's route tree
    pub fn to_routes(&self) -> Vec<RouteObject<C>> {
        self.registry.to_routes(self.table.tree())
    }
}

impl<C: Clone, Co, E> RenderConfig<C, Co, E> {
    /// Produces the router's route tree
    pub fn to_routes(&self) -> Vec<RouteObject<C>> {
        self.registry.to_routes(self.table.tree())
    }
}
