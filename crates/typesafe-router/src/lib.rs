//! # typesafe-router
//!
//! A typing layer over a nested route tree. From one route definition it
//! derives, at configuration time:
//! - Stable route ids (`/`, `/users/:id`, `/users/_index`, `/_` for layouts)
//! - Parameter shapes per route (`:id` required, `:tab?` optional, `*` splat)
//! - Every navigation target reachable from a route (absolute, `..`-relative
//!   to ancestors, relative to descendants)
//! - Loader/action/component/error-boundary bindings checked against those
//!   ids, with a builder that accepts each kind at most once
//!
//! ## Configuration-time checks
//!
//! Anything the route tree rules out is returned as a `RouteError` from the
//! call that caused it: colliding ids, malformed patterns, unknown route ids,
//! duplicate registrations, navigation targets that are not reachable,
//! missing required params.
//!
//! ## Code generation
//!
//! `codegen::generate` turns a `RouteTable` into a Rust module (`RouteId`
//! enum, params structs, path tables), so the consuming crate's compiler
//! checks route ids and params too.
//!
//! ## Example
//!
//! ```
//! use typesafe_router::{RouteInput, RouteTable};
//!
//! let table = RouteTable::new(&[RouteInput::path("/").with_children([
//!     RouteInput::index(),
//!     RouteInput::path(":id"),
//! ])])
//! .unwrap();
//!
//! assert_eq!(table.ids().collect::<Vec<_>>(), vec!["/", "/_index", "/:id"]);
//! assert_eq!(table.params("/:id").unwrap().merged().to_string(), "{ id: string }");
//! assert!(table.absolute_paths().unwrap().contains("/:id"));
//! assert!(table.paths("/_index").unwrap().contains(":id"));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod binding;
pub mod codegen;
pub mod config;
pub mod error;
pub mod params;
pub mod path;
pub mod route;
pub mod table;
pub mod utils;

// ============================================================================
// Re-exports
// ============================================================================

pub use binding::{
    create_route_config, lazy, DataCreators, DataUtils, DefaultDataUtils, LazyModule, PropKind,
    RenderCreators, RenderUtils, RouteConfig, RouteObject, RouterPrimitives, Wrapper,
};
pub use config::{CodegenConfig, RouterConfig};
pub use error::{Result, RouteError};
pub use params::{ParamShape, Params, ParamsUnion, Requiredness};
pub use path::PathSet;
pub use route::{FlatRoute, FlatRoutes, NormalizedRoute, RouteInput};
pub use table::{Relation, RouteTable};
pub use utils::{create_path, PathOptions};
