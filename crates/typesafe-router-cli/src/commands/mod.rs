pub mod generate;
pub mod inspect;
pub mod params;
pub mod paths;

use anyhow::Result;
use std::path::Path;
use typesafe_router::{RouteTable, RouterConfig};

/// Loads a route file and builds its table
pub(crate) fn load(file: &Path) -> Result<(RouterConfig, RouteTable)> {
    let config = RouterConfig::load(file)?;
    let table = config.table()?;
    tracing::debug!(file = %file.display(), routes = table.len(), "loaded route table");
    Ok((config, table))
}
