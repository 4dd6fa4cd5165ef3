// Route definition files: the route tree plus code generation settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::route::RouteInput;
use crate::table::RouteTable;

/// A route definition file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// The route tree, in author order
    #[serde(default)]
    pub routes: Vec<RouteInput>,

    #[serde(default)]
    pub codegen: CodegenConfig,
}

/// Code generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Name of the generated module (default: "routes")
    #[serde(default = "default_module_name")]
    pub module_name: String,

    /// Emit `paths()` tables and `ABSOLUTE_PATHS`
    #[serde(default = "default_true")]
    pub emit_paths: bool,

    /// Emit one params struct per route
    #[serde(default = "default_true")]
    pub emit_params: bool,

    /// Derive serde traits on params structs
    #[serde(default = "default_false")]
    pub derive_serde: bool,
}

// Default values
fn default_module_name() -> String {
    "routes".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            module_name: default_module_name(),
            emit_paths: true,
            emit_params: true,
            derive_serde: false,
        }
    }
}

impl RouterConfig {
    /// Load a route definition file
    ///
    /// `.json` files are parsed as JSON, everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route file: {:?}", path))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .with_context(|| format!("Failed to parse route file: {:?}", path))?;

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Builds and validates the route table
    pub fn table(&self) -> Result<RouteTable> {
        RouteTable::new(&self.routes).context("Invalid route tree")
    }
}
