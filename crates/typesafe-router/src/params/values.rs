use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::{ParamShape, Requiredness};
use crate::error::{Result, RouteError};

/// Parameter values handed to loaders, actions and components
///
/// Built from the raw params the router matched, checked against the merged
/// shape of the route: every required key must be present. Keys the route
/// does not declare are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Params {
    values: BTreeMap<String, String>,
    #[serde(skip)]
    shape: ParamShape,
}

impl Params {
    /// Validates raw router params against a shape
    pub fn from_raw(shape: ParamShape, raw: &HashMap<String, String>) -> Result<Self> {
        if let Some(missing) = shape.required().find(|name| !raw.contains_key(*name)) {
            return Err(RouteError::MissingParam(missing.to_string()));
        }

        let values = raw
            .iter()
            .filter(|(name, _)| shape.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok(Self { values, shape })
    }

    /// Value of a parameter, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value of a required parameter
    ///
    /// Fails for parameters that are optional or unknown to this route, so
    /// callers cannot silently treat a possibly-absent value as present.
    pub fn require(&self, name: &str) -> Result<&str> {
        match self.shape.get(name) {
            Some(Requiredness::Required) => self
                .get(name)
                .ok_or_else(|| RouteError::MissingParam(name.to_string())),
            _ => Err(RouteError::MissingParam(name.to_string())),
        }
    }

    /// The catch-all value, if the route has a splat
    pub fn splat(&self) -> Option<&str> {
        self.get("*")
    }

    /// The shape these values were checked against
    pub fn shape(&self) -> &ParamShape {
        &self.shape
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.values
    }
}
