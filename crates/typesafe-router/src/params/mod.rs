/// Parameter algebra
///
/// Derives parameter shapes from path patterns and aggregates them over the
/// route tree:
/// - own params come from a route's own pattern only
/// - ancestor params merge every ancestor's own params
/// - descendant params are a *union* of alternative shapes, one per chain of
///   routes that may be mounted below, because only one leaf is mounted at a
///   time and a descendant may not be mounted at all

mod values;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::route::pattern::{parse_pattern, SegmentType};
use crate::route::FlatRoutes;

pub use values::Params;

/// Whether a parameter must be supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Requiredness {
    /// Always present when the route matches
    Required,
    /// May be absent
    Optional,
}

impl Requiredness {
    /// Combines two requirements for the same key; required wins
    pub fn merge(self, other: Self) -> Self {
        if self == Self::Required || other == Self::Required {
            Self::Required
        } else {
            Self::Optional
        }
    }
}

/// Mapping of parameter name → requiredness
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ParamShape(BTreeMap<String, Requiredness>);

impl ParamShape {
    /// Creates an empty shape
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key, keeping the stronger requirement if it already exists
    pub fn insert(&mut self, name: impl Into<String>, requiredness: Requiredness) {
        self.0
            .entry(name.into())
            .and_modify(|existing| *existing = existing.merge(requiredness))
            .or_insert(requiredness);
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, requiredness: Requiredness) -> Self {
        self.insert(name, requiredness);
        self
    }

    /// Merges another shape into this one (intersection of the two types)
    pub fn merged(mut self, other: &ParamShape) -> Self {
        for (name, requiredness) in &other.0 {
            self.insert(name.clone(), *requiredness);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Requiredness> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Requiredness)> {
        self.0.iter().map(|(name, req)| (name.as_str(), *req))
    }

    /// Names of required parameters
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, req)| *req == Requiredness::Required)
            .map(|(name, _)| name)
    }
}

impl<S: Into<String>> FromIterator<(S, Requiredness)> for ParamShape {
    fn from_iter<I: IntoIterator<Item = (S, Requiredness)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |shape, (name, req)| shape.with(name, req))
    }
}

impl fmt::Display for ParamShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .iter()
            .map(|(name, req)| match req {
                Requiredness::Required => format!("{}: string", name),
                Requiredness::Optional => format!("{}?: string", name),
            })
            .collect();

        if fields.is_empty() {
            write!(f, "{{}}")
        } else {
            write!(f, "{{ {} }}", fields.join("; "))
        }
    }
}

/// A union of alternative parameter shapes
///
/// Each member is one possible set of parameters, depending on which chain
/// of descendants is mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParamsUnion(BTreeSet<ParamShape>);

impl ParamsUnion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(shape: ParamShape) -> Self {
        Self(BTreeSet::from([shape]))
    }

    pub fn insert(&mut self, shape: ParamShape) {
        self.0.insert(shape);
    }

    pub fn contains(&self, shape: &ParamShape) -> bool {
        self.0.contains(shape)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamShape> {
        self.0.iter()
    }

    /// Flattens the union into one mapping
    ///
    /// A key is required only when every alternative requires it; any key
    /// that is optional somewhere or missing from some alternative becomes
    /// optional.
    pub fn merged(&self) -> ParamShape {
        let names: BTreeSet<&str> = self.0.iter().flat_map(|shape| shape.0.keys()).map(String::as_str).collect();

        names
            .into_iter()
            .map(|name| {
                let everywhere = self
                    .0
                    .iter()
                    .all(|shape| shape.get(name) == Some(Requiredness::Required));
                let requiredness = if everywhere {
                    Requiredness::Required
                } else {
                    Requiredness::Optional
                };
                (name, requiredness)
            })
            .collect()
    }
}

impl FromIterator<ParamShape> for ParamsUnion {
    fn from_iter<I: IntoIterator<Item = ParamShape>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ParamsUnion {
    type Item = ParamShape;
    type IntoIter = std::collections::btree_set::IntoIter<ParamShape>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Derives the parameter shape of one path pattern
///
/// - `*` (final segment) → required `*`
/// - `:name` → required `name`
/// - `:name?` → optional `name`
/// - static segments contribute nothing
///
/// # Examples
///
/// ```
/// use typesafe_router::params::{set_params, Requiredness};
///
/// let shape = set_params(":one?/:two/*").unwrap();
/// assert_eq!(shape.get("one"), Some(Requiredness::Optional));
/// assert_eq!(shape.get("two"), Some(Requiredness::Required));
/// assert_eq!(shape.get("*"), Some(Requiredness::Required));
/// ```
pub fn set_params(pattern: &str) -> Result<ParamShape> {
    let shape = parse_pattern(pattern)?
        .into_iter()
        .filter_map(|segment| match segment {
            SegmentType::Splat => Some(("*".to_string(), Requiredness::Required)),
            SegmentType::Dynamic(name) => Some((name, Requiredness::Required)),
            SegmentType::OptionalDynamic(name) => Some((name, Requiredness::Optional)),
            SegmentType::OptionalStatic(_) | SegmentType::Static(_) => None,
        })
        .collect();

    Ok(shape)
}

/// Names of every parameter in a pattern, without requiredness
pub fn path_params(pattern: &str) -> Result<BTreeSet<String>> {
    Ok(parse_pattern(pattern)?
        .iter()
        .filter_map(|segment| segment.param_name().map(str::to_string))
        .collect())
}

/// Merged own params of every ancestor, walking to the root
pub fn ancestor_params(routes: &FlatRoutes, id: &str) -> Result<ParamShape> {
    let mut shape = ParamShape::new();

    for ancestor in routes.ancestors(id)? {
        shape = shape.merged(&ancestor.params);
    }

    Ok(shape)
}

/// Alternative shapes contributed below a route, each merged with `base`
///
/// A leaf contributes only the empty shape. For every child, the union
/// contains `base` itself (the child is not mounted) and `base` merged with
/// the child's own params and each shape below that child.
pub fn descendant_params(routes: &FlatRoutes, id: &str, base: &ParamShape) -> Result<ParamsUnion> {
    let route = routes.require(id)?;

    if route.child_ids.is_empty() {
        return Ok(ParamsUnion::single(ParamShape::new()));
    }

    let mut union = ParamsUnion::new();
    for child_id in &route.child_ids {
        let child = routes.require(child_id)?;
        union.insert(base.clone());

        for below in descendant_params(routes, child_id, base)? {
            union.insert(base.clone().merged(&child.params).merged(&below));
        }
    }

    Ok(union)
}

/// Every parameter shape a route can observe
///
/// Ancestor and own params are always present; descendant params appear as
/// separate alternatives.
pub fn params(routes: &FlatRoutes, id: &str) -> Result<ParamsUnion> {
    let route = routes.require(id)?;
    let base = ancestor_params(routes, id)?.merged(&route.params);

    Ok(descendant_params(routes, id, &base)?
        .into_iter()
        .map(|below| base.clone().merged(&below))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use Requiredness::{Optional, Required};

    #[test]
    fn test_set_params_static() {
        assert!(set_params("one/two/three").unwrap().is_empty());
    }

    #[test]
    fn test_set_params_splat_only() {
        let shape = set_params("*").unwrap();
        assert_eq!(shape, ParamShape::new().with("*", Required));
    }

    #[test]
    fn test_path_params() {
        let names = path_params("one/:two/*").unwrap();
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["*".to_string(), "two".to_string()]
        );
    }

    #[test]
    fn test_merge_prefers_required() {
        let shape = ParamShape::new().with("id", Optional).with("id", Required);
        assert_eq!(shape.get("id"), Some(Required));
    }

    #[test]
    fn test_union_merged() {
        let union: ParamsUnion = [
            ParamShape::new().with("a", Required),
            ParamShape::new().with("a", Required).with("b", Required),
        ]
        .into_iter()
        .collect();

        let merged = union.merged();
        assert_eq!(merged.get("a"), Some(Required));
        assert_eq!(merged.get("b"), Some(Optional));
    }

    #[test]
    fn test_display_shape() {
        let shape = ParamShape::new().with("id", Required).with("tab", Optional);
        assert_eq!(shape.to_string(), "{ id: string; tab?: string }");
        assert_eq!(ParamShape::new().to_string(), "{}");
    }
}
