/// Code generation: route table → Rust module
///
/// Emits the computed tables as Rust items so misrouting is caught by the
/// compiler of the consuming crate:
/// - `RouteId` enum with `as_str`, `from_id`, `parent` and `ALL`
/// - per-route `paths()` tables plus `ABSOLUTE_PATHS`
/// - one params struct per route, built from the merged param shape
///   (required → `String`, optional → `Option<String>`)

use std::collections::{HashMap, HashSet};

use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};
use tracing::debug;

use crate::config::CodegenConfig;
use crate::error::{Result, RouteError};
use crate::params::{ParamShape, Requiredness};
use crate::route::normalize::{INDEX_SEGMENT, LAYOUT_SEGMENT};
use crate::table::RouteTable;

/// Keywords that cannot be written as raw identifiers
const PATH_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

/// One generated route: id, Rust names and merged params
struct RouteItem {
    id: String,
    variant: Ident,
    parent: Option<String>,
    fields: Vec<ParamField>,
    shape: ParamShape,
}

struct ParamField {
    param: String,
    name: String,
    ident: Ident,
    requiredness: Requiredness,
}

/// Generates the Rust module for a route table
///
/// The module name must be a plain Rust identifier.
///
/// # Examples
///
/// ```
/// use typesafe_router::codegen::generate;
/// use typesafe_router::config::CodegenConfig;
/// use typesafe_router::{RouteInput, RouteTable};
///
/// let table = RouteTable::new(&[RouteInput::path("/").with_children([
///     RouteInput::path("users/:userId"),
/// ])])
/// .unwrap();
///
/// let source = generate(&table, &CodegenConfig::default()).unwrap();
/// assert!(source.contains("pub enum RouteId"));
/// assert!(source.contains("pub struct UsersUserIdParams"));
/// assert!(source.contains("user_id"));
/// ```
pub fn generate(table: &RouteTable, config: &CodegenConfig) -> Result<String> {
    let module = syn::parse_str::<Ident>(&config.module_name)
        .map_err(|_| RouteError::InvalidIdentifier(config.module_name.clone()))?;
    let items = route_items(table)?;

    let route_id = route_id_tokens(&items, table, config)?;

    let absolute = if config.emit_paths {
        let paths: Vec<&str> = table.absolute_paths()?.iter().map(String::as_str).collect();
        quote! {
            /// Absolute paths of every route
            pub const ABSOLUTE_PATHS: &[&str] = &[#(#paths),*];
        }
    } else {
        TokenStream::new()
    };

    let params = if config.emit_params {
        let structs = items.iter().map(|item| params_tokens(item, config));
        quote! {
            use std::collections::BTreeMap;

            #(#structs)*
        }
    } else {
        TokenStream::new()
    };

    let tokens = quote! {
        #[allow(dead_code)]
        pub mod #module {
            #params
            #route_id
            #absolute
        }
    };

    debug!(routes = items.len(), module = %config.module_name, "generated route module");
    Ok(format!("// @generated by typesafe-router. Do not edit by hand.\n\n{}\n", tokens))
}

fn route_items(table: &RouteTable) -> Result<Vec<RouteItem>> {
    let mut variants = HashSet::new();
    let mut items: Vec<RouteItem> = Vec::with_capacity(table.len());

    for route in table.flat().iter() {
        let variant = unique(variant_name(&route.id), &mut variants);
        let shape = table.params(&route.id)?.merged();

        let mut field_names = HashSet::new();
        let fields = shape
            .iter()
            .map(|(param, requiredness)| {
                let name = unique(field_name(param), &mut field_names);
                ParamField {
                    param: param.to_string(),
                    ident: ident(&name),
                    name,
                    requiredness,
                }
            })
            .collect();

        items.push(RouteItem {
            id: route.id.clone(),
            variant: ident(&variant),
            parent: route.parent_id.clone(),
            fields,
            shape,
        });
    }

    Ok(items)
}

fn route_id_tokens(items: &[RouteItem], table: &RouteTable, config: &CodegenConfig) -> Result<TokenStream> {
    let variant_of: HashMap<&str, &Ident> = items.iter().map(|item| (item.id.as_str(), &item.variant)).collect();

    let variants: Vec<&Ident> = items.iter().map(|item| &item.variant).collect();
    let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
    let docs: Vec<String> = items.iter().map(|item| format!(" `{}`", item.id)).collect();
    let count = items.len();

    let parents: Vec<TokenStream> = items
        .iter()
        .map(|item| match item.parent.as_deref().and_then(|id| variant_of.get(id)) {
            Some(parent) => quote!(Some(RouteId::#parent)),
            None => quote!(None),
        })
        .collect();

    let paths = if config.emit_paths {
        let mut tables = Vec::with_capacity(items.len());
        for item in items {
            let targets: Vec<&str> = table.paths(&item.id)?.iter().map(String::as_str).collect();
            tables.push(quote!(&[#(#targets),*]));
        }

        quote! {
            /// Navigation targets allowed from this route
            pub fn paths(self) -> &'static [&'static str] {
                match self {
                    #(RouteId::#variants => #tables,)*
                }
            }
        }
    } else {
        TokenStream::new()
    };

    Ok(quote! {
        /// Every route id in the table
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RouteId {
            #(
                #[doc = #docs]
                #variants,
            )*
        }

        impl RouteId {
            pub const ALL: [RouteId; #count] = [#(RouteId::#variants),*];

            pub fn as_str(self) -> &'static str {
                match self {
                    #(RouteId::#variants => #ids,)*
                }
            }

            pub fn from_id(id: &str) -> Option<RouteId> {
                RouteId::ALL.iter().copied().find(|route| route.as_str() == id)
            }

            pub fn parent(self) -> Option<RouteId> {
                match self {
                    #(RouteId::#variants => #parents,)*
                }
            }

            #paths
        }
    })
}

fn params_tokens(item: &RouteItem, config: &CodegenConfig) -> TokenStream {
    let name = format_ident!("{}Params", item.variant);
    let doc = format!(" Params of `{}`: `{}`", item.id, item.shape);

    let derives = if config.derive_serde {
        quote!(#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)])
    } else {
        quote!(#[derive(Debug, Clone, Default, PartialEq, Eq)])
    };

    let fields = item.fields.iter().map(|field| {
        let ident = &field.ident;
        let attrs = if config.derive_serde { serde_attrs(field) } else { TokenStream::new() };
        let ty = match field.requiredness {
            Requiredness::Required => quote!(String),
            Requiredness::Optional => quote!(Option<String>),
        };
        quote! {
            #attrs
            pub #ident: #ty
        }
    });

    let body = if item.fields.is_empty() {
        quote!(BTreeMap::new())
    } else {
        let inserts = item.fields.iter().map(|field| {
            let ident = &field.ident;
            let key = field.param.as_str();
            match field.requiredness {
                Requiredness::Required => quote! {
                    map.insert(#key.to_string(), self.#ident);
                },
                Requiredness::Optional => quote! {
                    if let Some(value) = self.#ident {
                        map.insert(#key.to_string(), value);
                    }
                },
            }
        });
        quote! {
            let mut map = BTreeMap::new();
            #(#inserts)*
            map
        }
    };

    quote! {
        #[doc = #doc]
        #derives
        pub struct #name {
            #(#fields),*
        }

        impl #name {
            /// Params keyed by their pattern names, ready for path building
            pub fn into_map(self) -> BTreeMap<String, String> {
                #body
            }
        }
    }
}

fn serde_attrs(field: &ParamField) -> TokenStream {
    let mut attrs = Vec::new();
    if field.name != field.param {
        let param = field.param.as_str();
        attrs.push(quote!(rename = #param));
    }
    if field.requiredness == Requiredness::Optional {
        attrs.push(quote!(default));
        attrs.push(quote!(skip_serializing_if = "Option::is_none"));
    }

    if attrs.is_empty() {
        TokenStream::new()
    } else {
        quote!(#[serde(#(#attrs),*)])
    }
}

/// Identifier for a generated name, raw when the name is a keyword
fn ident(name: &str) -> Ident {
    match syn::parse_str::<Ident>(name) {
        Ok(ident) => ident,
        Err(_) => Ident::new_raw(name, Span::call_site()),
    }
}

/// Enum variant for a route id
///
/// Each id segment becomes PascalCase words; `_` and `_index` read as
/// `Layout` and `Index`, `*` as `Splat`. Digits that would run together
/// are separated by `_`, and a leading digit gets an `R` prefix. The root
/// id is `Root`, and `Self` reads as `SelfRoute`.
pub fn variant_name(id: &str) -> String {
    let mut name = String::new();

    for segment in id.split('/').filter(|segment| !segment.is_empty()) {
        let words: Vec<String> = match segment {
            LAYOUT_SEGMENT => vec!["Layout".to_string()],
            INDEX_SEGMENT => vec!["Index".to_string()],
            "*" => vec!["Splat".to_string()],
            _ => segment
                .split(|c: char| !c.is_ascii_alphanumeric())
                .filter(|word| !word.is_empty())
                .map(pascal_word)
                .collect(),
        };

        for word in words {
            let runs_together = name.ends_with(|c: char| c.is_ascii_digit())
                && word.starts_with(|c: char| c.is_ascii_digit());
            if runs_together {
                name.push('_');
            }
            name.push_str(&word);
        }
    }

    if name.is_empty() {
        "Root".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("R{}", name)
    } else if PATH_KEYWORDS.contains(&name.as_str()) {
        format!("{}Route", name)
    } else {
        name
    }
}

fn pascal_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Struct field for a param name
///
/// `*` becomes `splat`; camelCase and separators become snake_case; a
/// leading digit gets a `p` prefix. Other keywords are emitted as raw
/// identifiers, except `self`, `super` and `crate`, which get a trailing `_`.
pub fn field_name(param: &str) -> String {
    if param == "*" {
        return "splat".to_string();
    }

    let mut name = String::new();
    let mut previous_lower = false;
    for c in param.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && previous_lower {
                name.push('_');
            }
            name.push(c.to_ascii_lowercase());
            previous_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !name.is_empty() && !name.ends_with('_') {
                name.push('_');
            }
            previous_lower = false;
        }
    }

    let name = name.trim_end_matches('_').to_string();
    if name.is_empty() {
        "param".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("p{}", name)
    } else if PATH_KEYWORDS.contains(&name.as_str()) {
        format!("{}_", name)
    } else {
        name
    }
}

/// Appends a numeric suffix until the name is unused
fn unique(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }

    let separator = if name.ends_with(|c: char| c.is_ascii_digit()) { "_" } else { "" };
    let mut counter = 2;
    loop {
        let candidate = format!("{}{}{}", name, separator, counter);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteInput;
    use pretty_assertions::assert_eq;

    /// Parses generated source and returns the items of its module
    fn module_items(source: &str) -> Vec<syn::Item> {
        let file = syn::parse_file(source).unwrap();
        match file.items.into_iter().next() {
            Some(syn::Item::Mod(module)) => module.content.map(|(_, items)| items).unwrap_or_default(),
            other => panic!("expected a module, found {:?}", other.is_some()),
        }
    }

    fn variants(items: &[syn::Item]) -> Vec<String> {
        items
            .iter()
            .find_map(|item| match item {
                syn::Item::Enum(e) if e.ident == "RouteId" => {
                    Some(e.variants.iter().map(|v| v.ident.to_string()).collect())
                }
                _ => None,
            })
            .unwrap()
    }

    fn fields(items: &[syn::Item], name: &str) -> Vec<String> {
        items
            .iter()
            .find_map(|item| match item {
                syn::Item::Struct(s) if s.ident == name => Some(
                    s.fields
                        .iter()
                        .filter_map(|field| field.ident.as_ref().map(ToString::to_string))
                        .collect(),
                ),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(variant_name("/"), "Root");
        assert_eq!(variant_name("/:id"), "Id");
        assert_eq!(variant_name("/2/_index"), "R2Index");
        assert_eq!(variant_name("/:1/_/:1-1"), "R1Layout1_1");
        assert_eq!(variant_name("/docs/*"), "DocsSplat");
        assert_eq!(variant_name("/users/:userId/edit"), "UsersUserIdEdit");
        assert_eq!(variant_name("/self"), "SelfRoute");
    }

    #[test]
    fn test_field_names() {
        assert_eq!(field_name("*"), "splat");
        assert_eq!(field_name("userId"), "user_id");
        assert_eq!(field_name("1-1"), "p1_1");
        assert_eq!(field_name("type"), "type");
        assert_eq!(field_name("self"), "self_");
    }

    #[test]
    fn test_keyword_idents_are_raw() {
        assert_eq!(ident("try").to_string(), "r#try");
        assert_eq!(ident("yield").to_string(), "r#yield");
        assert_eq!(ident("user_id").to_string(), "user_id");
    }

    #[test]
    fn test_unique_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(unique("Id".to_string(), &mut used), "Id");
        assert_eq!(unique("Id".to_string(), &mut used), "Id2");
        assert_eq!(unique("R1".to_string(), &mut used), "R1");
        assert_eq!(unique("R1".to_string(), &mut used), "R1_2");
    }

    #[test]
    fn test_generate_module() {
        let table = RouteTable::new(&[RouteInput::path("/").with_children([
            RouteInput::index(),
            RouteInput::path(":id").with_children([RouteInput::path(":tab?")]),
        ])])
        .unwrap();

        let source = generate(&table, &CodegenConfig::default()).unwrap();
        assert!(source.starts_with("// @generated"));

        let items = module_items(&source);
        assert_eq!(variants(&items), vec!["Root", "Index", "Id", "IdTab"]);
        assert_eq!(fields(&items, "IdParams"), vec!["id", "tab"]);
        assert_eq!(fields(&items, "RootParams"), vec!["id", "tab"]);

        let absolute = items.iter().any(|item| {
            matches!(item, syn::Item::Const(c) if c.ident == "ABSOLUTE_PATHS")
        });
        assert!(absolute);
        assert!(source.contains(r#""/:id/:tab""#));
    }

    #[test]
    fn test_generate_keyword_routes() {
        let table = RouteTable::new(&[RouteInput::path("/").with_children([
            RouteInput::path("self"),
            RouteInput::path("box/:try"),
            RouteInput::path("crate/:self?"),
        ])])
        .unwrap();

        let source = generate(&table, &CodegenConfig::default()).unwrap();
        let items = module_items(&source);

        assert_eq!(variants(&items), vec!["Root", "SelfRoute", "BoxTry", "CrateSelf"]);
        assert_eq!(fields(&items, "BoxTryParams"), vec!["r#try"]);
        assert_eq!(fields(&items, "CrateSelfParams"), vec!["self_"]);
        assert_eq!(fields(&items, "RootParams"), vec!["self_", "r#try"]);
    }

    #[test]
    fn test_generate_serde_and_toggles() {
        let table = RouteTable::new(&[RouteInput::path("/:user-id")]).unwrap();
        let config = CodegenConfig {
            module_name: "app_routes".to_string(),
            emit_paths: false,
            emit_params: true,
            derive_serde: true,
        };

        let source = generate(&table, &config).unwrap();
        let file = syn::parse_file(&source).unwrap();
        assert!(matches!(&file.items[0], syn::Item::Mod(m) if m.ident == "app_routes"));

        assert!(!source.contains("ABSOLUTE_PATHS"));
        assert!(!source.contains("fn paths"));
        assert!(source.contains(r#"rename = "user-id""#));
        assert_eq!(fields(&module_items(&source), "UserIdParams"), vec!["user_id"]);
    }

    #[test]
    fn test_invalid_module_name() {
        let table = RouteTable::new(&[RouteInput::path("/")]).unwrap();
        let config = CodegenConfig {
            module_name: "my-routes".to_string(),
            ..CodegenConfig::default()
        };

        assert!(matches!(
            generate(&table, &config),
            Err(RouteError::InvalidIdentifier(name)) if name == "my-routes"
        ));
    }
}
