use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use typesafe_router::{ParamShape, ParamsUnion, RouteTable};

pub fn execute(file: &Path, route: &str) -> Result<()> {
    let (_, table) = super::load(file)?;
    let (union, merged) = shapes(&table, route)?;

    println!("{} {}", "Params for".green().bold(), route.cyan());
    println!();
    for shape in union.iter() {
        println!("  | {}", shape);
    }
    println!();
    println!("Merged: {}", merged.to_string().yellow());

    Ok(())
}

/// The union of shapes a route renders under, and its merged form
pub fn shapes(table: &RouteTable, route: &str) -> Result<(ParamsUnion, ParamShape)> {
    let union = table.params(route)?;
    let merged = union.merged();
    Ok((union, merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use typesafe_router::RouteInput;

    #[test]
    fn test_shapes_of_parent() {
        let table = RouteTable::new(&[RouteInput::path("/").with_children([
            RouteInput::path("users/:id").with_children([RouteInput::path(":tab")]),
        ])])
        .unwrap();

        let (union, merged) = shapes(&table, "/users/:id").unwrap();
        assert_eq!(union.len(), 2);
        assert_eq!(merged.to_string(), "{ id: string; tab?: string }");
    }
}
