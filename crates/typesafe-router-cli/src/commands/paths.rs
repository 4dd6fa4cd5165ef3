use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use typesafe_router::RouteTable;

pub fn execute(file: &Path, route: Option<&str>) -> Result<()> {
    let (_, table) = super::load(file)?;
    let targets = targets(&table, route)?;

    match route {
        Some(id) => println!("{} {}", "Paths from".green().bold(), id.cyan()),
        None => println!("{}", "Absolute paths".green().bold()),
    }
    println!();
    for target in &targets {
        println!("  {}", target);
    }
    println!();
    println!("{} targets", targets.len());

    Ok(())
}

/// Every navigation target of a route, or the absolute paths when no route is given
pub fn targets(table: &RouteTable, route: Option<&str>) -> Result<Vec<String>> {
    let set = match route {
        Some(id) => table
            .paths(id)
            .with_context(|| format!("Failed to derive paths for '{}'", id))?,
        None => table.absolute_paths()?,
    };
    Ok(set.iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use typesafe_router::RouteInput;

    fn table() -> RouteTable {
        RouteTable::new(&[RouteInput::path("/").with_children([
            RouteInput::path("a").with_children([RouteInput::path("b")]),
        ])])
        .unwrap()
    }

    #[test]
    fn test_absolute_targets() {
        assert_eq!(targets(&table(), None).unwrap(), vec!["/", "/a", "/a/b"]);
    }

    #[test]
    fn test_route_targets_include_relative() {
        let targets = targets(&table(), Some("/a")).unwrap();
        assert!(targets.contains(&"b".to_string()));
        assert!(targets.contains(&"..".to_string()));
        assert!(targets.contains(&"/a/b".to_string()));
    }

    #[test]
    fn test_unknown_route() {
        let err = targets(&table(), Some("/nope")).unwrap_err();
        assert!(err.to_string().contains("/nope"));
    }
}
