use anyhow::Result;
use std::path::Path;
use typesafe_router::RouteTable;

pub fn execute(file: &Path) -> Result<()> {
    let (_, table) = super::load(file)?;
    println!("{}", render(&table)?);
    Ok(())
}

/// Flat routes in author order, as pretty JSON
pub fn render(table: &RouteTable) -> Result<String> {
    let routes: Vec<_> = table.flat().iter().collect();
    Ok(serde_json::to_string_pretty(&routes)?)
}
