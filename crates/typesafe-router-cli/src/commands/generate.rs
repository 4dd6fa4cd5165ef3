use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use typesafe_router::codegen;

pub fn execute(file: &Path, output: Option<&Path>) -> Result<()> {
    let (config, table) = super::load(file)?;
    let source = codegen::generate(&table, &config.codegen)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
            fs::write(path, &source).with_context(|| format!("Failed to write {:?}", path))?;

            println!(
                "  {} {} routes -> {}",
                "✓".green(),
                table.len(),
                path.display().to_string().cyan()
            );
        }
        None => print!("{}", source),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_generate_to_file() {
        let dir = env::temp_dir().join(format!("typesafe-router-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let input = dir.join("routes.json");
        fs::write(&input, r#"{ "routes": [{ "path": "/", "children": [{ "path": ":id" }] }] }"#).unwrap();

        let output = dir.join("out/routes.rs");
        execute(&input, Some(&output)).unwrap();

        let source = fs::read_to_string(&output).unwrap();
        assert!(source.contains("pub mod routes"));
        assert!(source.contains("pub enum RouteId"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
