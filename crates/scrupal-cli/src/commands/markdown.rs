use anyhow::{Context, Result};
use scrupal::{markdown, Config};
use std::fs;
use std::path::Path;

pub fn execute(config: &Config, file: &Path) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read markdown file: {:?}", file))?;

    let html = markdown::marked(&source, &config.render.markdown_options());
    println!("{}", html.into_string());

    Ok(())
}
