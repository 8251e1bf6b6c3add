use anyhow::Result;
use colored::Colorize;
use scrupal::Config;

pub fn execute(config: &Config, path: &str, app: Option<&str>) -> Result<()> {
    let app = super::application(config, app)?;
    let m = app.table.resolve(path);

    println!("{}  {}", "Path:".bold(), path);
    if let Some(from) = &m.redirected_from {
        println!("{}", format!("No route matched {from}, using the fallback").yellow());
    }
    println!("{}  {}", "Route:".bold(), m.route.pattern.yellow());
    println!("{}  {}", "Controller:".bold(), m.route.controller.cyan());
    println!("{}  {}", "Template:".bold(), m.route.view_template);

    if !m.params.is_empty() {
        let mut params: Vec<_> = m.params.iter().collect();
        params.sort();
        println!("{}", "Params:".bold());
        for (name, value) in params {
            println!("  {} = {}", name.green(), value);
        }
    }

    Ok(())
}
