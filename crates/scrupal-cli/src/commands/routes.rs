use anyhow::Result;
use colored::Colorize;
use scrupal::{Config, Otherwise};

pub fn execute(config: &Config, app: Option<&str>) -> Result<()> {
    let app = super::application(config, app)?;
    let table = &app.table;

    println!("{} {}", "Routes for".green().bold(), app.name.cyan().bold());
    if table.is_case_insensitive() {
        println!("{}", "(literal segments match case-insensitively)".dimmed());
    }
    println!();

    for (i, route) in table.routes().iter().enumerate() {
        let name = route
            .name
            .as_deref()
            .map(|n| format!(" [{n}]"))
            .unwrap_or_default();
        println!(
            "{:>3}. {:<28} {:<10} {}{}",
            i + 1,
            route.pattern.yellow(),
            route.controller.cyan(),
            route.view_template,
            name.dimmed()
        );
    }

    println!();
    match table.otherwise() {
        Otherwise::Redirect(to) => println!("Otherwise: redirect to {}", to.yellow()),
        Otherwise::Route(route) => println!(
            "Otherwise: {} {}",
            route.controller.cyan(),
            route.view_template
        ),
    }

    Ok(())
}
