use anyhow::{Context, Result};
use colored::Colorize;
use scrupal::{
    Config, HttpTransport, MemoryTransport, Navigator, Notifier, Page, Renderer, Transport,
    WriteNotifier,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct Options {
    pub app: Option<String>,
    pub api: Option<String>,
    pub fixtures: Option<PathBuf>,
    pub json: bool,
}

pub fn execute(mut config: Config, paths: &[String], options: Options) -> Result<()> {
    if let Some(api) = &options.api {
        config.api.base_url = api.clone();
    }

    let app = super::application(&config, options.app.as_deref())?;
    let transport = transport(&config, options.fixtures.as_ref())?;
    let notifier: Arc<dyn Notifier> = Arc::new(WriteNotifier::stderr());
    let renderer = Renderer::from_config(&config.render);

    info!(app = app.name, transport = transport.name(), "starting navigation");
    let mut navigator = Navigator::for_application(app, transport, notifier, renderer)?;

    // One client session: navigations run one after another on a single thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        for path in paths {
            let page = navigator.navigate(path).await;
            print_page(page, options.json)?;
        }
        Ok::<(), anyhow::Error>(())
    })
}

fn transport(config: &Config, fixtures: Option<&PathBuf>) -> Result<Arc<dyn Transport>> {
    match fixtures {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read fixtures file: {:?}", path))?;
            let doc: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse fixtures file: {:?}", path))?;
            Ok(Arc::new(MemoryTransport::from_fixtures(&doc)?))
        }
        None => Ok(Arc::new(HttpTransport::new(
            &config.api.base_url,
            config.api.timeout(),
        )?)),
    }
}

fn print_page(page: &Page, json: bool) -> Result<()> {
    let mut heading = format!("{} {}", "→".green().bold(), page.location.bold());
    if page.route_match.is_fallback() {
        heading.push_str(&format!(" {}", "(fallback)".yellow()));
    }
    println!("{heading}");
    println!(
        "  {} {}  {} {}",
        "route".dimmed(),
        page.route_match.route.pattern.yellow(),
        "controller".dimmed(),
        page.controller().cyan()
    );
    println!();

    if json {
        println!("{}", serde_json::to_string_pretty(&page.view)?);
    } else {
        println!("{}", page.html);
    }
    println!();

    Ok(())
}
