pub mod markdown;
pub mod navigate;
pub mod resolve;
pub mod routes;

use anyhow::Result;
use scrupal::apps::{self, Application};
use scrupal::Config;

/// The application named on the command line, else the configured one
pub fn application(config: &Config, app: Option<&str>) -> Result<Application> {
    let name = app.unwrap_or(&config.routing.app);
    apps::by_name(name, config.routing.case_insensitive)
}
