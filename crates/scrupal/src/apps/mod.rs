//! The route tables, controllers and templates of each Scrupal client application

pub mod admin;
pub mod apidoc;

use crate::controller::ControllerRegistry;
use crate::renderer::{Renderer, TemplateFn};
use anyhow::{bail, Result};
use scrupal_router::RouteTable;

/// Names accepted by [`by_name`]
pub const APPS: [&str; 2] = ["apidoc", "admin"];

/// Everything needed to serve one application
pub struct Application {
    pub name: &'static str,
    pub table: RouteTable,
    pub controllers: ControllerRegistry,
    pub templates: Vec<(&'static str, TemplateFn)>,
}

impl Application {
    /// Register this application's templates with a renderer
    pub fn install_templates(&self, renderer: &mut Renderer) {
        for (id, template) in &self.templates {
            renderer.register(*id, *template);
        }
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("routes", &self.table.routes().len())
            .field("controllers", &self.controllers)
            .finish()
    }
}

/// Build an application by name
pub fn by_name(name: &str, case_insensitive: bool) -> Result<Application> {
    let app = match name {
        "apidoc" => apidoc::application(case_insensitive)?,
        "admin" => admin::application(case_insensitive)?,
        other => bail!("Unknown application {other:?}, expected one of {}", APPS.join(", ")),
    };
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("apidoc", false).unwrap().name, "apidoc");
        assert_eq!(by_name("admin", true).unwrap().name, "admin");
        assert!(by_name("shop", false).is_err());
    }

    #[test]
    fn test_templates_cover_routes() {
        for name in APPS {
            let app = by_name(name, false).unwrap();
            let mut renderer = Renderer::new();
            app.install_templates(&mut renderer);
            for route in app.table.routes() {
                assert!(renderer.has_template(&route.view_template), "{}", route.view_template);
            }
        }
    }
}
