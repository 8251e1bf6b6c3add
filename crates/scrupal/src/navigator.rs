// File: src/navigator.rs
// Purpose: Resolve a location, activate its controller and render its view

use crate::apps::Application;
use crate::controller::{ControllerContext, ControllerRegistry};
use crate::notify::Notifier;
use crate::renderer::Renderer;
use crate::transport::Transport;
use crate::view_model::ViewModel;
use anyhow::{bail, Result};
use scrupal_router::{location_path, RouteMatch, RouteTable};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The view installed by one navigation
#[derive(Debug, Clone)]
pub struct Page {
    /// Path navigated to, without query or fragment
    pub location: String,
    pub route_match: RouteMatch,
    pub view: ViewModel,
    pub html: String,
    /// Which navigation produced this page, starting at 1
    pub sequence: u64,
}

impl Page {
    pub fn controller(&self) -> &str {
        &self.route_match.route.controller
    }

    pub fn template(&self) -> &str {
        &self.route_match.route.view_template
    }
}

/// Drives navigation for a single client session
pub struct Navigator {
    table: Arc<RouteTable>,
    controllers: ControllerRegistry,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    renderer: Renderer,
    current: Option<Page>,
    history: Vec<String>,
    sequence: u64,
}

impl Navigator {
    /// Fails if the table names a controller the registry lacks
    pub fn new(
        table: Arc<RouteTable>,
        controllers: ControllerRegistry,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        renderer: Renderer,
    ) -> Result<Self> {
        let missing: Vec<&str> = table
            .controllers()
            .into_iter()
            .filter(|name| !controllers.contains(name))
            .collect();
        if !missing.is_empty() {
            bail!("Routes refer to unregistered controllers: {}", missing.join(", "));
        }

        Ok(Self {
            table,
            controllers,
            transport,
            notifier,
            renderer,
            current: None,
            history: Vec::new(),
            sequence: 0,
        })
    }

    /// Build a navigator for one of the bundled applications
    pub fn for_application(
        app: Application,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        mut renderer: Renderer,
    ) -> Result<Self> {
        app.install_templates(&mut renderer);
        Self::new(Arc::new(app.table), app.controllers, transport, notifier, renderer)
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Navigate to `path` and install the resulting page
    ///
    /// Unknown paths land on the fallback route; failed fetches are reported
    /// through the notifier and leave their field unbound.
    pub async fn navigate(&mut self, path: &str) -> &Page {
        self.sequence += 1;
        let sequence = self.sequence;
        let location = location_path(path).into_owned();

        let route_match = self.table.resolve(&location);
        if let Some(from) = &route_match.redirected_from {
            info!(from = %from, to = %route_match.route.pattern, "no route matched, redirecting");
        }
        debug!(
            location = %location,
            pattern = %route_match.route.pattern,
            controller = %route_match.route.controller,
            "route resolved"
        );

        info!(
            sequence,
            location = %location,
            controller = %route_match.route.controller,
            "navigating"
        );
        let view = self.activate(&route_match).await;
        let html = self
            .renderer
            .render(&route_match.route.view_template, &view, &route_match.params);

        let page = Page {
            location: location.clone(),
            route_match,
            view,
            html,
            sequence,
        };
        self.history.push(location);
        self.install(page)
    }

    pub fn current(&self) -> Option<&Page> {
        self.current.as_ref()
    }

    /// Locations navigated to, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    async fn activate(&self, route_match: &RouteMatch) -> ViewModel {
        let name = &route_match.route.controller;
        let Some(controller) = self.controllers.get(name) else {
            // Unreachable after `new` validated the table
            warn!(controller = %name, "controller not registered");
            return ViewModel::new();
        };

        let ctx = ControllerContext {
            transport: self.transport.as_ref(),
            notifier: self.notifier.as_ref(),
        };
        controller.activate(&route_match.params, &ctx).await
    }

    /// Replace the current page with the latest navigation's result
    fn install(&mut self, page: Page) -> &Page {
        debug_assert_eq!(page.sequence, self.sequence, "only the latest navigation installs");
        if let Some(previous) = &self.current {
            debug!(from = %previous.location, to = %page.location, sequence = page.sequence, "replacing page");
        }
        self.current.insert(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps;
    use crate::notify::CollectingNotifier;
    use crate::transport::MemoryTransport;
    use serde_json::json;
    use tracing_test::traced_test;

    fn admin() -> Navigator {
        Navigator::for_application(
            apps::by_name("admin", false).unwrap(),
            Arc::new(MemoryTransport::new().with_json("/api/modules", json!([]))),
            Arc::new(CollectingNotifier::new()),
            Renderer::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_each_navigation_logs_at_info() {
        let mut navigator = admin();
        navigator.navigate("/modules").await;
        navigator.navigate("/nowhere/at/all").await;

        assert!(logs_contain("INFO"));
        assert!(logs_contain("navigating"));
        assert!(logs_contain("location=/modules"));
        assert!(logs_contain("no route matched, redirecting"));
    }

    #[tokio::test]
    async fn test_sequence_increases_per_navigation() {
        let mut navigator = admin();
        assert_eq!(navigator.navigate("/").await.sequence, 1);
        assert_eq!(navigator.navigate("/modules").await.sequence, 2);
        assert_eq!(navigator.current().map(|p| p.sequence), Some(2));
    }
}
