//! # Scrupal Router
//!
//! A declarative view-routing table. Each route maps a URL pattern to a view
//! template and the controller that fills it:
//! - Literal segments (`/modules`)
//! - Named parameters (`/modules/:name`)
//! - An "otherwise" fallback that makes resolution total
//!
//! ## Matching
//!
//! Patterns are tested in registration order and the first match wins; there
//! is no specificity ranking. A pattern matches only a path with exactly as many
//! segments as it declares, so `/:method` never matches `/GET/modules`.
//! Trailing slashes are significant: `/:method/:kind/` is its own pattern.
//!
//! ## Example
//!
//! ```
//! use scrupal_router::RouteTable;
//!
//! let table = RouteTable::builder()
//!     .when("/", "chunks/apidoc/intro.html", "Intro")
//!     .when("/:method/:kind/:id", "chunks/apidoc/item.html", "Item")
//!     .otherwise_redirect("/")
//!     .build()
//!     .unwrap();
//!
//! let m = table.resolve("/GET/modules/core");
//! assert_eq!(m.route.controller, "Item");
//! assert_eq!(m.params.get("id"), Some(&"core".to_string()));
//!
//! let fallback = table.resolve("/nowhere/at/all/really");
//! assert_eq!(fallback.route.controller, "Intro");
//! ```

use std::collections::HashMap;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod path;
pub mod route;

pub use path::{location_path, split_segments};
pub use route::pattern::{classify_segment, parse_pattern, PatternSegment};

/// Parameters extracted from a matched URL (name → decoded segment)
pub type RouteParams = HashMap<String, String>;

// ============================================================================
// Errors
// ============================================================================

/// Problems detected while building a route table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTableError {
    #[error("route pattern must start with '/': {0:?}")]
    MissingLeadingSlash(String),

    #[error("route pattern {0:?} has a parameter with no name")]
    EmptyParamName(String),

    #[error("route pattern {pattern:?} binds parameter {param:?} more than once")]
    DuplicateParam { pattern: String, param: String },

    #[error("route name {0:?} is used by more than one route")]
    DuplicateName(String),

    #[error("route table has no otherwise route")]
    MissingOtherwise,

    #[error("otherwise redirect target {0:?} matches no registered route")]
    UnresolvableRedirect(String),
}

// ============================================================================
// Core Types
// ============================================================================

/// A single route: pattern plus the view it selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// URL pattern like "/:method/:kind"
    pub pattern: String,
    /// Identifier of the view template rendered for this route
    pub view_template: String,
    /// Name of the controller activated for this route
    pub controller: String,
    /// Optional name for reverse routing
    pub name: Option<String>,
    segments: Vec<PatternSegment>,
}

/// Result of resolving a path against a route table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// The selected route
    pub route: Route,
    /// Extracted parameters from the path
    pub params: RouteParams,
    /// Requested path, when the match came from an otherwise redirect
    pub redirected_from: Option<String>,
}

impl RouteMatch {
    /// Whether the fallback was used to produce this match
    pub fn is_fallback(&self) -> bool {
        self.redirected_from.is_some()
    }
}

/// What the table selects when no pattern matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Otherwise {
    /// Re-resolve the given path, like `otherwise({redirectTo: '/'})`
    Redirect(String),
    /// Select this route directly, with no parameters
    Route(Route),
}

// ============================================================================
// Route Implementation
// ============================================================================

impl Route {
    /// Creates a route from a pattern, view template and controller
    ///
    /// # Examples
    ///
    /// ```
    /// use scrupal_router::Route;
    ///
    /// let route = Route::new("/:method/:kind", "chunks/apidoc/kind.html", "Kind");
    /// assert_eq!(route.params(), vec!["method", "kind"]);
    /// ```
    pub fn new(
        pattern: impl Into<String>,
        view_template: impl Into<String>,
        controller: impl Into<String>,
    ) -> Self {
        let pattern = pattern.into();
        let segments = parse_pattern(&pattern);
        Route {
            pattern,
            view_template: view_template.into(),
            controller: controller.into(),
            name: None,
            segments,
        }
    }

    /// Sets a name for this route (for URL generation)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parsed pattern segments
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Parameter names in pattern order
    pub fn params(&self) -> Vec<&str> {
        self.segments.iter().filter_map(PatternSegment::param_name).collect()
    }

    /// Matches this route against a path (case-sensitive)
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        self.matches_with_options(path, false)
    }

    /// Matches this route against a path with options
    ///
    /// The path is reduced to its location part first (query and fragment
    /// dropped), then compared segment by segment.
    pub fn matches_with_options(&self, path: &str, case_insensitive: bool) -> Option<RouteParams> {
        let location = location_path(path);
        route::match_segments(&self.segments, &split_segments(&location), case_insensitive)
    }

    /// Generates a URL for this route by substituting parameters
    ///
    /// Returns `None` if a parameter the pattern needs is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrupal_router::{Route, RouteParams};
    ///
    /// let route = Route::new("/modules/:name", "chunks/admin/module.html", "Module");
    /// let mut params = RouteParams::new();
    /// params.insert("name".to_string(), "core db".to_string());
    ///
    /// assert_eq!(route.generate_url(&params).unwrap(), "/modules/core%20db");
    /// ```
    pub fn generate_url(&self, params: &RouteParams) -> Option<String> {
        let segments: Option<Vec<String>> = self
            .segments
            .iter()
            .map(|seg| match seg {
                PatternSegment::Param(name) => params
                    .get(name)
                    .filter(|v| !v.is_empty())
                    .map(|v| path::encode_segment(v).into_owned()),
                PatternSegment::Static(text) => Some(text.clone()),
            })
            .collect();

        segments.map(|segs| format!("/{}", segs.join("/")))
    }

    fn validate(&self) -> Result<(), RouteTableError> {
        if !self.pattern.starts_with('/') {
            return Err(RouteTableError::MissingLeadingSlash(self.pattern.clone()));
        }

        let mut seen = Vec::new();
        for name in self.params() {
            if name.is_empty() {
                return Err(RouteTableError::EmptyParamName(self.pattern.clone()));
            }
            if seen.contains(&name) {
                return Err(RouteTableError::DuplicateParam {
                    pattern: self.pattern.clone(),
                    param: name.to_string(),
                });
            }
            seen.push(name);
        }
        Ok(())
    }
}

// ============================================================================
// Route Table
// ============================================================================

/// Builder for [`RouteTable`]
///
/// Routes keep the order in which they are added; that order is the matching
/// order. Validation happens once, in [`RouteTableBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
    otherwise: Option<Otherwise>,
    case_insensitive: bool,
}

impl RouteTableBuilder {
    /// Registers a route built from its parts
    pub fn when(
        self,
        pattern: impl Into<String>,
        view_template: impl Into<String>,
        controller: impl Into<String>,
    ) -> Self {
        self.when_route(Route::new(pattern, view_template, controller))
    }

    /// Registers a prepared route (e.g. one carrying a name)
    pub fn when_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Falls back to re-resolving `path` when nothing matches
    pub fn otherwise_redirect(mut self, path: impl Into<String>) -> Self {
        self.otherwise = Some(Otherwise::Redirect(path.into()));
        self
    }

    /// Falls back to a dedicated route when nothing matches
    pub fn otherwise(mut self, route: Route) -> Self {
        self.otherwise = Some(Otherwise::Route(route));
        self
    }

    /// Compares literal segments ignoring ASCII case
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Validates every route and the fallback, producing an immutable table
    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut named = HashMap::new();
        for (idx, route) in self.routes.iter().enumerate() {
            route.validate()?;
            if let Some(name) = &route.name {
                if named.insert(name.clone(), idx).is_some() {
                    return Err(RouteTableError::DuplicateName(name.clone()));
                }
            }
        }

        let otherwise = self.otherwise.ok_or(RouteTableError::MissingOtherwise)?;

        let fallback = match &otherwise {
            Otherwise::Redirect(target) => find_match(&self.routes, target, self.case_insensitive)
                .ok_or_else(|| RouteTableError::UnresolvableRedirect(target.clone()))?,
            Otherwise::Route(route) => {
                route.validate()?;
                RouteMatch {
                    route: route.clone(),
                    params: RouteParams::new(),
                    redirected_from: None,
                }
            }
        };

        Ok(RouteTable {
            routes: self.routes,
            named,
            otherwise,
            fallback,
            case_insensitive: self.case_insensitive,
        })
    }
}

/// Immutable, ordered route table
///
/// Built once at startup. [`RouteTable::resolve`] is total: every input
/// selects exactly one route.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    named: HashMap<String, usize>,
    otherwise: Otherwise,
    /// Match produced by the otherwise, resolved once at build time
    fallback: RouteMatch,
    case_insensitive: bool,
}

impl RouteTable {
    /// Starts building a table
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Registered routes in matching order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The configured fallback
    pub fn otherwise(&self) -> &Otherwise {
        &self.otherwise
    }

    /// Whether literal segments ignore ASCII case
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Returns the first registered route that matches, without fallback
    pub fn match_registered(&self, path: &str) -> Option<RouteMatch> {
        find_match(&self.routes, path, self.case_insensitive)
    }

    /// Selects exactly one route for `path`
    ///
    /// Falls back to the otherwise route when no pattern matches.
    pub fn resolve(&self, path: &str) -> RouteMatch {
        if let Some(found) = self.match_registered(path) {
            return found;
        }

        RouteMatch {
            redirected_from: Some(location_path(path).into_owned()),
            ..self.fallback.clone()
        }
    }

    /// Looks up a named route
    pub fn get_route_by_name(&self, name: &str) -> Option<&Route> {
        self.named.get(name).map(|&idx| &self.routes[idx])
    }

    /// Generates a URL for a named route
    ///
    /// # Examples
    ///
    /// ```
    /// use scrupal_router::{Route, RouteTable};
    /// use std::collections::HashMap;
    ///
    /// let table = RouteTable::builder()
    ///     .when("/", "chunks/admin/index.html", "Scrupal")
    ///     .when_route(Route::new("/sites/:name", "chunks/admin/site.html", "Site").with_name("site"))
    ///     .otherwise_redirect("/")
    ///     .build()
    ///     .unwrap();
    ///
    /// let params = HashMap::from([("name".to_string(), "main".to_string())]);
    /// assert_eq!(table.url_for("site", &params).unwrap(), "/sites/main");
    /// ```
    pub fn url_for(&self, name: &str, params: &RouteParams) -> Option<String> {
        self.get_route_by_name(name)?.generate_url(params)
    }

    /// Generates a URL for a named route from borrowed pairs
    pub fn url_for_params(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let params: RouteParams = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.url_for(name, &params)
    }

    /// Every controller name the table can select, fallback included
    pub fn controllers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let fallback = match &self.otherwise {
            Otherwise::Route(route) => Some(route),
            Otherwise::Redirect(_) => None,
        };
        for route in self.routes.iter().chain(fallback) {
            if !names.contains(&route.controller.as_str()) {
                names.push(&route.controller);
            }
        }
        names
    }
}

/// First route, in order, whose pattern matches `path`
fn find_match(routes: &[Route], path: &str, case_insensitive: bool) -> Option<RouteMatch> {
    routes.iter().find_map(|route| {
        route
            .matches_with_options(path, case_insensitive)
            .map(|params| RouteMatch {
                route: route.clone(),
                params,
                redirected_from: None,
            })
    })
}
