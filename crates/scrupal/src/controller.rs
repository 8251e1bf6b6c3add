// File: src/controller.rs
// Purpose: Controllers that fetch a REST resource and bind it into a view model

use crate::notify::{Notification, Notifier};
use crate::transport::Transport;
use crate::view_model::ViewModel;
use async_trait::async_trait;
use reqwest::Method;
use scrupal_router::RouteParams;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Collaborators a controller may use while activating
pub struct ControllerContext<'a> {
    pub transport: &'a dyn Transport,
    pub notifier: &'a dyn Notifier,
}

/// A unit activated once per navigation to produce the view's data
///
/// Activation never fails: problems are reported through the notifier and the
/// returned view model simply lacks the field.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Name routes use to refer to this controller
    fn name(&self) -> &str;

    async fn activate(&self, params: &RouteParams, ctx: &ControllerContext<'_>) -> ViewModel;
}

/// How a fetch controller picks its HTTP method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSource {
    Fixed(Method),
    /// Read the method from this route parameter
    RouteParam(String),
}

/// Methods a routed method parameter may ask for
///
/// `DELETE` is deliberately absent: like any unknown value it makes the
/// controller do nothing.
pub fn routable_method(value: &str) -> Option<Method> {
    match value {
        "GET" => Some(Method::GET),
        "PUT" => Some(Method::PUT),
        "POST" => Some(Method::POST),
        "HEAD" => Some(Method::HEAD),
        "OPTIONS" => Some(Method::OPTIONS),
        _ => None,
    }
}

/// Prefix servers put in front of JSON to defeat cross-site script inclusion
const JSON_PROTECTION_PREFIX: &str = ")]}'";

/// Turns a response body into the value bound to the view model
///
/// A leading `)]}',` line is dropped. Bodies that look like a JSON object or
/// array are parsed; an empty body binds `null` and anything else, bare JSON
/// scalars included, binds as the raw string.
pub fn parse_body(body: &str) -> Value {
    let body = strip_protection_prefix(body);
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    let json_like = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if json_like {
        if let Ok(value) = serde_json::from_str(trimmed) {
            return value;
        }
    }
    Value::String(body.to_string())
}

fn strip_protection_prefix(body: &str) -> &str {
    let Some(rest) = body.strip_prefix(JSON_PROTECTION_PREFIX) else {
        return body;
    };
    let rest = rest.strip_prefix(',').unwrap_or(rest);
    match rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) {
        Some(json) => json,
        None => body,
    }
}

/// Fetches `prefix[/param]` and binds the body to one view-model field
#[derive(Debug, Clone)]
pub struct FetchController {
    name: String,
    method: MethodSource,
    prefix: String,
    param: Option<String>,
    field: String,
}

impl FetchController {
    /// A controller issuing `GET prefix` into `field`
    pub fn get(name: impl Into<String>, prefix: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: MethodSource::Fixed(Method::GET),
            prefix: prefix.into(),
            param: None,
            field: field.into(),
        }
    }

    /// Append the value of route parameter `param` to the prefix
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Take the HTTP method from route parameter `param`
    pub fn with_route_method(mut self, param: impl Into<String>) -> Self {
        self.method = MethodSource::RouteParam(param.into());
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Request path for these params
    ///
    /// Without a configured parameter, or when the route did not bind it, the
    /// bare prefix is used.
    pub fn url(&self, params: &RouteParams) -> String {
        match self.param.as_ref().and_then(|p| params.get(p)) {
            Some(value) => format!("{}/{}", self.prefix, urlencoding::encode(value)),
            None => self.prefix.clone(),
        }
    }

    /// Method to use, or `None` when the controller should not fetch at all
    pub fn method(&self, params: &RouteParams) -> Option<Method> {
        match &self.method {
            MethodSource::Fixed(method) => Some(method.clone()),
            MethodSource::RouteParam(param) => params.get(param).and_then(|v| routable_method(v)),
        }
    }
}

#[async_trait]
impl Controller for FetchController {
    fn name(&self) -> &str {
        &self.name
    }

    async fn activate(&self, params: &RouteParams, ctx: &ControllerContext<'_>) -> ViewModel {
        let mut view = ViewModel::new();

        let Some(method) = self.method(params) else {
            debug!(controller = %self.name, "no routable method, skipping fetch");
            return view;
        };
        let url = self.url(params);

        match ctx.transport.send(method.clone(), &url).await {
            Ok(resp) if resp.is_success() => {
                debug!(controller = %self.name, %url, status = resp.status, "bound response");
                view.bind(self.field.clone(), parse_body(&resp.body));
            }
            Ok(resp) => {
                warn!(controller = %self.name, %url, status = resp.status, "request failed");
                ctx.notifier.notify(&Notification {
                    method,
                    url,
                    status: Some(resp.status),
                    headers: resp.headers,
                    body: resp.body,
                });
            }
            Err(e) => {
                warn!(controller = %self.name, %url, error = %e, "request failed");
                ctx.notifier.notify(&Notification {
                    method,
                    url,
                    status: None,
                    headers: Vec::new(),
                    body: e.to_string(),
                });
            }
        }

        view
    }
}

/// Produces the same fields on every activation, without fetching
#[derive(Debug, Clone)]
pub struct StaticController {
    name: String,
    fields: ViewModel,
}

impl StaticController {
    pub fn new(name: impl Into<String>, fields: ViewModel) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

#[async_trait]
impl Controller for StaticController {
    fn name(&self) -> &str {
        &self.name
    }

    async fn activate(&self, _params: &RouteParams, _ctx: &ControllerContext<'_>) -> ViewModel {
        self.fields.clone()
    }
}

/// Controllers by name
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Arc<dyn Controller>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller under its own name, replacing any previous one
    pub fn register(&mut self, controller: impl Controller + 'static) {
        self.controllers
            .insert(controller.name().to_string(), Arc::new(controller));
    }

    pub fn with(mut self, controller: impl Controller + 'static) -> Self {
        self.register(controller);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Controller>> {
        self.controllers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.controllers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.controllers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("controllers", &self.names())
            .finish()
    }
}
