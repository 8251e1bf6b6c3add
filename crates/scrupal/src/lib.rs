// Scrupal - client view layer
// Route table, fetch-and-bind controllers and Maud views for the Scrupal REST API

pub mod view_model;
pub mod transport;
pub mod notify;
pub mod controller;

// Rendering
pub mod markdown;
pub mod renderer;
pub mod templates;

pub mod config;
pub mod navigator;
pub mod apps;

// Re-export Maud for templates
pub use maud::{html as maud, Markup, PreEscaped};

// Re-export routing types
pub use scrupal_router::{Otherwise, Route, RouteMatch, RouteParams, RouteTable, RouteTableError};

// Re-export framework types
pub use apps::Application;
pub use config::Config;
pub use controller::{Controller, ControllerContext, ControllerRegistry, FetchController, StaticController};
pub use markdown::MarkdownOptions;
pub use navigator::{Navigator, Page};
pub use notify::{CollectingNotifier, LogNotifier, Notification, Notifier, WriteNotifier};
pub use renderer::{Renderer, TemplateFn, ViewContext};
pub use transport::{FetchError, HttpTransport, MemoryTransport, Response, Transport};
pub use view_model::ViewModel;

// Re-export commonly used types from dependencies
pub use reqwest::Method;
