//! API documentation browser
//!
//! Paths read as `/<method>/<kind>/<id>/<trait>`, each level optional.

use super::Application;
use crate::controller::{ControllerRegistry, FetchController};
use crate::renderer::{TemplateFn, ViewContext};
use crate::templates;
use maud::{html, Markup};
use scrupal_router::{Route, RouteTable, RouteTableError};
use serde_json::Value;

pub const INTRO: &str = "chunks/apidoc/intro.html";
pub const TOP: &str = "chunks/apidoc/top.html";
pub const KIND: &str = "chunks/apidoc/kind.html";
pub const ITEM: &str = "chunks/apidoc/item.html";
pub const TRAIT: &str = "chunks/apidoc/trait.html";

pub fn routes(case_insensitive: bool) -> Result<RouteTable, RouteTableError> {
    RouteTable::builder()
        .case_insensitive(case_insensitive)
        .when_route(Route::new("/", INTRO, "Intro").with_name("apidoc.intro"))
        .when_route(Route::new("/:method", TOP, "Top").with_name("apidoc.top"))
        .when_route(Route::new("/:method/:kind", KIND, "Kind").with_name("apidoc.kind"))
        .when("/:method/:kind/", KIND, "Kind")
        .when_route(Route::new("/:method/:kind/:id", ITEM, "Item").with_name("apidoc.item"))
        .when_route(Route::new("/:method/:kind/:id/:trait", TRAIT, "Trait").with_name("apidoc.trait"))
        .otherwise_redirect("/")
        .build()
}

pub fn controllers() -> ControllerRegistry {
    ControllerRegistry::new()
        .with(FetchController::get("Intro", "/doc/api", "index"))
        .with(
            FetchController::get("Top", "/doc/api/modules", "module")
                .with_param("modName")
                .with_route_method("method"),
        )
        .with(FetchController::get("Kind", "/api/sites", "sites"))
        .with(FetchController::get("Item", "/api/sites", "site").with_param("id"))
        .with(FetchController::get("Trait", "/api/entities", "entities"))
}

pub fn templates() -> Vec<(&'static str, TemplateFn)> {
    vec![
        (INTRO, intro as TemplateFn),
        (TOP, top as TemplateFn),
        (KIND, kind as TemplateFn),
        (ITEM, item as TemplateFn),
        (TRAIT, trait_view as TemplateFn),
    ]
}

pub fn application(case_insensitive: bool) -> Result<Application, RouteTableError> {
    Ok(Application {
        name: "apidoc",
        table: routes(case_insensitive)?,
        controllers: controllers(),
        templates: templates(),
    })
}

fn intro(ctx: &ViewContext<'_>) -> Markup {
    html! {
        h1 { "API Documentation" }
        div #index-placeholder {
            @match ctx.view.get("index") {
                Some(Value::String(text)) => (ctx.marked(text)),
                Some(other) => (templates::value(other)),
                None => p.empty { "The API index could not be loaded." },
            }
        }
    }
}

fn top(ctx: &ViewContext<'_>) -> Markup {
    let method = ctx.param("method").unwrap_or_default();
    html! {
        h1 { code { (method) } " requests" }
        (templates::item("Module", ctx.view.get("module")))
    }
}

fn kind(ctx: &ViewContext<'_>) -> Markup {
    let method = ctx.param("method").unwrap_or_default();
    let kind = ctx.param("kind").unwrap_or_default();
    let link_base = format!("/{}/{}", urlencoding::encode(method), urlencoding::encode(kind));
    html! {
        h1 { code { (method) } " " (kind) }
        (templates::collection("Sites", ctx.view.get("sites"), &link_base))
    }
}

fn item(ctx: &ViewContext<'_>) -> Markup {
    html! {
        h1 { (ctx.param("kind").unwrap_or_default()) " / " (ctx.param("id").unwrap_or_default()) }
        (templates::item("Site", ctx.view.get("site")))
    }
}

fn trait_view(ctx: &ViewContext<'_>) -> Markup {
    html! {
        h1 { (ctx.param("id").unwrap_or_default()) " : " (ctx.param("trait").unwrap_or_default()) }
        (templates::item("Entities", ctx.view.get("entities")))
    }
}
