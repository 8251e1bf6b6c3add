//! Administration views: browse modules, sites, entities, traits and types

use super::Application;
use crate::controller::{ControllerRegistry, FetchController, StaticController};
use crate::renderer::{TemplateFn, ViewContext};
use crate::templates;
use crate::view_model::ViewModel;
use maud::{html, Markup};
use scrupal_router::{Route, RouteTable, RouteTableError};
use serde_json::json;

pub const INDEX: &str = "chunks/admin/index.html";

/// One browsable resource kind
struct Kind {
    /// Path segment and view-model field of the listing, e.g. "modules"
    plural: &'static str,
    /// View-model field of a single entry, e.g. "module"
    singular: &'static str,
    list_controller: &'static str,
    item_controller: &'static str,
    list_template: &'static str,
    item_template: &'static str,
}

static KINDS: [Kind; 5] = [
    Kind {
        plural: "modules",
        singular: "module",
        list_controller: "Modules",
        item_controller: "Module",
        list_template: "chunks/admin/modules.html",
        item_template: "chunks/admin/module.html",
    },
    Kind {
        plural: "sites",
        singular: "site",
        list_controller: "Sites",
        item_controller: "Site",
        list_template: "chunks/admin/sites.html",
        item_template: "chunks/admin/site.html",
    },
    Kind {
        plural: "entities",
        singular: "entity",
        list_controller: "Entities",
        item_controller: "Entity",
        list_template: "chunks/admin/entities.html",
        item_template: "chunks/admin/entity.html",
    },
    Kind {
        plural: "traits",
        singular: "trait",
        list_controller: "Traits",
        item_controller: "Trait",
        list_template: "chunks/admin/traits.html",
        item_template: "chunks/admin/trait.html",
    },
    Kind {
        plural: "types",
        singular: "type",
        list_controller: "Types",
        item_controller: "Type",
        list_template: "chunks/admin/types.html",
        item_template: "chunks/admin/type.html",
    },
];

pub fn routes(case_insensitive: bool) -> Result<RouteTable, RouteTableError> {
    let builder = RouteTable::builder()
        .case_insensitive(case_insensitive)
        .when_route(Route::new("/", INDEX, "Scrupal").with_name("admin.index"));

    KINDS
        .iter()
        .fold(builder, |builder, kind| {
            builder
                .when_route(
                    Route::new(format!("/{}", kind.plural), kind.list_template, kind.list_controller)
                        .with_name(format!("admin.{}", kind.plural)),
                )
                .when_route(
                    Route::new(
                        format!("/{}/:modName", kind.plural),
                        kind.item_template,
                        kind.item_controller,
                    )
                    .with_name(format!("admin.{}", kind.singular)),
                )
        })
        .otherwise_redirect("/")
        .build()
}

pub fn controllers() -> ControllerRegistry {
    let registry = ControllerRegistry::new().with(StaticController::new(
        "Scrupal",
        ViewModel::new().with("owner", json!("Owner Name")),
    ));

    KINDS.iter().fold(registry, |registry, kind| {
        let prefix = format!("/api/{}", kind.plural);
        registry
            .with(FetchController::get(kind.list_controller, prefix.clone(), kind.plural))
            .with(FetchController::get(kind.item_controller, prefix, kind.singular).with_param("modName"))
    })
}

pub fn templates() -> Vec<(&'static str, TemplateFn)> {
    let mut all: Vec<(&'static str, TemplateFn)> = vec![(INDEX, index as TemplateFn)];
    for kind in &KINDS {
        all.push((kind.list_template, listing as TemplateFn));
        all.push((kind.item_template, entry as TemplateFn));
    }
    all
}

pub fn application(case_insensitive: bool) -> Result<Application, RouteTableError> {
    Ok(Application {
        name: "admin",
        table: routes(case_insensitive)?,
        controllers: controllers(),
        templates: templates(),
    })
}

fn kind_for(template: &str) -> Option<&'static Kind> {
    KINDS
        .iter()
        .find(|k| k.list_template == template || k.item_template == template)
}

fn title(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn index(ctx: &ViewContext<'_>) -> Markup {
    let owner = ctx.view.get("owner").and_then(|v| v.as_str()).unwrap_or_default();
    html! {
        h1 { "Scrupal Administration" }
        p.owner { "Owner: " (owner) }
        ul.kinds {
            @for kind in &KINDS {
                li { a href={ "/" (kind.plural) } { (title(kind.plural)) } }
            }
        }
    }
}

fn listing(ctx: &ViewContext<'_>) -> Markup {
    match kind_for(ctx.template) {
        Some(kind) => templates::collection(
            &title(kind.plural),
            ctx.view.get(kind.plural),
            &format!("/{}", kind.plural),
        ),
        None => templates::fields(ctx),
    }
}

fn entry(ctx: &ViewContext<'_>) -> Markup {
    match kind_for(ctx.template) {
        Some(kind) => html! {
            p.back { a href={ "/" (kind.plural) } { "All " (kind.plural) } }
            (templates::item(
                &format!("{} {}", title(kind.singular), ctx.param("modName").unwrap_or_default()),
                ctx.view.get(kind.singular),
            ))
        },
        None => templates::fields(ctx),
    }
}
