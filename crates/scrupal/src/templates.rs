//! Building blocks shared by the built-in view templates

use crate::renderer::ViewContext;
use maud::{html, Markup};
use serde_json::Value;

/// Render any JSON value as nested HTML
pub fn value(v: &Value) -> Markup {
    html! {
        @match v {
            Value::Null => em.empty { "none" },
            Value::Bool(b) => code { (b.to_string()) },
            Value::Number(n) => code { (n.to_string()) },
            Value::String(s) => span { (s) },
            Value::Array(items) => ul {
                @for item in items { li { (value(item)) } }
            },
            Value::Object(map) => dl {
                @for (k, item) in map {
                    dt { (k) }
                    dd { (value(item)) }
                }
            },
        }
    }
}

/// Display name of an entry: its `name`, else `id`, else compact JSON
pub fn entry_name(entry: &Value) -> String {
    ["name", "id"]
        .iter()
        .find_map(|key| entry.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| entry.to_string())
}

/// A titled list of entries, each linked under `link_base`
///
/// Works for both arrays of entries and objects keyed by name.
pub fn collection(title: &str, entries: Option<&Value>, link_base: &str) -> Markup {
    let named: Vec<(String, Option<&Value>)> = match entries {
        Some(Value::Array(items)) => items
            .iter()
            .map(|e| (entry_name(e), e.get("description")))
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, e)| (k.clone(), e.get("description")))
            .collect(),
        _ => Vec::new(),
    };

    html! {
        section.collection {
            h2 { (title) }
            @if named.is_empty() {
                p.empty { "Nothing to show." }
            } @else {
                ul {
                    @for (name, description) in &named {
                        li {
                            a href={ (link_base.trim_end_matches('/')) "/" (urlencoding::encode(name)) } { (name) }
                            @if let Some(Value::String(d)) = description {
                                " " span.description { (d) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// A single entry shown with all its fields
pub fn item(title: &str, entry: Option<&Value>) -> Markup {
    html! {
        section.item {
            h2 { (title) }
            @match entry {
                Some(v) => (value(v)),
                None => p.empty { "Not loaded." },
            }
        }
    }
}

/// Fallback used when no template is known: every field of the view model
pub fn fields(ctx: &ViewContext<'_>) -> Markup {
    html! {
        section.view data-template=(ctx.template) {
            @if ctx.view.is_empty() {
                p.empty { "Nothing to show." }
            }
            @for (name, v) in ctx.view.fields() {
                div.field {
                    h3 { (name) }
                    (value(v))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_nested() {
        let out = value(&json!({"name": "Core", "tags": ["a", null]})).into_string();
        assert_eq!(
            out,
            r#"<dl><dt>name</dt><dd><span>Core</span></dd><dt>tags</dt><dd><ul><li><span>a</span></li><li><em class="empty">none</em></li></ul></dd></dl>"#
        );
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(entry_name(&json!({"name": "Core", "id": 3})), "Core");
        assert_eq!(entry_name(&json!({"id": "main"})), "main");
        assert_eq!(entry_name(&json!(7)), "7");
    }

    #[test]
    fn test_collection_links_entries() {
        let modules = json!([{"name": "Core", "description": "basics"}, {"name": "My Db"}]);
        let out = collection("Modules", Some(&modules), "/modules/").into_string();
        assert!(out.contains(r#"<a href="/modules/Core">Core</a> <span class="description">basics</span>"#));
        assert!(out.contains(r#"<a href="/modules/My%20Db">My Db</a>"#));
    }

    #[test]
    fn test_collection_from_object() {
        let sites = json!({"main": {"description": "Main site"}});
        let out = collection("Sites", Some(&sites), "/sites").into_string();
        assert!(out.contains(r#"<a href="/sites/main">main</a>"#));
    }

    #[test]
    fn test_empty_collection_and_item() {
        assert!(collection("Types", None, "/types").into_string().contains("Nothing to show."));
        assert!(item("Type", None).into_string().contains("Not loaded."));
    }
}
