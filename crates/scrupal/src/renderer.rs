use crate::config::RenderConfig;
use crate::markdown::{self, MarkdownOptions};
use crate::templates;
use crate::view_model::{display_value, ViewModel};
use maud::{html, Markup};
use once_cell::sync::Lazy;
use regex::Regex;
use scrupal_router::RouteParams;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Everything a template may read
pub struct ViewContext<'a> {
    pub template: &'a str,
    pub view: &'a ViewModel,
    pub params: &'a RouteParams,
    pub markdown: &'a MarkdownOptions,
}

impl ViewContext<'_> {
    /// Render markdown the way the `marked` directive does
    pub fn marked(&self, text: &str) -> Markup {
        markdown::marked(text, self.markdown)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// A compiled-in view template
pub type TemplateFn = fn(&ViewContext<'_>) -> Markup;

/// Resolves view-template ids to HTML fragments
///
/// Lookup order: a file under `templates_dir`, then a registered template,
/// then the generic field listing.
#[derive(Clone)]
pub struct Renderer {
    templates: HashMap<String, TemplateFn>,
    templates_dir: Option<PathBuf>,
    markdown: MarkdownOptions,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            templates_dir: None,
            markdown: MarkdownOptions::default(),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            templates: HashMap::new(),
            templates_dir: config.templates_dir.clone(),
            markdown: config.markdown_options(),
        }
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }

    pub fn with_markdown(mut self, options: MarkdownOptions) -> Self {
        self.markdown = options;
        self
    }

    pub fn register(&mut self, id: impl Into<String>, template: TemplateFn) {
        self.templates.insert(id.into(), template);
    }

    pub fn with_template(mut self, id: impl Into<String>, template: TemplateFn) -> Self {
        self.register(id, template);
        self
    }

    pub fn has_template(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn markdown_options(&self) -> &MarkdownOptions {
        &self.markdown
    }

    /// Render `template` against a view model and route params
    ///
    /// Never fails: an unreadable template file is logged and skipped.
    pub fn render(&self, template: &str, view: &ViewModel, params: &RouteParams) -> String {
        if let Some(source) = self.load_file(template) {
            debug!(template, "rendering file template");
            let interpolated = self.interpolate(&source, view, params);
            return markdown::expand_marked_elements(&interpolated, &self.markdown);
        }

        let ctx = ViewContext {
            template,
            view,
            params,
            markdown: &self.markdown,
        };
        match self.templates.get(template) {
            Some(render) => render(&ctx).into_string(),
            None => {
                debug!(template, "no template registered, using field listing");
                templates::fields(&ctx).into_string()
            }
        }
    }

    fn load_file(&self, template: &str) -> Option<String> {
        let path = template_path(self.templates_dir.as_deref()?, template)?;
        if !path.is_file() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(source) => Some(source),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read template");
                None
            }
        }
    }

    /// Replace `{{ name }}` bindings with HTML-escaped values
    ///
    /// `params.x` reads route parameters, anything else a dotted view-model
    /// path. Unknown bindings render as nothing.
    fn interpolate(&self, content: &str, view: &ViewModel, params: &RouteParams) -> String {
        static BINDING: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_\.]*)\s*\}\}").unwrap()
        });

        BINDING
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                let text = match name.strip_prefix("params.") {
                    Some(param) => params.get(param).cloned().unwrap_or_default(),
                    None => view.lookup(name).map(display_value).unwrap_or_default(),
                };
                html! { (text) }.into_string()
            })
            .into_owned()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Joins a template id onto the templates directory, refusing ids that escape it
fn template_path(dir: &Path, template: &str) -> Option<PathBuf> {
    let relative = Path::new(template.trim_start_matches('/'));
    let safe = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    safe.then(|| dir.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn greeting(ctx: &ViewContext<'_>) -> Markup {
        html! { p { "Hello " (ctx.param("name").unwrap_or("nobody")) } }
    }

    #[test]
    fn test_registered_template() {
        let renderer = Renderer::new().with_template("hello.html", greeting);
        let params = RouteParams::from([("name".to_string(), "<Reid>".to_string())]);
        let out = renderer.render("hello.html", &ViewModel::new(), &params);
        assert_eq!(out, "<p>Hello &lt;Reid&gt;</p>");
    }

    #[test]
    fn test_unknown_template_lists_fields() {
        let view = ViewModel::new().with("owner", json!("Owner Name"));
        let out = Renderer::new().render("missing.html", &view, &RouteParams::new());
        assert!(out.contains("owner"));
        assert!(out.contains("Owner Name"));
    }

    #[test]
    fn test_file_template_interpolates_and_expands_marked() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("chunks/apidoc")).unwrap();
        let mut file = fs::File::create(dir.path().join("chunks/apidoc/item.html")).unwrap();
        write!(
            file,
            "<h2>{{{{ params.id }}}}</h2><p>{{{{module.name}}}} {{{{ nope }}}}</p><marked>*{{{{ module.summary }}}}*</marked>"
        )
        .unwrap();

        let renderer = Renderer::new()
            .with_templates_dir(dir.path())
            .with_template("chunks/apidoc/item.html", greeting);
        let view = ViewModel::new().with("module", json!({"name": "Core & Co", "summary": "basics"}));
        let params = RouteParams::from([("id".to_string(), "core".to_string())]);

        let out = renderer.render("chunks/apidoc/item.html", &view, &params);
        assert!(out.starts_with("<h2>core</h2><p>Core &amp; Co </p>"));
        assert!(out.contains(r#"<div class="marked"><p><em>basics</em></p>"#));
    }

    #[test]
    fn test_template_path_rejects_escape() {
        let dir = Path::new("/srv/templates");
        assert_eq!(
            template_path(dir, "chunks/apidoc/intro.html"),
            Some(PathBuf::from("/srv/templates/chunks/apidoc/intro.html"))
        );
        assert_eq!(template_path(dir, "../secrets.html"), None);
    }
}
