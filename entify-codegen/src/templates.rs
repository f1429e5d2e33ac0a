//! Named template registry.

use std::io::Write;

use handlebars::Handlebars;
use serde::Serialize;

use crate::{Error, Result, paths::template};

/// Source of `(name, text)` template pairs.
pub trait TemplateSource {
    fn templates(&self) -> Vec<(&str, &str)>;
}

/// Go templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

const EMBEDDED: &[(&str, &str)] = &[
    (template::CLIENT, include_str!("../templates/client.go.tmpl")),
    (
        template::PREDICATE,
        include_str!("../templates/predicate/predicate.go.tmpl"),
    ),
    (
        "__entity-package__/__entity-file__.go.tmpl",
        include_str!("../templates/__entity-package__/__entity-file__.go.tmpl"),
    ),
    (
        "__entity-package__/where.go.tmpl",
        include_str!("../templates/__entity-package__/where.go.tmpl"),
    ),
    (
        "__entity-file___client.go.tmpl",
        include_str!("../templates/__entity-file___client.go.tmpl"),
    ),
    (
        "__entity-file___create.go.tmpl",
        include_str!("../templates/__entity-file___create.go.tmpl"),
    ),
    (
        "__entity-file___delete.go.tmpl",
        include_str!("../templates/__entity-file___delete.go.tmpl"),
    ),
    (
        "__entity-file___mutation.go.tmpl",
        include_str!("../templates/__entity-file___mutation.go.tmpl"),
    ),
    (
        "__entity-file___query.go.tmpl",
        include_str!("../templates/__entity-file___query.go.tmpl"),
    ),
    (
        "__entity-file___update.go.tmpl",
        include_str!("../templates/__entity-file___update.go.tmpl"),
    ),
    (
        "__entity-file__.go.tmpl",
        include_str!("../templates/__entity-file__.go.tmpl"),
    ),
];

impl TemplateSource for EmbeddedTemplates {
    fn templates(&self) -> Vec<(&str, &str)> {
        EMBEDDED.to_vec()
    }
}

/// Read-only collection of compiled templates, keyed by name.
#[derive(Debug)]
pub struct TemplateRegistry {
    engine: Handlebars<'static>,
}

impl TemplateRegistry {
    /// Compile every template of `source`.
    pub fn new(source: &dyn TemplateSource) -> Result<Self> {
        let mut engine = Handlebars::new();
        engine.set_strict_mode(true);
        engine.register_escape_fn(handlebars::no_escape);

        for (name, text) in source.templates() {
            engine
                .register_template_string(name, text)
                .map_err(|source| Error::TemplateSyntax {
                    name: name.to_string(),
                    source: Box::new(source),
                })?;
        }

        Ok(Self { engine })
    }

    /// Registry over the embedded Go templates.
    pub fn embedded() -> Result<Self> {
        Self::new(&EmbeddedTemplates)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.engine.has_template(name)
    }

    /// Template names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .engine
            .get_templates()
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Render `name` with `data` into `writer`.
    pub fn render<T: Serialize, W: Write>(&self, name: &str, data: &T, writer: W) -> Result<()> {
        if !self.contains(name) {
            return Err(Error::TemplateNotFound {
                name: name.to_string(),
            });
        }

        self.engine
            .render_to_write(name, data, writer)
            .map_err(|source| Error::TemplateRender {
                name: name.to_string(),
                source: Box::new(source),
            })
    }

    /// Render `name` into a string.
    pub fn render_to_string<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        if !self.contains(name) {
            return Err(Error::TemplateNotFound {
                name: name.to_string(),
            });
        }

        self.engine
            .render(name, data)
            .map_err(|source| Error::TemplateRender {
                name: name.to_string(),
                source: Box::new(source),
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    struct Inline(Vec<(&'static str, &'static str)>);

    impl TemplateSource for Inline {
        fn templates(&self) -> Vec<(&str, &str)> {
            self.0.clone()
        }
    }

    #[test]
    fn test_embedded_templates_compile() {
        let registry = TemplateRegistry::embedded().unwrap();
        assert_eq!(registry.names().len(), 11);
        assert!(registry.contains(template::CLIENT));
        assert!(registry.contains(template::PREDICATE));
        for name in template::ENTITY_PACKAGE.iter().chain(template::ENTITY_ROOT) {
            assert!(registry.contains(name), "{name}");
        }
    }

    #[test]
    fn test_render() {
        let registry = TemplateRegistry::new(&Inline(vec![(
            "hello.tmpl",
            "package {{package}} // {{#each names}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}",
        )]))
        .unwrap();

        let out = registry
            .render_to_string("hello.tmpl", &json!({"package": "entity", "names": ["a", "b"]}))
            .unwrap();
        assert_eq!(out, "package entity // a, b");
    }

    #[test]
    fn test_no_html_escaping() {
        let registry =
            TemplateRegistry::new(&Inline(vec![("lit.tmpl", "x := {{value}}")])).unwrap();
        let out = registry
            .render_to_string("lit.tmpl", &json!({"value": "\"\""}))
            .unwrap();
        assert_eq!(out, "x := \"\"");
    }

    #[test]
    fn test_missing_template() {
        let registry = TemplateRegistry::new(&Inline(Vec::new())).unwrap();
        let err = registry
            .render_to_string("nope.tmpl", &json!({}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TemplateNotFound);
        assert_eq!(err.to_string(), "template 'nope.tmpl' not found");
    }

    #[test]
    fn test_malformed_template() {
        let err = TemplateRegistry::new(&Inline(vec![("bad.tmpl", "{{#each items}}")])).unwrap_err();
        assert!(matches!(err, Error::TemplateSyntax { ref name, .. } if name == "bad.tmpl"));
    }

    #[test]
    fn test_strict_mode_rejects_missing_fields() {
        let registry =
            TemplateRegistry::new(&Inline(vec![("strict.tmpl", "{{missing}}")])).unwrap();
        let err = registry
            .render_to_string("strict.tmpl", &json!({}))
            .unwrap_err();
        assert!(matches!(err, Error::TemplateRender { .. }));
    }
}
