use handlebars::Handlebars;
use serde::Serialize;

use crate::core::error::Result;

/// Compiles and renders handlebars sources on every call; nothing is registered.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        Self {
            registry: Handlebars::new(),
        }
    }

    pub fn render_template(&self, template_string: &str, context: &impl Serialize) -> Result<String> {
        Ok(self.registry.render_template(template_string, context)?)
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::KwameError;
    use serde_json::json;

    #[test]
    fn renders_inline_template() {
        let renderer = HandlebarsRenderer::new();
        let out = renderer
            .render_template("<title>{{title}}</title>", &json!({ "title": "Kwame" }))
            .unwrap();
        assert_eq!(out, "<title>Kwame</title>");
    }

    #[test]
    fn escapes_html_by_default() {
        let renderer = HandlebarsRenderer::new();
        let out = renderer
            .render_template("{{v}}", &json!({ "v": "<script>" }))
            .unwrap();
        assert_eq!(out, "&lt;script&gt;");
    }

    #[test]
    fn unclosed_block_fails_to_render() {
        let renderer = HandlebarsRenderer::new();
        let err = renderer.render_template("{{#if x}}", &json!({})).unwrap_err();
        assert!(matches!(err, KwameError::Handlebars(_)));
    }
}
