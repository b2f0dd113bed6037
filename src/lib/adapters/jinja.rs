use std::path::Path;

use minijinja::Environment;
use serde::Serialize;

use crate::core::error::Result;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

/// Jinja-style templates loaded lazily from a folder on disk.
pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    pub fn new(folder: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(folder.as_ref()));
        Self { env }
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self, context)))]
    pub fn render(&self, template_name: &str, context: impl Serialize) -> Result<String> {
        let template = self.env.get_template(template_name)?;
        let html = template.render(context)?;
        #[cfg(feature = "tracing")]
        debug!(template = %template_name, bytes = html.len(), "Rendered jinja template");
        Ok(html)
    }

    pub fn render_str(&self, source: &str, context: impl Serialize) -> Result<String> {
        Ok(self.env.render_str(source, context)?)
    }
}
