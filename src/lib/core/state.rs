use std::sync::Arc;

use axum::{response::Html, Json};
use serde::Serialize;

use crate::adapters::{HandlebarsRenderer, JinjaRenderer};
use crate::core::{config::KwameConfig, error::Result};

#[cfg(feature = "storage")]
use crate::core::error::KwameError;
#[cfg(feature = "storage")]
use crate::storage::{self, sqlite::SqliteUserRepository, UserRepository};
#[cfg(feature = "storage")]
use sqlx::SqlitePool;

/// Shared handle injected into handlers through `State<KwameState>`.
#[derive(Clone)]
pub struct KwameState {
    inner: Arc<Inner>,
}

struct Inner {
    jinja: JinjaRenderer,
    handlebars: HandlebarsRenderer,
    #[cfg(feature = "storage")]
    db: Option<SqlitePool>,
}

impl KwameState {
    /// Builds both renderers and, with `storage`, connects the pool and creates the
    /// `users` table.
    pub async fn new(config: &KwameConfig) -> Result<Self> {
        #[cfg(feature = "storage")]
        let db = match &config.database_url {
            Some(url) => {
                let pool = storage::connect(url, config.max_connections).await?;
                SqliteUserRepository::new(pool.clone()).create_table().await?;
                Some(pool)
            }
            None => None,
        };

        Ok(Self {
            inner: Arc::new(Inner {
                jinja: JinjaRenderer::new(&config.template_folder),
                handlebars: HandlebarsRenderer::new(),
                #[cfg(feature = "storage")]
                db,
            }),
        })
    }

    pub fn render_jinja(&self, template_name: &str, context: impl Serialize) -> Result<Html<String>> {
        self.inner.jinja.render(template_name, context).map(Html)
    }

    pub fn render_handlebars(&self, template_string: &str, context: impl Serialize) -> Result<Html<String>> {
        self.inner
            .handlebars
            .render_template(template_string, &context)
            .map(Html)
    }

    pub fn json_response<T: Serialize>(&self, data: T) -> Json<T> {
        Json(data)
    }

    /// The pool is shared; each query checks out its own connection.
    #[cfg(feature = "storage")]
    pub fn get_db(&self) -> Result<&SqlitePool> {
        self.inner.db.as_ref().ok_or(KwameError::StorageUnavailable)
    }

    #[cfg(feature = "storage")]
    pub fn users(&self) -> Result<SqliteUserRepository> {
        self.get_db().map(|pool| SqliteUserRepository::new(pool.clone()))
    }
}
