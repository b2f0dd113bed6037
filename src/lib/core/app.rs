use std::convert::Infallible;
use std::path::PathBuf;

use axum::{
    extract::Request,
    handler::Handler,
    http::Method,
    response::{Html, IntoResponse},
    routing::{on, MethodFilter, MethodRouter, Route as AxumRoute},
    Json, Router,
};
use serde::Serialize;
use tower::{Layer, Service};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::core::{
    config::KwameConfig,
    error::{KwameError, Result},
    state::KwameState,
};
use crate::transport;

#[cfg(feature = "storage")]
use crate::adapters::session::{self, Session};
#[cfg(feature = "storage")]
use serde::de::DeserializeOwned;
#[cfg(feature = "storage")]
use sqlx::SqlitePool;

#[cfg(feature = "tracing")]
use tracing::{debug, info};

type Middleware = Box<dyn FnOnce(Router<KwameState>) -> Router<KwameState> + Send>;

struct Route {
    path: String,
    methods: Vec<Method>,
    handler: MethodRouter<KwameState>,
}

/// Builder that collects routes and middleware, then assembles an axum `Router`.
pub struct Kwame {
    config: KwameConfig,
    state: KwameState,
    routes: Vec<Route>,
    middlewares: Vec<Middleware>,
}

impl Kwame {
    pub async fn new(config: KwameConfig) -> Result<Self> {
        let state = KwameState::new(&config).await?;
        Ok(Self {
            config,
            state,
            routes: Vec::new(),
            middlewares: Vec::new(),
        })
    }

    pub fn config(&self) -> &KwameConfig {
        &self.config
    }

    pub fn state(&self) -> KwameState {
        self.state.clone()
    }

    /// Registers `handler` for `path`. An empty `methods` slice means `GET`.
    pub fn add_route<H, T>(&mut self, path: &str, handler: H, methods: &[Method]) -> Result<&mut Self>
    where
        H: Handler<T, KwameState>,
        T: 'static,
    {
        let methods = if methods.is_empty() {
            vec![Method::GET]
        } else {
            methods.to_vec()
        };
        let filter = method_filter(&methods)?;
        #[cfg(feature = "tracing")]
        debug!(path = %path, methods = ?methods, "Registered route");
        self.routes.push(Route {
            path: path.to_string(),
            methods,
            handler: on(filter, handler),
        });
        Ok(self)
    }

    /// Registers a tower layer. Layers wrap in registration order, so the last one
    /// added sees the request first.
    pub fn add_middleware<L>(&mut self, layer: L) -> &mut Self
    where
        L: Layer<AxumRoute> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.middlewares
            .push(Box::new(move |router: Router<KwameState>| router.layer(layer)));
        self
    }

    pub fn routes(&self) -> impl Iterator<Item = (&str, &[Method])> {
        self.routes
            .iter()
            .map(|route| (route.path.as_str(), route.methods.as_slice()))
    }

    pub fn create_app(self) -> Router {
        let mut router = Router::new();
        for route in self.routes {
            router = router.route(&route.path, route.handler);
        }

        for middleware in self.middlewares {
            router = middleware(router);
        }

        // Nested after the user layers, which only wrap routes that already exist.
        let static_folder: &PathBuf = &self.config.static_folder;
        if static_folder.is_dir() {
            router = router.nest_service("/static", ServeDir::new(static_folder));
        }

        let router: Router = router.with_state(self.state);

        #[cfg(feature = "storage")]
        let router = router.layer(session::session_layer(&self.config.session));

        router.layer(TraceLayer::new_for_http())
    }

    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        #[cfg(feature = "tracing")]
        info!(addr = %addr, "Kwame server started");
        transport::serve(listener, self.create_app()).await
    }

    /// `host` must be an IP literal here; name resolution is left to `serve`.
    pub async fn serve_tls(self, cert_path: PathBuf, key_path: PathBuf) -> Result<()> {
        let addr = self
            .config
            .bind_addr()
            .parse()
            .map_err(|e| KwameError::Config(format!("invalid bind address: {e}")))?;
        let tls = transport::tls::configure_tls(cert_path, key_path).await?;
        #[cfg(feature = "tracing")]
        info!(addr = %addr, "Kwame TLS server started");
        transport::tls::serve_tls(addr, tls, self.create_app()).await
    }

    pub fn render_jinja(&self, template_name: &str, context: impl Serialize) -> Result<Html<String>> {
        self.state.render_jinja(template_name, context)
    }

    pub fn render_handlebars(&self, template_string: &str, context: impl Serialize) -> Result<Html<String>> {
        self.state.render_handlebars(template_string, context)
    }

    pub fn json_response<T: Serialize>(&self, data: T) -> Json<T> {
        self.state.json_response(data)
    }

    #[cfg(feature = "storage")]
    pub fn get_db(&self) -> Result<&SqlitePool> {
        self.state.get_db()
    }

    #[cfg(feature = "storage")]
    pub async fn set_session(session: &Session, key: &str, value: impl Serialize) -> Result<()> {
        session::set_session(session, key, value).await
    }

    #[cfg(feature = "storage")]
    pub async fn get_session<T: DeserializeOwned>(session: &Session, key: &str) -> Result<Option<T>> {
        session::get_session(session, key).await
    }
}

fn method_filter(methods: &[Method]) -> Result<MethodFilter> {
    let mut combined: Option<MethodFilter> = None;
    for method in methods {
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| KwameError::Config(format!("unsupported HTTP method {method}")))?;
        combined = Some(match combined {
            Some(acc) => acc.or(filter),
            None => filter,
        });
    }
    combined.ok_or_else(|| KwameError::Config("route needs at least one method".to_string()))
}
