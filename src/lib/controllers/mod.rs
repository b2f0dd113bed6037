//! The demo application: a Jinja home page, an inline Handlebars page and a small
//! user API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::Method,
    response::Html,
    Json,
};
use serde_json::{json, Value};

use crate::core::{
    error::{KwameError, Result},
    Kwame, KwameState, NewUser,
};

#[cfg(feature = "storage")]
use crate::adapters::session::Session;
#[cfg(feature = "storage")]
use crate::storage::UserRepository;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, warn};

/// Session key holding the name shown on the home page.
pub const USERNAME_KEY: &str = "username";

pub const HANDLEBARS_TEMPLATE: &str = r#"
    <html>
        <head><title>{{title}}</title></head>
        <body>
            <h1>{{message}}</h1>
        </body>
    </html>
    "#;

pub fn register(kwame: &mut Kwame) -> Result<()> {
    kwame
        .add_route("/", home_controller, &[Method::GET])?
        .add_route("/handlebars", handlebars_controller, &[Method::GET])?
        .add_route("/api/create_user", api_create_user, &[Method::POST])?
        .add_route("/api/user", api_create_user, &[Method::POST])?;
    Ok(())
}

pub fn greeting(username: Option<&str>) -> String {
    let name = username.filter(|name| !name.is_empty()).unwrap_or("Guest");
    format!("Hello, {name}!")
}

pub async fn home_controller(
    State(kwame): State<KwameState>,
    #[cfg(feature = "storage")] session: Session,
) -> Result<Html<String>> {
    #[cfg(feature = "storage")]
    let username: Option<String> = Kwame::get_session(&session, USERNAME_KEY).await?;
    #[cfg(not(feature = "storage"))]
    let username: Option<String> = None;

    kwame.render_jinja("home.html", json!({ "message": greeting(username.as_deref()) }))
}

pub async fn handlebars_controller(State(kwame): State<KwameState>) -> Result<Html<String>> {
    kwame.render_handlebars(
        HANDLEBARS_TEMPLATE,
        json!({
            "title": "Handlebars Rendering in Kwame",
            "message": "This message is rendered using Handlebars on the server.",
        }),
    )
}

#[cfg_attr(feature = "tracing", instrument(skip_all))]
pub async fn api_create_user(
    State(kwame): State<KwameState>,
    #[cfg(feature = "storage")] session: Session,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(user) = payload.map_err(|rejection| KwameError::Validation(rejection.body_text()))?;

    #[cfg(feature = "storage")]
    {
        let created = kwame.users()?.insert(&user).await?;
        #[cfg(feature = "tracing")]
        debug!(id = created.id, username = %created.username, "User created");
        // The row is already committed, so a session failure only costs the greeting.
        if let Err(_err) = Kwame::set_session(&session, USERNAME_KEY, &created.username).await {
            #[cfg(feature = "tracing")]
            warn!(error = %_err, "Failed to remember user in session");
        }
    }

    Ok(kwame.json_response(json!({
        "message": "User created successfully",
        "user": user,
    })))
}
