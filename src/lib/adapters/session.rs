use serde::{de::DeserializeOwned, Serialize};
use tower_sessions::{cookie::time::Duration, Expiry, MemoryStore, SessionManagerLayer};

pub use tower_sessions::Session;

use crate::core::{config::SessionConfig, error::Result};

/// Cookie-keyed sessions kept in process memory.
pub fn session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    let layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure);
    match config.expiry_secs {
        Some(secs) => layer.with_expiry(Expiry::OnInactivity(Duration::seconds(secs))),
        None => layer,
    }
}

pub async fn set_session(session: &Session, key: &str, value: impl Serialize) -> Result<()> {
    session.insert(key, value).await?;
    Ok(())
}

pub async fn get_session<T: DeserializeOwned>(session: &Session, key: &str) -> Result<Option<T>> {
    Ok(session.get(key).await?)
}
