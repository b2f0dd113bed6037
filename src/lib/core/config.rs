use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::{KwameError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
    /// Inactivity expiry in seconds. `None` keeps the cookie for the browser session.
    pub expiry_secs: Option<i64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "kwame_session".to_string(),
            secure: false,
            expiry_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KwameConfig {
    pub template_folder: PathBuf,
    pub static_folder: PathBuf,
    pub host: String,
    pub port: u16,
    /// `None` disables the database even when the `storage` feature is on.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub session: SessionConfig,
}

impl Default for KwameConfig {
    fn default() -> Self {
        Self {
            template_folder: PathBuf::from("templates"),
            static_folder: PathBuf::from("static"),
            host: "127.0.0.1".to_string(),
            port: 8000,
            database_url: Some("sqlite://./test.db".to_string()),
            max_connections: 5,
            session: SessionConfig::default(),
        }
    }
}

impl KwameConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `KWAME_*` keys.
    /// An empty `DATABASE_URL` disables the database.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(folder) = lookup("KWAME_TEMPLATE_FOLDER") {
            config.template_folder = PathBuf::from(folder);
        }
        if let Some(folder) = lookup("KWAME_STATIC_FOLDER") {
            config.static_folder = PathBuf::from(folder);
        }
        if let Some(host) = lookup("KWAME_HOST") {
            config.host = host;
        }
        if let Some(port) = parse_var(&lookup, "KWAME_PORT")? {
            config.port = port;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = (!url.trim().is_empty()).then_some(url);
        }
        if let Some(max) = parse_var(&lookup, "KWAME_MAX_CONNECTIONS")? {
            config.max_connections = max;
        }
        if let Some(name) = lookup("KWAME_SESSION_COOKIE") {
            config.session.cookie_name = name;
        }
        if let Some(secure) = parse_var(&lookup, "KWAME_SESSION_SECURE")? {
            config.session.secure = secure;
        }
        if let Some(secs) = parse_var(&lookup, "KWAME_SESSION_EXPIRY_SECS")? {
            config.session.expiry_secs = Some(secs);
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| KwameError::Config(format!("{key}={raw}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_development_server() {
        let config = KwameConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, KwameConfig::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.template_folder, PathBuf::from("templates"));
    }

    #[test]
    fn env_overrides_apply() {
        let config = KwameConfig::from_lookup(lookup_from(&[
            ("KWAME_HOST", "0.0.0.0"),
            ("KWAME_PORT", "9090"),
            ("KWAME_SESSION_COOKIE", "sid"),
            ("KWAME_SESSION_SECURE", "true"),
            ("KWAME_SESSION_EXPIRY_SECS", "3600"),
            ("DATABASE_URL", "sqlite://./other.db"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:9090");
        assert_eq!(config.session.cookie_name, "sid");
        assert!(config.session.secure);
        assert_eq!(config.session.expiry_secs, Some(3600));
        assert_eq!(config.database_url.as_deref(), Some("sqlite://./other.db"));
    }

    #[test]
    fn empty_database_url_disables_storage() {
        let config = KwameConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn bad_booleans_are_config_errors() {
        let err = KwameConfig::from_lookup(lookup_from(&[("KWAME_SESSION_SECURE", "yes")])).unwrap_err();
        assert!(matches!(err, KwameError::Config(msg) if msg.contains("KWAME_SESSION_SECURE")));
    }

    #[test]
    fn bad_numbers_are_config_errors() {
        let err = KwameConfig::from_lookup(lookup_from(&[("KWAME_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, KwameError::Config(msg) if msg.contains("KWAME_PORT")));
    }
}
