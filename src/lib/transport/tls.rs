use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::core::error::Result;

pub async fn configure_tls(cert_path: PathBuf, key_path: PathBuf) -> Result<RustlsConfig> {
    // ring and aws-lc-rs are both linked, so rustls cannot pick a default on its own.
    tokio_rustls::rustls::crypto::ring::default_provider()
        .install_default()
        .ok();
    Ok(RustlsConfig::from_pem_file(cert_path, key_path).await?)
}

pub async fn serve_tls(addr: SocketAddr, config: RustlsConfig, app: Router) -> Result<()> {
    axum_server::bind_rustls(addr, config)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::KwameError;

    #[tokio::test]
    async fn missing_pem_files_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = configure_tls(dir.path().join("cert.pem"), dir.path().join("key.pem"))
            .await
            .unwrap_err();
        assert!(matches!(err, KwameError::Io(_)));
    }
}
