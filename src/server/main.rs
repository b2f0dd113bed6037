use kwame::{controllers, Kwame, KwameConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    #[cfg(feature = "tracing")]
    {
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
            .init();
    }

    let config = KwameConfig::from_env()?;
    let mut kwame = Kwame::new(config).await?;
    controllers::register(&mut kwame)?;

    match (std::env::var("KWAME_TLS_CERT"), std::env::var("KWAME_TLS_KEY")) {
        (Ok(cert), Ok(key)) => kwame.serve_tls(cert.into(), key.into()).await?,
        _ => kwame.serve().await?,
    }
    Ok(())
}
