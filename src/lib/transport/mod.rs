pub mod tls;

pub use tls::*;

use axum::Router;
use tokio::net::TcpListener;

use crate::core::error::Result;

pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}
