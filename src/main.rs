use std::sync::Arc;

use courier::config::Config;
use courier::router::SimpleRouter;
use courier::server::Server;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let server = Server::bind(cfg.server, Arc::new(SimpleRouter)).await?;
    let (stop_tx, stop_rx) = oneshot::channel();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            let _ = stop_tx.send(());
        }
    });

    server.run(stop_rx).await
}
