use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::router::Router;

/// Accepts connections and hands each one to its own task.
///
/// Admission is bounded by a semaphore: once `max_connections` loops are in
/// flight, further connections queue in the accept backlog until a slot
/// frees up.
pub struct Server {
    listener: TcpListener,
    cfg: ServerConfig,
    router: Arc<dyn Router>,
    limiter: Arc<Semaphore>,
}

impl Server {
    pub async fn bind(cfg: ServerConfig, router: Arc<dyn Router>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&cfg.listen_addr).await?;
        info!("listening on {}", listener.local_addr()?);

        let limiter = Arc::new(Semaphore::new(cfg.max_connections));
        Ok(Self {
            listener,
            cfg,
            router,
            limiter,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until `shutdown` fires, then drains.
    ///
    /// In-flight connection loops get the configured grace period to finish;
    /// whatever remains is aborted, which drops the sockets and unblocks any
    /// pending read.
    pub async fn run(self, mut shutdown: oneshot::Receiver<()>) -> anyhow::Result<()> {
        let mut workers = JoinSet::new();

        loop {
            tokio::select! {
                admitted = self.admit() => {
                    let (permit, socket, peer) = match admitted {
                        Ok(next) => next,
                        Err(e) => {
                            error!(error = %e, "accept failed");
                            continue;
                        }
                    };

                    info!(%peer, "accepted connection");
                    let router = Arc::clone(&self.router);
                    let read_timeout = self.cfg.read_timeout();

                    workers.spawn(async move {
                        let _permit = permit;
                        let mut conn = Connection::new(socket, router, read_timeout);
                        if let Err(e) = conn.run().await {
                            error!(%peer, error = %e, "connection error");
                        }
                    });
                }

                _ = &mut shutdown => break,
            }

            // Reap finished loops so the set doesn't grow with connection
            // count.
            while workers.try_join_next().is_some() {}
        }

        drop(self.listener); // stop accepting
        info!("draining {} in-flight connections", workers.len());

        let drain = async {
            while workers.join_next().await.is_some() {}
        };
        if timeout(self.cfg.shutdown_grace(), drain).await.is_err() {
            warn!(
                "grace period elapsed, aborting {} connections",
                workers.len()
            );
            workers.shutdown().await;
        }

        info!("server stopped");
        Ok(())
    }

    async fn admit(&self) -> anyhow::Result<(OwnedSemaphorePermit, TcpStream, SocketAddr)> {
        let permit = Arc::clone(&self.limiter).acquire_owned().await?;
        let (socket, peer) = self.listener.accept().await?;
        Ok((permit, socket, peer))
    }
}
