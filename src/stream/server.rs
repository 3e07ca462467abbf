use super::{Session, StreamConfig};
use crate::conn::SeqConn;
use crate::{FrameError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{Instrument, error, info, warn};

/// Generic stream server driving one [`Session`] per accepted connection.
///
/// Connections run as independent tasks that share no mutable state; a
/// failed session is logged and never affects another connection.
///
/// # Examples
///
/// ```no_run
/// use framesrv::echo::EchoSession;
/// use framesrv::stream::{StreamConfig, StreamServer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = StreamConfig {
///         bind_addr: "127.0.0.1:8080".parse()?,
///         ..StreamConfig::default()
///     };
///     let server = StreamServer::new(config, EchoSession);
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct StreamServer<S: Session> {
    config: StreamConfig,
    session: Arc<S>,
    shutdown_signal: Arc<tokio::sync::broadcast::Sender<()>>,
}

impl<S: Session> StreamServer<S> {
    /// Creates a new stream server with the given configuration and session.
    pub fn new(config: StreamConfig, session: S) -> Self {
        let (shutdown_signal, _) = tokio::sync::broadcast::channel(1);
        Self {
            config,
            session: Arc::new(session),
            shutdown_signal: Arc::new(shutdown_signal),
        }
    }

    /// Returns a shutdown signal sender for gracefully stopping the server.
    pub fn shutdown_signal(&self) -> tokio::sync::broadcast::Sender<()> {
        self.shutdown_signal.as_ref().clone()
    }

    /// Binds the configured address and serves until shutdown.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await.map_err(|e| {
            FrameError::Config(format!("failed to bind {}: {e}", self.config.bind_addr))
        })?;
        info!(address = %self.config.bind_addr, "stream server listening");
        self.serve_on(listener).await
    }

    /// Serves connections from an already bound listener until shutdown.
    pub async fn serve_on(&self, listener: TcpListener) -> Result<()> {
        let connection_count = Arc::new(AtomicUsize::new(0));
        let mut shutdown_rx = self.shutdown_signal.subscribe();

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            let current = connection_count.load(Ordering::SeqCst);
                            if current >= self.config.max_connections {
                                warn!(%addr, current, limit = self.config.max_connections, "connection rejected: limit reached");
                                continue;
                            }

                            connection_count.fetch_add(1, Ordering::SeqCst);
                            let count = connection_count.load(Ordering::SeqCst);
                            info!(%addr, current = count, "accepted connection");

                            let session = self.session.clone();
                            let connection_count = connection_count.clone();
                            let conn = SeqConn::with_read_chunk(socket, self.config.read_chunk);
                            let span = tracing::info_span!("connection", %addr);

                            tokio::spawn(async move {
                                // the session owns the socket; returning drops it,
                                // closing the transport on every exit path
                                if let Err(e) = session.serve(conn).instrument(span).await {
                                    error!(%addr, error = %e, "error serving connection");
                                }
                                let remaining = connection_count.fetch_sub(1, Ordering::SeqCst) - 1;
                                info!(%addr, current = remaining, "connection closed");
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "failed to accept connection");
                        }
                    }
                }
                _ = signal::ctrl_c() => {
                    info!("received shutdown signal, stopping server");
                    break;
                }
                _ = shutdown_rx.recv() => {
                    info!("received internal shutdown signal, stopping server");
                    break;
                }
            }
        }

        info!("stream server stopped");
        Ok(())
    }
}
