use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::http::connection::{ByteStream, TcpConnection};
use crate::server::Server;

/// Source of new connections.
#[allow(async_fn_in_trait)]
pub trait Listener {
    type Conn: ByteStream;

    /// The next connection, or `None` when none is ready.
    async fn accept(&mut self) -> io::Result<Option<Self::Conn>>;
}

/// Accepts TCP connections and hands them out with a read timeout applied.
pub struct TcpAcceptor {
    listener: TcpListener,
    read_timeout: Duration,
}

impl TcpAcceptor {
    pub async fn bind(addr: &str, read_timeout: Duration) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            read_timeout,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Listener for TcpAcceptor {
    type Conn = TcpConnection;

    async fn accept(&mut self) -> io::Result<Option<TcpConnection>> {
        let (socket, peer) = self.listener.accept().await?;
        info!("Accepted connection from {}", peer);
        Ok(Some(TcpConnection::new(socket, self.read_timeout)))
    }
}

/// Binds the configured address and serves connections one after another
/// until the future is dropped.
pub async fn run(server: &Server<'_>, cfg: &Config) -> anyhow::Result<()> {
    let mut acceptor = TcpAcceptor::bind(&cfg.listen_addr, cfg.limits.read_timeout()).await?;
    info!("Listening on {}", cfg.listen_addr);

    loop {
        match server.serve_next(&mut acceptor).await {
            Ok(outcome) => debug!(?outcome, "Connection finished"),
            Err(e) => error!("Connection error: {}", e),
        }
    }
}
