use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket as StdUdpSocket},
    sync::Arc,
    thread,
    time::Instant,
};

use tokio::{net::UdpSocket, sync::watch};

use crate::{
    error::{Error, Result},
    router::{PacketRouter, ReceiverState, StateCell},
};

/// Binds the listening socket, trying IPv4 then IPv6.
pub fn bind_listener(port: u16) -> Result<StdUdpSocket> {
    let candidates = [
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)),
    ];
    let mut last_err = None;
    for addr in candidates {
        match StdUdpSocket::bind(addr) {
            Ok(socket) => {
                tracing::info!(%addr, "listening for board datagrams");
                return Ok(socket);
            }
            Err(e) => {
                tracing::warn!(%addr, error = %e, "falling over to next possible address");
                last_err = Some(e);
            }
        }
    }
    Err(Error::SocketBind {
        port,
        source: last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::AddrNotAvailable)),
    })
}

/// Handle to the receive thread. Dropping it shuts the loop down.
#[derive(Debug)]
pub struct ReceiverHandle {
    shutdown: watch::Sender<bool>,
    thread: Option<thread::JoinHandle<()>>,
    state: Arc<StateCell>,
    local_addr: SocketAddr,
}

impl ReceiverHandle {
    pub fn state(&self) -> ReceiverState {
        self.state.get()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Closes the socket and waits for the loop to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(t) = self.thread.take() {
            if t.join().is_err() {
                tracing::error!("receiver thread panicked");
            }
        }
    }
}

impl Drop for ReceiverHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Starts the receive loop on its own thread with a current-thread runtime.
/// When `metrics_addr` is set, `/metrics` is served from the same runtime.
pub fn spawn(
    socket: StdUdpSocket,
    router: PacketRouter,
    metrics_addr: Option<SocketAddr>,
) -> Result<ReceiverHandle> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
        .map_err(Error::Runtime)?;
    socket.set_nonblocking(true).map_err(Error::Runtime)?;
    let local_addr = socket.local_addr().map_err(Error::Runtime)?;

    let (shutdown, rx) = watch::channel(false);
    let state = router.state();
    state.set(ReceiverState::Listening);

    let thread = thread::Builder::new()
        .name("sdp-receiver".into())
        .spawn(move || {
            rt.block_on(async move {
                if let Some(addr) = metrics_addr {
                    tokio::spawn(serve_metrics(addr, router.metrics().router()));
                }
                match UdpSocket::from_std(socket) {
                    Ok(socket) => receive_loop(socket, &router, rx).await,
                    Err(e) => tracing::error!(error = %e, "failed to register receiver socket"),
                }
                router.state().set(ReceiverState::Closed);
            });
        })
        .map_err(Error::Runtime)?;

    Ok(ReceiverHandle {
        shutdown,
        thread: Some(thread),
        state,
        local_addr,
    })
}

async fn receive_loop(socket: UdpSocket, router: &PacketRouter, mut shutdown: watch::Receiver<bool>) {
    let state = router.state();
    let mut buf = vec![0u8; sdp::MTU];
    loop {
        state.set(ReceiverState::Listening);
        tokio::select! {
            _ = shutdown.changed() => {
                tracing::info!("receiver shutting down");
                break;
            }
            res = socket.recv_from(&mut buf) => match res {
                Ok((n, source)) => {
                    router.route(&buf[..n], source, Instant::now());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "socket receive failed, receiver exiting");
                    break;
                }
            }
        }
    }
}

async fn serve_metrics(addr: SocketAddr, app: axum::Router) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::warn!(%addr, error = %e, "metrics listener unavailable");
            return;
        }
    };
    tracing::info!(%addr, "serving metrics");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::warn!(error = %e, "metrics server stopped");
    }
}
