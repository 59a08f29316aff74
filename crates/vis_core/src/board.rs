use std::{
    io,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket},
    sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;

/// Return path to the remote board.
///
/// The board is never configured with a port: the first datagram it sends
/// supplies it. An address given up front is kept; otherwise the source of
/// that first datagram is used too.
#[derive(Debug)]
pub struct BoardLink {
    inner: Mutex<Inner>,
    address_set: AtomicBool,
    latched: AtomicBool,
}

#[derive(Debug, Default)]
struct Inner {
    ip: Option<IpAddr>,
    port: Option<u16>,
    socket: Option<UdpSocket>,
}

impl BoardLink {
    pub fn new(ip: Option<IpAddr>) -> Self {
        Self {
            address_set: AtomicBool::new(ip.is_some()),
            latched: AtomicBool::new(false),
            inner: Mutex::new(Inner {
                ip,
                ..Inner::default()
            }),
        }
    }

    pub fn address_known(&self) -> bool {
        self.address_set.load(Ordering::Acquire)
    }

    pub fn port_known(&self) -> bool {
        self.latched.load(Ordering::Acquire)
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        let inner = self.inner.lock();
        Some(SocketAddr::new(inner.ip?, inner.port?))
    }

    /// Records the source of a received datagram. Returns the peer when this
    /// call completed the return path.
    pub fn observe(&self, source: SocketAddr) -> io::Result<Option<SocketAddr>> {
        if self.port_known() {
            return Ok(None);
        }
        let mut inner = self.inner.lock();
        if inner.port.is_some() {
            return Ok(None);
        }
        let ip = *inner.ip.get_or_insert(source.ip());
        let peer = SocketAddr::new(ip, source.port());
        inner.socket = Some(open_sender(peer)?);
        inner.port = Some(peer.port());
        self.address_set.store(true, Ordering::Release);
        self.latched.store(true, Ordering::Release);
        Ok(Some(peer))
    }

    /// Sends to the board. Returns `false` without sending while the peer is unknown.
    pub fn send(&self, bytes: &[u8]) -> io::Result<bool> {
        let inner = self.inner.lock();
        match &inner.socket {
            Some(socket) => socket.send(bytes).map(|_| true),
            None => Ok(false),
        }
    }
}

fn open_sender(peer: SocketAddr) -> io::Result<UdpSocket> {
    let unspecified: IpAddr = match peer {
        SocketAddr::V4(_) => Ipv4Addr::UNSPECIFIED.into(),
        SocketAddr::V6(_) => Ipv6Addr::UNSPECIFIED.into(),
    };
    let socket = UdpSocket::bind(SocketAddr::new(unspecified, 0))?;
    socket.connect(peer)?;
    Ok(socket)
}
