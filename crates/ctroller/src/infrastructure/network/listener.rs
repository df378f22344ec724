//! UDP listener for handheld datagrams.
//!
//! The listener binds one UDP socket and accepts datagrams from whichever
//! peer sends them; there is no handshake and nothing is ever sent back.
//!
//! # Receive timeout
//!
//! Each `recv` waits at most `receive_timeout`.  A timeout is reported as
//! [`ListenerEvent::Timeout`] rather than an error: the handheld may simply
//! be asleep, and the caller uses the event to return its devices to rest.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ctroller_core::PACKET_SIZE;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::info;

/// Default UDP port the handheld streams to.
pub const DEFAULT_PORT: u16 = 15708;

/// Default receive timeout before devices are reset.
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Large enough that oversized datagrams arrive whole and are rejected by
/// length instead of being silently truncated to a valid size.
pub const RECV_BUFFER_SIZE: usize = PACKET_SIZE * 16;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The UDP socket could not be bound.
    #[error("failed to bind UDP socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// An I/O error occurred while receiving a datagram.
    #[error("recv error: {0}")]
    Recv(#[source] std::io::Error),
}

/// Where and how to listen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    pub receive_timeout: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
        }
    }
}

impl ListenerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

/// Outcome of one receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerEvent {
    /// `len` bytes were written to the front of the caller's buffer.
    Datagram { len: usize, peer: SocketAddr },
    /// Nothing arrived within the receive timeout.
    Timeout,
}

/// A bound UDP socket with a receive timeout.
pub struct PacketListener {
    socket: UdpSocket,
    receive_timeout: Duration,
}

impl PacketListener {
    /// Binds the socket described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::BindFailed`] if the address is in use or not
    /// local.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr = config.socket_addr();
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| ListenerError::BindFailed { addr, source })?;
        let local = socket.local_addr().unwrap_or(addr);
        info!("listening for handheld datagrams on UDP {local}");
        Ok(Self {
            socket,
            receive_timeout: config.receive_timeout,
        })
    }

    /// The bound address (useful when binding port 0).
    ///
    /// # Errors
    ///
    /// Propagates the OS error from `getsockname`.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Waits for the next datagram, at most one receive timeout.
    ///
    /// Cancel-safe: dropping the future before completion loses no datagram.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Recv`] on a socket error.
    pub async fn recv(&self, buf: &mut [u8]) -> Result<ListenerEvent, ListenerError> {
        match tokio::time::timeout(self.receive_timeout, self.socket.recv_from(buf)).await {
            Ok(Ok((len, peer))) => Ok(ListenerEvent::Datagram { len, peer }),
            Ok(Err(e)) => Err(ListenerError::Recv(e)),
            Err(_elapsed) => Ok(ListenerEvent::Timeout),
        }
    }
}
