//! Network I/O for the daemon.
//!
//! - **`listener`** – Binds the UDP port the handheld streams to and yields
//!   datagrams, or a timeout when the handheld is silent.

pub mod listener;

pub use listener::{
    ListenerConfig, ListenerError, ListenerEvent, PacketListener, RECV_BUFFER_SIZE,
    DEFAULT_PORT, DEFAULT_RECEIVE_TIMEOUT,
};
