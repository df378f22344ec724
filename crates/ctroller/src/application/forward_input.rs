//! ForwardInputUseCase: decodes handheld datagrams and dispatches them to the devices.
//!
//! The use case tracks whether a handheld is currently streaming.  The first
//! good datagram after a silence logs a connect; the first receive timeout
//! after packets were flowing resets every device to rest by dispatching the
//! neutral snapshot.  Later timeouts are quiet.
//!
//! Silence is measured from the last datagram that decoded.  A stream of
//! malformed datagrams keeps the socket busy but still counts as silence, so
//! the reset fires once `reset_after` has passed without a valid packet.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use ctroller_core::{decode_datagram, DecodeError, HidSnapshot, ProtocolVersion};
use tracing::{debug, info, warn};

use crate::application::registry::{DeviceRegistry, WriteError};

/// Whether a handheld is currently streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No datagram since startup or since the last timeout.
    Waiting,
    /// Datagrams are arriving from `peer`.
    Streaming {
        peer: SocketAddr,
        version: ProtocolVersion,
    },
}

/// The Forward Input use case.
pub struct ForwardInputUseCase {
    registry: DeviceRegistry,
    link: LinkState,
    current: HidSnapshot,
    reset_after: Duration,
    last_valid: Option<Instant>,
}

impl ForwardInputUseCase {
    /// `reset_after` is how long valid packets may be absent before every
    /// device is returned to rest; normally the listener's receive timeout.
    pub fn new(registry: DeviceRegistry, reset_after: Duration) -> Self {
        Self {
            registry,
            link: LinkState::Waiting,
            current: HidSnapshot::neutral(),
            reset_after,
            last_valid: None,
        }
    }

    /// Decodes `bytes` and dispatches the snapshot to every device.
    ///
    /// Returns the per-device write failures (already logged by the registry).
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the datagram is malformed.  The snapshot is
    /// not dispatched; if no valid packet arrived within `reset_after`, the
    /// devices are reset to rest as on a timeout.
    pub fn handle_datagram(
        &mut self,
        bytes: &[u8],
        peer: SocketAddr,
    ) -> Result<Vec<WriteError>, DecodeError> {
        self.handle_datagram_at(bytes, peer, Instant::now())
    }

    /// [`handle_datagram`](Self::handle_datagram) with an explicit arrival time.
    ///
    /// # Errors
    ///
    /// Same as [`handle_datagram`](Self::handle_datagram).
    pub fn handle_datagram_at(
        &mut self,
        bytes: &[u8],
        peer: SocketAddr,
        now: Instant,
    ) -> Result<Vec<WriteError>, DecodeError> {
        let snapshot = match decode_datagram(bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.reset_if_silent(now);
                return Err(e);
            }
        };
        self.last_valid = Some(now);
        self.note_packet(peer, snapshot.version);
        self.current = snapshot;
        Ok(self.registry.dispatch(&self.current))
    }

    /// Handles a receive timeout.
    ///
    /// Returns `true` when the neutral snapshot was dispatched, which happens
    /// once per disconnect.
    pub fn handle_timeout(&mut self) -> bool {
        self.reset_to_rest()
    }

    fn reset_if_silent(&mut self, now: Instant) {
        let Some(last) = self.last_valid else {
            return;
        };
        if matches!(self.link, LinkState::Streaming { .. })
            && now.saturating_duration_since(last) >= self.reset_after
        {
            self.reset_to_rest();
        }
    }

    fn reset_to_rest(&mut self) -> bool {
        match self.link {
            LinkState::Streaming { peer, .. } => {
                info!("no packets from {peer}; resetting devices to rest");
                self.link = LinkState::Waiting;
                self.current = HidSnapshot::neutral();
                self.registry.dispatch(&self.current);
                true
            }
            LinkState::Waiting => {
                debug!("still waiting for handheld");
                false
            }
        }
    }

    pub fn link_state(&self) -> LinkState {
        self.link
    }

    /// The last snapshot dispatched (neutral before the first packet).
    pub fn current(&self) -> &HidSnapshot {
        &self.current
    }

    /// Destroys every device.  Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.registry.shutdown();
    }

    fn note_packet(&mut self, peer: SocketAddr, version: ProtocolVersion) {
        match self.link {
            LinkState::Streaming { peer: known, .. } if known == peer => return,
            LinkState::Streaming { peer: known, .. } => {
                info!("handheld moved from {known} to {peer}");
            }
            LinkState::Waiting => {
                info!("handheld connected from {peer} (protocol {version})");
            }
        }
        if version.differs_from_local() {
            warn!(
                "handheld speaks protocol {version}, this host speaks {}; continuing anyway",
                ProtocolVersion::LOCAL
            );
        }
        self.link = LinkState::Streaming { peer, version };
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
