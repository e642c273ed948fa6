// ABOUTME: Session state, configuration and service-loop outcome types
// ABOUTME: Options follow the builder style with sensible defaults

use crate::codec::{DEFAULT_MAX_PDU_LENGTH, HEADER_LEN};
use crate::datatypes::{BindType, CommandId};
use std::fmt;
use std::time::Duration;

/// SMPP v3.4 session states (section 2.3)
///
/// ```text
/// CLOSED → OPEN → BOUND_RX / BOUND_TX / BOUND_TRX
///            ↑______________ unbind ______|
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection
    Closed,
    /// Connected, not yet bound
    Open,
    BoundReceiver,
    BoundTransmitter,
    BoundTransceiver,
}

impl SessionState {
    pub fn is_bound(self) -> bool {
        matches!(
            self,
            SessionState::BoundReceiver
                | SessionState::BoundTransmitter
                | SessionState::BoundTransceiver
        )
    }

    /// State reached after a successful bind of `bind_type`.
    pub fn bound(bind_type: BindType) -> Self {
        match bind_type {
            BindType::Receiver => SessionState::BoundReceiver,
            BindType::Transmitter => SessionState::BoundTransmitter,
            BindType::Transceiver => SessionState::BoundTransceiver,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Closed => "CLOSED",
            SessionState::Open => "OPEN",
            SessionState::BoundReceiver => "BOUND_RX",
            SessionState::BoundTransmitter => "BOUND_TX",
            SessionState::BoundTransceiver => "BOUND_TRX",
        })
    }
}

/// Tunables for a session.
///
/// # Example
///
/// ```rust
/// use smpp_session::client::SessionOptions;
/// use std::time::Duration;
///
/// let options = SessionOptions::default()
///     .with_max_pdu_length(4096)
///     .with_enquire_link_interval(Duration::from_secs(30));
/// assert_eq!(options.max_pdu_length, 4096);
/// ```
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Largest `command_length` accepted on read (default: 254)
    ///
    /// The default rejects many legitimate deliver_sm PDUs; raise it for
    /// production SMSCs.
    pub max_pdu_length: u32,

    /// Idle time after which the service loop sends enquire_link (default: 20s)
    pub enquire_link_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_pdu_length: DEFAULT_MAX_PDU_LENGTH,
            enquire_link_interval: Duration::from_secs(20),
        }
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read ceiling. Values below the header size are clamped to it.
    pub fn with_max_pdu_length(mut self, max_pdu_length: u32) -> Self {
        self.max_pdu_length = max_pdu_length.max(HEADER_LEN as u32);
        self
    }

    pub fn with_enquire_link_interval(mut self, interval: Duration) -> Self {
        self.enquire_link_interval = interval;
        self
    }
}

/// What one turn of the service loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// An inbound PDU with this raw command_id was answered
    Dispatched(u32),
    /// The link was idle, so an enquire_link round trip was made
    KeepAlive,
}

impl Activity {
    pub fn dispatched_command(self) -> Option<CommandId> {
        match self {
            Activity::Dispatched(id) => CommandId::try_from(id).ok(),
            Activity::KeepAlive => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_states() {
        assert!(!SessionState::Closed.is_bound());
        assert!(!SessionState::Open.is_bound());
        assert!(SessionState::bound(BindType::Receiver).is_bound());
        assert_eq!(
            SessionState::bound(BindType::Transceiver),
            SessionState::BoundTransceiver
        );
    }

    #[test]
    fn options_defaults_and_clamp() {
        let options = SessionOptions::default();
        assert_eq!(options.max_pdu_length, 254);
        assert_eq!(options.enquire_link_interval, Duration::from_secs(20));

        let clamped = SessionOptions::new().with_max_pdu_length(3);
        assert_eq!(clamped.max_pdu_length, 16);
    }
}
