// ABOUTME: SMPP session error types covering framing, state, rejection and transport failures
// ABOUTME: Rejections carry the offending response PDU so callers can inspect status and body

use crate::client::types::SessionState;
use crate::codec::{CodecError, Pdu};
use std::io;
use thiserror::Error;

/// Errors surfaced by session operations.
///
/// Nothing is retried internally; every error reaches the caller of the
/// operation that triggered it.
#[derive(Debug, Error)]
pub enum SmppError {
    /// I/O error from the transport (connect, read, write)
    #[error("Connection error: {0}")]
    Io(#[from] io::Error),

    /// Header shorter than 16 bytes, length outside the accepted range, or
    /// a body that could not be encoded/decoded
    #[error("Malformed PDU: {0}")]
    MalformedPdu(#[from] CodecError),

    /// Operation not permitted in the current session state
    #[error("Invalid session state: {operation} not allowed while {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// The SMSC refused the bind, or answered with an uncorrelated PDU
    #[error(
        "Bind rejected: command_id {:#010x}, command_status {:#010x}",
        .0.command_id(),
        .0.command_status()
    )]
    BindRejected(Pdu),

    /// The SMSC refused the request, or answered with an uncorrelated PDU
    #[error(
        "Request rejected: command_id {:#010x}, command_status {:#010x}",
        .0.command_id(),
        .0.command_status()
    )]
    RequestRejected(Pdu),

    /// The byte stream ended (or accepted zero bytes) mid-operation
    #[error("Connection closed unexpectedly")]
    TransportClosed,
}

impl SmppError {
    /// The response PDU behind a rejection, if this is one.
    pub fn response(&self) -> Option<&Pdu> {
        match self {
            SmppError::BindRejected(pdu) | SmppError::RequestRejected(pdu) => Some(pdu),
            _ => None,
        }
    }
}

/// Result type alias for SMPP operations
pub type SmppResult<T> = Result<T, SmppError>;
