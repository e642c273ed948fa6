// SMPP v3.4 PDU codec
//
// Every PDU is a 16 byte big-endian header followed by an opaque body. The
// codec only understands the header; bind and submit_sm bodies are built by
// the datatypes module and carried here as raw bytes.

use crate::datatypes::{CommandId, CommandStatus, RESPONSE_BIT};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Size of the fixed PDU header.
pub const HEADER_LEN: usize = 16;

/// Largest PDU accepted on read unless configured otherwise.
///
/// This ceiling is far below what SMPP allows (a submit_sm alone can reach
/// ~400 octets with every field populated); raise it through
/// `SessionOptions::with_max_pdu_length` when talking to a real SMSC.
pub const DEFAULT_MAX_PDU_LENGTH: u32 = 254;

/// Codec errors with enough context to explain which field was at fault
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("PDU header needs 16 bytes, got {0}")]
    HeaderTooShort(usize),

    #[error("Invalid PDU length: {length}, must be {min}-{max}")]
    InvalidPduLength { length: u32, min: u32, max: u32 },

    #[error("Field '{field}' contains an embedded NUL")]
    EmbeddedNul { field: &'static str },

    #[error("short_message is {len} octets, sm_length allows at most {max}")]
    MessageTooLong { len: usize, max: usize },

    #[error("Body truncated while reading '{field}'")]
    Truncated { field: &'static str },

    #[error("Field '{field}' is not NUL-terminated")]
    MissingTerminator { field: &'static str },

    #[error("Field '{field}' has invalid value {value:#04x}")]
    InvalidField { field: &'static str, value: u8 },

    #[error("UTF-8 decoding error in field '{field}': {source}")]
    Utf8Error {
        field: &'static str,
        #[source]
        source: FromUtf8Error,
    },
}

/// The 16 byte header common to all PDUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PduHeader {
    pub command_length: u32,
    pub command_id: u32,
    pub command_status: u32,
    pub sequence_number: u32,
}

impl PduHeader {
    pub const SIZE: usize = HEADER_LEN;

    /// Decode the header, leaving `buf` positioned at the first body byte.
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::HeaderTooShort(buf.remaining()));
        }

        Ok(PduHeader {
            command_length: buf.get_u32(),
            command_id: buf.get_u32(),
            command_status: buf.get_u32(),
            sequence_number: buf.get_u32(),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.command_length);
        buf.put_u32(self.command_id);
        buf.put_u32(self.command_status);
        buf.put_u32(self.sequence_number);
    }
}

/// A protocol data unit: header fields plus an opaque body.
///
/// `command_length` is not stored; it is always `16 + body length` and is
/// computed when the PDU is encoded. An empty body is normalised to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    command_id: u32,
    command_status: u32,
    sequence_number: u32,
    body: Option<Bytes>,
}

impl Pdu {
    pub fn new(
        command_id: u32,
        command_status: u32,
        sequence_number: u32,
        body: Option<Bytes>,
    ) -> Self {
        Pdu {
            command_id,
            command_status,
            sequence_number,
            body: body.filter(|b| !b.is_empty()),
        }
    }

    /// Build a request PDU. Requests always carry a zero status.
    pub fn request(command_id: CommandId, sequence_number: u32, body: Option<Bytes>) -> Self {
        Self::new(command_id as u32, 0, sequence_number, body)
    }

    /// Decode a complete PDU.
    ///
    /// At least 16 bytes are required. The length field is taken as read;
    /// everything after the header becomes the body verbatim.
    pub fn decode(mut buf: Bytes) -> Result<Self, CodecError> {
        let header = PduHeader::decode(&mut buf)?;

        Ok(Self::new(
            header.command_id,
            header.command_status,
            header.sequence_number,
            Some(buf),
        ))
    }

    /// Encode header and body, recomputing `command_length`.
    pub fn encode(&self) -> Bytes {
        let header = PduHeader {
            command_length: self.command_length(),
            command_id: self.command_id,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        };

        let mut buf = BytesMut::with_capacity(header.command_length as usize);
        header.encode(&mut buf);
        if let Some(body) = &self.body {
            buf.put_slice(body);
        }
        buf.freeze()
    }

    /// Build the response to this PDU.
    ///
    /// The sequence number is preserved. Without an explicit `command_id`
    /// the response id is this PDU's id with the response bit set.
    pub fn respond(&self, command_status: u32, body: Option<Bytes>, command_id: Option<u32>) -> Pdu {
        Pdu::new(
            command_id.unwrap_or(self.command_id | RESPONSE_BIT),
            command_status,
            self.sequence_number,
            body,
        )
    }

    /// Whether `self` is a correctly correlated response to `request`.
    ///
    /// Status is not considered; see [`Pdu::is_ok`].
    pub fn is_response_to(&self, request: &Pdu) -> bool {
        self.sequence_number == request.sequence_number
            && self.command_id == request.command_id | RESPONSE_BIT
    }

    pub fn command_length(&self) -> u32 {
        (HEADER_LEN + self.body_len()) as u32
    }

    pub fn command_id(&self) -> u32 {
        self.command_id
    }

    /// The named command, if the id is one SMPP v3.4 defines.
    pub fn command(&self) -> Option<CommandId> {
        CommandId::try_from(self.command_id).ok()
    }

    pub fn command_status(&self) -> u32 {
        self.command_status
    }

    /// The named status, if the code is one this crate knows.
    pub fn status(&self) -> Option<CommandStatus> {
        CommandStatus::try_from(self.command_status).ok()
    }

    pub fn is_ok(&self) -> bool {
        self.command_status == 0
    }

    pub fn is_response(&self) -> bool {
        self.command_id & RESPONSE_BIT != 0
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, Bytes::len)
    }
}

/// Multi-line dump used for the per-PDU diagnostic events.
impl fmt::Display for Pdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let length = self.command_length();
        writeln!(f, "CommandLength = {length:#010x} ({length})")?;
        match self.command() {
            Some(command) => writeln!(f, "CommandID = {:#010x} ({})", self.command_id, command.name())?,
            None => writeln!(f, "CommandID = {:#010x}", self.command_id)?,
        }
        writeln!(f, "CommandStatus = {:#010x}", self.command_status)?;
        writeln!(f, "SequenceNumber = {:#010x}", self.sequence_number)?;
        match &self.body {
            Some(body) => write!(f, "Body = {body:?}"),
            None => write!(f, "Body = None"),
        }
    }
}

/// Write `value` followed by a NUL terminator.
pub fn encode_cstring(
    buf: &mut BytesMut,
    value: &str,
    field: &'static str,
) -> Result<(), CodecError> {
    if value.as_bytes().contains(&0) {
        return Err(CodecError::EmbeddedNul { field });
    }
    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
    Ok(())
}

/// Read a NUL-terminated string, consuming the terminator.
pub fn decode_cstring<B: Buf>(buf: &mut B, field: &'static str) -> Result<String, CodecError> {
    let end = buf
        .chunk()
        .iter()
        .position(|&b| b == 0)
        .ok_or(CodecError::MissingTerminator { field })?;

    let value = buf.copy_to_bytes(end);
    buf.advance(1);

    String::from_utf8(value.to_vec()).map_err(|source| CodecError::Utf8Error { field, source })
}

/// Decode a single byte
pub fn decode_u8<B: Buf>(buf: &mut B, field: &'static str) -> Result<u8, CodecError> {
    if !buf.has_remaining() {
        return Err(CodecError::Truncated { field });
    }
    Ok(buf.get_u8())
}
