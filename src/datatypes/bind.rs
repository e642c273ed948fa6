// ABOUTME: Builds bind_receiver / bind_transmitter / bind_transceiver request PDUs
// ABOUTME: One credential set, three bind variants selected by tag

use crate::codec::{CodecError, Pdu, decode_cstring, encode_cstring};
use crate::datatypes::{CommandId, InterfaceVersion, NumericPlanIndicator, TypeOfNumber};
use bytes::{BufMut, Bytes, BytesMut};

/// Direction of an SMPP session, chosen at bind time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindType {
    /// Receive deliver_sm / data_sm from the SMSC
    Receiver,
    /// Submit messages to the SMSC
    Transmitter,
    /// Both directions over one connection
    Transceiver,
}

impl BindType {
    pub fn command_id(self) -> CommandId {
        match self {
            BindType::Receiver => CommandId::BindReceiver,
            BindType::Transmitter => CommandId::BindTransmitter,
            BindType::Transceiver => CommandId::BindTransceiver,
        }
    }
}

/// Fields of a bind request (section 4.1).
///
/// The same field set is used for all three bind variants; only the
/// `command_id` differs. Strings are written NUL-terminated and must not
/// contain a NUL themselves. Field lengths are left to the SMSC to police.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindCredentials {
    pub system_id: String,
    pub password: String,
    pub system_type: String,
    pub interface_version: InterfaceVersion,
    pub addr_ton: TypeOfNumber,
    pub addr_npi: NumericPlanIndicator,
    pub address_range: String,
}

impl BindCredentials {
    pub fn new(system_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            password: password.into(),
            system_type: String::new(),
            interface_version: InterfaceVersion::default(),
            addr_ton: TypeOfNumber::Unknown,
            addr_npi: NumericPlanIndicator::Unknown,
            address_range: String::new(),
        }
    }

    /// Set system type
    pub fn with_system_type(mut self, system_type: impl Into<String>) -> Self {
        self.system_type = system_type.into();
        self
    }

    /// Set SMPP interface version
    pub fn with_interface_version(mut self, interface_version: InterfaceVersion) -> Self {
        self.interface_version = interface_version;
        self
    }

    /// Restrict which SME addresses this (receiver) session serves.
    pub fn with_address_range(
        mut self,
        ton: TypeOfNumber,
        npi: NumericPlanIndicator,
        range: impl Into<String>,
    ) -> Self {
        self.addr_ton = ton;
        self.addr_npi = npi;
        self.address_range = range.into();
        self
    }

    /// Encode the bind body in wire order.
    pub fn encode_body(&self) -> Result<Bytes, CodecError> {
        let mut buf = BytesMut::with_capacity(
            self.system_id.len() + self.password.len() + self.system_type.len()
                + self.address_range.len()
                + 7,
        );

        encode_cstring(&mut buf, &self.system_id, "system_id")?;
        encode_cstring(&mut buf, &self.password, "password")?;
        encode_cstring(&mut buf, &self.system_type, "system_type")?;
        buf.put_u8(self.interface_version as u8);
        buf.put_u8(self.addr_ton as u8);
        buf.put_u8(self.addr_npi as u8);
        encode_cstring(&mut buf, &self.address_range, "address_range")?;

        Ok(buf.freeze())
    }

    /// Build the bind request PDU for `bind_type`.
    pub fn to_pdu(&self, bind_type: BindType, sequence_number: u32) -> Result<Pdu, CodecError> {
        Ok(Pdu::request(
            bind_type.command_id(),
            sequence_number,
            Some(self.encode_body()?),
        ))
    }
}

/// The SMSC's `system_id` from a bind_*_resp body.
///
/// A response without a body yields an empty id.
pub fn bind_response_system_id(response: &Pdu) -> Result<String, CodecError> {
    match response.body() {
        Some(body) => decode_cstring(&mut body.clone(), "system_id"),
        None => Ok(String::new()),
    }
}
