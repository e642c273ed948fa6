// ABOUTME: Encodes and decodes the mandatory body of submit_sm (section 4.4.1)
// ABOUTME: deliver_sm shares the same layout, so inbound messages decode through here too

use crate::codec::{CodecError, Pdu, decode_cstring, decode_u8, encode_cstring};
use crate::datatypes::{CommandId, NumericPlanIndicator, PriorityFlag, TypeOfNumber};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Longest `short_message` that fits in the one-octet `sm_length`
/// without resorting to the message_payload TLV.
pub const MAX_SHORT_MESSAGE_LEN: usize = 254;

/// esm_class value marking an SMSC delivery receipt.
pub const ESM_CLASS_DELIVERY_RECEIPT: u8 = 0x04;

/// data_coding for a class 0 ("flash") message using the default alphabet.
pub const DATA_CODING_FLASH: u8 = 0x10;

/// Flavours of short message, differing only in field defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SmsKind {
    /// Plain text message
    #[default]
    Sms,
    /// Class 0 message, displayed immediately and not stored by the handset
    FlashSms,
    /// SMSC delivery receipt
    DeliveryNotification,
}

impl SmsKind {
    fn esm_class(self) -> u8 {
        match self {
            SmsKind::DeliveryNotification => ESM_CLASS_DELIVERY_RECEIPT,
            SmsKind::Sms | SmsKind::FlashSms => 0,
        }
    }

    fn data_coding(self) -> u8 {
        match self {
            SmsKind::FlashSms => DATA_CODING_FLASH,
            SmsKind::Sms | SmsKind::DeliveryNotification => 0,
        }
    }
}

/// Mandatory parameters of a submit_sm / deliver_sm body.
///
/// The message is carried as raw octets; no character set conversion is
/// attempted. `sm_length` is derived from `short_message` when encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortMessage {
    pub service_type: String,
    /// Raw octet so reserved values in inbound traffic survive decoding;
    /// set it from the typed enums with [`ShortMessage::with_source_numbering`].
    pub source_addr_ton: u8,
    pub source_addr_npi: u8,
    pub source_addr: String,
    pub dest_addr_ton: u8,
    pub dest_addr_npi: u8,
    pub destination_addr: String,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: PriorityFlag,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    pub short_message: Bytes,
}

impl ShortMessage {
    /// Create a plain SMS with international/ISDN addressing.
    pub fn new(
        source_addr: impl Into<String>,
        destination_addr: impl Into<String>,
        message: impl Into<Bytes>,
    ) -> Self {
        Self::of_kind(SmsKind::Sms, source_addr, destination_addr, message)
    }

    pub fn of_kind(
        kind: SmsKind,
        source_addr: impl Into<String>,
        destination_addr: impl Into<String>,
        message: impl Into<Bytes>,
    ) -> Self {
        Self {
            service_type: String::new(),
            source_addr_ton: TypeOfNumber::International as u8,
            source_addr_npi: NumericPlanIndicator::Isdn as u8,
            source_addr: source_addr.into(),
            dest_addr_ton: TypeOfNumber::International as u8,
            dest_addr_npi: NumericPlanIndicator::Isdn as u8,
            destination_addr: destination_addr.into(),
            esm_class: kind.esm_class(),
            protocol_id: 0,
            priority_flag: PriorityFlag::default(),
            schedule_delivery_time: String::new(),
            validity_period: String::new(),
            registered_delivery: 0,
            replace_if_present_flag: 0,
            data_coding: kind.data_coding(),
            sm_default_msg_id: 0,
            short_message: message.into(),
        }
    }

    pub fn with_source_numbering(mut self, ton: TypeOfNumber, npi: NumericPlanIndicator) -> Self {
        self.source_addr_ton = ton as u8;
        self.source_addr_npi = npi as u8;
        self
    }

    pub fn with_dest_numbering(mut self, ton: TypeOfNumber, npi: NumericPlanIndicator) -> Self {
        self.dest_addr_ton = ton as u8;
        self.dest_addr_npi = npi as u8;
        self
    }

    pub fn with_protocol_id(mut self, protocol_id: u8) -> Self {
        self.protocol_id = protocol_id;
        self
    }

    pub fn with_data_coding(mut self, data_coding: u8) -> Self {
        self.data_coding = data_coding;
        self
    }

    pub fn with_priority(mut self, priority: PriorityFlag) -> Self {
        self.priority_flag = priority;
        self
    }

    pub fn with_esm_class(mut self, esm_class: u8) -> Self {
        self.esm_class = esm_class;
        self
    }

    /// Ask the SMSC for a delivery receipt on final outcome.
    pub fn with_delivery_receipt(mut self) -> Self {
        self.registered_delivery = 0x01;
        self
    }

    /// Encode the mandatory body in wire order.
    pub fn encode_body(&self) -> Result<Bytes, CodecError> {
        let len = self.short_message.len();
        if len > MAX_SHORT_MESSAGE_LEN {
            return Err(CodecError::MessageTooLong {
                len,
                max: MAX_SHORT_MESSAGE_LEN,
            });
        }

        let mut buf = BytesMut::with_capacity(
            self.source_addr.len() + self.destination_addr.len() + len + 17,
        );

        encode_cstring(&mut buf, &self.service_type, "service_type")?;
        buf.put_u8(self.source_addr_ton);
        buf.put_u8(self.source_addr_npi);
        encode_cstring(&mut buf, &self.source_addr, "source_addr")?;
        buf.put_u8(self.dest_addr_ton);
        buf.put_u8(self.dest_addr_npi);
        encode_cstring(&mut buf, &self.destination_addr, "destination_addr")?;
        buf.put_u8(self.esm_class);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag as u8);
        encode_cstring(&mut buf, &self.schedule_delivery_time, "schedule_delivery_time")?;
        encode_cstring(&mut buf, &self.validity_period, "validity_period")?;
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.replace_if_present_flag);
        buf.put_u8(self.data_coding);
        buf.put_u8(self.sm_default_msg_id);
        buf.put_u8(len as u8);
        buf.put_slice(&self.short_message);

        Ok(buf.freeze())
    }

    /// Build a submit_sm request PDU.
    pub fn to_pdu(&self, sequence_number: u32) -> Result<Pdu, CodecError> {
        Ok(Pdu::request(
            CommandId::SubmitSm,
            sequence_number,
            Some(self.encode_body()?),
        ))
    }

    /// Decode a submit_sm or deliver_sm mandatory body.
    ///
    /// Trailing bytes after `short_message` (optional TLVs) are ignored.
    pub fn decode_body(mut buf: Bytes) -> Result<Self, CodecError> {
        let service_type = decode_cstring(&mut buf, "service_type")?;
        let source_addr_ton = decode_u8(&mut buf, "source_addr_ton")?;
        let source_addr_npi = decode_u8(&mut buf, "source_addr_npi")?;
        let source_addr = decode_cstring(&mut buf, "source_addr")?;
        let dest_addr_ton = decode_u8(&mut buf, "dest_addr_ton")?;
        let dest_addr_npi = decode_u8(&mut buf, "dest_addr_npi")?;
        let destination_addr = decode_cstring(&mut buf, "destination_addr")?;
        let esm_class = decode_u8(&mut buf, "esm_class")?;
        let protocol_id = decode_u8(&mut buf, "protocol_id")?;
        let priority = decode_u8(&mut buf, "priority_flag")?;
        let priority_flag = PriorityFlag::try_from(priority).map_err(|_| {
            CodecError::InvalidField {
                field: "priority_flag",
                value: priority,
            }
        })?;
        let schedule_delivery_time = decode_cstring(&mut buf, "schedule_delivery_time")?;
        let validity_period = decode_cstring(&mut buf, "validity_period")?;
        let registered_delivery = decode_u8(&mut buf, "registered_delivery")?;
        let replace_if_present_flag = decode_u8(&mut buf, "replace_if_present_flag")?;
        let data_coding = decode_u8(&mut buf, "data_coding")?;
        let sm_default_msg_id = decode_u8(&mut buf, "sm_default_msg_id")?;
        let sm_length = decode_u8(&mut buf, "sm_length")? as usize;

        if buf.remaining() < sm_length {
            return Err(CodecError::Truncated {
                field: "short_message",
            });
        }
        let short_message = buf.split_to(sm_length);

        Ok(Self {
            service_type,
            source_addr_ton,
            source_addr_npi,
            source_addr,
            dest_addr_ton,
            dest_addr_npi,
            destination_addr,
            esm_class,
            protocol_id,
            priority_flag,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            replace_if_present_flag,
            data_coding,
            sm_default_msg_id,
            short_message,
        })
    }

    /// Decode the body of an inbound deliver_sm (or a submit_sm) PDU.
    pub fn from_pdu(pdu: &Pdu) -> Result<Self, CodecError> {
        Self::decode_body(pdu.body().cloned().unwrap_or_default())
    }

    pub fn sm_length(&self) -> usize {
        self.short_message.len()
    }

    pub fn is_delivery_receipt(&self) -> bool {
        self.esm_class & 0x3c == ESM_CLASS_DELIVERY_RECEIPT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_sm_hi_scenario() {
        let sms = ShortMessage::new("1234", "5678", "hi");
        let body = sms.encode_body().unwrap();

        let decoded = ShortMessage::decode_body(body).unwrap();
        assert_eq!(decoded.sm_length(), 2);
        assert_eq!(decoded.short_message.as_ref(), b"hi");
        assert_eq!(decoded.source_addr, "1234");
        assert_eq!(decoded.destination_addr, "5678");
    }

    #[test]
    fn submit_sm_body_field_order() {
        let sms = ShortMessage::new("1234", "5678", "hi")
            .with_protocol_id(0x41)
            .with_priority(PriorityFlag::Level2)
            .with_data_coding(0x08);
        let body = sms.encode_body().unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"\0"); // service_type
        expected.extend_from_slice(b"\x01\x011234\0");
        expected.extend_from_slice(b"\x01\x015678\0");
        expected.extend_from_slice(b"\x00\x41\x02"); // esm_class, protocol_id, priority
        expected.extend_from_slice(b"\0\0"); // schedule, validity
        expected.extend_from_slice(b"\x00\x00\x08\x00"); // registered, replace, dcs, default id
        expected.extend_from_slice(b"\x02hi");
        assert_eq!(body.as_ref(), expected.as_slice());
    }

    #[test]
    fn sm_length_tracks_binary_message() {
        let payload = Bytes::from_static(&[0x00, 0xff, 0x00, 0x7f]);
        let sms = ShortMessage::new("1", "2", payload.clone());
        let decoded = ShortMessage::decode_body(sms.encode_body().unwrap()).unwrap();

        assert_eq!(decoded.sm_length(), 4);
        assert_eq!(decoded.short_message, payload);
    }

    #[test]
    fn message_too_long_is_rejected() {
        let sms = ShortMessage::new("1", "2", vec![b'a'; MAX_SHORT_MESSAGE_LEN + 1]);
        assert_eq!(
            sms.encode_body(),
            Err(CodecError::MessageTooLong {
                len: 255,
                max: MAX_SHORT_MESSAGE_LEN
            })
        );
    }

    #[test]
    fn kinds_select_defaults() {
        let flash = ShortMessage::of_kind(SmsKind::FlashSms, "1", "2", "now");
        assert_eq!(flash.data_coding, DATA_CODING_FLASH);
        assert_eq!(flash.esm_class, 0);

        let receipt = ShortMessage::of_kind(SmsKind::DeliveryNotification, "1", "2", "id:1");
        assert!(receipt.is_delivery_receipt());
        assert!(!ShortMessage::new("1", "2", "x").is_delivery_receipt());
    }

    #[test]
    fn to_pdu_uses_submit_sm() {
        let pdu = ShortMessage::new("1", "2", "x").to_pdu(12).unwrap();
        assert_eq!(pdu.command(), Some(CommandId::SubmitSm));
        assert_eq!(pdu.sequence_number(), 12);
        assert_eq!(pdu.command_status(), 0);
    }

    #[test]
    fn decode_truncated_short_message() {
        let body = ShortMessage::new("1", "2", "hello").encode_body().unwrap();
        let cut = body.slice(..body.len() - 2);
        assert_eq!(
            ShortMessage::decode_body(cut),
            Err(CodecError::Truncated {
                field: "short_message"
            })
        );
    }

    #[test]
    fn decode_keeps_reserved_numbering_values() {
        let mut body = BytesMut::from(ShortMessage::new("1", "2", "x").encode_body().unwrap().as_ref());
        body[1] = 0x09;
        body[2] = 0x0f;
        let decoded = ShortMessage::decode_body(body.freeze()).unwrap();

        assert_eq!(decoded.source_addr_ton, 0x09);
        assert_eq!(decoded.source_addr_npi, 0x0f);
        assert_eq!(decoded.short_message.as_ref(), b"x");
    }

    #[test]
    fn decode_rejects_unknown_priority() {
        let mut body = BytesMut::from(ShortMessage::new("1", "2", "x").encode_body().unwrap().as_ref());
        // service_type, ton, npi, "1\0", ton, npi, "2\0", esm_class, protocol_id
        body[11] = 0x07;
        assert_eq!(
            ShortMessage::decode_body(body.freeze()),
            Err(CodecError::InvalidField {
                field: "priority_flag",
                value: 0x07
            })
        );
    }

    #[test]
    fn numbering_builders_write_enum_values() {
        let sms = ShortMessage::new("1", "2", "x")
            .with_source_numbering(TypeOfNumber::Alphanumeric, NumericPlanIndicator::Unknown)
            .with_dest_numbering(TypeOfNumber::National, NumericPlanIndicator::Isdn);
        let body = sms.encode_body().unwrap();

        assert_eq!(&body[1..3], &[0x05, 0x00]);
        assert_eq!(&body[5..7], &[0x02, 0x01]);
    }

    #[test]
    fn decode_ignores_trailing_tlvs() {
        let mut body = BytesMut::from(ShortMessage::new("1", "2", "ok").encode_body().unwrap().as_ref());
        body.extend_from_slice(&[0x02, 0x04, 0x00, 0x02, 0x00, 0x01]);
        let decoded = ShortMessage::decode_body(body.freeze()).unwrap();
        assert_eq!(decoded.short_message.as_ref(), b"ok");
    }
}
