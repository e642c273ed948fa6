// ABOUTME: Extension seam for SMSC-initiated requests
// ABOUTME: Handlers are injected values, so closures and structs both plug in

use crate::codec::Pdu;
use bytes::Bytes;

/// Produces the response to an inbound deliver_sm or data_sm.
///
/// The handler receives the request and must return the PDU to write back,
/// normally built with [`Pdu::respond`]. Returning a non-zero status tells
/// the SMSC the message was not accepted; it will typically redeliver.
///
/// Any `FnMut(&Pdu) -> Pdu` closure is a handler:
///
/// ```rust
/// use smpp_session::client::InboundHandler;
/// use smpp_session::Pdu;
///
/// let mut handler = |pdu: &Pdu| pdu.respond(0, None, None);
/// let request = Pdu::new(0x0000_0005, 0, 1, None);
/// assert_eq!(handler.handle(&request).command_id(), 0x8000_0005);
/// ```
pub trait InboundHandler: Send {
    fn handle(&mut self, pdu: &Pdu) -> Pdu;
}

impl<F> InboundHandler for F
where
    F: FnMut(&Pdu) -> Pdu + Send,
{
    fn handle(&mut self, pdu: &Pdu) -> Pdu {
        self(pdu)
    }
}

/// Accepts everything: success status and an empty `message_id`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl InboundHandler for AcceptAll {
    fn handle(&mut self, pdu: &Pdu) -> Pdu {
        pdu.respond(0, Some(Bytes::from_static(b"\0")), None)
    }
}
