// ABOUTME: Routes SMSC-initiated PDUs to the handler that produces their response
// ABOUTME: enquire_link is answered inline; unsupported commands get a generic_nack

use crate::client::traits::{AcceptAll, InboundHandler};
use crate::codec::Pdu;
use crate::datatypes::{CommandId, CommandStatus};
use std::fmt;
use tracing::{debug, warn};

/// Chooses a response for each inbound request by `command_id`.
///
/// | command       | response                                  |
/// |---------------|-------------------------------------------|
/// | enquire_link  | enquire_link_resp, status 0, no body      |
/// | deliver_sm    | whatever the deliver_sm handler returns   |
/// | data_sm       | whatever the data_sm handler returns      |
/// | anything else | generic_nack, ESME_RINVCMDID              |
///
/// Some ESMEs send the generic_nack with status 0; this one reports
/// ESME_RINVCMDID (0x03) so the SMSC can tell the command was not handled.
pub struct Dispatcher {
    deliver_sm: Box<dyn InboundHandler>,
    data_sm: Box<dyn InboundHandler>,
}

impl Dispatcher {
    /// A dispatcher that accepts every deliver_sm and data_sm.
    pub fn new() -> Self {
        Self {
            deliver_sm: Box::new(AcceptAll),
            data_sm: Box::new(AcceptAll),
        }
    }

    pub fn set_deliver_sm<H: InboundHandler + 'static>(&mut self, handler: H) {
        self.deliver_sm = Box::new(handler);
    }

    pub fn set_data_sm<H: InboundHandler + 'static>(&mut self, handler: H) {
        self.data_sm = Box::new(handler);
    }

    /// Produce the response for `pdu`.
    pub fn respond(&mut self, pdu: &Pdu) -> Pdu {
        match pdu.command() {
            Some(CommandId::EnquireLink) => pdu.respond(0, None, None),
            Some(CommandId::DeliverSm) => {
                debug!(sequence_number = pdu.sequence_number(), "deliver_sm");
                self.deliver_sm.handle(pdu)
            }
            Some(CommandId::DataSm) => {
                debug!(sequence_number = pdu.sequence_number(), "data_sm");
                self.data_sm.handle(pdu)
            }
            _ => {
                warn!(
                    "Unsupported command_id {:#010x}, answering generic_nack",
                    pdu.command_id()
                );
                pdu.respond(
                    CommandStatus::InvalidCommandId as u32,
                    None,
                    Some(CommandId::GenericNack as u32),
                )
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::{Arc, Mutex};

    #[test]
    fn enquire_link_gets_bare_success() {
        let mut dispatcher = Dispatcher::new();
        let request = Pdu::request(CommandId::EnquireLink, 41, None);

        let response = dispatcher.respond(&request);
        assert_eq!(response.command(), Some(CommandId::EnquireLinkResp));
        assert_eq!(response.command_status(), 0);
        assert_eq!(response.sequence_number(), 41);
        assert!(response.body().is_none());
    }

    #[test]
    fn default_deliver_and_data_handlers_accept() {
        let mut dispatcher = Dispatcher::default();

        let deliver = Pdu::request(CommandId::DeliverSm, 1, Some(Bytes::from_static(b"x")));
        let response = dispatcher.respond(&deliver);
        assert_eq!(response.command(), Some(CommandId::DeliverSmResp));
        assert_eq!(response.body().unwrap().as_ref(), b"\0");

        let data = Pdu::request(CommandId::DataSm, 2, None);
        let response = dispatcher.respond(&data);
        assert_eq!(response.command(), Some(CommandId::DataSmResp));
        assert!(response.is_ok());
    }

    #[test]
    fn unknown_command_gets_generic_nack() {
        let mut dispatcher = Dispatcher::new();
        let request = Pdu::new(0x0001_0200, 0, 99, None);

        let response = dispatcher.respond(&request);
        assert_eq!(response.command_id(), 0x8000_0000);
        assert_eq!(response.sequence_number(), 99);
        assert_eq!(response.status(), Some(CommandStatus::InvalidCommandId));
    }

    #[test]
    fn known_but_unsupported_command_gets_generic_nack() {
        let mut dispatcher = Dispatcher::new();
        let request = Pdu::request(CommandId::Outbind, 3, None);
        assert_eq!(
            dispatcher.respond(&request).command(),
            Some(CommandId::GenericNack)
        );
    }

    #[test]
    fn injected_handlers_are_used_per_slot() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();

        let log = Arc::clone(&seen);
        dispatcher.set_deliver_sm(move |pdu: &Pdu| {
            log.lock().unwrap().push(pdu.sequence_number());
            pdu.respond(CommandStatus::ReceiverTemporaryAppError as u32, None, None)
        });
        dispatcher.set_data_sm(|pdu: &Pdu| pdu.respond(0, Some(Bytes::from_static(b"d\0")), None));

        let deliver = dispatcher.respond(&Pdu::request(CommandId::DeliverSm, 7, None));
        assert_eq!(deliver.command_status(), 0x64);

        let data = dispatcher.respond(&Pdu::request(CommandId::DataSm, 8, None));
        assert_eq!(data.body().unwrap().as_ref(), b"d\0");

        assert_eq!(*seen.lock().unwrap(), vec![7]);
    }
}
