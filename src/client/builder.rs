// ABOUTME: Session factory assembling options and inbound handlers before a session is created
// ABOUTME: Convenience constructors connect and bind in a single call

use crate::client::dispatch::Dispatcher;
use crate::client::error::SmppResult;
use crate::client::session::Session;
use crate::client::traits::InboundHandler;
use crate::client::types::SessionOptions;
use crate::datatypes::{BindCredentials, BindType};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};

/// Builder for [`Session`].
///
/// Handlers for SMSC-initiated deliver_sm / data_sm are fixed here, at
/// construction; a session never swaps them afterwards.
///
/// ```rust,no_run
/// use smpp_session::client::SessionBuilder;
/// use smpp_session::datatypes::{BindCredentials, ShortMessage};
/// use smpp_session::Pdu;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = SessionBuilder::new()
///     .max_pdu_length(4096)
///     .on_deliver_sm(|pdu: &Pdu| {
///         if let Ok(sms) = ShortMessage::from_pdu(pdu) {
///             println!("{} says {:?}", sms.source_addr, sms.short_message);
///         }
///         pdu.respond(0, Some(bytes::Bytes::from_static(b"\0")), None)
///     })
///     .receiver("localhost:2775", BindCredentials::new("system_id", "password"))
///     .await?;
/// # session.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SessionBuilder {
    options: SessionOptions,
    dispatcher: Dispatcher,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    pub fn options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn max_pdu_length(mut self, max_pdu_length: u32) -> Self {
        self.options = self.options.with_max_pdu_length(max_pdu_length);
        self
    }

    pub fn enquire_link_interval(mut self, interval: Duration) -> Self {
        self.options = self.options.with_enquire_link_interval(interval);
        self
    }

    /// Handler producing the deliver_sm_resp for each inbound deliver_sm.
    pub fn on_deliver_sm<H: InboundHandler + 'static>(mut self, handler: H) -> Self {
        self.dispatcher.set_deliver_sm(handler);
        self
    }

    /// Handler producing the data_sm_resp for each inbound data_sm.
    pub fn on_data_sm<H: InboundHandler + 'static>(mut self, handler: H) -> Self {
        self.dispatcher.set_data_sm(handler);
        self
    }

    /// Build a closed session over any byte stream type.
    pub fn build<S>(self) -> Session<S>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        Session::with_parts(self.options, self.dispatcher)
    }

    /// Build a session and connect it over TCP, leaving it open (unbound).
    pub async fn connect<A: ToSocketAddrs>(self, addr: A) -> SmppResult<Session<TcpStream>> {
        let mut session = self.build();
        session.connect(addr).await?;
        Ok(session)
    }

    /// Connect and bind as transmitter.
    pub async fn transmitter<A: ToSocketAddrs>(
        self,
        addr: A,
        credentials: BindCredentials,
    ) -> SmppResult<Session<TcpStream>> {
        self.connect_and_bind(addr, BindType::Transmitter, credentials)
            .await
    }

    /// Connect and bind as receiver.
    pub async fn receiver<A: ToSocketAddrs>(
        self,
        addr: A,
        credentials: BindCredentials,
    ) -> SmppResult<Session<TcpStream>> {
        self.connect_and_bind(addr, BindType::Receiver, credentials)
            .await
    }

    /// Connect and bind as transceiver.
    pub async fn transceiver<A: ToSocketAddrs>(
        self,
        addr: A,
        credentials: BindCredentials,
    ) -> SmppResult<Session<TcpStream>> {
        self.connect_and_bind(addr, BindType::Transceiver, credentials)
            .await
    }

    async fn connect_and_bind<A: ToSocketAddrs>(
        self,
        addr: A,
        bind_type: BindType,
        credentials: BindCredentials,
    ) -> SmppResult<Session<TcpStream>> {
        let mut session = self.connect(addr).await?;
        if let Err(e) = session.bind(bind_type, &credentials).await {
            session.close().await;
            return Err(e);
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::types::SessionState;
    use tokio::io::DuplexStream;

    #[test]
    fn builder_applies_options() {
        let session: Session<DuplexStream> = SessionBuilder::new()
            .max_pdu_length(2048)
            .enquire_link_interval(Duration::from_secs(5))
            .build();

        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.options().max_pdu_length, 2048);
        assert_eq!(session.options().enquire_link_interval, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn connect_failure_surfaces_io_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = SessionBuilder::new().connect(addr).await;
        assert!(matches!(result, Err(crate::client::SmppError::Io(_))));
    }
}
