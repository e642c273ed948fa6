// ABOUTME: SMPP session state machine owning the connection, bind state and sequence counter
// ABOUTME: Every request is written, then its correlated response is read before returning

use crate::client::dispatch::Dispatcher;
use crate::client::error::{SmppError, SmppResult};
use crate::client::sequence::SequenceCounter;
use crate::client::types::{Activity, SessionOptions, SessionState};
use crate::codec::Pdu;
use crate::connection::Connection;
use crate::datatypes::{
    BindCredentials, BindType, CommandId, ShortMessage, bind_response_system_id,
};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// A client session with one SMSC.
///
/// The session exclusively owns its transport. Operations are strictly
/// request/response: each one writes a PDU and waits for the correlated
/// response before returning, so a session must not be shared between tasks
/// without external serialisation (funnel work through one task instead).
///
/// ```text
/// Closed --connect--> Open --bind_*--> Bound* --unbind--> Open
///    ^                                                     |
///    +----------------------- close ----------------------+
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use smpp_session::client::Session;
/// use smpp_session::datatypes::{BindCredentials, ShortMessage};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::new();
/// session.connect("localhost:2775").await?;
/// session.bind_transmitter(&BindCredentials::new("system_id", "password")).await?;
///
/// let message_id = session
///     .submit_sm(&ShortMessage::new("1234", "5678", "Hello!"))
///     .await?;
/// println!("accepted as {message_id}");
///
/// session.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<S = TcpStream> {
    connection: Option<Connection<S>>,
    state: SessionState,
    sequence: SequenceCounter,
    dispatcher: Dispatcher,
    options: SessionOptions,
    smsc_system_id: Option<String>,
}

impl Session<TcpStream> {
    /// A closed TCP session with default options and handlers.
    pub fn new() -> Self {
        Self::with_parts(SessionOptions::default(), Dispatcher::default())
    }

    /// Open a TCP connection to the SMSC.
    ///
    /// Only valid while closed. A failed connect leaves the session closed.
    pub async fn connect<A: ToSocketAddrs>(&mut self, addr: A) -> SmppResult<()> {
        self.require(SessionState::Closed == self.state, "connect")?;
        let socket = TcpStream::connect(addr).await?;
        if let Ok(peer) = socket.peer_addr() {
            info!("Connected to SMSC at {peer}");
        }
        self.open(socket)
    }
}

impl Default for Session<TcpStream> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn with_parts(options: SessionOptions, dispatcher: Dispatcher) -> Self {
        Session {
            connection: None,
            state: SessionState::Closed,
            sequence: SequenceCounter::new(),
            dispatcher,
            options,
            smsc_system_id: None,
        }
    }

    /// Adopt an already connected byte stream, moving Closed → Open.
    pub fn open(&mut self, stream: S) -> SmppResult<()> {
        self.require(self.state == SessionState::Closed, "open")?;
        self.connection = Some(Connection::with_max_pdu_length(
            stream,
            self.options.max_pdu_length,
        ));
        self.state = SessionState::Open;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The `system_id` the SMSC returned in its bind response.
    pub fn smsc_system_id(&self) -> Option<&str> {
        self.smsc_system_id.as_deref()
    }

    /// Allocate the next sequence number.
    pub fn next_sequence_number(&mut self) -> u32 {
        self.sequence.allocate()
    }

    pub async fn bind_receiver(&mut self, credentials: &BindCredentials) -> SmppResult<()> {
        self.bind(BindType::Receiver, credentials).await
    }

    pub async fn bind_transmitter(&mut self, credentials: &BindCredentials) -> SmppResult<()> {
        self.bind(BindType::Transmitter, credentials).await
    }

    pub async fn bind_transceiver(&mut self, credentials: &BindCredentials) -> SmppResult<()> {
        self.bind(BindType::Transceiver, credentials).await
    }

    /// Bind to the SMSC, moving Open → Bound*.
    ///
    /// Fails with `InvalidState` unless the session is open, and with
    /// `BindRejected` if the response is uncorrelated or carries a non-zero
    /// status. The state is unchanged on failure.
    pub async fn bind(
        &mut self,
        bind_type: BindType,
        credentials: &BindCredentials,
    ) -> SmppResult<()> {
        let operation = bind_type.command_id().name();
        self.require(self.state == SessionState::Open, operation)?;

        let body = credentials.encode_body()?;
        let request = Pdu::request(bind_type.command_id(), self.sequence.allocate(), Some(body));
        let response = self.exchange(&request, operation).await?;
        if !accepted(&request, &response) {
            return Err(SmppError::BindRejected(response));
        }

        self.smsc_system_id = bind_response_system_id(&response).ok();
        self.state = SessionState::bound(bind_type);
        info!(
            "Bound as {} (system_id {}), SMSC system_id {:?}",
            self.state, credentials.system_id, self.smsc_system_id
        );
        Ok(())
    }

    /// Submit a short message, returning the SMSC-assigned message id.
    ///
    /// Valid in any bound state.
    pub async fn submit_sm(&mut self, message: &ShortMessage) -> SmppResult<String> {
        let operation = CommandId::SubmitSm.name();
        self.require(self.state.is_bound(), operation)?;

        let body = message.encode_body()?;
        let request = Pdu::request(CommandId::SubmitSm, self.sequence.allocate(), Some(body));
        let response = self.exchange(&request, operation).await?;
        if !accepted(&request, &response) {
            return Err(SmppError::RequestRejected(response));
        }

        let message_id = message_id(&response);
        debug!("submit_sm accepted, message_id {message_id}");
        Ok(message_id)
    }

    /// Send enquire_link and wait for its response. Valid unless closed.
    pub async fn enquire_link(&mut self) -> SmppResult<()> {
        let operation = CommandId::EnquireLink.name();
        self.require(self.state != SessionState::Closed, operation)?;

        let request = Pdu::request(CommandId::EnquireLink, self.sequence.allocate(), None);
        let response = self.exchange(&request, operation).await?;
        if !accepted(&request, &response) {
            return Err(SmppError::RequestRejected(response));
        }
        Ok(())
    }

    /// Unbind, moving Bound* → Open. The session stays bound on failure.
    pub async fn unbind(&mut self) -> SmppResult<()> {
        let operation = CommandId::Unbind.name();
        self.require(self.state.is_bound(), operation)?;

        let request = Pdu::request(CommandId::Unbind, self.sequence.allocate(), None);
        let response = self.exchange(&request, operation).await?;
        if !accepted(&request, &response) {
            return Err(SmppError::RequestRejected(response));
        }

        info!("Unbound from {}", self.state);
        self.state = SessionState::Open;
        self.smsc_system_id = None;
        Ok(())
    }

    /// Tear the session down.
    ///
    /// A bound session first attempts to unbind; whatever happens there, the
    /// transport is then shut down and released. Calling this on a closed
    /// session does nothing.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }

        if self.state.is_bound() {
            if let Err(e) = self.unbind().await {
                warn!("Unbind during close failed, closing anyway: {e}");
            }
        }

        if let Some(mut connection) = self.connection.take() {
            if let Err(e) = connection.shutdown().await {
                debug!("Transport shutdown failed: {e}");
            }
        }

        self.state = SessionState::Closed;
        self.smsc_system_id = None;
        info!("Session closed");
    }

    /// Read one SMSC-initiated PDU, answer it, and return it.
    ///
    /// This is a single blocking read-handle-write cycle; call it repeatedly
    /// (or use [`Session::process`] / [`Session::serve`]) for continuous
    /// service.
    pub async fn dispatch(&mut self) -> SmppResult<Pdu> {
        let request = self.connection("dispatch")?.read_pdu().await?;
        let response = self.dispatcher.respond(&request);
        self.connection("dispatch")?.write_pdu(&response).await?;
        Ok(request)
    }

    /// Wait up to `timeout` for inbound data; dispatch it if it arrives,
    /// otherwise keep the link alive with enquire_link.
    pub async fn process(&mut self, timeout: Duration) -> SmppResult<Activity> {
        let ready = self.connection("process")?.wait_readable(timeout).await?;
        self.turn(ready).await
    }

    /// Run [`Session::process`] with the configured enquire_link interval
    /// until `stop` turns true (or its sender goes away).
    ///
    /// The stop signal is only observed while idle-waiting, so an exchange
    /// already in flight always completes. Errors end the loop and are
    /// returned; the session is left as it was for the caller to close.
    pub async fn serve(&mut self, mut stop: watch::Receiver<bool>) -> SmppResult<()> {
        let idle = self.options.enquire_link_interval;

        loop {
            if *stop.borrow_and_update() {
                return Ok(());
            }

            let ready = {
                let connection = self.connection("serve")?;
                tokio::select! {
                    ready = connection.wait_readable(idle) => ready?,
                    changed = stop.changed() => {
                        if changed.is_err() {
                            return Ok(());
                        }
                        continue;
                    }
                }
            };

            self.turn(ready).await?;
        }
    }

    async fn turn(&mut self, ready: bool) -> SmppResult<Activity> {
        if ready {
            let request = self.dispatch().await?;
            Ok(Activity::Dispatched(request.command_id()))
        } else {
            self.enquire_link().await?;
            Ok(Activity::KeepAlive)
        }
    }

    async fn exchange(&mut self, request: &Pdu, operation: &'static str) -> SmppResult<Pdu> {
        let connection = self.connection(operation)?;
        connection.write_pdu(request).await?;
        connection.read_pdu().await
    }

    fn connection(&mut self, operation: &'static str) -> SmppResult<&mut Connection<S>> {
        let state = self.state;
        self.connection
            .as_mut()
            .ok_or(SmppError::InvalidState { operation, state })
    }

    fn require(&self, allowed: bool, operation: &'static str) -> SmppResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(SmppError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

/// Correlated (sequence and command id) and successful.
fn accepted(request: &Pdu, response: &Pdu) -> bool {
    response.is_response_to(request) && response.is_ok()
}

/// The C-string message id from a submit_sm_resp body.
fn message_id(response: &Pdu) -> String {
    let body = response.body().map(|b| b.as_ref()).unwrap_or_default();
    let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
    String::from_utf8_lossy(&body[..end]).into_owned()
}
