// ABOUTME: SMPP client module: the session state machine and its supporting pieces
// ABOUTME: Exports the session, builder, handler seam, options and error types

//! SMPP Client Module
//!
//! * `Session` - the state machine; owns the transport and sequence counter
//! * `SessionBuilder` - options and inbound handlers, fixed at construction
//! * `InboundHandler` - seam for answering deliver_sm / data_sm
//! * `Dispatcher` - routes SMSC-initiated PDUs to handlers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smpp_session::client::SessionBuilder;
//! use smpp_session::datatypes::{BindCredentials, ShortMessage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = SessionBuilder::new()
//!     .transmitter("localhost:2775", BindCredentials::new("system_id", "password"))
//!     .await?;
//!
//! let message_id = session
//!     .submit_sm(&ShortMessage::new("123456789", "987654321", "Hello!"))
//!     .await?;
//!
//! // unbinds, then releases the connection
//! session.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Serving inbound traffic
//!
//! A receiver waits for SMSC-initiated PDUs and keeps the link alive when
//! idle. [`Session::serve`] loops until told to stop:
//!
//! ```rust,no_run
//! use smpp_session::client::SessionBuilder;
//! use smpp_session::datatypes::BindCredentials;
//! use std::time::Duration;
//! use tokio::sync::watch;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = SessionBuilder::new()
//!     .enquire_link_interval(Duration::from_secs(20))
//!     .receiver("localhost:2775", BindCredentials::new("system_id", "password"))
//!     .await?;
//!
//! let (stop_tx, stop_rx) = watch::channel(false);
//! tokio::spawn(async move {
//!     tokio::time::sleep(Duration::from_secs(3600)).await;
//!     let _ = stop_tx.send(true);
//! });
//!
//! let outcome = session.serve(stop_rx).await;
//! session.close().await;
//! outcome?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod dispatch;
pub mod error;
pub mod sequence;
pub mod session;
pub mod traits;
pub mod types;

// Re-export the main types for easy access
pub use builder::SessionBuilder;
pub use dispatch::Dispatcher;
pub use error::{SmppError, SmppResult};
pub use sequence::{MAX_SEQUENCE_NUMBER, SequenceCounter};
pub use session::Session;
pub use traits::{AcceptAll, InboundHandler};
pub use types::{Activity, SessionOptions, SessionState};
