//! SMPP v3.4 ESME client.
//!
//! The crate is layered leaf-first:
//!
//! * [`codec`] - the 16 byte PDU header and opaque body
//! * [`datatypes`] - protocol enums plus the bind and submit_sm body builders
//! * [`connection`] - length-prefixed framing over an async byte stream
//! * [`client`] - the session state machine and inbound dispatch
//!
//! # Examples
//!
//! ## Basic SMS Sending
//!
//! ```rust,no_run
//! use smpp_session::client::SessionBuilder;
//! use smpp_session::datatypes::{BindCredentials, ShortMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and bind as transmitter (SMPP v3.4 section 4.1)
//!     let mut session = SessionBuilder::new()
//!         .transmitter("localhost:2775", BindCredentials::new("system_id", "password"))
//!         .await?;
//!
//!     let sms = ShortMessage::new("1234567890", "0987654321", "Hello, World!");
//!     let message_id = session.submit_sm(&sms).await?;
//!     println!("Message sent with ID: {}", message_id);
//!
//!     // Clean disconnect (SMPP v3.4 section 4.2.1)
//!     session.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Message Options
//!
//! ```rust,no_run
//! use smpp_session::client::SessionBuilder;
//! use smpp_session::datatypes::{
//!     BindCredentials, NumericPlanIndicator, PriorityFlag, ShortMessage, SmsKind, TypeOfNumber,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = SessionBuilder::new()
//!         .max_pdu_length(4096)
//!         .transceiver("localhost:2775", BindCredentials::new("system_id", "password"))
//!         .await?;
//!
//!     let sms = ShortMessage::of_kind(SmsKind::FlashSms, "0987654321", "1234567890", "Now!")
//!         .with_priority(PriorityFlag::Level1)
//!         .with_delivery_receipt()
//!         .with_dest_numbering(TypeOfNumber::National, NumericPlanIndicator::Isdn);
//!
//!     let message_id = session.submit_sm(&sms).await?;
//!     println!("Message sent with ID: {}", message_id);
//!
//!     session.close().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod connection;
pub mod datatypes;


// Re-export codec types for direct access
pub use codec::{CodecError, Pdu, PduHeader};

// Re-export the main client API for easy access
pub use client::{Session, SessionBuilder, SessionState, SmppError, SmppResult};
