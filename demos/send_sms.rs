// ABOUTME: Interactive sender that submits one SMS per line typed on stdin
// ABOUTME: Keeps the link alive with enquire_link while waiting for input

//! # Interactive SMS sender
//!
//! ```bash
//! cargo run --example send_sms -- --system-id test --password secret \
//!   --from 1234 --to 5678
//! ```
//!
//! Each line read from stdin is submitted as one message. An empty line or
//! end of input closes the session.

use argh::FromArgs;
use smpp_session::client::{Session, SessionBuilder};
use smpp_session::datatypes::{BindCredentials, ShortMessage, SmsKind};
use std::error::Error;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Send SMS messages typed on stdin
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the system id
    #[argh(option)]
    system_id: Option<String>,

    /// the password
    #[argh(option)]
    password: Option<String>,

    /// the hostname of IP address of the SMSC (default: localhost)
    #[argh(option)]
    host: Option<String>,

    /// the port to use when connecting to the SMSC (default: 2775)
    #[argh(option, short = 'p')]
    port: Option<u32>,

    /// the recipient telephone number
    #[argh(option, short = 't')]
    to: String,

    /// the telephone number that the message will be from
    #[argh(option, short = 'f')]
    from: String,

    /// send as flash SMS
    #[argh(switch)]
    flash: bool,

    /// seconds of idle input before an enquire_link is sent (default: 20)
    #[argh(option)]
    keepalive: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli_args.debugging {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let host = cli_args.host.unwrap_or_else(|| "localhost".to_owned());
    let port = cli_args.port.unwrap_or(2775);
    let credentials = BindCredentials::new(
        cli_args.system_id.unwrap_or_default(),
        cli_args.password.unwrap_or_default(),
    );
    let keepalive = Duration::from_secs(cli_args.keepalive.unwrap_or(20));
    let kind = if cli_args.flash {
        SmsKind::FlashSms
    } else {
        SmsKind::Sms
    };

    let mut session = SessionBuilder::new()
        .transmitter(format!("{host}:{port}"), credentials)
        .await?;
    info!("Bound, type a message and press enter (empty line to quit)");

    let result = run(&mut session, kind, &cli_args.from, &cli_args.to, keepalive).await;
    session.close().await;
    result
}

async fn run(
    session: &mut Session,
    kind: SmsKind,
    from: &str,
    to: &str,
    keepalive: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match tokio::time::timeout(keepalive, lines.next_line()).await {
            Err(_idle) => {
                if let Err(e) = session.enquire_link().await {
                    warn!("enquire_link failed: {e}");
                    return Err(e.into());
                }
                continue;
            }
            Ok(line) => line?,
        };

        let Some(text) = line.filter(|l| !l.is_empty()) else {
            return Ok(());
        };

        let sms = ShortMessage::of_kind(kind, from, to, text);
        match session.submit_sm(&sms).await {
            Ok(message_id) => info!("Message accepted, message_id {message_id}"),
            Err(e) => error!("Message not accepted: {e}"),
        }
    }
}
