// ABOUTME: Receiver that binds and prints every deliver_sm the SMSC pushes
// ABOUTME: Runs the session service loop until the configured duration elapses

use argh::FromArgs;
use bytes::Bytes;
use smpp_session::client::SessionBuilder;
use smpp_session::codec::Pdu;
use smpp_session::datatypes::{BindCredentials, CommandStatus, ShortMessage};
use std::error::Error;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Receive SMS messages and delivery receipts
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

    /// how long to stay bound in seconds (default: 300)
    #[argh(option)]
    run_duration: Option<u64>,
}

fn on_deliver(pdu: &Pdu) -> Pdu {
    match ShortMessage::from_pdu(pdu) {
        Ok(sms) if sms.is_delivery_receipt() => {
            info!(
                "Delivery receipt from {}: {}",
                sms.source_addr,
                String::from_utf8_lossy(&sms.short_message)
            );
            pdu.respond(CommandStatus::Ok as u32, Some(Bytes::from_static(b"\0")), None)
        }
        Ok(sms) => {
            info!(
                "SMS from {} to {}: {}",
                sms.source_addr,
                sms.destination_addr,
                String::from_utf8_lossy(&sms.short_message)
            );
            pdu.respond(CommandStatus::Ok as u32, Some(Bytes::from_static(b"\0")), None)
        }
        Err(e) => {
            warn!("Undecodable deliver_sm: {e}");
            pdu.respond(CommandStatus::SystemError as u32, None, None)
        }
    }
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
    let run_duration = Duration::from_secs(cli_args.run_duration.unwrap_or(300));
    let credentials = BindCredentials::new(
        cli_args.system_id.unwrap_or_default(),
        cli_args.password.unwrap_or_default(),
    );

    let mut session = SessionBuilder::new()
        .on_deliver_sm(on_deliver)
        .receiver(format!("{host}:{port}"), credentials)
        .await?;
    info!("Bound as receiver for {} seconds", run_duration.as_secs());

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(run_duration).await;
        let _ = stop_tx.send(true);
    });

    let outcome = session.serve(stop_rx).await;
    session.close().await;
    outcome?;
    Ok(())
}
