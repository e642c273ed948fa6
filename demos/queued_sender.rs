// ABOUTME: Funnels messages from many producer tasks through one session-owning task
// ABOUTME: Keeps the link alive with enquire_link whenever the queue is idle

use argh::FromArgs;
use smpp_session::client::{Session, SessionBuilder};
use smpp_session::datatypes::{BindCredentials, ShortMessage};
use std::error::Error;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Submit messages from concurrent producers over a single session
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

    /// the telephone number that the messages will be from
    #[argh(option, short = 'f')]
    from: String,

    /// number of producer tasks (default: 4)
    #[argh(option)]
    producers: Option<usize>,
}

type Reply = oneshot::Sender<Result<String, String>>;

/// Owns the session; everything else talks to it through the queue.
async fn session_task(mut session: Session, mut queue: mpsc::Receiver<(ShortMessage, Reply)>) {
    let idle = session.options().enquire_link_interval;

    loop {
        let job = tokio::select! {
            job = queue.recv() => job,
            _ = tokio::time::sleep(idle) => {
                if let Err(e) = session.enquire_link().await {
                    error!("Link check failed: {e}");
                    break;
                }
                continue;
            }
        };

        let Some((sms, reply)) = job else {
            break;
        };
        let result = session.submit_sm(&sms).await.map_err(|e| e.to_string());
        if reply.send(result).is_err() {
            warn!("Producer went away before its result arrived");
        }
    }

    session.close().await;
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

    let session = SessionBuilder::new()
        .enquire_link_interval(Duration::from_secs(30))
        .transmitter(format!("{host}:{port}"), credentials)
        .await?;

    let (tx, rx) = mpsc::channel(32);
    let worker = tokio::spawn(session_task(session, rx));

    let mut producers = Vec::new();
    for n in 0..cli_args.producers.unwrap_or(4) {
        let tx = tx.clone();
        let sms = ShortMessage::new(
            cli_args.from.clone(),
            cli_args.to.clone(),
            format!("message from producer {n}"),
        );
        producers.push(tokio::spawn(async move {
            let (reply_tx, reply_rx) = oneshot::channel();
            if tx.send((sms, reply_tx)).await.is_err() {
                return;
            }
            match reply_rx.await {
                Ok(Ok(id)) => info!("Producer {n}: accepted as {id}"),
                Ok(Err(e)) => error!("Producer {n}: rejected: {e}"),
                Err(_) => error!("Producer {n}: session task ended"),
            }
        }));
    }
    drop(tx);

    for producer in producers {
        producer.await?;
    }
    worker.await?;
    Ok(())
}
