//! IPK24-CHAT client binary.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a local server on the default port
//! ipk24chat-client -t tcp -s localhost
//!
//! # Verbose protocol tracing on stderr
//! RUST_LOG=debug ipk24chat-client -t tcp -s chat.example.com -p 4567
//! ```

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use ipk24chat_app::{
    ClientConfig, ClientError, Console, DEFAULT_PORT, EventLoop, InterruptBridge, Outcome,
    connect, forward_ctrl_c,
};
use ipk24chat_client::Output;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Transport protocol.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Transport {
    /// Stream transport.
    Tcp,
    /// Datagram transport.
    Udp,
}

/// IPK24-CHAT client
#[derive(Parser, Debug)]
#[command(name = "ipk24chat-client")]
#[command(about = "Terminal chat client for the IPK24-CHAT protocol")]
#[command(version)]
struct Args {
    /// Transport protocol
    #[arg(short, long, value_enum)]
    transport: Transport,

    /// Server hostname or IP address
    #[arg(short, long)]
    server: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(args) {
        Ok(outcome) => {
            if let Outcome::Failed(reason) = &outcome {
                tracing::debug!(%reason, "session failed");
            }
            outcome.exit_code()
        },
        Err(err) => {
            tracing::debug!(?err, "client error");
            if let Err(io_err) = Console::stdio().print(&Output::LocalError(err.to_string())) {
                tracing::warn!(%io_err, "failed to report error");
            }
            ExitCode::FAILURE
        },
    }
}

impl Args {
    /// Validate the transport and port and build the connect config.
    fn into_config(self) -> Result<ClientConfig, ClientError> {
        match self.transport {
            Transport::Tcp => ClientConfig::new(self.server, self.port),
            Transport::Udp => Err(ClientError::UdpUnsupported),
        }
    }
}

fn run(args: Args) -> Result<Outcome, ClientError> {
    let config = args.into_config()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ClientError::Runtime)?;

    let result = runtime.block_on(async {
        let stream = connect(&config).await?;

        let interrupts = InterruptBridge::new();
        let _ctrl_c = forward_ctrl_c(interrupts.notifier());

        let input = BufReader::new(tokio::io::stdin());
        let event_loop = EventLoop::new(input, stream, interrupts, Console::stdio());
        let outcome = event_loop.run().await?;
        Ok::<_, ClientError>(outcome)
    });

    // A blocked stdin read must not hold the process open.
    runtime.shutdown_background();
    result
}
