use std::path::PathBuf;

use clap::Parser;
use fake_logger::emitter::{self, Config, Emitter};
use tokio::runtime::Builder;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Emitter returned an error: {0}")]
    Emitter(#[from] emitter::Error),
}

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Args {
    /// path on disk to append log lines to, created if absent
    path: PathBuf,
    /// the time, in milliseconds, between appended lines
    #[clap(long, default_value_t = emitter::DEFAULT_INTERVAL_MILLISECONDS, value_parser = clap::value_parser!(u64).range(1..))]
    interval_milliseconds: u64,
    /// seed for line selection, random when absent
    #[clap(long)]
    seed: Option<u64>,
}

async fn inner_main(config: Config) -> Result<(), Error> {
    // Nothing ever fires the broadcaster: the emitter runs until the process
    // is killed. It must stay bound though, dropping it fires the signal.
    let (shutdown_watcher, _shutdown_broadcast) = fake_logger_signal::signal();

    let emitter = Emitter::from_config(config, shutdown_watcher)?;
    emitter.spin().await.map_err(|err| {
        error!("Emitter shut down unexpectedly: {err}");
        Error::Emitter(err)
    })
}

fn main() -> Result<(), Error> {
    // Parse before anything else so a bad invocation exits without side
    // effects.
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish()
        .init();

    let version = env!("CARGO_PKG_VERSION");
    info!("Starting fake-logger {version}.");

    let config = Config {
        path: args.path,
        interval_milliseconds: args.interval_milliseconds,
        seed: args.seed,
    };

    let runtime = Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(inner_main(config))
}
