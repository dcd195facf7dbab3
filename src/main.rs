use std::sync::{Arc, Mutex};

use anyhow::Context;
use itres::cache::RecordCache;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

mod config;
use config::Config;

mod resolver;
use resolver::codec::WireCodec;
use resolver::transport::UdpTransport;
use resolver::Resolver;

mod shell;
use shell::Shell;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with the prompt
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::default();

    let transport = UdpTransport::bind(&config)
        .await
        .context("couldn't bind a UDP socket")?;

    let cache = Arc::new(Mutex::new(RecordCache::new()));
    let resolver = Resolver::new(transport, WireCodec, cache, config);

    let mut shell = Shell::new(resolver, std::io::stdout());
    shell.run(BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
