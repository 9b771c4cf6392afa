//! dnspin daemon entry point.

use clap::Parser;
use dnspin::daemon::{self, DEFAULT_INTERVAL_SECS, Settings};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "dnspin", version, about = "Pin hostnames to addresses from explicit DNS servers")]
struct Args {
    /// Host configuration file: one `hostname server` pair per line.
    #[arg(short, long, default_value = "dnspin.conf")]
    config: PathBuf,

    /// Target hosts file to keep synchronized.
    #[arg(long, default_value = "/etc/hosts")]
    hosts_file: PathBuf,

    /// Seconds to sleep between cycles.
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u64,
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let args = Args::parse();

    let mut hosts = match dnspin::load_host_config(&args.config) {
        Ok(hosts) => hosts,
        Err(e) => {
            tracing::error!(config = %args.config.display(), error = %e, "Failed to load config");
            std::process::exit(1);
        }
    };

    tracing::info!(
        config = %args.config.display(),
        hosts = hosts.len(),
        target = %args.hosts_file.display(),
        "Starting dnspin"
    );

    let settings =
        Settings::new(args.hosts_file).with_interval(Duration::from_secs(args.interval));
    daemon::run(&mut hosts, &settings).await
}
