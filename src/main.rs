use anyhow::Context;
use corner_notifications::{app, config::VERSION};
use corner_notifications_config::NotificationsConfig;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    color_backtrace::install();
    init_logging();

    tracing::info!("Starting corner-notifications {}", VERSION);
    let config = NotificationsConfig::load();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(app::run(config)).inspect_err(|err| {
        tracing::error!("{:#}", err);
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    #[cfg(feature = "systemd")]
    {
        if let Ok(journald) = tracing_journald::layer() {
            registry.with(journald).init();
            return;
        }
    }

    registry.with(fmt::layer()).init();
}
