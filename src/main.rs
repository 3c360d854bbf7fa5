use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use navigator_cli::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_file.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting navigator");

    cli::dispatch(&cli).await
}

fn init_logging(level: &str, log_file: Option<&std::path::Path>) -> anyhow::Result<()> {
    let env_filter = std::env::var("NAVIGATOR_LOG")
        .ok()
        .and_then(|value| tracing_subscriber::EnvFilter::try_new(value).ok())
        .or_else(|| tracing_subscriber::EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| tracing_subscriber::EnvFilter::new(level.to_string()));

    let registry = tracing_subscriber::registry().with(env_filter).with(tracing_subscriber::fmt::layer());

    match log_file {
        Some(path) => {
            let directory = path.parent().filter(|parent| !parent.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().ok_or_else(|| anyhow::anyhow!("--log-file must name a file"))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            std::mem::forget(guard);
            registry.with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking)).init();
        }
        None => registry.init(),
    }

    Ok(())
}
