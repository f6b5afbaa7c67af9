use gbsgrid::statics;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(statics::DEFAULT_LOG_DIRECTIVE))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting gbsgrid");
    gbsgrid::run_gui().map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
