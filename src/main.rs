use clap::Parser;
use mimalloc::MiMalloc;
use tracing::{error, info};

use toaster::cli::{Cli, execute};
use toaster::{Classify, Config};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref())?;
    toaster::utils::logging::init(&cfg.basic.loglevel);

    info!(
        organization = %cfg.github.organization,
        remote = %cfg.github.remote,
        cache_path = %cfg.basic.cache_path.display(),
        api_url = %cfg.github.api_url,
        proxy = %cfg.github.proxy.as_ref().map_or("<none>", |u| u.as_str()),
        token = cfg.github.token.is_some(),
        loglevel = %cfg.basic.loglevel
    );

    if let Err(e) = execute(cli.command, &cfg).await {
        error!(kind = ?e.kind(), error = %e, "command failed");
        return Err(e.into());
    }
    Ok(())
}
