use rdns_cache_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        database = %config.database.path,
        bus = ?config.bus.kind,
        batch_size = config.queue.batch_size,
        fill_policy = ?config.queue.fill_policy,
        "Configuration loaded"
    );

    Ok(config)
}
