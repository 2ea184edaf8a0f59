use rdns_cache_application::ports::MessageBus;
use rdns_cache_domain::config::{BusConfig, BusKind};
use rdns_cache_infrastructure::bus::{InProcessBus, RedisBus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// `split_roles` is true when this process runs only part of the pipeline,
/// which an in-process bus cannot connect to the rest.
pub async fn connect_bus(cfg: &BusConfig, split_roles: bool) -> anyhow::Result<Arc<dyn MessageBus>> {
    match cfg.kind {
        BusKind::InProcess => {
            if split_roles {
                warn!("In-process bus selected for a single role; other processes will not see its messages");
            }
            info!("Using in-process message bus");
            Ok(Arc::new(InProcessBus::new()))
        }
        BusKind::Redis => {
            let bus = RedisBus::connect(
                &cfg.host,
                cfg.port,
                Duration::from_secs(cfg.keepalive_secs),
            )
            .await?;
            info!(host = %cfg.host, port = cfg.port, "Connected to message bus");
            Ok(Arc::new(bus))
        }
    }
}
