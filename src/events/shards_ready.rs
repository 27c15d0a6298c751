use std::sync::Arc;

use crate::{
    events::{EventKind, EventListener, GatewayEvent},
    gateway::GatewayContext,
};

pub fn build() -> anyhow::Result<Arc<dyn EventListener<GatewayContext>>> {
    Ok(Arc::new(Listener))
}

/// Reports once that the whole shard set is connected; reconnects are not
/// worth a log line.
pub struct Listener;

#[serenity::async_trait]
impl EventListener<GatewayContext> for Listener {
    fn kind(&self) -> EventKind {
        EventKind::ShardsReady
    }

    fn once(&self) -> bool {
        true
    }

    async fn execute(&self, _ctx: &GatewayContext, event: &GatewayEvent) -> anyhow::Result<()> {
        if let GatewayEvent::ShardsReady { total_shards } = event {
            tracing::info!("All {total_shards} shards are connected");
        }
        Ok(())
    }
}
