use std::sync::Arc;

use crate::{
    events::{EventKind, EventListener, GatewayEvent},
    gateway::GatewayContext,
};

pub fn build() -> anyhow::Result<Arc<dyn EventListener<GatewayContext>>> {
    Ok(Arc::new(Listener))
}

pub struct Listener;

#[serenity::async_trait]
impl EventListener<GatewayContext> for Listener {
    fn kind(&self) -> EventKind {
        EventKind::Ready
    }

    async fn execute(&self, _ctx: &GatewayContext, event: &GatewayEvent) -> anyhow::Result<()> {
        let GatewayEvent::Ready(ready) = event else {
            return Ok(());
        };
        tracing::info!("Logged in successfully as {}", ready.user.tag());
        tracing::info!("Serving {} guilds", ready.guilds.len());
        Ok(())
    }
}
