use std::{sync::Arc, time::Duration};

use serenity::{
    all::{Context, EventHandler, Interaction, Ready},
    async_trait,
    gateway::ShardManager,
    prelude::TypeMapKey,
};

use crate::{
    events::{EventBus, GatewayEvent},
    registry::Registry,
};

/// What every event listener receives alongside the event.
pub struct GatewayContext {
    pub discord: Context,
    pub registry: Arc<Registry>,
}

/// Stored in the client's data map so listeners can read shard latency.
pub struct ShardManagerKey;
impl TypeMapKey for ShardManagerKey {
    type Value = Arc<ShardManager>;
}

/// Forwards serenity's callbacks onto the [`EventBus`].
pub struct Gateway {
    bus: Arc<EventBus<GatewayContext>>,
    registry: Arc<Registry>,
}
impl Gateway {
    pub fn new(bus: Arc<EventBus<GatewayContext>>, registry: Arc<Registry>) -> Self {
        Self { bus, registry }
    }

    async fn emit(&self, discord: Context, event: GatewayEvent) {
        let ctx = GatewayContext {
            discord,
            registry: self.registry.clone(),
        };
        let listeners = self.bus.emit(&ctx, &event).await;
        tracing::trace!("{:?} delivered to {listeners} listeners", event.kind());
    }
}

#[async_trait]
impl EventHandler for Gateway {
    async fn ready(&self, ctx: Context, ready: Ready) {
        self.emit(ctx, GatewayEvent::Ready(Box::new(ready))).await;
    }

    async fn shards_ready(&self, ctx: Context, total_shards: u32) {
        self.emit(ctx, GatewayEvent::ShardsReady { total_shards })
            .await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        self.emit(ctx, GatewayEvent::InteractionCreate(Box::new(interaction)))
            .await;
    }
}

/// The last heartbeat round trip of the shard `ctx` belongs to.
pub async fn shard_latency(ctx: &Context) -> Option<Duration> {
    let manager = ctx.data.read().await.get::<ShardManagerKey>().cloned()?;
    let runners = manager.runners.lock().await;
    runners.get(&ctx.shard_id).and_then(|runner| runner.latency)
}
