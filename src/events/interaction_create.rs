use std::sync::Arc;

use crate::{
    dispatch,
    events::{EventKind, EventListener, GatewayEvent},
    gateway::{self, GatewayContext},
    interaction::{self, InvocationKind, SlashInvocation},
};

pub fn build() -> anyhow::Result<Arc<dyn EventListener<GatewayContext>>> {
    Ok(Arc::new(Listener))
}

/// Hands command interactions to the dispatcher and autocomplete requests to
/// their command. Components, modals and pings are not handled.
pub struct Listener;

#[serenity::async_trait]
impl EventListener<GatewayContext> for Listener {
    fn kind(&self) -> EventKind {
        EventKind::InteractionCreate
    }

    async fn execute(&self, ctx: &GatewayContext, event: &GatewayEvent) -> anyhow::Result<()> {
        let GatewayEvent::InteractionCreate(interaction) = event else {
            return Ok(());
        };
        let Some((cmd, kind)) = interaction::classify(interaction) else {
            return Ok(());
        };

        let guild_name = cmd.guild_id.and_then(|id| {
            ctx.discord
                .cache
                .guild(id)
                .map(|guild| guild.name.clone())
        });
        let latency = gateway::shard_latency(&ctx.discord).await;

        let invocation = SlashInvocation::new(&ctx.discord.http, cmd, kind, guild_name, latency);
        match kind {
            InvocationKind::Autocomplete => {
                dispatch::autocomplete(&ctx.registry, &invocation).await?;
            }
            _ => {
                dispatch::dispatch(&ctx.registry, &invocation).await?;
            }
        }
        Ok(())
    }
}
