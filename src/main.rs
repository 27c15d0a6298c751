use std::sync::Arc;

use anyhow::Context as AnyhowContext;
use serenity::{Client, model::prelude::GatewayIntents};

mod commands;
mod config;
mod constant;
mod dispatch;
mod events;
mod gateway;
mod interaction;
mod logging;
mod registry;
mod sync;
#[cfg(test)]
mod testing;

use config::Configuration;

use crate::{
    events::EventBus,
    gateway::{Gateway, ShardManagerKey},
    registry::Registry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Configuration::load()?;
    let _log_guards = logging::init(config.mode, &config.logging)?;
    tracing::info!("Starting in {} mode", config.mode);

    let token = config
        .token()
        .context("Expected a Discord token for the current mode")?
        .to_string();

    let bus = Arc::new(EventBus::new());
    registry::register_events(&bus, events::sources());
    tracing::debug!("{} event subscriptions active", bus.len());

    let registry = Arc::new(Registry::build(commands::sources()));

    let mut client = Client::builder(&token, GatewayIntents::GUILDS)
        .event_handler(Gateway::new(bus, registry.clone()))
        .await
        .context("Error creating client")?;
    client
        .data
        .write()
        .await
        .insert::<ShardManagerKey>(client.shard_manager.clone());

    sync::register_commands(&*client.http, &registry, &config).await;

    if let Err(why) = client.start().await {
        tracing::error!("Client error: {why:?}");
    }

    Ok(())
}
