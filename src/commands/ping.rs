use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use serenity::all::CreateCommand;

use crate::{
    commands::CommandHandler,
    constant,
    interaction::{Invocation, Reply},
};

pub fn build() -> anyhow::Result<Arc<dyn CommandHandler>> {
    Ok(Arc::new(Handler))
}

pub struct Handler;

#[serenity::async_trait]
impl CommandHandler for Handler {
    fn name(&self) -> &str {
        constant::commands::PING
    }

    fn schema(&self) -> CreateCommand {
        CreateCommand::new(self.name()).description("Replies with Pong!")
    }

    async fn execute(&self, invocation: &dyn Invocation) -> anyhow::Result<()> {
        let started = Instant::now();
        invocation.defer().await?;
        let api_latency = started.elapsed();

        invocation
            .follow_up(Reply::text(latency_message(
                api_latency,
                invocation.gateway_latency(),
            )))
            .await
    }
}

/// `-1` stands in for the websocket latency until the shard has heartbeated.
fn latency_message(api: Duration, gateway: Option<Duration>) -> String {
    let gateway = gateway.map_or(-1, |latency| latency.as_millis() as i64);
    format!(
        "API Latency is **`{}`**ms\nWebsocket Latency is **`{gateway}`**ms",
        api.as_millis()
    )
}
