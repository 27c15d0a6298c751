use std::sync::Arc;

use parking_lot::Mutex;
use serenity::all::{Interaction, Ready};

use crate::{
    gateway::GatewayContext,
    registry::{HandlerSource, handler_source},
};

pub mod interaction_create;
pub mod ready;
pub mod shards_ready;

/// The gateway events listeners can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    ShardsReady,
    InteractionCreate,
}

/// A gateway event, as delivered to listeners.
#[derive(Debug)]
pub enum GatewayEvent {
    Ready(Box<Ready>),
    ShardsReady { total_shards: u32 },
    InteractionCreate(Box<Interaction>),
}
impl GatewayEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GatewayEvent::Ready(_) => EventKind::Ready,
            GatewayEvent::ShardsReady { .. } => EventKind::ShardsReady,
            GatewayEvent::InteractionCreate(_) => EventKind::InteractionCreate,
        }
    }
}

#[serenity::async_trait]
pub trait EventListener<C: Send + Sync>: Send + Sync {
    fn kind(&self) -> EventKind;
    /// Whether to unsubscribe after the first delivery
    fn once(&self) -> bool {
        false
    }
    async fn execute(&self, ctx: &C, event: &GatewayEvent) -> anyhow::Result<()>;
}

struct Subscription<C: Send + Sync> {
    kind: EventKind,
    once: bool,
    listener: Arc<dyn EventListener<C>>,
}

/// Subscription table that gateway events are fanned out through.
pub struct EventBus<C: Send + Sync> {
    subscriptions: Mutex<Vec<Subscription<C>>>,
}

impl<C: Send + Sync> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send + Sync> EventBus<C> {
    pub fn new() -> Self {
        Self {
            subscriptions: Mutex::new(vec![]),
        }
    }

    pub fn subscribe(&self, listener: Arc<dyn EventListener<C>>) {
        self.subscriptions.lock().push(Subscription {
            kind: listener.kind(),
            once: listener.once(),
            listener,
        });
    }

    pub fn len(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Runs every listener subscribed to the event's kind, one after another.
    /// Listener errors are logged here and never propagate further, so one
    /// failing handler cannot take the process down. Returns how many
    /// listeners ran.
    pub async fn emit(&self, ctx: &C, event: &GatewayEvent) -> usize {
        let kind = event.kind();
        let listeners: Vec<_> = {
            let mut subscriptions = self.subscriptions.lock();
            let matched = subscriptions
                .iter()
                .filter(|s| s.kind == kind)
                .map(|s| s.listener.clone())
                .collect();
            subscriptions.retain(|s| !(s.once && s.kind == kind));
            matched
        };

        for listener in &listeners {
            if let Err(err) = listener.execute(ctx, event).await {
                tracing::error!("Error while handling {kind:?}: {err:#}");
            }
        }
        listeners.len()
    }
}

/// Every event listener compiled into the bot.
pub fn sources() -> Vec<HandlerSource<Arc<dyn EventListener<GatewayContext>>>> {
    vec![
        handler_source!(ready),
        handler_source!(shards_ready),
        handler_source!(interaction_create),
    ]
}
