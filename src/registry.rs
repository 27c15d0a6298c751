use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use serenity::all::{CommandOptionType, CreateCommand};

use crate::{
    commands::CommandHandler,
    constant,
    events::{EventBus, EventListener},
};

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("failed to instantiate handler: {0:#}")]
    Instantiation(anyhow::Error),
    #[error("command schema could not be serialized: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("command schema has no name")]
    MissingName,
    #[error("handler is named {declared:?} but its schema is named {schema:?}")]
    NameMismatch { declared: String, schema: String },
}

/// A named factory for a handler, compiled into the binary.
pub struct HandlerSource<T> {
    pub origin: &'static str,
    build: fn() -> anyhow::Result<T>,
}
impl<T> HandlerSource<T> {
    pub const fn new(origin: &'static str, build: fn() -> anyhow::Result<T>) -> Self {
        Self { origin, build }
    }

    pub fn instantiate(&self) -> Result<T, RegistryError> {
        (self.build)().map_err(RegistryError::Instantiation)
    }
}

/// Builds a [`HandlerSource`] from a module exposing `fn build()`.
macro_rules! handler_source {
    ($module:ident) => {
        $crate::registry::HandlerSource::new(
            concat!(module_path!(), "::", stringify!($module)),
            $module::build,
        )
    };
}
pub(crate) use handler_source;

/// The command a subcommand key resolves to.
#[derive(Clone)]
pub struct SubcommandEntry {
    pub command: Arc<dyn CommandHandler>,
    pub subcommand: String,
}

/// Lookup tables for commands and their subcommands. Built once at startup
/// and shared read-only afterwards.
#[derive(Default)]
pub struct Registry {
    commands: HashMap<String, Arc<dyn CommandHandler>>,
    subcommands: HashMap<String, SubcommandEntry>,
}

impl Registry {
    /// Instantiates every source and indexes the result. Sources that fail are
    /// logged and skipped.
    pub fn build(
        sources: impl IntoIterator<Item = HandlerSource<Arc<dyn CommandHandler>>>,
    ) -> Self {
        tracing::info!("Loading commands...");
        let mut registry = Self::default();

        for source in sources {
            let loaded = source
                .instantiate()
                .and_then(|handler| registry.insert(handler));
            match loaded {
                Ok(name) => tracing::debug!("Loaded command: {name} from {}", source.origin),
                Err(err) => tracing::error!("Failed to load command {}: {err}", source.origin),
            }
        }

        tracing::info!(
            "Successfully loaded {} commands with {} subcommands",
            registry.command_count(),
            registry.subcommand_count()
        );
        registry
    }

    /// Indexes a single command, replacing any command with the same name.
    /// Returns the name it was stored under.
    pub fn insert(&mut self, handler: Arc<dyn CommandHandler>) -> Result<String, RegistryError> {
        let schema = inspect(&handler.schema())?;
        if schema.name != handler.name() {
            return Err(RegistryError::NameMismatch {
                declared: handler.name().to_string(),
                schema: schema.name,
            });
        }

        if self.commands.remove(&schema.name).is_some() {
            tracing::warn!(
                "Command {} was loaded more than once; replacing the earlier definition",
                schema.name
            );
            self.subcommands
                .retain(|_, entry| entry.command.name() != schema.name);
        }

        for subcommand in schema.subcommands {
            let key = subcommand_key(&schema.name, &subcommand);
            tracing::debug!("Loaded subcommand: {key}");
            self.subcommands.insert(
                key,
                SubcommandEntry {
                    command: handler.clone(),
                    subcommand,
                },
            );
        }

        self.commands.insert(schema.name.clone(), handler);
        Ok(schema.name)
    }

    pub fn command(&self, name: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.commands.get(name)
    }

    pub fn subcommand(&self, command: &str, subcommand: &str) -> Option<&SubcommandEntry> {
        self.subcommands.get(&subcommand_key(command, subcommand))
    }

    pub fn commands(&self) -> impl Iterator<Item = &Arc<dyn CommandHandler>> {
        self.commands.values()
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn subcommand_count(&self) -> usize {
        self.subcommands.len()
    }
}

/// Instantiates every event source and subscribes it on `bus`. Sources that
/// fail are logged and skipped. Returns the number subscribed.
pub fn register_events<C: Send + Sync>(
    bus: &EventBus<C>,
    sources: impl IntoIterator<Item = HandlerSource<Arc<dyn EventListener<C>>>>,
) -> usize {
    tracing::info!("Loading events...");
    let mut loaded = 0;

    for source in sources {
        match source.instantiate() {
            Ok(listener) => {
                let kind = listener.kind();
                bus.subscribe(listener);
                loaded += 1;
                tracing::debug!("Loaded event: {kind:?} from {}", source.origin);
            }
            Err(err) => tracing::error!("Failed to load event {}: {err}", source.origin),
        }
    }

    tracing::info!("Successfully loaded {loaded} events");
    loaded
}

pub fn subcommand_key(command: &str, subcommand: &str) -> String {
    format!(
        "{command}{}{subcommand}",
        constant::SUBCOMMAND_KEY_SEPARATOR
    )
}

struct SchemaSummary {
    name: String,
    subcommands: Vec<String>,
}

/// Reads the name and subcommand option names out of a command schema.
fn inspect(schema: &CreateCommand) -> Result<SchemaSummary, RegistryError> {
    let value = serde_json::to_value(schema)?;

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or(RegistryError::MissingName)?
        .to_string();

    let subcommand_type = u64::from(u8::from(CommandOptionType::SubCommand));
    let subcommands = value
        .get("options")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|option| option.get("type").and_then(Value::as_u64) == Some(subcommand_type))
        .filter_map(|option| option.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    Ok(SchemaSummary { name, subcommands })
}
