//! Fakes shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, GuildId, UserId};

use crate::{
    commands::CommandHandler,
    events::{EventKind, EventListener, GatewayEvent},
    interaction::{Actor, AutocompleteChoice, Invocation, InvocationKind, Origin, Reply},
};

/// Something an [`Invocation`] was asked to send.
#[derive(Clone, Debug)]
pub enum Recorded {
    Reply(Reply),
    Defer,
    FollowUp(Reply),
    Suggest(Vec<AutocompleteChoice>),
}

pub struct MockInvocation {
    kind: InvocationKind,
    command: String,
    subcommand: Option<String>,
    user: Actor,
    origin: Origin,
    user_options: HashMap<String, Actor>,
    string_options: HashMap<String, String>,
    focused: Option<(String, String)>,
    latency: Option<Duration>,
    recorded: Mutex<Vec<Recorded>>,
}

impl MockInvocation {
    pub fn command(name: &str) -> Self {
        Self {
            kind: InvocationKind::ChatInput,
            command: name.to_string(),
            subcommand: None,
            user: Actor {
                id: UserId::new(1),
                username: "tester".into(),
                display_name: "Tester".into(),
                avatar: None,
            },
            origin: Origin::DirectMessage,
            user_options: HashMap::new(),
            string_options: HashMap::new(),
            focused: None,
            latency: None,
            recorded: Mutex::new(vec![]),
        }
    }

    pub fn with_subcommand(mut self, name: &str) -> Self {
        self.subcommand = Some(name.to_string());
        self
    }

    pub fn with_kind(mut self, kind: InvocationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_user(mut self, user: Actor) -> Self {
        self.user = user;
        self
    }

    pub fn with_user_option(mut self, name: &str, user: Actor) -> Self {
        self.user_options.insert(name.to_string(), user);
        self
    }

    pub fn with_string_option(mut self, name: &str, value: &str) -> Self {
        self.string_options
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_focused(mut self, name: &str, value: &str) -> Self {
        self.focused = Some((name.to_string(), value.to_string()));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn in_guild(mut self, id: u64, name: &str) -> Self {
        self.origin = Origin::Guild {
            id: GuildId::new(id),
            name: Some(name.to_string()),
        };
        self
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().clone()
    }

    /// Text content of every reply and follow-up, in order.
    pub fn replies(&self) -> Vec<String> {
        self.recorded
            .lock()
            .iter()
            .filter_map(|r| match r {
                Recorded::Reply(reply) | Recorded::FollowUp(reply) => reply.content.clone(),
                _ => None,
            })
            .collect()
    }

    fn record(&self, recorded: Recorded) {
        self.recorded.lock().push(recorded);
    }
}

#[serenity::async_trait]
impl Invocation for MockInvocation {
    fn kind(&self) -> InvocationKind {
        self.kind
    }
    fn command_name(&self) -> &str {
        &self.command
    }
    fn subcommand_name(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }
    fn user(&self) -> Actor {
        self.user.clone()
    }
    fn origin(&self) -> Origin {
        self.origin.clone()
    }
    fn user_option(&self, name: &str) -> Option<Actor> {
        self.user_options.get(name).cloned()
    }
    fn string_option(&self, name: &str) -> Option<&str> {
        self.string_options.get(name).map(String::as_str)
    }
    fn focused_option(&self) -> Option<(&str, &str)> {
        self.focused
            .as_ref()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
    fn gateway_latency(&self) -> Option<Duration> {
        self.latency
    }

    async fn reply(&self, reply: Reply) -> anyhow::Result<()> {
        self.record(Recorded::Reply(reply));
        Ok(())
    }
    async fn defer(&self) -> anyhow::Result<()> {
        self.record(Recorded::Defer);
        Ok(())
    }
    async fn follow_up(&self, reply: Reply) -> anyhow::Result<()> {
        self.record(Recorded::FollowUp(reply));
        Ok(())
    }
    async fn suggest(&self, choices: Vec<AutocompleteChoice>) -> anyhow::Result<()> {
        self.record(Recorded::Suggest(choices));
        Ok(())
    }
}

/// A command that counts how often it runs and which subcommand it saw.
pub struct FakeCommand {
    name: String,
    schema_name: Option<String>,
    options: Vec<CreateCommandOption>,
    fail: bool,
    pub executions: AtomicUsize,
    pub seen_subcommands: Mutex<Vec<Option<String>>>,
}

impl FakeCommand {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            schema_name: None,
            options: vec![],
            fail: false,
            executions: AtomicUsize::new(0),
            seen_subcommands: Mutex::new(vec![]),
        }
    }

    pub fn with_subcommands(mut self, names: &[&str]) -> Self {
        self.options.extend(names.iter().map(|name| {
            CreateCommandOption::new(CommandOptionType::SubCommand, *name, "A subcommand")
        }));
        self
    }

    pub fn with_string_option(mut self, name: &str) -> Self {
        self.options.push(CreateCommandOption::new(
            CommandOptionType::String,
            name,
            "A string",
        ));
        self
    }

    pub fn with_schema_name(mut self, name: &str) -> Self {
        self.schema_name = Some(name.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[serenity::async_trait]
impl CommandHandler for FakeCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> CreateCommand {
        let name = self.schema_name.as_deref().unwrap_or(&self.name);
        self.options
            .iter()
            .cloned()
            .fold(CreateCommand::new(name).description("A fake"), |cmd, opt| {
                cmd.add_option(opt)
            })
    }

    async fn execute(&self, invocation: &dyn Invocation) -> anyhow::Result<()> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        self.seen_subcommands
            .lock()
            .push(invocation.subcommand_name().map(str::to_string));
        if self.fail {
            anyhow::bail!("{} failed", self.name);
        }
        Ok(())
    }
}

/// An event listener that counts deliveries, optionally failing each one.
pub struct CountingListener {
    kind: EventKind,
    once: bool,
    fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl CountingListener {
    pub fn new(kind: EventKind, once: bool) -> Self {
        Self {
            kind,
            once,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[serenity::async_trait]
impl<C: Send + Sync> EventListener<C> for CountingListener {
    fn kind(&self) -> EventKind {
        self.kind
    }

    fn once(&self) -> bool {
        self.once
    }

    async fn execute(&self, _ctx: &C, _event: &GatewayEvent) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("listener failed");
        }
        Ok(())
    }
}
