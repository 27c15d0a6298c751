use std::sync::Arc;

use serenity::all::{
    CommandOptionType, CreateCommand, CreateCommandOption, Permissions,
};

use crate::{
    constant,
    interaction::{Invocation, Reply},
    registry::{HandlerSource, handler_source},
};

pub mod avatar;
pub mod better_example;
pub mod ping;

/// A slash command the bot knows how to register and run.
#[serenity::async_trait]
pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &str;
    /// The shape registered with Discord; its name must equal [`Self::name`]
    fn schema(&self) -> CreateCommand;
    /// Permissions a member needs by default to see the command
    fn permissions(&self) -> Option<Permissions> {
        None
    }
    async fn execute(&self, invocation: &dyn Invocation) -> anyhow::Result<()>;
    async fn autocomplete(&self, _invocation: &dyn Invocation) -> anyhow::Result<()> {
        Ok(())
    }
}

/// One branch of a [`CommandWithSubcommands`].
#[serenity::async_trait]
pub trait Subcommand: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn options(&self) -> Vec<CreateCommandOption> {
        vec![]
    }
    async fn execute(&self, invocation: &dyn Invocation) -> anyhow::Result<()>;
    async fn autocomplete(&self, _invocation: &dyn Invocation) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A command assembled from named subcommands. Each subcommand is attached to
/// the schema as a nested option, and execution is routed by the invoked
/// subcommand's name.
pub struct CommandWithSubcommands {
    name: String,
    description: String,
    permissions: Option<Permissions>,
    subcommands: Vec<Box<dyn Subcommand>>,
}
impl CommandWithSubcommands {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            permissions: None,
            subcommands: vec![],
        }
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Adds a subcommand, replacing any earlier one with the same name.
    pub fn subcommand(mut self, subcommand: impl Subcommand + 'static) -> Self {
        self.subcommands.retain(|s| s.name() != subcommand.name());
        self.subcommands.push(Box::new(subcommand));
        self
    }

    fn find(&self, invocation: &dyn Invocation) -> Option<&dyn Subcommand> {
        let name = invocation.subcommand_name()?;
        self.subcommands
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }
}

#[serenity::async_trait]
impl CommandHandler for CommandWithSubcommands {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> CreateCommand {
        self.subcommands.iter().fold(
            CreateCommand::new(&self.name).description(&self.description),
            |cmd, subcommand| {
                let option = subcommand.options().into_iter().fold(
                    CreateCommandOption::new(
                        CommandOptionType::SubCommand,
                        subcommand.name(),
                        subcommand.description(),
                    ),
                    |option, sub_option| option.add_sub_option(sub_option),
                );
                cmd.add_option(option)
            },
        )
    }

    fn permissions(&self) -> Option<Permissions> {
        self.permissions
    }

    async fn execute(&self, invocation: &dyn Invocation) -> anyhow::Result<()> {
        match self.find(invocation) {
            Some(subcommand) => subcommand.execute(invocation).await,
            None => {
                invocation
                    .reply(Reply::text(constant::UNKNOWN_SUBCOMMAND))
                    .await
            }
        }
    }

    async fn autocomplete(&self, invocation: &dyn Invocation) -> anyhow::Result<()> {
        match self.find(invocation) {
            Some(subcommand) => subcommand.autocomplete(invocation).await,
            None => Ok(()),
        }
    }
}

/// Every command compiled into the bot.
pub fn sources() -> Vec<HandlerSource<Arc<dyn CommandHandler>>> {
    vec![
        handler_source!(ping),
        handler_source!(avatar),
        handler_source!(better_example),
    ]
}
