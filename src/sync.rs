//! Pushes the locally registered command schemas to Discord.

use serenity::{
    all::{
        Command, CreateCommand, GuildId, Http, InstallationContext, InteractionContext,
    },
    async_trait,
};

use crate::{
    commands::CommandHandler,
    config::{Configuration, DeploymentMode},
    logging::ALERT_TARGET,
    registry::Registry,
};

/// The administrative half of the Discord API: replacing the set of
/// registered commands.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn set_guild_commands(
        &self,
        guild_id: GuildId,
        commands: Vec<CreateCommand>,
    ) -> anyhow::Result<usize>;
    async fn set_global_commands(&self, commands: Vec<CreateCommand>) -> anyhow::Result<usize>;
}

#[async_trait]
impl CommandSink for Http {
    async fn set_guild_commands(
        &self,
        guild_id: GuildId,
        commands: Vec<CreateCommand>,
    ) -> anyhow::Result<usize> {
        Ok(guild_id.set_commands(self, commands).await?.len())
    }

    async fn set_global_commands(&self, commands: Vec<CreateCommand>) -> anyhow::Result<usize> {
        Ok(Command::set_global_commands(self, commands).await?.len())
    }
}

/// Outcome of [`register_commands`].
#[derive(Debug, PartialEq, Eq)]
pub enum Registration {
    Skipped,
    Guild { guild_id: GuildId, count: usize },
    Global { count: usize },
    Failed,
}

/// The schema as sent to Discord: usable in DMs with the bot and in guilds,
/// installable to guilds and to user accounts.
pub fn deployable_schema(command: &dyn CommandHandler) -> CreateCommand {
    let schema = command
        .schema()
        .contexts(vec![InteractionContext::BotDm, InteractionContext::Guild])
        .integration_types(vec![InstallationContext::Guild, InstallationContext::User]);
    match command.permissions() {
        Some(permissions) => schema.default_member_permissions(permissions),
        None => schema,
    }
}

/// Replaces Discord's command set with the registry's. In development mode the
/// commands go to the configured guild, and registration is skipped if there
/// is none. Failures are logged, never returned: the bot keeps serving
/// whatever Discord already knows about.
pub async fn register_commands(
    sink: &dyn CommandSink,
    registry: &Registry,
    config: &Configuration,
) -> Registration {
    tracing::info!("Registering commands with Discord...");

    let commands: Vec<_> = registry
        .commands()
        .map(|command| deployable_schema(command.as_ref()))
        .collect();

    match config.mode {
        DeploymentMode::Development => {
            let guild_id = match config.dev_guild_id() {
                Ok(Some(guild_id)) => guild_id,
                Ok(None) => {
                    tracing::warn!("DEV_GUILD_ID not set, skipping guild command registration");
                    return Registration::Skipped;
                }
                Err(err) => {
                    tracing::warn!("{err}, skipping guild command registration");
                    return Registration::Skipped;
                }
            };

            match sink.set_guild_commands(guild_id, commands).await {
                Ok(count) => {
                    tracing::info!("Registered {count} commands to guild {guild_id}");
                    Registration::Guild { guild_id, count }
                }
                Err(err) => {
                    tracing::error!(target: ALERT_TARGET, "Failed to register commands: {err:#}");
                    Registration::Failed
                }
            }
        }
        DeploymentMode::Production => match sink.set_global_commands(commands).await {
            Ok(count) => {
                tracing::info!("Registered {count} commands globally");
                Registration::Global { count }
            }
            Err(err) => {
                tracing::error!(target: ALERT_TARGET, "Failed to register commands: {err:#}");
                Registration::Failed
            }
        },
    }
}
