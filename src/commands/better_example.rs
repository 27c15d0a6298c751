use std::sync::Arc;

use serenity::all::{CommandOptionType, CreateCommandOption, Permissions};

use crate::{
    commands::{CommandHandler, CommandWithSubcommands, Subcommand},
    constant,
    interaction::{AutocompleteChoice, Invocation, Reply},
};

/// What `info` can be asked about.
const TOPICS: &[&str] = &["commands", "subcommands", "events", "registration"];

pub fn build() -> anyhow::Result<Arc<dyn CommandHandler>> {
    Ok(Arc::new(
        CommandWithSubcommands::new(
            constant::commands::BETTER_EXAMPLE,
            "A better example command with subcommands",
        )
        .with_permissions(Permissions::USE_APPLICATION_COMMANDS)
        .subcommand(Info)
        .subcommand(Status)
        .subcommand(Ping),
    ))
}

struct Info;

#[serenity::async_trait]
impl Subcommand for Info {
    fn name(&self) -> &str {
        "info"
    }
    fn description(&self) -> &str {
        "Get information about something"
    }
    fn options(&self) -> Vec<CreateCommandOption> {
        vec![
            CreateCommandOption::new(
                CommandOptionType::String,
                constant::value::TOPIC,
                "What to get information about",
            )
            .set_autocomplete(true),
        ]
    }
    async fn execute(&self, invocation: &dyn Invocation) -> anyhow::Result<()> {
        let reply = match invocation.string_option(constant::value::TOPIC) {
            Some(topic) => format!("This is the info subcommand! You asked about {topic}."),
            None => "This is the info subcommand!".to_string(),
        };
        invocation.reply(Reply::text(reply)).await
    }
    async fn autocomplete(&self, invocation: &dyn Invocation) -> anyhow::Result<()> {
        let typed = invocation
            .focused_option()
            .map(|(_, value)| value.trim().to_lowercase())
            .unwrap_or_default();
        let choices = TOPICS
            .iter()
            .filter(|topic| topic.starts_with(&typed))
            .map(|topic| AutocompleteChoice::new(*topic, *topic))
            .collect();
        invocation.suggest(choices).await
    }
}

struct Status;

#[serenity::async_trait]
impl Subcommand for Status {
    fn name(&self) -> &str {
        "status"
    }
    fn description(&self) -> &str {
        "Check the status of something"
    }
    async fn execute(&self, invocation: &dyn Invocation) -> anyhow::Result<()> {
        invocation.reply(Reply::text("Status: All good!")).await
    }
}

struct Ping;

#[serenity::async_trait]
impl Subcommand for Ping {
    fn name(&self) -> &str {
        "ping"
    }
    fn description(&self) -> &str {
        "Ping the bot"
    }
    async fn execute(&self, invocation: &dyn Invocation) -> anyhow::Result<()> {
        invocation.reply(Reply::text("Pong!")).await
    }
}
