use std::time::Duration;

use serenity::{all::*, async_trait};

/// What kind of interaction an [`Invocation`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationKind {
    /// A slash command typed into the chat box.
    ChatInput,
    /// A user or message context-menu command.
    ContextMenu,
    /// Partial input sent while the user is still typing an option.
    Autocomplete,
}

/// The user behind an interaction, or a user passed as an option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    /// Avatar hash; `None` when the user has the default avatar
    pub avatar: Option<String>,
}
impl Actor {
    const CDN: &'static str = "https://cdn.discordapp.com";

    pub fn has_animated_avatar(&self) -> bool {
        self.avatar.as_deref().is_some_and(|hash| hash.starts_with("a_"))
    }

    /// URL of the avatar in the given format (`png`, `gif`, ...), or of the
    /// default avatar if the user has none.
    pub fn avatar_url(&self, extension: &str, size: u16) -> String {
        match &self.avatar {
            Some(hash) => format!(
                "{}/avatars/{}/{hash}.{extension}?size={size}",
                Self::CDN,
                self.id
            ),
            None => format!(
                "{}/embed/avatars/{}.png",
                Self::CDN,
                (self.id.get() >> 22) % 6
            ),
        }
    }
}
impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.name.clone(),
            display_name: user.display_name().to_string(),
            avatar: user.avatar.as_ref().map(|hash| hash.to_string()),
        }
    }
}

/// Where an interaction was invoked from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    DirectMessage,
    Guild { id: GuildId, name: Option<String> },
}
impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::DirectMessage => write!(f, "in DM"),
            Origin::Guild { id, name } => {
                write!(f, "in {} ({id})", name.as_deref().unwrap_or("unknown guild"))
            }
        }
    }
}

/// A message sent back in response to an interaction.
#[derive(Clone, Debug, Default)]
pub struct Reply {
    pub content: Option<String>,
    pub embeds: Vec<CreateEmbed>,
    pub components: Vec<CreateActionRow>,
}
impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn components(mut self, components: Vec<CreateActionRow>) -> Self {
        self.components = components;
        self
    }

    fn into_response_message(self) -> CreateInteractionResponseMessage {
        let mut msg = CreateInteractionResponseMessage::new()
            .embeds(self.embeds)
            .components(self.components);
        if let Some(content) = self.content {
            msg = msg.content(content);
        }
        msg
    }

    fn into_followup(self) -> CreateInteractionResponseFollowup {
        let mut msg = CreateInteractionResponseFollowup::new()
            .embeds(self.embeds)
            .components(self.components);
        if let Some(content) = self.content {
            msg = msg.content(content);
        }
        msg
    }
}

/// The view of an interaction that command handlers and the dispatcher work with.
#[async_trait]
pub trait Invocation: Send + Sync {
    fn kind(&self) -> InvocationKind;
    fn command_name(&self) -> &str;
    /// The invoked subcommand, looking through a subcommand group if present
    fn subcommand_name(&self) -> Option<&str>;
    fn user(&self) -> Actor;
    fn origin(&self) -> Origin;
    /// A user passed to the (sub)command under `name`
    fn user_option(&self, name: &str) -> Option<Actor>;
    fn string_option(&self, name: &str) -> Option<&str>;
    /// The option currently being typed, for autocomplete
    fn focused_option(&self) -> Option<(&str, &str)>;
    /// Last heartbeat round trip of the shard that received this interaction
    fn gateway_latency(&self) -> Option<Duration>;

    async fn reply(&self, reply: Reply) -> anyhow::Result<()>;
    async fn defer(&self) -> anyhow::Result<()>;
    async fn follow_up(&self, reply: Reply) -> anyhow::Result<()>;
    async fn suggest(&self, choices: Vec<AutocompleteChoice>) -> anyhow::Result<()>;
}

/// An [`Invocation`] backed by a live serenity interaction.
pub struct SlashInvocation<'a> {
    http: &'a Http,
    interaction: &'a CommandInteraction,
    kind: InvocationKind,
    guild_name: Option<String>,
    latency: Option<Duration>,
}
impl<'a> SlashInvocation<'a> {
    pub fn new(
        http: &'a Http,
        interaction: &'a CommandInteraction,
        kind: InvocationKind,
        guild_name: Option<String>,
        latency: Option<Duration>,
    ) -> Self {
        Self {
            http,
            interaction,
            kind,
            guild_name,
            latency,
        }
    }

    /// Options of the innermost subcommand, or the top-level options.
    fn leaf_options(&self) -> &[CommandDataOption] {
        let mut options = self.interaction.data.options.as_slice();
        while let Some(CommandDataOption {
            value:
                CommandDataOptionValue::SubCommand(inner)
                | CommandDataOptionValue::SubCommandGroup(inner),
            ..
        }) = options.first()
        {
            options = inner;
        }
        options
    }
}

/// Splits an interaction into the command payload and its kind; `None` for
/// components, modals and pings.
pub fn classify(interaction: &Interaction) -> Option<(&CommandInteraction, InvocationKind)> {
    match interaction {
        Interaction::Command(cmd) if cmd.data.kind == CommandType::ChatInput => {
            Some((cmd, InvocationKind::ChatInput))
        }
        Interaction::Command(cmd) => Some((cmd, InvocationKind::ContextMenu)),
        Interaction::Autocomplete(cmd) => Some((cmd, InvocationKind::Autocomplete)),
        _ => None,
    }
}

#[async_trait]
impl Invocation for SlashInvocation<'_> {
    fn kind(&self) -> InvocationKind {
        self.kind
    }

    fn command_name(&self) -> &str {
        &self.interaction.data.name
    }

    fn subcommand_name(&self) -> Option<&str> {
        match self.interaction.data.options.first() {
            Some(CommandDataOption {
                name,
                value: CommandDataOptionValue::SubCommand(_),
                ..
            }) => Some(name.as_str()),
            Some(CommandDataOption {
                value: CommandDataOptionValue::SubCommandGroup(inner),
                ..
            }) => inner.first().and_then(|opt| match opt.value {
                CommandDataOptionValue::SubCommand(_) => Some(opt.name.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }

    fn user(&self) -> Actor {
        Actor::from(&self.interaction.user)
    }

    fn origin(&self) -> Origin {
        match self.interaction.guild_id {
            Some(id) => Origin::Guild {
                id,
                name: self.guild_name.clone(),
            },
            None => Origin::DirectMessage,
        }
    }

    fn user_option(&self, name: &str) -> Option<Actor> {
        let user_id = self.leaf_options().iter().find_map(|opt| match opt.value {
            CommandDataOptionValue::User(id) if opt.name == name => Some(id),
            _ => None,
        })?;
        self.interaction
            .data
            .resolved
            .users
            .get(&user_id)
            .map(Actor::from)
    }

    fn string_option(&self, name: &str) -> Option<&str> {
        self.leaf_options().iter().find_map(|opt| match &opt.value {
            CommandDataOptionValue::String(value) if opt.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    fn focused_option(&self) -> Option<(&str, &str)> {
        self.leaf_options().iter().find_map(|opt| match &opt.value {
            CommandDataOptionValue::Autocomplete { value, .. } => {
                Some((opt.name.as_str(), value.as_str()))
            }
            _ => None,
        })
    }

    fn gateway_latency(&self) -> Option<Duration> {
        self.latency
    }

    async fn reply(&self, reply: Reply) -> anyhow::Result<()> {
        Ok(self
            .interaction
            .create_response(
                self.http,
                CreateInteractionResponse::Message(reply.into_response_message()),
            )
            .await?)
    }

    async fn defer(&self) -> anyhow::Result<()> {
        Ok(self.interaction.defer(self.http).await?)
    }

    async fn follow_up(&self, reply: Reply) -> anyhow::Result<()> {
        self.interaction
            .create_followup(self.http, reply.into_followup())
            .await?;
        Ok(())
    }

    async fn suggest(&self, choices: Vec<AutocompleteChoice>) -> anyhow::Result<()> {
        let response = choices.into_iter().fold(
            CreateAutocompleteResponse::new(),
            |response, choice| response.add_string_choice(choice.name, choice.value),
        );
        Ok(self
            .interaction
            .create_response(self.http, CreateInteractionResponse::Autocomplete(response))
            .await?)
    }
}

/// A single autocomplete suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutocompleteChoice {
    pub name: String,
    pub value: String,
}
impl AutocompleteChoice {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
