use std::sync::Arc;

use serenity::all::{
    CommandOptionType, CreateActionRow, CreateButton, CreateCommand, CreateCommandOption,
    CreateEmbed,
};

use crate::{
    commands::CommandHandler,
    constant,
    interaction::{Actor, Invocation, Reply},
};

const SIZE: u16 = 4096;

pub fn build() -> anyhow::Result<Arc<dyn CommandHandler>> {
    Ok(Arc::new(Handler))
}

pub struct Handler;

#[serenity::async_trait]
impl CommandHandler for Handler {
    fn name(&self) -> &str {
        constant::commands::AVATAR
    }

    fn schema(&self) -> CreateCommand {
        CreateCommand::new(self.name())
            .description("Get the avatar of a user")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::User,
                    constant::value::USER,
                    "The user to get the avatar of",
                )
                .required(false),
            )
    }

    async fn execute(&self, invocation: &dyn Invocation) -> anyhow::Result<()> {
        let user = invocation
            .user_option(constant::value::USER)
            .unwrap_or_else(|| invocation.user());
        invocation.reply(avatar_reply(&user)).await
    }
}

fn avatar_reply(user: &Actor) -> Reply {
    let animated = user.has_animated_avatar();
    let preview = user.avatar_url(if animated { "gif" } else { "png" }, SIZE);

    let mut formats = vec![];
    if animated {
        formats.push(("GIF", "gif"));
    }
    formats.extend([("PNG", "png"), ("WebP", "webp"), ("JPG", "jpg")]);

    let buttons = formats
        .into_iter()
        .map(|(label, extension)| {
            CreateButton::new_link(user.avatar_url(extension, SIZE)).label(label)
        })
        .collect();

    Reply::default()
        .embed(
            CreateEmbed::new()
                .title(format!("{}'s avatar", user.display_name))
                .image(preview),
        )
        .components(vec![CreateActionRow::Buttons(buttons)])
}

#[cfg(test)]
mod tests {
    use serenity::all::UserId;

    use super::*;
    use crate::testing::{MockInvocation, Recorded};

    fn actor(id: u64, name: &str, avatar: Option<&str>) -> Actor {
        Actor {
            id: UserId::new(id),
            username: name.to_lowercase(),
            display_name: name.to_string(),
            avatar: avatar.map(str::to_string),
        }
    }

    fn labels(reply: &Reply) -> Vec<String> {
        let components = serde_json::to_value(&reply.components).unwrap();
        components[0]["components"]
            .as_array()
            .unwrap()
            .iter()
            .map(|button| button["label"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn static_avatars_offer_three_formats() {
        let reply = avatar_reply(&actor(1, "Ferris", Some("abc123")));
        assert_eq!(labels(&reply), ["PNG", "WebP", "JPG"]);

        let embed = serde_json::to_value(&reply.embeds[0]).unwrap();
        assert_eq!(embed["title"], "Ferris's avatar");
        assert_eq!(
            embed["image"]["url"],
            "https://cdn.discordapp.com/avatars/1/abc123.png?size=4096"
        );
    }

    #[test]
    fn animated_avatars_also_offer_gif() {
        let reply = avatar_reply(&actor(1, "Ferris", Some("a_abc123")));
        assert_eq!(labels(&reply), ["GIF", "PNG", "WebP", "JPG"]);
    }

    #[tokio::test]
    async fn defaults_to_the_invoking_user() {
        let invocation = MockInvocation::command(constant::commands::AVATAR)
            .with_user(actor(5, "Caller", None));
        Handler.execute(&invocation).await.unwrap();

        let recorded = invocation.recorded();
        let [Recorded::Reply(reply)] = recorded.as_slice() else {
            panic!("expected a single reply, got {recorded:?}");
        };
        let embed = serde_json::to_value(&reply.embeds[0]).unwrap();
        assert_eq!(embed["title"], "Caller's avatar");
    }

    #[tokio::test]
    async fn uses_the_user_option_when_given() {
        let invocation = MockInvocation::command(constant::commands::AVATAR)
            .with_user(actor(5, "Caller", None))
            .with_user_option(constant::value::USER, actor(6, "Target", Some("ff")));
        Handler.execute(&invocation).await.unwrap();

        let recorded = invocation.recorded();
        let [Recorded::Reply(reply)] = recorded.as_slice() else {
            panic!("expected a single reply, got {recorded:?}");
        };
        let embed = serde_json::to_value(&reply.embeds[0]).unwrap();
        assert_eq!(embed["title"], "Target's avatar");
    }
}
