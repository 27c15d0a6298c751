use crate::{
    interaction::{Invocation, InvocationKind},
    registry::Registry,
};

/// What the dispatcher did with an invocation.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a chat-input command.
    Ignored,
    /// No registered command matched.
    Unresolved,
    Executed {
        command: String,
        /// Set when the command was resolved through the subcommand table
        subcommand: Option<String>,
    },
}

/// Resolves the command behind `invocation` and runs it.
///
/// Subcommands are resolved through the registry's subcommand table but are
/// always executed through their owning command, which routes to the
/// subcommand itself. Errors from the command propagate to the caller.
pub async fn dispatch(registry: &Registry, invocation: &dyn Invocation) -> anyhow::Result<Dispatch> {
    if invocation.kind() != InvocationKind::ChatInput {
        return Ok(Dispatch::Ignored);
    }

    let command_name = invocation.command_name();
    let subcommand_name = invocation.subcommand_name();

    let resolved = match subcommand_name.and_then(|sub| registry.subcommand(command_name, sub)) {
        Some(entry) => Some((&entry.command, Some(entry.subcommand.clone()))),
        None => registry.command(command_name).map(|command| (command, None)),
    };
    let Some((command, subcommand)) = resolved else {
        tracing::debug!("No command registered for /{command_name}");
        return Ok(Dispatch::Unresolved);
    };

    let user = invocation.user();
    tracing::info!(
        "{} ({}) used {command_name}{} {}",
        user.username,
        user.id,
        subcommand_name
            .map(|sub| format!(" {sub}"))
            .unwrap_or_default(),
        invocation.origin()
    );

    command.execute(invocation).await?;

    Ok(Dispatch::Executed {
        command: command.name().to_string(),
        subcommand,
    })
}

/// Hands a partially typed invocation to the command it belongs to, which
/// routes it on to its subcommand. Returns whether a command was found.
pub async fn autocomplete(
    registry: &Registry,
    invocation: &dyn Invocation,
) -> anyhow::Result<bool> {
    if invocation.kind() != InvocationKind::Autocomplete {
        return Ok(false);
    }

    let command_name = invocation.command_name();
    let Some(command) = registry.command(command_name) else {
        tracing::debug!("No command registered for autocomplete on /{command_name}");
        return Ok(false);
    };

    command.autocomplete(invocation).await?;
    Ok(true)
}
