/// names of the built-in commands
pub mod commands {
    pub const PING: &str = "ping";
    pub const AVATAR: &str = "avatar";
    pub const BETTER_EXAMPLE: &str = "better-example";
}

/// names of values used in interactions
pub mod value {
    pub const USER: &str = "user";
    pub const TOPIC: &str = "topic";
}

/// Joins a command and subcommand name into a registry key.
pub const SUBCOMMAND_KEY_SEPARATOR: char = '_';

/// Reply sent when a composed command receives a subcommand it does not know.
pub const UNKNOWN_SUBCOMMAND: &str = "Unknown subcommand!";
