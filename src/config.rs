use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serenity::all::GuildId;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: &'static str,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write config template: {0}")]
    Write(String),
    /// The credential for the active deployment mode is not set.
    #[error("no Discord token configured for {0} mode")]
    MissingToken(DeploymentMode),
    #[error("invalid guild id: {0:?}")]
    InvalidGuildId(String),
    #[error("invalid deployment mode: {0:?}")]
    InvalidMode(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Commands are registered to a single test guild.
    Development,
    /// Commands are registered globally.
    #[default]
    Production,
}
impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
        })
    }
}
impl std::str::FromStr for DeploymentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Configuration {
    pub mode: DeploymentMode,
    pub authentication: Authentication,
    pub development: Development,
    pub logging: Logging,
}
impl Configuration {
    const FILENAME: &str = "config.toml";

    /// Loads `config.toml` (writing a template if it is missing), then applies
    /// `.env` and process environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(Self::FILENAME) {
            Ok(file) => toml::from_str(&file)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.save()?;
                config
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: Self::FILENAME,
                    source,
                });
            }
        };

        dotenvy::dotenv().ok();
        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    fn save(&self) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Write(e.to_string()))?;
        std::fs::write(Self::FILENAME, contents).map_err(|e| ConfigError::Write(e.to_string()))
    }

    /// Overrides file values with whatever `lookup` yields for the known keys.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(mode) = lookup(env::MODE) {
            self.mode = mode.parse()?;
        }
        if let Some(token) = lookup(env::TOKEN) {
            self.authentication.discord_token = Some(token);
        }
        if let Some(token) = lookup(env::DEV_TOKEN) {
            self.authentication.dev_discord_token = Some(token);
        }
        if let Some(guild_id) = lookup(env::DEV_GUILD_ID) {
            self.development.guild_id = Some(guild_id);
        }
        if let Some(dir) = lookup(env::LOG_DIR) {
            self.logging.directory = PathBuf::from(dir);
        }
        Ok(())
    }

    /// The credential for the active deployment mode.
    pub fn token(&self) -> Result<&str, ConfigError> {
        let token = match self.mode {
            DeploymentMode::Development => &self.authentication.dev_discord_token,
            DeploymentMode::Production => &self.authentication.discord_token,
        };
        token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken(self.mode))
    }

    /// The guild that development commands are scoped to, if one is configured.
    pub fn dev_guild_id(&self) -> Result<Option<GuildId>, ConfigError> {
        let Some(raw) = self.development.guild_id.as_deref() else {
            return Ok(None);
        };
        raw.trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .map(|id| Some(GuildId::new(id)))
            .ok_or_else(|| ConfigError::InvalidGuildId(raw.to_string()))
    }
}

mod env {
    pub const MODE: &str = "BOT_MODE";
    pub const TOKEN: &str = "DISCORD_TOKEN";
    pub const DEV_TOKEN: &str = "DEV_DISCORD_TOKEN";
    pub const DEV_GUILD_ID: &str = "DEV_GUILD_ID";
    pub const LOG_DIR: &str = "LOG_DIR";
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Authentication {
    pub discord_token: Option<String>,
    pub dev_discord_token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Development {
    /// Stored as a string so that it survives TOML's signed integers
    pub guild_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Logging {
    pub directory: PathBuf,
    /// Console filter directive; `RUST_LOG` takes precedence when set
    pub console_level: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            console_level: None,
        }
    }
}
