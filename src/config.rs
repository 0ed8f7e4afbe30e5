use crate::error::{Error, Result};

pub const DATABASE_VAR: &str = "Blinds_Database";
pub const TABLE_VAR: &str = "Blinds_Data";
pub const WEBHOOK_URL_VAR: &str = "DISCORD_WEBHOOK_URL";

pub struct Config {
    pub database: String,
    pub table: String,
    pub webhook_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database", &self.database)
            .field("table", &self.table)
            .field("webhook_url", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`, failing on the first key that is absent or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |key| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingConfig(key))
        };

        Ok(Self {
            database: required(DATABASE_VAR)?,
            table: required(TABLE_VAR)?,
            webhook_url: required(WEBHOOK_URL_VAR)?,
        })
    }
}
