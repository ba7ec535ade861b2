use std::str::FromStr;

pub const DEFAULT_SEATS: usize = 5;
pub const DEFAULT_TICK_LIMIT: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("a table needs at least 2 seats, got {0}")]
    TooFewSeats(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of philosophers (and forks) at the table
    pub seats: usize,
    /// Ticks the conductor runs before shutting down normally
    pub tick_limit: u64,
    /// Fixed scheduler seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seats: DEFAULT_SEATS,
            tick_limit: DEFAULT_TICK_LIMIT,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            seats: env_parse("DINING_SEATS", DEFAULT_SEATS)?,
            tick_limit: env_parse("DINING_TICK_LIMIT", DEFAULT_TICK_LIMIT)?,
            seed: env_parse_opt("DINING_SEED")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats < 2 {
            return Err(ConfigError::TooFewSeats(self.seats));
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    Ok(env_parse_opt(key)?.unwrap_or(default))
}

fn env_parse_opt<T: FromStr>(key: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        Err(_) => Ok(None),
    }
}
