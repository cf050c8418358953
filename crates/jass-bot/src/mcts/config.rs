use thiserror::Error;

/// Smallest accepted search budget, one iteration per trick of a turn.
pub const MIN_ITERATIONS: usize = 9;

const ITERATIONS_ENV: &str = "JASS_MCTS_ITERATIONS";
const EXPLORATION_ENV: &str = "JASS_MCTS_EXPLORATION";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MctsConfigError {
    #[error("at least 9 iterations are required, got {0}")]
    TooFewIterations(usize),
    #[error("exploration constant must be finite and non-negative, got {0}")]
    InvalidExploration(f64),
    #[error("{key}={value:?} is not a valid override")]
    InvalidOverride { key: &'static str, value: String },
}

/// Search budget and UCB1 exploration constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsConfig {
    pub iterations: usize,
    pub exploration: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            exploration: 40.0,
        }
    }
}

impl MctsConfig {
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, MctsConfigError> {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `JASS_MCTS_ITERATIONS` and `JASS_MCTS_EXPLORATION` as returned
    /// by `read`.
    pub fn from_reader<F>(mut read: F) -> Result<Self, MctsConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = read(ITERATIONS_ENV) {
            config.iterations = raw.trim().parse().map_err(|_| MctsConfigError::InvalidOverride {
                key: ITERATIONS_ENV,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = read(EXPLORATION_ENV) {
            config.exploration =
                raw.trim().parse().map_err(|_| MctsConfigError::InvalidOverride {
                    key: EXPLORATION_ENV,
                    value: raw.clone(),
                })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MctsConfigError> {
        if self.iterations < MIN_ITERATIONS {
            return Err(MctsConfigError::TooFewIterations(self.iterations));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(MctsConfigError::InvalidExploration(self.exploration));
        }
        Ok(())
    }
}
