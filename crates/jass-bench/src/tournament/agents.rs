use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use jass_bot::{
    LoggingPlayer, MctsConfig, MctsConfigError, MctsPlayer, PacedPlayer, Player, PlayerError,
    RandomPlayer,
};
use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::player::{PlayerId, TeamId};
use jass_core::model::score::Score;
use jass_core::model::suit::Suit;
use jass_core::model::trick::Trick;
use jass_core::model::turn_state::TurnState;
use thiserror::Error;

use crate::config::{AgentConfig, AgentKind};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid {kind:?} parameter '{key}' for agent '{name}': {message}")]
    InvalidParam {
        name: String,
        kind: AgentKind,
        key: String,
        message: String,
    },
    #[error("invalid search settings for agent '{name}': {source}")]
    Mcts {
        name: String,
        #[source]
        source: MctsConfigError,
    },
}

/// Parsed agent description; spawns a fresh player for every match.
#[derive(Debug, Clone)]
pub(super) struct AgentBlueprint {
    pub(super) name: String,
    strategy: Strategy,
    pace: Option<Duration>,
    log_hooks: bool,
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    Random,
    Mcts(MctsConfig),
}

impl AgentBlueprint {
    pub(super) fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        Self::from_config_with(config, |key| std::env::var(key).ok())
    }

    /// Search agents start from the `JASS_MCTS_*` settings found by `read`;
    /// per-agent params take precedence over them.
    fn from_config_with<F>(config: &AgentConfig, read: F) -> Result<Self, AgentError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let params = Params::new(config)?;
        let strategy = match config.kind {
            AgentKind::Random => Strategy::Random,
            AgentKind::Mcts => {
                let base = MctsConfig::from_reader(read).map_err(|source| AgentError::Mcts {
                    name: config.name.clone(),
                    source,
                })?;
                let mcts = MctsConfig {
                    iterations: params.usize("iterations")?.unwrap_or(base.iterations),
                    exploration: params.f64("exploration")?.unwrap_or(base.exploration),
                };
                mcts.validate().map_err(|source| AgentError::Mcts {
                    name: config.name.clone(),
                    source,
                })?;
                Strategy::Mcts(mcts)
            }
        };

        Ok(Self {
            name: config.name.clone(),
            strategy,
            pace: params.usize("pace_ms")?.map(|ms| Duration::from_millis(ms as u64)),
            log_hooks: params.bool("log_hooks")?.unwrap_or(false),
        })
    }

    pub(super) fn spawn(&self, seat: PlayerId, seed: u64) -> Result<Box<dyn Player>, AgentError> {
        let mut player: Box<dyn Player> = match self.strategy {
            Strategy::Random => Box::new(RandomPlayer::new(seed)),
            Strategy::Mcts(config) => Box::new(
                MctsPlayer::with_config(seat, seed, config).map_err(|source| AgentError::Mcts {
                    name: self.name.clone(),
                    source,
                })?,
            ),
        };
        if let Some(pace) = self.pace {
            player = Box::new(PacedPlayer::new(player, pace));
        }
        if self.log_hooks {
            player = Box::new(LoggingPlayer::new(player));
        }
        Ok(player)
    }
}

struct Params<'a> {
    config: &'a AgentConfig,
    mapping: Option<&'a serde_yaml::Mapping>,
}

impl<'a> Params<'a> {
    fn new(config: &'a AgentConfig) -> Result<Self, AgentError> {
        if config.params.is_null() {
            return Ok(Self {
                config,
                mapping: None,
            });
        }
        let mapping = config
            .params
            .as_mapping()
            .ok_or_else(|| AgentError::InvalidParam {
                name: config.name.clone(),
                kind: config.kind.clone(),
                key: "params".to_string(),
                message: "expected a mapping".to_string(),
            })?;
        Ok(Self {
            config,
            mapping: Some(mapping),
        })
    }

    fn get(&self, key: &str) -> Option<&'a serde_yaml::Value> {
        self.mapping?
            .iter()
            .find_map(|(k, value)| (k.as_str() == Some(key)).then_some(value))
    }

    fn invalid(&self, key: &str, message: &str) -> AgentError {
        AgentError::InvalidParam {
            name: self.config.name.clone(),
            kind: self.config.kind.clone(),
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    fn usize(&self, key: &str) -> Result<Option<usize>, AgentError> {
        self.get(key)
            .map(|value| {
                value
                    .as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| self.invalid(key, "expected a non-negative integer"))
            })
            .transpose()
    }

    fn f64(&self, key: &str) -> Result<Option<f64>, AgentError> {
        self.get(key)
            .map(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| self.invalid(key, "expected a number"))
            })
            .transpose()
    }

    fn bool(&self, key: &str) -> Result<Option<bool>, AgentError> {
        self.get(key)
            .map(|value| {
                value
                    .as_bool()
                    .ok_or_else(|| self.invalid(key, "expected true or false"))
            })
            .transpose()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(super) struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.decisions += 1;
    }

    pub(super) fn decisions(&self) -> u32 {
        self.decisions
    }

    pub(super) fn avg_ms_per_decision(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        }
    }
}

/// Measures how long the wrapped player takes for each card.
pub(super) struct TimedPlayer {
    inner: Box<dyn Player>,
    metrics: Arc<Mutex<DecisionMetrics>>,
}

impl TimedPlayer {
    pub(super) fn new(inner: Box<dyn Player>) -> (Self, Arc<Mutex<DecisionMetrics>>) {
        let metrics = Arc::new(Mutex::new(DecisionMetrics::default()));
        let player = Self {
            inner,
            metrics: Arc::clone(&metrics),
        };
        (player, metrics)
    }
}

impl Player for TimedPlayer {
    fn card_to_play(&mut self, state: &TurnState, hand: CardSet) -> Result<Card, PlayerError> {
        let start = Instant::now();
        let card = self.inner.card_to_play(state, hand);
        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.record(start.elapsed());
        }
        card
    }

    fn set_players(&mut self, own_id: PlayerId, names: &[String; 4]) {
        self.inner.set_players(own_id, names);
    }

    fn update_hand(&mut self, hand: CardSet) {
        self.inner.update_hand(hand);
    }

    fn set_trump(&mut self, trump: Suit) {
        self.inner.set_trump(trump);
    }

    fn update_trick(&mut self, trick: Trick) {
        self.inner.update_trick(trick);
    }

    fn update_score(&mut self, score: Score) {
        self.inner.update_score(score);
    }

    fn set_winning_team(&mut self, team: TeamId) {
        self.inner.set_winning_team(team);
    }
}
