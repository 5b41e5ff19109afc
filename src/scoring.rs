use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Direction;
use crate::units::{Ghost, Pellet, Player};

pub trait PointCalculator: Send {
    fn on_ghost_collision(&mut self, player: &mut Player, ghost: &Ghost);

    fn on_pellet_consumed(&mut self, player: &mut Player, pellet: &Pellet);

    fn on_player_moved(&mut self, player: &mut Player, direction: Direction);
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read scoring config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid scoring config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringConfig {
    /// Points added per pellet, used instead of the pellet's own value when set.
    pub pellet_bonus: Option<i64>,
    pub ghost_penalty: i64,
    pub move_bonus: i64,
}

impl ScoringConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let label = path.to_string_lossy().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: label.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: label,
            source,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct DefaultPointCalculator {
    config: ScoringConfig,
}

impl DefaultPointCalculator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

impl PointCalculator for DefaultPointCalculator {
    fn on_ghost_collision(&mut self, player: &mut Player, _ghost: &Ghost) {
        player.score -= self.config.ghost_penalty;
    }

    fn on_pellet_consumed(&mut self, player: &mut Player, pellet: &Pellet) {
        player.score += self.config.pellet_bonus.unwrap_or(pellet.value);
    }

    fn on_player_moved(&mut self, player: &mut Player, _direction: Direction) {
        player.score += self.config.move_bonus;
    }
}
