use log::{debug, info};

use crate::board::Board;
use crate::collisions::{CollisionMap, PlayerCollisions};
use crate::constants::{
    base_move_interval_ms, DEFAULT_SEED, MAX_GHOST_STEPS_PER_TICK, MOVE_INTERVAL_JITTER_MS,
};
use crate::ghost_ai;
use crate::rng::{RandomSource, Rng};
use crate::scoring::{DefaultPointCalculator, PointCalculator};
use crate::types::{Direction, GhostKind, GhostView, LevelSnapshot, PlayerView, RunState};
use crate::units::{Entity, EntityId};

mod movement;
mod schedule;

use self::schedule::GhostTimer;

/// Receives the terminal transitions of a level, synchronously and at most
/// once each.
pub trait LevelObserver: Send {
    fn level_won(&mut self);

    fn level_lost(&mut self);
}

pub struct Level {
    board: Board,
    collisions: Box<dyn CollisionMap>,
    points: Box<dyn PointCalculator>,
    rng: Box<dyn RandomSource>,
    state: RunState,
    players: Vec<EntityId>,
    ghosts: Vec<GhostTimer>,
    observers: Vec<Box<dyn LevelObserver>>,
    elapsed_ms: u64,
    moves_applied: u64,
}

impl Level {
    pub fn new(
        board: Board,
        collisions: Box<dyn CollisionMap>,
        points: Box<dyn PointCalculator>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let mut players = Vec::new();
        let mut ghosts = Vec::new();
        for id in board.entity_ids() {
            let Some(entity) = board.entity(id) else {
                continue;
            };
            if entity.as_player().is_some() {
                players.push(id);
            } else if let Some(ghost) = entity.as_ghost() {
                ghosts.push(GhostTimer::new(id, ghost.kind));
            }
        }

        Self {
            board,
            collisions,
            points,
            rng,
            state: RunState::Idle,
            players,
            ghosts,
            observers: Vec::new(),
            elapsed_ms: 0,
            moves_applied: 0,
        }
    }

    pub fn with_defaults(board: Board) -> Self {
        Self::new(
            board,
            Box::new(PlayerCollisions),
            Box::new(DefaultPointCalculator::default()),
            Box::new(Rng::new(DEFAULT_SEED)),
        )
    }

    pub fn add_observer(&mut self, observer: Box<dyn LevelObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[EntityId] {
        &self.players
    }

    pub fn ghosts(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ghosts.iter().map(|timer| timer.ghost)
    }

    pub fn remaining_pellets(&self) -> usize {
        self.board.pellet_count()
    }

    pub fn is_any_player_alive(&self) -> bool {
        self.alive_player_count() > 0
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn start(&mut self) {
        if self.state != RunState::Idle {
            return;
        }
        for timer in &mut self.ghosts {
            timer.rearm(self.rng.as_mut());
        }
        self.state = RunState::Running;
        info!(
            "level started: {} players, {} ghosts, {} pellets",
            self.players.len(),
            self.ghosts.len(),
            self.board.pellet_count()
        );
    }

    pub fn stop(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        self.state = RunState::Idle;
        info!("level stopped after {} ms", self.elapsed_ms);
    }

    pub fn move_player(&mut self, player: EntityId, direction: Direction) -> bool {
        if !self.players.contains(&player) {
            return false;
        }
        self.apply_move(player, direction)
    }

    pub fn tick(&mut self, dt_ms: u64) {
        if self.state != RunState::Running {
            return;
        }
        self.elapsed_ms += dt_ms;
        for index in 0..self.ghosts.len() {
            let due = self.ghosts[index].advance(dt_ms, self.rng.as_mut());
            let ghost = self.ghosts[index].ghost;
            for _ in 0..due {
                if self.state != RunState::Running {
                    return;
                }
                let Some(direction) = ghost_ai::next_move(&self.board, ghost) else {
                    continue;
                };
                debug!(
                    "{} ghost {} chose {:?}",
                    self.ghosts[index].kind.classic_name(),
                    ghost.index(),
                    direction
                );
                self.apply_move(ghost, direction);
            }
        }
    }

    pub fn player_scores(&self) -> Vec<i64> {
        self.players
            .iter()
            .map(|id| self.board.player(*id).map(|p| p.score).unwrap_or(0))
            .collect()
    }

    pub fn carry_scores(&mut self, scores: &[i64]) {
        for (id, score) in self.players.iter().zip(scores) {
            if let Some(player) = self.board.player_mut(*id) {
                player.score = *score;
            }
        }
    }

    pub fn snapshot(&self) -> LevelSnapshot {
        let players = self
            .players
            .iter()
            .filter_map(|id| {
                let entity = self.board.entity(*id)?;
                let player = entity.as_player()?;
                Some(PlayerView {
                    id: id.index(),
                    x: entity.cell().x,
                    y: entity.cell().y,
                    dir: entity.facing,
                    alive: player.alive,
                    score: player.score,
                    killed_by: player.killer().map(EntityId::index),
                })
            })
            .collect();
        let ghosts = self
            .ghosts
            .iter()
            .filter_map(|timer| {
                let entity = self.board.entity(timer.ghost)?;
                Some(GhostView {
                    id: timer.ghost.index(),
                    x: entity.cell().x,
                    y: entity.cell().y,
                    dir: entity.facing,
                    kind: timer.kind,
                    interval_ms: timer.interval_ms(),
                })
            })
            .collect();

        LevelSnapshot {
            state: self.state,
            elapsed_ms: self.elapsed_ms,
            moves_applied: self.moves_applied,
            remaining_pellets: self.board.pellet_count(),
            players,
            ghosts,
        }
    }
}
