use log::info;

use crate::engine::Level;
use crate::types::{Direction, RunState};

pub struct Game {
    level: Level,
}

impl Game {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    pub fn start(&mut self) {
        if self.is_in_progress()
            || !self.level.is_any_player_alive()
            || self.level.remaining_pellets() == 0
        {
            return;
        }
        self.level.start();
    }

    pub fn stop(&mut self) {
        self.level.stop();
    }

    pub fn is_in_progress(&self) -> bool {
        self.level.is_running()
    }

    pub fn move_player(&mut self, direction: Direction) -> bool {
        let Some(player) = self.level.players().first().copied() else {
            return false;
        };
        self.level.move_player(player, direction)
    }

    pub fn tick(&mut self, dt_ms: u64) {
        self.level.tick(dt_ms);
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn score(&self) -> i64 {
        self.level.player_scores().first().copied().unwrap_or(0)
    }
}

/// A fixed sequence of levels. Winning one starts the next with the scores
/// carried over; losing any of them, or winning the last, ends the game.
pub struct MultiLevelGame {
    levels: Vec<Level>,
    current: usize,
    finished: bool,
}

impl MultiLevelGame {
    pub fn new(levels: Vec<Level>) -> Self {
        let finished = levels.is_empty();
        Self {
            levels,
            current: 0,
            finished,
        }
    }

    pub fn start(&mut self) {
        if self.finished || self.is_in_progress() {
            return;
        }
        if let Some(level) = self.levels.get_mut(self.current) {
            if level.is_any_player_alive() {
                level.start();
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(level) = self.levels.get_mut(self.current) {
            level.stop();
        }
    }

    pub fn is_in_progress(&self) -> bool {
        !self.finished && self.level().map(Level::is_running).unwrap_or(false)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn outcome(&self) -> Option<RunState> {
        if !self.finished {
            return None;
        }
        self.level().map(Level::state)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self) -> Option<&Level> {
        self.levels.get(self.current)
    }

    pub fn move_player(&mut self, direction: Direction) -> bool {
        let Some(level) = self.levels.get_mut(self.current) else {
            return false;
        };
        let Some(player) = level.players().first().copied() else {
            return false;
        };
        let moved = level.move_player(player, direction);
        self.settle();
        moved
    }

    pub fn tick(&mut self, dt_ms: u64) {
        if let Some(level) = self.levels.get_mut(self.current) {
            level.tick(dt_ms);
        }
        self.settle();
    }

    pub fn score(&self) -> i64 {
        self.level()
            .and_then(|level| level.player_scores().first().copied())
            .unwrap_or(0)
    }

    fn settle(&mut self) {
        if self.finished {
            return;
        }
        let Some(state) = self.level().map(Level::state) else {
            return;
        };
        match state {
            RunState::Won if self.current + 1 < self.levels.len() => {
                let scores = self.levels[self.current].player_scores();
                self.current += 1;
                let next = &mut self.levels[self.current];
                next.carry_scores(&scores);
                next.start();
                info!(
                    "advanced to level {} of {}",
                    self.current + 1,
                    self.levels.len()
                );
            }
            RunState::Won => {
                self.finished = true;
                info!("all {} levels cleared", self.levels.len());
            }
            RunState::Lost => {
                self.finished = true;
                info!("game lost on level {}", self.current + 1);
            }
            RunState::Idle | RunState::Running => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_parser::parse_map;

    fn level(rows: &[&str]) -> Level {
        Level::with_defaults(parse_map(rows).expect("valid map"))
    }

    #[test]
    fn single_game_plays_its_first_player() {
        let mut game = Game::new(level(&["#P..#"]));
        assert!(!game.move_player(Direction::East));
        game.start();
        assert!(game.is_in_progress());
        assert!(game.move_player(Direction::East));
        game.stop();
        assert!(!game.is_in_progress());
        game.start();
        assert!(game.move_player(Direction::East));
        assert_eq!(game.level().state(), RunState::Won);
        assert_eq!(game.score(), 20);
        assert!(!game.is_in_progress());
    }

    #[test]
    fn single_game_does_not_start_without_a_live_player() {
        let mut game = Game::new(level(&["#..B#"]));
        game.start();
        assert!(!game.is_in_progress());
    }

    #[test]
    fn single_game_does_not_start_without_pellets() {
        let mut game = Game::new(level(&["#P B#"]));
        game.start();
        assert!(!game.is_in_progress());
        assert_eq!(game.level().state(), RunState::Idle);
    }

    #[test]
    fn winning_a_level_advances_and_carries_the_score() {
        let mut game = MultiLevelGame::new(vec![level(&["#P.#"]), level(&["#P..#"])]);
        game.start();
        assert!(game.move_player(Direction::East));
        assert_eq!(game.current_index(), 1);
        assert!(game.is_in_progress());
        assert_eq!(game.score(), 10);

        game.move_player(Direction::East);
        game.move_player(Direction::East);
        assert!(game.is_finished());
        assert_eq!(game.outcome(), Some(RunState::Won));
        assert_eq!(game.score(), 30);
    }

    #[test]
    fn losing_any_level_ends_the_game() {
        let mut game = MultiLevelGame::new(vec![level(&["#PB.#"]), level(&["#P.#"])]);
        game.start();
        game.move_player(Direction::East);
        assert!(game.is_finished());
        assert_eq!(game.outcome(), Some(RunState::Lost));
        assert_eq!(game.current_index(), 0);

        game.start();
        assert!(!game.is_in_progress());
    }

    #[test]
    fn empty_game_is_already_over() {
        let mut game = MultiLevelGame::new(Vec::new());
        game.start();
        game.tick(100);
        assert!(game.is_finished());
        assert!(!game.move_player(Direction::North));
        assert_eq!(game.outcome(), None);
    }
}
