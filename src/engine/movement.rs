use super::*;

impl Level {
    /// Every move goes through here. Returns whether the move took effect.
    pub fn apply_move(&mut self, mover: EntityId, direction: Direction) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        let Some(origin) = self.board.entity(mover).map(Entity::cell) else {
            return false;
        };
        let target = self.board.neighbor(origin, direction);
        if target == origin || !self.board.is_passable(target) {
            return false;
        }

        let pellets_before = self.board.pellet_count();
        let alive_before = self.alive_player_count();
        let prior: Vec<EntityId> = self.board.occupants(target).to_vec();
        if !self.board.relocate(mover, target, direction) {
            return false;
        }
        for collidee in prior {
            self.collisions
                .collide(&mut self.board, mover, collidee, self.points.as_mut());
        }
        if let Some(player) = self.board.player_mut(mover) {
            self.points.on_player_moved(player, direction);
        }
        self.moves_applied += 1;
        debug!(
            "moved entity {} {:?} to ({}, {})",
            mover.index(),
            direction,
            target.x,
            target.y
        );

        self.resolve_outcome(pellets_before, alive_before);
        true
    }

    fn resolve_outcome(&mut self, pellets_before: usize, alive_before: usize) {
        if pellets_before > 0 && self.board.pellet_count() == 0 {
            self.finish(RunState::Won);
        } else if self.alive_player_count() < alive_before {
            self.finish(RunState::Lost);
        }
    }

    fn finish(&mut self, outcome: RunState) {
        self.state = outcome;
        info!(
            "level {:?} after {} moves and {} ms",
            outcome, self.moves_applied, self.elapsed_ms
        );
        for observer in &mut self.observers {
            match outcome {
                RunState::Won => observer.level_won(),
                RunState::Lost => observer.level_lost(),
                RunState::Idle | RunState::Running => {}
            }
        }
    }

    pub(super) fn alive_player_count(&self) -> usize {
        self.players
            .iter()
            .filter(|id| self.board.player(**id).map(|p| p.alive).unwrap_or(false))
            .count()
    }
}
