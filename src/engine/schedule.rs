use super::*;

#[derive(Clone, Debug)]
pub(super) struct GhostTimer {
    pub(super) ghost: EntityId,
    pub(super) kind: GhostKind,
    interval_ms: u64,
    remaining_ms: u64,
}

impl GhostTimer {
    pub(super) fn new(ghost: EntityId, kind: GhostKind) -> Self {
        let interval_ms = base_move_interval_ms(kind);
        Self {
            ghost,
            kind,
            interval_ms,
            remaining_ms: interval_ms,
        }
    }

    pub(super) fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub(super) fn rearm(&mut self, rng: &mut dyn RandomSource) {
        self.interval_ms = jittered_interval(self.kind, rng);
        self.remaining_ms = self.interval_ms;
    }

    /// Advances the countdown and returns how many moves fell due. Time beyond
    /// the per-tick cap is dropped, not carried over.
    pub(super) fn advance(&mut self, dt_ms: u64, rng: &mut dyn RandomSource) -> u32 {
        let mut budget = dt_ms;
        let mut due = 0;
        while budget >= self.remaining_ms {
            budget -= self.remaining_ms;
            self.rearm(rng);
            due += 1;
            if due == MAX_GHOST_STEPS_PER_TICK {
                return due;
            }
        }
        self.remaining_ms -= budget;
        due
    }
}

pub(super) fn jittered_interval(kind: GhostKind, rng: &mut dyn RandomSource) -> u64 {
    base_move_interval_ms(kind) + rng.below(MOVE_INTERVAL_JITTER_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    struct Fixed(u32);

    impl RandomSource for Fixed {
        fn next_u32(&mut self) -> u32 {
            self.0
        }
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let mut rng = Rng::new(99);
        for kind in [
            GhostKind::Chaser,
            GhostKind::Ambusher,
            GhostKind::Flanker,
            GhostKind::Fickle,
        ] {
            for _ in 0..200 {
                let interval = jittered_interval(kind, &mut rng);
                let base = base_move_interval_ms(kind);
                assert!(interval >= base && interval < base + MOVE_INTERVAL_JITTER_MS);
            }
        }
    }

    #[test]
    fn same_seed_gives_same_schedule() {
        let mut a = Rng::new(5);
        let mut b = Rng::new(5);
        let mut left = GhostTimer::new(EntityId(0), GhostKind::Chaser);
        let mut right = GhostTimer::new(EntityId(0), GhostKind::Chaser);
        left.rearm(&mut a);
        right.rearm(&mut b);
        for _ in 0..500 {
            assert_eq!(left.advance(10, &mut a), right.advance(10, &mut b));
            assert_eq!(left.interval_ms(), right.interval_ms());
        }
    }

    #[test]
    fn counts_due_moves_and_keeps_the_remainder() {
        let mut rng = Fixed(0);
        let mut timer = GhostTimer::new(EntityId(1), GhostKind::Ambusher);
        timer.rearm(&mut rng);
        assert_eq!(timer.interval_ms(), 200);
        assert_eq!(timer.advance(150, &mut rng), 0);
        assert_eq!(timer.advance(60, &mut rng), 1);
        assert_eq!(timer.advance(190, &mut rng), 1);
        assert_eq!(timer.advance(199, &mut rng), 0);
    }

    #[test]
    fn long_gaps_are_capped_not_replayed() {
        let mut rng = Fixed(0);
        let mut timer = GhostTimer::new(EntityId(1), GhostKind::Chaser);
        timer.rearm(&mut rng);
        assert_eq!(timer.advance(60_000, &mut rng), MAX_GHOST_STEPS_PER_TICK);
        assert_eq!(timer.advance(249, &mut rng), 0);
        assert_eq!(timer.advance(1, &mut rng), 1);
    }
}
