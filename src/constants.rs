use crate::types::GhostKind;

pub const TICK_MS: u64 = 10;

pub const PELLET_VALUE: i64 = 10;
pub const DEFAULT_SEED: u32 = 0x5eed;

pub const MOVE_INTERVAL_JITTER_MS: u64 = 50;
/// Upper bound on moves one ghost may make inside a single tick.
pub const MAX_GHOST_STEPS_PER_TICK: u32 = 4;

pub const AMBUSH_LOOKAHEAD: i32 = 4;
pub const FLANK_PIVOT_LOOKAHEAD: i32 = 2;
/// Path distance at or below which the fickle ghost turns away.
pub const FICKLE_SHYNESS: usize = 8;

pub fn base_move_interval_ms(kind: GhostKind) -> u64 {
    match kind {
        GhostKind::Chaser => 250,
        GhostKind::Ambusher => 200,
        GhostKind::Flanker => 250,
        GhostKind::Fickle => 250,
    }
}
