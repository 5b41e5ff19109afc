use serde::Serialize;

use crate::types::{Direction, EntityKind, GhostKind, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub alive: bool,
    pub score: i64,
    killer: Option<EntityId>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            alive: true,
            score: 0,
            killer: None,
        }
    }
}

impl Player {
    pub fn killer(&self) -> Option<EntityId> {
        self.killer
    }

    /// Marks the player dead. The killer is recorded only at the first death.
    pub fn kill(&mut self, ghost: EntityId) {
        self.alive = false;
        if self.killer.is_none() {
            self.killer = Some(ghost);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ghost {
    pub kind: GhostKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pellet {
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    Player(Player),
    Ghost(Ghost),
    Pellet(Pellet),
}

impl Unit {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Player(_) => EntityKind::Player,
            Self::Ghost(_) => EntityKind::Ghost,
            Self::Pellet(_) => EntityKind::Pellet,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub unit: Unit,
    pub facing: Direction,
    pub(crate) cell: Vec2,
}

impl Entity {
    pub fn new(unit: Unit, cell: Vec2) -> Self {
        Self {
            unit,
            facing: Direction::East,
            cell,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.unit.kind()
    }

    pub fn cell(&self) -> Vec2 {
        self.cell
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.unit {
            Unit::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.unit {
            Unit::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_ghost(&self) -> Option<&Ghost> {
        match &self.unit {
            Unit::Ghost(ghost) => Some(ghost),
            _ => None,
        }
    }

    pub fn as_pellet(&self) -> Option<&Pellet> {
        match &self.unit {
            Unit::Pellet(pellet) => Some(pellet),
            _ => None,
        }
    }

    pub fn is_ghost_of(&self, kind: GhostKind) -> bool {
        self.as_ghost().is_some_and(|ghost| ghost.kind == kind)
    }
}
