use std::collections::HashMap;
use std::sync::Arc;

use crate::board::Board;
use crate::scoring::PointCalculator;
use crate::types::EntityKind;
use crate::units::{Entity, EntityId};

pub trait CollisionMap: Send {
    fn collide(
        &self,
        board: &mut Board,
        mover: EntityId,
        collidee: EntityId,
        points: &mut dyn PointCalculator,
    );
}

pub fn player_versus_ghost(
    board: &mut Board,
    player: EntityId,
    ghost: EntityId,
    points: &mut dyn PointCalculator,
) {
    let Some(ghost_data) = board.ghost(ghost).copied() else {
        return;
    };
    let Some(player_data) = board.player_mut(player) else {
        return;
    };
    points.on_ghost_collision(player_data, &ghost_data);
    player_data.kill(ghost);
}

pub fn player_versus_pellet(
    board: &mut Board,
    player: EntityId,
    pellet: EntityId,
    points: &mut dyn PointCalculator,
) {
    let Some(pellet_data) = board.pellet(pellet).copied() else {
        return;
    };
    let Some(player_data) = board.player_mut(player) else {
        return;
    };
    points.on_pellet_consumed(player_data, &pellet_data);
    board.destroy(pellet);
}

fn kinds_of(
    board: &Board,
    first: EntityId,
    second: EntityId,
) -> Option<(EntityKind, EntityKind)> {
    let first = board.entity(first).map(Entity::kind)?;
    let second = board.entity(second).map(Entity::kind)?;
    Some((first, second))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerCollisions;

impl CollisionMap for PlayerCollisions {
    fn collide(
        &self,
        board: &mut Board,
        mover: EntityId,
        collidee: EntityId,
        points: &mut dyn PointCalculator,
    ) {
        let Some(kinds) = kinds_of(board, mover, collidee) else {
            return;
        };
        match kinds {
            (EntityKind::Player, EntityKind::Ghost) => {
                player_versus_ghost(board, mover, collidee, points)
            }
            (EntityKind::Ghost, EntityKind::Player) => {
                player_versus_ghost(board, collidee, mover, points)
            }
            (EntityKind::Player, EntityKind::Pellet) => {
                player_versus_pellet(board, mover, collidee, points)
            }
            (EntityKind::Pellet, EntityKind::Player) => {
                player_versus_pellet(board, collidee, mover, points)
            }
            _ => {}
        }
    }
}

pub type CollisionHandler =
    Arc<dyn Fn(&mut Board, EntityId, EntityId, &mut dyn PointCalculator) + Send + Sync>;

#[derive(Clone, Default)]
pub struct InteractionMap {
    handlers: HashMap<(EntityKind, EntityKind), CollisionHandler>,
}

impl InteractionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_collision<F>(
        &mut self,
        first: EntityKind,
        second: EntityKind,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&mut Board, EntityId, EntityId, &mut dyn PointCalculator) + Send + Sync + 'static,
    {
        let handler: CollisionHandler = Arc::new(handler);
        if first != second {
            self.handlers
                .insert((second, first), swap_roles(Arc::clone(&handler)));
        }
        self.handlers.insert((first, second), handler);
        self
    }

    pub fn handles(&self, first: EntityKind, second: EntityKind) -> bool {
        self.handlers.contains_key(&(first, second))
    }
}

fn swap_roles(handler: CollisionHandler) -> CollisionHandler {
    Arc::new(
        move |board: &mut Board,
              first: EntityId,
              second: EntityId,
              points: &mut dyn PointCalculator| handler(board, second, first, points),
    )
}

impl CollisionMap for InteractionMap {
    fn collide(
        &self,
        board: &mut Board,
        mover: EntityId,
        collidee: EntityId,
        points: &mut dyn PointCalculator,
    ) {
        let Some(kinds) = kinds_of(board, mover, collidee) else {
            return;
        };
        if let Some(handler) = self.handlers.get(&kinds) {
            handler(board, mover, collidee, points);
        }
    }
}

pub fn default_player_interactions() -> InteractionMap {
    let mut map = InteractionMap::new();
    map.on_collision(EntityKind::Player, EntityKind::Ghost, player_versus_ghost)
        .on_collision(EntityKind::Player, EntityKind::Pellet, player_versus_pellet);
    map
}
