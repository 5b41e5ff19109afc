use crate::types::{Direction, GhostKind, Vec2};
use crate::units::{Entity, EntityId, Ghost, Pellet, Player, Unit};

#[derive(Clone, Debug)]
pub struct Cell {
    pos: Vec2,
    passable: bool,
    occupants: Vec<EntityId>,
}

impl Cell {
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn is_passable(&self) -> bool {
        self.passable
    }

    pub fn occupants(&self) -> &[EntityId] {
        &self.occupants
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    entities: Vec<Option<Entity>>,
    pellet_count: usize,
}

impl Board {
    pub fn new(width: i32, height: i32, passable: Vec<bool>) -> Option<Self> {
        if width <= 0 || height <= 0 || passable.len() != (width * height) as usize {
            return None;
        }
        let cells = passable
            .into_iter()
            .enumerate()
            .map(|(index, passable)| Cell {
                pos: Vec2::new(index as i32 % width, index as i32 / width),
                passable,
                occupants: Vec::new(),
            })
            .collect();
        Some(Self {
            width,
            height,
            cells,
            entities: Vec::new(),
            pellet_count: 0,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub(crate) fn index_of(&self, pos: Vec2) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn cell(&self, pos: Vec2) -> Option<&Cell> {
        self.index_of(pos).and_then(|idx| self.cells.get(idx))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Adjacent cell in `dir`. Edges wrap around, so every cell has four neighbors.
    pub fn neighbor(&self, pos: Vec2, dir: Direction) -> Vec2 {
        let (dx, dy) = dir.delta();
        Vec2::new(
            (pos.x + dx).rem_euclid(self.width),
            (pos.y + dy).rem_euclid(self.height),
        )
    }

    pub fn is_passable(&self, pos: Vec2) -> bool {
        self.cell(pos).map(Cell::is_passable).unwrap_or(false)
    }

    pub fn occupants(&self, pos: Vec2) -> &[EntityId] {
        self.cell(pos).map(Cell::occupants).unwrap_or(&[])
    }

    pub fn pellet_count(&self) -> usize {
        self.pellet_count
    }

    pub fn spawn(&mut self, pos: Vec2, unit: Unit) -> Option<EntityId> {
        let idx = self.index_of(pos)?;
        if !self.cells[idx].passable {
            return None;
        }
        let id = EntityId(self.entities.len());
        if matches!(unit, Unit::Pellet(_)) {
            self.pellet_count += 1;
        }
        self.entities.push(Some(Entity::new(unit, pos)));
        self.cells[idx].occupants.push(id);
        Some(id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0).and_then(Option::as_ref)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn player(&self, id: EntityId) -> Option<&Player> {
        self.entity(id).and_then(Entity::as_player)
    }

    pub fn player_mut(&mut self, id: EntityId) -> Option<&mut Player> {
        self.entity_mut(id).and_then(Entity::as_player_mut)
    }

    pub fn ghost(&self, id: EntityId) -> Option<&Ghost> {
        self.entity(id).and_then(Entity::as_ghost)
    }

    pub fn pellet(&self, id: EntityId) -> Option<&Pellet> {
        self.entity(id).and_then(Entity::as_pellet)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.cells.iter().flat_map(|cell| cell.occupants.iter().copied())
    }

    pub(crate) fn relocate(&mut self, id: EntityId, to: Vec2, facing: Direction) -> bool {
        let Some(to_idx) = self.index_of(to) else {
            return false;
        };
        let Some(from) = self.entity(id).map(Entity::cell) else {
            return false;
        };
        if let Some(from_idx) = self.index_of(from) {
            self.cells[from_idx].occupants.retain(|occupant| *occupant != id);
        }
        self.cells[to_idx].occupants.push(id);
        if let Some(entity) = self.entity_mut(id) {
            entity.cell = to;
            entity.facing = facing;
        }
        true
    }

    pub(crate) fn destroy(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.get_mut(id.0)?.take()?;
        if let Some(idx) = self.index_of(entity.cell) {
            self.cells[idx].occupants.retain(|occupant| *occupant != id);
        }
        if matches!(entity.unit, Unit::Pellet(_)) {
            self.pellet_count = self.pellet_count.saturating_sub(1);
        }
        Some(entity)
    }

    pub fn to_tiles(&self) -> Vec<String> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        if !cell.passable {
                            return '#';
                        }
                        match cell.occupants.first().and_then(|id| self.entity(*id)) {
                            Some(entity) => tile_char(&entity.unit),
                            None => ' ',
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

fn tile_char(unit: &Unit) -> char {
    match unit {
        Unit::Player(_) => 'P',
        Unit::Ghost(ghost) => match ghost.kind {
            GhostKind::Chaser => 'B',
            GhostKind::Ambusher => 'K',
            GhostKind::Flanker => 'I',
            GhostKind::Fickle => 'C',
        },
        Unit::Pellet(_) => '.',
    }
}
