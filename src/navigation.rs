use std::collections::VecDeque;

use crate::board::Board;
use crate::types::{Direction, GhostKind, Vec2};
use crate::units::{Entity, EntityId};

pub fn shortest_path(board: &Board, from: Vec2, to: Vec2) -> Option<Vec<Direction>> {
    let start = board.index_of(from)?;
    let goal = board.index_of(to)?;
    if start == goal {
        return Some(Vec::new());
    }
    if !board.is_passable(to) {
        return None;
    }

    let cell_count = (board.width() * board.height()) as usize;
    let mut came_from: Vec<Option<(usize, Direction)>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    let mut queue = VecDeque::new();
    visited[start] = true;
    queue.push_back(from);

    while let Some(pos) = queue.pop_front() {
        let Some(current) = board.index_of(pos) else {
            continue;
        };
        if current == goal {
            break;
        }
        for dir in Direction::ALL {
            let next = board.neighbor(pos, dir);
            if !board.is_passable(next) {
                continue;
            }
            let Some(next_idx) = board.index_of(next) else {
                continue;
            };
            if visited[next_idx] {
                continue;
            }
            visited[next_idx] = true;
            came_from[next_idx] = Some((current, dir));
            queue.push_back(next);
        }
    }

    if !visited[goal] {
        return None;
    }
    let mut path = Vec::new();
    let mut cursor = goal;
    while cursor != start {
        let (prev, dir) = came_from[cursor]?;
        path.push(dir);
        cursor = prev;
    }
    path.reverse();
    Some(path)
}

pub fn distance(board: &Board, from: Vec2, to: Vec2) -> Option<usize> {
    shortest_path(board, from, to).map(|path| path.len())
}

#[derive(Clone, Debug)]
pub struct DistanceField {
    width: i32,
    distances: Vec<Option<usize>>,
}

impl DistanceField {
    pub fn from_origin(board: &Board, origin: Vec2) -> Self {
        let cell_count = (board.width() * board.height()) as usize;
        let mut distances = vec![None; cell_count];
        let mut queue = VecDeque::new();
        if let Some(idx) = board.index_of(origin) {
            distances[idx] = Some(0);
            queue.push_back((origin, 0usize));
        }

        while let Some((pos, dist)) = queue.pop_front() {
            for dir in Direction::ALL {
                let next = board.neighbor(pos, dir);
                if !board.is_passable(next) {
                    continue;
                }
                let Some(next_idx) = board.index_of(next) else {
                    continue;
                };
                if distances[next_idx].is_some() {
                    continue;
                }
                distances[next_idx] = Some(dist + 1);
                queue.push_back((next, dist + 1));
            }
        }

        Self {
            width: board.width(),
            distances,
        }
    }

    pub fn get(&self, pos: Vec2) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width {
            return None;
        }
        let idx = (pos.y * self.width + pos.x) as usize;
        self.distances.get(idx).copied().flatten()
    }
}

pub fn find_first<F>(board: &Board, predicate: F) -> Option<EntityId>
where
    F: Fn(&Entity) -> bool,
{
    board.entity_ids().find(|id| {
        board
            .entity(*id)
            .map(|entity| predicate(entity))
            .unwrap_or(false)
    })
}

pub fn find_first_player(board: &Board) -> Option<EntityId> {
    find_first(board, |entity| entity.as_player().is_some())
}

pub fn find_first_ghost(board: &Board, kind: GhostKind) -> Option<EntityId> {
    find_first(board, |entity| entity.is_ghost_of(kind))
}

pub fn nearest_passable(board: &Board, target: Vec2) -> Option<Vec2> {
    let clamped = Vec2::new(
        target.x.clamp(0, board.width() - 1),
        target.y.clamp(0, board.height() - 1),
    );
    if board.is_passable(clamped) {
        return Some(clamped);
    }
    board
        .cells()
        .filter(|cell| cell.is_passable())
        .map(|cell| cell.pos())
        .min_by_key(|pos| (pos.manhattan(clamped), pos.y, pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_parser::parse_map;

    #[test]
    fn straight_corridor_path() {
        let board = parse_map(&["#     #"]).expect("valid map");
        let path = shortest_path(&board, Vec2::new(1, 0), Vec2::new(4, 0)).expect("reachable");
        assert_eq!(path, vec![Direction::East; 3]);
        assert_eq!(distance(&board, Vec2::new(4, 0), Vec2::new(1, 0)), Some(3));
    }

    #[test]
    fn same_cell_is_zero_length() {
        let board = parse_map(&["   "]).expect("valid map");
        assert_eq!(
            shortest_path(&board, Vec2::new(1, 0), Vec2::new(1, 0)),
            Some(Vec::new())
        );
    }

    #[test]
    fn walls_make_targets_unreachable() {
        let board = parse_map(&["# # #"]).expect("valid map");
        assert_eq!(shortest_path(&board, Vec2::new(1, 0), Vec2::new(3, 0)), None);
        assert_eq!(shortest_path(&board, Vec2::new(1, 0), Vec2::new(2, 0)), None);
    }

    #[test]
    fn paths_use_wraparound_edges() {
        let board = parse_map(&["      "]).expect("valid map");
        let path = shortest_path(&board, Vec2::new(0, 0), Vec2::new(5, 0)).expect("reachable");
        assert_eq!(path, vec![Direction::West]);
    }

    #[test]
    fn equal_length_paths_prefer_north_then_east() {
        let board = parse_map(&["#####", "#   #", "#   #", "#####"]).expect("valid map");
        for _ in 0..4 {
            let path =
                shortest_path(&board, Vec2::new(1, 2), Vec2::new(2, 1)).expect("reachable");
            assert_eq!(path, vec![Direction::North, Direction::East]);
        }
    }

    #[test]
    fn distance_field_matches_pairwise_search() {
        let board = parse_map(&["#######", "#  #  #", "#     #", "#######"]).expect("valid map");
        let origin = Vec2::new(1, 1);
        let field = DistanceField::from_origin(&board, origin);
        for cell in board.cells().filter(|cell| cell.is_passable()) {
            assert_eq!(field.get(cell.pos()), distance(&board, origin, cell.pos()));
        }
        assert_eq!(field.get(Vec2::new(3, 1)), None);
    }

    #[test]
    fn find_first_scans_row_major() {
        let board = parse_map(&["  C", "B P", "P  "]).expect("valid map");
        let player = find_first_player(&board).expect("player on board");
        assert_eq!(board.entity(player).map(Entity::cell), Some(Vec2::new(2, 1)));
        let chaser = find_first_ghost(&board, GhostKind::Chaser).expect("chaser on board");
        assert_eq!(board.entity(chaser).map(Entity::cell), Some(Vec2::new(0, 1)));
        assert!(find_first_ghost(&board, GhostKind::Flanker).is_none());
    }

    #[test]
    fn nearest_passable_clamps_and_avoids_walls() {
        let board = parse_map(&["#####", "#   #", "#####"]).expect("valid map");
        assert_eq!(nearest_passable(&board, Vec2::new(-4, 1)), Some(Vec2::new(1, 1)));
        assert_eq!(nearest_passable(&board, Vec2::new(9, 9)), Some(Vec2::new(3, 1)));
        assert_eq!(nearest_passable(&board, Vec2::new(2, 0)), Some(Vec2::new(2, 1)));
        assert_eq!(nearest_passable(&board, Vec2::new(2, 1)), Some(Vec2::new(2, 1)));
    }
}
