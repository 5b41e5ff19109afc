use crate::board::Board;
use crate::constants::{AMBUSH_LOOKAHEAD, FICKLE_SHYNESS, FLANK_PIVOT_LOOKAHEAD};
use crate::navigation::{
    find_first_ghost, find_first_player, nearest_passable, shortest_path, DistanceField,
};
use crate::types::{Direction, GhostKind, Vec2};
use crate::units::EntityId;

/// Decides the next step for `ghost` from the current board alone. `None`
/// means the ghost stays put this time.
pub fn next_move(board: &Board, ghost: EntityId) -> Option<Direction> {
    let entity = board.entity(ghost)?;
    let kind = entity.as_ghost()?.kind;
    let origin = entity.cell();

    let target = match kind {
        GhostKind::Chaser => chaser_target(board)?,
        GhostKind::Ambusher => ambusher_target(board)?,
        GhostKind::Flanker => flanker_target(board)?,
        GhostKind::Fickle => return fickle_move(board, origin),
    };
    first_step(board, origin, target)
}

fn first_step(board: &Board, origin: Vec2, target: Vec2) -> Option<Direction> {
    shortest_path(board, origin, target)?.first().copied()
}

fn locate_player(board: &Board) -> Option<(Vec2, Direction)> {
    let entity = board.entity(find_first_player(board)?)?;
    Some((entity.cell(), entity.facing))
}

fn chaser_target(board: &Board) -> Option<Vec2> {
    locate_player(board).map(|(cell, _)| cell)
}

fn ambusher_target(board: &Board) -> Option<Vec2> {
    let (cell, facing) = locate_player(board)?;
    nearest_passable(board, cell.offset(facing, AMBUSH_LOOKAHEAD))
}

fn flanker_target(board: &Board) -> Option<Vec2> {
    let chaser = board.entity(find_first_ghost(board, GhostKind::Chaser)?)?.cell();
    let (cell, facing) = locate_player(board)?;
    let pivot = cell.offset(facing, FLANK_PIVOT_LOOKAHEAD);
    let target = Vec2::new(
        chaser.x + 2 * (pivot.x - chaser.x),
        chaser.y + 2 * (pivot.y - chaser.y),
    );
    nearest_passable(board, target)
}

fn fickle_move(board: &Board, origin: Vec2) -> Option<Direction> {
    let (player_cell, _) = locate_player(board)?;
    let path = shortest_path(board, origin, player_cell)?;
    let toward = *path.first()?;
    if path.len() > FICKLE_SHYNESS {
        return Some(toward);
    }
    if let Some(dir) = flee_direction(board, origin, player_cell, path.len()) {
        return Some(dir);
    }
    // Only offered when walled off; the level then rejects it.
    let back = toward.opposite();
    if board.is_passable(board.neighbor(origin, back)) {
        None
    } else {
        Some(back)
    }
}

/// Passable neighbor that lies strictly farther from the player, preferring
/// the largest gain.
fn flee_direction(
    board: &Board,
    origin: Vec2,
    player_cell: Vec2,
    current: usize,
) -> Option<Direction> {
    let field = DistanceField::from_origin(board, player_cell);
    let mut best: Option<(usize, Direction)> = None;
    for dir in Direction::ALL {
        let next = board.neighbor(origin, dir);
        if !board.is_passable(next) {
            continue;
        }
        let Some(dist) = field.get(next) else {
            continue;
        };
        if dist <= current {
            continue;
        }
        if best.map(|(best_dist, _)| dist > best_dist).unwrap_or(true) {
            best = Some((dist, dir));
        }
    }
    best.map(|(_, dir)| dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_parser::parse_map;
    use crate::navigation::distance;

    fn ghost_of(board: &Board, kind: GhostKind) -> EntityId {
        find_first_ghost(board, kind).expect("ghost on board")
    }

    fn face_player(board: &mut Board, dir: Direction) {
        let player = find_first_player(board).expect("player on board");
        board.entity_mut(player).expect("player alive").facing = dir;
    }

    fn player_cell(board: &Board) -> Vec2 {
        let player = find_first_player(board).expect("player on board");
        board.entity(player).expect("player alive").cell()
    }

    #[test]
    fn every_kind_waits_without_a_player() {
        let board = parse_map(&["#####", "#BKIC", "#   #"]).expect("valid map");
        for kind in [
            GhostKind::Chaser,
            GhostKind::Ambusher,
            GhostKind::Flanker,
            GhostKind::Fickle,
        ] {
            assert_eq!(next_move(&board, ghost_of(&board, kind)), None, "{kind:?}");
        }
    }

    #[test]
    fn non_ghost_entities_have_no_move() {
        let board = parse_map(&["P B"]).expect("valid map");
        let player = find_first_player(&board).expect("player on board");
        assert_eq!(next_move(&board, player), None);
    }

    #[test]
    fn chaser_heads_straight_for_the_player() {
        let board = parse_map(&["#######", "#P   B#", "#######"]).expect("valid map");
        assert_eq!(
            next_move(&board, ghost_of(&board, GhostKind::Chaser)),
            Some(Direction::West)
        );
    }

    #[test]
    fn chaser_waits_when_the_player_is_walled_off() {
        let board = parse_map(&["#######", "#P # B#", "#######"]).expect("valid map");
        assert_eq!(next_move(&board, ghost_of(&board, GhostKind::Chaser)), None);
    }

    #[test]
    fn ambusher_aims_ahead_of_the_player() {
        let mut board = parse_map(&[
            "#########",
            "#       #",
            "# ##### #",
            "#P  K   #",
            "#########",
        ])
        .expect("valid map");
        // Four cells north of the player clamps onto the top corridor.
        face_player(&mut board, Direction::North);
        assert_eq!(
            next_move(&board, ghost_of(&board, GhostKind::Ambusher)),
            Some(Direction::West)
        );

        face_player(&mut board, Direction::East);
        assert_eq!(
            next_move(&board, ghost_of(&board, GhostKind::Ambusher)),
            Some(Direction::East)
        );
    }

    #[test]
    fn flanker_waits_without_a_chaser_for_every_player_position() {
        let rows = ["#######", "#     #", "#  I  #", "#     #", "#######"];
        for y in 1..4 {
            for x in 1..6 {
                if (x, y) == (3, 2) {
                    continue;
                }
                let mut map: Vec<Vec<char>> =
                    rows.iter().map(|row| row.chars().collect()).collect();
                map[y][x] = 'P';
                let map: Vec<String> =
                    map.into_iter().map(|row| row.into_iter().collect()).collect();
                let board = parse_map(&map).expect("valid map");
                assert_eq!(next_move(&board, ghost_of(&board, GhostKind::Flanker)), None);
            }
        }
    }

    #[test]
    fn flanker_without_player_waits_even_with_chaser() {
        let board = parse_map(&["####", "B  I", "####"]).expect("valid map");
        assert_eq!(next_move(&board, ghost_of(&board, GhostKind::Flanker)), None);
    }

    #[test]
    fn flanker_closes_in_from_beyond_the_player() {
        let mut board = parse_map(&[
            "#######################",
            "#          P    B   I #",
            "#######################",
        ])
        .expect("valid map");
        face_player(&mut board, Direction::East);
        assert_eq!(
            next_move(&board, ghost_of(&board, GhostKind::Flanker)),
            Some(Direction::West)
        );
    }

    #[test]
    fn flanker_backs_off_when_standing_in_front_of_the_player() {
        let mut board = parse_map(&[
            "#######################",
            "#      B P  I         #",
            "#######################",
        ])
        .expect("valid map");
        face_player(&mut board, Direction::East);
        assert_eq!(
            next_move(&board, ghost_of(&board, GhostKind::Flanker)),
            Some(Direction::East)
        );
    }

    #[test]
    fn flanker_waits_when_target_is_cut_off() {
        let mut board = parse_map(&[
            "#######################",
            "#         P#       I B#",
            "#######################",
        ])
        .expect("valid map");
        face_player(&mut board, Direction::West);
        assert_eq!(next_move(&board, ghost_of(&board, GhostKind::Flanker)), None);
    }

    #[test]
    fn fickle_flees_at_distance_eight() {
        let board = parse_map(&["#################", "#P       C      #", "#################"])
            .expect("valid map");
        let ghost = ghost_of(&board, GhostKind::Fickle);
        let origin = board.entity(ghost).expect("ghost alive").cell();
        let player = player_cell(&board);
        assert_eq!(distance(&board, origin, player), Some(8));

        let dir = next_move(&board, ghost).expect("fickle ghost moves");
        let after = board.neighbor(origin, dir);
        assert!(distance(&board, after, player) > Some(8));
    }

    #[test]
    fn fickle_approaches_at_distance_nine() {
        let board = parse_map(&["#################", "#P        C     #", "#################"])
            .expect("valid map");
        let ghost = ghost_of(&board, GhostKind::Fickle);
        let origin = board.entity(ghost).expect("ghost alive").cell();
        let player = player_cell(&board);
        assert_eq!(distance(&board, origin, player), Some(9));

        let dir = next_move(&board, ghost).expect("fickle ghost moves");
        let after = board.neighbor(origin, dir);
        assert!(distance(&board, after, player) < Some(9));
    }

    #[test]
    fn cornered_fickle_turns_its_back() {
        let board = parse_map(&["############", "P       C###", "############"])
            .expect("valid map");
        assert_eq!(
            next_move(&board, ghost_of(&board, GhostKind::Fickle)),
            Some(Direction::East)
        );
    }

    #[test]
    fn cornered_fickle_on_an_open_torus_stays_put() {
        let board = parse_map(&["P   ", "    ", "  C ", "    "]).expect("valid map");
        let ghost = ghost_of(&board, GhostKind::Fickle);
        let origin = board.entity(ghost).expect("ghost on board").cell();
        let target = player_cell(&board);
        assert_eq!(distance(&board, origin, target), Some(4));
        for dir in Direction::ALL {
            let next = board.neighbor(origin, dir);
            assert!(distance(&board, next, target) <= Some(4));
        }
        assert_eq!(next_move(&board, ghost), None);
    }

    #[test]
    fn distant_fickle_chases() {
        let board = parse_map(&["############", "P        C##", "############"])
            .expect("valid map");
        assert_eq!(
            next_move(&board, ghost_of(&board, GhostKind::Fickle)),
            Some(Direction::West)
        );
    }

    #[test]
    fn fickle_waits_without_a_path() {
        let board = parse_map(&["######", "#P##C ", " ###  "]).expect("valid map");
        assert_eq!(next_move(&board, ghost_of(&board, GhostKind::Fickle)), None);
    }
}
