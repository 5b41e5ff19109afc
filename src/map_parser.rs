use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::board::Board;
use crate::constants::PELLET_VALUE;
use crate::types::{GhostKind, Vec2};
use crate::units::{Ghost, Pellet, Player, Unit};

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map has no cells")]
    Empty,
    #[error("row {row} is {actual} wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid character at {x},{y}: {found}")]
    InvalidCharacter { x: usize, y: usize, found: char },
    #[error("could not read map {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

enum Tile {
    Wall,
    Floor(Option<Unit>),
}

fn tile_for(c: char) -> Option<Tile> {
    let ghost = |kind| Some(Tile::Floor(Some(Unit::Ghost(Ghost { kind }))));
    match c {
        '#' => Some(Tile::Wall),
        ' ' => Some(Tile::Floor(None)),
        '.' => Some(Tile::Floor(Some(Unit::Pellet(Pellet {
            value: PELLET_VALUE,
        })))),
        'P' => Some(Tile::Floor(Some(Unit::Player(Player::default())))),
        'G' | 'B' => ghost(GhostKind::Chaser),
        'K' => ghost(GhostKind::Ambusher),
        'I' => ghost(GhostKind::Flanker),
        'C' => ghost(GhostKind::Fickle),
        _ => None,
    }
}

pub fn parse_map<I>(rows: I) -> Result<Board, MapError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let rows: Vec<Vec<char>> = rows
        .into_iter()
        .map(|row| row.as_ref().chars().collect())
        .collect();
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if width == 0 {
        return Err(MapError::Empty);
    }

    let mut passable = Vec::with_capacity(width * rows.len());
    let mut placements = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(MapError::RaggedRow {
                row: y,
                expected: width,
                actual: row.len(),
            });
        }
        for (x, c) in row.iter().enumerate() {
            match tile_for(*c) {
                Some(Tile::Wall) => passable.push(false),
                Some(Tile::Floor(unit)) => {
                    passable.push(true);
                    if let Some(unit) = unit {
                        placements.push((Vec2::new(x as i32, y as i32), unit));
                    }
                }
                None => return Err(MapError::InvalidCharacter { x, y, found: *c }),
            }
        }
    }

    let mut board =
        Board::new(width as i32, rows.len() as i32, passable).ok_or(MapError::Empty)?;
    for (pos, unit) in placements {
        board.spawn(pos, unit);
    }
    Ok(board)
}

pub fn parse_file(path: &Path) -> Result<Board, MapError> {
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    })?;
    let mut rows: Vec<&str> = text.lines().collect();
    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    parse_map(rows)
}
