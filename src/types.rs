use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Exploration order used by every search over the board.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    pub fn parse_move(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "n" | "north" | "up" => Some(Self::North),
            "e" | "east" | "right" => Some(Self::East),
            "s" | "south" | "down" => Some(Self::South),
            "w" | "west" | "left" => Some(Self::West),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dir: Direction, steps: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx * steps,
            y: self.y + dy * steps,
        }
    }

    pub fn manhattan(self, other: Vec2) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostKind {
    Chaser,
    Ambusher,
    Flanker,
    Fickle,
}

impl GhostKind {
    pub fn classic_name(self) -> &'static str {
        match self {
            Self::Chaser => "Blinky",
            Self::Ambusher => "Pinky",
            Self::Flanker => "Inky",
            Self::Fickle => "Clyde",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Ghost,
    Pellet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Won,
    Lost,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub id: usize,
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub alive: bool,
    pub score: i64,
    #[serde(rename = "killedBy")]
    pub killed_by: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub id: usize,
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    #[serde(rename = "type")]
    pub kind: GhostKind,
    #[serde(rename = "intervalMs")]
    pub interval_ms: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct LevelSnapshot {
    pub state: RunState,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    #[serde(rename = "movesApplied")]
    pub moves_applied: u64,
    #[serde(rename = "remainingPellets")]
    pub remaining_pellets: usize,
    pub players: Vec<PlayerView>,
    pub ghosts: Vec<GhostView>,
}
