use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// Order used when every other preference has been exhausted.
    pub const FALLBACK_ORDER: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Unit step in pixel space (y grows downward).
    pub fn unit(self) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::None => (0.0, 0.0),
        }
    }

    pub fn step_cell(self, cell: Cell) -> Cell {
        match self {
            Self::Up => Cell::new(cell.row - 1, cell.col),
            Self::Down => Cell::new(cell.row + 1, cell.col),
            Self::Left => Cell::new(cell.row, cell.col - 1),
            Self::Right => Cell::new(cell.row, cell.col + 1),
            Self::None => cell,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Crazy,
}

impl Difficulty {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Self::Easy),
            "medium" | "normal" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "crazy" => Some(Self::Crazy),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Wall,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn chebyshev(self, other: Cell) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }
}

/// Pixel-space point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(self, dir: Direction, amount: f64) -> Vec2 {
        let (ux, uy) = dir.unit();
        Vec2::new(self.x + ux * amount, self.y + uy * amount)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdversaryState {
    Pursuing,
    Fleeing,
    Captured,
    Penalized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Patrol,
    Ambush,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PelletKind {
    Token,
    Power,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    #[serde(rename = "speedMultiplier")]
    pub speed_multiplier: f64,
    pub level: u32,
    pub endless: bool,
    pub seed: u64,
    #[serde(rename = "fleeDurationSecs")]
    pub flee_duration_secs: f64,
    #[serde(rename = "penaltyDurationSecs")]
    pub penalty_duration_secs: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: f64,
    pub y: f64,
    pub dir: Direction,
    pub boosted: bool,
    #[serde(rename = "animFrame")]
    pub anim_frame: u8,
}

#[derive(Clone, Debug, Serialize)]
pub struct AdversaryView {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub dir: Direction,
    pub state: AdversaryState,
    pub archetype: Archetype,
    pub flashing: bool,
    #[serde(rename = "animFrame")]
    pub anim_frame: u8,
}

#[derive(Clone, Debug, Serialize)]
pub struct PelletView {
    pub row: i32,
    pub col: i32,
    pub kind: PelletKind,
}

#[derive(Clone, Debug, Serialize)]
pub struct BonusView {
    pub active: bool,
    pub kind: u8,
    pub x: f64,
    pub y: f64,
    #[serde(rename = "popupAt")]
    pub popup_at: Option<Vec2>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PelletCollected {
        row: i32,
        col: i32,
    },
    PowerPelletCollected {
        row: i32,
        col: i32,
    },
    AdversaryFrightened {
        #[serde(rename = "adversaryId")]
        adversary_id: String,
    },
    AdversaryCaptured {
        #[serde(rename = "adversaryId")]
        adversary_id: String,
        points: u32,
    },
    AdversaryTransition {
        #[serde(rename = "adversaryId")]
        adversary_id: String,
        from: AdversaryState,
        to: AdversaryState,
    },
    BonusSpawned {
        kind: u8,
        x: f64,
        y: f64,
    },
    BonusExpired,
    BonusCollected {
        points: u32,
    },
    Victory,
    Defeat {
        #[serde(rename = "adversaryId")]
        adversary_id: String,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "elapsedSecs")]
    pub elapsed_secs: f64,
    pub level: u32,
    pub score: u32,
    #[serde(rename = "tokensCollected")]
    pub tokens_collected: u32,
    #[serde(rename = "tokensTotal")]
    pub tokens_total: u32,
    pub player: PlayerView,
    pub adversaries: Vec<AdversaryView>,
    pub pellets: Vec<PelletView>,
    pub bonus: BonusView,
    pub outcome: Option<Outcome>,
    pub events: Vec<GameEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub outcome: Option<Outcome>,
    pub level: u32,
    #[serde(rename = "levelsCleared")]
    pub levels_cleared: u32,
    pub score: u32,
    #[serde(rename = "tokensCollected")]
    pub tokens_collected: u32,
    #[serde(rename = "tokensTotal")]
    pub tokens_total: u32,
    #[serde(rename = "powerPelletsCollected")]
    pub power_pellets_collected: u32,
    pub captures: u32,
    #[serde(rename = "bonusesCollected")]
    pub bonuses_collected: u32,
    #[serde(rename = "durationSecs")]
    pub duration_secs: f64,
    pub ticks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
            Direction::None,
        ] {
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn step_cell_moves_one_cell_along_axis() {
        let origin = Cell::new(5, 5);
        assert_eq!(Direction::Up.step_cell(origin), Cell::new(4, 5));
        assert_eq!(Direction::Right.step_cell(origin), Cell::new(5, 6));
        assert_eq!(Direction::None.step_cell(origin), origin);
    }

    #[test]
    fn difficulty_parse_accepts_lowercase_names() {
        assert_eq!(Difficulty::parse("crazy"), Some(Difficulty::Crazy));
        assert_eq!(Difficulty::parse("normal"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("Nightmare"), None);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = GameEvent::AdversaryCaptured {
            adversary_id: "adversary_1".to_string(),
            points: 400,
        };
        let value = serde_json::to_value(&event).expect("event serializes");
        assert_eq!(value["type"], "adversary_captured");
        assert_eq!(value["adversaryId"], "adversary_1");
    }
}
