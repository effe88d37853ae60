#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Order in which held directions are applied to a player each tick.
    pub const POLL_ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub const fn tile_offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

const DIRECTION_COUNT: usize = 4;
pub const MAX_PLAYER_SLOTS: usize = 4;

pub trait InputSource {
    fn is_direction_active(&self, player_slot: usize, direction: Direction) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
struct DirectionStates {
    down: [bool; DIRECTION_COUNT],
}

/// Held directions for every player slot at one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    slots: [DirectionStates; MAX_PLAYER_SLOTS],
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Slots beyond [`MAX_PLAYER_SLOTS`] are ignored.
    pub fn with_direction_down(
        mut self,
        player_slot: usize,
        direction: Direction,
        is_down: bool,
    ) -> Self {
        self.set(player_slot, direction, is_down);
        self
    }

    pub fn set(&mut self, player_slot: usize, direction: Direction, is_down: bool) {
        if let Some(slot) = self.slots.get_mut(player_slot) {
            slot.down[direction.index()] = is_down;
        }
    }
}

impl InputSource for InputSnapshot {
    fn is_direction_active(&self, player_slot: usize, direction: Direction) -> bool {
        self.slots
            .get(player_slot)
            .is_some_and(|slot| slot.down[direction.index()])
    }
}
