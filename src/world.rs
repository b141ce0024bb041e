use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use super::cell::Cell;

pub const DEFAULT_MAX_TICK_COUNT: i32 = 2500;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GameConfig {
    pub width: i32,
    pub x_cells_count: i32,
    pub y_cells_count: i32,
    pub speed: i32,
    #[serde(default = "default_max_tick_count")]
    pub max_tick_count: i32,
}

fn default_max_tick_count() -> i32 {
    DEFAULT_MAX_TICK_COUNT
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 30,
            x_cells_count: 31,
            y_cells_count: 31,
            speed: 5,
            max_tick_count: DEFAULT_MAX_TICK_COUNT,
        }
    }
}

impl GameConfig {
    pub fn in_bounds(&self, cell: Cell) -> bool {
        0 <= cell.x && cell.x < self.x_cells_count && 0 <= cell.y && cell.y < self.y_cells_count
    }

    pub fn normalize(&self, raw: [i32; 2]) -> Cell {
        Cell::normalize(raw, self.width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum BonusKind {
    #[serde(rename = "n")]
    Nitro,
    #[serde(rename = "s")]
    Slow,
    #[serde(rename = "saw")]
    Saw,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bonus {
    pub kind: BonusKind,
    pub position: Cell,
}

#[derive(Default, Debug, Clone)]
pub struct PlayerView {
    pub position: Cell,
    pub territory: HashSet<Cell>,
    pub lines: Vec<Cell>,
    pub bonuses: HashSet<BonusKind>,
}

impl PlayerView {
    pub fn in_territory(&self) -> bool {
        self.territory.contains(&self.position)
    }

    pub fn lines_set(&self) -> HashSet<Cell> {
        self.lines.iter().copied().collect()
    }

    pub fn has_bonus(&self, kind: BonusKind) -> bool {
        self.bonuses.contains(&kind)
    }
}

#[derive(Default, Debug, Clone)]
pub struct World {
    pub config: GameConfig,
    pub me: PlayerView,
    pub enemies: BTreeMap<String, PlayerView>,
    pub bonuses: Vec<Bonus>,
    pub tick_num: i32,
}

impl World {
    pub fn in_bounds(&self, cell: Cell) -> bool {
        self.config.in_bounds(cell)
    }

    pub fn has_enemies(&self) -> bool {
        !self.enemies.is_empty()
    }

    pub fn players_count(&self) -> usize {
        self.enemies.len() + 1
    }

    pub fn enemy_positions(&self) -> HashSet<Cell> {
        self.enemies.values().map(|enemy| enemy.position).collect()
    }

    pub fn enemy_territory(&self) -> HashSet<Cell> {
        self.enemies
            .values()
            .flat_map(|enemy| enemy.territory.iter().copied())
            .collect()
    }

    pub fn slow_bonuses(&self) -> HashSet<Cell> {
        self.bonuses
            .iter()
            .filter(|bonus| bonus.kind == BonusKind::Slow)
            .map(|bonus| bonus.position)
            .collect()
    }

    pub fn remaining_ticks(&self) -> i32 {
        let speed = self.config.speed.max(1) as f64;
        let left = (self.config.max_tick_count - self.tick_num) as f64;
        (left / speed).floor() as i32 - 1
    }
}
