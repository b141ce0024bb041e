use std::collections::{HashSet, VecDeque};

use super::{cell::Cell, world::World};

/// Enemies further than this many steps are not tracked.
pub const THREAT_DEPTH: i32 = 5;
/// Cells an enemy reaches in fewer steps than this are unsafe.
pub const DANGER_DISTANCE: i32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    width: i32,
    height: i32,
    map: Vec<Option<i32>>,
}

impl DistanceField {
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, None)
    }

    pub fn filled(width: i32, height: i32, value: Option<i32>) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        DistanceField {
            width,
            height,
            map: vec![value; size],
        }
    }

    pub fn for_world(world: &World) -> Self {
        Self::new(world.config.x_cells_count, world.config.y_cells_count)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if 0 <= cell.x && cell.x < self.width && 0 <= cell.y && cell.y < self.height {
            Some((cell.y * self.width + cell.x) as usize)
        } else {
            None
        }
    }

    pub fn get(&self, cell: Cell) -> Option<i32> {
        self.index(cell).and_then(|idx| self.map[idx])
    }

    pub fn set(&mut self, cell: Cell, value: i32) {
        if let Some(idx) = self.index(cell) {
            self.map[idx] = Some(value);
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        if let Some(idx) = self.index(cell) {
            self.map[idx] = None;
        }
    }

    pub fn is_reached(&self, cell: Cell) -> bool {
        self.get(cell).is_some()
    }

    /// Walks downhill from `from` until `is_target` holds, always stepping to the
    /// lowest valued neighbour. The returned path excludes `from` and ends on
    /// the target. `None` if the walk gets stuck.
    pub fn descend(&self, from: Cell, is_target: impl Fn(Cell) -> bool) -> Option<Vec<Cell>> {
        let mut current = from;
        let mut path = Vec::new();

        while !is_target(current) {
            let mut best = current;
            let mut best_value = self.get(current)?;

            for neighbor in current.neighbors() {
                if let Some(value) = self.get(neighbor) {
                    if value < best_value {
                        best = neighbor;
                        best_value = value;
                    }
                }
            }

            if best == current {
                return None;
            }

            path.push(best);
            current = best;
        }

        Some(path)
    }
}

pub struct ThreatsMap<'a> {
    world: &'a World,
    map: DistanceField,
}

impl<'a> ThreatsMap<'a> {
    pub fn new(world: &'a World) -> Self {
        let mut threats = ThreatsMap {
            world,
            map: DistanceField::for_world(world),
        };
        threats.run_bfs_from_enemies();
        threats
    }

    fn run_bfs_from_enemies(&mut self) {
        let enemy_points: HashSet<Cell> = self.world.enemy_positions();
        let mut queue: VecDeque<Cell> = enemy_points.iter().copied().collect();

        for &point in &enemy_points {
            self.map.set(point, 0);
        }

        let mut step_num = 0;
        while !queue.is_empty() {
            step_num += 1;
            if step_num > THREAT_DEPTH {
                break;
            }

            for _ in 0..queue.len() {
                let Some(point) = queue.pop_front() else {
                    break;
                };

                for neighbor in point.neighbors() {
                    if !self.world.in_bounds(neighbor) {
                        continue;
                    }

                    match self.map.get(neighbor) {
                        Some(value) if value <= step_num => {}
                        _ => {
                            self.map.set(neighbor, step_num);
                            queue.push_back(neighbor);
                        }
                    }
                }
            }
        }
    }

    pub fn is_safe(&self, cell: Cell) -> bool {
        if self.world.me.territory.contains(&cell) {
            return true;
        }

        if !self.world.in_bounds(cell) {
            return false;
        }

        !matches!(self.map.get(cell), Some(value) if value < DANGER_DISTANCE)
    }

    pub fn field(&self) -> &DistanceField {
        &self.map
    }
}
