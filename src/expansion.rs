use std::collections::{HashSet, VecDeque};

use rand::{seq::SliceRandom, Rng};

use super::{cell::Cell, maps::DistanceField, world::World};

/// Picks where to leave own territory: a border cell close to enemy land and to
/// the own head, but far from enemy heads.
pub struct TerritoryMovementsMap<'a> {
    world: &'a World,
    prev_location: Option<Cell>,
    curr_pos: Cell,
    map: DistanceField,
    bordering_points: HashSet<Cell>,
}

impl<'a> TerritoryMovementsMap<'a> {
    pub fn new(world: &'a World, prev_location: Option<Cell>) -> Self {
        let mut movements = TerritoryMovementsMap {
            world,
            prev_location,
            curr_pos: world.me.position,
            map: DistanceField::for_world(world),
            bordering_points: HashSet::new(),
        };

        movements.find_territory_borders();
        movements.run_bfs_from_enemy_territory();
        movements.run_bfs_from_curr_pos();
        movements
    }

    fn find_territory_borders(&mut self) {
        let territory = &self.world.me.territory;

        for point in territory {
            for neighbor in point.neighbors() {
                if self.world.in_bounds(neighbor) && !territory.contains(&neighbor) {
                    self.bordering_points.insert(neighbor);
                }
            }
        }
    }

    fn run_bfs_from_enemy_territory(&mut self) {
        let enemy_territory = self.world.enemy_territory();
        for &point in &enemy_territory {
            self.map.set(point, 0);
        }

        let mut queue: VecDeque<Cell> = enemy_territory.into_iter().collect();
        let mut step_num = 0;

        while !queue.is_empty() {
            step_num += 1;

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

    fn run_bfs_from_curr_pos(&mut self) {
        let required_count = self.bordering_points.len();
        let mut visited_count = 0;

        let mut queue = VecDeque::from([self.curr_pos]);
        let mut visited = HashSet::from([self.curr_pos]);
        let mut step_num = 0;

        while !queue.is_empty() {
            step_num += 1;

            for _ in 0..queue.len() {
                let Some(point) = queue.pop_front() else {
                    break;
                };

                for neighbor in point.neighbors() {
                    if !self.world.in_bounds(neighbor)
                        || Some(neighbor) == self.prev_location
                        || visited.contains(&neighbor)
                    {
                        continue;
                    }

                    let value = self.map.get(neighbor).map_or(step_num, |v| v + step_num);
                    self.map.set(neighbor, value);

                    if self.bordering_points.contains(&neighbor) {
                        visited_count += 1;
                        if visited_count == required_count {
                            return;
                        }
                    }

                    visited.insert(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
    }

    pub fn weights(&self) -> Vec<(Cell, i32)> {
        let enemy_points = self.world.enemy_positions();
        let mut points: Vec<Cell> = self.bordering_points.iter().copied().collect();
        points.sort();

        points
            .into_iter()
            .filter_map(|point| {
                let field = self.map.get(point)?;
                let distance_to_enemy = enemy_points
                    .iter()
                    .map(|&enemy| point.manhattan(enemy))
                    .min()?;
                Some((point, -field + distance_to_enemy))
            })
            .collect()
    }

    pub fn best_point<R: Rng>(&self, rng: &mut R) -> Option<Cell> {
        let weights = self.weights();
        let max_weight = weights.iter().map(|&(_, weight)| weight).max()?;
        let best: Vec<Cell> = weights
            .into_iter()
            .filter(|&(_, weight)| weight == max_weight)
            .map(|(point, _)| point)
            .collect();
        best.choose(rng).copied()
    }

    pub fn next_point<R: Rng>(&self, rng: &mut R) -> Option<Cell> {
        let best_point = self.best_point(rng)?;

        if Some(best_point) == self.prev_location {
            return None;
        }

        let map = self.run_bfs_to_best_point(best_point)?;
        let descent = map.descend(best_point, |cell| cell == self.curr_pos)?;

        let mut path: Vec<Cell> = descent.into_iter().rev().skip(1).collect();
        path.push(best_point);
        path.first().copied()
    }

    fn run_bfs_to_best_point(&self, end_point: Cell) -> Option<DistanceField> {
        let mut map = DistanceField::for_world(self.world);
        map.set(self.curr_pos, 0);

        let mut queue = VecDeque::from([self.curr_pos]);
        let mut n_steps = 0;

        while !queue.is_empty() {
            n_steps += 1;

            for _ in 0..queue.len() {
                let Some(point) = queue.pop_front() else {
                    break;
                };

                for neighbor in point.neighbors() {
                    if !self.world.in_bounds(neighbor)
                        || Some(neighbor) == self.prev_location
                        || map.is_reached(neighbor)
                    {
                        continue;
                    }

                    map.set(neighbor, n_steps);

                    if neighbor == end_point {
                        return Some(map);
                    }

                    queue.push_back(neighbor);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::super::sketch::sketch;
    use super::*;

    #[test]
    fn heads_for_the_heaviest_border_cell() {
        let world = sketch(&[
            "1.........",
            "..........",
            "..###.....",
            "..#%#.....",
            "..###...bb",
            "........b2",
        ]);
        let movements = TerritoryMovementsMap::new(&world, Some(Cell::new(2, 2)));
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        assert_eq!(movements.best_point(&mut rng), Some(Cell::new(5, 2)));
        assert_eq!(movements.next_point(&mut rng), Some(Cell::new(4, 2)));
    }

    #[test]
    fn never_walks_back_to_the_cell_just_left() {
        let world = sketch(&[
            ".........2",
            "..........",
            "..###.....",
            "b.%##.....",
            "..###.....",
            "..........",
        ]);
        let prev = Cell::new(1, 2);
        let movements = TerritoryMovementsMap::new(&world, Some(prev));
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(movements.best_point(&mut rng), Some(prev));
        assert_eq!(movements.next_point(&mut rng), None);
    }
}
