use std::collections::{HashSet, VecDeque};

use super::{bounds::Bounds, cell::Cell, maps::DistanceField, world::World};

pub struct SavesMap<'a> {
    world: &'a World,
    end_point: Cell,
    lines: HashSet<Cell>,
    map: DistanceField,
    steps_to_save: Option<i32>,
}

impl<'a> SavesMap<'a> {
    pub fn new(world: &'a World) -> Self {
        let mut saves = SavesMap {
            world,
            end_point: world.me.position,
            lines: world.me.lines_set(),
            map: DistanceField::for_world(world),
            steps_to_save: None,
        };
        saves.compute();
        saves
    }

    fn compute(&mut self) {
        let territory = &self.world.me.territory;
        for &point in territory {
            self.map.set(point, 0);
        }

        let mut queue: VecDeque<Cell> = territory.iter().copied().collect();

        self.lines.remove(&self.end_point);
        let just_left = self.lines.is_empty();

        let mut n_steps = 0;
        'search: while !queue.is_empty() {
            n_steps += 1;

            for _ in 0..queue.len() {
                let Some(point) = queue.pop_front() else {
                    break;
                };

                for neighbor in point.neighbors() {
                    if !self.is_valid_location(neighbor) || self.map.is_reached(neighbor) {
                        continue;
                    }

                    self.map.set(neighbor, n_steps);

                    if neighbor == self.end_point {
                        // a single step right after leaving home is not a way back
                        if just_left && n_steps == 1 {
                            self.map.clear(neighbor);
                            continue;
                        }

                        self.steps_to_save = Some(n_steps);
                        self.lines.insert(self.end_point);
                        break 'search;
                    }

                    queue.push_back(neighbor);
                }
            }
        }
    }

    fn is_valid_location(&self, cell: Cell) -> bool {
        self.world.in_bounds(cell) && !self.lines.contains(&cell)
    }

    pub fn distance_to_territory(&self) -> Option<i32> {
        self.steps_to_save
    }

    /// Equal-valued candidates go to the one growing the trail's bounding rectangle.
    pub fn path_to_territory(&self) -> Vec<Cell> {
        if self.steps_to_save.is_none() {
            return Vec::new();
        }

        let territory = &self.world.me.territory;
        let mut bounds = Bounds::around(&self.lines);
        let mut current = self.end_point;
        let mut path = Vec::new();

        while !territory.contains(&current) {
            let mut best = current;
            let Some(current_value) = self.map.get(current) else {
                break;
            };

            for neighbor in current.neighbors() {
                if !self.is_valid_location(neighbor) {
                    continue;
                }

                // skipping more than one layer only happens right next to home
                // after the one-step answer was discarded
                let Some(value) = self.map.get(neighbor).filter(|&v| v >= current_value - 1)
                else {
                    continue;
                };
                let best_value = self.map.get(best).unwrap_or(i32::MAX);

                if value < best_value {
                    best = neighbor;
                } else if value == best_value
                    && best != current
                    && Bounds::absorb(&mut bounds, neighbor)
                {
                    best = neighbor;
                }
            }

            if best == current {
                break;
            }

            path.push(best);
            current = best;
            Bounds::absorb(&mut bounds, best);
        }

        path
    }

    pub fn distance_from_point_to_territory(&self, point: Cell) -> Option<i32> {
        if !self.is_valid_location(point) {
            return None;
        }

        if let Some(value) = self.map.get(point) {
            return Some(value);
        }

        let mut queue = VecDeque::from([point]);
        let mut visited = HashSet::from([point]);
        let mut n_steps = 0;

        while !queue.is_empty() {
            n_steps += 1;

            for _ in 0..queue.len() {
                let Some(current) = queue.pop_front() else {
                    break;
                };

                for neighbor in current.neighbors() {
                    if !self.is_valid_location(neighbor) || visited.contains(&neighbor) {
                        continue;
                    }

                    if let Some(value) = self.map.get(neighbor) {
                        return Some(n_steps + value);
                    }

                    queue.push_back(neighbor);
                    visited.insert(neighbor);
                }
            }
        }

        None
    }

    pub fn field(&self) -> &DistanceField {
        &self.map
    }
}

#[cfg(test)]
mod tests {
    use super::super::sketch::sketch;
    use super::*;

    #[test]
    fn path_home_matches_distance() {
        let world = sketch(&[
            "..........",
            "...@......",
            "...+......",
            "...+......",
            "####......",
            "####......",
        ]);
        let saves = SavesMap::new(&world);

        let distance = saves.distance_to_territory();
        let path = saves.path_to_territory();
        assert_eq!(distance, Some(4));
        assert_eq!(path.len(), 4);
        assert!(world.me.territory.contains(path.last().unwrap()));
        for cell in &path {
            assert!(!world.me.lines.contains(cell));
        }
    }

    #[test]
    fn inside_territory_has_no_way_home() {
        let world = sketch(&[
            ".....",
            ".###.",
            ".#%#.",
            ".###.",
            ".....",
        ]);
        let saves = SavesMap::new(&world);

        assert_eq!(saves.distance_to_territory(), None);
        assert!(saves.path_to_territory().is_empty());
    }

    #[test]
    fn single_step_right_after_leaving_is_discarded() {
        let world = sketch(&[
            ".....",
            "..@..",
            "#####",
        ]);
        let saves = SavesMap::new(&world);

        // the cell straight below is home, but the answer has to go around
        assert_eq!(saves.distance_to_territory(), Some(2));
        assert_eq!(saves.path_to_territory().len(), 2);
    }

    #[test]
    fn enclosed_points_have_no_distance() {
        let world = sketch(&[
            ".+++.",
            ".+.+.",
            ".+@+.",
            ".....",
            "#####",
        ]);
        let saves = SavesMap::new(&world);

        assert_eq!(saves.distance_from_point_to_territory(Cell::new(2, 3)), None);
        assert_eq!(saves.distance_from_point_to_territory(Cell::new(0, 4)), Some(4));
        assert_eq!(saves.distance_from_point_to_territory(Cell::new(1, 4)), None);
    }

    #[test]
    fn tie_goes_to_the_step_growing_the_trail_rectangle() {
        // (1, 2) and (2, 1) are both one step from home
        let world = sketch(&[
            "#+...",
            "#++..",
            "#.@..",
            "#....",
            "#####",
        ]);
        let saves = SavesMap::new(&world);

        assert_eq!(saves.distance_to_territory(), Some(2));
        assert_eq!(
            saves.path_to_territory(),
            vec![Cell::new(2, 1), Cell::new(2, 0)]
        );

        let world = sketch(&[
            "#....",
            "#....",
            "#.@+.",
            "#..+.",
            "#####",
        ]);
        let saves = SavesMap::new(&world);

        assert_eq!(
            saves.path_to_territory(),
            vec![Cell::new(1, 2), Cell::new(0, 2)]
        );
    }
}
