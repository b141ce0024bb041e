use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use super::{cell::Cell, maps::DistanceField, world::World};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackPlan {
    NoTarget,
    EnemyEscapes {
        steps_to_enemy: i32,
        enemy_save_distance: i32,
    },
    LongerTrail,
    NoPath,
    NoReturn,
    Intercepted {
        steps_to_second_enemy: i32,
        attack_distance: i32,
    },
    Strike {
        enemy_id: String,
        path_to_enemy: Vec<Cell>,
        path_from_enemy: Vec<Cell>,
    },
}

impl AttackPlan {
    pub fn next_location(&self) -> Option<Cell> {
        match self {
            AttackPlan::Strike { path_to_enemy, .. } => path_to_enemy.first().copied(),
            _ => None,
        }
    }
}

pub struct AttacksMap<'a> {
    world: &'a World,
    start_point: Cell,
    lines: HashSet<Cell>,
    line_owners: HashMap<Cell, &'a str>,
}

impl<'a> AttacksMap<'a> {
    pub fn new(world: &'a World) -> Self {
        let mut line_owners = HashMap::new();
        for (id, enemy) in &world.enemies {
            for &cell in &enemy.lines {
                line_owners.insert(cell, id.as_str());
            }
        }

        AttacksMap {
            world,
            start_point: world.me.position,
            lines: world.me.lines_set(),
            line_owners,
        }
    }

    pub fn next_location(&self) -> Option<Cell> {
        self.plan().next_location()
    }

    pub fn plan(&self) -> AttackPlan {
        let Some((mut map, attack_point, steps_to_enemy)) = self.compute_my_distance_to_enemy()
        else {
            return AttackPlan::NoTarget;
        };

        let Some(&enemy_id) = self.line_owners.get(&attack_point) else {
            return AttackPlan::NoTarget;
        };
        let Some(enemy) = self.world.enemies.get(enemy_id) else {
            return AttackPlan::NoTarget;
        };

        if let Some(enemy_save_distance) = self.compute_enemy_distance_to_territory(enemy_id) {
            if steps_to_enemy >= enemy_save_distance {
                debug!(enemy_id, steps_to_enemy, enemy_save_distance, "enemy gets home first");
                return AttackPlan::EnemyEscapes {
                    steps_to_enemy,
                    enemy_save_distance,
                };
            }

            if self.world.me.lines.len() >= enemy.lines.len() {
                debug!(enemy_id, "own trail is not shorter, skipping attack");
                return AttackPlan::LongerTrail;
            }
        }

        map.set(self.start_point, 0);
        let Some(path_to_enemy) = Self::compute_path_to(&map, attack_point, self.start_point)
        else {
            return AttackPlan::NoPath;
        };

        if self.world.players_count() == 2 {
            return AttackPlan::Strike {
                enemy_id: enemy_id.to_string(),
                path_to_enemy,
                path_from_enemy: Vec::new(),
            };
        }

        let Some(path_from_enemy) = self.compute_path_from_enemy(attack_point, &path_to_enemy)
        else {
            debug!(enemy_id, "no way home after the attack");
            return AttackPlan::NoReturn;
        };

        let mut full_tail: HashSet<Cell> = self.lines.clone();
        full_tail.extend(path_to_enemy.iter().copied());
        full_tail.extend(path_from_enemy.iter().copied());

        let attack_distance = (path_to_enemy.len() + path_from_enemy.len()) as i32;
        if let Some(steps_to_second_enemy) = self.compute_distance_to_second_enemy(enemy_id, full_tail)
        {
            if steps_to_second_enemy < attack_distance {
                debug!(enemy_id, steps_to_second_enemy, attack_distance, "attack would be intercepted");
                return AttackPlan::Intercepted {
                    steps_to_second_enemy,
                    attack_distance,
                };
            }
        }

        AttackPlan::Strike {
            enemy_id: enemy_id.to_string(),
            path_to_enemy,
            path_from_enemy,
        }
    }

    fn is_valid_location(&self, cell: Cell) -> bool {
        self.world.in_bounds(cell) && !self.lines.contains(&cell)
    }

    fn compute_my_distance_to_enemy(&self) -> Option<(DistanceField, Cell, i32)> {
        let mut map = DistanceField::for_world(self.world);
        let mut queue = VecDeque::from([self.start_point]);

        let mut n_steps = 0;
        while !queue.is_empty() {
            n_steps += 1;

            for _ in 0..queue.len() {
                let Some(point) = queue.pop_front() else {
                    break;
                };

                for neighbor in point.neighbors() {
                    if !self.is_valid_location(neighbor) || map.is_reached(neighbor) {
                        continue;
                    }

                    map.set(neighbor, n_steps);

                    if self.line_owners.contains_key(&neighbor) {
                        return Some((map, neighbor, n_steps));
                    }

                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    fn compute_enemy_distance_to_territory(&self, enemy_id: &str) -> Option<i32> {
        let enemy = self.world.enemies.get(enemy_id)?;
        let start_point = enemy.position;

        if enemy.territory.contains(&start_point) {
            return Some(0);
        }

        let mut visited = enemy.lines_set();
        let mut queue = VecDeque::from([start_point]);
        let mut n_steps = 0;

        while !queue.is_empty() {
            n_steps += 1;

            for _ in 0..queue.len() {
                let Some(point) = queue.pop_front() else {
                    break;
                };

                for neighbor in point.neighbors() {
                    if visited.contains(&neighbor) || !self.world.in_bounds(neighbor) {
                        continue;
                    }

                    if enemy.territory.contains(&neighbor) {
                        return Some(n_steps);
                    }

                    visited.insert(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    fn compute_path_to(map: &DistanceField, to: Cell, from: Cell) -> Option<Vec<Cell>> {
        let descent = map.descend(to, |cell| cell == from)?;
        let mut path: Vec<Cell> = descent.into_iter().rev().skip(1).collect();
        path.push(to);
        Some(path)
    }

    /// Way home from the attack point that does not cross the approach or the
    /// own trail. Starts at the attack point and stops before the territory cell.
    fn compute_path_from_enemy(&self, attack_point: Cell, path_to_enemy: &[Cell]) -> Option<Vec<Cell>> {
        let mut invalid_points: HashSet<Cell> = path_to_enemy.iter().copied().collect();
        invalid_points.extend(self.lines.iter().copied());
        let territory = &self.world.me.territory;

        let mut map = DistanceField::for_world(self.world);
        let mut queue = VecDeque::from([attack_point]);
        let mut final_point = None;
        let mut n_steps = 0;

        'search: while !queue.is_empty() {
            n_steps += 1;

            for _ in 0..queue.len() {
                let Some(point) = queue.pop_front() else {
                    break;
                };

                for neighbor in point.neighbors() {
                    if invalid_points.contains(&neighbor)
                        || !self.world.in_bounds(neighbor)
                        || map.is_reached(neighbor)
                    {
                        continue;
                    }

                    map.set(neighbor, n_steps);

                    if territory.contains(&neighbor) {
                        final_point = Some(neighbor);
                        break 'search;
                    }

                    queue.push_back(neighbor);
                }
            }
        }

        let final_point = final_point?;
        map.set(attack_point, 0);
        let descent = map.descend(final_point, |cell| cell == attack_point)?;
        Some(descent.into_iter().rev().collect())
    }

    fn compute_distance_to_second_enemy(&self, enemy_id: &str, full_tail: HashSet<Cell>) -> Option<i32> {
        let end_points: HashSet<Cell> = self
            .world
            .enemies
            .iter()
            .filter(|(id, _)| id.as_str() != enemy_id)
            .map(|(_, enemy)| enemy.position)
            .collect();

        if end_points.is_empty() {
            return None;
        }

        let mut queue: VecDeque<Cell> = full_tail.iter().copied().collect();
        let mut visited = full_tail;
        let mut n_steps = 0;

        while !queue.is_empty() {
            n_steps += 1;

            for _ in 0..queue.len() {
                let Some(point) = queue.pop_front() else {
                    break;
                };

                for neighbor in point.neighbors() {
                    if visited.contains(&neighbor) || !self.world.in_bounds(neighbor) {
                        continue;
                    }

                    if end_points.contains(&neighbor) {
                        return Some(n_steps);
                    }

                    visited.insert(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }
}
