use std::collections::{HashSet, VecDeque};

use super::{
    bounds::Bounds,
    cell::{Cell, Direction},
    maps::DistanceField,
    world::{BonusKind, World},
};

pub type Route = Vec<Cell>;

const ENEMY_TERRITORY_POINTS: i32 = 5;
const EMPTY_POINTS: i32 = 1;
const MAX_SWITCHES: u8 = 2;

#[derive(Debug, Clone, Copy)]
struct Branch {
    cell: Cell,
    direction: Direction,
    switches: u8,
    steps: i32,
    min_budget: i32,
    delta: i32,
}

pub struct RoutesMaker<'a> {
    world: &'a World,
    prev_move: Direction,
    curr_position: Cell,
    budget: DistanceField,
    lines: HashSet<Cell>,
    x_set: HashSet<i32>,
    y_set: HashSet<i32>,
    slows: HashSet<Cell>,
    enemy_territory: HashSet<Cell>,
    base_bounds: Option<Bounds>,
}

impl<'a> RoutesMaker<'a> {
    pub fn new(world: &'a World, prev_move: Direction) -> Self {
        let me = &world.me;
        let lines = me.lines_set();

        let x_set = me.territory.iter().map(|cell| cell.x).collect();
        let y_set = me.territory.iter().map(|cell| cell.y).collect();
        let base_bounds = Bounds::around(me.territory.iter().chain(lines.iter()));

        let mut routes = RoutesMaker {
            world,
            prev_move,
            curr_position: me.position,
            budget: DistanceField::for_world(world),
            lines,
            x_set,
            y_set,
            slows: world.slow_bonuses(),
            enemy_territory: world.enemy_territory(),
            base_bounds,
        };
        routes.fill_budget();
        routes
    }

    /// Steps each cell can afford: the match clock, or how soon an enemy gets there.
    fn fill_budget(&mut self) {
        let config = &self.world.config;
        let remaining_ticks = self.world.remaining_ticks();

        if !self.world.has_enemies() {
            self.budget = DistanceField::filled(
                config.x_cells_count,
                config.y_cells_count,
                Some(remaining_ticks),
            );
            return;
        }

        let enemy_points = self.world.enemy_positions();
        for &point in &enemy_points {
            self.budget.set(point, 0);
        }

        let mut queue: VecDeque<Cell> = enemy_points.into_iter().collect();
        let mut step_num = 0;

        while !queue.is_empty() {
            step_num += 1;
            let value = step_num.min(remaining_ticks);

            for _ in 0..queue.len() {
                let Some(point) = queue.pop_front() else {
                    break;
                };

                for neighbor in point.neighbors() {
                    if !self.world.in_bounds(neighbor) {
                        continue;
                    }

                    match self.budget.get(neighbor) {
                        Some(current) if current <= value => {}
                        _ => {
                            self.budget.set(neighbor, value);
                            queue.push_back(neighbor);
                        }
                    }
                }
            }
        }
    }

    pub fn budget(&self) -> &DistanceField {
        &self.budget
    }

    /// Every loop that starts at the current position, heads straight or to a
    /// side, turns at most twice and ends inside own territory.
    pub fn find_routes(&self) -> Vec<Route> {
        let min_budget = self
            .lines
            .iter()
            .map(|&cell| self.budget.get(cell).unwrap_or(0))
            .min()
            .unwrap_or(i32::MAX);

        let delta = if self.world.me.has_bonus(BonusKind::Slow) {
            2
        } else {
            1
        };

        let [side1, side2] = self.prev_move.sides();
        let mut routes = Vec::new();

        for direction in [self.prev_move, side1, side2] {
            let branch = Branch {
                cell: self.curr_position,
                direction,
                switches: 0,
                steps: 0,
                min_budget,
                delta,
            };
            self.walk(branch, &[], &mut routes);
        }

        routes
    }

    fn blocked(&self, cell: Cell) -> bool {
        !self.world.in_bounds(cell) || (cell != self.curr_position && self.lines.contains(&cell))
    }

    fn walk(&self, branch: Branch, prefix: &[Cell], routes: &mut Vec<Route>) {
        let Branch {
            mut cell,
            direction,
            switches,
            mut steps,
            mut min_budget,
            mut delta,
        } = branch;

        // the closing leg has to run along a row or column of own territory
        if switches == MAX_SWITCHES && !self.x_set.contains(&cell.x) && !self.y_set.contains(&cell.y)
        {
            return;
        }

        let mut path = prefix.to_vec();
        path.push(cell);

        loop {
            if self.blocked(cell) {
                break;
            }

            min_budget = min_budget.min(self.budget.get(cell).unwrap_or(0));
            if min_budget - steps < 1 {
                break;
            }

            if self.world.me.territory.contains(&cell) {
                routes.push(path);
                return;
            }

            if switches < MAX_SWITCHES {
                for side in direction.sides() {
                    let turn = Branch {
                        cell: cell.step(side),
                        direction: side,
                        switches: switches + 1,
                        steps: steps + delta,
                        min_budget,
                        delta,
                    };
                    self.walk(turn, &path, routes);
                }
            }

            cell = cell.step(direction);
            if self.slows.contains(&cell) {
                delta = 2;
            }

            path.push(cell);
            steps += delta;
        }
    }

    pub fn estimate_routes(&self, routes: &[Route]) -> Vec<i32> {
        routes.iter().map(|route| self.estimate_route(route)).collect()
    }

    fn estimate_route(&self, route: &[Cell]) -> i32 {
        let route_set: HashSet<Cell> = route.iter().copied().collect();

        let mut bounds = Bounds::around(route);
        if let (Some(rect), Some(base)) = (bounds.as_mut(), self.base_bounds) {
            *rect = rect.union(&base);
        }
        let Some(mut bounds) = bounds else {
            return 0;
        };
        bounds.extend(1);

        let mut visited = HashSet::new();
        let mut estimation = 0;

        for cell in bounds.interior() {
            if visited.contains(&cell) || self.is_occupied(cell, &route_set) {
                continue;
            }

            estimation += self.filling_bfs(cell, &bounds, &mut visited, &route_set);
        }

        estimation
    }

    fn is_occupied(&self, cell: Cell, route: &HashSet<Cell>) -> bool {
        self.world.me.territory.contains(&cell) || self.lines.contains(&cell) || route.contains(&cell)
    }

    fn points(&self, cell: Cell) -> i32 {
        if self.enemy_territory.contains(&cell) {
            ENEMY_TERRITORY_POINTS
        } else {
            EMPTY_POINTS
        }
    }

    fn filling_bfs(
        &self,
        position: Cell,
        bounds: &Bounds,
        visited: &mut HashSet<Cell>,
        route: &HashSet<Cell>,
    ) -> i32 {
        let mut queue = VecDeque::from([position]);
        visited.insert(position);

        let mut game_points = self.points(position);
        let mut is_surrounded = true;

        while let Some(current) = queue.pop_front() {
            for neighbor in current.neighbors() {
                if visited.contains(&neighbor) {
                    continue;
                }

                if !bounds.strictly_contains(neighbor) {
                    is_surrounded = false;
                    continue;
                }

                if self.is_occupied(neighbor, route) {
                    continue;
                }

                visited.insert(neighbor);
                game_points += self.points(neighbor);
                queue.push_back(neighbor);
            }
        }

        if is_surrounded {
            game_points
        } else {
            0
        }
    }

    pub fn choose_best_route<'r>(estimations: &[i32], routes: &'r [Route]) -> Option<&'r Route> {
        let best_idx = argmax(estimations.iter().copied())?;

        if estimations[best_idx] == 0 {
            let longest_idx = argmax(routes.iter().map(|route| route.len()))?;
            routes.get(longest_idx)
        } else {
            routes.get(best_idx)
        }
    }

    pub fn get_next_step(&self) -> Option<Cell> {
        let routes = self.find_routes();
        let estimations = self.estimate_routes(&routes);
        let route = Self::choose_best_route(&estimations, &routes)?;
        route.get(1).copied()
    }
}

fn argmax<T: Ord>(values: impl Iterator<Item = T>) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (idx, value) in values.enumerate() {
        match &best {
            Some((_, current)) if *current >= value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::super::sketch::sketch;
    use super::*;

    const LOOP_ARENA: [&str; 7] = [
        "........",
        "........",
        "..@.....",
        "..+.....",
        "..####..",
        "..####..",
        "........",
    ];

    #[test]
    fn every_route_starts_here_and_ends_home() {
        let world = sketch(&LOOP_ARENA);
        let maker = RoutesMaker::new(&world, Direction::Up);
        let routes = maker.find_routes();

        assert_eq!(routes.len(), 20);
        for route in &routes {
            assert_eq!(route[0], world.me.position);
            assert!(world.me.territory.contains(route.last().unwrap()));
        }
    }

    #[test]
    fn prefers_the_loop_enclosing_most_area() {
        let world = sketch(&LOOP_ARENA);
        let maker = RoutesMaker::new(&world, Direction::Up);
        let routes = maker.find_routes();
        let estimations = maker.estimate_routes(&routes);

        assert_eq!(estimations.iter().max(), Some(&6));
        assert_eq!(maker.get_next_step(), Some(Cell::new(2, 5)));
    }

    #[test]
    fn falls_back_to_the_longest_route_near_an_enemy() {
        let world = sketch(&[
            "1.......",
            "........",
            "..@.....",
            "..+.....",
            "..####..",
            "..####..",
            "........",
        ]);
        let maker = RoutesMaker::new(&world, Direction::Up);
        let routes = maker.find_routes();

        assert_eq!(routes.len(), 2);
        assert!(maker.estimate_routes(&routes).iter().all(|&score| score == 0));
        assert_eq!(maker.get_next_step(), Some(Cell::new(3, 4)));
    }

    #[test]
    fn leaking_blob_scores_nothing() {
        let route = vec![
            Cell::new(1, 2),
            Cell::new(2, 2),
            Cell::new(2, 1),
            Cell::new(2, 0),
            Cell::new(1, 0),
            Cell::new(0, 0),
        ];

        let open = sketch(&[".@..", "....", "#..."]);
        let maker = RoutesMaker::new(&open, Direction::Right);
        assert_eq!(maker.estimate_routes(&[route.clone()]), vec![0]);

        let closed = sketch(&["#@..", "#...", "#..."]);
        let maker = RoutesMaker::new(&closed, Direction::Right);
        assert_eq!(maker.estimate_routes(&[route]), vec![1]);
    }

    #[test]
    fn enemy_territory_is_worth_more() {
        let route = vec![
            Cell::new(1, 2),
            Cell::new(2, 2),
            Cell::new(2, 1),
            Cell::new(2, 0),
            Cell::new(1, 0),
            Cell::new(0, 0),
        ];
        let world = sketch(&["#@..", "#a..", "#..1"]);
        let maker = RoutesMaker::new(&world, Direction::Right);

        assert_eq!(maker.estimate_routes(&[route]), vec![5]);
    }

    #[test]
    fn budget_is_enemy_distance_capped_by_the_clock() {
        let mut world = sketch(&["1........#"]);
        world.tick_num = 2480;
        let maker = RoutesMaker::new(&world, Direction::Right);

        assert_eq!(maker.budget().get(Cell::new(0, 0)), Some(0));
        assert_eq!(maker.budget().get(Cell::new(1, 0)), Some(1));
        assert_eq!(maker.budget().get(Cell::new(8, 0)), Some(3));
    }

    // (2500 - 2455) / 5 - 1 = 8 moves left on the clock
    const LATE_TICK: i32 = 2455;

    #[test]
    fn slow_bonus_on_the_way_costs_routes() {
        let mut clear = sketch(&LOOP_ARENA);
        clear.tick_num = LATE_TICK;

        let mut slowed = sketch(&[
            "........",
            "..$.....",
            "..@.....",
            "..+.....",
            "..####..",
            "..####..",
            "........",
        ]);
        slowed.tick_num = LATE_TICK;

        let clear_routes = RoutesMaker::new(&clear, Direction::Up).find_routes();
        let slowed_routes = RoutesMaker::new(&slowed, Direction::Up).find_routes();

        assert_eq!(clear_routes.len(), 15);
        assert_eq!(slowed_routes.len(), 11);
    }

    #[test]
    fn held_slow_bonus_doubles_every_step() {
        let mut world = sketch(&LOOP_ARENA);
        world.tick_num = LATE_TICK;
        world.me.bonuses.insert(BonusKind::Slow);

        let routes = RoutesMaker::new(&world, Direction::Up).find_routes();
        assert_eq!(routes.len(), 2);
    }
}
