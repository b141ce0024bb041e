extern crate paperbot;

use std::collections::{BTreeMap, HashSet};

use paperbot::*;

use flo_canvas::*;
use flo_draw::*;

use futures::executor;
use futures::prelude::*;

use rand::seq::SliceRandom;
use rand::Rng;

const ARENA_CELLS: i32 = 31;
const CANVAS_SIZE: f32 = 1000.;
const CELL_PX: f32 = CANVAS_SIZE / ARENA_CELLS as f32;

struct SimWorld {
    world: World,
    prev_move: Option<Direction>,
}

fn random_territory(rng: &mut impl Rng, occupied: &HashSet<Cell>) -> HashSet<Cell> {
    for _ in 0..100 {
        let w = rng.gen_range(3..6);
        let h = rng.gen_range(3..6);
        let x = rng.gen_range(0..ARENA_CELLS - w);
        let y = rng.gen_range(0..ARENA_CELLS - h);

        let territory: HashSet<Cell> = (x..x + w)
            .flat_map(|cx| (y..y + h).map(move |cy| Cell::new(cx, cy)))
            .collect();

        if territory.is_disjoint(occupied) {
            return territory;
        }
    }

    HashSet::new()
}

fn random_trail(
    rng: &mut impl Rng,
    config: &GameConfig,
    territory: &HashSet<Cell>,
    occupied: &HashSet<Cell>,
    len: usize,
) -> (Vec<Cell>, Option<Direction>) {
    let mut exits = Vec::new();
    for &cell in territory {
        for direction in Direction::ALL {
            let next = cell.step(direction);
            if config.in_bounds(next) && !territory.contains(&next) && !occupied.contains(&next) {
                exits.push((next, direction));
            }
        }
    }
    exits.sort_by_key(|&(cell, _)| cell);

    let Some(&(start, mut direction)) = exits.choose(rng) else {
        return (Vec::new(), None);
    };

    let mut trail = vec![start];
    for _ in 1..len {
        let head = trail[trail.len() - 1];
        let mut options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&d| d != direction.opposite())
            .filter(|&d| {
                let next = head.step(d);
                config.in_bounds(next)
                    && !trail.contains(&next)
                    && !territory.contains(&next)
                    && !occupied.contains(&next)
            })
            .collect();

        if options.is_empty() {
            break;
        }

        if options.contains(&direction) && rng.gen_bool(0.6) {
            options = vec![direction];
        }

        direction = *options.choose(rng).unwrap_or(&direction);
        trail.push(head.step(direction));
    }

    (trail, Some(direction))
}

impl SimWorld {
    fn gen_random_world() -> Self {
        let mut rng = rand::thread_rng();
        let config = GameConfig {
            x_cells_count: ARENA_CELLS,
            y_cells_count: ARENA_CELLS,
            ..GameConfig::default()
        };

        let mut occupied = HashSet::new();

        let territory = random_territory(&mut rng, &occupied);
        occupied.extend(territory.iter().copied());
        let trail_len = rng.gen_range(0..12);
        let (lines, prev_move) = random_trail(&mut rng, &config, &territory, &occupied, trail_len);
        occupied.extend(lines.iter().copied());

        let position = match lines.last() {
            Some(&head) => head,
            None => territory.iter().min().copied().unwrap_or_default(),
        };

        let me = PlayerView {
            position,
            territory,
            lines,
            bonuses: HashSet::new(),
        };

        let mut enemies = BTreeMap::new();
        for id in 0..rng.gen_range(1..4) {
            let territory = random_territory(&mut rng, &occupied);
            occupied.extend(territory.iter().copied());
            let trail_len = rng.gen_range(0..15);
            let (lines, _) = random_trail(&mut rng, &config, &territory, &occupied, trail_len);
            occupied.extend(lines.iter().copied());

            let position = match lines.last() {
                Some(&head) => head,
                None => territory.iter().max().copied().unwrap_or_default(),
            };

            enemies.insert(
                format!("{}", id + 1),
                PlayerView {
                    position,
                    territory,
                    lines,
                    bonuses: HashSet::new(),
                },
            );
        }

        let bonuses = (0..rng.gen_range(0..3))
            .map(|_| Bonus {
                kind: BonusKind::Slow,
                position: Cell::new(rng.gen_range(0..ARENA_CELLS), rng.gen_range(0..ARENA_CELLS)),
            })
            .collect();

        SimWorld {
            world: World {
                config,
                me,
                enemies,
                bonuses,
                tick_num: rng.gen_range(0..2000),
            },
            prev_move,
        }
    }
}

fn fill_cell(gc: &mut CanvasGraphicsContext, cell: Cell, col: Color) {
    gc.new_path();
    gc.rect(
        cell.x as f32 * CELL_PX,
        cell.y as f32 * CELL_PX,
        (cell.x + 1) as f32 * CELL_PX,
        (cell.y + 1) as f32 * CELL_PX,
    );
    gc.fill_color(col);
    gc.fill();
}

fn draw_circle_at_cell(gc: &mut CanvasGraphicsContext, cell: Cell, col: Color) {
    gc.new_path();

    gc.circle(
        (cell.x as f32 + 0.5) * CELL_PX,
        (cell.y as f32 + 0.5) * CELL_PX,
        CELL_PX * 0.4,
    );

    gc.fill_color(col);

    gc.fill();
    gc.line_width(1.0);
    gc.stroke_color(Color::Rgba(0.0, 0.0, 0.0, 1.0));
    gc.stroke();
}

fn draw_path(gc: &mut CanvasGraphicsContext, from: Cell, path: &[Cell], col: Color, width: f32) {
    gc.new_path();
    gc.move_to(
        (from.x as f32 + 0.5) * CELL_PX,
        (from.y as f32 + 0.5) * CELL_PX,
    );

    for cell in path {
        gc.line_to(
            (cell.x as f32 + 0.5) * CELL_PX,
            (cell.y as f32 + 0.5) * CELL_PX,
        );
    }

    gc.line_width(width);
    gc.stroke_color(col);
    gc.stroke();
}

fn draw_lines(gc: &mut CanvasGraphicsContext) {
    for i in 0..=ARENA_CELLS {
        let offset = i as f32 * CELL_PX;

        gc.new_path();
        gc.move_to(0., offset);
        gc.line_to(CANVAS_SIZE, offset);
        gc.move_to(offset, 0.);
        gc.line_to(offset, CANVAS_SIZE);

        gc.line_width(1.0);
        gc.stroke_color(Color::Rgba(0.0, 0.0, 0.0, 0.1));
        gc.stroke();
    }
}

const ENEMY_COLORS: [(f32, f32, f32); 3] = [(0.9, 0.2, 0.2), (0.9, 0.6, 0.1), (0.6, 0.2, 0.8)];

fn draw_world(gc: &mut CanvasGraphicsContext, world: &World) {
    for &cell in &world.me.territory {
        fill_cell(gc, cell, Color::Rgba(0.2, 0.4, 0.9, 0.5));
    }
    for &cell in &world.me.lines {
        fill_cell(gc, cell, Color::Rgba(0.2, 0.4, 0.9, 0.25));
    }

    for (i, enemy) in world.enemies.values().enumerate() {
        let (r, g, b) = ENEMY_COLORS[i % ENEMY_COLORS.len()];
        for &cell in &enemy.territory {
            fill_cell(gc, cell, Color::Rgba(r, g, b, 0.5));
        }
        for &cell in &enemy.lines {
            fill_cell(gc, cell, Color::Rgba(r, g, b, 0.25));
        }
        draw_circle_at_cell(gc, enemy.position, Color::Rgba(r, g, b, 1.));
    }

    for bonus in &world.bonuses {
        draw_circle_at_cell(gc, bonus.position, Color::Rgba(0.5, 0.5, 0.5, 0.6));
    }

    draw_circle_at_cell(gc, world.me.position, Color::Rgba(0.2, 0.4, 0.9, 1.));
}

fn draw_threats(gc: &mut CanvasGraphicsContext, world: &World) {
    let threats = ThreatsMap::new(world);

    for x in 0..ARENA_CELLS {
        for y in 0..ARENA_CELLS {
            let cell = Cell::new(x, y);
            if !threats.is_safe(cell) {
                fill_cell(gc, cell, Color::Rgba(1., 0., 0., 0.2));
            }
        }
    }
}

fn draw_routes(gc: &mut CanvasGraphicsContext, world: &World, prev_move: Option<Direction>) {
    let Some(prev_move) = prev_move else {
        return;
    };
    if world.me.in_territory() {
        return;
    }

    let maker = RoutesMaker::new(world, prev_move);
    let routes = maker.find_routes();
    let estimations = maker.estimate_routes(&routes);
    let best = RoutesMaker::choose_best_route(&estimations, &routes);

    for route in &routes {
        draw_path(gc, route[0], &route[1..], Color::Rgba(0.0, 0.6, 0.0, 0.1), 1.0);
    }

    if let Some(route) = best {
        draw_path(gc, route[0], &route[1..], Color::Rgba(0.0, 0.6, 0.0, 1.0), 3.0);
    }
}

fn draw_return_path(gc: &mut CanvasGraphicsContext, world: &World) {
    let saves = SavesMap::new(world);
    let path = saves.path_to_territory();
    draw_path(gc, world.me.position, &path, Color::Rgba(0.0, 0.0, 0.0, 0.8), 2.0);
}

struct App {
    sim_world: SimWorld,
    decision: Decision,
    canvas: Canvas,

    draw_threats: bool,
    draw_routes: bool,
    draw_return_path: bool,
}

impl App {
    fn new(canvas: Canvas) -> Self {
        let sim_world = SimWorld::gen_random_world();
        let decision = Self::decide(&sim_world);

        App {
            sim_world,
            decision,
            canvas,
            draw_threats: false,
            draw_routes: false,
            draw_return_path: false,
        }
    }

    fn decide(sim_world: &SimWorld) -> Decision {
        let mut strategy = Strategy::with_seed(rand::thread_rng().gen());
        strategy.set_prev_move(sim_world.prev_move);
        strategy.play(&sim_world.world)
    }

    fn redraw(&mut self) {
        let world = &self.sim_world.world;
        let prev_move = self.sim_world.prev_move;
        let decision = self.decision;
        let (show_threats, show_routes, show_return_path) =
            (self.draw_threats, self.draw_routes, self.draw_return_path);

        self.canvas.draw(|gc| {
            gc.clear_all_layers();
            gc.canvas_height(CANVAS_SIZE);
            gc.center_region(0.0, 0.0, CANVAS_SIZE, CANVAS_SIZE);

            draw_lines(gc);
            draw_world(gc, world);

            if show_threats {
                draw_threats(gc, world);
            }

            if show_routes {
                draw_routes(gc, world, prev_move);
            }

            if show_return_path {
                draw_return_path(gc, world);
            }

            let next = world.me.position.step(decision.direction);
            draw_path(gc, world.me.position, &[next], Color::Rgba(1.0, 0.0, 1.0, 1.0), 4.0);
        });

        println!("{:?} via {}", decision.direction, decision.tier);
    }

    fn regenerate_map(&mut self) {
        self.sim_world = SimWorld::gen_random_world();
        self.decision = Self::decide(&self.sim_world);

        self.redraw();
    }
}

fn main() {
    with_2d_graphics(|| {
        executor::block_on(async {
            let (canvas, mut events) = create_canvas_window_with_events("PAPERBOT");

            let mut app = App::new(canvas);

            app.redraw();

            while let Some(event) = events.next().await {
                match event {
                    DrawEvent::KeyDown(_, Some(Key::KeySpace)) => {
                        app.regenerate_map();
                    }
                    DrawEvent::KeyDown(_, Some(Key::KeyEscape)) => {
                        std::process::exit(0);
                    }
                    DrawEvent::KeyDown(_, Some(Key::Key1)) => {
                        app.draw_threats = !app.draw_threats;
                        app.redraw();
                    }
                    DrawEvent::KeyDown(_, Some(Key::Key2)) => {
                        app.draw_routes = !app.draw_routes;
                        app.redraw();
                    }
                    DrawEvent::KeyDown(_, Some(Key::Key3)) => {
                        app.draw_return_path = !app.draw_return_path;
                        app.redraw();
                    }
                    _ => {}
                }
            }
        });
    });
}
