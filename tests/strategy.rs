use paperbot::sketch::sketch;
use paperbot::*;

fn legal_moves(world: &World, prev_move: Option<Direction>) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&direction| Some(direction.opposite()) != prev_move)
        .filter(|&direction| world.in_bounds(world.me.position.step(direction)))
        .collect()
}

#[test]
fn wanders_inside_home_when_alone() {
    let world = sketch(&["#####", "#####", "##%##", "#####", "#####"]);

    for seed in 0..20 {
        let mut strategy = Strategy::with_seed(seed);
        strategy.set_prev_move(Some(Direction::Up));
        let decision = strategy.play(&world);

        assert_ne!(decision.direction, Direction::Down);
        assert_eq!(decision.tier, Tier::Random);
        assert_eq!(strategy.prev_move(), Some(decision.direction));
    }
}

#[test]
fn same_seed_same_moves() {
    let world = sketch(&[
        "aaa.....",
        "a1......",
        "........",
        "........",
        "...##...",
        "...#%...",
        "........",
    ]);

    let mut first = Strategy::with_seed(42);
    let mut second = Strategy::with_seed(42);
    first.set_prev_move(Some(Direction::Left));
    second.set_prev_move(Some(Direction::Left));

    for _ in 0..5 {
        assert_eq!(first.play(&world), second.play(&world));
    }
}

#[test]
fn attacks_a_reachable_trail() {
    let world = sketch(&[
        "aa.....",
        "aA.....",
        ".A.....",
        ".A.@###",
        ".1..###",
    ]);

    let mut strategy = Strategy::with_seed(1);
    strategy.set_prev_move(Some(Direction::Up));

    assert_eq!(
        strategy.play(&world),
        Decision {
            direction: Direction::Left,
            tier: Tier::Attack,
        }
    );
}

#[test]
fn follows_the_best_loop() {
    let world = sketch(&[
        "........",
        "........",
        "..@.....",
        "..+.....",
        "..####..",
        "..####..",
        "........",
    ]);

    let mut strategy = Strategy::with_seed(1);
    strategy.set_prev_move(Some(Direction::Up));

    assert_eq!(
        strategy.play(&world),
        Decision {
            direction: Direction::Up,
            tier: Tier::Route,
        }
    );
}

#[test]
fn heads_home_without_a_previous_move() {
    let world = sketch(&[".....", "..+@.", "###.."]);

    let mut strategy = Strategy::with_seed(1);

    assert_eq!(
        strategy.play(&world),
        Decision {
            direction: Direction::Down,
            tier: Tier::SafeReturn,
        }
    );
}

#[test]
fn always_answers_with_a_legal_move() {
    let arenas: [&[&str]; 4] = [
        &["%"],
        &["##", "#%"],
        &["+++", "+@+", "+++", "###"],
        &["a1......", "...A....", "...A.#..", "...A@#..", "........"],
    ];

    for arena in arenas {
        let world = sketch(arena);
        for prev_move in [None, Some(Direction::Up), Some(Direction::Right)] {
            let mut strategy = Strategy::with_seed(3);
            strategy.set_prev_move(prev_move);
            let decision = strategy.play(&world);

            let legal = legal_moves(&world, prev_move);
            if legal.is_empty() {
                assert_eq!(decision.tier, Tier::Fallback);
            } else {
                assert!(
                    legal.contains(&decision.direction),
                    "{:?} is not legal in {:?}",
                    decision,
                    arena
                );
            }
        }
    }
}

#[test]
fn leaves_home_towards_the_expansion_target() {
    let world = sketch(&[
        "........1",
        "###......",
        "##%......",
        "###......",
        "........a",
    ]);

    for seed in 0..10 {
        let mut strategy = Strategy::with_seed(seed);
        strategy.set_prev_move(Some(Direction::Right));

        assert_eq!(
            strategy.play(&world),
            Decision {
                direction: Direction::Down,
                tier: Tier::Expansion,
            }
        );
    }
}

#[test]
fn threatened_exit_is_swapped_for_a_safe_move() {
    // the best exit is (3, 2), two steps from the enemy head
    let world = sketch(&[
        ".........",
        "###......",
        "##%..1..a",
        "###......",
        ".........",
    ]);
    let threats = ThreatsMap::new(&world);
    assert!(!threats.is_safe(Cell::new(3, 2)));

    for seed in 0..10 {
        let mut strategy = Strategy::with_seed(seed);
        strategy.set_prev_move(Some(Direction::Right));
        let decision = strategy.play(&world);

        assert_eq!(decision.tier, Tier::Random);
        assert!(threats.is_safe(world.me.position.step(decision.direction)));
        assert!([Direction::Up, Direction::Down].contains(&decision.direction));
    }
}

#[test]
fn all_exits_threatened_keeps_every_legal_move() {
    let world = sketch(&[
        ".......",
        "...1...",
        "..%....",
        ".......",
        "......a",
    ]);
    let threats = ThreatsMap::new(&world);
    let legal = legal_moves(&world, Some(Direction::Right));
    assert!(legal
        .iter()
        .all(|&direction| !threats.is_safe(world.me.position.step(direction))));

    let mut seen = Vec::new();
    for seed in 0..30 {
        let mut strategy = Strategy::with_seed(seed);
        strategy.set_prev_move(Some(Direction::Right));
        let decision = strategy.play(&world);

        assert_eq!(decision.tier, Tier::Random);
        assert!(legal.contains(&decision.direction));
        if !seen.contains(&decision.direction) {
            seen.push(decision.direction);
        }
    }
    assert!(seen.len() > 1);
}

#[test]
fn unreadable_tick_moves_on_from_the_last_snapshot() {
    let world = sketch(&["%...."]);

    let mut strategy = Strategy::with_seed(5);
    strategy.set_prev_move(Some(Direction::Right));
    let decision = strategy.play_blind(Some(&world));

    // the head is at (1, 0) by now; left would fold back, up and down leave the arena
    assert_eq!(
        decision,
        Decision {
            direction: Direction::Right,
            tier: Tier::Fallback,
        }
    );
    assert_eq!(strategy.prev_move(), Some(Direction::Right));
}

#[test]
fn unreadable_first_tick_still_answers() {
    let mut strategy = Strategy::with_seed(5);
    let decision = strategy.play_blind(None);

    assert_eq!(decision.direction, Direction::Left);
    assert_eq!(strategy.prev_move(), Some(Direction::Left));
}
