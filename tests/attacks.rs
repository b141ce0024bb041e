use paperbot::sketch::sketch;
use paperbot::*;

// Enemy `a` is three trail cells away from home, own head is two steps from
// its trail.
const DUEL: [&str; 5] = [
    "aa.....",
    "aA.....",
    ".A.....",
    ".A.@###",
    ".1..###",
];

#[test]
fn cuts_the_trail_in_a_duel() {
    let world = sketch(&DUEL);
    let plan = AttacksMap::new(&world).plan();

    assert_eq!(
        plan,
        AttackPlan::Strike {
            enemy_id: "a".to_string(),
            path_to_enemy: vec![Cell::new(2, 1), Cell::new(1, 1)],
            path_from_enemy: Vec::new(),
        }
    );
    assert_eq!(plan.next_location(), Some(Cell::new(2, 1)));
}

#[test]
fn leaves_an_enemy_that_gets_home_first() {
    let world = sketch(&[
        "aa.....",
        "aA.....",
        "1A.....",
        ".A.@###",
        "....###",
    ]);

    assert_eq!(
        AttacksMap::new(&world).plan(),
        AttackPlan::EnemyEscapes {
            steps_to_enemy: 2,
            enemy_save_distance: 1,
        }
    );
}

#[test]
fn does_not_trade_a_longer_trail() {
    let world = sketch(&[
        "aa.....",
        "aA.+...",
        ".A.+...",
        ".A.@###",
        ".1..###",
    ]);

    assert_eq!(AttacksMap::new(&world).plan(), AttackPlan::LongerTrail);
}

#[test]
fn nothing_to_attack_without_enemy_trails() {
    let world = sketch(&[
        "aa.....",
        "a......",
        "1......",
        "...@###",
        "....###",
    ]);

    assert_eq!(AttacksMap::new(&world).plan(), AttackPlan::NoTarget);
    assert_eq!(AttacksMap::new(&world).next_location(), None);
}

#[test]
fn third_player_close_to_the_tail_intercepts() {
    let world = sketch(&[
        "aa.....",
        "aA.2...",
        ".A.....",
        ".A.@###",
        ".1..###",
    ]);

    assert_eq!(
        AttacksMap::new(&world).plan(),
        AttackPlan::Intercepted {
            steps_to_second_enemy: 2,
            attack_distance: 6,
        }
    );
}

#[test]
fn third_player_far_away_lets_the_attack_through() {
    let world = sketch(&[
        "aa....2",
        "aA.....",
        ".A.....",
        ".A.@###",
        ".1..###",
    ]);

    assert_eq!(
        AttacksMap::new(&world).plan(),
        AttackPlan::Strike {
            enemy_id: "a".to_string(),
            path_to_enemy: vec![Cell::new(2, 1), Cell::new(1, 1)],
            path_from_enemy: vec![
                Cell::new(1, 1),
                Cell::new(1, 0),
                Cell::new(2, 0),
                Cell::new(3, 0),
            ],
        }
    );
}

#[test]
fn steps_onto_an_adjacent_trail_of_a_distant_enemy() {
    let world = sketch(&[
        "a...........",
        "............",
        "#@AAAAAA1...",
    ]);
    let attacks = AttacksMap::new(&world);

    assert_eq!(attacks.next_location(), Some(Cell::new(2, 0)));
    assert_eq!(
        Direction::between(world.me.position, Cell::new(2, 0)),
        Some(Direction::Right)
    );
}

#[test]
fn three_steps_are_too_many_against_two() {
    let world = sketch(&[
        "aa.....",
        "aA1....",
        ".......",
        "..@++##",
    ]);

    assert_eq!(
        AttacksMap::new(&world).plan(),
        AttackPlan::EnemyEscapes {
            steps_to_enemy: 3,
            enemy_save_distance: 2,
        }
    );
}

#[test]
fn duel_strike_skips_the_return_path() {
    let world = sketch(&[
        "a...........",
        "............",
        "##@...AAAAA1",
    ]);

    assert_eq!(
        AttacksMap::new(&world).plan(),
        AttackPlan::Strike {
            enemy_id: "a".to_string(),
            path_to_enemy: vec![
                Cell::new(3, 0),
                Cell::new(4, 0),
                Cell::new(5, 0),
                Cell::new(6, 0),
            ],
            path_from_enemy: Vec::new(),
        }
    );
}
