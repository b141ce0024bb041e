// Arena drawn as rows, top row first. `#` own territory, `+` own trail,
// `@` own head on the trail, `%` own head at home, `a`/`A`/`1` territory,
// trail and head of enemy "a" (likewise b and c), `$` slow bonus.

use std::collections::BTreeMap;

use super::{
    cell::Cell,
    world::{Bonus, BonusKind, GameConfig, PlayerView, World},
};

const ENEMY_IDS: [&str; 3] = ["a", "b", "c"];

fn enemy<'m>(enemies: &'m mut BTreeMap<String, PlayerView>, idx: usize) -> &'m mut PlayerView {
    enemies.entry(ENEMY_IDS[idx].to_string()).or_default()
}

pub fn sketch(rows: &[&str]) -> World {
    let height = rows.len() as i32;
    let width = rows.iter().map(|row| row.len()).max().unwrap_or(0) as i32;

    let mut me = PlayerView::default();
    let mut enemies = BTreeMap::new();
    let mut bonuses = Vec::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let y = height - 1 - row_idx as i32;
        for (x, ch) in row.chars().enumerate() {
            let cell = Cell::new(x as i32, y);
            match ch {
                '#' => {
                    me.territory.insert(cell);
                }
                '+' => me.lines.push(cell),
                '@' => {
                    me.position = cell;
                    me.lines.push(cell);
                }
                '%' => {
                    me.position = cell;
                    me.territory.insert(cell);
                }
                'a'..='c' => {
                    enemy(&mut enemies, ch as usize - 'a' as usize).territory.insert(cell);
                }
                'A'..='C' => enemy(&mut enemies, ch as usize - 'A' as usize).lines.push(cell),
                '1'..='3' => enemy(&mut enemies, ch as usize - '1' as usize).position = cell,
                '$' => bonuses.push(Bonus {
                    kind: BonusKind::Slow,
                    position: cell,
                }),
                _ => {}
            }
        }
    }

    World {
        config: GameConfig {
            x_cells_count: width,
            y_cells_count: height,
            ..GameConfig::default()
        },
        me,
        enemies,
        bonuses,
        tick_num: 0,
    }
}
