use std::fmt;

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Attack,
    Expansion,
    Route,
    SafeReturn,
    Arbitrary,
    Random,
    Fallback,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack => write!(f, "attack"),
            Self::Expansion => write!(f, "expansion"),
            Self::Route => write!(f, "route"),
            Self::SafeReturn => write!(f, "return"),
            Self::Arbitrary => write!(f, "arbitrary"),
            Self::Random => write!(f, "random"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub tier: Tier,
}

struct TickContext<'a> {
    world: &'a World,
    position: Cell,
    prev_move: Option<Direction>,
    moves: Vec<Direction>,
}

impl<'a> TickContext<'a> {
    fn new(world: &'a World, prev_move: Option<Direction>) -> Self {
        Self::at(world, world.me.position, prev_move)
    }

    fn at(world: &'a World, position: Cell, prev_move: Option<Direction>) -> Self {
        let invalid_move = prev_move.map(Direction::opposite);
        let moves = Direction::ALL
            .into_iter()
            .filter(|&direction| {
                Some(direction) != invalid_move && world.in_bounds(position.step(direction))
            })
            .collect();

        TickContext {
            world,
            position,
            prev_move,
            moves,
        }
    }

    fn command_to(&self, next: Cell) -> Option<Direction> {
        Direction::between(self.position, next)
    }

    fn prev_location(&self) -> Option<Cell> {
        self.prev_move
            .map(|direction| self.position.step(direction.opposite()))
    }
}

pub struct Strategy {
    prev_move: Option<Direction>,
    rng: ChaCha8Rng,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy {
    pub fn new() -> Self {
        Strategy {
            prev_move: None,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Strategy {
            prev_move: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn prev_move(&self) -> Option<Direction> {
        self.prev_move
    }

    pub fn set_prev_move(&mut self, prev_move: Option<Direction>) {
        self.prev_move = prev_move;
    }

    pub fn play(&mut self, world: &World) -> Decision {
        let ctx = TickContext::new(world, self.prev_move);

        let decision = if world.me.in_territory() {
            self.play_inside(&ctx)
        } else {
            self.play_outside(&ctx)
        };

        debug!(
            tick = world.tick_num,
            tier = %decision.tier,
            direction = decision.direction.as_str(),
            "decision"
        );

        self.prev_move = Some(decision.direction);
        decision
    }

    /// Move for a tick whose snapshot could not be read. The head is assumed to
    /// be one step further along `prev_move` than in `last_world`.
    pub fn play_blind(&mut self, last_world: Option<&World>) -> Decision {
        let decision = match last_world {
            Some(world) => {
                let position = self
                    .prev_move
                    .map(|direction| world.me.position.step(direction))
                    .filter(|&cell| world.in_bounds(cell))
                    .unwrap_or(world.me.position);
                let ctx = TickContext::at(world, position, self.prev_move);

                match ctx.moves.choose(&mut self.rng) {
                    Some(&direction) => Decision {
                        direction,
                        tier: Tier::Fallback,
                    },
                    None => self.fallback(&ctx),
                }
            }
            None => Decision {
                direction: self.prev_move.unwrap_or(Direction::Left),
                tier: Tier::Fallback,
            },
        };

        self.prev_move = Some(decision.direction);
        decision
    }

    fn attack_attempt(&self, ctx: &TickContext) -> Option<Direction> {
        if !ctx.world.has_enemies() {
            return None;
        }

        let next_point = AttacksMap::new(ctx.world).next_location()?;
        ctx.command_to(next_point)
    }

    fn play_inside(&mut self, ctx: &TickContext) -> Decision {
        if let Some(direction) = self.attack_attempt(ctx) {
            return Decision {
                direction,
                tier: Tier::Attack,
            };
        }

        let mut moves = ctx.moves.clone();

        if ctx.world.has_enemies() {
            let movements = TerritoryMovementsMap::new(ctx.world, ctx.prev_location());

            if let Some(next_point) = movements.next_point(&mut self.rng) {
                let threats = ThreatsMap::new(ctx.world);

                if threats.is_safe(next_point) {
                    if let Some(direction) = ctx.command_to(next_point) {
                        return Decision {
                            direction,
                            tier: Tier::Expansion,
                        };
                    }
                } else {
                    debug!(?next_point, "exit cell is threatened");
                    let safe_moves: Vec<Direction> = moves
                        .iter()
                        .copied()
                        .filter(|&direction| threats.is_safe(ctx.position.step(direction)))
                        .collect();
                    if !safe_moves.is_empty() {
                        moves = safe_moves;
                    }
                }
            }
        }

        match moves.choose(&mut self.rng) {
            Some(&direction) => Decision {
                direction,
                tier: Tier::Random,
            },
            None => self.fallback(ctx),
        }
    }

    fn play_outside(&mut self, ctx: &TickContext) -> Decision {
        if let Some(direction) = self.attack_attempt(ctx) {
            return Decision {
                direction,
                tier: Tier::Attack,
            };
        }

        if let Some(prev_move) = ctx.prev_move {
            let next_location = RoutesMaker::new(ctx.world, prev_move).get_next_step();
            if let Some(direction) = next_location.and_then(|next| ctx.command_to(next)) {
                if ctx.moves.contains(&direction) {
                    return Decision {
                        direction,
                        tier: Tier::Route,
                    };
                }
            }
        }

        let saves = SavesMap::new(ctx.world);
        let path_to_territory = saves.path_to_territory();
        if let Some(direction) = path_to_territory
            .first()
            .and_then(|&next| ctx.command_to(next))
        {
            return Decision {
                direction,
                tier: Tier::SafeReturn,
            };
        }

        self.choose_arbitrary_move(ctx, &saves)
    }

    fn choose_arbitrary_move(&mut self, ctx: &TickContext, saves: &SavesMap) -> Decision {
        let with_way_back: Vec<Direction> = ctx
            .moves
            .iter()
            .copied()
            .filter(|&direction| {
                saves
                    .distance_from_point_to_territory(ctx.position.step(direction))
                    .is_some()
            })
            .collect();

        if let Some(&direction) = with_way_back.choose(&mut self.rng) {
            return Decision {
                direction,
                tier: Tier::Arbitrary,
            };
        }

        match ctx.moves.choose(&mut self.rng) {
            Some(&direction) => Decision {
                direction,
                tier: Tier::Random,
            },
            None => self.fallback(ctx),
        }
    }

    fn fallback(&mut self, ctx: &TickContext) -> Decision {
        let in_bounds: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&direction| ctx.world.in_bounds(ctx.position.step(direction)))
            .collect();

        let direction = in_bounds
            .choose(&mut self.rng)
            .copied()
            .or(ctx.prev_move)
            .unwrap_or(Direction::Left);

        Decision {
            direction,
            tier: Tier::Fallback,
        }
    }
}
