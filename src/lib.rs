pub mod attacks;
pub mod bounds;
pub mod cell;
pub mod error;
pub mod expansion;
pub mod maps;
pub mod protocol;
pub mod routes;
pub mod saves;
pub mod sketch;
pub mod strategy;
pub mod world;

pub use attacks::*;
pub use bounds::*;
pub use cell::*;
pub use error::*;
pub use expansion::*;
pub use maps::*;
pub use protocol::*;
pub use routes::*;
pub use saves::*;
pub use strategy::*;
pub use world::*;
