pub use self::{config::*, core::*, engine::*};

pub mod config;
pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding at the requested position")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("hold already used for this piece")]
pub struct HoldAlreadyUsedError;
