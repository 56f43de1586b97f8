//! Shared constants, wire codes, and the crate-wide error taxonomy for the
//! tierbots world substrate.
//!
//! Nothing in this crate depends on generation or state-store logic; it only
//! carries the vocabulary every other `tierbots-*` crate shares, sitting
//! underneath both the world generator and the state store.

pub mod config;
pub mod direction;
pub mod entity_kind;
pub mod error;
pub mod grid;
pub mod natural_map;

pub mod prelude {
    pub use crate::config::{DecayRates, Filenames, WorldSize};
    pub use crate::direction::Direction;
    pub use crate::entity_kind::{BotPart, ConstructionType, EntityKind};
    pub use crate::error::ContractError;
    pub use crate::grid::Grid;
    pub use crate::natural_map::NaturalMap;
}
