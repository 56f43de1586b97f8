//! The tick-indexed decayable state store: grid arrays, decay arrays, the
//! entity table, the position index, and the player table.
//!
//! A `ServerState` is built once per world, either from freshly generated
//! terrain (`ServerState::from_generated`, fed by `tierbots-worldgen`) or by
//! loading a previously saved world (`tierbots-persistence::load`), and then
//! driven one `advance_tick()` call per simulation tick.

pub mod entity;
pub mod player;
pub mod store;

pub mod prelude {
    pub use crate::entity::{EntityData, EntityRecord};
    pub use crate::player::PlayerSlot;
    pub use crate::store::ServerState;
}
