//! The structured, language-neutral blob persisted alongside the grid
//! arrays: world size, max players, tick counter, entity table, and player
//! table. Encoded with `serde`/`bincode`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tierbots_common::entity_kind::EntityId;
use tierbots_state::entity::EntityRecord;
use tierbots_state::player::PlayerSlot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedBlob {
    pub size: (u32, u32),
    pub maxplayers: usize,
    /// Always `0` on disk: the tick counter
    /// never survives a restart, so there is nothing meaningful to persist
    /// here beyond the tick-origin marker `load` rebases durations against.
    pub time: u32,
    pub entities: Vec<EntityRecord>,
    pub players: Vec<Option<PlayerSlot>>,
}

impl PersistedBlob {
    pub fn entities_by_id(self) -> HashMap<EntityId, EntityRecord> {
        self.entities.into_iter().map(|e| (e.id, e)).collect()
    }
}
