//! The fixed-length player table.

use serde::{Deserialize, Serialize};

/// A registered player. `map_offset` stays `None` until the player's first
/// connection activates them, not at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub name: String,
    pub credential_material: String,
    pub map_offset: Option<(u32, u32)>,
}

impl PlayerSlot {
    pub fn new(name: String, credential_material: String) -> Self {
        PlayerSlot {
            name,
            credential_material,
            map_offset: None,
        }
    }
}
