//! Entity records: a tagged union with a common positional header, keeping
//! each kind's properties behind a typed variant instead of a loose
//! attribute bag.

use serde::{Deserialize, Serialize};

use tierbots_common::entity_kind::{BotPart, ConstructionType, EntityId, EntityKind};
use tierbots_common::error::ContractError;

/// Type-specific payload for one entity. The common `id`, `x`, `y` header
/// lives on [`EntityRecord`], never inside a variant, so `change_entity_prop`
/// can reject writes to position uniformly regardless of kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityData {
    Source {
        energy: u32,
    },
    Bot {
        owner_player_id: usize,
        hp: u32,
        parts: Vec<BotPart>,
        /// Energy currently carried, distinct from the capacity its parts
        /// confer at the current hp (`tierbots-api::BotLoadout`).
        energy: u32,
    },
    ConstructionSite {
        owner_player_id: usize,
        target: ConstructionType,
        progress: u32,
    },
    Spawner {
        owner_player_id: usize,
        energy: u32,
    },
    Extension {
        owner_player_id: usize,
        energy: u32,
    },
    Radar {
        owner_player_id: usize,
    },
}

impl EntityData {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityData::Source { .. } => EntityKind::Source,
            EntityData::Bot { .. } => EntityKind::Bot,
            EntityData::ConstructionSite { .. } => EntityKind::ConstructionSite,
            EntityData::Spawner { .. } => EntityKind::Spawner,
            EntityData::Extension { .. } => EntityKind::Extension,
            EntityData::Radar { .. } => EntityKind::Radar,
        }
    }

    /// Writes a named property, rejecting keys the variant doesn't carry.
    /// `x`/`y` are never valid here — callers must reject them before
    /// reaching this point (see [`super::store::ServerState::change_entity_prop`]).
    pub fn set_property(
        &mut self,
        id: EntityId,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), ContractError> {
        let unknown = || ContractError::UnknownProperty {
            entity: id,
            kind: self.kind().name(),
            key: key.to_string(),
        };
        match self {
            EntityData::Source { energy } => match key {
                "energy" => *energy = value.as_u64().ok_or_else(unknown)? as u32,
                _ => return Err(unknown()),
            },
            EntityData::Bot {
                owner_player_id,
                hp,
                parts,
                energy,
            } => match key {
                "hp" => *hp = value.as_u64().ok_or_else(unknown)? as u32,
                "energy" => *energy = value.as_u64().ok_or_else(unknown)? as u32,
                "owner_player_id" => {
                    *owner_player_id = value.as_u64().ok_or_else(unknown)? as usize
                }
                "parts" => {
                    *parts =
                        serde_json::from_value(value.clone()).map_err(|_| unknown())?
                }
                _ => return Err(unknown()),
            },
            EntityData::ConstructionSite {
                owner_player_id,
                progress,
                ..
            } => match key {
                "progress" => *progress = value.as_u64().ok_or_else(unknown)? as u32,
                "owner_player_id" => {
                    *owner_player_id = value.as_u64().ok_or_else(unknown)? as usize
                }
                _ => return Err(unknown()),
            },
            EntityData::Spawner {
                owner_player_id,
                energy,
            }
            | EntityData::Extension {
                owner_player_id,
                energy,
            } => match key {
                "energy" => *energy = value.as_u64().ok_or_else(unknown)? as u32,
                "owner_player_id" => {
                    *owner_player_id = value.as_u64().ok_or_else(unknown)? as usize
                }
                _ => return Err(unknown()),
            },
            EntityData::Radar { owner_player_id } => match key {
                "owner_player_id" => {
                    *owner_player_id = value.as_u64().ok_or_else(unknown)? as usize
                }
                _ => return Err(unknown()),
            },
        }
        Ok(())
    }
}

/// One row of the entity table: common positional header plus a
/// kind-specific [`EntityData`] payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub x: u32,
    pub y: u32,
    pub data: EntityData,
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }
}
