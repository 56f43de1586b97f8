//! Contract-violation errors.
//!
//! Expected runtime failures (out-of-range coordinates, occupied squares,
//! carving a natural wall, ...) are not represented here -- per the error
//! taxonomy, they are ordinary `Option`/`bool` returns that the game layer
//! is meant to branch on. `ContractError` is reserved for programmer bugs:
//! invalid ids, forbidden property writes, and malformed persistence calls.

use crate::entity_kind::EntityId;

/// A contract was violated by the caller.
///
/// Mirrors `nomai_ecs::EcsError` in spirit: one enum per crate, each variant
/// naming exactly what assumption was broken so the message is useful
/// without a debugger attached.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// `get_entity_by_id` / `change_entity_prop` / `move_entity` /
    /// `remove_entity` were called with an id absent from the entity table.
    #[error("entity {0:?} does not exist")]
    InvalidEntityId(EntityId),

    /// `change_entity_prop` attempted to write `x` or `y` directly.
    #[error("property '{0}' may not be set via change_entity_prop; move the entity instead")]
    ReservedPropertyKey(String),

    /// `change_entity_prop` was called with a key that the entity's variant
    /// does not carry.
    #[error("entity {entity:?} of kind '{kind}' has no property '{key}'")]
    UnknownProperty {
        entity: EntityId,
        kind: &'static str,
        key: String,
    },

    /// `ServerState::load` was pointed at a directory that does not exist.
    #[error("load target directory does not exist: {0}")]
    LoadTargetMissing(String),

    /// `ServerState::create_new` was pointed at a non-empty directory.
    #[error("create_new target directory is not empty: {0}")]
    CreateTargetNotEmpty(String),
}
