//! Saving and loading a [`ServerState`] to a directory of flat files.
//!
//! Four `.npy` arrays carry the grid data (`natural_map`, `ground_index`,
//! `wall_road_zero`, `drop_zero`) and one `bincode`-encoded blob carries
//! everything else (world size, max players, entity table, player table).
//! The blob keeps the filename `data.pickle` even though the bytes
//! underneath are no longer a Python pickle.
//!
//! The tick counter does not survive a restart: `save` rewrites every decay
//! array entry as a tick count *remaining* from the moment of saving, and
//! `load` rebuilds absolute zero-ticks against a freshly reset `time = 0`.

pub mod blob;
pub mod error;
pub mod npy;

use std::fs;
use std::path::Path;

use tierbots_common::config::Filenames;
use tierbots_common::error::ContractError;
use tierbots_common::natural_map::NaturalMap;
use tierbots_state::store::ServerState;

use blob::PersistedBlob;
use error::PersistenceError;

/// Creates `dir` (if it doesn't already exist) and saves `state` into it.
/// Fails if `dir` exists and is non-empty, to avoid silently clobbering an
/// existing world.
pub fn create_new(dir: &Path, filenames: &Filenames, state: &ServerState) -> Result<(), PersistenceError> {
    let occupied = match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_some(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };
    if occupied {
        return Err(ContractError::CreateTargetNotEmpty(dir.display().to_string()).into());
    }
    fs::create_dir_all(dir)?;
    save(dir, filenames, state)
}

/// Writes every file of an existing `ServerState` into `dir`, overwriting
/// whatever was there.
pub fn save(dir: &Path, filenames: &Filenames, state: &ServerState) -> Result<(), PersistenceError> {
    let (width, height, map_bytes) = state.natural_map.clone().into_raw();
    let map_bytes: Vec<u8> = map_bytes.iter().map(|v| v.as_u8()).collect();
    npy::write_2d(&dir.join(&filenames.natural_map), width, height, &map_bytes)?;

    let (gi_width, gi_height, gi_data) = state.ground_index.clone().into_raw();
    npy::write_2d(&dir.join(&filenames.ground_index), gi_width, gi_height, &gi_data)?;

    let wall_road: Vec<u32> = state
        .wall_road_zero
        .iter()
        .map(|&zero| zero.saturating_sub(state.time))
        .collect();
    npy::write_1d(&dir.join(&filenames.wall_road), &wall_road)?;

    let drops: Vec<u32> = state
        .drop_zero
        .iter()
        .map(|&zero| zero.saturating_sub(state.time))
        .collect();
    npy::write_1d(&dir.join(&filenames.drops), &drops)?;

    let blob = PersistedBlob {
        size: (width, height),
        maxplayers: state.players.len(),
        time: 0,
        entities: state.entities.values().cloned().collect(),
        players: state.players.clone(),
    };
    let encoded = bincode::serde::encode_to_vec(&blob, bincode::config::standard())
        .map_err(|e| PersistenceError::Encode(e.to_string()))?;
    fs::write(dir.join(&filenames.data), encoded)?;

    tracing::debug!(dir = %dir.display(), entities = blob.entities.len(), "world saved");
    Ok(())
}

/// Loads a previously saved `ServerState` from `dir`. `decay_rates` is not
/// itself persisted and is passed in
/// by the caller.
pub fn load(dir: &Path, filenames: &Filenames, decay_rates: tierbots_common::config::DecayRates) -> Result<ServerState, PersistenceError> {
    if !dir.is_dir() {
        return Err(ContractError::LoadTargetMissing(dir.display().to_string()).into());
    }

    let (width, height, map_bytes) = npy::read_2d::<u8>(&dir.join(&filenames.natural_map))?;
    let natural_map_cells: Vec<NaturalMap> = map_bytes.into_iter().map(NaturalMap::from_u8).collect();
    let natural_map = tierbots_common::grid::Grid::from_cells(width, height, natural_map_cells);

    let (gi_width, gi_height, gi_data) = npy::read_2d::<u32>(&dir.join(&filenames.ground_index))?;
    let ground_index = tierbots_common::grid::Grid::from_cells(gi_width, gi_height, gi_data);

    let wall_road_remaining = npy::read_1d::<u32>(&dir.join(&filenames.wall_road))?;
    let drop_remaining = npy::read_1d::<u32>(&dir.join(&filenames.drops))?;

    let data = fs::read(dir.join(&filenames.data))?;
    let (blob, _): (PersistedBlob, usize) =
        bincode::serde::decode_from_slice(&data, bincode::config::standard())
            .map_err(|e| PersistenceError::Decode(e.to_string()))?;

    let time = 0u32;
    let wall_road_zero: Vec<u32> = wall_road_remaining.iter().map(|&r| time + r).collect();
    let drop_zero: Vec<u32> = drop_remaining.iter().map(|&r| time + r).collect();

    let entities = blob.entities_by_id();
    let players = blob.players;

    tracing::debug!(dir = %dir.display(), entities = entities.len(), "world loaded");

    Ok(ServerState::from_loaded(
        time,
        natural_map,
        ground_index,
        wall_road_zero,
        drop_zero,
        entities,
        players,
        decay_rates,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tierbots_common::config::{DecayRates, WorldSize};
    use tierbots_worldgen::assembler::generate_world;
    use tierbots_worldgen::seeded_rng;

    fn sample_state() -> ServerState {
        let mut rng = seeded_rng(7);
        let world = generate_world(2, 2, &WorldSize::default(), &mut rng);
        let (ground_index, upper) = tierbots_worldgen::ground_index::build_ground_index(&world.natural_map);
        ServerState::from_generated(
            world.natural_map,
            ground_index,
            upper,
            &world.sources,
            DecayRates::default(),
        )
    }

    #[test]
    fn create_new_fails_on_nonempty_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("stray.txt"), b"hi").unwrap();
        let state = sample_state();
        let err = create_new(dir.path(), &Filenames::default(), &state).unwrap_err();
        assert!(matches!(err, PersistenceError::Contract(ContractError::CreateTargetNotEmpty(_))));
    }

    #[test]
    fn load_fails_on_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = load(&missing, &Filenames::default(), DecayRates::default()).unwrap_err();
        assert!(matches!(err, PersistenceError::Contract(ContractError::LoadTargetMissing(_))));
    }

    #[test]
    fn roundtrip_preserves_terrain_and_entities() {
        let dir = tempdir().unwrap();
        let filenames = Filenames::default();
        let state = sample_state();
        let entity_count = state.entities.len();
        create_new(dir.path(), &filenames, &state).unwrap();

        let loaded = load(dir.path(), &filenames, DecayRates::default()).unwrap();
        assert_eq!(loaded.time, 0);
        assert_eq!(loaded.entities.len(), entity_count);
        assert_eq!(loaded.natural_map.as_slice(), state.natural_map.as_slice());
        for (id, record) in &state.entities {
            let back = loaded.get_entity_by_id(*id).unwrap();
            assert_eq!(back.x, record.x);
            assert_eq!(back.y, record.y);
            assert_eq!(loaded.get_entity(record.x, record.y), Some(*id));
        }
    }

    #[test]
    fn roundtrip_rebases_decay_to_time_remaining() {
        let dir = tempdir().unwrap();
        let filenames = Filenames::default();
        let mut state = sample_state();
        state.set_natural_type(2, 2, NaturalMap::ArtificialWall, 50);
        for _ in 0..10 {
            state.advance_tick();
        }
        let (before, _) = state.get_natural(2, 2);
        assert_eq!(before, NaturalMap::ArtificialWall);

        create_new(dir.path(), &filenames, &state).unwrap();
        let mut loaded = load(dir.path(), &filenames, DecayRates::default()).unwrap();
        assert_eq!(loaded.time, 0);
        let (after, hp_after) = loaded.get_natural(2, 2);
        let (_, hp_before) = state.clone().get_natural(2, 2);
        assert_eq!(after, NaturalMap::ArtificialWall);
        assert_eq!(hp_after, hp_before);
    }

    #[test]
    fn create_new_then_save_again_overwrites_in_place() {
        let dir = tempdir().unwrap();
        let filenames = Filenames::default();
        let state = sample_state();
        create_new(dir.path(), &filenames, &state).unwrap();
        save(dir.path(), &filenames, &state).unwrap();
        let loaded = load(dir.path(), &filenames, DecayRates::default()).unwrap();
        assert_eq!(loaded.entities.len(), state.entities.len());
    }
}
