//! The tick-indexed decayable state store.
//!
//! Walls, roads, and energy drops are represented implicitly: the grid stores only
//! a terrain code, and a ground-indexed decay array stores the future tick
//! at which the wall/road/drop will be exhausted. Reading a current value is
//! a pure function of `(time, zero_tick)` (`tierbots_decay`); no periodic
//! sweep is required to keep values current.

use std::collections::HashMap;

use rand::Rng;

use tierbots_common::config::DecayRates;
use tierbots_common::direction::Direction;
use tierbots_common::entity_kind::EntityId;
use tierbots_common::error::ContractError;
use tierbots_common::grid::Grid;
use tierbots_common::natural_map::NaturalMap;
use tierbots_decay::{param_by_zerotime, zerotime_by_param_change};

use crate::entity::{EntityData, EntityRecord};
use crate::player::PlayerSlot;

/// Full in-RAM world state for one running server process.
///
/// Owns the grid arrays, ground index, decay arrays, entity table, position
/// index, and player table exclusively. The entity
/// table owns entity records; `position_index` holds only their keys.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub time: u32,
    pub natural_map: Grid<NaturalMap>,
    pub ground_index: Grid<u32>,
    pub wall_road_zero: Vec<u32>,
    pub drop_zero: Vec<u32>,
    pub entities: HashMap<EntityId, EntityRecord>,
    position_index: HashMap<(u32, u32), EntityId>,
    pub players: Vec<Option<PlayerSlot>>,
    pub decay_rates: DecayRates,
}

fn decay_rate_for(value: NaturalMap, rates: &DecayRates) -> f64 {
    match value {
        NaturalMap::ArtificialWall => rates.wall_decay,
        NaturalMap::Road => rates.road_decay,
        _ => unreachable!("decay_rate_for called on a non-decaying NaturalMap value"),
    }
}

impl ServerState {
    /// Assembles a `ServerState` directly from an already-generated world
    /// (see `tierbots-worldgen::generate_world`), allocating the decay
    /// arrays at ground-index size and seeding one `Source` entity per
    /// sampled position. Callers that want persistence should follow with
    /// `tierbots-persistence::save`.
    pub fn from_generated(
        natural_map: Grid<NaturalMap>,
        ground_index: Grid<u32>,
        ground_count_plus_one: u32,
        sources: &[(u32, u32)],
        decay_rates: DecayRates,
    ) -> ServerState {
        let maxplayers = sources.len() / 4;
        let mut state = ServerState {
            time: 0,
            natural_map,
            ground_index,
            wall_road_zero: vec![0u32; ground_count_plus_one as usize],
            drop_zero: vec![0u32; ground_count_plus_one as usize],
            entities: HashMap::new(),
            position_index: HashMap::new(),
            players: vec![None; maxplayers],
            decay_rates,
        };
        for &(x, y) in sources {
            let data = EntityData::Source {
                energy: state.decay_rates.source_max_energy,
            };
            state
                .place_new_entity(data, x, y)
                .expect("generated source positions are distinct and in-bounds");
        }
        state
    }

    /// Reassembles a `ServerState` from previously persisted parts,
    /// rebuilding `position_index` from the entity table.
    #[allow(clippy::too_many_arguments)]
    pub fn from_loaded(
        time: u32,
        natural_map: Grid<NaturalMap>,
        ground_index: Grid<u32>,
        wall_road_zero: Vec<u32>,
        drop_zero: Vec<u32>,
        entities: HashMap<EntityId, EntityRecord>,
        players: Vec<Option<PlayerSlot>>,
        decay_rates: DecayRates,
    ) -> ServerState {
        let position_index = entities.values().map(|e| ((e.x, e.y), e.id)).collect();
        ServerState {
            time,
            natural_map,
            ground_index,
            wall_road_zero,
            drop_zero,
            entities,
            position_index,
            players,
            decay_rates,
        }
    }

    fn allocate_entity_id(&self) -> EntityId {
        let mut rng = rand::thread_rng();
        loop {
            let candidate: EntityId = rng.gen();
            if !self.entities.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    fn check_xy(&self, x: i64, y: i64) -> bool {
        self.natural_map.in_bounds(x, y)
    }

    /// Advances the tick counter by exactly one.
    pub fn advance_tick(&mut self) {
        self.time += 1;
        tracing::trace!(tick = self.time, "tick advanced");
    }

    // -- entity table -------------------------------------------------

    /// Fails (returns `None`) if out of range or the square is already
    /// occupied. Otherwise allocates a fresh id and inserts into both the
    /// entity table and the position index.
    pub fn place_new_entity(&mut self, data: EntityData, x: u32, y: u32) -> Option<EntityId> {
        if !self.check_xy(x as i64, y as i64) {
            return None;
        }
        let key = (x, y);
        if self.position_index.contains_key(&key) {
            return None;
        }
        let id = self.allocate_entity_id();
        self.entities.insert(
            id,
            EntityRecord {
                id,
                x,
                y,
                data,
            },
        );
        self.position_index.insert(key, id);
        Some(id)
    }

    pub fn get_entity(&self, x: u32, y: u32) -> Option<EntityId> {
        self.position_index.get(&(x, y)).copied()
    }

    /// A defensive copy of the entity record; mutating it does not affect
    /// the state store. Invalid ids are a contract violation.
    pub fn get_entity_by_id(&self, id: EntityId) -> Result<EntityRecord, ContractError> {
        self.entities
            .get(&id)
            .cloned()
            .ok_or(ContractError::InvalidEntityId(id))
    }

    /// `key` must not be `"x"`/`"y"` (move the entity instead). Invalid ids
    /// and unknown properties are contract violations.
    pub fn change_entity_prop(
        &mut self,
        id: EntityId,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), ContractError> {
        if key == "x" || key == "y" {
            return Err(ContractError::ReservedPropertyKey(key.to_string()));
        }
        let record = self
            .entities
            .get_mut(&id)
            .ok_or(ContractError::InvalidEntityId(id))?;
        record.data.set_property(id, key, value)
    }

    /// Moves the entity one step in `dir`. Fails (`Ok(false)`) if the target
    /// is out of range or occupied -- no wall-collision check, that is the
    /// game layer's responsibility. An unknown id is a contract violation.
    pub fn move_entity(&mut self, id: EntityId, dir: Direction) -> Result<bool, ContractError> {
        let (x, y) = {
            let record = self
                .entities
                .get(&id)
                .ok_or(ContractError::InvalidEntityId(id))?;
            (record.x, record.y)
        };
        let (dx, dy) = dir.offset();
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if !self.check_xy(nx, ny) {
            return Ok(false);
        }
        let new_key = (nx as u32, ny as u32);
        if self.position_index.contains_key(&new_key) {
            return Ok(false);
        }
        self.position_index.remove(&(x, y));
        {
            let record = self.entities.get_mut(&id).unwrap();
            record.x = new_key.0;
            record.y = new_key.1;
        }
        self.position_index.insert(new_key, id);
        Ok(true)
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Result<(), ContractError> {
        let record = self
            .entities
            .remove(&id)
            .ok_or(ContractError::InvalidEntityId(id))?;
        self.position_index.remove(&(record.x, record.y));
        Ok(())
    }

    // -- terrain / decay ------------------------------------------------

    /// Returns `(value, hp)`. Out-of-range coordinates read as an
    /// impassable natural wall with no hp. A wall/road whose zero-tick has
    /// already passed is lazily demoted to ground in place.
    pub fn get_natural(&mut self, x: i64, y: i64) -> (NaturalMap, Option<u32>) {
        if !self.check_xy(x, y) {
            return (NaturalMap::NaturalWall, None);
        }
        let v = *self.natural_map.get(x, y).unwrap();
        if v == NaturalMap::ArtificialWall || v == NaturalMap::Road {
            let gi = *self.ground_index.get(x, y).unwrap() as usize;
            let zero = self.wall_road_zero[gi];
            if self.time >= zero {
                self.natural_map.set(x as u32, y as u32, NaturalMap::Ground);
                return (NaturalMap::Ground, None);
            }
            let decay = decay_rate_for(v, &self.decay_rates);
            let hp = param_by_zerotime(self.time as i64, zero as i64, decay);
            return (v, Some(hp as u32));
        }
        (v, None)
    }

    /// Applies an hp delta to the wall/road at `(x, y)`. No-op failure
    /// (`false`) on out-of-range coordinates or a square that isn't
    /// currently a wall/road.
    pub fn change_natural_hp(&mut self, x: i64, y: i64, delta_hp: i64) -> bool {
        if !self.check_xy(x, y) {
            return false;
        }
        let v = *self.natural_map.get(x, y).unwrap();
        if v != NaturalMap::ArtificialWall && v != NaturalMap::Road {
            return false;
        }
        let gi = *self.ground_index.get(x, y).unwrap() as usize;
        let decay = decay_rate_for(v, &self.decay_rates);
        let new_zero =
            zerotime_by_param_change(self.time as i64, self.wall_road_zero[gi] as i64, decay, delta_hp);
        self.wall_road_zero[gi] = new_zero as u32;
        if new_zero <= self.time as i64 {
            self.natural_map.set(x as u32, y as u32, NaturalMap::Ground);
        }
        true
    }

    /// Creates (replaces) a wall/road at `(x, y)` with initial `hp`. Fails
    /// on a natural wall, on `hp == 0`, or out-of-range coordinates.
    pub fn set_natural_type(&mut self, x: i64, y: i64, kind: NaturalMap, hp: u32) -> bool {
        if kind != NaturalMap::ArtificialWall && kind != NaturalMap::Road {
            return false;
        }
        if hp == 0 || !self.check_xy(x, y) {
            return false;
        }
        let v = *self.natural_map.get(x, y).unwrap();
        if v == NaturalMap::NaturalWall {
            return false;
        }
        self.natural_map.set(x as u32, y as u32, kind);
        let gi = *self.ground_index.get(x, y).unwrap() as usize;
        let decay = decay_rate_for(kind, &self.decay_rates);
        self.wall_road_zero[gi] =
            zerotime_by_param_change(self.time as i64, self.time as i64, decay, hp as i64) as u32;
        true
    }

    /// Returns the current energy of a drop, or `None` if there isn't one.
    /// Squares that were never ground at world creation (`ground_index ==
    /// 0`) can never hold a drop.
    pub fn get_energy_drop(&self, x: i64, y: i64) -> Option<u32> {
        if !self.check_xy(x, y) {
            return None;
        }
        let gi = *self.ground_index.get(x, y).unwrap() as usize;
        if gi == 0 {
            return None;
        }
        let val = param_by_zerotime(self.time as i64, self.drop_zero[gi] as i64, self.decay_rates.drop_decay);
        if val > 0 {
            Some(val as u32)
        } else {
            None
        }
    }

    /// Changes an energy drop by `delta_energy`, implicitly creating one if
    /// `delta_energy > 0` and none exists, or removing it once decayed to
    /// zero. A no-op on out-of-range coordinates or squares that were never
    /// ground at world creation.
    pub fn change_energy_drop(&mut self, x: i64, y: i64, delta_energy: i64) {
        if !self.check_xy(x, y) {
            return;
        }
        let gi = *self.ground_index.get(x, y).unwrap() as usize;
        if gi == 0 {
            return;
        }
        self.drop_zero[gi] = zerotime_by_param_change(
            self.time as i64,
            self.drop_zero[gi] as i64,
            self.decay_rates.drop_decay,
            delta_energy,
        ) as u32;
    }

    // -- player table ---------------------------------------------------

    /// Finds the first empty slot in the fixed-length player table and
    /// fills it with a fresh, unactivated player. Returns `None` if the
    /// table is full.
    pub fn place_new_player_base(&mut self, name: String, credential_material: String) -> Option<usize> {
        let slot = self.players.iter_mut().position(|p| p.is_none())?;
        self.players[slot] = Some(PlayerSlot::new(name, credential_material));
        Some(slot)
    }

    /// Sets `map_offset` on a player's first activation. Fails if the slot
    /// is empty or already activated.
    pub fn activate_player(&mut self, slot: usize, offset: (u32, u32)) -> bool {
        match self.players.get_mut(slot) {
            Some(Some(p)) if p.map_offset.is_none() => {
                p.map_offset = Some(offset);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tierbots_common::entity_kind::EntityKind;

    fn ground_state(w: u32, h: u32) -> ServerState {
        let natural_map = Grid::filled(w, h, NaturalMap::Ground);
        let (ground_index, upper) = tierbots_worldgen::ground_index::build_ground_index(&natural_map);
        ServerState::from_generated(natural_map, ground_index, upper, &[], DecayRates::default())
    }

    #[test]
    fn place_and_lookup_entity() {
        let mut st = ground_state(10, 10);
        let id = st
            .place_new_entity(EntityData::Source { energy: 5 }, 3, 3)
            .unwrap();
        assert_eq!(st.get_entity(3, 3), Some(id));
        assert_eq!(st.get_entity_by_id(id).unwrap().data.kind(), EntityKind::Source);
    }

    #[test]
    fn place_new_entity_fails_when_occupied() {
        let mut st = ground_state(10, 10);
        st.place_new_entity(EntityData::Source { energy: 5 }, 3, 3).unwrap();
        assert!(st
            .place_new_entity(EntityData::Source { energy: 5 }, 3, 3)
            .is_none());
    }

    #[test]
    fn place_new_entity_fails_out_of_range() {
        let mut st = ground_state(4, 4);
        assert!(st
            .place_new_entity(EntityData::Source { energy: 5 }, 10, 10)
            .is_none());
    }

    #[test]
    fn move_entity_updates_position_index() {
        let mut st = ground_state(10, 10);
        let id = st
            .place_new_entity(EntityData::Source { energy: 5 }, 3, 3)
            .unwrap();
        assert!(st.move_entity(id, Direction::East).unwrap());
        assert_eq!(st.get_entity(3, 3), None);
        assert_eq!(st.get_entity(4, 3), Some(id));
    }

    #[test]
    fn move_entity_fails_into_occupied_square() {
        let mut st = ground_state(10, 10);
        let a = st
            .place_new_entity(EntityData::Source { energy: 5 }, 3, 3)
            .unwrap();
        st.place_new_entity(EntityData::Source { energy: 5 }, 4, 3).unwrap();
        assert_eq!(st.move_entity(a, Direction::East).unwrap(), false);
    }

    #[test]
    fn move_entity_invalid_id_is_contract_error() {
        let mut st = ground_state(10, 10);
        assert!(matches!(
            st.move_entity(999, Direction::East),
            Err(ContractError::InvalidEntityId(999))
        ));
    }

    #[test]
    fn change_entity_prop_rejects_position_keys() {
        let mut st = ground_state(10, 10);
        let id = st
            .place_new_entity(EntityData::Source { energy: 5 }, 3, 3)
            .unwrap();
        assert!(matches!(
            st.change_entity_prop(id, "x", &serde_json::json!(1)),
            Err(ContractError::ReservedPropertyKey(_))
        ));
    }

    #[test]
    fn change_entity_prop_updates_known_field() {
        let mut st = ground_state(10, 10);
        let id = st
            .place_new_entity(EntityData::Source { energy: 5 }, 3, 3)
            .unwrap();
        st.change_entity_prop(id, "energy", &serde_json::json!(42)).unwrap();
        let rec = st.get_entity_by_id(id).unwrap();
        assert_eq!(rec.data, EntityData::Source { energy: 42 });
    }

    #[test]
    fn remove_entity_clears_both_tables() {
        let mut st = ground_state(10, 10);
        let id = st
            .place_new_entity(EntityData::Source { energy: 5 }, 3, 3)
            .unwrap();
        st.remove_entity(id).unwrap();
        assert_eq!(st.get_entity(3, 3), None);
        assert!(st.get_entity_by_id(id).is_err());
    }

    #[test]
    fn set_get_change_natural_hp_scenario_c() {
        let mut st = ground_state(10, 10);
        assert!(st.set_natural_type(5, 5, NaturalMap::ArtificialWall, 10));
        assert_eq!(st.get_natural(5, 5), (NaturalMap::ArtificialWall, Some(10)));
        st.time = 99;
        assert_eq!(st.get_natural(5, 5), (NaturalMap::ArtificialWall, Some(1)));
        st.time = 100;
        assert_eq!(st.get_natural(5, 5), (NaturalMap::Ground, None));
    }

    #[test]
    fn change_natural_hp_demotes_to_ground_on_lethal_delta() {
        let mut st = ground_state(10, 10);
        st.set_natural_type(5, 5, NaturalMap::ArtificialWall, 10);
        assert!(st.change_natural_hp(5, 5, -1_000_000));
        assert_eq!(st.get_natural(5, 5), (NaturalMap::Ground, None));
    }

    #[test]
    fn set_natural_type_fails_on_natural_wall() {
        let mut st = ground_state(10, 10);
        st.natural_map.set(2, 2, NaturalMap::NaturalWall);
        assert!(!st.set_natural_type(2, 2, NaturalMap::Road, 10));
    }

    #[test]
    fn energy_drop_roundtrip() {
        let mut st = ground_state(10, 10);
        st.change_energy_drop(1, 1, 50);
        assert!(st.get_energy_drop(1, 1).unwrap() > 0);
        st.change_energy_drop(1, 1, -1_000_000);
        assert_eq!(st.get_energy_drop(1, 1), None);
    }

    #[test]
    fn energy_drop_never_appears_on_non_ground_index() {
        let mut st = ground_state(10, 10);
        st.natural_map.set(2, 2, NaturalMap::NaturalWall);
        let (ground_index, upper) = tierbots_worldgen::ground_index::build_ground_index(&st.natural_map);
        st.ground_index = ground_index;
        st.drop_zero = vec![0u32; upper as usize];
        st.change_energy_drop(2, 2, 1000);
        assert_eq!(st.get_energy_drop(2, 2), None);
    }

    #[test]
    fn advance_tick_increments_by_one() {
        let mut st = ground_state(4, 4);
        st.advance_tick();
        st.advance_tick();
        assert_eq!(st.time, 2);
    }

    #[test]
    fn player_table_activation_lifecycle() {
        let mut st = ground_state(4, 4);
        st.players = vec![None, None];
        let slot = st
            .place_new_player_base("alice".to_string(), "token".to_string())
            .unwrap();
        assert!(st.activate_player(slot, (1, 2)));
        assert!(!st.activate_player(slot, (5, 5)));
    }

    #[test]
    fn place_new_player_base_fails_when_full() {
        let mut st = ground_state(4, 4);
        st.players = vec![None];
        st.place_new_player_base("a".to_string(), "x".to_string()).unwrap();
        assert!(st
            .place_new_player_base("b".to_string(), "y".to_string())
            .is_none());
    }
}
