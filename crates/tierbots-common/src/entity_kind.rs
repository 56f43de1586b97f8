//! Entity type codes and bot-part composition rules.

use serde::{Deserialize, Serialize};

/// Entity table keys are uniformly-random 32-bit values, rejection-sampled
/// by the state store to guarantee uniqueness.
pub type EntityId = u32;

/// The `type` discriminant carried by every entity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    Source = 1,
    Bot = 2,
    ConstructionSite = 3,
    Spawner = 4,
    Extension = 5,
    Radar = 6,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Source => "source",
            EntityKind::Bot => "bot",
            EntityKind::ConstructionSite => "construction_site",
            EntityKind::Spawner => "spawner",
            EntityKind::Extension => "extension",
            EntityKind::Radar => "radar",
        }
    }
}

/// What a construction site resolves into once finished. Distinct from
/// [`EntityKind`] because `wall`/`road` are natural-map terrain, not
/// entities, while spawner/extension/radar are themselves entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructionType {
    Wall,
    Road,
    Spawner,
    Extension,
    Radar,
}

/// One segment of a bot's body plan.
///
/// Each part contributes a fixed base of 5 hp plus a type-specific
/// attribute bonus: worker+10 energy, movement+10 stamina, melee+3 melee,
/// ranged+2 ranged, heal+2 heal, tough+10 hp, storage+20 energy. `life` has
/// no bonus of its own beyond the base hp -- it exists purely to extend
/// lifespan in the game layer, out of scope here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BotPart {
    Worker,
    Movement,
    Melee,
    Ranged,
    Heal,
    Tough,
    Storage,
    Life,
}

/// Per-part attribute contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartAttributes {
    pub hp: u32,
    pub energy: u32,
    pub stamina: u32,
    pub melee: u32,
    pub ranged: u32,
    pub heal: u32,
}

impl BotPart {
    /// Base hp plus attribute bonus this part contributes.
    pub fn attributes(self) -> PartAttributes {
        const BASE_HP: u32 = 5;
        let mut a = PartAttributes {
            hp: BASE_HP,
            ..Default::default()
        };
        match self {
            BotPart::Worker => a.energy += 10,
            BotPart::Movement => a.stamina += 10,
            BotPart::Melee => a.melee += 3,
            BotPart::Ranged => a.ranged += 2,
            BotPart::Heal => a.heal += 2,
            BotPart::Tough => a.hp += 10,
            BotPart::Storage => a.energy += 20,
            BotPart::Life => {}
        }
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_names() {
        assert_eq!(EntityKind::Source.name(), "source");
        assert_eq!(EntityKind::Radar.name(), "radar");
    }

    #[test]
    fn part_attributes_base_hp_always_five() {
        for part in [
            BotPart::Worker,
            BotPart::Movement,
            BotPart::Melee,
            BotPart::Ranged,
            BotPart::Heal,
            BotPart::Storage,
            BotPart::Life,
        ] {
            assert_eq!(part.attributes().hp, 5);
        }
    }

    #[test]
    fn tough_part_adds_ten_hp() {
        assert_eq!(BotPart::Tough.attributes().hp, 15);
    }

    #[test]
    fn worker_part_adds_energy() {
        assert_eq!(BotPart::Worker.attributes().energy, 10);
    }

    #[test]
    fn storage_part_adds_more_energy_than_worker() {
        assert!(BotPart::Storage.attributes().energy > BotPart::Worker.attributes().energy);
    }
}
