//! A bot's body plan and the attribute arithmetic derived from it.

use tierbots_common::entity_kind::{BotPart, PartAttributes};

/// An ordered list of parts making up one bot. Order matters: effective
/// stats at a given hp are computed by scanning parts front-to-back and
/// accumulating their attribute bonus only while the running hp total is
/// still below the query hp -- a damaged bot effectively "loses" whichever
/// parts would have pushed it past its current hp, starting from the back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotLoadout {
    parts: Vec<BotPart>,
}

impl BotLoadout {
    pub fn new(parts: Vec<BotPart>) -> Self {
        BotLoadout { parts }
    }

    pub fn parts(&self) -> &[BotPart] {
        &self.parts
    }

    /// Sum of every part's hp contribution -- full, undamaged hp.
    pub fn max_hp(&self) -> u32 {
        self.parts.iter().map(|p| p.attributes().hp).sum()
    }

    /// Scans parts in declaration order, accumulating `select`'s attribute
    /// as long as the running hp total is still below `hp`. Matches the
    /// part ordering invariant above: a part only counts once the bot has
    /// enough hp remaining to "reach" it.
    fn accumulate_at(&self, hp: u32, select: impl Fn(&PartAttributes) -> u32) -> u32 {
        let mut cumulative_hp = 0u32;
        let mut total = 0u32;
        for part in &self.parts {
            let attrs = part.attributes();
            total += select(&attrs);
            cumulative_hp += attrs.hp;
            if cumulative_hp >= hp {
                break;
            }
        }
        total
    }

    pub fn effective_energy(&self, hp: u32) -> u32 {
        self.accumulate_at(hp, |a| a.energy)
    }

    pub fn effective_stamina(&self, hp: u32) -> u32 {
        self.accumulate_at(hp, |a| a.stamina)
    }

    pub fn effective_melee(&self, hp: u32) -> u32 {
        self.accumulate_at(hp, |a| a.melee)
    }

    pub fn effective_ranged(&self, hp: u32) -> u32 {
        self.accumulate_at(hp, |a| a.ranged)
    }

    pub fn effective_heal(&self, hp: u32) -> u32 {
        self.accumulate_at(hp, |a| a.heal)
    }

    /// Energy capacity at full hp -- the ceiling `EnergyStorage::max_energy`
    /// reports for a bot.
    pub fn max_energy(&self) -> u32 {
        self.effective_energy(self.max_hp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_hp_sums_part_contributions() {
        let loadout = BotLoadout::new(vec![BotPart::Worker, BotPart::Tough]);
        assert_eq!(loadout.max_hp(), 5 + 15);
    }

    #[test]
    fn effective_energy_at_full_hp_counts_every_part() {
        let loadout = BotLoadout::new(vec![BotPart::Worker, BotPart::Storage]);
        assert_eq!(loadout.max_energy(), 10 + 20);
    }

    #[test]
    fn effective_energy_drops_parts_once_damaged_past_them() {
        // worker (hp 5, energy 10) then storage (hp 5, energy 20); max_hp = 10.
        let loadout = BotLoadout::new(vec![BotPart::Worker, BotPart::Storage]);
        // at hp 5 the scan stops right after the worker part.
        assert_eq!(loadout.effective_energy(5), 10);
        // at hp 1 the scan still reaches the first part before breaking.
        assert_eq!(loadout.effective_energy(1), 10);
        // at hp 0 still requires scanning at least the first part, since the
        // loop only breaks *after* accumulating.
        assert_eq!(loadout.effective_energy(0), 10);
    }

    #[test]
    fn empty_loadout_has_no_capacity() {
        let loadout = BotLoadout::new(vec![]);
        assert_eq!(loadout.max_hp(), 0);
        assert_eq!(loadout.effective_energy(5), 0);
    }
}
