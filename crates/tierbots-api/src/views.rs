//! Capability-typed views over state-store records.
//!
//! These are contracts over borrowed or copied state, not storage of their
//! own: every view is built from an [`EntityRecord`] (or, for `Watcher`,
//! read directly off a [`ServerState`]) and goes stale the moment the
//! backing state changes. Composition is via trait bounds, not a class
//! hierarchy -- a `BotView` is simultaneously `Positionable`, `Healthable`,
//! and `EnergyStorage` without any of the three knowing about each other.

use std::ops::Deref;

use tierbots_common::entity_kind::{ConstructionType, EntityId, EntityKind};
use tierbots_common::grid::Grid;
use tierbots_common::natural_map::NaturalMap;
use tierbots_state::entity::{EntityData, EntityRecord};
use tierbots_state::store::ServerState;

use crate::loadout::BotLoadout;

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

pub trait Positionable {
    fn x(&self) -> u32;
    fn y(&self) -> u32;
}

pub trait Healthable: Positionable {
    fn hp(&self) -> u32;
    fn max_hp(&self) -> u32;
}

pub trait EnergyStorage: Positionable {
    fn energy(&self) -> u32;
    fn max_energy(&self) -> u32;
}

pub trait Bot: Healthable + EnergyStorage {
    fn owner_player_id(&self) -> usize;
    fn loadout(&self) -> &BotLoadout;
}

pub trait Building: Positionable {
    fn owner_player_id(&self) -> usize;
    fn kind(&self) -> EntityKind;
}

/// Marker for a view belonging to some other player, surfaced to a watcher
/// that is not its owner. Carries no methods of its own -- callers branch on
/// the type, not on a runtime flag.
pub trait Enemy {}

/// A capability that can observe the world: a terrain snapshot, energy
/// drops in range, and enemy bots/buildings in range. `view_radius` is a
/// Chebyshev (square) radius around `(x, y)`.
pub trait Watcher: Positionable {
    fn view_radius(&self) -> u32;

    /// Terrain codes and their current hp (`None` for squares that aren't a
    /// decaying wall/road) in a `(2r+1) x (2r+1)` window centered on this
    /// watcher. Lazily demotes expired walls/roads to ground, the same as a
    /// direct `ServerState::get_natural` call would.
    fn visible_terrain(&self, state: &mut ServerState) -> (Grid<NaturalMap>, Grid<Option<u32>>) {
        let r = self.view_radius() as i64;
        let side = (2 * r + 1) as u32;
        let (cx, cy) = (self.x() as i64, self.y() as i64);
        let mut terrain = Grid::filled(side, side, NaturalMap::Unknown);
        let mut hp = Grid::filled(side, side, None);
        for dy in -r..=r {
            for dx in -r..=r {
                let (value, cell_hp) = state.get_natural(cx + dx, cy + dy);
                terrain.set((dx + r) as u32, (dy + r) as u32, value);
                hp.set((dx + r) as u32, (dy + r) as u32, cell_hp);
            }
        }
        (terrain, hp)
    }

    /// Energy drops in range, as `(x, y, energy)` absolute-coordinate
    /// triples.
    fn visible_drops(&self, state: &ServerState) -> Vec<(u32, u32, u32)> {
        let r = self.view_radius() as i64;
        let (cx, cy) = (self.x() as i64, self.y() as i64);
        let mut out = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let (wx, wy) = (cx + dx, cy + dy);
                if wx < 0 || wy < 0 {
                    continue;
                }
                if let Some(energy) = state.get_energy_drop(wx, wy) {
                    out.push((wx as u32, wy as u32, energy));
                }
            }
        }
        out
    }

    /// Bots owned by some other player, within range.
    fn visible_enemy_bots(&self, state: &ServerState, viewer_player_id: usize) -> Vec<EnemyBot> {
        self.entities_in_range(state)
            .filter_map(|rec| BotView::from_record(rec.clone()))
            .filter_map(|bot| EnemyBot::new(bot, viewer_player_id))
            .collect()
    }

    /// Spawner/extension/radar buildings owned by some other player, within
    /// range.
    fn visible_enemy_buildings(
        &self,
        state: &ServerState,
        viewer_player_id: usize,
    ) -> Vec<EnemyBuilding> {
        self.entities_in_range(state)
            .filter_map(|rec| BuildingView::from_record(rec.clone()))
            .filter_map(|b| EnemyBuilding::new(b, viewer_player_id))
            .collect()
    }

    fn entities_in_range<'a>(
        &self,
        state: &'a ServerState,
    ) -> Box<dyn Iterator<Item = &'a EntityRecord> + 'a> {
        let r = self.view_radius();
        let (cx, cy) = (self.x(), self.y());
        Box::new(
            state
                .entities
                .values()
                .filter(move |rec| chebyshev(cx, cy, rec.x, rec.y) <= r),
        )
    }
}

fn chebyshev(ax: u32, ay: u32, bx: u32, by: u32) -> u32 {
    ax.abs_diff(bx).max(ay.abs_diff(by))
}

// ---------------------------------------------------------------------------
// Bot
// ---------------------------------------------------------------------------

/// A bot entity viewed through its capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct BotView {
    pub id: EntityId,
    x: u32,
    y: u32,
    owner_player_id: usize,
    hp: u32,
    energy: u32,
    loadout: BotLoadout,
}

impl BotView {
    pub fn from_record(record: EntityRecord) -> Option<Self> {
        match record.data {
            EntityData::Bot {
                owner_player_id,
                hp,
                parts,
                energy,
            } => Some(BotView {
                id: record.id,
                x: record.x,
                y: record.y,
                owner_player_id,
                hp,
                energy,
                loadout: BotLoadout::new(parts),
            }),
            _ => None,
        }
    }
}

impl Positionable for BotView {
    fn x(&self) -> u32 {
        self.x
    }
    fn y(&self) -> u32 {
        self.y
    }
}

impl Healthable for BotView {
    fn hp(&self) -> u32 {
        self.hp
    }
    fn max_hp(&self) -> u32 {
        self.loadout.max_hp()
    }
}

impl EnergyStorage for BotView {
    fn energy(&self) -> u32 {
        self.energy
    }
    fn max_energy(&self) -> u32 {
        self.loadout.effective_energy(self.hp)
    }
}

impl Bot for BotView {
    fn owner_player_id(&self) -> usize {
        self.owner_player_id
    }
    fn loadout(&self) -> &BotLoadout {
        &self.loadout
    }
}

/// A `BotView` the requesting player owns.
#[derive(Debug, Clone, PartialEq)]
pub struct MyBot(BotView);

impl MyBot {
    pub fn new(view: BotView, viewer_player_id: usize) -> Option<Self> {
        (view.owner_player_id == viewer_player_id).then_some(MyBot(view))
    }
}

impl Deref for MyBot {
    type Target = BotView;
    fn deref(&self) -> &BotView {
        &self.0
    }
}

/// A `BotView` owned by some other player.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyBot(BotView);

impl EnemyBot {
    pub fn new(view: BotView, viewer_player_id: usize) -> Option<Self> {
        (view.owner_player_id != viewer_player_id).then_some(EnemyBot(view))
    }
}

impl Deref for EnemyBot {
    type Target = BotView;
    fn deref(&self) -> &BotView {
        &self.0
    }
}

impl Enemy for EnemyBot {}

// ---------------------------------------------------------------------------
// Building (spawner / extension / radar)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingView {
    pub id: EntityId,
    x: u32,
    y: u32,
    owner_player_id: usize,
    kind: EntityKind,
    energy: Option<u32>,
}

impl BuildingView {
    pub fn from_record(record: EntityRecord) -> Option<Self> {
        let (owner_player_id, kind, energy) = match record.data {
            EntityData::Spawner {
                owner_player_id,
                energy,
            } => (owner_player_id, EntityKind::Spawner, Some(energy)),
            EntityData::Extension {
                owner_player_id,
                energy,
            } => (owner_player_id, EntityKind::Extension, Some(energy)),
            EntityData::Radar { owner_player_id } => (owner_player_id, EntityKind::Radar, None),
            _ => return None,
        };
        Some(BuildingView {
            id: record.id,
            x: record.x,
            y: record.y,
            owner_player_id,
            kind,
            energy,
        })
    }

    /// Current stored energy, for the spawner/extension kinds that carry
    /// one. `None` for radars and for buildings with no energy economics
    /// wired up (out of scope here; the game layer enforces any cap).
    pub fn energy(&self) -> Option<u32> {
        self.energy
    }
}

impl Positionable for BuildingView {
    fn x(&self) -> u32 {
        self.x
    }
    fn y(&self) -> u32 {
        self.y
    }
}

impl Building for BuildingView {
    fn owner_player_id(&self) -> usize {
        self.owner_player_id
    }
    fn kind(&self) -> EntityKind {
        self.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MyBuilding(BuildingView);

impl MyBuilding {
    pub fn new(view: BuildingView, viewer_player_id: usize) -> Option<Self> {
        (view.owner_player_id == viewer_player_id).then_some(MyBuilding(view))
    }
}

impl Deref for MyBuilding {
    type Target = BuildingView;
    fn deref(&self) -> &BuildingView {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyBuilding(BuildingView);

impl EnemyBuilding {
    pub fn new(view: BuildingView, viewer_player_id: usize) -> Option<Self> {
        (view.owner_player_id != viewer_player_id).then_some(EnemyBuilding(view))
    }
}

impl Deref for EnemyBuilding {
    type Target = BuildingView;
    fn deref(&self) -> &BuildingView {
        &self.0
    }
}

impl Enemy for EnemyBuilding {}

// ---------------------------------------------------------------------------
// Construction site
// ---------------------------------------------------------------------------

/// An in-progress construction site. Only its owner can observe one --
/// there is no `EnemyConstructionSite`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionSiteView {
    pub id: EntityId,
    x: u32,
    y: u32,
    owner_player_id: usize,
    pub target: ConstructionType,
    pub progress: u32,
}

impl ConstructionSiteView {
    pub fn from_record(record: EntityRecord) -> Option<Self> {
        match record.data {
            EntityData::ConstructionSite {
                owner_player_id,
                target,
                progress,
            } => Some(ConstructionSiteView {
                id: record.id,
                x: record.x,
                y: record.y,
                owner_player_id,
                target,
                progress,
            }),
            _ => None,
        }
    }
}

impl Positionable for ConstructionSiteView {
    fn x(&self) -> u32 {
        self.x
    }
    fn y(&self) -> u32 {
        self.y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MyConstructionSite(ConstructionSiteView);

impl MyConstructionSite {
    pub fn new(view: ConstructionSiteView, viewer_player_id: usize) -> Option<Self> {
        (view.owner_player_id == viewer_player_id).then_some(MyConstructionSite(view))
    }
}

impl Deref for MyConstructionSite {
    type Target = ConstructionSiteView;
    fn deref(&self) -> &ConstructionSiteView {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// A natural energy source. Not owned by any player; there is no My/Enemy
/// split for it. `max_energy` comes from the world's `DecayRates` at
/// construction, since the entity record itself only carries current
/// energy.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceView {
    pub id: EntityId,
    x: u32,
    y: u32,
    energy: u32,
    max_energy: u32,
}

impl SourceView {
    pub fn from_record(record: EntityRecord, max_energy: u32) -> Option<Self> {
        match record.data {
            EntityData::Source { energy } => Some(SourceView {
                id: record.id,
                x: record.x,
                y: record.y,
                energy,
                max_energy,
            }),
            _ => None,
        }
    }
}

impl Positionable for SourceView {
    fn x(&self) -> u32 {
        self.x
    }
    fn y(&self) -> u32 {
        self.y
    }
}

impl EnergyStorage for SourceView {
    fn energy(&self) -> u32 {
        self.energy
    }
    fn max_energy(&self) -> u32 {
        self.max_energy
    }
}
