//! Client-facing capability views over the state store: typed read-only
//! windows (`Positionable`, `Healthable`, `EnergyStorage`, `Bot`,
//! `Building`, `Watcher`) plus the bot body-plan arithmetic (`BotLoadout`)
//! they're built on.
//!
//! Nothing here mutates a `ServerState` directly -- a view is a snapshot
//! built from an `EntityRecord`, and goes stale as soon as the backing
//! state changes. Mutation stays the state store's job.

pub mod loadout;
pub mod views;

pub mod prelude {
    pub use crate::loadout::BotLoadout;
    pub use crate::views::{
        Bot, BotView, Building, BuildingView, ConstructionSiteView, EnemyBot, EnemyBuilding,
        EnergyStorage, Enemy, Healthable, MyBot, MyBuilding, MyConstructionSite, Positionable,
        SourceView, Watcher,
    };
}
