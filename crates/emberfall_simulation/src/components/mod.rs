//! ECS Components для боевых entity
//!
//! Организация по доменам:
//! - actor: общий stat block (Health, Combatant, Hitbox) + enemy archetypes
//! - player: player marker + spawn helper

pub mod actor;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use player::*;
