//! Player marker + spawn helper
//!
//! Ввод/управление игроком — ответственность host loop. Ядро видит
//! игрока как Combatant с CombatResolver (combo/dodge/parry state);
//! AI читает только позицию и шлёт `DamageInflicted` события.

use bevy::prelude::*;

use crate::combat::CombatResolver;
use crate::components::{Combatant, Health, Hitbox};

/// Marker: player entity (единственный target для enemy AI)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Spawn игрока с дефолтным resolver state
pub fn spawn_player(commands: &mut Commands, position: Vec2, stats: Combatant) -> Entity {
    commands
        .spawn((
            Player,
            Transform::from_translation(position.extend(0.0)),
            Health::new(100),
            stats,
            Hitbox::default(),
            CombatResolver::default(),
        ))
        .id()
}
