//! Combat system module
//!
//! ECS ответственность:
//! - Pure math: combo/crit/backstab pipeline, mitigation (math)
//! - Per-attacker state: combo counter, dodge/parry окна (resolver)
//! - Damage gate: единственная точка применения урона (damage)
//! - Collaborator seams: projectile/summon/buff запросы (projectile, buff)
//!
//! Host ответственность:
//! - Физика снарядов, buff стаки, визуальные эффекты, despawn врагов
//!   из enemy list

use bevy::prelude::*;

pub mod buff;
pub mod damage;
pub mod math;
pub mod projectile;
pub mod resolver;

// Re-export основных типов
pub use buff::{BuffKind, BuffRequest};
pub use damage::{
    clear_combat_state_on_death, despawn_after_timeout, is_damage_gated, resolve_damage,
    DamageDealt, DamageInflicted, Dead, DespawnAfter, EntityDied, Invulnerable,
};
pub use math::{attack_damage, combo_multiplier, mitigate, BACKSTAB_MULTIPLIER, CRIT_MULTIPLIER};
pub use projectile::{emit_volley, volley_angles, ProjectileRequest, SummonRequest, FAN_SPREAD};
pub use resolver::{
    tick_combat_resolvers, CombatResolver, COMBO_TIMEOUT, DODGE_COOLDOWN, DODGE_INVULN_DURATION,
    PARRY_WINDOW,
};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок внутри кадра задают `SimulationSet`:
/// - Timers: тик resolver окон
/// - Resolve: осушение DamageInflicted очереди через gate
/// - Death: снятие боевых компонентов + отложенный despawn
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageInflicted>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<ProjectileRequest>()
            .add_event::<SummonRequest>()
            .add_event::<BuffRequest>();

        app.add_systems(
            FixedUpdate,
            tick_combat_resolvers.in_set(SimulationSet::Timers),
        );

        app.add_systems(FixedUpdate, resolve_damage.in_set(SimulationSet::Resolve));

        app.add_systems(
            FixedUpdate,
            (clear_combat_state_on_death, despawn_after_timeout)
                .chain()
                .in_set(SimulationSet::Death),
        );
    }
}
