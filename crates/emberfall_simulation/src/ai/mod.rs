//! AI module
//!
//! Reactive FSM обычных врагов (reactive). Боссов между паттернами
//! ведёт та же FSM; приоритеты паттернов живут в `crate::boss`.

use bevy::prelude::*;

pub mod reactive;

pub use reactive::{
    ai_attack_execution, ai_movement_from_state, ai_state_transitions, roll_damage_variance,
    tick_attack_windups, tick_melee_cooldowns, AiConfig, AiState, MeleeAttacker, Windup,
};

use crate::SimulationSet;

/// AI Plugin
///
/// Порядок внутри Ai set фиксирован: transitions → movement → attack
/// start → windup completion. Cooldown таймеры тикают раньше, в Timers.
pub struct AiPlugin;

impl Plugin for AiPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AiState>()
            .register_type::<AiConfig>()
            .register_type::<MeleeAttacker>()
            .register_type::<Windup>();

        app.add_systems(
            FixedUpdate,
            tick_melee_cooldowns.in_set(SimulationSet::Timers),
        );

        app.add_systems(
            FixedUpdate,
            (
                ai_state_transitions,
                ai_movement_from_state,
                ai_attack_execution,
                tick_attack_windups,
            )
                .chain()
                .in_set(SimulationSet::Ai),
        );
    }
}
