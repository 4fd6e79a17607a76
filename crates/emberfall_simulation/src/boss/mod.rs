//! Boss module: phase ladder + pattern engine
//!
//! Босс = обычный боец с двумя дополнительными компонентами:
//! - `BossPhases` — data-driven скрипт (фазы, паттерны, transitions)
//! - `BossState` — runtime курсор (фаза, transition, бегущий паттерн)
//!
//! Между паттернами боссом управляет reactive FSM из `crate::ai`.

use bevy::prelude::*;

pub mod engine;
pub mod pattern;
pub mod phase;
pub mod scripts;

pub use engine::{boss_pattern_execution, boss_pattern_selection, tick_pattern_cooldowns};
pub use pattern::{
    select_pattern, PatternSpec, PatternTier, StepAction, StepSpec, FILLER_WEIGHT, MAIN_WEIGHT,
};
pub use phase::{
    boss_phase_transitions, BossPhases, BossState, PhaseChanged, PhaseSpec, RunningPattern,
    TransitionSpec,
};

use crate::components::actor::spawn_with_stats;
use crate::components::EnemyKind;
use crate::SimulationSet;

/// Boss Plugin
///
/// Порядок внутри Boss set: phase transitions → pattern selection →
/// sequence execution. Cooldown таймеры паттернов тикают в Timers.
pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BossState>();

        app.add_event::<PhaseChanged>();

        app.add_systems(
            FixedUpdate,
            tick_pattern_cooldowns.in_set(SimulationSet::Timers),
        );

        app.add_systems(
            FixedUpdate,
            (
                boss_phase_transitions,
                boss_pattern_selection,
                boss_pattern_execution,
            )
                .chain()
                .in_set(SimulationSet::Boss),
        );
    }
}

/// Spawn босса: boss-scaled статы архетипа + скрипт фаз
pub fn spawn_boss(
    commands: &mut Commands,
    kind: EnemyKind,
    position: Vec2,
    phases: Vec<PhaseSpec>,
) -> Entity {
    let stats = kind.boss_stats();
    let phase_count = phases.len();
    let entity = spawn_with_stats(commands, kind, position, stats);

    commands
        .entity(entity)
        .insert((BossPhases(phases), BossState::default()));

    crate::log_info(&format!(
        "👹 Boss spawned: {:?} {:?} at {:?} ({} phases)",
        kind, entity, position, phase_count
    ));

    entity
}
