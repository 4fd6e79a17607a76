//! Boss phase ladder
//!
//! Фазы заданы health-percent полосами [high, low): фаза активна, пока
//! pct ≤ high и pct > low; последняя полоса включает 0. Lookup идёт
//! сверху вниз, first match wins. Лестница монотонна: хил не откатывает
//! босса на раннюю фазу (clamp к highest_phase).
//!
//! Смена фазы: отменить бегущий паттерн (вместе с его step override),
//! опционально запустить transition — cinematic окно с неуязвимостью.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::pattern::PatternSpec;
use crate::combat::Invulnerable;
use crate::components::Health;

/// Cinematic окно при входе в фазу
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionSpec {
    /// Длительность (секунды); паттерны в это время не выбираются
    pub duration: f32,
    /// Полная неуязвимость на время transition
    pub invulnerable: bool,
    /// Реплика босса / screen message для host UI
    pub message: Option<String>,
}

/// Одна фаза босса
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseSpec {
    /// (high, low) полоса в процентах здоровья; активна при
    /// low < pct ≤ high, последняя полоса (low ≤ 0) включает 0
    pub health_range: (f32, f32),
    /// Множитель урона всех паттернов фазы
    pub damage_modifier: f32,
    pub transition: Option<TransitionSpec>,
    pub patterns: Vec<PatternSpec>,
}

impl PhaseSpec {
    pub fn contains(&self, pct: f32) -> bool {
        let (high, low) = self.health_range;
        pct <= high && (pct > low || low <= 0.0)
    }
}

/// Скрипт босса: лестница фаз сверху (100%) вниз (0%)
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct BossPhases(pub Vec<PhaseSpec>);

impl BossPhases {
    /// Первая фаза, чья полоса содержит pct (first match wins)
    pub fn find_phase(&self, pct: f32) -> Option<usize> {
        self.0.iter().position(|phase| phase.contains(pct))
    }
}

/// Выполняемый паттерн (курсор по steps)
#[derive(Debug, Clone, Default, Reflect)]
pub struct RunningPattern {
    /// Индекс паттерна в текущей фазе
    pub pattern: usize,
    /// Текущий step
    pub step: usize,
    /// Время внутри step
    pub elapsed: f32,
    /// Instant действие step уже сработало
    pub fired: bool,
}

/// Runtime состояние босса
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct BossState {
    pub phase_index: usize,
    /// Максимальная достигнутая фаза (монотонный clamp)
    pub highest_phase: usize,
    /// Остаток phase transition (0 = не в transition)
    pub transition_timer: f32,
    pub running: Option<RunningPattern>,
}

impl BossState {
    pub fn in_transition(&self) -> bool {
        self.transition_timer > 0.0
    }

    /// Занят паттерном или transition — reactive FSM пропускает босса
    pub fn is_busy(&self) -> bool {
        self.in_transition() || self.running.is_some()
    }
}

/// Event: босс сменил фазу (для host UI / музыки)
#[derive(Event, Debug, Clone)]
pub struct PhaseChanged {
    pub boss: Entity,
    pub from: usize,
    pub to: usize,
}

/// System: тик transition таймера + phase lookup
pub fn boss_phase_transitions(
    mut commands: Commands,
    mut bosses: Query<(Entity, &Health, &BossPhases, &mut BossState)>,
    time: Res<Time<Fixed>>,
    mut phase_events: EventWriter<PhaseChanged>,
) {
    let delta = time.delta_secs();

    for (entity, health, phases, mut state) in bosses.iter_mut() {
        if !health.is_alive() {
            continue;
        }

        if state.transition_timer > 0.0 {
            state.transition_timer -= delta;
            if state.transition_timer <= 0.0 {
                state.transition_timer = 0.0;
                commands.entity(entity).remove::<Invulnerable>();
                crate::log(&format!(
                    "👹 Boss {:?} transition complete (phase {})",
                    entity, state.phase_index
                ));
            }
        }

        let pct = health.percent();
        let Some(found) = phases.find_phase(pct) else {
            crate::log_warning(&format!(
                "Boss {:?}: no phase covers {:.1}% health, ladder has a gap",
                entity, pct
            ));
            continue;
        };

        // Clamp к highest_phase: хил не возвращает раннюю фазу
        let target = found.max(state.highest_phase);
        if target == state.phase_index {
            continue;
        }

        let from = state.phase_index;
        state.phase_index = target;
        state.highest_phase = target;

        // Смена фазы отменяет бегущий паттерн и любой его step override
        state.running = None;
        commands.entity(entity).remove::<Invulnerable>();

        if let Some(transition) = &phases.0[target].transition {
            state.transition_timer = transition.duration;
            if transition.invulnerable {
                commands.entity(entity).insert(Invulnerable);
            }
            if let Some(message) = &transition.message {
                crate::log_info(&format!("👹 {}", message));
            }
        }

        phase_events.write(PhaseChanged {
            boss: entity,
            from,
            to: target,
        });

        crate::log_info(&format!(
            "👹 Boss {:?} phase {} → {} ({:.0}% hp)",
            entity, from, target, pct
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::pattern::PatternTier;

    fn three_band_ladder() -> BossPhases {
        let phase = |range| PhaseSpec {
            health_range: range,
            damage_modifier: 1.0,
            transition: None,
            patterns: vec![PatternSpec::new(
                "stub",
                PatternTier::Main,
                1.0,
                vec![],
            )],
        };

        BossPhases(vec![
            phase((100.0, 50.0)),
            phase((50.0, 20.0)),
            phase((20.0, 0.0)),
        ])
    }

    #[test]
    fn test_band_lookup() {
        let phases = three_band_ladder();

        assert_eq!(phases.find_phase(100.0), Some(0));
        assert_eq!(phases.find_phase(51.0), Some(0));
        assert_eq!(phases.find_phase(20.1), Some(1));
        assert_eq!(phases.find_phase(19.9), Some(2));
        assert_eq!(phases.find_phase(0.0), Some(2));
    }

    #[test]
    fn test_boundary_belongs_to_lower_phase() {
        // Ровно 50% — уже фаза 2
        let phases = three_band_ladder();
        assert_eq!(phases.find_phase(50.0), Some(1));
        assert_eq!(phases.find_phase(20.0), Some(2));
    }

    #[test]
    fn test_gap_returns_none() {
        let phases = BossPhases(vec![PhaseSpec {
            health_range: (100.0, 50.0),
            damage_modifier: 1.0,
            transition: None,
            patterns: vec![],
        }]);

        assert_eq!(phases.find_phase(40.0), None);
    }

    #[test]
    fn test_busy_flags() {
        let mut state = BossState::default();
        assert!(!state.is_busy());

        state.transition_timer = 2.0;
        assert!(state.is_busy());
        assert!(state.in_transition());

        state.transition_timer = 0.0;
        state.running = Some(RunningPattern::default());
        assert!(state.is_busy());
        assert!(!state.in_transition());
    }
}
