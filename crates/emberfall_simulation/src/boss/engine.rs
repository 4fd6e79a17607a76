//! Boss pattern engine: выбор паттерна и прогон step sequence
//!
//! Идущий босс (не в transition, без бегущего паттерна) каждый тик
//! пробует выбрать паттерн текущей фазы, если игрок в detection range.
//! Выбранный паттерн сразу уходит на cooldown и прогоняется step за
//! step: instant действия срабатывают один раз в первый тик шага,
//! Move действует непрерывно, invulnerable flag шага ставит/снимает
//! `Invulnerable` маркер.

use bevy::prelude::*;

use super::pattern::{select_pattern, StepAction};
use super::phase::{BossPhases, BossState, RunningPattern};
use crate::ai::AiConfig;
use crate::collision::{slide_move, CollisionMap};
use crate::combat::{
    emit_volley, BuffRequest, DamageInflicted, Invulnerable, ProjectileRequest, SummonRequest,
};
use crate::components::{Health, Hitbox, Player};
use crate::DeterministicRng;

/// Радиус кольца спавна миньонов вокруг босса
const SUMMON_RING_RADIUS: f32 = 60.0;

fn scaled_damage(base: u32, modifier: f32) -> u32 {
    ((base as f32 * modifier).floor() as u32).max(1)
}

/// System: тик cooldown таймеров всех паттернов
pub fn tick_pattern_cooldowns(mut query: Query<&mut BossPhases>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut phases in query.iter_mut() {
        for phase in phases.0.iter_mut() {
            for pattern in phase.patterns.iter_mut() {
                if pattern.cooldown_timer > 0.0 {
                    pattern.cooldown_timer = (pattern.cooldown_timer - delta).max(0.0);
                }
            }
        }
    }
}

/// System: weighted выбор паттерна для незанятого босса
pub fn boss_pattern_selection(
    mut commands: Commands,
    mut bosses: Query<
        (
            Entity,
            &Transform,
            &Health,
            &AiConfig,
            &mut BossPhases,
            &mut BossState,
        ),
        Without<Player>,
    >,
    players: Query<(&Transform, &Health), With<Player>>,
    mut det: ResMut<DeterministicRng>,
) {
    let Some((player_transform, player_health)) = players.iter().next() else {
        return;
    };
    if !player_health.is_alive() {
        return;
    }
    let player_pos = player_transform.translation.truncate();

    for (entity, transform, health, config, mut phases, mut state) in bosses.iter_mut() {
        if !health.is_alive() || state.is_busy() {
            continue;
        }

        let distance = transform.translation.truncate().distance(player_pos);
        if distance > config.detection_range {
            continue;
        }

        let phase_index = state.phase_index;
        let Some(index) = select_pattern(&phases.0[phase_index].patterns, &mut det.rng) else {
            // Всё на cooldown — reactive FSM ведёт босса до следующего тика
            continue;
        };

        let pattern = &mut phases.0[phase_index].patterns[index];
        pattern.cooldown_timer = pattern.cooldown;

        crate::log(&format!(
            "👹 Boss {:?} starts pattern '{}' ({:?}, {} steps)",
            entity,
            pattern.name,
            pattern.tier,
            pattern.steps.len()
        ));

        // Step override неуязвимости действует с первого тика
        if pattern.steps.first().is_some_and(|s| s.invulnerable) {
            commands.entity(entity).insert(Invulnerable);
        }

        state.running = Some(RunningPattern {
            pattern: index,
            step: 0,
            elapsed: 0.0,
            fired: false,
        });
    }
}

/// System: прогон бегущего паттерна
pub fn boss_pattern_execution(
    mut commands: Commands,
    mut bosses: Query<(Entity, &mut Transform, &Hitbox, &BossPhases, &mut BossState), Without<Player>>,
    players: Query<(Entity, &Transform, &Health), With<Player>>,
    map: Res<CollisionMap>,
    time: Res<Time<Fixed>>,
    mut damage_events: EventWriter<DamageInflicted>,
    mut projectile_events: EventWriter<ProjectileRequest>,
    mut summon_events: EventWriter<SummonRequest>,
    mut buff_events: EventWriter<BuffRequest>,
) {
    let delta = time.delta_secs();

    let Some((player_entity, player_transform, player_health)) = players.iter().next() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, mut transform, hitbox, phases, mut state) in bosses.iter_mut() {
        let phase_index = state.phase_index;
        let damage_modifier = phases.0[phase_index].damage_modifier;

        let mut finished = false;

        let Some(running) = state.running.as_mut() else {
            continue;
        };

        let Some(pattern) = phases.0[phase_index].patterns.get(running.pattern) else {
            // Скрипт сменился под бегущим паттерном — сбрасываем
            crate::log_warning(&format!(
                "Boss {:?}: running pattern index {} out of range, aborting",
                entity, running.pattern
            ));
            state.running = None;
            commands.entity(entity).remove::<Invulnerable>();
            continue;
        };

        let step = &pattern.steps[running.step];
        running.elapsed += delta;

        // Move действует каждый тик step
        if let StepAction::Move {
            speed,
            toward_player,
        } = step.action
        {
            let pos = transform.translation.truncate();
            let dir = if toward_player {
                player_pos - pos
            } else {
                pos - player_pos
            }
            .normalize_or_zero();
            slide_move(&mut transform, hitbox, dir * speed * delta, &map);
        }

        // Instant действия — ровно один раз за step
        if !running.fired {
            running.fired = true;

            match &step.action {
                StepAction::Telegraph | StepAction::Recovery | StepAction::Move { .. } => {}

                StepAction::Attack { damage, range } => {
                    let distance = transform.translation.truncate().distance(player_pos);
                    if distance <= *range && player_health.is_alive() {
                        damage_events.write(DamageInflicted {
                            attacker: entity,
                            target: player_entity,
                            amount: scaled_damage(*damage, damage_modifier),
                        });
                    }
                }

                StepAction::Aoe { damage, radius } => {
                    let distance = transform.translation.truncate().distance(player_pos);
                    if distance <= *radius && player_health.is_alive() {
                        damage_events.write(DamageInflicted {
                            attacker: entity,
                            target: player_entity,
                            amount: scaled_damage(*damage, damage_modifier),
                        });
                    }
                }

                StepAction::Projectile {
                    count,
                    speed,
                    damage,
                } => {
                    emit_volley(
                        &mut projectile_events,
                        entity,
                        transform.translation.truncate(),
                        player_pos,
                        *count,
                        *speed,
                        scaled_damage(*damage, damage_modifier),
                    );
                }

                StepAction::Summon { kind, count } => {
                    let origin = transform.translation.truncate();
                    let count = (*count).max(1);
                    for i in 0..count {
                        let angle = std::f32::consts::TAU * i as f32 / count as f32;
                        summon_events.write(SummonRequest {
                            owner: entity,
                            kind: *kind,
                            position: origin + Vec2::from_angle(angle) * SUMMON_RING_RADIUS,
                        });
                    }
                    crate::log(&format!(
                        "👹 Boss {:?} summons {} × {:?}",
                        entity, count, kind
                    ));
                }

                StepAction::Buff {
                    kind,
                    value,
                    duration,
                } => {
                    buff_events.write(BuffRequest::stacking_multiplier(
                        entity, *kind, *value, *duration,
                    ));
                }
            }
        }

        // Переход к следующему step
        if running.elapsed >= step.duration {
            let next = running.step + 1;
            if next >= pattern.steps.len() {
                finished = true;
            } else {
                running.step = next;
                running.elapsed = 0.0;
                running.fired = false;

                // Invulnerability override следует за шагом
                if pattern.steps[next].invulnerable {
                    commands.entity(entity).insert(Invulnerable);
                } else {
                    commands.entity(entity).remove::<Invulnerable>();
                }
            }
        }

        if finished {
            crate::log(&format!(
                "👹 Boss {:?} pattern '{}' complete",
                entity, pattern.name
            ));
            state.running = None;
            commands.entity(entity).remove::<Invulnerable>();
        }
    }
}
