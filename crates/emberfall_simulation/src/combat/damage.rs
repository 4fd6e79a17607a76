//! Damage gate и death lifecycle
//!
//! Весь урон в игре — `DamageInflicted` события, осушаемые одной
//! системой `resolve_damage` (сериализованная очередь мутаций health).
//! Перед применением всегда проверяется invulnerability gate: активное
//! dodge окно, boss phase-transition invulnerability или step override.
//! Частично применённого урона не существует.

use bevy::prelude::*;

use super::math;
use super::resolver::CombatResolver;
use crate::components::{Combatant, Health};

/// Событие: атака направлена в цель (attacker-side урон, до mitigation)
///
/// Генерируют: enemy windup completion, boss pattern steps, player
/// strikes со стороны host. Gate и defense применяет `resolve_damage`.
#[derive(Event, Debug, Clone)]
pub struct DamageInflicted {
    pub attacker: Entity,
    pub target: Entity,
    /// Урон после variance/combo/crit, до defense
    pub amount: u32,
}

/// Событие: урон применён к Health
///
/// Для UI, floating damage numbers, camera shake. AI-логика на него
/// не подписана.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Событие: entity умер (health == 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Marker: неуязвимость (boss phase transition или pattern step override)
///
/// Dodge invulnerability живёт в `CombatResolver` и проверяется gate
/// отдельно. Инвариант: маркер ставит ровно один владелец за раз —
/// phase transition отменяет бегущий паттерн вместе с его override.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Invulnerable;

/// Marker: entity мертв (health == 0)
///
/// Труп остаётся до истечения `DespawnAfter` (death animation у host).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Отложенный despawn после смерти
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    pub timer: f32,
}

impl DespawnAfter {
    pub fn new(seconds: f32) -> Self {
        Self { timer: seconds }
    }
}

/// Invulnerability gate — единственная проверка перед любым уроном
pub fn is_damage_gated(invulnerable: Option<&Invulnerable>, resolver: Option<&CombatResolver>) -> bool {
    invulnerable.is_some() || resolver.is_some_and(|r| r.is_dodge_invulnerable())
}

/// System: применение урона из очереди событий
///
/// 1. Gate check (Invulnerable marker / dodge окно) — полное поглощение
/// 2. Mitigation по defense цели (`max(1, amount - defense)`)
/// 3. `Health::take_damage` + `DamageDealt`/`EntityDied` события
pub fn resolve_damage(
    mut inflicted_events: EventReader<DamageInflicted>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
    mut targets: Query<(
        &mut Health,
        Option<&Combatant>,
        Option<&CombatResolver>,
        Option<&Invulnerable>,
    )>,
) {
    for hit in inflicted_events.read() {
        // Self-hit не должен существовать
        if hit.attacker == hit.target {
            crate::log_warning(&format!(
                "Self-hit dropped (entity {:?}, amount {})",
                hit.attacker, hit.amount
            ));
            continue;
        }

        let Ok((mut health, stats, resolver, invulnerable)) = targets.get_mut(hit.target) else {
            crate::log_warning(&format!(
                "DamageInflicted: target {:?} has no Health component",
                hit.target
            ));
            continue;
        };

        // Труп урона не получает
        if !health.is_alive() {
            continue;
        }

        // Invulnerability gate: dodge окно / phase transition / step override
        if is_damage_gated(invulnerable, resolver) {
            crate::log(&format!(
                "🛡️ Damage absorbed by invulnerability (target {:?}, amount {})",
                hit.target, hit.amount
            ));
            continue;
        }

        let defense = stats.map_or(0, |c| c.defense);
        let damage = math::mitigate(hit.amount, defense);

        health.take_damage(damage);
        let target_died = !health.is_alive();

        dealt_events.write(DamageDealt {
            attacker: hit.attacker,
            target: hit.target,
            damage,
            target_died,
        });

        crate::log(&format!(
            "💥 Damage dealt: {:?} → {:?} ({} dmg, HP: {}/{})",
            hit.attacker, hit.target, damage, health.current, health.max
        ));

        if target_died {
            died_events.write(EntityDied {
                entity: hit.target,
                killer: Some(hit.attacker),
            });

            crate::log_info(&format!(
                "Entity {:?} killed by {:?}",
                hit.target, hit.attacker
            ));
        }
    }
}

/// System: снятие боевых компонентов при смерти
///
/// Вместе с AI/boss state уходят и их таймеры (windup, transition,
/// pattern) — ничего не "дотикает" после смерти владельца.
pub fn clear_combat_state_on_death(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
) {
    for event in death_events.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands
                .remove::<crate::ai::AiState>()
                .remove::<crate::ai::Windup>()
                .remove::<crate::boss::BossState>()
                .remove::<Invulnerable>()
                .insert((Dead, DespawnAfter::new(5.0)));

            crate::log(&format!("Cleared combat state for dead entity {:?}", event.entity));
        }
    }
}

/// System: despawn трупов по таймеру
pub fn despawn_after_timeout(
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut despawn) in query.iter_mut() {
        despawn.timer -= delta;
        if despawn.timer <= 0.0 {
            commands.entity(entity).despawn();
            crate::log(&format!("Despawned corpse {:?}", entity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_open_by_default() {
        assert!(!is_damage_gated(None, None));

        let resolver = CombatResolver::default();
        assert!(!is_damage_gated(None, Some(&resolver)));
    }

    #[test]
    fn test_gate_closed_by_marker() {
        assert!(is_damage_gated(Some(&Invulnerable), None));
    }

    #[test]
    fn test_gate_closed_by_dodge_window() {
        let mut resolver = CombatResolver::default();
        assert!(resolver.try_dodge());
        assert!(is_damage_gated(None, Some(&resolver)));

        // Окно истекло — gate снова открыт
        resolver.tick(10.0);
        assert!(!is_damage_gated(None, Some(&resolver)));
    }

    #[test]
    fn test_despawn_after_timer() {
        let despawn = DespawnAfter::new(5.0);
        assert_eq!(despawn.timer, 5.0);
    }
}
