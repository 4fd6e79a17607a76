//! Reactive enemy FSM
//!
//! Конечный автомат обычных врагов: Patrol → Chase → Attack → Retreat.
//! Каждый тик оцениваются distance-to-player и health ratio; приоритет
//! (first match wins):
//! 1. Низкое здоровье (не boss) → Retreat
//! 2. В attack range → Attack (windup discipline)
//! 3. В detection range → Chase
//! 4. Иначе → Patrol
//!
//! Атака двухфазная: windup (telegraph, урона нет) → применение урона
//! ровно один раз по истечении windup. Боссы используют ту же FSM как
//! fallback между паттернами.

use bevy::prelude::*;
use rand::Rng;

use crate::boss::BossState;
use crate::collision::{slide_move, CollisionMap};
use crate::combat::DamageInflicted;
use crate::components::{Combatant, EnemyKind, Health, Hitbox, Player};
use crate::DeterministicRng;

/// Множитель скорости при бегстве
const RETREAT_SPEED_FACTOR: f32 = 1.5;

/// Flee-направление пересчитывается раз в секунду (не каждый кадр,
/// чтобы враг не дёргался)
const RETREAT_RETARGET_INTERVAL: f32 = 1.0;

/// Шанс начать patrol-паузу за тик
const PATROL_PAUSE_CHANCE: f64 = 0.01;

/// FSM состояния врага
///
/// Инвариант: ровно одно из четырёх значений.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum AiState {
    /// Патруль вокруг patrol center; иногда многосекундная пауза
    Patrol { pause_timer: f32 },

    /// Преследование игрока по прямой
    Chase,

    /// В радиусе атаки — windup discipline
    Attack,

    /// Бегство от игрока на 1.5× скорости
    Retreat {
        direction: Vec2,
        /// Остаток до пересчёта направления
        retarget_timer: f32,
    },
}

impl Default for AiState {
    fn default() -> Self {
        Self::Patrol { pause_timer: 0.0 }
    }
}

impl AiState {
    fn label(&self) -> &'static str {
        match self {
            AiState::Patrol { .. } => "patrol",
            AiState::Chase => "chase",
            AiState::Attack => "attack",
            AiState::Retreat { .. } => "retreat",
        }
    }
}

/// Параметры FSM (радиусы, flee threshold, патруль)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AiConfig {
    /// Радиус обнаружения игрока
    pub detection_range: f32,
    /// Радиус атаки
    pub attack_range: f32,
    /// Health ratio порог бегства; 0 = никогда не отступает (боссы)
    pub flee_health_threshold: f32,
    /// Центр патруля (точка спавна)
    pub patrol_center: Vec2,
    /// Радиус патруля
    pub patrol_radius: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            detection_range: 220.0,
            attack_range: 36.0,
            flee_health_threshold: 0.25,
            patrol_center: Vec2::ZERO,
            patrol_radius: 80.0,
        }
    }
}

/// Melee discipline: cooldown между атаками + длительность windup
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct MeleeAttacker {
    /// Cooldown между атаками (секунды)
    pub cooldown: f32,
    /// Текущий cooldown таймер (0 = готов)
    pub cooldown_timer: f32,
    /// Длительность windup (telegraph) перед уроном
    pub windup: f32,
}

impl Default for MeleeAttacker {
    fn default() -> Self {
        Self::new(1.0, 0.3)
    }
}

impl MeleeAttacker {
    pub fn new(cooldown: f32, windup: f32) -> Self {
        Self {
            cooldown,
            cooldown_timer: 0.0,
            windup,
        }
    }

    pub fn can_attack(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    pub fn start_cooldown(&mut self) {
        self.cooldown_timer = self.cooldown;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }
}

/// Windup в процессе: урона ещё нет, применится по истечении таймера
///
/// Компонент существует только пока `isWindingUp`; смерть владельца
/// снимает его вместе с таймером.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Windup {
    pub timer: f32,
}

impl Windup {
    pub fn new(duration: f32) -> Self {
        Self { timer: duration }
    }
}

/// System: тик melee cooldown таймеров
pub fn tick_melee_cooldowns(mut query: Query<&mut MeleeAttacker>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut melee in query.iter_mut() {
        melee.tick(delta);
    }
}

/// System: FSM transitions (приоритет first-match-wins)
///
/// Боссы, занятые паттерном или phase transition, пропускаются — их
/// ведёт pattern engine, reactive FSM включается только между
/// паттернами.
pub fn ai_state_transitions(
    mut enemies: Query<
        (
            Entity,
            &Transform,
            &Health,
            &AiConfig,
            &mut AiState,
            Option<&BossState>,
        ),
        Without<Player>,
    >,
    players: Query<&Transform, With<Player>>,
) {
    let Some(player_transform) = players.iter().next() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, transform, health, config, mut state, boss) in enemies.iter_mut() {
        // Труп и занятый боссы не решают
        if !health.is_alive() {
            continue;
        }
        if boss.is_some_and(|b| b.is_busy()) {
            continue;
        }

        let pos = transform.translation.truncate();
        let distance = pos.distance(player_pos);
        let ratio = health.ratio();

        let fleeing = config.flee_health_threshold > 0.0 && ratio <= config.flee_health_threshold;

        let new_state = if fleeing {
            match *state {
                // Уже бежим — сохраняем направление и retarget таймер
                AiState::Retreat { .. } => continue,
                _ => AiState::Retreat {
                    direction: (pos - player_pos).normalize_or_zero(),
                    retarget_timer: RETREAT_RETARGET_INTERVAL,
                },
            }
        } else if distance <= config.attack_range {
            AiState::Attack
        } else if distance <= config.detection_range {
            AiState::Chase
        } else {
            match *state {
                AiState::Patrol { .. } => continue,
                _ => AiState::Patrol { pause_timer: 0.0 },
            }
        };

        if *state != new_state {
            crate::log(&format!(
                "AI {:?}: {} → {} (dist {:.0}, hp {:.0}%)",
                entity,
                state.label(),
                new_state.label(),
                distance,
                ratio * 100.0
            ));
            *state = new_state;
        }
    }
}

/// System: движение из FSM state (per-axis collision, sliding)
pub fn ai_movement_from_state(
    mut enemies: Query<
        (
            &mut Transform,
            &Hitbox,
            &Combatant,
            &mut AiState,
            &AiConfig,
            Option<&BossState>,
        ),
        Without<Player>,
    >,
    players: Query<&Transform, With<Player>>,
    map: Res<CollisionMap>,
    time: Res<Time<Fixed>>,
    mut det: ResMut<DeterministicRng>,
) {
    let Some(player_transform) = players.iter().next() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();
    let delta = time.delta_secs();

    for (mut transform, hitbox, combatant, mut state, config, boss) in enemies.iter_mut() {
        if boss.is_some_and(|b| b.is_busy()) {
            continue;
        }

        let pos = transform.translation.truncate();

        match &mut *state {
            AiState::Patrol { pause_timer } => {
                if *pause_timer > 0.0 {
                    *pause_timer -= delta;
                    continue;
                }

                let from_center = pos - config.patrol_center;
                if from_center.length() > config.patrol_radius {
                    // Возвращаемся к центру патруля
                    let dir = -from_center.normalize_or_zero();
                    let step = dir * combatant.move_speed * delta;
                    slide_move(&mut transform, hitbox, step, &map);
                } else if det.rng.gen_bool(PATROL_PAUSE_CHANCE) {
                    // Многосекундная пауза на месте
                    *pause_timer = det.rng.gen_range(2.0..5.0);
                }
            }

            AiState::Chase => {
                let dir = (player_pos - pos).normalize_or_zero();
                let step = dir * combatant.move_speed * delta;
                slide_move(&mut transform, hitbox, step, &map);
            }

            AiState::Attack => {
                // Стоим на месте во время атаки
            }

            AiState::Retreat {
                direction,
                retarget_timer,
            } => {
                *retarget_timer -= delta;
                if *retarget_timer <= 0.0 {
                    *direction = (pos - player_pos).normalize_or_zero();
                    *retarget_timer = RETREAT_RETARGET_INTERVAL;
                }

                let step = *direction * combatant.move_speed * RETREAT_SPEED_FACTOR * delta;
                slide_move(&mut transform, hitbox, step, &map);
            }
        }
    }
}

/// System: старт windup в Attack state
///
/// Первый тик в радиусе с готовым cooldown взводит `Windup` — урона
/// ещё нет, это telegraph для игрока.
pub fn ai_attack_execution(
    mut commands: Commands,
    enemies: Query<
        (
            Entity,
            &AiState,
            &MeleeAttacker,
            Option<&Windup>,
            Option<&BossState>,
        ),
        Without<Player>,
    >,
) {
    for (entity, state, melee, windup, boss) in enemies.iter() {
        if boss.is_some_and(|b| b.is_busy()) {
            continue;
        }

        if matches!(state, AiState::Attack) && melee.can_attack() && windup.is_none() {
            commands.entity(entity).insert(Windup::new(melee.windup));
            crate::log(&format!(
                "⚔️ Windup started: {:?} ({:.2}s)",
                entity, melee.windup
            ));
        }
    }
}

/// System: завершение windup → урон ровно один раз
///
/// По истечении таймера: снять Windup, взвести cooldown, бросить
/// per-kind variance и отправить урон в очередь. Двойное применение
/// за один windup невозможно — компонент снимается в том же тике.
pub fn tick_attack_windups(
    mut commands: Commands,
    mut enemies: Query<
        (
            Entity,
            &mut Windup,
            &EnemyKind,
            &Combatant,
            &mut MeleeAttacker,
            Option<&BossState>,
        ),
        Without<Player>,
    >,
    players: Query<(Entity, &Health), With<Player>>,
    time: Res<Time<Fixed>>,
    mut det: ResMut<DeterministicRng>,
    mut damage_events: EventWriter<DamageInflicted>,
) {
    let delta = time.delta_secs();

    let Some((player_entity, player_health)) = players.iter().next() else {
        return;
    };

    for (entity, mut windup, kind, combatant, mut melee, boss) in enemies.iter_mut() {
        windup.timer -= delta;
        if windup.timer > 0.0 {
            continue;
        }

        commands.entity(entity).remove::<Windup>();
        melee.start_cooldown();

        // Мёртвого игрока не добиваем
        if !player_health.is_alive() {
            continue;
        }

        let amount = roll_damage_variance(*kind, combatant.attack, boss.is_some(), &mut det.rng);

        damage_events.write(DamageInflicted {
            attacker: entity,
            target: player_entity,
            amount,
        });

        crate::log(&format!(
            "⚔️ Windup complete: {:?} hits player for {} (pre-mitigation)",
            entity, amount
        ));
    }
}

/// Per-kind damage variance
///
/// goblin: 20% шанс ×1.5 | orc: 30% шанс ×2.0 | skeleton: flat ×1.1 |
/// troll: flat ×1.5 | wraith: uniform ×[0.8, 1.6]. Босс умножает
/// результат ещё на ×1.5.
pub fn roll_damage_variance(
    kind: EnemyKind,
    base: u32,
    is_boss: bool,
    rng: &mut impl Rng,
) -> u32 {
    let mut damage = base as f32;

    damage *= match kind {
        EnemyKind::Goblin => {
            if rng.gen_bool(0.2) {
                1.5
            } else {
                1.0
            }
        }
        EnemyKind::Orc => {
            if rng.gen_bool(0.3) {
                2.0
            } else {
                1.0
            }
        }
        EnemyKind::Skeleton => 1.1,
        EnemyKind::Troll => 1.5,
        EnemyKind::Wraith => rng.gen_range(0.8..1.6),
    };

    if is_boss {
        damage *= 1.5;
    }

    (damage.floor() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_melee_cooldown() {
        let mut melee = MeleeAttacker::new(1.0, 0.3);
        assert!(melee.can_attack());

        melee.start_cooldown();
        assert!(!melee.can_attack());

        melee.tick(0.5);
        assert!(!melee.can_attack());

        melee.tick(0.5);
        assert!(melee.can_attack());
    }

    #[test]
    fn test_default_state_is_patrol() {
        assert!(matches!(AiState::default(), AiState::Patrol { .. }));
    }

    #[test]
    fn test_flee_threshold_predicate() {
        let config = AiConfig {
            flee_health_threshold: 0.25,
            ..Default::default()
        };
        // ratio <= threshold → бегство
        assert!(0.25 <= config.flee_health_threshold);
        assert!(!(0.26 <= config.flee_health_threshold));

        // Boss config: threshold 0 — бегство недостижимо для живого
        let boss_config = AiConfig {
            flee_health_threshold: 0.0,
            ..Default::default()
        };
        assert!(!(boss_config.flee_health_threshold > 0.0));
    }

    #[test]
    fn test_goblin_variance_two_outcomes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let damage = roll_damage_variance(EnemyKind::Goblin, 8, false, &mut rng);
            assert!(damage == 8 || damage == 12, "unexpected goblin damage {}", damage);
        }
    }

    #[test]
    fn test_wraith_variance_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..1000 {
            let damage = roll_damage_variance(EnemyKind::Wraith, 10, false, &mut rng);
            // 10 × [0.8, 1.6) → floor ∈ [8, 15]
            assert!((8..=15).contains(&damage), "wraith damage {} out of range", damage);
        }
    }

    #[test]
    fn test_flat_variance_kinds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(roll_damage_variance(EnemyKind::Skeleton, 10, false, &mut rng), 11);
        assert_eq!(roll_damage_variance(EnemyKind::Troll, 10, false, &mut rng), 15);
    }

    #[test]
    fn test_boss_multiplier_applies_on_top() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        // Troll: 10 × 1.5 × 1.5 = 22.5 → 22
        assert_eq!(roll_damage_variance(EnemyKind::Troll, 10, true, &mut rng), 22);
    }

    #[test]
    fn test_variance_never_below_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            assert!(roll_damage_variance(EnemyKind::Wraith, 1, false, &mut rng) >= 1);
        }
    }
}
