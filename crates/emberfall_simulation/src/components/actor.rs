//! Базовые компоненты бойцов: Health, Combatant, Hitbox, enemy archetypes
//!
//! Игрок и враги используют один stat block (`Combatant`); поведение
//! подключается отдельно (reactive FSM или boss pattern engine) —
//! composition вместо наследования Boss ← Enemy.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{AiConfig, AiState, MeleeAttacker};

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max. Вне явных heal-эффектов current
/// только убывает; смерть = current == 0.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Доля здоровья в [0, 1]
    pub fn ratio(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    /// Процент здоровья в [0, 100] (для boss phase lookup)
    pub fn percent(&self) -> f32 {
        self.ratio() * 100.0
    }
}

/// Общий stat block атакующего/защищающегося
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Combatant {
    /// Базовый урон (до variance/combo/crit)
    pub attack: u32,
    /// Защита: входящий урон уменьшается на defense, минимум 1
    pub defense: u32,
    /// Скорость перемещения (units/sec)
    pub move_speed: f32,
}

impl Default for Combatant {
    fn default() -> Self {
        Self {
            attack: 10,
            defense: 0,
            move_speed: 60.0,
        }
    }
}

/// AABB hitbox (центр = Transform.translation.xy)
///
/// Используется для collision-gated движения через `CollisionMap`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
}

impl Default for Hitbox {
    fn default() -> Self {
        Self {
            width: 24.0,
            height: 24.0,
        }
    }
}

/// Архетип врага — задаёт базовые статы и правила damage variance
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum EnemyKind {
    #[default]
    Goblin,
    Orc,
    Skeleton,
    Troll,
    Wraith,
}

/// Базовые статы архетипа (до boss scaling)
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeStats {
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub move_speed: f32,
    pub hitbox: (f32, f32),
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub windup: f32,
    pub flee_health_threshold: f32,
}

impl EnemyKind {
    pub fn stats(self) -> ArchetypeStats {
        match self {
            EnemyKind::Goblin => ArchetypeStats {
                max_health: 50,
                attack: 8,
                defense: 2,
                move_speed: 70.0,
                hitbox: (22.0, 22.0),
                detection_range: 220.0,
                attack_range: 36.0,
                attack_cooldown: 1.0,
                windup: 0.3,
                flee_health_threshold: 0.25,
            },
            EnemyKind::Orc => ArchetypeStats {
                max_health: 80,
                attack: 12,
                defense: 4,
                move_speed: 55.0,
                hitbox: (30.0, 30.0),
                detection_range: 200.0,
                attack_range: 42.0,
                attack_cooldown: 1.4,
                windup: 0.4,
                flee_health_threshold: 0.2,
            },
            EnemyKind::Skeleton => ArchetypeStats {
                max_health: 40,
                attack: 10,
                defense: 1,
                move_speed: 65.0,
                hitbox: (24.0, 28.0),
                detection_range: 240.0,
                attack_range: 38.0,
                attack_cooldown: 1.1,
                windup: 0.25,
                flee_health_threshold: 0.15,
            },
            EnemyKind::Troll => ArchetypeStats {
                max_health: 120,
                attack: 15,
                defense: 6,
                move_speed: 40.0,
                hitbox: (40.0, 44.0),
                detection_range: 180.0,
                attack_range: 48.0,
                attack_cooldown: 1.8,
                windup: 0.55,
                flee_health_threshold: 0.1,
            },
            EnemyKind::Wraith => ArchetypeStats {
                max_health: 60,
                attack: 11,
                defense: 0,
                move_speed: 85.0,
                hitbox: (26.0, 32.0),
                detection_range: 260.0,
                attack_range: 40.0,
                attack_cooldown: 1.2,
                windup: 0.35,
                flee_health_threshold: 0.3,
            },
        }
    }

    /// Boss scaling: health ×5, attack ×2, defense ×2, hitbox/ranges шире,
    /// cooldown короче, windup длиннее (больше времени на реакцию),
    /// flee threshold = 0 — боссы не отступают.
    pub fn boss_stats(self) -> ArchetypeStats {
        let base = self.stats();
        ArchetypeStats {
            max_health: base.max_health * 5,
            attack: base.attack * 2,
            defense: base.defense * 2,
            move_speed: base.move_speed * 0.9,
            hitbox: (base.hitbox.0 * 1.6, base.hitbox.1 * 1.6),
            detection_range: base.detection_range * 1.5,
            attack_range: base.attack_range * 1.4,
            attack_cooldown: base.attack_cooldown * 0.7,
            windup: base.windup * 1.5,
            flee_health_threshold: 0.0,
        }
    }
}

/// Spawn обычного врага (reactive FSM, без boss scripting)
///
/// Patrol center = точка спавна.
pub fn spawn_enemy(commands: &mut Commands, kind: EnemyKind, position: Vec2) -> Entity {
    let stats = kind.stats();
    spawn_with_stats(commands, kind, position, stats)
}

pub(crate) fn spawn_with_stats(
    commands: &mut Commands,
    kind: EnemyKind,
    position: Vec2,
    stats: ArchetypeStats,
) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            Health::new(stats.max_health),
            Combatant {
                attack: stats.attack,
                defense: stats.defense,
                move_speed: stats.move_speed,
            },
            Hitbox {
                width: stats.hitbox.0,
                height: stats.hitbox.1,
            },
            kind,
            AiState::default(),
            AiConfig {
                detection_range: stats.detection_range,
                attack_range: stats.attack_range,
                flee_health_threshold: stats.flee_health_threshold,
                patrol_center: position,
                patrol_radius: 80.0,
            },
            MeleeAttacker::new(stats.attack_cooldown, stats.windup),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100);
        assert_eq!(health.current, 100);

        health.take_damage(30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        health.take_damage(100); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_ratio_percent() {
        let mut health = Health::new(200);
        health.take_damage(100);
        assert_eq!(health.ratio(), 0.5);
        assert_eq!(health.percent(), 50.0);
    }

    #[test]
    fn test_heal_clamped_to_max() {
        let mut health = Health::new(100);
        health.take_damage(40);
        health.heal(25);
        assert_eq!(health.current, 85);

        health.heal(100);
        assert_eq!(health.current, 100);
    }

    #[test]
    fn test_boss_scaling() {
        let base = EnemyKind::Goblin.stats();
        let boss = EnemyKind::Goblin.boss_stats();

        assert_eq!(boss.max_health, base.max_health * 5);
        assert_eq!(boss.attack, base.attack * 2);
        assert_eq!(boss.defense, base.defense * 2);
        assert!(boss.attack_cooldown < base.attack_cooldown);
        assert!(boss.windup > base.windup);
        assert_eq!(boss.flee_health_threshold, 0.0);
    }

    #[test]
    fn test_goblin_reference_stats() {
        // Reference values из баланса: goblin 50/8/2
        let stats = EnemyKind::Goblin.stats();
        assert_eq!(stats.max_health, 50);
        assert_eq!(stats.attack, 8);
        assert_eq!(stats.defense, 2);
    }
}
