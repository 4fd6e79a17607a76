//! Встроенные boss скрипты
//!
//! Скрипты — обычные данные (`Vec<PhaseSpec>` сериализуем), host может
//! грузить свои из файлов. Здесь reference скрипт для демо и тестов.

use super::pattern::{PatternSpec, PatternTier, StepAction, StepSpec};
use super::phase::{PhaseSpec, TransitionSpec};
use crate::combat::BuffKind;
use crate::components::EnemyKind;

/// Трёхфазный troll-boss: melee фаза → снаряды и призывы → enrage
pub fn ember_tyrant() -> Vec<PhaseSpec> {
    vec![
        // Фаза 1 (100–50%): медленные melee паттерны, большие punish окна
        PhaseSpec {
            health_range: (100.0, 50.0),
            damage_modifier: 1.0,
            transition: None,
            patterns: vec![
                PatternSpec::new(
                    "cleave",
                    PatternTier::Main,
                    3.0,
                    vec![
                        StepSpec::new(0.6, StepAction::Telegraph),
                        StepSpec::new(0.2, StepAction::Attack { damage: 24, range: 70.0 }),
                        StepSpec::new(1.0, StepAction::Recovery),
                    ],
                ),
                PatternSpec::new(
                    "lunge",
                    PatternTier::Filler,
                    2.0,
                    vec![
                        StepSpec::new(0.3, StepAction::Telegraph),
                        StepSpec::new(
                            0.5,
                            StepAction::Move {
                                speed: 180.0,
                                toward_player: true,
                            },
                        ),
                        StepSpec::new(0.15, StepAction::Attack { damage: 16, range: 55.0 }),
                        StepSpec::new(0.6, StepAction::Recovery),
                    ],
                ),
            ],
        },
        // Фаза 2 (50–20%): cinematic transition, снаряды и призывы
        PhaseSpec {
            health_range: (50.0, 20.0),
            damage_modifier: 1.2,
            transition: Some(TransitionSpec {
                duration: 2.0,
                invulnerable: true,
                message: Some("The tyrant's wounds ignite!".to_string()),
            }),
            patterns: vec![
                PatternSpec::new(
                    "ember volley",
                    PatternTier::Main,
                    3.5,
                    vec![
                        StepSpec::new(0.5, StepAction::Telegraph),
                        StepSpec::new(
                            0.2,
                            StepAction::Projectile {
                                count: 5,
                                speed: 240.0,
                                damage: 12,
                            },
                        ),
                        StepSpec::new(0.8, StepAction::Recovery),
                    ],
                ),
                PatternSpec::new(
                    "call the brood",
                    PatternTier::Special,
                    12.0,
                    vec![
                        StepSpec {
                            duration: 1.0,
                            invulnerable: true,
                            action: StepAction::Summon {
                                kind: EnemyKind::Goblin,
                                count: 3,
                            },
                        },
                        StepSpec::new(1.2, StepAction::Recovery),
                    ],
                ),
                PatternSpec::new(
                    "backstep",
                    PatternTier::Filler,
                    2.5,
                    vec![StepSpec::new(
                        0.5,
                        StepAction::Move {
                            speed: 150.0,
                            toward_player: false,
                        },
                    )],
                ),
            ],
        },
        // Фаза 3 (20–0%): enrage — бафф, кольцевой залп, AoE
        PhaseSpec {
            health_range: (20.0, 0.0),
            damage_modifier: 1.5,
            transition: Some(TransitionSpec {
                duration: 1.5,
                invulnerable: true,
                message: Some("Nothing will remain but ash!".to_string()),
            }),
            patterns: vec![
                PatternSpec::new(
                    "immolation",
                    PatternTier::Main,
                    4.0,
                    vec![
                        StepSpec::new(0.7, StepAction::Telegraph),
                        StepSpec::new(0.2, StepAction::Aoe { damage: 20, radius: 120.0 }),
                        StepSpec::new(0.9, StepAction::Recovery),
                    ],
                ),
                PatternSpec::new(
                    "ash nova",
                    PatternTier::Special,
                    9.0,
                    vec![
                        StepSpec {
                            duration: 0.8,
                            invulnerable: true,
                            action: StepAction::Telegraph,
                        },
                        StepSpec::new(
                            0.2,
                            StepAction::Projectile {
                                count: 8,
                                speed: 200.0,
                                damage: 14,
                            },
                        ),
                        StepSpec::new(1.2, StepAction::Recovery),
                    ],
                ),
                PatternSpec::new(
                    "burning fury",
                    PatternTier::Filler,
                    8.0,
                    vec![StepSpec::new(
                        0.6,
                        StepAction::Buff {
                            kind: BuffKind::AttackUp,
                            value: 1.3,
                            duration: 6.0,
                        },
                    )],
                ),
            ],
        },
    ]
}
