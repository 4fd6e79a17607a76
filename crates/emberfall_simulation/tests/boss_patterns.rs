//! Boss engine integration test
//!
//! Phase ladder, transition invulnerability и step sequence на
//! headless App с фиксированными тиками.

use bevy::prelude::*;
use emberfall_simulation::boss::{spawn_boss, BossState};
use emberfall_simulation::*;

fn create_boss_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app
}

fn spawn_test_player(app: &mut App, position: Vec2) -> Entity {
    let player = spawn_player(
        &mut app.world_mut().commands(),
        position,
        Combatant {
            attack: 10,
            defense: 0,
            move_speed: 90.0,
        },
    );
    app.world_mut().flush();
    player
}

/// Трёхполосная лестница без transitions и паттернов (чистый phase lookup)
fn bands_only() -> Vec<PhaseSpec> {
    let band = |range| PhaseSpec {
        health_range: range,
        damage_modifier: 1.0,
        transition: None,
        patterns: vec![],
    };
    vec![band((100.0, 50.0)), band((50.0, 20.0)), band((20.0, 0.0))]
}

fn inflict(app: &mut App, attacker: Entity, target: Entity, amount: u32) {
    app.world_mut()
        .resource_mut::<Events<DamageInflicted>>()
        .send(DamageInflicted {
            attacker,
            target,
            amount,
        });
}

fn dealt_to(app: &App, target: Entity) -> Vec<DamageDealt> {
    app.world()
        .resource::<Events<DamageDealt>>()
        .iter_current_update_events()
        .filter(|e| e.target == target)
        .cloned()
        .collect()
}

/// Test: ровно 50% health — уже фаза 2 (полоса [50, 20))
#[test]
fn test_phase_advances_at_exact_boundary() {
    let mut app = create_boss_app(42);

    // Игрок далеко: боссом движет только phase lookup
    spawn_test_player(&mut app, Vec2::new(2000.0, 0.0));
    let boss = spawn_boss(
        &mut app.world_mut().commands(),
        EnemyKind::Troll,
        Vec2::ZERO,
        bands_only(),
    );
    app.world_mut().flush();

    step_simulation(&mut app, 1);
    assert_eq!(app.world().get::<BossState>(boss).unwrap().phase_index, 0);

    // Troll boss: 120 × 5 = 600 max → 300 = ровно 50%
    app.world_mut().get_mut::<Health>(boss).unwrap().current = 300;
    step_simulation(&mut app, 1);

    let state = app.world().get::<BossState>(boss).unwrap();
    assert_eq!(state.phase_index, 1);

    let events: Vec<PhaseChanged> = app
        .world()
        .resource::<Events<PhaseChanged>>()
        .iter_current_update_events()
        .cloned()
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].from, 0);
    assert_eq!(events[0].to, 1);
}

/// Test: burst урон может перепрыгнуть фазу (лестница идёт к найденной полосе)
#[test]
fn test_burst_damage_skips_to_matching_phase() {
    let mut app = create_boss_app(42);

    spawn_test_player(&mut app, Vec2::new(2000.0, 0.0));
    let boss = spawn_boss(
        &mut app.world_mut().commands(),
        EnemyKind::Troll,
        Vec2::ZERO,
        bands_only(),
    );
    app.world_mut().flush();

    // 60/600 = 10% → сразу фаза 3
    app.world_mut().get_mut::<Health>(boss).unwrap().current = 60;
    step_simulation(&mut app, 1);

    let state = app.world().get::<BossState>(boss).unwrap();
    assert_eq!(state.phase_index, 2);
    assert_eq!(state.highest_phase, 2);
}

/// Test: хил не откатывает фазу назад (clamp к highest_phase)
#[test]
fn test_heal_does_not_revert_phase() {
    let mut app = create_boss_app(42);

    spawn_test_player(&mut app, Vec2::new(2000.0, 0.0));
    let boss = spawn_boss(
        &mut app.world_mut().commands(),
        EnemyKind::Troll,
        Vec2::ZERO,
        bands_only(),
    );
    app.world_mut().flush();

    app.world_mut().get_mut::<Health>(boss).unwrap().current = 300;
    step_simulation(&mut app, 1);
    assert_eq!(app.world().get::<BossState>(boss).unwrap().phase_index, 1);

    app.world_mut().get_mut::<Health>(boss).unwrap().current = 600;
    step_simulation(&mut app, 10);
    assert_eq!(app.world().get::<BossState>(boss).unwrap().phase_index, 1);
}

/// Test: 2-секундный transition поглощает весь урон, после — снова уязвим
#[test]
fn test_transition_invulnerability_window() {
    let mut app = create_boss_app(42);

    let player = spawn_test_player(&mut app, Vec2::new(2000.0, 0.0));

    let phases = vec![
        PhaseSpec {
            health_range: (100.0, 50.0),
            damage_modifier: 1.0,
            transition: None,
            patterns: vec![],
        },
        PhaseSpec {
            health_range: (50.0, 0.0),
            damage_modifier: 1.0,
            transition: Some(TransitionSpec {
                duration: 2.0,
                invulnerable: true,
                message: Some("Enough!".to_string()),
            }),
            patterns: vec![],
        },
    ];

    let boss = spawn_boss(
        &mut app.world_mut().commands(),
        EnemyKind::Troll,
        Vec2::ZERO,
        phases,
    );
    app.world_mut().flush();

    // Входим в фазу 2 — transition стартует
    app.world_mut().get_mut::<Health>(boss).unwrap().current = 300;
    step_simulation(&mut app, 1);
    assert!(app.world().get::<BossState>(boss).unwrap().in_transition());
    assert!(app.world().get::<Invulnerable>(boss).is_some());

    // Урон внутри окна поглощён
    inflict(&mut app, player, boss, 50);
    step_simulation(&mut app, 1);
    assert_eq!(app.world().get::<Health>(boss).unwrap().current, 300);
    assert!(dealt_to(&app, boss).is_empty());

    // Прогоняем остаток transition (2s = 120 тиков)
    step_simulation(&mut app, 130);
    assert!(!app.world().get::<BossState>(boss).unwrap().in_transition());
    assert!(app.world().get::<Invulnerable>(boss).is_none());

    // Теперь урон проходит: 50 − defense 12 = 38
    inflict(&mut app, player, boss, 50);
    step_simulation(&mut app, 1);
    assert_eq!(app.world().get::<Health>(boss).unwrap().current, 262);
    assert_eq!(dealt_to(&app, boss).len(), 1);
}

/// Test: паттерн прогоняет steps по таймингу — telegraph без урона,
/// attack step бьёт один раз, cooldown не даёт повторить
#[test]
fn test_pattern_fires_attack_step_once() {
    let mut app = create_boss_app(42);

    let player = spawn_test_player(&mut app, Vec2::new(150.0, 0.0));

    let phases = vec![PhaseSpec {
        health_range: (100.0, 0.0),
        damage_modifier: 1.0,
        transition: None,
        patterns: vec![PatternSpec::new(
            "smash",
            PatternTier::Main,
            10.0,
            vec![
                StepSpec::new(0.5, StepAction::Telegraph),
                StepSpec::new(
                    0.2,
                    StepAction::Attack {
                        damage: 30,
                        range: 1000.0,
                    },
                ),
                StepSpec::new(1.0, StepAction::Recovery),
            ],
        )],
    }];

    spawn_boss(
        &mut app.world_mut().commands(),
        EnemyKind::Troll,
        Vec2::ZERO,
        phases,
    );
    app.world_mut().flush();

    // Telegraph: 0.5s без урона
    step_simulation(&mut app, 25);
    assert!(dealt_to(&app, player).is_empty());

    // Attack step сработал ровно один раз
    step_simulation(&mut app, 25);
    let hits = dealt_to(&app, player);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].damage, 30);

    // Паттерн завершён, cooldown 10s — повторных ударов нет
    step_simulation(&mut app, 60);
    assert_eq!(dealt_to(&app, player).len(), 1);
}

/// Test: step-level неуязвимость — telegraph защищён, recovery наказуем
#[test]
fn test_recovery_step_is_punish_window() {
    let mut app = create_boss_app(42);

    let player = spawn_test_player(&mut app, Vec2::new(200.0, 0.0));

    let phases = vec![PhaseSpec {
        health_range: (100.0, 0.0),
        damage_modifier: 1.0,
        transition: None,
        patterns: vec![PatternSpec::new(
            "guarded slam",
            PatternTier::Main,
            30.0,
            vec![
                StepSpec {
                    duration: 1.0,
                    invulnerable: true,
                    action: StepAction::Telegraph,
                },
                StepSpec::new(1.0, StepAction::Recovery),
            ],
        )],
    }];

    let boss = spawn_boss(
        &mut app.world_mut().commands(),
        EnemyKind::Troll,
        Vec2::ZERO,
        phases,
    );
    app.world_mut().flush();

    // Внутри неуязвимого telegraph step
    step_simulation(&mut app, 10);
    inflict(&mut app, player, boss, 50);
    step_simulation(&mut app, 1);
    assert_eq!(app.world().get::<Health>(boss).unwrap().current, 600);

    // Recovery step (после 1.0s = 60 тиков) — окно для punish
    step_simulation(&mut app, 60);
    assert!(app.world().get::<Invulnerable>(boss).is_none());

    inflict(&mut app, player, boss, 50);
    step_simulation(&mut app, 1);
    assert_eq!(app.world().get::<Health>(boss).unwrap().current, 562);
}

/// Test: damage_modifier фазы масштабирует урон паттерна
#[test]
fn test_phase_damage_modifier_scales_pattern() {
    let mut app = create_boss_app(42);

    let player = spawn_test_player(&mut app, Vec2::new(150.0, 0.0));

    let phases = vec![PhaseSpec {
        health_range: (100.0, 0.0),
        damage_modifier: 1.5,
        transition: None,
        patterns: vec![PatternSpec::new(
            "heavy smash",
            PatternTier::Main,
            10.0,
            vec![StepSpec::new(
                0.2,
                StepAction::Attack {
                    damage: 20,
                    range: 1000.0,
                },
            )],
        )],
    }];

    spawn_boss(
        &mut app.world_mut().commands(),
        EnemyKind::Troll,
        Vec2::ZERO,
        phases,
    );
    app.world_mut().flush();

    step_simulation(&mut app, 15);
    let hits = dealt_to(&app, player);
    assert_eq!(hits.len(), 1);
    // 20 × 1.5 = 30, защита игрока 0
    assert_eq!(hits[0].damage, 30);
}

/// Test: projectile step публикует веер в ProjectileRequest очередь
#[test]
fn test_projectile_step_emits_volley() {
    let mut app = create_boss_app(42);

    spawn_test_player(&mut app, Vec2::new(150.0, 0.0));

    let phases = vec![PhaseSpec {
        health_range: (100.0, 0.0),
        damage_modifier: 1.0,
        transition: None,
        patterns: vec![PatternSpec::new(
            "volley",
            PatternTier::Main,
            10.0,
            vec![StepSpec::new(
                0.2,
                StepAction::Projectile {
                    count: 5,
                    speed: 240.0,
                    damage: 12,
                },
            )],
        )],
    }];

    let boss = spawn_boss(
        &mut app.world_mut().commands(),
        EnemyKind::Troll,
        Vec2::ZERO,
        phases,
    );
    app.world_mut().flush();

    step_simulation(&mut app, 5);

    let requests: Vec<ProjectileRequest> = app
        .world()
        .resource::<Events<ProjectileRequest>>()
        .iter_current_update_events()
        .cloned()
        .collect();

    assert_eq!(requests.len(), 5);
    for request in &requests {
        assert_eq!(request.owner, boss);
        assert_eq!(request.damage, 12);
    }

    // Веер шириной π/3, центр смотрит на игрока (angle 0)
    let width = requests.last().unwrap().angle - requests.first().unwrap().angle;
    assert!((width - std::f32::consts::FRAC_PI_3).abs() < 1e-5);
}
