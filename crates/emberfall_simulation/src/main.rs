//! Headless симуляция EMBERFALL
//!
//! Запускает боевое ядро без рендера: игрок, пара врагов и скриптовый
//! босс. Полезно для проверки детерминизма и просмотра combat лога.

use bevy::prelude::*;
use emberfall_simulation::boss::{scripts, spawn_boss, BossState};
use emberfall_simulation::{
    create_headless_app, spawn_enemy, spawn_player, step_simulation, Combatant, EnemyKind, Health,
    Player, SimulationPlugin,
};

fn main() {
    let seed = 42;
    println!("Starting EMBERFALL headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let world = app.world_mut();
    {
        let mut commands = world.commands();

        spawn_player(
            &mut commands,
            Vec2::ZERO,
            Combatant {
                attack: 12,
                defense: 3,
                move_speed: 90.0,
            },
        );
        spawn_enemy(&mut commands, EnemyKind::Goblin, Vec2::new(120.0, 0.0));
        spawn_enemy(&mut commands, EnemyKind::Skeleton, Vec2::new(-180.0, 90.0));
        spawn_boss(
            &mut commands,
            EnemyKind::Troll,
            Vec2::new(0.0, 260.0),
            scripts::ember_tyrant(),
        );
    }
    world.flush();

    // 60 секунд боя по 60 тиков в секунду
    for chunk in 0..36 {
        step_simulation(&mut app, 100);

        let entity_count = app.world().entities().len();
        println!("Tick {}: {} entities", (chunk + 1) * 100, entity_count);
    }

    let world = app.world_mut();

    let mut players = world.query_filtered::<&Health, With<Player>>();
    if let Some(health) = players.iter(world).next() {
        println!("Player HP: {}/{}", health.current, health.max);
    } else {
        println!("Player died and was despawned");
    }

    let mut bosses = world.query::<(&Health, &BossState)>();
    for (health, state) in bosses.iter(world) {
        println!(
            "Boss HP: {}/{} (phase {})",
            health.current, health.max, state.phase_index
        );
    }

    println!("Simulation complete!");
}
