//! EMBERFALL Simulation Core
//!
//! Headless ECS-симуляция боевой логики на Bevy 0.16.
//! Библиотека покрывает combat-AI ядро action-RPG:
//! - Reactive enemy FSM (patrol → chase → attack → retreat)
//! - Boss pattern engine (phases, weighted patterns, timed steps)
//! - Combat math / resolver (combo, crit, backstab, dodge/parry)
//!
//! Host loop (рендер, ввод, коллизии, снаряды) живёт снаружи и общается
//! с ядром через events и ресурс `CollisionMap`.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod boss;
pub mod collision;
pub mod combat;
pub mod components;

// Re-export базовых типов для удобства
pub use ai::{AiConfig, AiPlugin, AiState, MeleeAttacker, Windup};
pub use boss::{
    BossPhases, BossPlugin, BossState, PatternSpec, PatternTier, PhaseChanged, PhaseSpec,
    StepAction, StepSpec, TransitionSpec,
};
pub use collision::{CollisionMap, CollisionQuery};
pub use combat::{
    BuffKind, BuffRequest, CombatPlugin, CombatResolver, DamageDealt, DamageInflicted, Dead,
    DespawnAfter, EntityDied, Invulnerable, ProjectileRequest, SummonRequest,
};
pub use components::*;

/// Глобальный порядок систем внутри FixedUpdate.
///
/// Один кадр = один проход: таймеры → boss scripting → reactive AI →
/// применение урона → смерть. Урон копится как события и применяется
/// в единственной точке (`Resolve`), поэтому записи в health игрока
/// сериализованы даже при multi_threaded executor.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Cooldown/window таймеры (melee, resolver, pattern cooldowns)
    Timers,
    /// Boss phase transitions, pattern selection, sequence execution
    Boss,
    /// Reactive FSM: transitions, movement, attack windup
    Ai,
    /// Единственная точка применения урона (invulnerability gate)
    Resolve,
    /// Death handling + отложенный despawn
    Death,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        // Детерминистичный RNG: не перетираем seed, если host уже вставил свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        // Host-supplied collision map (default: открытый мир без стен)
        app.init_resource::<CollisionMap>();

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Timers,
                SimulationSet::Boss,
                SimulationSet::Ai,
                SimulationSet::Resolve,
                SimulationSet::Death,
            )
                .chain(),
        );

        app.add_plugins((CombatPlugin, AiPlugin, BossPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Все стохастические решения ядра (damage variance, выбор паттернов,
/// patrol-паузы, crit rolls) тянут из него — tests прокидывают seed.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Прогоняет ровно `ticks` фиксированных тиков симуляции.
///
/// Часы двигаем вручную на один timestep за тик вместо `app.update()`:
/// wall clock не участвует, тик всегда ровно 1/60 s, тесты полностью
/// детерминированы по количеству тиков.
pub fn step_simulation(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        let timestep = app.world().resource::<Time<Fixed>>().timestep();
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(timestep);
        app.world_mut().run_schedule(FixedUpdate);
    }
}

// ============================================================================
// Logger (pluggable, host может подменить printer)
// ============================================================================

use once_cell::sync::Lazy;
use std::sync::Mutex;

// Потокобезопасный глобальный logger
static LOGGER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));

static MIN_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait LogPrinter: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

pub fn set_logger(logger: Box<dyn LogPrinter>) {
    *LOGGER.lock().unwrap() = Some(logger);
}

pub fn set_log_level(level: LogLevel) {
    *MIN_LEVEL.lock().unwrap() = level;
}

pub fn set_logger_if_needed(logger: Box<dyn LogPrinter>) {
    if LOGGER.lock().unwrap().is_none() {
        set_logger(logger);
    }
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    if level < *MIN_LEVEL.lock().unwrap() {
        return;
    }
    // Timestamp добавляем здесь, не в printer
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        logger.log(level, &format!("[{}] {}", timestamp, message));
    }
}

struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleLogger));
}
