//! CombatResolver — per-attacker combo/dodge/parry state
//!
//! Countdown-таймеры вместо wall-clock timestamps и отложенных
//! callbacks: каждое окно (combo timeout, dodge cooldown, dodge
//! invulnerability, parry window) — поле компонента, тикающее в
//! FixedUpdate. Компонент умирает вместе с entity, поэтому "таймер
//! сработал после despawn" невозможен по построению.

use bevy::prelude::*;
use rand::Rng;

use super::math;

/// Окно, в котором последовательные удары продолжают combo (секунды)
pub const COMBO_TIMEOUT: f32 = 2.0;

/// Cooldown между dodge (секунды)
pub const DODGE_COOLDOWN: f32 = 1.0;

/// Длительность dodge invulnerability окна
pub const DODGE_INVULN_DURATION: f32 = 0.4;

/// Длительность parry окна (короче dodge)
pub const PARRY_WINDOW: f32 = 0.15;

/// Per-attacker боевое состояние
///
/// Используется игроком; любой другой атакующий может навесить тот же
/// компонент и получить combo/dodge/parry дисциплину бесплатно.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CombatResolver {
    /// Число последовательных попаданий в текущем combo
    pub combo_count: u32,
    /// Остаток combo окна; 0 = следующий удар начинает новый combo
    pub combo_timer: f32,
    /// Остаток dodge cooldown; dodge доступен при 0
    pub dodge_cooldown_timer: f32,
    /// Остаток dodge invulnerability окна
    pub dodge_invuln_timer: f32,
    /// Остаток parry окна
    pub parry_window_timer: f32,
    /// Шанс crit для roll_attack (0.0–1.0)
    pub crit_chance: f64,
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self {
            combo_count: 0,
            combo_timer: 0.0,
            dodge_cooldown_timer: 0.0,
            dodge_invuln_timer: 0.0,
            parry_window_timer: 0.0,
            crit_chance: 0.1,
        }
    }
}

impl CombatResolver {
    /// Регистрирует попадание: продолжает combo внутри окна, иначе
    /// сбрасывает на 1. Возвращает новый счётчик.
    pub fn register_hit(&mut self) -> u32 {
        if self.combo_timer <= 0.0 {
            self.combo_count = 1;
        } else {
            self.combo_count += 1;
        }
        self.combo_timer = COMBO_TIMEOUT;
        self.combo_count
    }

    /// Полный attacker-side расчёт урона: combo + crit roll + backstab.
    /// Mitigation по defense цели делает damage gate, не attacker.
    pub fn roll_attack(&mut self, base_damage: u32, is_backstab: bool, rng: &mut impl Rng) -> u32 {
        let hits = self.register_hit();
        let is_crit = rng.gen_bool(self.crit_chance);
        math::attack_damage(base_damage, hits, is_crit, is_backstab)
    }

    /// Попытка dodge. На cooldown — отказ без изменения состояния.
    /// Успех открывает invulnerability окно и взводит cooldown.
    pub fn try_dodge(&mut self) -> bool {
        if self.dodge_cooldown_timer > 0.0 {
            return false;
        }
        self.dodge_cooldown_timer = DODGE_COOLDOWN;
        self.dodge_invuln_timer = DODGE_INVULN_DURATION;
        true
    }

    /// Попытка parry: окно короткое и не блокирует урон само по себе —
    /// host решает, что значит успешный parry внутри окна.
    pub fn try_parry(&mut self) -> bool {
        if self.parry_window_timer > 0.0 {
            return false;
        }
        self.parry_window_timer = PARRY_WINDOW;
        true
    }

    /// Канонический invulnerability источник для damage gate
    pub fn is_dodge_invulnerable(&self) -> bool {
        self.dodge_invuln_timer > 0.0
    }

    pub fn in_parry_window(&self) -> bool {
        self.parry_window_timer > 0.0
    }

    pub fn tick(&mut self, delta: f32) {
        self.combo_timer = (self.combo_timer - delta).max(0.0);
        self.dodge_cooldown_timer = (self.dodge_cooldown_timer - delta).max(0.0);
        self.dodge_invuln_timer = (self.dodge_invuln_timer - delta).max(0.0);
        self.parry_window_timer = (self.parry_window_timer - delta).max(0.0);
    }
}

/// System: тик всех resolver таймеров
pub fn tick_combat_resolvers(mut query: Query<&mut CombatResolver>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut resolver in query.iter_mut() {
        resolver.tick(delta);
    }
}
