//! Boss patterns: data-driven атаки с tier weighting
//!
//! Паттерн = именованная последовательность timed steps. Выбор паттерна
//! взвешен по tier: Main 60%, Filler 30%, Special 10%. Если в выпавшем
//! tier нет готового паттерна (cooldown), выбор проваливается вниз по
//! списку Main → Filler → Special до первого непустого.
//!
//! Структуры сериализуемы — boss скрипты можно держать в data файлах.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::BuffKind;
use crate::components::EnemyKind;

/// Вес Main tier при броске
pub const MAIN_WEIGHT: f64 = 0.6;
/// Вес Filler tier (суммарно с Main даёт 0.9)
pub const FILLER_WEIGHT: f64 = 0.3;

/// Tier паттерна для weighted selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternTier {
    Main,
    Filler,
    Special,
}

/// Действие одного step
///
/// Instant действия (Attack, Aoe, Projectile, Summon, Buff) срабатывают
/// ровно один раз в первый тик step; Move действует каждый тик всей
/// длительности; Telegraph и Recovery — чистые паузы.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StepAction {
    /// Телеграф без урона (окно для dodge)
    Telegraph,
    /// Melee удар по игроку, если тот в range
    Attack { damage: u32, range: f32 },
    /// Движение к игроку / от игрока на время step
    Move { speed: f32, toward_player: bool },
    /// Залп снарядов: 1 = прицельный, 2-5 = веер, 6+ = полный круг
    Projectile { count: u32, speed: f32, damage: u32 },
    /// Призыв миньонов (host осушает SummonRequest очередь)
    Summon { kind: EnemyKind, count: u32 },
    /// Self-buff через BuffRequest seam
    Buff { kind: BuffKind, value: f32, duration: f32 },
    /// Урон по площади вокруг босса
    Aoe { damage: u32, radius: f32 },
    /// Уязвимое окно после паттерна (punish window)
    Recovery,
}

/// Один шаг паттерна
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    /// Длительность шага (секунды)
    pub duration: f32,
    /// Override неуязвимости на время шага
    #[serde(default)]
    pub invulnerable: bool,
    pub action: StepAction,
}

impl StepSpec {
    pub fn new(duration: f32, action: StepAction) -> Self {
        Self {
            duration,
            invulnerable: false,
            action,
        }
    }
}

/// Паттерн босса: tier, cooldown, последовательность шагов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSpec {
    pub name: String,
    pub tier: PatternTier,
    /// Cooldown после запуска (секунды)
    pub cooldown: f32,
    /// Runtime остаток cooldown — не сериализуется
    #[serde(skip)]
    pub cooldown_timer: f32,
    pub steps: Vec<StepSpec>,
}

impl PatternSpec {
    pub fn new(name: &str, tier: PatternTier, cooldown: f32, steps: Vec<StepSpec>) -> Self {
        Self {
            name: name.to_string(),
            tier,
            cooldown,
            cooldown_timer: 0.0,
            steps,
        }
    }

    pub fn ready(&self) -> bool {
        self.cooldown_timer <= 0.0 && !self.steps.is_empty()
    }

    pub fn total_duration(&self) -> f32 {
        self.steps.iter().map(|s| s.duration).sum()
    }
}

fn rolled_tier(roll: f64) -> PatternTier {
    if roll < MAIN_WEIGHT {
        PatternTier::Main
    } else if roll < MAIN_WEIGHT + FILLER_WEIGHT {
        PatternTier::Filler
    } else {
        PatternTier::Special
    }
}

fn pick_from_tier(
    patterns: &[PatternSpec],
    tier: PatternTier,
    rng: &mut impl Rng,
) -> Option<usize> {
    let eligible: Vec<usize> = patterns
        .iter()
        .enumerate()
        .filter(|(_, p)| p.tier == tier && p.ready())
        .map(|(i, _)| i)
        .collect();

    match eligible.len() {
        0 => None,
        1 => Some(eligible[0]),
        n => Some(eligible[rng.gen_range(0..n)]),
    }
}

/// Weighted выбор паттерна из текущей фазы
///
/// Возвращает индекс в `patterns` или None (всё на cooldown — босс
/// остаётся на reactive FSM до следующего тика).
pub fn select_pattern(patterns: &[PatternSpec], rng: &mut impl Rng) -> Option<usize> {
    let rolled = rolled_tier(rng.gen::<f64>());

    if let Some(index) = pick_from_tier(patterns, rolled, rng) {
        return Some(index);
    }

    // Fall-through сверху вниз до первого tier с готовым паттерном
    for tier in [PatternTier::Main, PatternTier::Filler, PatternTier::Special] {
        if tier == rolled {
            continue;
        }
        if let Some(index) = pick_from_tier(patterns, tier, rng) {
            return Some(index);
        }
    }

    None
}
