//! Projectile / summon collaborator seam
//!
//! Снаряды не живут в ECS ядра: физика, homing и collision — на стороне
//! host. Ядро принимает strategic decision ("boss стреляет веером из 5")
//! и публикует fire-and-forget события; host осушает очередь и спавнит
//! реальные снаряды. Неосушенная очередь = пропавший визуальный эффект,
//! не ошибка.

use bevy::prelude::*;

use crate::components::EnemyKind;

/// Суммарный угол веера для 2–5 снарядов (радианы)
pub const FAN_SPREAD: f32 = std::f32::consts::FRAC_PI_3;

/// Event: запрос на спавн снаряда (ядро → host)
#[derive(Event, Debug, Clone)]
pub struct ProjectileRequest {
    pub owner: Entity,
    pub origin: Vec2,
    /// Направление полёта (радианы, от +X против часовой)
    pub angle: f32,
    pub speed: f32,
    pub damage: u32,
}

/// Event: запрос на призыв миньона (ядро → host loop)
///
/// Вставка в enemy list — ответственность host между кадрами; ядро
/// только сообщает kind и позицию.
#[derive(Event, Debug, Clone)]
pub struct SummonRequest {
    pub owner: Entity,
    pub kind: EnemyKind,
    pub position: Vec2,
}

/// Углы залпа из `count` снарядов, прицел по `aim`:
/// - 1 → одиночный прицельный выстрел
/// - 2–5 → веер шириной `FAN_SPREAD` с центром в `aim`
/// - 6+ → полный круг
pub fn volley_angles(aim: f32, count: u32) -> Vec<f32> {
    match count {
        0 | 1 => vec![aim],
        2..=5 => {
            let step = FAN_SPREAD / (count - 1) as f32;
            let start = aim - FAN_SPREAD / 2.0;
            (0..count).map(|i| start + step * i as f32).collect()
        }
        _ => {
            let step = std::f32::consts::TAU / count as f32;
            (0..count).map(|i| step * i as f32).collect()
        }
    }
}

/// Публикует залп в очередь событий, целясь из `origin` в `target`
pub fn emit_volley(
    events: &mut EventWriter<ProjectileRequest>,
    owner: Entity,
    origin: Vec2,
    target: Vec2,
    count: u32,
    speed: f32,
    damage: u32,
) {
    let to_target = target - origin;
    let aim = to_target.y.atan2(to_target.x);

    for angle in volley_angles(aim, count) {
        events.write(ProjectileRequest {
            owner,
            origin,
            angle,
            speed,
            damage,
        });
    }

    crate::log(&format!(
        "🏹 Projectile volley: owner {:?}, {} shot(s), {} dmg each",
        owner, count.max(1), damage
    ));
}
