//! Buff collaborator seam
//!
//! Buff система (стаки, таймеры, пересчёт статов) — внешний модуль.
//! Boss self-buff steps публикуют `BuffRequest`; host применяет
//! множители и снимает их по истечении duration.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тип баффа (boss self-buffs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum BuffKind {
    AttackUp,
    DefenseUp,
    SpeedUp,
}

/// Event: запрос на наложение баффа (ядро → host buff system)
#[derive(Event, Debug, Clone)]
pub struct BuffRequest {
    pub target: Entity,
    pub kind: BuffKind,
    /// Значение (множитель при is_multiplier, иначе flat bonus)
    pub value: f32,
    /// Время жизни баффа (секунды)
    pub duration: f32,
    pub is_multiplier: bool,
    pub stackable: bool,
    pub max_stacks: u32,
}

impl BuffRequest {
    /// Стакающийся временный множитель — форма, которую используют
    /// boss pattern steps.
    pub fn stacking_multiplier(target: Entity, kind: BuffKind, value: f32, duration: f32) -> Self {
        Self {
            target,
            kind,
            value,
            duration,
            is_multiplier: true,
            stackable: true,
            max_stacks: 3,
        }
    }
}
