//! Pure damage pipeline
//!
//! Без состояния: любая атака (игрок, enemy windup, boss pattern step)
//! фондируется через эти функции. Stateful часть (combo counter,
//! dodge/parry окна) живёт в `CombatResolver`.

/// Crit multiplier (roll против crit_chance делает caller)
pub const CRIT_MULTIPLIER: f32 = 2.0;

/// Backstab multiplier, независим от crit
pub const BACKSTAB_MULTIPLIER: f32 = 1.5;

/// Combo multiplier: ступенчатая, неубывающая по числу последовательных
/// попаданий внутри combo timeout.
///
/// 1 / 2 / 3 / 4+ hits → 1.0 / 1.1 / 1.25 / 1.5
pub fn combo_multiplier(hit_count: u32) -> f32 {
    match hit_count {
        0 | 1 => 1.0,
        2 => 1.1,
        3 => 1.25,
        _ => 1.5,
    }
}

/// Полный attacker-side pipeline: base × combo × crit? × backstab?,
/// floor до целого.
pub fn attack_damage(base: u32, combo_hits: u32, is_crit: bool, is_backstab: bool) -> u32 {
    let mut damage = base as f32 * combo_multiplier(combo_hits);
    if is_crit {
        damage *= CRIT_MULTIPLIER;
    }
    if is_backstab {
        damage *= BACKSTAB_MULTIPLIER;
    }
    damage.floor() as u32
}

/// Mitigation по defense: `max(1, damage - defense)`
///
/// Минимум 1 урона проходит всегда — гарантия attrition, бой не может
/// зависнуть об высокую защиту.
pub fn mitigate(damage: u32, defense: u32) -> u32 {
    damage.saturating_sub(defense).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_multiplier_reference_values() {
        assert_eq!(combo_multiplier(1), 1.0);
        assert_eq!(combo_multiplier(2), 1.1);
        assert_eq!(combo_multiplier(3), 1.25);
        assert_eq!(combo_multiplier(4), 1.5);
        assert_eq!(combo_multiplier(17), 1.5);
    }

    #[test]
    fn test_combo_multiplier_non_decreasing() {
        let mut prev = 0.0_f32;
        for hits in 1..=10 {
            let m = combo_multiplier(hits);
            assert!(m >= prev, "combo multiplier decreased at {} hits", hits);
            prev = m;
        }
    }

    #[test]
    fn test_attack_damage_plain() {
        assert_eq!(attack_damage(10, 1, false, false), 10);
        // 10 × 1.25 = 12.5 → floor 12
        assert_eq!(attack_damage(10, 3, false, false), 12);
    }

    #[test]
    fn test_attack_damage_crit_and_backstab_stack() {
        // 10 × 1.0 × 2.0 = 20
        assert_eq!(attack_damage(10, 1, true, false), 20);
        // 10 × 1.0 × 1.5 = 15
        assert_eq!(attack_damage(10, 1, false, true), 15);
        // Независимые множители: 10 × 2.0 × 1.5 = 30
        assert_eq!(attack_damage(10, 1, true, true), 30);
    }

    #[test]
    fn test_mitigate_minimum_one() {
        assert_eq!(mitigate(10, 3), 7);
        assert_eq!(mitigate(5, 5), 1);
        assert_eq!(mitigate(1, 100), 1);
        assert_eq!(mitigate(0, 0), 1);
    }
}
