//! Host-supplied collision query
//!
//! Ядро не владеет геометрией карты: host (tilemap, dungeon generator)
//! отдаёт AABB-пробу через ресурс `CollisionMap`. Каждое перемещение
//! AI проверяется по осям отдельно — движущийся entity скользит вдоль
//! стен вместо полной остановки.

use bevy::prelude::*;

use crate::components::Hitbox;

/// AABB-проба карты: `(x, y)` — центр hitbox
pub trait CollisionQuery: Send + Sync {
    fn is_colliding(&self, x: f32, y: f32, width: f32, height: f32) -> bool;
}

// Замыкания тоже годятся как проба (удобно в тестах)
impl<F> CollisionQuery for F
where
    F: Fn(f32, f32, f32, f32) -> bool + Send + Sync,
{
    fn is_colliding(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self(x, y, width, height)
    }
}

/// Открытый мир без стен (default, пока host не вставил свою карту)
pub struct OpenWorld;

impl CollisionQuery for OpenWorld {
    fn is_colliding(&self, _x: f32, _y: f32, _width: f32, _height: f32) -> bool {
        false
    }
}

/// Resource-обёртка над host-пробой
#[derive(Resource)]
pub struct CollisionMap(pub Box<dyn CollisionQuery>);

impl Default for CollisionMap {
    fn default() -> Self {
        Self(Box::new(OpenWorld))
    }
}

impl CollisionMap {
    pub fn new(query: impl CollisionQuery + 'static) -> Self {
        Self(Box::new(query))
    }
}

/// Per-axis движение с проверкой коллизий (sliding вдоль стен)
///
/// X и Y применяются независимо: если одна ось упирается в стену,
/// вторая всё равно двигает entity.
pub fn slide_move(transform: &mut Transform, hitbox: &Hitbox, delta: Vec2, map: &CollisionMap) {
    let pos = transform.translation;

    let new_x = pos.x + delta.x;
    if !map.0.is_colliding(new_x, pos.y, hitbox.width, hitbox.height) {
        transform.translation.x = new_x;
    }

    let new_y = transform.translation.y + delta.y;
    if !map
        .0
        .is_colliding(transform.translation.x, new_y, hitbox.width, hitbox.height)
    {
        transform.translation.y = new_y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_world_never_collides() {
        let map = CollisionMap::default();
        assert!(!map.0.is_colliding(0.0, 0.0, 24.0, 24.0));
        assert!(!map.0.is_colliding(1e6, -1e6, 24.0, 24.0));
    }

    #[test]
    fn test_slide_move_open_world() {
        let map = CollisionMap::default();
        let hitbox = Hitbox::default();
        let mut transform = Transform::from_translation(Vec3::ZERO);

        slide_move(&mut transform, &hitbox, Vec2::new(3.0, -2.0), &map);
        assert_eq!(transform.translation.x, 3.0);
        assert_eq!(transform.translation.y, -2.0);
    }

    #[test]
    fn test_slide_move_slides_along_wall() {
        // Стена правее x=10: X блокируется, Y проходит
        let map = CollisionMap::new(|x: f32, _y: f32, _w: f32, _h: f32| x > 10.0);
        let hitbox = Hitbox::default();
        let mut transform = Transform::from_translation(Vec3::new(9.0, 0.0, 0.0));

        slide_move(&mut transform, &hitbox, Vec2::new(5.0, 4.0), &map);
        assert_eq!(transform.translation.x, 9.0); // Упёрлись
        assert_eq!(transform.translation.y, 4.0); // Скользим
    }
}
