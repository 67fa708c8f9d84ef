//! DDA grid traversal.
use glam::Vec2;

use super::textures::TEXTURE_SIZE;
use crate::world::grid_map::{GridMap, TextureId};

/// Stand-in for an infinite delta distance when a ray component is zero.
const NO_CROSSING: f32 = 1e30;
/// Floor for the wall distance. A camera standing on a wall face would
/// otherwise report `0.0` or `-0.0`.
pub const MIN_WALL_DISTANCE: f32 = 1e-4;

/// Which grid line the ray crossed to reach the wall cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Reached by an x step.
    NorthSouth,
    /// Reached by a y step; drawn darker.
    EastWest,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersect {
    /// Distance along the camera's forward axis, not the ray length.
    pub distance: f32,
    pub map_x: i32,
    pub map_y: i32,
    pub side: Side,
    /// World position of the hit on the wall face.
    pub hit: Vec2,
    /// Texture column, already mirrored for the approach direction.
    pub tex_x: i32,
    pub texture: TextureId,
}

/// Walks the grid from `origin` along `ray_dir` until a wall cell.
///
/// Terminates for any map: cells outside the map are walls.
pub fn cast_ray(map: &GridMap, origin: Vec2, ray_dir: Vec2) -> Intersect {
    let mut map_x = origin.x.floor() as i32;
    let mut map_y = origin.y.floor() as i32;

    let delta_x = if ray_dir.x == 0.0 { NO_CROSSING } else { (1.0 / ray_dir.x).abs() };
    let delta_y = if ray_dir.y == 0.0 { NO_CROSSING } else { (1.0 / ray_dir.y).abs() };

    let (step_x, mut side_x) = if ray_dir.x < 0.0 {
        (-1, (origin.x - map_x as f32) * delta_x)
    } else {
        (1, (map_x as f32 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if ray_dir.y < 0.0 {
        (-1, (origin.y - map_y as f32) * delta_y)
    } else {
        (1, (map_y as f32 + 1.0 - origin.y) * delta_y)
    };

    let side = loop {
        let side = if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            Side::NorthSouth
        } else {
            side_y += delta_y;
            map_y += step_y;
            Side::EastWest
        };
        if map.is_wall(map_x, map_y) {
            break side;
        }
    };

    // projection onto the forward axis; using the ray length here bends
    // straight walls into a fisheye
    let distance = match side {
        Side::NorthSouth => (map_x as f32 - origin.x + (1 - step_x) as f32 / 2.0) / ray_dir.x,
        Side::EastWest => (map_y as f32 - origin.y + (1 - step_y) as f32 / 2.0) / ray_dir.y,
    }
    .max(MIN_WALL_DISTANCE);

    let (hit, wall_x) = match side {
        Side::NorthSouth => {
            let y = origin.y + distance * ray_dir.y;
            let x = map_x as f32 + if step_x < 0 { 1.0 } else { 0.0 };
            (Vec2::new(x, y), y)
        }
        Side::EastWest => {
            let x = origin.x + distance * ray_dir.x;
            let y = map_y as f32 + if step_y < 0 { 1.0 } else { 0.0 };
            (Vec2::new(x, y), x)
        }
    };

    let size = TEXTURE_SIZE as i32;
    let mut tex_x = ((wall_x - wall_x.floor()) * size as f32) as i32;
    if (side == Side::NorthSouth && ray_dir.x > 0.0) || (side == Side::EastWest && ray_dir.y < 0.0) {
        tex_x = size - tex_x - 1;
    }

    Intersect {
        distance,
        map_x,
        map_y,
        side,
        hit,
        tex_x,
        texture: map.wall_texture(map_x, map_y),
    }
}
