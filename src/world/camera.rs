use glam::Vec2;

use super::grid_map::GridMap;

pub const PLAYER_SPEED: f32 = 3.0;    // cells per second
pub const ROTATION_SPEED: f32 = 2.0;  // radians per second
/// Camera plane length relative to the direction vector (~66° FOV).
pub const FOV_PLANE: f32 = 0.66;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub dir: Vec2,
    pub plane: Vec2,   // perpendicular to `dir`, length sets the FOV
    pub move_speed: f32,
    pub rot_speed: f32,
}

impl Camera {
    pub fn new(pos: Vec2, dir: Vec2) -> Self {
        Self {
            pos,
            dir,
            plane: dir.perp() * FOV_PLANE,
            move_speed: PLAYER_SPEED,
            rot_speed: ROTATION_SPEED,
        }
    }

    /// Rotates direction and plane together so the FOV is preserved.
    pub fn rotate(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        let rot = |v: Vec2| Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
        self.dir = rot(self.dir);
        self.plane = rot(self.plane);
    }

    /// Moves each axis independently so the camera slides along walls.
    pub fn try_move(&mut self, map: &GridMap, delta: Vec2) {
        let target = self.pos + delta;
        if !map.is_wall(target.x as i32, self.pos.y as i32) {
            self.pos.x = target.x;
        }
        if !map.is_wall(self.pos.x as i32, target.y as i32) {
            self.pos.y = target.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_is_perpendicular_with_fov_length() {
        let cam = Camera::new(Vec2::new(2.5, 2.5), Vec2::new(-1.0, 0.0));
        assert!(cam.dir.dot(cam.plane).abs() < 1e-6);
        assert!((cam.plane.length() - FOV_PLANE).abs() < 1e-6);
        assert_eq!(cam.plane, Vec2::new(0.0, -0.66));
    }

    #[test]
    fn rotation_keeps_plane_perpendicular() {
        let mut cam = Camera::new(Vec2::new(2.5, 2.5), Vec2::new(1.0, 0.0));
        cam.rotate(std::f32::consts::FRAC_PI_2);
        assert!((cam.dir - Vec2::new(0.0, 1.0)).length() < 1e-5);
        assert!(cam.dir.dot(cam.plane).abs() < 1e-5);
        assert!((cam.plane.length() - FOV_PLANE).abs() < 1e-5);
    }

    #[test]
    fn slides_along_walls() {
        let map = GridMap::with_border(10, 8).unwrap();
        let mut cam = Camera::new(Vec2::new(1.5, 1.5), Vec2::new(1.0, 0.0));
        // x is blocked by the west border, y is free
        cam.try_move(&map, Vec2::new(-1.0, 0.5));
        assert_eq!(cam.pos, Vec2::new(1.5, 2.0));
    }
}
